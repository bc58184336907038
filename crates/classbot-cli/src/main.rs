//! CLI entry point for classbot.
//!
//! This binary provides the `classbot` command with subcommands for
//! serving the web widget, asking questions, and administering the
//! account and question files.

mod cli;
mod config;
mod helpers;

use std::io::{self, BufRead};

use anyhow::{Context, Result, bail};
use clap::Parser;
use classbot_web::{WebConfig, WebServer};
use tracing::info;

use crate::cli::{Cli, Commands, QuestionAction, UserAction};
use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    helpers::init_tracing("info", cli.json_logs);

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(config, bind, port).await,
        Commands::Ask { query, subject } => cmd_ask(&config, &query, &subject).await,
        Commands::Users { action } => match action {
            UserAction::Add { username, password } => {
                cmd_user_add(&config, &username, password).await
            }
        },
        Commands::Questions { action } => match action {
            QuestionAction::Add {
                subject,
                question,
                answer,
            } => cmd_question_add(&config, &subject, &question, &answer).await,
            QuestionAction::List { subject, json } => {
                cmd_question_list(&config, subject.as_deref(), json).await
            }
        },
        Commands::Status => cmd_status(&cli.config, &config).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(mut config: AppConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = helpers::build_service(&config).await?;
    let web_config = WebConfig {
        bind_addr: config.server.bind.clone(),
        port: config.server.port,
        cookie_name: config.session.cookie_name.clone(),
        secure_cookie: config.server.secure_cookie,
    };

    let server = WebServer::new(web_config, service);
    println!();
    println!("  classbot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Listening on http://{}", server.addr());
    println!();

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("web server failed")
}

// ---------------------------------------------------------------------------
// Subcommand: ask
// ---------------------------------------------------------------------------

async fn cmd_ask(config: &AppConfig, query: &str, subject: &str) -> Result<()> {
    let corpus = helpers::open_corpus(config).await?;
    println!("{}", corpus.find_answer(query, subject).await);
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: users
// ---------------------------------------------------------------------------

async fn cmd_user_add(config: &AppConfig, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password_line()?,
    };

    let accounts = helpers::open_accounts(config).await?;
    accounts
        .create_account(username, &password)
        .await
        .with_context(|| format!("failed to create account '{username}'"))?;

    info!(username, "account created from cli");
    println!("  Created account '{username}'.");
    Ok(())
}

fn read_password_line() -> Result<String> {
    eprint!("  Password: ");
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_owned();
    if password.is_empty() {
        bail!("no password given");
    }
    Ok(password)
}

// ---------------------------------------------------------------------------
// Subcommand: questions
// ---------------------------------------------------------------------------

async fn cmd_question_add(
    config: &AppConfig,
    subject: &str,
    question: &str,
    answer: &str,
) -> Result<()> {
    let corpus = helpers::open_corpus(config).await?;
    corpus
        .add_record(subject, question, answer)
        .await
        .context("failed to save question")?;

    println!("  Added. The corpus now holds {} questions.", corpus.len().await);
    Ok(())
}

async fn cmd_question_list(config: &AppConfig, subject: Option<&str>, json: bool) -> Result<()> {
    let corpus = helpers::open_corpus(config).await?;
    let records = corpus.list(subject).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("  No questions stored.");
        return Ok(());
    }

    for (i, r) in records.iter().enumerate() {
        println!("  {:>3}. [{}] {}", i + 1, r.subject, r.question);
        println!("       -> {}", r.answer);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

async fn cmd_status(config_path: &std::path::Path, config: &AppConfig) -> Result<()> {
    println!();
    println!("  classbot v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if config_path.exists() {
        println!("  Config:      OK ({})", config_path.display());
    } else {
        println!("  Config:      defaults ({} not found)", config_path.display());
    }
    println!(
        "  Server:      http://{}:{}",
        config.server.bind, config.server.port
    );

    let corpus = helpers::open_corpus(config).await?;
    println!(
        "  Questions:   {} ({})",
        corpus.len().await,
        config.storage.questions_file.display()
    );

    let accounts = helpers::open_accounts(config).await?;
    println!(
        "  Accounts:    {} ({})",
        accounts.len().await,
        config.storage.users_file.display()
    );
    println!("  Session TTL: {}s", config.session.ttl().as_secs());
    println!();

    Ok(())
}
