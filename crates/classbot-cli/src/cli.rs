//! CLI argument definitions for classbot.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// classbot -- a subject-filtered question/answer chatbot.
#[derive(Parser)]
#[command(
    name = "classbot",
    version,
    about = "classbot -- question/answer chatbot with a web widget",
    long_about = "Answers questions from a JSON corpus of subject/question/answer records. \
                  Logged-in users can add new questions through the web interface."
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Emit logs as JSON lines instead of the compact text format.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server with the embedded chat widget.
    Serve {
        /// Address to bind the HTTP server to (overrides config).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Look up an answer from the command line.
    Ask {
        /// Text contained in the question.
        query: String,

        /// Text contained in the subject (empty matches every subject).
        #[arg(long, short, default_value = "")]
        subject: String,
    },

    /// Manage user accounts.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage the question corpus.
    Questions {
        #[command(subcommand)]
        action: QuestionAction,
    },

    /// Show configuration and store status.
    Status,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a new account.
    Add {
        /// Login name for the new account.
        username: String,

        /// Password; read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum QuestionAction {
    /// Append a question to the corpus.
    Add {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        question: String,

        #[arg(long)]
        answer: String,
    },

    /// Print stored questions.
    List {
        /// Only show subjects containing this text.
        #[arg(long, short)]
        subject: Option<String>,

        /// Print as a JSON array.
        #[arg(long)]
        json: bool,
    },
}
