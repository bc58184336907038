//! End-to-end tests for the HTTP routes.
//!
//! These tests spin up the **real** Axum server on an OS-assigned ephemeral
//! port, make actual HTTP requests via `reqwest` (with redirects disabled so
//! the `Location` and `Set-Cookie` headers can be inspected), and check the
//! JSON files the server writes.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use tempfile::TempDir;
use tokio::net::TcpListener;

use classbot_store::{AccountStore, CorpusStore, NO_ANSWER, QaRecord, QaService, SessionGate};
use classbot_web::pages::LOGIN_DENIED;
use classbot_web::{WebConfig, WebServer};

// ── helpers ──────────────────────────────────────────────────────────────────

struct TestServer {
    base: String,
    client: reqwest::Client,
    dir: TempDir,
    _handle: tokio::task::JoinHandle<()>,
}

/// Seed `questions.json`, bind to 127.0.0.1:0, and serve the full router.
async fn start_test_server(seed: &[QaRecord]) -> TestServer {
    let dir = TempDir::new().unwrap();
    let questions = dir.path().join("questions.json");
    std::fs::write(&questions, serde_json::to_vec(seed).unwrap()).unwrap();

    let service = QaService::new(
        CorpusStore::open(questions).await.unwrap(),
        AccountStore::open(dir.path().join("users.json"))
            .await
            .unwrap()
            .with_iterations(1_000),
        SessionGate::new(Duration::from_secs(60), 100),
    );
    let app = WebServer::new(WebConfig::default(), service).router();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr: SocketAddr = listener.local_addr().expect("get local addr");
    let base = format!("http://127.0.0.1:{}", addr.port());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    // Small yield so the listener is ready.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestServer {
        base,
        client,
        dir,
        _handle: handle,
    }
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn ask(&self, query: &str, subject: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/get_answer"))
            .json(&serde_json::json!({"query": query, "subject": subject}))
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = resp.json().await.expect("invalid JSON");
        json["answer"].as_str().unwrap().to_owned()
    }

    async fn signup(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/signup"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("request failed")
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("request failed")
    }

    /// Sign up and log in, returning the `name=value` cookie pair.
    async fn logged_in(&self, username: &str, password: &str) -> String {
        assert_eq!(
            self.signup(username, password).await.status(),
            StatusCode::SEE_OTHER
        );
        let resp = self.login(username, password).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        cookie_pair(&resp).expect("login must set a session cookie")
    }

    fn stored_questions(&self) -> Vec<QaRecord> {
        read_json(&self.dir.path().join("questions.json"))
    }
}

fn cookie_pair(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_owned)
}

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

fn math() -> QaRecord {
    QaRecord::new("math", "what is 2+2", "4")
}

// ── POST /api/get_answer ─────────────────────────────────────────────────────

#[tokio::test]
async fn get_answer_matches_subject_and_question() {
    let srv = start_test_server(&[math()]).await;

    assert_eq!(srv.ask("2+2", "math").await, "4");
    assert_eq!(srv.ask("2+2", "science").await, NO_ANSWER);
}

#[tokio::test]
async fn get_answer_defaults_missing_fields_to_empty() {
    let srv = start_test_server(&[math()]).await;

    let resp = srv
        .client
        .post(srv.url("/api/get_answer"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["answer"], "4");
}

// ── home page ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn home_page_reflects_login_state() {
    let srv = start_test_server(&[]).await;

    let anon = srv.client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(anon.status(), StatusCode::OK);
    let body = anon.text().await.unwrap();
    assert!(body.contains("href=\"/signup\""));
    assert!(!body.contains("Welcome"));

    let cookie = srv.logged_in("alice", "pw1").await;
    let body = srv
        .client
        .get(srv.url("/"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Welcome, alice!"));
}

// ── signup / login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn signup_redirects_to_login_and_persists_account() {
    let srv = start_test_server(&[]).await;

    let resp = srv.signup("alice", "pw1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let users: serde_json::Value = read_json(&srv.dir.path().join("users.json"));
    assert_eq!(users[0]["username"], "alice");
    assert_ne!(users[0]["password"], "pw1");
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let srv = start_test_server(&[]).await;

    srv.signup("alice", "pw1").await;
    let resp = srv.signup("alice", "other").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_success_sets_cookie_and_redirects_home() {
    let srv = start_test_server(&[]).await;
    srv.signup("alice", "pw1").await;

    let resp = srv.login("alice", "pw1").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let set_cookie = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("classbot_session="));
    assert!(set_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let srv = start_test_server(&[]).await;
    srv.signup("alice", "pw1").await;

    let wrong_pw = srv.login("alice", "wrong").await;
    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_pw.headers().get(SET_COOKIE).is_none());
    let wrong_pw = wrong_pw.text().await.unwrap();

    let no_user = srv.login("mallory", "pw1").await;
    assert_eq!(no_user.status(), StatusCode::UNAUTHORIZED);
    let no_user = no_user.text().await.unwrap();

    assert_eq!(wrong_pw, LOGIN_DENIED);
    assert_eq!(wrong_pw, no_user);
}

#[tokio::test]
async fn logout_expires_cookie_and_revokes_session() {
    let srv = start_test_server(&[]).await;
    let cookie = srv.logged_in("alice", "pw1").await;

    let resp = srv
        .client
        .get(srv.url("/logout"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let set_cookie = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    // Replaying the old token no longer grants write access.
    let resp = srv
        .client
        .get(srv.url("/add_question"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

// ── /add_question ────────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_add_question_redirects_to_login() {
    let srv = start_test_server(&[math()]).await;

    let page = srv.client.get(srv.url("/add_question")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&page), "/login");

    let resp = srv
        .client
        .post(srv.url("/add_question"))
        .form(&[("subject", "science"), ("question", "what is h2o"), ("answer", "water")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    assert_eq!(srv.stored_questions(), vec![math()]);
}

#[tokio::test]
async fn forged_cookie_is_treated_as_anonymous() {
    let srv = start_test_server(&[]).await;

    let resp = srv
        .client
        .post(srv.url("/add_question"))
        .header(COOKIE, "classbot_session=not-a-real-token")
        .form(&[("subject", "math"), ("question", "q"), ("answer", "a")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/login");
    assert!(srv.stored_questions().is_empty());
}

#[tokio::test]
async fn logged_in_add_question_appends_and_answers() {
    let srv = start_test_server(&[math()]).await;
    let cookie = srv.logged_in("alice", "pw1").await;

    let page = srv
        .client
        .get(srv.url("/add_question"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);

    let resp = srv
        .client
        .post(srv.url("/add_question"))
        .header(COOKIE, &cookie)
        .form(&[("subject", "science"), ("question", "what is h2o"), ("answer", "water")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    assert_eq!(
        srv.stored_questions().last().unwrap(),
        &QaRecord::new("science", "what is h2o", "water")
    );
    assert_eq!(srv.ask("H2O", "science").await, "water");
}

// ── GET /api/status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn status_reports_counts() {
    let srv = start_test_server(&[math()]).await;
    srv.logged_in("alice", "pw1").await;

    let json: serde_json::Value = srv
        .client
        .get(srv.url("/api/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["questions"], 1);
    assert_eq!(json["accounts"], 1);
    assert_eq!(json["active_sessions"], 1);
}
