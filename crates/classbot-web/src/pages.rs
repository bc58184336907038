//! Browser-facing page handlers: home, login, signup, logout, add-question.
//!
//! Form posts answer with `303 See Other` redirects, mirroring the classic
//! post/redirect/get flow.  Authentication state travels in the session
//! cookie; see [`crate::cookie`].

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use classbot_store::{LoginOutcome, WriteOutcome};
use serde::Deserialize;

use crate::cookie;
use crate::error::WebError;
use crate::frontend::{self, ADD_QUESTION_HTML, LOGIN_HTML, SIGNUP_HTML};
use crate::state::{AppState, CallerSession};

/// Body returned when a login attempt fails, whatever the reason.
pub const LOGIN_DENIED: &str = "Invalid credentials, please try again.";

/// Username/password form shared by login and signup.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuestionForm {
    pub subject: String,
    pub question: String,
    pub answer: String,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub async fn home(CallerSession(session): CallerSession) -> Html<String> {
    Html(frontend::render_home(session.username()))
}

// ---------------------------------------------------------------------------
// /login
// ---------------------------------------------------------------------------

pub async fn login_page() -> Html<String> {
    Html(frontend::page(LOGIN_HTML))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    CallerSession(mut session): CallerSession,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    let outcome = state
        .service
        .login(&mut session, &form.username, &form.password)
        .await?;

    match (outcome, session.token()) {
        (LoginOutcome::LoggedIn, Some(token)) => {
            let set_cookie = cookie::session_cookie(
                &state.config.cookie_name,
                token,
                state.service.sessions().ttl(),
                state.config.secure_cookie,
            );
            Ok(([(SET_COOKIE, set_cookie)], Redirect::to("/")).into_response())
        }
        _ => Ok((StatusCode::UNAUTHORIZED, LOGIN_DENIED).into_response()),
    }
}

// ---------------------------------------------------------------------------
// /signup
// ---------------------------------------------------------------------------

pub async fn signup_page() -> Html<String> {
    Html(frontend::page(SIGNUP_HTML))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect, WebError> {
    state.service.signup(&form.username, &form.password).await?;
    Ok(Redirect::to("/login"))
}

// ---------------------------------------------------------------------------
// GET /logout
// ---------------------------------------------------------------------------

pub async fn logout(
    State(state): State<Arc<AppState>>,
    CallerSession(mut session): CallerSession,
) -> Response {
    state.service.logout(&mut session).await;
    let expired = cookie::expired_cookie(&state.config.cookie_name);
    ([(SET_COOKIE, expired)], Redirect::to("/")).into_response()
}

// ---------------------------------------------------------------------------
// /add_question
// ---------------------------------------------------------------------------

pub async fn add_question_page(CallerSession(session): CallerSession) -> Response {
    if !session.is_authenticated() {
        return Redirect::to("/login").into_response();
    }
    Html(frontend::page(ADD_QUESTION_HTML)).into_response()
}

pub async fn add_question(
    State(state): State<Arc<AppState>>,
    CallerSession(session): CallerSession,
    Form(form): Form<QuestionForm>,
) -> Result<Redirect, WebError> {
    let outcome = state
        .service
        .add_question(&session, &form.subject, &form.question, &form.answer)
        .await?;

    Ok(match outcome {
        WriteOutcome::Added => Redirect::to("/"),
        WriteOutcome::LoginRequired => Redirect::to("/login"),
    })
}
