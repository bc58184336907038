//! Session cookie parsing and construction.

use std::time::Duration;

use axum::http::HeaderMap;
use axum::http::header::COOKIE;

/// Extract the value of cookie `name` from the request headers.
///
/// Every `Cookie` header is searched; the first non-empty match wins.
pub fn session_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_owned())
}

/// `Set-Cookie` value that stores `token` for `max_age`.
pub fn session_cookie(name: &str, token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that makes the browser drop cookie `name`.
pub fn expired_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let h = headers(&["theme=dark; classbot_session=abc123; lang=en"]);
        assert_eq!(
            session_token(&h, "classbot_session").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn searches_multiple_cookie_headers() {
        let h = headers(&["theme=dark", "classbot_session=xyz"]);
        assert_eq!(session_token(&h, "classbot_session").as_deref(), Some("xyz"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(session_token(&HeaderMap::new(), "classbot_session"), None);
        let h = headers(&["classbot_session="]);
        assert_eq!(session_token(&h, "classbot_session"), None);
        let h = headers(&["classbot_session_old=abc"]);
        assert_eq!(session_token(&h, "classbot_session"), None);
    }

    #[test]
    fn cookie_attributes() {
        let c = session_cookie("s", "tok", Duration::from_secs(60), false);
        assert_eq!(c, "s=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=60");
        assert!(session_cookie("s", "tok", Duration::from_secs(60), true).ends_with("; Secure"));
        assert!(expired_cookie("s").contains("Max-Age=0"));
    }
}
