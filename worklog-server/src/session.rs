//! Signed session cookies
//!
//! The cookie carries its own state: URL-safe base64 of a JSON payload, a dot,
//! and an HMAC-SHA256 tag over the encoded payload. Nothing is stored server
//! side, so a valid signature plus an unexpired timestamp is a valid session.

use std::time::Duration;

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "worklog_session";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("malformed session cookie")]
    Malformed,

    #[error("session signature mismatch")]
    BadSignature,

    #[error("session expired")]
    Expired,
}

/// Session payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub is_admin: bool,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

/// Issues and verifies session cookies.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl: Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner")
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionSigner {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration, secure: bool) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl,
            secure,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    /// A fresh session expiring one TTL after `now`.
    pub fn issue(&self, username: &str, is_admin: bool, now: DateTime<Utc>) -> Session {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        Session {
            username: username.to_owned(),
            is_admin,
            expires_at: now.timestamp().saturating_add(ttl),
        }
    }

    pub fn encode(&self, session: &Session) -> String {
        // Serializing a struct of strings, bools and integers cannot fail.
        let json = serde_json::to_vec(session).unwrap_or_default();
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", payload, tag)
    }

    pub fn decode(&self, value: &str, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let (payload, tag) = value.split_once('.').ok_or(SessionError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| SessionError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        let session: Session =
            serde_json::from_slice(&json).map_err(|_| SessionError::Malformed)?;

        if session.expires_at <= now.timestamp() {
            return Err(SessionError::Expired);
        }
        Ok(session)
    }

    /// The verified session from a request's cookies, if any.
    pub fn from_headers(&self, headers: &HeaderMap, now: DateTime<Utc>) -> Option<Session> {
        let value = cookie_value(headers, SESSION_COOKIE)?;
        match self.decode(&value, now) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring session cookie");
                None
            }
        }
    }

    /// `Set-Cookie` value establishing `session`.
    pub fn set_cookie(&self, session: &Session) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE,
            self.encode(session),
            self.ttl.as_secs()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that removes the session.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            SESSION_COOKIE
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find a cookie by name across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    fn signer() -> SessionSigner {
        SessionSigner::new(
            "0123456789abcdef0123456789abcdef",
            Duration::from_secs(3600),
            false,
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 9, 30, 0).unwrap()
    }

    #[test]
    fn issued_session_decodes() {
        let signer = signer();
        let session = signer.issue("alice", false, now());
        assert_eq!(session.expires_at, now().timestamp() + 3600);

        let cookie = signer.encode(&session);
        assert_eq!(signer.decode(&cookie, now()).unwrap(), session);
    }

    #[test]
    fn tampered_payload_rejected() {
        let signer = signer();
        let cookie = signer.encode(&signer.issue("alice", false, now()));
        let (_, tag) = cookie.split_once('.').unwrap();

        let forged = Session {
            username: "alice".into(),
            is_admin: true,
            expires_at: now().timestamp() + 3600,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let forged_cookie = format!("{}.{}", forged_payload, tag);

        assert_eq!(
            signer.decode(&forged_cookie, now()),
            Err(SessionError::BadSignature)
        );
    }

    #[test]
    fn other_secret_rejected() {
        let cookie = signer().encode(&signer().issue("alice", true, now()));
        let other = SessionSigner::new(
            "fedcba9876543210fedcba9876543210",
            Duration::from_secs(3600),
            false,
        );
        assert_eq!(other.decode(&cookie, now()), Err(SessionError::BadSignature));
    }

    #[test]
    fn expired_session_rejected() {
        let signer = signer();
        let cookie = signer.encode(&signer.issue("alice", false, now()));
        let later = now() + chrono::Duration::seconds(3600);
        assert_eq!(signer.decode(&cookie, later), Err(SessionError::Expired));
    }

    #[test]
    fn garbage_rejected() {
        let signer = signer();
        assert_eq!(signer.decode("", now()), Err(SessionError::Malformed));
        assert_eq!(signer.decode("no-dot", now()), Err(SessionError::Malformed));
        assert_eq!(signer.decode("a.!!!", now()), Err(SessionError::Malformed));
    }

    #[test]
    fn reads_cookie_among_others() {
        let signer = signer();
        let session = signer.issue("bob", false, now());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!(
                "theme=dark; {}={}; lang=en",
                SESSION_COOKIE,
                signer.encode(&session)
            ))
            .unwrap(),
        );

        assert_eq!(signer.from_headers(&headers, now()), Some(session));
        assert_eq!(cookie_value(&headers, "lang").as_deref(), Some("en"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_attributes() {
        let signer = SessionSigner::new("k".repeat(32), Duration::from_secs(60), true);
        let set = signer.set_cookie(&signer.issue("bob", false, now()));
        assert!(set.starts_with("worklog_session="));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=60"));
        assert!(set.ends_with("; Secure"));

        let clear = signer.clear_cookie();
        assert!(clear.starts_with("worklog_session=;"));
        assert!(clear.contains("Max-Age=0"));
    }
}
