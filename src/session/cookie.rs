//! Session Cookie Codec
//!
//! The browser carries `<session id>.<tag>` where the tag is an HMAC-SHA256
//! over the id, base64url encoded. Verification is constant time, and a
//! value that fails it is treated as if no cookie was sent.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::types::SESSION_TTL_SECS;

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the session reference
pub const SESSION_COOKIE: &str = "clubhouse_sid";

/// Signs and verifies session cookie values
pub struct SessionCookie {
    key: Vec<u8>,
}

impl SessionCookie {
    pub fn new(signing_secret: &str) -> Self {
        Self {
            key: signing_secret.as_bytes().to_vec(),
        }
    }

    fn tag(&self, session_id: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("hmac accepts keys of any length");
        mac.update(session_id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Produce the signed cookie value for a session id
    pub fn seal(&self, session_id: &str) -> String {
        format!(
            "{}.{}",
            session_id,
            URL_SAFE_NO_PAD.encode(self.tag(session_id))
        )
    }

    /// Recover the session id from a cookie value, or `None` if the
    /// signature does not check out
    pub fn open(&self, value: &str) -> Option<String> {
        let (session_id, tag_b64) = value.split_once('.')?;
        let provided = URL_SAFE_NO_PAD.decode(tag_b64).ok()?;
        let expected = self.tag(session_id);
        if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            Some(session_id.to_string())
        } else {
            None
        }
    }

    /// Full `Set-Cookie` value establishing a session
    pub fn set_header(&self, session_id: &str) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.seal(session_id),
            SESSION_TTL_SECS,
        )
    }

    /// Full `Set-Cookie` value removing the session cookie
    pub fn clear_header(&self) -> String {
        format!("{}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_then_open_round_trips() {
        let cookie = SessionCookie::new("a-signing-secret-of-decent-length");
        let sealed = cookie.seal("some-session-id");
        assert_eq!(cookie.open(&sealed), Some("some-session-id".to_string()));
    }

    #[test]
    fn tampered_id_is_rejected() {
        let cookie = SessionCookie::new("a-signing-secret-of-decent-length");
        let sealed = cookie.seal("some-session-id");
        let tampered = sealed.replacen("some", "evil", 1);
        assert_eq!(cookie.open(&tampered), None);
    }

    #[test]
    fn tampered_tag_is_rejected() {
        let cookie = SessionCookie::new("a-signing-secret-of-decent-length");
        let mut sealed = cookie.seal("some-session-id");
        sealed.pop();
        sealed.push('A');
        assert_eq!(cookie.open(&sealed), None);
    }

    #[test]
    fn different_key_cannot_open() {
        let ours = SessionCookie::new("signing-secret-number-one-here");
        let theirs = SessionCookie::new("signing-secret-number-two-here");
        let sealed = ours.seal("some-session-id");
        assert_eq!(theirs.open(&sealed), None);
    }

    #[test]
    fn garbage_values_are_rejected() {
        let cookie = SessionCookie::new("a-signing-secret-of-decent-length");
        assert_eq!(cookie.open(""), None);
        assert_eq!(cookie.open("no-separator"), None);
        assert_eq!(cookie.open("id.!!!not-base64!!!"), None);
    }

    #[test]
    fn set_header_carries_the_protective_attributes() {
        let cookie = SessionCookie::new("a-signing-secret-of-decent-length");
        let header = cookie.set_header("sid");
        assert!(header.starts_with("clubhouse_sid="));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=3600"));
    }

    #[test]
    fn clear_header_expires_immediately() {
        let cookie = SessionCookie::new("a-signing-secret-of-decent-length");
        assert!(cookie.clear_header().contains("Max-Age=0"));
    }
}
