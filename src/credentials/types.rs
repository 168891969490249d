//! Account Types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest identifier the site accepts
pub const MAX_IDENTIFIER_LEN: usize = 20;

/// Whether a string is acceptable as an account identifier
///
/// Non-empty, at most [`MAX_IDENTIFIER_LEN`] characters, alphanumeric plus
/// `_` and `-`. Everything else, operator syntax included, is rejected
/// before a store ever sees it.
pub fn valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier.len() <= MAX_IDENTIFIER_LEN
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Privilege level attached to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// A stored account record
///
/// The identifier is the primary key and is matched case-sensitively.
/// Only the argon2 digest of the password is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub identifier: String,
    pub password_digest: String,
    pub role: Role,
}

impl User {
    /// Create a fresh account with the default role
    pub fn new(identifier: String, password_digest: String) -> Self {
        Self {
            identifier,
            password_digest,
            role: Role::User,
        }
    }
}

/// Listing row for the admin overview, with credential material stripped
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub identifier: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            identifier: user.identifier.clone(),
            role: user.role,
        }
    }
}

/// Errors surfaced by credential stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("identifier already in use: {0}")]
    Conflict(String),

    #[error("no account with identifier: {0}")]
    NotFound(String),

    #[error("credential data corrupt: {0}")]
    Corrupt(String),

    #[error("credential store io: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_identifiers_are_accepted() {
        assert!(valid_identifier("alice"));
        assert!(valid_identifier("Bob2"));
        assert!(valid_identifier("under_score-dash"));
    }

    #[test]
    fn empty_and_oversized_identifiers_are_rejected() {
        assert!(!valid_identifier(""));
        assert!(!valid_identifier(&"x".repeat(MAX_IDENTIFIER_LEN + 1)));
        assert!(valid_identifier(&"x".repeat(MAX_IDENTIFIER_LEN)));
    }

    #[test]
    fn operator_syntax_is_rejected() {
        assert!(!valid_identifier("user[$ne]"));
        assert!(!valid_identifier("$where"));
        assert!(!valid_identifier("a b"));
        assert!(!valid_identifier("semi;colon"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn role_displays_lowercase() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn new_accounts_start_as_plain_users() {
        let user = User::new("alice".to_string(), "$argon2id$...".to_string());
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn summary_drops_the_digest() {
        let user = User::new("alice".to_string(), "$argon2id$...".to_string());
        let summary = UserSummary::from(&user);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("alice"));
    }
}
