//! Form Types
//!
//! Raw submissions as the browser sends them, plus the checks that turn
//! them into trusted values. Nothing past this boundary sees unvalidated
//! input.

use crate::credentials::{valid_identifier, MAX_IDENTIFIER_LEN};
use crate::error::AppError;
use serde::Deserialize;

/// Longest password accepted at the boundary
pub const MAX_PASSWORD_LEN: usize = 72;

/// Checked name/password pair, safe to hand to the stores
#[derive(Debug, Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

/// Raw signup submission
#[derive(Deserialize)]
pub struct SignupForm {
    pub name: Option<String>,
    pub password: Option<String>,
}

impl SignupForm {
    /// Check field by field, reporting the first problem with a link back
    /// to the signup form
    pub fn validate(self) -> Result<Credentials, AppError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(AppError::missing_field("Name", "/signup"));
        }
        if !valid_identifier(&name) {
            return Err(AppError::Validation {
                message: format!(
                    "Name must be 1-{} letters, digits, '_' or '-'.",
                    MAX_IDENTIFIER_LEN
                ),
                retry_href: "/signup",
            });
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            return Err(AppError::missing_field("Password", "/signup"));
        }
        if password.len() > MAX_PASSWORD_LEN {
            return Err(AppError::Validation {
                message: format!("Password must be at most {} characters.", MAX_PASSWORD_LEN),
                retry_href: "/signup",
            });
        }

        Ok(Credentials {
            identifier: name,
            password,
        })
    }
}

/// Raw login submission
#[derive(Deserialize)]
pub struct LoginForm {
    pub name: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    /// Shape-check without revealing which part failed. Any problem is
    /// just a failed login.
    pub fn normalized(self) -> Option<Credentials> {
        let name = self.name?;
        let password = self.password?;
        if !valid_identifier(&name) || password.is_empty() || password.len() > MAX_PASSWORD_LEN {
            return None;
        }
        Some(Credentials {
            identifier: name,
            password,
        })
    }
}

/// Raw contact submission
#[derive(Deserialize)]
pub struct EmailForm {
    pub email: Option<String>,
}

/// Query string of the contact page
#[derive(Deserialize)]
pub struct ContactQuery {
    pub missing: Option<String>,
}
