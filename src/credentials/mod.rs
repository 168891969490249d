//! Account Storage
//!
//! Account records and the document stores that keep them.

pub mod store;
pub mod types;

pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use types::{valid_identifier, Role, StoreError, User, UserSummary, MAX_IDENTIFIER_LEN};
