//! Credential Stores

use super::{Role, StoreError, User, UserSummary};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// File name of the account document inside the data directory
const USERS_FILE: &str = "users.json";

/// Storage interface for account records
///
/// Identifiers are unique and matched case-sensitively. Lookups return at
/// most one record; a data file holding duplicates is rejected at open time.
pub trait CredentialStore: Send + Sync {
    /// Insert a new account, rejecting duplicate identifiers
    fn create(&self, user: User) -> Result<(), StoreError>;

    /// Look up a single account by its exact identifier
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError>;

    /// Change the role on an existing account
    fn set_role(&self, identifier: &str, role: Role) -> Result<(), StoreError>;

    /// List every account without credential material, ordered by identifier
    fn list_all(&self) -> Result<Vec<UserSummary>, StoreError>;
}

/// In-memory credential store
pub struct MemoryCredentialStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn create(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.identifier) {
            return Err(StoreError::Conflict(user.identifier));
        }
        debug!("created account '{}'", user.identifier);
        users.insert(user.identifier.clone(), user);
        Ok(())
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(identifier).cloned())
    }

    fn set_role(&self, identifier: &str, role: Role) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(identifier) {
            Some(user) => {
                user.role = role;
                Ok(())
            }
            None => Err(StoreError::NotFound(identifier.to_string())),
        }
    }

    fn list_all(&self) -> Result<Vec<UserSummary>, StoreError> {
        let users = self.users.lock().unwrap();
        let mut summaries: Vec<UserSummary> = users.values().map(UserSummary::from).collect();
        summaries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(summaries)
    }
}

/// Credential store backed by a JSON document file
///
/// The whole document is held in memory and rewritten on every mutation,
/// so a single request is the unit of consistency.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    users: Mutex<HashMap<String, User>>,
}

impl FileCredentialStore {
    /// Open the account document inside `data_dir`, creating the directory
    /// and starting empty when no document exists yet
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(USERS_FILE);

        let users = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let records: Vec<User> = serde_json::from_str(&content)?;
            let mut map = HashMap::with_capacity(records.len());
            for user in records {
                if map.insert(user.identifier.clone(), user).is_some() {
                    return Err(StoreError::Corrupt(format!(
                        "duplicate identifier in {}",
                        path.display()
                    )));
                }
            }
            info!("loaded {} account(s) from {}", map.len(), path.display());
            map
        } else {
            debug!("no account document at {}, starting empty", path.display());
            HashMap::new()
        };

        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }

    fn persist(&self, users: &HashMap<String, User>) -> Result<(), StoreError> {
        let mut records: Vec<&User> = users.values().collect();
        records.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        let content = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn create(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.identifier) {
            return Err(StoreError::Conflict(user.identifier));
        }
        users.insert(user.identifier.clone(), user.clone());
        self.persist(&users)?;
        debug!("created account '{}'", user.identifier);
        Ok(())
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(identifier).cloned())
    }

    fn set_role(&self, identifier: &str, role: Role) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(identifier)
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))?;
        if user.role == role {
            return Ok(());
        }
        user.role = role;
        self.persist(&users)
    }

    fn list_all(&self) -> Result<Vec<UserSummary>, StoreError> {
        let users = self.users.lock().unwrap();
        let mut summaries: Vec<UserSummary> = users.values().map(UserSummary::from).collect();
        summaries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(summaries)
    }
}
