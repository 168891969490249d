//! Session Stores

use super::types::SessionRecord;
use crate::Result;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use anyhow::{anyhow, Context};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// File name of the session document inside the data directory
const SESSIONS_FILE: &str = "sessions.db";

const NONCE_SIZE: usize = 12;

/// Storage interface for session records keyed by session id
pub trait SessionStore: Send + Sync {
    fn put(&self, record: SessionRecord) -> Result<()>;
    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>>;
    fn delete(&self, session_id: &str) -> Result<bool>;
}

/// In-memory session store
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, record: SessionRecord) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(session_id).cloned())
    }

    fn delete(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        Ok(sessions.remove(session_id).is_some())
    }
}

/// Session store persisted as a single AES-256-GCM encrypted document
///
/// On disk the layout is `nonce || ciphertext`. The key is the SHA-256 of
/// the configured encryption secret and a fresh nonce is drawn for every
/// rewrite, so session contents are never readable at rest.
pub struct FileSessionStore {
    path: PathBuf,
    cipher: Aes256Gcm,
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl FileSessionStore {
    /// Open the session document inside `data_dir`, creating the directory
    /// and starting empty when no document exists yet
    pub fn open(data_dir: &Path, encryption_secret: &str) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let key = Sha256::digest(encryption_secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(key.as_slice())
            .expect("sha-256 output is a valid aes-256 key");
        let path = data_dir.join(SESSIONS_FILE);

        let sessions = if path.exists() {
            let raw = fs::read(&path)
                .with_context(|| format!("Failed to read session document {}", path.display()))?;
            let sessions = Self::decrypt(&cipher, &raw)?;
            info!("loaded {} session(s) from {}", sessions.len(), path.display());
            sessions
        } else {
            debug!("no session document at {}, starting empty", path.display());
            HashMap::new()
        };

        Ok(Self {
            path,
            cipher,
            sessions: Mutex::new(sessions),
        })
    }

    fn decrypt(cipher: &Aes256Gcm, raw: &[u8]) -> Result<HashMap<String, SessionRecord>> {
        if raw.len() < NONCE_SIZE {
            return Err(anyhow!("session document is too short to hold a nonce"));
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| anyhow!("cannot decrypt session document (encryption secret changed?)"))?;
        let sessions = serde_json::from_slice(&plaintext)
            .context("session document did not decode after decryption")?;
        Ok(sessions)
    }

    fn persist(&self, sessions: &HashMap<String, SessionRecord>) -> Result<()> {
        let plaintext = serde_json::to_vec(sessions)?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_ref())
            .map_err(|e| anyhow!("session document encryption failed: {}", e))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        fs::write(&self.path, out)
            .with_context(|| format!("Failed to write session document {}", self.path.display()))?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn put(&self, record: SessionRecord) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(record.session_id.clone(), record);
        self.persist(&sessions)
    }

    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(session_id).cloned())
    }

    fn delete(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        let removed = sessions.remove(session_id).is_some();
        if removed {
            self.persist(&sessions)?;
        }
        Ok(removed)
    }
}
