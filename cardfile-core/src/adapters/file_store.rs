//! File-backed credential storage
//!
//! The durable analog of the web client's localStorage: two entries in
//! the Cardfile data directory, `token` (the opaque credential string)
//! and `user.json` (the serialized user record).

use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::CredentialStore;

/// Credential store persisting to files in the data directory
#[derive(Debug)]
pub struct FileCredentialStore {
    token_path: PathBuf,
    user_path: PathBuf,
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            token_path: data_dir.join("token"),
            user_path: data_dir.join("user.json"),
            dir: data_dir.to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::storage(format!("Failed to create data directory: {}", e)))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load_token(&self) -> Result<Option<String>> {
        if !self.token_path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&self.token_path)?;
        let token = token.trim().to_string();
        Ok(if token.is_empty() { None } else { Some(token) })
    }

    fn load_user(&self) -> Result<Option<User>> {
        if !self.user_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.user_path)?;
        let user = serde_json::from_str(&content)?;
        Ok(Some(user))
    }

    fn store_token(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        std::fs::write(&self.token_path, token)?;
        Ok(())
    }

    fn store_user(&self, user: &User) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(user)?;
        std::fs::write(&self.user_path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for path in [&self.token_path, &self.user_path] {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());

        assert!(store.load_token().unwrap().is_none());
        assert!(store.load_user().unwrap().is_none());

        let user = User::new("u1", "a@example.com");
        store.store_token("tok-123").unwrap();
        store.store_user(&user).unwrap();

        assert_eq!(store.load_token().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(store.load_user().unwrap(), Some(user));
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());

        store.store_token("tok").unwrap();
        store.store_user(&User::new("u1", "a@example.com")).unwrap();
        store.clear().unwrap();

        assert!(store.load_token().unwrap().is_none());
        assert!(store.load_user().unwrap().is_none());
        // Clearing an already-empty store is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_user_entry_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path());

        std::fs::write(dir.path().join("user.json"), "not json").unwrap();
        assert!(store.load_user().is_err());
    }
}
