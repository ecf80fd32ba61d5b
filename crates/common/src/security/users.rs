use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::User;

#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error("user already exists: {0}")]
    Duplicate(String),
    #[error("password digest for {0} is not a hex encoded sha256 digest")]
    InvalidDigest(String),
}

/// Hex encoded SHA-256 digest of a password.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// A stored user: name, password digest and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_sha256: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: &str, groups: Vec<String>) -> Self {
        Self {
            username: username.into(),
            password_sha256: password_digest(password),
            groups,
        }
    }

    pub fn user(&self) -> User {
        User::new(self.username.clone(), self.groups.clone())
    }
}

/// Known users of a repository.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: UserRecord) -> Result<(), UserDirectoryError> {
        let digest_ok = record.password_sha256.len() == 64
            && hex::decode(&record.password_sha256).is_ok();
        if !digest_ok {
            return Err(UserDirectoryError::InvalidDigest(record.username));
        }
        if self.users.contains_key(&record.username) {
            return Err(UserDirectoryError::Duplicate(record.username));
        }
        self.users.insert(record.username.clone(), record);
        Ok(())
    }

    pub fn from_records(
        records: impl IntoIterator<Item = UserRecord>,
    ) -> Result<Self, UserDirectoryError> {
        let mut directory = Self::new();
        for record in records {
            directory.insert(record)?;
        }
        Ok(directory)
    }

    /// Check credentials, returning the user on success.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        let record = self.users.get(username)?;
        let digest = password_digest(password);
        if digest.eq_ignore_ascii_case(&record.password_sha256) {
            Some(record.user())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
