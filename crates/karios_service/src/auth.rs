//! Registration and login against the user store.
//!
//! Passwords are stored and compared in plaintext. This keeps existing
//! `users.json` files readable but is not safe for real credentials.

use crate::error::{Error, Result};
use crate::store::JsonStore;
use metrics::counter;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug)]
pub struct AuthService {
    users: JsonStore,
}

impl AuthService {
    pub fn new(users: JsonStore) -> Self {
        Self { users }
    }

    /// Open the user file, creating an empty one on first run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(JsonStore::open(path, &[])?))
    }

    /// Create an account. Fails with `DuplicateUser` if the name is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::MissingField);
        }

        if !self.users.insert_new(username, password).await? {
            warn!("Registration rejected, '{}' already exists", username);
            return Err(Error::DuplicateUser(username.to_string()));
        }

        counter!("karios_registrations_total").increment(1);
        info!("Registered user '{}'", username);
        Ok(())
    }

    /// Check credentials. Succeeds only on an exact password match.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        match self.users.get(username) {
            Some(stored) if stored == password => {
                counter!("karios_logins_total", "outcome" => "success").increment(1);
                info!("User '{}' logged in", username);
                Ok(())
            }
            _ => {
                counter!("karios_logins_total", "outcome" => "rejected").increment(1);
                warn!("Rejected login for '{}'", username);
                Err(Error::InvalidCredentials)
            }
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
