//! Server-side login sessions.
//!
//! The client only holds an opaque random token in the [`SESSION_COOKIE`]
//! cookie; the username lives in the session table.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "karios_session";

/// A logged-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: String,
    pub created_at: DateTime<Utc>,
}

/// Session table keyed by token. No expiry.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: DashMap<Uuid, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user` and return its token.
    pub fn start(&self, user: &str) -> String {
        let token = Uuid::new_v4();
        self.sessions.insert(
            token,
            Session {
                user: user.to_string(),
                created_at: Utc::now(),
            },
        );
        info!("Started session for '{}'", user);
        token.to_string()
    }

    /// Look up the session behind `token`. Malformed tokens yield `None`.
    pub fn get(&self, token: &str) -> Option<Session> {
        let token = Uuid::parse_str(token).ok()?;
        self.sessions.get(&token).map(|s| s.value().clone())
    }

    /// Username of the session behind `token`.
    pub fn user(&self, token: &str) -> Option<String> {
        self.get(token).map(|s| s.user)
    }

    /// Destroy the session behind `token`. Returns the removed session.
    pub fn end(&self, token: &str) -> Option<Session> {
        let token = Uuid::parse_str(token).ok()?;
        let (_, session) = self.sessions.remove(&token)?;
        info!(
            "Ended session for '{}' (opened {})",
            session.user, session.created_at
        );
        Some(session)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
