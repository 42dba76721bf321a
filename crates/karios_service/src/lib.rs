//! Karios web service library.
//!
//! User registration/login, a crypto glossary backed by a flat JSON file,
//! and a proxy to the CoinGecko price API.
//!
//! # Architecture
//!
//! - **Stores**: each JSON file is owned by a [`JsonStore`] loaded once at
//!   startup and rewritten wholesale (temp file + rename) on every mutation
//! - **Sessions**: server-side table keyed by an opaque cookie token
//! - **Proxy**: [`external_services::CoinGeckoClient`] reshapes coin data
//!
//! # Example
//!
//! ```ignore
//! use karios_service::{create_router, AppState, ServiceConfig};
//!
//! let config = ServiceConfig::from_env();
//! let state = Arc::new(AppState::from_config(&config)?);
//! let router = create_router(state);
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod glossary;
pub mod pages;
pub mod session;
pub mod store;

pub use api::{create_router, AppState};
pub use auth::AuthService;
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use glossary::{Glossary, NO_DEFINITION, SEED_TERMS};
pub use session::{Session, SessionManager, SESSION_COOKIE};
pub use store::JsonStore;
