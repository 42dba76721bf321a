//! HTTP API handlers for the Karios service.

use crate::auth::AuthService;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::glossary::Glossary;
use crate::pages;
use crate::session::{SessionManager, SESSION_COOKIE};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use external_services::coingecko::{CoinGeckoClient, CoinInfo, MarketSummary};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Number of coins returned by `/top_coins`.
const TOP_COINS_LIMIT: usize = 10;

/// Application state.
pub struct AppState {
    pub glossary: Glossary,
    pub auth: AuthService,
    pub sessions: SessionManager,
    pub coingecko: CoinGeckoClient,
}

impl AppState {
    /// Open both stores and build the upstream client.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            glossary: Glossary::open(&config.brain_file)?,
            auth: AuthService::open(&config.user_file)?,
            sessions: SessionManager::new(),
            coingecko: CoinGeckoClient::with_timeout(
                config.coingecko_base_url.clone(),
                config.upstream_timeout,
            )?,
        })
    }
}

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        // Accounts
        .route("/register", get(register_page).post(register_handler))
        .route("/login", get(login_page).post(login_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/logout", get(logout_handler))
        // Glossary
        .route("/term/{word}", get(term_handler))
        .route("/all_terms", get(all_terms_handler))
        .route("/add_term", post(add_term_handler))
        // Price proxy
        .route("/crypto/{coin}", get(crypto_handler))
        .route("/top_coins", get(top_coins_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct AddTermRequest {
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    definition: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct TermResponse {
    term: String,
    definition: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn upstream(err: external_services::Error) -> Self {
        let details = match err {
            external_services::Error::UpstreamUnavailable(details) => details,
            other => other.to_string(),
        };
        Self {
            error: "Failed to fetch coin data".to_string(),
            details: Some(details),
        }
    }
}

// =============================================================================
// Page Handlers
// =============================================================================

async fn index_handler() -> Html<&'static str> {
    Html(pages::index())
}

async fn register_page() -> Html<&'static str> {
    Html(pages::register())
}

async fn login_page() -> Html<&'static str> {
    Html(pages::login())
}

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Account Handlers
// =============================================================================

/// Create an account, then send the user to the login page.
async fn register_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Credentials>,
) -> Response {
    match state.auth.register(&form.username, &form.password).await {
        Ok(()) => Redirect::to("/login").into_response(),
        Err(Error::DuplicateUser(_)) => "❌ User already exists!".into_response(),
        Err(Error::MissingField) => "❌ Username and password are required!".into_response(),
        Err(e) => {
            error!("Failed to register '{}': {:?}", form.username, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Check credentials and start a session, replacing any the browser holds.
async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<Credentials>,
) -> Response {
    if state.auth.login(&form.username, &form.password).is_err() {
        return "❌ Invalid username or password!".into_response();
    }

    if let Some(previous) = jar.get(SESSION_COOKIE) {
        state.sessions.end(previous.value());
    }

    let token = state.sessions.start(&form.username);
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/");

    (jar.add(cookie), Redirect::to("/dashboard")).into_response()
}

/// Greet the logged-in user, or bounce to the login page.
async fn dashboard_handler(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.user(cookie.value()));

    match user {
        Some(user) => Html(pages::dashboard(&user)).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}

/// Drop the session and its cookie.
async fn logout_handler(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.end(cookie.value());
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/")).into_response()
}

// =============================================================================
// Glossary Handlers
// =============================================================================

async fn term_handler(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Json<TermResponse> {
    let definition = state.glossary.lookup(&word);
    Json(TermResponse {
        term: word.to_lowercase(),
        definition,
    })
}

async fn all_terms_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.glossary.list_terms())
}

/// Add a term. A missing field is reported in the body, not the status.
async fn add_term_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddTermRequest>,
) -> Response {
    let term = req.term.unwrap_or_default();
    let definition = req.definition.unwrap_or_default();

    match state.glossary.add(&term, &definition).await {
        Ok(key) => Json(MessageResponse {
            message: format!("✅ Added {} to dictionary!", key),
        })
        .into_response(),
        Err(Error::MissingField) => {
            Json(ErrorResponse::new("Missing term or definition")).into_response()
        }
        Err(e) => {
            error!("Failed to add term '{}': {:?}", term, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Price Proxy Handlers
// =============================================================================

/// Reshaped coin data from CoinGecko.
async fn crypto_handler(
    State(state): State<Arc<AppState>>,
    Path(coin): Path<String>,
) -> std::result::Result<Json<CoinInfo>, Json<ErrorResponse>> {
    match state.coingecko.resolve(&coin).await {
        Ok(info) => {
            counter!("karios_coin_lookups_total", "outcome" => "found").increment(1);
            Ok(Json(info))
        }
        Err(external_services::Error::CoinNotFound(_)) => {
            counter!("karios_coin_lookups_total", "outcome" => "not_found").increment(1);
            Err(Json(ErrorResponse::new("Coin not found")))
        }
        Err(e) => {
            counter!("karios_coin_lookups_total", "outcome" => "upstream_error").increment(1);
            warn!("Failed to fetch coin '{}': {}", coin, e);
            Err(Json(ErrorResponse::upstream(e)))
        }
    }
}

/// Top coins by market cap.
async fn top_coins_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<MarketSummary>>, Json<ErrorResponse>> {
    state
        .coingecko
        .top_markets(TOP_COINS_LIMIT)
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Failed to fetch top coins: {}", e);
            Json(ErrorResponse::upstream(e))
        })
}
