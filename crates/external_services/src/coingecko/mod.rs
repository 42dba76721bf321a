//! CoinGecko market-data API client.
//!
//! Provides the REST client and the response shapes the web service exposes.

pub mod client;
pub mod types;

pub use client::{normalize_coin_id, resolve_alias, CoinGeckoClient, COIN_ALIASES};
pub use types::{CoinInfo, MarketSummary};
