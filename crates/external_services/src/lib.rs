//! External market-data API clients library.
//!
//! This library provides access to third-party market-data APIs:
//! - CoinGecko: coin prices, market-cap rank and top-coin listings
//!
//! # Example
//!
//! ```ignore
//! use external_services::coingecko::CoinGeckoClient;
//!
//! let client = CoinGeckoClient::new();
//! let info = client.resolve("btc").await?;
//! println!("{} is trading at ${}", info.name, info.price);
//! ```

pub mod coingecko;
pub mod error;

pub use coingecko::{normalize_coin_id, resolve_alias, CoinGeckoClient, CoinInfo, MarketSummary};
pub use error::{Error, Result};
