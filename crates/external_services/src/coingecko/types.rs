//! CoinGecko data types.

use serde::{Deserialize, Serialize};

/// Coin detail from `GET /coins/{id}`.
///
/// Only the fields the proxy reshapes are modelled; everything else in the
/// (very large) payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

/// `market_data` block of a coin detail.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: Option<CurrentPrice>,
}

/// Current price keyed by quote currency. Only USD is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPrice {
    #[serde(default)]
    pub usd: Option<f64>,
}

impl CoinDetail {
    /// USD price, if the payload carries one.
    pub fn usd_price(&self) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.current_price.as_ref())
            .and_then(|p| p.usd)
    }
}

/// Reshaped coin info returned to callers of the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub rank: Option<u32>,
}

impl CoinInfo {
    /// Build from a coin detail. Returns `None` when the USD price is missing.
    pub fn from_detail(detail: &CoinDetail) -> Option<Self> {
        let price = detail.usd_price()?;
        Some(Self {
            name: detail.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            symbol: detail
                .symbol
                .as_deref()
                .unwrap_or("N/A")
                .to_uppercase(),
            price,
            rank: detail.market_cap_rank,
        })
    }
}

/// Row from `GET /coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Top-coin listing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub rank: Option<u32>,
    pub change_24h: Option<f64>,
}

impl From<MarketEntry> for MarketSummary {
    fn from(entry: MarketEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            symbol: entry.symbol.to_uppercase(),
            price: entry.current_price,
            rank: entry.market_cap_rank,
            change_24h: entry.price_change_percentage_24h,
        }
    }
}
