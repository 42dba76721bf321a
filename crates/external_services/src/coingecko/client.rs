//! CoinGecko REST API client.

use crate::coingecko::types::{CoinDetail, CoinInfo, MarketEntry, MarketSummary};
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Base URL for the public CoinGecko v3 API.
const COINGECKO_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Common ticker symbols mapped to CoinGecko coin ids.
pub const COIN_ALIASES: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("xrp", "ripple"),
    ("ada", "cardano"),
    ("bnb", "binancecoin"),
    ("sol", "solana"),
    ("doge", "dogecoin"),
    ("trx", "tron"),
    ("matic", "polygon"),
    ("avax", "avalanche-2"),
    ("dot", "polkadot"),
    ("shib", "shiba-inu"),
    ("ltc", "litecoin"),
    ("link", "chainlink"),
    ("ton", "the-open-network"),
    ("pepe", "pepe"),
    ("op", "optimism"),
    ("sui", "sui"),
    ("apt", "aptos"),
    ("arb", "arbitrum"),
];

/// Normalize user input into a CoinGecko id: lowercase, spaces become hyphens.
pub fn normalize_coin_id(input: &str) -> String {
    input.to_lowercase().replace(' ', "-")
}

/// Look up the CoinGecko id for a ticker symbol.
pub fn resolve_alias(symbol: &str) -> Option<&'static str> {
    COIN_ALIASES
        .iter()
        .find(|(ticker, _)| *ticker == symbol)
        .map(|(_, id)| *id)
}

/// CoinGecko REST API client.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: COINGECKO_API_BASE_URL.to_string(),
        }
    }

    /// Create a new CoinGecko client with custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a client with custom base URL and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/{segments...}` with each segment percent-encoded on its own,
    /// so `/`, `?` and `#` inside a segment cannot change the request path.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            Error::UpstreamUnavailable(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::UpstreamUnavailable(format!("base URL '{}' cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch price info for a coin.
    ///
    /// # Arguments
    /// * `coin` - Coin id or display name (e.g., "bitcoin", "Shiba Inu")
    ///
    /// # Errors
    /// `CoinNotFound` when the upstream reports an `error` field,
    /// `UpstreamUnavailable` on any transport or parse failure.
    pub async fn fetch(&self, coin: &str) -> Result<CoinInfo> {
        let coin_id = normalize_coin_id(coin);
        self.fetch_coin(&coin_id)
            .await
            .map_err(Error::into_upstream)
    }

    async fn fetch_coin(&self, coin_id: &str) -> Result<CoinInfo> {
        if matches!(coin_id, "" | "." | "..") {
            return Err(Error::CoinNotFound(coin_id.to_string()));
        }

        let url = self.endpoint(&["coins", coin_id])?;
        debug!("Fetching coin from: {}", url);

        // CoinGecko answers unknown ids with a 404 carrying {"error": ...},
        // so the body is inspected before the status.
        let body = self.http.get(url).send().await?.text().await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;

        if value.get("error").is_some() {
            return Err(Error::CoinNotFound(coin_id.to_string()));
        }

        let detail: CoinDetail = serde_json::from_value(value)?;
        let info = CoinInfo::from_detail(&detail).ok_or_else(|| {
            Error::UpstreamUnavailable(format!(
                "response for '{}' has no market_data.current_price.usd",
                coin_id
            ))
        })?;

        info!("Fetched coin '{}' at ${}", coin_id, info.price);
        Ok(info)
    }

    /// Fetch a coin, trying its ticker alias first.
    ///
    /// When `coin` is a known ticker (e.g. "btc"), the mapped id is tried
    /// first and the raw id only if the mapped one is not found.
    pub async fn resolve(&self, coin: &str) -> Result<CoinInfo> {
        let coin_id = normalize_coin_id(coin);

        match resolve_alias(&coin_id) {
            Some(alias) if alias != coin_id => match self.fetch(alias).await {
                Err(Error::CoinNotFound(_)) => {
                    debug!("Alias '{}' for '{}' not found, trying raw id", alias, coin_id);
                    self.fetch(&coin_id).await
                }
                other => other,
            },
            _ => self.fetch(&coin_id).await,
        }
    }

    /// Fetch the top coins by market cap, quoted in USD.
    pub async fn top_markets(&self, limit: usize) -> Result<Vec<MarketSummary>> {
        self.fetch_markets(limit)
            .await
            .map_err(Error::into_upstream)
    }

    async fn fetch_markets(&self, limit: usize) -> Result<Vec<MarketSummary>> {
        let mut url = self.endpoint(&["coins", "markets"])?;
        url.query_pairs_mut()
            .append_pair("vs_currency", "usd")
            .append_pair("order", "market_cap_desc")
            .append_pair("per_page", &limit.to_string())
            .append_pair("page", "1");
        debug!("Fetching markets from: {}", url);

        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "API returned status {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let entries: Vec<MarketEntry> = response.json().await?;
        Ok(entries.into_iter().map(MarketSummary::from).collect())
    }
}
