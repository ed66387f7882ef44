//! Rust client for the lotto draw service.
//!
//! Thin wrapper over the server's JSON API with typed results.
//!
//! # Example
//! ```rust,no_run
//! use lotto_client::LottoClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = LottoClient::new("http://localhost:9091");
//!
//!     if let Some(draw) = client.draw(1150).await? {
//!         println!("Round {}: {:?} + {}", draw.round, draw.numbers, draw.bonus);
//!     }
//!
//!     let recent = client.bulk(1140, 1150).await?;
//!     println!("{} draws", recent.len());
//!     Ok(())
//! }
//! ```
use anyhow::{anyhow, bail};
use lotto_core::{Draw, MissingReport, NumberHit, Round};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Re-export the core model for callers that only depend on the client.
pub use lotto_core as core;

/// A client bound to one lotto server.
#[derive(Debug, Clone)]
pub struct LottoClient {
    http: reqwest::Client,
    base: String,
}

impl LottoClient {
    /// `base` is the server root, e.g. `"http://localhost:9091"`.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(http: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { http, base }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Get one round. Returns `None` when the server reports it as not ready.
    pub async fn draw(&self, round: Round) -> anyhow::Result<Option<Draw>> {
        let resp = self
            .http
            .get(format!("{}/lotto", self.base))
            .query(&[("round", round)])
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(resp).await.map(Some)
    }

    /// Draws for `from..=to`, ascending. Rounds the server could not supply are omitted.
    pub async fn bulk(&self, from: Round, to: Round) -> anyhow::Result<Vec<Draw>> {
        self.get_json("/lotto/bulk", &[("from", from.to_string()), ("to", to.to_string())])
            .await
    }

    /// The `count` most recent rounds, ascending.
    pub async fn latest(&self, count: u32) -> anyhow::Result<Vec<Draw>> {
        self.get_json("/lotto/latest", &[("count", count.to_string())])
            .await
    }

    /// Missing-number report over `from..=to`.
    pub async fn missing(
        &self,
        from: Round,
        to: Round,
        weeks: usize,
    ) -> anyhow::Result<MissingReport> {
        self.get_json(
            "/lotto/missing",
            &[
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("weeks", weeks.to_string()),
            ],
        )
        .await
    }

    /// Draws in `from..=to` containing `number`, newest first.
    pub async fn search(&self, number: u8, from: Round, to: Round) -> anyhow::Result<Vec<NumberHit>> {
        self.get_json(
            "/lotto/search",
            &[
                ("number", number.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )
        .await
    }

    /// Raw health document.
    pub async fn health(&self) -> anyhow::Result<serde_json::Value> {
        self.get_json("/health", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let resp = self
            .http
            .get(format!("{}{}", self.base, path))
            .query(query)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        decode(resp).await
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "HTTP request to {} failed: {}. Is `lotto serve` running?",
            self.base,
            e
        )
    }
}

/// Decode a success body, or turn the server's `{"error": ..}` body into an error.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    let msg = body["error"].as_str().unwrap_or("unknown error");
    bail!("{} ({})", msg, status)
}
