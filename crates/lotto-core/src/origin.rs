//! Client for the official results endpoint.
//!
//! The origin answers `GET <endpoint>?method=getLottoNumber&drwNo=<round>` with a
//! flat JSON object. A round that has not been drawn yet comes back with
//! `"returnValue": "fail"` and no number fields, which is an ordinary outcome.

use crate::error::{LottoError, Result};
use crate::types::{Draw, Round, NUMBERS_PER_DRAW};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Public results endpoint of the Korean national lottery operator.
pub const DEFAULT_ORIGIN_URL: &str = "https://www.dhlottery.co.kr/common.do";

/// Something that can supply a single round's draw.
///
/// `None` means "not currently available": the round may not be drawn yet,
/// or the origin could not be reached or returned something unusable.
#[async_trait]
pub trait DrawOrigin: Send + Sync {
    async fn fetch_draw(&self, round: Round) -> Option<Draw>;
}

#[async_trait]
impl<T: DrawOrigin + ?Sized> DrawOrigin for Arc<T> {
    async fn fetch_draw(&self, round: Round) -> Option<Draw> {
        (**self).fetch_draw(round).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OriginConfig {
    /// Results endpoint, without query string.
    pub endpoint: String,
    /// Sent as `User-Agent` when set.
    pub user_agent: Option<String>,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ORIGIN_URL.to_string(),
            user_agent: None,
        }
    }
}

impl OriginConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

/// Raw response body from the origin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginPayload {
    pub return_value: Option<String>,
    pub drw_no: Option<Round>,
    pub drw_no_date: Option<String>,
    pub drwt_no1: Option<u8>,
    pub drwt_no2: Option<u8>,
    pub drwt_no3: Option<u8>,
    pub drwt_no4: Option<u8>,
    pub drwt_no5: Option<u8>,
    pub drwt_no6: Option<u8>,
    pub bnus_no: Option<u8>,
}

impl OriginPayload {
    pub fn is_success(&self) -> bool {
        self.return_value.as_deref() == Some("success")
    }

    /// Normalize a successful payload into a [`Draw`].
    pub fn into_draw(self) -> Result<Draw> {
        let round = required(self.drw_no, "drwNo")?;
        let date = parse_draw_date(&required(self.drw_no_date, "drwNoDate")?)?;

        let numbers: [u8; NUMBERS_PER_DRAW] = [
            required(self.drwt_no1, "drwtNo1")?,
            required(self.drwt_no2, "drwtNo2")?,
            required(self.drwt_no3, "drwtNo3")?,
            required(self.drwt_no4, "drwtNo4")?,
            required(self.drwt_no5, "drwtNo5")?,
            required(self.drwt_no6, "drwtNo6")?,
        ];
        let bonus = required(self.bnus_no, "bnusNo")?;

        Draw::new(round, date, numbers, bonus)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| LottoError::InvalidDraw {
        reason: format!("missing field {}", field),
    })
}

/// Reduce the origin's date to a plain calendar date. Accepts `2024-12-21`,
/// `2024-12-21T00:00:00Z` and `2024-12-21 00:00:00`.
pub fn parse_draw_date(raw: &str) -> Result<NaiveDate> {
    let day = raw
        .trim()
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or_default();

    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| LottoError::InvalidDraw {
        reason: format!("bad draw date {:?}: {}", raw, e),
    })
}

/// HTTP client for the official results endpoint.
#[derive(Debug, Clone)]
pub struct DhLotteryClient {
    http: reqwest::Client,
    config: OriginConfig,
}

impl DhLotteryClient {
    pub fn new(config: OriginConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    /// Reuse an existing `reqwest::Client` (shares its connection pool).
    pub fn with_client(http: reqwest::Client, config: OriginConfig) -> Self {
        Self { http, config }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Fetch a round keeping the failure reason. `Ok(None)` is "not drawn yet".
    pub async fn try_fetch(&self, round: Round) -> Result<Option<Draw>> {
        let drw_no = round.to_string();
        let payload: OriginPayload = self
            .http
            .get(&self.config.endpoint)
            .query(&[("method", "getLottoNumber"), ("drwNo", drw_no.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .json()
            .await?;

        if !payload.is_success() {
            return Ok(None);
        }

        payload.into_draw().map(Some)
    }
}

#[async_trait]
impl DrawOrigin for DhLotteryClient {
    async fn fetch_draw(&self, round: Round) -> Option<Draw> {
        if round == 0 {
            return None;
        }

        match self.try_fetch(round).await {
            Ok(Some(draw)) => Some(draw),
            Ok(None) => {
                log::debug!("Round {} not ready at origin", round);
                None
            }
            Err(e) => {
                log::warn!("Failed to fetch round {}: {}", round, e);
                None
            }
        }
    }
}
