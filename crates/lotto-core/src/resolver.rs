use crate::cache::DrawCache;
use crate::error::{LottoError, Result};
use crate::origin::DrawOrigin;
use crate::types::{draw_key, Draw, Round};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Widest range (`to - from`) one request may ask for.
pub const MAX_RANGE_SPAN: u32 = 100;

/// Inclusive, validated round range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundRange {
    from: Round,
    to: Round,
}

impl RoundRange {
    /// Validate `from..=to` against the default span limit.
    pub fn new(from: i64, to: i64) -> Result<Self> {
        Self::with_max_span(from, to, MAX_RANGE_SPAN)
    }

    pub fn with_max_span(from: i64, to: i64, max_span: u32) -> Result<Self> {
        if from > to || to.saturating_sub(from) > i64::from(max_span) {
            return Err(LottoError::RangeTooWide { max_span });
        }
        let from = Round::try_from(from).map_err(|_| LottoError::InvalidRange)?;
        let to = Round::try_from(to).map_err(|_| LottoError::InvalidRange)?;
        if from == 0 {
            return Err(LottoError::InvalidRange);
        }
        Ok(Self { from, to })
    }

    /// Validate a range given as raw query parameters.
    pub fn parse(from: Option<&str>, to: Option<&str>, max_span: u32) -> Result<Self> {
        let from = parse_int(from).ok_or(LottoError::InvalidRange)?;
        let to = parse_int(to).ok_or(LottoError::InvalidRange)?;
        Self::with_max_span(from, to, max_span)
    }

    pub fn from(&self) -> Round {
        self.from
    }

    pub fn to(&self) -> Round {
        self.to
    }

    /// Number of rounds covered, both ends included. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        (self.to - self.from) as usize + 1
    }

    pub fn rounds(&self) -> impl Iterator<Item = Round> {
        self.from..=self.to
    }
}

/// Parse a query value as an integer. Accepts surrounding whitespace and an
/// integral float such as `"1150.0"`.
pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Some(f as i64),
        _ => None,
    }
}

/// Advisory HTTP caching hint attached to resolved draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    pub s_maxage: Duration,
    pub stale_while_revalidate: Duration,
}

impl Default for CacheDirective {
    fn default() -> Self {
        Self {
            s_maxage: Duration::from_secs(86_400),
            stale_while_revalidate: Duration::from_secs(3_600),
        }
    }
}

impl CacheDirective {
    /// Render as a `Cache-Control` header value.
    pub fn header_value(&self) -> String {
        format!(
            "s-maxage={}, stale-while-revalidate={}",
            self.s_maxage.as_secs(),
            self.stale_while_revalidate.as_secs()
        )
    }
}

/// Draws found for a range, ascending by round. Unavailable rounds are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub range: RoundRange,
    pub draws: Vec<Draw>,
    pub cache: CacheDirective,
}

impl ResolvedRange {
    /// Same draws, newest first. The analysis helpers expect this order.
    pub fn newest_first(&self) -> Vec<Draw> {
        self.draws.iter().rev().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Widest range accepted.
    pub max_span: u32,
    /// Rounds looked up at once. 1 keeps lookups strictly one after another.
    pub concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_span: MAX_RANGE_SPAN,
            concurrency: 1,
        }
    }
}

/// Resolves rounds cache-first, falling back to the origin.
pub struct DrawResolver<O: DrawOrigin> {
    origin: O,
    cache: Arc<DrawCache>,
    config: ResolverConfig,
}

impl<O: DrawOrigin> DrawResolver<O> {
    pub fn new(origin: O, cache: Arc<DrawCache>) -> Self {
        Self::with_config(origin, cache, ResolverConfig::default())
    }

    pub fn with_config(origin: O, cache: Arc<DrawCache>, config: ResolverConfig) -> Self {
        Self {
            origin,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<DrawCache> {
        &self.cache
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Validate `from..=to` with this resolver's span limit.
    pub fn range(&self, from: i64, to: i64) -> Result<RoundRange> {
        RoundRange::with_max_span(from, to, self.config.max_span)
    }

    /// Validate and resolve `from..=to`.
    pub async fn resolve_range(&self, from: i64, to: i64) -> Result<ResolvedRange> {
        let range = self.range(from, to)?;
        Ok(self.resolve(range).await)
    }

    /// Resolve an already validated range. Never fails: unavailable rounds are
    /// left out of the result.
    pub async fn resolve(&self, range: RoundRange) -> ResolvedRange {
        let draws: Vec<Draw> = stream::iter(range.rounds())
            .map(|round| self.resolve_round(round))
            .buffered(self.config.concurrency.max(1))
            .filter_map(|draw| async move { draw })
            .collect()
            .await;

        log::debug!(
            "Resolved {}/{} rounds in {}..={}",
            draws.len(),
            range.len(),
            range.from(),
            range.to()
        );

        ResolvedRange {
            range,
            draws,
            cache: CacheDirective::default(),
        }
    }

    /// Cache-then-origin lookup of one round. Origin hits are cached.
    pub async fn resolve_round(&self, round: Round) -> Option<Draw> {
        let key = draw_key(round);

        if let Some(draw) = self.cache.get(&key) {
            return Some(draw);
        }

        let draw = self.origin.fetch_draw(round).await?;
        self.cache.set(key, draw.clone());
        Some(draw)
    }
}
