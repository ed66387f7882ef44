use super::{AppError, AppResult, AppState};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use lotto_core::resolver::parse_int;
use lotto_core::*;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Rounds returned by `/lotto/latest` when `count` is omitted.
const DEFAULT_LATEST_COUNT: u32 = 5;

/// Window used by `/lotto/missing` when `weeks` is omitted.
const DEFAULT_MISSING_WEEKS: usize = 5;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lotto", get(get_draw))
        .route("/lotto/bulk", get(bulk))
        .route("/lotto/latest", get(latest))
        .route("/lotto/missing", get(missing))
        .route("/lotto/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON body with the advisory `Cache-Control` header.
fn cached<T: Serialize>(directive: CacheDirective, body: T) -> Response {
    ([(header::CACHE_CONTROL, directive.header_value())], Json(body)).into_response()
}

fn parse_range(state: &AppState, from: Option<&str>, to: Option<&str>) -> Result<RoundRange> {
    RoundRange::parse(from, to, state.resolver.config().max_span)
}

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    version: String,
    uptime_seconds: u64,
    estimated_latest_round: Round,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        estimated_latest_round: estimate_latest_round(today_kst(state.clock.now())),
        cache: state.resolver.cache().stats(),
    })
}

#[derive(Deserialize)]
struct RoundQuery {
    round: Option<String>,
}

async fn get_draw(
    State(state): State<AppState>,
    Query(query): Query<RoundQuery>,
) -> AppResult<Response> {
    let round = parse_int(query.round.as_deref()).ok_or(LottoError::InvalidRound)?;

    // Rounds below 1 are well-formed requests for draws that will never exist.
    let draw = match Round::try_from(round) {
        Ok(round) if round > 0 => state.resolver.resolve_round(round).await,
        _ => None,
    };

    let draw = draw.ok_or(AppError::NotReady)?;
    Ok(cached(CacheDirective::default(), draw))
}

#[derive(Deserialize)]
struct RangeQuery {
    from: Option<String>,
    to: Option<String>,
}

async fn bulk(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Response> {
    let range = parse_range(&state, query.from.as_deref(), query.to.as_deref())?;
    let resolved = state.resolver.resolve(range).await;
    Ok(cached(resolved.cache, resolved.draws))
}

#[derive(Deserialize)]
struct LatestQuery {
    count: Option<String>,
}

async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> AppResult<Response> {
    let count = match query.count.as_deref() {
        None => DEFAULT_LATEST_COUNT,
        Some(raw) => parse_int(Some(raw))
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(LottoError::InvalidRange)?,
    };

    let today = today_kst(state.clock.now());
    let range = latest_range(today, count, state.resolver.config().max_span)?;
    let resolved = state.resolver.resolve(range).await;
    Ok(cached(resolved.cache, resolved.draws))
}

#[derive(Deserialize)]
struct MissingQuery {
    from: Option<String>,
    to: Option<String>,
    weeks: Option<String>,
}

async fn missing(
    State(state): State<AppState>,
    Query(query): Query<MissingQuery>,
) -> AppResult<Response> {
    let range = parse_range(&state, query.from.as_deref(), query.to.as_deref())?;
    let weeks = match query.weeks.as_deref() {
        None => DEFAULT_MISSING_WEEKS,
        Some(raw) => parse_int(Some(raw))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(LottoError::InvalidRange)?,
    };

    let resolved = state.resolver.resolve(range).await;
    let report = MissingReport::new(&resolved.newest_first(), weeks);
    Ok(cached(resolved.cache, report))
}

#[derive(Deserialize)]
struct SearchQuery {
    number: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let number = parse_int(query.number.as_deref())
        .and_then(|n| u8::try_from(n).ok())
        .filter(|n| is_ball(*n))
        .ok_or(LottoError::InvalidNumber)?;
    let range = parse_range(&state, query.from.as_deref(), query.to.as_deref())?;

    let resolved = state.resolver.resolve(range).await;
    let hits = search_number(&resolved.newest_first(), number);
    Ok(cached(resolved.cache, hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct StubOrigin {
        draws: HashMap<Round, Draw>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DrawOrigin for StubOrigin {
        async fn fetch_draw(&self, round: Round) -> Option<Draw> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.draws.get(&round).cloned()
        }
    }

    fn draw(round: Round, numbers: [u8; 6], bonus: u8) -> Draw {
        let date = schedule::draw_date(round).unwrap_or(NaiveDate::MIN);
        Draw::new(round, date, numbers, bonus).unwrap()
    }

    /// Origin with rounds 1140..=1150 except 1146; 1150 is the newest drawn.
    fn stub_origin() -> Arc<StubOrigin> {
        let draws = (1140..=1150)
            .filter(|r| *r != 1146)
            .map(|r| {
                let base = (r % 7) as u8 + 1;
                draw(r, [base, base + 7, base + 14, base + 21, base + 28, base + 35], 45)
            })
            .map(|d| (d.round, d))
            .collect();
        Arc::new(StubOrigin {
            draws,
            calls: AtomicUsize::new(0),
        })
    }

    /// Serve the router on an ephemeral port. Clock is Sunday 2024-12-15 in Seoul.
    async fn spawn(origin: Arc<StubOrigin>) -> (String, AppState) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 12, 15, 3, 0, 0).unwrap(),
        ));
        let dyn_origin: Arc<dyn DrawOrigin> = origin;
        let resolver = Arc::new(DrawResolver::new(dyn_origin, Arc::new(DrawCache::new())));
        let state = AppState::new(resolver, clock);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), state)
    }

    async fn get(url: String) -> (u16, Option<String>, Value) {
        let resp = reqwest::get(url).await.unwrap();
        let status = resp.status().as_u16();
        let cache_control = resp
            .headers()
            .get("cache-control")
            .map(|v| v.to_str().unwrap().to_string());
        let body = resp.json().await.unwrap();
        (status, cache_control, body)
    }

    #[tokio::test]
    async fn test_single_round() {
        let origin = stub_origin();
        let (base, _) = spawn(origin.clone()).await;

        let (status, cc, body) = get(format!("{}/lotto?round=1150", base)).await;
        assert_eq!(status, 200);
        assert_eq!(cc.as_deref(), Some("s-maxage=86400, stale-while-revalidate=3600"));
        assert_eq!(body["round"], 1150);
        assert_eq!(body["date"], "2024-12-14");
        assert_eq!(body["bonus"], 45);

        // Second request is served from the cache.
        get(format!("{}/lotto?round=1150", base)).await;
        assert_eq!(origin.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_round_not_ready() {
        let (base, _) = spawn(stub_origin()).await;

        let (status, cc, body) = get(format!("{}/lotto?round=1151", base)).await;
        assert_eq!(status, 404);
        assert!(cc.is_none());
        assert_eq!(body, json!({"error": "not_ready"}));

        let (status, _, _) = get(format!("{}/lotto?round=0", base)).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_single_round_bad_input() {
        let (base, _) = spawn(stub_origin()).await;

        let (status, _, body) = get(format!("{}/lotto?round=abc", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid round number"}));

        let (status, _, _) = get(format!("{}/lotto", base)).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_bulk_omits_gaps() {
        let (base, _) = spawn(stub_origin()).await;

        let (status, cc, body) = get(format!("{}/lotto/bulk?from=1145&to=1147", base)).await;
        assert_eq!(status, 200);
        assert_eq!(cc.as_deref(), Some("s-maxage=86400, stale-while-revalidate=3600"));
        let rounds: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["round"].as_u64().unwrap())
            .collect();
        assert_eq!(rounds, vec![1145, 1147]);
    }

    #[tokio::test]
    async fn test_bulk_validation_messages() {
        let origin = stub_origin();
        let (base, _) = spawn(origin.clone()).await;

        let (status, _, body) = get(format!("{}/lotto/bulk?from=x&to=5", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid range"}));

        let (status, _, body) = get(format!("{}/lotto/bulk?from=10", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid range"}));

        let (status, _, body) = get(format!("{}/lotto/bulk?from=10&to=5", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid range (max 100 draws)"}));

        let (status, _, body) = get(format!("{}/lotto/bulk?from=1&to=102", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid range (max 100 draws)"}));

        assert_eq!(origin.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_latest() {
        let (base, _) = spawn(stub_origin()).await;

        let (status, _, body) = get(format!("{}/lotto/latest?count=3", base)).await;
        assert_eq!(status, 200);
        let rounds: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["round"].as_u64().unwrap())
            .collect();
        assert_eq!(rounds, vec![1148, 1149, 1150]);

        let (_, _, body) = get(format!("{}/lotto/latest", base)).await;
        // 1146..=1150 with 1146 missing upstream.
        assert_eq!(body.as_array().unwrap().len(), 4);

        let (status, _, _) = get(format!("{}/lotto/latest?count=0", base)).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_missing_report() {
        let (base, _) = spawn(stub_origin()).await;

        let (status, _, body) =
            get(format!("{}/lotto/missing?from=1140&to=1150&weeks=1", base)).await;
        assert_eq!(status, 200);
        assert_eq!(body["weeks"], 1);

        // Round 1150 drew 3, 10, 17, 24, 31, 38.
        let missing: Vec<u64> = body["missing"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n.as_u64().unwrap())
            .collect();
        assert_eq!(missing.len(), 39);
        assert!(!missing.contains(&3));
        assert!(missing.contains(&1));

        // 43, 44 and 45 are never drawn by the stub: 10 draws in range.
        let streaks = body["streaks"].as_array().unwrap();
        assert!(streaks
            .iter()
            .any(|s| s["number"] == 45 && s["streak"] == 10));
    }

    #[tokio::test]
    async fn test_search() {
        let (base, _) = spawn(stub_origin()).await;

        let (status, _, body) =
            get(format!("{}/lotto/search?number=2&from=1140&to=1150", base)).await;
        assert_eq!(status, 200);
        let hits = body.as_array().unwrap();
        // Only rounds with r % 7 == 1 draw a 2.
        let rounds: Vec<u64> = hits
            .iter()
            .map(|h| h["draw"]["round"].as_u64().unwrap())
            .collect();
        assert_eq!(rounds, vec![1149, 1142]);
        assert_eq!(hits[0]["next_draw"]["round"], 1150);

        let (status, _, body) =
            get(format!("{}/lotto/search?number=46&from=1140&to=1150", base)).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": "Invalid number (must be 1-45)"}));
    }

    #[tokio::test]
    async fn test_health_reports_cache() {
        let (base, state) = spawn(stub_origin()).await;
        get(format!("{}/lotto/bulk?from=1149&to=1150", base)).await;

        let (status, _, body) = get(format!("{}/health", base)).await;
        assert_eq!(status, 200);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["estimated_latest_round"], 1150);
        assert_eq!(body["cache"]["entries"], 2);
        assert_eq!(state.resolver.cache().len(), 2);
    }
}
