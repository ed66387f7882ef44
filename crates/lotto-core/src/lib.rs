pub mod types;
pub mod error;
pub mod cache;
pub mod origin;
pub mod resolver;
pub mod analysis;
pub mod schedule;

pub use error::{LottoError, Result};
pub use types::*;
pub use cache::{CacheEntry, CacheStats, Clock, DrawCache, ManualClock, SystemClock, TtlCache};
pub use origin::{DhLotteryClient, DrawOrigin, OriginConfig, OriginPayload, DEFAULT_ORIGIN_URL};
pub use resolver::{
    CacheDirective, DrawResolver, ResolvedRange, ResolverConfig, RoundRange, MAX_RANGE_SPAN,
};
pub use analysis::{
    find_consecutive_missing, find_missing, missing_streaks, search_number, MissingReport,
    MissingStreak, NumberHit, STREAK_THRESHOLD,
};
pub use schedule::{draw_date, estimate_latest_round, latest_range, today_kst};
