use crate::error::{LottoError, Result};
use crate::resolver::RoundRange;
use crate::types::Round;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Draws are held in Korea Standard Time (UTC+9).
const KST_OFFSET_SECS: i32 = 9 * 60 * 60;

/// Date of round 1. Every later round is drawn exactly one week after the previous one.
pub fn first_draw_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2002, 12, 7).unwrap_or_default()
}

/// Scheduled date of `round`.
pub fn draw_date(round: Round) -> Option<NaiveDate> {
    let weeks = u64::from(round.checked_sub(1)?);
    first_draw_date().checked_add_days(chrono::Days::new(weeks * 7))
}

/// Calendar date in Korea at instant `now`.
pub fn today_kst(now: DateTime<Utc>) -> NaiveDate {
    match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => now.with_timezone(&kst).date_naive(),
        None => now.date_naive(),
    }
}

/// Newest round scheduled on or before `today`. Round `n` is only published once
/// it has been drawn, so on a draw day the estimate may still be "not ready".
pub fn estimate_latest_round(today: NaiveDate) -> Round {
    let days = (today - first_draw_date()).num_days();
    if days < 0 {
        return 1;
    }
    (days / 7 + 1) as Round
}

/// The `count` newest rounds as of `today`.
pub fn latest_range(today: NaiveDate, count: u32, max_span: u32) -> Result<RoundRange> {
    if count == 0 {
        return Err(LottoError::InvalidRange);
    }
    let latest = i64::from(estimate_latest_round(today));
    let from = (latest - i64::from(count) + 1).max(1);
    RoundRange::with_max_span(from, latest, max_span)
}
