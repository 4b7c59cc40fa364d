#![forbid(unsafe_code)]

use dl_core::calendar::Day;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(crate) fn now_ms_i64() -> i64 {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    ms.clamp(0, i64::MAX as i128) as i64
}

pub(crate) fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ts_ms) * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// The calendar day tools operate on when the client omits `date`.
///
/// A habit tracker's "today" is the user's wall-clock day, so the local offset is
/// preferred; UTC is the fallback when the platform cannot report it (common in
/// containers without tz data).
pub(crate) fn today_local() -> Day {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let date = now.date();
    Day::try_new(date.year(), u8::from(date.month()), date.day()).unwrap_or(Day::UNIX_EPOCH)
}
