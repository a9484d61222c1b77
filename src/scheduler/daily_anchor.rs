//! Computes the delay until the next local midnight in the reference
//! timezone, correct across DST transitions.

use chrono::{
    DateTime, Duration as ChronoDuration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::time::Duration;

/// Maps a naive local time to a concrete instant in the given timezone.
///
/// Ambiguous times (clocks rolled back) resolve to the earlier instant.
/// Nonexistent times (clocks sprung forward) resolve to the first valid
/// instant at or after the requested one, probed in 30 minute steps.
pub fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = local;
            for _ in 0..8 {
                probe += ChronoDuration::minutes(30);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) => return dt,
                    LocalResult::Ambiguous(earliest, _) => return earliest,
                    LocalResult::None => continue,
                }
            }
            // DST gaps are at most a few hours; this is unreachable for real
            // timezone data.
            tz.from_utc_datetime(&local)
        }
    }
}

/// The instant of the next local midnight strictly after `now`.
pub fn next_midnight_instant(tz: Tz, now: DateTime<Utc>) -> DateTime<Tz> {
    let local_now = now.with_timezone(&tz);
    let next_date = local_now
        .date_naive()
        .succ_opt()
        .unwrap_or_else(|| local_now.date_naive());
    resolve_local(tz, next_date.and_time(NaiveTime::MIN))
}

/// Delay from `now` until the next local midnight in `tz`.
pub fn delay_until_next_midnight(tz: Tz, now: DateTime<Utc>) -> Duration {
    let target = next_midnight_instant(tz, now).with_timezone(&Utc);
    (target - now).to_std().unwrap_or(Duration::ZERO)
}
