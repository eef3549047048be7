use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::record::MatchStatus;

pub const DEFAULT_WINDOW_HOURS: i64 = 48;

/// Classifies fixtures as live, upcoming within the look-ahead window, or
/// out of scope. Runs before aggregation: excluded fixtures never reach the
/// bookmaker aggregator.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowFilter {
    window_hours: i64,
}

impl TimeWindowFilter {
    pub fn new(window_hours: i64) -> Self {
        Self {
            window_hours: window_hours.max(1),
        }
    }

    /// `None` means the fixture falls beyond the window and is dropped
    /// entirely. An unparseable commence time keeps the fixture with an
    /// "upcoming, time unknown" status rather than discarding it.
    pub fn classify(&self, kickoff: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<MatchStatus> {
        let Some(kickoff) = kickoff else {
            return Some(MatchStatus::Upcoming { hours: None });
        };

        let hours_until = (kickoff - now).num_seconds() as f64 / 3600.0;
        if hours_until > self.window_hours as f64 {
            return None;
        }
        if hours_until < 0.0 {
            return Some(MatchStatus::Live);
        }
        Some(MatchStatus::Upcoming {
            hours: Some(hours_until.round() as i64),
        })
    }
}

impl Default for TimeWindowFilter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_HOURS)
    }
}

/// Parse a kickoff timestamp. Accepts RFC-3339 with a trailing `Z` as UTC
/// shorthand, then a few naive formats seen in feed exports.
pub fn parse_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .expect("valid")
            .with_timezone(&Utc)
    }

    #[test]
    fn kickoff_in_the_past_is_live() {
        let filter = TimeWindowFilter::default();
        let kick = Some(now() - Duration::hours(1));
        assert_eq!(filter.classify(kick, now()), Some(MatchStatus::Live));
    }

    #[test]
    fn kickoff_within_window_is_upcoming_with_hours() {
        let filter = TimeWindowFilter::default();
        let kick = Some(now() + Duration::hours(47));
        assert_eq!(
            filter.classify(kick, now()),
            Some(MatchStatus::Upcoming { hours: Some(47) })
        );
    }

    #[test]
    fn kickoff_beyond_window_is_excluded() {
        let filter = TimeWindowFilter::default();
        let kick = Some(now() + Duration::hours(49));
        assert_eq!(filter.classify(kick, now()), None);
    }

    #[test]
    fn unparseable_time_falls_back_to_upcoming_unknown() {
        let filter = TimeWindowFilter::default();
        assert_eq!(
            filter.classify(parse_kickoff("whenever"), now()),
            Some(MatchStatus::Upcoming { hours: None })
        );
    }

    #[test]
    fn parses_trailing_z_and_naive_formats() {
        assert!(parse_kickoff("2026-03-01T15:00:00Z").is_some());
        assert!(parse_kickoff("2026-03-01T15:00:00+01:00").is_some());
        assert!(parse_kickoff("2026-03-01 15:00").is_some());
        assert!(parse_kickoff("").is_none());
    }
}
