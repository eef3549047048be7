use std::env;

use chrono::{DateTime, Utc};

use crate::aggregate::{self, FixtureMeta};
use crate::http_client::http_client;
use crate::normalize::{self, RawEvent};
use crate::source::{SourceBatch, SourceError};
use crate::time_window::{self, TimeWindowFilter};

const API_BASE_URL: &str = "https://api.the-odds-api.com/v4/sports";

/// Sport keys the live source polls, one request per league.
pub const SPORT_KEYS: &[(&str, &str)] = &[
    ("soccer_epl", "Premier League"),
    ("soccer_spain_la_liga", "La Liga"),
    ("soccer_germany_bundesliga", "Bundesliga"),
    ("soccer_italy_serie_a", "Serie A"),
    ("soccer_france_ligue_one", "Ligue 1"),
    ("soccer_uefa_champs_league", "Champions League"),
    ("soccer_uefa_europa_league", "Europa League"),
];

#[derive(Debug, Clone)]
pub struct OddsApiConfig {
    pub api_key: Option<String>,
    pub regions: String,
    pub window_hours: i64,
    pub base_url: String,
}

impl OddsApiConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("ODDS_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let regions = env::var("ODDS_REGIONS")
            .unwrap_or_else(|_| "eu".to_string())
            .trim()
            .to_ascii_lowercase();
        let window_hours = env::var("ODDS_WINDOW_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(time_window::DEFAULT_WINDOW_HOURS)
            .clamp(1, 168);
        let base_url = env::var("ODDS_API_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| API_BASE_URL.to_string());

        Self {
            api_key,
            regions,
            window_hours,
            base_url,
        }
    }
}

/// Fetch live and near-term odds for every configured league.
///
/// Per-league failures are recorded and the remaining leagues still run; an
/// auth rejection is terminal for the whole source, and a rate limit stops
/// further requests but keeps whatever was already collected.
pub fn fetch_live_odds(cfg: &OddsApiConfig) -> Result<SourceBatch, SourceError> {
    let Some(api_key) = cfg.api_key.as_deref() else {
        return Err(SourceError::MissingApiKey);
    };
    let client = http_client().map_err(|e| SourceError::Client(e.to_string()))?;
    let filter = TimeWindowFilter::new(cfg.window_hours);
    // One reference time per run so the whole batch classifies consistently.
    let now = Utc::now();

    let mut batch = SourceBatch::default();

    for &(sport_key, league) in SPORT_KEYS {
        let url = format!("{}/{sport_key}/odds", cfg.base_url);
        let resp = match client
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("regions", cfg.regions.as_str()),
                ("markets", "h2h"),
                ("oddsFormat", "decimal"),
                ("dateFormat", "iso"),
            ])
            .send()
        {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(league, %err, "odds request failed");
                batch.errors.push(format!("{league}: {err}"));
                continue;
            }
        };

        let status = resp.status();
        if status.as_u16() == 401 {
            return Err(SourceError::AuthRejected);
        }
        if status.as_u16() == 429 {
            if batch.is_empty() {
                return Err(SourceError::RateLimited);
            }
            batch.errors.push(format!("{league}: rate limited, stopping"));
            break;
        }

        let body = match resp.text() {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(league, %err, "odds response body unreadable");
                batch.errors.push(format!("{league}: {err}"));
                continue;
            }
        };
        if !status.is_success() {
            let snippet = body.trim().chars().take(220).collect::<String>();
            batch
                .errors
                .push(format!("{league}: http {status}: {snippet}"));
            continue;
        }

        let events: Vec<RawEvent> = match serde_json::from_str(&body) {
            Ok(events) => events,
            Err(err) => {
                batch.errors.push(format!("{league}: invalid json: {err}"));
                continue;
            }
        };

        let added = collect_events(&events, league, &filter, now, &mut batch);
        tracing::info!(league, events = events.len(), kept = added, "live odds fetched");
    }

    Ok(batch)
}

/// Normalize raw events for one league into match records. Events beyond the
/// look-ahead window and fixtures with zero resolvable quotes are dropped;
/// everything else is kept. Returns the number of records added.
pub fn collect_events(
    events: &[RawEvent],
    league: &str,
    filter: &TimeWindowFilter,
    now: DateTime<Utc>,
    batch: &mut SourceBatch,
) -> usize {
    let mut added = 0;

    for event in events {
        let raw_time = event.commence_time.as_deref().unwrap_or("");
        let kickoff = time_window::parse_kickoff(raw_time);
        let Some(status) = filter.classify(kickoff, now) else {
            continue;
        };

        let date = kickoff
            .map(|k| k.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| raw_time.chars().take(16).collect());

        let quotes = normalize::bookmaker_quotes(event);
        let meta = FixtureMeta {
            date,
            status,
            league: league.to_string(),
            home_team: event.home_team.clone(),
            away_team: event.away_team.clone(),
        };
        if let Some(record) = aggregate::build_match_record(meta, quotes) {
            batch.matches.push(record);
            added += 1;
        }
    }

    added
}
