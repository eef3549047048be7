use std::env;

use chrono::{Datelike, Utc};

use crate::aggregate::{self, FixtureMeta};
use crate::http_client::http_client;
use crate::record::{BookmakerQuote, CompletedMatch, MatchStatus, OddsTriple, Outcome};
use crate::source::{SourceBatch, SourceError};
use crate::margin;

const BASE_URL: &str = "https://www.football-data.co.uk/mmz4281";

/// League codes served by football-data.co.uk, paired with display names.
pub const LEAGUES: &[(&str, &str)] = &[
    ("E0", "Premier League"),
    ("SP1", "La Liga"),
    ("D1", "Bundesliga"),
    ("I1", "Serie A"),
    ("F1", "Ligue 1"),
];

#[derive(Debug, Clone)]
pub struct FootballDataConfig {
    /// Season in the site's two-digit pair form, e.g. "2526" for 2025/26.
    pub season: String,
}

impl FootballDataConfig {
    pub fn from_env() -> Self {
        let season = env::var("FOOTBALL_DATA_SEASON")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| current_season_code(Utc::now().year(), Utc::now().month()));
        Self { season }
    }
}

/// European seasons roll over in August.
pub fn current_season_code(year: i32, month: u32) -> String {
    let start = if month >= 8 { year } else { year - 1 };
    format!("{:02}{:02}", start.rem_euclid(100), (start + 1).rem_euclid(100))
}

/// Download and parse the current season's results for every league.
/// Per-league download failures are recorded and the rest still run.
pub fn fetch_historical(cfg: &FootballDataConfig) -> Result<SourceBatch, SourceError> {
    let client = http_client().map_err(|e| SourceError::Client(e.to_string()))?;
    let mut batch = SourceBatch::default();

    for &(code, league) in LEAGUES {
        let url = format!("{BASE_URL}/{}/{code}.csv", cfg.season);
        let resp = match client.get(&url).send() {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(league, %err, "results download failed");
                batch.errors.push(format!("{league}: {err}"));
                continue;
            }
        };
        let status = resp.status();
        if !status.is_success() {
            batch.errors.push(format!("{league}: http {status}"));
            continue;
        }
        let bytes = match resp.bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                batch.errors.push(format!("{league}: {err}"));
                continue;
            }
        };
        // The site serves Latin-1 with stray bytes in some seasons.
        let text = String::from_utf8_lossy(&bytes);
        let added = parse_results_csv(&text, league, &mut batch);
        tracing::info!(league, rows = added, "historical results ingested");
    }

    Ok(batch)
}

/// Parse one league's results CSV. Every row with parseable teams and goals
/// becomes a completed match; rows that also carry a valid Bet365 price
/// triple additionally yield a historical match record. Malformed rows are
/// counted and skipped, never fatal.
pub fn parse_results_csv(text: &str, league: &str, batch: &mut SourceBatch) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(err) => {
            batch.errors.push(format!("{league}: unreadable csv header: {err}"));
            return 0;
        }
    };
    let col = |name: &str| headers.iter().position(|h| h == name);

    let Some(date_ix) = col("Date") else {
        batch.errors.push(format!("{league}: csv missing Date column"));
        return 0;
    };
    let (Some(home_ix), Some(away_ix)) = (col("HomeTeam"), col("AwayTeam")) else {
        batch.errors.push(format!("{league}: csv missing team columns"));
        return 0;
    };
    let (Some(hg_ix), Some(ag_ix)) = (col("FTHG"), col("FTAG")) else {
        batch.errors.push(format!("{league}: csv missing goal columns"));
        return 0;
    };
    let odds_ix = match (col("B365H"), col("B365D"), col("B365A")) {
        (Some(h), Some(d), Some(a)) => Some((h, d, a)),
        _ => None,
    };

    let mut added = 0;
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(_) => {
                batch.skipped_rows += 1;
                continue;
            }
        };

        let field = |ix: usize| row.get(ix).unwrap_or("").trim();
        let date = field(date_ix).to_string();
        let home_team = field(home_ix).to_string();
        let away_team = field(away_ix).to_string();
        let goals = (
            field(hg_ix).parse::<i32>(),
            field(ag_ix).parse::<i32>(),
        );

        let (Ok(home_goals), Ok(away_goals)) = goals else {
            batch.skipped_rows += 1;
            continue;
        };
        if home_team.is_empty() || away_team.is_empty() || home_goals < 0 || away_goals < 0 {
            batch.skipped_rows += 1;
            continue;
        }

        let triple = odds_ix.and_then(|(h, d, a)| {
            let parse = |ix: usize| field(ix).parse::<f64>().ok();
            OddsTriple::new(parse(h)?, parse(d)?, parse(a)?)
        });

        // Odds-less rows still count toward team statistics.
        if let Some(odds) = triple {
            let quote = BookmakerQuote {
                bookmaker: "Bet365".to_string(),
                margin_pct: margin::margin_pct(&odds),
                odds,
            };
            let meta = FixtureMeta {
                date: date.clone(),
                status: MatchStatus::Historical,
                league: league.to_string(),
                home_team: home_team.clone(),
                away_team: away_team.clone(),
            };
            if let Some(record) = aggregate::build_match_record(meta, vec![quote]) {
                batch.matches.push(record);
            }
        }

        batch.completed.push(CompletedMatch {
            date,
            league: league.to_string(),
            home_team,
            away_team,
            home_goals,
            away_goals,
            result: Outcome::from_goals(home_goals, away_goals),
        });
        added += 1;
    }

    added
}
