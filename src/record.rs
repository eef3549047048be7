use serde::{Deserialize, Serialize};

/// Round to 2 decimal places. Margins and averages are persisted at this
/// precision so they round-trip through JSON and CSV unchanged.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A decimal 1X2 odds triple. Construction enforces that all three prices
/// are present and strictly positive; anything else is not a usable quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsTriple {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OddsTriple {
    pub fn new(home: f64, draw: f64, away: f64) -> Option<Self> {
        if home > 0.0 && draw > 0.0 && away > 0.0 {
            Some(Self { home, draw, away })
        } else {
            None
        }
    }
}

/// One bookmaker's priced 1X2 market for a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerQuote {
    pub bookmaker: String,
    pub odds: OddsTriple,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStatus {
    Live,
    /// `hours` is the rounded hour count until kickoff, or None when the
    /// commence time could not be parsed ("upcoming, time unknown").
    Upcoming { hours: Option<i64> },
    Historical,
}

impl MatchStatus {
    pub fn label(&self) -> String {
        match self {
            MatchStatus::Live => "LIVE".to_string(),
            MatchStatus::Upcoming { hours: Some(h) } => format!("{h}h"),
            MatchStatus::Upcoming { hours: None } => "soon".to_string(),
            MatchStatus::Historical => "FT".to_string(),
        }
    }
}

/// Canonical output unit of the pipeline. Built once per fixture per run and
/// never mutated afterwards; a re-run replaces the full dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: String,
    pub status: MatchStatus,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub quotes: Vec<BookmakerQuote>,
    pub avg_margin: f64,
    pub quote_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "A")]
    Away,
}

impl Outcome {
    pub fn from_goals(home_goals: i32, away_goals: i32) -> Self {
        if home_goals > away_goals {
            Outcome::Home
        } else if home_goals < away_goals {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Outcome::Home => 'H',
            Outcome::Draw => 'D',
            Outcome::Away => 'A',
        }
    }
}

/// A finished match with a known scoreline, the input row for team
/// statistics and the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMatch {
    pub date: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: i32,
    pub away_goals: i32,
    pub result: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStat {
    pub team_name: String,
    pub total_matches: u32,
    pub total_goals: u32,
    pub avg_goals_per_match: f64,
}

/// Global roll-up over all completed matches. `total_matches` halves the
/// per-team sum because every fixture increments two teams; goals are not
/// halved (home and away goals are distinct).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub teams: usize,
    pub total_matches: u32,
    pub total_goals: u32,
    pub avg_goals_per_match: f64,
}
