use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::record::{CompletedMatch, MatchRecord, MatchStatus, StatsSummary, TeamStat};
use crate::team_stats::TeamStatsReport;

pub const LIVE_MATCHES_FILE: &str = "live_matches.json";
pub const TEAM_STATS_FILE: &str = "team_stats.json";
pub const ODDS_CSV_FILE: &str = "odds_data.csv";

#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn live_matches(&self) -> PathBuf {
        self.dir.join(LIVE_MATCHES_FILE)
    }

    pub fn team_stats(&self) -> PathBuf {
        self.dir.join(TEAM_STATS_FILE)
    }

    pub fn odds_csv(&self) -> PathBuf {
        self.dir.join(ODDS_CSV_FILE)
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output dir {}", self.dir.display()))
    }
}

#[derive(Debug, Serialize)]
struct LiveMatchesFile<'a> {
    updated: String,
    total_matches: usize,
    matches: &'a [MatchRecord],
}

#[derive(Debug, Serialize)]
struct TeamStatsFile<'a> {
    updated: String,
    summary: &'a StatsSummary,
    teams: &'a BTreeMap<String, TeamStat>,
}

#[derive(Debug, Serialize)]
struct OddsCsvRow<'a> {
    date: &'a str,
    league: &'a str,
    home_team: &'a str,
    away_team: &'a str,
    odds_home: f64,
    odds_draw: f64,
    odds_away: f64,
    home_goals: Option<i32>,
    away_goals: Option<i32>,
    result: Option<char>,
    bookmaker: &'a str,
}

pub fn write_live_matches(path: &Path, matches: &[MatchRecord]) -> Result<()> {
    let file = LiveMatchesFile {
        updated: Utc::now().to_rfc3339(),
        total_matches: matches.len(),
        matches,
    };
    let json = serde_json::to_string_pretty(&file).context("serializing live matches")?;
    write_atomic(path, json.as_bytes())
}

pub fn write_team_stats(path: &Path, report: &TeamStatsReport) -> Result<()> {
    let file = TeamStatsFile {
        updated: Utc::now().to_rfc3339(),
        summary: &report.summary,
        teams: &report.stats,
    };
    let json = serde_json::to_string_pretty(&file).context("serializing team stats")?;
    write_atomic(path, json.as_bytes())
}

/// Flatten every quote of every record into one CSV row. Historical rows are
/// joined against the completed results by fixture identity so the row also
/// carries the final scoreline; live and upcoming rows leave those columns
/// empty.
pub fn write_odds_csv(
    path: &Path,
    matches: &[MatchRecord],
    completed: &[CompletedMatch],
) -> Result<()> {
    let results: HashMap<(&str, &str, &str), &CompletedMatch> = completed
        .iter()
        .map(|m| {
            (
                (m.date.as_str(), m.home_team.as_str(), m.away_team.as_str()),
                m,
            )
        })
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in matches {
        let outcome = match record.status {
            MatchStatus::Historical => results
                .get(&(
                    record.date.as_str(),
                    record.home_team.as_str(),
                    record.away_team.as_str(),
                ))
                .copied(),
            _ => None,
        };
        for quote in &record.quotes {
            writer
                .serialize(OddsCsvRow {
                    date: &record.date,
                    league: &record.league,
                    home_team: &record.home_team,
                    away_team: &record.away_team,
                    odds_home: quote.odds.home,
                    odds_draw: quote.odds.draw,
                    odds_away: quote.odds.away,
                    home_goals: outcome.map(|m| m.home_goals),
                    away_goals: outcome.map(|m| m.away_goals),
                    result: outcome.map(|m| m.result.as_char()),
                    bookmaker: &quote.bookmaker,
                })
                .context("writing odds csv row")?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing odds csv: {err}"))?;
    write_atomic(path, &bytes)
}

/// Write to a sibling tmp file and rename into place so readers never see a
/// half-written file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} into place", tmp.display()))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
