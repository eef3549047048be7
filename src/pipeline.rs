use chrono::Utc;
use thiserror::Error;

use crate::football_data::{self, FootballDataConfig};
use crate::odds_api::{self, OddsApiConfig};
use crate::record::{CompletedMatch, MatchRecord, round2};
use crate::sample;
use crate::source::{SourceBatch, SourceError, SourceKind};
use crate::team_stats::{self, TeamStatsReport};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sources: Vec<SourceKind>,
    pub samples: usize,
    /// Overrides the environment look-ahead window for the live source.
    pub window_hours: Option<i64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sources: vec![SourceKind::Live],
            samples: sample::DEFAULT_SAMPLE_COUNT,
            window_hours: None,
        }
    }
}

/// Per-source accounting for the run summary. A `failure` means the source
/// produced nothing at all; `errors` are partial (per-league) problems from
/// a source that still yielded data.
#[derive(Debug)]
pub struct SourceReport {
    pub kind: SourceKind,
    pub matches: usize,
    pub completed: usize,
    pub skipped_rows: usize,
    pub errors: Vec<String>,
    pub failure: Option<String>,
}

#[derive(Debug)]
pub struct RunOutput {
    pub matches: Vec<MatchRecord>,
    pub completed: Vec<CompletedMatch>,
    pub team_stats: TeamStatsReport,
    pub skipped_rows: usize,
    pub reports: Vec<SourceReport>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no source produced any data")]
    NoData,
}

/// Run every requested source best-effort and merge the yields. A source
/// that fails outright is reported, not fatal; the run only errors when
/// nothing at all came back.
pub fn run(cfg: &RunConfig) -> Result<RunOutput, RunError> {
    let mut matches = Vec::new();
    let mut completed = Vec::new();
    let mut skipped_rows = 0;
    let mut reports = Vec::new();

    for kind in &cfg.sources {
        let outcome = fetch_source(*kind, cfg);
        let report = match outcome {
            Ok(batch) => {
                tracing::info!(
                    source = kind.label(),
                    matches = batch.matches.len(),
                    completed = batch.completed.len(),
                    skipped = batch.skipped_rows,
                    "source finished"
                );
                let report = SourceReport {
                    kind: *kind,
                    matches: batch.matches.len(),
                    completed: batch.completed.len(),
                    skipped_rows: batch.skipped_rows,
                    errors: batch.errors,
                    failure: None,
                };
                matches.extend(batch.matches);
                completed.extend(batch.completed);
                skipped_rows += batch.skipped_rows;
                report
            }
            Err(err) => {
                tracing::warn!(source = kind.label(), %err, "source failed");
                SourceReport {
                    kind: *kind,
                    matches: 0,
                    completed: 0,
                    skipped_rows: 0,
                    errors: Vec::new(),
                    failure: Some(err.to_string()),
                }
            }
        };
        reports.push(report);
    }

    if matches.is_empty() && completed.is_empty() {
        return Err(RunError::NoData);
    }

    let team_stats = team_stats::fold_team_stats(&completed);
    Ok(RunOutput {
        matches,
        completed,
        team_stats,
        skipped_rows,
        reports,
    })
}

fn fetch_source(kind: SourceKind, cfg: &RunConfig) -> Result<SourceBatch, SourceError> {
    match kind {
        SourceKind::Live => {
            let mut api = OddsApiConfig::from_env();
            if let Some(hours) = cfg.window_hours {
                api.window_hours = hours.clamp(1, 168);
            }
            odds_api::fetch_live_odds(&api)
        }
        SourceKind::Historical => football_data::fetch_historical(&FootballDataConfig::from_env()),
        SourceKind::Sample => Ok(sample::generate_sample_data(
            cfg.samples,
            Utc::now(),
            &mut rand::thread_rng(),
        )),
    }
}

/// Min, mean, and max of the per-match average margins, for the run summary.
pub fn margin_summary(matches: &[MatchRecord]) -> Option<(f64, f64, f64)> {
    if matches.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for m in matches {
        min = min.min(m.avg_margin);
        max = max.max(m.avg_margin);
        sum += m.avg_margin;
    }
    Some((min, round2(sum / matches.len() as f64), max))
}
