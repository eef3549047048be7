use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use marginwatch::persist::{self, OutputPaths};
use marginwatch::pipeline::{self, RunConfig};
use marginwatch::record::MatchStatus;
use marginwatch::sample;
use marginwatch::source::SourceKind;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = RunConfig {
        sources: parse_sources_arg()?,
        samples: parse_samples_arg().unwrap_or(sample::DEFAULT_SAMPLE_COUNT),
        window_hours: parse_window_hours_arg(),
    };
    let paths = OutputPaths::new(parse_out_dir_arg().unwrap_or_else(|| PathBuf::from("data")));

    let output = pipeline::run(&cfg)?;

    paths.ensure_dir()?;
    persist::write_live_matches(&paths.live_matches(), &output.matches)?;
    persist::write_team_stats(&paths.team_stats(), &output.team_stats)?;
    persist::write_odds_csv(&paths.odds_csv(), &output.matches, &output.completed)?;

    print_summary(&output);

    Ok(())
}

fn print_summary(output: &pipeline::RunOutput) {
    println!("Odds run complete");
    println!("Matches: {}", output.matches.len());
    println!(
        "Teams tracked: {} over {} completed matches",
        output.team_stats.summary.teams, output.team_stats.summary.total_matches
    );
    if output.skipped_rows > 0 {
        println!("Rows skipped: {}", output.skipped_rows);
    }

    if let Some((min, avg, max)) = pipeline::margin_summary(&output.matches) {
        println!("Margin %: min={min:.2} avg={avg:.2} max={max:.2}");
    }

    let live = output
        .matches
        .iter()
        .filter(|m| m.status == MatchStatus::Live)
        .count();
    let upcoming = output
        .matches
        .iter()
        .filter(|m| matches!(m.status, MatchStatus::Upcoming { .. }))
        .count();
    if live + upcoming > 0 {
        println!("Live: {live} Upcoming: {upcoming}");
    }

    let mut per_league = std::collections::BTreeMap::<&str, usize>::new();
    for m in &output.matches {
        *per_league.entry(m.league.as_str()).or_default() += 1;
    }
    for (league, count) in per_league {
        println!("league {league}: matches={count}");
    }

    for report in &output.reports {
        match &report.failure {
            Some(reason) => println!("source {}: failed: {reason}", report.kind.label()),
            None => println!(
                "source {}: matches={} completed={} skipped={}",
                report.kind.label(),
                report.matches,
                report.completed,
                report.skipped_rows
            ),
        }
        for err in report.errors.iter().take(6) {
            println!("   - {err}");
        }
    }
}

fn parse_sources_arg() -> Result<Vec<SourceKind>> {
    let Some(raw) = flag_value("--source") else {
        return Ok(default_sources());
    };
    let mut kinds = Vec::new();
    for part in raw.split(',') {
        let kind = match part.trim() {
            "live" => SourceKind::Live,
            "historical" => SourceKind::Historical,
            "sample" => SourceKind::Sample,
            "all" => {
                return Ok(vec![
                    SourceKind::Live,
                    SourceKind::Historical,
                    SourceKind::Sample,
                ]);
            }
            other => return Err(anyhow!("unknown source '{other}'")),
        };
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err(anyhow!("no sources given"));
    }
    Ok(kinds)
}

// Without an explicit --source, run everything the environment supports:
// the live source is pointless without a key, so it is left out then.
fn default_sources() -> Vec<SourceKind> {
    let has_key = std::env::var("ODDS_API_KEY")
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    if has_key {
        vec![SourceKind::Live, SourceKind::Historical, SourceKind::Sample]
    } else {
        vec![SourceKind::Historical, SourceKind::Sample]
    }
}

fn parse_out_dir_arg() -> Option<PathBuf> {
    flag_value("--out-dir")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_samples_arg() -> Option<usize> {
    flag_value("--samples").and_then(|v| v.parse().ok())
}

fn parse_window_hours_arg() -> Option<i64> {
    flag_value("--window-hours").and_then(|v| v.parse().ok())
}

fn flag_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{flag}=")) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
        {
            let trimmed = next.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}
