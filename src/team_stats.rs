use std::collections::BTreeMap;

use crate::record::{CompletedMatch, StatsSummary, TeamStat, round2};

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    matches: u32,
    goals: u32,
}

/// Per-team scoring statistics plus the global roll-up for one batch of
/// completed matches.
#[derive(Debug, Clone)]
pub struct TeamStatsReport {
    pub stats: BTreeMap<String, TeamStat>,
    pub summary: StatsSummary,
}

/// Fold completed matches into per-team counters. Every row touches exactly
/// two accumulators: the home team gains one match and its home goals, the
/// away team one match and its away goals. Unseen team names start from a
/// zero-valued accumulator.
///
/// Averages are computed only after the fold completes; no running averages
/// are exposed mid-fold.
pub fn fold_team_stats(rows: &[CompletedMatch]) -> TeamStatsReport {
    let mut counters: BTreeMap<String, Counters> = BTreeMap::new();

    for row in rows {
        let home = counters.entry(row.home_team.clone()).or_default();
        home.matches += 1;
        home.goals += row.home_goals.max(0) as u32;

        let away = counters.entry(row.away_team.clone()).or_default();
        away.matches += 1;
        away.goals += row.away_goals.max(0) as u32;
    }

    let mut stats = BTreeMap::new();
    let mut team_match_sum = 0u32;
    let mut total_goals = 0u32;

    for (team, c) in &counters {
        team_match_sum += c.matches;
        total_goals += c.goals;
        // Zero-match teams cannot occur from the fold above, but the guard
        // keeps the average well-defined if callers pre-seed entries.
        let avg = if c.matches > 0 {
            round2(c.goals as f64 / c.matches as f64)
        } else {
            0.0
        };
        stats.insert(
            team.clone(),
            TeamStat {
                team_name: team.clone(),
                total_matches: c.matches,
                total_goals: c.goals,
                avg_goals_per_match: avg,
            },
        );
    }

    // Each fixture increments two teams, so the fixture count is half the
    // per-team sum. Goals are not halved: home and away goals are distinct.
    let total_matches = team_match_sum / 2;
    let avg_goals_per_match = if total_matches > 0 {
        round2(total_goals as f64 / total_matches as f64)
    } else {
        0.0
    };

    TeamStatsReport {
        summary: StatsSummary {
            teams: stats.len(),
            total_matches,
            total_goals,
            avg_goals_per_match,
        },
        stats,
    }
}
