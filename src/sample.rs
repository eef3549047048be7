use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::aggregate::{self, FixtureMeta};
use crate::margin;
use crate::record::{BookmakerQuote, CompletedMatch, MatchStatus, OddsTriple, round2};
use crate::simulate;
use crate::source::SourceBatch;

pub const DEFAULT_SAMPLE_COUNT: usize = 100;

const TEAMS: &[&str] = &[
    "Manchester City",
    "Liverpool",
    "Chelsea",
    "Arsenal",
    "Tottenham",
    "Barcelona",
    "Real Madrid",
    "Atletico Madrid",
    "Sevilla",
    "Bayern Munich",
    "Dortmund",
    "RB Leipzig",
    "Juventus",
    "AC Milan",
    "Inter Milan",
    "PSG",
    "Monaco",
    "Lyon",
];

const LEAGUES: &[&str] = &[
    "Premier League",
    "La Liga",
    "Bundesliga",
    "Serie A",
    "Ligue 1",
];

/// Generate a batch of synthetic historical fixtures with valid price
/// triples, simulated scorelines, and dates spread back over the past year.
pub fn generate_sample_data(
    count: usize,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> SourceBatch {
    let mut batch = SourceBatch::default();
    let start = now - Duration::days(365);

    for i in 0..count {
        let (home_team, away_team) = pick_team_pair(rng);
        let league = LEAGUES[rng.gen_range(0..LEAGUES.len())];
        let odds = draw_odds(rng);
        let date = (start + Duration::days(3 * i as i64))
            .format("%d/%m/%Y")
            .to_string();

        let sim = simulate::simulate_result(&odds, rng);

        let quote = BookmakerQuote {
            bookmaker: "Simulated".to_string(),
            margin_pct: margin::margin_pct(&odds),
            odds,
        };
        let meta = FixtureMeta {
            date: date.clone(),
            status: MatchStatus::Historical,
            league: league.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
        };
        if let Some(record) = aggregate::build_match_record(meta, vec![quote]) {
            batch.matches.push(record);
        }

        batch.completed.push(CompletedMatch {
            date,
            league: league.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_goals: sim.home_goals,
            away_goals: sim.away_goals,
            result: sim.outcome,
        });
    }

    batch
}

fn pick_team_pair(rng: &mut impl Rng) -> (&'static str, &'static str) {
    let home = rng.gen_range(0..TEAMS.len());
    let mut away = rng.gen_range(0..TEAMS.len() - 1);
    if away >= home {
        away += 1;
    }
    (TEAMS[home], TEAMS[away])
}

/// Draw a statistically valid triple: home and draw prices are sampled
/// directly and the away price is backed out of the remaining implied
/// probability. Redraws until enough probability mass is left for a sane
/// away price.
fn draw_odds(rng: &mut impl Rng) -> OddsTriple {
    loop {
        let home = round2(rng.gen_range(1.5..3.5));
        let draw = round2(rng.gen_range(2.8..4.0));
        let remaining = 1.0 - (1.0 / home + 1.0 / draw);
        if remaining < 0.05 {
            continue;
        }
        let away = round2(1.0 / remaining);
        if let Some(odds) = OddsTriple::new(home, draw, away) {
            return odds;
        }
    }
}
