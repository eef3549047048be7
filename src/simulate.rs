use rand::Rng;

use crate::margin;
use crate::record::{OddsTriple, Outcome};

/// A simulated scoreline used to fill in missing historical results. This is
/// a sampling gadget for the odds-implied distribution, not a match model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedResult {
    pub outcome: Outcome,
    pub home_goals: i32,
    pub away_goals: i32,
}

/// Draw an outcome from the margin-removed implied probabilities, then a
/// scoreline consistent with it.
///
/// One uniform draw in [0,1) is partitioned against the cumulative
/// normalized probabilities in fixed HOME, DRAW, AWAY order. A decisive
/// winner scores uniformly in 1..=4 and the loser strictly fewer; a draw
/// shares a score uniform in 0..=3.
pub fn simulate_result(odds: &OddsTriple, rng: &mut impl Rng) -> SimulatedResult {
    let (p_home, p_draw, _) = margin::normalized_probabilities(odds);
    let roll: f64 = rng.gen_range(0.0..1.0);

    let outcome = if roll < p_home {
        Outcome::Home
    } else if roll < p_home + p_draw {
        Outcome::Draw
    } else {
        Outcome::Away
    };

    let (home_goals, away_goals) = match outcome {
        Outcome::Home => {
            let winner = rng.gen_range(1..=4);
            (winner, rng.gen_range(0..winner))
        }
        Outcome::Away => {
            let winner = rng.gen_range(1..=4);
            (rng.gen_range(0..winner), winner)
        }
        Outcome::Draw => {
            let goals = rng.gen_range(0..=3);
            (goals, goals)
        }
    };

    SimulatedResult {
        outcome,
        home_goals,
        away_goals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple() -> OddsTriple {
        OddsTriple::new(2.0, 3.0, 4.0).expect("valid")
    }

    #[test]
    fn scorelines_are_consistent_with_outcomes() {
        let mut rng = rand::thread_rng();
        for _ in 0..2_000 {
            let sim = simulate_result(&triple(), &mut rng);
            match sim.outcome {
                Outcome::Home => {
                    assert!((1..=4).contains(&sim.home_goals));
                    assert!(sim.away_goals < sim.home_goals);
                    assert!(sim.away_goals >= 0);
                }
                Outcome::Away => {
                    assert!((1..=4).contains(&sim.away_goals));
                    assert!(sim.home_goals < sim.away_goals);
                    assert!(sim.home_goals >= 0);
                }
                Outcome::Draw => {
                    assert_eq!(sim.home_goals, sim.away_goals);
                    assert!((0..=3).contains(&sim.home_goals));
                }
            }
            assert_eq!(
                sim.outcome,
                Outcome::from_goals(sim.home_goals, sim.away_goals)
            );
        }
    }

    #[test]
    fn home_frequency_tracks_normalized_implied_probability() {
        // With (2.0, 3.0, 4.0) the normalized home probability is
        // 0.5 / (0.5 + 0.3333 + 0.25) ≈ 0.4615.
        let mut rng = rand::thread_rng();
        let draws = 10_000;
        let homes = (0..draws)
            .filter(|_| simulate_result(&triple(), &mut rng).outcome == Outcome::Home)
            .count();
        let freq = homes as f64 / draws as f64;
        assert!(
            (freq - 0.4615).abs() < 0.03,
            "home frequency {freq} strayed from implied probability"
        );
    }
}
