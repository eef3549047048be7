use crate::record::{OddsTriple, round2};

/// Implied probability per outcome: the reciprocal of the decimal price,
/// before any margin removal. Sums to more than 1 for a real book.
pub fn implied_probabilities(odds: &OddsTriple) -> (f64, f64, f64) {
    (1.0 / odds.home, 1.0 / odds.draw, 1.0 / odds.away)
}

/// Bookmaker overround as a percentage, rounded to 2 decimal places.
///
/// `(1/h + 1/d + 1/a - 1) * 100`. A mixed-bookmaker triple can produce a
/// small negative value; it is reported as-is, not clamped.
pub fn margin_pct(odds: &OddsTriple) -> f64 {
    let (ih, id, ia) = implied_probabilities(odds);
    round2((ih + id + ia - 1.0) * 100.0)
}

/// Implied probabilities with the margin divided out so they sum to 1.
pub fn normalized_probabilities(odds: &OddsTriple) -> (f64, f64, f64) {
    let (ih, id, ia) = implied_probabilities(odds);
    let sum = ih + id + ia;
    (ih / sum, id / sum, ia / sum)
}
