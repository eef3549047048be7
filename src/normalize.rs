use serde::Deserialize;

use crate::margin;
use crate::record::{BookmakerQuote, OddsTriple};

#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub commence_time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBookmaker {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOutcome {
    pub name: String,
    pub price: f64,
}

/// Resolve a 1X2 triple from a bookmaker's outcome list by exact name match:
/// the home team's name, the literal `"Draw"`, and the away team's name.
/// Extra markets in the list are ignored. Returns `None` unless all three
/// slots resolve to a positive price.
///
/// Matching is exact-string on purpose: when sources disagree on a team-name
/// spelling the bookmaker's quote is silently dropped for that fixture. This
/// is a known fragility, not something to paper over with fuzzy matching.
pub fn extract_triple(
    outcomes: &[RawOutcome],
    home_team: &str,
    away_team: &str,
) -> Option<OddsTriple> {
    let mut home = None;
    let mut draw = None;
    let mut away = None;

    for outcome in outcomes {
        if outcome.name == home_team {
            home = Some(outcome.price);
        } else if outcome.name == "Draw" {
            draw = Some(outcome.price);
        } else if outcome.name == away_team {
            away = Some(outcome.price);
        }
    }

    match (home, draw, away) {
        (Some(h), Some(d), Some(a)) => OddsTriple::new(h, d, a),
        _ => None,
    }
}

/// Produce one quote per bookmaker that offers a resolvable h2h triple for
/// this event, in the order the bookmakers appear in the feed. Bookmakers
/// without a usable triple contribute nothing; absent markets are expected.
pub fn bookmaker_quotes(event: &RawEvent) -> Vec<BookmakerQuote> {
    let mut quotes = Vec::new();

    for bookmaker in &event.bookmakers {
        let Some(market) = bookmaker
            .markets
            .iter()
            .find(|m| m.key.eq_ignore_ascii_case("h2h"))
        else {
            continue;
        };
        let Some(odds) = extract_triple(&market.outcomes, &event.home_team, &event.away_team)
        else {
            continue;
        };
        quotes.push(BookmakerQuote {
            bookmaker: bookmaker.title.clone(),
            odds,
            margin_pct: margin::margin_pct(&odds),
        });
    }

    quotes
}
