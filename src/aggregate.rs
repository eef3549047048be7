use crate::record::{BookmakerQuote, MatchRecord, MatchStatus, round2};

/// Fixture metadata carried alongside the quote list when building a record.
#[derive(Debug, Clone)]
pub struct FixtureMeta {
    pub date: String,
    pub status: MatchStatus,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
}

/// Combine one fixture's bookmaker quotes into a single record. A fixture
/// with zero resolvable quotes carries no statistical value and is dropped
/// (`None`). Quote order is the order bookmakers appeared in the source.
pub fn build_match_record(meta: FixtureMeta, quotes: Vec<BookmakerQuote>) -> Option<MatchRecord> {
    if quotes.is_empty() {
        return None;
    }

    let avg_margin = round2(
        quotes.iter().map(|q| q.margin_pct).sum::<f64>() / quotes.len() as f64,
    );

    Some(MatchRecord {
        date: meta.date,
        status: meta.status,
        league: meta.league,
        home_team: meta.home_team,
        away_team: meta.away_team,
        quote_count: quotes.len(),
        avg_margin,
        quotes,
    })
}
