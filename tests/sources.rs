use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use chrono::{DateTime, Utc};

use marginwatch::football_data;
use marginwatch::normalize::RawEvent;
use marginwatch::odds_api::{self, OddsApiConfig, SPORT_KEYS};
use marginwatch::record::{MatchStatus, Outcome};
use marginwatch::source::SourceBatch;
use marginwatch::team_stats;
use marginwatch::time_window::TimeWindowFilter;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn reference_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn collect_fixture_events() -> SourceBatch {
    let raw = read_fixture("odds_events.json");
    let events: Vec<RawEvent> = serde_json::from_str(&raw).expect("fixture should parse");
    let mut batch = SourceBatch::default();
    odds_api::collect_events(
        &events,
        "Premier League",
        &TimeWindowFilter::default(),
        reference_time(),
        &mut batch,
    );
    batch
}

#[test]
fn live_fixture_keeps_in_window_events_only() {
    let batch = collect_fixture_events();
    // Bayern kicks off four days out and is dropped.
    assert_eq!(batch.matches.len(), 2);
    assert_eq!(batch.matches[0].home_team, "Arsenal");
    assert_eq!(batch.matches[0].status, MatchStatus::Live);
    assert_eq!(
        batch.matches[1].status,
        MatchStatus::Upcoming { hours: Some(32) }
    );
}

#[test]
fn misnamed_outcome_drops_the_quote_but_not_the_fixture() {
    let batch = collect_fixture_events();
    let arsenal = &batch.matches[0];
    // Bet365 lists "Arsenal FC" which does not resolve against "Arsenal".
    assert_eq!(arsenal.quote_count, 1);
    assert_eq!(arsenal.quotes[0].bookmaker, "Pinnacle");
    assert_eq!(arsenal.quotes[0].margin_pct, 8.33);
    assert_eq!(arsenal.avg_margin, 8.33);
}

#[test]
fn non_h2h_markets_are_ignored_when_resolving_quotes() {
    let batch = collect_fixture_events();
    let clasico = &batch.matches[1];
    assert_eq!(clasico.quote_count, 2);
    assert_eq!(clasico.quotes[0].bookmaker, "Pinnacle");
    assert_eq!(clasico.quotes[0].margin_pct, 8.33);
    assert_eq!(clasico.quotes[1].bookmaker, "Unibet");
    assert_eq!(clasico.quotes[1].margin_pct, 8.33);
    assert_eq!(clasico.avg_margin, 8.33);
}

#[test]
fn live_dates_are_normalized_from_commence_times() {
    let batch = collect_fixture_events();
    assert_eq!(batch.matches[0].date, "2026-03-01 11:00");
    assert_eq!(batch.matches[1].date, "2026-03-02 20:00");
}

#[test]
fn results_fixture_parses_best_effort() {
    let mut batch = SourceBatch::default();
    let added =
        football_data::parse_results_csv(&read_fixture("results_e0.csv"), "Premier League", &mut batch);

    // One of ten rows carries unparseable goals.
    assert_eq!(added, 9);
    assert_eq!(batch.completed.len(), 9);
    assert_eq!(batch.skipped_rows, 1);
    assert!(batch.errors.is_empty());
}

#[test]
fn results_fixture_only_prices_rows_with_full_triples() {
    let mut batch = SourceBatch::default();
    football_data::parse_results_csv(&read_fixture("results_e0.csv"), "Premier League", &mut batch);

    // The Brentford row has goals but no prices.
    assert_eq!(batch.matches.len(), 8);
    assert!(batch.matches.iter().all(|m| m.status == MatchStatus::Historical));
    assert!(batch.matches.iter().all(|m| m.quotes[0].bookmaker == "Bet365"));
    assert!(
        batch
            .completed
            .iter()
            .any(|m| m.home_team == "Brentford" && m.result == Outcome::Home)
    );
}

/// Serves one full odds payload, then answers every further request with a
/// body cut short of its declared content length so the client errors while
/// reading it.
fn spawn_truncating_odds_server(good_body: String, connections: usize) -> (thread::JoinHandle<()>, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");

    let handle = thread::spawn(move || {
        for i in 0..connections {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let response = if i == 0 {
                format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    good_body.len(),
                    good_body
                )
            } else {
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 4096\r\nconnection: close\r\n\r\n[".to_string()
            };
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (handle, format!("http://{addr}"))
}

#[test]
fn truncated_league_body_keeps_matches_collected_so_far() {
    let good_body = r#"[{
        "commence_time": "2020-01-01T00:00:00Z",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "bookmakers": [{
            "title": "Pinnacle",
            "markets": [{
                "key": "h2h",
                "outcomes": [
                    { "name": "Arsenal", "price": 2.0 },
                    { "name": "Draw", "price": 3.0 },
                    { "name": "Chelsea", "price": 4.0 }
                ]
            }]
        }]
    }]"#
        .to_string();
    let (handle, base_url) = spawn_truncating_odds_server(good_body, SPORT_KEYS.len());

    let cfg = OddsApiConfig {
        api_key: Some("test-key".to_string()),
        regions: "eu".to_string(),
        window_hours: 48,
        base_url,
    };
    let batch = odds_api::fetch_live_odds(&cfg).expect("partial body failures are not terminal");

    // The first league parsed; every later league died mid-body and must be
    // recorded without throwing away what was already collected.
    assert_eq!(batch.matches.len(), 1);
    assert_eq!(batch.matches[0].home_team, "Arsenal");
    assert_eq!(batch.matches[0].status, MatchStatus::Live);
    assert_eq!(batch.errors.len(), SPORT_KEYS.len() - 1);

    handle.join().expect("stub server thread");
}

#[test]
fn reparsing_unchanged_input_yields_identical_batches() {
    let csv = read_fixture("results_e0.csv");
    let mut first = SourceBatch::default();
    let mut second = SourceBatch::default();
    football_data::parse_results_csv(&csv, "Premier League", &mut first);
    football_data::parse_results_csv(&csv, "Premier League", &mut second);

    assert_eq!(first.matches, second.matches);
    assert_eq!(first.completed, second.completed);
    assert_eq!(first.skipped_rows, second.skipped_rows);

    let stats_a = team_stats::fold_team_stats(&first.completed);
    let stats_b = team_stats::fold_team_stats(&second.completed);
    assert_eq!(stats_a.stats, stats_b.stats);
    assert_eq!(stats_a.summary, stats_b.summary);

    let events_a = collect_fixture_events();
    let events_b = collect_fixture_events();
    assert_eq!(events_a.matches, events_b.matches);
}

#[test]
fn results_fixture_margins_come_from_the_price_triple() {
    let mut batch = SourceBatch::default();
    football_data::parse_results_csv(&read_fixture("results_e0.csv"), "Premier League", &mut batch);

    // 1/1.45 + 1/4.50 + 1/7.50 = 1.0452, a 4.52% margin.
    let opener = &batch.matches[0];
    assert_eq!(opener.home_team, "Arsenal");
    assert_eq!(opener.quotes[0].margin_pct, 4.52);
}
