use std::collections::HashMap;

use rusqlite::Connection;
use scout_terminal::dataset::{
    init_schema, load_rows, parse_feed_json, upsert_rows, validate_score_catalog, PlayerRow,
};
use scout_terminal::roles::SCORE_CATALOG;

fn feed_row(name: &str, score: f64) -> PlayerRow {
    let mut metrics = HashMap::new();
    metrics.insert("Score Nine".to_string(), score);
    PlayerRow {
        player: name.to_string(),
        team: "Club".to_string(),
        season: "2025".to_string(),
        league: "LA LIGA".to_string(),
        league_category: Some("1".to_string()),
        nationality: Some("ESP".to_string()),
        position: Some("DC".to_string()),
        age: Some(24.0),
        height: Some(181.0),
        market_value: Some(8_000_000.0),
        minutes: Some(1980.0),
        contract_end: Some("2027".to_string()),
        metrics,
        percentiles: HashMap::new(),
    }
}

#[test]
fn store_round_trips_rows_in_insertion_order() {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();

    let rows = vec![feed_row("first", 10.0), feed_row("second", 20.0)];
    assert_eq!(upsert_rows(&mut conn, &rows).unwrap(), 2);

    let loaded = load_rows(&conn).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].player, "first");
    assert_eq!(loaded[1].player, "second");
    assert_eq!(loaded[0].metrics.get("Score Nine"), Some(&10.0));
    assert_eq!(loaded[0].nationality.as_deref(), Some("ESP"));
    assert_eq!(loaded[1].contract_end.as_deref(), Some("2027"));
}

#[test]
fn upsert_replaces_on_the_identity_key() {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();

    upsert_rows(&mut conn, &[feed_row("striker", 10.0)]).unwrap();
    let mut updated = feed_row("striker", 55.0);
    updated.minutes = Some(2500.0);
    upsert_rows(&mut conn, &[updated]).unwrap();

    let loaded = load_rows(&conn).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].metrics.get("Score Nine"), Some(&55.0));
    assert_eq!(loaded[0].minutes, Some(2500.0));
}

#[test]
fn feed_json_coerces_decorated_numbers() {
    let raw = r#"[{
        "player": "A",
        "team": "Club",
        "season": "2025",
        "league": "LA LIGA",
        "market_value": "8,000,000",
        "minutes": 1980,
        "age": "n/a",
        "metrics": {"Score Nine": "71.5", "Shots (ST_STRIKER)": null}
    }]"#;
    let rows = parse_feed_json(raw).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].market_value, Some(8_000_000.0));
    assert_eq!(rows[0].minutes, Some(1980.0));
    assert_eq!(rows[0].age, None);
    assert_eq!(rows[0].metrics.get("Score Nine"), Some(&71.5));
    assert!(!rows[0].metrics.contains_key("Shots (ST_STRIKER)"));
}

#[test]
fn catalog_validation_names_missing_columns() {
    let rows = vec![feed_row("a", 10.0)];
    let err = validate_score_catalog(&rows).unwrap_err();
    let msg = err.to_string();
    // "Score Nine" is present; everything else in the catalog should be named.
    assert!(msg.contains("Score GK Total"));
    assert!(!msg.contains("Score Nine,"));
}

#[test]
fn catalog_validation_accepts_a_complete_feed() {
    // Spread the catalog across rows: presence anywhere in the feed counts.
    let rows: Vec<PlayerRow> = SCORE_CATALOG
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let mut row = feed_row(&format!("p{i}"), 10.0);
            row.metrics.insert(column.to_string(), 50.0);
            row
        })
        .collect();
    assert!(validate_score_catalog(&rows).is_ok());
}

#[test]
fn empty_feed_fails_validation() {
    assert!(validate_score_catalog(&[]).is_err());
}
