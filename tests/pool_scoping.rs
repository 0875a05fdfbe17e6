use std::collections::HashMap;

use scout_terminal::dataset::PlayerRow;
use scout_terminal::pool::{build_pool, PoolScope};

fn row(name: &str, season: &str, league: &str, position: &str) -> PlayerRow {
    PlayerRow {
        player: name.to_string(),
        team: "Club".to_string(),
        season: season.to_string(),
        league: league.to_string(),
        league_category: Some("1".to_string()),
        nationality: None,
        position: Some(position.to_string()),
        age: None,
        height: None,
        market_value: None,
        minutes: Some(1800.0),
        contract_end: None,
        metrics: HashMap::new(),
        percentiles: HashMap::new(),
    }
}

fn with_score(mut r: PlayerRow, column: &str, value: f64) -> PlayerRow {
    r.metrics.insert(column.to_string(), value);
    r
}

#[test]
fn keeper_pool_gets_quantized_percentiles() {
    let dataset = vec![
        with_score(row("low", "2025", "LA LIGA", "POR"), "Score GK Total", 40.0),
        with_score(row("mid", "2025", "LA LIGA", "POR"), "Score GK Total", 70.0),
        with_score(row("top", "2025", "LA LIGA", "POR"), "Score GK Total", 90.0),
    ];
    let pool = build_pool(&dataset, &PoolScope::season("2025"));
    // Three keepers: leq shares 1/3, 2/3, 3/3 -> 33, 67, 100 -> floored to
    // the step-5 buckets 30, 65, 100.
    assert_eq!(pool[0].percentile("Score GK Total"), Some(30));
    assert_eq!(pool[1].percentile("Score GK Total"), Some(65));
    assert_eq!(pool[2].percentile("Score GK Total"), Some(100));
}

#[test]
fn percentiles_stay_inside_the_role_group() {
    let dataset = vec![
        with_score(row("gk", "2025", "LA LIGA", "POR"), "Score GK Total", 90.0),
        with_score(row("st", "2025", "LA LIGA", "DC"), "Score Nine", 90.0),
    ];
    let pool = build_pool(&dataset, &PoolScope::season("2025"));
    // Each is alone in its group, so both rank at 100; neither carries the
    // other group's percentile columns.
    assert_eq!(pool[0].percentile("Score GK Total"), Some(100));
    assert_eq!(pool[0].percentile("Score Nine"), None);
    assert_eq!(pool[1].percentile("Score Nine"), Some(100));
    assert_eq!(pool[1].percentile("Score GK Total"), None);
}

#[test]
fn scope_excludes_other_seasons_and_leagues() {
    let dataset = vec![
        with_score(row("in", "2025", "LA LIGA", "POR"), "Score GK Total", 40.0),
        with_score(
            row("other_season", "2024", "LA LIGA", "POR"),
            "Score GK Total",
            99.0,
        ),
        with_score(
            row("other_league", "2025", "SERIE A", "POR"),
            "Score GK Total",
            99.0,
        ),
    ];
    let mut scope = PoolScope::season("2025");
    scope.leagues = vec!["LA LIGA".to_string()];
    let pool = build_pool(&dataset, &scope);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].player, "in");
    // Alone in the scoped pool, the 40 ranks at 100.
    assert_eq!(pool[0].percentile("Score GK Total"), Some(100));
}

#[test]
fn empty_scope_yields_an_empty_pool() {
    let dataset = vec![row("a", "2025", "LA LIGA", "POR")];
    let pool = build_pool(&dataset, &PoolScope::season("1999"));
    assert!(pool.is_empty());
}

#[test]
fn category_filter_drops_rows_without_a_category() {
    let mut uncategorized = row("nocat", "2025", "CUP", "POR");
    uncategorized.league_category = None;
    let dataset = vec![row("cat1", "2025", "LA LIGA", "POR"), uncategorized];
    let mut scope = PoolScope::season("2025");
    scope.categories = vec!["1".to_string()];
    let pool = build_pool(&dataset, &scope);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].player, "cat1");
}

#[test]
fn multi_position_row_ranks_in_every_matching_group() {
    let hybrid = with_score(
        with_score(
            row("hybrid", "2025", "LA LIGA", "LD / MC"),
            "Score Full Back Total",
            80.0,
        ),
        "Score Midfield Holding",
        60.0,
    );
    let dataset = vec![
        hybrid,
        with_score(
            row("fb", "2025", "LA LIGA", "LD"),
            "Score Full Back Total",
            70.0,
        ),
        with_score(
            row("mc", "2025", "LA LIGA", "MC"),
            "Score Midfield Holding",
            90.0,
        ),
    ];
    let pool = build_pool(&dataset, &PoolScope::season("2025"));
    // Against the two full backs the hybrid tops the list; against the two
    // midfielders it is the bottom half.
    assert_eq!(pool[0].percentile("Score Full Back Total"), Some(100));
    assert_eq!(pool[0].percentile("Score Midfield Holding"), Some(50));
}
