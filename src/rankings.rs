use crate::dataset::{PlayerRow, col, percentile_column};
use crate::roles::{Slot, position_matches};

/// One slot's ranked subset plus the score column it was ordered by.
#[derive(Debug, Clone)]
pub struct SlotRanking {
    pub slot: Slot,
    pub primary_score: &'static str,
    pub rows: Vec<PlayerRow>,
}

/// Partitions a segmented pool into the eleven on-field slots and orders each
/// by its primary score. Empty subsets are valid and stay empty.
///
/// Centre backs are one shared pool: after sorting, even sorted indexes feed
/// the right slot and odd indexes the left. That split is a balancing
/// heuristic to fill two on-field slots from one ranked list, not a judgment
/// about which side anyone plays.
pub fn rank_slots(filtered: &[PlayerRow]) -> Vec<SlotRanking> {
    let cb_pool = sort_by_score(
        collect_matching(filtered, Slot::CentreBackRight.codes()),
        Slot::CentreBackRight.primary_score(),
    );
    let cb_right: Vec<PlayerRow> = cb_pool.iter().step_by(2).cloned().collect();
    let cb_left: Vec<PlayerRow> = cb_pool.iter().skip(1).step_by(2).cloned().collect();

    Slot::ALL
        .iter()
        .map(|&slot| {
            let rows = match slot {
                Slot::CentreBackLeft => cb_left.clone(),
                Slot::CentreBackRight => cb_right.clone(),
                _ => sort_by_score(collect_matching(filtered, slot.codes()), slot.primary_score()),
            };
            SlotRanking {
                slot,
                primary_score: slot.primary_score(),
                rows,
            }
        })
        .collect()
}

fn collect_matching(filtered: &[PlayerRow], codes: &[&str]) -> Vec<PlayerRow> {
    filtered
        .iter()
        .filter(|row| position_matches(row.position.as_deref(), codes))
        .cloned()
        .collect()
}

/// Descending stable sort by the raw score; rows missing the value go last.
/// If no row in the subset carries the raw column, the percentile column is
/// the backup key; if that is also absent everywhere, original order stands.
fn sort_by_score(mut rows: Vec<PlayerRow>, score_column: &str) -> Vec<PlayerRow> {
    if rows.iter().any(|row| row.metric(score_column).is_some()) {
        rows.sort_by(|a, b| {
            let av = a.metric(score_column).unwrap_or(f64::NEG_INFINITY);
            let bv = b.metric(score_column).unwrap_or(f64::NEG_INFINITY);
            bv.total_cmp(&av)
        });
    } else if rows.iter().any(|row| row.percentile(score_column).is_some()) {
        rows.sort_by(|a, b| {
            let av = a.percentile(score_column).map(i16::from).unwrap_or(-1);
            let bv = b.percentile(score_column).map(i16::from).unwrap_or(-1);
            bv.cmp(&av)
        });
    }
    rows
}

/// A presentation-ready table: ordered rows rendered as display cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// First `n` rows of an already-ranked subset, keeping the intersection of
/// the requested columns with the columns actually present. An empty subset
/// yields an empty table that still carries every requested header, so the
/// display contract stays uniform.
pub fn top_n(ranked: &[PlayerRow], n: usize, requested: &[String]) -> Leaderboard {
    let columns: Vec<String> = if ranked.is_empty() {
        requested.to_vec()
    } else {
        requested
            .iter()
            .filter(|column| ranked.iter().any(|row| row.has_column(column)))
            .cloned()
            .collect()
    };

    let rows = ranked
        .iter()
        .take(n)
        .map(|row| {
            columns
                .iter()
                .map(|column| row.display_value(column).unwrap_or_default())
                .collect()
        })
        .collect();

    Leaderboard { columns, rows }
}

/// Pitch-view rows: (player, team, percentile of the slot's primary score).
pub fn pitch_rows(ranking: &SlotRanking, n: usize) -> Vec<(String, String, Option<u8>)> {
    ranking
        .rows
        .iter()
        .take(n)
        .map(|row| {
            (
                row.player.clone(),
                row.team.clone(),
                row.percentile(ranking.primary_score),
            )
        })
        .collect()
}

/// Full display-column set for a slot's leaderboard: demographics, then the
/// group's score/percentile pairs, then the group's raw facet metrics.
pub fn display_columns(slot: Slot) -> Vec<String> {
    let mut columns: Vec<String> = [
        col::SEASON,
        col::LEAGUE,
        col::PLAYER,
        col::POS,
        col::TEAM,
        col::LEAGUE_CATEGORY,
        col::AGE,
        col::NATIONALITY,
        col::HEIGHT,
        col::MARKET_VALUE,
        col::MINUTES,
        col::CONTRACT_END,
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    for score in slot.group().score_columns() {
        columns.push(score.to_string());
        columns.push(percentile_column(score));
    }
    for metric in slot.group().metric_columns() {
        columns.push(metric.to_string());
    }
    columns
}

/// Compact column set that fits a terminal table.
pub fn board_columns(slot: Slot) -> Vec<String> {
    vec![
        col::PLAYER.to_string(),
        col::TEAM.to_string(),
        col::POS.to_string(),
        col::AGE.to_string(),
        col::MINUTES.to_string(),
        slot.primary_score().to_string(),
        percentile_column(slot.primary_score()),
    ]
}
