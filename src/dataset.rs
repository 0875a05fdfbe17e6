use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::roles::SCORE_CATALOG;

pub mod col {
    pub const SEASON: &str = "Season";
    pub const LEAGUE: &str = "League";
    pub const LEAGUE_CATEGORY: &str = "League category";
    pub const PLAYER: &str = "Player";
    pub const POS: &str = "Pos";
    pub const TEAM: &str = "Team";
    pub const AGE: &str = "Age";
    pub const NATIONALITY: &str = "Nationality";
    pub const HEIGHT: &str = "Height";
    pub const MARKET_VALUE: &str = "Market value";
    pub const MINUTES: &str = "Minutes played";
    pub const CONTRACT_END: &str = "Contract ends";
}

/// Name of the derived percentile column for a source score column.
pub fn percentile_column(score_column: &str) -> String {
    format!("Percentile {score_column}")
}

/// One player-season-competition snapshot. Fixed identity/demographic fields
/// plus the open-ended metric catalog ("Score <Role> <Facet>" composites and
/// raw "<Metric> (<FACET_CODE>)" columns). Percentiles are derived per pool
/// and keyed by the source score column name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRow {
    pub player: String,
    pub team: String,
    pub season: String,
    pub league: String,
    #[serde(default)]
    pub league_category: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub minutes: Option<f64>,
    // Kept as text: the producer mixes dates, years and blanks here.
    #[serde(default)]
    pub contract_end: Option<String>,
    #[serde(default)]
    pub metrics: HashMap<String, f64>,
    #[serde(skip)]
    pub percentiles: HashMap<String, u8>,
}

impl PlayerRow {
    pub fn metric(&self, column: &str) -> Option<f64> {
        self.metrics.get(column).copied()
    }

    pub fn percentile(&self, score_column: &str) -> Option<u8> {
        self.percentiles.get(score_column).copied()
    }

    /// Whether a named column resolves for this row. Percentile columns are
    /// addressed as "Percentile <score column>".
    pub fn has_column(&self, column: &str) -> bool {
        self.display_value(column).is_some()
    }

    /// Single column contract shared by leaderboards, export and the UI.
    pub fn display_value(&self, column: &str) -> Option<String> {
        match column {
            col::SEASON => Some(self.season.clone()),
            col::LEAGUE => Some(self.league.clone()),
            col::LEAGUE_CATEGORY => self.league_category.clone(),
            col::PLAYER => Some(self.player.clone()),
            col::POS => self.position.clone(),
            col::TEAM => Some(self.team.clone()),
            col::NATIONALITY => self.nationality.clone(),
            col::CONTRACT_END => self.contract_end.clone(),
            col::AGE => self.age.map(format_number),
            col::HEIGHT => self.height.map(format_number),
            col::MARKET_VALUE => self.market_value.map(format_number),
            col::MINUTES => self.minutes.map(format_number),
            _ => {
                if let Some(source) = column.strip_prefix("Percentile ") {
                    return self.percentile(source).map(|p| p.to_string());
                }
                self.metric(column).map(format_number)
            }
        }
    }
}

fn format_number(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

// ---------------------------------------------------------------------------
// Producer feed (JSON export from the upstream data pipeline)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FeedRow {
    player: String,
    team: String,
    season: String,
    league: String,
    #[serde(default)]
    league_category: Option<String>,
    #[serde(default)]
    nationality: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    age: Option<Value>,
    #[serde(default)]
    height: Option<Value>,
    #[serde(default)]
    market_value: Option<Value>,
    #[serde(default)]
    minutes: Option<Value>,
    #[serde(default)]
    contract_end: Option<String>,
    #[serde(default)]
    metrics: HashMap<String, Value>,
}

pub fn parse_feed_json(raw: &str) -> Result<Vec<PlayerRow>> {
    let feed: Vec<FeedRow> = serde_json::from_str(raw).context("parse player feed json")?;
    Ok(feed.into_iter().map(feed_row_to_player).collect())
}

fn feed_row_to_player(row: FeedRow) -> PlayerRow {
    let metrics = row
        .metrics
        .into_iter()
        .filter_map(|(name, value)| coerce_number(&value).map(|v| (name, v)))
        .collect();
    PlayerRow {
        player: row.player,
        team: row.team,
        season: row.season,
        league: row.league,
        league_category: row.league_category,
        nationality: row.nationality,
        position: row.position,
        age: row.age.as_ref().and_then(coerce_number),
        height: row.height.as_ref().and_then(coerce_number),
        market_value: row.market_value.as_ref().and_then(coerce_number),
        minutes: row.minutes.as_ref().and_then(coerce_number),
        contract_end: row.contract_end,
        metrics,
        percentiles: HashMap::new(),
    }
}

/// Numeric coercion for feed cells: numbers pass through, numeric-looking
/// strings are cleaned and parsed, everything else counts as missing.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == ',')
        .collect();
    let cleaned = cleaned.replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Ingest-time check of the producer's column contract: every cataloged score
/// column must show up in at least one row. A rename upstream should fail
/// here, listing the missing columns, rather than silently vanish from every
/// leaderboard.
pub fn validate_score_catalog(rows: &[PlayerRow]) -> Result<()> {
    if rows.is_empty() {
        return Err(anyhow!("feed contains no rows"));
    }
    let missing: Vec<&str> = SCORE_CATALOG
        .iter()
        .filter(|column| !rows.iter().any(|row| row.metrics.contains_key(**column)))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "score columns missing from every feed row (renamed upstream?): {}",
            missing.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Local sqlite store
// ---------------------------------------------------------------------------

pub fn default_db_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SCOUT_DB") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    crate::persist::app_cache_dir().map(|dir| dir.join("player_seasons.sqlite"))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS player_seasons (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            season TEXT NOT NULL,
            league TEXT NOT NULL,
            league_category TEXT NULL,
            player TEXT NOT NULL,
            team TEXT NOT NULL,
            nationality TEXT NULL,
            pos TEXT NULL,
            age REAL NULL,
            height REAL NULL,
            market_value REAL NULL,
            minutes REAL NULL,
            contract_end TEXT NULL,
            metrics_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(season, league, player, team)
        );
        CREATE INDEX IF NOT EXISTS idx_player_seasons_season ON player_seasons(season);
        CREATE INDEX IF NOT EXISTS idx_player_seasons_league ON player_seasons(league);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn upsert_rows(conn: &mut Connection, rows: &[PlayerRow]) -> Result<usize> {
    let tx = conn.transaction().context("begin ingest transaction")?;
    let mut upserted = 0usize;
    for row in rows {
        upsert_row(&tx, row)?;
        upserted += 1;
    }
    tx.commit().context("commit ingest transaction")?;
    Ok(upserted)
}

fn upsert_row(tx: &rusqlite::Transaction<'_>, row: &PlayerRow) -> Result<()> {
    let metrics_json =
        serde_json::to_string(&row.metrics).context("serialize metrics for sqlite")?;
    let updated_at = Utc::now().to_rfc3339();
    tx.execute(
        r#"
        INSERT INTO player_seasons (
            season, league, league_category, player, team,
            nationality, pos, age, height, market_value,
            minutes, contract_end, metrics_json, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5,
            ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14
        )
        ON CONFLICT(season, league, player, team) DO UPDATE SET
            league_category = excluded.league_category,
            nationality = excluded.nationality,
            pos = excluded.pos,
            age = excluded.age,
            height = excluded.height,
            market_value = excluded.market_value,
            minutes = excluded.minutes,
            contract_end = excluded.contract_end,
            metrics_json = excluded.metrics_json,
            updated_at = excluded.updated_at
        "#,
        params![
            row.season,
            row.league,
            row.league_category,
            row.player,
            row.team,
            row.nationality,
            row.position,
            row.age,
            row.height,
            row.market_value,
            row.minutes,
            row.contract_end,
            metrics_json,
            updated_at,
        ],
    )
    .with_context(|| format!("upsert player row {} {}", row.player, row.season))?;
    Ok(())
}

/// Loads the full dataset in insertion order. Row order is the tie-break for
/// every stable sort downstream, so it must not depend on query planning.
pub fn load_rows(conn: &Connection) -> Result<Vec<PlayerRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT season, league, league_category, player, team,
                    nationality, pos, age, height, market_value,
                    minutes, contract_end, metrics_json
             FROM player_seasons
             ORDER BY row_id",
        )
        .context("prepare player load")?;
    let rows = stmt
        .query_map([], |r| {
            let metrics_json: String = r.get(12)?;
            Ok(PlayerRow {
                season: r.get(0)?,
                league: r.get(1)?,
                league_category: r.get(2)?,
                player: r.get(3)?,
                team: r.get(4)?,
                nationality: r.get(5)?,
                position: r.get(6)?,
                age: r.get(7)?,
                height: r.get(8)?,
                market_value: r.get(9)?,
                minutes: r.get(10)?,
                contract_end: r.get(11)?,
                metrics: serde_json::from_str(&metrics_json).unwrap_or_default(),
                percentiles: HashMap::new(),
            })
        })
        .context("query player rows")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("read player row")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_cleans_decorations() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn display_value_resolves_percentile_columns() {
        let mut row = PlayerRow {
            player: "A".to_string(),
            team: "B".to_string(),
            season: "2025".to_string(),
            league: "L".to_string(),
            league_category: None,
            nationality: None,
            position: Some("POR".to_string()),
            age: None,
            height: None,
            market_value: None,
            minutes: Some(900.0),
            contract_end: None,
            metrics: HashMap::from([("Score GK Total".to_string(), 71.5)]),
            percentiles: HashMap::new(),
        };
        row.percentiles.insert("Score GK Total".to_string(), 85);
        assert_eq!(row.display_value("Score GK Total").as_deref(), Some("71.50"));
        assert_eq!(
            row.display_value("Percentile Score GK Total").as_deref(),
            Some("85")
        );
        assert_eq!(row.display_value("Percentile Score Nine"), None);
        assert_eq!(row.display_value(col::MINUTES).as_deref(), Some("900"));
    }
}
