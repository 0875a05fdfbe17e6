use std::path::PathBuf;

use anyhow::{Context, Result};

use scout_terminal::dataset;

fn main() -> Result<()> {
    let feed_path = parse_feed_arg()
        .or_else(|| std::env::var("SCOUT_FEED").ok().map(PathBuf::from))
        .context("no feed given: pass a json path or set SCOUT_FEED")?;
    let db_path = parse_db_path_arg()
        .or_else(dataset::default_db_path)
        .context("unable to resolve sqlite path")?;

    let raw = std::fs::read_to_string(&feed_path)
        .with_context(|| format!("read feed {}", feed_path.display()))?;
    let rows = dataset::parse_feed_json(&raw)?;

    // Refuse partial catalogs up front so the board never renders with
    // silently missing score columns.
    dataset::validate_score_catalog(&rows)?;

    let mut conn = dataset::open_db(&db_path)?;
    let upserted = dataset::upsert_rows(&mut conn, &rows)?;

    println!("Player feed ingest complete");
    println!("Feed: {}", feed_path.display());
    println!("DB: {}", db_path.display());
    println!("Rows upserted: {upserted}/{}", rows.len());

    Ok(())
}

fn parse_feed_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--db" {
            skip_next = true;
            continue;
        }
        if !arg.starts_with("--") {
            return Some(PathBuf::from(arg));
        }
    }
    None
}

fn parse_db_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--db=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--db" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
