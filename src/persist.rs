use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pool::PoolScope;
use crate::segment::SegmentFilter;

const CACHE_DIR: &str = "scout_terminal";
const SESSION_FILE: &str = "session.json";
const SESSION_VERSION: u32 = 1;

/// Last selected scope and segmentation, restored on startup. The pool itself
/// is recomputed from the dataset; only the selections are worth keeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCache {
    version: u32,
    pub scope: PoolScope,
    #[serde(default)]
    pub filter: Option<SegmentFilter>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl SessionCache {
    pub fn new(scope: PoolScope, filter: SegmentFilter, top_n: usize) -> Self {
        SessionCache {
            version: SESSION_VERSION,
            scope,
            filter: Some(filter),
            top_n: Some(top_n),
        }
    }
}

pub fn load_session() -> Option<SessionCache> {
    let path = session_path()?;
    let raw = fs::read_to_string(path).ok()?;
    let session = serde_json::from_str::<SessionCache>(&raw).ok()?;
    if session.version != SESSION_VERSION {
        return None;
    }
    Some(session)
}

pub fn save_session(session: &SessionCache) -> Result<()> {
    let Some(path) = session_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(session).context("serialize session")?;
    fs::write(&tmp, json).context("write session")?;
    fs::rename(&tmp, &path).context("swap session")?;
    Ok(())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn session_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(SESSION_FILE))
}
