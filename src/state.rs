use std::collections::VecDeque;

use crate::dataset::PlayerRow;
use crate::persist::SessionCache;
use crate::pool::{self, PoolScope};
use crate::rankings::{self, SlotRanking};
use crate::roles::Slot;
use crate::segment::{self, FilterBounds, SegmentFilter};

pub const MINUTES_STEP: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Board,
    Pitch,
}

/// Session-owned state: the dataset, the current percentile pool and the
/// segmentation applied on top of it.
///
/// Scope selections (season/category/league) are staged: they only take
/// effect when `rebuild_pool` runs, which swaps in a fully built pool,
/// re-derives filter bounds from it and resets the segmentation. Until then
/// the board keeps showing the previous pool, so percentile meaning never
/// shifts under the user while they explore sub-segments.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Vec<PlayerRow>,

    // Staged scope selections. A `None` index means "no restriction".
    pub seasons: Vec<String>,
    pub season_idx: usize,
    pub categories: Vec<String>,
    pub category_idx: Option<usize>,
    pub leagues: Vec<String>,
    pub league_idx: Option<usize>,

    // Published pool state, replaced wholesale by rebuild_pool.
    pub pool: Vec<PlayerRow>,
    pub pool_scope: PoolScope,
    pub bounds: FilterBounds,
    pub filter: SegmentFilter,

    pub screen: Screen,
    pub slot_idx: usize,
    pub scroll: usize,
    pub top_n: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(dataset: Vec<PlayerRow>) -> Self {
        let top_n = std::env::var("SCOUT_TOP_N")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(10)
            .clamp(1, 50);

        let mut seasons: Vec<String> = dataset.iter().map(|r| r.season.clone()).collect();
        seasons.sort();
        seasons.dedup();
        let season_idx = seasons
            .iter()
            .position(|s| s == "2025")
            .unwrap_or(seasons.len().saturating_sub(1));

        let mut state = AppState {
            dataset,
            seasons,
            season_idx,
            categories: Vec::new(),
            category_idx: None,
            leagues: Vec::new(),
            league_idx: None,
            pool: Vec::new(),
            pool_scope: PoolScope::default(),
            bounds: FilterBounds::default(),
            filter: FilterBounds::default().reset_filter(),
            screen: Screen::Board,
            slot_idx: 0,
            scroll: 0,
            top_n,
            help_overlay: false,
            logs: VecDeque::new(),
        };
        state.refresh_scope_options();
        state.league_idx = state.default_league_idx();
        state.rebuild_pool();
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }

    pub fn selected_season(&self) -> Option<&str> {
        self.seasons.get(self.season_idx).map(String::as_str)
    }

    pub fn selected_slot(&self) -> Slot {
        Slot::ALL[self.slot_idx.min(Slot::ALL.len() - 1)]
    }

    /// Category and league options are scoped to the staged season.
    fn refresh_scope_options(&mut self) {
        let Some(season) = self.selected_season().map(str::to_string) else {
            self.categories.clear();
            self.leagues.clear();
            self.category_idx = None;
            self.league_idx = None;
            return;
        };
        let mut categories: Vec<String> = self
            .dataset
            .iter()
            .filter(|r| r.season == season)
            .filter_map(|r| r.league_category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        let mut leagues: Vec<String> = self
            .dataset
            .iter()
            .filter(|r| r.season == season)
            .map(|r| r.league.clone())
            .collect();
        leagues.sort();
        leagues.dedup();
        self.categories = categories;
        self.leagues = leagues;
        self.category_idx = None;
        self.league_idx = None;
    }

    fn default_league_idx(&self) -> Option<usize> {
        if self.leagues.is_empty() {
            return None;
        }
        let laliga = self.leagues.iter().position(|name| {
            let upper = name.to_uppercase();
            upper.contains("LA LIGA") || upper.contains("LALIGA")
        });
        laliga.or(Some(0))
    }

    pub fn staged_scope(&self) -> PoolScope {
        PoolScope {
            season: self.selected_season().unwrap_or_default().to_string(),
            categories: self
                .category_idx
                .and_then(|i| self.categories.get(i))
                .map(|c| vec![c.clone()])
                .unwrap_or_default(),
            leagues: self
                .league_idx
                .and_then(|i| self.leagues.get(i))
                .map(|l| vec![l.clone()])
                .unwrap_or_default(),
        }
    }

    /// Builds the pool for the staged scope and publishes it atomically:
    /// pool, bounds and a fresh segmentation are replaced together.
    pub fn rebuild_pool(&mut self) {
        let scope = self.staged_scope();
        let pool = pool::build_pool(&self.dataset, &scope);
        let bounds = FilterBounds::from_pool(&pool);
        self.filter = bounds.reset_filter();
        self.bounds = bounds;
        self.pool_scope = scope;
        self.scroll = 0;
        let n = pool.len();
        self.pool = pool;
        if n == 0 {
            self.push_log(format!(
                "[WARN] No data for {} | {}",
                self.pool_scope.season,
                self.pool_scope.league_label()
            ));
        } else {
            self.push_log(format!(
                "[INFO] Pool rebuilt: {} | {} | {} players",
                self.pool_scope.season,
                self.pool_scope.league_label(),
                n
            ));
        }
    }

    pub fn segmented(&self) -> Vec<PlayerRow> {
        segment::segment(&self.pool, &self.filter)
    }

    pub fn slot_rankings(&self) -> Vec<SlotRanking> {
        rankings::rank_slots(&self.segmented())
    }

    pub fn cycle_season(&mut self) {
        if self.seasons.is_empty() {
            return;
        }
        self.season_idx = (self.season_idx + 1) % self.seasons.len();
        self.refresh_scope_options();
        self.league_idx = self.default_league_idx();
        self.log_staged();
    }

    pub fn cycle_category(&mut self) {
        self.category_idx = cycle_option(self.category_idx, self.categories.len());
        self.log_staged();
    }

    pub fn cycle_league(&mut self) {
        self.league_idx = cycle_option(self.league_idx, self.leagues.len());
        self.log_staged();
    }

    fn log_staged(&mut self) {
        let scope = self.staged_scope();
        self.push_log(format!(
            "[INFO] Scope staged: {} | {} (press r to rebuild pool)",
            scope.season,
            scope.league_label()
        ));
    }

    pub fn adjust_minutes_floor(&mut self, delta: f64) {
        let (lo, hi) = self.filter.minutes;
        let lo = (lo + delta).clamp(self.bounds.minutes.0, hi);
        self.filter.minutes = (lo, hi);
    }

    pub fn adjust_minutes_ceiling(&mut self, delta: f64) {
        let (lo, hi) = self.filter.minutes;
        let hi = (hi + delta).clamp(lo, self.bounds.minutes.1);
        self.filter.minutes = (lo, hi);
    }

    pub fn adjust_age_ceiling(&mut self, delta: f64) {
        let (Some((blo, bhi)), Some((lo, hi))) = (self.bounds.age, self.filter.age) else {
            return;
        };
        let hi = (hi + delta).clamp(lo.max(blo), bhi);
        self.filter.age = Some((lo, hi));
    }

    pub fn adjust_value_ceiling(&mut self, delta: f64) {
        let (Some((blo, bhi)), Some((lo, hi))) =
            (self.bounds.market_value, self.filter.market_value)
        else {
            return;
        };
        let hi = (hi + delta).clamp(lo.max(blo), bhi);
        self.filter.market_value = Some((lo, hi));
    }

    pub fn cycle_nationality(&mut self) {
        self.filter.nationalities =
            cycle_member(&self.filter.nationalities, &self.bounds.nationalities);
    }

    pub fn cycle_team(&mut self) {
        self.filter.teams = cycle_member(&self.filter.teams, &self.bounds.teams);
    }

    pub fn cycle_contract_end(&mut self) {
        self.filter.contract_ends =
            cycle_member(&self.filter.contract_ends, &self.bounds.contract_ends);
    }

    /// Restores every bound from the CURRENT pool, not the original dataset.
    pub fn reset_filters(&mut self) {
        self.filter = self.bounds.reset_filter();
        self.push_log("[INFO] Segmentation filters reset to pool bounds");
    }

    pub fn select_next_slot(&mut self) {
        self.slot_idx = (self.slot_idx + 1) % Slot::ALL.len();
        self.scroll = 0;
    }

    pub fn select_prev_slot(&mut self) {
        self.slot_idx = (self.slot_idx + Slot::ALL.len() - 1) % Slot::ALL.len();
        self.scroll = 0;
    }

    pub fn session(&self) -> SessionCache {
        SessionCache::new(self.pool_scope.clone(), self.filter.clone(), self.top_n)
    }

    /// Re-applies a saved session where it still fits the dataset: an unknown
    /// season is ignored, and the saved segmentation is clamped into the
    /// rebuilt pool's bounds.
    pub fn restore_session(&mut self, session: &SessionCache) {
        let Some(season_idx) = self.seasons.iter().position(|s| *s == session.scope.season)
        else {
            return;
        };
        self.season_idx = season_idx;
        self.refresh_scope_options();
        self.category_idx = session
            .scope
            .categories
            .first()
            .and_then(|c| self.categories.iter().position(|o| o == c));
        self.league_idx = session
            .scope
            .leagues
            .first()
            .and_then(|l| self.leagues.iter().position(|o| o == l));
        self.rebuild_pool();

        if let Some(top_n) = session.top_n {
            self.top_n = top_n.clamp(1, 50);
        }
        if let Some(saved) = &session.filter {
            let mut filter = self.bounds.reset_filter();
            filter.minutes = clamp_range(saved.minutes, self.bounds.minutes);
            if let (Some(saved_age), Some(bound)) = (saved.age, self.bounds.age) {
                filter.age = Some(clamp_range(saved_age, bound));
            }
            if let (Some(saved_value), Some(bound)) = (saved.market_value, self.bounds.market_value)
            {
                filter.market_value = Some(clamp_range(saved_value, bound));
            }
            filter.nationalities = retain_known(&saved.nationalities, &self.bounds.nationalities);
            filter.teams = retain_known(&saved.teams, &self.bounds.teams);
            filter.contract_ends = retain_known(&saved.contract_ends, &self.bounds.contract_ends);
            self.filter = filter;
            self.push_log("[INFO] Restored previous session scope and filters");
        }
    }
}

fn cycle_option(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        None => Some(0),
        Some(i) if i + 1 < len => Some(i + 1),
        Some(_) => None,
    }
}

fn cycle_member(current: &[String], options: &[String]) -> Vec<String> {
    if options.is_empty() {
        return Vec::new();
    }
    let next = match current.first() {
        None => Some(0),
        Some(value) => match options.iter().position(|o| o == value) {
            Some(i) if i + 1 < options.len() => Some(i + 1),
            _ => None,
        },
    };
    next.map(|i| vec![options[i].clone()]).unwrap_or_default()
}

fn clamp_range(saved: (f64, f64), bound: (f64, f64)) -> (f64, f64) {
    let lo = saved.0.clamp(bound.0, bound.1);
    let hi = saved.1.clamp(lo, bound.1);
    (lo, hi)
}

fn retain_known(saved: &[String], options: &[String]) -> Vec<String> {
    saved
        .iter()
        .filter(|value| options.contains(value))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data;

    fn state() -> AppState {
        AppState::new(sample_data::generate(400))
    }

    #[test]
    fn defaults_prefer_latest_scoped_season() {
        let s = state();
        assert_eq!(s.selected_season(), Some("2025"));
        assert!(s.league_idx.is_some());
    }

    #[test]
    fn staged_scope_only_applies_on_rebuild() {
        let mut s = state();
        let before = s.pool_scope.clone();
        s.cycle_season();
        assert_eq!(s.pool_scope, before);
        s.rebuild_pool();
        assert_ne!(s.pool_scope.season, before.season);
    }

    #[test]
    fn rebuild_resets_segmentation_to_new_bounds() {
        let mut s = state();
        s.filter.minutes.0 = s.bounds.minutes.1;
        s.rebuild_pool();
        assert_eq!(s.filter.minutes, s.bounds.minutes);
    }

    #[test]
    fn restore_clamps_saved_filter_into_pool_bounds() {
        let mut s = state();
        let mut saved = s.session();
        if let Some(filter) = saved.filter.as_mut() {
            filter.minutes = (-5000.0, 1e9);
            filter.nationalities = vec!["NOWHERE".to_string()];
        }
        s.restore_session(&saved);
        assert_eq!(s.filter.minutes, s.bounds.minutes);
        assert!(s.filter.nationalities.is_empty());
    }

    #[test]
    fn member_cycle_walks_options_then_clears() {
        let options = vec!["A".to_string(), "B".to_string()];
        let step1 = cycle_member(&[], &options);
        assert_eq!(step1, vec!["A"]);
        let step2 = cycle_member(&step1, &options);
        assert_eq!(step2, vec!["B"]);
        assert!(cycle_member(&step2, &options).is_empty());
    }
}
