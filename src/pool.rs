use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::PlayerRow;
use crate::percentile::{self, DEFAULT_STEP};
use crate::roles::{RoleGroup, position_matches};

/// Comparison-pool scope. Season is exact; empty category/league selections
/// mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolScope {
    pub season: String,
    pub categories: Vec<String>,
    pub leagues: Vec<String>,
}

impl PoolScope {
    pub fn season(season: impl Into<String>) -> Self {
        PoolScope {
            season: season.into(),
            categories: Vec::new(),
            leagues: Vec::new(),
        }
    }

    fn admits(&self, row: &PlayerRow) -> bool {
        if row.season != self.season {
            return false;
        }
        if !self.categories.is_empty() {
            let Some(category) = row.league_category.as_deref() else {
                return false;
            };
            if !self.categories.iter().any(|c| c == category) {
                return false;
            }
        }
        if !self.leagues.is_empty() && !self.leagues.iter().any(|l| l == &row.league) {
            return false;
        }
        true
    }

    pub fn league_label(&self) -> String {
        if self.leagues.is_empty() {
            "All leagues (season pool)".to_string()
        } else {
            self.leagues.join(", ")
        }
    }
}

/// Builds the percentile-scored pool for one scope.
///
/// Scoped rows keep their dataset order. Each role group's subset gets its own
/// percentile pass over that group's score columns; groups are disjoint column
/// families, so a multi-position row can carry percentiles from every group it
/// matches, each computed against that group's pool. An empty scope yields an
/// empty pool, not an error.
pub fn build_pool(dataset: &[PlayerRow], scope: &PoolScope) -> Vec<PlayerRow> {
    let mut scoped: Vec<PlayerRow> = dataset
        .iter()
        .filter(|row| scope.admits(row))
        .cloned()
        .collect();
    if scoped.is_empty() {
        return scoped;
    }

    // Role-group passes are independent; fan out, then merge patches by row
    // index so output rows stay aligned with the scoped subset.
    let patches: Vec<percentile::PercentilePatch> = RoleGroup::ALL
        .par_iter()
        .flat_map_iter(|group| {
            let subset: Vec<usize> = scoped
                .iter()
                .enumerate()
                .filter(|(_, row)| position_matches(row.position.as_deref(), group.codes()))
                .map(|(idx, _)| idx)
                .collect();
            percentile::compute_percentiles(&scoped, &subset, group.score_columns(), DEFAULT_STEP)
        })
        .collect();

    for (idx, column, pct) in patches {
        scoped[idx].percentiles.insert(column.to_string(), pct);
    }
    scoped
}
