use serde::{Deserialize, Serialize};

use crate::dataset::PlayerRow;

/// Downstream, non-recomputing filters over an already-scored pool. Minutes
/// is the one mandatory range; the others are optional. Empty member sets
/// mean "no restriction".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentFilter {
    pub minutes: (f64, f64),
    pub age: Option<(f64, f64)>,
    pub market_value: Option<(f64, f64)>,
    pub contract_ends: Vec<String>,
    pub nationalities: Vec<String>,
    pub teams: Vec<String>,
}

impl SegmentFilter {
    fn admits(&self, row: &PlayerRow) -> bool {
        // Minutes are always filtered; a row with no parsable minutes fails.
        let Some(minutes) = row.minutes else {
            return false;
        };
        if minutes < self.minutes.0 || minutes > self.minutes.1 {
            return false;
        }
        // Age and value ranges let missing values through so incomplete
        // records are not silently dropped.
        if let Some((lo, hi)) = self.age {
            if let Some(age) = row.age {
                if age < lo || age > hi {
                    return false;
                }
            }
        }
        if let Some((lo, hi)) = self.market_value {
            if let Some(value) = row.market_value {
                if value < lo || value > hi {
                    return false;
                }
            }
        }
        if !self.contract_ends.is_empty() {
            let Some(end) = row.contract_end.as_deref() else {
                return false;
            };
            if !self.contract_ends.iter().any(|c| c == end) {
                return false;
            }
        }
        if !self.nationalities.is_empty() {
            let Some(nat) = row.nationality.as_deref() else {
                return false;
            };
            if !self.nationalities.iter().any(|n| n == nat) {
                return false;
            }
        }
        if !self.teams.is_empty() && !self.teams.iter().any(|t| t == &row.team) {
            return false;
        }
        true
    }
}

/// Filter bounds derived from the CURRENT pool: slider min/max plus the
/// distinct option sets. Reset restores these, never the original dataset's.
#[derive(Debug, Clone, Default)]
pub struct FilterBounds {
    pub minutes: (f64, f64),
    pub age: Option<(f64, f64)>,
    pub market_value: Option<(f64, f64)>,
    pub contract_ends: Vec<String>,
    pub nationalities: Vec<String>,
    pub teams: Vec<String>,
}

impl FilterBounds {
    pub fn from_pool(pool: &[PlayerRow]) -> Self {
        FilterBounds {
            minutes: range_of(pool.iter().filter_map(|r| r.minutes)).unwrap_or((0.0, 0.0)),
            age: range_of(pool.iter().filter_map(|r| r.age)),
            market_value: range_of(pool.iter().filter_map(|r| r.market_value)),
            contract_ends: options_of(pool.iter().filter_map(|r| r.contract_end.as_deref())),
            nationalities: options_of(pool.iter().filter_map(|r| r.nationality.as_deref())),
            teams: options_of(pool.iter().map(|r| r.team.as_str())),
        }
    }

    /// A filter that admits the entire pool: full ranges, empty member sets.
    pub fn reset_filter(&self) -> SegmentFilter {
        SegmentFilter {
            minutes: self.minutes,
            age: self.age,
            market_value: self.market_value,
            contract_ends: Vec::new(),
            nationalities: Vec::new(),
            teams: Vec::new(),
        }
    }
}

fn range_of(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for v in values {
        range = Some(match range {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    range
}

fn options_of<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values.map(str::to_string).collect();
    out.sort();
    out.dedup();
    out
}

/// Pure filter pass: no new columns, no percentile recomputation, pool order
/// preserved.
pub fn segment(pool: &[PlayerRow], filter: &SegmentFilter) -> Vec<PlayerRow> {
    pool.iter()
        .filter(|row| filter.admits(row))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(minutes: Option<f64>, age: Option<f64>, nationality: Option<&str>) -> PlayerRow {
        PlayerRow {
            player: "P".to_string(),
            team: "T".to_string(),
            season: "2025".to_string(),
            league: "L".to_string(),
            league_category: None,
            nationality: nationality.map(str::to_string),
            position: Some("DC".to_string()),
            age,
            height: None,
            market_value: None,
            minutes,
            contract_end: None,
            metrics: HashMap::new(),
            percentiles: HashMap::new(),
        }
    }

    #[test]
    fn minutes_filter_is_mandatory_and_drops_missing() {
        let pool = vec![row(Some(500.0), None, None), row(None, None, None)];
        let bounds = FilterBounds::from_pool(&pool);
        let filtered = segment(&pool, &bounds.reset_filter());
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn age_range_passes_missing_values() {
        let pool = vec![
            row(Some(500.0), Some(31.0), None),
            row(Some(500.0), None, None),
            row(Some(500.0), Some(19.0), None),
        ];
        let bounds = FilterBounds::from_pool(&pool);
        let mut filter = bounds.reset_filter();
        filter.age = Some((18.0, 23.0));
        let filtered = segment(&pool, &filter);
        // The 31-year-old is out; the ageless row passes.
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().any(|r| r.age.is_none()));
    }

    #[test]
    fn nationality_set_restricts_and_excludes_missing() {
        let pool = vec![
            row(Some(500.0), None, Some("ESP")),
            row(Some(500.0), None, Some("ARG")),
            row(Some(500.0), None, None),
        ];
        let bounds = FilterBounds::from_pool(&pool);
        let mut filter = bounds.reset_filter();
        filter.nationalities = vec!["ESP".to_string()];
        let filtered = segment(&pool, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].nationality.as_deref(), Some("ESP"));
    }

    #[test]
    fn bounds_come_from_the_given_pool() {
        let pool = vec![
            row(Some(300.0), Some(20.0), Some("ESP")),
            row(Some(2800.0), Some(34.0), Some("FRA")),
        ];
        let bounds = FilterBounds::from_pool(&pool);
        assert_eq!(bounds.minutes, (300.0, 2800.0));
        assert_eq!(bounds.age, Some((20.0, 34.0)));
        assert_eq!(bounds.nationalities, vec!["ESP", "FRA"]);
    }
}
