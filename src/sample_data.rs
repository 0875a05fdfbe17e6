use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::PlayerRow;
use crate::roles::RoleGroup;

const SEASONS: [&str; 4] = ["2022", "2023", "2024", "2025"];

const LEAGUES: [(&str, &str); 5] = [
    ("LaLiga EA Sports", "First Division"),
    ("LaLiga Hypermotion", "Second Division"),
    ("Premier League", "First Division"),
    ("Serie A", "First Division"),
    ("Eredivisie", "First Division"),
];

const FIRST_NAMES: [&str; 16] = [
    "Iker", "Marco", "Jules", "Sergi", "Teun", "Nico", "Rodrigo", "Ander", "Luka", "Pedro",
    "Brais", "Timo", "Yeremy", "Oihan", "Dani", "Mats",
];

const LAST_NAMES: [&str; 16] = [
    "Serrano", "Keller", "Moreau", "Vidal", "Bakker", "Costa", "Lemos", "Urrutia", "Novak",
    "Fornals", "Mendes", "Richter", "Pino", "Zubeldia", "Rico", "de Vries",
];

const NATIONALITIES: [&str; 8] = ["ESP", "FRA", "NED", "GER", "ITA", "POR", "ARG", "BRA"];

const CONTRACT_ENDS: [&str; 5] = ["2026", "2027", "2028", "2029", "2030"];

/// Synthetic dataset used when no local store exists yet, and by the bench.
/// Seeded, so demo sessions and bench runs are reproducible.
pub fn generate(n: usize) -> Vec<PlayerRow> {
    generate_seeded(n, 26)
}

pub fn generate_seeded(n: usize, seed: u64) -> Vec<PlayerRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|i| random_row(&mut rng, i)).collect()
}

fn random_row(rng: &mut StdRng, i: usize) -> PlayerRow {
    let group = RoleGroup::ALL[rng.gen_range(0..RoleGroup::ALL.len())];
    let codes = group.codes();
    let mut position = codes[rng.gen_range(0..codes.len())].to_string();
    // A sprinkling of multi-position labels and numbered variants, like the
    // real feed.
    if rng.gen_bool(0.08) {
        let extra = codes[rng.gen_range(0..codes.len())];
        position = format!("{position} / {extra}");
    } else if rng.gen_bool(0.05) {
        position.push('1');
    }

    let (league, category) = LEAGUES[rng.gen_range(0..LEAGUES.len())];
    let season = SEASONS[rng.gen_range(0..SEASONS.len())];
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];

    let mut metrics: HashMap<String, f64> = HashMap::new();
    for column in group.score_columns() {
        // Composite scores arrive pre-computed upstream; a rough 0-100 spread
        // with occasional gaps is enough for the pipeline.
        if rng.gen_bool(0.97) {
            metrics.insert(column.to_string(), round2(rng.gen_range(20.0..98.0)));
        }
    }
    for column in group.metric_columns() {
        if rng.gen_bool(0.9) {
            metrics.insert(column.to_string(), round2(rng.gen_range(0.0..12.0)));
        }
    }

    PlayerRow {
        player: format!("{first} {last} {}", i + 1),
        team: format!("Club {}", rng.gen_range(1..=24)),
        season: season.to_string(),
        league: league.to_string(),
        league_category: Some(category.to_string()),
        nationality: Some(NATIONALITIES[rng.gen_range(0..NATIONALITIES.len())].to_string()),
        position: Some(position),
        age: Some(rng.gen_range(17..=38) as f64),
        height: Some(rng.gen_range(165..=200) as f64),
        market_value: Some((rng.gen_range(1..=800) * 100_000) as f64),
        minutes: if rng.gen_bool(0.98) {
            Some((rng.gen_range(0..=38) * 90) as f64)
        } else {
            None
        },
        contract_end: Some(CONTRACT_ENDS[rng.gen_range(0..CONTRACT_ENDS.len())].to_string()),
        metrics,
        percentiles: HashMap::new(),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_seeded(50, 7);
        let b = generate_seeded(50, 7);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.player, y.player);
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn rows_carry_their_group_scores() {
        let rows = generate_seeded(200, 1);
        let scored = rows.iter().filter(|r| !r.metrics.is_empty()).count();
        assert!(scored > 190);
    }
}
