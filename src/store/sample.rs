//! Deterministic sample dataset.
//!
//! Used when no data source is configured. Every catalog region gets one
//! record per sample year; figures drift upwards from the 2020 baseline.

use crate::models::{RegionCatalog, VitalRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Years generated by default.
pub const DEFAULT_SAMPLE_YEARS: [i32; 5] = [2020, 2021, 2022, 2023, 2024];

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 2024;

/// Year the growth multiplier is anchored to.
const BASE_YEAR: i32 = 2020;

/// Generate one record per (region, year), region-major, in catalog order.
///
/// The same catalog, years and seed always produce the same records.
pub fn sample_records(catalog: &RegionCatalog, years: &[i32], seed: u64) -> Vec<VitalRecord> {
    let mut years: Vec<i32> = years.to_vec();
    years.sort_unstable();
    years.dedup();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(catalog.len() * years.len());

    for region in catalog.names() {
        for &year in &years {
            let base_births: u64 = rng.random_range(5_000..25_000);
            let death_share: f64 = rng.random_range(0.1..0.4);
            let growth: f64 = rng.random_range(0.01..0.06);

            let multiplier = (1.0 + (year - BASE_YEAR) as f64 * growth).max(0.0);
            let base_deaths = (base_births as f64 * death_share).floor();

            records.push(VitalRecord::new(
                year,
                region.clone(),
                (base_births as f64 * multiplier).floor() as u64,
                (base_deaths * multiplier).floor() as u64,
            ));
        }
    }

    records
}
