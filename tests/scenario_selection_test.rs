//! Selection statistics across the shipped profile catalogs.
//!
//! Distribution checks draw tens of thousands of times from seeded RNGs,
//! so the tolerances are far wider than the expected sampling error.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use stampede_core::ScenarioKey;
use stampede_profiles::{endurance, load, spike};

#[test]
fn test_load_catalog_frequencies_track_declared_weights() {
    let definition = load::definition().unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    let draws = 100_000u32;
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for _ in 0..draws {
        let entry = definition.catalog.select(0, None, &mut rng);
        *counts.entry(entry.spec.key.name()).or_default() += 1;
    }

    // the declared weights sum to 100, so each share should sit close to
    // its weight expressed as a fraction
    for entry in definition.catalog.entries() {
        let expected = f64::from(entry.spec.base_weight) / 100.0;
        let observed = f64::from(counts[entry.spec.key.name()]) / f64::from(draws);
        assert!(
            (observed - expected).abs() < 0.01,
            "{}: observed {observed:.3}, expected {expected:.3}",
            entry.spec.key.name()
        );
    }
}

#[test]
fn test_spike_surge_window_flips_the_traffic_mix() {
    let definition = spike::definition().unwrap();
    let surge = definition.surge;
    let mut rng = StdRng::seed_from_u64(7);

    let mut burst_share_at = |minutes: u64| {
        let draws = 20_000u32;
        let mut burst = 0u32;
        for _ in 0..draws {
            let entry = definition.catalog.select(minutes, surge.as_ref(), &mut rng);
            if entry.spec.base_weight == 0 {
                burst += 1;
            }
        }
        f64::from(burst) / f64::from(draws)
    };

    // outside the window only the baseline scenarios are eligible
    assert_eq!(burst_share_at(0), 0.0);
    // inside it the baselines are zeroed and the whole budget moves to
    // the burst scenarios
    assert_eq!(burst_share_at(2), 1.0);
    assert_eq!(burst_share_at(6), 0.0);
}

#[test]
fn test_endurance_late_run_scenarios_unlock_over_time() {
    let definition = endurance::definition().unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    let mut share_of = |name: &str, minutes: u64| {
        let draws = 50_000u32;
        let mut hits = 0u32;
        for _ in 0..draws {
            let entry = definition.catalog.select(minutes, None, &mut rng);
            if entry.spec.key.name() == name {
                hits += 1;
            }
        }
        f64::from(hits) / f64::from(draws)
    };

    // locked until minute 11, then worth 10 of the 110 total weight
    assert_eq!(share_of("cache_warmup_activity", 5), 0.0);
    let unlocked = share_of("cache_warmup_activity", 15);
    assert!(
        (unlocked - 10.0 / 110.0).abs() < 0.01,
        "observed {unlocked:.3}"
    );

    // the memory patterns stay locked until minute 21
    assert_eq!(share_of("memory_stress_patterns", 15), 0.0);
    let late = share_of("memory_stress_patterns", 25);
    assert!((late - 10.0 / 120.0).abs() < 0.01, "observed {late:.3}");
}
