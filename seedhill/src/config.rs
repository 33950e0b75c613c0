//! Search ceilings, overridable through the environment.
//!
//! Unset, unparsable or zero values fall back to the compiled defaults.
//! Command-line flags take precedence over both.

use std::env;

use sh3_rng_core::constants::{
    MAX_BASE_SEEDS_DEFAULT, MAX_CLOCK_MATCHES_DEFAULT, MAX_CLOCK_WARMUP_DEFAULT,
    MAX_CODE_ADVANCES_DEFAULT, MAX_FIRST_OUTPUT_SEARCH_DEFAULT, MAX_SEED_PATH_STEPS_DEFAULT,
};

pub const DEFAULT_MAX_CODE_RESULTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchDefaults {
    pub max_code_advances: u32,
    pub max_clock_warmup: u32,
    pub max_first_output_search: u32,
    pub max_seed_distance: u64,
    pub max_code_results: usize,
    pub max_clock_results: usize,
    pub max_base_seeds: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_code_advances: MAX_CODE_ADVANCES_DEFAULT,
            max_clock_warmup: MAX_CLOCK_WARMUP_DEFAULT,
            max_first_output_search: MAX_FIRST_OUTPUT_SEARCH_DEFAULT,
            max_seed_distance: MAX_SEED_PATH_STEPS_DEFAULT,
            max_code_results: DEFAULT_MAX_CODE_RESULTS,
            max_clock_results: MAX_CLOCK_MATCHES_DEFAULT,
            max_base_seeds: MAX_BASE_SEEDS_DEFAULT,
        }
    }
}

impl SearchDefaults {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let loaded = Self {
            max_code_advances: read_env_u32("SEEDHILL_MAX_ADVANCES", defaults.max_code_advances),
            max_clock_warmup: read_env_u32("SEEDHILL_CLOCK_MAX_WARMUP", defaults.max_clock_warmup),
            max_first_output_search: read_env_u32(
                "SEEDHILL_FIRST_OUTPUT_MAX_SEARCH",
                defaults.max_first_output_search,
            ),
            max_seed_distance: read_env_u64("SEEDHILL_MAX_DISTANCE", defaults.max_seed_distance),
            max_code_results: read_env_usize("SEEDHILL_MAX_RESULTS", defaults.max_code_results),
            max_clock_results: read_env_usize(
                "SEEDHILL_CLOCK_MAX_RESULTS",
                defaults.max_clock_results,
            ),
            max_base_seeds: read_env_usize("SEEDHILL_MAX_BASE_SEEDS", defaults.max_base_seeds),
        };
        if loaded != defaults {
            tracing::debug!(?loaded, "search defaults overridden from environment");
        }
        loaded
    }
}

fn read_env<T: std::str::FromStr + PartialOrd + Default>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!("{name}={raw:?} is not a positive integer; using default");
            None
        }
    }
}

pub fn read_env_u32(name: &str, default: u32) -> u32 {
    read_env(name).unwrap_or(default)
}

pub fn read_env_u64(name: &str, default: u64) -> u64 {
    read_env(name).unwrap_or(default)
}

pub fn read_env_usize(name: &str, default: usize) -> usize {
    read_env(name).unwrap_or(default)
}
