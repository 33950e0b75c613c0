//! Analytic recovery of clock base seeds on the PS2 backend.
//!
//! After `warmup` calls the clock reads `hour_state = next(w)` and
//! `minute_state = next(hour_state)`; on PS2 each output is the state itself.
//! Instead of scanning all 2^31 bases, walk the minute states congruent to
//! the target minute (stride 60), step back once to test the hour residue,
//! then step back once more and rewind the warmup. The step is a bijection,
//! so every candidate is exact.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::clock::HourMode;
use crate::constants::{HOURS_PER_CYCLE, MAX_BASE_SEEDS_DEFAULT, MINUTES_PER_HOUR, PS2_MODULUS};
use crate::error::SearchError;
use crate::inverse::Ps2Inverse;

#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: u64 = 1 << 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockBaseQuery {
    pub target_hour: u32,
    pub target_minute: u32,
    pub mode: HourMode,
    pub warmup_after_reset: u32,
    pub max_results: usize,
}

impl ClockBaseQuery {
    pub fn new(target_hour: u32, target_minute: u32, mode: HourMode, warmup_after_reset: u32) -> Self {
        Self {
            target_hour,
            target_minute,
            mode,
            warmup_after_reset,
            max_results: MAX_BASE_SEEDS_DEFAULT,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BaseSeedCandidate {
    /// State at the reset point, before the warmup.
    pub base_seed: u32,
    /// State after the warmup, right before the hour call.
    pub warmed_state: u32,
    pub hour_state: u32,
    pub minute_state: u32,
}

/// Every base seed (up to `max_results`) whose clock shows the target time
/// after `warmup_after_reset` calls, ascending by minute state.
pub fn find_clock_base_seeds(
    query: &ClockBaseQuery,
    inverse: &Ps2Inverse,
) -> Result<Vec<BaseSeedCandidate>, SearchError> {
    find_clock_base_seeds_below(query, inverse, PS2_MODULUS)
}

/// Same as [`find_clock_base_seeds`], restricted to minute states below `limit`.
pub fn find_clock_base_seeds_below(
    query: &ClockBaseQuery,
    inverse: &Ps2Inverse,
    limit: u64,
) -> Result<Vec<BaseSeedCandidate>, SearchError> {
    let residue = query
        .mode
        .residue_for(query.target_hour)
        .ok_or(SearchError::ResidueOutOfRange {
            hour: query.target_hour,
            mode: query.mode,
        })?;
    if query.max_results == 0 {
        return Ok(Vec::new());
    }

    let limit = limit.min(PS2_MODULUS);
    let stride = MINUTES_PER_HOUR as u64;
    let start = (query.target_minute % MINUTES_PER_HOUR) as u64;
    let count = if start >= limit {
        0
    } else {
        (limit - start).div_ceil(stride)
    };

    let warmup = query.warmup_after_reset;
    let evaluate = |k: u64| -> Option<BaseSeedCandidate> {
        let minute_state = (start + k * stride) as u32;
        let hour_state = inverse.previous_state(minute_state);
        if hour_state % HOURS_PER_CYCLE != residue {
            return None;
        }
        let warmed_state = inverse.previous_state(hour_state);
        Some(BaseSeedCandidate {
            base_seed: inverse.rewind(warmed_state, warmup),
            warmed_state,
            hour_state,
            minute_state,
        })
    };

    let candidates = collect_candidates(count, query.max_results, evaluate);
    tracing::debug!(
        hour = query.target_hour,
        minute = query.target_minute,
        mode = %query.mode,
        warmup,
        stride_candidates = count,
        found = candidates.len(),
        "clock base seed enumeration finished"
    );
    Ok(candidates)
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn collect_sequential<T>(count: u64, max_results: usize, evaluate: impl Fn(u64) -> Option<T>) -> Vec<T> {
    (0..count).filter_map(evaluate).take(max_results).collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_candidates<T>(count: u64, max_results: usize, evaluate: impl Fn(u64) -> Option<T>) -> Vec<T> {
    collect_sequential(count, max_results, evaluate)
}

/// Evaluates fixed-size chunks in parallel and appends them in order, so the
/// output is identical to the sequential walk.
#[cfg(feature = "parallel")]
fn collect_candidates<T: Send>(
    count: u64,
    max_results: usize,
    evaluate: impl Fn(u64) -> Option<T> + Sync + Send,
) -> Vec<T> {
    use rayon::prelude::*;

    let mut found = Vec::new();
    let mut chunk_start = 0u64;
    while chunk_start < count && found.len() < max_results {
        let chunk_end = (chunk_start + PARALLEL_CHUNK).min(count);
        let chunk: Vec<T> = (chunk_start..chunk_end)
            .into_par_iter()
            .filter_map(&evaluate)
            .collect();
        found.extend(chunk);
        chunk_start = chunk_end;
    }
    found.truncate(max_results);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{generate_clock, read_clock};
    use crate::rng::{Backend, GameRng};

    fn inverse() -> Ps2Inverse {
        Ps2Inverse::new().expect("PS2 multiplier is odd")
    }

    #[test]
    fn zero_minute_candidates_sit_on_multiples_of_sixty() {
        let query = ClockBaseQuery::new(1, 0, HourMode::TwelveHour, 0).with_max_results(25);
        let found = find_clock_base_seeds(&query, &inverse()).unwrap();
        assert_eq!(found.len(), 25);
        assert!(found.iter().all(|c| c.minute_state % 60 == 0));
        assert!(found.windows(2).all(|w| w[0].minute_state < w[1].minute_state));
    }

    #[test]
    fn candidates_reproduce_target_clock() {
        let inv = inverse();
        for (hour, minute, mode, warmup) in [
            (10, 46, HourMode::TwelveHour, 0),
            (12, 0, HourMode::TwelveHour, 3),
            (23, 59, HourMode::TwentyFourHour, 17),
            (12, 30, HourMode::TwentyFourHour, 250),
        ] {
            let query = ClockBaseQuery::new(hour, minute, mode, warmup).with_max_results(40);
            let found = find_clock_base_seeds(&query, &inv).unwrap();
            assert_eq!(found.len(), 40);
            for candidate in found {
                let reading = generate_clock(candidate.base_seed, warmup, mode, Backend::Ps2);
                assert_eq!((reading.hour, reading.minute), (hour, minute));
                assert_eq!(reading.minute_output, candidate.minute_state);
                assert_eq!(reading.hour_output, candidate.hour_state);
            }
        }
    }

    #[test]
    fn zero_seed_is_recovered() {
        // Seed 0 with no warmup reads 10:46 on the 12-hour path.
        let query = ClockBaseQuery::new(10, 46, HourMode::TwelveHour, 0).with_max_results(usize::MAX);
        let found = find_clock_base_seeds_below(&query, &inverse(), 0x53DC_167F).unwrap();
        let last = found.last().expect("0x53DC167E is within the limit");
        assert_eq!(last.minute_state, 0x53DC_167E);
        assert_eq!(last.base_seed, 0);
    }

    #[test]
    fn unreachable_hours_are_rejected() {
        let inv = inverse();
        for (hour, mode) in [
            (0, HourMode::TwelveHour),
            (13, HourMode::TwelveHour),
            (11, HourMode::TwentyFourHour),
            (24, HourMode::TwentyFourHour),
        ] {
            let query = ClockBaseQuery::new(hour, 0, mode, 0);
            assert_eq!(
                find_clock_base_seeds(&query, &inv),
                Err(SearchError::ResidueOutOfRange { hour, mode })
            );
        }
    }

    #[test]
    fn agrees_with_brute_force_below_limit() {
        let inv = inverse();
        let limit = 10_000u32;
        for (hour, minute, mode) in [
            (1, 0, HourMode::TwelveHour),
            (7, 33, HourMode::TwelveHour),
            (18, 5, HourMode::TwentyFourHour),
        ] {
            let query = ClockBaseQuery::new(hour, minute, mode, 0).with_max_results(usize::MAX);
            let analytic: Vec<u32> = find_clock_base_seeds_below(&query, &inv, u64::from(limit))
                .unwrap()
                .into_iter()
                .map(|c| c.base_seed)
                .collect();

            let brute: Vec<u32> = (0..limit)
                .map(|minute_state| inv.rewind(minute_state, 2))
                .filter(|&base| {
                    let mut rng = GameRng::new(base, Backend::Ps2);
                    let reading = read_clock(&mut rng, mode);
                    reading.hour == hour && reading.minute == minute
                })
                .collect();

            assert!(!analytic.is_empty());
            assert_eq!(analytic, brute, "{hour}:{minute:02} {mode}");
        }
    }

    #[test]
    fn zero_max_results_is_empty() {
        let query = ClockBaseQuery::new(5, 5, HourMode::TwelveHour, 0).with_max_results(0);
        assert!(find_clock_base_seeds(&query, &inverse()).unwrap().is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_collection_preserves_order() {
        let evaluate = |k: u64| (k % 7 == 3).then_some(k);
        let count = PARALLEL_CHUNK * 3 + 11;
        assert_eq!(
            collect_candidates(count, 30_000, evaluate),
            collect_sequential(count, 30_000, evaluate)
        );
    }
}
