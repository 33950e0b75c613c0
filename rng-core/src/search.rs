//! Bounded forward scans over advance counts and seed distances.
//!
//! Every scan follows the same shape: skip `min_advances` logical calls,
//! then at each advance count evaluate the puzzle on a copy of the cursor,
//! record a hit, and step the cursor by exactly one logical call. Results are
//! ascending by advance count. Hitting a bound is "no match", never an error.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::clock::{pack_clock, ClockTarget, HourMode};
use crate::code::{draw_code, draw_crematorium_code, CodeScheme, PackedCode};
use crate::constants::{MAX_CLOCK_MATCHES_DEFAULT, MAX_CODE_ADVANCES_DEFAULT, MINUTES_PER_HOUR};
use crate::rng::{Backend, GameRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanBounds {
    pub min_advances: u32,
    /// Inclusive.
    pub max_advances: u32,
    pub max_results: usize,
}

impl ScanBounds {
    pub fn new(min_advances: u32, max_advances: u32, max_results: usize) -> Self {
        Self {
            min_advances,
            max_advances,
            max_results,
        }
    }

    pub fn up_to(max_advances: u32, max_results: usize) -> Self {
        Self::new(0, max_advances, max_results)
    }

    fn is_empty(&self) -> bool {
        self.max_results == 0 || self.max_advances < self.min_advances
    }
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self::up_to(MAX_CODE_ADVANCES_DEFAULT, MAX_CLOCK_MATCHES_DEFAULT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CodeMatch {
    pub advances: u32,
    /// Cursor state before the first draw.
    pub state: u32,
    pub first_output: u32,
    pub code: PackedCode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CrematoriumMatch {
    pub advances: u32,
    pub state: u32,
    pub code: PackedCode,
    /// Nibble the 7 was forced into, if the draws missed it.
    pub forced_position: Option<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClockMatch {
    pub advances: u32,
    pub state: u32,
    pub hour_output: Option<u32>,
    pub minute_output: Option<u32>,
    /// Unmatched fields pack as zero.
    pub packed: u16,
}

fn scan<T>(
    start: GameRng,
    bounds: ScanBounds,
    mut probe: impl FnMut(u32, GameRng) -> Option<T>,
) -> Vec<T> {
    let mut hits = Vec::new();
    if bounds.is_empty() {
        return hits;
    }

    let mut cursor = start;
    cursor.advance(bounds.min_advances);

    let mut scanned = 0u64;
    for advances in bounds.min_advances..=bounds.max_advances {
        scanned += 1;
        if let Some(hit) = probe(advances, cursor) {
            hits.push(hit);
            if hits.len() >= bounds.max_results {
                break;
            }
        }
        cursor.next();
    }

    tracing::debug!(
        backend = %start.backend(),
        min_advances = bounds.min_advances,
        max_advances = bounds.max_advances,
        scanned,
        hits = hits.len(),
        "advance scan finished"
    );
    hits
}

/// Smallest warmup after which the next logical call returns `first_output`.
pub fn find_warmup_for_first(
    base_seed: u32,
    first_output: u32,
    backend: Backend,
    max_search: u32,
) -> Option<u32> {
    scan(
        GameRng::new(base_seed, backend),
        ScanBounds::up_to(max_search, 1),
        |advances, mut probe| (probe.next() == first_output).then_some(advances),
    )
    .first()
    .copied()
}

pub fn find_code_seeds(
    start_seed: u32,
    target: PackedCode,
    scheme: CodeScheme,
    backend: Backend,
    bounds: ScanBounds,
) -> Vec<CodeMatch> {
    scan(GameRng::new(start_seed, backend), bounds, |advances, cursor| {
        let mut probe = cursor;
        let drawn = draw_code(&mut probe, scheme);
        (drawn.code == target).then_some(CodeMatch {
            advances,
            state: cursor.state(),
            first_output: drawn.draws[0].output,
            code: drawn.code,
        })
    })
}

pub fn find_shakespeare_seeds_for_code(
    start_seed: u32,
    target: PackedCode,
    backend: Backend,
    bounds: ScanBounds,
) -> Vec<CodeMatch> {
    find_code_seeds(start_seed, target, CodeScheme::Shakespeare, backend, bounds)
}

pub fn find_hospital_seeds_for_code(
    start_seed: u32,
    target: PackedCode,
    backend: Backend,
    bounds: ScanBounds,
) -> Vec<CodeMatch> {
    find_code_seeds(start_seed, target, CodeScheme::Hospital, backend, bounds)
}

pub fn find_crematorium_seeds_for_code(
    start_seed: u32,
    target: PackedCode,
    backend: Backend,
    bounds: ScanBounds,
) -> Vec<CrematoriumMatch> {
    scan(GameRng::new(start_seed, backend), bounds, |advances, cursor| {
        let mut probe = cursor;
        let drawn = draw_crematorium_code(&mut probe);
        (drawn.code == target).then_some(CrematoriumMatch {
            advances,
            state: cursor.state(),
            code: drawn.code,
            forced_position: drawn.forced.map(|forced| forced.position),
        })
    })
}

pub fn find_clock_warmups(
    base_seed: u32,
    mode: HourMode,
    target_hour: u32,
    target_minute: u32,
    backend: Backend,
    bounds: ScanBounds,
) -> Vec<ClockMatch> {
    find_clock_warmups_flexible(
        base_seed,
        mode,
        backend,
        ClockTarget::Both {
            hour: target_hour,
            minute: target_minute,
        },
        bounds,
    )
}

/// Like [`find_clock_warmups`], but a single-field target only spends the
/// one logical call it needs: a minute-only target reads the minute from the
/// first call after the warmup.
pub fn find_clock_warmups_flexible(
    base_seed: u32,
    mode: HourMode,
    backend: Backend,
    target: ClockTarget,
    bounds: ScanBounds,
) -> Vec<ClockMatch> {
    scan(GameRng::new(base_seed, backend), bounds, |advances, cursor| {
        let mut probe = cursor;
        let hour_output = target.hour().map(|_| probe.next());
        let minute_output = target.minute().map(|_| probe.next());

        let hour = hour_output.map(|output| mode.hour_from_output(output));
        let minute = minute_output.map(|output| output % MINUTES_PER_HOUR);
        if hour != target.hour() || minute != target.minute() {
            return None;
        }

        Some(ClockMatch {
            advances,
            state: cursor.state(),
            hour_output,
            minute_output,
            packed: pack_clock(hour.unwrap_or(0), minute.unwrap_or(0)),
        })
    })
}

/// Logical calls needed to walk from `base_seed` to `target_seed`.
///
/// Returns `Some(0)` without stepping when the seeds are equal.
pub fn find_seed_distance(
    base_seed: u32,
    target_seed: u32,
    backend: Backend,
    max_steps: u64,
) -> Option<u64> {
    if base_seed == target_seed {
        return Some(0);
    }
    let mut rng = GameRng::new(base_seed, backend);
    for steps in 1..=max_steps {
        rng.next();
        if rng.state() == target_seed {
            return Some(steps);
        }
    }
    tracing::debug!(
        base_seed,
        target_seed,
        max_steps,
        "target seed not reached"
    );
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeedSegment {
    pub from: u32,
    pub to: u32,
    pub distance: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedPath {
    pub segments: Vec<SeedSegment>,
    /// Sum over segments that were found.
    pub total_advances: u64,
    pub final_seed: u32,
}

/// Continuous distances `base -> t1 -> t2 ...`.
///
/// A segment that is not found leaves the cursor where it was, so the next
/// target is measured from the last seed that was reached.
pub fn trace_seed_path(base_seed: u32, targets: &[u32], backend: Backend, max_steps: u64) -> SeedPath {
    let mut path = SeedPath {
        final_seed: base_seed,
        ..SeedPath::default()
    };

    for &target in targets {
        let from = path.final_seed;
        let distance = find_seed_distance(from, target, backend, max_steps);
        if let Some(steps) = distance {
            path.total_advances += steps;
            path.final_seed = target;
        }
        path.segments.push(SeedSegment {
            from,
            to: target,
            distance,
        });
    }

    path
}
