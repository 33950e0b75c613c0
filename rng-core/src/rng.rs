//! Generator backends shared by every puzzle derivation.
//!
//! Both backends keep a single `u32` state word. A "logical call" is one
//! `rand()` as the puzzle code sees it; on the PC backend that is three
//! physical LCG steps folded into a 31-bit value.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    PC_INCREMENT, PC_MULTIPLIER, PC_OUTPUT_MASK, PC_STEPS_PER_CALL, PS2_INCREMENT,
    PS2_MULTIPLIER, PS2_STATE_MASK,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// 31-bit LCG whose output is the new state.
    Ps2,
    /// MSVC-style LCG, three 15-bit outputs per logical call.
    Pc,
}

impl Backend {
    pub fn physical_steps_per_call(self) -> u32 {
        match self {
            Self::Ps2 => 1,
            Self::Pc => PC_STEPS_PER_CALL,
        }
    }

    /// One logical call: mutates `state` and returns the 31-bit output.
    #[inline]
    pub fn next(self, state: &mut u32) -> u32 {
        match self {
            Self::Ps2 => ps2_step(state),
            Self::Pc => pc_rand31(state),
        }
    }

    pub fn advance(self, state: &mut u32, calls: u32) {
        for _ in 0..calls {
            self.next(state);
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ps2 => "ps2",
            Self::Pc => "pc",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
pub fn ps2_step(state: &mut u32) -> u32 {
    // Multiplying in u32 and masking is exact: 2^31 divides 2^32.
    *state = state
        .wrapping_mul(PS2_MULTIPLIER as u32)
        .wrapping_add(PS2_INCREMENT as u32)
        & PS2_STATE_MASK;
    *state
}

#[inline]
pub fn pc_rand15(state: &mut u32) -> u32 {
    *state = state.wrapping_mul(PC_MULTIPLIER).wrapping_add(PC_INCREMENT);
    (*state >> 16) & PC_OUTPUT_MASK
}

/// Bits 14..0 from the first step, 29..15 from the second, bit 30 from bit 0
/// of the third.
#[inline]
pub fn pc_rand31(state: &mut u32) -> u32 {
    let low = pc_rand15(state);
    let mid = pc_rand15(state);
    let high = pc_rand15(state) & 1;
    (high << 30) | (mid << 15) | low
}

/// A generator cursor. `Copy`, so probing ahead is just a copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameRng {
    state: u32,
    backend: Backend,
}

impl GameRng {
    pub fn new(seed: u32, backend: Backend) -> Self {
        Self {
            state: seed,
            backend,
        }
    }

    /// Seed advanced by `warmup` logical calls.
    pub fn warmed(seed: u32, backend: Backend, warmup: u32) -> Self {
        let mut rng = Self::new(seed, backend);
        rng.advance(warmup);
        rng
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn next(&mut self) -> u32 {
        self.backend.next(&mut self.state)
    }

    pub fn advance(&mut self, calls: u32) {
        self.backend.advance(&mut self.state, calls);
    }

    /// A single raw LCG step, bypassing the PC backend's 3-step fold.
    pub fn physical_step(&mut self) -> u32 {
        match self.backend {
            Backend::Ps2 => ps2_step(&mut self.state),
            Backend::Pc => pc_rand15(&mut self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ps2_zero_seed_known_sequence() {
        let mut rng = GameRng::new(0, Backend::Ps2);
        assert_eq!(rng.next(), 0x0000_3039);
        // (0x3039 * 0x41C64E6D + 0x3039) & 0x7FFFFFFF
        assert_eq!(rng.next(), 0x53DC_167E);
        assert_eq!(rng.state(), 0x53DC_167E);
    }

    #[test]
    fn ps2_state_stays_below_modulus() {
        let mut rng = GameRng::new(0xFFFF_FFFF, Backend::Ps2);
        for _ in 0..10_000 {
            assert!(rng.next() < 0x8000_0000);
        }
    }

    #[test]
    fn pc_zero_seed_matches_msvc_rand() {
        // MSVC srand(0) yields 38, 7719, 21238, ...
        let mut state = 0u32;
        assert_eq!(pc_rand15(&mut state), 38);
        assert_eq!(pc_rand15(&mut state), 7719);
        assert_eq!(pc_rand15(&mut state), 21238);
    }

    #[test]
    fn pc_logical_call_folds_three_steps() {
        let mut raw = 0x1234_5678u32;
        let r1 = pc_rand15(&mut raw);
        let r2 = pc_rand15(&mut raw);
        let r3 = pc_rand15(&mut raw);

        let mut rng = GameRng::new(0x1234_5678, Backend::Pc);
        let out = rng.next();
        assert_eq!(out, ((r3 & 1) << 30) | (r2 << 15) | r1);
        assert_eq!(rng.state(), raw);
        assert!(out < 0x8000_0000);
    }

    #[test]
    fn advance_matches_sequential_calls() {
        for backend in [Backend::Ps2, Backend::Pc] {
            let mut a = GameRng::new(0xDEAD_BEEF, backend);
            let mut b = a;
            a.advance(257);
            for _ in 0..257 {
                b.next();
            }
            assert_eq!(a, b, "backend={backend}");
            assert_eq!(GameRng::warmed(0xDEAD_BEEF, backend, 257), a);
        }
    }

    #[test]
    fn physical_steps_per_call() {
        let mut logical = GameRng::new(99, Backend::Pc);
        let mut physical = logical;
        logical.next();
        for _ in 0..Backend::Pc.physical_steps_per_call() {
            physical.physical_step();
        }
        assert_eq!(logical.state(), physical.state());
        assert_eq!(Backend::Ps2.physical_steps_per_call(), 1);
    }
}
