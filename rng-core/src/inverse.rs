//! Exact backward stepping for the PS2 backend.
//!
//! The multiplier is odd and the modulus is a power of two, so the step is a
//! bijection on `[0, 2^31)` and each state has exactly one predecessor:
//! `prev = A^-1 * (cur - C) mod 2^31`.

use crate::constants::{PS2_INCREMENT, PS2_MODULUS, PS2_MULTIPLIER};
use crate::error::SearchError;

/// Multiplicative inverse of `a` modulo `m` via extended Euclid.
///
/// Returns `None` when `gcd(a, m) != 1` or `m < 2`. Both inputs must be below
/// `2^63`.
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m < 2 {
        return None;
    }

    let (mut t, mut new_t) = (0i64, 1i64);
    let (mut r, mut new_r) = (m as i64, (a % m) as i64);
    while new_r != 0 {
        let q = r / new_r;
        (t, new_t) = (new_t, t - q * new_t);
        (r, new_r) = (new_r, r - q * new_r);
    }

    if r != 1 {
        return None;
    }
    if t < 0 {
        t += m as i64;
    }
    Some(t as u64)
}

/// The PS2 multiplier's inverse, computed once and shared by reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ps2Inverse {
    inverse: u64,
}

impl Ps2Inverse {
    pub fn new() -> Result<Self, SearchError> {
        mod_inverse(PS2_MULTIPLIER % PS2_MODULUS, PS2_MODULUS)
            .map(|inverse| Self { inverse })
            .ok_or(SearchError::NoInverse {
                value: PS2_MULTIPLIER,
                modulus: PS2_MODULUS,
            })
    }

    pub fn multiplier_inverse(&self) -> u64 {
        self.inverse
    }

    /// The unique state that steps to `current`.
    #[inline]
    pub fn previous_state(&self, current: u32) -> u32 {
        let shifted = (current as u64 + PS2_MODULUS - PS2_INCREMENT % PS2_MODULUS) % PS2_MODULUS;
        ((self.inverse * shifted) % PS2_MODULUS) as u32
    }

    pub fn rewind(&self, state: u32, steps: u32) -> u32 {
        (0..steps).fold(state, |seed, _| self.previous_state(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ps2_step, Backend, GameRng};

    #[test]
    fn ps2_multiplier_inverse_is_known_constant() {
        let inv = Ps2Inverse::new().expect("odd multiplier is invertible");
        assert_eq!(inv.multiplier_inverse(), 0x6EB9_EB65);
        assert_eq!((PS2_MULTIPLIER * inv.multiplier_inverse()) % PS2_MODULUS, 1);
    }

    #[test]
    fn mod_inverse_small_cases() {
        assert_eq!(mod_inverse(3, 7), Some(5));
        assert_eq!(mod_inverse(10, 17), Some(12));
        assert_eq!(mod_inverse(1, 2), Some(1));
    }

    #[test]
    fn mod_inverse_rejects_shared_factors() {
        assert_eq!(mod_inverse(4, 8), None);
        assert_eq!(mod_inverse(0, 16), None);
        assert_eq!(mod_inverse(6, 9), None);
        assert_eq!(mod_inverse(5, 1), None);
    }

    #[test]
    fn previous_state_inverts_step_both_ways() {
        let inv = Ps2Inverse::new().unwrap();
        let mut state = 0x1357_9BDFu32 & 0x7FFF_FFFF;
        for _ in 0..5_000 {
            let before = state;
            ps2_step(&mut state);
            assert_eq!(inv.previous_state(state), before);

            let mut forward = inv.previous_state(before);
            ps2_step(&mut forward);
            assert_eq!(forward, before);
        }
    }

    #[test]
    fn previous_of_first_output_from_zero_is_zero() {
        let inv = Ps2Inverse::new().unwrap();
        assert_eq!(inv.previous_state(0x3039), 0);
    }

    #[test]
    fn rewind_undoes_advance() {
        let inv = Ps2Inverse::new().unwrap();
        for (seed, n) in [(0u32, 0u32), (0, 1), (0x7FFF_FFFF, 17), (0x0BAD_F00D, 1_000)] {
            let advanced = GameRng::warmed(seed, Backend::Ps2, n);
            assert_eq!(inv.rewind(advanced.state(), n), seed, "seed={seed:#x} n={n}");
        }
    }
}
