use core::fmt;

use crate::clock::HourMode;

/// Outcomes that make a search impossible before it starts.
///
/// Exhausting a search bound is not an error: scans return `None` or an
/// empty `Vec` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// `gcd(value, modulus) != 1`, so the LCG step cannot be inverted.
    NoInverse { value: u64, modulus: u64 },
    /// The clock path can never display `hour` in this mode.
    ResidueOutOfRange { hour: u32, mode: HourMode },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInverse { value, modulus } => write!(
                f,
                "no modular inverse: gcd(0x{value:x}, 0x{modulus:x}) != 1"
            ),
            Self::ResidueOutOfRange { hour, mode } => {
                let (low, high) = mode.hour_range();
                write!(
                    f,
                    "hour {hour} is unreachable on the {mode} path (allowed {low}..={high})"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SearchError {}
