//! Four-digit puzzle codes drawn without replacement from a digit pool.
//!
//! Shakespeare draws from 0-9, the 3F hospital keypad from 1-9. The
//! crematorium oven draws from 0-9 and then forces a 7 into the code when
//! none was drawn, spending one extra logical call to pick the position.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CODE_DIGITS, FORCED_DIGIT};
use crate::rng::{Backend, GameRng};

/// Four decimal digits packed as nibbles, most significant first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedCode(u16);

impl PackedCode {
    pub const fn from_packed(raw: u16) -> Self {
        Self(raw)
    }

    /// `None` if any digit is above 9.
    pub fn from_digits(digits: [u8; CODE_DIGITS]) -> Option<Self> {
        let mut packed = 0u16;
        for digit in digits {
            if digit > 9 {
                return None;
            }
            packed = (packed << 4) | digit as u16;
        }
        Some(Self(packed))
    }

    pub fn packed(self) -> u16 {
        self.0
    }

    pub fn digits(self) -> [u8; CODE_DIGITS] {
        [
            ((self.0 >> 12) & 0xF) as u8,
            ((self.0 >> 8) & 0xF) as u8,
            ((self.0 >> 4) & 0xF) as u8,
            (self.0 & 0xF) as u8,
        ]
    }

    pub fn contains(self, digit: u8) -> bool {
        self.digits().contains(&digit)
    }

    /// Overwrites the nibble at `position` (0 = rightmost digit).
    pub fn with_digit_at(self, position: u8, digit: u8) -> Self {
        let shift = u16::from(position & 0x3) * 4;
        Self((self.0 & !(0xF << shift)) | (u16::from(digit & 0xF) << shift))
    }

    fn push_digit(self, digit: u8) -> Self {
        Self((self.0 << 4) | u16::from(digit))
    }
}

impl fmt::Display for PackedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.digits();
        write!(f, "{a}{b}{c}{d}")
    }
}

impl fmt::UpperHex for PackedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

/// Ordered digit pool with positional removal; no allocation.
#[derive(Clone, Copy, Debug)]
pub struct DigitPool {
    digits: [u8; 10],
    len: usize,
}

impl DigitPool {
    /// Digits `first..=9` in ascending order.
    pub fn starting_at(first: u8) -> Self {
        let mut digits = [0u8; 10];
        let mut len = 0;
        for digit in first.min(10)..10 {
            digits[len] = digit;
            len += 1;
        }
        Self { digits, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    /// Removes and returns the digit at `index`, shifting the tail down.
    pub fn take(&mut self, index: usize) -> u8 {
        debug_assert!(index < self.len);
        let digit = self.digits[index];
        self.digits.copy_within(index + 1..self.len, index);
        self.len -= 1;
        digit
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeScheme {
    /// Shakespeare anthology puzzle, digits 0-9.
    Shakespeare,
    /// 3F hospital keypad, digits 1-9.
    Hospital,
}

impl CodeScheme {
    pub fn first_digit(self) -> u8 {
        match self {
            Self::Shakespeare => 0,
            Self::Hospital => 1,
        }
    }

    pub fn pool(self) -> DigitPool {
        DigitPool::starting_at(self.first_digit())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shakespeare => "shakespeare",
            Self::Hospital => "hospital",
        }
    }
}

/// One draw from the pool, kept so callers can explain a derivation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Draw {
    pub output: u32,
    pub pool_size: u8,
    pub index: u8,
    pub digit: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DrawnCode {
    pub code: PackedCode,
    pub draws: [Draw; CODE_DIGITS],
}

/// Extra call spent placing a 7 the draws missed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ForcedSeven {
    pub output: u32,
    /// Nibble index, 0 = rightmost digit.
    pub position: u8,
    pub before: PackedCode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CrematoriumCode {
    pub code: PackedCode,
    pub draws: [Draw; CODE_DIGITS],
    pub forced: Option<ForcedSeven>,
}

impl CrematoriumCode {
    pub fn logical_calls(&self) -> u32 {
        if self.forced.is_some() {
            CODE_DIGITS as u32 + 1
        } else {
            CODE_DIGITS as u32
        }
    }
}

/// The game takes `rand() % size` on a signed int and corrects a negative
/// remainder by adding `size` once.
#[inline]
fn signed_index(output: u32, size: usize) -> usize {
    let size = size as i32;
    let mut index = (output as i32) % size;
    if index < 0 {
        index += size;
    }
    index as usize
}

/// Draws four digits, consuming exactly four logical calls from `rng`.
pub fn draw_code(rng: &mut GameRng, scheme: CodeScheme) -> DrawnCode {
    let mut pool = scheme.pool();
    let mut code = PackedCode::from_packed(0);
    let mut draws = [Draw::default(); CODE_DIGITS];

    for draw in draws.iter_mut() {
        let output = rng.next();
        let pool_size = pool.len();
        let index = signed_index(output, pool_size);
        let digit = pool.take(index);
        code = code.push_digit(digit);
        *draw = Draw {
            output,
            pool_size: pool_size as u8,
            index: index as u8,
            digit,
        };
    }

    DrawnCode { code, draws }
}

/// Draws four digits from 0-9 and guarantees a 7 is present.
///
/// Consumes four logical calls, or five when the 7 had to be forced.
pub fn draw_crematorium_code(rng: &mut GameRng) -> CrematoriumCode {
    let mut pool = DigitPool::starting_at(0);
    let mut code = PackedCode::from_packed(0);
    let mut draws = [Draw::default(); CODE_DIGITS];
    let mut saw_seven = false;

    for draw in draws.iter_mut() {
        let output = rng.next();
        let pool_size = pool.len();
        // Unsigned here, unlike the other two puzzles.
        let index = (output % pool_size as u32) as usize;
        let digit = pool.take(index);
        saw_seven |= digit == FORCED_DIGIT;
        code = code.push_digit(digit);
        *draw = Draw {
            output,
            pool_size: pool_size as u8,
            index: index as u8,
            digit,
        };
    }

    let forced = if saw_seven {
        None
    } else {
        let output = rng.next();
        let position = (output % CODE_DIGITS as u32) as u8;
        let before = code;
        code = code.with_digit_at(position, FORCED_DIGIT);
        Some(ForcedSeven {
            output,
            position,
            before,
        })
    };

    CrematoriumCode {
        code,
        draws,
        forced,
    }
}

pub fn generate_code(seed: u32, warmup: u32, backend: Backend, scheme: CodeScheme) -> DrawnCode {
    let mut rng = GameRng::warmed(seed, backend, warmup);
    draw_code(&mut rng, scheme)
}

pub fn generate_crematorium_code(seed: u32, warmup: u32, backend: Backend) -> CrematoriumCode {
    let mut rng = GameRng::warmed(seed, backend, warmup);
    draw_crematorium_code(&mut rng)
}
