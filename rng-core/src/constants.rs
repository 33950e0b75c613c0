//! Fixed generator constants and default search ceilings.
//!
//! The PS2 build uses a 31-bit LCG; the PC build uses the MSVC `rand()`
//! recurrence and folds three 15-bit outputs into one 31-bit value.

// PS2 backend: state = (state * A + C) mod 2^31
pub const PS2_MULTIPLIER: u64 = 0x41C6_4E6D;
pub const PS2_INCREMENT: u64 = 0x3039;
pub const PS2_MODULUS: u64 = 0x8000_0000;
pub const PS2_STATE_MASK: u32 = 0x7FFF_FFFF;

// PC backend: state = state * A + C (wrapping u32), output = bits 30..16
pub const PC_MULTIPLIER: u32 = 0x0003_43FD;
pub const PC_INCREMENT: u32 = 0x0026_9EC3;
pub const PC_OUTPUT_MASK: u32 = 0x7FFF;
pub const PC_STEPS_PER_CALL: u32 = 3;

// Puzzle derivation
pub const CODE_DIGITS: usize = 4;
pub const FORCED_DIGIT: u8 = 7;
pub const HOURS_PER_CYCLE: u32 = 12;
pub const MINUTES_PER_HOUR: u32 = 60;
/// Mode byte the game writes when the clock runs on the 24-hour path.
pub const MODE_BYTE_24H: u8 = 2;

// Default ceilings (all searches are bounded)
pub const MAX_CODE_ADVANCES_DEFAULT: u32 = 10_000_000;
pub const MAX_CLOCK_WARMUP_DEFAULT: u32 = 5_000;
pub const MAX_FIRST_OUTPUT_SEARCH_DEFAULT: u32 = 2_000_000;
pub const MAX_SEED_PATH_STEPS_DEFAULT: u64 = 10_000_000;
pub const MAX_BASE_SEEDS_DEFAULT: usize = 200;
pub const MAX_CLOCK_MATCHES_DEFAULT: usize = 50;
