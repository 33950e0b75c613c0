#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod clock;
pub mod code;
pub mod constants;
pub mod enumerate;
pub mod error;
pub mod inverse;
pub mod rng;
pub mod search;

pub use clock::{generate_clock, read_clock, ClockReading, ClockTarget, HourMode};
pub use code::{
    draw_code, draw_crematorium_code, generate_code, generate_crematorium_code, CodeScheme,
    CrematoriumCode, DrawnCode, PackedCode,
};
pub use enumerate::{find_clock_base_seeds, BaseSeedCandidate, ClockBaseQuery};
pub use error::SearchError;
pub use inverse::{mod_inverse, Ps2Inverse};
pub use rng::{Backend, GameRng};
pub use search::{
    find_clock_warmups, find_clock_warmups_flexible, find_code_seeds,
    find_crematorium_seeds_for_code, find_hospital_seeds_for_code, find_seed_distance,
    find_shakespeare_seeds_for_code, find_warmup_for_first, trace_seed_path, ScanBounds,
};
