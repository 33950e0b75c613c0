//! Clock puzzle: hour then minute, one logical call each.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{HOURS_PER_CYCLE, MINUTES_PER_HOUR, MODE_BYTE_24H};
use crate::rng::{Backend, GameRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourMode {
    /// Hours 1..=12.
    TwelveHour,
    /// Hours 12..=23.
    TwentyFourHour,
}

impl HourMode {
    pub fn from_mode_byte(mode: u8) -> Self {
        if mode == MODE_BYTE_24H {
            Self::TwentyFourHour
        } else {
            Self::TwelveHour
        }
    }

    pub fn mode_byte(self) -> u8 {
        match self {
            Self::TwelveHour => 0,
            Self::TwentyFourHour => MODE_BYTE_24H,
        }
    }

    fn offset(self) -> u32 {
        match self {
            Self::TwelveHour => 1,
            Self::TwentyFourHour => 12,
        }
    }

    pub fn hour_from_output(self, output: u32) -> u32 {
        output % HOURS_PER_CYCLE + self.offset()
    }

    /// Inclusive range of hours this path can display.
    pub fn hour_range(self) -> (u32, u32) {
        (self.offset(), self.offset() + HOURS_PER_CYCLE - 1)
    }

    /// `output % 12` that yields `hour`, or `None` if the hour is unreachable.
    pub fn residue_for(self, hour: u32) -> Option<u32> {
        hour.checked_sub(self.offset())
            .filter(|residue| *residue < HOURS_PER_CYCLE)
    }
}

impl fmt::Display for HourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwelveHour => write!(f, "12-hour"),
            Self::TwentyFourHour => write!(f, "24-hour"),
        }
    }
}

/// Packs `HH:MM` as four decimal nibbles. Values above 99 are not representable.
pub fn pack_clock(hour: u32, minute: u32) -> u16 {
    (((hour / 10) << 12) | ((hour % 10) << 8) | ((minute / 10) << 4) | (minute % 10)) as u16
}

pub fn unpack_clock(packed: u16) -> (u32, u32) {
    let nibble = |shift: u16| u32::from((packed >> shift) & 0xF);
    (nibble(12) * 10 + nibble(8), nibble(4) * 10 + nibble(0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub hour_output: u32,
    pub minute_output: u32,
}

impl ClockReading {
    pub fn packed(&self) -> u16 {
        pack_clock(self.hour, self.minute)
    }
}

/// Consumes two logical calls: hour first, then minute.
pub fn read_clock(rng: &mut GameRng, mode: HourMode) -> ClockReading {
    let hour_output = rng.next();
    let minute_output = rng.next();
    ClockReading {
        hour: mode.hour_from_output(hour_output),
        minute: minute_output % MINUTES_PER_HOUR,
        hour_output,
        minute_output,
    }
}

pub fn generate_clock(seed: u32, warmup: u32, mode: HourMode, backend: Backend) -> ClockReading {
    let mut rng = GameRng::warmed(seed, backend, warmup);
    read_clock(&mut rng, mode)
}

/// Which fields a warmup scan must match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockTarget {
    Hour(u32),
    Minute(u32),
    Both { hour: u32, minute: u32 },
}

impl ClockTarget {
    pub fn from_parts(hour: Option<u32>, minute: Option<u32>) -> Option<Self> {
        match (hour, minute) {
            (Some(hour), Some(minute)) => Some(Self::Both { hour, minute }),
            (Some(hour), None) => Some(Self::Hour(hour)),
            (None, Some(minute)) => Some(Self::Minute(minute)),
            (None, None) => None,
        }
    }

    pub fn hour(self) -> Option<u32> {
        match self {
            Self::Hour(hour) | Self::Both { hour, .. } => Some(hour),
            Self::Minute(_) => None,
        }
    }

    pub fn minute(self) -> Option<u32> {
        match self {
            Self::Minute(minute) | Self::Both { minute, .. } => Some(minute),
            Self::Hour(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_clock_readings() {
        let twelve = generate_clock(0, 0, HourMode::TwelveHour, Backend::Ps2);
        assert_eq!((twelve.hour, twelve.minute), (10, 46));
        assert_eq!(twelve.hour_output, 0x3039);
        assert_eq!(twelve.minute_output, 0x53DC_167E);
        assert_eq!(twelve.packed(), 0x1046);

        let day = generate_clock(0, 0, HourMode::TwentyFourHour, Backend::Ps2);
        assert_eq!((day.hour, day.minute), (21, 46));

        let pc = generate_clock(0, 0, HourMode::TwelveHour, Backend::Pc);
        assert_eq!((pc.hour, pc.minute), (3, 21));
        assert_eq!(pc.packed(), 0x0321);
    }

    #[test]
    fn mode_byte_selects_path() {
        assert_eq!(HourMode::from_mode_byte(2), HourMode::TwentyFourHour);
        assert_eq!(HourMode::from_mode_byte(0), HourMode::TwelveHour);
        assert_eq!(HourMode::from_mode_byte(1), HourMode::TwelveHour);
        assert_eq!(HourMode::TwentyFourHour.mode_byte(), 2);
    }

    #[test]
    fn residues_cover_only_reachable_hours() {
        let twelve = HourMode::TwelveHour;
        assert_eq!(twelve.residue_for(1), Some(0));
        assert_eq!(twelve.residue_for(12), Some(11));
        assert_eq!(twelve.residue_for(0), None);
        assert_eq!(twelve.residue_for(13), None);

        let day = HourMode::TwentyFourHour;
        assert_eq!(day.residue_for(12), Some(0));
        assert_eq!(day.residue_for(23), Some(11));
        assert_eq!(day.residue_for(11), None);
        assert_eq!(day.residue_for(24), None);
        assert_eq!(day.hour_range(), (12, 23));
    }

    #[test]
    fn pack_and_unpack() {
        assert_eq!(pack_clock(12, 5), 0x1205);
        assert_eq!(unpack_clock(0x2359), (23, 59));
        assert_eq!(unpack_clock(pack_clock(7, 30)), (7, 30));
    }
}
