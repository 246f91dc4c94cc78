// Mood inputs for Mood Ring Music.
//
// Provides the three values the music generator consumes from the daily
// schedule: the hour's diurnal energy level, the scheduled activity, and the
// alignment between them. Tempo is derived from energy + alignment. No audio
// dependencies; `mood_ring_music` depends on this crate for `EnergyLevel` and
// `Alignment`.
//
// Architecture:
// - `energy.rs`: `EnergyLevel` and the fixed 24-hour `DIURNAL_ENERGY` table
// - `activity.rs`: `Activity`, `Alignment`, the default schedule, and the
//   activity/energy alignment rules
// - `tempo.rs`: base BPM per energy level, alignment modifier, clamped BPM,
//   and `HourProfile` which bundles everything for one hour
//
// Everything here is a pure function over static tables. Parsing from strings
// (CLI input, JSON config) goes through `FromStr` impls that return
// `ScheduleError` for unknown names.

pub mod activity;
pub mod energy;
pub mod tempo;

pub use activity::{Activity, Alignment, DEFAULT_SCHEDULE, calculate_alignment};
pub use energy::{DIURNAL_ENERGY, EnergyLevel, energy_for_hour};
pub use tempo::{HourProfile, MAX_BPM, MIN_BPM, alignment_modifier, base_bpm, calculate_bpm};

/// Errors from parsing schedule inputs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unknown activity '{0}' (expected work, sleep, free, play, or family)")]
    UnknownActivity(String),

    #[error("unknown energy level '{0}'")]
    UnknownEnergy(String),

    #[error("hour {0} is outside 0-23")]
    InvalidHour(usize),
}
