// Tempo derivation from energy and alignment.
//
// Each energy level has a base tempo. Alignment nudges it by ten BPM: an
// enhancing activity pushes further in the direction the energy is already
// heading, an opposing one pulls back toward the middle. The result is always
// clamped into [MIN_BPM, MAX_BPM].

use crate::ScheduleError;
use crate::activity::{Activity, Alignment, calculate_alignment};
use crate::energy::{DIURNAL_ENERGY, EnergyLevel, energy_for_hour};
use serde::{Deserialize, Serialize};

pub const MIN_BPM: u16 = 80;
pub const MAX_BPM: u16 = 160;

/// Base tempo for an energy level.
pub fn base_bpm(energy: EnergyLevel) -> i32 {
    match energy {
        EnergyLevel::Lowest => 80,
        EnergyLevel::Low => 90,
        EnergyLevel::Rising => 110,
        EnergyLevel::Moderate => 120,
        EnergyLevel::High => 140,
        EnergyLevel::Decreasing => 100,
    }
}

/// BPM adjustment for an alignment at a given energy level.
pub fn alignment_modifier(alignment: Alignment, energy: EnergyLevel) -> i32 {
    use EnergyLevel::*;
    match (alignment, energy) {
        (Alignment::Enhance, High | Rising) => 10,
        (Alignment::Enhance, Low | Decreasing) => -10,
        (Alignment::Oppose, High | Rising) => -10,
        (Alignment::Oppose, Low | Decreasing) => 10,
        _ => 0,
    }
}

/// Final tempo: base plus modifier, clamped into [MIN_BPM, MAX_BPM].
pub fn calculate_bpm(energy: EnergyLevel, alignment: Alignment) -> u16 {
    let bpm = base_bpm(energy) + alignment_modifier(alignment, energy);
    bpm.clamp(MIN_BPM as i32, MAX_BPM as i32) as u16
}

/// Everything the music generator needs to know about one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourProfile {
    pub hour: usize,
    pub activity: Activity,
    pub energy: EnergyLevel,
    pub alignment: Alignment,
    pub bpm: u16,
}

impl HourProfile {
    /// Profile an hour of the day with the given activity.
    pub fn for_hour(hour: usize, activity: Activity) -> Result<Self, ScheduleError> {
        let energy = energy_for_hour(hour)?;
        Ok(Self::with_energy(hour, activity, energy))
    }

    /// Profile with an explicit energy level, bypassing the diurnal table.
    pub fn with_energy(hour: usize, activity: Activity, energy: EnergyLevel) -> Self {
        let alignment = calculate_alignment(activity, energy);
        HourProfile {
            hour,
            activity,
            energy,
            alignment,
            bpm: calculate_bpm(energy, alignment),
        }
    }

    /// Profiles for all 24 hours of a schedule.
    pub fn day(schedule: &[Activity; 24]) -> Vec<HourProfile> {
        schedule
            .iter()
            .enumerate()
            .map(|(hour, &activity)| Self::with_energy(hour, activity, DIURNAL_ENERGY[hour]))
            .collect()
    }
}
