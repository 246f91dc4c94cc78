// Diurnal energy levels.
//
// A coarse six-value description of expected alertness, plus the fixed table
// assigning one level to each hour of the day. The table is owned here and
// never mutated; callers index it by hour.

use crate::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expected alertness for an hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyLevel {
    Lowest,
    Low,
    Rising,
    Moderate,
    High,
    Decreasing,
}

impl EnergyLevel {
    pub const ALL: [EnergyLevel; 6] = [
        EnergyLevel::Lowest,
        EnergyLevel::Low,
        EnergyLevel::Rising,
        EnergyLevel::Moderate,
        EnergyLevel::High,
        EnergyLevel::Decreasing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnergyLevel::Lowest => "Lowest",
            EnergyLevel::Low => "Low",
            EnergyLevel::Rising => "Rising",
            EnergyLevel::Moderate => "Moderate",
            EnergyLevel::High => "High",
            EnergyLevel::Decreasing => "Decreasing",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnergyLevel {
    type Err = ScheduleError;

    /// Case-insensitive match on the level name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnergyLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScheduleError::UnknownEnergy(s.to_string()))
    }
}

/// Energy level for each hour, index 0 = midnight.
pub const DIURNAL_ENERGY: [EnergyLevel; 24] = {
    use EnergyLevel::*;
    [
        Low, Low, Lowest, Lowest, Lowest, Low, // 00-05
        Rising, Rising, // 06-07
        High, High, High, High, // 08-11
        Moderate, Moderate, // 12-13
        High, High, High, Moderate, Moderate, Moderate, // 14-19
        Decreasing, Decreasing, Low, Low, // 20-23
    ]
};

/// Look up the energy level for an hour in 0-23.
pub fn energy_for_hour(hour: usize) -> Result<EnergyLevel, ScheduleError> {
    DIURNAL_ENERGY
        .get(hour)
        .copied()
        .ok_or(ScheduleError::InvalidHour(hour))
}
