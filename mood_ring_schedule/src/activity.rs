// Activities and their alignment with diurnal energy.
//
// An activity "enhances" the hour when the body's expected energy suits it
// (working at high energy, sleeping at low energy), "opposes" it when they
// clash, and is neutral otherwise. The rules are checked in order: every
// enhance rule before any oppose rule.

use crate::ScheduleError;
use crate::energy::EnergyLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed vocabulary of schedulable activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Work,
    Sleep,
    Free,
    Play,
    Family,
}

impl Activity {
    pub const ALL: [Activity; 5] = [
        Activity::Work,
        Activity::Sleep,
        Activity::Free,
        Activity::Play,
        Activity::Family,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Activity::Work => "work",
            Activity::Sleep => "sleep",
            Activity::Free => "free",
            Activity::Play => "play",
            Activity::Family => "family",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activity {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScheduleError::UnknownActivity(s.to_string()))
    }
}

/// Default activity for each hour, index 0 = midnight.
pub const DEFAULT_SCHEDULE: [Activity; 24] = {
    use Activity::*;
    [
        Sleep, Sleep, Sleep, Sleep, Sleep, Sleep, // 00-05
        Family, Family, // 06-07
        Work, Work, Work, Work, // 08-11
        Free, Free, // 12-13
        Work, Work, Work, Family, Family, Play, // 14-19
        Play, Free, Sleep, Sleep, // 20-23
    ]
};

/// How well an activity matches the hour's energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Enhance,
    Neutral,
    Oppose,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Enhance => "Enhance",
            Alignment::Neutral => "Neutral",
            Alignment::Oppose => "Oppose",
        };
        f.write_str(name)
    }
}

/// Derive the alignment of an activity with an energy level.
pub fn calculate_alignment(activity: Activity, energy: EnergyLevel) -> Alignment {
    use Activity::*;
    use EnergyLevel::*;

    let enhance = match activity {
        Sleep => matches!(energy, Low | Lowest),
        Work => energy == High,
        Play => matches!(energy, Moderate | High),
        Family => matches!(energy, Moderate | Rising | Decreasing),
        Free => matches!(energy, Moderate | Decreasing),
    };
    if enhance {
        return Alignment::Enhance;
    }

    let oppose = match activity {
        Work => matches!(energy, Low | Lowest | Decreasing),
        Sleep => matches!(energy, High | Rising),
        Play => matches!(energy, Low | Lowest),
        Family | Free => false,
    };
    if oppose {
        Alignment::Oppose
    } else {
        Alignment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_alignment() {
        assert_eq!(calculate_alignment(Activity::Work, EnergyLevel::High), Alignment::Enhance);
        assert_eq!(calculate_alignment(Activity::Work, EnergyLevel::Low), Alignment::Oppose);
        assert_eq!(
            calculate_alignment(Activity::Work, EnergyLevel::Decreasing),
            Alignment::Oppose
        );
        assert_eq!(
            calculate_alignment(Activity::Work, EnergyLevel::Moderate),
            Alignment::Neutral
        );
    }

    #[test]
    fn test_sleep_alignment() {
        assert_eq!(calculate_alignment(Activity::Sleep, EnergyLevel::Lowest), Alignment::Enhance);
        assert_eq!(calculate_alignment(Activity::Sleep, EnergyLevel::Rising), Alignment::Oppose);
        assert_eq!(
            calculate_alignment(Activity::Sleep, EnergyLevel::Moderate),
            Alignment::Neutral
        );
    }

    #[test]
    fn test_free_and_family_never_oppose() {
        for energy in EnergyLevel::ALL {
            assert_ne!(calculate_alignment(Activity::Free, energy), Alignment::Oppose);
            assert_ne!(calculate_alignment(Activity::Family, energy), Alignment::Oppose);
        }
    }

    #[test]
    fn test_parse_activity() {
        assert_eq!("Work".parse::<Activity>(), Ok(Activity::Work));
        assert_eq!(
            "nap".parse::<Activity>(),
            Err(ScheduleError::UnknownActivity("nap".to_string()))
        );
    }

    #[test]
    fn test_default_schedule_mostly_sleeps_at_night() {
        assert!(DEFAULT_SCHEDULE[..6].iter().all(|&a| a == Activity::Sleep));
        assert_eq!(DEFAULT_SCHEDULE[9], Activity::Work);
    }
}
