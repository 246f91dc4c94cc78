// Chord progressions for the harmonic layers.
//
// Each energy level has a small fixed set of 4-chord progressions, written as
// 0-based scale degrees (0 = I/i, 3 = IV/iv, 4 = V/v, ...). An arrangement
// picks one at random and both the audio pad and the MIDI chord track play
// it, one chord per measure, cycling.
//
// Chord quality comes from the key (see `scale::triad`), so the same degree
// sequence sounds major-flavored in a major key and minor in a minor key.

use crate::scale::triad;
use mood_ring_schedule::EnergyLevel;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of chords in a progression.
pub const PROGRESSION_LENGTH: usize = 4;

/// Candidate progressions per energy level. The first entry is the default.
fn candidates(energy: EnergyLevel) -> &'static [[usize; PROGRESSION_LENGTH]] {
    match energy {
        // I-iii-IV-V and the pop loop I-V-vi-IV
        EnergyLevel::High => &[[0, 2, 3, 4], [0, 4, 5, 3]],
        EnergyLevel::Rising => &[[0, 3, 4, 3], [0, 1, 4, 0], [5, 3, 0, 4]],
        EnergyLevel::Moderate => &[[0, 5, 3, 4], [0, 3, 0, 4]],
        EnergyLevel::Decreasing => &[[5, 3, 0, 4], [0, 5, 1, 4]],
        EnergyLevel::Low => &[[0, 5, 3, 4], [0, 3, 5, 4]],
        EnergyLevel::Lowest => &[[0, 3, 0, 3], [0, 5, 0, 5]],
    }
}

/// A 4-chord progression as scale degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub degrees: [usize; PROGRESSION_LENGTH],
}

impl Progression {
    /// The first (default) progression for an energy level.
    pub fn default_for(energy: EnergyLevel) -> Self {
        Progression {
            degrees: candidates(energy)[0],
        }
    }

    /// Pick one of the energy level's progressions at random.
    pub fn choose(energy: EnergyLevel, rng: &mut impl Rng) -> Self {
        let options = candidates(energy);
        Progression {
            degrees: options[rng.random_range(0..options.len())],
        }
    }

    /// Scale degree of the chord that plays during a measure.
    pub fn degree_for_measure(&self, measure: usize) -> usize {
        self.degrees[measure % PROGRESSION_LENGTH]
    }

    /// Triad for a measure, shifted by whole octaves (negative = lower).
    pub fn chord_for_measure(&self, scale: &[u8; 7], measure: usize, octave_shift: i8) -> [u8; 3] {
        let shift = 12 * octave_shift as i16;
        triad(scale, self.degree_for_measure(measure)).map(|p| (p as i16 + shift).clamp(0, 127) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{RootNote, ScaleType, resolve_scale};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_high_default_is_i_iii_iv_v() {
        assert_eq!(Progression::default_for(EnergyLevel::High).degrees, [0, 2, 3, 4]);
    }

    #[test]
    fn test_choose_returns_a_candidate() {
        let mut rng = StdRng::seed_from_u64(10);
        for energy in EnergyLevel::ALL {
            for _ in 0..20 {
                let p = Progression::choose(energy, &mut rng);
                assert!(candidates(energy).contains(&p.degrees));
            }
        }
    }

    #[test]
    fn test_every_degree_is_valid() {
        for energy in EnergyLevel::ALL {
            for prog in candidates(energy) {
                assert!(prog.iter().all(|&d| d < 7));
            }
        }
    }

    #[test]
    fn test_chord_cycles_per_measure() {
        let scale = resolve_scale(RootNote::C, ScaleType::Major);
        let prog = Progression::default_for(EnergyLevel::High);
        assert_eq!(prog.chord_for_measure(&scale, 0, 0), [60, 64, 67]);
        assert_eq!(prog.chord_for_measure(&scale, 1, 0), [64, 67, 71]);
        assert_eq!(prog.chord_for_measure(&scale, 3, -1), [55, 59, 62]);
        assert_eq!(prog.chord_for_measure(&scale, 4, 0), [60, 64, 67]);
    }
}
