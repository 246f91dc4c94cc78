// Motif-transformation melody strategy.
//
// The melody is assembled from 4-note units. A fresh motif (four scale
// pitches sampled with replacement) is drawn at every 8-note boundary and
// after any unit that used the motif unchanged. Each unit applies one
// transform chosen uniformly from the five below, never the same transform
// twice in a row:
//
//   invert      reflect around the first note: 2*first - note
//   retrograde  reverse the order
//   transpose   shift every note by one of -2, -1, +1, +2 semitones
//   variation   nudge one random note by +/-1 semitone
//   original    pass through
//
// After every transform each note is clamped into the piano range and then
// snapped to the nearest scale pitch, so the output only ever contains
// members of the input scale.

use crate::error::Result;
use crate::melody::{MelodyStrategy, check_request};
use crate::pitch::MelodyNote;
use crate::scale::snap_to_scale;
use rand::{Rng, RngCore};

/// Notes per motif unit.
pub const MOTIF_LENGTH: usize = 4;

/// A fresh motif is drawn whenever the output length is a multiple of this.
pub const MOTIF_REFRESH_INTERVAL: usize = 8;

const TRANSPOSE_STEPS: [i16; 4] = [-2, -1, 1, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Invert,
    Retrograde,
    Transpose,
    Original,
    Variation,
}

impl Transform {
    pub const ALL: [Transform; 5] = [
        Transform::Invert,
        Transform::Retrograde,
        Transform::Transpose,
        Transform::Original,
        Transform::Variation,
    ];

    /// Apply this transform to a motif. The result may leave the scale and
    /// the MIDI range; callers snap it afterwards.
    pub fn apply(self, motif: &[i16], rng: &mut dyn RngCore) -> Vec<i16> {
        match self {
            Transform::Invert => invert(motif),
            Transform::Retrograde => motif.iter().rev().copied().collect(),
            Transform::Transpose => {
                let steps = TRANSPOSE_STEPS[rng.random_range(0..TRANSPOSE_STEPS.len())];
                motif.iter().map(|&n| n + steps).collect()
            }
            Transform::Variation => {
                let mut varied = motif.to_vec();
                if !varied.is_empty() {
                    let idx = rng.random_range(0..varied.len());
                    varied[idx] += if rng.random_bool(0.5) { 1 } else { -1 };
                }
                varied
            }
            Transform::Original => motif.to_vec(),
        }
    }
}

/// Reflect each note around the motif's first note.
fn invert(motif: &[i16]) -> Vec<i16> {
    match motif.first() {
        Some(&first) => motif.iter().map(|&n| 2 * first - n).collect(),
        None => Vec::new(),
    }
}

/// Pick a transform uniformly, excluding the previous one.
fn choose_transform(last: Option<Transform>, rng: &mut dyn RngCore) -> Transform {
    let available: Vec<Transform> = Transform::ALL
        .into_iter()
        .filter(|&t| Some(t) != last)
        .collect();
    available[rng.random_range(0..available.len())]
}

/// Motif-based melody generator. Stateless; all state lives in one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotifTransformer;

impl MotifTransformer {
    /// Like `generate`, but also reports the transform used for each unit.
    pub fn generate_with_transforms(
        &self,
        scale: &[u8],
        length: usize,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<MelodyNote>, Vec<Transform>)> {
        check_request(scale, length)?;

        let mut melody: Vec<MelodyNote> = Vec::with_capacity(length + MOTIF_LENGTH);
        let mut transforms = Vec::new();
        let mut motif: Vec<i16> = Vec::new();
        let mut last: Option<Transform> = None;

        while melody.len() < length {
            if melody.len() % MOTIF_REFRESH_INTERVAL == 0 || last == Some(Transform::Original) {
                motif = (0..MOTIF_LENGTH)
                    .map(|_| scale[rng.random_range(0..scale.len())] as i16)
                    .collect();
            }

            let transform = choose_transform(last, rng);
            let unit = transform.apply(&motif, rng);
            melody.extend(unit.into_iter().map(|n| snap_to_scale(n, scale)));
            transforms.push(transform);
            last = Some(transform);
        }

        melody.truncate(length);
        Ok((melody, transforms))
    }
}

impl MelodyStrategy for MotifTransformer {
    fn generate(&self, scale: &[u8], length: usize, rng: &mut dyn RngCore) -> Result<Vec<MelodyNote>> {
        self.generate_with_transforms(scale, length, rng)
            .map(|(melody, _)| melody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{RootNote, ScaleType, resolve_scale};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_invert_reflects_around_first() {
        assert_eq!(invert(&[60, 64, 67, 62]), vec![60, 56, 53, 58]);
        assert!(invert(&[]).is_empty());
    }

    #[test]
    fn test_retrograde_and_original() {
        let mut rng = StdRng::seed_from_u64(0);
        let motif = [60, 62, 64, 65];
        assert_eq!(Transform::Retrograde.apply(&motif, &mut rng), vec![65, 64, 62, 60]);
        assert_eq!(Transform::Original.apply(&motif, &mut rng), motif.to_vec());
    }

    #[test]
    fn test_transpose_shifts_uniformly() {
        let mut rng = StdRng::seed_from_u64(8);
        let motif = [60, 62, 64, 65];
        for _ in 0..50 {
            let out = Transform::Transpose.apply(&motif, &mut rng);
            let shift = out[0] - motif[0];
            assert!(TRANSPOSE_STEPS.contains(&shift));
            assert!(out.iter().zip(&motif).all(|(o, m)| o - m == shift));
        }
    }

    #[test]
    fn test_variation_changes_exactly_one_note_by_one() {
        let mut rng = StdRng::seed_from_u64(9);
        let motif = [60, 62, 64, 65];
        for _ in 0..50 {
            let out = Transform::Variation.apply(&motif, &mut rng);
            let diffs: Vec<i16> = out.iter().zip(&motif).map(|(o, m)| o - m).collect();
            assert_eq!(diffs.iter().filter(|&&d| d != 0).count(), 1);
            assert!(diffs.iter().all(|d| d.abs() <= 1));
        }
    }

    #[test]
    fn test_length_eight_stays_in_major_scale() {
        let scale = resolve_scale(RootNote::C, ScaleType::Major);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let melody = MotifTransformer.generate(&scale, 8, &mut rng).unwrap();
            assert_eq!(melody.len(), 8);
            for note in &melody {
                assert!(scale.contains(note), "seed {seed}: {note} not in scale");
            }
        }
    }

    #[test]
    fn test_every_note_in_scale_for_long_melodies() {
        let scale = resolve_scale(RootNote::B, ScaleType::Minor);
        let mut rng = StdRng::seed_from_u64(77);
        let melody = MotifTransformer.generate(&scale, 500, &mut rng).unwrap();
        assert!(melody.iter().all(|n| scale.contains(n)));
    }

    #[test]
    fn test_no_transform_repeats_back_to_back() {
        let scale = resolve_scale(RootNote::F, ScaleType::Major);
        let mut rng = StdRng::seed_from_u64(123);
        let (_, transforms) = MotifTransformer
            .generate_with_transforms(&scale, 400, &mut rng)
            .unwrap();
        assert_eq!(transforms.len(), 100);
        for pair in transforms.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        // Over 100 units every transform should have been used.
        for t in Transform::ALL {
            assert!(transforms.contains(&t), "{t:?} never chosen");
        }
    }

    #[test]
    fn test_truncates_partial_unit() {
        let scale = resolve_scale(RootNote::C, ScaleType::Major);
        let mut rng = StdRng::seed_from_u64(4);
        let (melody, transforms) = MotifTransformer
            .generate_with_transforms(&scale, 6, &mut rng)
            .unwrap();
        assert_eq!(melody.len(), 6);
        assert_eq!(transforms.len(), 2);
    }

    #[test]
    fn test_single_pitch_scale() {
        let mut rng = StdRng::seed_from_u64(4);
        let melody = MotifTransformer.generate(&[72], 9, &mut rng).unwrap();
        assert_eq!(melody, vec![72; 9]);
    }
}
