// Markov-walk melody strategy.
//
// The walk keeps a current index into the scale. Each step emits the pitch
// at that index, then moves the index by a step drawn from a transition
// table: down one, stay, or up one (weights 0.3 / 0.4 / 0.3 by default).
// Moves that would leave the scale are clamped at the edge, so a walk that
// reaches the top or bottom degree stays there until it draws a move back.
//
// The transition table is a weighted map rather than hard-coded branches so
// alternative step distributions can be supplied (e.g. wider leaps).

use crate::error::Result;
use crate::melody::{MelodyStrategy, check_request};
use crate::pitch::{MelodyNote, clamp_pitch};
use rand::{Rng, RngCore};
use std::collections::BTreeMap;

/// Step (in scale degrees) -> unnormalized weight.
pub type TransitionTable = BTreeMap<i8, f64>;

/// First-order random walk over scale degrees.
#[derive(Debug, Clone)]
pub struct MarkovWalk {
    /// Step distribution. Keys are index offsets, values are weights.
    pub transitions: TransitionTable,
    /// Pitch to start on, if it is in the scale. Otherwise the walk starts on
    /// the middle degree.
    pub start_pitch: Option<u8>,
}

impl Default for MarkovWalk {
    fn default() -> Self {
        MarkovWalk {
            transitions: default_transitions(),
            start_pitch: None,
        }
    }
}

/// Down 0.3, stay 0.4, up 0.3.
pub fn default_transitions() -> TransitionTable {
    TransitionTable::from([(-1, 0.3), (0, 0.4), (1, 0.3)])
}

impl MarkovWalk {
    pub fn starting_on(start_pitch: u8) -> Self {
        MarkovWalk {
            start_pitch: Some(start_pitch),
            ..Default::default()
        }
    }

    /// Index the walk starts from for a given scale.
    pub fn start_index(&self, scale: &[u8]) -> usize {
        self.start_pitch
            .and_then(|p| scale.iter().position(|&s| s == p))
            .unwrap_or(scale.len() / 2)
    }

    /// Run the walk and return the visited indices, one per emitted note.
    pub fn walk_indices(&self, scale_len: usize, start: usize, length: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let max_index = scale_len.saturating_sub(1) as i64;
        let mut index = start.min(max_index as usize);
        let mut visited = Vec::with_capacity(length);
        for _ in 0..length {
            visited.push(index);
            let step = sample_from_table(&self.transitions, rng.random::<f64>()).unwrap_or(0);
            index = (index as i64 + step as i64).clamp(0, max_index) as usize;
        }
        visited
    }
}

impl MelodyStrategy for MarkovWalk {
    fn generate(&self, scale: &[u8], length: usize, rng: &mut dyn RngCore) -> Result<Vec<MelodyNote>> {
        check_request(scale, length)?;
        let start = self.start_index(scale);
        let melody = self
            .walk_indices(scale.len(), start, length, rng)
            .into_iter()
            .map(|i| clamp_pitch(scale[i] as i16))
            .collect();
        Ok(melody)
    }
}

/// Sample a key from a weighted table using a random value in [0, 1).
fn sample_from_table(table: &TransitionTable, rng_val: f64) -> Option<i8> {
    if table.is_empty() {
        return None;
    }
    let total: f64 = table.values().sum();
    if total <= 0.0 {
        return None;
    }

    let target = rng_val * total;
    let mut cumulative = 0.0;
    for (&step, &weight) in table {
        cumulative += weight;
        if cumulative > target {
            return Some(step);
        }
    }
    // Rounding can leave target just past the last bucket.
    table.keys().next_back().copied()
}
