// Melody generation contract and strategy selection.
//
// A melody strategy turns a scale (the seven pitches of the arrangement's key)
// into a sequence of exactly `length` pitches. Two strategies implement the
// `MelodyStrategy` trait:
// - markov.rs: `MarkovWalk`, a random walk over scale indices
// - motif.rs: `MotifTransformer`, 4-note motifs under musical transforms
//
// Strategies take the RNG as a trait object so they can be boxed and chosen
// at runtime from `MelodyStrategyKind`. Seeding the RNG makes the output
// reproducible.

use crate::error::{MusicError, Result};
use crate::markov::MarkovWalk;
use crate::motif::MotifTransformer;
use crate::pitch::MelodyNote;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest melody a strategy will generate (256 measures of eighth notes).
pub const MAX_MELODY_LENGTH: usize = 2048;

/// A pitch-sequence generator over a fixed scale.
pub trait MelodyStrategy {
    /// Produce exactly `length` notes drawn from (or snapped onto) `scale`.
    ///
    /// Fails if `scale` is empty or `length` is zero or above
    /// `MAX_MELODY_LENGTH`.
    fn generate(&self, scale: &[u8], length: usize, rng: &mut dyn RngCore) -> Result<Vec<MelodyNote>>;
}

/// Which strategy to use, as named in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MelodyStrategyKind {
    #[default]
    Markov,
    Motif,
}

impl MelodyStrategyKind {
    /// Build the strategy with its default settings.
    pub fn strategy(self) -> Box<dyn MelodyStrategy> {
        match self {
            MelodyStrategyKind::Markov => Box::new(MarkovWalk::default()),
            MelodyStrategyKind::Motif => Box::new(MotifTransformer),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MelodyStrategyKind::Markov => "markov",
            MelodyStrategyKind::Motif => "motif",
        }
    }
}

impl fmt::Display for MelodyStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MelodyStrategyKind {
    type Err = MusicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markov" => Ok(MelodyStrategyKind::Markov),
            "motif" => Ok(MelodyStrategyKind::Motif),
            _ => Err(MusicError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Generate a melody with the chosen strategy.
pub fn generate_melody(
    kind: MelodyStrategyKind,
    scale: &[u8],
    length: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<MelodyNote>> {
    kind.strategy().generate(scale, length, rng)
}

/// Shared precondition check for strategies.
pub(crate) fn check_request(scale: &[u8], length: usize) -> Result<()> {
    if scale.is_empty() {
        return Err(MusicError::EmptyScale);
    }
    check_length(length)
}

/// Reject melody lengths outside 1..=MAX_MELODY_LENGTH.
pub fn check_length(length: usize) -> Result<()> {
    if length == 0 {
        return Err(MusicError::ZeroLength);
    }
    if length > MAX_MELODY_LENGTH {
        return Err(MusicError::MelodyTooLong {
            length,
            max: MAX_MELODY_LENGTH,
        });
    }
    Ok(())
}
