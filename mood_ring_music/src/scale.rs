// Major/minor scale support.
//
// A key is a root letter plus a scale type. Resolving a key yields seven
// absolute MIDI pitches starting from the root's reference pitch in the
// octave above middle C (C=60 through B=71). Those seven pitches are the
// whole pitch vocabulary of an arrangement: melody strategies draw from them
// and snap back onto them, and the pad/chord layers build triads on them.
//
// This module provides:
// - Root and scale-type definitions with their static tables
// - Name parsing with silent fallbacks (unknown root -> C, unknown scale -> major)
// - Scale resolution and nearest-pitch snapping
// - Diatonic triads on a scale degree
//
// Used by key.rs (selection), melody strategies, render.rs and midi.rs.

use crate::pitch::clamp_pitch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven natural root letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootNote {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl RootNote {
    pub const ALL: [RootNote; 7] = [
        RootNote::C,
        RootNote::D,
        RootNote::E,
        RootNote::F,
        RootNote::G,
        RootNote::A,
        RootNote::B,
    ];

    /// Reference MIDI pitch of the root, in the octave starting at middle C.
    pub fn reference_pitch(self) -> u8 {
        match self {
            RootNote::C => 60,
            RootNote::D => 62,
            RootNote::E => 64,
            RootNote::F => 65,
            RootNote::G => 67,
            RootNote::A => 69,
            RootNote::B => 71,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RootNote::C => "C",
            RootNote::D => "D",
            RootNote::E => "E",
            RootNote::F => "F",
            RootNote::G => "G",
            RootNote::A => "A",
            RootNote::B => "B",
        }
    }

    /// Parse a root letter (case-insensitive). Returns None if unknown.
    pub fn parse(name: &str) -> Option<RootNote> {
        RootNote::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Parse a root letter, falling back to C.
    pub fn from_name(name: &str) -> RootNote {
        Self::parse(name).unwrap_or(RootNote::C)
    }
}

/// Scale quality. Each has a fixed 7-entry interval set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Major,
    Minor,
}

impl ScaleType {
    /// Semitone offsets from the root to each scale degree.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            ScaleType::Major => [0, 2, 4, 5, 7, 9, 11],
            ScaleType::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Minor => "minor",
        }
    }

    /// Parse a scale name; anything unrecognized is treated as major.
    pub fn from_name(name: &str) -> ScaleType {
        if name.trim().eq_ignore_ascii_case("minor") {
            ScaleType::Minor
        } else {
            ScaleType::Major
        }
    }
}

/// A key: root letter plus scale type. Fixed for the lifetime of an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyScale {
    pub root: RootNote,
    pub scale: ScaleType,
}

impl KeyScale {
    pub const fn new(root: RootNote, scale: ScaleType) -> Self {
        KeyScale { root, scale }
    }

    /// C major, the fallback key.
    pub const fn c_major() -> Self {
        KeyScale::new(RootNote::C, ScaleType::Major)
    }

    /// The seven absolute pitches of this key.
    pub fn pitches(&self) -> [u8; 7] {
        resolve_scale(self.root, self.scale)
    }
}

impl fmt::Display for KeyScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root.name(), self.scale.name())
    }
}

/// Expand a root and scale type into seven ascending MIDI pitches.
pub fn resolve_scale(root: RootNote, scale: ScaleType) -> [u8; 7] {
    let base = root.reference_pitch();
    scale.intervals().map(|iv| base + iv)
}

/// Name-based resolution with the same fallbacks as the parsers:
/// unknown root -> C, unknown scale -> major.
pub fn resolve_scale_by_name(root: &str, scale: &str) -> [u8; 7] {
    resolve_scale(RootNote::from_name(root), ScaleType::from_name(scale))
}

/// Snap a pitch to the nearest member of `scale`.
///
/// The pitch is first clamped into the melody range. Distance ties go to the
/// candidate that appears earlier in `scale`. An empty scale returns the
/// clamped pitch unchanged.
pub fn snap_to_scale(pitch: i16, scale: &[u8]) -> u8 {
    let clamped = clamp_pitch(pitch);
    scale
        .iter()
        .copied()
        .min_by_key(|&s| (s as i16 - clamped as i16).abs())
        .unwrap_or(clamped)
}

/// Diatonic triad on a scale degree: root, third, fifth.
///
/// The third is whatever the scale puts two degrees above (a minor or major
/// third, +3 or +4 semitones); the fifth is always a perfect fifth (+7).
pub fn triad(scale: &[u8; 7], degree: usize) -> [u8; 3] {
    let d = degree % 7;
    let root = scale[d];
    let upper = d + 2;
    let third_pitch = scale[upper % 7] as i16 + 12 * (upper / 7) as i16;
    let third = if third_pitch - root as i16 == 3 { 3 } else { 4 };
    [root, root + third, root + 7]
}
