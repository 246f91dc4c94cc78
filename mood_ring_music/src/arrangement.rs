// The arrangement: everything both renderers need, fixed for one invocation.
//
// An `Arrangement` bundles tempo, key, energy, melody, requested duration and
// the chosen chord progression. It is built once and handed by reference to
// the audio renderer and the MIDI serializer, so the two outputs share one
// tempo, key and progression.
//
// `BeatGrid` is the time layout for audio: the requested duration quantized
// down to whole 4-beat measures (at least one), and the sample span of every
// beat. Beat boundaries are rounded from the exact fractional positions so
// that the final boundary lands exactly on `total_samples`.

use crate::error::Result;
use crate::key::select_key;
use crate::melody::{MelodyStrategyKind, generate_melody};
use crate::pitch::MelodyNote;
use crate::progression::Progression;
use crate::scale::KeyScale;
use mood_ring_schedule::{Alignment, EnergyLevel, MAX_BPM, MIN_BPM};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Beats per measure (4/4).
pub const BEATS_PER_MEASURE: usize = 4;

/// Longest arrangement the renderer will produce, in seconds.
pub const MAX_DURATION_SECONDS: f64 = 60.0;

/// Clamp a tempo into the supported range.
pub fn clamp_bpm(bpm: u16) -> u16 {
    bpm.clamp(MIN_BPM, MAX_BPM)
}

/// A complete arrangement, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    /// Tempo in quarter-note beats per minute, always within [80, 160].
    pub bpm: u16,
    pub key: KeyScale,
    pub energy: EnergyLevel,
    /// Never empty.
    pub melody: Vec<MelodyNote>,
    /// Requested length in seconds, before measure quantization.
    pub duration_seconds: f64,
    pub progression: Progression,
}

impl Arrangement {
    /// Assemble an arrangement from parts. The tempo is clamped; the
    /// progression is picked at random for the energy level.
    pub fn new(
        bpm: u16,
        key: KeyScale,
        energy: EnergyLevel,
        melody: Vec<MelodyNote>,
        duration_seconds: f64,
        rng: &mut impl Rng,
    ) -> Self {
        Arrangement {
            bpm: clamp_bpm(bpm),
            key,
            energy,
            melody,
            duration_seconds,
            progression: Progression::choose(energy, rng),
        }
    }

    /// Full pipeline from mood: key selection, scale resolution, melody.
    pub fn from_mood(
        alignment: Alignment,
        energy: EnergyLevel,
        bpm: u16,
        strategy: MelodyStrategyKind,
        melody_length: usize,
        duration_seconds: f64,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let key = select_key(alignment, energy);
        let scale = key.pitches();
        let melody = generate_melody(strategy, &scale, melody_length, rng)?;
        Ok(Self::new(bpm, key, energy, melody, duration_seconds, rng))
    }

    /// Audio time layout at a given sample rate.
    pub fn beat_grid(&self, sample_rate: u32) -> BeatGrid {
        BeatGrid::new(self.bpm, self.duration_seconds, sample_rate)
    }
}

/// Measure-quantized time layout for audio rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatGrid {
    pub sample_rate: u32,
    pub bpm: u16,
    pub measures: usize,
    /// Exact (fractional) samples per beat.
    pub samples_per_beat: f64,
    pub total_samples: usize,
}

impl BeatGrid {
    /// Quantize `requested_seconds` down to whole measures (minimum one).
    /// The request is capped at `MAX_DURATION_SECONDS`; non-positive or NaN
    /// requests get a single measure.
    pub fn new(bpm: u16, requested_seconds: f64, sample_rate: u32) -> Self {
        let bpm = clamp_bpm(bpm);
        let requested = if requested_seconds.is_finite() {
            requested_seconds.clamp(0.0, MAX_DURATION_SECONDS)
        } else if requested_seconds == f64::INFINITY {
            MAX_DURATION_SECONDS
        } else {
            0.0
        };
        let measure_seconds = measure_duration(bpm);
        let measures = ((requested / measure_seconds).floor() as usize).max(1);
        let duration = measures as f64 * measure_seconds;
        BeatGrid {
            sample_rate,
            bpm,
            measures,
            samples_per_beat: sample_rate as f64 * 60.0 / bpm as f64,
            total_samples: (sample_rate as f64 * duration).round() as usize,
        }
    }

    pub fn beats_per_second(&self) -> f64 {
        self.bpm as f64 / 60.0
    }

    pub fn num_beats(&self) -> usize {
        self.measures * BEATS_PER_MEASURE
    }

    /// Quantized duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.measures as f64 * measure_duration(self.bpm)
    }

    /// Sample span of beat `i`, truncated at the buffer end.
    pub fn beat_span(&self, i: usize) -> Range<usize> {
        let start = ((i as f64 * self.samples_per_beat).round() as usize).min(self.total_samples);
        let end = if i + 1 >= self.num_beats() {
            self.total_samples
        } else {
            (((i + 1) as f64 * self.samples_per_beat).round() as usize).min(self.total_samples)
        };
        start..end.max(start)
    }
}

/// Length of one 4-beat measure in seconds.
pub fn measure_duration(bpm: u16) -> f64 {
    BEATS_PER_MEASURE as f64 * 60.0 / bpm as f64
}
