// Arrangement audio renderer.
//
// Renders an `Arrangement` into mono 16-bit PCM. The piece is laid out on a
// `BeatGrid` (whole 4-beat measures) and built from four layers, each the
// full buffer length:
//
// - kick on beat 0 of every measure, snare on beat 2: a library sample fitted
//   to one beat, or a synthesized 60 Hz sine / low-passed noise burst shaped
//   by the beat gate (kick in the first half of the beat, snare in the second)
// - pad: the arrangement's progression, one chord per measure, as three
//   stacked sines an octave below the melody register
// - melody: the melody tiled across every beat, one note per beat, as a
//   square wave or a pitch-shifted library sample with velocity and length
//   jitter
//
// The layers are summed, peak-normalized (a silent mix is left silent), and
// quantized. The renderer itself is immutable: the sample library is loaded
// beforehand and shared read-only, and all randomness comes from the caller's
// RNG.

use crate::arrangement::{Arrangement, BEATS_PER_MEASURE, BeatGrid};
use crate::pitch::{MelodyNote, midi_to_freq};
use crate::samples::{Sample, SampleLibrary};
use crate::scale::KeyScale;
use crate::synth::{self, NOISE_AMPLITUDE, TONE_AMPLITUDE};
use crate::wav::{AudioBuffer, SAMPLE_RATE};
use mood_ring_schedule::EnergyLevel;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info};

/// Kick drum tone frequency in Hz.
pub const KICK_FREQ: f64 = 60.0;

/// Amplitude of each of the three pad tones.
pub const PAD_TONE_AMPLITUDE: f32 = 0.1;

/// Extra gain on the melody layer relative to a plain tone.
pub const MELODY_GAIN: f32 = 0.8;

/// Octave offset of pad chords relative to the scale's reference octave.
const PAD_OCTAVE_SHIFT: i8 = -1;

/// Name of the kick sample in the library.
pub const KICK_SAMPLE: &str = "kick";
/// Name of the snare sample in the library.
pub const SNARE_SAMPLE: &str = "snare";

/// Sampled melody notes are played at a random velocity in this range
/// (MIDI scale) and held for a random fraction of the beat in the next.
const VELOCITY_RANGE: std::ops::RangeInclusive<u8> = 80..=127;
const LENGTH_JITTER: std::ops::RangeInclusive<f64> = 0.8..=1.2;

/// The four rendered layers before mixing, each `grid.total_samples` long.
#[derive(Debug, Clone, PartialEq)]
pub struct Layers {
    pub kick: Vec<f32>,
    pub snare: Vec<f32>,
    pub pad: Vec<f32>,
    pub melody: Vec<f32>,
}

impl Layers {
    fn silent(len: usize) -> Self {
        Layers {
            kick: vec![0.0; len],
            snare: vec![0.0; len],
            pad: vec![0.0; len],
            melody: vec![0.0; len],
        }
    }

    /// Sample-wise sum of all layers.
    pub fn mix(&self) -> Vec<f32> {
        let len = self
            .kick
            .len()
            .max(self.snare.len())
            .max(self.pad.len())
            .max(self.melody.len());
        let mut out = vec![0.0f32; len];
        for layer in [&self.kick, &self.snare, &self.pad, &self.melody] {
            synth::mix_into(&mut out, 0, layer);
        }
        out
    }
}

/// Renders arrangements to PCM. Cheap to clone; the library is shared.
#[derive(Debug, Clone)]
pub struct ArrangementAudioRenderer {
    sample_rate: u32,
    library: Option<Arc<SampleLibrary>>,
}

impl Default for ArrangementAudioRenderer {
    fn default() -> Self {
        Self::new(SAMPLE_RATE)
    }
}

impl ArrangementAudioRenderer {
    /// A renderer that synthesizes every layer.
    pub fn new(sample_rate: u32) -> Self {
        ArrangementAudioRenderer {
            sample_rate,
            library: None,
        }
    }

    /// A renderer that plays samples from `library` where available.
    pub fn with_library(sample_rate: u32, library: Arc<SampleLibrary>) -> Self {
        ArrangementAudioRenderer {
            sample_rate,
            library: Some(library),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn library(&self) -> Option<&SampleLibrary> {
        self.library.as_deref()
    }

    /// Render from loose parts. The chord progression is drawn from `rng`.
    pub fn render(
        &self,
        bpm: u16,
        key: KeyScale,
        melody: &[MelodyNote],
        duration_seconds: f64,
        energy: EnergyLevel,
        rng: &mut impl Rng,
    ) -> AudioBuffer {
        let arrangement = Arrangement::new(bpm, key, energy, melody.to_vec(), duration_seconds, rng);
        self.render_arrangement(&arrangement, rng)
    }

    /// Render an arrangement to normalized 16-bit PCM.
    pub fn render_arrangement(&self, arrangement: &Arrangement, rng: &mut impl Rng) -> AudioBuffer {
        let grid = arrangement.beat_grid(self.sample_rate);
        let layers = self.render_layers(arrangement, &grid, rng);
        let mut mix = layers.mix();
        let normalized = normalize(&mut mix);
        info!(
            bpm = grid.bpm,
            measures = grid.measures,
            samples = grid.total_samples,
            normalized,
            "rendered arrangement"
        );
        AudioBuffer::from_normalized(self.sample_rate, &mix)
    }

    /// Render each layer separately on `grid`.
    pub fn render_layers(&self, arrangement: &Arrangement, grid: &BeatGrid, rng: &mut impl Rng) -> Layers {
        let mut layers = Layers::silent(grid.total_samples);
        let gate = synth::gate(grid.beats_per_second(), grid.total_samples, self.sample_rate);
        let scale = arrangement.key.pitches();

        let kick_sample = self.library().and_then(|l| l.get(KICK_SAMPLE));
        let snare_sample = self.library().and_then(|l| l.get(SNARE_SAMPLE));
        debug!(
            kick_sampled = kick_sample.is_some(),
            snare_sampled = snare_sample.is_some(),
            melody_sampled = self.library().is_some_and(|l| l.has_pitched()),
            "layer sources"
        );

        for beat in 0..grid.num_beats() {
            let span = grid.beat_span(beat);
            let len = span.len();
            if len == 0 {
                continue;
            }

            // Rhythm
            match beat % BEATS_PER_MEASURE {
                0 => {
                    let hit = match kick_sample {
                        Some(sample) => self.fit_sample(sample, len),
                        None => {
                            let mut tone = synth::sine(KICK_FREQ, span.start, len, self.sample_rate, TONE_AMPLITUDE);
                            for (s, g) in tone.iter_mut().zip(&gate[span.clone()]) {
                                *s *= g;
                            }
                            tone
                        }
                    };
                    synth::mix_into(&mut layers.kick, span.start, &hit);
                }
                2 => {
                    let hit = match snare_sample {
                        Some(sample) => self.fit_sample(sample, len),
                        None => {
                            let mut noise = synth::noise_burst(len, NOISE_AMPLITUDE, rng);
                            for (s, g) in noise.iter_mut().zip(&gate[span.clone()]) {
                                *s *= 1.0 - g;
                            }
                            noise
                        }
                    };
                    synth::mix_into(&mut layers.snare, span.start, &hit);
                }
                _ => {}
            }

            // Pad
            let measure = beat / BEATS_PER_MEASURE;
            let chord = arrangement
                .progression
                .chord_for_measure(&scale, measure, PAD_OCTAVE_SHIFT);
            for pitch in chord {
                let tone = synth::sine(midi_to_freq(pitch), span.start, len, self.sample_rate, PAD_TONE_AMPLITUDE);
                synth::mix_into(&mut layers.pad, span.start, &tone);
            }

            // Melody
            if arrangement.melody.is_empty() {
                continue;
            }
            let pitch = arrangement.melody[beat % arrangement.melody.len()];
            let note = self.melody_note(pitch, span.start, len, rng);
            synth::mix_into(&mut layers.melody, span.start, &note);
        }

        layers
    }

    /// A library sample at its original pitch, trimmed or padded to `len`.
    fn fit_sample(&self, sample: &Sample, len: usize) -> Vec<f32> {
        let rate = sample.sample_rate as f64 / self.sample_rate as f64;
        synth::resample(&sample.data, rate, len)
    }

    /// One beat of melody at `pitch`.
    fn melody_note(&self, pitch: MelodyNote, offset: usize, len: usize, rng: &mut impl Rng) -> Vec<f32> {
        let target_freq = midi_to_freq(pitch);
        let pitched = self.library().and_then(|l| l.nearest_pitched(pitch));
        let Some(pitched) = pitched else {
            let mut tone = synth::square(target_freq, offset, len, self.sample_rate, TONE_AMPLITUDE);
            tone.iter_mut().for_each(|s| *s *= MELODY_GAIN);
            return tone;
        };

        let velocity = rng.random_range(VELOCITY_RANGE);
        let gain = MELODY_GAIN * velocity as f32 / 127.0;
        let held = ((len as f64 * rng.random_range(LENGTH_JITTER)).round() as usize).min(len);

        let rate = target_freq / pitched.base_freq() * pitched.sample.sample_rate as f64 / self.sample_rate as f64;
        let mut note = synth::resample(&pitched.sample.data, rate, held);
        note.iter_mut().for_each(|s| *s *= gain);
        synth::fit_to_length(&note, len)
    }
}

/// Divide every sample by the peak absolute value.
///
/// Returns false (and leaves the buffer untouched) when every sample is zero,
/// since there is no peak to divide by.
pub fn normalize(buffer: &mut [f32]) -> bool {
    let peak = buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak == 0.0 {
        return false;
    }
    for s in buffer.iter_mut() {
        *s /= peak;
    }
    true
}
