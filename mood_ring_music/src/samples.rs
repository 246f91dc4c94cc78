// Optional sample library for the audio renderer.
//
// A sample directory holds single-note WAV files named by what they are:
// `kick.wav`, `snare.wav`, and pitched notes such as `C4.wav` or `F#3.wav`.
// The directory is scanned once; every readable WAV is decoded to mono f32
// and kept in memory under its file stem. After loading the library is
// read-only and is shared between renderers behind an `Arc`.
//
// Missing or unreadable files never fail the load. They are logged and
// skipped, and the renderer falls back to synthesized tones for that layer.

use crate::error::Result;
use crate::pitch::{midi_to_freq, parse_note_name};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

/// A decoded mono sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub data: Vec<f32>,
    pub sample_rate: u32,
}

impl Sample {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A pitched sample found for a target note.
#[derive(Debug, Clone, Copy)]
pub struct PitchedSample<'a> {
    pub sample: &'a Sample,
    /// MIDI pitch the sample was recorded at.
    pub base_pitch: u8,
}

impl PitchedSample<'_> {
    pub fn base_freq(&self) -> f64 {
        midi_to_freq(self.base_pitch)
    }
}

/// In-memory samples keyed by file stem, plus an index of note-named samples.
#[derive(Debug, Clone, Default)]
pub struct SampleLibrary {
    samples: HashMap<String, Sample>,
    /// MIDI pitch -> key in `samples`, for note-named files only.
    pitched: BTreeMap<u8, String>,
}

impl SampleLibrary {
    /// An empty library (everything synthesized).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `dir` for `.wav` files and load them all.
    ///
    /// A missing directory yields an empty library. Only an error listing an
    /// existing directory is returned as an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut library = SampleLibrary::empty();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "sample directory not found; using synthesized sounds");
            return Ok(library);
        }

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_wav = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
            if !is_wav {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_wav_mono(&path) {
                Ok(sample) => {
                    debug!(name, frames = sample.len(), "loaded sample");
                    library.insert(name, sample);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable sample"),
            }
        }

        info!(
            dir = %dir.display(),
            samples = library.samples.len(),
            pitched = library.pitched.len(),
            "sample library loaded"
        );
        Ok(library)
    }

    /// Add a sample. Note-named entries (e.g. "A4") are also indexed by pitch.
    pub fn insert(&mut self, name: &str, sample: Sample) {
        if let Some(pitch) = parse_note_name(name) {
            self.pitched.insert(pitch, name.to_string());
        }
        self.samples.insert(name.to_string(), sample);
    }

    pub fn get(&self, name: &str) -> Option<&Sample> {
        self.samples.get(name)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn has_pitched(&self) -> bool {
        !self.pitched.is_empty()
    }

    /// The note-named sample closest in pitch to `pitch` (lower wins ties).
    pub fn nearest_pitched(&self, pitch: u8) -> Option<PitchedSample<'_>> {
        let below = self.pitched.range(..=pitch).next_back();
        let above = self.pitched.range(pitch..).next();
        let (&base_pitch, name) = match (below, above) {
            (Some(b), Some(a)) => {
                if pitch - *b.0 <= *a.0 - pitch {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };
        self.samples
            .get(name)
            .map(|sample| PitchedSample { sample, base_pitch })
    }
}

/// Decode a WAV file to mono f32 in [-1, 1]. Multi-channel input is averaged.
pub fn load_wav_mono(path: &Path) -> Result<Sample> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let raw: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let data = if channels == 1 {
        raw
    } else {
        raw.chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(Sample {
        data,
        sample_rate: spec.sample_rate,
    })
}
