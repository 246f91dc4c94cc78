// Rendered audio and its RIFF/WAVE container.
//
// `AudioBuffer` is the renderer's output: mono 16-bit PCM plus its sample
// rate. It converts to and from WAV bytes in memory (for handing to a player
// or download) and to and from files. Decoding accepts only mono 16-bit
// integer PCM, which is exactly what encoding produces.

use crate::error::{MusicError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;

/// Output sample rate of the renderer.
pub const SAMPLE_RATE: u32 = 44_100;

/// Mono 16-bit PCM audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Self {
        AudioBuffer {
            sample_rate,
            samples,
        }
    }

    /// Quantize normalized f32 samples (expected within [-1, 1]) to i16.
    pub fn from_normalized(sample_rate: u32, samples: &[f32]) -> Self {
        let quantized = samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .collect();
        AudioBuffer::new(sample_rate, quantized)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> u16 {
        self.samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
    }

    fn spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    /// Encode as an in-memory WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.samples.len() * 2 + 44));
        {
            let mut writer = WavWriter::new(&mut cursor, self.spec())?;
            for &s in &self.samples {
                writer.write_sample(s)?;
            }
            writer.finalize()?;
        }
        Ok(cursor.into_inner())
    }

    /// Decode an in-memory WAV file.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes))?;
        read_pcm16(reader, Path::new("<memory>"))
    }

    /// Write a WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let mut writer = WavWriter::create(path, self.spec())?;
        for &s in &self.samples {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Read a WAV file.
    pub fn read_wav(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path)?;
        read_pcm16(reader, path)
    }
}

fn read_pcm16<R: std::io::Read>(mut reader: WavReader<R>, path: &Path) -> Result<AudioBuffer> {
    let spec = reader.spec();
    if spec.channels != 1 || spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        return Err(MusicError::UnsupportedWav {
            path: path.to_path_buf(),
            channels: spec.channels,
            bits: spec.bits_per_sample,
        });
    }
    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(AudioBuffer::new(spec.sample_rate, samples))
}
