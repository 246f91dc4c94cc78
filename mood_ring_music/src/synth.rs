// Oscillators and buffer helpers for the audio renderer.
//
// Everything here works on mono f32 buffers at a caller-supplied sample rate.
// Tones are generated from an absolute sample offset so that consecutive
// beat-length slices of the same tone join without phase jumps.

use rand::Rng;
use std::f64::consts::TAU;

/// Peak amplitude of single tones (kick, melody square).
pub const TONE_AMPLITUDE: f32 = 0.3;

/// Peak amplitude of the snare noise before filtering.
pub const NOISE_AMPLITUDE: f32 = 0.2;

/// Smoothing coefficient of the snare's one-pole low-pass.
const NOISE_SMOOTHING: f32 = 0.35;

/// `len` samples of a sine starting at absolute sample `offset`.
pub fn sine(freq: f64, offset: usize, len: usize, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let step = TAU * freq / sample_rate as f64;
    (offset..offset + len)
        .map(|n| amplitude * (step * n as f64).sin() as f32)
        .collect()
}

/// `len` samples of a square wave (sign of a sine) starting at `offset`.
pub fn square(freq: f64, offset: usize, len: usize, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let step = TAU * freq / sample_rate as f64;
    (offset..offset + len)
        .map(|n| {
            let s = (step * n as f64).sin();
            if s > 0.0 {
                amplitude
            } else if s < 0.0 {
                -amplitude
            } else {
                0.0
            }
        })
        .collect()
}

/// Low-passed white noise burst of `len` samples.
pub fn noise_burst(len: usize, amplitude: f32, rng: &mut impl Rng) -> Vec<f32> {
    let mut state = 0.0f32;
    (0..len)
        .map(|_| {
            let white: f32 = rng.random_range(-1.0..=1.0);
            state += NOISE_SMOOTHING * (white - state);
            // The filter loses roughly half the peak level; compensate.
            (2.0 * amplitude * state).clamp(-amplitude, amplitude)
        })
        .collect()
}

/// Square gate at `freq` Hz over `len` samples: 1.0 while the underlying
/// sine is positive (first half of each cycle), 0.0 otherwise.
pub fn gate(freq: f64, len: usize, sample_rate: u32) -> Vec<f32> {
    let step = TAU * freq / sample_rate as f64;
    (0..len)
        .map(|n| if (step * n as f64).sin() > 0.0 { 1.0 } else { 0.0 })
        .collect()
}

/// Trim or zero-pad `samples` to exactly `len`.
pub fn fit_to_length(samples: &[f32], len: usize) -> Vec<f32> {
    let mut out = samples[..samples.len().min(len)].to_vec();
    out.resize(len, 0.0);
    out
}

/// Read `source` at `rate` times normal speed with linear interpolation,
/// producing exactly `len` samples. Past the end of the source the output is
/// silence.
pub fn resample(source: &[f32], rate: f64, len: usize) -> Vec<f32> {
    if source.is_empty() || rate <= 0.0 || !rate.is_finite() {
        return vec![0.0; len];
    }
    let last = source.len() - 1;
    (0..len)
        .map(|i| {
            let pos = i as f64 * rate;
            let idx = pos as usize;
            if idx > last {
                return 0.0;
            }
            let frac = (pos - idx as f64) as f32;
            let a = source[idx];
            let b = source[(idx + 1).min(last)];
            a + (b - a) * frac
        })
        .collect()
}

/// Add `src` into `dst` starting at `offset`; whatever would overrun `dst`
/// is dropped.
pub fn mix_into(dst: &mut [f32], offset: usize, src: &[f32]) {
    if offset >= dst.len() {
        return;
    }
    for (d, s) in dst[offset..].iter_mut().zip(src) {
        *d += s;
    }
}
