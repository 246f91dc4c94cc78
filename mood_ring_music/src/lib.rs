// Mood Ring Music Generator
//
// Turns a mood (an activity/energy alignment, an energy level and a tempo,
// computed by the `mood_ring_schedule` crate) into a short instrumental
// arrangement: a key, a melody, and a chord progression, rendered both as
// mono 16-bit WAV audio and as a five-track MIDI file.
//
// Pipeline: mood -> key selection -> scale -> melody -> arrangement ->
// {audio renderer, MIDI serializer}. Both outputs read the same
// `Arrangement`, so they agree on tempo, key and chords.
//
// Architecture:
// - pitch.rs: MIDI pitch range, frequency conversion, note-name parsing
// - scale.rs: Root notes, major/minor intervals, scale resolution, snapping,
//   diatonic triads
// - key.rs: Mood -> key lookup table with a fixed fallback
// - melody.rs: `MelodyStrategy` trait and strategy selection
// - markov.rs: Random-walk melody over scale indices
// - motif.rs: Motif-transformation melody (transpose/invert/retrograde/...)
// - progression.rs: Energy-keyed 4-chord progressions
// - arrangement.rs: The shared arrangement and the measure-quantized beat grid
// - synth.rs: Oscillators, noise, resampling and mixing helpers
// - samples.rs: Optional WAV sample library, loaded once and shared
// - render.rs: Layered audio rendering (rhythm, pad, melody) + normalization
// - wav.rs: `AudioBuffer` and its WAV encoding
// - midi.rs: Five-track Standard MIDI File export
// - config.rs: JSON generator configuration
// - error.rs: Crate error type
//
// All randomness flows through a caller-supplied RNG, so a seeded run is
// reproducible end to end.

pub mod arrangement;
pub mod config;
pub mod error;
pub mod key;
pub mod markov;
pub mod melody;
pub mod midi;
pub mod motif;
pub mod pitch;
pub mod progression;
pub mod render;
pub mod samples;
pub mod scale;
pub mod synth;
pub mod wav;

pub use arrangement::Arrangement;
pub use config::GeneratorConfig;
pub use error::{MusicError, Result};
pub use melody::{MelodyStrategy, MelodyStrategyKind};
pub use render::ArrangementAudioRenderer;
pub use scale::KeyScale;
pub use wav::AudioBuffer;
