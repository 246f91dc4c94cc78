// Error type for the music crate.
//
// Only genuine failures surface here: file I/O, WAV and MIDI encoding, config
// parsing, and violated generator preconditions. Musical fallbacks (unmapped
// key, unknown scale, missing sample, silent mix) are handled in place and
// never produce an error.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MusicError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Schedule(#[from] mood_ring_schedule::ScheduleError),

    #[error("unsupported WAV layout in {path}: {channels} channel(s), {bits}-bit (expected mono 16-bit PCM)")]
    UnsupportedWav {
        path: PathBuf,
        channels: u16,
        bits: u16,
    },

    #[error("cannot generate a melody from an empty scale")]
    EmptyScale,

    #[error("melody length must be at least 1")]
    ZeroLength,

    #[error("melody length {length} exceeds the maximum of {max}")]
    MelodyTooLong { length: usize, max: usize },

    #[error("sample rate must be greater than 0 Hz")]
    ZeroSampleRate,

    #[error("unknown melody strategy '{0}' (expected markov or motif)")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, MusicError>;
