// MIDI pitch helpers: valid melody range, frequency conversion, and note names.
//
// Pitches are MIDI note numbers throughout the crate. Melody notes must lie in
// the piano range [MIN_PITCH, MAX_PITCH]; `clamp_pitch` takes arbitrary signed
// intermediate values (e.g. after motif inversion) back into that range.
// Note names ("C4", "F#3", "Bb2") are used to key the sample library.

/// A melody pitch, always within [MIN_PITCH, MAX_PITCH].
pub type MelodyNote = u8;

/// Lowest piano key (A0).
pub const MIN_PITCH: u8 = 21;
/// Highest piano key (C8).
pub const MAX_PITCH: u8 = 108;

/// Clamp a signed intermediate pitch into the piano range.
pub fn clamp_pitch(pitch: i16) -> u8 {
    pitch.clamp(MIN_PITCH as i16, MAX_PITCH as i16) as u8
}

/// Equal-tempered frequency of a MIDI pitch, A4 (69) = 440 Hz.
pub fn midi_to_freq(pitch: u8) -> f64 {
    440.0 * 2f64.powf((pitch as f64 - 69.0) / 12.0)
}

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Compact note name for a MIDI pitch, e.g. 60 -> "C4".
pub fn pitch_name(pitch: u8) -> String {
    let octave = pitch as i16 / 12 - 1;
    format!("{}{}", PITCH_CLASS_NAMES[(pitch % 12) as usize], octave)
}

/// Parse a note name such as "C4", "F#3", "Bb2", or "c#-1" into a MIDI pitch.
///
/// Accepts `#` and `b` accidentals. Returns None for anything that is not a
/// letter, optional accidental, and signed octave, or that falls outside 0-127.
pub fn parse_note_name(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let base: i16 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, octave_str) = if let Some(r) = rest.strip_prefix('#') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (-1, r)
    } else {
        (0, rest)
    };
    let octave: i16 = octave_str.parse().ok()?;
    let pitch = octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(base + accidental)?;
    u8::try_from(pitch).ok().filter(|&p| p <= 127)
}
