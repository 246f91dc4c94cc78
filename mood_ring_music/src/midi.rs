// MIDI export of an arrangement.
//
// Writes a Standard MIDI File (format 1, 480 ticks per quarter note) with one
// track per layer: kick, snare, pad, chord stab, melody. Each track opens
// with its name and a tempo meta-event, carries note-on/note-off pairs, and
// closes with end-of-track.
//
// Timing: the melody plays one note per eighth note. The piece runs for the
// melody rounded up to whole 8-beat pad spans. Drums sit on channel 10 (index
// 9) using General MIDI drum keys; the pitched layers each get their own
// channel and program.
//
// Notes are first laid out at absolute ticks, then flattened into delta-timed
// events with note-offs ahead of note-ons at the same tick so repeated
// pitches retrigger cleanly. Melodies longer than `MAX_MELODY_LENGTH` are
// cut to that length so every tick fits the file's 28-bit delta times.
//
// Uses the `midly` crate for the file encoding.

use crate::arrangement::{Arrangement, BEATS_PER_MEASURE, clamp_bpm};
use crate::error::Result;
use crate::melody::MAX_MELODY_LENGTH;
use crate::pitch::MelodyNote;
use crate::progression::Progression;
use crate::scale::{KeyScale, triad};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use mood_ring_schedule::EnergyLevel;
use std::path::Path;
use tracing::{debug, warn};

/// Ticks per quarter note.
pub const TICKS_PER_BEAT: u16 = 480;

/// Ticks per eighth note, the melody's step.
pub const TICKS_PER_EIGHTH: u32 = TICKS_PER_BEAT as u32 / 2;

/// Beats covered by one sustained pad chord.
pub const PAD_SPAN_BEATS: usize = 8;

/// General MIDI percussion channel (channel 10, zero-based).
const DRUM_CHANNEL: u8 = 9;
const KICK_KEY: u8 = 36;
const SNARE_KEY: u8 = 38;

const DRUM_VELOCITY: u8 = 100;
const PAD_VELOCITY: u8 = 50;
const STAB_VELOCITY: u8 = 80;
const MELODY_VELOCITY: u8 = 90;

/// Energy whose default progression is used when no arrangement is given.
const DEFAULT_ENERGY: EnergyLevel = EnergyLevel::Moderate;

/// One note at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Note {
    tick: u32,
    length: u32,
    key: u8,
    velocity: u8,
}

/// Channel and instrument of one output track.
struct TrackSpec {
    name: &'static str,
    channel: u8,
    /// General MIDI program, or None for the drum channel.
    program: Option<u8>,
}

const KICK_TRACK: TrackSpec = TrackSpec {
    name: "Kick",
    channel: DRUM_CHANNEL,
    program: None,
};
const SNARE_TRACK: TrackSpec = TrackSpec {
    name: "Snare",
    channel: DRUM_CHANNEL,
    program: None,
};
// Pad 2 (warm)
const PAD_TRACK: TrackSpec = TrackSpec {
    name: "Pad",
    channel: 0,
    program: Some(89),
};
// Acoustic grand
const CHORD_TRACK: TrackSpec = TrackSpec {
    name: "Chords",
    channel: 1,
    program: Some(0),
};
// Lead 1 (square)
const MELODY_TRACK: TrackSpec = TrackSpec {
    name: "Melody",
    channel: 2,
    program: Some(80),
};

/// Tempo meta value: microseconds per quarter note.
pub fn tempo_microseconds(bpm: u16) -> u32 {
    60_000_000 / clamp_bpm(bpm) as u32
}

/// Number of quarter-note beats the MIDI piece spans for a melody length.
pub fn piece_beats(melody_len: usize) -> usize {
    let beats = melody_len.max(1).div_ceil(2);
    beats.div_ceil(PAD_SPAN_BEATS).max(1) * PAD_SPAN_BEATS
}

/// Serialize a melody at `bpm` in C major with the default progression.
pub fn serialize(bpm: u16, melody: &[MelodyNote]) -> Smf<'static> {
    build(
        bpm,
        KeyScale::c_major(),
        Progression::default_for(DEFAULT_ENERGY),
        melody,
    )
}

/// Serialize an arrangement using its tempo, key and progression.
pub fn serialize_arrangement(arrangement: &Arrangement) -> Smf<'static> {
    build(
        arrangement.bpm,
        arrangement.key,
        arrangement.progression,
        &arrangement.melody,
    )
}

fn build(bpm: u16, key: KeyScale, progression: Progression, melody: &[MelodyNote]) -> Smf<'static> {
    let melody = if melody.len() > MAX_MELODY_LENGTH {
        warn!(
            notes = melody.len(),
            kept = MAX_MELODY_LENGTH,
            "melody too long for MIDI export; truncating"
        );
        &melody[..MAX_MELODY_LENGTH]
    } else {
        melody
    };
    let scale = key.pitches();
    let total_beats = piece_beats(melody.len());
    let beat_tick = |beat: usize| beat as u32 * TICKS_PER_BEAT as u32;

    let drum_hits = |on_beat: usize, key: u8| -> Vec<Note> {
        (0..total_beats)
            .filter(|b| b % BEATS_PER_MEASURE == on_beat)
            .map(|b| Note {
                tick: beat_tick(b),
                length: TICKS_PER_EIGHTH,
                key,
                velocity: DRUM_VELOCITY,
            })
            .collect()
    };
    let kick = drum_hits(0, KICK_KEY);
    let snare = drum_hits(2, SNARE_KEY);

    let tonic = triad(&scale, 0);
    let pad: Vec<Note> = (0..total_beats / PAD_SPAN_BEATS)
        .flat_map(|span| {
            tonic.map(|key| Note {
                tick: beat_tick(span * PAD_SPAN_BEATS),
                length: beat_tick(PAD_SPAN_BEATS),
                key,
                velocity: PAD_VELOCITY,
            })
        })
        .collect();

    let mut stabs = Vec::new();
    for measure in 0..total_beats / BEATS_PER_MEASURE {
        let chord = progression.chord_for_measure(&scale, measure, 0);
        for beat in [0, 2] {
            let tick = beat_tick(measure * BEATS_PER_MEASURE + beat);
            stabs.extend(chord.map(|key| Note {
                tick,
                length: TICKS_PER_EIGHTH,
                key,
                velocity: STAB_VELOCITY,
            }));
        }
    }

    let lead: Vec<Note> = melody
        .iter()
        .enumerate()
        .map(|(i, &key)| Note {
            tick: i as u32 * TICKS_PER_EIGHTH,
            length: TICKS_PER_EIGHTH,
            key,
            velocity: MELODY_VELOCITY,
        })
        .collect();

    let tempo = tempo_microseconds(bpm);
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));
    for (layer, notes) in [
        (&KICK_TRACK, &kick),
        (&SNARE_TRACK, &snare),
        (&PAD_TRACK, &pad),
        (&CHORD_TRACK, &stabs),
        (&MELODY_TRACK, &lead),
    ] {
        smf.tracks.push(build_track(layer, tempo, notes));
    }

    debug!(
        bpm = clamp_bpm(bpm),
        key = %key,
        beats = total_beats,
        melody_notes = melody.len(),
        "serialized MIDI"
    );
    smf
}

/// Flatten absolute-tick notes into a delta-timed track.
fn build_track(layer: &TrackSpec, tempo: u32, notes: &[Note]) -> Track<'static> {
    let channel = u4::new(layer.channel);
    let mut track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(layer.name.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo))),
        },
    ];
    if let Some(program) = layer.program {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(program),
                },
            },
        });
    }

    // (tick, is_on, key, velocity); false < true puts offs first.
    let mut events: Vec<(u32, bool, u8, u8)> = notes
        .iter()
        .flat_map(|n| {
            [
                (n.tick, true, n.key, n.velocity),
                (n.tick + n.length, false, n.key, 0),
            ]
        })
        .collect();
    events.sort();

    let mut last_tick = 0u32;
    for (tick, is_on, key, velocity) in events {
        let key = u7::new(key.min(127));
        let message = if is_on {
            MidiMessage::NoteOn {
                key,
                vel: u7::new(velocity.min(127)),
            }
        } else {
            MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

/// Encode a MIDI file in memory.
pub fn to_bytes(smf: &Smf<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Write a MIDI file to disk.
pub fn write_midi(smf: &Smf<'_>, path: &Path) -> Result<()> {
    std::fs::write(path, to_bytes(smf)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{RootNote, ScaleType};

    /// (absolute tick, key, velocity) of every note-on in a track.
    fn note_ons(track: &[TrackEvent<'_>]) -> Vec<(u32, u8, u8)> {
        let mut tick = 0u32;
        let mut out = Vec::new();
        for event in track {
            tick += event.delta.as_int();
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                out.push((tick, key.as_int(), vel.as_int()));
            }
        }
        out
    }

    fn note_offs(track: &[TrackEvent<'_>]) -> usize {
        track
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOff { .. },
                        ..
                    }
                )
            })
            .count()
    }

    #[test]
    fn test_header_and_track_layout() {
        let smf = serialize(120, &[60, 62, 64, 65]);
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 5);

        let names: Vec<&[u8]> = smf
            .tracks
            .iter()
            .map(|t| match t[0].kind {
                TrackEventKind::Meta(MetaMessage::TrackName(name)) => name,
                _ => panic!("track does not start with a name"),
            })
            .collect();
        assert_eq!(
            names,
            vec![&b"Kick"[..], &b"Snare"[..], &b"Pad"[..], &b"Chords"[..], &b"Melody"[..]]
        );

        for track in &smf.tracks {
            assert_eq!(
                track[1].kind,
                TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
            );
            assert_eq!(
                track.last().map(|e| e.kind),
                Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
            );
            assert_eq!(note_ons(track).len(), note_offs(track));
        }
    }

    #[test]
    fn test_tempo_meta_value() {
        assert_eq!(tempo_microseconds(80), 750_000);
        assert_eq!(tempo_microseconds(150), 400_000);
        assert_eq!(tempo_microseconds(200), 375_000); // clamped to 160
    }

    #[test]
    fn test_piece_length_rounds_to_pad_spans() {
        assert_eq!(piece_beats(1), 8);
        assert_eq!(piece_beats(16), 8);
        assert_eq!(piece_beats(17), 16);
        assert_eq!(piece_beats(32), 16);
        assert_eq!(piece_beats(0), 8);
    }

    #[test]
    fn test_drums_on_beats_zero_and_two() {
        let smf = serialize(120, &[60; 16]);
        let kick = note_ons(&smf.tracks[0]);
        let snare = note_ons(&smf.tracks[1]);
        assert_eq!(kick, vec![(0, 36, 100), (1920, 36, 100)]);
        assert_eq!(snare, vec![(960, 38, 100), (2880, 38, 100)]);
    }

    #[test]
    fn test_pad_sustains_tonic_per_span() {
        let smf = serialize(120, &[60; 20]);
        let pad = note_ons(&smf.tracks[2]);
        assert_eq!(
            pad,
            vec![
                (0, 60, 50),
                (0, 64, 50),
                (0, 67, 50),
                (3840, 60, 50),
                (3840, 64, 50),
                (3840, 67, 50),
            ]
        );
    }

    #[test]
    fn test_chord_stabs_follow_progression() {
        let arrangement = Arrangement {
            bpm: 100,
            key: KeyScale::new(RootNote::A, ScaleType::Minor),
            energy: EnergyLevel::High,
            melody: vec![69; 16],
            duration_seconds: 10.0,
            progression: Progression { degrees: [0, 3, 4, 5] },
        };
        let smf = serialize_arrangement(&arrangement);
        let stabs = note_ons(&smf.tracks[3]);
        // 8 beats = 2 measures, 2 stabs each, 3 notes per stab.
        assert_eq!(stabs.len(), 12);
        // Measure 0: A minor triad; measure 1: D minor (iv).
        assert_eq!(&stabs[..3], &[(0, 69, 80), (0, 72, 80), (0, 76, 80)]);
        assert_eq!(&stabs[3..6], &[(960, 69, 80), (960, 72, 80), (960, 76, 80)]);
        assert_eq!(&stabs[6..9], &[(1920, 74, 80), (1920, 77, 80), (1920, 81, 80)]);
    }

    #[test]
    fn test_melody_one_note_per_eighth() {
        let melody = [60, 62, 62, 64, 65];
        let smf = serialize(90, &melody);
        let lead = note_ons(&smf.tracks[4]);
        let expected: Vec<(u32, u8, u8)> = melody
            .iter()
            .enumerate()
            .map(|(i, &k)| (i as u32 * 240, k, 90))
            .collect();
        assert_eq!(lead, expected);
    }

    #[test]
    fn test_overlong_melody_is_truncated() {
        let melody = vec![64; MAX_MELODY_LENGTH + 10];
        let smf = serialize(120, &melody);
        let lead = note_ons(&smf.tracks[4]);
        assert_eq!(lead.len(), MAX_MELODY_LENGTH);
        assert_eq!(lead.last().map(|n| n.0), Some((MAX_MELODY_LENGTH as u32 - 1) * 240));
        let kick = note_ons(&smf.tracks[0]);
        assert_eq!(kick.len(), piece_beats(MAX_MELODY_LENGTH) / 4);
        assert!(to_bytes(&smf).is_ok());
    }

    #[test]
    fn test_repeated_pitch_releases_before_retrigger() {
        let smf = serialize(120, &[62, 62]);
        let track = &smf.tracks[4];
        // name, tempo, program, on, off, on, off, end
        let kinds: Vec<bool> = track
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { .. },
                    ..
                } => Some(true),
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { .. },
                    ..
                } => Some(false),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![true, false, true, false]);
        assert_eq!(track[5].delta.as_int(), 0);
    }

    #[test]
    fn test_bytes_parse_back() {
        let smf = serialize(140, &[60, 64, 67, 72]);
        let bytes = to_bytes(&smf).unwrap();
        assert_eq!(&bytes[..4], b"MThd");
        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.tracks.len(), 5);
        assert_eq!(parsed.tracks, smf.tracks);
    }

    #[test]
    fn test_write_midi_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        let smf = serialize(100, &[60]);
        write_midi(&smf, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, to_bytes(&smf).unwrap());
    }
}
