// Key selection from mood.
//
// An ordered table maps (alignment, energy) to a key. Entries are checked top
// to bottom; an entry whose energy is `None` matches any energy for its
// alignment. Specific entries must therefore come before the wildcard for the
// same alignment. Combinations with no entry get C major.
//
// The table leans on brightness: enhancing hours get major keys, opposing
// hours minor ones, and neutral hours sit in between.

use crate::scale::{KeyScale, RootNote, ScaleType};
use mood_ring_schedule::{Alignment, EnergyLevel};
use tracing::debug;

/// Key used when no table entry matches.
pub const DEFAULT_KEY: KeyScale = KeyScale::c_major();

struct KeyRule {
    alignment: Alignment,
    /// `None` matches every energy level.
    energy: Option<EnergyLevel>,
    key: KeyScale,
}

const fn rule(alignment: Alignment, energy: Option<EnergyLevel>, root: RootNote, scale: ScaleType) -> KeyRule {
    KeyRule {
        alignment,
        energy,
        key: KeyScale::new(root, scale),
    }
}

static KEY_TABLE: &[KeyRule] = &[
    rule(Alignment::Enhance, Some(EnergyLevel::High), RootNote::C, ScaleType::Major),
    rule(Alignment::Enhance, Some(EnergyLevel::Rising), RootNote::G, ScaleType::Major),
    rule(Alignment::Enhance, Some(EnergyLevel::Moderate), RootNote::D, ScaleType::Major),
    rule(Alignment::Enhance, Some(EnergyLevel::Decreasing), RootNote::F, ScaleType::Major),
    rule(Alignment::Enhance, Some(EnergyLevel::Low), RootNote::A, ScaleType::Minor),
    rule(Alignment::Neutral, Some(EnergyLevel::High), RootNote::G, ScaleType::Major),
    rule(Alignment::Neutral, Some(EnergyLevel::Low), RootNote::D, ScaleType::Minor),
    rule(Alignment::Neutral, Some(EnergyLevel::Lowest), RootNote::D, ScaleType::Minor),
    rule(Alignment::Neutral, None, RootNote::F, ScaleType::Major),
    rule(Alignment::Oppose, Some(EnergyLevel::High), RootNote::E, ScaleType::Minor),
    rule(Alignment::Oppose, Some(EnergyLevel::Rising), RootNote::B, ScaleType::Minor),
    rule(Alignment::Oppose, None, RootNote::A, ScaleType::Minor),
];

/// Pick the key for an alignment/energy pair. Never fails.
pub fn select_key(alignment: Alignment, energy: EnergyLevel) -> KeyScale {
    let key = KEY_TABLE
        .iter()
        .find(|r| r.alignment == alignment && r.energy.is_none_or(|e| e == energy))
        .map(|r| r.key)
        .unwrap_or(DEFAULT_KEY);
    debug!(%alignment, %energy, %key, "selected key");
    key
}
