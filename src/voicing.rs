// src/voicing.rs
//
// Shared fingering data model.
//
// A Voicing describes one concrete way to finger a chord across the six
// strings of a standard-tuned guitar. It is pure data: both tool sessions
// and the diagram layout engine consume it, nothing in here computes.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of strings on the instrument. Fixed; alternate tunings and
/// extended-range guitars are out of scope.
pub const STRING_COUNT: usize = 6;

/// Open-string note names, low E first (standard tuning E-A-D-G-B-E).
pub const OPEN_STRING_NAMES: [&str; STRING_COUNT] = ["E", "A", "D", "G", "B", "E"];

/// Where a string is stopped, as a tagged value.
///
/// `Muted` is the only mute representation in this crate. The page wire
/// format writes it as `"x"`; negative integers arriving from the page are
/// folded into `Muted` during deserialization and never reach the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fret {
    /// String is not sounded.
    Muted,
    /// String is sounded at this fret; 0 is the open string.
    At(u8),
}

impl Fret {
    /// Whether the string sounds at all.
    pub fn is_played(self) -> bool {
        !matches!(self, Fret::Muted)
    }

    /// The fret number, if the string is played.
    pub fn number(self) -> Option<u8> {
        match self {
            Fret::Muted => None,
            Fret::At(n) => Some(n),
        }
    }
}

impl fmt::Display for Fret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fret::Muted => f.write_str("x"),
            Fret::At(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Fret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fret::Muted => serializer.serialize_str("x"),
            Fret::At(n) => serializer.serialize_u8(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Fret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FretVisitor;

        impl<'de> Visitor<'de> for FretVisitor {
            type Value = Fret;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"x\" or a fret number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Fret, E> {
                if value.eq_ignore_ascii_case("x") {
                    Ok(Fret::Muted)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Fret, E> {
                if value <= u8::MAX as u64 {
                    Ok(Fret::At(value as u8))
                } else {
                    Err(E::invalid_value(de::Unexpected::Unsigned(value), &self))
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Fret, E> {
                // The page historically sends -1 as an alternate mute sentinel.
                if value < 0 {
                    Ok(Fret::Muted)
                } else {
                    self.visit_u64(value as u64)
                }
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Fret, E> {
                if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
                    self.visit_i64(value as i64)
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(value), &self))
                }
            }
        }

        deserializer.deserialize_any(FretVisitor)
    }
}

/// One string of a voicing.
///
/// Invariant: a muted placement carries no note and no interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringPlacement {
    /// Fret or mute state.
    pub fret: Fret,

    /// Pitch name sounded at this string/fret. Absent when muted.
    pub note: Option<String>,

    /// Role of the note relative to the chord root (e.g. "1", "b3", "b7").
    /// Absent when muted, or when no root has been asserted (raw identifier
    /// input).
    pub interval: Option<String>,
}

impl StringPlacement {
    /// A muted string.
    pub fn muted() -> Self {
        Self {
            fret: Fret::Muted,
            note: None,
            interval: None,
        }
    }

    /// An open string sounding `note`.
    pub fn open(note: impl Into<String>) -> Self {
        Self {
            fret: Fret::At(0),
            note: Some(note.into()),
            interval: None,
        }
    }

    /// A fretted string sounding `note`.
    pub fn fretted(fret: u8, note: impl Into<String>) -> Self {
        Self {
            fret: Fret::At(fret),
            note: Some(note.into()),
            interval: None,
        }
    }

    /// Attach an interval label.
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }
}

/// A complete fingering: exactly one placement per string, low E first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voicing([StringPlacement; STRING_COUNT]);

impl Voicing {
    pub fn new(placements: [StringPlacement; STRING_COUNT]) -> Self {
        Self(placements)
    }

    /// All six placements, low E first.
    pub fn placements(&self) -> &[StringPlacement; STRING_COUNT] {
        &self.0
    }

    /// Frets among non-muted, non-open placements. Drives the diagram
    /// fret-window rule.
    pub fn played_frets(&self) -> impl Iterator<Item = u8> + '_ {
        self.0
            .iter()
            .filter_map(|p| p.fret.number())
            .filter(|&f| f > 0)
    }

    /// Caption form used by voicing thumbnails, e.g. "x-3-2-0-1-0".
    pub fn compact_label(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(|p| p.fret.to_string()).collect();
        parts.join("-")
    }
}
