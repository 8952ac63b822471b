// src/theory.rs
//
// Contract with the external music-theory collaborator.
//
// Interval math, voicing search, and chord inference live outside this
// crate (in the browser build, on the JS side). The sessions only talk to
// that collaborator through this trait, and tests substitute a scripted
// stub for it. Nothing here computes theory; it only names the shapes the
// collaborator produces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::voicing::{Fret, STRING_COUNT, Voicing};

/// Opaque failure raised by the theory engine while computing.
///
/// Distinct from a result that *reports* a domain error in its `error`
/// field; both end the current computation, but faults carry no structure
/// beyond their message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoryFault(pub String);

impl fmt::Display for TheoryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TheoryFault {}

/// The narrow seam to the theory collaborator.
///
/// Implementations must be pure with respect to their inputs: the sessions
/// never mutate what they receive and may call any method repeatedly.
pub trait TheoryEngine {
    /// Normalize Spanish note spellings (DO, RE, MI, ...) to English ones.
    /// Idempotent; English input passes through unchanged.
    fn spanish_to_english(&self, text: &str) -> String;

    /// Build a chord from its name: formula, note set, and playable
    /// voicings. A domain-level problem ("no voicings found") comes back
    /// inside the result's `error` field, not as a fault.
    fn generate_chord(&self, name: &str) -> Result<ChordResult, TheoryFault>;

    /// Infer candidate chord names from a fingering. The caller guarantees
    /// at least two non-muted strings.
    fn identify_chord(&self, frets: &[Fret; STRING_COUNT]) -> Result<IdentifyResult, TheoryFault>;

    /// Spanish display form of a chord name. May equal the input, in which
    /// case no translated label is shown.
    fn to_spanish_display_name(&self, name: &str) -> String;

    /// Chromatic index of a note name, if the engine knows it.
    fn note_to_index(&self, note: &str) -> Option<usize>;

    /// Note name for a chromatic index (taken mod 12).
    fn index_to_note(&self, index: usize) -> String;

    /// Spanish name of a single note, if it differs from the English one.
    fn english_to_spanish(&self, note: &str) -> Option<String>;
}

/// One note of a generated chord, in formula order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordNote {
    pub interval: String,
    pub note: String,
    pub semitones_from_root: usize,
}

/// Slash-chord bass information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BassNote {
    pub bass_display: String,
}

/// Everything the generator session displays for one chord name.
///
/// Immutable once produced; each generation replaces the previous result
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordResult {
    pub display_name: String,
    pub spanish_display_name: Option<String>,
    pub root_display: String,
    pub bass_note: Option<BassNote>,
    pub formula: Vec<String>,
    pub chord_notes: Vec<ChordNote>,
    pub voicings: Vec<Voicing>,

    /// Domain-level error reported by the engine. When set, the rest of the
    /// result is not shown.
    pub error: Option<String>,
}

/// One sounded string of an identified fingering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedNote {
    pub string_index: usize,
    pub fret: u8,
    pub note: String,
}

/// One possible interpretation of a fingering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub display_name: String,
    pub spanish_display_name: Option<String>,
    pub quality: String,
    pub quality_display: Option<String>,
    pub root: String,
    pub is_inversion: bool,
    pub inversion_bass: Option<String>,
    pub is_incomplete: bool,
    pub missing: Vec<String>,
}

/// Everything the identifier session displays for one fingering.
///
/// Candidates arrive ranked best-first and are rendered in that order;
/// this crate never re-sorts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyResult {
    pub primary_name: String,
    pub alternative_names: Vec<String>,
    pub harmonic_function: Option<String>,
    pub played_notes: Vec<PlayedNote>,
    pub candidates: Vec<Candidate>,

    /// Domain-level error reported by the engine.
    pub error: Option<String>,
}
