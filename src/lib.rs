// src/lib.rs
//
// Library entry point for the guitar chord tool core.
//
// Two sessions (chord generator, chord identifier) over a shared diagram
// layout engine. Music theory itself lives in an external collaborator
// reached through the TheoryEngine trait; the browser page shell talks to
// the sessions through the `web` feature's wasm bindings.

mod color;
mod error;
mod layout;
mod session;
mod theory;
mod view;
mod voicing;

#[cfg(feature = "web")]
pub mod wasm;

#[cfg(test)]
mod test_support;

// Re-export key types for Rust consumers
pub use color::{ROOT_COLOR, interval_color};
pub use error::ToolError;
pub use layout::{FRETS_SHOWN, Scene, SceneElement, SizingProfile, fret_window, layout};
pub use session::{
    DEFAULT_DEBOUNCE_MS, DebounceTimer, GeneratorSession, GeneratorState, IdentifierSession,
    IdentifierState, RequestId, display_voicing_from_frets,
};
pub use theory::{
    BassNote, Candidate, ChordNote, ChordResult, IdentifyResult, PlayedNote, TheoryEngine,
    TheoryFault,
};
pub use view::{
    ViewNode, generator_summary_view, generator_view, identifier_view, scene_view,
    semitones_display_name,
};
pub use voicing::{Fret, OPEN_STRING_NAMES, STRING_COUNT, StringPlacement, Voicing};
