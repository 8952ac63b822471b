// src/session/mod.rs
//
// UI-side session state.
//
// Each tool (generator, identifier) owns one session object holding its
// complete interaction state: current result, selection, mute flags,
// pending debounced input. The page shell calls the session's operations
// on user events and re-reads the derived views afterwards; sessions never
// talk to each other.
//
// Key principles:
// - State mutates only through the operations defined here
// - A computation's result replaces the previous display wholesale
// - Only the most recently requested computation may land (stale results
//   are discarded)

mod debounce;
mod generator;
mod identifier;

pub use debounce::{DEFAULT_DEBOUNCE_MS, DebounceTimer};
pub use generator::{GeneratorSession, GeneratorState};
pub use identifier::{IdentifierSession, IdentifierState, display_voicing_from_frets};

/// Identifies one in-flight computation.
///
/// Issued when a request begins; a completion carrying anything but the
/// most recently issued id is ignored, which preserves "last request wins"
/// when the embedding makes engine calls asynchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub(crate) u64);
