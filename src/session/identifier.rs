// src/session/identifier.rs
//
// Chord identifier session: fingering in, candidate names out.
//
// Six per-string text inputs plus a mute-flag set. Parsing is fail-soft
// (anything unreadable means "muted"); identification requires at least
// two played strings and otherwise never reaches the engine. The diagram
// shown with a result is derived from the raw frets, not from any
// candidate's internal voicing, since candidates may disagree on the root.

use log::{debug, warn};

use crate::error::ToolError;
use crate::layout::{Scene, SizingProfile, layout};
use crate::theory::{IdentifyResult, TheoryEngine, TheoryFault};
use crate::voicing::{Fret, OPEN_STRING_NAMES, STRING_COUNT, StringPlacement, Voicing};

use super::RequestId;

/// Text a string input reads as an explicit mute.
pub const MUTE_MARKER: &str = "x";

/// What the identifier currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierState {
    /// Placeholder; nothing identified yet.
    Idle,

    /// A successful identification plus the voicing drawn for it.
    Displayed {
        result: IdentifyResult,
        display_voicing: Voicing,
    },

    /// A terminal error; sole content of the result area.
    Errored { message: String },
}

struct PendingIdentify {
    id: u64,
    display_voicing: Voicing,
}

/// Session state for the chord identifier.
pub struct IdentifierSession {
    /// Raw per-string input text, low E first.
    inputs: [String; STRING_COUNT],

    /// Mute flags; take precedence over whatever the text says. Persist
    /// across identifications until explicitly cleared.
    mutes: [bool; STRING_COUNT],

    state: IdentifierState,

    last_request: u64,
    pending: Option<PendingIdentify>,
}

impl IdentifierSession {
    pub fn new() -> Self {
        Self {
            inputs: Default::default(),
            mutes: [false; STRING_COUNT],
            state: IdentifierState::Idle,
            last_request: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &IdentifierState {
        &self.state
    }

    pub fn is_computing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn result(&self) -> Option<&IdentifyResult> {
        match &self.state {
            IdentifierState::Displayed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn input(&self, string_index: usize) -> &str {
        self.inputs.get(string_index).map(String::as_str).unwrap_or("")
    }

    pub fn is_muted(&self, string_index: usize) -> bool {
        self.mutes.get(string_index).copied().unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Record raw text typed into one string's input. Typing the mute
    /// marker sets that string's mute flag; any other text clears it.
    pub fn set_string_fret(&mut self, string_index: usize, raw: &str) {
        let Some(slot) = self.inputs.get_mut(string_index) else {
            warn!("identifier: string index {} out of range", string_index);
            return;
        };
        *slot = raw.to_string();
        self.mutes[string_index] = raw.trim().eq_ignore_ascii_case(MUTE_MARKER);
    }

    /// Flip one string's mute flag, rewriting its input text to match.
    pub fn toggle_mute(&mut self, string_index: usize) {
        let Some(flag) = self.mutes.get_mut(string_index) else {
            warn!("identifier: string index {} out of range", string_index);
            return;
        };
        *flag = !*flag;
        self.inputs[string_index] = if *flag {
            MUTE_MARKER.to_string()
        } else {
            String::new()
        };
    }

    /// Load a complete fingering, e.g. a preset shape.
    pub fn set_all_frets(&mut self, frets: [Fret; STRING_COUNT]) {
        for (i, fret) in frets.iter().enumerate() {
            match fret {
                Fret::Muted => {
                    self.mutes[i] = true;
                    self.inputs[i] = MUTE_MARKER.to_string();
                }
                Fret::At(n) => {
                    self.mutes[i] = false;
                    self.inputs[i] = n.to_string();
                }
            }
        }
    }

    /// Reset inputs, mute flags, and the result area.
    pub fn clear(&mut self) {
        self.inputs = Default::default();
        self.mutes = [false; STRING_COUNT];
        self.state = IdentifierState::Idle;
        self.pending = None;
    }

    /// Parse the current inputs into tagged frets.
    ///
    /// Per string: the mute flag wins; otherwise empty text, a dash, the
    /// mute marker, or unparsable text all read as muted, and anything
    /// else as an integer fret. Intentionally lenient; bad input is not an
    /// error here.
    pub fn parse_frets(&self) -> [Fret; STRING_COUNT] {
        std::array::from_fn(|i| {
            if self.mutes[i] {
                return Fret::Muted;
            }
            let text = self.inputs[i].trim();
            if text.is_empty() || text == "-" || text.eq_ignore_ascii_case(MUTE_MARKER) {
                return Fret::Muted;
            }
            text.parse::<u8>().map(Fret::At).unwrap_or(Fret::Muted)
        })
    }

    /// Identify the current fingering synchronously.
    pub fn identify(&mut self, engine: &dyn TheoryEngine) {
        if let Some((request, frets)) = self.begin_identify(engine) {
            let outcome = engine.identify_chord(&frets);
            self.complete_request(request, outcome);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Request lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Validate the current inputs and start an identification.
    ///
    /// Returns the request id and the frets to hand to the engine, or
    /// `None` when validation failed (the error is already displayed).
    /// The display voicing is derived here, from the raw frets, so a
    /// later completion only supplies the engine's result.
    pub fn begin_identify(
        &mut self,
        engine: &dyn TheoryEngine,
    ) -> Option<(RequestId, [Fret; STRING_COUNT])> {
        let frets = self.parse_frets();
        let played = frets.iter().filter(|f| f.is_played()).count();
        if played < 2 {
            debug!("identifier: rejected, only {} played strings", played);
            self.pending = None;
            self.state = IdentifierState::Errored {
                message: ToolError::NotEnoughPlayedStrings.to_string(),
            };
            return None;
        }

        self.last_request += 1;
        self.pending = Some(PendingIdentify {
            id: self.last_request,
            display_voicing: display_voicing_from_frets(&frets, engine),
        });
        Some((RequestId(self.last_request), frets))
    }

    /// Apply an identification's outcome, unless a newer request has been
    /// issued since.
    pub fn complete_request(
        &mut self,
        request: RequestId,
        outcome: Result<IdentifyResult, TheoryFault>,
    ) {
        let pending = match self.pending.take() {
            Some(p) if p.id == request.0 => p,
            other => {
                self.pending = other;
                debug!("identifier: discarding stale result for request {}", request.0);
                return;
            }
        };

        self.state = match outcome {
            Ok(mut result) => match result.error.take() {
                Some(message) => {
                    warn!("identifier: engine reported: {}", message);
                    IdentifierState::Errored { message }
                }
                None => {
                    debug!(
                        "identifier: {} ({} candidates)",
                        result.primary_name,
                        result.candidates.len()
                    );
                    IdentifierState::Displayed {
                        result,
                        display_voicing: pending.display_voicing,
                    }
                }
            },
            Err(fault) => {
                warn!("identifier: engine fault: {}", fault);
                IdentifierState::Errored { message: fault.0 }
            }
        };
    }

    /// Scene for the displayed fingering at full size.
    pub fn diagram(&self) -> Option<Scene> {
        match &self.state {
            IdentifierState::Displayed {
                display_voicing, ..
            } => Some(layout(display_voicing, &SizingProfile::full())),
            _ => None,
        }
    }
}

impl Default for IdentifierSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the voicing drawn with an identification result.
///
/// Straight fret arithmetic over the open-string notes: for each played
/// string, note index = (open note index + fret) mod 12. Intervals are
/// left unset; the display does not assert a root, since candidates may
/// disagree on one.
pub fn display_voicing_from_frets(
    frets: &[Fret; STRING_COUNT],
    engine: &dyn TheoryEngine,
) -> Voicing {
    Voicing::new(std::array::from_fn(|s| match frets[s] {
        Fret::Muted => StringPlacement::muted(),
        Fret::At(fret) => {
            let note = engine
                .note_to_index(OPEN_STRING_NAMES[s])
                .map(|open| engine.index_to_note((open + fret as usize) % 12));
            StringPlacement {
                fret: Fret::At(fret),
                note,
                interval: None,
            }
        }
    }))
}
