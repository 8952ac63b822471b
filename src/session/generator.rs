// src/session/generator.rs
//
// Chord generator session: name in, diagrams out.
//
// State machine: Idle -> Computing -> Displayed | Errored. A computation
// starts from an explicit submit or from the debounce timer firing after
// live input goes quiet. Errors (engine-reported or raised) discard the
// previous display entirely.

use log::{debug, warn};

use crate::layout::{Scene, SizingProfile, layout};
use crate::theory::{ChordResult, TheoryEngine, TheoryFault};
use crate::voicing::Voicing;

use super::{DebounceTimer, RequestId};

/// What the generator currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorState {
    /// Nothing computed yet.
    Idle,

    /// A successful result with one voicing selected.
    Displayed {
        result: ChordResult,
        active_voicing: usize,
    },

    /// A terminal error; sole content of the result area.
    Errored { message: String },
}

/// Session state for the chord generator.
pub struct GeneratorSession {
    state: GeneratorState,
    debounce: DebounceTimer,

    /// Most recently issued request id; completions for anything older are
    /// discarded.
    last_request: u64,
    pending_request: Option<u64>,
}

impl GeneratorSession {
    pub fn new() -> Self {
        Self::with_debounce(DebounceTimer::default())
    }

    pub fn with_debounce(debounce: DebounceTimer) -> Self {
        Self {
            state: GeneratorState::Idle,
            debounce,
            last_request: 0,
            pending_request: None,
        }
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Whether a computation has begun and not yet completed.
    pub fn is_computing(&self) -> bool {
        self.pending_request.is_some()
    }

    /// The held result, when one is displayed.
    pub fn result(&self) -> Option<&ChordResult> {
        match &self.state {
            GeneratorState::Displayed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Index of the selected voicing, when a result is displayed and has
    /// any voicings.
    pub fn active_voicing_index(&self) -> Option<usize> {
        match &self.state {
            GeneratorState::Displayed {
                result,
                active_voicing,
            } if !result.voicings.is_empty() => Some(*active_voicing),
            _ => None,
        }
    }

    /// The selected voicing itself.
    pub fn active_voicing(&self) -> Option<&Voicing> {
        match &self.state {
            GeneratorState::Displayed {
                result,
                active_voicing,
            } => result.voicings.get(*active_voicing),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Explicitly generate a chord by name. Empty input is ignored.
    pub fn submit_chord_name(&mut self, engine: &dyn TheoryEngine, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }

        // Accept Spanish note names (DO, RE, MI, ...) before the engine
        // sees the text.
        let normalized = engine.spanish_to_english(trimmed);

        let request = self.begin_request();
        let outcome = engine.generate_chord(&normalized);
        self.complete_request(request, outcome);
    }

    /// Record a keystroke in the live chord input. Schedules a debounced
    /// computation, replacing any pending one.
    pub fn on_live_input(&mut self, text: &str, now_ms: u64) {
        self.debounce.schedule(text, now_ms);
    }

    /// Fire the debounced computation if its quiet window has elapsed.
    /// Returns whether a computation ran.
    pub fn poll(&mut self, engine: &dyn TheoryEngine, now_ms: u64) -> bool {
        match self.debounce.take_due(now_ms) {
            Some(text) => {
                self.submit_chord_name(engine, &text);
                true
            }
            None => false,
        }
    }

    /// Select a voicing from the displayed result. No-op when no result is
    /// held; the index always comes from a list this session produced.
    pub fn select_voicing(&mut self, index: usize) {
        match &mut self.state {
            GeneratorState::Displayed { active_voicing, .. } => {
                debug!("generator: select voicing {}", index);
                *active_voicing = index;
            }
            _ => debug!("generator: select_voicing({}) ignored, no result", index),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Request lifecycle (split out so asynchronous embeddings can complete
    // out-of-band; completions for superseded requests are dropped)
    // ─────────────────────────────────────────────────────────────────────

    /// Mark a computation as started and issue its id.
    pub fn begin_request(&mut self) -> RequestId {
        self.last_request += 1;
        self.pending_request = Some(self.last_request);
        RequestId(self.last_request)
    }

    /// Apply a computation's outcome, unless a newer request has been
    /// issued since.
    pub fn complete_request(
        &mut self,
        request: RequestId,
        outcome: Result<ChordResult, TheoryFault>,
    ) {
        if self.pending_request != Some(request.0) {
            debug!("generator: discarding stale result for request {}", request.0);
            return;
        }
        self.pending_request = None;

        self.state = match outcome {
            Ok(mut result) => match result.error.take() {
                Some(message) => {
                    warn!("generator: engine reported: {}", message);
                    GeneratorState::Errored { message }
                }
                None => {
                    debug!(
                        "generator: {} with {} voicings",
                        result.display_name,
                        result.voicings.len()
                    );
                    GeneratorState::Displayed {
                        result,
                        active_voicing: 0,
                    }
                }
            },
            Err(fault) => {
                warn!("generator: engine fault: {}", fault);
                GeneratorState::Errored { message: fault.0 }
            }
        };
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived diagrams
    // ─────────────────────────────────────────────────────────────────────

    /// Scene for the selected voicing at full size.
    pub fn active_diagram(&self) -> Option<Scene> {
        self.active_voicing()
            .map(|v| layout(v, &SizingProfile::full()))
    }

    /// One mini scene per voicing of the displayed result, in result order.
    pub fn thumbnail_scenes(&self) -> Vec<Scene> {
        let mini = SizingProfile::mini();
        self.result()
            .map(|r| r.voicings.iter().map(|v| layout(v, &mini)).collect())
            .unwrap_or_default()
    }
}

impl Default for GeneratorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubTheory, c_major_result};

    #[test]
    fn test_submit_displays_result_and_resets_selection() {
        let engine = StubTheory::generating(c_major_result(3));
        let mut session = GeneratorSession::new();

        session.submit_chord_name(&engine, "  Cmaj7 ");

        assert_eq!(engine.generate_calls(), 1);
        assert_eq!(session.active_voicing_index(), Some(0));
        assert_eq!(session.thumbnail_scenes().len(), 3);
        assert!(session.active_diagram().is_some());
    }

    #[test]
    fn test_selection_resets_on_new_result() {
        let engine = StubTheory::generating(c_major_result(3));
        let mut session = GeneratorSession::new();

        session.submit_chord_name(&engine, "C");
        session.select_voicing(2);
        assert_eq!(session.active_voicing_index(), Some(2));

        session.submit_chord_name(&engine, "C");
        assert_eq!(session.active_voicing_index(), Some(0));
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let engine = StubTheory::generating(c_major_result(1));
        let mut session = GeneratorSession::new();

        session.submit_chord_name(&engine, "   ");

        assert_eq!(engine.generate_calls(), 0);
        assert_eq!(*session.state(), GeneratorState::Idle);
    }

    #[test]
    fn test_input_is_normalized_before_the_engine_sees_it() {
        let engine = StubTheory::generating(c_major_result(1));
        let mut session = GeneratorSession::new();

        session.submit_chord_name(&engine, "DO7");

        assert_eq!(engine.last_generated_name(), Some("C7".to_string()));
    }

    #[test]
    fn test_engine_reported_error_replaces_display() {
        let engine = StubTheory::generating(c_major_result(2));
        let mut session = GeneratorSession::new();
        session.submit_chord_name(&engine, "C");

        let mut errored = c_major_result(0);
        errored.error = Some("No se encontraron digitaciones".to_string());
        let engine = StubTheory::generating(errored);
        session.submit_chord_name(&engine, "Qx9");

        match session.state() {
            GeneratorState::Errored { message } => {
                assert_eq!(message, "No se encontraron digitaciones");
            }
            other => panic!("expected error state, got {:?}", other),
        }
        // No stale voicing list survives.
        assert_eq!(session.active_voicing_index(), None);
        session.select_voicing(1);
        assert_eq!(session.active_voicing(), None);
    }

    #[test]
    fn test_engine_fault_treated_like_reported_error() {
        let engine = StubTheory::faulting("stack exhausted");
        let mut session = GeneratorSession::new();

        session.submit_chord_name(&engine, "C");

        assert_eq!(
            *session.state(),
            GeneratorState::Errored {
                message: "stack exhausted".to_string()
            }
        );
        assert!(session.thumbnail_scenes().is_empty());
    }

    #[test]
    fn test_debounced_live_input_runs_once_with_last_value() {
        let engine = StubTheory::generating(c_major_result(1));
        let mut session = GeneratorSession::new();

        session.on_live_input("C", 0);
        session.on_live_input("Cm", 100);
        session.on_live_input("Cma", 150);

        assert!(!session.poll(&engine, 400));
        assert!(!session.poll(&engine, 549));
        assert!(session.poll(&engine, 550));
        assert!(!session.poll(&engine, 600));

        assert_eq!(engine.generate_calls(), 1);
        assert_eq!(engine.last_generated_name(), Some("Cma".to_string()));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let engine = StubTheory::generating(c_major_result(2));
        let mut session = GeneratorSession::new();

        let first = session.begin_request();
        let second = session.begin_request();

        // The older request resolves after the newer one was issued.
        let mut stale = c_major_result(1);
        stale.display_name = "stale".to_string();
        session.complete_request(first, Ok(stale));
        assert!(session.result().is_none());
        assert!(session.is_computing());

        session.complete_request(second, engine.generate_chord("C"));
        assert!(!session.is_computing());
        assert_eq!(session.result().map(|r| r.voicings.len()), Some(2));
    }
}
