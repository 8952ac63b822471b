//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { fretlab_init, GeneratorTool, IdentifierTool } from './fretlab.js';
//!
//! await init();
//! fretlab_init();
//!
//! // GuitarTheory is the page's theory engine object.
//! const generator = new GeneratorTool(GuitarTheory);
//! generator.submit_chord_name("Cmaj7");
//! resultEl.innerHTML = generator.view_html();
//!
//! const identifier = new IdentifierTool(GuitarTheory);
//! identifier.set_frets(['x', 3, 2, 0, 1, 0]);
//! resultEl.innerHTML = identifier.view_html();
//! ```

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::session::{GeneratorSession, IdentifierSession};
use crate::theory::{ChordResult, IdentifyResult, TheoryEngine, TheoryFault};
use crate::view::{generator_view, identifier_view};
use crate::voicing::{Fret, STRING_COUNT};

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other
/// functions. Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn fretlab_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// JS-side theory engine
// ═══════════════════════════════════════════════════════════════════════════

/// Adapter from the page's theory engine object to the [`TheoryEngine`]
/// trait. Methods are looked up by name on the wrapped object; a raised JS
/// exception becomes a [`TheoryFault`].
struct JsTheoryEngine {
    inner: js_sys::Object,
}

impl JsTheoryEngine {
    fn new(inner: js_sys::Object) -> Self {
        Self { inner }
    }

    fn call1(&self, method: &str, arg: &JsValue) -> Result<JsValue, TheoryFault> {
        let target: JsValue = self.inner.clone().into();
        let function = js_sys::Reflect::get(&target, &JsValue::from_str(method))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| TheoryFault(format!("theory engine has no method '{}'", method)))?;
        function.call1(&target, arg).map_err(fault_from)
    }

    /// Call a string -> string method, passing the input through untouched
    /// when the engine misbehaves.
    fn text_method(&self, method: &str, text: &str) -> String {
        match self.call1(method, &JsValue::from_str(text)) {
            Ok(value) => value.as_string().unwrap_or_else(|| text.to_string()),
            Err(fault) => {
                log::warn!("{}: {}", method, fault);
                text.to_string()
            }
        }
    }
}

impl TheoryEngine for JsTheoryEngine {
    fn spanish_to_english(&self, text: &str) -> String {
        self.text_method("spanishToEnglish", text)
    }

    fn generate_chord(&self, name: &str) -> Result<ChordResult, TheoryFault> {
        let value = self.call1("generateChord", &JsValue::from_str(name))?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| TheoryFault(format!("bad chord result: {}", e)))
    }

    fn identify_chord(&self, frets: &[Fret; STRING_COUNT]) -> Result<IdentifyResult, TheoryFault> {
        let frets = serde_wasm_bindgen::to_value(frets)
            .map_err(|e| TheoryFault(format!("bad frets payload: {}", e)))?;
        let value = self.call1("identifyChord", &frets)?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| TheoryFault(format!("bad identify result: {}", e)))
    }

    fn to_spanish_display_name(&self, name: &str) -> String {
        self.text_method("toSpanishDisplayName", name)
    }

    fn note_to_index(&self, note: &str) -> Option<usize> {
        self.call1("noteToIndex", &JsValue::from_str(note))
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|idx| *idx >= 0.0)
            .map(|idx| idx as usize)
    }

    fn index_to_note(&self, index: usize) -> String {
        self.call1("indexToNote", &JsValue::from_f64(index as f64))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    }

    fn english_to_spanish(&self, note: &str) -> Option<String> {
        self.call1("engToSpanish", &JsValue::from_str(note))
            .ok()
            .and_then(|v| v.as_string())
            .filter(|spanish| spanish != note)
    }
}

fn fault_from(err: JsValue) -> TheoryFault {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "theory engine fault".to_string());
    TheoryFault(message)
}

// ═══════════════════════════════════════════════════════════════════════════
// Generator tool
// ═══════════════════════════════════════════════════════════════════════════

/// Chord generator session bound to the page's theory engine.
#[wasm_bindgen]
pub struct GeneratorTool {
    session: GeneratorSession,
    engine: JsTheoryEngine,
}

#[wasm_bindgen]
impl GeneratorTool {
    #[wasm_bindgen(constructor)]
    pub fn new(engine: js_sys::Object) -> GeneratorTool {
        GeneratorTool {
            session: GeneratorSession::new(),
            engine: JsTheoryEngine::new(engine),
        }
    }

    /// Generate a chord from an explicit submit.
    pub fn submit_chord_name(&mut self, text: &str) {
        self.session.submit_chord_name(&self.engine, text);
    }

    /// Record a keystroke in the live input; call [`poll`](Self::poll)
    /// afterwards (e.g. on a timer tick) to fire the debounced
    /// computation.
    pub fn on_live_input(&mut self, text: &str, now_ms: f64) {
        self.session.on_live_input(text, now_ms as u64);
    }

    /// Run the debounced computation if its quiet window has elapsed.
    /// Returns whether one ran (and the view should be re-read).
    pub fn poll(&mut self, now_ms: f64) -> bool {
        self.session.poll(&self.engine, now_ms as u64)
    }

    /// Select a voicing from the displayed result.
    pub fn select_voicing(&mut self, index: u32) {
        self.session.select_voicing(index as usize);
    }

    pub fn voicing_count(&self) -> u32 {
        self.session
            .result()
            .map(|r| r.voicings.len() as u32)
            .unwrap_or(0)
    }

    pub fn active_voicing_index(&self) -> Option<u32> {
        self.session.active_voicing_index().map(|i| i as u32)
    }

    /// Current pane as HTML, ready to mount.
    pub fn view_html(&self) -> String {
        generator_view(&self.session, &self.engine).render_html()
    }

    /// Scene for the selected voicing, as a structured value.
    pub fn active_diagram(&self) -> JsValue {
        match self.session.active_diagram() {
            Some(scene) => serde_wasm_bindgen::to_value(&scene).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Mini scenes for every voicing of the displayed result.
    pub fn thumbnail_scenes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.thumbnail_scenes()).unwrap_or(JsValue::NULL)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Identifier tool
// ═══════════════════════════════════════════════════════════════════════════

/// Chord identifier session bound to the page's theory engine.
#[wasm_bindgen]
pub struct IdentifierTool {
    session: IdentifierSession,
    engine: JsTheoryEngine,
}

#[wasm_bindgen]
impl IdentifierTool {
    #[wasm_bindgen(constructor)]
    pub fn new(engine: js_sys::Object) -> IdentifierTool {
        IdentifierTool {
            session: IdentifierSession::new(),
            engine: JsTheoryEngine::new(engine),
        }
    }

    /// Record raw text typed into one string's fret input.
    pub fn set_string_fret(&mut self, string_index: u32, raw: &str) {
        self.session.set_string_fret(string_index as usize, raw);
    }

    /// Flip one string's mute flag.
    pub fn toggle_mute(&mut self, string_index: u32) {
        self.session.toggle_mute(string_index as usize);
    }

    /// Load a preset fingering and identify it immediately. Accepts the
    /// page wire format: an array of six `'x'` / integer entries (negative
    /// integers read as muted).
    pub fn set_frets(&mut self, frets: JsValue) {
        let frets: Vec<Fret> = match serde_wasm_bindgen::from_value(frets) {
            Ok(frets) => frets,
            Err(e) => {
                log::warn!("set_frets: bad payload: {}", e);
                return;
            }
        };
        let Ok(frets) = <[Fret; STRING_COUNT]>::try_from(frets) else {
            log::warn!("set_frets: expected exactly {} entries", STRING_COUNT);
            return;
        };
        self.session.set_all_frets(frets);
        self.session.identify(&self.engine);
    }

    /// Reset inputs, mute flags, and the result area.
    pub fn clear(&mut self) {
        self.session.clear();
    }

    /// Identify the current fingering.
    pub fn identify(&mut self) {
        self.session.identify(&self.engine);
    }

    pub fn is_muted(&self, string_index: u32) -> bool {
        self.session.is_muted(string_index as usize)
    }

    pub fn input(&self, string_index: u32) -> String {
        self.session.input(string_index as usize).to_string()
    }

    /// Current pane as HTML, ready to mount.
    pub fn view_html(&self) -> String {
        identifier_view(&self.session, &self.engine).render_html()
    }

    /// Scene for the displayed fingering, as a structured value.
    pub fn diagram(&self) -> JsValue {
        match self.session.diagram() {
            Some(scene) => serde_wasm_bindgen::to_value(&scene).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }
}
