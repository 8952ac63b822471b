// src/view.rs
//
// Visual tree production.
//
// Sessions hold state; this module derives what the page shows from that
// state, as a plain markup tree. Mounting the tree (innerHTML, vdom diff,
// whatever) is the embedding's business; nothing here touches a DOM.
// Deriving a view twice from the same state yields identical markup.

use serde::{Deserialize, Serialize};

use crate::layout::{Scene, SceneElement};
use crate::session::{GeneratorSession, GeneratorState, IdentifierSession, IdentifierState};
use crate::theory::{Candidate, ChordResult, IdentifyResult, TheoryEngine};

// Stroke/fill constants of the diagram realization.
const NUT_COLOR: &str = "#1a1f36";
const FRET_LINE_COLOR: &str = "#d1d5db";
const STRING_LINE_COLOR: &str = "#9ca3af";
const MUTE_COLOR: &str = "#ef4444";
const OPEN_MARKER_COLOR: &str = "#635bff";
const POSITION_LABEL_COLOR: &str = "#6b7280";
const STRING_LABEL_COLOR: &str = "#9ca3af";
const DOT_TEXT_COLOR: &str = "white";

/// A node of the produced markup tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ViewNode>,
    },
    Text(String),
}

impl ViewNode {
    pub fn element(tag: &str) -> Self {
        ViewNode::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        ViewNode::Text(content.into())
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let ViewNode::Element { attrs, .. } = &mut self {
            attrs.push((name.to_string(), value.into()));
        }
        self
    }

    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    pub fn child(mut self, node: ViewNode) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = ViewNode>) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.child(ViewNode::text(content))
    }

    /// Serialize the tree to HTML with escaped text and attributes.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text(content) => out.push_str(&escape(content)),
            ViewNode::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                out.push('>');
                for c in children {
                    c.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trim trailing ".0" off whole-valued coordinates.
fn num(v: f32) -> String {
    if v == v.trunc() {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Diagram realization
// ═══════════════════════════════════════════════════════════════════════

/// Realize a layout scene as an `svg` subtree, one child per element, in
/// scene order.
pub fn scene_view(scene: &Scene) -> ViewNode {
    let svg = ViewNode::element("svg")
        .attr("width", num(scene.width))
        .attr("height", num(scene.height))
        .attr(
            "viewBox",
            format!("0 0 {} {}", num(scene.width), num(scene.height)),
        )
        .class("fretboard-svg");

    svg.children(scene.elements.iter().map(element_view))
}

fn element_view(element: &SceneElement) -> ViewNode {
    match element {
        SceneElement::Nut {
            x,
            y,
            width,
            height,
        } => ViewNode::element("rect")
            .attr("x", num(*x))
            .attr("y", num(*y))
            .attr("width", num(*width))
            .attr("height", num(*height))
            .attr("rx", num((height / 3.0).round()))
            .attr("fill", NUT_COLOR),

        SceneElement::PositionLabel {
            x,
            y,
            text,
            font_size,
        } => ViewNode::element("text")
            .attr("x", num(*x))
            .attr("y", num(*y))
            .attr("font-size", num(*font_size))
            .attr("fill", POSITION_LABEL_COLOR)
            .attr("text-anchor", "end")
            .with_text(text.clone()),

        SceneElement::FretLine {
            x1,
            y1,
            x2,
            y2,
            width,
        } => line(*x1, *y1, *x2, *y2, FRET_LINE_COLOR, *width),

        SceneElement::StringLine {
            x1,
            y1,
            x2,
            y2,
            width,
        } => line(*x1, *y1, *x2, *y2, STRING_LINE_COLOR, *width),

        SceneElement::OpenMarker { x, y, radius } => ViewNode::element("circle")
            .attr("cx", num(*x))
            .attr("cy", num(*y))
            .attr("r", num(*radius))
            .attr("fill", "none")
            .attr("stroke", OPEN_MARKER_COLOR)
            .attr("stroke-width", num(radius / 3.0)),

        SceneElement::MuteMarker { x, y, font_size } => ViewNode::element("text")
            .attr("x", num(*x))
            .attr("y", num(*y))
            .attr("font-size", num(*font_size))
            .attr("text-anchor", "middle")
            .attr("fill", MUTE_COLOR)
            .attr("font-weight", "700")
            .with_text("✕"),

        SceneElement::FingerDot {
            x,
            y,
            radius,
            color,
            label,
            label_dy,
            font_size,
        } => ViewNode::element("g")
            .child(
                ViewNode::element("circle")
                    .attr("cx", num(*x))
                    .attr("cy", num(*y))
                    .attr("r", num(*radius))
                    .attr("fill", color.clone()),
            )
            .child(
                ViewNode::element("text")
                    .attr("x", num(*x))
                    .attr("y", num(y + label_dy))
                    .attr("font-size", num(*font_size))
                    .attr("text-anchor", "middle")
                    .attr("fill", DOT_TEXT_COLOR)
                    .attr("font-weight", "700")
                    .with_text(label.clone()),
            ),

        SceneElement::StringLabel {
            x,
            y,
            text,
            font_size,
        } => ViewNode::element("text")
            .attr("x", num(*x))
            .attr("y", num(*y))
            .attr("font-size", num(*font_size))
            .attr("text-anchor", "middle")
            .attr("fill", STRING_LABEL_COLOR)
            .with_text(text.clone()),
    }
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str, width: f32) -> ViewNode {
    ViewNode::element("line")
        .attr("x1", num(x1))
        .attr("y1", num(y1))
        .attr("x2", num(x2))
        .attr("y2", num(y2))
        .attr("stroke", stroke)
        .attr("stroke-width", num(width))
}

// ═══════════════════════════════════════════════════════════════════════
// Shared fragments
// ═══════════════════════════════════════════════════════════════════════

/// Spanish display name of an interval width in semitones.
pub fn semitones_display_name(semitones: usize) -> String {
    match semitones {
        0 => "Unísono".to_string(),
        1 => "2ª menor".to_string(),
        2 => "2ª mayor".to_string(),
        3 => "3ª menor".to_string(),
        4 => "3ª mayor".to_string(),
        5 => "4ª justa".to_string(),
        6 => "Tritono".to_string(),
        7 => "5ª justa".to_string(),
        8 => "5ª aumentada".to_string(),
        9 => "6ª mayor".to_string(),
        10 => "7ª menor".to_string(),
        11 => "7ª mayor".to_string(),
        other => format!("{} semitonos", other),
    }
}

fn error_card(message: &str) -> ViewNode {
    ViewNode::element("div").class("card").child(
        ViewNode::element("p")
            .class("error-msg")
            .with_text(format!("⚠️ {}", message)),
    )
}

fn section_subtitle(text: &str) -> ViewNode {
    ViewNode::element("p").class("section-subtitle").with_text(text)
}

fn info_badge(label: &str, value: &str) -> ViewNode {
    ViewNode::element("div")
        .class("info-badge")
        .child(ViewNode::element("div").class("label").with_text(label))
        .child(ViewNode::element("div").class("value").with_text(value))
}

/// Spanish form of a chord name, when it differs from the English one.
fn spanish_name(engine: &dyn TheoryEngine, name: &str, precomputed: Option<&str>) -> Option<String> {
    let spanish = match precomputed {
        Some(s) => s.to_string(),
        None => engine.to_spanish_display_name(name),
    };
    (spanish != name).then_some(spanish)
}

// ═══════════════════════════════════════════════════════════════════════
// Generator
// ═══════════════════════════════════════════════════════════════════════

/// Complete generator pane for the session's current state.
pub fn generator_view(session: &GeneratorSession, engine: &dyn TheoryEngine) -> ViewNode {
    match session.state() {
        GeneratorState::Idle => ViewNode::element("div").class("generator-result"),
        GeneratorState::Errored { message } => ViewNode::element("div")
            .class("generator-result")
            .child(error_card(message)),
        GeneratorState::Displayed {
            result,
            active_voicing,
        } => {
            let diagram = match session.active_diagram() {
                Some(scene) => scene_view(&scene),
                None => ViewNode::element("p")
                    .class("no-voicing")
                    .with_text("Sin digitación"),
            };

            ViewNode::element("div")
                .class("generator-result")
                .child(
                    ViewNode::element("div").class("card").child(
                        ViewNode::element("div")
                            .class("two-col")
                            .child(generator_summary_view(result, engine))
                            .child(
                                ViewNode::element("div")
                                    .child(section_subtitle("Diagrama de digitación"))
                                    .child(
                                        ViewNode::element("div")
                                            .class("active-diagram")
                                            .child(diagram),
                                    ),
                            ),
                    ),
                )
                .child(
                    ViewNode::element("div")
                        .class("card")
                        .child(section_subtitle("Digitaciones disponibles (haz clic para ver)"))
                        .child(voicing_grid_view(result, *active_voicing)),
                )
        }
    }
}

/// Chord names, badges, and note table. Independent of the selected
/// voicing: switching voicings must not change a byte of this subtree.
pub fn generator_summary_view(result: &ChordResult, engine: &dyn TheoryEngine) -> ViewNode {
    let mut root = ViewNode::element("div")
        .child(section_subtitle("Acorde identificado"))
        .child(
            ViewNode::element("div")
                .class("chord-title")
                .with_text(&result.display_name),
        );

    if let Some(spanish) = spanish_name(
        engine,
        &result.display_name,
        result.spanish_display_name.as_deref(),
    ) {
        root = root.child(
            ViewNode::element("div")
                .class("chord-title-spanish")
                .with_text(spanish),
        );
    }

    let mut badges = ViewNode::element("div")
        .class("chord-info")
        .child(info_badge("Tónica", &result.root_display))
        .child(info_badge("Fórmula", &result.formula.join(" - ")));
    if let Some(bass) = &result.bass_note {
        badges = badges.child(info_badge("Bajo", &bass.bass_display));
    }

    root.child(badges).child(note_table_view(result, engine))
}

fn note_table_view(result: &ChordResult, engine: &dyn TheoryEngine) -> ViewNode {
    let head = ViewNode::element("thead").child(
        ViewNode::element("tr")
            .child(ViewNode::element("th").with_text("Intervalo"))
            .child(ViewNode::element("th").with_text("Nota"))
            .child(ViewNode::element("th").with_text("Nombre")),
    );

    let rows = result.chord_notes.iter().map(|cn| {
        let mut note_cell = ViewNode::element("td").with_text(&cn.note);
        if let Some(spanish) = engine.english_to_spanish(&cn.note) {
            if spanish != cn.note {
                note_cell = note_cell.child(
                    ViewNode::element("span")
                        .class("note-spanish")
                        .with_text(format!("({})", spanish)),
                );
            }
        }
        ViewNode::element("tr")
            .child(
                ViewNode::element("td").child(
                    ViewNode::element("span")
                        .class("interval-badge")
                        .with_text(&cn.interval),
                ),
            )
            .child(note_cell)
            .child(
                ViewNode::element("td")
                    .with_text(semitones_display_name(cn.semitones_from_root)),
            )
    });

    ViewNode::element("table")
        .class("notes-table")
        .child(head)
        .child(ViewNode::element("tbody").children(rows))
}

fn voicing_grid_view(result: &ChordResult, active: usize) -> ViewNode {
    if result.voicings.is_empty() {
        return ViewNode::element("p").class("no-voicings").with_text(
            "No se encontraron digitaciones. Prueba omitir la quinta o considerar inversiones.",
        );
    }

    let mini = crate::layout::SizingProfile::mini();
    let cards = result.voicings.iter().enumerate().map(|(i, voicing)| {
        let label = voicing.compact_label();
        let class = if i == active {
            "voicing-card selected"
        } else {
            "voicing-card"
        };
        ViewNode::element("div")
            .class(class)
            .attr("data-voicing-index", i.to_string())
            .attr("title", label.clone())
            .child(scene_view(&crate::layout::layout(voicing, &mini)))
            .child(ViewNode::element("div").class("voicing-label").with_text(label))
    });

    ViewNode::element("div").class("voicings-grid").children(cards)
}

// ═══════════════════════════════════════════════════════════════════════
// Identifier
// ═══════════════════════════════════════════════════════════════════════

/// Complete identifier pane for the session's current state.
pub fn identifier_view(session: &IdentifierSession, engine: &dyn TheoryEngine) -> ViewNode {
    match session.state() {
        IdentifierState::Idle => ViewNode::element("div").class("identifier-result").child(
            ViewNode::element("div")
                .class("card placeholder")
                .child(ViewNode::element("div").class("icon").with_text("🔍"))
                .child(
                    ViewNode::element("p")
                        .with_text("Ingresa las pisadas arriba para identificar el acorde"),
                ),
        ),
        IdentifierState::Errored { message } => ViewNode::element("div")
            .class("identifier-result")
            .child(error_card(message)),
        IdentifierState::Displayed { result, .. } => {
            let diagram = match session.diagram() {
                Some(scene) => scene_view(&scene),
                None => ViewNode::element("p").class("no-voicing").with_text("Sin digitación"),
            };

            let mut view = ViewNode::element("div").class("identifier-result").child(
                ViewNode::element("div").class("card").child(
                    ViewNode::element("div")
                        .class("two-col")
                        .child(identify_summary_view(result, engine))
                        .child(
                            ViewNode::element("div")
                                .child(section_subtitle("Diagrama"))
                                .child(diagram),
                        ),
                ),
            );

            if result.candidates.len() > 1 {
                view = view.child(
                    ViewNode::element("div")
                        .class("card")
                        .child(section_subtitle("Candidatos ordenados por probabilidad"))
                        .child(candidate_table_view(result, engine)),
                );
            }
            view
        }
    }
}

fn identify_summary_view(result: &IdentifyResult, engine: &dyn TheoryEngine) -> ViewNode {
    let mut primary = ViewNode::element("div")
        .class("result-primary")
        .with_text(&result.primary_name);
    if let Some(spanish) = spanish_name(engine, &result.primary_name, None) {
        primary = primary.child(
            ViewNode::element("span")
                .class("spanish-inline")
                .with_text(format!("({})", spanish)),
        );
    }

    let alternatives = if result.alternative_names.is_empty() {
        ViewNode::element("div").class("alt-names").child(
            ViewNode::element("span")
                .class("alt-names-empty")
                .with_text("Sin equivalencias enarmónicas"),
        )
    } else {
        ViewNode::element("div")
            .class("alt-names")
            .children(result.alternative_names.iter().map(|name| {
                ViewNode::element("span").class("alt-name-chip").with_text(name)
            }))
    };

    let mut view = ViewNode::element("div")
        .child(section_subtitle("Acorde identificado"))
        .child(primary)
        .child(
            ViewNode::element("p")
                .class("result-sub")
                .with_text("Nombre principal más probable"),
        )
        .child(alternatives);

    if let Some(function) = &result.harmonic_function {
        view = view.child(
            ViewNode::element("div")
                .class("harmonic-pill")
                .with_text(format!("⚡ {}", function)),
        );
    }

    let note_badges = result.played_notes.iter().map(|pn| {
        let mut value = pn.note.clone();
        if let Some(spanish) = engine.english_to_spanish(&pn.note) {
            if spanish != pn.note {
                value = format!("{} ({})", pn.note, spanish);
            }
        }
        info_badge(
            &format!("Cuerda {} · Traste {}", pn.string_index + 1, pn.fret),
            &value,
        )
    });

    view.child(ViewNode::element("div").class("chord-info").children(note_badges))
}

fn candidate_table_view(result: &IdentifyResult, engine: &dyn TheoryEngine) -> ViewNode {
    let head = ViewNode::element("thead").child(
        ViewNode::element("tr")
            .child(ViewNode::element("th").with_text("Acorde"))
            .child(ViewNode::element("th").with_text("Calidad"))
            .child(ViewNode::element("th").with_text("Estado"))
            .child(ViewNode::element("th").with_text("Notas")),
    );

    // Rank order as received; the top candidate just gets a marker class.
    let rows = result.candidates.iter().enumerate().map(|(i, c)| {
        let row = ViewNode::element("tr");
        let row = if i == 0 { row.class("candidate-top") } else { row };
        row.child(candidate_name_cell(c, engine))
            .child(
                ViewNode::element("td")
                    .with_text(c.quality_display.as_deref().unwrap_or(&c.quality)),
            )
            .child(ViewNode::element("td").with_text(candidate_status(c)))
            .child(ViewNode::element("td").with_text(candidate_missing(c)))
    });

    ViewNode::element("table")
        .class("notes-table")
        .child(head)
        .child(ViewNode::element("tbody").children(rows))
}

fn candidate_name_cell(candidate: &Candidate, engine: &dyn TheoryEngine) -> ViewNode {
    let mut cell = ViewNode::element("td").with_text(&candidate.display_name);
    if let Some(spanish) = spanish_name(
        engine,
        &candidate.display_name,
        candidate.spanish_display_name.as_deref(),
    ) {
        cell = cell.child(
            ViewNode::element("span")
                .class("note-spanish")
                .with_text(format!("({})", spanish)),
        );
    }
    cell
}

fn candidate_status(candidate: &Candidate) -> String {
    if candidate.is_inversion {
        let bass = candidate.inversion_bass.as_deref().unwrap_or("?");
        format!("🔄 Inversión (bajo: {})", bass)
    } else if candidate.is_incomplete {
        "⚠️ Incompleto".to_string()
    } else {
        "✅".to_string()
    }
}

fn candidate_missing(candidate: &Candidate) -> String {
    if candidate.missing.is_empty() {
        "Completo".to_string()
    } else {
        format!("Faltan: {}", candidate.missing.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{GeneratorSession, IdentifierSession};
    use crate::test_support::{StubTheory, c_over_g_result, e_major_identification};
    use crate::voicing::Fret;

    #[test]
    fn test_html_escaping() {
        let node = ViewNode::element("p")
            .attr("title", "a\"b")
            .with_text("<script>&");
        assert_eq!(
            node.render_html(),
            "<p title=\"a&quot;b\">&lt;script&gt;&amp;</p>"
        );
    }

    #[test]
    fn test_scene_view_mirrors_scene_elements() {
        let voicing = crate::test_support::c_voicing_open();
        let scene = crate::layout::layout(&voicing, &crate::layout::SizingProfile::full());
        let svg = scene_view(&scene);
        match &svg {
            ViewNode::Element { tag, children, .. } => {
                assert_eq!(tag, "svg");
                assert_eq!(children.len(), scene.elements.len());
            }
            other => panic!("expected svg element, got {:?}", other),
        }
    }

    #[test]
    fn test_selecting_a_voicing_leaves_summary_untouched() {
        let engine = StubTheory::generating(c_over_g_result(3));
        let mut session = GeneratorSession::new();
        session.submit_chord_name(&engine, "C/G");

        let before = generator_summary_view(session.result().unwrap(), &engine).render_html();
        let diagram_before = session.active_diagram().unwrap();

        session.select_voicing(2);

        let after = generator_summary_view(session.result().unwrap(), &engine).render_html();
        assert_eq!(before, after);
        assert_ne!(session.active_diagram().unwrap(), diagram_before);
    }

    #[test]
    fn test_summary_contains_bass_badge_and_semitone_names() {
        let engine = StubTheory::generating(c_over_g_result(1));
        let mut session = GeneratorSession::new();
        session.submit_chord_name(&engine, "C/G");

        let html = generator_summary_view(session.result().unwrap(), &engine).render_html();
        assert!(html.contains("Bajo"));
        assert!(html.contains("5ª justa"));
        assert!(html.contains("(Mi)"));
    }

    #[test]
    fn test_generator_error_view_is_sole_content() {
        let engine = StubTheory::faulting("boom");
        let mut session = GeneratorSession::new();
        session.submit_chord_name(&engine, "C");

        let html = generator_view(&session, &engine).render_html();
        assert!(html.contains("⚠️ boom"));
        assert!(!html.contains("voicings-grid"));
        assert!(!html.contains("notes-table"));
    }

    #[test]
    fn test_selected_voicing_card_is_marked() {
        let engine = StubTheory::generating(c_over_g_result(3));
        let mut session = GeneratorSession::new();
        session.submit_chord_name(&engine, "C");
        session.select_voicing(1);

        let html = generator_view(&session, &engine).render_html();
        assert!(html.contains("data-voicing-index=\"1\""));
        assert_eq!(html.matches("voicing-card selected").count(), 1);
    }

    #[test]
    fn test_identifier_view_renders_candidates_in_given_order() {
        let engine = StubTheory::identifying(e_major_identification());
        let mut session = IdentifierSession::new();
        session.set_all_frets([
            Fret::At(0),
            Fret::At(2),
            Fret::At(2),
            Fret::At(1),
            Fret::At(0),
            Fret::At(0),
        ]);
        session.identify(&engine);

        let html = identifier_view(&session, &engine).render_html();
        let first = html.find("candidate-top").unwrap();
        let second = html.find("G#m#5").unwrap();
        assert!(first < second);
        assert!(html.contains("🔄 Inversión (bajo: E)"));
        assert!(html.contains("Faltan: 5"));
        assert!(html.contains("Cuerda 4 · Traste 1"));
    }

    #[test]
    fn test_identifier_idle_placeholder() {
        let engine = StubTheory::identifying(e_major_identification());
        let session = IdentifierSession::new();
        let html = identifier_view(&session, &engine).render_html();
        assert!(html.contains("Ingresa las pisadas arriba"));
    }

    #[test]
    fn test_semitone_name_fallback() {
        assert_eq!(semitones_display_name(6), "Tritono");
        assert_eq!(semitones_display_name(13), "13 semitonos");
    }
}
