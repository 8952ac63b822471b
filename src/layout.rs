// src/layout.rs
//
// Fretboard diagram layout engine.
//
// Turns a Voicing plus a sizing profile into a drawable Scene: an ordered
// list of abstract shape descriptors with resolved positions. The same
// algorithm serves the large active diagram and the voicing thumbnails;
// the profiles differ in geometry only.
//
// layout() is a pure function of its inputs. No hidden state, no
// side effects; equal inputs yield structurally equal scenes.

use serde::{Deserialize, Serialize};

use crate::color::interval_color;
use crate::voicing::{Fret, OPEN_STRING_NAMES, STRING_COUNT, Voicing};

/// Frets visible in one diagram window. Fixed.
pub const FRETS_SHOWN: u8 = 5;

/// Canvas geometry for one diagram size.
///
/// Spacing is derived: string spacing from the horizontal span over five
/// gaps, fret-row height from the vertical span over the five visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingProfile {
    pub width: f32,
    pub height: f32,

    /// Margins around the string/fret grid.
    pub left: f32,
    pub top: f32,
    pub right_margin: f32,
    pub bottom_margin: f32,

    /// Nut bar: how far above the first fret line it sits, and how tall.
    pub nut_rise: f32,
    pub nut_thickness: f32,

    /// The fret-0 line is drawn at this width when it is the nut.
    pub nut_line_width: f32,
    pub fret_line_width: f32,
    pub string_line_width: f32,

    pub open_marker_radius: f32,
    pub open_marker_rise: f32,
    pub mute_rise: f32,
    pub dot_radius: f32,
    pub dot_label_dy: f32,

    /// Vertical drop of the open-string name row below the grid.
    pub label_drop: f32,

    pub position_font: f32,
    pub mute_font: f32,
    pub dot_font: f32,
    pub string_label_font: f32,
}

impl SizingProfile {
    /// Profile for the single active diagram.
    pub fn full() -> Self {
        Self {
            width: 200.0,
            height: 240.0,
            left: 38.0,
            top: 50.0,
            right_margin: 14.0,
            bottom_margin: 28.0,
            nut_rise: 4.0,
            nut_thickness: 6.0,
            nut_line_width: 1.5,
            fret_line_width: 1.0,
            string_line_width: 1.2,
            open_marker_radius: 6.0,
            open_marker_rise: 10.0,
            mute_rise: 12.0,
            dot_radius: 11.0,
            dot_label_dy: 4.0,
            label_drop: 16.0,
            position_font: 11.0,
            mute_font: 13.0,
            dot_font: 9.0,
            string_label_font: 10.0,
        }
    }

    /// Profile for per-voicing thumbnails.
    pub fn mini() -> Self {
        Self {
            width: 130.0,
            height: 130.0,
            left: 14.0,
            top: 24.0,
            right_margin: 6.0,
            bottom_margin: 20.0,
            nut_rise: 3.0,
            nut_thickness: 4.0,
            nut_line_width: 0.8,
            fret_line_width: 0.8,
            string_line_width: 0.8,
            open_marker_radius: 4.0,
            open_marker_rise: 7.0,
            mute_rise: 8.0,
            dot_radius: 7.0,
            dot_label_dy: 3.0,
            label_drop: 14.0,
            position_font: 9.0,
            mute_font: 9.0,
            dot_font: 7.0,
            string_label_font: 8.0,
        }
    }

    /// X coordinate of the high-E string line.
    pub fn right(&self) -> f32 {
        self.width - self.right_margin
    }

    /// Horizontal distance between adjacent string lines.
    pub fn string_spacing(&self) -> f32 {
        (self.right() - self.left) / (STRING_COUNT as f32 - 1.0)
    }

    /// Vertical height of one fret row.
    pub fn fret_row_height(&self) -> f32 {
        (self.height - self.top - self.bottom_margin) / FRETS_SHOWN as f32
    }
}

/// One drawable shape in a diagram scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneElement {
    /// Thick bar above the grid when the window starts at the nut.
    Nut {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    /// Fret-position number shown left of the grid when the nut is off
    /// screen.
    PositionLabel {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
    },

    FretLine {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },

    StringLine {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },

    /// Ring above an open string.
    OpenMarker { x: f32, y: f32, radius: f32 },

    /// Mute glyph above a silent string.
    MuteMarker { x: f32, y: f32, font_size: f32 },

    /// Filled finger dot; color keyed by the placement's interval.
    FingerDot {
        x: f32,
        y: f32,
        radius: f32,
        color: String,
        label: String,
        label_dy: f32,
        font_size: f32,
    },

    /// Open-string name below the grid.
    StringLabel {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
    },
}

/// A laid-out diagram: canvas size, selected fret window, and shapes in
/// drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub start_fret: u8,
    pub elements: Vec<SceneElement>,
}

impl Scene {
    /// Finger dots in this scene, in drawing order.
    pub fn finger_dots(&self) -> impl Iterator<Item = &SceneElement> {
        self.elements
            .iter()
            .filter(|e| matches!(e, SceneElement::FingerDot { .. }))
    }
}

/// First fret of the visible window for a voicing.
///
/// The window keeps one fret of runway above the lowest fretted note,
/// clamped at the nut. Open-only and all-muted voicings start at the nut.
/// This is the single windowing rule; every diagram in both sessions goes
/// through it.
pub fn fret_window(voicing: &Voicing) -> u8 {
    voicing
        .played_frets()
        .min()
        .map(|lowest| lowest.saturating_sub(1))
        .unwrap_or(0)
}

/// Lay out one voicing at the given profile.
pub fn layout(voicing: &Voicing, profile: &SizingProfile) -> Scene {
    let start_fret = fret_window(voicing);
    let end_fret = start_fret.saturating_add(FRETS_SHOWN);

    let left = profile.left;
    let top = profile.top;
    let right = profile.right();
    let str_w = profile.string_spacing();
    let fret_h = profile.fret_row_height();
    let grid_bottom = top + FRETS_SHOWN as f32 * fret_h;

    let mut elements = Vec::with_capacity(2 + FRETS_SHOWN as usize + 3 * STRING_COUNT);

    // Nut, or the window's starting fret number.
    if start_fret == 0 {
        elements.push(SceneElement::Nut {
            x: left,
            y: top - profile.nut_rise,
            width: right - left,
            height: profile.nut_thickness,
        });
    } else {
        elements.push(SceneElement::PositionLabel {
            x: left - 8.0,
            y: top + fret_h * 0.5 + 5.0,
            text: (start_fret + 1).to_string(),
            font_size: profile.position_font,
        });
    }

    // Horizontal fret lines. The top line is heavier only when it is the
    // nut.
    for f in 0..=FRETS_SHOWN {
        let y = top + f as f32 * fret_h;
        let width = if f == 0 && start_fret == 0 {
            profile.nut_line_width
        } else {
            profile.fret_line_width
        };
        elements.push(SceneElement::FretLine {
            x1: left,
            y1: y,
            x2: right,
            y2: y,
            width,
        });
    }

    // String lines with open/mute markers, before any finger dots.
    for (s, placement) in voicing.placements().iter().enumerate() {
        let x = left + s as f32 * str_w;
        elements.push(SceneElement::StringLine {
            x1: x,
            y1: top,
            x2: x,
            y2: grid_bottom,
            width: profile.string_line_width,
        });

        match placement.fret {
            Fret::Muted => elements.push(SceneElement::MuteMarker {
                x,
                y: top - profile.mute_rise,
                font_size: profile.mute_font,
            }),
            Fret::At(0) => elements.push(SceneElement::OpenMarker {
                x,
                y: top - profile.open_marker_rise,
                radius: profile.open_marker_radius,
            }),
            Fret::At(_) => {}
        }
    }

    // Finger dots for placements inside the window. Anything outside
    // [start+1, end] is silently skipped.
    for (s, placement) in voicing.placements().iter().enumerate() {
        let Some(fret) = placement.fret.number() else {
            continue;
        };
        if fret <= start_fret || fret > end_fret {
            continue;
        }

        let x = left + s as f32 * str_w;
        let rel = (fret - start_fret) as f32;
        let y = top + (rel - 0.5) * fret_h;

        let interval = placement.interval.as_deref().unwrap_or("");
        let label = placement
            .note
            .clone()
            .or_else(|| placement.interval.clone())
            .unwrap_or_default();

        elements.push(SceneElement::FingerDot {
            x,
            y,
            radius: profile.dot_radius,
            color: interval_color(interval).to_string(),
            label,
            label_dy: profile.dot_label_dy,
            font_size: profile.dot_font,
        });
    }

    // Open-string names, always drawn.
    for (s, name) in OPEN_STRING_NAMES.iter().enumerate() {
        elements.push(SceneElement::StringLabel {
            x: left + s as f32 * str_w,
            y: grid_bottom + profile.label_drop,
            text: (*name).to_string(),
            font_size: profile.string_label_font,
        });
    }

    Scene {
        width: profile.width,
        height: profile.height,
        start_fret,
        elements,
    }
}
