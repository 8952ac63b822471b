// src/test_support.rs
//
// Scripted theory engine for session and view tests. Returns whatever it
// was constructed with and counts how often the sessions actually call it.

use std::cell::{Cell, RefCell};

use crate::theory::{
    BassNote, Candidate, ChordNote, ChordResult, IdentifyResult, PlayedNote, TheoryEngine,
    TheoryFault,
};
use crate::voicing::{StringPlacement, Voicing};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const SPANISH_PREFIXES: [(&str, &str); 7] = [
    ("SOL", "G"),
    ("DO", "C"),
    ("RE", "D"),
    ("MI", "E"),
    ("FA", "F"),
    ("LA", "A"),
    ("SI", "B"),
];

pub struct StubTheory {
    generate: Option<ChordResult>,
    identify: Option<IdentifyResult>,
    fault: Option<String>,
    generate_calls: Cell<usize>,
    identify_calls: Cell<usize>,
    last_generated: RefCell<Option<String>>,
}

impl StubTheory {
    pub fn generating(result: ChordResult) -> Self {
        Self::new(Some(result), None, None)
    }

    pub fn identifying(result: IdentifyResult) -> Self {
        Self::new(None, Some(result), None)
    }

    pub fn faulting(message: &str) -> Self {
        Self::new(None, None, Some(message.to_string()))
    }

    fn new(
        generate: Option<ChordResult>,
        identify: Option<IdentifyResult>,
        fault: Option<String>,
    ) -> Self {
        Self {
            generate,
            identify,
            fault,
            generate_calls: Cell::new(0),
            identify_calls: Cell::new(0),
            last_generated: RefCell::new(None),
        }
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.get()
    }

    pub fn identify_calls(&self) -> usize {
        self.identify_calls.get()
    }

    pub fn last_generated_name(&self) -> Option<String> {
        self.last_generated.borrow().clone()
    }
}

impl TheoryEngine for StubTheory {
    fn spanish_to_english(&self, text: &str) -> String {
        for (spanish, english) in SPANISH_PREFIXES {
            if let Some(rest) = text.strip_prefix(spanish) {
                return format!("{}{}", english, rest);
            }
        }
        text.to_string()
    }

    fn generate_chord(&self, name: &str) -> Result<ChordResult, TheoryFault> {
        self.generate_calls.set(self.generate_calls.get() + 1);
        *self.last_generated.borrow_mut() = Some(name.to_string());
        if let Some(message) = &self.fault {
            return Err(TheoryFault(message.clone()));
        }
        self.generate
            .clone()
            .ok_or_else(|| TheoryFault("no scripted chord result".to_string()))
    }

    fn identify_chord(
        &self,
        _frets: &[crate::voicing::Fret; 6],
    ) -> Result<IdentifyResult, TheoryFault> {
        self.identify_calls.set(self.identify_calls.get() + 1);
        if let Some(message) = &self.fault {
            return Err(TheoryFault(message.clone()));
        }
        self.identify
            .clone()
            .ok_or_else(|| TheoryFault("no scripted identify result".to_string()))
    }

    fn to_spanish_display_name(&self, name: &str) -> String {
        let split = name
            .char_indices()
            .find(|(i, c)| *i > 0 && *c != '#' && *c != 'b')
            .map(|(i, _)| i)
            .unwrap_or(name.len());
        let (root, rest) = name.split_at(split);
        match spanish_note(root) {
            Some(spanish) => format!("{}{}", spanish, rest),
            None => name.to_string(),
        }
    }

    fn note_to_index(&self, note: &str) -> Option<usize> {
        NOTE_NAMES.iter().position(|n| *n == note)
    }

    fn index_to_note(&self, index: usize) -> String {
        NOTE_NAMES[index % 12].to_string()
    }

    fn english_to_spanish(&self, note: &str) -> Option<String> {
        spanish_note(note)
    }
}

fn spanish_note(note: &str) -> Option<String> {
    let mut chars = note.chars();
    let letter = chars.next()?;
    let accidental: String = chars.collect();
    let base = match letter {
        'C' => "Do",
        'D' => "Re",
        'E' => "Mi",
        'F' => "Fa",
        'G' => "Sol",
        'A' => "La",
        'B' => "Si",
        _ => return None,
    };
    Some(format!("{}{}", base, accidental))
}

/// Open-position C major, x-3-2-0-1-0.
pub fn c_voicing_open() -> Voicing {
    Voicing::new([
        StringPlacement::muted(),
        StringPlacement::fretted(3, "C").with_interval("1"),
        StringPlacement::fretted(2, "E").with_interval("3"),
        StringPlacement::open("G").with_interval("5"),
        StringPlacement::fretted(1, "C").with_interval("1"),
        StringPlacement::open("E").with_interval("3"),
    ])
}

/// A-shape C major barred at the third fret.
pub fn c_voicing_a_shape() -> Voicing {
    Voicing::new([
        StringPlacement::muted(),
        StringPlacement::fretted(3, "C").with_interval("1"),
        StringPlacement::fretted(5, "G").with_interval("5"),
        StringPlacement::fretted(5, "C").with_interval("1"),
        StringPlacement::fretted(5, "E").with_interval("3"),
        StringPlacement::fretted(3, "G").with_interval("5"),
    ])
}

/// E-shape C major barred at the eighth fret.
pub fn c_voicing_e_shape() -> Voicing {
    Voicing::new([
        StringPlacement::fretted(8, "C").with_interval("1"),
        StringPlacement::fretted(10, "G").with_interval("5"),
        StringPlacement::fretted(10, "C").with_interval("1"),
        StringPlacement::fretted(9, "E").with_interval("3"),
        StringPlacement::fretted(8, "G").with_interval("5"),
        StringPlacement::fretted(8, "C").with_interval("1"),
    ])
}

/// A C major result with the first `voicing_count` of the three stock
/// voicings (repeating if more are asked for).
pub fn c_major_result(voicing_count: usize) -> ChordResult {
    let stock = [c_voicing_open(), c_voicing_a_shape(), c_voicing_e_shape()];
    let voicings = (0..voicing_count)
        .map(|i| stock[i % stock.len()].clone())
        .collect();

    ChordResult {
        display_name: "C".to_string(),
        spanish_display_name: Some("Do".to_string()),
        root_display: "C".to_string(),
        bass_note: None,
        formula: vec!["1".to_string(), "3".to_string(), "5".to_string()],
        chord_notes: vec![
            ChordNote {
                interval: "1".to_string(),
                note: "C".to_string(),
                semitones_from_root: 0,
            },
            ChordNote {
                interval: "3".to_string(),
                note: "E".to_string(),
                semitones_from_root: 4,
            },
            ChordNote {
                interval: "5".to_string(),
                note: "G".to_string(),
                semitones_from_root: 7,
            },
        ],
        voicings,
        error: None,
    }
}

/// A C/G slash-chord variant of [`c_major_result`].
pub fn c_over_g_result(voicing_count: usize) -> ChordResult {
    let mut result = c_major_result(voicing_count);
    result.display_name = "C/G".to_string();
    result.spanish_display_name = Some("Do/Sol".to_string());
    result.bass_note = Some(BassNote {
        bass_display: "G".to_string(),
    });
    result
}

/// Identification of the open E major shape, 0-2-2-1-0-0.
pub fn e_major_identification() -> IdentifyResult {
    IdentifyResult {
        primary_name: "E".to_string(),
        alternative_names: vec!["Fb".to_string()],
        harmonic_function: Some("Tónica de Mi mayor".to_string()),
        played_notes: vec![
            PlayedNote {
                string_index: 0,
                fret: 0,
                note: "E".to_string(),
            },
            PlayedNote {
                string_index: 1,
                fret: 2,
                note: "B".to_string(),
            },
            PlayedNote {
                string_index: 2,
                fret: 2,
                note: "E".to_string(),
            },
            PlayedNote {
                string_index: 3,
                fret: 1,
                note: "G#".to_string(),
            },
            PlayedNote {
                string_index: 4,
                fret: 0,
                note: "B".to_string(),
            },
            PlayedNote {
                string_index: 5,
                fret: 0,
                note: "E".to_string(),
            },
        ],
        candidates: vec![
            Candidate {
                display_name: "E".to_string(),
                spanish_display_name: Some("Mi".to_string()),
                quality: "maj".to_string(),
                quality_display: Some("Mayor".to_string()),
                root: "E".to_string(),
                is_inversion: false,
                inversion_bass: None,
                is_incomplete: false,
                missing: vec![],
            },
            Candidate {
                display_name: "G#m#5".to_string(),
                spanish_display_name: Some("Sol#m#5".to_string()),
                quality: "m#5".to_string(),
                quality_display: None,
                root: "G#".to_string(),
                is_inversion: true,
                inversion_bass: Some("E".to_string()),
                is_incomplete: true,
                missing: vec!["5".to_string()],
            },
        ],
        error: None,
    }
}
