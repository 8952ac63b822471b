// src/main.rs

use fretlab::{
    Candidate, ChordNote, ChordResult, Fret, GeneratorSession, GeneratorState, IdentifierSession,
    IdentifyResult, OPEN_STRING_NAMES, PlayedNote, STRING_COUNT, StringPlacement, TheoryEngine,
    TheoryFault, Voicing,
};

/// ===============================
/// Demo theory engine
/// ===============================

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Tiny stand-in for the real theory collaborator: knows the C major
/// family and derives identifier notes with plain fret arithmetic. Enough
/// to drive both sessions end to end.
struct DemoTheory;

impl DemoTheory {
    fn c_major_voicings() -> Vec<Voicing> {
        vec![
            Voicing::new([
                StringPlacement::muted(),
                StringPlacement::fretted(3, "C").with_interval("1"),
                StringPlacement::fretted(2, "E").with_interval("3"),
                StringPlacement::open("G").with_interval("5"),
                StringPlacement::fretted(1, "C").with_interval("1"),
                StringPlacement::open("E").with_interval("3"),
            ]),
            Voicing::new([
                StringPlacement::fretted(8, "C").with_interval("1"),
                StringPlacement::fretted(10, "G").with_interval("5"),
                StringPlacement::fretted(10, "C").with_interval("1"),
                StringPlacement::fretted(9, "E").with_interval("3"),
                StringPlacement::fretted(8, "G").with_interval("5"),
                StringPlacement::fretted(8, "C").with_interval("1"),
            ]),
        ]
    }
}

impl TheoryEngine for DemoTheory {
    fn spanish_to_english(&self, text: &str) -> String {
        for (spanish, english) in [
            ("SOL", "G"),
            ("DO", "C"),
            ("RE", "D"),
            ("MI", "E"),
            ("FA", "F"),
            ("LA", "A"),
            ("SI", "B"),
        ] {
            if let Some(rest) = text.strip_prefix(spanish) {
                return format!("{}{}", english, rest);
            }
        }
        text.to_string()
    }

    fn generate_chord(&self, name: &str) -> Result<ChordResult, TheoryFault> {
        if name != "C" && name != "Cmaj7" {
            return Ok(ChordResult {
                display_name: name.to_string(),
                spanish_display_name: None,
                root_display: String::new(),
                bass_note: None,
                formula: vec![],
                chord_notes: vec![],
                voicings: vec![],
                error: Some(format!("Acorde no reconocido: {}", name)),
            });
        }

        Ok(ChordResult {
            display_name: "C".to_string(),
            spanish_display_name: Some("Do".to_string()),
            root_display: "C".to_string(),
            bass_note: None,
            formula: vec!["1".into(), "3".into(), "5".into()],
            chord_notes: vec![
                ChordNote {
                    interval: "1".into(),
                    note: "C".into(),
                    semitones_from_root: 0,
                },
                ChordNote {
                    interval: "3".into(),
                    note: "E".into(),
                    semitones_from_root: 4,
                },
                ChordNote {
                    interval: "5".into(),
                    note: "G".into(),
                    semitones_from_root: 7,
                },
            ],
            voicings: Self::c_major_voicings(),
            error: None,
        })
    }

    fn identify_chord(&self, frets: &[Fret; STRING_COUNT]) -> Result<IdentifyResult, TheoryFault> {
        let mut played_notes = Vec::new();
        for (s, fret) in frets.iter().enumerate() {
            if let Some(f) = fret.number() {
                let open = self
                    .note_to_index(OPEN_STRING_NAMES[s])
                    .ok_or_else(|| TheoryFault("unknown open string".to_string()))?;
                played_notes.push(PlayedNote {
                    string_index: s,
                    fret: f,
                    note: self.index_to_note(open + f as usize),
                });
            }
        }

        let primary = played_notes
            .first()
            .map(|pn| pn.note.clone())
            .unwrap_or_default();

        Ok(IdentifyResult {
            primary_name: primary.clone(),
            alternative_names: vec![],
            harmonic_function: None,
            played_notes,
            candidates: vec![Candidate {
                display_name: primary.clone(),
                spanish_display_name: None,
                quality: "maj".to_string(),
                quality_display: Some("Mayor".to_string()),
                root: primary,
                is_inversion: false,
                inversion_bass: None,
                is_incomplete: false,
                missing: vec![],
            }],
            error: None,
        })
    }

    fn to_spanish_display_name(&self, name: &str) -> String {
        match self.english_to_spanish(name) {
            Some(spanish) => spanish,
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
        let spanish = match note {
            "C" => "Do",
            "D" => "Re",
            "E" => "Mi",
            "F" => "Fa",
            "G" => "Sol",
            "A" => "La",
            "B" => "Si",
            _ => return None,
        };
        Some(spanish.to_string())
    }
}

/// ===============================
/// Main
/// ===============================

fn main() {
    let engine = DemoTheory;

    println!("fretlab sanity run…");

    // --------------------------------
    // Generator: explicit submit (Spanish spelling on purpose)
    // --------------------------------

    let mut generator = GeneratorSession::new();
    generator.submit_chord_name(&engine, "DO");

    match generator.state() {
        GeneratorState::Displayed { result, .. } => {
            println!(
                "generated {} ({} voicings)",
                result.display_name,
                result.voicings.len()
            );
        }
        other => println!("unexpected generator state: {:?}", other),
    }

    for (i, scene) in generator.thumbnail_scenes().iter().enumerate() {
        println!(
            "  thumbnail {}: window starts at fret {}, {} dots",
            i,
            scene.start_fret,
            scene.finger_dots().count()
        );
    }

    generator.select_voicing(1);
    if let Some(scene) = generator.active_diagram() {
        println!(
            "active diagram: window starts at fret {}, {} elements",
            scene.start_fret,
            scene.elements.len()
        );
    }

    // --------------------------------
    // Generator: debounced live input
    // --------------------------------

    generator.on_live_input("C", 0);
    generator.on_live_input("Cmaj7", 150);
    assert!(!generator.poll(&engine, 400));
    assert!(generator.poll(&engine, 550));
    println!("live input settled on a result: {}", generator.result().is_some());

    // --------------------------------
    // Identifier
    // --------------------------------

    let mut identifier = IdentifierSession::new();
    identifier.set_all_frets([
        Fret::Muted,
        Fret::At(3),
        Fret::At(2),
        Fret::At(0),
        Fret::At(1),
        Fret::At(0),
    ]);
    identifier.identify(&engine);

    if let Some(result) = identifier.result() {
        println!(
            "identified {} from {} played strings",
            result.primary_name,
            result.played_notes.len()
        );
    }

    // --------------------------------
    // Error path
    // --------------------------------

    generator.submit_chord_name(&engine, "Z9sus!");
    if let GeneratorState::Errored { message } = generator.state() {
        println!("generator error path: {}", message);
    }

    println!("Sanity run completed.");
}
