//! Integration tests for the funkconv transcoders
//!
//! Exercises the full text-to-document pipelines: JSON in, typed documents
//! and artifacts out, in both directions.

use funkconv::export::{psych_chart_artifact, to_psych_json, to_vslice_json, vslice_chart_artifacts};
use funkconv::{
    chart_to_psych, chart_to_vslice, stage_to_psych, stage_to_vslice, week_to_psych,
    character_to_psych, ChartToPsychOptions, ChartToVSliceOptions, ConvertError,
    StageToPsychOptions, StageToVSliceOptions, WeekToPsychOptions,
    CharacterToPsychOptions,
};

const CHART: &str = r#"{
    "version": "2.0.0",
    "scrollSpeed": {"normal": 1.3, "hard": 1.6},
    "notes": {
        "normal": [
            {"t": 0, "d": 0, "l": 0, "p": []},
            {"t": 600, "d": 5, "l": 250, "p": []},
            {"t": 2500, "d": 4, "l": 0, "p": []}
        ],
        "hard": [
            {"t": 0, "d": 7, "l": 0, "p": []}
        ]
    }
}"#;

const METADATA: &str = r#"{
    "version": "2.2.4",
    "songName": "Test Drive",
    "artist": "Somebody",
    "timeChanges": [{"t": 0, "b": 0, "bpm": 100, "n": 4, "d": 4, "bt": [4, 4, 4, 4]}]
}"#;

#[test]
fn test_single_note_chart_round_trip() {
    // One tap note at t=0 on lane 0 at 100 bpm: exactly one non-call
    // section holding stored direction 0, and flattening recovers the
    // identical note.
    let chart = r#"{"notes": {"normal": [{"t": 0, "d": 0, "l": 0, "p": []}]}}"#;
    let metadata = r#"{"songName": "Minimal", "timeChanges": [{"t": 0, "b": 0, "bpm": 100}]}"#;

    let psych = chart_to_psych(chart, metadata, &ChartToPsychOptions::default()).unwrap();
    assert_eq!(psych.song.notes.len(), 1);
    let section = &psych.song.notes[0];
    assert!(!section.must_hit_section);
    assert_eq!(section.section_notes.len(), 1);
    assert_eq!(section.section_notes[0].direction, 0);

    let text = to_psych_json(&psych).unwrap();
    let (flat, _) = chart_to_vslice(&text, &ChartToVSliceOptions::default()).unwrap();
    let notes = &flat.notes["normal"];
    assert_eq!(notes.len(), 1);
    assert_eq!((notes[0].t, notes[0].d, notes[0].l), (0.0, 0, 0.0));
}

#[test]
fn test_chart_conversion_encodes_against_section_parity() {
    let psych = chart_to_psych(CHART, METADATA, &ChartToPsychOptions::default()).unwrap();
    let sections = &psych.song.notes;
    // 100 bpm: 2400ms sections. Two sections cover notes up to 2500ms.
    assert_eq!(sections.len(), 2);
    assert!(!sections[0].must_hit_section);
    assert!(sections[1].must_hit_section);

    // Opponent note in the opponent's section stays low.
    assert_eq!(sections[0].section_notes[0].direction, 0);
    // Player note in the opponent's section keeps the high bit.
    assert_eq!(sections[0].section_notes[1].direction, 5);
    // Player note in the player's section drops to the low lanes.
    assert_eq!(sections[1].section_notes[0].direction, 0);

    assert_eq!(psych.song.song, "Test Drive");
    assert_eq!(psych.song.speed, Some(1.3));
    assert_eq!(psych.song.bpm, Some(100.0));
}

#[test]
fn test_chart_conversion_honors_difficulty_and_overrides() {
    let options = ChartToPsychOptions {
        difficulty: "hard".to_string(),
        ..Default::default()
    };
    let psych = chart_to_psych(CHART, METADATA, &options).unwrap();
    assert_eq!(psych.song.speed, Some(1.6));
    assert_eq!(psych.song.notes[0].section_notes.len(), 1);

    let options = ChartToPsychOptions {
        bpm: Some(200.0),
        ..Default::default()
    };
    // Doubling the tempo halves the section window, so the 2500ms note
    // now sits three sections in.
    let psych = chart_to_psych(CHART, METADATA, &options).unwrap();
    assert_eq!(psych.song.notes.len(), 3);
}

#[test]
fn test_flatten_normalizes_ownership_and_sorts() {
    // Section 0 (non-call) carries a high-bit note and a very late note;
    // section 1 (call) carries an early one. Flattening normalizes
    // ownership to the section owner and sorts globally by time.
    let psych = r#"{"song": {
        "song": "Out Of Order",
        "bpm": 100,
        "speed": 2,
        "notes": [
            {"sectionNotes": [[5000, 6, 0], [100, 0, 0]], "mustHitSection": false},
            {"sectionNotes": [[300, 1, 0, "Hey!"]], "mustHitSection": true}
        ]
    }}"#;
    let (flat, metadata) = chart_to_vslice(psych, &ChartToVSliceOptions::default()).unwrap();
    let notes = &flat.notes["normal"];
    assert_eq!(notes.len(), 3);
    let triples: Vec<(f64, i64)> = notes.iter().map(|n| (n.t, n.d)).collect();
    // 6 in a non-call section normalizes to opponent lane 2; 1 in a call
    // section normalizes to player lane 5.
    assert_eq!(triples, vec![(100.0, 0), (300.0, 5), (5000.0, 2)]);
    assert!(notes.iter().all(|n| n.p.is_empty()));
    assert_eq!(metadata.song_name, "Out Of Order");
    assert_eq!(metadata.play_data.characters.player, "bf");
}

#[test]
fn test_missing_bpm_is_reported_not_defaulted() {
    let psych = r#"{"song": {"song": "No Tempo", "notes": []}}"#;
    let err = chart_to_vslice(psych, &ChartToVSliceOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::MissingRequiredField(_)));
    assert!(err.to_string().contains("song.bpm"));
}

#[test]
fn test_malformed_chart_json_reports_location() {
    let err = chart_to_vslice("{\n  \"song\": nope\n}", &ChartToVSliceOptions::default())
        .unwrap_err();
    match err {
        ConvertError::ParseError { line, .. } => assert_eq!(line, 2),
        other => panic!("expected ParseError, got {}", other),
    }
}

const STAGE: &str = r#"{
    "version": "1.0.0",
    "name": "Haunted House",
    "directory": "spooky",
    "cameraZoom": 1.05,
    "props": [
        {
            "name": "bg",
            "assetPath": "stages/spooky/bg",
            "position": [10, 20],
            "scale": [1, 1],
            "scroll": [1, 1],
            "alpha": 1,
            "isPixel": true,
            "zIndex": 5,
            "danceEvery": 0,
            "animType": "sparrow",
            "startingAnimation": "",
            "animations": []
        },
        {
            "name": "lightning",
            "assetPath": "stages/spooky/lightning",
            "position": [-180, -40],
            "scale": [1.2, 1.2],
            "scroll": [0.9, 0.9],
            "alpha": 0.8,
            "isPixel": false,
            "zIndex": 320,
            "danceEvery": 0,
            "animType": "sparrow",
            "startingAnimation": "",
            "animations": []
        }
    ],
    "characters": {
        "bf": {"zIndex": 300, "position": [700, 120], "cameraOffsets": [-20, 0]},
        "dad": {"zIndex": 250, "position": [120, 95], "cameraOffsets": [0, 0]},
        "gf": {"zIndex": 150, "position": [400, 130], "cameraOffsets": [0, 0]}
    }
}"#;

#[test]
fn test_stage_conversion_defaults_only_prop() {
    // The pixel prop uses defaults everywhere, so its script is exactly a
    // create statement and a register statement below the threshold.
    let (json, lua) = stage_to_psych(STAGE, &StageToPsychOptions::default()).unwrap();
    assert_eq!(json.default_zoom, 1.05);
    assert_eq!(json.boyfriend, [700.0, 120.0]);
    assert_eq!(json.camera_boyfriend, [-20.0, 0.0]);

    assert!(lua.contains("makeLuaSprite('bg', 'stages/spooky/bg', 10, 20)"));
    assert!(lua.contains("addLuaSprite('bg', false)"));
    let bg_block: &str = &lua[lua.find("makeLuaSprite('bg'").unwrap()
        ..lua.find("makeLuaSprite('lightning'").unwrap()];
    assert!(!bg_block.contains("scaleObject"));
    assert!(!bg_block.contains(".alpha'"));
    assert!(!bg_block.contains("setScrollFactor"));
    assert!(!bg_block.contains("antialiasing"));
}

#[test]
fn test_stage_conversion_full_prop_and_front_flag() {
    let (_, lua) = stage_to_psych(STAGE, &StageToPsychOptions::default()).unwrap();
    // zIndex 320 clears the player anchor's 300.
    assert!(lua.contains("addLuaSprite('lightning', true)"));
    assert!(lua.contains("scaleObject('lightning', 1.2, 1.2)"));
    assert!(lua.contains("setProperty('lightning.alpha', 0.8)"));
    assert!(lua.contains("setScrollFactor('lightning', 0.9, 0.9)"));
    assert!(lua.contains("getPropertyFromClass('backend.ClientPrefs', 'data.globalAntialiasing')"));
}

#[test]
fn test_stage_script_round_trip_loses_pixel_art_only() {
    let (json, lua) = stage_to_psych(STAGE, &StageToPsychOptions::default()).unwrap();
    let stage_text = to_psych_json(&json).unwrap();
    let back = stage_to_vslice(&stage_text, Some(&lua), &StageToVSliceOptions::default()).unwrap();

    let props = back.props.unwrap();
    assert_eq!(props.len(), 2);
    let bg = props.iter().find(|p| p.name == "bg").unwrap();
    assert_eq!(bg.position, [10.0, 20.0]);
    assert_eq!(bg.scale, [1.0, 1.0]);
    assert_eq!(bg.alpha, 1.0);
    // The antialiasing statement is the only pixel signal, so the pixel
    // prop comes back as a regular one. Documented loss.
    assert!(!bg.is_pixel);

    let lightning = props.iter().find(|p| p.name == "lightning").unwrap();
    assert_eq!(lightning.scale, [1.2, 1.2]);
    assert_eq!(lightning.alpha, 0.8);
    assert_eq!(lightning.scroll, [0.9, 0.9]);
    assert_eq!(lightning.z_index, 400);

    // Character anchors map back through the fixed layer table.
    let bf = back.characters.bf.unwrap();
    assert_eq!(bf.position, Some([700.0, 120.0]));
    assert_eq!(bf.z_index, Some(300));
}

#[test]
fn test_stage_without_props_gets_placeholder_script() {
    let stage = r#"{"directory": "bare", "cameraZoom": 0.8}"#;
    let (json, lua) = stage_to_psych(stage, &StageToPsychOptions::default()).unwrap();
    assert_eq!(json.directory, "bare");
    // Named defaults for every absent anchor.
    assert_eq!(json.boyfriend, [770.0, 100.0]);
    assert_eq!(json.girlfriend, [400.0, 130.0]);
    assert_eq!(json.opponent, [100.0, 100.0]);
    assert!(lua.contains("-- No props to convert"));
}

#[test]
fn test_character_color_crosses_signed_boundary() {
    let character = r#"{
        "name": "Spooky",
        "asset": "characters/spooky",
        "position": [100, 100],
        "cameraPosition": [0, 0],
        "scale": 1,
        "flipX": false,
        "healthIcon": "spooky",
        "animations": [
            {"name": "Idle0", "fps": 24, "loop": false, "offsets": [0, 0]},
            {"name": "Left", "fps": 24, "loop": false, "offsets": [3, -2]}
        ]
    }"#;
    let options = CharacterToPsychOptions {
        healthbar_color: 0xFFD8558C,
        ..Default::default()
    };
    let psych = character_to_psych(character, &options).unwrap();
    let stored = psych.healthbar_colours.as_ref().unwrap()[0];
    assert!(stored < 0);
    assert_eq!(funkconv::character::unsigned_color(stored), 0xFFD8558C);
    let anims: Vec<&str> = psych.animations.iter().map(|a| a.anim.as_str()).collect();
    assert_eq!(anims, vec!["idle", "singLEFT"]);
}

#[test]
fn test_week_document_level_conversion() {
    let week = r##"{
        "version": "1.0.0",
        "name": "Week 2",
        "titleAsset": "storymenu/titles/week2",
        "visible": true,
        "props": [],
        "background": "#F9CF51",
        "songs": ["spookeez", "south", "monster"]
    }"##;
    let psych = week_to_psych(week, &WeekToPsychOptions::default()).unwrap();
    assert_eq!(psych.songs.len(), 3);
    assert_eq!(psych.songs[0].0, "Spookeez");
    assert_eq!(psych.songs[0].2, [146, 113, 253]);
    assert_eq!(psych.week_before, "tutorial");
}

#[test]
fn test_export_indentation_asymmetry() {
    let psych = chart_to_psych(CHART, METADATA, &ChartToPsychOptions::default()).unwrap();
    let artifact = psych_chart_artifact(&psych).unwrap();
    assert_eq!(artifact.filename, "test-drive.json");
    assert!(artifact.contents.starts_with("{\n\t\"song\""));

    let (flat, metadata) =
        chart_to_vslice(&artifact.contents, &ChartToVSliceOptions::default()).unwrap();
    let artifacts = vslice_chart_artifacts(&flat, &metadata).unwrap();
    assert_eq!(artifacts[0].filename, "test-drive-chart.json");
    assert_eq!(artifacts[1].filename, "test-drive-metadata.json");
    assert!(artifacts[0].contents.starts_with("{\n  \""));
    assert!(!artifacts[0].contents.contains('\t'));
}

#[test]
fn test_note_conservation_through_both_directions() {
    let psych = chart_to_psych(CHART, METADATA, &ChartToPsychOptions::default()).unwrap();
    let total: usize = psych.song.notes.iter().map(|s| s.section_notes.len()).sum();
    assert_eq!(total, 3);

    let text = to_psych_json(&psych).unwrap();
    let (flat, _) = chart_to_vslice(&text, &ChartToVSliceOptions::default()).unwrap();
    assert_eq!(flat.notes["normal"].len(), 3);
    let serialized = to_vslice_json(&flat).unwrap();
    assert_eq!(serialized.matches("\"t\":").count(), 3);
}
