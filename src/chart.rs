//! # Chart Transcoder
//!
//! Converts charts between the flat note-list format and the time-sectioned
//! format, in both directions.
//!
//! ## Splitting (flat -> sectioned)
//! The song is cut into fixed four-beat windows of `4 * 60000 / bpm`
//! milliseconds. Every note lands in the window containing its hit time,
//! keeping its original relative order; directions are re-encoded relative
//! to the window's call flag, which alternates starting with the opponent
//! (even sections are the opponent's turn).
//!
//! ## Flattening (sectioned -> flat)
//! All section note lists are concatenated, directions decoded against each
//! section's call flag, and the combined list globally sorted by time.
//! The sort is required because inbound sections may carry notes outside
//! their nominal window. Flattening also synthesizes the companion metadata
//! document from the song body plus caller options.
//!
//! Both directions either return a complete document or fail; note counts
//! are conserved exactly.

use log::debug;

use crate::direction::{self, Fidelity};
use crate::error::ConvertError;
use crate::psych::{PsychChart, PsychSection, PsychSong, SectionNote};
use crate::vslice::{
    FlatNote, Offsets, PlayCharacters, PlayData, Ratings, TimeChange, VSliceChart, VSliceMetadata,
    CHART_VERSION, METADATA_VERSION,
};

/// Beats in one section. Both engines hardcode four.
pub const BEATS_PER_SECTION: u32 = 4;
/// Steps in one section (four steps per beat).
pub const STEPS_PER_SECTION: u32 = 16;

/// Milliseconds covered by one section at the given tempo.
pub fn ms_per_section(bpm: f64) -> f64 {
    60000.0 / bpm * BEATS_PER_SECTION as f64
}

/// Options for the flat -> sectioned direction.
#[derive(Debug, Clone)]
pub struct ChartToPsychOptions {
    /// Difficulty key to pull from the chart; falls back to `normal` when
    /// the key has no note list.
    pub difficulty: String,
    /// Overrides the BPM from the metadata document when set.
    pub bpm: Option<f64>,
    pub player1: String,
    pub player2: String,
    pub gf_version: String,
    pub stage: String,
}

impl Default for ChartToPsychOptions {
    fn default() -> Self {
        Self {
            difficulty: "normal".to_string(),
            bpm: None,
            player1: "bf".to_string(),
            player2: "dad".to_string(),
            gf_version: "gf".to_string(),
            stage: "stage".to_string(),
        }
    }
}

/// Options for the sectioned -> flat direction.
#[derive(Debug, Clone)]
pub struct ChartToVSliceOptions {
    /// Difficulty key the single output note list is filed under.
    pub difficulty: String,
    /// Overrides the BPM from the song body when set.
    pub bpm: Option<f64>,
    /// Overrides the scroll speed from the song body when set.
    pub scroll_speed: Option<f64>,
    pub artist: String,
    pub charter: String,
}

impl Default for ChartToVSliceOptions {
    fn default() -> Self {
        Self {
            difficulty: "normal".to_string(),
            bpm: None,
            scroll_speed: None,
            artist: "Unknown".to_string(),
            charter: "Converter".to_string(),
        }
    }
}

/// Split a flat chart into sections.
///
/// The section count is `max(1, ceil(maxNoteEndTime / msPerSection))`,
/// widened by one when a tap note sits exactly on the final boundary so
/// that every note lands in exactly one window. A chart with no notes for
/// the chosen difficulty still produces a single empty section.
pub fn to_psych(
    chart: &VSliceChart,
    metadata: &VSliceMetadata,
    options: &ChartToPsychOptions,
) -> Result<PsychChart, ConvertError> {
    let bpm = match options.bpm {
        Some(bpm) => bpm,
        None => {
            metadata
                .time_changes
                .first()
                .ok_or_else(|| {
                    ConvertError::MissingRequiredField("metadata.timeChanges[0].bpm".to_string())
                })?
                .bpm
        }
    };
    validate_bpm(bpm)?;

    let empty = Vec::new();
    let notes = chart
        .notes
        .get(&options.difficulty)
        .or_else(|| chart.notes.get("normal"))
        .unwrap_or(&empty);
    let scroll_speed = chart
        .scroll_speed
        .get(&options.difficulty)
        .or_else(|| chart.scroll_speed.get("normal"))
        .copied()
        .unwrap_or(1.0);

    for note in notes {
        validate_flat_note(note)?;
    }

    let section_ms = ms_per_section(bpm);
    let num_sections = section_count(notes, section_ms);
    debug!(
        "splitting {} notes into {} sections at {} bpm",
        notes.len(),
        num_sections,
        bpm
    );

    let mut sections = Vec::with_capacity(num_sections);
    for index in 0..num_sections {
        let start = index as f64 * section_ms;
        let end = (index + 1) as f64 * section_ms;
        let is_call_section = index % 2 == 1;
        let section_notes = notes
            .iter()
            .filter(|note| note.t >= start && note.t < end)
            .map(|note| SectionNote {
                time: note.t,
                direction: direction::to_section_relative(note.d, is_call_section),
                sustain: note.l,
            })
            .collect();
        sections.push(PsychSection {
            section_notes,
            section_beats: BEATS_PER_SECTION,
            length_in_steps: STEPS_PER_SECTION,
            must_hit_section: is_call_section,
            bpm,
            change_bpm: false,
            alt_anim: false,
            gf_section: false,
        });
    }

    Ok(PsychChart {
        song: PsychSong {
            song: non_empty_or(&metadata.song_name, "Unknown"),
            notes: sections,
            bpm: Some(bpm),
            needs_voices: true,
            player1: options.player1.clone(),
            player2: options.player2.clone(),
            gf_version: options.gf_version.clone(),
            speed: Some(scroll_speed),
            stage: options.stage.clone(),
            valid_score: true,
        },
    })
}

/// Flatten a sectioned chart into a flat chart plus a metadata document.
///
/// Output note count equals input note count exactly; ownership of notes
/// stored with the high bit is normalized to the section owner (see the
/// `direction` module).
pub fn to_vslice(
    chart: &PsychChart,
    options: &ChartToVSliceOptions,
) -> Result<(VSliceChart, VSliceMetadata), ConvertError> {
    let song = &chart.song;
    let bpm = options
        .bpm
        .or(song.bpm)
        .ok_or_else(|| ConvertError::MissingRequiredField("song.bpm".to_string()))?;
    validate_bpm(bpm)?;
    let scroll_speed = options.scroll_speed.or(song.speed).unwrap_or(1.0);

    let mut notes = Vec::new();
    let mut normalized = 0usize;
    for section in &song.notes {
        for note in &section.section_notes {
            validate_section_note(note)?;
            let decoded = direction::to_absolute(note.direction, section.must_hit_section);
            if decoded.fidelity == Fidelity::Normalized {
                normalized += 1;
            }
            notes.push(FlatNote {
                t: note.time,
                d: decoded.direction,
                l: note.sustain,
                p: Vec::new(),
            });
        }
    }
    if normalized > 0 {
        debug!(
            "normalized ownership of {} notes to their section owner",
            normalized
        );
    }
    // Sections are not guaranteed to be in temporal order, nor to contain
    // only notes inside their own window.
    notes.sort_by(|a, b| a.t.total_cmp(&b.t));

    let difficulty = options.difficulty.clone();
    let song_name = non_empty_or(&song.song, "Unknown");
    let player1 = non_empty_or(&song.player1, "bf");
    let player2 = non_empty_or(&song.player2, "dad");
    let gf_version = non_empty_or(&song.gf_version, "gf");

    let out_chart = VSliceChart {
        version: CHART_VERSION.to_string(),
        scroll_speed: [(difficulty.clone(), scroll_speed)].into_iter().collect(),
        notes: [(difficulty.clone(), notes)].into_iter().collect(),
    };
    let out_metadata = VSliceMetadata {
        version: METADATA_VERSION.to_string(),
        song_name,
        artist: options.artist.clone(),
        charter: options.charter.clone(),
        looped: false,
        offsets: Offsets::default(),
        play_data: PlayData {
            song_variations: Vec::new(),
            difficulties: vec![difficulty],
            characters: PlayCharacters {
                player: player1.clone(),
                girlfriend: gf_version,
                opponent: player2.clone(),
                instrumental: String::new(),
                opponent_vocals: vec![player2],
                player_vocals: vec![player1],
            },
            stage: non_empty_or(&song.stage, "stage"),
            note_style: "funkin".to_string(),
            ratings: Ratings {
                easy: 1,
                normal: 3,
                hard: 5,
            },
            preview_start: 0.0,
            preview_end: 0.0,
        },
        generated_by: concat!("funkconv v", env!("CARGO_PKG_VERSION")).to_string(),
        time_format: "ms".to_string(),
        time_changes: vec![TimeChange {
            t: 0.0,
            b: 0.0,
            bpm,
            n: BEATS_PER_SECTION,
            d: BEATS_PER_SECTION,
            bt: vec![4, 4, 4, 4],
        }],
    };
    Ok((out_chart, out_metadata))
}

fn section_count(notes: &[FlatNote], section_ms: f64) -> usize {
    let max_end = notes
        .iter()
        .map(|note| note.t + note.l)
        .fold(0.0_f64, f64::max);
    let from_end = (max_end / section_ms).ceil() as usize;
    // A tap note exactly on the last boundary must still get a window.
    let max_time = notes.iter().map(|note| note.t).fold(0.0_f64, f64::max);
    let from_time = if notes.is_empty() {
        0
    } else {
        (max_time / section_ms).floor() as usize + 1
    };
    from_end.max(from_time).max(1)
}

fn validate_bpm(bpm: f64) -> Result<(), ConvertError> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(ConvertError::MalformedNote {
            message: format!("bpm must be a positive number, got {}", bpm),
        });
    }
    Ok(())
}

fn validate_flat_note(note: &FlatNote) -> Result<(), ConvertError> {
    if !(0..8).contains(&note.d) {
        return Err(ConvertError::MalformedNote {
            message: format!("direction {} outside 0-7 at {}ms", note.d, note.t),
        });
    }
    if !note.t.is_finite() || note.t < 0.0 {
        return Err(ConvertError::MalformedNote {
            message: format!("time {}ms outside the chart", note.t),
        });
    }
    if !note.l.is_finite() || note.l < 0.0 {
        return Err(ConvertError::MalformedNote {
            message: format!("sustain length {}ms at {}ms is negative", note.l, note.t),
        });
    }
    Ok(())
}

fn validate_section_note(note: &SectionNote) -> Result<(), ConvertError> {
    if !(0..8).contains(&note.direction) {
        return Err(ConvertError::MalformedNote {
            message: format!(
                "direction {} outside 0-7 at {}ms",
                note.direction, note.time
            ),
        });
    }
    if !note.time.is_finite() || note.time < 0.0 {
        return Err(ConvertError::MalformedNote {
            message: format!("time {}ms outside the chart", note.time),
        });
    }
    Ok(())
}

pub(crate) fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
