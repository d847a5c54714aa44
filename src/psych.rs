//! # Psych Engine Document Types
//!
//! Typed representations of the Psych Engine JSON asset family.
//!
//! The chart format is time-sectioned: the song is a list of [`PsychSection`]
//! values where section `i` implicitly spans `[i * msPerSection,
//! (i + 1) * msPerSection)` for a fixed four beats per section. Each section
//! carries a `mustHitSection` flag naming whose turn it is, and note
//! directions inside the section are stored relative to that flag (see the
//! `direction` module for the encoding).
//!
//! Section notes travel as JSON arrays `[time, direction, length, ...]`;
//! anything past the third element (engines append a note-type tag there) is
//! ignored on the way in and never emitted on the way out.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::vslice::unit_pair;

/// One note inside a section: hit time in absolute milliseconds, stored
/// (section-relative) direction and sustain length in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionNote {
    pub time: f64,
    pub direction: i64,
    pub sustain: f64,
}

impl Serialize for SectionNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&self.time)?;
        seq.serialize_element(&self.direction)?;
        seq.serialize_element(&self.sustain)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SectionNote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
        if raw.len() < 3 {
            return Err(de::Error::invalid_length(
                raw.len(),
                &"a [time, direction, length] triple",
            ));
        }
        let time = raw[0]
            .as_f64()
            .ok_or_else(|| de::Error::custom("section note time must be a number"))?;
        let direction = raw[1]
            .as_f64()
            .ok_or_else(|| de::Error::custom("section note direction must be a number"))?
            as i64;
        // Some charts leave the sustain slot null; treat that as a tap note.
        let sustain = raw[2].as_f64().unwrap_or(0.0);
        Ok(SectionNote {
            time,
            direction,
            sustain,
        })
    }
}

/// A fixed four-beat window of the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychSection {
    #[serde(rename = "sectionNotes", default)]
    pub section_notes: Vec<SectionNote>,
    #[serde(rename = "sectionBeats", default = "default_section_beats")]
    pub section_beats: u32,
    #[serde(rename = "lengthInSteps", default = "default_length_in_steps")]
    pub length_in_steps: u32,
    #[serde(rename = "mustHitSection", default)]
    pub must_hit_section: bool,
    #[serde(default)]
    pub bpm: f64,
    #[serde(rename = "changeBPM", default)]
    pub change_bpm: bool,
    #[serde(rename = "altAnim", default)]
    pub alt_anim: bool,
    #[serde(rename = "gfSection", default)]
    pub gf_section: bool,
}

fn default_section_beats() -> u32 {
    4
}

fn default_length_in_steps() -> u32 {
    16
}

/// The song body of a chart document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychSong {
    #[serde(default)]
    pub song: String,
    #[serde(default)]
    pub notes: Vec<PsychSection>,
    #[serde(default)]
    pub bpm: Option<f64>,
    #[serde(rename = "needsVoices", default = "default_true")]
    pub needs_voices: bool,
    #[serde(default)]
    pub player1: String,
    #[serde(default)]
    pub player2: String,
    #[serde(rename = "gfVersion", default)]
    pub gf_version: String,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub stage: String,
    #[serde(rename = "validScore", default = "default_true")]
    pub valid_score: bool,
}

fn default_true() -> bool {
    true
}

/// Chart document wrapper. The engine keys everything under `song`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychChart {
    pub song: PsychSong,
}

/// Stage document. `stageUI` and `preload` only appear on generated stages,
/// never on converted ones, so they are optional and skipped when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychStage {
    #[serde(default)]
    pub directory: String,
    #[serde(rename = "defaultZoom", default = "default_zoom")]
    pub default_zoom: f64,
    #[serde(rename = "stageUI", default, skip_serializing_if = "Option::is_none")]
    pub stage_ui: Option<String>,
    #[serde(
        rename = "isPixelStage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_pixel_stage: Option<bool>,
    #[serde(default = "default_bf_position")]
    pub boyfriend: [f64; 2],
    #[serde(default = "default_gf_position")]
    pub girlfriend: [f64; 2],
    #[serde(default = "default_dad_position")]
    pub opponent: [f64; 2],
    #[serde(default)]
    pub hide_girlfriend: bool,
    #[serde(default)]
    pub camera_boyfriend: [f64; 2],
    #[serde(default)]
    pub camera_opponent: [f64; 2],
    #[serde(default)]
    pub camera_girlfriend: [f64; 2],
    #[serde(default = "default_camera_speed")]
    pub camera_speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<serde_json::Value>,
}

fn default_zoom() -> f64 {
    0.9
}

pub(crate) fn default_bf_position() -> [f64; 2] {
    [770.0, 100.0]
}

pub(crate) fn default_gf_position() -> [f64; 2] {
    [400.0, 130.0]
}

pub(crate) fn default_dad_position() -> [f64; 2] {
    [100.0, 100.0]
}

fn default_camera_speed() -> f64 {
    1.0
}

/// One character animation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychAnimation {
    #[serde(default)]
    pub offsets: [f64; 2],
    #[serde(rename = "flipY", default)]
    pub flip_y: bool,
    #[serde(rename = "loop", default)]
    pub looped: bool,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub anim: String,
    #[serde(rename = "flipX", default)]
    pub flip_x: bool,
    #[serde(default)]
    pub indices: Vec<i64>,
    #[serde(default)]
    pub name: String,
}

fn default_fps() -> f64 {
    24.0
}

/// Character document.
///
/// The converter writes a single signed value under `healthbar_colours`
/// while the generator writes an `[r, g, b]` triple under
/// `healthbar_colors`; both spellings are kept as-is because downstream
/// engines accept each from its respective producer. The singular
/// `healthbar_colour` is a legacy input-only spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychCharacter {
    #[serde(default)]
    pub animations: Vec<PsychAnimation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocals_file: Option<String>,
    #[serde(default)]
    pub no_antialiasing: bool,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default)]
    pub dance_every: f64,
    #[serde(default)]
    pub healthicon: String,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthbar_colours: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthbar_colors: Option<[u8; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthbar_colour: Option<i64>,
    #[serde(default)]
    pub camera_position: [f64; 2],
    #[serde(default)]
    pub sing_duration: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(rename = "_editor_isPlayer", default)]
    pub editor_is_player: bool,
}

fn default_scale() -> f64 {
    1.0
}

/// A week song entry: display name, icon and menu color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSong(pub String, pub String, pub [u16; 3]);

/// Week (story mode) document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsychWeek {
    #[serde(default)]
    pub songs: Vec<WeekSong>,
    #[serde(rename = "hiddenUntilUnlocked", default)]
    pub hidden_until_unlocked: bool,
    #[serde(rename = "hideFreeplay", default)]
    pub hide_freeplay: bool,
    #[serde(rename = "weekBackground", default)]
    pub week_background: String,
    #[serde(default)]
    pub difficulties: String,
    #[serde(rename = "weekCharacters", default)]
    pub week_characters: Vec<String>,
    #[serde(rename = "storyName", default)]
    pub story_name: String,
    #[serde(rename = "weekName", default)]
    pub week_name: String,
    #[serde(rename = "freeplayColor", default)]
    pub freeplay_color: [u16; 3],
    #[serde(rename = "hideStoryMode", default)]
    pub hide_story_mode: bool,
    #[serde(rename = "weekBefore", default)]
    pub week_before: String,
    #[serde(rename = "startUnlocked", default = "default_true")]
    pub start_unlocked: bool,
}

/// Prop record shared by the script generator and parser: the fields a
/// stage prop keeps once it crosses the Lua boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSprite {
    pub name: String,
    pub asset_path: String,
    pub position: [f64; 2],
    pub scale: [f64; 2],
    pub scroll: [f64; 2],
    pub alpha: f64,
    pub is_pixel: bool,
    pub in_front: bool,
}

impl Default for ScriptSprite {
    fn default() -> Self {
        Self {
            name: String::new(),
            asset_path: String::new(),
            position: [0.0, 0.0],
            scale: unit_pair(),
            scroll: unit_pair(),
            alpha: 1.0,
            is_pixel: false,
            in_front: false,
        }
    }
}
