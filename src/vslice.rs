//! # V-Slice Document Types
//!
//! Typed representations of the V-Slice ("base game") JSON asset family.
//!
//! ## Document Hierarchy
//! ```text
//! VSliceChart                      VSliceMetadata
//!   ├── scrollSpeed: difficulty -> f64   ├── songName / artist / charter
//!   └── notes: difficulty -> [FlatNote]  ├── offsets
//!                                        ├── playData (characters, stage, ratings)
//! VSliceStage                            └── timeChanges: [TimeChange]
//!   ├── props: [StageProp]
//!   └── characters: bf / dad / gf anchors
//!
//! VSliceCharacter ── animations: [VSliceAnimation]
//! VSliceWeek ────── songs: [song-id], props: [WeekProp]
//! ```
//!
//! Charts keep a flat per-difficulty note list in absolute milliseconds.
//! Note ownership is absolute: directions 0-3 are the opponent's lanes and
//! 4-7 are the player's, independent of any section structure.
//!
//! Deserialization is permissive (absent fields take the documented
//! defaults); serialization always writes the full document shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current chart container version emitted by the converter.
pub const CHART_VERSION: &str = "2.0.0";
/// Current metadata document version emitted by the converter.
pub const METADATA_VERSION: &str = "2.2.4";
/// Current stage document version emitted by the converter.
pub const STAGE_VERSION: &str = "1.0.0";

/// A single note in the flat chart format.
///
/// `t` is the hit time in absolute milliseconds, `d` the direction index
/// (0-3 opponent lanes, 4-7 player lanes), `l` the sustain length in
/// milliseconds (0 for a tap note) and `p` an ordered list of modifier tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatNote {
    pub t: f64,
    pub d: i64,
    #[serde(default)]
    pub l: f64,
    #[serde(default)]
    pub p: Vec<String>,
}

/// Per-difficulty chart document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VSliceChart {
    #[serde(default = "default_chart_version")]
    pub version: String,
    #[serde(rename = "scrollSpeed", default)]
    pub scroll_speed: BTreeMap<String, f64>,
    #[serde(default)]
    pub notes: BTreeMap<String, Vec<FlatNote>>,
}

fn default_chart_version() -> String {
    CHART_VERSION.to_string()
}

/// One BPM/time-signature change. Converted charts carry exactly one entry
/// at t=0; inbound metadata may carry more but only the first is consulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeChange {
    #[serde(default)]
    pub t: f64,
    #[serde(default)]
    pub b: f64,
    pub bpm: f64,
    #[serde(default = "default_beats")]
    pub n: u32,
    #[serde(default = "default_beats")]
    pub d: u32,
    #[serde(default = "default_beat_tuplets")]
    pub bt: Vec<u32>,
}

fn default_beats() -> u32 {
    4
}

fn default_beat_tuplets() -> Vec<u32> {
    vec![4, 4, 4, 4]
}

/// Audio offset table. The converter always emits a zeroed table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Offsets {
    #[serde(default)]
    pub instrumental: f64,
    #[serde(rename = "altInstrumentals", default)]
    pub alt_instrumentals: BTreeMap<String, f64>,
    #[serde(default)]
    pub vocals: BTreeMap<String, f64>,
    #[serde(rename = "altVocals", default)]
    pub alt_vocals: BTreeMap<String, f64>,
}

/// Cast assignment inside `playData`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayCharacters {
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub girlfriend: String,
    #[serde(default)]
    pub opponent: String,
    #[serde(default)]
    pub instrumental: String,
    #[serde(rename = "opponentVocals", default)]
    pub opponent_vocals: Vec<String>,
    #[serde(rename = "playerVocals", default)]
    pub player_vocals: Vec<String>,
}

/// Star ratings per difficulty key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ratings {
    #[serde(default)]
    pub easy: u32,
    #[serde(default)]
    pub normal: u32,
    #[serde(default)]
    pub hard: u32,
}

/// Freeplay/story presentation data inside the metadata document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayData {
    #[serde(rename = "songVariations", default)]
    pub song_variations: Vec<String>,
    #[serde(default)]
    pub difficulties: Vec<String>,
    #[serde(default)]
    pub characters: PlayCharacters,
    #[serde(default)]
    pub stage: String,
    #[serde(rename = "noteStyle", default)]
    pub note_style: String,
    #[serde(default)]
    pub ratings: Ratings,
    #[serde(rename = "previewStart", default)]
    pub preview_start: f64,
    #[serde(rename = "previewEnd", default)]
    pub preview_end: f64,
}

/// Song metadata document, the companion of [`VSliceChart`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VSliceMetadata {
    pub version: String,
    #[serde(rename = "songName")]
    pub song_name: String,
    pub artist: String,
    pub charter: String,
    pub looped: bool,
    pub offsets: Offsets,
    #[serde(rename = "playData")]
    pub play_data: PlayData,
    #[serde(rename = "generatedBy")]
    pub generated_by: String,
    #[serde(rename = "timeFormat")]
    pub time_format: String,
    #[serde(rename = "timeChanges")]
    pub time_changes: Vec<TimeChange>,
}

impl Default for VSliceMetadata {
    fn default() -> Self {
        Self {
            version: METADATA_VERSION.to_string(),
            song_name: String::new(),
            artist: String::new(),
            charter: String::new(),
            looped: false,
            offsets: Offsets::default(),
            play_data: PlayData::default(),
            generated_by: String::new(),
            time_format: "ms".to_string(),
            time_changes: Vec::new(),
        }
    }
}

/// A visual prop placed in a stage.
///
/// Prop order in the list carries no meaning; draw order is decided by
/// `zIndex` when the prop script is generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageProp {
    #[serde(rename = "danceEvery", default)]
    pub dance_every: f64,
    #[serde(rename = "zIndex", default)]
    pub z_index: i64,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default = "unit_pair")]
    pub scale: [f64; 2],
    #[serde(rename = "animType", default = "default_anim_type")]
    pub anim_type: String,
    #[serde(rename = "startingAnimation", default)]
    pub starting_animation: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "isPixel", default)]
    pub is_pixel: bool,
    #[serde(rename = "assetPath", default)]
    pub asset_path: String,
    #[serde(default = "unit_pair")]
    pub scroll: [f64; 2],
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub animations: Vec<serde_json::Value>,
}

pub(crate) fn unit_pair() -> [f64; 2] {
    [1.0, 1.0]
}

fn default_alpha() -> f64 {
    1.0
}

fn default_anim_type() -> String {
    "sparrow".to_string()
}

/// Placement of one of the three fixed characters in a stage. Every field
/// is optional on the way in; the field mapper substitutes the per-anchor
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterAnchor {
    #[serde(rename = "zIndex", skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(rename = "cameraOffsets", skip_serializing_if = "Option::is_none")]
    pub camera_offsets: Option<[f64; 2]>,
}

impl CharacterAnchor {
    pub fn new(z_index: i64, position: [f64; 2], camera_offsets: [f64; 2]) -> Self {
        Self {
            z_index: Some(z_index),
            position: Some(position),
            camera_offsets: Some(camera_offsets),
        }
    }
}

/// The three character anchors of a stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageCharacters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bf: Option<CharacterAnchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dad: Option<CharacterAnchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gf: Option<CharacterAnchor>,
}

/// Stage document: camera framing, character anchors and the prop list.
///
/// `props` is `None` when the inbound document has no prop list at all,
/// which downgrades script generation to a placeholder body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VSliceStage {
    #[serde(default = "default_stage_version")]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub directory: String,
    #[serde(rename = "cameraZoom", default = "default_camera_zoom")]
    pub camera_zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<StageProp>>,
    #[serde(default)]
    pub characters: StageCharacters,
}

fn default_stage_version() -> String {
    STAGE_VERSION.to_string()
}

fn default_camera_zoom() -> f64 {
    0.9
}

/// One named character animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VSliceAnimation {
    pub name: String,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(rename = "loop", default)]
    pub looped: bool,
    #[serde(default)]
    pub offsets: [f64; 2],
}

fn default_fps() -> f64 {
    24.0
}

/// Character document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VSliceCharacter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(rename = "cameraPosition", default)]
    pub camera_position: [f64; 2],
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(rename = "flipX", default)]
    pub flip_x: bool,
    #[serde(rename = "healthIcon", default)]
    pub health_icon: String,
    #[serde(default)]
    pub animations: Vec<VSliceAnimation>,
}

fn default_scale() -> f64 {
    1.0
}

/// A story-menu prop shown behind the week title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekProp {
    #[serde(rename = "assetPath")]
    pub asset_path: String,
    pub scale: f64,
    pub offsets: [f64; 2],
    #[serde(default)]
    pub animations: Vec<serde_json::Value>,
}

/// Week (story level) document. `songs` holds song ids, not display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VSliceWeek {
    #[serde(default = "default_stage_version")]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "titleAsset", default)]
    pub title_asset: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub props: Vec<WeekProp>,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub songs: Vec<String>,
}

fn default_visible() -> bool {
    true
}
