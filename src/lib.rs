//! # funkconv
//!
//! Transcodes rhythm game assets between the V-Slice format family (flat
//! note lists in absolute milliseconds plus a separate metadata document)
//! and the Psych Engine family (time-sectioned note arrays, companion Lua
//! stage scripts). Charts, stages, characters and weeks convert in both
//! directions; a generation module synthesizes fresh documents from
//! options alone.
//!
//! Every conversion is a pure function from input documents plus an
//! options struct to output documents. Nothing is cached or shared between
//! calls, and a call either returns a complete document or a
//! [`ConvertError`].
//!
//! ```rust
//! use funkconv::{chart_to_psych, ChartToPsychOptions};
//!
//! let chart = r#"{"scrollSpeed": {"normal": 1.3},
//!                 "notes": {"normal": [{"t": 0, "d": 4, "l": 0, "p": []}]}}"#;
//! let metadata = r#"{"songName": "Bopeebo",
//!                    "timeChanges": [{"t": 0, "b": 0, "bpm": 100}]}"#;
//!
//! let psych = chart_to_psych(chart, metadata, &ChartToPsychOptions::default())?;
//! assert_eq!(psych.song.song, "Bopeebo");
//! assert_eq!(psych.song.notes.len(), 1);
//! # Ok::<(), funkconv::ConvertError>(())
//! ```

pub mod character;
pub mod chart;
pub mod direction;
pub mod error;
pub mod export;
pub mod generate;
pub mod psych;
pub mod script;
pub mod stage;
pub mod vslice;
pub mod week;

pub use character::{CharacterToPsychOptions, CharacterToVSliceOptions};
pub use chart::{ChartToPsychOptions, ChartToVSliceOptions};
pub use error::ConvertError;
pub use export::Artifact;
pub use generate::{
    AnimationPreset, ChartGenMode, ChartGenOptions, CharacterGenOptions, NoteDensity,
    StageGenOptions, WeekGenOptions,
};
pub use psych::*;
pub use stage::{StageToPsychOptions, StageToVSliceOptions};
pub use vslice::*;
pub use week::{WeekToPsychOptions, WeekToVSliceOptions};

use serde::de::DeserializeOwned;

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ConvertError> {
    serde_json::from_str(text).map_err(ConvertError::from_json)
}

/// Convert a chart/metadata document pair to a sectioned chart.
pub fn chart_to_psych(
    chart_json: &str,
    metadata_json: &str,
    options: &ChartToPsychOptions,
) -> Result<PsychChart, ConvertError> {
    let chart: VSliceChart = parse_json(chart_json)?;
    let metadata: VSliceMetadata = parse_json(metadata_json)?;
    chart::to_psych(&chart, &metadata, options)
}

/// Convert a sectioned chart to a chart/metadata document pair.
pub fn chart_to_vslice(
    chart_json: &str,
    options: &ChartToVSliceOptions,
) -> Result<(VSliceChart, VSliceMetadata), ConvertError> {
    let chart: PsychChart = parse_json(chart_json)?;
    chart::to_vslice(&chart, options)
}

/// Convert a stage document to sectioned stage JSON plus its prop script.
pub fn stage_to_psych(
    stage_json: &str,
    options: &StageToPsychOptions,
) -> Result<(PsychStage, String), ConvertError> {
    let stage: VSliceStage = parse_json(stage_json)?;
    Ok(stage::to_psych(&stage, options))
}

/// Convert sectioned stage JSON (and optionally its prop script) back to
/// a stage document.
pub fn stage_to_vslice(
    stage_json: &str,
    lua_script: Option<&str>,
    options: &StageToVSliceOptions,
) -> Result<VSliceStage, ConvertError> {
    let stage: PsychStage = parse_json(stage_json)?;
    Ok(stage::to_vslice(&stage, lua_script, options))
}

/// Convert a character document to the sectioned engine's format.
pub fn character_to_psych(
    character_json: &str,
    options: &CharacterToPsychOptions,
) -> Result<PsychCharacter, ConvertError> {
    let character: VSliceCharacter = parse_json(character_json)?;
    Ok(character::to_psych(&character, options))
}

/// Convert a sectioned-engine character back to a character document.
pub fn character_to_vslice(
    character_json: &str,
    options: &CharacterToVSliceOptions,
) -> Result<VSliceCharacter, ConvertError> {
    let character: PsychCharacter = parse_json(character_json)?;
    Ok(character::to_vslice(&character, options))
}

/// Convert a week document to the sectioned engine's format.
pub fn week_to_psych(
    week_json: &str,
    options: &WeekToPsychOptions,
) -> Result<PsychWeek, ConvertError> {
    let week: VSliceWeek = parse_json(week_json)?;
    Ok(week::to_psych(&week, options))
}

/// Convert a sectioned-engine week back to a week document.
pub fn week_to_vslice(
    week_json: &str,
    options: &WeekToVSliceOptions,
) -> Result<VSliceWeek, ConvertError> {
    let week: PsychWeek = parse_json(week_json)?;
    Ok(week::to_vslice(&week, options))
}
