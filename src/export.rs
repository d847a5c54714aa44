//! # Export
//!
//! Renders converted documents to the text artifacts a caller saves to
//! disk. Documents headed for the sectioned engine are tab-indented while
//! documents headed the other way use two spaces, matching what each
//! engine's own tooling writes; the asymmetry is a stable external
//! contract. File names are derived from the document's display name,
//! lowercased with whitespace runs collapsed to dashes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::ConvertError;
use crate::psych::{PsychChart, PsychCharacter, PsychStage, PsychWeek};
use crate::vslice::{VSliceChart, VSliceCharacter, VSliceMetadata, VSliceStage, VSliceWeek};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("pattern is valid"));

/// A file to be written by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub contents: String,
}

/// Lowercase a display name and collapse whitespace runs to dashes.
pub fn slug(name: &str) -> String {
    WHITESPACE_RE
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

fn pretty_json<T: Serialize>(value: &T, indent: &'static [u8]) -> Result<String, ConvertError> {
    let mut buffer = Vec::new();
    {
        let formatter = PrettyFormatter::with_indent(indent);
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|err| ConvertError::Serialize(err.to_string()))?;
    }
    String::from_utf8(buffer).map_err(|err| ConvertError::Serialize(err.to_string()))
}

/// Serialize a document headed for the sectioned engine (tab-indented).
pub fn to_psych_json<T: Serialize>(value: &T) -> Result<String, ConvertError> {
    pretty_json(value, b"\t")
}

/// Serialize a document headed for the flat-format engine (two-space
/// indented).
pub fn to_vslice_json<T: Serialize>(value: &T) -> Result<String, ConvertError> {
    pretty_json(value, b"  ")
}

fn json_name(name: &str, fallback: &str) -> String {
    let base = if name.is_empty() { fallback } else { name };
    format!("{}.json", slug(base))
}

/// The single chart file of a converted-to-sectioned chart.
pub fn psych_chart_artifact(chart: &PsychChart) -> Result<Artifact, ConvertError> {
    Ok(Artifact {
        filename: json_name(&chart.song.song, "converted"),
        contents: to_psych_json(chart)?,
    })
}

/// The chart/metadata file pair of a flattened chart.
pub fn vslice_chart_artifacts(
    chart: &VSliceChart,
    metadata: &VSliceMetadata,
) -> Result<Vec<Artifact>, ConvertError> {
    let base = if metadata.song_name.is_empty() {
        "converted".to_string()
    } else {
        slug(&metadata.song_name)
    };
    Ok(vec![
        Artifact {
            filename: format!("{}-chart.json", base),
            contents: to_vslice_json(chart)?,
        },
        Artifact {
            filename: format!("{}-metadata.json", base),
            contents: to_vslice_json(metadata)?,
        },
    ])
}

/// The stage JSON plus its prop script.
pub fn psych_stage_artifacts(
    stage: &PsychStage,
    script: &str,
) -> Result<Vec<Artifact>, ConvertError> {
    Ok(vec![
        Artifact {
            filename: "stage.json".to_string(),
            contents: to_psych_json(stage)?,
        },
        Artifact {
            filename: "stage.lua".to_string(),
            contents: script.to_string(),
        },
    ])
}

/// The single stage file of an inverse stage conversion.
pub fn vslice_stage_artifact(stage: &VSliceStage) -> Result<Artifact, ConvertError> {
    Ok(Artifact {
        filename: json_name(&stage.name, "stage"),
        contents: to_vslice_json(stage)?,
    })
}

/// The single character file, named after its health icon.
pub fn psych_character_artifact(character: &PsychCharacter) -> Result<Artifact, ConvertError> {
    Ok(Artifact {
        filename: json_name(&character.healthicon, "character"),
        contents: to_psych_json(character)?,
    })
}

/// The single character file of an inverse character conversion.
pub fn vslice_character_artifact(character: &VSliceCharacter) -> Result<Artifact, ConvertError> {
    Ok(Artifact {
        filename: json_name(&character.name, "character"),
        contents: to_vslice_json(character)?,
    })
}

/// The single week file.
pub fn psych_week_artifact(week: &PsychWeek) -> Result<Artifact, ConvertError> {
    Ok(Artifact {
        filename: json_name(&week.week_name, "week"),
        contents: to_psych_json(week)?,
    })
}

/// The single week file of an inverse week conversion.
pub fn vslice_week_artifact(week: &VSliceWeek) -> Result<Artifact, ConvertError> {
    Ok(Artifact {
        filename: json_name(&week.name, "week"),
        contents: to_vslice_json(week)?,
    })
}
