//! # Stage Transcoder
//!
//! Maps stage documents between the two engines. The non-script fields are
//! a straight correspondence (camera zoom, character positions and camera
//! offsets) with named defaults filled in for anything absent. The prop
//! list has no counterpart in the sectioned engine's stage document, so it
//! crosses the boundary as a generated Lua snippet (see `script`).

use crate::psych::{PsychStage, ScriptSprite};
use crate::psych::{default_bf_position, default_dad_position, default_gf_position};
use crate::script;
use crate::vslice::{
    CharacterAnchor, StageCharacters, StageProp, VSliceStage, STAGE_VERSION,
};

/// Layer the player character draws at, used as the front-flag threshold
/// when the stage document does not say otherwise.
pub const PLAYER_LAYER: i64 = 300;
/// Layer the opponent character draws at.
pub const OPPONENT_LAYER: i64 = 250;
/// Layer the backing character draws at.
pub const BACKING_LAYER: i64 = 150;

/// Options for the structured -> script direction.
#[derive(Debug, Clone)]
pub struct StageToPsychOptions {
    /// When false the Lua artifact is the placeholder body regardless of
    /// the prop list.
    pub generate_script: bool,
}

impl Default for StageToPsychOptions {
    fn default() -> Self {
        Self {
            generate_script: true,
        }
    }
}

/// Options for the script -> structured direction.
#[derive(Debug, Clone)]
pub struct StageToVSliceOptions {
    pub name: String,
    pub directory: String,
}

impl Default for StageToVSliceOptions {
    fn default() -> Self {
        Self {
            name: "CustomStage".to_string(),
            directory: "custom".to_string(),
        }
    }
}

/// Convert a stage document to the sectioned engine's stage JSON plus the
/// companion prop script.
pub fn to_psych(stage: &VSliceStage, options: &StageToPsychOptions) -> (PsychStage, String) {
    let characters = &stage.characters;
    let json = PsychStage {
        directory: stage.directory.clone(),
        default_zoom: stage.camera_zoom,
        stage_ui: None,
        is_pixel_stage: Some(false),
        boyfriend: anchor_position(&characters.bf, default_bf_position()),
        girlfriend: anchor_position(&characters.gf, default_gf_position()),
        opponent: anchor_position(&characters.dad, default_dad_position()),
        hide_girlfriend: false,
        camera_boyfriend: anchor_camera(&characters.bf),
        camera_opponent: anchor_camera(&characters.dad),
        camera_girlfriend: anchor_camera(&characters.gf),
        camera_speed: 1.0,
        preload: None,
    };

    let lua = match (&stage.props, options.generate_script) {
        (Some(props), true) => {
            let threshold = characters
                .bf
                .as_ref()
                .and_then(|anchor| anchor.z_index)
                .unwrap_or(PLAYER_LAYER);
            script::generate(&resolve_sprites(props, &stage.directory, threshold))
        }
        _ => script::placeholder(),
    };
    (json, lua)
}

/// Convert the sectioned engine's stage JSON (and optionally its prop
/// script) back to a stage document.
pub fn to_vslice(
    psych: &PsychStage,
    lua_script: Option<&str>,
    options: &StageToVSliceOptions,
) -> VSliceStage {
    let props = lua_script.map(|text| {
        script::parse(text)
            .into_iter()
            .enumerate()
            .map(|(index, sprite)| prop_from_sprite(index, sprite))
            .collect()
    });

    VSliceStage {
        version: STAGE_VERSION.to_string(),
        name: options.name.clone(),
        directory: options.directory.clone(),
        camera_zoom: psych.default_zoom,
        props,
        characters: StageCharacters {
            bf: Some(CharacterAnchor::new(
                PLAYER_LAYER,
                psych.boyfriend,
                psych.camera_boyfriend,
            )),
            dad: Some(CharacterAnchor::new(
                OPPONENT_LAYER,
                psych.opponent,
                psych.camera_opponent,
            )),
            gf: Some(CharacterAnchor::new(
                BACKING_LAYER,
                psych.girlfriend,
                psych.camera_girlfriend,
            )),
        },
    }
}

/// Resolve a character anchor's position, falling back to the named
/// default when the anchor (or its position) is absent.
fn anchor_position(anchor: &Option<CharacterAnchor>, default: [f64; 2]) -> [f64; 2] {
    anchor
        .as_ref()
        .and_then(|a| a.position)
        .unwrap_or(default)
}

/// Resolve a character anchor's camera offsets, defaulting to no offset.
fn anchor_camera(anchor: &Option<CharacterAnchor>) -> [f64; 2] {
    anchor
        .as_ref()
        .and_then(|a| a.camera_offsets)
        .unwrap_or([0.0, 0.0])
}

/// Order props by draw layer and fill per-prop naming defaults ahead of
/// script generation. The sort is stable, so props sharing a layer keep
/// their list order.
fn resolve_sprites(props: &[StageProp], directory: &str, threshold: i64) -> Vec<ScriptSprite> {
    let mut sorted: Vec<&StageProp> = props.iter().collect();
    sorted.sort_by_key(|prop| prop.z_index);

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, prop)| {
            let name = if prop.name.is_empty() {
                format!("sprite{}", index)
            } else {
                prop.name.clone()
            };
            let asset_path = if prop.asset_path.is_empty() {
                let dir = if directory.is_empty() {
                    "unknown"
                } else {
                    directory
                };
                format!("stages/{}/{}", dir, name)
            } else {
                prop.asset_path.clone()
            };
            ScriptSprite {
                name,
                asset_path,
                position: prop.position,
                scale: prop.scale,
                scroll: prop.scroll,
                alpha: prop.alpha,
                is_pixel: prop.is_pixel,
                in_front: prop.z_index > threshold,
            }
        })
        .collect()
}

/// Rebuild a prop from a parsed sprite. Front sprites draw above the
/// player layer; the rest are stacked ten layers apart in script order.
fn prop_from_sprite(index: usize, sprite: ScriptSprite) -> StageProp {
    let name = if sprite.name.is_empty() {
        format!("prop{}", index)
    } else {
        sprite.name
    };
    StageProp {
        dance_every: 0.0,
        z_index: if sprite.in_front {
            400
        } else {
            10 + index as i64 * 10
        },
        position: sprite.position,
        scale: sprite.scale,
        anim_type: "sparrow".to_string(),
        starting_animation: String::new(),
        name,
        is_pixel: sprite.is_pixel,
        asset_path: sprite.asset_path,
        scroll: sprite.scroll,
        alpha: sprite.alpha,
        animations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, z_index: i64) -> StageProp {
        StageProp {
            dance_every: 0.0,
            z_index,
            position: [0.0, 0.0],
            scale: [1.0, 1.0],
            anim_type: "sparrow".to_string(),
            starting_animation: String::new(),
            name: name.to_string(),
            is_pixel: false,
            asset_path: format!("stages/test/{}", name),
            scroll: [1.0, 1.0],
            alpha: 1.0,
            animations: Vec::new(),
        }
    }

    fn stage_with_props(props: Option<Vec<StageProp>>) -> VSliceStage {
        VSliceStage {
            version: STAGE_VERSION.to_string(),
            name: "Test".to_string(),
            directory: "test".to_string(),
            camera_zoom: 1.05,
            props,
            characters: StageCharacters::default(),
        }
    }

    #[test]
    fn test_field_mapping_uses_named_defaults() {
        let (json, _) = to_psych(&stage_with_props(None), &StageToPsychOptions::default());
        assert_eq!(json.directory, "test");
        assert_eq!(json.default_zoom, 1.05);
        assert_eq!(json.boyfriend, [770.0, 100.0]);
        assert_eq!(json.girlfriend, [400.0, 130.0]);
        assert_eq!(json.opponent, [100.0, 100.0]);
        assert_eq!(json.camera_boyfriend, [0.0, 0.0]);
        assert_eq!(json.is_pixel_stage, Some(false));
        assert_eq!(json.camera_speed, 1.0);
    }

    #[test]
    fn test_explicit_anchors_pass_through() {
        let mut stage = stage_with_props(None);
        stage.characters.bf = Some(CharacterAnchor::new(320, [900.0, 50.0], [10.0, -20.0]));
        let (json, _) = to_psych(&stage, &StageToPsychOptions::default());
        assert_eq!(json.boyfriend, [900.0, 50.0]);
        assert_eq!(json.camera_boyfriend, [10.0, -20.0]);
    }

    #[test]
    fn test_missing_prop_list_yields_placeholder_script() {
        let (_, lua) = to_psych(&stage_with_props(None), &StageToPsychOptions::default());
        assert!(lua.contains("-- No props to convert"));
        assert!(lua.contains("function onCreate()"));
    }

    #[test]
    fn test_script_generation_can_be_disabled() {
        let stage = stage_with_props(Some(vec![prop("bg", 10)]));
        let options = StageToPsychOptions {
            generate_script: false,
        };
        let (_, lua) = to_psych(&stage, &options);
        assert!(lua.contains("-- No props to convert"));
    }

    #[test]
    fn test_empty_prop_list_yields_empty_body() {
        let (_, lua) = to_psych(
            &stage_with_props(Some(Vec::new())),
            &StageToPsychOptions::default(),
        );
        assert_eq!(lua, "function onCreate()\nend\n");
    }

    #[test]
    fn test_props_sorted_by_layer_with_front_flag_from_threshold() {
        let stage = stage_with_props(Some(vec![
            prop("front", 350),
            prop("far", 10),
            prop("mid", 50),
        ]));
        let (_, lua) = to_psych(&stage, &StageToPsychOptions::default());
        let far = lua.find("makeLuaSprite('far'").unwrap();
        let mid = lua.find("makeLuaSprite('mid'").unwrap();
        let front = lua.find("makeLuaSprite('front'").unwrap();
        assert!(far < mid && mid < front);
        // Only the 350 layer clears the default player layer of 300.
        assert!(lua.contains("addLuaSprite('front', true)"));
        assert!(lua.contains("addLuaSprite('far', false)"));
        assert!(lua.contains("addLuaSprite('mid', false)"));
    }

    #[test]
    fn test_layer_threshold_follows_player_anchor() {
        let mut stage = stage_with_props(Some(vec![prop("front", 350)]));
        stage.characters.bf = Some(CharacterAnchor::new(500, [770.0, 100.0], [0.0, 0.0]));
        let (_, lua) = to_psych(&stage, &StageToPsychOptions::default());
        assert!(lua.contains("addLuaSprite('front', false)"));
    }

    #[test]
    fn test_unnamed_props_get_positional_names_and_asset_paths() {
        let mut first = prop("", 0);
        first.asset_path = String::new();
        let stage = stage_with_props(Some(vec![first]));
        let (_, lua) = to_psych(&stage, &StageToPsychOptions::default());
        assert!(lua.contains("makeLuaSprite('sprite0', 'stages/test/sprite0', 0, 0)"));
    }

    fn psych_stage() -> PsychStage {
        serde_json::from_str(
            r#"{
                "directory": "philly",
                "defaultZoom": 1.1,
                "boyfriend": [800, 120],
                "opponent": [50, 90],
                "girlfriend": [410, 140],
                "camera_boyfriend": [5, 5],
                "camera_opponent": [-5, -5],
                "camera_girlfriend": [0, 0]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_inverse_mapping_assigns_fixed_layers() {
        let stage = to_vslice(&psych_stage(), None, &StageToVSliceOptions::default());
        assert_eq!(stage.name, "CustomStage");
        assert_eq!(stage.directory, "custom");
        assert_eq!(stage.camera_zoom, 1.1);
        assert!(stage.props.is_none());
        let bf = stage.characters.bf.unwrap();
        assert_eq!(bf.z_index, Some(PLAYER_LAYER));
        assert_eq!(bf.position, Some([800.0, 120.0]));
        let dad = stage.characters.dad.unwrap();
        assert_eq!(dad.z_index, Some(OPPONENT_LAYER));
        assert_eq!(dad.camera_offsets, Some([-5.0, -5.0]));
        let gf = stage.characters.gf.unwrap();
        assert_eq!(gf.z_index, Some(BACKING_LAYER));
    }

    #[test]
    fn test_inverse_mapping_rebuilds_props_from_script() {
        let script = "function onCreate()\n\
            makeLuaSprite('bg', 'stages/philly/bg', 0, 0)\n\
            addLuaSprite('bg', false)\n\
            makeLuaSprite('lights', 'stages/philly/lights', 0, 0)\n\
            setProperty('lights.alpha', 0.4)\n\
            addLuaSprite('lights', true)\n\
            end\n";
        let stage = to_vslice(&psych_stage(), Some(script), &StageToVSliceOptions::default());
        let props = stage.props.unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, "bg");
        assert_eq!(props[0].z_index, 10);
        assert_eq!(props[1].name, "lights");
        assert_eq!(props[1].z_index, 400);
        assert_eq!(props[1].alpha, 0.4);
        assert_eq!(props[1].anim_type, "sparrow");
    }

    #[test]
    fn test_inverse_mapping_with_empty_script_keeps_empty_prop_list() {
        let stage = to_vslice(&psych_stage(), Some(""), &StageToVSliceOptions::default());
        assert_eq!(stage.props.unwrap().len(), 0);
    }
}
