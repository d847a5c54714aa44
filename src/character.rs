//! # Character Transcoder
//!
//! Field mapping between the two character formats. Two pieces are more
//! than renames: animation names go through a fixed correspondence table
//! (with a lowercase fallback for anything unlisted), and the health bar
//! color crosses an RGB ⇄ signed 32-bit boundary. The sectioned engine
//! stores the color as a signed integer, so values above `0x7FFFFFFF`
//! wrap negative on the way in and are lifted back by 2^32 on the way out.

use crate::chart::non_empty_or;
use crate::psych::{PsychAnimation, PsychCharacter};
use crate::vslice::{VSliceAnimation, VSliceCharacter};

/// Options for the character -> sectioned-engine direction.
#[derive(Debug, Clone)]
pub struct CharacterToPsychOptions {
    /// Seconds a sing pose is held before returning to idle.
    pub sing_duration: f64,
    /// Idle bop interval in beats.
    pub dance_every: f64,
    pub no_antialiasing: bool,
    pub is_player: bool,
    /// Health bar color as 0xRRGGBB (or 0xAARRGGBB).
    pub healthbar_color: u32,
}

impl Default for CharacterToPsychOptions {
    fn default() -> Self {
        Self {
            sing_duration: 6.1,
            dance_every: 2.0,
            no_antialiasing: false,
            is_player: false,
            healthbar_color: 0xFFFFFF,
        }
    }
}

/// Options for the sectioned-engine -> character direction.
#[derive(Debug, Clone)]
pub struct CharacterToVSliceOptions {
    /// Frame rate substituted for animations that do not carry one.
    pub default_fps: f64,
}

impl Default for CharacterToVSliceOptions {
    fn default() -> Self {
        Self { default_fps: 24.0 }
    }
}

/// Reinterpret an RGB color as the signed 32-bit value the sectioned
/// engine stores.
pub fn signed_color(color: u32) -> i64 {
    color as i32 as i64
}

/// Recover the unsigned color from its signed storage form.
pub fn unsigned_color(stored: i64) -> u32 {
    if stored < 0 {
        (stored + 0x1_0000_0000) as u32
    } else {
        stored as u32
    }
}

fn forward_animation_name(name: &str) -> String {
    match name {
        "Left" => "singLEFT".to_string(),
        "Down" => "singDOWN".to_string(),
        "Up" => "singUP".to_string(),
        "Right" => "singRIGHT".to_string(),
        "Idle0" | "Idle" => "idle".to_string(),
        "Idle ALT" => "idle-alt".to_string(),
        other => other.to_lowercase(),
    }
}

fn reverse_animation_name(anim: &str) -> Option<&'static str> {
    match anim {
        "singLEFT" => Some("Left"),
        "singDOWN" => Some("Down"),
        "singUP" => Some("Up"),
        "singRIGHT" => Some("Right"),
        "idle" => Some("Idle0"),
        "idle-alt" => Some("Idle ALT"),
        _ => None,
    }
}

/// Convert a character document to the sectioned engine's format.
pub fn to_psych(
    character: &VSliceCharacter,
    options: &CharacterToPsychOptions,
) -> PsychCharacter {
    let animations = character
        .animations
        .iter()
        .map(|anim| PsychAnimation {
            offsets: anim.offsets,
            flip_y: false,
            looped: anim.looped,
            fps: anim.fps,
            anim: forward_animation_name(&anim.name),
            flip_x: false,
            indices: Vec::new(),
            name: anim.name.clone(),
        })
        .collect();

    PsychCharacter {
        animations,
        vocals_file: None,
        no_antialiasing: options.no_antialiasing,
        image: non_empty_or(&character.asset, "characters/unknown"),
        position: character.position,
        dance_every: options.dance_every,
        healthicon: non_empty_or(&character.health_icon, "face"),
        flip_x: character.flip_x,
        healthbar_colours: Some(vec![signed_color(options.healthbar_color)]),
        healthbar_colors: None,
        healthbar_colour: None,
        camera_position: character.camera_position,
        sing_duration: options.sing_duration,
        scale: character.scale,
        editor_is_player: options.is_player,
    }
}

/// Convert a sectioned-engine character back to a character document.
///
/// The display name is recovered from the health icon id, which is the
/// closest thing the source format has to one.
pub fn to_vslice(
    character: &PsychCharacter,
    options: &CharacterToVSliceOptions,
) -> VSliceCharacter {
    let animations = character
        .animations
        .iter()
        .map(|anim| {
            let name = reverse_animation_name(&anim.anim)
                .map(str::to_string)
                .unwrap_or_else(|| non_empty_or(&anim.name, &anim.anim));
            VSliceAnimation {
                name,
                fps: if anim.fps > 0.0 {
                    anim.fps
                } else {
                    options.default_fps
                },
                looped: anim.looped,
                offsets: anim.offsets,
            }
        })
        .collect();

    let health_icon = non_empty_or(&character.healthicon, "face");
    VSliceCharacter {
        name: capitalize(&health_icon),
        asset: non_empty_or(&character.image, "characters/unknown"),
        position: character.position,
        camera_position: character.camera_position,
        scale: character.scale,
        flip_x: character.flip_x,
        health_icon,
        animations,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vslice_character() -> VSliceCharacter {
        VSliceCharacter {
            name: "Pico".to_string(),
            asset: "characters/pico".to_string(),
            position: [100.0, 150.0],
            camera_position: [20.0, -30.0],
            scale: 1.2,
            flip_x: true,
            health_icon: "pico".to_string(),
            animations: vec![
                VSliceAnimation {
                    name: "Idle0".to_string(),
                    fps: 24.0,
                    looped: false,
                    offsets: [0.0, 0.0],
                },
                VSliceAnimation {
                    name: "Left".to_string(),
                    fps: 30.0,
                    looped: false,
                    offsets: [5.0, -3.0],
                },
                VSliceAnimation {
                    name: "Scared".to_string(),
                    fps: 24.0,
                    looped: true,
                    offsets: [0.0, 0.0],
                },
            ],
        }
    }

    #[test]
    fn test_forward_maps_animation_names() {
        let psych = to_psych(&vslice_character(), &CharacterToPsychOptions::default());
        let anims: Vec<&str> = psych.animations.iter().map(|a| a.anim.as_str()).collect();
        assert_eq!(anims, vec!["idle", "singLEFT", "scared"]);
        // The source frame name rides along untouched.
        assert_eq!(psych.animations[0].name, "Idle0");
        assert_eq!(psych.animations[1].offsets, [5.0, -3.0]);
    }

    #[test]
    fn test_forward_carries_options_and_fields() {
        let options = CharacterToPsychOptions {
            sing_duration: 4.5,
            dance_every: 1.0,
            no_antialiasing: true,
            is_player: true,
            healthbar_color: 0xB7D855,
        };
        let psych = to_psych(&vslice_character(), &options);
        assert_eq!(psych.sing_duration, 4.5);
        assert_eq!(psych.dance_every, 1.0);
        assert!(psych.no_antialiasing);
        assert!(psych.editor_is_player);
        assert_eq!(psych.image, "characters/pico");
        assert_eq!(psych.healthbar_colours, Some(vec![0xB7D855]));
        assert!(psych.healthbar_colors.is_none());
    }

    #[test]
    fn test_color_reinterpretation_wraps_high_values() {
        // Plain RGB colors fit in 31 bits and stay positive.
        assert_eq!(signed_color(0xB7D855), 0xB7D855);
        // An alpha-carrying color crosses the sign bit.
        assert_eq!(signed_color(0xFFB7D855), 0xFFB7D855u32 as i32 as i64);
        assert!(signed_color(0xFFB7D855) < 0);
    }

    #[test]
    fn test_color_reinterpretation_round_trips() {
        for color in [0u32, 0xB7D855, 0x7FFFFFFF, 0x80000000, 0xFFFFFFFF] {
            assert_eq!(unsigned_color(signed_color(color)), color);
        }
    }

    #[test]
    fn test_inverse_reverses_animation_names() {
        let psych = to_psych(&vslice_character(), &CharacterToPsychOptions::default());
        let back = to_vslice(&psych, &CharacterToVSliceOptions::default());
        let names: Vec<&str> = back.animations.iter().map(|a| a.name.as_str()).collect();
        // Mapped names invert; the unlisted one falls back to the frame name.
        assert_eq!(names, vec!["Idle0", "Left", "Scared"]);
    }

    #[test]
    fn test_inverse_recovers_name_from_health_icon() {
        let psych = to_psych(&vslice_character(), &CharacterToPsychOptions::default());
        let back = to_vslice(&psych, &CharacterToVSliceOptions::default());
        assert_eq!(back.name, "Pico");
        assert_eq!(back.health_icon, "pico");
    }

    #[test]
    fn test_inverse_substitutes_default_fps() {
        let mut psych = to_psych(&vslice_character(), &CharacterToPsychOptions::default());
        psych.animations[0].fps = 0.0;
        let options = CharacterToVSliceOptions { default_fps: 18.0 };
        let back = to_vslice(&psych, &options);
        assert_eq!(back.animations[0].fps, 18.0);
        assert_eq!(back.animations[1].fps, 30.0);
    }

    #[test]
    fn test_empty_fields_take_named_defaults() {
        let bare = VSliceCharacter {
            name: String::new(),
            asset: String::new(),
            position: [0.0, 0.0],
            camera_position: [0.0, 0.0],
            scale: 1.0,
            flip_x: false,
            health_icon: String::new(),
            animations: Vec::new(),
        };
        let psych = to_psych(&bare, &CharacterToPsychOptions::default());
        assert_eq!(psych.image, "characters/unknown");
        assert_eq!(psych.healthicon, "face");
        let back = to_vslice(&psych, &CharacterToVSliceOptions::default());
        assert_eq!(back.name, "Face");
    }
}
