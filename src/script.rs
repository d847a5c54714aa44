//! # Prop Script Codec
//!
//! Serializes a stage's prop list to the Lua snippet the sectioned engine
//! loads at stage creation, and recovers prop data from such a snippet.
//!
//! ## Generation
//! Emits one `makeLuaSprite` / `addLuaSprite` pair per prop inside a
//! `function onCreate()` body, with scale, alpha and scroll-factor
//! statements only when the value differs from its default. Emission is
//! keyed on the value, not on whether the field was explicitly set, so a
//! prop whose scale is exactly (1, 1) produces no scale statement. The
//! antialiasing statement is emitted for every non-pixel prop and doubles
//! as the parser's only pixel-art signal.
//!
//! ## Parsing
//! A line-oriented scanner, not a grammar: each `makeLuaSprite` line opens
//! a new sprite record and later recognized statements update it. Lines
//! that match no rule, including whole Lua constructs this tool never
//! emits, are skipped without error; scripts are free-form and forward
//! compatibility matters more than strictness here. Parsing never fails:
//! empty input simply yields no sprites.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::psych::ScriptSprite;
use crate::vslice::unit_pair;

static CREATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"makeLuaSprite\('([^']+)',\s*'([^']+)',\s*([-\d.]+),\s*([-\d.]+)\)")
        .expect("create pattern is valid")
});
static SCALE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"scaleObject\('[^']+',\s*([-\d.]+),\s*([-\d.]+)\)").expect("scale pattern is valid")
});
static ALPHA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"setProperty\('[^']+\.alpha',\s*([-\d.]+)\)").expect("alpha pattern is valid")
});
static SCROLL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"setScrollFactor\('[^']+',\s*([-\d.]+),\s*([-\d.]+)\)")
        .expect("scroll pattern is valid")
});
static ADD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"addLuaSprite\('[^']+',\s*(true|false)\)").expect("add pattern is valid")
});

/// Render the creation script for an already sorted sprite list.
pub fn generate(sprites: &[ScriptSprite]) -> String {
    let mut lua = String::from("function onCreate()\n");
    for sprite in sprites {
        lua.push('\n');
        lua.push_str(&format!(
            "    makeLuaSprite('{}', '{}', {}, {})\n",
            sprite.name, sprite.asset_path, sprite.position[0], sprite.position[1]
        ));
        if !sprite.is_pixel {
            lua.push_str(&format!(
                "    setProperty('{}.antialiasing', getPropertyFromClass('backend.ClientPrefs', 'data.globalAntialiasing'))\n",
                sprite.name
            ));
        }
        if sprite.scale != unit_pair() {
            lua.push_str(&format!(
                "    scaleObject('{}', {}, {})\n",
                sprite.name, sprite.scale[0], sprite.scale[1]
            ));
        }
        if sprite.alpha != 1.0 {
            lua.push_str(&format!(
                "    setProperty('{}.alpha', {})\n",
                sprite.name, sprite.alpha
            ));
        }
        if sprite.scroll != unit_pair() {
            lua.push_str(&format!(
                "    setScrollFactor('{}', {}, {})\n",
                sprite.name, sprite.scroll[0], sprite.scroll[1]
            ));
        }
        lua.push_str(&format!(
            "    addLuaSprite('{}', {})\n",
            sprite.name, sprite.in_front
        ));
    }
    lua.push_str("end\n");
    lua
}

/// Script body emitted when the stage has no prop list to convert.
pub fn placeholder() -> String {
    "-- No props to convert or Lua generation disabled\nfunction onCreate()\n    -- Add your stage sprites here\nend\n"
        .to_string()
}

/// Recover sprite records from a creation script.
///
/// Best effort by contract: statements that fail to match or carry
/// unparsable numbers are skipped, and statements seen before the first
/// `makeLuaSprite` have nothing to apply to and are dropped. An
/// antialiasing mention only ever clears `is_pixel`; its absence proves
/// nothing, so pixel-art props cannot be reconstructed as such.
pub fn parse(script: &str) -> Vec<ScriptSprite> {
    let mut sprites = Vec::new();
    let mut current: Option<ScriptSprite> = None;

    for raw in script.lines() {
        let line = raw.trim();

        if let Some(caps) = CREATE_RE.captures(line) {
            if let (Ok(x), Ok(y)) = (caps[3].parse::<f64>(), caps[4].parse::<f64>()) {
                if let Some(done) = current.take() {
                    sprites.push(done);
                }
                current = Some(ScriptSprite {
                    name: caps[1].to_string(),
                    asset_path: caps[2].to_string(),
                    position: [x, y],
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(sprite) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = SCALE_RE.captures(line) {
            if let (Ok(x), Ok(y)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
                sprite.scale = [x, y];
            }
        } else if let Some(caps) = ALPHA_RE.captures(line) {
            if let Ok(alpha) = caps[1].parse::<f64>() {
                sprite.alpha = alpha;
            }
        } else if let Some(caps) = SCROLL_RE.captures(line) {
            if let (Ok(x), Ok(y)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
                sprite.scroll = [x, y];
            }
        } else if let Some(caps) = ADD_RE.captures(line) {
            sprite.in_front = &caps[1] == "true";
        } else if line.contains("antialiasing") {
            sprite.is_pixel = false;
        }
    }

    if let Some(done) = current.take() {
        sprites.push(done);
    }
    debug!("parsed {} sprites from script", sprites.len());
    sprites
}
