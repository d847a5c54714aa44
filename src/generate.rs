//! # Document Generators
//!
//! Synthesizes fresh documents in the sectioned engine's formats from
//! nothing but options: starter charts (empty, sample pattern, or random
//! placement), stages, characters with preset animation sets, and weeks.
//!
//! Chart generation reuses the section data model and direction codec of
//! the transcoders, so generated notes obey the same section-relative
//! encoding invariants as converted ones. Randomized placement draws from
//! a caller-supplied [`Rng`], which makes generation reproducible from a
//! seed; [`chart_seeded`] wraps that for callers that just want a number.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chart::{BEATS_PER_SECTION, STEPS_PER_SECTION};
use crate::direction;
use crate::error::ConvertError;
use crate::psych::{
    PsychAnimation, PsychChart, PsychCharacter, PsychSection, PsychSong, PsychStage, PsychWeek,
    SectionNote, WeekSong,
};
use crate::week::FREEPLAY_COLOR;

/// Notes placed per section by the random mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteDensity {
    Low,
    Medium,
    High,
}

impl NoteDensity {
    fn notes_per_section(self) -> usize {
        match self {
            NoteDensity::Low => 4,
            NoteDensity::Medium => 8,
            NoteDensity::High => 12,
        }
    }
}

/// How chart sections are filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartGenMode {
    /// Sections only, no notes.
    Empty,
    /// One note per beat walking through the four lanes.
    Sample,
    /// Random lanes and beat positions, optionally with sustains.
    Random {
        density: NoteDensity,
        sustains: bool,
    },
}

/// Options for chart generation.
#[derive(Debug, Clone)]
pub struct ChartGenOptions {
    pub song_name: String,
    pub bpm: f64,
    pub speed: f64,
    pub sections: usize,
    pub player1: String,
    pub player2: String,
    pub gf_version: String,
    pub stage: String,
    pub mode: ChartGenMode,
}

impl Default for ChartGenOptions {
    fn default() -> Self {
        Self {
            song_name: "New Song".to_string(),
            bpm: 150.0,
            speed: 2.5,
            sections: 8,
            player1: "bf".to_string(),
            player2: "dad".to_string(),
            gf_version: "gf".to_string(),
            stage: "stage".to_string(),
            mode: ChartGenMode::Empty,
        }
    }
}

/// Generate a starter chart.
pub fn chart<R: Rng>(options: &ChartGenOptions, rng: &mut R) -> PsychChart {
    let ms_per_beat = 60000.0 / options.bpm;
    let ms_per_section = ms_per_beat * BEATS_PER_SECTION as f64;

    let mut sections = Vec::with_capacity(options.sections);
    for index in 0..options.sections {
        let start = index as f64 * ms_per_section;
        let is_call_section = index % 2 == 1;
        let section_notes = match &options.mode {
            ChartGenMode::Empty => Vec::new(),
            ChartGenMode::Sample => sample_notes(start, ms_per_beat, is_call_section),
            ChartGenMode::Random { density, sustains } => {
                random_notes(start, ms_per_beat, is_call_section, *density, *sustains, rng)
            }
        };
        sections.push(PsychSection {
            section_notes,
            section_beats: BEATS_PER_SECTION,
            length_in_steps: STEPS_PER_SECTION,
            must_hit_section: is_call_section,
            bpm: options.bpm,
            change_bpm: false,
            alt_anim: false,
            gf_section: false,
        });
    }

    PsychChart {
        song: PsychSong {
            song: options.song_name.clone(),
            notes: sections,
            bpm: Some(options.bpm),
            needs_voices: true,
            player1: options.player1.clone(),
            player2: options.player2.clone(),
            gf_version: options.gf_version.clone(),
            speed: Some(options.speed),
            stage: options.stage.clone(),
            valid_score: true,
        },
    }
}

/// Generate a chart from a seed. Identical seeds and options give
/// identical charts.
pub fn chart_seeded(options: &ChartGenOptions, seed: u64) -> PsychChart {
    chart(options, &mut StdRng::seed_from_u64(seed))
}

/// One note per beat, cycling through the lanes. Notes sit on the
/// off-turn singer's lanes, encoded against the section's call flag.
fn sample_notes(start: f64, ms_per_beat: f64, is_call_section: bool) -> Vec<SectionNote> {
    (0..4)
        .map(|beat| SectionNote {
            time: start + beat as f64 * ms_per_beat,
            direction: direction::to_section_relative(beat % 4, is_call_section),
            sustain: 0.0,
        })
        .collect()
}

fn random_notes<R: Rng>(
    start: f64,
    ms_per_beat: f64,
    is_call_section: bool,
    density: NoteDensity,
    sustains: bool,
    rng: &mut R,
) -> Vec<SectionNote> {
    let mut notes: Vec<SectionNote> = (0..density.notes_per_section())
        .map(|_| {
            let beat = rng.gen::<f64>() * BEATS_PER_SECTION as f64;
            let lane = rng.gen_range(0..direction::LANES);
            let sustain = if sustains && rng.gen::<f64>() > 0.7 {
                ms_per_beat * rng.gen::<f64>() * 2.0
            } else {
                0.0
            };
            SectionNote {
                time: start + beat * ms_per_beat,
                direction: direction::to_section_relative(lane, is_call_section),
                sustain,
            }
        })
        .collect();
    notes.sort_by(|a, b| a.time.total_cmp(&b.time));
    notes
}

/// Options for stage generation.
#[derive(Debug, Clone)]
pub struct StageGenOptions {
    pub directory: String,
    pub zoom: f64,
    pub stage_ui: String,
    pub camera_speed: f64,
    pub hide_girlfriend: bool,
    pub bf_position: [f64; 2],
    pub gf_position: [f64; 2],
    pub dad_position: [f64; 2],
    pub bf_camera: [f64; 2],
    pub gf_camera: [f64; 2],
    pub dad_camera: [f64; 2],
}

impl Default for StageGenOptions {
    fn default() -> Self {
        Self {
            directory: String::new(),
            zoom: 0.9,
            stage_ui: String::new(),
            camera_speed: 1.0,
            hide_girlfriend: false,
            bf_position: [770.0, 100.0],
            gf_position: [400.0, 130.0],
            dad_position: [100.0, 100.0],
            bf_camera: [0.0, 0.0],
            gf_camera: [0.0, 0.0],
            dad_camera: [0.0, 0.0],
        }
    }
}

/// Generate a bare stage document.
pub fn stage(options: &StageGenOptions) -> PsychStage {
    PsychStage {
        directory: options.directory.clone(),
        default_zoom: options.zoom,
        stage_ui: Some(options.stage_ui.clone()),
        is_pixel_stage: None,
        boyfriend: options.bf_position,
        girlfriend: options.gf_position,
        opponent: options.dad_position,
        hide_girlfriend: options.hide_girlfriend,
        camera_boyfriend: options.bf_camera,
        camera_opponent: options.dad_camera,
        camera_girlfriend: options.gf_camera,
        camera_speed: options.camera_speed,
        preload: Some(serde_json::Value::Object(serde_json::Map::new())),
    }
}

/// Animation set given to a generated character.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationPreset {
    /// Idle plus the four sing poses.
    Basic,
    /// Basic plus the four miss poses.
    Extended,
    /// Caller-supplied animation entries; must not be empty.
    Custom(Vec<PsychAnimation>),
}

/// Options for character generation.
#[derive(Debug, Clone)]
pub struct CharacterGenOptions {
    pub image: String,
    pub health_icon: String,
    pub sing_duration: f64,
    pub position: [f64; 2],
    pub camera_position: [f64; 2],
    pub scale: f64,
    pub healthbar_color: [u8; 3],
    pub flip_x: bool,
    pub no_antialiasing: bool,
    pub is_player: bool,
    pub dance_every: f64,
    pub preset: AnimationPreset,
}

impl Default for CharacterGenOptions {
    fn default() -> Self {
        Self {
            image: "characters/mycharacter".to_string(),
            health_icon: "face".to_string(),
            sing_duration: 6.1,
            position: [0.0, 100.0],
            camera_position: [0.0, 0.0],
            scale: 1.0,
            healthbar_color: [161, 161, 161],
            flip_x: false,
            no_antialiasing: false,
            is_player: false,
            dance_every: 2.0,
            preset: AnimationPreset::Basic,
        }
    }
}

fn preset_animation(anim: &str, name: &str) -> PsychAnimation {
    PsychAnimation {
        offsets: [0.0, 0.0],
        flip_y: false,
        looped: false,
        fps: 24.0,
        anim: anim.to_string(),
        flip_x: false,
        indices: Vec::new(),
        name: name.to_string(),
    }
}

fn basic_animations() -> Vec<PsychAnimation> {
    vec![
        preset_animation("idle", "Idle0"),
        preset_animation("singLEFT", "LEFT0"),
        preset_animation("singDOWN", "DOWN0"),
        preset_animation("singUP", "UP0"),
        preset_animation("singRIGHT", "RIGHT0"),
    ]
}

fn extended_animations() -> Vec<PsychAnimation> {
    let mut animations = basic_animations();
    animations.extend([
        preset_animation("singLEFTmiss", "LEFT MISS0"),
        preset_animation("singDOWNmiss", "DOWN MISS0"),
        preset_animation("singUPmiss", "UP MISS0"),
        preset_animation("singRIGHTmiss", "RIGHT MISS0"),
    ]);
    animations
}

/// Generate a character document. A custom preset with no animations is
/// rejected rather than producing a character the engine cannot idle.
pub fn character(options: &CharacterGenOptions) -> Result<PsychCharacter, ConvertError> {
    let animations = match &options.preset {
        AnimationPreset::Basic => basic_animations(),
        AnimationPreset::Extended => extended_animations(),
        AnimationPreset::Custom(animations) => {
            if animations.is_empty() {
                return Err(ConvertError::MissingRequiredField("animations".to_string()));
            }
            animations.clone()
        }
    };

    Ok(PsychCharacter {
        animations,
        vocals_file: Some(String::new()),
        no_antialiasing: options.no_antialiasing,
        image: options.image.clone(),
        position: options.position,
        dance_every: options.dance_every,
        healthicon: options.health_icon.clone(),
        flip_x: options.flip_x,
        healthbar_colours: None,
        healthbar_colors: Some(options.healthbar_color),
        healthbar_colour: None,
        camera_position: options.camera_position,
        sing_duration: options.sing_duration,
        scale: options.scale,
        editor_is_player: options.is_player,
    })
}

/// Options for week generation.
#[derive(Debug, Clone)]
pub struct WeekGenOptions {
    pub story_name: String,
    pub week_name: String,
    pub week_background: String,
    pub difficulties: String,
    pub opponent: String,
    pub player: String,
    pub girlfriend: String,
    pub color: [u16; 3],
    /// Song display names, one entry per song.
    pub songs: Vec<String>,
    pub start_unlocked: bool,
    pub hide_story_mode: bool,
    pub hide_freeplay: bool,
    pub hidden_until_unlocked: bool,
}

impl Default for WeekGenOptions {
    fn default() -> Self {
        Self {
            story_name: "Your New Week".to_string(),
            week_name: "Custom Week".to_string(),
            week_background: "stage".to_string(),
            difficulties: "Normal, Hard".to_string(),
            opponent: "dad".to_string(),
            player: "bf".to_string(),
            girlfriend: "gf".to_string(),
            color: FREEPLAY_COLOR,
            songs: vec!["My Song".to_string()],
            start_unlocked: true,
            hide_story_mode: false,
            hide_freeplay: false,
            hidden_until_unlocked: false,
        }
    }
}

/// Generate a week document.
pub fn week(options: &WeekGenOptions) -> PsychWeek {
    let songs = options
        .songs
        .iter()
        .map(|name| WeekSong(name.trim().to_string(), options.player.clone(), options.color))
        .collect();

    PsychWeek {
        songs,
        hidden_until_unlocked: options.hidden_until_unlocked,
        hide_freeplay: options.hide_freeplay,
        week_background: options.week_background.clone(),
        difficulties: options.difficulties.clone(),
        week_characters: vec![
            options.opponent.clone(),
            options.player.clone(),
            options.girlfriend.clone(),
        ],
        story_name: options.story_name.clone(),
        week_name: options.week_name.clone(),
        freeplay_color: options.color,
        hide_story_mode: options.hide_story_mode,
        week_before: "tutorial".to_string(),
        start_unlocked: options.start_unlocked,
    }
}
