//! # Week Transcoder
//!
//! Maps story weeks between the two formats. The interesting part is the
//! song list: one side stores song ids (`spooky-month`), the other display
//! names with an icon and menu color per entry, so titles are folded
//! between the two shapes.

use crate::chart::non_empty_or;
use crate::export::slug;
use crate::psych::{PsychWeek, WeekSong};
use crate::vslice::{VSliceWeek, WeekProp, STAGE_VERSION};

/// Menu color given to converted weeks and their songs.
pub const FREEPLAY_COLOR: [u16; 3] = [146, 113, 253];

/// Options for the week -> sectioned-engine direction.
#[derive(Debug, Clone)]
pub struct WeekToPsychOptions {
    pub story_name: String,
    pub week_name: String,
    pub week_background: String,
    /// Comma-separated difficulty list shown in story mode.
    pub difficulties: String,
    pub start_unlocked: bool,
    pub hide_story_mode: bool,
}

impl Default for WeekToPsychOptions {
    fn default() -> Self {
        Self {
            story_name: "Your New Week".to_string(),
            week_name: "Custom Week".to_string(),
            week_background: "stage".to_string(),
            difficulties: "Normal, Hard".to_string(),
            start_unlocked: true,
            hide_story_mode: false,
        }
    }
}

/// Options for the sectioned-engine -> week direction.
#[derive(Debug, Clone)]
pub struct WeekToVSliceOptions {
    pub name: String,
    pub title_asset: String,
    pub background: String,
    pub visible: bool,
}

impl Default for WeekToVSliceOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            title_asset: "storymenu/titles/week1".to_string(),
            background: "#000000".to_string(),
            visible: true,
        }
    }
}

/// Turn a song id into a display name: capitalize the first letter and
/// open the dashes up into spaces.
fn display_name(song_id: &str) -> String {
    let mut chars = song_id.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().replace('-', " ")
        }
        None => String::new(),
    }
}

/// Convert a week document to the sectioned engine's format.
pub fn to_psych(week: &VSliceWeek, options: &WeekToPsychOptions) -> PsychWeek {
    let songs = week
        .songs
        .iter()
        .map(|song_id| WeekSong(display_name(song_id), "bf".to_string(), FREEPLAY_COLOR))
        .collect();

    PsychWeek {
        songs,
        hidden_until_unlocked: false,
        hide_freeplay: false,
        week_background: options.week_background.clone(),
        difficulties: options.difficulties.clone(),
        week_characters: vec!["dad".to_string(), "bf".to_string(), "gf".to_string()],
        story_name: options.story_name.clone(),
        week_name: options.week_name.clone(),
        freeplay_color: FREEPLAY_COLOR,
        hide_story_mode: options.hide_story_mode,
        week_before: "tutorial".to_string(),
        start_unlocked: options.start_unlocked,
    }
}

/// Convert a sectioned-engine week back to a week document. Display names
/// fold back to song ids; the story-menu props are placeholders for the
/// caller to replace with real assets.
pub fn to_vslice(week: &PsychWeek, options: &WeekToVSliceOptions) -> VSliceWeek {
    let songs = week.songs.iter().map(|entry| slug(&entry.0)).collect();

    VSliceWeek {
        version: STAGE_VERSION.to_string(),
        name: options.name.clone(),
        title_asset: non_empty_or(&options.title_asset, "storymenu/titles/week1"),
        visible: options.visible,
        props: vec![
            placeholder_prop(0.2, [-650.0, -700.0]),
            placeholder_prop(0.2, [-450.0, -700.0]),
            placeholder_prop(0.4, [-2050.0, -700.0]),
        ],
        background: options.background.clone(),
        songs,
    }
}

fn placeholder_prop(scale: f64, offsets: [f64; 2]) -> WeekProp {
    WeekProp {
        asset_path: "storymenu/props/nothing".to_string(),
        scale,
        offsets,
        animations: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_ids_become_display_entries() {
        let week = VSliceWeek {
            version: STAGE_VERSION.to_string(),
            name: "Week 2".to_string(),
            title_asset: String::new(),
            visible: true,
            props: Vec::new(),
            background: String::new(),
            songs: vec!["spookeez".to_string(), "south-town".to_string()],
        };
        let psych = to_psych(&week, &WeekToPsychOptions::default());
        assert_eq!(
            psych.songs,
            vec![
                WeekSong("Spookeez".to_string(), "bf".to_string(), FREEPLAY_COLOR),
                WeekSong("South town".to_string(), "bf".to_string(), FREEPLAY_COLOR),
            ]
        );
        assert_eq!(psych.week_characters, vec!["dad", "bf", "gf"]);
        assert_eq!(psych.week_before, "tutorial");
    }

    #[test]
    fn test_display_names_fold_back_to_ids() {
        let psych = PsychWeek {
            songs: vec![WeekSong(
                "South Town".to_string(),
                "bf".to_string(),
                FREEPLAY_COLOR,
            )],
            hidden_until_unlocked: false,
            hide_freeplay: false,
            week_background: "stage".to_string(),
            difficulties: "Normal".to_string(),
            week_characters: Vec::new(),
            story_name: "vs Dad".to_string(),
            week_name: "Week 1".to_string(),
            freeplay_color: FREEPLAY_COLOR,
            hide_story_mode: false,
            week_before: "tutorial".to_string(),
            start_unlocked: true,
        };
        let week = to_vslice(&psych, &WeekToVSliceOptions::default());
        assert_eq!(week.songs, vec!["south-town".to_string()]);
        assert_eq!(week.props.len(), 3);
        assert_eq!(week.props[2].scale, 0.4);
        assert_eq!(week.background, "#000000");
    }

    #[test]
    fn test_single_word_ids_round_trip() {
        let week = VSliceWeek {
            version: STAGE_VERSION.to_string(),
            name: String::new(),
            title_asset: String::new(),
            visible: true,
            props: Vec::new(),
            background: String::new(),
            songs: vec!["bopeebo".to_string()],
        };
        let psych = to_psych(&week, &WeekToPsychOptions::default());
        let back = to_vslice(&psych, &WeekToVSliceOptions::default());
        assert_eq!(back.songs, vec!["bopeebo".to_string()]);
    }

    #[test]
    fn test_empty_song_id() {
        assert_eq!(display_name(""), "");
        assert_eq!(display_name("a"), "A");
    }
}
