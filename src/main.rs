use std::env;
use std::fs;
use std::path::Path;
use std::process;

use funkconv::export::{
    psych_character_artifact, psych_chart_artifact, psych_stage_artifacts, psych_week_artifact,
    vslice_character_artifact, vslice_chart_artifacts, vslice_stage_artifact,
    vslice_week_artifact,
};
use funkconv::generate::{self, ChartGenMode, NoteDensity};
use funkconv::{Artifact, ConvertError};

const USAGE: &str = "Usage: funkconv <command> [inputs...] [options]

Conversion commands:
  chart-to-psych <chart.json> <metadata.json>   [--difficulty KEY] [--bpm N]
  chart-to-vslice <chart.json>                  [--difficulty KEY] [--bpm N]
  stage-to-psych <stage.json>                   [--no-script]
  stage-to-vslice <stage.json> [script.lua]     [--name NAME] [--directory DIR]
  character-to-psych <character.json>
  character-to-vslice <character.json>
  week-to-psych <week.json>
  week-to-vslice <week.json>

Generation commands:
  gen-chart   [--mode empty|sample|random] [--density low|medium|high]
              [--sustains] [--seed N] [--song NAME] [--bpm N] [--sections N]
  gen-stage
  gen-character [--extended]
  gen-week    [--songs a,b,c]

Common options:
  --out DIR   directory to write artifacts into (default: current directory)";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let command = args[0].as_str();
    let (positional, flags) = split_args(&args[1..]);

    let result = run(command, &positional, &flags);
    match result {
        Ok(artifacts) => {
            let out_dir = flag_value(&flags, "--out").unwrap_or_else(|| ".".to_string());
            for artifact in &artifacts {
                let path = Path::new(&out_dir).join(&artifact.filename);
                if let Err(err) = fs::write(&path, &artifact.contents) {
                    eprintln!("Error writing '{}': {}", path.display(), err);
                    process::exit(1);
                }
                eprintln!("Wrote {}", path.display());
            }
        }
        Err(err) => {
            eprintln!("Conversion error: {}", err);
            process::exit(1);
        }
    }
}

fn run(
    command: &str,
    positional: &[String],
    flags: &[(String, Option<String>)],
) -> Result<Vec<Artifact>, ConvertError> {
    match command {
        "chart-to-psych" => {
            let chart = read_input(positional.first(), "chart JSON");
            let metadata = read_input(positional.get(1), "metadata JSON");
            let mut options = funkconv::ChartToPsychOptions::default();
            if let Some(difficulty) = flag_value(flags, "--difficulty") {
                options.difficulty = difficulty;
            }
            options.bpm = float_flag(flags, "--bpm");
            let psych = funkconv::chart_to_psych(&chart, &metadata, &options)?;
            Ok(vec![psych_chart_artifact(&psych)?])
        }
        "chart-to-vslice" => {
            let chart = read_input(positional.first(), "chart JSON");
            let mut options = funkconv::ChartToVSliceOptions::default();
            if let Some(difficulty) = flag_value(flags, "--difficulty") {
                options.difficulty = difficulty;
            }
            options.bpm = float_flag(flags, "--bpm");
            options.scroll_speed = float_flag(flags, "--scroll-speed");
            let (flat, metadata) = funkconv::chart_to_vslice(&chart, &options)?;
            vslice_chart_artifacts(&flat, &metadata)
        }
        "stage-to-psych" => {
            let stage = read_input(positional.first(), "stage JSON");
            let options = funkconv::StageToPsychOptions {
                generate_script: !has_flag(flags, "--no-script"),
            };
            let (json, lua) = funkconv::stage_to_psych(&stage, &options)?;
            psych_stage_artifacts(&json, &lua)
        }
        "stage-to-vslice" => {
            let stage = read_input(positional.first(), "stage JSON");
            let script = positional.get(1).map(|path| read_file(path));
            let mut options = funkconv::StageToVSliceOptions::default();
            if let Some(name) = flag_value(flags, "--name") {
                options.name = name;
            }
            if let Some(directory) = flag_value(flags, "--directory") {
                options.directory = directory;
            }
            let vslice = funkconv::stage_to_vslice(&stage, script.as_deref(), &options)?;
            Ok(vec![vslice_stage_artifact(&vslice)?])
        }
        "character-to-psych" => {
            let character = read_input(positional.first(), "character JSON");
            let psych =
                funkconv::character_to_psych(&character, &Default::default())?;
            Ok(vec![psych_character_artifact(&psych)?])
        }
        "character-to-vslice" => {
            let character = read_input(positional.first(), "character JSON");
            let vslice =
                funkconv::character_to_vslice(&character, &Default::default())?;
            Ok(vec![vslice_character_artifact(&vslice)?])
        }
        "week-to-psych" => {
            let week = read_input(positional.first(), "week JSON");
            let psych = funkconv::week_to_psych(&week, &Default::default())?;
            Ok(vec![psych_week_artifact(&psych)?])
        }
        "week-to-vslice" => {
            let week = read_input(positional.first(), "week JSON");
            let vslice = funkconv::week_to_vslice(&week, &Default::default())?;
            Ok(vec![vslice_week_artifact(&vslice)?])
        }
        "gen-chart" => {
            let mut options = funkconv::ChartGenOptions::default();
            if let Some(song) = flag_value(flags, "--song") {
                options.song_name = song;
            }
            if let Some(bpm) = float_flag(flags, "--bpm") {
                options.bpm = bpm;
            }
            if let Some(sections) = int_flag(flags, "--sections") {
                options.sections = sections;
            }
            options.mode = match flag_value(flags, "--mode").as_deref() {
                None | Some("empty") => ChartGenMode::Empty,
                Some("sample") => ChartGenMode::Sample,
                Some("random") => ChartGenMode::Random {
                    density: match flag_value(flags, "--density").as_deref() {
                        Some("low") => NoteDensity::Low,
                        Some("high") => NoteDensity::High,
                        _ => NoteDensity::Medium,
                    },
                    sustains: has_flag(flags, "--sustains"),
                },
                Some(other) => {
                    eprintln!("Unknown generation mode '{}'", other);
                    process::exit(1);
                }
            };
            let seed = int_flag(flags, "--seed").unwrap_or(0) as u64;
            let chart = generate::chart_seeded(&options, seed);
            Ok(vec![psych_chart_artifact(&chart)?])
        }
        "gen-stage" => {
            let stage = generate::stage(&Default::default());
            Ok(vec![Artifact {
                filename: "stage.json".to_string(),
                contents: funkconv::export::to_psych_json(&stage)?,
            }])
        }
        "gen-character" => {
            let mut options = funkconv::CharacterGenOptions::default();
            if has_flag(flags, "--extended") {
                options.preset = funkconv::AnimationPreset::Extended;
            }
            let character = generate::character(&options)?;
            Ok(vec![psych_character_artifact(&character)?])
        }
        "gen-week" => {
            let mut options = funkconv::WeekGenOptions::default();
            if let Some(songs) = flag_value(flags, "--songs") {
                options.songs = songs.split(',').map(str::to_string).collect();
            }
            let week = generate::week(&options);
            Ok(vec![psych_week_artifact(&week)?])
        }
        other => {
            eprintln!("Unknown command '{}'\n\n{}", other, USAGE);
            process::exit(1);
        }
    }
}

/// Separate positional arguments from `--flag [value]` pairs. A flag's
/// value is the next argument unless that argument is itself a flag.
fn split_args(args: &[String]) -> (Vec<String>, Vec<(String, Option<String>)>) {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut index = 0;
    while index < args.len() {
        let arg = &args[index];
        if arg.starts_with("--") {
            let value = args
                .get(index + 1)
                .filter(|next| !next.starts_with("--"))
                .cloned();
            if value.is_some() {
                index += 1;
            }
            flags.push((arg.clone(), value));
        } else {
            positional.push(arg.clone());
        }
        index += 1;
    }
    (positional, flags)
}

fn flag_value(flags: &[(String, Option<String>)], name: &str) -> Option<String> {
    flags
        .iter()
        .find(|(flag, _)| flag == name)
        .and_then(|(_, value)| value.clone())
}

fn has_flag(flags: &[(String, Option<String>)], name: &str) -> bool {
    flags.iter().any(|(flag, _)| flag == name)
}

fn float_flag(flags: &[(String, Option<String>)], name: &str) -> Option<f64> {
    flag_value(flags, name).and_then(|value| value.parse().ok())
}

fn int_flag(flags: &[(String, Option<String>)], name: &str) -> Option<usize> {
    flag_value(flags, name).and_then(|value| value.parse().ok())
}

fn read_input(path: Option<&String>, what: &str) -> String {
    match path {
        Some(path) => read_file(path),
        None => {
            eprintln!("Missing {} input file\n\n{}", what, USAGE);
            process::exit(1);
        }
    }
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Error reading file '{}': {}", path, err);
            process::exit(1);
        }
    }
}
