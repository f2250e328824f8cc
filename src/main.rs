mod cli;
mod config;
mod error;
mod audio;
mod theory;
mod notes;
mod encode;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use audio::analysis::AnalysisParams;
use cli::{Cli, Command, RenderArgs, TranscribeArgs};
use config::Config;
use theory::scale::Band;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let config = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}, using defaults", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Command::Transcribe(args) => run_transcribe(args, &config),
        Command::Render(args) => run_render(args, &config),
    }
}

fn run_transcribe(args: TranscribeArgs, config: &Config) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    // CLI flags override config values
    let params = AnalysisParams {
        bpm: args.bpm.unwrap_or(config.analysis.bpm),
        key: args.key.clone().unwrap_or_else(|| config.analysis.key.clone()),
        is_major: resolve_major(args.major, args.minor, config.analysis.major),
        threshold: args.threshold.unwrap_or(config.analysis.threshold),
    };
    let duration = args
        .duration
        .or(config.analysis.duration)
        .filter(|&secs| secs > 0.0);
    let notes_dir = args.notes_dir.clone().unwrap_or_else(|| config.output.notes_dir.clone());
    let midi_dir = args.output.clone().unwrap_or_else(|| config.output.midi_dir.clone());

    log::info!("notegrid - scale-grid transcription");
    log::info!("Input: {}", args.input.display());
    log::info!(
        "Key: {} {}, {:.1} BPM, threshold {:.1} dB",
        params.key,
        if params.is_major { "major" } else { "minor" },
        params.bpm,
        params.threshold
    );

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_audio(&args.input, duration)?;

    // 2. Analyze
    let transcription = audio::analysis::transcribe(&audio_data, &params)
        .context("Failed to transcribe audio")?;
    log::info!("Segments: {}", transcription.segment_count);

    // 3. Persist each band, skipping any that failed
    let mut written = Vec::new();
    for band in Band::ALL {
        match transcription.band(band) {
            Ok(events) => {
                let path = notes_dir.join(format!("{}.json", band));
                notes::store::save_events(&path, events)?;
                written.push((band, path));
            }
            Err(err) => log::warn!("Skipping {} band: {}", band, err),
        }
    }
    if written.is_empty() {
        anyhow::bail!("No note events produced for any band");
    }

    // 4. Render MIDI
    if args.no_midi {
        return Ok(());
    }
    for (band, _) in &written {
        if let Ok(events) = transcription.band(*band) {
            let path = midi_dir.join(format!("{}.mid", band));
            encode::midi::write_midi(&path, events, params.bpm, config.output.ticks_per_beat)?;
        }
    }

    log::info!("Done! MIDI files in {}", midi_dir.display());
    Ok(())
}

fn run_render(args: RenderArgs, config: &Config) -> Result<()> {
    if !args.input_dir.is_dir() {
        anyhow::bail!("{} is not a directory", args.input_dir.display());
    }
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_render_dir(&args.input_dir));

    let files = list_note_files(&args.input_dir)?;
    if files.is_empty() {
        log::warn!("No note-event files found in {}", args.input_dir.display());
        return Ok(());
    }
    log::info!("Rendering {} file(s) to {}", files.len(), output_dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    for path in &files {
        pb.set_message(path.display().to_string());
        let events = notes::store::load_events(path)?;
        // Tempo from the file unless overridden
        let tempo = args.tempo.unwrap_or(events[0].tempo);
        let out_path = output_dir.join(path.with_extension("mid").file_name().context("Bad file name")?);
        encode::midi::write_midi(&out_path, &events, tempo, config.output.ticks_per_beat)?;
        pb.inc(1);
    }

    pb.finish_with_message("Rendering complete");
    Ok(())
}

/// `--major` / `--minor` win over the config's mode.
fn resolve_major(major_flag: bool, minor_flag: bool, config_major: bool) -> bool {
    if minor_flag {
        false
    } else if major_flag {
        true
    } else {
        config_major
    }
}

fn default_render_dir(input_dir: &Path) -> PathBuf {
    let name = input_dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "notes".to_string());
    let parent = input_dir.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}-output-midis", name))
}

/// Note-event files in `dir`, sorted by name.
fn list_note_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
