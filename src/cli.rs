use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notegrid", about = "Transcribe audio onto a sixteenth-note scale grid and render MIDI")]
pub struct Cli {
    /// Config file (defaults to ./notegrid.toml or ~/.config/notegrid/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze an audio file into bass and higher note streams
    Transcribe(TranscribeArgs),
    /// Convert every note-event file in a directory to MIDI
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Tempo in beats per minute
    #[arg(long)]
    pub bpm: Option<f64>,

    /// Key of the scale (C, D-, D, ..., sharps accepted)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Use the natural minor scale instead of major
    #[arg(long, conflicts_with = "major")]
    pub minor: bool,

    /// Use the major scale even if the config selects minor
    #[arg(long)]
    pub major: bool,

    /// Amplitude (dB) a scale tone must exceed to sound
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Seconds of input to analyze (0 = whole file)
    #[arg(short, long)]
    pub duration: Option<f32>,

    /// Directory for bass.json / higher.json
    #[arg(long)]
    pub notes_dir: Option<PathBuf>,

    /// Directory for rendered MIDI files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write note-event files only
    #[arg(long)]
    pub no_midi: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory containing note-event (.json) files
    pub input_dir: PathBuf,

    /// Output directory (defaults to <INPUT_DIR>-output-midis)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tempo override; defaults to the tempo recorded in each file
    #[arg(short, long)]
    pub tempo: Option<f64>,
}
