use thiserror::Error;

use crate::theory::scale::Band;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NoteGridError {
    #[error("Invalid tempo: {0} BPM (must be greater than 0)")]
    InvalidTempo(f64),
    #[error("Invalid segment size: {0} samples (must be greater than 0)")]
    InvalidSegmentSize(usize),
    #[error("Input too short: {len} samples, need at least one segment of {segment_size}")]
    InputTooShort { len: usize, segment_size: usize },
    #[error("Segment {0} produced an empty spectrum")]
    EmptySpectrum(usize),
    #[error("Segment {0} has an empty frequency axis")]
    EmptySpectrumAxis(usize),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("No scale frequencies found in the {0} band")]
    EmptyFrequencyBand(Band),
    #[error("Invalid pitch name: {0} (must match [A-G](#|-)?[0-7])")]
    InvalidPitchName(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, NoteGridError>;
