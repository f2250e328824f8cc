use serde::{Deserialize, Serialize};

/// Beats covered by one sixteenth-note segment.
pub const BEATS_PER_SEGMENT: f64 = 0.25;
/// Velocity given to segments whose amplitude clears the threshold.
pub const NOTE_ON_VELOCITY: u8 = 100;

/// One grid cell of a transcription: a pitch at a segment, sounding or not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    #[serde(rename = "index")]
    pub segment_index: usize,
    #[serde(rename = "note_name")]
    pub pitch_name: String,
    /// Onset in beats
    pub start_time: f64,
    /// Length in beats
    pub duration: f64,
    /// 0 marks a rest
    pub velocity: u8,
    /// Beats per minute
    pub tempo: f64,
}

impl NoteEvent {
    pub fn is_sounding(&self) -> bool {
        self.velocity > 0
    }
}
