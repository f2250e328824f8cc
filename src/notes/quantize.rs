use super::event::{NoteEvent, BEATS_PER_SEGMENT, NOTE_ON_VELOCITY};
use crate::error::{NoteGridError, Result};
use crate::theory::pitch::frequency_to_pitch_name;

/// Turn an amplitude matrix into dense note events.
///
/// `amplitudes[segment][k]` belongs to `targets[k]`. Every cell becomes an
/// event; cells at or below `threshold` are emitted as rests (velocity 0).
pub fn quantize(
    amplitudes: &[Vec<f64>],
    targets: &[f64],
    bpm: f64,
    threshold: f64,
) -> Result<Vec<NoteEvent>> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(NoteGridError::InvalidTempo(bpm));
    }

    let names = targets
        .iter()
        .map(|&freq| frequency_to_pitch_name(freq).map(|name| name.to_string()))
        .collect::<Result<Vec<String>>>()?;

    let mut events = Vec::with_capacity(amplitudes.len() * targets.len());
    for (segment_index, row) in amplitudes.iter().enumerate() {
        if row.len() != targets.len() {
            return Err(NoteGridError::MalformedInput(format!(
                "segment {} has {} amplitudes for {} frequencies",
                segment_index,
                row.len(),
                targets.len()
            )));
        }
        let start_time = segment_index as f64 * BEATS_PER_SEGMENT;
        for (name, &amplitude) in names.iter().zip(row) {
            events.push(NoteEvent {
                segment_index,
                pitch_name: name.clone(),
                start_time,
                duration: BEATS_PER_SEGMENT,
                velocity: if amplitude > threshold { NOTE_ON_VELOCITY } else { 0 },
                tempo: bpm,
            });
        }
    }
    Ok(events)
}
