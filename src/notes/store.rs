use anyhow::{Context, Result};
use std::path::Path;

use super::event::NoteEvent;
use crate::error::NoteGridError;
use crate::theory::pitch::parse_pitch_name;

pub fn save_events(path: &Path, events: &[NoteEvent]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(events).context("Failed to serialize note events")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write note events: {}", path.display()))?;
    log::info!("Wrote {} note events to {}", events.len(), path.display());
    Ok(())
}

/// Read a note-event file, checking every pitch name and velocity.
pub fn load_events(path: &Path) -> Result<Vec<NoteEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read note events: {}", path.display()))?;
    let events: Vec<NoteEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse note events: {}", path.display()))?;

    if events.is_empty() {
        return Err(NoteGridError::MalformedInput(format!(
            "{} contains no note events",
            path.display()
        ))
        .into());
    }
    for event in &events {
        parse_pitch_name(&event.pitch_name)
            .with_context(|| format!("Bad event in {}", path.display()))?;
        if event.velocity > 127 {
            return Err(NoteGridError::MalformedInput(format!(
                "velocity {} out of range in {}",
                event.velocity,
                path.display()
            ))
            .into());
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("notegrid-store-{}", std::process::id()))
            .join(name)
    }

    fn event(segment_index: usize, pitch_name: &str, velocity: u8) -> NoteEvent {
        NoteEvent {
            segment_index,
            pitch_name: pitch_name.to_string(),
            start_time: segment_index as f64 * 0.25,
            duration: 0.25,
            velocity,
            tempo: 84.0,
        }
    }

    #[test]
    fn saves_and_loads() {
        let path = temp_path("bass.json");
        let events = vec![event(0, "D2", 100), event(0, "E2", 0), event(1, "D2", 0)];
        save_events(&path, &events).unwrap();
        assert_eq!(load_events(&path).unwrap(), events);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn uses_tabular_field_names() {
        let json = serde_json::to_value(event(3, "B-4", 100)).unwrap();
        assert_eq!(json["index"], 3);
        assert_eq!(json["note_name"], "B-4");
        assert_eq!(json["start_time"], 0.75);
        assert_eq!(json["tempo"], 84.0);
    }

    #[test]
    fn rejects_bad_pitch_name() {
        let path = temp_path("bad-pitch.json");
        save_events(&path, &[event(0, "H4", 100)]).unwrap();
        let err = load_events(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NoteGridError>(),
            Some(&NoteGridError::InvalidPitchName("H4".to_string()))
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_out_of_range_velocity() {
        let path = temp_path("loud.json");
        save_events(&path, &[event(0, "C4", 200)]).unwrap();
        assert!(load_events(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_empty_file() {
        let path = temp_path("empty.json");
        save_events(&path, &[]).unwrap();
        assert!(load_events(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
