use anyhow::{Context, Result};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

use crate::error::NoteGridError;
use crate::notes::event::NoteEvent;
use crate::theory::pitch::pitch_name_to_number;

pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// A note-on or note-off at an absolute tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TimedMessage {
    tick: u64,
    key: u8,
    /// None for note-off
    velocity: Option<u8>,
}

fn beats_to_ticks(beats: f64, ticks_per_beat: u16) -> u64 {
    (beats * ticks_per_beat as f64).round().max(0.0) as u64
}

/// Build a single-track MIDI file from note events. Rests (velocity 0)
/// produce nothing; `tempo` applies to the whole track.
pub fn render_track(
    events: &[NoteEvent],
    tempo: f64,
    ticks_per_beat: u16,
) -> crate::error::Result<Smf<'static>> {
    if !tempo.is_finite() || tempo <= 0.0 {
        return Err(NoteGridError::InvalidTempo(tempo));
    }
    if ticks_per_beat == 0 || ticks_per_beat > 0x7fff {
        return Err(NoteGridError::MalformedInput(format!(
            "ticks per beat must be in 1..=32767, got {}",
            ticks_per_beat
        )));
    }

    let mut messages = Vec::new();
    for event in events.iter().filter(|e| e.is_sounding()) {
        if event.velocity > 127 {
            return Err(NoteGridError::MalformedInput(format!(
                "velocity {} out of range for {}",
                event.velocity, event.pitch_name
            )));
        }
        let number = pitch_name_to_number(&event.pitch_name)?;
        let key = u8::try_from(number)
            .ok()
            .filter(|&k| k <= 127)
            .ok_or_else(|| NoteGridError::MalformedInput(format!("pitch {} out of MIDI range", number)))?;

        let start = beats_to_ticks(event.start_time, ticks_per_beat);
        let end = start + beats_to_ticks(event.duration, ticks_per_beat).max(1);
        messages.push(TimedMessage { tick: start, key, velocity: Some(event.velocity) });
        messages.push(TimedMessage { tick: end, key, velocity: None });
    }
    // Offs before ons on the same tick so back-to-back notes retrigger.
    messages.sort_by_key(|m| (m.tick, m.velocity.is_some(), m.key));

    let micros_per_beat = (60_000_000.0 / tempo).round().clamp(1.0, 0xff_ffff as f64) as u32;
    let mut track: Vec<TrackEvent<'static>> = Vec::with_capacity(messages.len() + 2);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_beat))),
    });

    let mut last_tick = 0u64;
    for message in &messages {
        let delta = (message.tick - last_tick).min(0x0fff_ffff) as u32;
        last_tick = message.tick;
        let key = u7::new(message.key);
        let midi = match message.velocity {
            Some(vel) => MidiMessage::NoteOn { key, vel: u7::new(vel) },
            None => MidiMessage::NoteOff { key, vel: u7::new(0) },
        };
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi { channel: u4::new(0), message: midi },
        });
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(ticks_per_beat)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

pub fn write_midi(path: &Path, events: &[NoteEvent], tempo: f64, ticks_per_beat: u16) -> Result<()> {
    let smf = render_track(events, tempo, ticks_per_beat)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    smf.save(path)
        .with_context(|| format!("Failed to write MIDI file: {}", path.display()))?;

    let sounding = events.iter().filter(|e| e.is_sounding()).count();
    log::info!(
        "Wrote {} ({} notes, {} rests, {:.1} BPM)",
        path.display(),
        sounding,
        events.len() - sounding,
        tempo
    );
    Ok(())
}
