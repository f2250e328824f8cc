use super::decode::AudioData;
use super::{extract, filter, segment};
use crate::error::{NoteGridError, Result};
use crate::notes::event::NoteEvent;
use crate::notes::quantize::quantize;
use crate::theory::scale::{self, Band};

/// Explicit parameters of one transcription run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisParams {
    pub bpm: f64,
    pub key: String,
    pub is_major: bool,
    /// dB level a corrected amplitude must exceed to sound
    pub threshold: f64,
}

/// Note streams for both registers. Each band either holds a complete event
/// sequence or the error that stopped it.
#[derive(Debug)]
pub struct Transcription {
    pub bass: Result<Vec<NoteEvent>>,
    pub higher: Result<Vec<NoteEvent>>,
    pub segment_count: usize,
}

impl Transcription {
    pub fn band(&self, band: Band) -> &Result<Vec<NoteEvent>> {
        match band {
            Band::Bass => &self.bass,
            Band::Higher => &self.higher,
        }
    }
}

/// Run the full spectral-to-note pipeline on a waveform.
///
/// Failures shared by both bands (tempo, segmentation, key) abort the whole
/// call. Extraction and quantization then run per band, concurrently, and a
/// failure there is reported for that band alone.
pub fn transcribe(audio: &AudioData, params: &AnalysisParams) -> Result<Transcription> {
    if audio.sample_rate == 0 {
        return Err(NoteGridError::MalformedInput("sample rate must be positive".into()));
    }
    let sr = audio.sample_rate;

    log::info!(
        "Pass 1: Segmenting and transforming ({:.1}s at {}Hz)...",
        audio.duration(),
        sr
    );
    let spectra = segment::segment_and_transform(&audio.samples, sr, params.bpm)?;

    log::info!("Pass 2: Applying register tilt...");
    let corrected = filter::apply(&spectra, sr)?;
    drop(spectra);

    let scale = scale::generate(&params.key, params.is_major)?;
    log::info!(
        "Scale {} {}: {} bass / {} higher frequencies",
        params.key,
        if params.is_major { "major" } else { "minor" },
        scale.bass.len(),
        scale.higher.len()
    );

    log::info!("Pass 3: Extracting and quantizing bands (threshold={:.1})...", params.threshold);
    let run_band = |band: Band| -> Result<Vec<NoteEvent>> {
        let targets = scale.band(band);
        let amplitudes = extract::extract(&corrected, targets, sr)?;
        let events = quantize(&amplitudes, targets, params.bpm, params.threshold)?;
        let sounding = events.iter().filter(|e| e.is_sounding()).count();
        log::info!(
            "Band {}: {} events, {} sounding",
            band,
            events.len(),
            sounding
        );
        Ok(events)
    };
    let (bass, higher) = rayon::join(|| run_band(Band::Bass), || run_band(Band::Higher));

    Ok(Transcription {
        bass,
        higher,
        segment_count: corrected.len(),
    })
}
