use super::features::{Spectrum, LOG_FLOOR};
use crate::error::{NoteGridError, Result};
use crate::theory::pitch::A440;

/// dB added per octave away from 440 Hz.
const TILT_DB_PER_OCTAVE: f64 = 3.0;

/// Tilt correction in dB for a bin at `freq` Hz.
pub fn tilt(freq: f64) -> f64 {
    TILT_DB_PER_OCTAVE * (freq / A440 + LOG_FLOOR).log2()
}

/// Add the fixed register tilt to every bin of every spectrum.
pub fn apply(spectra: &[Spectrum], sample_rate: u32) -> Result<Vec<Spectrum>> {
    spectra
        .iter()
        .enumerate()
        .map(|(idx, spectrum)| {
            if spectrum.sample_rate != sample_rate {
                return Err(NoteGridError::MalformedInput(format!(
                    "segment {} was transformed at {} Hz, filter applied at {} Hz",
                    idx, spectrum.sample_rate, sample_rate
                )));
            }
            let freqs = spectrum.frequencies();
            if freqs.len() != spectrum.bins.len() {
                return Err(NoteGridError::MalformedInput(format!(
                    "segment {} has {} bins for {} frequencies",
                    idx,
                    spectrum.bins.len(),
                    freqs.len()
                )));
            }
            let bins = spectrum
                .bins
                .iter()
                .zip(&freqs)
                .map(|(&db, &freq)| db + tilt(freq))
                .collect();
            Ok(Spectrum { bins, ..*spectrum })
        })
        .collect()
}
