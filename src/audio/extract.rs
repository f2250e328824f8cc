use rayon::prelude::*;

use super::features::Spectrum;
use crate::error::{NoteGridError, Result};

/// Index of the bin closest to `target` on an ascending axis. Equal
/// distances keep the lower bin.
pub fn nearest_bin(freqs: &[f64], target: f64) -> Option<usize> {
    if freqs.is_empty() {
        return None;
    }
    let upper = freqs.partition_point(|&f| f < target);
    if upper == 0 {
        return Some(0);
    }
    if upper == freqs.len() {
        return Some(freqs.len() - 1);
    }
    let lower = upper - 1;
    if (target - freqs[lower]).abs() <= (freqs[upper] - target).abs() {
        Some(lower)
    } else {
        Some(upper)
    }
}

/// Sample each spectrum at the nearest bin to every target frequency.
///
/// Returns one row per segment, one column per target, in target order.
pub fn extract(spectra: &[Spectrum], targets: &[f64], sample_rate: u32) -> Result<Vec<Vec<f64>>> {
    spectra
        .par_iter()
        .enumerate()
        .map(|(idx, spectrum)| -> Result<Vec<f64>> {
            if spectrum.sample_rate != sample_rate {
                return Err(NoteGridError::MalformedInput(format!(
                    "segment {} was transformed at {} Hz, extraction requested at {} Hz",
                    idx, spectrum.sample_rate, sample_rate
                )));
            }
            let freqs = spectrum.frequencies();
            if freqs.is_empty() || spectrum.bins.is_empty() {
                return Err(NoteGridError::EmptySpectrumAxis(idx));
            }
            if freqs.len() != spectrum.bins.len() {
                return Err(NoteGridError::MalformedInput(format!(
                    "segment {} has {} bins for {} frequencies",
                    idx,
                    spectrum.bins.len(),
                    freqs.len()
                )));
            }

            targets
                .iter()
                .map(|&target| {
                    nearest_bin(&freqs, target)
                        .map(|bin| spectrum.bins[bin])
                        .ok_or(NoteGridError::EmptySpectrumAxis(idx))
                })
                .collect()
        })
        .collect()
}
