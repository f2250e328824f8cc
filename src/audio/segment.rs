use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::features::{Spectrum, LOG_FLOOR};
use crate::error::{NoteGridError, Result};

/// Length of a sixteenth note in seconds.
pub fn sixteenth_duration(bpm: f64) -> Result<f64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(NoteGridError::InvalidTempo(bpm));
    }
    Ok(15.0 / bpm)
}

/// Samples per sixteenth-note segment.
pub fn segment_size(sample_rate: u32, bpm: f64) -> Result<usize> {
    let duration = sixteenth_duration(bpm)?;
    let size = (duration * sample_rate as f64).floor() as usize;
    if size == 0 {
        return Err(NoteGridError::InvalidSegmentSize(size));
    }
    Ok(size)
}

/// Cut the waveform into sixteenth-note segments and return the
/// log-magnitude spectrum of each, in segment order. The trailing segment
/// may be shorter than the rest.
pub fn segment_and_transform(samples: &[f32], sample_rate: u32, bpm: f64) -> Result<Vec<Spectrum>> {
    let size = segment_size(sample_rate, bpm)?;
    if samples.len() < size {
        return Err(NoteGridError::InputTooShort {
            len: samples.len(),
            segment_size: size,
        });
    }

    let segment_count = samples.len().div_ceil(size);
    log::info!(
        "Segmenting {} samples into {} segments of {} samples ({:.1} BPM)",
        samples.len(),
        segment_count,
        size,
        bpm
    );

    let spectra: Vec<Spectrum> = samples
        .par_chunks(size)
        .map(|segment| {
            // Per-thread FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f64>::new();
            let fft = planner.plan_fft_forward(segment.len());

            let mut buffer: Vec<Complex<f64>> = segment
                .iter()
                .map(|&s| Complex::new(s as f64, 0.0))
                .collect();
            fft.process(&mut buffer);

            let bins: Vec<f64> = buffer[..segment.len() / 2 + 1]
                .iter()
                .map(|c| 20.0 * (c.norm() + LOG_FLOOR).log10())
                .collect();

            Spectrum {
                bins,
                segment_len: segment.len(),
                sample_rate,
            }
        })
        .collect();

    if let Some(idx) = spectra.iter().position(|s| s.bins.is_empty()) {
        return Err(NoteGridError::EmptySpectrum(idx));
    }
    Ok(spectra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_size_is_pure() {
        let a = segment_size(44100, 84.0).unwrap();
        let b = segment_size(44100, 84.0).unwrap();
        assert_eq!(a, b);
        // 15 / 84 * 44100 = 7875
        assert_eq!(a, 7875);
        assert_eq!(segment_size(44100, 120.0).unwrap(), 5512);
    }

    #[test]
    fn segment_size_follows_rounded_duration() {
        // Multiplying by the rounded duration differs from floor(15 * sr / bpm) here
        assert_eq!(segment_size(44100, 21.6).unwrap(), 30625);
        assert_eq!(segment_size(22050, 10.8).unwrap(), 30625);
        assert_eq!(segment_size(44100, 367.5).unwrap(), 1799);
        for (sample_rate, bpm) in [(44100, 21.6), (44100, 84.0), (48000, 97.3), (22050, 133.0)] {
            let expected = (15.0 / bpm * sample_rate as f64).floor() as usize;
            assert_eq!(segment_size(sample_rate, bpm).unwrap(), expected);
        }
    }

    #[test]
    fn rejects_non_positive_tempo() {
        assert_eq!(sixteenth_duration(0.0), Err(NoteGridError::InvalidTempo(0.0)));
        assert_eq!(
            segment_and_transform(&[0.0; 16], 44100, -10.0),
            Err(NoteGridError::InvalidTempo(-10.0))
        );
    }

    #[test]
    fn rejects_tiny_segments() {
        // 15 / 6000 * 100 = 0.25 samples
        assert_eq!(
            segment_size(100, 6000.0),
            Err(NoteGridError::InvalidSegmentSize(0))
        );
    }

    #[test]
    fn rejects_input_shorter_than_one_segment() {
        // 60 bpm at 16 Hz -> 4 samples per segment
        assert_eq!(
            segment_and_transform(&[0.5; 3], 16, 60.0),
            Err(NoteGridError::InputTooShort {
                len: 3,
                segment_size: 4
            })
        );
    }

    #[test]
    fn exactly_one_segment_succeeds() {
        let spectra = segment_and_transform(&[0.5; 4], 16, 60.0).unwrap();
        assert_eq!(spectra.len(), 1);
        assert_eq!(spectra[0].bins.len(), 3);
    }

    #[test]
    fn keeps_short_trailing_segment() {
        let spectra = segment_and_transform(&[0.25; 10], 16, 60.0).unwrap();
        assert_eq!(spectra.len(), 3);
        assert_eq!(spectra[2].segment_len, 2);
        assert_eq!(spectra[2].bins.len(), 2);
    }

    #[test]
    fn dc_signal_peaks_in_bin_zero() {
        // |X[0]| = 4 for four samples of 1.0
        let spectra = segment_and_transform(&[1.0; 4], 16, 60.0).unwrap();
        let bins = &spectra[0].bins;
        assert!((bins[0] - 20.0 * 4f64.log10()).abs() < 1e-9);
        assert!(bins[1] < bins[0] - 100.0);
    }

    #[test]
    fn silence_hits_the_log_floor() {
        let spectra = segment_and_transform(&[0.0; 4], 16, 60.0).unwrap();
        assert!(spectra[0].bins.iter().all(|&db| (db + 1000.0).abs() < 1e-9));
    }
}
