/// Floor added before taking logarithms so silence never reaches log(0).
pub const LOG_FLOOR: f64 = 1e-50;

/// Log-magnitude spectrum of one sixteenth-note segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    /// dB values, one per real-FFT bin (`segment_len / 2 + 1` of them)
    pub bins: Vec<f64>,
    /// Number of samples in the segment that produced this spectrum
    pub segment_len: usize,
    pub sample_rate: u32,
}

impl Spectrum {
    /// Center frequency of every bin, starting at 0 Hz.
    pub fn frequencies(&self) -> Vec<f64> {
        rfft_frequencies(self.segment_len, self.sample_rate)
    }
}

/// Bin center frequencies of a real forward FFT of `len` samples.
pub fn rfft_frequencies(len: usize, sample_rate: u32) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    let step = sample_rate as f64 / len as f64;
    (0..len / 2 + 1).map(|k| k as f64 * step).collect()
}
