use std::fmt;

use super::pitch;
use crate::error::{NoteGridError, Result};

const MAJOR_INTERVALS: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_INTERVALS: [i32; 7] = [0, 2, 3, 5, 7, 8, 10];

const OCTAVES: i32 = 8;

/// Bass band: 30-200 Hz, both ends inclusive.
pub const BASS_MIN_HZ: f64 = 30.0;
pub const BAND_SPLIT_HZ: f64 = 200.0;
/// Higher band: above 200 Hz up to 4186 Hz (C8).
pub const HIGHER_MAX_HZ: f64 = 4186.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    Bass,
    Higher,
}

impl Band {
    pub const ALL: [Band; 2] = [Band::Bass, Band::Higher];

    pub fn name(&self) -> &'static str {
        match self {
            Band::Bass => "bass",
            Band::Higher => "higher",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scale frequencies split by register, each list in ascending order.
#[derive(Clone, Debug)]
pub struct ScaleFrequencies {
    pub bass: Vec<f64>,
    pub higher: Vec<f64>,
}

impl ScaleFrequencies {
    pub fn band(&self, band: Band) -> &[f64] {
        match band {
            Band::Bass => &self.bass,
            Band::Higher => &self.higher,
        }
    }
}

/// Equal-tempered frequencies of `key` major (or natural minor) across
/// eight octaves, partitioned into the bass and higher bands.
pub fn generate(key: &str, is_major: bool) -> Result<ScaleFrequencies> {
    let key_index = pitch::pitch_class(key)
        .ok_or_else(|| NoteGridError::InvalidKey(key.to_string()))? as i32;
    let intervals = if is_major {
        &MAJOR_INTERVALS
    } else {
        &MINOR_INTERVALS
    };

    let mut bass = Vec::new();
    let mut higher = Vec::new();
    for octave in 0..OCTAVES {
        for interval in intervals {
            let freq = pitch::number_to_frequency(key_index + interval + octave * 12);
            if (BASS_MIN_HZ..=BAND_SPLIT_HZ).contains(&freq) {
                bass.push(freq);
            } else if freq > BAND_SPLIT_HZ && freq <= HIGHER_MAX_HZ {
                higher.push(freq);
            }
        }
    }

    if bass.is_empty() {
        return Err(NoteGridError::EmptyFrequencyBand(Band::Bass));
    }
    if higher.is_empty() {
        return Err(NoteGridError::EmptyFrequencyBand(Band::Higher));
    }

    log::debug!(
        "Scale {} {}: {} bass, {} higher frequencies",
        key,
        if is_major { "major" } else { "minor" },
        bass.len(),
        higher.len()
    );

    Ok(ScaleFrequencies { bass, higher })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::pitch::{frequency_to_pitch_name, NOTE_NAMES};

    #[test]
    fn every_key_and_mode_fills_both_bands() {
        for key in NOTE_NAMES {
            for is_major in [true, false] {
                let scale = generate(key, is_major).unwrap();
                assert!(!scale.bass.is_empty(), "{} major={}", key, is_major);
                assert!(!scale.higher.is_empty(), "{} major={}", key, is_major);
            }
        }
    }

    #[test]
    fn bands_are_sorted_and_disjoint() {
        let scale = generate("D", true).unwrap();
        assert!(scale.bass.windows(2).all(|w| w[0] < w[1]));
        assert!(scale.higher.windows(2).all(|w| w[0] < w[1]));
        assert!(scale.bass.iter().all(|&f| (30.0..=200.0).contains(&f)));
        assert!(scale.higher.iter().all(|&f| f > 200.0 && f <= 4186.0));
    }

    #[test]
    fn d_major_bass_starts_on_b0() {
        // A0 (27.5 Hz) falls below the band, B0 (30.9 Hz) is the first point in it.
        let scale = generate("D", true).unwrap();
        assert_eq!(frequency_to_pitch_name(scale.bass[0]).unwrap().to_string(), "B0");
        assert_eq!(frequency_to_pitch_name(scale.bass[1]).unwrap().to_string(), "D-1");
        assert_eq!(frequency_to_pitch_name(scale.bass[2]).unwrap().to_string(), "D1");
    }

    #[test]
    fn minor_uses_flat_third() {
        let scale = generate("A", false).unwrap();
        let names: Vec<String> = scale
            .higher
            .iter()
            .map(|&f| frequency_to_pitch_name(f).unwrap().to_string())
            .collect();
        assert!(names.contains(&"C4".to_string()));
        assert!(!names.contains(&"D-4".to_string()));
    }

    #[test]
    fn sharp_key_matches_flat_key() {
        let sharp = generate("F#", true).unwrap();
        let flat = generate("G-", true).unwrap();
        assert_eq!(sharp.bass, flat.bass);
        assert_eq!(sharp.higher, flat.higher);
    }

    #[test]
    fn rejects_unknown_key() {
        assert!(matches!(
            generate("H", true),
            Err(NoteGridError::InvalidKey(k)) if k == "H"
        ));
    }
}
