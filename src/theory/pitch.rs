use std::fmt;

use crate::error::{NoteGridError, Result};

/// Reference pitch for A4.
pub const A440: f64 = 440.0;
/// Pitch number of A4.
pub const A4_NUMBER: i32 = 69;

/// Pitch-class names indexed by semitone above C. Flats are preferred.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "D-", "D", "E-", "E", "F", "G-", "G", "A-", "A", "B-", "B",
];

/// Sharp spellings accepted on input, mapped to the flat names above.
const NOTE_ALIASES: [(&str, &str); 5] = [
    ("A#", "B-"),
    ("C#", "D-"),
    ("D#", "E-"),
    ("F#", "G-"),
    ("G#", "A-"),
];

/// Lowest and highest octave a pitch name may carry.
pub const MIN_OCTAVE: i32 = 0;
pub const MAX_OCTAVE: i32 = 7;

/// A pitch spelled as note letter, optional flat, and octave (e.g. `E-4`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PitchName {
    pub pitch_class: usize,
    pub octave: i32,
}

impl PitchName {
    pub fn note(&self) -> &'static str {
        NOTE_NAMES[self.pitch_class]
    }

    pub fn number(&self) -> i32 {
        (self.octave + 1) * 12 + self.pitch_class as i32
    }
}

impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note(), self.octave)
    }
}

/// Look up the pitch class of a note name, accepting sharp aliases.
pub fn pitch_class(note: &str) -> Option<usize> {
    let canonical = NOTE_ALIASES
        .iter()
        .find(|(sharp, _)| *sharp == note)
        .map_or(note, |(_, flat)| *flat);
    NOTE_NAMES.iter().position(|&name| name == canonical)
}

/// Frequency in Hz of a pitch number.
pub fn number_to_frequency(number: i32) -> f64 {
    A440 * 2f64.powf((number - A4_NUMBER) as f64 / 12.0)
}

/// Nearest pitch number to a frequency.
pub fn frequency_to_number(freq: f64) -> Result<i32> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(NoteGridError::MalformedInput(format!(
            "frequency must be positive, got {}",
            freq
        )));
    }
    Ok((12.0 * (freq / A440).log2() + A4_NUMBER as f64).round() as i32)
}

pub fn number_to_pitch_name(number: i32) -> PitchName {
    PitchName {
        pitch_class: number.rem_euclid(12) as usize,
        octave: number.div_euclid(12) - 1,
    }
}

pub fn frequency_to_pitch_name(freq: f64) -> Result<PitchName> {
    frequency_to_number(freq).map(number_to_pitch_name)
}

/// Parse a pitch name of the form `[A-G](#|-)?[0-7]`.
pub fn parse_pitch_name(name: &str) -> Result<PitchName> {
    let invalid = || NoteGridError::InvalidPitchName(name.to_string());

    let bytes = name.as_bytes();
    let (note, digit) = match bytes {
        [b'A'..=b'G', digit] => (&name[..1], *digit),
        [b'A'..=b'G', b'#' | b'-', digit] => (&name[..2], *digit),
        _ => return Err(invalid()),
    };
    let octave = (digit as char).to_digit(10).ok_or_else(invalid)? as i32;
    if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
        return Err(invalid());
    }

    // "F-" and "C-" are matched by the pattern but have no table entry.
    let pitch_class = pitch_class(note).ok_or_else(invalid)?;
    Ok(PitchName { pitch_class, octave })
}

pub fn pitch_name_to_number(name: &str) -> Result<i32> {
    parse_pitch_name(name).map(|pitch| pitch.number())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a440_is_a4() {
        let name = frequency_to_pitch_name(440.0).unwrap();
        assert_eq!(name.to_string(), "A4");
        assert_eq!(name.number(), 69);
    }

    #[test]
    fn rounds_to_nearest_semitone() {
        assert_eq!(frequency_to_pitch_name(261.0).unwrap().to_string(), "C4");
        assert_eq!(frequency_to_pitch_name(277.0).unwrap().to_string(), "D-4");
        assert_eq!(frequency_to_pitch_name(73.42).unwrap().to_string(), "D2");
    }

    #[test]
    fn sharps_normalize_to_flats() {
        assert_eq!(pitch_name_to_number("C#4").unwrap(), 61);
        assert_eq!(pitch_name_to_number("D-4").unwrap(), 61);
        assert_eq!(pitch_name_to_number("A#0").unwrap(), 22);
    }

    #[test]
    fn names_round_trip_through_numbers() {
        for number in 12..=107 {
            let name = number_to_pitch_name(number).to_string();
            assert_eq!(pitch_name_to_number(&name).unwrap(), number, "{}", name);
        }
    }

    #[test]
    fn frequencies_round_trip_through_numbers() {
        for number in 12..=107 {
            let freq = number_to_frequency(number);
            assert_eq!(frequency_to_pitch_name(freq).unwrap().number(), number);
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["H4", "C8", "c4", "C", "C##4", "Cb4", "C-4", "C44", "", "E#4"] {
            assert_eq!(
                pitch_name_to_number(bad),
                Err(NoteGridError::InvalidPitchName(bad.to_string())),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn rejects_non_positive_frequency() {
        assert!(matches!(
            frequency_to_pitch_name(0.0),
            Err(NoteGridError::MalformedInput(_))
        ));
        assert!(frequency_to_pitch_name(f64::NAN).is_err());
    }
}
