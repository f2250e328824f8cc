use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Keep at most the first `seconds` of audio.
    pub fn truncate(&mut self, seconds: f32) {
        let max_samples = (seconds.max(0.0) as f64 * self.sample_rate as f64) as usize;
        if self.samples.len() > max_samples {
            self.samples.truncate(max_samples);
        }
    }
}

/// Decode an audio file to mono samples, optionally keeping only the first
/// `max_duration` seconds.
pub fn decode_audio(path: &Path, max_duration: Option<f32>) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;
    if sample_rate == 0 {
        anyhow::bail!("Invalid sample rate 0 in {}", path.display());
    }
    let max_samples = max_duration.map(|secs| (secs.max(0.0) as f64 * sample_rate as f64) as usize);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        if max_samples.is_some_and(|max| all_samples.len() >= max) {
            break;
        }

        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        let channels = spec.channels.count().max(1);

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        downmix_into(&mut all_samples, samples, channels);
    }

    let mut audio = AudioData {
        samples: all_samples,
        sample_rate,
    };
    if let Some(secs) = max_duration {
        audio.truncate(secs);
    }
    if audio.samples.is_empty() {
        anyhow::bail!("No audio samples decoded from {}", path.display());
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.1}s",
        audio.samples.len(),
        audio.sample_rate,
        audio.duration()
    );

    Ok(audio)
}

/// Average interleaved frames of `channels` samples into mono.
fn downmix_into(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
    } else {
        for frame_samples in interleaved.chunks(channels) {
            let mono: f32 = frame_samples.iter().sum::<f32>() / channels as f32;
            out.push(mono);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downmix_averages_stereo_frames() {
        let mut out = Vec::new();
        downmix_into(&mut out, &[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_passes_mono_through() {
        let mut out = vec![0.25];
        downmix_into(&mut out, &[1.0, 2.0], 1);
        assert_eq!(out, vec![0.25, 1.0, 2.0]);
    }

    #[test]
    fn truncate_keeps_leading_samples() {
        let mut audio = AudioData {
            samples: (0..100).map(|i| i as f32).collect(),
            sample_rate: 10,
        };
        audio.truncate(2.5);
        assert_eq!(audio.samples.len(), 25);
        assert_eq!(audio.samples[24], 24.0);
        assert!((audio.duration() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn truncate_past_end_is_noop() {
        let mut audio = AudioData {
            samples: vec![0.0; 10],
            sample_rate: 10,
        };
        audio.truncate(27.0);
        assert_eq!(audio.samples.len(), 10);
    }

    #[test]
    fn missing_file_fails() {
        let path = std::env::temp_dir().join("notegrid-does-not-exist.wav");
        assert!(decode_audio(&path, None).is_err());
    }
}
