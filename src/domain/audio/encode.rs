//! Container encoding for synthesized PCM.
//!
//! The engine produces mono f32 samples; this module packs them into the
//! requested container. The container is written at the sample rate the
//! client asked for; no resampling is performed.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Output containers the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
}

impl AudioFormat {
    pub const ALL: &'static [AudioFormat] = &[AudioFormat::Wav, AudioFormat::Mp3, AudioFormat::Flac];

    /// Parse a client-supplied format name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Flac => "flac",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Flac => "audio/flac",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Encode mono f32 samples into the requested container.
pub fn encode(samples: &[f32], sample_rate: u32, format: AudioFormat) -> Result<Vec<u8>> {
    match format {
        AudioFormat::Wav => encode_wav(samples, sample_rate),
        AudioFormat::Mp3 => encode_mp3(samples, sample_rate),
        AudioFormat::Flac => encode_flac(samples, sample_rate),
    }
}

/// Map [-1.0, 1.0] f32 samples to i16 with saturation.
fn pcm_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
    for sample in pcm_i16(samples) {
        writer.write_sample(sample).context("Failed to write WAV sample")?;
    }
    writer.finalize().context("Failed to finalize WAV stream")?;

    Ok(cursor.into_inner())
}

fn encode_mp3(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    use mp3lame_encoder::{Builder, FlushNoGap, MonoPcm};

    let pcm = pcm_i16(samples);

    let mut builder = Builder::new().ok_or_else(|| anyhow!("Failed to create LAME builder"))?;
    builder
        .set_num_channels(1)
        .map_err(|e| anyhow!("LAME channels: {:?}", e))?;
    builder
        .set_sample_rate(sample_rate)
        .map_err(|e| anyhow!("LAME sample rate: {:?}", e))?;
    builder
        .set_brate(mp3lame_encoder::Birtate::Kbps128)
        .map_err(|e| anyhow!("LAME bitrate: {:?}", e))?;
    builder
        .set_quality(mp3lame_encoder::Quality::Good)
        .map_err(|e| anyhow!("LAME quality: {:?}", e))?;
    let mut encoder = builder
        .build()
        .map_err(|e| anyhow!("Failed to initialize LAME encoder: {:?}", e))?;

    let mut out = Vec::new();
    out.reserve(mp3lame_encoder::max_required_buffer_size(pcm.len()));

    let written = encoder
        .encode(MonoPcm(&pcm), out.spare_capacity_mut())
        .map_err(|e| anyhow!("MP3 encode failed: {:?}", e))?;
    // Safety: `encode` initialized `written` bytes of the spare capacity.
    unsafe { out.set_len(out.len() + written) };

    let written = encoder
        .flush::<FlushNoGap>(out.spare_capacity_mut())
        .map_err(|e| anyhow!("MP3 flush failed: {:?}", e))?;
    // Safety: `flush` initialized `written` bytes of the spare capacity.
    unsafe { out.set_len(out.len() + written) };

    Ok(out)
}

fn encode_flac(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    use flacenc::bitsink::ByteSink;
    use flacenc::component::BitRepr;
    use flacenc::error::Verify;

    let pcm: Vec<i32> = pcm_i16(samples).into_iter().map(i32::from).collect();

    let config = flacenc::config::Encoder::default()
        .into_verified()
        .map_err(|e| anyhow!("FLAC encoder config rejected: {:?}", e))?;
    let source = flacenc::source::MemSource::from_samples(&pcm, 1, 16, sample_rate as usize);
    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| anyhow!("FLAC encode failed: {:?}", e))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| anyhow!("FLAC stream write failed: {:?}", e))?;

    Ok(sink.as_slice().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sine(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect()
    }

    #[test]
    fn parse_accepts_known_formats_case_insensitive() {
        assert_eq!(AudioFormat::parse("wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::parse("MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse("Flac"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::parse("ogg"), None);
        assert_eq!(AudioFormat::parse(""), None);
    }

    #[test]
    fn wav_output_is_riff_at_requested_rate() {
        let bytes = encode(&sine(2400), 24000, AudioFormat::Wav).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let reader = hound::WavReader::new(std::io::Cursor::new(&bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 2400);
    }

    #[test]
    fn wav_encoding_is_deterministic() {
        let samples = sine(1000);
        let a = encode(&samples, 24000, AudioFormat::Wav).unwrap();
        let b = encode(&samples, 24000, AudioFormat::Wav).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mp3_output_has_frame_data() {
        let bytes = encode(&sine(24000), 24000, AudioFormat::Mp3).unwrap();
        assert!(!bytes.is_empty());
        // MP3 streams from LAME start with either an ID3 tag or a frame sync.
        let id3 = bytes.starts_with(b"ID3");
        let frame_sync = bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0;
        assert!(id3 || frame_sync, "unexpected MP3 leader: {:02x?}", &bytes[..4]);
    }

    #[test]
    fn flac_output_has_stream_marker() {
        let bytes = encode(&sine(4800), 24000, AudioFormat::Flac).unwrap();
        assert_eq!(&bytes[..4], b"fLaC");
    }

    #[test]
    fn pcm_i16_saturates() {
        let out = pcm_i16(&[0.0, 1.0, -1.0, 2.0, -2.0]);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], i16::MAX);
        assert_eq!(out[3], i16::MAX);
        assert!(out[2] <= -i16::MAX);
        assert!(out[4] <= -i16::MAX);
    }
}
