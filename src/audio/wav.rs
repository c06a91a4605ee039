use std::path::Path;

use tracing::info;

use crate::config::AudioSettings;
use crate::error::Result;

/// Write interleaved 16-bit PCM samples as a canonical uncompressed WAV file
/// (RIFF header, `fmt ` chunk, little-endian `data` chunk).
///
/// An empty sample slice produces a valid header-only file.
pub fn write_wav(path: &Path, samples: &[i16], settings: &AudioSettings) -> Result<()> {
    let spec = hound::WavSpec {
        channels: settings.channels,
        sample_rate: settings.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!(
        "Audio saved: {} ({} frames, {}Hz, {} channels)",
        path.display(),
        samples.len() / settings.channels as usize,
        settings.sample_rate,
        settings.channels
    );

    Ok(())
}
