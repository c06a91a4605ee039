use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::ScreenSettings;
use crate::error::Result;

use super::encoder::{FfmpegEncoder, FrameSink};
use super::frame::{DisplaySource, FrameSource};

/// Capture `round(duration * fps)` frames from `source` into `sink`.
///
/// Each tick is padded to `1/fps` when grab-and-encode finishes early. A step
/// that runs longer than `1/fps` is not compensated afterwards, so total
/// wall-clock time can exceed `duration`: the contract is a best-effort fixed
/// frame count, not a fixed recording length.
///
/// Returns the number of frames written. `sink.finish()` is called exactly
/// once, even for a zero-frame recording.
pub fn record_frames(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    duration: Duration,
    fps: u32,
) -> Result<usize> {
    let total = (duration.as_secs_f64() * fps as f64).round() as usize;
    let tick = Duration::from_secs_f64(1.0 / fps.max(1) as f64);

    for _ in 0..total {
        let started = Instant::now();
        let frame = source.grab()?;
        sink.write(&frame)?;
        if let Some(remaining) = tick.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    sink.finish()?;
    Ok(total)
}

/// Record the primary display for `duration` and write the capture to `path`
/// as an AVI file.
pub fn record_screen(path: &Path, duration: Duration, settings: &ScreenSettings) -> Result<()> {
    info!(
        "Recording screen to {} for {:.1}s ...",
        path.display(),
        duration.as_secs_f64()
    );

    let mut source = DisplaySource::primary()?;
    let mut encoder = FfmpegEncoder::new(path, settings.fps);
    record_frames(&mut source, &mut encoder, duration, settings.fps)?;
    Ok(())
}
