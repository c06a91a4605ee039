use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{info, warn};

use crate::error::{Error, Result};

use super::frame::Frame;

/// Destination for captured frames.
pub trait FrameSink {
    /// Append one frame to the output. Blocking.
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close the output. Must be called exactly once, after the
    /// last frame.
    fn finish(&mut self) -> Result<()>;
}

/// Locate the ffmpeg executable: `FFMPEG_PATH` if set, otherwise whatever
/// `ffmpeg` resolves to on the system PATH.
pub fn find_ffmpeg() -> PathBuf {
    std::env::var_os("FFMPEG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ffmpeg"))
}

/// Encodes raw RGBA frames into an XVID-tagged AVI container by piping them
/// through an ffmpeg subprocess.
///
/// The subprocess is spawned lazily on the first frame, which fixes the video
/// dimensions for the rest of the recording.
pub struct FfmpegEncoder {
    output: PathBuf,
    fps: u32,
    child: Option<Child>,
    dimensions: Option<(u32, u32)>,
}

impl FfmpegEncoder {
    pub fn new(output: &Path, fps: u32) -> Self {
        Self {
            output: output.to_path_buf(),
            fps,
            child: None,
            dimensions: None,
        }
    }

    fn spawn(&mut self, width: u32, height: u32) -> Result<()> {
        let ffmpeg = find_ffmpeg();
        let child = Command::new(&ffmpeg)
            .args([
                "-loglevel",
                "error",
                "-y",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-video_size",
                &format!("{width}x{height}"),
                "-framerate",
                &self.fps.to_string(),
                "-i",
                "pipe:0",
                "-c:v",
                "mpeg4",
                "-vtag",
                "XVID",
                "-q:v",
                "5",
            ])
            .arg(&self.output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::Capture(format!(
                    "ffmpeg executable not found at {} (install ffmpeg or set FFMPEG_PATH)",
                    ffmpeg.display()
                )),
                _ => Error::Capture(format!("failed to start ffmpeg: {e}")),
            })?;

        info!(
            "Encoding screen capture to {} ({}x{} @ {}fps)",
            self.output.display(),
            width,
            height,
            self.fps
        );

        self.child = Some(child);
        self.dimensions = Some((width, height));
        Ok(())
    }
}

impl FrameSink for FfmpegEncoder {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        if self.child.is_none() {
            self.spawn(frame.width, frame.height)?;
        }

        if self.dimensions != Some((frame.width, frame.height)) {
            return Err(Error::Capture(format!(
                "frame size changed mid-recording: expected {:?}, got {}x{}",
                self.dimensions, frame.width, frame.height
            )));
        }

        let stdin = self
            .child
            .as_mut()
            .and_then(|c| c.stdin.as_mut())
            .ok_or_else(|| Error::Capture("ffmpeg stdin closed".to_string()))?;

        stdin
            .write_all(&frame.data)
            .map_err(|e| Error::Capture(format!("failed to feed frame to ffmpeg: {e}")))
    }

    fn finish(&mut self) -> Result<()> {
        match self.child.take() {
            Some(mut child) => {
                // Closing stdin signals end of input.
                drop(child.stdin.take());

                let output = child
                    .wait_with_output()
                    .map_err(|e| Error::Capture(format!("failed to wait for ffmpeg: {e}")))?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    return Err(Error::Capture(format!(
                        "ffmpeg exited with {}: {}",
                        output.status,
                        stderr.trim()
                    )));
                }

                info!("Screen recording saved: {}", self.output.display());
                Ok(())
            }
            None => {
                // No frames were captured; leave an empty placeholder so the
                // artifact set stays complete.
                warn!(
                    "No frames captured, writing empty video file: {}",
                    self.output.display()
                );
                std::fs::File::create(&self.output)?;
                Ok(())
            }
        }
    }
}
