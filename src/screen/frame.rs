use xcap::Monitor;

use crate::error::{Error, Result};

/// A single captured screen frame, tightly packed RGBA bytes.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Source of screen frames.
///
/// The production implementation grabs screenshots of the primary monitor;
/// tests substitute synthetic sources.
pub trait FrameSource {
    /// Capture one frame. Blocking.
    fn grab(&mut self) -> Result<Frame>;
}

/// Captures full-screen frames from the primary monitor.
pub struct DisplaySource {
    monitor: Monitor,
}

impl DisplaySource {
    pub fn primary() -> Result<Self> {
        let mut monitors =
            Monitor::all().map_err(|e| Error::Capture(format!("failed to enumerate displays: {e}")))?;

        if monitors.is_empty() {
            return Err(Error::Capture("no display available for capture".to_string()));
        }

        let index = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);

        Ok(Self {
            monitor: monitors.swap_remove(index),
        })
    }
}

impl FrameSource for DisplaySource {
    fn grab(&mut self) -> Result<Frame> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|e| Error::Capture(format!("screenshot failed: {e}")))?;

        let (width, height) = (image.width(), image.height());
        Ok(Frame {
            width,
            height,
            data: image.into_raw(),
        })
    }
}
