use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Title recorded when no window is focused or the query fails.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One foreground-window observation.
///
/// `timestamp` is wall-clock epoch seconds at the instant of the query, not
/// an ideal grid point: intervals drift by query latency plus sleep overhead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySample {
    pub timestamp: f64,
    pub title: String,
}

/// Query for the currently focused window.
pub trait WindowQuery: Send + Sync {
    /// Title of the foreground window, or `None` when there is no focused
    /// window or the query fails to resolve a title.
    fn active_window_title(&self) -> Option<String>;
}

/// Production window query backed by the operating system.
pub struct ForegroundWindow;

impl WindowQuery for ForegroundWindow {
    fn active_window_title(&self) -> Option<String> {
        active_win_pos_rs::get_active_window()
            .ok()
            .map(|w| w.title)
            .filter(|title| !title.is_empty())
    }
}

/// Poll the foreground window title every `interval` until `duration` has
/// elapsed.
///
/// A failed query is recorded with the [`UNKNOWN_TITLE`] sentinel and never
/// aborts the loop. A zero duration yields an empty log. The returned samples
/// are in capture order with non-decreasing timestamps.
pub fn track_activity(
    query: &dyn WindowQuery,
    duration: Duration,
    interval: Duration,
) -> Vec<ActivitySample> {
    let mut samples = Vec::new();
    let started = Instant::now();

    while started.elapsed() < duration {
        let title = query
            .active_window_title()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let timestamp = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        samples.push(ActivitySample { timestamp, title });
        std::thread::sleep(interval);
    }

    info!("Activity tracking complete: {} samples", samples.len());
    samples
}
