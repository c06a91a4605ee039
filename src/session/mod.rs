//! Session orchestration
//!
//! This module provides:
//! - Artifact path derivation from the session prefix
//! - The concurrent capture coordinator (audio + screen, join semantics)
//! - The `Session` orchestrator sequencing capture, transcription,
//!   summarization, activity tracking, and persistence

mod capture;
mod paths;
mod runner;

pub use capture::{join_captures, CaptureBackend, CaptureResult, DeviceCapture};
pub use paths::SessionPaths;
pub use runner::Session;
