pub mod activity;
pub mod audio;
pub mod config;
pub mod error;
pub mod screen;
pub mod session;
pub mod summarize;
pub mod transcribe;

pub use activity::{track_activity, ActivitySample, WindowQuery, UNKNOWN_TITLE};
pub use config::{ApiCredentials, Config, API_KEY_VAR};
pub use error::{Error, Result};
pub use screen::{record_frames, Frame, FrameSink, FrameSource};
pub use session::{join_captures, CaptureBackend, CaptureResult, Session, SessionPaths};
pub use summarize::Summarizer;
pub use transcribe::Transcriber;
