pub mod sampler;

pub use sampler::{track_activity, ActivitySample, ForegroundWindow, WindowQuery, UNKNOWN_TITLE};
