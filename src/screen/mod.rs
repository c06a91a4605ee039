pub mod encoder;
pub mod frame;
pub mod recorder;

pub use encoder::{FfmpegEncoder, FrameSink};
pub use frame::{DisplaySource, Frame, FrameSource};
pub use recorder::{record_frames, record_screen};
