// Integration tests for the screen capture loop
//
// These tests drive record_frames with double sources and sinks to verify
// the fixed-frame-count contract without touching a real display or codec.

use std::time::Duration;

use deskscribe::error::Error;
use deskscribe::screen::{record_frames, Frame, FrameSink, FrameSource};

/// Produces tiny synthetic frames instantly.
struct SyntheticSource {
    grabs: usize,
    fail_on: Option<usize>,
}

impl SyntheticSource {
    fn new() -> Self {
        Self {
            grabs: 0,
            fail_on: None,
        }
    }

    fn failing_on(grab: usize) -> Self {
        Self {
            grabs: 0,
            fail_on: Some(grab),
        }
    }
}

impl FrameSource for SyntheticSource {
    fn grab(&mut self) -> deskscribe::Result<Frame> {
        self.grabs += 1;
        if self.fail_on == Some(self.grabs) {
            return Err(Error::Capture("display surface lost".to_string()));
        }
        Ok(Frame {
            width: 4,
            height: 2,
            data: vec![0u8; 4 * 2 * 4],
        })
    }
}

/// Counts writes and finishes instead of encoding.
#[derive(Default)]
struct CountingSink {
    written: usize,
    finished: usize,
}

impl FrameSink for CountingSink {
    fn write(&mut self, frame: &Frame) -> deskscribe::Result<()> {
        assert_eq!(frame.data.len(), (frame.width * frame.height * 4) as usize);
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> deskscribe::Result<()> {
        self.finished += 1;
        Ok(())
    }
}

#[test]
fn test_frame_count_equals_duration_times_fps() {
    let mut source = SyntheticSource::new();
    let mut sink = CountingSink::default();

    let written = record_frames(&mut source, &mut sink, Duration::from_secs(3), 10).unwrap();

    assert_eq!(written, 30, "3 seconds at 10fps is exactly 30 frames");
    assert_eq!(sink.written, 30);
    assert_eq!(sink.finished, 1, "finish() must be called exactly once");
}

#[test]
fn test_fractional_duration_rounds_frame_count() {
    let mut source = SyntheticSource::new();
    let mut sink = CountingSink::default();

    // 0.26s * 10fps = 2.6 -> rounds to 3
    let written =
        record_frames(&mut source, &mut sink, Duration::from_millis(260), 10).unwrap();

    assert_eq!(written, 3);
    assert_eq!(sink.written, 3);
}

#[test]
fn test_zero_duration_writes_no_frames_but_finalizes() {
    let mut source = SyntheticSource::new();
    let mut sink = CountingSink::default();

    let written = record_frames(&mut source, &mut sink, Duration::ZERO, 20).unwrap();

    assert_eq!(written, 0);
    assert_eq!(sink.written, 0);
    assert_eq!(sink.finished, 1, "Even an empty recording is finalized");
}

#[test]
fn test_source_failure_aborts_recording() {
    let mut source = SyntheticSource::failing_on(3);
    let mut sink = CountingSink::default();

    let result = record_frames(&mut source, &mut sink, Duration::from_millis(500), 20);

    match result {
        Err(Error::Capture(msg)) => assert!(msg.contains("display")),
        other => panic!("Expected a capture error, got {other:?}"),
    }
    assert_eq!(sink.written, 2, "Frames before the failure are already written");
    assert_eq!(sink.finished, 0, "A failed recording is not finalized");
}
