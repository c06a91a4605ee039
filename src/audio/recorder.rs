use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, SupportedStreamConfig};
use tracing::{error, info};

use crate::config::AudioSettings;
use crate::error::{Error, Result};

use super::wav;

/// How often the capture loop checks whether enough frames have arrived.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Microphone recorder bound to the default input device.
pub struct AudioRecorder {
    device: Device,
    stream_config: SupportedStreamConfig,
    settings: AudioSettings,
}

impl AudioRecorder {
    /// Open the default input device with a configuration matching the
    /// requested sample rate as closely as the hardware allows.
    pub fn from_default_device(settings: AudioSettings) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Device("no default input device found".to_string()))?;

        let stream_config = Self::select_config(&device, settings.sample_rate)?;

        info!(
            "Input device: {} ({}Hz, {} channels)",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            stream_config.sample_rate().0,
            stream_config.channels()
        );

        Ok(Self {
            device,
            stream_config,
            settings,
        })
    }

    /// Pick the supported input configuration whose rate range contains the
    /// target, falling back to the closest maximum rate.
    fn select_config(device: &Device, target_rate: u32) -> Result<SupportedStreamConfig> {
        let ranges: Vec<_> = device
            .supported_input_configs()
            .map_err(|e| Error::Device(format!("failed to query input configs: {e}")))?
            .collect();

        if let Some(range) = ranges
            .iter()
            .find(|r| r.min_sample_rate().0 <= target_rate && target_rate <= r.max_sample_rate().0)
        {
            return Ok(range.clone().with_sample_rate(cpal::SampleRate(target_rate)));
        }

        // No range contains the target; take the closest available rate.
        let closest = ranges
            .into_iter()
            .min_by_key(|r| r.max_sample_rate().0.abs_diff(target_rate))
            .ok_or_else(|| Error::Device("input device reports no configurations".to_string()))?;
        let rate = closest.max_sample_rate();
        Ok(closest.with_sample_rate(rate))
    }

    /// Capture exactly `round(duration * sample_rate)` frames of 16-bit PCM,
    /// interleaved at the configured channel count.
    ///
    /// Blocks for the full duration. A zero duration returns immediately with
    /// an empty buffer.
    pub fn record(&self, duration: Duration) -> Result<Vec<i16>> {
        let frames = (duration.as_secs_f64() * self.settings.sample_rate as f64).round() as usize;
        if frames == 0 {
            return Ok(Vec::new());
        }

        let device_channels = self.stream_config.channels();
        let device_target = frames * device_channels as usize;

        let buffer = Arc::new(Mutex::new(Vec::<i16>::with_capacity(device_target)));
        let failed = Arc::new(AtomicBool::new(false));

        let stream = self.build_stream(Arc::clone(&buffer), Arc::clone(&failed))?;
        stream
            .play()
            .map_err(|e| Error::Device(format!("failed to start input stream: {e}")))?;

        loop {
            std::thread::sleep(POLL_INTERVAL);
            if failed.load(Ordering::SeqCst) {
                return Err(Error::Device("input stream error during capture".to_string()));
            }
            let captured = buffer
                .lock()
                .map(|b| b.len())
                .map_err(|_| Error::Capture("audio buffer poisoned".to_string()))?;
            if captured >= device_target {
                break;
            }
        }
        drop(stream);

        let mut samples = buffer
            .lock()
            .map_err(|_| Error::Capture("audio buffer poisoned".to_string()))?
            .split_off(0);
        samples.truncate(device_target);

        let mut samples = convert_channels(samples, device_channels, self.settings.channels);
        samples.truncate(frames * self.settings.channels as usize);
        Ok(samples)
    }

    fn build_stream(
        &self,
        buffer: Arc<Mutex<Vec<i16>>>,
        failed: Arc<AtomicBool>,
    ) -> Result<cpal::Stream> {
        let config = self.stream_config.config();
        let err_fn = move |e| {
            error!("Input stream error: {}", e);
            failed.store(true, Ordering::SeqCst);
        };

        let stream = match self.stream_config.sample_format() {
            SampleFormat::I16 => self
                .device
                .build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend_from_slice(data);
                        }
                    },
                    err_fn,
                    None,
                ),
            SampleFormat::U16 => self
                .device
                .build_input_stream(
                    &config,
                    move |data: &[u16], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend(data.iter().map(|&s| (s as i32 - 32768) as i16));
                        }
                    },
                    err_fn,
                    None,
                ),
            SampleFormat::F32 => self
                .device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend(data.iter().map(|&s| {
                                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
                            }));
                        }
                    },
                    err_fn,
                    None,
                ),
            other => {
                return Err(Error::Device(format!(
                    "unsupported input sample format: {other:?}"
                )))
            }
        };

        stream.map_err(|e| Error::Device(format!("failed to build input stream: {e}")))
    }
}

/// Convert interleaved samples between channel layouts.
///
/// Stereo input is folded to mono by summing with clamping; mono input is
/// duplicated across stereo channels. Matching layouts pass through.
fn convert_channels(samples: Vec<i16>, from: u16, to: u16) -> Vec<i16> {
    match (from, to) {
        (f, t) if f == t => samples,
        (2, 1) => samples
            .chunks_exact(2)
            .map(|pair| {
                let sum = pair[0] as i32 + pair[1] as i32;
                sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16
            })
            .collect(),
        (1, 2) => samples.iter().flat_map(|&s| [s, s]).collect(),
        (f, 1) => samples
            .chunks_exact(f as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16
            })
            .collect(),
        // Unusual layouts: keep the first `to` channels of each frame,
        // zero-filling if the device has fewer.
        (f, t) => samples
            .chunks_exact(f as usize)
            .flat_map(|frame| (0..t as usize).map(move |i| frame.get(i).copied().unwrap_or(0)))
            .collect(),
    }
}

/// Record from the default microphone for `duration` and write the capture
/// to `path` as a PCM WAV file.
pub fn record_audio(path: &Path, duration: Duration, settings: &AudioSettings) -> Result<()> {
    info!(
        "Recording audio to {} for {:.1}s ...",
        path.display(),
        duration.as_secs_f64()
    );

    let recorder = AudioRecorder::from_default_device(settings.clone())?;
    let samples = recorder.record(duration)?;
    wav::write_wav(path, &samples, settings)
}
