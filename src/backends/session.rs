// SPDX-License-Identifier: MPL-2.0

//! Capture session: one video preview plus optional audio monitoring
//!
//! A session lives from Play to Stop. Video is required; if the microphone
//! cannot be opened the session keeps running without sound.

use super::audio::{AudioDevice, AudioMonitor};
use super::camera::pipewire::{VideoPipeline, query_pipewire_formats};
use super::camera::types::*;
use crate::constants::capture;
use std::cmp::Ordering;
use tracing::{info, warn};

/// Everything needed to start a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub video: CameraDevice,
    pub audio: Option<AudioDevice>,
    pub target_width: u32,
    pub target_height: u32,
    /// Monitor gain (0.0 = silent, 1.0 = unity)
    pub monitor_volume: f64,
}

impl SessionConfig {
    pub fn new(video: CameraDevice, audio: Option<AudioDevice>) -> Self {
        Self {
            video,
            audio,
            target_width: capture::TARGET_WIDTH,
            target_height: capture::TARGET_HEIGHT,
            monitor_volume: crate::constants::pipeline::DEFAULT_MONITOR_VOLUME,
        }
    }
}

/// What a started session ended up with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    /// Format requested from the device, `None` when it picked its own
    pub format: Option<CameraFormat>,
    /// The microphone opened and is being monitored
    pub has_audio: bool,
}

/// Rank of a pixel format in the preference list (lower is better)
fn pixel_format_rank(pixel_format: &str) -> usize {
    capture::PIXEL_FORMAT_PREFERENCE
        .iter()
        .position(|p| *p == pixel_format)
        .unwrap_or(capture::PIXEL_FORMAT_PREFERENCE.len())
}

/// Choose the capture format for a target resolution
///
/// Only exact size matches are considered. The highest framerate wins; equal
/// framerates are decided by [`capture::PIXEL_FORMAT_PREFERENCE`].
pub fn select_capture_format(
    formats: &[CameraFormat],
    width: u32,
    height: u32,
) -> Option<CameraFormat> {
    formats
        .iter()
        .filter(|f| f.width == width && f.height == height)
        .max_by(|a, b| {
            let fps_a = a.framerate.map(|f| f.as_f64()).unwrap_or(0.0);
            let fps_b = b.framerate.map(|f| f.as_f64()).unwrap_or(0.0);
            fps_a
                .partial_cmp(&fps_b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    pixel_format_rank(&b.pixel_format).cmp(&pixel_format_rank(&a.pixel_format))
                })
        })
        .cloned()
}

/// Running capture session
///
/// Dropping the session stops every pipeline and releases the devices.
pub struct CaptureSession {
    video: VideoPipeline,
    audio: Option<AudioMonitor>,
    format: Option<CameraFormat>,
}

impl CaptureSession {
    /// Build and start the session
    ///
    /// Blocks until the video pipeline reaches `Playing` (or times out), so this
    /// must not run on the UI thread.
    pub fn start(config: &SessionConfig, frame_sender: FrameSender) -> BackendResult<Self> {
        info!(video = %config.video.name, audio = ?config.audio.as_ref().map(|a| &a.name), "Starting capture session");

        let format = query_pipewire_formats(&config.video).and_then(|formats| {
            select_capture_format(&formats, config.target_width, config.target_height)
        });
        match &format {
            Some(format) => info!(format = %format, "Selected capture format"),
            None => warn!(
                width = config.target_width,
                height = config.target_height,
                "Could not find a {}x{} format, using the device default",
                config.target_width,
                config.target_height
            ),
        }

        let video = VideoPipeline::start(&config.video, format.as_ref(), frame_sender)?;

        let audio = config.audio.as_ref().and_then(|device| {
            AudioMonitor::start(device, config.monitor_volume)
                .map_err(|e| warn!(device = %device.name, error = %e, "Audio input unavailable, continuing without sound"))
                .ok()
        });

        info!(has_audio = audio.is_some(), "Capture session running");
        Ok(Self {
            video,
            audio,
            format,
        })
    }

    /// Stop all pipelines and release the devices
    pub fn stop(self) {
        info!("Stopping capture session");
        drop(self);
    }

    /// Change the monitoring gain of the running session
    pub fn set_monitor_volume(&self, volume: f64) {
        if let Some(audio) = &self.audio {
            audio.set_volume(volume);
        }
    }

    /// Check the pipelines for errors
    ///
    /// Returns the video error, which ends the session. An audio error only
    /// drops the monitor.
    pub fn poll_error(&mut self) -> Option<BackendError> {
        if let Some(error) = self.audio.as_ref().and_then(AudioMonitor::poll_error) {
            warn!(error = %error, "Audio monitoring stopped");
            self.audio = None;
        }
        self.video.poll_error().map(BackendError::StreamError)
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Format negotiated at start, `None` when the device picked its own
    pub fn format(&self) -> Option<&CameraFormat> {
        self.format.as_ref()
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            format: self.format().cloned(),
            has_audio: self.has_audio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(w: u32, h: u32, fps: Option<u32>, pixel_format: &str) -> CameraFormat {
        CameraFormat {
            width: w,
            height: h,
            framerate: fps.map(Framerate::from_int),
            pixel_format: pixel_format.to_string(),
        }
    }

    #[test]
    fn test_highest_framerate_wins() {
        let formats = [
            fmt(1920, 1080, Some(5), "YUY2"),
            fmt(1920, 1080, Some(60), "MJPG"),
            fmt(1920, 1080, Some(30), "MJPG"),
            fmt(3840, 2160, Some(120), "MJPG"),
        ];
        let selected = select_capture_format(&formats, 1920, 1080);
        assert_eq!(selected, Some(fmt(1920, 1080, Some(60), "MJPG")));
    }

    #[test]
    fn test_pixel_format_breaks_ties() {
        let formats = [
            fmt(1920, 1080, Some(30), "H264"),
            fmt(1920, 1080, Some(30), "YUY2"),
            fmt(1920, 1080, Some(30), "MJPG"),
        ];
        let selected = select_capture_format(&formats, 1920, 1080);
        assert_eq!(selected.map(|f| f.pixel_format), Some("MJPG".to_string()));
    }

    #[test]
    fn test_no_exact_match() {
        let formats = [fmt(1280, 720, Some(60), "MJPG")];
        assert_eq!(select_capture_format(&formats, 1920, 1080), None);
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::new(CameraDevice::pipewire_default(), None);
        assert_eq!(
            (config.target_width, config.target_height),
            (capture::TARGET_WIDTH, capture::TARGET_HEIGHT)
        );
        assert_eq!(config.monitor_volume, 1.0);
    }
}
