// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use std::time::Instant;

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    pub path: String, // PipeWire target ("pipewire-serial-N", "pipewire-N", empty = default)
    pub metadata_path: Option<String>, // PipeWire node ID, used for format enumeration
}

impl CameraDevice {
    /// The PipeWire default camera (empty path lets PipeWire auto-select)
    pub fn pipewire_default() -> Self {
        Self {
            name: crate::constants::devices::DEFAULT_CAMERA_NAME.to_string(),
            path: String::new(),
            metadata_path: None,
        }
    }
}

/// Framerate as a fraction (numerator/denominator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Framerate {
    pub num: u32,
    pub denom: u32,
}

impl Framerate {
    /// Create a new framerate from a fraction
    pub fn new(num: u32, denom: u32) -> Self {
        Self {
            num,
            denom: denom.max(1),
        }
    }

    /// Create a framerate from an integer fps value
    pub fn from_int(fps: u32) -> Self {
        Self::new(fps, 1)
    }

    /// Get the framerate as a floating point value
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.denom as f64
    }

    /// Get the framerate rounded to the nearest integer
    pub fn as_int(&self) -> u32 {
        self.as_f64().round() as u32
    }

    /// Format as a GStreamer fraction ("30/1", "60000/1001")
    pub fn as_gst_fraction(&self) -> String {
        format!("{}/{}", self.num, self.denom)
    }
}

impl std::fmt::Display for Framerate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{:.2}", self.as_f64())
        }
    }
}

/// Capture format offered by a camera
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub framerate: Option<Framerate>, // None = device negotiates (libcamera sources)
    pub pixel_format: String,         // FourCC code (e.g., "MJPG", "H264", "YUY2")
}

impl CameraFormat {
    /// Whether frames in this format must be decoded before conversion
    pub fn is_compressed(&self) -> bool {
        matches!(
            self.pixel_format.as_str(),
            "MJPG" | "MJPEG" | "JPEG" | "H264"
        )
    }
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.framerate {
            Some(fps) => write!(
                f,
                "{}x{}@{}fps ({})",
                self.width, self.height, fps, self.pixel_format
            ),
            None => write!(f, "{}x{} ({})", self.width, self.height, self.pixel_format),
        }
    }
}

/// Decoded preview frame, ready for display
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA image handle (cheap to clone)
    pub handle: cosmic::widget::image::Handle,
    pub captured_at: Instant,
}

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<PreviewFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to build or start a pipeline
    InitializationFailed(String),
    /// Device not found
    DeviceNotFound(String),
    /// Pipeline reported an error while running
    StreamError(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::StreamError(msg) => write!(f, "Stream error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framerate_ntsc_rounds() {
        let fps = Framerate::new(60000, 1001);
        assert_eq!(fps.as_int(), 60);
        assert_eq!(fps.as_gst_fraction(), "60000/1001");
    }

    #[test]
    fn test_framerate_zero_denominator() {
        assert_eq!(Framerate::new(30, 0).denom, 1);
    }

    #[test]
    fn test_format_display() {
        let format = CameraFormat {
            width: 1920,
            height: 1080,
            framerate: Some(Framerate::from_int(60)),
            pixel_format: "MJPG".to_string(),
        };
        assert_eq!(format.to_string(), "1920x1080@60fps (MJPG)");
        assert!(format.is_compressed());
    }

    #[test]
    fn test_stream_error_display() {
        let err = BackendError::StreamError("Device disconnected".to_string());
        assert_eq!(err.to_string(), "Stream error: Device disconnected");
    }
}
