// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Capture format targets
pub mod capture {
    /// Width the capture format is matched against (best effort)
    pub const TARGET_WIDTH: u32 = 1920;

    /// Height the capture format is matched against (best effort)
    pub const TARGET_HEIGHT: u32 = 1080;

    /// Common frame rates offered when format enumeration fails
    pub const COMMON_FRAMERATES: &[u32] = &[30, 60, 15, 24];

    /// Resolutions offered when format enumeration fails
    pub const FALLBACK_RESOLUTIONS: &[(u32, u32)] = &[
        (3840, 2160), // 4K
        (1920, 1080), // 1080p
        (1280, 720),  // 720p
        (640, 480),   // VGA
    ];

    /// Pixel formats in order of preference when several match the target size
    ///
    /// MJPG first: USB capture cards usually only reach full framerate at 1080p
    /// with compressed output.
    pub const PIXEL_FORMAT_PREFERENCE: &[&str] = &["MJPG", "NV12", "YUY2", "I420", "H264"];
}

/// Device discovery constants
pub mod devices {
    /// Substring that marks a device as the preferred default (capture cards)
    pub const PREFERRED_NAME_HINT: &str = "USB";

    /// Name shown for an audio source without any description
    pub const UNKNOWN_AUDIO_DEVICE: &str = "Unknown Audio Device";

    /// Name shown for a video source without any description
    pub const UNKNOWN_CAMERA_DEVICE: &str = "Unknown Camera";

    /// Name shown for the PipeWire auto-selected camera
    pub const DEFAULT_CAMERA_NAME: &str = "Default Camera (PipeWire)";
}

/// UI Constants
pub mod ui {
    /// Default window width
    pub const WINDOW_WIDTH: f32 = 1920.0;

    /// Default window height
    pub const WINDOW_HEIGHT: f32 = 1080.0;

    /// Minimum window width
    pub const MIN_WINDOW_WIDTH: f32 = 480.0;

    /// Minimum window height (360 for the preview + 60 for the tool row)
    pub const MIN_WINDOW_HEIGHT: f32 = 420.0;

    /// Largest size the preview grows to
    pub const PREVIEW_MAX_WIDTH: f32 = 1920.0;

    /// Largest size the preview grows to
    pub const PREVIEW_MAX_HEIGHT: f32 = 1080.0;

    /// Width of the device dropdowns in the tool row
    pub const DEVICE_DROPDOWN_WIDTH: f32 = 280.0;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size on the preview appsink (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Bounded size of the frame channel between the appsink and the UI
    pub const FRAME_CHANNEL_SIZE: usize = 8;

    /// Output pixel format for appsink (displayed directly as an image)
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Default monitor gain (unity)
    pub const DEFAULT_MONITOR_VOLUME: f64 = 1.0;

    /// Highest monitor gain offered by the settings slider (2.0 = +6 dB)
    pub const MAX_MONITOR_VOLUME: f64 = 2.0;

    /// Audio queue limit, in nanoseconds
    pub const AUDIO_QUEUE_MAX_TIME_NS: u64 = 200_000_000;

    /// Get number of threads for videoconvert based on available CPU threads
    pub fn videoconvert_threads() -> u32 {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4)
    }
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 120;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// How often the session loop wakes up to check the bus
    pub const BUS_POLL_INTERVAL_MS: u64 = 100;
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_fits_target() {
        assert!(ui::PREVIEW_MAX_WIDTH >= capture::TARGET_WIDTH as f32);
        assert!(ui::PREVIEW_MAX_HEIGHT >= capture::TARGET_HEIGHT as f32);
    }

    #[test]
    fn test_fallback_includes_target() {
        assert!(
            capture::FALLBACK_RESOLUTIONS
                .contains(&(capture::TARGET_WIDTH, capture::TARGET_HEIGHT))
        );
    }
}
