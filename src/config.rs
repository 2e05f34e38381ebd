// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::capture;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Theme variants in dropdown order
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }

    /// Position of this variant in [`AppTheme::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Last used camera (PipeWire target path)
    pub last_video_device: Option<String>,
    /// Last used microphone (PipeWire node name)
    pub last_audio_device: Option<String>,
    /// Capture width to match against the device formats
    pub target_width: u32,
    /// Capture height to match against the device formats
    pub target_height: u32,
    /// Monitor gain in percent (100 = unity)
    pub monitor_volume_percent: u32,
    /// Monitoring muted (session still captures audio)
    pub monitor_muted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            last_video_device: None,
            last_audio_device: None,
            target_width: capture::TARGET_WIDTH,
            target_height: capture::TARGET_HEIGHT,
            monitor_volume_percent: 100,
            monitor_muted: false,
        }
    }
}

impl Config {
    /// Effective monitor gain handed to the audio pipeline
    pub fn monitor_volume(&self) -> f64 {
        if self.monitor_muted {
            0.0
        } else {
            self.monitor_volume_percent as f64 / 100.0
        }
    }
}
