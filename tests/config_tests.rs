// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use capture_player::Config;
use capture_player::config::AppTheme;
use capture_player::constants::capture;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.app_theme, AppTheme::System);
    assert!(config.last_video_device.is_none());
    assert!(config.last_audio_device.is_none());
    assert!(!config.monitor_muted, "Monitoring should be audible by default");
}

#[test]
fn test_config_targets_full_hd() {
    let config = Config::default();
    assert_eq!(config.target_width, capture::TARGET_WIDTH);
    assert_eq!(config.target_height, capture::TARGET_HEIGHT);
}

#[test]
fn test_monitor_volume_unity_by_default() {
    assert_eq!(Config::default().monitor_volume(), 1.0);
}

#[test]
fn test_muted_monitor_is_silent() {
    let config = Config {
        monitor_volume_percent: 150,
        monitor_muted: true,
        ..Config::default()
    };
    assert_eq!(config.monitor_volume(), 0.0);

    let config = Config {
        monitor_muted: false,
        ..config
    };
    assert_eq!(config.monitor_volume(), 1.5);
}

#[test]
fn test_theme_dropdown_order() {
    for (index, theme) in AppTheme::ALL.iter().enumerate() {
        assert_eq!(theme.index(), index);
    }
}
