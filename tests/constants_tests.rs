// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use capture_player::constants::{capture, pipeline, ui};

#[test]
fn test_window_fits_minimum() {
    assert!(ui::WINDOW_WIDTH >= ui::MIN_WINDOW_WIDTH);
    assert!(ui::WINDOW_HEIGHT >= ui::MIN_WINDOW_HEIGHT);
    assert_eq!((ui::MIN_WINDOW_WIDTH, ui::MIN_WINDOW_HEIGHT), (480.0, 420.0));
}

#[test]
fn test_mjpg_preferred_first() {
    // Capture cards only reach full framerate at 1080p with MJPG
    assert_eq!(capture::PIXEL_FORMAT_PREFERENCE.first(), Some(&"MJPG"));
}

#[test]
fn test_monitor_volume_range() {
    assert!(pipeline::DEFAULT_MONITOR_VOLUME <= pipeline::MAX_MONITOR_VOLUME);
    assert!(pipeline::MAX_MONITOR_VOLUME > 0.0);
}

#[test]
fn test_videoconvert_threads_nonzero() {
    assert!(pipeline::videoconvert_threads() > 0);
}
