// SPDX-License-Identifier: MPL-2.0

//! Integration tests for device discovery and default selection

use capture_player::backends::audio::AudioDevice;
use capture_player::backends::camera::types::{CameraDevice, CameraFormat, Framerate};
use capture_player::backends::discovery::{
    DeviceBackend, DeviceDiscovery, preferred_audio_index, preferred_camera_index,
};

fn camera(name: &str, serial: u32) -> CameraDevice {
    CameraDevice {
        name: name.to_string(),
        path: format!("pipewire-serial-{}", serial),
        metadata_path: Some(serial.to_string()),
    }
}

fn mic(name: &str, node_name: &str, is_default: bool) -> AudioDevice {
    AudioDevice {
        name: name.to_string(),
        serial: "0".to_string(),
        node_name: node_name.to_string(),
        is_default,
    }
}

/// Backend returning fixed lists
struct FixedBackend {
    cameras: Vec<CameraDevice>,
    audio: Vec<AudioDevice>,
}

impl DeviceBackend for FixedBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.cameras.clone()
    }

    fn get_formats(&self, _device: &CameraDevice) -> Vec<CameraFormat> {
        vec![CameraFormat {
            width: 1920,
            height: 1080,
            framerate: Some(Framerate::from_int(60)),
            pixel_format: "MJPG".to_string(),
        }]
    }

    fn enumerate_audio_devices(&self) -> Vec<AudioDevice> {
        self.audio.clone()
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn test_scan_fills_both_lists() {
    let mut discovery = DeviceDiscovery::new(Box::new(FixedBackend {
        cameras: vec![camera("Integrated Camera", 10), camera("USB Video", 11)],
        audio: vec![mic("Built-in", "alsa_input.builtin", true)],
    }));

    assert!(discovery.video_devices.is_empty());
    discovery.scan();

    assert_eq!(discovery.video_devices.len(), 2);
    assert_eq!(discovery.audio_devices.len(), 1);
    assert_eq!(discovery.formats(&discovery.video_devices[0]).len(), 1);
}

#[test]
fn test_usb_device_preferred_without_saved_choice() {
    let cameras = [camera("Integrated Camera", 10), camera("USB Video", 11)];
    assert_eq!(preferred_camera_index(&cameras, None), Some(1));
}

#[test]
fn test_first_device_when_nothing_matches() {
    let cameras = [camera("Integrated Camera", 10), camera("Virtual Camera", 11)];
    assert_eq!(preferred_camera_index(&cameras, None), Some(0));
}

#[test]
fn test_saved_audio_device_wins_over_usb() {
    let devices = [
        mic("USB Capture", "alsa_input.usb", false),
        mic("Built-in", "alsa_input.builtin", true),
    ];
    assert_eq!(
        preferred_audio_index(&devices, Some("alsa_input.builtin")),
        Some(1)
    );
    assert_eq!(preferred_audio_index(&devices, None), Some(0));
}

#[test]
fn test_no_audio_devices() {
    assert_eq!(preferred_audio_index(&[], Some("alsa_input.usb")), None);
}
