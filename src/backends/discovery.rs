// SPDX-License-Identifier: MPL-2.0

//! Device discovery and default selection

use super::audio::AudioDevice;
use super::camera::pipewire::PipeWireBackend;
use super::camera::types::{CameraDevice, CameraFormat};
use crate::constants::devices::PREFERRED_NAME_HINT;
use tracing::{info, warn};

/// Source of device lists
///
/// Production uses [`PipeWireBackend`]; tests substitute fixed lists.
pub trait DeviceBackend: Send + Sync {
    /// Enumerate available cameras
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Get supported formats for a camera
    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat>;

    /// Enumerate available microphones
    fn enumerate_audio_devices(&self) -> Vec<AudioDevice>;

    /// Check whether this backend can be used on this system
    fn is_available(&self) -> bool;
}

/// Snapshot of the devices currently present
pub struct DeviceDiscovery {
    backend: Box<dyn DeviceBackend>,
    pub video_devices: Vec<CameraDevice>,
    pub audio_devices: Vec<AudioDevice>,
}

impl Default for DeviceDiscovery {
    fn default() -> Self {
        Self::new(Box::new(PipeWireBackend::new()))
    }
}

impl std::fmt::Debug for DeviceDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceDiscovery")
            .field("video_devices", &self.video_devices)
            .field("audio_devices", &self.audio_devices)
            .finish_non_exhaustive()
    }
}

impl DeviceDiscovery {
    pub fn new(backend: Box<dyn DeviceBackend>) -> Self {
        Self {
            backend,
            video_devices: Vec::new(),
            audio_devices: Vec::new(),
        }
    }

    /// Refresh both device lists
    ///
    /// An unavailable backend yields empty lists rather than an error.
    pub fn scan(&mut self) {
        if !self.backend.is_available() {
            warn!("Device backend not available, no devices listed");
            self.video_devices.clear();
            self.audio_devices.clear();
            return;
        }

        self.video_devices = self.backend.enumerate_cameras();
        self.audio_devices = self.backend.enumerate_audio_devices();

        info!(
            video = self.video_devices.len(),
            audio = self.audio_devices.len(),
            "Devices scanned"
        );
    }

    /// Capture formats offered by one of the listed cameras
    pub fn formats(&self, device: &CameraDevice) -> Vec<CameraFormat> {
        self.backend.get_formats(device)
    }
}

/// Pick the initial camera
///
/// The saved device wins when still present, then the first name containing
/// `USB`, then the first device.
pub fn preferred_camera_index(devices: &[CameraDevice], saved_path: Option<&str>) -> Option<usize> {
    preferred_index(devices, saved_path, |d| d.path.as_str(), |d| d.name.as_str())
}

/// Pick the initial microphone, by the same rules as [`preferred_camera_index`]
pub fn preferred_audio_index(devices: &[AudioDevice], saved_node: Option<&str>) -> Option<usize> {
    preferred_index(devices, saved_node, |d| d.node_name.as_str(), |d| d.name.as_str())
}

/// Selection after a device scan
///
/// The current device is kept while it is still listed; otherwise the saved
/// device and then the preference rules apply. A saved empty audio node is the
/// explicit "No audio" choice and is honoured when nothing is selected yet.
pub fn rescan_selection(
    cameras: &[CameraDevice],
    audio_devices: &[AudioDevice],
    current_video: Option<&str>,
    current_audio: Option<&str>,
    saved_video: Option<&str>,
    saved_audio: Option<&str>,
) -> (Option<usize>, Option<usize>) {
    let video = preferred_camera_index(cameras, current_video.or(saved_video));
    let audio = match (current_audio, saved_audio) {
        (Some(node), _) => preferred_audio_index(audio_devices, Some(node)),
        (None, Some("")) => None,
        (None, saved) => preferred_audio_index(audio_devices, saved),
    };
    (video, audio)
}

/// What an active session does after a device scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanAction {
    /// Same devices, keep the session
    Keep,
    /// Selection changed, start over on the new devices
    Restart,
    /// No camera left
    Stop,
}

/// Compare the selection before and after a scan, as `(video, audio)` keys
pub fn rescan_action(
    before: (Option<&str>, Option<&str>),
    after: (Option<&str>, Option<&str>),
) -> RescanAction {
    if after.0.is_none() {
        RescanAction::Stop
    } else if before != after {
        RescanAction::Restart
    } else {
        RescanAction::Keep
    }
}

fn preferred_index<T>(
    devices: &[T],
    saved: Option<&str>,
    key: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
) -> Option<usize> {
    if devices.is_empty() {
        return None;
    }

    saved
        .and_then(|saved| devices.iter().position(|d| key(d) == saved))
        .or_else(|| {
            devices
                .iter()
                .position(|d| name(d).contains(PREFERRED_NAME_HINT))
        })
        .or(Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(name: &str, path: &str) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: path.to_string(),
            metadata_path: None,
        }
    }

    struct Unavailable;

    impl DeviceBackend for Unavailable {
        fn enumerate_cameras(&self) -> Vec<CameraDevice> {
            vec![camera("Never", "pipewire-1")]
        }
        fn get_formats(&self, _device: &CameraDevice) -> Vec<CameraFormat> {
            Vec::new()
        }
        fn enumerate_audio_devices(&self) -> Vec<AudioDevice> {
            Vec::new()
        }
        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_unavailable_backend_lists_nothing() {
        let mut discovery = DeviceDiscovery::new(Box::new(Unavailable));
        discovery.scan();
        assert!(discovery.video_devices.is_empty());
        assert!(discovery.audio_devices.is_empty());
    }

    #[test]
    fn test_saved_device_wins() {
        let devices = [
            camera("Integrated Camera", "pipewire-serial-1"),
            camera("USB Video", "pipewire-serial-2"),
        ];
        assert_eq!(
            preferred_camera_index(&devices, Some("pipewire-serial-1")),
            Some(0)
        );
    }

    #[test]
    fn test_missing_saved_device_falls_back_to_usb() {
        let devices = [
            camera("Integrated Camera", "pipewire-serial-1"),
            camera("USB Video", "pipewire-serial-2"),
        ];
        assert_eq!(
            preferred_camera_index(&devices, Some("pipewire-serial-9")),
            Some(1)
        );
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(preferred_camera_index(&[], None), None);
    }

    fn mic(name: &str, node_name: &str) -> AudioDevice {
        AudioDevice {
            name: name.to_string(),
            serial: "0".to_string(),
            node_name: node_name.to_string(),
            is_default: false,
        }
    }

    #[test]
    fn test_rescan_keeps_current_selection() {
        let cameras = [
            camera("USB Video", "pipewire-serial-2"),
            camera("Integrated Camera", "pipewire-serial-1"),
        ];
        let audio = [mic("USB Audio", "usb-mic"), mic("Built-in", "builtin-mic")];

        // Current devices beat both the saved ones and the USB hint
        let selection = rescan_selection(
            &cameras,
            &audio,
            Some("pipewire-serial-1"),
            Some("builtin-mic"),
            Some("pipewire-serial-2"),
            Some("usb-mic"),
        );
        assert_eq!(selection, (Some(1), Some(1)));
    }

    #[test]
    fn test_rescan_replaces_vanished_device() {
        let cameras = [
            camera("Integrated Camera", "pipewire-serial-1"),
            camera("USB Video", "pipewire-serial-2"),
        ];
        let audio = [mic("Built-in", "builtin-mic"), mic("USB Audio", "usb-mic")];

        let selection = rescan_selection(
            &cameras,
            &audio,
            Some("pipewire-serial-9"),
            Some("gone-mic"),
            None,
            None,
        );
        assert_eq!(selection, (Some(1), Some(1)));
    }

    #[test]
    fn test_saved_no_audio_survives_relaunch() {
        let cameras = [camera("USB Video", "pipewire-serial-2")];
        let audio = [mic("USB Audio", "usb-mic")];

        // Fresh launch: nothing selected yet, "No audio" was saved
        let selection = rescan_selection(&cameras, &audio, None, None, None, Some(""));
        assert_eq!(selection, (Some(0), None));

        // Without a saved choice the preference rules pick a microphone
        let selection = rescan_selection(&cameras, &audio, None, None, None, None);
        assert_eq!(selection, (Some(0), Some(0)));
    }

    #[test]
    fn test_rescan_with_no_devices() {
        let selection = rescan_selection(&[], &[], Some("pipewire-serial-1"), None, None, None);
        assert_eq!(selection, (None, None));
    }

    #[test]
    fn test_rescan_action() {
        let before = (Some("pipewire-serial-1"), Some("usb-mic"));

        assert_eq!(rescan_action(before, before), RescanAction::Keep);
        assert_eq!(
            rescan_action(before, (Some("pipewire-serial-2"), Some("usb-mic"))),
            RescanAction::Restart
        );
        assert_eq!(
            rescan_action(before, (Some("pipewire-serial-1"), None)),
            RescanAction::Restart
        );
        assert_eq!(rescan_action(before, (None, Some("usb-mic"))), RescanAction::Stop);
    }
}
