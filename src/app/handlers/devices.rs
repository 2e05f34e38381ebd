// SPDX-License-Identifier: GPL-3.0-only

//! Device handlers
//!
//! Scanning, dropdown contents and device selection.

use crate::app::state::{AppModel, Message};
use crate::backends::audio::AudioDevice;
use crate::backends::camera::types::CameraDevice;
use crate::backends::discovery::{DeviceDiscovery, RescanAction, rescan_action, rescan_selection};
use crate::fl;
use cosmic::Task;
use tracing::{error, info};

/// Scan devices off the UI thread
pub(crate) fn scan_devices_task() -> Task<cosmic::Action<Message>> {
    Task::perform(
        async {
            tokio::task::spawn_blocking(|| {
                let mut discovery = DeviceDiscovery::default();
                discovery.scan();
                (discovery.video_devices, discovery.audio_devices)
            })
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Device scan task failed");
                (Vec::new(), Vec::new())
            })
        },
        |(cameras, audio)| cosmic::Action::App(Message::DevicesScanned(cameras, audio)),
    )
}

/// Label for an audio source in the dropdown
fn audio_label(device: &AudioDevice) -> String {
    if device.is_default {
        fl!("default-audio", name = device.name.clone())
    } else {
        device.name.clone()
    }
}

impl AppModel {
    pub(crate) fn handle_scan_devices(&mut self) -> Task<cosmic::Action<Message>> {
        if self.scanning {
            return Task::none();
        }
        self.scanning = true;
        info!("Scanning devices");
        scan_devices_task()
    }

    /// Install freshly scanned lists
    ///
    /// The current selection survives a rescan when the device is still present.
    /// Otherwise the preferred device is picked. A running session restarts if
    /// its devices changed.
    pub(crate) fn handle_devices_scanned(
        &mut self,
        cameras: Vec<CameraDevice>,
        audio_devices: Vec<AudioDevice>,
    ) -> Task<cosmic::Action<Message>> {
        self.scanning = false;

        let previous_video = self.selected_camera().map(|c| c.path.clone());
        let previous_audio = self.selected_audio().map(|a| a.node_name.clone());

        let (video_index, audio_index) = rescan_selection(
            &cameras,
            &audio_devices,
            previous_video.as_deref(),
            previous_audio.as_deref(),
            self.config.last_video_device.as_deref(),
            self.config.last_audio_device.as_deref(),
        );
        self.current_video_index = video_index;
        self.current_audio_index = audio_index;

        self.video_dropdown_options = cameras.iter().map(|c| c.name.clone()).collect();
        self.audio_dropdown_options = std::iter::once(fl!("no-audio"))
            .chain(audio_devices.iter().map(audio_label))
            .collect();

        self.available_cameras = cameras;
        self.available_audio_devices = audio_devices;

        info!(
            video = self.available_cameras.len(),
            audio = self.available_audio_devices.len(),
            selected_video = ?self.selected_camera().map(|c| &c.name),
            selected_audio = ?self.selected_audio().map(|a| &a.name),
            "Device lists updated"
        );

        if self.playback.is_active() {
            let current_video = self.selected_camera().map(|c| c.path.clone());
            let current_audio = self.selected_audio().map(|a| a.node_name.clone());
            match rescan_action(
                (previous_video.as_deref(), previous_audio.as_deref()),
                (current_video.as_deref(), current_audio.as_deref()),
            ) {
                RescanAction::Keep => {}
                RescanAction::Restart => self.begin_session(),
                RescanAction::Stop => self.stop_session(),
            }
        }

        Task::none()
    }

    pub(crate) fn handle_select_video(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(camera) = self.available_cameras.get(index) else {
            return Task::none();
        };
        if self.current_video_index == Some(index) {
            return Task::none();
        }

        info!(index, name = %camera.name, "Selected video device");
        self.config.last_video_device = Some(camera.path.clone());
        self.current_video_index = Some(index);
        self.save_config();

        if self.playback.is_active() {
            self.begin_session();
        }
        Task::none()
    }

    /// Dropdown index 0 is "No audio"; device `n` is at `n + 1`
    pub(crate) fn handle_select_audio(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let selection = match index {
            0 => None,
            n if n <= self.available_audio_devices.len() => Some(n - 1),
            _ => return Task::none(),
        };
        if selection == self.current_audio_index {
            return Task::none();
        }

        self.current_audio_index = selection;
        self.config.last_audio_device = Some(
            self.selected_audio()
                .map(|a| a.node_name.clone())
                .unwrap_or_default(),
        );
        info!(audio = ?self.selected_audio().map(|a| &a.name), "Selected audio device");
        self.save_config();

        if self.playback.is_active() {
            self.begin_session();
        }
        Task::none()
    }
}
