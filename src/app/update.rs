// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function only dispatches. Handlers live in the
//! `handlers` submodules, grouped by what they touch:
//!
//! - `handlers::devices`: scanning and device selection
//! - `handlers::session`: Play/Stop and session results
//! - `handlers::system`: settings, context drawer, external links

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Devices =====
            Message::ScanDevices => self.handle_scan_devices(),
            Message::DevicesScanned(cameras, audio) => self.handle_devices_scanned(cameras, audio),
            Message::SelectVideo(index) => self.handle_select_video(index),
            Message::SelectAudio(index) => self.handle_select_audio(index),

            // ===== Session =====
            Message::TogglePlayback => self.handle_toggle_playback(),
            Message::SessionStarted(generation, info) => {
                self.handle_session_started(generation, info)
            }
            Message::SessionFailed(generation, error) => {
                self.handle_session_failed(generation, error)
            }
            Message::PreviewFrame(generation, frame) => {
                self.handle_preview_frame(generation, frame)
            }

            // ===== Settings =====
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetMonitorVolume(percent) => self.handle_set_monitor_volume(percent),
            Message::ToggleMonitorMute => self.handle_toggle_monitor_mute(),
            Message::UpdateConfig(config) => self.handle_update_config(config),
        }
    }
}
