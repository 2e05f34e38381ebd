// SPDX-License-Identifier: GPL-3.0-only

//! Session handlers
//!
//! The session itself lives in the capture subscription. These handlers only
//! move [`PlaybackState`] around; the subscription follows it.

use crate::app::state::{AppModel, Message, PlaybackState};
use crate::backends::camera::types::PreviewFrame;
use crate::backends::session::SessionInfo;
use crate::errors::AppError;
use crate::fl;
use cosmic::Task;
use tracing::{debug, error, info, warn};

impl AppModel {
    pub(crate) fn handle_toggle_playback(&mut self) -> Task<cosmic::Action<Message>> {
        if self.playback.is_active() {
            self.stop_session();
            return Task::none();
        }

        if self.selected_camera().is_none() {
            warn!("{}", AppError::NoDeviceSelected("video"));
            return Task::none();
        }

        self.begin_session();
        Task::none()
    }

    /// Enter `Starting` with a fresh generation
    ///
    /// A new generation changes the capture subscription id, so a running
    /// session is replaced.
    pub(crate) fn begin_session(&mut self) {
        self.generation += 1;
        self.playback = PlaybackState::Starting {
            generation: self.generation,
        };
        self.last_error = None;
        self.current_frame = None;
        info!(
            generation = self.generation,
            video = ?self.selected_camera().map(|c| &c.name),
            audio = ?self.selected_audio().map(|a| &a.name),
            "Starting session"
        );
    }

    /// Return to `Idle`; the subscription drops the session
    pub(crate) fn stop_session(&mut self) {
        info!(generation = ?self.playback.generation(), "Stopping session");
        self.playback = PlaybackState::Idle;
        self.current_frame = None;
    }

    pub(crate) fn handle_session_started(
        &mut self,
        generation: u64,
        session: SessionInfo,
    ) -> Task<cosmic::Action<Message>> {
        let format = session.format.as_ref().map(ToString::to_string);
        let has_audio = session.has_audio;
        if self.playback.mark_running(generation, session) {
            info!(generation, format = ?format, has_audio, "Session running");
        } else {
            debug!(generation, "Ignoring start of abandoned session");
        }
        Task::none()
    }

    pub(crate) fn handle_session_failed(
        &mut self,
        generation: u64,
        error: String,
    ) -> Task<cosmic::Action<Message>> {
        if self.playback.mark_failed(generation) {
            error!(generation, error = %error, "Session failed");
            self.last_error = Some(fl!("session-failed", error = error));
            self.current_frame = None;
        } else {
            debug!(generation, error = %error, "Ignoring failure of abandoned session");
        }
        Task::none()
    }

    /// Frames still queued from a replaced session are dropped
    pub(crate) fn handle_preview_frame(
        &mut self,
        generation: u64,
        frame: PreviewFrame,
    ) -> Task<cosmic::Action<Message>> {
        if self.playback.is_current(generation) {
            self.current_frame = Some(frame);
        }
        Task::none()
    }
}
