// SPDX-License-Identifier: GPL-3.0-only

//! Application state types

use crate::backends::audio::AudioDevice;
use crate::backends::camera::types::{CameraDevice, PreviewFrame};
use crate::backends::session::SessionInfo;
use crate::config::Config;
use cosmic::cosmic_config;
use cosmic::widget::about::About;

/// Where the capture session is in its life cycle
///
/// Each Play bumps the generation. Results tagged with an older generation
/// belong to a session the user already abandoned and are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// Session is being built on a background thread
    Starting { generation: u64 },
    /// Session is delivering frames
    Running { generation: u64, info: SessionInfo },
}

impl PlaybackState {
    pub fn is_running(&self) -> bool {
        matches!(self, PlaybackState::Running { .. })
    }

    /// Starting or running: a session exists or is being built
    pub fn is_active(&self) -> bool {
        !matches!(self, PlaybackState::Idle)
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Starting { generation } | PlaybackState::Running { generation, .. } => {
                Some(*generation)
            }
        }
    }

    /// Whether results tagged with `generation` belong to the current session
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == Some(generation)
    }

    /// What the running session negotiated
    pub fn session_info(&self) -> Option<&SessionInfo> {
        match self {
            PlaybackState::Running { info, .. } => Some(info),
            _ => None,
        }
    }

    /// Mark the session of `generation` as running
    ///
    /// Returns false (and changes nothing) for a stale generation.
    pub fn mark_running(&mut self, generation: u64, info: SessionInfo) -> bool {
        match self {
            PlaybackState::Starting { generation: current } if *current == generation => {
                *self = PlaybackState::Running { generation, info };
                true
            }
            _ => false,
        }
    }

    /// Return to idle after the session of `generation` failed
    ///
    /// Returns false (and changes nothing) for a stale generation.
    pub fn mark_failed(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            *self = PlaybackState::Idle;
            true
        } else {
            false
        }
    }
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Application model
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// About page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler, `None` when the config directory is unusable
    pub config_handler: Option<cosmic_config::Config>,

    // ===== Devices =====
    pub available_cameras: Vec<CameraDevice>,
    pub available_audio_devices: Vec<AudioDevice>,
    pub current_video_index: Option<usize>,
    pub current_audio_index: Option<usize>,
    pub video_dropdown_options: Vec<String>,
    /// Audio choices; index 0 is "No audio"
    pub audio_dropdown_options: Vec<String>,
    pub theme_dropdown_options: Vec<String>,
    /// A device scan is in flight
    pub scanning: bool,

    // ===== Session =====
    pub playback: PlaybackState,
    /// Last generation handed out by Play
    pub generation: u64,
    pub current_frame: Option<PreviewFrame>,
    /// Error of the last failed session, shown under the placeholder
    pub last_error: Option<String>,
    /// Live monitor gain for the running session
    pub volume_sender: tokio::sync::watch::Sender<f64>,
}

impl AppModel {
    pub fn selected_camera(&self) -> Option<&CameraDevice> {
        self.current_video_index
            .and_then(|i| self.available_cameras.get(i))
    }

    pub fn selected_audio(&self) -> Option<&AudioDevice> {
        self.current_audio_index
            .and_then(|i| self.available_audio_devices.get(i))
    }
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Devices =====
    /// Re-enumerate cameras and microphones
    ScanDevices,
    /// Device scan finished
    DevicesScanned(Vec<CameraDevice>, Vec<AudioDevice>),
    /// Camera picked in the video dropdown
    SelectVideo(usize),
    /// Entry picked in the audio dropdown (0 = no audio)
    SelectAudio(usize),

    // ===== Session =====
    /// Play/Stop button
    TogglePlayback,
    /// Session of this generation is running
    SessionStarted(u64, SessionInfo),
    /// Session of this generation failed to start or stopped with an error
    SessionFailed(u64, String),
    /// New preview frame from the session of this generation
    PreviewFrame(u64, PreviewFrame),

    // ===== Settings =====
    SetAppTheme(usize),
    /// Monitor gain in percent
    SetMonitorVolume(u32),
    ToggleMonitorMute,
    /// Configuration changed on disk
    UpdateConfig(Config),
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::backends::camera::types::{CameraFormat, Framerate};

    #[test]
    fn test_start_completes() {
        let info = SessionInfo {
            format: Some(CameraFormat {
                width: 1920,
                height: 1080,
                framerate: Some(Framerate::from_int(60)),
                pixel_format: "MJPG".to_string(),
            }),
            has_audio: true,
        };

        let mut state = PlaybackState::Starting { generation: 3 };
        assert_eq!(state.session_info(), None);
        assert!(state.mark_running(3, info.clone()));
        assert!(state.is_running());
        assert_eq!(state.generation(), Some(3));
        assert_eq!(state.session_info(), Some(&info));
    }

    #[test]
    fn test_stale_start_ignored() {
        let mut state = PlaybackState::Starting { generation: 4 };
        assert!(!state.mark_running(3, SessionInfo::default()));
        assert_eq!(state, PlaybackState::Starting { generation: 4 });

        // Stopped before the start completed
        let mut state = PlaybackState::Idle;
        assert!(!state.mark_running(4, SessionInfo::default()));
        assert_eq!(state, PlaybackState::Idle);
    }

    #[test]
    fn test_frames_of_replaced_session_are_stale() {
        // Device change while running: generation 5 replaced by 6
        let state = PlaybackState::Starting { generation: 6 };
        assert!(!state.is_current(5));
        assert!(state.is_current(6));
        assert!(!PlaybackState::Idle.is_current(6));
    }

    #[test]
    fn test_stale_failure_ignored() {
        let mut state = PlaybackState::Starting { generation: 2 };
        assert!(state.mark_running(2, SessionInfo::default()));
        assert!(!state.mark_failed(1));
        assert!(state.is_running());
        assert!(state.mark_failed(2));
        assert!(!state.is_active());
    }
}
