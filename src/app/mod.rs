// SPDX-License-Identifier: MPL-2.0

//! Main application module for Capture Player
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, PlaybackState)
//! - `handlers`: Message handlers grouped by domain
//! - `settings`: Settings drawer UI
//! - `view`: Tool row and preview
//! - `update`: Message dispatch
//!
//! The capture session is owned by a subscription keyed by the playback
//! generation and the selected devices. A new key drops the old stream, and
//! with it the session.

mod handlers;
mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::types::CameraDevice;
use crate::backends::session::{CaptureSession, SessionConfig};
use crate::config::Config;
use crate::constants::{pipeline, timing};
use crate::fl;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::iced::futures::{SinkExt, StreamExt};
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message, PlaybackState};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const REPOSITORY: &str = "https://github.com/cosmic-utils/capture-player";

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic_utils.CapturePlayer";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .version(crate::constants::app_info::version())
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // GStreamer must be initialized before any element is created
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let (volume_sender, _) = tokio::sync::watch::channel(config.monitor_volume());
        let theme = config.app_theme.theme();

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            available_cameras: Vec::new(),
            available_audio_devices: Vec::new(),
            current_video_index: None,
            current_audio_index: None,
            video_dropdown_options: Vec::new(),
            audio_dropdown_options: vec![fl!("no-audio")],
            theme_dropdown_options: vec![fl!("match-desktop"), fl!("dark"), fl!("light")],
            // The scan below is already in flight
            scanning: true,
            playback: PlaybackState::Idle,
            generation: 0,
            current_frame: None,
            last_error: None,
            volume_sender,
        };

        let tasks = Task::batch([
            cosmic::command::set_theme(theme),
            handlers::scan_devices_task(),
        ]);

        (app, tasks)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            )
            .title(fl!("about")),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        Subscription::batch([config_sub, self.capture_subscription()])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    /// Subscription owning the capture session while playback is active
    fn capture_subscription(&self) -> Subscription<Message> {
        let (Some(generation), Some(video)) = (self.playback.generation(), self.selected_camera())
        else {
            return Subscription::none();
        };

        let audio = self.selected_audio().cloned();
        let audio_node = audio.as_ref().map(|a| a.target_object().to_string());

        let session_config = SessionConfig {
            video: video.clone(),
            audio,
            target_width: self.config.target_width,
            target_height: self.config.target_height,
            monitor_volume: self.config.monitor_volume(),
        };
        let volume = self.volume_sender.subscribe();

        Subscription::run_with_id(
            ("capture", generation, video.path.clone(), audio_node),
            cosmic::iced::stream::channel(100, move |output| async move {
                run_capture_session(generation, session_config, volume, output).await
            }),
        )
    }
}

/// Body of the capture subscription
///
/// Starts the session on a blocking thread, then forwards frames, applies
/// volume changes and watches the pipelines until the subscription is dropped
/// or the session fails.
async fn run_capture_session(
    generation: u64,
    config: SessionConfig,
    mut volume: tokio::sync::watch::Receiver<f64>,
    mut output: cosmic::iced::futures::channel::mpsc::Sender<Message>,
) {
    let (frame_sender, mut frames) =
        futures::channel::mpsc::channel(pipeline::FRAME_CHANNEL_SIZE);
    let device: CameraDevice = config.video.clone();

    info!(generation, device = %device.name, "Capture subscription started");

    let started = tokio::task::spawn_blocking(move || {
        CaptureSession::start(&config, frame_sender)
    })
    .await;

    let mut session = match started {
        Ok(Ok(session)) => session,
        Ok(Err(e)) => {
            let _ = output
                .send(Message::SessionFailed(generation, e.to_string()))
                .await;
            return;
        }
        Err(e) => {
            error!(error = %e, "Session start task panicked");
            let _ = output
                .send(Message::SessionFailed(generation, e.to_string()))
                .await;
            return;
        }
    };

    if output
        .send(Message::SessionStarted(generation, session.info()))
        .await
        .is_err()
    {
        return;
    }

    // The gain may have changed while the session was starting
    session.set_monitor_volume(*volume.borrow_and_update());

    let mut bus_poll = tokio::time::interval(Duration::from_millis(timing::BUS_POLL_INTERVAL_MS));
    let mut frame_count = 0u64;

    loop {
        tokio::select! {
            frame = frames.next() => {
                let Some(frame) = frame else {
                    let _ = output
                        .send(Message::SessionFailed(generation, "Video stream ended".to_string()))
                        .await;
                    break;
                };

                frame_count += 1;
                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                    debug!(
                        frame = frame_count,
                        latency_ms = frame.captured_at.elapsed().as_secs_f64() * 1000.0,
                        "Forwarding preview frame"
                    );
                }

                // Latest frame wins; dropping is fine for a live preview
                if let Err(e) = output.try_send(Message::PreviewFrame(generation, frame))
                    && e.is_disconnected()
                {
                    break;
                }
            }
            changed = volume.changed() => {
                if changed.is_err() {
                    break;
                }
                session.set_monitor_volume(*volume.borrow_and_update());
            }
            _ = bus_poll.tick() => {
                if output.is_closed() {
                    break;
                }
                if let Some(error) = session.poll_error() {
                    warn!(generation, error = %error, "Capture session lost its video source");
                    let _ = output
                        .send(Message::SessionFailed(generation, error.to_string()))
                        .await;
                    break;
                }
            }
        }
    }

    session.stop();
    info!(generation, device = %device.name, frames = frame_count, "Capture subscription ended");
}
