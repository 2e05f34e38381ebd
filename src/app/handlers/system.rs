// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles the context drawer, external links and settings.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::{AppTheme, Config};
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    /// Persist the current config, logging failures
    pub(crate) fn save_config(&self) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, "Failed to save config");
        }
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;
        self.volume_sender.send_replace(self.config.monitor_volume());

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config();

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_monitor_volume(
        &mut self,
        percent: u32,
    ) -> Task<cosmic::Action<Message>> {
        self.config.monitor_volume_percent = percent;
        self.save_config();
        self.volume_sender.send_replace(self.config.monitor_volume());
        Task::none()
    }

    pub(crate) fn handle_toggle_monitor_mute(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.monitor_muted = !self.config.monitor_muted;
        info!(muted = self.config.monitor_muted, "Toggled monitor mute");
        self.save_config();
        self.volume_sender.send_replace(self.config.monitor_volume());
        Task::none()
    }
}
