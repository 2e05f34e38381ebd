// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::constants::{app_info, pipeline};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Shows the theme, monitoring gain and the capture resolution. While a
    /// session runs, also the format it negotiated.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            Some(self.config.app_theme.index()),
            Message::SetAppTheme,
        );

        let max_percent = (pipeline::MAX_MONITOR_VOLUME * 100.0) as u32;
        let volume_slider = widget::slider(
            0..=max_percent,
            self.config.monitor_volume_percent.min(max_percent),
            Message::SetMonitorVolume,
        )
        .width(Length::Fill);

        let mute_toggle =
            widget::toggler(self.config.monitor_muted).on_toggle(|_| Message::ToggleMonitorMute);

        // Only a running session knows what it negotiated
        let session = self.playback.session_info();
        let format_text = session.map(|info| {
            info.format
                .as_ref()
                .map_or_else(|| fl!("device-default-format"), ToString::to_string)
        });
        let audio_missing = session.is_some_and(|info| !info.has_audio);

        let version_info = if app_info::is_flatpak() {
            fl!("version-flatpak", version = app_info::version())
        } else {
            fl!("version", version = app_info::version())
        };

        let mut settings_column = widget::column()
            .push(section_title(fl!("appearance")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("theme")))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("monitoring")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(
                widget::row()
                    .push(widget::text(fl!("monitor-volume")))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(widget::text(format!("{}%", self.config.monitor_volume_percent)))
                    .align_y(Alignment::Center),
            )
            .push(volume_slider)
            .push(widget::vertical_space().height(spacing.space_xs))
            .push(
                widget::row()
                    .push(widget::text(fl!("mute-monitor")))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(mute_toggle)
                    .align_y(Alignment::Center),
            );

        if audio_missing {
            settings_column = settings_column
                .push(widget::vertical_space().height(spacing.space_xxs))
                .push(widget::text(fl!("monitor-inactive")).size(12));
        }

        settings_column = settings_column
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(section_title(fl!("capture-resolution")))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(widget::text(format!(
                        "{}x{}",
                        self.config.target_width, self.config.target_height
                    )))
                    .align_y(Alignment::Center),
            );

        if let Some(format_text) = format_text {
            settings_column = settings_column.push(
                widget::row()
                    .push(widget::text(fl!("capture-format")))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(widget::text(format_text))
                    .align_y(Alignment::Center),
            );
        }

        let settings_column: Element<'_, Message> = settings_column
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}

fn section_title(label: String) -> Element<'static, Message> {
    widget::text(label).size(16).font(cosmic::font::bold()).into()
}
