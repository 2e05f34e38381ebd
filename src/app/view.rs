// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! A tool row (device pickers and Play/Stop) above the preview.

use crate::app::state::{AppModel, Message, PlaybackState};
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        widget::column()
            .push(self.build_tool_row())
            .push(self.build_preview())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Update Devices, Video and Audio pickers, Play/Stop
    fn build_tool_row(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let update_button = widget::button::standard(fl!("update-devices"))
            .on_press_maybe((!self.scanning).then_some(Message::ScanDevices));

        let video_picker: Element<'_, Message> = if self.video_dropdown_options.is_empty() {
            widget::text(fl!("no-video-devices")).into()
        } else {
            widget::dropdown(
                &self.video_dropdown_options,
                self.current_video_index,
                Message::SelectVideo,
            )
            .width(Length::Fixed(ui::DEVICE_DROPDOWN_WIDTH))
            .into()
        };

        let audio_picker = widget::dropdown(
            &self.audio_dropdown_options,
            Some(self.current_audio_index.map_or(0, |i| i + 1)),
            Message::SelectAudio,
        )
        .width(Length::Fixed(ui::DEVICE_DROPDOWN_WIDTH));

        // Stop is allowed while a start is still in flight
        let play_button = match self.playback {
            PlaybackState::Idle => widget::button::suggested(fl!("play")),
            PlaybackState::Starting { .. } => widget::button::standard(fl!("starting")),
            PlaybackState::Running { .. } => widget::button::destructive(fl!("stop")),
        }
        .on_press(Message::TogglePlayback);

        widget::row()
            .push(update_button)
            .push(widget::horizontal_space().width(spacing.space_s))
            .push(widget::text(fl!("video")).font(cosmic::font::bold()))
            .push(widget::horizontal_space().width(spacing.space_xxs))
            .push(video_picker)
            .push(widget::horizontal_space().width(spacing.space_s))
            .push(widget::text(fl!("audio")).font(cosmic::font::bold()))
            .push(widget::horizontal_space().width(spacing.space_xxs))
            .push(audio_picker)
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(play_button)
            .padding(spacing.space_xs)
            .align_y(Alignment::Center)
            .into()
    }

    /// Live frame scaled to fit, or the placeholder
    fn build_preview(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.current_frame {
            Some(frame) if self.playback.is_active() => {
                widget::image::Image::new(frame.handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into()
            }
            _ => self.build_placeholder(),
        };

        let preview = widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .max_width(ui::PREVIEW_MAX_WIDTH)
            .max_height(ui::PREVIEW_MAX_HEIGHT)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            });

        widget::container(preview)
            .width(Length::Fill)
            .height(Length::Fill)
            .center(Length::Fill)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                ..Default::default()
            })
            .into()
    }

    fn build_placeholder(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let mut column = widget::column()
            .push(widget::text(placeholder_text(&self.playback)).size(20))
            .align_x(Alignment::Center)
            .spacing(spacing.space_xs);

        if let Some(error) = &self.last_error {
            column = column.push(widget::text(error.as_str()).size(14));
        }

        widget::container(column)
            .center(Length::Fill)
            .style(|_theme| widget::container::Style {
                text_color: Some(Color::WHITE),
                ..Default::default()
            })
            .into()
    }
}

/// Placeholder caption: a hint while idle, a wait notice while a session is up
fn placeholder_text(playback: &PlaybackState) -> String {
    if playback.is_active() {
        fl!("waiting-for-video")
    } else {
        fl!("preview-placeholder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::session::SessionInfo;

    #[test]
    fn test_placeholder_while_waiting_for_first_frame() {
        let running = PlaybackState::Running {
            generation: 1,
            info: SessionInfo::default(),
        };
        assert_eq!(placeholder_text(&running), fl!("waiting-for-video"));
        assert_eq!(
            placeholder_text(&PlaybackState::Starting { generation: 1 }),
            fl!("waiting-for-video")
        );
        assert_eq!(placeholder_text(&PlaybackState::Idle), fl!("preview-placeholder"));
        assert_ne!(fl!("waiting-for-video"), fl!("preview-placeholder"));
    }
}
