// SPDX-License-Identifier: GPL-3.0-only

use capture_player::app::AppModel;
use capture_player::constants::ui;
use capture_player::i18n;
use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(name = "capture-player")]
#[command(about = "Live camera preview with microphone monitoring")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras and microphones
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=capture_player=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => Ok(cli::list_devices()?),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(ui::WINDOW_WIDTH, ui::WINDOW_HEIGHT))
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(ui::MIN_WINDOW_WIDTH)
                .min_height(ui::MIN_WINDOW_HEIGHT),
        );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
