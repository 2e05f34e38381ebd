// SPDX-License-Identifier: MPL-2.0

//! Capture Player - live camera preview and microphone monitoring
//!
//! Pick a camera and a microphone, press Play, and watch the video feed while
//! the microphone is routed to the speakers. Built for USB HDMI capture cards,
//! but any PipeWire video source works.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Main application logic and UI
//! - [`backends`]: Device discovery and the capture session (PipeWire via GStreamer)
//! - [`config`]: User configuration handling
//! - [`constants`]: Target resolution, window sizes, timeouts
//! - [`errors`]: Application error types

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
