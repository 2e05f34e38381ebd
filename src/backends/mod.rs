// SPDX-License-Identifier: MPL-2.0

//! Backend layer for device discovery and capture
//!
//! ```text
//!            App Layer
//!           /         \
//!   DeviceDiscovery   CaptureSession
//!         |             /        \
//!  pw-cli / pw-dump  VideoPipeline  AudioMonitor
//! ```
//!
//! - [`audio`]: microphone enumeration and the monitoring pipeline
//! - [`camera`]: camera enumeration, formats and the preview pipeline
//! - [`discovery`]: device lists and the default selection
//! - [`session`]: one Play..Stop capture session

pub mod audio;
pub mod camera;
pub mod discovery;
pub mod session;

pub use camera::types::{BackendError, BackendResult};
