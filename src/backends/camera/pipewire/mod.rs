// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Enumeration goes through the PipeWire command line tools, capture through
//! GStreamer's `pipewiresrc`.

mod enumeration;
mod pipeline;

pub use enumeration::{
    enumerate_pipewire_cameras, get_fallback_formats, get_pipewire_formats,
    is_pipewire_available, parse_enum_format, parse_pw_cli_nodes, query_pipewire_formats,
};
pub use pipeline::{VideoPipeline, build_video_pipeline_string, caps_filter, pipewire_target};

use super::types::*;
use crate::backends::audio::{self, AudioDevice};
use crate::backends::discovery::DeviceBackend;
use tracing::info;

/// Device backend backed by a running PipeWire daemon
#[derive(Debug, Default, Clone, Copy)]
pub struct PipeWireBackend;

impl PipeWireBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        match enumerate_pipewire_cameras() {
            Some(cameras) => {
                info!(count = cameras.len(), "PipeWire cameras enumerated");
                cameras
            }
            None => {
                info!("PipeWire enumeration returned None");
                Vec::new()
            }
        }
    }

    fn get_formats(&self, device: &CameraDevice) -> Vec<CameraFormat> {
        get_pipewire_formats(device)
    }

    fn enumerate_audio_devices(&self) -> Vec<AudioDevice> {
        audio::enumerate_audio_devices()
    }

    fn is_available(&self) -> bool {
        is_pipewire_available()
    }
}
