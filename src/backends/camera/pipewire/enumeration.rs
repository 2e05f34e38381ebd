// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration and format detection
//!
//! Cameras are discovered through `pw-cli`. The command output is parsed by pure
//! functions so the parsing can be tested without a running PipeWire daemon.

use super::super::types::{CameraDevice, CameraFormat, Framerate};
use crate::constants::{capture, devices};
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
///
/// Returns `None` when PipeWire is unusable (no GStreamer plugin). When PipeWire
/// works but `pw-cli` finds nothing, the PipeWire default camera is offered.
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    debug!("Attempting to enumerate cameras via PipeWire");

    if !is_pipewire_available() {
        warn!("PipeWire not available (pipewiresrc missing)");
        return None;
    }

    if let Some(cameras) = try_enumerate_with_pw_cli() {
        debug!(count = cameras.len(), "Found PipeWire cameras");
        return Some(cameras);
    }

    info!("Using PipeWire auto-selection (default camera)");
    Some(vec![CameraDevice::pipewire_default()])
}

/// Run `pw-cli ls Node` and keep the video sources
fn try_enumerate_with_pw_cli() -> Option<Vec<CameraDevice>> {
    let output = std::process::Command::new("pw-cli")
        .args(["ls", "Node"])
        .output()
        .map_err(|e| warn!(error = %e, "Failed to run pw-cli"))
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli command failed");
        return None;
    }

    let cameras = parse_pw_cli_nodes(&String::from_utf8_lossy(&output.stdout));
    if cameras.is_empty() {
        debug!("No cameras found via pw-cli");
        None
    } else {
        Some(cameras)
    }
}

/// Properties collected for one node while scanning `pw-cli ls Node`
#[derive(Default)]
struct NodeBlock {
    id: Option<String>,
    serial: Option<String>,
    description: Option<String>,
    nick: Option<String>,
    node_name: Option<String>,
    is_video_source: bool,
}

impl NodeBlock {
    fn into_camera(self) -> Option<CameraDevice> {
        if !self.is_video_source {
            return None;
        }
        let id = self.id?;
        let name = self
            .description
            .or(self.nick)
            .or(self.node_name)
            .unwrap_or_else(|| devices::UNKNOWN_CAMERA_DEVICE.to_string());

        // pipewiresrc target-object wants the serial; node ID is the fallback
        let path = match &self.serial {
            Some(serial) => format!("pipewire-serial-{}", serial),
            None => format!("pipewire-{}", id),
        };

        debug!(id = %id, serial = ?self.serial, name = %name, path = %path, "Found video camera");
        Some(CameraDevice {
            name,
            path,
            metadata_path: Some(id),
        })
    }
}

/// Parse `pw-cli ls Node` output into the list of video sources
pub fn parse_pw_cli_nodes(stdout: &str) -> Vec<CameraDevice> {
    let mut cameras = Vec::new();
    let mut current: Option<NodeBlock> = None;

    for line in stdout.lines() {
        let trimmed = line.trim();

        // "id 76, type PipeWire:Interface:Node/3"
        if let Some(rest) = trimmed.strip_prefix("id ")
            && trimmed.contains("type PipeWire:Interface:Node")
        {
            if let Some(camera) = current.take().and_then(NodeBlock::into_camera) {
                cameras.push(camera);
            }
            let id = rest.split(',').next().map(|s| s.trim().to_string());
            current = Some(NodeBlock {
                id,
                ..Default::default()
            });
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        let Some((key, _)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim().trim_start_matches('*').trim();

        match key {
            "media.class" => {
                block.is_video_source = extract_quoted_value(trimmed).as_deref() == Some("Video/Source")
            }
            "object.serial" => block.serial = extract_quoted_value(trimmed),
            "node.description" => block.description = extract_quoted_value(trimmed),
            "node.nick" => block.nick = extract_quoted_value(trimmed),
            "node.name" => block.node_name = extract_quoted_value(trimmed),
            _ => {}
        }
    }

    if let Some(camera) = current.and_then(NodeBlock::into_camera) {
        cameras.push(camera);
    }

    cameras
}

/// Extract quoted value from a property line (e.g., 'property = "value"' -> "value")
fn extract_quoted_value(line: &str) -> Option<String> {
    let start = line.find('"')?;
    let end = line[start + 1..].find('"')?;
    Some(line[start + 1..start + 1 + end].to_string())
}

/// Get supported formats for a PipeWire camera
///
/// Falls back to common formats when the device cannot be queried.
pub fn get_pipewire_formats(device: &CameraDevice) -> Vec<CameraFormat> {
    query_pipewire_formats(device).unwrap_or_else(|| {
        warn!(path = %device.path, "Failed to enumerate formats, using fallback");
        get_fallback_formats()
    })
}

/// Formats the device actually reports via `pw-cli enum-params <node> EnumFormat`
///
/// `None` when the node is unknown or the query fails.
pub fn query_pipewire_formats(device: &CameraDevice) -> Option<Vec<CameraFormat>> {
    let node_id = device.metadata_path.as_deref()?;
    let formats = try_enumerate_formats_from_node(node_id)?;
    info!(count = formats.len(), node_id, "Enumerated formats via pw-cli");
    Some(formats)
}

/// Fallback formats when PipeWire enumeration fails
pub fn get_fallback_formats() -> Vec<CameraFormat> {
    let mut formats = Vec::new();
    for &(width, height) in capture::FALLBACK_RESOLUTIONS {
        for &fps in capture::COMMON_FRAMERATES {
            formats.push(CameraFormat {
                width,
                height,
                framerate: Some(Framerate::from_int(fps)),
                pixel_format: "MJPG".to_string(),
            });
        }
    }
    formats
}

fn try_enumerate_formats_from_node(node_id: &str) -> Option<Vec<CameraFormat>> {
    debug!(node_id, "Enumerating formats via pw-cli enum-params");

    let output = std::process::Command::new("pw-cli")
        .args(["enum-params", node_id, "EnumFormat"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("pw-cli enum-params failed");
        return None;
    }

    let formats = parse_enum_format(&String::from_utf8_lossy(&output.stdout));
    if formats.is_empty() { None } else { Some(formats) }
}

/// One `Object:` block of `pw-cli enum-params` output
#[derive(Default)]
struct FormatBlock {
    width: Option<u32>,
    height: Option<u32>,
    framerates: Vec<Framerate>,
    subtype: Option<String>,
    video_format: Option<String>,
}

impl FormatBlock {
    fn flush_into(self, formats: &mut Vec<CameraFormat>) {
        let (Some(width), Some(height), Some(subtype)) = (self.width, self.height, self.subtype)
        else {
            return;
        };

        // Raw formats are named by their VideoFormat, compressed ones by subtype
        let pixel_format = if subtype == "raw" {
            self.video_format.unwrap_or_else(|| "YUY2".to_string())
        } else {
            subtype.to_uppercase()
        };

        // libcamera sources expose no framerates; they negotiate their own
        if self.framerates.is_empty() {
            formats.push(CameraFormat {
                width,
                height,
                framerate: None,
                pixel_format,
            });
            return;
        }

        for fps in self.framerates {
            formats.push(CameraFormat {
                width,
                height,
                framerate: Some(fps),
                pixel_format: pixel_format.clone(),
            });
        }
    }
}

/// Parse `pw-cli enum-params <id> EnumFormat` output into capture formats
pub fn parse_enum_format(stdout: &str) -> Vec<CameraFormat> {
    let mut formats = Vec::new();
    let mut block = FormatBlock::default();

    for line in stdout.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("Object:") {
            std::mem::take(&mut block).flush_into(&mut formats);
            continue;
        }

        // "Id 131074   (Spa:Enum:MediaSubtype:mjpg)"
        if trimmed.contains("Spa:Enum:MediaSubtype:")
            && let Some(start) = trimmed.rfind(':')
        {
            block.subtype = Some(trimmed[start + 1..].trim_end_matches(')').to_lowercase());
        }

        // "Id 4   (Spa:Enum:VideoFormat:YUY2)"
        if trimmed.contains("Spa:Enum:VideoFormat:")
            && let Some(start) = trimmed.rfind(':')
        {
            block.video_format = Some(trimmed[start + 1..].trim_end_matches(')').to_uppercase());
        }

        // "Rectangle 1920x1080"
        if let Some(res) = trimmed.strip_prefix("Rectangle ")
            && let Some((w, h)) = res.split_once('x')
        {
            block.width = w.trim().parse().ok();
            block.height = h.trim().parse().ok();
        }

        // "Fraction 60/1" or "Fraction 60000/1001"
        if let Some(frac) = trimmed.strip_prefix("Fraction ")
            && let Some((num, denom)) = frac.split_once('/')
            && let (Ok(num), Ok(denom)) = (num.trim().parse::<u32>(), denom.trim().parse::<u32>())
            && denom > 0
            && num > 0
        {
            let fps = Framerate::new(num, denom);
            if !block.framerates.iter().any(|f| f.as_int() == fps.as_int()) {
                block.framerates.push(fps);
            }
        }
    }

    block.flush_into(&mut formats);
    formats
}

/// Test if PipeWire is available and working
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        return false;
    }

    gstreamer::ElementFactory::find("pipewiresrc").is_some()
}
