// SPDX-License-Identifier: MPL-2.0

//! Audio device enumeration for PipeWire

mod monitor;

pub use monitor::AudioMonitor;

use crate::constants::devices;
use serde_json::Value;
use std::process::Command;
use tracing::{debug, warn};

/// Represents an audio input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub name: String,
    pub serial: String,
    pub node_name: String,
    pub is_default: bool,
}

impl AudioDevice {
    /// Value for the `target-object` property of `pipewiresrc`
    ///
    /// The node name is stable across restarts of the daemon; the serial is used
    /// when a node has no name.
    pub fn target_object(&self) -> &str {
        if self.node_name.is_empty() {
            &self.serial
        } else {
            &self.node_name
        }
    }
}

/// Enumerate available audio input devices using PipeWire
pub fn enumerate_audio_devices() -> Vec<AudioDevice> {
    let output = match Command::new("pw-dump").output() {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "Failed to run pw-dump");
            return Vec::new();
        }
    };

    if !output.status.success() {
        warn!("pw-dump command failed");
        return Vec::new();
    }

    match std::str::from_utf8(&output.stdout) {
        Ok(stdout) => parse_audio_devices(stdout),
        Err(e) => {
            warn!(error = %e, "pw-dump output is not UTF-8");
            Vec::new()
        }
    }
}

/// Parse `pw-dump` JSON into audio sources, default first then by name
pub fn parse_audio_devices(json: &str) -> Vec<AudioDevice> {
    let nodes: Vec<Value> = match serde_json::from_str(json) {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!(error = %e, "Failed to parse JSON from pw-dump");
            return Vec::new();
        }
    };

    let default_node_name = find_default_source(&nodes);

    let mut devices: Vec<AudioDevice> = nodes
        .iter()
        .filter_map(|node| node.get("info")?.get("props"))
        .filter(|props| props.get("media.class").and_then(Value::as_str) == Some("Audio/Source"))
        .map(|props| {
            let name = ["node.nick", "node.description", "node.name"]
                .iter()
                .find_map(|key| props.get(*key).and_then(Value::as_str))
                .unwrap_or(devices::UNKNOWN_AUDIO_DEVICE)
                .to_string();

            // object.serial is a number in current PipeWire and a string in older releases
            let serial = match props.get("object.serial") {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) => s.clone(),
                _ => "0".to_string(),
            };

            let node_name = props
                .get("node.name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let is_default = default_node_name.as_deref() == Some(node_name.as_str());

            debug!(name = %name, serial = %serial, is_default, "Found audio input device");

            AudioDevice {
                name,
                serial,
                node_name,
                is_default,
            }
        })
        .collect();

    devices.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| a.name.cmp(&b.name)));
    devices
}

/// Default audio source from the `default` metadata object
fn find_default_source(nodes: &[Value]) -> Option<String> {
    let metadata = nodes.iter().find(|node| {
        node.get("type").and_then(Value::as_str) == Some("PipeWire:Interface:Metadata")
            && node
                .get("props")
                .and_then(|p| p.get("metadata.name"))
                .and_then(Value::as_str)
                == Some("default")
    })?;

    let name = metadata
        .get("metadata")?
        .as_array()?
        .iter()
        .filter(|entry| {
            matches!(
                entry.get("key").and_then(Value::as_str),
                Some("default.audio.source" | "default.configured.audio.source")
            )
        })
        .find_map(|entry| entry.get("value")?.get("name")?.as_str())?
        .to_string();

    debug!(default_source = %name, "Found default audio source from metadata");
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PW_DUMP: &str = r#"[
      {
        "id": 40,
        "type": "PipeWire:Interface:Metadata",
        "props": { "metadata.name": "default" },
        "metadata": [
          { "subject": 0, "key": "default.audio.sink", "value": { "name": "alsa_output.speakers" } },
          { "subject": 0, "key": "default.audio.source", "value": { "name": "alsa_input.usb-capture" } }
        ]
      },
      {
        "id": 61,
        "type": "PipeWire:Interface:Node",
        "info": { "props": {
          "media.class": "Audio/Source",
          "node.name": "alsa_input.pci-builtin",
          "node.description": "Built-in Audio Analog Stereo",
          "object.serial": 2001
        } }
      },
      {
        "id": 62,
        "type": "PipeWire:Interface:Node",
        "info": { "props": {
          "media.class": "Audio/Source",
          "node.name": "alsa_input.usb-capture",
          "node.nick": "USB Capture",
          "object.serial": "2002"
        } }
      },
      {
        "id": 63,
        "type": "PipeWire:Interface:Node",
        "info": { "props": {
          "media.class": "Audio/Sink",
          "node.name": "alsa_output.speakers"
        } }
      }
    ]"#;

    #[test]
    fn test_default_source_sorted_first() {
        let devices = parse_audio_devices(PW_DUMP);
        assert_eq!(devices.len(), 2);
        assert!(devices[0].is_default);
        assert_eq!(devices[0].name, "USB Capture");
        assert_eq!(devices[0].serial, "2002");
        assert!(!devices[1].is_default);
        assert_eq!(devices[1].serial, "2001");
    }

    #[test]
    fn test_target_object_prefers_node_name() {
        let devices = parse_audio_devices(PW_DUMP);
        assert_eq!(devices[0].target_object(), "alsa_input.usb-capture");

        let unnamed = AudioDevice {
            name: "Mic".to_string(),
            serial: "77".to_string(),
            node_name: String::new(),
            is_default: false,
        };
        assert_eq!(unnamed.target_object(), "77");
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_audio_devices("not json").is_empty());
    }
}
