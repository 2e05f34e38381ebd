// SPDX-License-Identifier: MPL-2.0

//! Live audio monitoring: microphone straight to the default output

use super::AudioDevice;
use crate::backends::{BackendError, BackendResult};
use crate::constants::{pipeline, timing};
use gstreamer as gst;
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// Monitoring pipeline for one microphone
///
/// `pipewiresrc → queue → audioconvert → audioresample → volume → autoaudiosink`
pub struct AudioMonitor {
    pipeline: gst::Pipeline,
    volume: gst::Element,
}

impl AudioMonitor {
    /// Build the monitoring pipeline and start playing at the given gain
    pub fn start(device: &AudioDevice, volume: f64) -> BackendResult<Self> {
        info!(device = %device.name, target = %device.target_object(), volume, "Starting audio monitor");

        gst::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let make = |factory: &str| {
            gst::ElementFactory::make(factory).build().map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to create {}: {}", factory, e))
            })
        };

        let source = gst::ElementFactory::make("pipewiresrc")
            .property("target-object", device.target_object())
            .property("do-timestamp", true)
            .build()
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to create pipewiresrc: {}", e))
            })?;

        let queue = make("queue")?;
        queue.set_property("max-size-time", pipeline::AUDIO_QUEUE_MAX_TIME_NS);
        queue.set_property("max-size-buffers", 0u32);
        queue.set_property("max-size-bytes", 0u32);

        let convert = make("audioconvert")?;
        let resample = make("audioresample")?;
        let volume_element = gst::ElementFactory::make("volume")
            .property("volume", clamp_volume(volume))
            .build()
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to create volume: {}", e))
            })?;
        let sink = make("autoaudiosink")?;

        let gst_pipeline = gst::Pipeline::with_name("audio-monitor");
        let elements = [&source, &queue, &convert, &resample, &volume_element, &sink];
        gst_pipeline
            .add_many(elements)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;
        gst::Element::link_many(elements)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let monitor = Self {
            pipeline: gst_pipeline,
            volume: volume_element,
        };

        monitor
            .pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to start audio monitor: {}", e))
            })?;

        debug!("Audio monitor playing");
        Ok(monitor)
    }

    /// Change the monitoring gain (0.0 = silent, 1.0 = unity)
    pub fn set_volume(&self, volume: f64) {
        let volume = clamp_volume(volume);
        debug!(volume, "Setting monitor volume");
        self.volume.set_property("volume", volume);
    }

    /// Return the first error posted on the bus, if any
    pub fn poll_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop_filtered(&[gst::MessageType::Error]) {
            if let gst::MessageView::Error(err) = msg.view() {
                let message = err.error().to_string();
                warn!(error = %message, debug = ?err.debug(), "Audio monitor error");
                return Some(message);
            }
        }
        None
    }
}

impl Drop for AudioMonitor {
    fn drop(&mut self) {
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            warn!(error = %e, "Failed to stop audio monitor");
            return;
        }
        let (result, _, _) = self
            .pipeline
            .state(gst::ClockTime::from_seconds(timing::STOP_TIMEOUT_SECS));
        debug!(result = ?result, "Audio monitor stopped");
    }
}

/// Gain accepted by the `volume` element
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_finite() {
        volume.clamp(0.0, pipeline::MAX_MONITOR_VOLUME)
    } else {
        pipeline::DEFAULT_MONITOR_VOLUME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_volume() {
        assert_eq!(clamp_volume(-1.0), 0.0);
        assert_eq!(clamp_volume(0.5), 0.5);
        assert_eq!(clamp_volume(100.0), pipeline::MAX_MONITOR_VOLUME);
        assert_eq!(clamp_volume(f64::NAN), pipeline::DEFAULT_MONITOR_VOLUME);
    }
}
