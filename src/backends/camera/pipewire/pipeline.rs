// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for the video preview

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Map a device path onto the `pipewiresrc` target property
///
/// Returns `None` for an empty path so PipeWire picks the default camera.
pub fn pipewire_target(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let target = if let Some(serial) = path.strip_prefix("pipewire-serial-") {
        format!("target-object={}", serial)
    } else if let Some(node_id) = path.strip_prefix("pipewire-") {
        format!("target-object={}", node_id)
    } else if path.starts_with("v4l2:") {
        format!("path={}", path)
    } else if path.starts_with("/dev/video") {
        format!("path=v4l2:{}", path)
    } else {
        warn!(path, "Unknown device path format, using it as target object");
        format!("target-object={}", path)
    };
    Some(target)
}

/// Caps fields for a capture format (`width=(int)1920,height=(int)1080,...`)
pub fn caps_filter(format: &CameraFormat) -> String {
    match format.framerate {
        Some(fps) => format!(
            "width=(int){},height=(int){},framerate=(fraction){}",
            format.width,
            format.height,
            fps.as_gst_fraction()
        ),
        None => format!("width=(int){},height=(int){}", format.width, format.height),
    }
}

/// Build the `gst-launch` description of the preview pipeline
///
/// Compressed formats are parsed and decoded before `videoconvert`; raw formats
/// go straight to it. Without a format the source negotiates on its own.
pub fn build_video_pipeline_string(target: Option<&str>, format: Option<&CameraFormat>) -> String {
    let source = match target {
        Some(target) => format!("pipewiresrc {} do-timestamp=true", target),
        None => "pipewiresrc do-timestamp=true".to_string(),
    };

    let decode = match format {
        Some(fmt) => match fmt.pixel_format.as_str() {
            "MJPG" | "MJPEG" | "JPEG" => {
                format!("image/jpeg,{} ! jpegparse ! jpegdec ! ", caps_filter(fmt))
            }
            "H264" => format!(
                "video/x-h264,{} ! h264parse config-interval=-1 ! decodebin ! ",
                caps_filter(fmt)
            ),
            raw => format!("video/x-raw,format={},{} ! ", raw, caps_filter(fmt)),
        },
        None => String::new(),
    };

    format!(
        "{} ! queue max-size-buffers={} leaky=downstream ! {}\
         videoconvert n-threads={} ! video/x-raw,format={} ! \
         appsink name=sink",
        source,
        pipeline::MAX_BUFFERS,
        decode,
        pipeline::videoconvert_threads(),
        pipeline::OUTPUT_FORMAT
    )
}

/// Running preview pipeline
///
/// Frames are pushed to the UI from the GStreamer streaming thread. Dropping the
/// pipeline sets it to `Null`, which releases the camera.
pub struct VideoPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl VideoPipeline {
    /// Launch the preview pipeline for a device and start it
    pub fn start(
        device: &CameraDevice,
        format: Option<&CameraFormat>,
        frame_sender: FrameSender,
    ) -> BackendResult<Self> {
        info!(device = %device.name, format = ?format.map(|f| f.to_string()), "Creating video pipeline");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;
        gstreamer::ElementFactory::find("pipewiresrc")
            .ok_or_else(|| BackendError::NotAvailable("pipewiresrc not found".to_string()))?;

        let target = pipewire_target(&device.path);
        let description = build_video_pipeline_string(target.as_deref(), format);
        info!(pipeline = %description, "Launching video pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;

                    let frame = sample_to_frame(&sample).ok_or_else(|| {
                        if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                            error!(frame = frame_num, "Failed to read preview sample");
                        }
                        gstreamer::FlowError::Error
                    })?;

                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            "Preview frame"
                        );
                    }

                    if let Err(e) = frame_sender.clone().try_send(frame) {
                        if e.is_disconnected() {
                            return Err(gstreamer::FlowError::Flushing);
                        }
                        // UI is behind; drop this frame
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        let video = Self { pipeline, appsink };

        video.pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = video.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Video pipeline state");
        if result.is_err() {
            let message = video
                .poll_error()
                .unwrap_or_else(|| "Video pipeline failed to start".to_string());
            return Err(BackendError::InitializationFailed(message));
        }
        if state != gstreamer::State::Playing {
            warn!("Video pipeline is not in PLAYING state yet");
        }

        info!("Video pipeline running");
        Ok(video)
    }

    /// Return the first error posted on the bus, if any
    pub fn poll_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop_filtered(&[
            gstreamer::MessageType::Error,
            gstreamer::MessageType::Eos,
        ]) {
            match msg.view() {
                gstreamer::MessageView::Error(err) => {
                    let message = err.error().to_string();
                    error!(error = %message, debug = ?err.debug(), "Video pipeline error");
                    return Some(message);
                }
                gstreamer::MessageView::Eos(_) => {
                    warn!("Video stream ended");
                    return Some("Video stream ended".to_string());
                }
                _ => {}
            }
        }
        None
    }

    fn shutdown(&self) {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop video pipeline");
            return;
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "Video pipeline stopped");
    }
}

impl Drop for VideoPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Copy an RGBA sample into an image handle, dropping any row padding
fn sample_to_frame(sample: &gstreamer::Sample) -> Option<PreviewFrame> {
    let captured_at = Instant::now();
    let buffer = sample.buffer()?;
    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        return None;
    }

    let info = VideoInfo::from_caps(sample.caps()?).ok()?;
    let map = buffer.map_readable().ok()?;

    let width = info.width();
    let height = info.height();
    let row_bytes = width as usize * 4;
    let stride = usize::try_from(*info.stride().first()?).ok()?;
    let offset = *info.offset().first()?;

    let data = map.as_slice();
    let pixels = if stride == row_bytes && offset == 0 {
        data.get(..row_bytes * height as usize)?.to_vec()
    } else {
        let mut pixels = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = offset + row * stride;
            pixels.extend_from_slice(data.get(start..start + row_bytes)?);
        }
        pixels
    };

    Some(PreviewFrame {
        width,
        height,
        handle: cosmic::widget::image::Handle::from_rgba(width, height, pixels),
        captured_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(pixel_format: &str, fps: Option<u32>) -> CameraFormat {
        CameraFormat {
            width: 1920,
            height: 1080,
            framerate: fps.map(Framerate::from_int),
            pixel_format: pixel_format.to_string(),
        }
    }

    #[test]
    fn test_target_from_serial() {
        assert_eq!(
            pipewire_target("pipewire-serial-2146").as_deref(),
            Some("target-object=2146")
        );
        assert_eq!(
            pipewire_target("pipewire-68").as_deref(),
            Some("target-object=68")
        );
        assert_eq!(pipewire_target(""), None);
    }

    #[test]
    fn test_mjpg_pipeline_decodes() {
        let fmt = format("MJPG", Some(60));
        let desc = build_video_pipeline_string(Some("target-object=42"), Some(&fmt));
        assert!(desc.starts_with("pipewiresrc target-object=42"));
        assert!(desc.contains("image/jpeg,width=(int)1920,height=(int)1080,framerate=(fraction)60/1"));
        assert!(desc.contains("jpegdec"));
        assert!(desc.ends_with("appsink name=sink"));
    }

    #[test]
    fn test_raw_pipeline_has_no_decoder() {
        let fmt = format("YUY2", Some(30));
        let desc = build_video_pipeline_string(None, Some(&fmt));
        assert!(desc.contains("video/x-raw,format=YUY2"));
        assert!(!desc.contains("jpegdec"));
        assert!(!desc.contains("decodebin"));
        assert!(desc.contains("video/x-raw,format=RGBA"));
    }

    #[test]
    fn test_unknown_format_negotiates() {
        let desc = build_video_pipeline_string(Some("target-object=1"), None);
        assert!(!desc.contains("width="));
        assert!(desc.contains("videoconvert"));
    }

    #[test]
    fn test_caps_without_framerate() {
        assert_eq!(
            caps_filter(&format("NV12", None)),
            "width=(int)1920,height=(int)1080"
        );
    }
}
