// SPDX-License-Identifier: GPL-3.0-only

//! Command-line device listing

use capture_player::AppResult;
use capture_player::backends::camera::types::CameraFormat;
use capture_player::backends::discovery::{
    DeviceDiscovery, preferred_audio_index, preferred_camera_index,
};
use capture_player::backends::session::select_capture_format;
use capture_player::constants::capture;

/// Print cameras with their best formats, then microphones
///
/// The device the player would pick on launch is marked with `*`.
pub fn list_devices() -> AppResult<()> {
    gstreamer::init()?;

    let mut discovery = DeviceDiscovery::default();
    discovery.scan();

    if discovery.video_devices.is_empty() {
        println!("No cameras found.");
    } else {
        let preferred = preferred_camera_index(&discovery.video_devices, None);
        println!("Available cameras:");
        println!();
        for (index, camera) in discovery.video_devices.iter().enumerate() {
            let marker = if Some(index) == preferred { "*" } else { " " };
            println!("{} [{}] {}", marker, index, camera.name);

            let formats = discovery.formats(camera);
            let top = top_resolutions(&formats, 3);
            if !top.is_empty() {
                println!("      Formats: {}", top.join(", "));
            }

            match select_capture_format(&formats, capture::TARGET_WIDTH, capture::TARGET_HEIGHT) {
                Some(format) => println!("      Capture: {}", format),
                None => println!(
                    "      Capture: device default (no {}x{} format)",
                    capture::TARGET_WIDTH,
                    capture::TARGET_HEIGHT
                ),
            }
            println!();
        }
    }

    if discovery.audio_devices.is_empty() {
        println!("No microphones found.");
        return Ok(());
    }

    let preferred = preferred_audio_index(&discovery.audio_devices, None);
    println!("Available microphones:");
    println!();
    for (index, device) in discovery.audio_devices.iter().enumerate() {
        let marker = if Some(index) == preferred { "*" } else { " " };
        let default = if device.is_default { " (default)" } else { "" };
        println!("{} [{}] {}{}", marker, index, device.name, default);
        println!("      Node: {}", device.target_object());
    }

    Ok(())
}

/// Largest resolutions first, each with its best integer framerate
fn top_resolutions(formats: &[CameraFormat], count: usize) -> Vec<String> {
    let mut resolutions: Vec<(u32, u32, Option<u32>)> = Vec::new();
    for format in formats {
        let fps = format.framerate.map(|f| f.as_int());
        match resolutions
            .iter_mut()
            .find(|(w, h, _)| *w == format.width && *h == format.height)
        {
            Some(existing) => existing.2 = existing.2.max(fps),
            None => resolutions.push((format.width, format.height, fps)),
        }
    }

    resolutions.sort_by_key(|(w, h, _)| std::cmp::Reverse(u64::from(*w) * u64::from(*h)));
    resolutions
        .iter()
        .take(count)
        .map(|(w, h, fps)| match fps {
            Some(fps) => format!("{}x{}@{}fps", w, h, fps),
            None => format!("{}x{}", w, h),
        })
        .collect()
}
