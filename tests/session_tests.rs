// SPDX-License-Identifier: MPL-2.0

//! Integration tests for capture format selection and pipeline descriptions

use capture_player::backends::camera::pipewire::{
    build_video_pipeline_string, parse_enum_format, pipewire_target,
};
use capture_player::backends::camera::types::Framerate;
use capture_player::backends::session::select_capture_format;

/// EnumFormat output of a typical USB HDMI capture card
const CAPTURE_CARD_FORMATS: &str = r#"
  Object: size 232, type Spa:Pod:Object:Param:Format (262147)
      Id 131074   (Spa:Enum:MediaSubtype:mjpg)
      Rectangle 1920x1080
        Fraction 60/1
        Fraction 30/1
  Object: size 232, type Spa:Pod:Object:Param:Format (262147)
      Id 131074   (Spa:Enum:MediaSubtype:mjpg)
      Rectangle 1280x720
        Fraction 60/1
  Object: size 232, type Spa:Pod:Object:Param:Format (262147)
      Id 1        (Spa:Enum:MediaSubtype:raw)
      Id 4        (Spa:Enum:VideoFormat:YUY2)
      Rectangle 1920x1080
        Fraction 5/1
"#;

#[test]
fn test_capture_card_selects_mjpg_60() {
    let formats = parse_enum_format(CAPTURE_CARD_FORMATS);
    let selected = select_capture_format(&formats, 1920, 1080).expect("1080p format");

    assert_eq!(selected.pixel_format, "MJPG");
    assert_eq!(selected.framerate, Some(Framerate::from_int(60)));
}

#[test]
fn test_missing_resolution_negotiates() {
    let formats = parse_enum_format(CAPTURE_CARD_FORMATS);
    assert!(select_capture_format(&formats, 3840, 2160).is_none());
}

#[test]
fn test_selected_format_reaches_pipeline() {
    let formats = parse_enum_format(CAPTURE_CARD_FORMATS);
    let selected = select_capture_format(&formats, 1920, 1080);
    let target = pipewire_target("pipewire-serial-2146");

    let description = build_video_pipeline_string(target.as_deref(), selected.as_ref());
    assert!(description.starts_with("pipewiresrc target-object=2146"));
    assert!(description.contains("framerate=(fraction)60/1"));
    assert!(description.contains("jpegdec"));
    assert!(description.contains("appsink name=sink"));
}
