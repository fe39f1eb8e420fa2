use crate::caps::{Caps, Structure, Value};
use crate::pin_media_type::PinMediaType;
use crate::pixel_format::{FourCC, PixelFormat};
use crate::traits::Pin;

/// DirectShow `REFERENCE_TIME` ticks (100ns) per second.
const REFERENCE_TIME_PER_SECOND: i64 = 10_000_000;

pub const DV_SYSTEMSTREAM_FALSE: &str = "video/x-dv, systemstream=FALSE";
pub const DV_SYSTEMSTREAM_TRUE: &str = "video/x-dv, systemstream=TRUE";

/// Frames per second for a frame interval, truncated. `None` for a
/// non-positive interval.
fn fps_from_interval(interval: i64) -> Option<i32> {
    (interval > 0).then(|| (REFERENCE_TIME_PER_SECOND / interval) as i32)
}

fn any_int_range() -> Value {
    Value::IntRange {
        min: 1,
        max: i32::MAX,
    }
}

fn any_framerate() -> Value {
    Value::FractionRange {
        min: (0, 1),
        max: (i32::MAX, 1),
    }
}

/// 24bpp RGB stored B-G-R in memory.
fn bgr_template() -> Structure {
    Structure::new("video/x-raw-rgb")
        .field("bpp", Value::Int(24))
        .field("depth", Value::Int(24))
        .field("endianness", Value::Int(4321))
        .field("red_mask", Value::Int(0x0000ff))
        .field("green_mask", Value::Int(0x00ff00))
        .field("blue_mask", Value::Int(0xff0000))
        .field("width", any_int_range())
        .field("height", any_int_range())
        .field("framerate", any_framerate())
}

fn yuv_template(cc: FourCC) -> Structure {
    Structure::new("video/x-raw-yuv")
        .field("format", Value::FourCC(cc))
        .field("width", any_int_range())
        .field("height", any_int_range())
        .field("framerate", any_framerate())
}

/// Builds caps for one pin media type and records its defaults.
///
/// The default size, FPS and granularity are taken from the media type's
/// `VIDEOINFOHEADER` and stored on `pin_media_type` when the header is
/// present. Raw BGR and I420 are recognised by `format`; DV by `name`
/// (ASCII case-insensitive). Anything else yields `None`.
///
/// DV with `systemstream=TRUE` is returned as is, without the size and
/// framerate ranges every other format gets. A capability with a zero frame
/// interval also yields `None`.
pub fn new_video_caps<P: Pin>(
    format: PixelFormat,
    name: &str,
    pin_media_type: &mut PinMediaType<P>,
) -> Option<Caps> {
    if let Some(video_info) = pin_media_type.media_type.video_info_header() {
        pin_media_type.default_width = video_info.bmi_header.width;
        pin_media_type.default_height = video_info.bmi_header.height;
        pin_media_type.default_fps = fps_from_interval(video_info.avg_time_per_frame).unwrap_or(0);
    }
    pin_media_type.granularity_width = pin_media_type.vscc.output_granularity_x;
    pin_media_type.granularity_height = pin_media_type.vscc.output_granularity_y;

    let mut structure = match format {
        PixelFormat::Known(FourCC::BGR3) => bgr_template(),
        PixelFormat::Known(FourCC::I420) => yuv_template(FourCC::I420),
        _ if name.eq_ignore_ascii_case(DV_SYSTEMSTREAM_FALSE) => Structure::new("video/x-dv")
            .field("systemstream", Value::Bool(false))
            .field("format", Value::FourCC(FourCC::DVSD)),
        _ if name.eq_ignore_ascii_case(DV_SYSTEMSTREAM_TRUE) => {
            return Some(Caps::new_simple(
                Structure::new("video/x-dv").field("systemstream", Value::Bool(true)),
            ));
        }
        _ => return None,
    };

    let vscc = &pin_media_type.vscc;
    // 最大帧间隔对应最低帧率
    let min_fps = fps_from_interval(vscc.max_frame_interval)?;
    let max_fps = fps_from_interval(vscc.min_frame_interval)?;

    structure.set(
        "width",
        Value::IntRange {
            min: vscc.min_output_size.cx,
            max: vscc.max_output_size.cx,
        },
    );
    structure.set(
        "height",
        Value::IntRange {
            min: vscc.min_output_size.cy,
            max: vscc.max_output_size.cy,
        },
    );
    structure.set(
        "framerate",
        Value::FractionRange {
            min: (min_fps, 1),
            max: (max_fps, 1),
        },
    );

    Some(Caps::new_simple(structure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{self, FakeCapability, FakeStreamConfig};
    use crate::format::{Size, VideoStreamConfigCaps};
    use crate::guid::*;

    fn pin_media_type(capability: FakeCapability) -> PinMediaType<fakes::FakePin> {
        let cfg = FakeStreamConfig::new(vec![capability]);
        let pin = fakes::output_pin(Some(cfg.clone()));
        PinMediaType::new(&pin, 0, &cfg).unwrap()
    }

    fn capture_caps(min: (i32, i32), max: (i32, i32), intervals: (i64, i64)) -> VideoStreamConfigCaps {
        let mut caps = VideoStreamConfigCaps::default();
        caps.min_output_size = Size { cx: min.0, cy: min.1 };
        caps.max_output_size = Size { cx: max.0, cy: max.1 };
        caps.output_granularity_x = 8;
        caps.output_granularity_y = 2;
        caps.min_frame_interval = intervals.0;
        caps.max_frame_interval = intervals.1;
        caps
    }

    #[test]
    fn bgr_ranges_equal_the_capability_bounds() {
        let mut pmt = pin_media_type(FakeCapability::Video {
            subtype: MEDIASUBTYPE_RGB24,
            format_type: FORMAT_VideoInfo,
            blob: fakes::video_info_blob(640, 480, 333_333),
            caps: capture_caps((160, 120), (1280, 720), (333_333, 2_000_000)),
        });

        let caps = new_video_caps(FourCC::BGR3.into(), "", &mut pmt).unwrap();
        let s = caps.structure(0).unwrap();

        assert_eq!(s.name(), "video/x-raw-rgb");
        assert_eq!(s.get("bpp"), Some(&Value::Int(24)));
        assert_eq!(s.get("width"), Some(&Value::IntRange { min: 160, max: 1280 }));
        assert_eq!(s.get("height"), Some(&Value::IntRange { min: 120, max: 720 }));
        // 10_000_000 / 2_000_000 = 5, 10_000_000 / 333_333 = 30 (truncated)
        assert_eq!(
            s.get("framerate"),
            Some(&Value::FractionRange {
                min: (5, 1),
                max: (30, 1)
            })
        );
    }

    #[test]
    fn defaults_come_from_the_video_info_header() {
        let mut pmt = pin_media_type(FakeCapability::Video {
            subtype: MEDIASUBTYPE_I420,
            format_type: FORMAT_VideoInfo,
            blob: fakes::video_info_blob(352, 288, 400_000),
            caps: capture_caps((352, 288), (352, 288), (400_000, 400_000)),
        });

        let caps = new_video_caps(FourCC::I420.into(), "", &mut pmt).unwrap();

        assert_eq!(pmt.default_width, 352);
        assert_eq!(pmt.default_height, 288);
        assert_eq!(pmt.default_fps, 25);
        assert_eq!((pmt.granularity_width, pmt.granularity_height), (8, 2));
        assert_eq!(
            caps.structure(0).unwrap().get("format"),
            Some(&Value::FourCC(FourCC::I420))
        );
    }

    #[test]
    fn dv_systemstream_false_gets_ranges() {
        let mut pmt = pin_media_type(FakeCapability::Video {
            subtype: MEDIASUBTYPE_dvsd,
            format_type: FORMAT_VideoInfo,
            blob: fakes::video_info_blob(720, 480, 333_667),
            caps: capture_caps((720, 480), (720, 480), (333_667, 333_667)),
        });

        let caps = new_video_caps(PixelFormat::Unknown(0), "VIDEO/X-DV, SYSTEMSTREAM=false", &mut pmt)
            .unwrap();
        let s = caps.structure(0).unwrap();

        assert_eq!(s.get("systemstream"), Some(&Value::Bool(false)));
        assert_eq!(s.get("format"), Some(&Value::FourCC(FourCC::DVSD)));
        assert_eq!(s.get("width"), Some(&Value::IntRange { min: 720, max: 720 }));
        assert_eq!(
            s.get("framerate"),
            Some(&Value::FractionRange {
                min: (29, 1),
                max: (29, 1)
            })
        );
    }

    #[test]
    fn dv_systemstream_true_returns_without_ranges() {
        let mut pmt = pin_media_type(FakeCapability::Video {
            subtype: MEDIASUBTYPE_dvsd,
            format_type: FORMAT_VideoInfo,
            blob: fakes::video_info_blob(720, 576, 400_000),
            caps: capture_caps((720, 576), (720, 576), (400_000, 400_000)),
        });

        let caps = new_video_caps(PixelFormat::Unknown(0), DV_SYSTEMSTREAM_TRUE, &mut pmt).unwrap();
        let s = caps.structure(0).unwrap();

        assert_eq!(s.to_string(), "video/x-dv, systemstream=(boolean)true");
        assert!(!s.has_field("width"));
        assert!(!s.has_field("height"));
        assert!(!s.has_field("framerate"));
        // Defaults are still recorded before the early return.
        assert_eq!(pmt.default_width, 720);
    }

    #[test]
    fn unrecognised_combination_yields_nothing() {
        let mut pmt = pin_media_type(fakes::video_capability(MEDIASUBTYPE_YUY2, 640, 480, 333_333));

        assert!(new_video_caps(FourCC::YUY2.into(), "video/x-raw-yuv", &mut pmt).is_none());
    }

    #[test]
    fn zero_frame_interval_yields_nothing() {
        let mut pmt = pin_media_type(FakeCapability::Video {
            subtype: MEDIASUBTYPE_RGB24,
            format_type: FORMAT_VideoInfo,
            blob: fakes::video_info_blob(640, 480, 0),
            caps: capture_caps((640, 480), (640, 480), (0, 0)),
        });

        assert!(new_video_caps(FourCC::BGR3.into(), "", &mut pmt).is_none());
        assert_eq!(pmt.default_fps, 0);
    }

    #[test]
    fn short_format_blob_leaves_defaults_unset() {
        let mut pmt = pin_media_type(FakeCapability::Video {
            subtype: MEDIASUBTYPE_I420,
            format_type: FORMAT_VideoInfo,
            blob: vec![0; 16],
            caps: capture_caps((320, 240), (640, 480), (333_333, 666_666)),
        });

        let caps = new_video_caps(FourCC::I420.into(), "", &mut pmt).unwrap();

        assert_eq!((pmt.default_width, pmt.default_height), (0, 0));
        assert_eq!(
            caps.structure(0).unwrap().get("height"),
            Some(&Value::IntRange { min: 240, max: 480 })
        );
    }
}
