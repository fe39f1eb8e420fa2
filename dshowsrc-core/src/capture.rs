use crate::caps::Caps;
use crate::discovery::pin_from_filter;
use crate::error::Result;
use crate::guid::{Guid, FORMAT_DvInfo, FORMAT_VideoInfo, MEDIASUBTYPE_I420, MEDIASUBTYPE_RGB24, MEDIASUBTYPE_dvsd};
use crate::pin_media_type::PinMediaType;
use crate::pixel_format::{FourCC, PixelFormat};
use crate::traits::{Filter, Pin, PinDirection, StreamConfig};
use crate::video_caps::{new_video_caps, DV_SYSTEMSTREAM_FALSE, DV_SYSTEMSTREAM_TRUE};

/// (subtype, format type) -> (pixel format, caps name) 映射表
const CAPTURE_FORMATS: [(Guid, Guid, PixelFormat, &str); 4] = [
    (MEDIASUBTYPE_RGB24, FORMAT_VideoInfo, PixelFormat::Known(FourCC::BGR3), ""),
    (MEDIASUBTYPE_I420, FORMAT_VideoInfo, PixelFormat::Known(FourCC::I420), ""),
    (MEDIASUBTYPE_dvsd, FORMAT_VideoInfo, PixelFormat::Unknown(0), DV_SYSTEMSTREAM_FALSE),
    (MEDIASUBTYPE_dvsd, FORMAT_DvInfo, PixelFormat::Unknown(0), DV_SYSTEMSTREAM_TRUE),
];

/// Everything a capture filter's output pin can produce.
///
/// `pin_media_types` keeps one entry per caps structure that was produced,
/// so a negotiated structure can be mapped back to the media type to set.
#[derive(Debug)]
pub struct CaptureCaps<P: Pin> {
    pub caps: Caps,
    pub pin_media_types: Vec<PinMediaType<P>>,
}

impl<P: Pin> CaptureCaps<P> {
    /// The entry whose default size is `width`x`height`, if any.
    pub fn find_by_size(&self, width: i32, height: i32) -> Option<&PinMediaType<P>> {
        self.pin_media_types
            .iter()
            .find(|pmt| pmt.default_width == width && pmt.default_height == height)
    }
}

/// Probes every stream capability of the filter's output pin.
///
/// Capability entries that cannot be read, or whose format is not one of the
/// supported subtype/format pairs, are skipped and released.
pub fn capture_caps<F: Filter>(filter: &F) -> Result<CaptureCaps<F::Pin>> {
    let pin = pin_from_filter(filter, PinDirection::Output)?;
    let config = pin.stream_config()?;
    let count = config.capability_count()?;

    let mut caps = Caps::new_empty();
    let mut pin_media_types = Vec::new();

    for index in 0..count {
        let mut pmt = match PinMediaType::new(&pin, index, &config) {
            Ok(pmt) => pmt,
            Err(e) => {
                tracing::warn!(target: "dshowsrc::core", "Skipping capability {}: {}", index, e);
                continue;
            }
        };

        let Some((_, _, format, name)) = CAPTURE_FORMATS
            .iter()
            .find(|(subtype, format_type, _, _)| pmt.media_type.matches(subtype, format_type))
        else {
            tracing::trace!(
                target: "dshowsrc::core",
                "Unsupported capability {}: {}",
                index,
                pmt.media_type.subtype()
            );
            continue;
        };

        if let Some(entry) = new_video_caps(*format, name, &mut pmt) {
            caps.append(entry);
            pin_media_types.push(pmt);
        }
    }

    tracing::debug!(target: "dshowsrc::core", "{} of {} capabilities usable", pin_media_types.len(), count);

    Ok(CaptureCaps {
        caps,
        pin_media_types,
    })
}
