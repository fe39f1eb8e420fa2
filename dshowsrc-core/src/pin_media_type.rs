use std::fmt;

use crate::error::{DshowError, Result};
use crate::format::VideoStreamConfigCaps;
use crate::media_type::OwnedMediaType;
use crate::traits::{Pin, StreamConfig};

/// One format a capture pin can produce: the pin, the media type and the
/// capability limits reported for it.
///
/// Dropping the value releases the pin reference and frees the media type;
/// dropping a `Vec` of them does the same for every entry.
pub struct PinMediaType<P: Pin> {
    pub capture_pin: P,
    pub media_type: OwnedMediaType<<P::Config as StreamConfig>::Alloc>,
    pub vscc: VideoStreamConfigCaps,

    // Filled in by `new_video_caps`.
    pub default_width: i32,
    pub default_height: i32,
    pub default_fps: i32,
    pub granularity_width: i32,
    pub granularity_height: i32,
}

impl<P: Pin> PinMediaType<P> {
    /// Queries capability entry `index` of `config` and ties it to `pin`.
    ///
    /// On failure, or when the query succeeds without a media type, any
    /// media type that was allocated is freed and no pin reference is taken.
    pub fn new(pin: &P, index: usize, config: &P::Config) -> Result<Self> {
        let mut raw = std::ptr::null_mut();
        let mut vscc = VideoStreamConfigCaps::default();

        let status = unsafe { config.stream_caps(index, &mut raw, &mut vscc) };
        // 部分分配也要接管，保证失败时同样会被释放
        let media_type = unsafe { OwnedMediaType::from_raw(raw, config.allocator()) };
        status?;
        let media_type = media_type.ok_or(DshowError::NullMediaType)?;

        Ok(Self {
            capture_pin: pin.clone(),
            media_type,
            vscc,
            default_width: 0,
            default_height: 0,
            default_fps: 0,
            granularity_width: 0,
            granularity_height: 0,
        })
    }
}

impl<P: Pin> fmt::Debug for PinMediaType<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinMediaType")
            .field("media_type", &self.media_type)
            .field("default_width", &self.default_width)
            .field("default_height", &self.default_height)
            .field("default_fps", &self.default_fps)
            .finish_non_exhaustive()
    }
}
