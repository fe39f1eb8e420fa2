//! `#[repr(C)]` mirrors of the DirectShow format structures carried in a
//! media type's format blob or returned next to it by `IAMStreamConfig`.

use bytemuck::{Pod, Zeroable};

use crate::guid::Guid;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BitmapInfoHeader {
    pub size: u32,
    pub width: i32,
    /// Negative for top-down bitmaps.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

/// `VIDEOINFOHEADER`, the blob behind `FORMAT_VideoInfo`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct VideoInfoHeader {
    pub source: Rect,
    pub target: Rect,
    pub bit_rate: u32,
    pub bit_error_rate: u32,
    /// 100ns units.
    pub avg_time_per_frame: i64,
    pub bmi_header: BitmapInfoHeader,
}

impl VideoInfoHeader {
    /// Reads the header from the start of a format blob.
    ///
    /// Returns `None` when the blob is shorter than the header. The blob may
    /// carry a palette or extra data after it, which is ignored.
    pub fn from_format(format: &[u8]) -> Option<Self> {
        format
            .get(..std::mem::size_of::<Self>())
            .map(bytemuck::pod_read_unaligned)
    }
}

/// `VIDEO_STREAM_CONFIG_CAPS`, filled by `IAMStreamConfig::GetStreamCaps`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct VideoStreamConfigCaps {
    pub guid: Guid,
    pub video_standard: u32,
    pub input_size: Size,
    pub min_cropping_size: Size,
    pub max_cropping_size: Size,
    pub crop_granularity_x: i32,
    pub crop_granularity_y: i32,
    pub crop_align_x: i32,
    pub crop_align_y: i32,
    pub min_output_size: Size,
    pub max_output_size: Size,
    pub output_granularity_x: i32,
    pub output_granularity_y: i32,
    pub stretch_taps_x: i32,
    pub stretch_taps_y: i32,
    pub shrink_taps_x: i32,
    pub shrink_taps_y: i32,
    // C inserts 4 bytes here to align the LONGLONG fields.
    _padding: u32,
    /// 100ns units.
    pub min_frame_interval: i64,
    /// 100ns units.
    pub max_frame_interval: i64,
    pub min_bits_per_second: i32,
    pub max_bits_per_second: i32,
}
