//! COM seams.
//!
//! Each trait covers the slice of one DirectShow interface this crate needs.
//! Handles follow COM reference counting through Rust ownership: `Clone` is
//! `AddRef`, `Drop` is `Release`. Enumerations are plain iterators that
//! release their enumerator when dropped and cannot be restarted.

use crate::builder::FilterQuery;
use crate::error::Result;
use crate::format::VideoStreamConfigCaps;
use crate::guid::Guid;
use crate::media_type::{AmMediaType, CoTaskMem};

/// 设备基本信息
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceInfo {
    /// 对用户友好的显示名称 (e.g. "Logitech C920")
    pub name: String,

    /// Moniker display name (e.g. `@device:pnp:\\?\usb#vid_046d...`)
    /// 用于重新定位并打开该设备
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
}

/// `IAMStreamConfig`
pub trait StreamConfig {
    type Alloc: CoTaskMem;

    /// Allocator that owns the media types returned by [`StreamConfig::stream_caps`].
    fn allocator(&self) -> Self::Alloc;

    /// Number of capability entries that can be passed to `stream_caps`.
    fn capability_count(&self) -> Result<usize>;

    /// `GetStreamCaps`: writes a newly allocated media type to `media_type`
    /// and fills `caps`.
    ///
    /// The callee may have stored a media type even when it fails; the caller
    /// owns whatever ends up in `media_type`.
    ///
    /// # Safety
    /// `media_type` must hold null on entry.
    unsafe fn stream_caps(
        &self,
        index: usize,
        media_type: &mut *mut AmMediaType,
        caps: &mut VideoStreamConfigCaps,
    ) -> Result<()>;
}

/// `IPin`
pub trait Pin: Clone {
    type Config: StreamConfig;

    fn direction(&self) -> Result<PinDirection>;

    /// QueryInterface for the pin's `IAMStreamConfig`.
    fn stream_config(&self) -> Result<Self::Config>;
}

/// `IBaseFilter`
pub trait Filter {
    type Pin: Pin;
    type Pins: Iterator<Item = Self::Pin>;

    fn pins(&self) -> Result<Self::Pins>;
}

/// `IMoniker` plus its property bag.
pub trait Moniker {
    type Filter;

    /// The `FriendlyName` property, `None` when it cannot be read.
    fn friendly_name(&self) -> Option<String>;

    fn display_name(&self) -> Result<String>;

    /// `BindToObject` for `IBaseFilter`.
    fn bind_filter(&self) -> Result<Self::Filter>;
}

/// `IFilterMapper2`
pub trait FilterMapper {
    type Moniker: Moniker;
    type Monikers: Iterator<Item = Self::Moniker>;

    /// `EnumMatchingFilters` for the query's input and output type pairs.
    fn matching_filters(&self, query: &FilterQuery) -> Result<Self::Monikers>;
}

/// `ICreateDevEnum`
pub trait DeviceEnumerator {
    type Moniker: Moniker;
    type Monikers: Iterator<Item = Self::Moniker>;

    /// `CreateClassEnumerator`. An empty category yields an empty iterator.
    fn class_enumerator(&self, category: &Guid) -> Result<Self::Monikers>;
}
