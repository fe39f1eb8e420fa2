//! In-memory stand-ins for the COM seams, used by the unit tests.
//!
//! Reference counts are observed through `Rc` tokens: every fake handle owns
//! a clone of its token, so `Rc::strong_count` tells how many handles are
//! still alive. Media type memory comes from `malloc` and is counted.

use std::cell::Cell;
use std::ffi::c_void;
use std::ptr;
use std::rc::Rc;

use crate::builder::FilterQuery;
use crate::error::{DshowError, Result};
use crate::format::{BitmapInfoHeader, Size, VideoInfoHeader, VideoStreamConfigCaps};
use crate::guid::{Guid, FORMAT_VideoInfo, MEDIATYPE_Video};
use crate::media_type::{AmMediaType, CoTaskMem, IUnknownVtbl};
use crate::traits::{DeviceEnumerator, Filter, FilterMapper, Moniker, Pin, PinDirection, StreamConfig};

// --- Allocator ---

#[derive(Debug, Clone, Default)]
pub(crate) struct CountingAlloc {
    allocs: Rc<Cell<usize>>,
    frees: Rc<Cell<usize>>,
}

impl CountingAlloc {
    pub(crate) fn alloc(&self, size: usize) -> *mut c_void {
        self.allocs.set(self.allocs.get() + 1);
        unsafe { libc::calloc(1, size) }
    }

    pub(crate) fn frees(&self) -> usize {
        self.frees.get()
    }

    pub(crate) fn live(&self) -> usize {
        self.allocs.get() - self.frees.get()
    }
}

impl CoTaskMem for CountingAlloc {
    unsafe fn free(&self, ptr: *mut c_void) {
        if ptr.is_null() {
            return;
        }
        self.frees.set(self.frees.get() + 1);
        libc::free(ptr);
    }
}

pub(crate) fn new_record(
    alloc: &CountingAlloc,
    subtype: &Guid,
    format_type: &Guid,
    blob: &[u8],
) -> *mut AmMediaType {
    let pb_format = if blob.is_empty() {
        ptr::null_mut()
    } else {
        let p = alloc.alloc(blob.len()).cast::<u8>();
        unsafe { ptr::copy_nonoverlapping(blob.as_ptr(), p, blob.len()) };
        p
    };
    let pmt = alloc.alloc(std::mem::size_of::<AmMediaType>()).cast::<AmMediaType>();
    unsafe {
        pmt.write(AmMediaType {
            major_type: MEDIATYPE_Video,
            subtype: *subtype,
            fixed_size_samples: 1,
            temporal_compression: 0,
            sample_size: 0,
            format_type: *format_type,
            unk: ptr::null_mut(),
            cb_format: blob.len() as u32,
            pb_format,
        })
    };
    pmt
}

pub(crate) fn video_info_blob(width: i32, height: i32, avg_time_per_frame: i64) -> Vec<u8> {
    let header = VideoInfoHeader {
        avg_time_per_frame,
        bmi_header: BitmapInfoHeader {
            size: 40,
            width,
            height,
            ..Default::default()
        },
        ..Default::default()
    };
    bytemuck::bytes_of(&header).to_vec()
}

// --- IUnknown ---

#[repr(C)]
pub(crate) struct FakeUnknown {
    vtbl: *const IUnknownVtbl,
    refs: Rc<Cell<u32>>,
}

static FAKE_UNKNOWN_VTBL: IUnknownVtbl = IUnknownVtbl {
    query_interface: fake_query_interface,
    add_ref: fake_add_ref,
    release: fake_release,
};

unsafe extern "system" fn fake_query_interface(
    _this: *mut c_void,
    _riid: *const Guid,
    ppv: *mut *mut c_void,
) -> i32 {
    *ppv = ptr::null_mut();
    0x80004002u32 as i32 // E_NOINTERFACE
}

unsafe extern "system" fn fake_add_ref(this: *mut c_void) -> u32 {
    let data = &*(this as *const FakeUnknown);
    data.refs.set(data.refs.get() + 1);
    data.refs.get()
}

unsafe extern "system" fn fake_release(this: *mut c_void) -> u32 {
    let data = &*(this as *const FakeUnknown);
    let remaining = data.refs.get() - 1;
    data.refs.set(remaining);
    if remaining == 0 {
        drop(Box::from_raw(this as *mut FakeUnknown));
    }
    remaining
}

impl FakeUnknown {
    /// A heap object with one reference, plus a view of its count.
    pub(crate) fn new() -> (*mut c_void, Rc<Cell<u32>>) {
        let refs = Rc::new(Cell::new(1));
        let obj = Box::new(FakeUnknown {
            vtbl: &FAKE_UNKNOWN_VTBL,
            refs: refs.clone(),
        });
        (Box::into_raw(obj).cast(), refs)
    }
}

// --- IAMStreamConfig ---

#[derive(Debug, Clone)]
pub(crate) enum FakeCapability {
    Video {
        subtype: Guid,
        format_type: Guid,
        blob: Vec<u8>,
        caps: VideoStreamConfigCaps,
    },
    Fails,
    ReturnsNull,
    FailsAfterAllocating,
}

pub(crate) fn video_capability(subtype: Guid, width: i32, height: i32, interval: i64) -> FakeCapability {
    let mut caps = VideoStreamConfigCaps::default();
    caps.min_output_size = Size { cx: width, cy: height };
    caps.max_output_size = Size { cx: width, cy: height };
    caps.min_frame_interval = interval;
    caps.max_frame_interval = interval;
    FakeCapability::Video {
        subtype,
        format_type: FORMAT_VideoInfo,
        blob: video_info_blob(width, height, interval),
        caps,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakeStreamConfig {
    pub(crate) alloc: CountingAlloc,
    pub(crate) entries: Vec<FakeCapability>,
}

impl FakeStreamConfig {
    pub(crate) fn new(entries: Vec<FakeCapability>) -> Self {
        Self {
            alloc: CountingAlloc::default(),
            entries,
        }
    }
}

impl StreamConfig for FakeStreamConfig {
    type Alloc = CountingAlloc;

    fn allocator(&self) -> CountingAlloc {
        self.alloc.clone()
    }

    fn capability_count(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    unsafe fn stream_caps(
        &self,
        index: usize,
        media_type: &mut *mut AmMediaType,
        caps: &mut VideoStreamConfigCaps,
    ) -> Result<()> {
        match self.entries.get(index) {
            Some(FakeCapability::Video {
                subtype,
                format_type,
                blob,
                caps: c,
            }) => {
                *media_type = new_record(&self.alloc, subtype, format_type, blob);
                *caps = *c;
                Ok(())
            }
            Some(FakeCapability::ReturnsNull) => Ok(()),
            Some(FakeCapability::FailsAfterAllocating) => {
                *media_type = new_record(&self.alloc, &Guid::zeroed(), &Guid::zeroed(), &[]);
                Err(DshowError::Com("E_OUTOFMEMORY".into()))
            }
            Some(FakeCapability::Fails) | None => Err(DshowError::Com("E_INVALIDARG".into())),
        }
    }
}

// --- IPin / IBaseFilter ---

#[derive(Debug, Clone)]
pub(crate) struct FakePin {
    pub(crate) name: &'static str,
    pub(crate) direction: Option<PinDirection>,
    pub(crate) config: Option<FakeStreamConfig>,
    pub(crate) token: Rc<()>,
}

pub(crate) fn pin(name: &'static str, direction: Option<PinDirection>) -> FakePin {
    FakePin {
        name,
        direction,
        config: None,
        token: Rc::new(()),
    }
}

pub(crate) fn output_pin(config: Option<FakeStreamConfig>) -> FakePin {
    FakePin {
        config,
        ..pin("capture", Some(PinDirection::Output))
    }
}

impl Pin for FakePin {
    type Config = FakeStreamConfig;

    fn direction(&self) -> Result<PinDirection> {
        self.direction
            .ok_or_else(|| DshowError::Com("QueryDirection failed".into()))
    }

    fn stream_config(&self) -> Result<FakeStreamConfig> {
        self.config
            .clone()
            .ok_or_else(|| DshowError::Com("E_NOINTERFACE".into()))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakeFilter {
    pub(crate) name: String,
    pub(crate) pins: Option<Vec<FakePin>>,
    pub(crate) token: Rc<()>,
}

impl FakeFilter {
    pub(crate) fn with_pins(pins: Vec<FakePin>) -> Self {
        Self {
            name: "filter".into(),
            pins: Some(pins),
            token: Rc::new(()),
        }
    }
}

impl Filter for FakeFilter {
    type Pin = FakePin;
    type Pins = std::vec::IntoIter<FakePin>;

    fn pins(&self) -> Result<Self::Pins> {
        self.pins
            .clone()
            .map(Vec::into_iter)
            .ok_or_else(|| DshowError::Com("EnumPins failed".into()))
    }
}

// --- IMoniker / IFilterMapper2 / ICreateDevEnum ---

#[derive(Debug, Clone)]
pub(crate) struct FakeMoniker {
    pub(crate) friendly_name: Option<String>,
    pub(crate) display_name: Option<String>,
    pub(crate) filter: Option<FakeFilter>,
    pub(crate) token: Rc<()>,
}

impl FakeMoniker {
    pub(crate) fn named(name: &str) -> Self {
        Self {
            friendly_name: Some(name.to_string()),
            display_name: Some(format!("@device:pnp:\\\\?\\usb#{}", name)),
            filter: Some(FakeFilter {
                name: name.to_string(),
                ..FakeFilter::with_pins(vec![])
            }),
            token: Rc::new(()),
        }
    }
}

impl Moniker for FakeMoniker {
    type Filter = FakeFilter;

    fn friendly_name(&self) -> Option<String> {
        self.friendly_name.clone()
    }

    fn display_name(&self) -> Result<String> {
        self.display_name
            .clone()
            .ok_or_else(|| DshowError::Com("GetDisplayName failed".into()))
    }

    fn bind_filter(&self) -> Result<FakeFilter> {
        self.filter
            .clone()
            .ok_or_else(|| DshowError::Com("BindToObject failed".into()))
    }
}

/// Iterator that counts how many items were pulled from it.
#[derive(Debug)]
pub(crate) struct CountingIter<T> {
    items: std::vec::IntoIter<T>,
    pulled: Rc<Cell<usize>>,
}

impl<T> Iterator for CountingIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.items.next()?;
        self.pulled.set(self.pulled.get() + 1);
        Some(item)
    }
}

/// Serves as both filter mapper and device enumerator.
#[derive(Debug)]
pub(crate) struct FakeRegistry {
    pub(crate) monikers: Vec<FakeMoniker>,
    pub(crate) fail: bool,
    pub(crate) pulled: Rc<Cell<usize>>,
}

impl FakeRegistry {
    pub(crate) fn new(monikers: Vec<FakeMoniker>) -> Self {
        Self {
            monikers,
            fail: false,
            pulled: Rc::default(),
        }
    }

    /// Monikers handed out so far, across all enumerations.
    pub(crate) fn pulled(&self) -> usize {
        self.pulled.get()
    }

    fn enumerate(&self) -> Result<CountingIter<FakeMoniker>> {
        if self.fail {
            return Err(DshowError::Com("REGDB_E_CLASSNOTREG".into()));
        }
        Ok(CountingIter {
            items: self.monikers.clone().into_iter(),
            pulled: self.pulled.clone(),
        })
    }
}

impl FilterMapper for FakeRegistry {
    type Moniker = FakeMoniker;
    type Monikers = CountingIter<FakeMoniker>;

    fn matching_filters(&self, _query: &FilterQuery) -> Result<Self::Monikers> {
        self.enumerate()
    }
}

impl DeviceEnumerator for FakeRegistry {
    type Moniker = FakeMoniker;
    type Monikers = CountingIter<FakeMoniker>;

    fn class_enumerator(&self, _category: &Guid) -> Result<Self::Monikers> {
        self.enumerate()
    }
}
