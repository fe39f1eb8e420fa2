use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};

use crate::format::VideoInfoHeader;
use crate::guid::Guid;

/// `AM_MEDIA_TYPE` with the SDK layout.
///
/// The record and its format blob are allocated by the COM task allocator
/// and owned by whoever received them; see [`free_media_type`].
#[repr(C)]
#[derive(Debug)]
pub struct AmMediaType {
    pub major_type: Guid,
    pub subtype: Guid,
    pub fixed_size_samples: i32,
    pub temporal_compression: i32,
    pub sample_size: u32,
    pub format_type: Guid,
    /// `IUnknown*`, normally null.
    pub unk: *mut c_void,
    pub cb_format: u32,
    pub pb_format: *mut u8,
}

impl AmMediaType {
    /// The format blob, empty when either the length or the pointer is unset.
    pub fn format(&self) -> &[u8] {
        if self.cb_format == 0 || self.pb_format.is_null() {
            return &[];
        }
        // SAFETY: cb_format bytes at pb_format are owned by this record.
        unsafe { std::slice::from_raw_parts(self.pb_format, self.cb_format as usize) }
    }
}

/// Vtable prefix shared by every COM interface.
#[repr(C)]
#[derive(Debug)]
pub struct IUnknownVtbl {
    pub query_interface:
        unsafe extern "system" fn(*mut c_void, *const Guid, *mut *mut c_void) -> i32,
    pub add_ref: unsafe extern "system" fn(*mut c_void) -> u32,
    pub release: unsafe extern "system" fn(*mut c_void) -> u32,
}

/// The allocator that owns media type memory (`CoTaskMemFree` on Windows).
pub trait CoTaskMem {
    /// # Safety
    /// `ptr` must be null or come from the same allocator and not be freed yet.
    unsafe fn free(&self, ptr: *mut c_void);
}

/// Releases a media type record: its format blob, its `pUnk` and the record
/// itself. A null `pmt` is ignored.
///
/// The blob is only freed when `cb_format` is non-zero, so partially
/// initialised records with a zero length are safe to pass.
///
/// # Safety
/// `pmt` must be null or a record allocated through `alloc` that nobody else
/// frees afterwards.
pub unsafe fn free_media_type<A: CoTaskMem + ?Sized>(alloc: &A, pmt: *mut AmMediaType) {
    let Some(mt) = pmt.as_mut() else {
        return;
    };

    if mt.cb_format != 0 {
        alloc.free(mt.pb_format.cast());
        mt.cb_format = 0;
        mt.pb_format = ptr::null_mut();
    }
    if !mt.unk.is_null() {
        release_unknown(mt.unk);
        mt.unk = ptr::null_mut();
    }

    alloc.free(pmt.cast());
}

unsafe fn release_unknown(unk: *mut c_void) -> u32 {
    let vtbl = *(unk as *const *const IUnknownVtbl);
    ((*vtbl).release)(unk)
}

/// True when the record's subtype and format type are both the given ones.
/// A missing record never matches.
pub fn check_media_type(media_type: Option<&AmMediaType>, subtype: &Guid, format_type: &Guid) -> bool {
    media_type.is_some_and(|mt| mt.subtype == *subtype && mt.format_type == *format_type)
}

/// Owning handle to a task-allocated `AM_MEDIA_TYPE`, freed on drop.
pub struct OwnedMediaType<A: CoTaskMem> {
    ptr: NonNull<AmMediaType>,
    alloc: A,
}

impl<A: CoTaskMem> OwnedMediaType<A> {
    /// Takes ownership of `ptr`. Returns `None` for a null pointer.
    ///
    /// # Safety
    /// `ptr` must be null or a valid record allocated through `alloc` and not
    /// owned by anything else.
    pub unsafe fn from_raw(ptr: *mut AmMediaType, alloc: A) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, alloc })
    }

    pub fn as_raw(&self) -> *const AmMediaType {
        self.ptr.as_ptr()
    }

    pub fn get(&self) -> &AmMediaType {
        // SAFETY: the pointer is valid and exclusively owned for our lifetime.
        unsafe { self.ptr.as_ref() }
    }

    pub fn major_type(&self) -> Guid {
        self.get().major_type
    }

    pub fn subtype(&self) -> Guid {
        self.get().subtype
    }

    pub fn format_type(&self) -> Guid {
        self.get().format_type
    }

    pub fn format(&self) -> &[u8] {
        self.get().format()
    }

    pub fn matches(&self, subtype: &Guid, format_type: &Guid) -> bool {
        check_media_type(Some(self.get()), subtype, format_type)
    }

    /// The `VIDEOINFOHEADER` at the start of the format blob, if it fits.
    pub fn video_info_header(&self) -> Option<VideoInfoHeader> {
        VideoInfoHeader::from_format(self.format())
    }
}

impl<A: CoTaskMem> Drop for OwnedMediaType<A> {
    fn drop(&mut self) {
        unsafe { free_media_type(&self.alloc, self.ptr.as_ptr()) }
    }
}

impl<A: CoTaskMem> fmt::Debug for OwnedMediaType<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedMediaType")
            .field("major_type", &self.major_type())
            .field("subtype", &self.subtype())
            .field("format_type", &self.format_type())
            .field("cb_format", &self.get().cb_format)
            .finish()
    }
}
