use std::cell::Cell;
use std::ffi::c_void;
use std::marker::PhantomData;

use windows::core::{Error as HResultError, GUID, HRESULT};
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::Media::MediaFoundation::AM_MEDIA_TYPE;
use windows::Win32::System::Com::{
    CoInitializeEx, CoTaskMemFree, CoUninitialize, COINIT, COINIT_APARTMENTTHREADED,
    COINIT_MULTITHREADED,
};

use dshowsrc_core::error::{DshowError, Result};
use dshowsrc_core::format::VideoStreamConfigCaps;
use dshowsrc_core::guid::Guid;
use dshowsrc_core::media_type::{AmMediaType, CoTaskMem};

// 我们自己的 repr(C) 结构体必须与 SDK 布局一致，才能直接传给 COM 方法
const _: () = assert!(std::mem::size_of::<AmMediaType>() == std::mem::size_of::<AM_MEDIA_TYPE>());
const _: () = assert!(std::mem::size_of::<VideoStreamConfigCaps>() == 128);
const _: () = assert!(std::mem::size_of::<Guid>() == std::mem::size_of::<GUID>());

/// `CLSID_FilterMapper2` {CDA42200-BD88-11d0-BD4E-00A0C911CE86}
pub const CLSID_FILTER_MAPPER2: GUID = GUID::from_u128(0xCDA42200_BD88_11D0_BD4E_00A0C911CE86);

thread_local! {
    // CoInitializeEx 按线程生效，计数也按线程
    static COM_REFCNT: Cell<usize> = const { Cell::new(0) };
}

pub(crate) fn hresult_to_dshow_error(e: HResultError) -> DshowError {
    DshowError::Com(e.to_string())
}

pub(crate) fn win_guid(guid: &Guid) -> GUID {
    GUID::from_u128(guid.to_u128())
}

/// COM 线程模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComApartment {
    /// STA, required by the property page dialog.
    #[default]
    SingleThreaded,
    MultiThreaded,
}

impl ComApartment {
    fn coinit(self) -> COINIT {
        match self {
            ComApartment::SingleThreaded => COINIT_APARTMENTTHREADED,
            ComApartment::MultiThreaded => COINIT_MULTITHREADED,
        }
    }
}

/// Initializes COM on the calling thread, counting nested calls.
///
/// Returns `false` when the thread already runs in the other apartment; that
/// is accepted as is and must not be paired with [`shutdown_com`].
pub fn initialize_com(apartment: ComApartment) -> Result<bool> {
    let hr: HRESULT = unsafe { CoInitializeEx(None, apartment.coinit()) };
    if hr == RPC_E_CHANGED_MODE {
        tracing::debug!(target: "dshowsrc::com", "COM already initialized with another apartment");
        return Ok(false);
    }
    hr.ok().map_err(hresult_to_dshow_error)?;
    COM_REFCNT.with(|n| n.set(n.get() + 1));
    Ok(true)
}

/// Undoes one counted [`initialize_com`] on the calling thread.
pub fn shutdown_com() {
    let counted = COM_REFCNT.with(|n| match n.get() {
        0 => false,
        depth => {
            n.set(depth - 1);
            true
        }
    });
    if counted {
        unsafe { CoUninitialize() };
    }
}

/// Keeps COM initialized on the current thread while alive.
#[derive(Debug)]
pub struct ComGuard {
    counted: bool,
    // 必须在同一线程上 CoUninitialize
    _not_send: PhantomData<*const ()>,
}

impl ComGuard {
    pub fn new(apartment: ComApartment) -> Result<Self> {
        Ok(Self {
            counted: initialize_com(apartment)?,
            _not_send: PhantomData,
        })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.counted {
            shutdown_com();
        }
    }
}

/// The COM task allocator (`CoTaskMemFree`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CoTaskMemAllocator;

impl CoTaskMem for CoTaskMemAllocator {
    unsafe fn free(&self, ptr: *mut c_void) {
        if !ptr.is_null() {
            CoTaskMemFree(Some(ptr as *const c_void));
        }
    }
}
