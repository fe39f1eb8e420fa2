use std::mem::ManuallyDrop;

use windows::core::{IUnknown, Interface, PCWSTR};
use windows::Win32::Media::DirectShow::FILTER_INFO;
use windows::Win32::System::Com::CoTaskMemFree;
use windows::Win32::System::Ole::{ISpecifyPropertyPages, OleCreatePropertyFrame, CAUUID};
use windows::Win32::UI::WindowsAndMessaging::GetDesktopWindow;

use dshowsrc_core::error::Result;

use crate::com::hresult_to_dshow_error;
use crate::filter::ComFilter;

/// `QueryFilterInfo` 返回的 pGraph 需要 Release
struct FilterInfo(FILTER_INFO);

impl FilterInfo {
    unsafe fn query(filter: &ComFilter) -> Result<Self> {
        let mut info = Self(std::mem::zeroed());
        filter.0.QueryFilterInfo(&mut info.0).map_err(hresult_to_dshow_error)?;
        Ok(info)
    }
}

impl Drop for FilterInfo {
    fn drop(&mut self) {
        unsafe { ManuallyDrop::drop(&mut self.0.pGraph) };
    }
}

/// `GetPages` 返回的 GUID 数组由 CoTaskMem 分配
struct PageList(CAUUID);

impl Drop for PageList {
    fn drop(&mut self) {
        if !self.0.pElems.is_null() {
            unsafe { CoTaskMemFree(Some(self.0.pElems as *const std::ffi::c_void)) };
        }
    }
}

/// Shows the filter's own property pages in a modal frame owned by the
/// desktop window.
///
/// Returns `Ok(false)` without showing anything when the filter has no
/// property pages. Blocks until the user closes the frame.
pub fn show_property_page(filter: &ComFilter) -> Result<bool> {
    let Ok(pages_source) = filter.0.cast::<ISpecifyPropertyPages>() else {
        tracing::debug!(target: "dshowsrc::com", "Filter has no property pages");
        return Ok(false);
    };

    unsafe {
        let info = FilterInfo::query(filter)?;
        let unknown: IUnknown = filter.0.cast().map_err(hresult_to_dshow_error)?;
        let pages = PageList(pages_source.GetPages().map_err(hresult_to_dshow_error)?);
        drop(pages_source);

        let objects = [Some(unknown)];
        OleCreatePropertyFrame(
            GetDesktopWindow(),
            0,
            0,
            PCWSTR(info.0.achName.as_ptr()),
            1,
            objects.as_ptr(),
            pages.0.cElems,
            pages.0.pElems,
            0,
            0,
            None,
        )
        .map_err(hresult_to_dshow_error)?;
    }

    Ok(true)
}
