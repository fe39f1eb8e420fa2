use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::S_OK;
use windows::Win32::Media::DirectShow::IBaseFilter;
use windows::Win32::System::Com::StructuredStorage::IPropertyBag;
use windows::Win32::System::Com::{CoTaskMemFree, CreateBindCtx, IBindCtx, IEnumMoniker, IMoniker};
use windows::Win32::System::Variant::{VariantClear, VARIANT, VT_BSTR};

use dshowsrc_core::error::{DshowError, Result};
use dshowsrc_core::traits::Moniker;

use crate::com::hresult_to_dshow_error;
use crate::filter::ComFilter;

/// An `IMoniker` naming a registered filter or a device.
#[derive(Debug, Clone)]
pub struct ComMoniker(pub IMoniker);

impl ComMoniker {
    unsafe fn property_bag(&self) -> Result<IPropertyBag> {
        self.0
            .BindToStorage(None::<&IBindCtx>, None::<&IMoniker>)
            .map_err(hresult_to_dshow_error)
    }
}

impl Moniker for ComMoniker {
    type Filter = ComFilter;

    fn friendly_name(&self) -> Option<String> {
        unsafe {
            let bag = self.property_bag().ok()?;
            read_bstr_property(&bag, w!("FriendlyName"))
        }
    }

    fn display_name(&self) -> Result<String> {
        unsafe {
            let ctx = CreateBindCtx(0).map_err(hresult_to_dshow_error)?;
            let name = self
                .0
                .GetDisplayName(&ctx, None::<&IMoniker>)
                .map_err(hresult_to_dshow_error)?;
            let result = name.to_string();
            CoTaskMemFree(Some(name.as_ptr() as *const std::ffi::c_void));
            result.map_err(|e| DshowError::Com(e.to_string()))
        }
    }

    fn bind_filter(&self) -> Result<ComFilter> {
        let filter: IBaseFilter = unsafe {
            self.0
                .BindToObject(None::<&IBindCtx>, None::<&IMoniker>)
                .map_err(hresult_to_dshow_error)?
        };
        Ok(ComFilter(filter))
    }
}

/// Reads a `BSTR` property, clearing the variant afterwards.
unsafe fn read_bstr_property(bag: &IPropertyBag, name: PCWSTR) -> Option<String> {
    let mut variant = VARIANT::default();
    bag.Read(name, &mut variant, None).ok()?;

    let inner = &variant.Anonymous.Anonymous;
    let value = (inner.vt == VT_BSTR).then(|| inner.Anonymous.bstrVal.to_string());

    let _ = VariantClear(&mut variant);
    value
}

/// Walks an `IEnumMoniker` one item at a time. Releases the enumerator on drop.
#[derive(Debug)]
pub struct MonikerIter {
    inner: Option<IEnumMoniker>,
}

impl MonikerIter {
    /// `None` stands for a category or query with no entries.
    pub(crate) fn new(inner: Option<IEnumMoniker>) -> Self {
        if let Some(e) = &inner {
            unsafe {
                let _ = e.Reset();
            }
        }
        Self { inner }
    }
}

impl Iterator for MonikerIter {
    type Item = ComMoniker;

    fn next(&mut self) -> Option<ComMoniker> {
        let e = self.inner.as_ref()?;
        let mut slot = [None; 1];
        let hr = unsafe { e.Next(&mut slot, None) };
        if hr != S_OK {
            // 枚举结束或失败，都释放枚举器
            self.inner = None;
            return None;
        }
        slot[0].take().map(ComMoniker)
    }
}
