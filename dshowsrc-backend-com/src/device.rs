use windows::Win32::Media::DirectShow::ICreateDevEnum;
use windows::Win32::Media::MediaFoundation::CLSID_SystemDeviceEnum;
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};

use dshowsrc_core::error::Result;
use dshowsrc_core::guid::Guid;
use dshowsrc_core::traits::DeviceEnumerator;

use crate::com::{hresult_to_dshow_error, win_guid};
use crate::moniker::{ComMoniker, MonikerIter};

/// The system device enumerator (`ICreateDevEnum`).
#[derive(Debug, Clone)]
pub struct SystemDeviceEnum(pub ICreateDevEnum);

impl SystemDeviceEnum {
    pub fn new() -> Result<Self> {
        let inner: ICreateDevEnum =
            unsafe { CoCreateInstance(&CLSID_SystemDeviceEnum, None, CLSCTX_INPROC_SERVER) }
                .map_err(hresult_to_dshow_error)?;
        Ok(Self(inner))
    }
}

impl DeviceEnumerator for SystemDeviceEnum {
    type Moniker = ComMoniker;
    type Monikers = MonikerIter;

    fn class_enumerator(&self, category: &Guid) -> Result<MonikerIter> {
        let mut enum_moniker = None;
        // 类别为空时返回 S_FALSE 且不给出枚举器
        unsafe {
            self.0
                .CreateClassEnumerator(&win_guid(category), &mut enum_moniker, 0)
        }
        .map_err(hresult_to_dshow_error)?;

        if enum_moniker.is_none() {
            tracing::debug!(target: "dshowsrc::com", "No devices in category {}", category);
        }
        Ok(MonikerIter::new(enum_moniker))
    }
}
