use windows::core::Interface;
use windows::Win32::Foundation::S_OK;
use windows::Win32::Media::DirectShow::{IAMStreamConfig, IBaseFilter, IEnumPins, IPin, PINDIR_INPUT};
use windows::Win32::Media::MediaFoundation::AM_MEDIA_TYPE;

use dshowsrc_core::error::{DshowError, Result};
use dshowsrc_core::format::VideoStreamConfigCaps;
use dshowsrc_core::media_type::AmMediaType;
use dshowsrc_core::traits::{Filter, Pin, PinDirection, StreamConfig};

use crate::com::{hresult_to_dshow_error, CoTaskMemAllocator};

/// An `IBaseFilter`.
#[derive(Debug, Clone)]
pub struct ComFilter(pub IBaseFilter);

impl Filter for ComFilter {
    type Pin = ComPin;
    type Pins = PinIter;

    fn pins(&self) -> Result<PinIter> {
        let inner = unsafe { self.0.EnumPins() }.map_err(hresult_to_dshow_error)?;
        Ok(PinIter { inner: Some(inner) })
    }
}

/// Walks an `IEnumPins`. Releases the enumerator on drop.
#[derive(Debug)]
pub struct PinIter {
    inner: Option<IEnumPins>,
}

impl Iterator for PinIter {
    type Item = ComPin;

    fn next(&mut self) -> Option<ComPin> {
        let e = self.inner.as_ref()?;
        let mut slot = [None; 1];
        let hr = unsafe { e.Next(&mut slot, None) };
        if hr != S_OK {
            self.inner = None;
            return None;
        }
        slot[0].take().map(ComPin)
    }
}

/// An `IPin`.
#[derive(Debug, Clone)]
pub struct ComPin(pub IPin);

impl Pin for ComPin {
    type Config = ComStreamConfig;

    fn direction(&self) -> Result<PinDirection> {
        let dir = unsafe { self.0.QueryDirection() }.map_err(hresult_to_dshow_error)?;
        Ok(if dir == PINDIR_INPUT {
            PinDirection::Input
        } else {
            PinDirection::Output
        })
    }

    fn stream_config(&self) -> Result<ComStreamConfig> {
        self.0
            .cast::<IAMStreamConfig>()
            .map(ComStreamConfig)
            .map_err(hresult_to_dshow_error)
    }
}

/// The `IAMStreamConfig` of a capture pin.
#[derive(Debug, Clone)]
pub struct ComStreamConfig(pub IAMStreamConfig);

impl StreamConfig for ComStreamConfig {
    type Alloc = CoTaskMemAllocator;

    fn allocator(&self) -> CoTaskMemAllocator {
        CoTaskMemAllocator
    }

    fn capability_count(&self) -> Result<usize> {
        let mut count = 0i32;
        let mut size = 0i32;
        unsafe { self.0.GetNumberOfCapabilities(&mut count, &mut size) }
            .map_err(hresult_to_dshow_error)?;

        // 只处理视频能力 (VIDEO_STREAM_CONFIG_CAPS)
        if size as usize != std::mem::size_of::<VideoStreamConfigCaps>() {
            tracing::warn!(target: "dshowsrc::com", "Unexpected capability record size {}", size);
            return Err(DshowError::FormatNotSupported);
        }
        Ok(count.max(0) as usize)
    }

    unsafe fn stream_caps(
        &self,
        index: usize,
        media_type: &mut *mut AmMediaType,
        caps: &mut VideoStreamConfigCaps,
    ) -> Result<()> {
        let index = i32::try_from(index).map_err(|e| DshowError::Com(e.to_string()))?;
        self.0
            .GetStreamCaps(
                index,
                (media_type as *mut *mut AmMediaType).cast::<*mut AM_MEDIA_TYPE>(),
                (caps as *mut VideoStreamConfigCaps).cast::<u8>(),
            )
            .map_err(hresult_to_dshow_error)
    }
}
