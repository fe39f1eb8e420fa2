#![cfg(target_os = "windows")]

pub mod com;
pub mod device;
pub mod filter;
pub mod mapper;
pub mod moniker;
pub mod property_page;

use dshowsrc_core::builder::FilterQuery;
use dshowsrc_core::capture::{self, CaptureCaps};
use dshowsrc_core::discovery;
use dshowsrc_core::error::{DshowError, Result};
use dshowsrc_core::guid::{Guid, CLSID_VideoInputDeviceCategory};
use dshowsrc_core::pixel_format::PixelFormat;
use dshowsrc_core::traits::DeviceInfo;

pub use crate::com::{initialize_com, shutdown_com, ComApartment, ComGuard, CoTaskMemAllocator};
pub use crate::device::SystemDeviceEnum;
pub use crate::filter::{ComFilter, ComPin, ComStreamConfig};
pub use crate::mapper::FilterMapper2;
pub use crate::moniker::ComMoniker;
pub use crate::property_page::show_property_page;

/// Entry point over the system device enumerator and the filter mapper.
///
/// Keeps COM initialized on the creating thread for as long as it lives, so
/// it cannot be sent to another thread.
#[derive(Debug)]
pub struct DshowDriver {
    devices: SystemDeviceEnum,
    mapper: FilterMapper2,
    // 最后释放
    _com: ComGuard,
}

impl DshowDriver {
    pub fn new() -> Result<Self> {
        Self::with_apartment(ComApartment::default())
    }

    pub fn with_apartment(apartment: ComApartment) -> Result<Self> {
        let com = ComGuard::new(apartment)?;
        Ok(Self {
            devices: SystemDeviceEnum::new()?,
            mapper: FilterMapper2::new()?,
            _com: com,
        })
    }

    /// Video capture devices that report a name.
    pub fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        self.list_devices_in(&CLSID_VideoInputDeviceCategory)
    }

    pub fn list_devices_in(&self, category: &Guid) -> Result<Vec<DeviceInfo>> {
        discovery::list_devices(&self.devices, category)
    }

    /// Display name of the video capture device called `name`; an empty name
    /// picks the first device.
    pub fn device_path(&self, name: &str) -> Result<Option<DeviceInfo>> {
        discovery::device_path_from_name(&self.devices, &CLSID_VideoInputDeviceCategory, name)
    }

    pub fn open_device(&self, path: &str) -> Result<ComFilter> {
        discovery::open_device(&self.devices, &CLSID_VideoInputDeviceCategory, path)
    }

    pub fn find_filter(&self, query: &FilterQuery) -> Result<Option<ComFilter>> {
        discovery::find_filter(&self.mapper, query)
    }

    /// A video filter converting `input` to `output`, optionally preferring
    /// one whose name contains `preferred_name`.
    pub fn find_video_transform(
        &self,
        input: PixelFormat,
        output: PixelFormat,
        preferred_name: Option<&str>,
    ) -> Result<Option<ComFilter>> {
        let mut query =
            FilterQuery::video_transform(input, output).ok_or(DshowError::FormatNotSupported)?;
        if let Some(name) = preferred_name {
            query = query.preferred_name(name);
        }
        self.find_filter(&query)
    }

    pub fn supports_transform(&self, query: &FilterQuery) -> Result<bool> {
        discovery::supports_transform(&self.mapper, query)
    }

    pub fn capture_caps(&self, filter: &ComFilter) -> Result<CaptureCaps<ComPin>> {
        capture::capture_caps(filter)
    }

    pub fn show_property_page(&self, filter: &ComFilter) -> Result<bool> {
        show_property_page(filter)
    }
}
