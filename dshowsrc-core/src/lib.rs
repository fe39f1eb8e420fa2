// 开启一些 Clippy 检查，保证代码质量
#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

// 模块定义
pub mod builder;
pub mod capture;
pub mod caps;
pub mod discovery;
pub mod error;
pub mod format;
pub mod guid;
pub mod media_type;
pub mod pin_media_type;
pub mod pixel_format;
pub mod traits;
pub mod video_caps;

#[cfg(test)]
pub(crate) mod fakes;

// 方便用户使用的 Prelude
pub mod prelude {
    pub use crate::builder::FilterQuery;
    pub use crate::capture::{capture_caps, CaptureCaps};
    pub use crate::caps::{Caps, Structure, Value};
    pub use crate::discovery::{
        device_path_from_name, find_filter, list_devices, open_device, pin_from_filter,
        supports_transform,
    };
    pub use crate::error::{DshowError, Result};
    pub use crate::guid::Guid;
    pub use crate::media_type::{check_media_type, AmMediaType, CoTaskMem, OwnedMediaType};
    pub use crate::pin_media_type::PinMediaType;
    pub use crate::pixel_format::{FourCC, PixelFormat};
    pub use crate::traits::{
        DeviceEnumerator, DeviceInfo, Filter, FilterMapper, Moniker, Pin, PinDirection,
        StreamConfig,
    };
}

// 版本与构建信息常量
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
