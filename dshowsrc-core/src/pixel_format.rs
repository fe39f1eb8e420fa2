use std::fmt::{self, Display};

use crate::guid::{self, Guid};

/// 四字符代码 (Four Character Code)，视频工业标准
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FourCC(pub u32);

impl FourCC {
    /// 从 ASCII 字符创建 FourCC
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self((a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24))
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_le_bytes();

        write!(f, "{}", String::from_utf8_lossy(&bytes))
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

/// 常用像素格式定义
impl FourCC {
    // --- YUV Formats ---
    /// I420 4:2:0 (Planar, Y-U-V)
    pub const I420: Self = Self::new(b'I', b'4', b'2', b'0');
    /// YUY2 4:2:2 - USB 摄像头最常用的未压缩格式
    pub const YUY2: Self = Self::new(b'Y', b'U', b'Y', b'2');

    // --- RGB Formats ---
    /// RGB24 (Little Endian: B-G-R)，DirectShow 的 MEDIASUBTYPE_RGB24
    pub const BGR3: Self = Self::new(b'B', b'G', b'R', b'3');

    // --- Compressed Formats ---
    /// Motion-JPEG
    pub const MJPG: Self = Self::new(b'M', b'J', b'P', b'G');
    /// DV 标清 (SD-DVCR 525-60 / 625-50)
    pub const DVSD: Self = Self::new(b'd', b'v', b's', b'd');
}

/// 像素格式的高级枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 已知的标准格式
    Known(FourCC),
    /// 驱动返回了库不认识的私有格式
    Unknown(u32),
}

impl PixelFormat {
    /// 由 DirectShow media subtype 推导像素格式
    ///
    /// MEDIASUBTYPE_RGB24 不是 FOURCC 形式的 GUID，需要单独映射。
    pub fn from_media_subtype(subtype: &Guid) -> Self {
        if *subtype == guid::MEDIASUBTYPE_RGB24 {
            return Self::Known(FourCC::BGR3);
        }
        match subtype.fourcc() {
            Some(cc) => Self::Known(cc),
            None => {
                tracing::trace!(target: "dshowsrc::core", "Non-FOURCC media subtype: {}", subtype);
                Self::Unknown(0)
            }
        }
    }

    /// 反向映射，用于构造过滤器查询
    pub fn to_media_subtype(&self) -> Option<Guid> {
        match self {
            Self::Known(FourCC::BGR3) => Some(guid::MEDIASUBTYPE_RGB24),
            Self::Known(cc) => Some(Guid::from_fourcc(*cc)),
            Self::Unknown(_) => None,
        }
    }
}

impl From<FourCC> for PixelFormat {
    fn from(cc: FourCC) -> Self {
        Self::Known(cc)
    }
}

impl PartialEq<PixelFormat> for FourCC {
    fn eq(&self, other: &PixelFormat) -> bool {
        match other {
            PixelFormat::Known(cc) => self == cc,
            PixelFormat::Unknown(val) => self.0 == *val,
        }
    }
}

// 反向比较也加上
impl PartialEq<FourCC> for PixelFormat {
    fn eq(&self, other: &FourCC) -> bool {
        match self {
            PixelFormat::Known(cc) => cc == other,
            PixelFormat::Unknown(val) => *val == other.0,
        }
    }
}
