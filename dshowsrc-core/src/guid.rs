#![allow(non_upper_case_globals)]

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::pixel_format::FourCC;

/// A COM GUID with the Windows in-memory layout.
///
/// Kept separate from `windows::core::GUID` so that media type records can be
/// described and tested without the Windows SDK; the backend converts with
/// `from_u128` / `to_u128`.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

/// Tail shared by every FOURCC-derived media subtype
/// (`XXXXXXXX-0000-0010-8000-00AA00389B71`).
const FOURCC_SUBTYPE_BASE: u128 = 0x0000_0000_0000_0010_8000_00AA_0038_9B71;

impl Guid {
    pub const fn zeroed() -> Self {
        Self::from_u128(0)
    }

    pub const fn from_u128(uuid: u128) -> Self {
        Self {
            data1: (uuid >> 96) as u32,
            data2: (uuid >> 80 & 0xffff) as u16,
            data3: (uuid >> 64 & 0xffff) as u16,
            data4: (uuid as u64).to_be_bytes(),
        }
    }

    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | u64::from_be_bytes(self.data4) as u128
    }

    /// Media subtype GUID for a FOURCC code, e.g. `I420` -> `MEDIASUBTYPE_I420`.
    pub const fn from_fourcc(cc: FourCC) -> Self {
        Self::from_u128(((cc.0 as u128) << 96) | FOURCC_SUBTYPE_BASE)
    }

    /// The FOURCC encoded in a subtype GUID, if the GUID follows the FOURCC pattern.
    pub const fn fourcc(&self) -> Option<FourCC> {
        if self.to_u128() & 0xffff_ffff_ffff_ffff_ffff_ffff == FOURCC_SUBTYPE_BASE {
            Some(FourCC(self.data1))
        } else {
            None
        }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7]
        )
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

// --- Major types ---
pub const MEDIATYPE_Video: Guid = Guid::from_u128(0x73646976_0000_0010_8000_00AA00389B71);
pub const MEDIATYPE_Audio: Guid = Guid::from_u128(0x73647561_0000_0010_8000_00AA00389B71);
/// DV "type 1" streams carry audio and video interleaved.
pub const MEDIATYPE_Interleaved: Guid = Guid::from_u128(0x73766169_0000_0010_8000_00AA00389B71);

// --- Subtypes ---
pub const MEDIASUBTYPE_RGB24: Guid = Guid::from_u128(0xE436EB7D_524F_11CE_9F53_0020AF0BA770);
pub const MEDIASUBTYPE_RGB32: Guid = Guid::from_u128(0xE436EB7E_524F_11CE_9F53_0020AF0BA770);
pub const MEDIASUBTYPE_I420: Guid = Guid::from_fourcc(FourCC::I420);
pub const MEDIASUBTYPE_YUY2: Guid = Guid::from_fourcc(FourCC::YUY2);
pub const MEDIASUBTYPE_MJPG: Guid = Guid::from_fourcc(FourCC::MJPG);
pub const MEDIASUBTYPE_dvsd: Guid = Guid::from_fourcc(FourCC::DVSD);

// --- Format types ---
pub const FORMAT_VideoInfo: Guid = Guid::from_u128(0x05589F80_C356_11CE_BF01_00AA0055595A);
pub const FORMAT_WaveFormatEx: Guid = Guid::from_u128(0x05589F81_C356_11CE_BF01_00AA0055595A);
pub const FORMAT_DvInfo: Guid = Guid::from_u128(0x05589F84_C356_11CE_BF01_00AA0055595A);

// --- Device categories (ICreateDevEnum) ---
pub const CLSID_VideoInputDeviceCategory: Guid =
    Guid::from_u128(0x860BB310_5D01_11D0_BD3B_00A0C911CE86);
pub const CLSID_AudioInputDeviceCategory: Guid =
    Guid::from_u128(0x33D9A762_90C8_11D0_BD43_00A0C911CE86);
