use crate::guid::{Guid, MEDIATYPE_Video};
use crate::pixel_format::PixelFormat;

/// `MERIT_DO_NOT_USE`: filters at or below this merit are never picked
/// automatically.
pub const MERIT_DO_NOT_USE: u32 = 0x0020_0000;

/// 过滤器查询：输入/输出媒体类型对 + 偏好名称
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub input_major: Guid,
    pub input_subtype: Guid,
    pub output_major: Guid,
    pub output_subtype: Guid,
    /// 大小写不敏感的子串，匹配过滤器的 FriendlyName
    pub preferred_name: Option<String>,
    /// 最低 merit (默认 MERIT_DO_NOT_USE + 1)
    pub min_merit: u32,
}

impl FilterQuery {
    pub fn new(input_major: Guid, input_subtype: Guid, output_major: Guid, output_subtype: Guid) -> Self {
        Self {
            input_major,
            input_subtype,
            output_major,
            output_subtype,
            preferred_name: None,
            min_merit: MERIT_DO_NOT_USE + 1,
        }
    }

    /// 视频转换查询 (例如 DV -> I420 解码器)
    /// 无法映射为 media subtype 的格式返回 None
    pub fn video_transform(input: PixelFormat, output: PixelFormat) -> Option<Self> {
        Some(Self::new(
            MEDIATYPE_Video,
            input.to_media_subtype()?,
            MEDIATYPE_Video,
            output.to_media_subtype()?,
        ))
    }

    /// 设置偏好的过滤器名称 (子串匹配)
    /// 空字符串也是偏好：它匹配任何有 FriendlyName 的过滤器
    pub fn preferred_name(mut self, name: impl Into<String>) -> Self {
        self.preferred_name = Some(name.into());
        self
    }

    /// 设置最低 merit
    pub fn min_merit(mut self, merit: u32) -> Self {
        self.min_merit = merit;
        self
    }

    pub fn input_types(&self) -> [Guid; 2] {
        [self.input_major, self.input_subtype]
    }

    pub fn output_types(&self) -> [Guid; 2] {
        [self.output_major, self.output_subtype]
    }
}
