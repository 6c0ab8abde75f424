//! 与后端无关的图形枚举
//!
//! 各后端在 `backend::*` 中把它们翻译成原生常量。

use bitflags::bitflags;

/// 资源用途
/// - Immutable: 创建时必须提供数据
/// - Dynamic: 偶尔更新
/// - Stream: 每帧更新
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Usage {
    #[default]
    Immutable,
    Dynamic,
    Stream,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum IndexType {
    #[default]
    None,
    UInt16,
    UInt32,
}

impl IndexType {
    #[inline]
    pub fn byte_size(self) -> usize {
        match self {
            IndexType::None => 0,
            IndexType::UInt16 => 2,
            IndexType::UInt32 => 4,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum PixelFormat {
    #[default]
    RGBA8,
    RGB8,
    RGBA4,
    R5G6B5,
    R5G5B5A1,
    R10G10B10A2,
    RGBA32F,
    RGBA16F,
    R32F,
    R16F,
    L8,
    DXT1,
    DXT3,
    DXT5,
    /// 仅深度（至少 16 位）
    DEPTH,
    /// 深度 + 模板（通常为 D24S8）
    DEPTHSTENCIL,
    PVRTC2_RGB,
    PVRTC4_RGB,
    PVRTC2_RGBA,
    PVRTC4_RGBA,
    ETC2_RGB8,
    ETC2_SRGB8,
}

impl PixelFormat {
    pub fn is_valid_render_target_color_format(self) -> bool {
        matches!(
            self,
            PixelFormat::RGBA8 | PixelFormat::R10G10B10A2 | PixelFormat::RGBA32F | PixelFormat::RGBA16F
        )
    }

    #[inline]
    pub fn is_depth_format(self) -> bool {
        matches!(self, PixelFormat::DEPTH | PixelFormat::DEPTHSTENCIL)
    }

    #[inline]
    pub fn is_depth_stencil_format(self) -> bool {
        self == PixelFormat::DEPTHSTENCIL
    }

    pub fn is_compressed(self) -> bool {
        self.is_dxt() || self.is_pvrtc() || self.is_etc2()
    }

    pub fn is_dxt(self) -> bool {
        matches!(self, PixelFormat::DXT1 | PixelFormat::DXT3 | PixelFormat::DXT5)
    }

    pub fn is_pvrtc(self) -> bool {
        matches!(
            self,
            PixelFormat::PVRTC2_RGB | PixelFormat::PVRTC4_RGB | PixelFormat::PVRTC2_RGBA | PixelFormat::PVRTC4_RGBA
        )
    }

    pub fn is_etc2(self) -> bool {
        matches!(self, PixelFormat::ETC2_RGB8 | PixelFormat::ETC2_SRGB8)
    }

    /// 单个像素的字节数，压缩格式返回 None
    pub fn byte_size(self) -> Option<usize> {
        let size = match self {
            PixelFormat::RGBA32F => 16,
            PixelFormat::RGBA16F => 8,
            PixelFormat::RGBA8 | PixelFormat::R10G10B10A2 | PixelFormat::R32F => 4,
            PixelFormat::RGB8 => 3,
            PixelFormat::R5G6B5 | PixelFormat::R5G5B5A1 | PixelFormat::RGBA4 | PixelFormat::R16F => 2,
            PixelFormat::L8 => 1,
            // 并非所有平台都是 16 位
            PixelFormat::DEPTH => 2,
            PixelFormat::DEPTHSTENCIL => 4,
            _ => return None,
        };
        Some(size)
    }

    /// 一行像素的字节数（压缩格式按 4x4 块计算）
    pub fn row_pitch(self, width: u32) -> usize {
        let width = width as usize;
        match self {
            PixelFormat::DXT1 | PixelFormat::ETC2_RGB8 | PixelFormat::ETC2_SRGB8 => (width.div_ceil(4) * 8).max(8),
            PixelFormat::DXT3 | PixelFormat::DXT5 => (width.div_ceil(4) * 16).max(16),
            PixelFormat::PVRTC4_RGB | PixelFormat::PVRTC4_RGBA => {
                const BLOCK_SIZE: usize = 4 * 4;
                const BPP: usize = 4;
                (width / 4).max(2) * ((BLOCK_SIZE * BPP) / 8)
            }
            PixelFormat::PVRTC2_RGB | PixelFormat::PVRTC2_RGBA => {
                const BLOCK_SIZE: usize = 8 * 4;
                const BPP: usize = 2;
                (width / 4).max(2) * ((BLOCK_SIZE * BPP) / 8)
            }
            _ => width * self.byte_size().unwrap_or(0),
        }
    }

    /// 一整张图像（一个 mip 的一个面）的字节数
    pub fn image_pitch(self, width: u32, height: u32) -> usize {
        let num_rows = if self.is_compressed() {
            (height as usize).div_ceil(4)
        } else {
            height as usize
        };
        num_rows.max(1) * self.row_pitch(width)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TextureType {
    #[default]
    Texture2D,
    TextureCube,
    Texture3D,
    TextureArray,
}

impl TextureType {
    #[inline]
    pub fn num_faces(self) -> usize {
        if self == TextureType::TextureCube { 6 } else { 1 }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TextureFilterMode {
    Nearest,
    #[default]
    Linear,
    NearestMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapNearest,
    LinearMipmapLinear,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TextureWrapMode {
    ClampToEdge,
    #[default]
    Repeat,
    MirroredRepeat,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VertexFormat {
    Float,
    Float2,
    Float3,
    Float4,
    Byte4,
    Byte4N,
    UByte4,
    UByte4N,
    Short2,
    Short2N,
    Short4,
    Short4N,
    UInt10_2N,
}

impl VertexFormat {
    pub fn byte_size(self) -> usize {
        match self {
            VertexFormat::Float => 4,
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
            VertexFormat::Byte4
            | VertexFormat::Byte4N
            | VertexFormat::UByte4
            | VertexFormat::UByte4N
            | VertexFormat::Short2
            | VertexFormat::Short2N
            | VertexFormat::UInt10_2N => 4,
            VertexFormat::Short4 | VertexFormat::Short4N => 8,
        }
    }

    /// 分量个数
    pub fn num_components(self) -> u32 {
        match self {
            VertexFormat::Float => 1,
            VertexFormat::Float2 | VertexFormat::Short2 | VertexFormat::Short2N => 2,
            VertexFormat::Float3 => 3,
            _ => 4,
        }
    }

    pub fn is_normalized(self) -> bool {
        matches!(
            self,
            VertexFormat::Byte4N
                | VertexFormat::UByte4N
                | VertexFormat::Short2N
                | VertexFormat::Short4N
                | VertexFormat::UInt10_2N
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VertexAttr {
    Position,
    Normal,
    TexCoord0,
    TexCoord1,
    TexCoord2,
    TexCoord3,
    Tangent,
    Binormal,
    Weights,
    Indices,
    Color0,
    Color1,
}

impl VertexAttr {
    /// shader 中的 attribute location / semantic index
    #[inline]
    pub fn location(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            VertexAttr::Position => "position",
            VertexAttr::Normal => "normal",
            VertexAttr::TexCoord0 => "texcoord0",
            VertexAttr::TexCoord1 => "texcoord1",
            VertexAttr::TexCoord2 => "texcoord2",
            VertexAttr::TexCoord3 => "texcoord3",
            VertexAttr::Tangent => "tangent",
            VertexAttr::Binormal => "binormal",
            VertexAttr::Weights => "weights",
            VertexAttr::Indices => "indices",
            VertexAttr::Color0 => "color0",
            VertexAttr::Color1 => "color1",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum VertexStepFunction {
    #[default]
    PerVertex,
    PerInstance,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ShaderLang {
    /// OpenGLES 2.0 / WebGL 1.0
    Glsl100,
    /// OpenGL 3.3
    Glsl330,
    GlslEs3,
    /// D3D11 HLSL
    Hlsl5,
    Metal,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Face {
    Front,
    #[default]
    Back,
    Both,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    #[default]
    Always,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    IncrClamp,
    DecrClamp,
    Invert,
    IncrWrap,
    DecrWrap,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturated,
    BlendColor,
    OneMinusBlendColor,
    BlendAlpha,
    OneMinusBlendAlpha,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum BlendOperation {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
}

/// 开始渲染 pass 时对附件的处理
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum LoadAction {
    DontCare,
    Load,
    #[default]
    Clear,
}

bitflags! {
    /// 像素通道掩码，用于颜色写入掩码
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct PixelChannel: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const STENCIL = 1 << 4;
        const DEPTH = 1 << 5;

        const RGB = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        const RGBA = Self::RGB.bits() | Self::ALPHA.bits();
        const DEPTH_STENCIL = Self::DEPTH.bits() | Self::STENCIL.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_pitch() {
        assert_eq!(PixelFormat::RGBA8.row_pitch(16), 64);
        assert_eq!(PixelFormat::RGBA8.image_pitch(16, 8), 512);
        // DXT1: 4x4 块 8 字节，最少一个块
        assert_eq!(PixelFormat::DXT1.row_pitch(1), 8);
        assert_eq!(PixelFormat::DXT1.image_pitch(16, 16), 4 * 4 * 8);
        assert_eq!(PixelFormat::DXT5.image_pitch(8, 8), 2 * 2 * 16);
        assert_eq!(PixelFormat::PVRTC4_RGBA.row_pitch(4), 2 * 8);
    }

    #[test]
    fn test_pixel_format_classes() {
        assert!(PixelFormat::DXT3.is_compressed());
        assert!(PixelFormat::ETC2_SRGB8.is_etc2());
        assert!(!PixelFormat::RGBA16F.is_compressed());
        assert_eq!(PixelFormat::DXT1.byte_size(), None);
        assert!(PixelFormat::DEPTHSTENCIL.is_depth_format());
        assert!(!PixelFormat::RGB8.is_valid_render_target_color_format());
    }

    #[test]
    fn test_vertex_format_sizes() {
        assert_eq!(VertexFormat::Float3.byte_size(), 12);
        assert_eq!(VertexFormat::Short2N.byte_size(), 4);
        assert_eq!(VertexFormat::Short4.byte_size(), 8);
        assert_eq!(VertexFormat::UByte4N.num_components(), 4);
    }
}
