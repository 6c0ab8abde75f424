//! OpenGL 3.3 / GLES3 后端的参数翻译

use oryn_resource::InitError;

use crate::backend::{Backend, BackendType, NativeId};
use crate::resources::mesh::MeshSetup;
use crate::resources::pipeline::PipelineSetup;
use crate::resources::render_pass::RenderPassSetup;
use crate::resources::shader::{ShaderSetup, ShaderSource};
use crate::resources::texture::TextureSetup;
use crate::types::{
    BlendFactor, BlendOperation, CompareFunc, Face, IndexType, PixelFormat, PrimitiveType, ShaderLang,
    TextureFilterMode, TextureType, TextureWrapMode, Usage, VertexFormat, VertexStepFunction,
};

#[allow(clippy::upper_case_acronyms)]
pub type GLenum = u32;

const GL_POINTS: GLenum = 0x0000;
const GL_LINES: GLenum = 0x0001;
const GL_LINE_STRIP: GLenum = 0x0003;
const GL_TRIANGLES: GLenum = 0x0004;
const GL_TRIANGLE_STRIP: GLenum = 0x0005;

const GL_NEVER: GLenum = 0x0200;
const GL_LESS: GLenum = 0x0201;
const GL_EQUAL: GLenum = 0x0202;
const GL_LEQUAL: GLenum = 0x0203;
const GL_GREATER: GLenum = 0x0204;
const GL_NOTEQUAL: GLenum = 0x0205;
const GL_GEQUAL: GLenum = 0x0206;
const GL_ALWAYS: GLenum = 0x0207;

const GL_ZERO: GLenum = 0;
const GL_ONE: GLenum = 1;
const GL_SRC_COLOR: GLenum = 0x0300;
const GL_ONE_MINUS_SRC_COLOR: GLenum = 0x0301;
const GL_SRC_ALPHA: GLenum = 0x0302;
const GL_ONE_MINUS_SRC_ALPHA: GLenum = 0x0303;
const GL_DST_ALPHA: GLenum = 0x0304;
const GL_ONE_MINUS_DST_ALPHA: GLenum = 0x0305;
const GL_DST_COLOR: GLenum = 0x0306;
const GL_ONE_MINUS_DST_COLOR: GLenum = 0x0307;
const GL_SRC_ALPHA_SATURATE: GLenum = 0x0308;
const GL_CONSTANT_COLOR: GLenum = 0x8001;
const GL_ONE_MINUS_CONSTANT_COLOR: GLenum = 0x8002;
const GL_CONSTANT_ALPHA: GLenum = 0x8003;
const GL_ONE_MINUS_CONSTANT_ALPHA: GLenum = 0x8004;
const GL_FUNC_ADD: GLenum = 0x8006;
const GL_FUNC_SUBTRACT: GLenum = 0x800A;
const GL_FUNC_REVERSE_SUBTRACT: GLenum = 0x800B;

const GL_FRONT: GLenum = 0x0404;
const GL_BACK: GLenum = 0x0405;
const GL_FRONT_AND_BACK: GLenum = 0x0408;

const GL_BYTE: GLenum = 0x1400;
const GL_UNSIGNED_BYTE: GLenum = 0x1401;
const GL_SHORT: GLenum = 0x1402;
const GL_UNSIGNED_SHORT: GLenum = 0x1403;
const GL_UNSIGNED_INT: GLenum = 0x1405;
const GL_FLOAT: GLenum = 0x1406;
const GL_HALF_FLOAT: GLenum = 0x140B;
const GL_UNSIGNED_SHORT_4_4_4_4: GLenum = 0x8033;
const GL_UNSIGNED_SHORT_5_5_5_1: GLenum = 0x8034;
const GL_UNSIGNED_SHORT_5_6_5: GLenum = 0x8363;
const GL_UNSIGNED_INT_2_10_10_10_REV: GLenum = 0x8368;
const GL_UNSIGNED_INT_24_8: GLenum = 0x84FA;

const GL_DEPTH_COMPONENT: GLenum = 0x1902;
const GL_RED: GLenum = 0x1903;
const GL_RGB: GLenum = 0x1907;
const GL_RGBA: GLenum = 0x1908;
const GL_DEPTH_STENCIL: GLenum = 0x84F9;

const GL_RGB5: GLenum = 0x8050;
const GL_RGB8: GLenum = 0x8051;
const GL_RGBA4: GLenum = 0x8056;
const GL_RGB5_A1: GLenum = 0x8057;
const GL_RGBA8: GLenum = 0x8058;
const GL_RGB10_A2: GLenum = 0x8059;
const GL_DEPTH_COMPONENT16: GLenum = 0x81A5;
const GL_R8: GLenum = 0x8229;
const GL_R16F: GLenum = 0x822D;
const GL_R32F: GLenum = 0x822E;
const GL_RGBA32F: GLenum = 0x8814;
const GL_RGBA16F: GLenum = 0x881A;
const GL_DEPTH24_STENCIL8: GLenum = 0x88F0;
const GL_COMPRESSED_RGBA_S3TC_DXT1_EXT: GLenum = 0x83F1;
const GL_COMPRESSED_RGBA_S3TC_DXT3_EXT: GLenum = 0x83F2;
const GL_COMPRESSED_RGBA_S3TC_DXT5_EXT: GLenum = 0x83F3;
const GL_COMPRESSED_RGB_PVRTC_4BPPV1_IMG: GLenum = 0x8C00;
const GL_COMPRESSED_RGB_PVRTC_2BPPV1_IMG: GLenum = 0x8C01;
const GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG: GLenum = 0x8C02;
const GL_COMPRESSED_RGBA_PVRTC_2BPPV1_IMG: GLenum = 0x8C03;
const GL_COMPRESSED_RGB8_ETC2: GLenum = 0x9274;
const GL_COMPRESSED_SRGB8_ETC2: GLenum = 0x9275;

const GL_TEXTURE_2D: GLenum = 0x0DE1;
const GL_TEXTURE_3D: GLenum = 0x806F;
const GL_TEXTURE_CUBE_MAP: GLenum = 0x8513;
const GL_TEXTURE_2D_ARRAY: GLenum = 0x8C1A;

const GL_NEAREST: GLenum = 0x2600;
const GL_LINEAR: GLenum = 0x2601;
const GL_NEAREST_MIPMAP_NEAREST: GLenum = 0x2700;
const GL_LINEAR_MIPMAP_NEAREST: GLenum = 0x2701;
const GL_NEAREST_MIPMAP_LINEAR: GLenum = 0x2702;
const GL_LINEAR_MIPMAP_LINEAR: GLenum = 0x2703;
const GL_REPEAT: GLenum = 0x2901;
const GL_CLAMP_TO_EDGE: GLenum = 0x812F;
const GL_MIRRORED_REPEAT: GLenum = 0x8370;

const GL_ARRAY_BUFFER: GLenum = 0x8892;
const GL_ELEMENT_ARRAY_BUFFER: GLenum = 0x8893;
const GL_STREAM_DRAW: GLenum = 0x88E0;
const GL_STATIC_DRAW: GLenum = 0x88E4;
const GL_DYNAMIC_DRAW: GLenum = 0x88E8;

const GL_DEPTH_ATTACHMENT: GLenum = 0x8D00;
const GL_DEPTH_STENCIL_ATTACHMENT: GLenum = 0x821A;

pub struct GlBackend;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlVertexAttrib {
    pub location: u32,
    pub buffer_slot: u32,
    pub size: u32,
    pub ty: GLenum,
    pub normalized: bool,
    pub stride: usize,
    pub offset: usize,
    pub divisor: u32,
}

/// GL 没有 pipeline 对象，这些状态在应用 pipeline 时逐项设置
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlPipelineState {
    pub primitive_mode: GLenum,
    pub blend_enabled: bool,
    pub blend_src_rgb: GLenum,
    pub blend_dst_rgb: GLenum,
    pub blend_op_rgb: GLenum,
    pub blend_src_alpha: GLenum,
    pub blend_dst_alpha: GLenum,
    pub blend_op_alpha: GLenum,
    pub depth_func: GLenum,
    pub depth_write: bool,
    pub cull_face: Option<GLenum>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GlDesc {
    Buffer {
        target: GLenum,
        usage: GLenum,
        size: usize,
    },
    Texture {
        target: GLenum,
        internal_format: GLenum,
        format: GLenum,
        ty: GLenum,
        compressed: bool,
        width: u32,
        height: u32,
        depth: u32,
        num_mipmaps: u32,
        min_filter: GLenum,
        mag_filter: GLenum,
        wrap_s: GLenum,
        wrap_t: GLenum,
        wrap_r: GLenum,
    },
    /// 深度渲染目标用 renderbuffer
    Renderbuffer {
        internal_format: GLenum,
        width: u32,
        height: u32,
        samples: u32,
    },
    Program {
        vs: String,
        fs: String,
    },
    VertexArray {
        attribs: Vec<GlVertexAttrib>,
        state: GlPipelineState,
    },
    Framebuffer {
        colors: Vec<NativeId>,
        depth_stencil: Option<(GLenum, NativeId)>,
    },
}

fn unsupported(what: &str, value: impl std::fmt::Debug) -> InitError {
    InitError::InvalidSetup(format!("GL: unsupported {} {:?}", what, value))
}

// 类型翻译
impl GlBackend {
    pub fn as_gl_usage(usage: Usage) -> GLenum {
        match usage {
            Usage::Immutable => GL_STATIC_DRAW,
            Usage::Dynamic => GL_DYNAMIC_DRAW,
            Usage::Stream => GL_STREAM_DRAW,
        }
    }

    pub fn as_gl_primitive_mode(primitive_type: PrimitiveType) -> GLenum {
        match primitive_type {
            PrimitiveType::Points => GL_POINTS,
            PrimitiveType::Lines => GL_LINES,
            PrimitiveType::LineStrip => GL_LINE_STRIP,
            PrimitiveType::Triangles => GL_TRIANGLES,
            PrimitiveType::TriangleStrip => GL_TRIANGLE_STRIP,
        }
    }

    pub fn as_gl_index_type(index_type: IndexType) -> Option<GLenum> {
        match index_type {
            IndexType::None => None,
            IndexType::UInt16 => Some(GL_UNSIGNED_SHORT),
            IndexType::UInt32 => Some(GL_UNSIGNED_INT),
        }
    }

    pub fn as_gl_texture_target(texture_type: TextureType) -> GLenum {
        match texture_type {
            TextureType::Texture2D => GL_TEXTURE_2D,
            TextureType::TextureCube => GL_TEXTURE_CUBE_MAP,
            TextureType::Texture3D => GL_TEXTURE_3D,
            TextureType::TextureArray => GL_TEXTURE_2D_ARRAY,
        }
    }

    pub fn as_gl_tex_image_format(format: PixelFormat) -> Result<GLenum, InitError> {
        match format {
            PixelFormat::RGBA8
            | PixelFormat::R5G5B5A1
            | PixelFormat::RGBA4
            | PixelFormat::RGBA32F
            | PixelFormat::RGBA16F
            | PixelFormat::R10G10B10A2 => Ok(GL_RGBA),
            PixelFormat::RGB8 | PixelFormat::R5G6B5 => Ok(GL_RGB),
            PixelFormat::L8 | PixelFormat::R32F | PixelFormat::R16F => Ok(GL_RED),
            PixelFormat::DEPTH => Ok(GL_DEPTH_COMPONENT),
            PixelFormat::DEPTHSTENCIL => Ok(GL_DEPTH_STENCIL),
            // 压缩格式不需要 format 参数
            _ if format.is_compressed() => Ok(0),
            _ => Err(unsupported("pixel format", format)),
        }
    }

    pub fn as_gl_tex_image_internal_format(format: PixelFormat) -> GLenum {
        match format {
            PixelFormat::RGBA8 => GL_RGBA8,
            PixelFormat::R5G5B5A1 => GL_RGB5_A1,
            PixelFormat::RGBA4 => GL_RGBA4,
            PixelFormat::RGBA32F => GL_RGBA32F,
            PixelFormat::RGBA16F => GL_RGBA16F,
            PixelFormat::R10G10B10A2 => GL_RGB10_A2,
            PixelFormat::RGB8 => GL_RGB8,
            PixelFormat::R5G6B5 => GL_RGB5,
            PixelFormat::L8 => GL_R8,
            PixelFormat::R32F => GL_R32F,
            PixelFormat::R16F => GL_R16F,
            PixelFormat::DEPTH => GL_DEPTH_COMPONENT16,
            PixelFormat::DEPTHSTENCIL => GL_DEPTH24_STENCIL8,
            PixelFormat::DXT1 => GL_COMPRESSED_RGBA_S3TC_DXT1_EXT,
            PixelFormat::DXT3 => GL_COMPRESSED_RGBA_S3TC_DXT3_EXT,
            PixelFormat::DXT5 => GL_COMPRESSED_RGBA_S3TC_DXT5_EXT,
            PixelFormat::PVRTC2_RGB => GL_COMPRESSED_RGB_PVRTC_2BPPV1_IMG,
            PixelFormat::PVRTC4_RGB => GL_COMPRESSED_RGB_PVRTC_4BPPV1_IMG,
            PixelFormat::PVRTC2_RGBA => GL_COMPRESSED_RGBA_PVRTC_2BPPV1_IMG,
            PixelFormat::PVRTC4_RGBA => GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG,
            PixelFormat::ETC2_RGB8 => GL_COMPRESSED_RGB8_ETC2,
            PixelFormat::ETC2_SRGB8 => GL_COMPRESSED_SRGB8_ETC2,
        }
    }

    pub fn as_gl_tex_image_type(format: PixelFormat) -> Result<GLenum, InitError> {
        match format {
            PixelFormat::RGBA32F | PixelFormat::R32F => Ok(GL_FLOAT),
            PixelFormat::RGBA16F | PixelFormat::R16F => Ok(GL_HALF_FLOAT),
            PixelFormat::RGBA8 | PixelFormat::RGB8 | PixelFormat::L8 => Ok(GL_UNSIGNED_BYTE),
            PixelFormat::R5G5B5A1 => Ok(GL_UNSIGNED_SHORT_5_5_5_1),
            PixelFormat::R5G6B5 => Ok(GL_UNSIGNED_SHORT_5_6_5),
            PixelFormat::RGBA4 => Ok(GL_UNSIGNED_SHORT_4_4_4_4),
            PixelFormat::R10G10B10A2 => Ok(GL_UNSIGNED_INT_2_10_10_10_REV),
            PixelFormat::DEPTH => Ok(GL_UNSIGNED_SHORT),
            PixelFormat::DEPTHSTENCIL => Ok(GL_UNSIGNED_INT_24_8),
            _ if format.is_compressed() => Ok(0),
            _ => Err(unsupported("pixel type", format)),
        }
    }

    pub fn as_gl_tex_filter(filter: TextureFilterMode) -> GLenum {
        match filter {
            TextureFilterMode::Nearest => GL_NEAREST,
            TextureFilterMode::Linear => GL_LINEAR,
            TextureFilterMode::NearestMipmapNearest => GL_NEAREST_MIPMAP_NEAREST,
            TextureFilterMode::NearestMipmapLinear => GL_NEAREST_MIPMAP_LINEAR,
            TextureFilterMode::LinearMipmapNearest => GL_LINEAR_MIPMAP_NEAREST,
            TextureFilterMode::LinearMipmapLinear => GL_LINEAR_MIPMAP_LINEAR,
        }
    }

    pub fn as_gl_wrap_mode(wrap: TextureWrapMode) -> GLenum {
        match wrap {
            TextureWrapMode::ClampToEdge => GL_CLAMP_TO_EDGE,
            TextureWrapMode::Repeat => GL_REPEAT,
            TextureWrapMode::MirroredRepeat => GL_MIRRORED_REPEAT,
        }
    }

    /// (分量个数, 类型, 是否归一化)
    pub fn as_gl_vertex_attr(format: VertexFormat) -> (u32, GLenum, bool) {
        let ty = match format {
            VertexFormat::Float | VertexFormat::Float2 | VertexFormat::Float3 | VertexFormat::Float4 => GL_FLOAT,
            VertexFormat::Byte4 | VertexFormat::Byte4N => GL_BYTE,
            VertexFormat::UByte4 | VertexFormat::UByte4N => GL_UNSIGNED_BYTE,
            VertexFormat::Short2 | VertexFormat::Short2N | VertexFormat::Short4 | VertexFormat::Short4N => GL_SHORT,
            VertexFormat::UInt10_2N => GL_UNSIGNED_INT_2_10_10_10_REV,
        };
        (format.num_components(), ty, format.is_normalized())
    }

    pub fn as_gl_compare_func(func: CompareFunc) -> GLenum {
        match func {
            CompareFunc::Never => GL_NEVER,
            CompareFunc::Less => GL_LESS,
            CompareFunc::Equal => GL_EQUAL,
            CompareFunc::LessEqual => GL_LEQUAL,
            CompareFunc::Greater => GL_GREATER,
            CompareFunc::NotEqual => GL_NOTEQUAL,
            CompareFunc::GreaterEqual => GL_GEQUAL,
            CompareFunc::Always => GL_ALWAYS,
        }
    }

    pub fn as_gl_blend_factor(factor: BlendFactor) -> GLenum {
        match factor {
            BlendFactor::Zero => GL_ZERO,
            BlendFactor::One => GL_ONE,
            BlendFactor::SrcColor => GL_SRC_COLOR,
            BlendFactor::OneMinusSrcColor => GL_ONE_MINUS_SRC_COLOR,
            BlendFactor::SrcAlpha => GL_SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => GL_ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstColor => GL_DST_COLOR,
            BlendFactor::OneMinusDstColor => GL_ONE_MINUS_DST_COLOR,
            BlendFactor::DstAlpha => GL_DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => GL_ONE_MINUS_DST_ALPHA,
            BlendFactor::SrcAlphaSaturated => GL_SRC_ALPHA_SATURATE,
            BlendFactor::BlendColor => GL_CONSTANT_COLOR,
            BlendFactor::OneMinusBlendColor => GL_ONE_MINUS_CONSTANT_COLOR,
            BlendFactor::BlendAlpha => GL_CONSTANT_ALPHA,
            BlendFactor::OneMinusBlendAlpha => GL_ONE_MINUS_CONSTANT_ALPHA,
        }
    }

    pub fn as_gl_blend_op(op: BlendOperation) -> GLenum {
        match op {
            BlendOperation::Add => GL_FUNC_ADD,
            BlendOperation::Subtract => GL_FUNC_SUBTRACT,
            BlendOperation::ReverseSubtract => GL_FUNC_REVERSE_SUBTRACT,
        }
    }

    pub fn as_gl_cull_face(face: Face) -> GLenum {
        match face {
            Face::Front => GL_FRONT,
            Face::Back => GL_BACK,
            Face::Both => GL_FRONT_AND_BACK,
        }
    }

    fn source_text<'a>(source: &'a ShaderSource, lang: ShaderLang) -> Result<&'a str, InitError> {
        match source {
            ShaderSource::Source(text) => Ok(text),
            ShaderSource::ByteCode(_) => Err(unsupported("shader byte code for", lang)),
        }
    }
}

impl Backend for GlBackend {
    type Desc = GlDesc;

    const TYPE: BackendType = BackendType::Gl;
    /// Stream buffer 双缓冲，避免写入 GPU 正在读的 buffer
    const STREAM_BUFFER_SLOTS: usize = 2;
    const SHADER_LANGS: &'static [ShaderLang] = &[ShaderLang::Glsl330, ShaderLang::GlslEs3, ShaderLang::Glsl100];

    fn vertex_buffer_desc(setup: &MeshSetup) -> Result<GlDesc, InitError> {
        Ok(GlDesc::Buffer {
            target: GL_ARRAY_BUFFER,
            usage: Self::as_gl_usage(setup.vertex_usage),
            size: setup.vertex_data_size(),
        })
    }

    fn index_buffer_desc(setup: &MeshSetup) -> Result<GlDesc, InitError> {
        Self::as_gl_index_type(setup.index_type).ok_or_else(|| unsupported("index type", setup.index_type))?;
        Ok(GlDesc::Buffer {
            target: GL_ELEMENT_ARRAY_BUFFER,
            usage: Self::as_gl_usage(setup.index_usage),
            size: setup.index_data_size(),
        })
    }

    fn texture_descs(setup: &TextureSetup) -> Result<Vec<GlDesc>, InitError> {
        if setup.render_target && setup.color_format.is_depth_format() {
            return Ok(vec![GlDesc::Renderbuffer {
                internal_format: Self::as_gl_tex_image_internal_format(setup.color_format),
                width: setup.width,
                height: setup.height,
                samples: setup.sample_count,
            }]);
        }
        Ok(vec![GlDesc::Texture {
            target: Self::as_gl_texture_target(setup.texture_type),
            internal_format: Self::as_gl_tex_image_internal_format(setup.color_format),
            format: Self::as_gl_tex_image_format(setup.color_format)?,
            ty: Self::as_gl_tex_image_type(setup.color_format)?,
            compressed: setup.color_format.is_compressed(),
            width: setup.width,
            height: setup.height,
            depth: setup.depth,
            num_mipmaps: setup.num_mipmaps,
            min_filter: Self::as_gl_tex_filter(setup.sampler.min_filter),
            mag_filter: Self::as_gl_tex_filter(setup.sampler.mag_filter),
            wrap_s: Self::as_gl_wrap_mode(setup.sampler.wrap_u),
            wrap_t: Self::as_gl_wrap_mode(setup.sampler.wrap_v),
            wrap_r: Self::as_gl_wrap_mode(setup.sampler.wrap_w),
        }])
    }

    fn shader_descs(setup: &ShaderSetup) -> Result<Vec<GlDesc>, InitError> {
        let program = setup.select_program(Self::SHADER_LANGS)?;
        Ok(vec![GlDesc::Program {
            vs: Self::source_text(&program.vs, program.lang)?.to_string(),
            fs: Self::source_text(&program.fs, program.lang)?.to_string(),
        }])
    }

    fn pipeline_descs(setup: &PipelineSetup) -> Result<Vec<GlDesc>, InitError> {
        let mut attribs = Vec::new();
        for (slot, layout) in setup.layouts.iter().enumerate() {
            let divisor = match layout.step_function {
                VertexStepFunction::PerVertex => 0,
                VertexStepFunction::PerInstance => layout.step_rate.max(1),
            };
            for (i, component) in layout.components().iter().enumerate() {
                let (size, ty, normalized) = Self::as_gl_vertex_attr(component.format);
                attribs.push(GlVertexAttrib {
                    location: component.attr.location(),
                    buffer_slot: slot as u32,
                    size,
                    ty,
                    normalized,
                    stride: layout.byte_size(),
                    offset: layout.component_byte_offset(i),
                    divisor,
                });
            }
        }

        let blend = &setup.blend;
        let state = GlPipelineState {
            primitive_mode: Self::as_gl_primitive_mode(setup.primitive_type),
            blend_enabled: blend.enabled,
            blend_src_rgb: Self::as_gl_blend_factor(blend.src_factor_rgb),
            blend_dst_rgb: Self::as_gl_blend_factor(blend.dst_factor_rgb),
            blend_op_rgb: Self::as_gl_blend_op(blend.op_rgb),
            blend_src_alpha: Self::as_gl_blend_factor(blend.src_factor_alpha),
            blend_dst_alpha: Self::as_gl_blend_factor(blend.dst_factor_alpha),
            blend_op_alpha: Self::as_gl_blend_op(blend.op_alpha),
            depth_func: Self::as_gl_compare_func(setup.depth_stencil.depth_compare),
            depth_write: setup.depth_stencil.depth_write_enabled,
            cull_face: setup
                .rasterizer
                .cull_face_enabled
                .then(|| Self::as_gl_cull_face(setup.rasterizer.cull_face)),
        };
        Ok(vec![GlDesc::VertexArray { attribs, state }])
    }

    fn render_pass_descs(setup: &RenderPassSetup) -> Result<Vec<GlDesc>, InitError> {
        let resolved = setup.resolved()?;
        let depth_stencil = resolved.depth_stencil.map(|depth| {
            let attachment = if depth.format.is_depth_stencil_format() {
                GL_DEPTH_STENCIL_ATTACHMENT
            } else {
                GL_DEPTH_ATTACHMENT
            };
            (attachment, depth.object)
        });
        Ok(vec![GlDesc::Framebuffer {
            colors: resolved.colors.iter().map(|c| c.object).collect(),
            depth_stencil,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{VertexAttr, VertexFormat};
    use crate::vertex_layout::VertexLayout;

    #[test]
    fn test_texture_format_table() {
        assert_eq!(GlBackend::as_gl_tex_image_internal_format(PixelFormat::RGBA8), 0x8058);
        assert_eq!(GlBackend::as_gl_tex_image_internal_format(PixelFormat::DXT1), 0x83F1);
        assert_eq!(GlBackend::as_gl_tex_image_internal_format(PixelFormat::PVRTC4_RGBA), 0x8C02);
        assert_eq!(GlBackend::as_gl_tex_image_internal_format(PixelFormat::ETC2_SRGB8), 0x9275);
        assert_eq!(GlBackend::as_gl_tex_image_format(PixelFormat::R5G6B5).unwrap(), GL_RGB);
        assert_eq!(GlBackend::as_gl_tex_image_type(PixelFormat::RGBA16F).unwrap(), GL_HALF_FLOAT);
    }

    #[test]
    fn test_usage_and_primitive_table() {
        assert_eq!(GlBackend::as_gl_usage(Usage::Immutable), GL_STATIC_DRAW);
        assert_eq!(GlBackend::as_gl_usage(Usage::Stream), GL_STREAM_DRAW);
        assert_eq!(GlBackend::as_gl_primitive_mode(PrimitiveType::TriangleStrip), GL_TRIANGLE_STRIP);
        assert_eq!(GlBackend::as_gl_index_type(IndexType::None), None);
    }

    #[test]
    fn test_mesh_buffers() {
        let layout = VertexLayout::new().add(VertexAttr::Position, VertexFormat::Float3);
        let setup = MeshSetup::from_data(layout, 3, IndexType::UInt16, 3);

        let vb = GlBackend::vertex_buffer_desc(&setup).unwrap();
        assert_eq!(
            vb,
            GlDesc::Buffer {
                target: GL_ARRAY_BUFFER,
                usage: GL_STATIC_DRAW,
                size: 36
            }
        );
        let ib = GlBackend::index_buffer_desc(&setup).unwrap();
        assert!(matches!(ib, GlDesc::Buffer { target: GL_ELEMENT_ARRAY_BUFFER, size: 6, .. }));
    }

    #[test]
    fn test_shader_requires_glsl() {
        let hlsl_only = ShaderSetup::default().with_program(ShaderLang::Hlsl5, vec![1u8, 2], vec![3u8]);
        assert!(GlBackend::shader_descs(&hlsl_only).is_err());

        let glsl = ShaderSetup::default().with_program(ShaderLang::Glsl330, "void main(){}", "void main(){}");
        assert_eq!(GlBackend::shader_descs(&glsl).unwrap().len(), 1);
    }
}
