//! Metal 后端的参数翻译

use bitflags::bitflags;
use oryn_resource::InitError;

use crate::backend::{Backend, BackendType};
use crate::resources::mesh::MeshSetup;
use crate::resources::pipeline::PipelineSetup;
use crate::resources::render_pass::RenderPassSetup;
use crate::resources::shader::{ShaderSetup, ShaderSource};
use crate::resources::texture::TextureSetup;
use crate::types::{
    BlendFactor, BlendOperation, CompareFunc, Face, IndexType, PixelFormat, PrimitiveType, ShaderLang,
    TextureFilterMode, TextureType, TextureWrapMode, Usage, VertexFormat, VertexStepFunction,
};

/// MTLResourceOptions 中的 storage / cpu cache 部分
pub const MTL_RESOURCE_STORAGE_MODE_SHARED: u32 = 0;
pub const MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED: u32 = 1;
pub const MTL_RESOURCE_STORAGE_MODE_MANAGED: u32 = 1 << 4;
pub const MTL_RESOURCE_STORAGE_MODE_PRIVATE: u32 = 2 << 4;

bitflags! {
    /// MTLTextureUsage
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct MtlTextureUsage: u32 {
        const SHADER_READ = 0x1;
        const SHADER_WRITE = 0x2;
        const RENDER_TARGET = 0x4;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MtlVertexAttribute {
    pub index: u32,
    pub format: u32,
    pub offset: usize,
    pub buffer_index: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MtlVertexBufferLayout {
    pub stride: usize,
    pub per_instance: bool,
    pub step_rate: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MtlDesc {
    Buffer {
        length: usize,
        options: u32,
    },
    Texture {
        texture_type: u32,
        pixel_format: u32,
        width: u32,
        height: u32,
        depth: u32,
        array_length: u32,
        mipmap_level_count: u32,
        sample_count: u32,
        usage: MtlTextureUsage,
        storage_mode: u32,
    },
    SamplerState {
        min_filter: u32,
        mag_filter: u32,
        mip_filter: u32,
        s_address_mode: u32,
        t_address_mode: u32,
        r_address_mode: u32,
    },
    Library {
        source: Option<String>,
        byte_code: Option<Vec<u8>>,
        vertex_function: String,
        fragment_function: String,
    },
    RenderPipelineState {
        attributes: Vec<MtlVertexAttribute>,
        layouts: Vec<MtlVertexBufferLayout>,
        color_pixel_format: u32,
        depth_pixel_format: u32,
        stencil_pixel_format: u32,
        blending_enabled: bool,
        source_rgb_blend_factor: u32,
        destination_rgb_blend_factor: u32,
        rgb_blend_operation: u32,
        source_alpha_blend_factor: u32,
        destination_alpha_blend_factor: u32,
        alpha_blend_operation: u32,
        write_mask: u8,
        sample_count: u32,
        /// 以下两项在 encoder 上设置，随 pipeline 一起保存
        primitive_type: u32,
        cull_mode: u32,
    },
    DepthStencilState {
        depth_compare_function: u32,
        depth_write_enabled: bool,
    },
}

pub struct MetalBackend;

fn unsupported(what: &str, value: impl std::fmt::Debug) -> InitError {
    InitError::InvalidSetup(format!("Metal: unsupported {} {:?}", what, value))
}

// 类型翻译
impl MetalBackend {
    /// MTLPixelFormat
    pub fn as_pixel_format(format: PixelFormat) -> Result<u32, InitError> {
        match format {
            PixelFormat::RGBA8 => Ok(70),
            PixelFormat::RGBA32F => Ok(125),
            PixelFormat::RGBA16F => Ok(115),
            PixelFormat::R10G10B10A2 => Ok(90),
            PixelFormat::R32F => Ok(55),
            PixelFormat::R16F => Ok(25),
            PixelFormat::L8 => Ok(10),
            PixelFormat::R5G6B5 => Ok(40),
            PixelFormat::R5G5B5A1 => Ok(41),
            PixelFormat::RGBA4 => Ok(42),
            PixelFormat::DXT1 => Ok(130),
            PixelFormat::DXT3 => Ok(132),
            PixelFormat::DXT5 => Ok(134),
            PixelFormat::PVRTC2_RGB => Ok(160),
            PixelFormat::PVRTC4_RGB => Ok(162),
            PixelFormat::PVRTC2_RGBA => Ok(164),
            PixelFormat::PVRTC4_RGBA => Ok(166),
            PixelFormat::ETC2_RGB8 => Ok(180),
            PixelFormat::ETC2_SRGB8 => Ok(181),
            PixelFormat::DEPTH => Ok(252),
            PixelFormat::DEPTHSTENCIL => Ok(255),
            // Metal 没有 24 位 RGB
            PixelFormat::RGB8 => Err(unsupported("pixel format", format)),
        }
    }

    /// MTLVertexFormat
    pub fn as_vertex_format(format: VertexFormat) -> u32 {
        match format {
            VertexFormat::UByte4 => 3,
            VertexFormat::Byte4 => 6,
            VertexFormat::UByte4N => 9,
            VertexFormat::Byte4N => 12,
            VertexFormat::Short2 => 16,
            VertexFormat::Short4 => 18,
            VertexFormat::Short2N => 22,
            VertexFormat::Short4N => 24,
            VertexFormat::Float => 28,
            VertexFormat::Float2 => 29,
            VertexFormat::Float3 => 30,
            VertexFormat::Float4 => 31,
            VertexFormat::UInt10_2N => 41,
        }
    }

    /// MTLPrimitiveType
    pub fn as_primitive_type(primitive_type: PrimitiveType) -> u32 {
        match primitive_type {
            PrimitiveType::Points => 0,
            PrimitiveType::Lines => 1,
            PrimitiveType::LineStrip => 2,
            PrimitiveType::Triangles => 3,
            PrimitiveType::TriangleStrip => 4,
        }
    }

    /// MTLIndexType
    pub fn as_index_type(index_type: IndexType) -> Option<u32> {
        match index_type {
            IndexType::None => None,
            IndexType::UInt16 => Some(0),
            IndexType::UInt32 => Some(1),
        }
    }

    /// MTLTextureType
    pub fn as_texture_type(texture_type: TextureType) -> u32 {
        match texture_type {
            TextureType::Texture2D => 2,
            TextureType::TextureArray => 3,
            TextureType::TextureCube => 5,
            TextureType::Texture3D => 7,
        }
    }

    /// MTLCompareFunction
    pub fn as_compare_function(func: CompareFunc) -> u32 {
        match func {
            CompareFunc::Never => 0,
            CompareFunc::Less => 1,
            CompareFunc::Equal => 2,
            CompareFunc::LessEqual => 3,
            CompareFunc::Greater => 4,
            CompareFunc::NotEqual => 5,
            CompareFunc::GreaterEqual => 6,
            CompareFunc::Always => 7,
        }
    }

    /// MTLBlendFactor
    pub fn as_blend_factor(factor: BlendFactor) -> u32 {
        match factor {
            BlendFactor::Zero => 0,
            BlendFactor::One => 1,
            BlendFactor::SrcColor => 2,
            BlendFactor::OneMinusSrcColor => 3,
            BlendFactor::SrcAlpha => 4,
            BlendFactor::OneMinusSrcAlpha => 5,
            BlendFactor::DstColor => 6,
            BlendFactor::OneMinusDstColor => 7,
            BlendFactor::DstAlpha => 8,
            BlendFactor::OneMinusDstAlpha => 9,
            BlendFactor::SrcAlphaSaturated => 10,
            BlendFactor::BlendColor => 11,
            BlendFactor::OneMinusBlendColor => 12,
            BlendFactor::BlendAlpha => 13,
            BlendFactor::OneMinusBlendAlpha => 14,
        }
    }

    /// MTLBlendOperation
    pub fn as_blend_operation(op: BlendOperation) -> u32 {
        match op {
            BlendOperation::Add => 0,
            BlendOperation::Subtract => 1,
            BlendOperation::ReverseSubtract => 2,
        }
    }

    /// MTLCullMode
    pub fn as_cull_mode(enabled: bool, face: Face) -> u32 {
        match (enabled, face) {
            (false, _) => 0,
            (true, Face::Front) => 1,
            (true, Face::Back) | (true, Face::Both) => 2,
        }
    }

    /// (MTLSamplerMinMagFilter, MTLSamplerMipFilter)
    pub fn as_sampler_filter(filter: TextureFilterMode) -> (u32, u32) {
        match filter {
            TextureFilterMode::Nearest => (0, 0),
            TextureFilterMode::Linear => (1, 0),
            TextureFilterMode::NearestMipmapNearest => (0, 1),
            TextureFilterMode::NearestMipmapLinear => (0, 2),
            TextureFilterMode::LinearMipmapNearest => (1, 1),
            TextureFilterMode::LinearMipmapLinear => (1, 2),
        }
    }

    /// MTLSamplerAddressMode
    pub fn as_address_mode(wrap: TextureWrapMode) -> u32 {
        match wrap {
            TextureWrapMode::ClampToEdge => 0,
            TextureWrapMode::Repeat => 2,
            TextureWrapMode::MirroredRepeat => 3,
        }
    }

    pub fn as_resource_options(usage: Usage) -> u32 {
        match usage {
            Usage::Immutable => MTL_RESOURCE_STORAGE_MODE_SHARED,
            Usage::Dynamic | Usage::Stream => {
                MTL_RESOURCE_STORAGE_MODE_SHARED | MTL_RESOURCE_CPU_CACHE_MODE_WRITE_COMBINED
            }
        }
    }
}

impl Backend for MetalBackend {
    type Desc = MtlDesc;

    const TYPE: BackendType = BackendType::Metal;
    /// CPU 写入和 GPU 读取错开一帧
    const STREAM_BUFFER_SLOTS: usize = 2;
    const SHADER_LANGS: &'static [ShaderLang] = &[ShaderLang::Metal];

    fn vertex_buffer_desc(setup: &MeshSetup) -> Result<MtlDesc, InitError> {
        Ok(MtlDesc::Buffer {
            length: setup.vertex_data_size(),
            options: Self::as_resource_options(setup.vertex_usage),
        })
    }

    fn index_buffer_desc(setup: &MeshSetup) -> Result<MtlDesc, InitError> {
        Self::as_index_type(setup.index_type).ok_or_else(|| unsupported("index type", setup.index_type))?;
        Ok(MtlDesc::Buffer {
            length: setup.index_data_size(),
            options: Self::as_resource_options(setup.index_usage),
        })
    }

    /// 纹理 + sampler
    fn texture_descs(setup: &TextureSetup) -> Result<Vec<MtlDesc>, InitError> {
        let pixel_format = Self::as_pixel_format(setup.color_format)?;
        let (usage, storage_mode) = if setup.render_target {
            (
                MtlTextureUsage::RENDER_TARGET | MtlTextureUsage::SHADER_READ,
                MTL_RESOURCE_STORAGE_MODE_PRIVATE,
            )
        } else {
            (MtlTextureUsage::SHADER_READ, MTL_RESOURCE_STORAGE_MODE_MANAGED)
        };
        let (depth, array_length) = match setup.texture_type {
            TextureType::Texture3D => (setup.depth, 1),
            TextureType::TextureArray => (1, setup.depth),
            _ => (1, 1),
        };

        let (min_filter, mip_filter) = Self::as_sampler_filter(setup.sampler.min_filter);
        let (mag_filter, _) = Self::as_sampler_filter(setup.sampler.mag_filter);
        Ok(vec![
            MtlDesc::Texture {
                texture_type: Self::as_texture_type(setup.texture_type),
                pixel_format,
                width: setup.width,
                height: setup.height,
                depth,
                array_length,
                mipmap_level_count: setup.num_mipmaps,
                sample_count: setup.sample_count,
                usage,
                storage_mode,
            },
            MtlDesc::SamplerState {
                min_filter,
                mag_filter,
                mip_filter,
                s_address_mode: Self::as_address_mode(setup.sampler.wrap_u),
                t_address_mode: Self::as_address_mode(setup.sampler.wrap_v),
                r_address_mode: Self::as_address_mode(setup.sampler.wrap_w),
            },
        ])
    }

    /// vertex 和 fragment 函数放在同一个 library 中
    fn shader_descs(setup: &ShaderSetup) -> Result<Vec<MtlDesc>, InitError> {
        let program = setup.select_program(Self::SHADER_LANGS)?;
        let (source, byte_code) = match (&program.vs, &program.fs) {
            (ShaderSource::Source(vs), ShaderSource::Source(fs)) if vs == fs => (Some(vs.clone()), None),
            (ShaderSource::Source(vs), ShaderSource::Source(fs)) => (Some(format!("{}\n{}", vs, fs)), None),
            (ShaderSource::ByteCode(code), _) => (None, Some(code.clone())),
            (ShaderSource::Source(_), ShaderSource::ByteCode(_)) => {
                return Err(unsupported("mixed source and byte code in", program.lang));
            }
        };
        Ok(vec![MtlDesc::Library {
            source,
            byte_code,
            vertex_function: program.vs_entry.clone(),
            fragment_function: program.fs_entry.clone(),
        }])
    }

    /// pipeline state + depth-stencil state
    fn pipeline_descs(setup: &PipelineSetup) -> Result<Vec<MtlDesc>, InitError> {
        let shader = setup.resolved_shader()?;
        if shader.lang != ShaderLang::Metal {
            return Err(unsupported("shader language", shader.lang));
        }

        let mut attributes = Vec::new();
        let mut layouts = Vec::with_capacity(setup.layouts.len());
        for (slot, layout) in setup.layouts.iter().enumerate() {
            for (i, component) in layout.components().iter().enumerate() {
                attributes.push(MtlVertexAttribute {
                    index: component.attr.location(),
                    format: Self::as_vertex_format(component.format),
                    offset: layout.component_byte_offset(i),
                    buffer_index: slot as u32,
                });
            }
            let per_instance = layout.step_function == VertexStepFunction::PerInstance;
            layouts.push(MtlVertexBufferLayout {
                stride: layout.byte_size(),
                per_instance,
                step_rate: if per_instance { layout.step_rate.max(1) } else { 1 },
            });
        }

        let (depth_pixel_format, stencil_pixel_format) = match setup.depth_format {
            Some(format) => {
                let mtl_format = Self::as_pixel_format(format)?;
                let stencil = if format.is_depth_stencil_format() { mtl_format } else { 0 };
                (mtl_format, stencil)
            }
            None => (0, 0),
        };

        let blend = &setup.blend;
        Ok(vec![
            MtlDesc::RenderPipelineState {
                attributes,
                layouts,
                color_pixel_format: Self::as_pixel_format(setup.color_format)?,
                depth_pixel_format,
                stencil_pixel_format,
                blending_enabled: blend.enabled,
                source_rgb_blend_factor: Self::as_blend_factor(blend.src_factor_rgb),
                destination_rgb_blend_factor: Self::as_blend_factor(blend.dst_factor_rgb),
                rgb_blend_operation: Self::as_blend_operation(blend.op_rgb),
                source_alpha_blend_factor: Self::as_blend_factor(blend.src_factor_alpha),
                destination_alpha_blend_factor: Self::as_blend_factor(blend.dst_factor_alpha),
                alpha_blend_operation: Self::as_blend_operation(blend.op_alpha),
                write_mask: blend.color_write_mask.bits(),
                sample_count: setup.rasterizer.sample_count,
                primitive_type: Self::as_primitive_type(setup.primitive_type),
                cull_mode: Self::as_cull_mode(setup.rasterizer.cull_face_enabled, setup.rasterizer.cull_face),
            },
            MtlDesc::DepthStencilState {
                depth_compare_function: Self::as_compare_function(setup.depth_stencil.depth_compare),
                depth_write_enabled: setup.depth_stencil.depth_write_enabled,
            },
        ])
    }

    /// Metal 的 render pass descriptor 每帧临时构建，没有持久对象
    fn render_pass_descs(setup: &RenderPassSetup) -> Result<Vec<MtlDesc>, InitError> {
        let resolved = setup.resolved()?;
        for attachment in resolved.colors.iter().chain(resolved.depth_stencil.iter()) {
            Self::as_pixel_format(attachment.format)?;
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_table() {
        assert_eq!(MetalBackend::as_pixel_format(PixelFormat::RGBA8).unwrap(), 70);
        assert_eq!(MetalBackend::as_pixel_format(PixelFormat::PVRTC4_RGBA).unwrap(), 166);
        assert_eq!(MetalBackend::as_pixel_format(PixelFormat::DEPTHSTENCIL).unwrap(), 255);
        assert!(MetalBackend::as_pixel_format(PixelFormat::RGB8).is_err());
    }

    #[test]
    fn test_sampler_filter_split() {
        assert_eq!(MetalBackend::as_sampler_filter(TextureFilterMode::LinearMipmapLinear), (1, 2));
        assert_eq!(MetalBackend::as_sampler_filter(TextureFilterMode::Nearest), (0, 0));
    }

    #[test]
    fn test_texture_descs() {
        let setup = TextureSetup::from_pixel_data_2d(8, 8, 4, PixelFormat::RGBA8);
        let descs = MetalBackend::texture_descs(&setup).unwrap();
        assert_eq!(descs.len(), 2);
        assert!(matches!(descs[0], MtlDesc::Texture { pixel_format: 70, mipmap_level_count: 4, .. }));

        let rgb = TextureSetup::from_pixel_data_2d(8, 8, 1, PixelFormat::RGB8);
        assert!(MetalBackend::texture_descs(&rgb).is_err());
    }

    #[test]
    fn test_shader_library() {
        let setup = ShaderSetup::default().with_program(ShaderLang::Metal, "lib", "lib");
        let descs = MetalBackend::shader_descs(&setup).unwrap();
        assert_eq!(
            descs,
            vec![MtlDesc::Library {
                source: Some("lib".to_string()),
                byte_code: None,
                vertex_function: "vs_main".to_string(),
                fragment_function: "fs_main".to_string(),
            }]
        );
    }
}
