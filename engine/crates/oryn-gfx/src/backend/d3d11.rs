//! Direct3D 11 后端的参数翻译

use bitflags::bitflags;
use oryn_resource::InitError;

use crate::backend::{Backend, BackendType, NativeId};
use crate::resources::mesh::MeshSetup;
use crate::resources::pipeline::PipelineSetup;
use crate::resources::render_pass::RenderPassSetup;
use crate::resources::shader::{ShaderSetup, ShaderSource};
use crate::resources::texture::{SamplerState, TextureSetup};
use crate::types::{
    BlendFactor, BlendOperation, CompareFunc, Face, IndexType, PixelFormat, PrimitiveType, ShaderLang,
    TextureFilterMode, TextureType, TextureWrapMode, Usage, VertexAttr, VertexFormat, VertexStepFunction,
};

/// DXGI_FORMAT 的数值
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DxgiFormat(pub u32);

impl DxgiFormat {
    pub const UNKNOWN: Self = Self(0);
    pub const R32G32B32A32_FLOAT: Self = Self(2);
    pub const R32G32B32_FLOAT: Self = Self(6);
    pub const R16G16B16A16_FLOAT: Self = Self(10);
    pub const R16G16B16A16_SNORM: Self = Self(13);
    pub const R16G16B16A16_SINT: Self = Self(14);
    pub const R32G32_FLOAT: Self = Self(16);
    pub const R10G10B10A2_UNORM: Self = Self(24);
    pub const R8G8B8A8_UNORM: Self = Self(28);
    pub const R8G8B8A8_UINT: Self = Self(30);
    pub const R8G8B8A8_SNORM: Self = Self(31);
    pub const R8G8B8A8_SINT: Self = Self(32);
    pub const R16G16_SNORM: Self = Self(37);
    pub const R16G16_SINT: Self = Self(38);
    pub const R32_FLOAT: Self = Self(41);
    pub const R32_UINT: Self = Self(42);
    pub const D24_UNORM_S8_UINT: Self = Self(45);
    pub const R16_FLOAT: Self = Self(54);
    pub const D16_UNORM: Self = Self(55);
    pub const R16_UINT: Self = Self(57);
    pub const R8_UNORM: Self = Self(61);
    pub const BC1_UNORM: Self = Self(71);
    pub const BC2_UNORM: Self = Self(74);
    pub const BC3_UNORM: Self = Self(77);
    pub const B5G6R5_UNORM: Self = Self(85);
    pub const B5G5R5A1_UNORM: Self = Self(86);
    pub const B4G4R4A4_UNORM: Self = Self(115);
}

/// D3D11_USAGE
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum D3d11Usage {
    Default = 0,
    Immutable = 1,
    Dynamic = 2,
}

bitflags! {
    /// D3D11_BIND_FLAG
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct D3d11BindFlags: u32 {
        const VERTEX_BUFFER = 0x1;
        const INDEX_BUFFER = 0x2;
        const CONSTANT_BUFFER = 0x4;
        const SHADER_RESOURCE = 0x8;
        const RENDER_TARGET = 0x20;
        const DEPTH_STENCIL = 0x40;
    }
}

pub const D3D11_CPU_ACCESS_WRITE: u32 = 0x10000;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct D3d11InputElement {
    pub semantic_name: &'static str,
    pub semantic_index: u32,
    pub format: DxgiFormat,
    pub input_slot: u32,
    pub aligned_byte_offset: usize,
    pub per_instance: bool,
    pub instance_data_step_rate: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct D3d11RenderTargetBlend {
    pub blend_enable: bool,
    pub src_blend: u32,
    pub dest_blend: u32,
    pub blend_op: u32,
    pub src_blend_alpha: u32,
    pub dest_blend_alpha: u32,
    pub blend_op_alpha: u32,
    pub write_mask: u8,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum D3d11Desc {
    Buffer {
        byte_width: usize,
        usage: D3d11Usage,
        bind_flags: D3d11BindFlags,
        cpu_access_flags: u32,
    },
    Texture2D {
        width: u32,
        height: u32,
        mip_levels: u32,
        array_size: u32,
        format: DxgiFormat,
        sample_count: u32,
        usage: D3d11Usage,
        bind_flags: D3d11BindFlags,
        cpu_access_flags: u32,
        cube: bool,
    },
    Texture3D {
        width: u32,
        height: u32,
        depth: u32,
        mip_levels: u32,
        format: DxgiFormat,
        usage: D3d11Usage,
        bind_flags: D3d11BindFlags,
        cpu_access_flags: u32,
    },
    ShaderResourceView {
        format: DxgiFormat,
    },
    Sampler {
        filter: u32,
        address_u: u32,
        address_v: u32,
        address_w: u32,
        max_lod: u32,
    },
    VertexShader {
        byte_code: Vec<u8>,
    },
    PixelShader {
        byte_code: Vec<u8>,
    },
    /// 输入布局需要和 VS 的输入签名匹配
    InputLayout {
        elements: Vec<D3d11InputElement>,
        vertex_shader: Option<NativeId>,
    },
    RasterizerState {
        cull_mode: u32,
        multisample: bool,
    },
    DepthStencilState {
        depth_enable: bool,
        depth_write: bool,
        depth_func: u32,
        stencil_enable: bool,
    },
    BlendState {
        alpha_to_coverage: bool,
        render_target: D3d11RenderTargetBlend,
    },
    RenderTargetView {
        texture: NativeId,
        format: DxgiFormat,
        mip_slice: u32,
        array_slice: u32,
    },
    DepthStencilView {
        texture: NativeId,
        format: DxgiFormat,
    },
}

pub struct D3d11Backend;

fn unsupported(what: &str, value: impl std::fmt::Debug) -> InitError {
    InitError::InvalidSetup(format!("D3D11: unsupported {} {:?}", what, value))
}

// 类型翻译
impl D3d11Backend {
    pub fn as_usage(usage: Usage) -> D3d11Usage {
        match usage {
            Usage::Immutable => D3d11Usage::Immutable,
            Usage::Dynamic | Usage::Stream => D3d11Usage::Dynamic,
        }
    }

    pub fn as_cpu_access_flags(usage: Usage) -> u32 {
        match usage {
            Usage::Immutable => 0,
            Usage::Dynamic | Usage::Stream => D3D11_CPU_ACCESS_WRITE,
        }
    }

    pub fn as_texture_format(format: PixelFormat) -> Result<DxgiFormat, InitError> {
        match format {
            PixelFormat::RGBA8 => Ok(DxgiFormat::R8G8B8A8_UNORM),
            PixelFormat::RGBA32F => Ok(DxgiFormat::R32G32B32A32_FLOAT),
            PixelFormat::RGBA16F => Ok(DxgiFormat::R16G16B16A16_FLOAT),
            PixelFormat::R10G10B10A2 => Ok(DxgiFormat::R10G10B10A2_UNORM),
            PixelFormat::R32F => Ok(DxgiFormat::R32_FLOAT),
            PixelFormat::R16F => Ok(DxgiFormat::R16_FLOAT),
            PixelFormat::L8 => Ok(DxgiFormat::R8_UNORM),
            PixelFormat::R5G6B5 => Ok(DxgiFormat::B5G6R5_UNORM),
            PixelFormat::R5G5B5A1 => Ok(DxgiFormat::B5G5R5A1_UNORM),
            PixelFormat::RGBA4 => Ok(DxgiFormat::B4G4R4A4_UNORM),
            PixelFormat::DXT1 => Ok(DxgiFormat::BC1_UNORM),
            PixelFormat::DXT3 => Ok(DxgiFormat::BC2_UNORM),
            PixelFormat::DXT5 => Ok(DxgiFormat::BC3_UNORM),
            PixelFormat::DEPTH => Ok(DxgiFormat::D16_UNORM),
            PixelFormat::DEPTHSTENCIL => Ok(DxgiFormat::D24_UNORM_S8_UINT),
            // D3D11 没有 24 位 RGB，也不支持 PVRTC / ETC2
            _ => Err(unsupported("pixel format", format)),
        }
    }

    pub fn as_index_format(index_type: IndexType) -> DxgiFormat {
        match index_type {
            IndexType::None => DxgiFormat::UNKNOWN,
            IndexType::UInt16 => DxgiFormat::R16_UINT,
            IndexType::UInt32 => DxgiFormat::R32_UINT,
        }
    }

    pub fn as_vertex_format(format: VertexFormat) -> DxgiFormat {
        match format {
            VertexFormat::Float => DxgiFormat::R32_FLOAT,
            VertexFormat::Float2 => DxgiFormat::R32G32_FLOAT,
            VertexFormat::Float3 => DxgiFormat::R32G32B32_FLOAT,
            VertexFormat::Float4 => DxgiFormat::R32G32B32A32_FLOAT,
            VertexFormat::Byte4 => DxgiFormat::R8G8B8A8_SINT,
            VertexFormat::Byte4N => DxgiFormat::R8G8B8A8_SNORM,
            VertexFormat::UByte4 => DxgiFormat::R8G8B8A8_UINT,
            VertexFormat::UByte4N => DxgiFormat::R8G8B8A8_UNORM,
            VertexFormat::Short2 => DxgiFormat::R16G16_SINT,
            VertexFormat::Short2N => DxgiFormat::R16G16_SNORM,
            VertexFormat::Short4 => DxgiFormat::R16G16B16A16_SINT,
            VertexFormat::Short4N => DxgiFormat::R16G16B16A16_SNORM,
            VertexFormat::UInt10_2N => DxgiFormat::R10G10B10A2_UNORM,
        }
    }

    /// D3D11_PRIMITIVE_TOPOLOGY
    pub fn as_primitive_topology(primitive_type: PrimitiveType) -> u32 {
        match primitive_type {
            PrimitiveType::Points => 1,
            PrimitiveType::Lines => 2,
            PrimitiveType::LineStrip => 3,
            PrimitiveType::Triangles => 4,
            PrimitiveType::TriangleStrip => 5,
        }
    }

    /// (语义名, 语义索引)
    pub fn as_semantic(attr: VertexAttr) -> (&'static str, u32) {
        match attr {
            VertexAttr::Position => ("POSITION", 0),
            VertexAttr::Normal => ("NORMAL", 0),
            VertexAttr::TexCoord0 => ("TEXCOORD", 0),
            VertexAttr::TexCoord1 => ("TEXCOORD", 1),
            VertexAttr::TexCoord2 => ("TEXCOORD", 2),
            VertexAttr::TexCoord3 => ("TEXCOORD", 3),
            VertexAttr::Tangent => ("TANGENT", 0),
            VertexAttr::Binormal => ("BINORMAL", 0),
            VertexAttr::Weights => ("BLENDWEIGHT", 0),
            VertexAttr::Indices => ("BLENDINDICES", 0),
            VertexAttr::Color0 => ("COLOR", 0),
            VertexAttr::Color1 => ("COLOR", 1),
        }
    }

    /// D3D11_COMPARISON_FUNC
    pub fn as_comparison_func(func: CompareFunc) -> u32 {
        match func {
            CompareFunc::Never => 1,
            CompareFunc::Less => 2,
            CompareFunc::Equal => 3,
            CompareFunc::LessEqual => 4,
            CompareFunc::Greater => 5,
            CompareFunc::NotEqual => 6,
            CompareFunc::GreaterEqual => 7,
            CompareFunc::Always => 8,
        }
    }

    /// D3D11_BLEND，D3D11 没有单独的常量 alpha，和常量颜色共用
    pub fn as_blend_factor(factor: BlendFactor) -> u32 {
        match factor {
            BlendFactor::Zero => 1,
            BlendFactor::One => 2,
            BlendFactor::SrcColor => 3,
            BlendFactor::OneMinusSrcColor => 4,
            BlendFactor::SrcAlpha => 5,
            BlendFactor::OneMinusSrcAlpha => 6,
            BlendFactor::DstAlpha => 7,
            BlendFactor::OneMinusDstAlpha => 8,
            BlendFactor::DstColor => 9,
            BlendFactor::OneMinusDstColor => 10,
            BlendFactor::SrcAlphaSaturated => 11,
            BlendFactor::BlendColor | BlendFactor::BlendAlpha => 14,
            BlendFactor::OneMinusBlendColor | BlendFactor::OneMinusBlendAlpha => 15,
        }
    }

    /// D3D11_BLEND_OP
    pub fn as_blend_op(op: BlendOperation) -> u32 {
        match op {
            BlendOperation::Add => 1,
            BlendOperation::Subtract => 2,
            BlendOperation::ReverseSubtract => 3,
        }
    }

    /// D3D11_CULL_MODE
    pub fn as_cull_mode(enabled: bool, face: Face) -> u32 {
        match (enabled, face) {
            (false, _) => 1,
            (true, Face::Front) => 2,
            (true, Face::Back) | (true, Face::Both) => 3,
        }
    }

    /// D3D11_TEXTURE_ADDRESS_MODE
    pub fn as_address_mode(wrap: TextureWrapMode) -> u32 {
        match wrap {
            TextureWrapMode::Repeat => 1,
            TextureWrapMode::MirroredRepeat => 2,
            TextureWrapMode::ClampToEdge => 3,
        }
    }

    /// D3D11_FILTER，由放大过滤和缩小过滤组合而成
    pub fn as_filter(mag: TextureFilterMode, min: TextureFilterMode) -> u32 {
        let mag_linear = mag != TextureFilterMode::Nearest;
        match (mag_linear, min) {
            (false, TextureFilterMode::Nearest | TextureFilterMode::NearestMipmapNearest) => 0x0,
            (false, TextureFilterMode::NearestMipmapLinear) => 0x1,
            (false, TextureFilterMode::Linear | TextureFilterMode::LinearMipmapNearest) => 0x10,
            (false, TextureFilterMode::LinearMipmapLinear) => 0x11,
            (true, TextureFilterMode::Nearest | TextureFilterMode::NearestMipmapNearest) => 0x4,
            (true, TextureFilterMode::NearestMipmapLinear) => 0x5,
            (true, TextureFilterMode::Linear | TextureFilterMode::LinearMipmapNearest) => 0x14,
            (true, TextureFilterMode::LinearMipmapLinear) => 0x15,
        }
    }

    fn sampler_desc(sampler: &SamplerState, num_mipmaps: u32) -> D3d11Desc {
        D3d11Desc::Sampler {
            filter: Self::as_filter(sampler.mag_filter, sampler.min_filter),
            address_u: Self::as_address_mode(sampler.wrap_u),
            address_v: Self::as_address_mode(sampler.wrap_v),
            address_w: Self::as_address_mode(sampler.wrap_w),
            max_lod: num_mipmaps.saturating_sub(1),
        }
    }

    fn byte_code(source: &ShaderSource) -> Result<Vec<u8>, InitError> {
        match source {
            ShaderSource::ByteCode(code) => Ok(code.clone()),
            ShaderSource::Source(_) => Err(unsupported("runtime HLSL compilation for", ShaderLang::Hlsl5)),
        }
    }
}

impl Backend for D3d11Backend {
    type Desc = D3d11Desc;

    const TYPE: BackendType = BackendType::D3d11;
    /// D3D11 的 Map(WRITE_DISCARD) 自带重命名，不需要多个 buffer
    const STREAM_BUFFER_SLOTS: usize = 1;
    const SHADER_LANGS: &'static [ShaderLang] = &[ShaderLang::Hlsl5];

    fn vertex_buffer_desc(setup: &MeshSetup) -> Result<D3d11Desc, InitError> {
        Ok(D3d11Desc::Buffer {
            byte_width: setup.vertex_data_size(),
            usage: Self::as_usage(setup.vertex_usage),
            bind_flags: D3d11BindFlags::VERTEX_BUFFER,
            cpu_access_flags: Self::as_cpu_access_flags(setup.vertex_usage),
        })
    }

    fn index_buffer_desc(setup: &MeshSetup) -> Result<D3d11Desc, InitError> {
        if Self::as_index_format(setup.index_type) == DxgiFormat::UNKNOWN {
            return Err(unsupported("index type", setup.index_type));
        }
        Ok(D3d11Desc::Buffer {
            byte_width: setup.index_data_size(),
            usage: Self::as_usage(setup.index_usage),
            bind_flags: D3d11BindFlags::INDEX_BUFFER,
            cpu_access_flags: Self::as_cpu_access_flags(setup.index_usage),
        })
    }

    /// 纹理 + SRV + sampler；深度渲染目标只有纹理本身
    fn texture_descs(setup: &TextureSetup) -> Result<Vec<D3d11Desc>, InitError> {
        let format = Self::as_texture_format(setup.color_format)?;
        let usage = if setup.render_target {
            D3d11Usage::Default
        } else {
            Self::as_usage(setup.usage)
        };
        let cpu_access_flags = if setup.render_target {
            0
        } else {
            Self::as_cpu_access_flags(setup.usage)
        };

        if setup.render_target && setup.color_format.is_depth_format() {
            return Ok(vec![D3d11Desc::Texture2D {
                width: setup.width,
                height: setup.height,
                mip_levels: 1,
                array_size: 1,
                format,
                sample_count: setup.sample_count,
                usage,
                bind_flags: D3d11BindFlags::DEPTH_STENCIL,
                cpu_access_flags,
                cube: false,
            }]);
        }

        let mut bind_flags = D3d11BindFlags::SHADER_RESOURCE;
        if setup.render_target {
            bind_flags |= D3d11BindFlags::RENDER_TARGET;
        }
        let texture = match setup.texture_type {
            TextureType::Texture3D => D3d11Desc::Texture3D {
                width: setup.width,
                height: setup.height,
                depth: setup.depth,
                mip_levels: setup.num_mipmaps,
                format,
                usage,
                bind_flags,
                cpu_access_flags,
            },
            TextureType::Texture2D | TextureType::TextureCube | TextureType::TextureArray => {
                let cube = setup.texture_type == TextureType::TextureCube;
                let array_size = match setup.texture_type {
                    TextureType::TextureCube => 6,
                    TextureType::TextureArray => setup.depth,
                    _ => 1,
                };
                D3d11Desc::Texture2D {
                    width: setup.width,
                    height: setup.height,
                    mip_levels: setup.num_mipmaps,
                    array_size,
                    format,
                    sample_count: setup.sample_count,
                    usage,
                    bind_flags,
                    cpu_access_flags,
                    cube,
                }
            }
        };
        Ok(vec![
            texture,
            D3d11Desc::ShaderResourceView { format },
            Self::sampler_desc(&setup.sampler, setup.num_mipmaps),
        ])
    }

    fn shader_descs(setup: &ShaderSetup) -> Result<Vec<D3d11Desc>, InitError> {
        let program = setup.select_program(Self::SHADER_LANGS)?;
        Ok(vec![
            D3d11Desc::VertexShader {
                byte_code: Self::byte_code(&program.vs)?,
            },
            D3d11Desc::PixelShader {
                byte_code: Self::byte_code(&program.fs)?,
            },
        ])
    }

    /// input layout + rasterizer + depth-stencil + blend
    fn pipeline_descs(setup: &PipelineSetup) -> Result<Vec<D3d11Desc>, InitError> {
        let shader = setup.resolved_shader()?;
        if shader.lang != ShaderLang::Hlsl5 {
            return Err(unsupported("shader language", shader.lang));
        }

        let mut elements = Vec::new();
        for (slot, layout) in setup.layouts.iter().enumerate() {
            let per_instance = layout.step_function == VertexStepFunction::PerInstance;
            for (i, component) in layout.components().iter().enumerate() {
                let (semantic_name, semantic_index) = Self::as_semantic(component.attr);
                elements.push(D3d11InputElement {
                    semantic_name,
                    semantic_index,
                    format: Self::as_vertex_format(component.format),
                    input_slot: slot as u32,
                    aligned_byte_offset: layout.component_byte_offset(i),
                    per_instance,
                    instance_data_step_rate: if per_instance { layout.step_rate.max(1) } else { 0 },
                });
            }
        }

        let blend = &setup.blend;
        let depth_stencil = &setup.depth_stencil;
        Ok(vec![
            D3d11Desc::InputLayout {
                elements,
                vertex_shader: shader.objects.first().copied(),
            },
            D3d11Desc::RasterizerState {
                cull_mode: Self::as_cull_mode(setup.rasterizer.cull_face_enabled, setup.rasterizer.cull_face),
                multisample: setup.rasterizer.sample_count > 1,
            },
            D3d11Desc::DepthStencilState {
                depth_enable: depth_stencil.depth_compare != CompareFunc::Always || depth_stencil.depth_write_enabled,
                depth_write: depth_stencil.depth_write_enabled,
                depth_func: Self::as_comparison_func(depth_stencil.depth_compare),
                stencil_enable: depth_stencil.stencil_enabled,
            },
            D3d11Desc::BlendState {
                alpha_to_coverage: setup.rasterizer.alpha_to_coverage_enabled,
                render_target: D3d11RenderTargetBlend {
                    blend_enable: blend.enabled,
                    src_blend: Self::as_blend_factor(blend.src_factor_rgb),
                    dest_blend: Self::as_blend_factor(blend.dst_factor_rgb),
                    blend_op: Self::as_blend_op(blend.op_rgb),
                    src_blend_alpha: Self::as_blend_factor(blend.src_factor_alpha),
                    dest_blend_alpha: Self::as_blend_factor(blend.dst_factor_alpha),
                    blend_op_alpha: Self::as_blend_op(blend.op_alpha),
                    write_mask: blend.color_write_mask.bits(),
                },
            },
        ])
    }

    /// 每个颜色附件一个 RTV，另加一个 DSV
    fn render_pass_descs(setup: &RenderPassSetup) -> Result<Vec<D3d11Desc>, InitError> {
        let resolved = setup.resolved()?;
        let mut descs = Vec::with_capacity(resolved.colors.len() + 1);
        for (attachment, resolved_color) in setup.color_attachments.iter().zip(&resolved.colors) {
            descs.push(D3d11Desc::RenderTargetView {
                texture: resolved_color.object,
                format: Self::as_texture_format(resolved_color.format)?,
                mip_slice: attachment.mip_level,
                array_slice: attachment.slice,
            });
        }
        if let Some(depth) = &resolved.depth_stencil {
            descs.push(D3d11Desc::DepthStencilView {
                texture: depth.object,
                format: Self::as_texture_format(depth.format)?,
            });
        }
        Ok(descs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VertexFormat;
    use crate::vertex_layout::VertexLayout;

    #[test]
    fn test_format_table() {
        assert_eq!(D3d11Backend::as_texture_format(PixelFormat::RGBA8).unwrap(), DxgiFormat::R8G8B8A8_UNORM);
        assert_eq!(D3d11Backend::as_texture_format(PixelFormat::DXT5).unwrap(), DxgiFormat(77));
        assert_eq!(D3d11Backend::as_texture_format(PixelFormat::DEPTHSTENCIL).unwrap(), DxgiFormat(45));
        assert!(D3d11Backend::as_texture_format(PixelFormat::RGB8).is_err());
        assert!(D3d11Backend::as_texture_format(PixelFormat::PVRTC4_RGBA).is_err());
        assert_eq!(D3d11Backend::as_vertex_format(VertexFormat::UByte4N), DxgiFormat::R8G8B8A8_UNORM);
    }

    #[test]
    fn test_filter_combinations() {
        use TextureFilterMode::*;
        assert_eq!(D3d11Backend::as_filter(Nearest, Nearest), 0x0);
        assert_eq!(D3d11Backend::as_filter(Nearest, LinearMipmapLinear), 0x11);
        assert_eq!(D3d11Backend::as_filter(Linear, Nearest), 0x4);
        assert_eq!(D3d11Backend::as_filter(Linear, NearestMipmapLinear), 0x5);
        assert_eq!(D3d11Backend::as_filter(Linear, Linear), 0x14);
        assert_eq!(D3d11Backend::as_filter(Linear, LinearMipmapLinear), 0x15);
    }

    #[test]
    fn test_texture_object_count() {
        let color = TextureSetup::from_pixel_data_2d(4, 4, 1, PixelFormat::RGBA8);
        assert_eq!(D3d11Backend::texture_descs(&color).unwrap().len(), 3);

        let depth = TextureSetup::render_target_2d(4, 4, PixelFormat::DEPTHSTENCIL);
        let descs = D3d11Backend::texture_descs(&depth).unwrap();
        assert_eq!(descs.len(), 1);
        assert!(matches!(
            descs[0],
            D3d11Desc::Texture2D { bind_flags, .. } if bind_flags == D3d11BindFlags::DEPTH_STENCIL
        ));
    }

    #[test]
    fn test_dynamic_buffer_is_cpu_writable() {
        let layout = VertexLayout::new().add(VertexAttr::Position, VertexFormat::Float2);
        let setup = MeshSetup::empty(layout, 16, Usage::Dynamic);
        let desc = D3d11Backend::vertex_buffer_desc(&setup).unwrap();
        assert_eq!(
            desc,
            D3d11Desc::Buffer {
                byte_width: 128,
                usage: D3d11Usage::Dynamic,
                bind_flags: D3d11BindFlags::VERTEX_BUFFER,
                cpu_access_flags: D3D11_CPU_ACCESS_WRITE,
            }
        );
    }

    #[test]
    fn test_shader_requires_byte_code() {
        let source = ShaderSetup::default().with_program(ShaderLang::Hlsl5, "float4 main() {}", "float4 main() {}");
        assert!(D3d11Backend::shader_descs(&source).is_err());

        let empty_vs = ShaderSetup::default().with_program(ShaderLang::Hlsl5, Vec::<u8>::new(), vec![1u8]);
        assert!(D3d11Backend::shader_descs(&empty_vs).is_err());

        let compiled = ShaderSetup::default().with_program(ShaderLang::Hlsl5, vec![1u8, 2, 3], vec![4u8]);
        assert_eq!(D3d11Backend::shader_descs(&compiled).unwrap().len(), 2);
    }
}
