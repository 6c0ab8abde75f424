use glam::Vec4;
use oryn_resource::{InitError, Locator, ResourceKind, ResourcePool, ResourceType};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::factory::GfxFactory;
use crate::handles::{GfxResourceType, PipelineHandle, ShaderHandle};
use crate::kind::{Dependencies, GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
use crate::types::{
    BlendFactor, BlendOperation, CompareFunc, Face, PixelChannel, PixelFormat, PrimitiveType, ShaderLang, StencilOp,
};
use crate::vertex_layout::VertexLayout;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BlendState {
    pub enabled: bool,
    pub src_factor_rgb: BlendFactor,
    pub dst_factor_rgb: BlendFactor,
    pub op_rgb: BlendOperation,
    pub src_factor_alpha: BlendFactor,
    pub dst_factor_alpha: BlendFactor,
    pub op_alpha: BlendOperation,
    pub color_write_mask: PixelChannel,
    pub blend_color: Vec4,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            src_factor_rgb: BlendFactor::One,
            dst_factor_rgb: BlendFactor::Zero,
            op_rgb: BlendOperation::Add,
            src_factor_alpha: BlendFactor::One,
            dst_factor_alpha: BlendFactor::Zero,
            op_alpha: BlendOperation::Add,
            color_write_mask: PixelChannel::RGBA,
            blend_color: Vec4::ONE,
        }
    }
}

impl BlendState {
    /// 常用的 alpha 混合
    pub fn alpha_blend() -> Self {
        Self {
            enabled: true,
            src_factor_rgb: BlendFactor::SrcAlpha,
            dst_factor_rgb: BlendFactor::OneMinusSrcAlpha,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct StencilState {
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub compare: CompareFunc,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DepthStencilState {
    pub depth_compare: CompareFunc,
    pub depth_write_enabled: bool,
    pub stencil_enabled: bool,
    pub stencil_front: StencilState,
    pub stencil_back: StencilState,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub stencil_ref: u8,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_compare: CompareFunc::Always,
            depth_write_enabled: false,
            stencil_enabled: false,
            stencil_front: StencilState::default(),
            stencil_back: StencilState::default(),
            stencil_read_mask: 0xff,
            stencil_write_mask: 0xff,
            stencil_ref: 0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RasterizerState {
    pub cull_face_enabled: bool,
    pub cull_face: Face,
    pub alpha_to_coverage_enabled: bool,
    pub sample_count: u32,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            cull_face_enabled: false,
            cull_face: Face::Back,
            alpha_to_coverage_enabled: false,
            sample_count: 1,
        }
    }
}

/// 由容器在创建前填入的 shader 原生对象
#[derive(Clone, Debug)]
pub(crate) struct ResolvedShader {
    pub objects: Vec<NativeId>,
    pub lang: ShaderLang,
}

/// Pipeline 创建参数
#[derive(Clone, Debug)]
pub struct PipelineSetup {
    pub locator: Locator,
    pub shader: ShaderHandle,
    /// 每个顶点 buffer 槽位一个布局
    pub layouts: Vec<VertexLayout>,
    pub primitive_type: PrimitiveType,
    pub blend: BlendState,
    pub depth_stencil: DepthStencilState,
    pub rasterizer: RasterizerState,
    pub color_format: PixelFormat,
    pub depth_format: Option<PixelFormat>,

    pub(crate) resolved_shader: Option<ResolvedShader>,
}

impl PipelineSetup {
    pub fn new(shader: ShaderHandle, layout: VertexLayout) -> Self {
        Self {
            locator: Locator::anonymous(),
            shader,
            layouts: vec![layout],
            primitive_type: PrimitiveType::Triangles,
            blend: BlendState::default(),
            depth_stencil: DepthStencilState::default(),
            rasterizer: RasterizerState::default(),
            color_format: PixelFormat::RGBA8,
            depth_format: Some(PixelFormat::DEPTHSTENCIL),
            resolved_shader: None,
        }
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub(crate) fn resolved_shader(&self) -> Result<&ResolvedShader, InitError> {
        self.resolved_shader
            .as_ref()
            .ok_or_else(|| InitError::Dependency(format!("pipeline shader {:?} is not valid", self.shader)))
    }

    pub(crate) fn validate(&self) -> Result<(), InitError> {
        self.resolved_shader()?;
        if self.layouts.is_empty() || self.layouts.iter().all(VertexLayout::is_empty) {
            return Err(InitError::InvalidSetup("pipeline without vertex layout".to_string()));
        }
        if !self.color_format.is_valid_render_target_color_format() {
            return Err(InitError::InvalidSetup(format!(
                "{:?} is not a render target color format",
                self.color_format
            )));
        }
        if let Some(depth_format) = self.depth_format
            && !depth_format.is_depth_format()
        {
            return Err(InitError::InvalidSetup(format!("{:?} is not a depth format", depth_format)));
        }
        Ok(())
    }
}

/// 后端创建出的 Pipeline
#[derive(Debug)]
pub struct Pipeline {
    /// GL: VAO；D3D11: input layout / rasterizer / depth-stencil / blend；Metal: pipeline state / depth-stencil
    pub(crate) objects: Vec<NativeId>,
    shader: ShaderHandle,
    primitive_type: PrimitiveType,
    blend: BlendState,
    depth_stencil: DepthStencilState,
    rasterizer: RasterizerState,
}

impl Pipeline {
    pub(crate) fn new(setup: &PipelineSetup, objects: Vec<NativeId>) -> Self {
        Self {
            objects,
            shader: setup.shader,
            primitive_type: setup.primitive_type,
            blend: setup.blend,
            depth_stencil: setup.depth_stencil,
            rasterizer: setup.rasterizer,
        }
    }
}

// getters
impl Pipeline {
    #[inline]
    pub fn objects(&self) -> &[NativeId] {
        &self.objects
    }

    #[inline]
    pub fn shader(&self) -> ShaderHandle {
        self.shader
    }

    #[inline]
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    #[inline]
    pub fn blend(&self) -> &BlendState {
        &self.blend
    }

    #[inline]
    pub fn depth_stencil(&self) -> &DepthStencilState {
        &self.depth_stencil
    }

    #[inline]
    pub fn rasterizer(&self) -> &RasterizerState {
        &self.rasterizer
    }
}

pub struct PipelineKind;

impl ResourceKind for PipelineKind {
    type Handle = PipelineHandle;
    type Setup = PipelineSetup;
    type Resource = Pipeline;

    const TYPE: ResourceType = GfxResourceType::PIPELINE;
    const NAME: &'static str = "Pipeline";

    fn locator(setup: &PipelineSetup) -> &Locator {
        &setup.locator
    }
}

impl GfxResourceKind for PipelineKind {
    #[inline]
    fn pool(pools: &GfxPools) -> &ResourcePool<Self> {
        &pools.pipelines
    }

    #[inline]
    fn pool_mut(pools: &mut GfxPools) -> &mut ResourcePool<Self> {
        &mut pools.pipelines
    }

    fn resolve(setup: &mut PipelineSetup, pools: &GfxPools) {
        setup.resolved_shader = pools.shaders.lookup(setup.shader).map(|shader| ResolvedShader {
            objects: shader.objects().to_vec(),
            lang: shader.lang(),
        });
    }

    fn dependencies(setup: &PipelineSetup) -> Dependencies {
        Dependencies {
            shaders: vec![setup.shader],
            ..Default::default()
        }
    }

    fn init<B: Backend, D: NativeDevice<B>>(
        factory: &mut GfxFactory<B, D>,
        setup: &PipelineSetup,
        _content: Option<&[u8]>,
    ) -> Result<Pipeline, InitError> {
        factory.init_pipeline(setup)
    }

    fn native_objects(pipeline: &Pipeline) -> Vec<NativeId> {
        pipeline.objects.clone()
    }
}

impl GfxHandle for PipelineHandle {
    type Kind = PipelineKind;
}

impl GfxSetup for PipelineSetup {
    type Kind = PipelineKind;
}
