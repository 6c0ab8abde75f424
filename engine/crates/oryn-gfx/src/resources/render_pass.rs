use glam::Vec4;
use oryn_resource::{InitError, Locator, ResourceKind, ResourcePool, ResourceType};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::factory::GfxFactory;
use crate::handles::{GfxResourceType, RenderPassHandle, TextureHandle};
use crate::kind::{Dependencies, GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
use crate::types::{LoadAction, PixelFormat, TextureType};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ColorAttachment {
    pub texture: TextureHandle,
    pub mip_level: u32,
    /// cube 纹理的面，或数组/3D 纹理的层
    pub slice: u32,
    pub load_action: LoadAction,
    pub clear_color: Vec4,
}

impl ColorAttachment {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            mip_level: 0,
            slice: 0,
            load_action: LoadAction::Clear,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DepthStencilAttachment {
    pub texture: TextureHandle,
    pub load_action: LoadAction,
    pub clear_depth: f32,
    pub clear_stencil: u8,
}

impl DepthStencilAttachment {
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            load_action: LoadAction::Clear,
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }
}

/// 由容器在创建前填入的附件纹理信息
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct ResolvedAttachment {
    pub object: NativeId,
    pub format: PixelFormat,
    pub texture_type: TextureType,
    pub render_target: bool,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ResolvedPass {
    pub colors: Vec<ResolvedAttachment>,
    pub depth_stencil: Option<ResolvedAttachment>,
}

/// RenderPass 创建参数
#[derive(Clone, Debug)]
pub struct RenderPassSetup {
    pub locator: Locator,
    pub color_attachments: Vec<ColorAttachment>,
    pub depth_stencil_attachment: Option<DepthStencilAttachment>,

    pub(crate) resolved: Option<ResolvedPass>,
}

impl RenderPassSetup {
    pub fn new(color: TextureHandle) -> Self {
        Self {
            locator: Locator::anonymous(),
            color_attachments: vec![ColorAttachment::new(color)],
            depth_stencil_attachment: None,
            resolved: None,
        }
    }

    pub fn with_color(mut self, texture: TextureHandle) -> Self {
        self.color_attachments.push(ColorAttachment::new(texture));
        self
    }

    pub fn with_depth_stencil(mut self, texture: TextureHandle) -> Self {
        self.depth_stencil_attachment = Some(DepthStencilAttachment::new(texture));
        self
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub(crate) fn resolved(&self) -> Result<&ResolvedPass, InitError> {
        self.resolved
            .as_ref()
            .ok_or_else(|| InitError::Dependency("render pass attachment texture is not valid".to_string()))
    }

    /// 所有附件必须是渲染目标、格式匹配、尺寸一致
    pub(crate) fn validate(&self) -> Result<(&ResolvedPass, u32, u32), InitError> {
        let resolved = self.resolved()?;
        let first = resolved
            .colors
            .first()
            .or(resolved.depth_stencil.as_ref())
            .ok_or_else(|| InitError::InvalidSetup("render pass without attachments".to_string()))?;
        let (width, height) = (first.width, first.height);

        for color in &resolved.colors {
            if !color.render_target || !color.format.is_valid_render_target_color_format() {
                return Err(InitError::InvalidSetup(format!(
                    "color attachment {:?} is not a color render target",
                    color.format
                )));
            }
        }
        if let Some(depth) = &resolved.depth_stencil
            && (!depth.render_target || !depth.format.is_depth_format())
        {
            return Err(InitError::InvalidSetup(format!(
                "depth attachment {:?} is not a depth render target",
                depth.format
            )));
        }
        let mismatch = resolved
            .colors
            .iter()
            .chain(resolved.depth_stencil.iter())
            .any(|a| a.width != width || a.height != height);
        if mismatch {
            return Err(InitError::InvalidSetup("render pass attachments differ in size".to_string()));
        }
        Ok((resolved, width, height))
    }
}

/// 后端创建出的 RenderPass
#[derive(Debug)]
pub struct RenderPass {
    /// GL: framebuffer；D3D11: RTV... + DSV；Metal: 无持久对象
    pub(crate) objects: Vec<NativeId>,
    color_attachments: Vec<ColorAttachment>,
    depth_stencil_attachment: Option<DepthStencilAttachment>,
    width: u32,
    height: u32,
}

impl RenderPass {
    pub(crate) fn new(setup: &RenderPassSetup, objects: Vec<NativeId>, width: u32, height: u32) -> Self {
        Self {
            objects,
            color_attachments: setup.color_attachments.clone(),
            depth_stencil_attachment: setup.depth_stencil_attachment,
            width,
            height,
        }
    }
}

// getters
impl RenderPass {
    #[inline]
    pub fn objects(&self) -> &[NativeId] {
        &self.objects
    }

    #[inline]
    pub fn color_attachments(&self) -> &[ColorAttachment] {
        &self.color_attachments
    }

    #[inline]
    pub fn depth_stencil_attachment(&self) -> Option<&DepthStencilAttachment> {
        self.depth_stencil_attachment.as_ref()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub struct RenderPassKind;

impl ResourceKind for RenderPassKind {
    type Handle = RenderPassHandle;
    type Setup = RenderPassSetup;
    type Resource = RenderPass;

    const TYPE: ResourceType = GfxResourceType::RENDER_PASS;
    const NAME: &'static str = "RenderPass";

    fn locator(setup: &RenderPassSetup) -> &Locator {
        &setup.locator
    }
}

impl GfxResourceKind for RenderPassKind {
    #[inline]
    fn pool(pools: &GfxPools) -> &ResourcePool<Self> {
        &pools.render_passes
    }

    #[inline]
    fn pool_mut(pools: &mut GfxPools) -> &mut ResourcePool<Self> {
        &mut pools.render_passes
    }

    fn resolve(setup: &mut RenderPassSetup, pools: &GfxPools) {
        let resolve_one = |texture: TextureHandle| {
            pools.textures.lookup(texture).map(|tex| ResolvedAttachment {
                object: tex.native(),
                format: tex.format(),
                texture_type: tex.texture_type(),
                render_target: tex.is_render_target(),
                width: tex.width(),
                height: tex.height(),
            })
        };

        let colors: Option<Vec<_>> = setup.color_attachments.iter().map(|a| resolve_one(a.texture)).collect();
        let depth_stencil = match &setup.depth_stencil_attachment {
            Some(a) => resolve_one(a.texture).map(Some),
            None => Some(None),
        };
        setup.resolved = match (colors, depth_stencil) {
            (Some(colors), Some(depth_stencil)) => Some(ResolvedPass { colors, depth_stencil }),
            _ => None,
        };
    }

    fn dependencies(setup: &RenderPassSetup) -> Dependencies {
        let textures = setup
            .color_attachments
            .iter()
            .map(|a| a.texture)
            .chain(setup.depth_stencil_attachment.map(|a| a.texture))
            .collect();
        Dependencies {
            textures,
            ..Default::default()
        }
    }

    fn init<B: Backend, D: NativeDevice<B>>(
        factory: &mut GfxFactory<B, D>,
        setup: &RenderPassSetup,
        _content: Option<&[u8]>,
    ) -> Result<RenderPass, InitError> {
        factory.init_render_pass(setup)
    }

    fn native_objects(pass: &RenderPass) -> Vec<NativeId> {
        pass.objects.clone()
    }
}

impl GfxHandle for RenderPassHandle {
    type Kind = RenderPassKind;
}

impl GfxSetup for RenderPassSetup {
    type Kind = RenderPassKind;
}
