use oryn_resource::{InitError, Locator, ResourceKind, ResourcePool, ResourceType};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::factory::GfxFactory;
use crate::handles::{GfxResourceType, TextureHandle};
use crate::kind::{GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
use crate::types::{PixelFormat, TextureFilterMode, TextureType, TextureWrapMode, Usage};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SamplerState {
    pub min_filter: TextureFilterMode,
    pub mag_filter: TextureFilterMode,
    pub wrap_u: TextureWrapMode,
    pub wrap_v: TextureWrapMode,
    pub wrap_w: TextureWrapMode,
}

/// Texture 创建参数
#[derive(Clone, Debug)]
pub struct TextureSetup {
    pub locator: Locator,
    pub texture_type: TextureType,
    pub width: u32,
    pub height: u32,
    /// 3D 纹理的深度或数组纹理的层数，其他为 1
    pub depth: u32,
    pub num_mipmaps: u32,
    pub color_format: PixelFormat,
    pub usage: Usage,
    pub render_target: bool,
    pub sample_count: u32,
    pub sampler: SamplerState,
    /// 尺寸与格式要等文件解码后才知道，加载完成时会用新的 Setup 替换
    pub from_file: bool,
}

impl Default for TextureSetup {
    fn default() -> Self {
        Self {
            locator: Locator::anonymous(),
            texture_type: TextureType::Texture2D,
            width: 1,
            height: 1,
            depth: 1,
            num_mipmaps: 1,
            color_format: PixelFormat::RGBA8,
            usage: Usage::Immutable,
            render_target: false,
            sample_count: 1,
            sampler: SamplerState::default(),
            from_file: false,
        }
    }
}

// new & init
impl TextureSetup {
    pub fn from_pixel_data_2d(width: u32, height: u32, num_mipmaps: u32, color_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            num_mipmaps,
            color_format,
            ..Default::default()
        }
    }

    pub fn from_pixel_data_cube(size: u32, num_mipmaps: u32, color_format: PixelFormat) -> Self {
        Self {
            texture_type: TextureType::TextureCube,
            ..Self::from_pixel_data_2d(size, size, num_mipmaps, color_format)
        }
    }

    /// 没有初始数据、之后由 CPU 更新的 2D 纹理
    pub fn empty_2d(width: u32, height: u32, color_format: PixelFormat, usage: Usage) -> Self {
        Self {
            usage,
            ..Self::from_pixel_data_2d(width, height, 1, color_format)
        }
    }

    /// 颜色或深度渲染目标
    pub fn render_target_2d(width: u32, height: u32, color_format: PixelFormat) -> Self {
        Self {
            render_target: true,
            sampler: SamplerState {
                wrap_u: TextureWrapMode::ClampToEdge,
                wrap_v: TextureWrapMode::ClampToEdge,
                wrap_w: TextureWrapMode::ClampToEdge,
                ..Default::default()
            },
            ..Self::from_pixel_data_2d(width, height, 1, color_format)
        }
    }

    /// 从文件异步加载，尺寸在解码后确定
    pub fn from_file(locator: Locator) -> Self {
        Self {
            locator,
            from_file: true,
            ..Default::default()
        }
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerState) -> Self {
        self.sampler = sampler;
        self
    }
}

// tools
impl TextureSetup {
    /// 全部 mip、全部面所需的像素数据字节数
    pub fn data_size(&self) -> usize {
        let faces = self.texture_type.num_faces();
        let slices = match self.texture_type {
            TextureType::Texture3D | TextureType::TextureArray => self.depth.max(1) as usize,
            _ => 1,
        };
        (0..self.num_mipmaps.max(1))
            .map(|mip| {
                let w = self.width.checked_shr(mip).unwrap_or(0).max(1);
                let h = self.height.checked_shr(mip).unwrap_or(0).max(1);
                self.color_format.image_pitch(w, h)
            })
            .sum::<usize>()
            * faces
            * slices
    }

    /// 当前尺寸下完整 mip 链的层数
    #[inline]
    pub fn max_mipmaps(&self) -> u32 {
        u32::BITS - self.width.max(self.height).max(1).leading_zeros()
    }

    #[inline]
    pub fn needs_data(&self) -> bool {
        self.usage == Usage::Immutable && !self.render_target
    }

    /// 与后端无关的校验
    pub(crate) fn validate(&self, content: Option<&[u8]>) -> Result<(), InitError> {
        if self.width == 0 || self.height == 0 {
            return Err(InitError::InvalidSetup(format!("texture size {}x{}", self.width, self.height)));
        }
        if self.num_mipmaps > self.max_mipmaps() {
            return Err(InitError::InvalidSetup(format!(
                "{} mipmaps for {}x{} texture, at most {}",
                self.num_mipmaps,
                self.width,
                self.height,
                self.max_mipmaps()
            )));
        }
        if self.render_target {
            let valid = self.color_format.is_valid_render_target_color_format() || self.color_format.is_depth_format();
            if !valid {
                return Err(InitError::InvalidSetup(format!(
                    "{:?} is not a render target format",
                    self.color_format
                )));
            }
            if self.texture_type != TextureType::Texture2D {
                return Err(InitError::InvalidSetup("render target must be a 2D texture".to_string()));
            }
        } else if self.color_format.is_depth_format() {
            return Err(InitError::InvalidSetup("depth format requires render target".to_string()));
        }
        if self.texture_type == TextureType::TextureCube && self.width != self.height {
            return Err(InitError::InvalidSetup("cube texture faces must be square".to_string()));
        }
        match content {
            None if self.needs_data() => Err(InitError::MissingContent),
            Some(data) if data.len() < self.data_size() => Err(InitError::InvalidSetup(format!(
                "pixel data too small: need {} bytes, have {}",
                self.data_size(),
                data.len()
            ))),
            _ => Ok(()),
        }
    }
}

/// 后端创建出的 Texture
#[derive(Debug)]
pub struct Texture {
    /// 第一个为纹理本身，其余为 view / sampler 等附属对象
    pub(crate) objects: Vec<NativeId>,

    texture_type: TextureType,
    width: u32,
    height: u32,
    depth: u32,
    num_mipmaps: u32,
    format: PixelFormat,
    render_target: bool,
}

impl Texture {
    pub(crate) fn new(setup: &TextureSetup, objects: Vec<NativeId>) -> Self {
        Self {
            objects,
            texture_type: setup.texture_type,
            width: setup.width,
            height: setup.height,
            depth: setup.depth,
            num_mipmaps: setup.num_mipmaps,
            format: setup.color_format,
            render_target: setup.render_target,
        }
    }
}

// getters
impl Texture {
    #[inline]
    pub fn native(&self) -> NativeId {
        self.objects[0]
    }

    #[inline]
    pub fn objects(&self) -> &[NativeId] {
        &self.objects
    }

    #[inline]
    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn num_mipmaps(&self) -> u32 {
        self.num_mipmaps
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn is_render_target(&self) -> bool {
        self.render_target
    }
}

pub struct TextureKind;

impl ResourceKind for TextureKind {
    type Handle = TextureHandle;
    type Setup = TextureSetup;
    type Resource = Texture;

    const TYPE: ResourceType = GfxResourceType::TEXTURE;
    const NAME: &'static str = "Texture";

    fn locator(setup: &TextureSetup) -> &Locator {
        &setup.locator
    }
}

impl GfxResourceKind for TextureKind {
    #[inline]
    fn pool(pools: &GfxPools) -> &ResourcePool<Self> {
        &pools.textures
    }

    #[inline]
    fn pool_mut(pools: &mut GfxPools) -> &mut ResourcePool<Self> {
        &mut pools.textures
    }

    fn init<B: Backend, D: NativeDevice<B>>(
        factory: &mut GfxFactory<B, D>,
        setup: &TextureSetup,
        content: Option<&[u8]>,
    ) -> Result<Texture, InitError> {
        factory.init_texture(setup, content)
    }

    fn native_objects(texture: &Texture) -> Vec<NativeId> {
        texture.objects.clone()
    }
}

impl GfxHandle for TextureHandle {
    type Kind = TextureKind;
}

impl GfxSetup for TextureSetup {
    type Kind = TextureKind;
}
