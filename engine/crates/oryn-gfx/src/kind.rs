use oryn_resource::{InitError, PoolConfig, ResourceKind, ResourcePool};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::config::GfxConfig;
use crate::factory::GfxFactory;
use crate::handles::{ShaderHandle, TextureHandle};
use crate::resources::mesh::MeshKind;
use crate::resources::pipeline::PipelineKind;
use crate::resources::render_pass::RenderPassKind;
use crate::resources::shader::ShaderKind;
use crate::resources::texture::TextureKind;

/// gfx 层资源的公共行为
///
/// 把每种资源和它在 `GfxPools` 中的池、在 `GfxFactory` 中的创建逻辑关联起来，
/// 使 `GfxResourceContainer` 可以用一套泛型方法处理所有资源。
pub trait GfxResourceKind: ResourceKind<Setup: Clone> + Sized {
    fn pool(pools: &GfxPools) -> &ResourcePool<Self>;

    fn pool_mut(pools: &mut GfxPools) -> &mut ResourcePool<Self>;

    /// 创建前把 Setup 中对其他资源的 Handle 解析成原生对象
    ///
    /// 引用的资源不可用时不报错，留给工厂在 init 时返回 `InitError::Dependency`。
    fn resolve(_setup: &mut Self::Setup, _pools: &GfxPools) {}

    /// Setup 引用的其他资源，资源存活期间持有它们的引用计数
    fn dependencies(_setup: &Self::Setup) -> Dependencies {
        Dependencies::default()
    }

    fn init<B: Backend, D: NativeDevice<B>>(
        factory: &mut GfxFactory<B, D>,
        setup: &Self::Setup,
        content: Option<&[u8]>,
    ) -> Result<Self::Resource, InitError>;

    /// 资源持有的全部原生对象，销毁时按此顺序释放
    fn native_objects(resource: &Self::Resource) -> Vec<NativeId>;
}

/// 从 Handle 推导资源类型
pub trait GfxHandle: slotmap::Key {
    type Kind: GfxResourceKind<Handle = Self>;
}

/// 从 Setup 推导资源类型
pub trait GfxSetup: Clone + Sized {
    type Kind: GfxResourceKind<Setup = Self>;
}

/// 一个资源所依赖的其他资源
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub shaders: Vec<ShaderHandle>,
    pub textures: Vec<TextureHandle>,
}

impl Dependencies {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty() && self.textures.is_empty()
    }
}

/// 所有 gfx 资源池
pub struct GfxPools {
    pub(crate) meshes: ResourcePool<MeshKind>,
    pub(crate) shaders: ResourcePool<ShaderKind>,
    pub(crate) textures: ResourcePool<TextureKind>,
    pub(crate) pipelines: ResourcePool<PipelineKind>,
    pub(crate) render_passes: ResourcePool<RenderPassKind>,
}

impl GfxPools {
    pub fn new(config: &GfxConfig) -> Self {
        Self {
            meshes: ResourcePool::new(config.mesh_pool),
            shaders: ResourcePool::new(config.shader_pool),
            textures: ResourcePool::new(config.texture_pool),
            pipelines: ResourcePool::new(config.pipeline_pool),
            render_passes: ResourcePool::new(config.render_pass_pool),
        }
    }

    pub fn with_pool_config(config: PoolConfig) -> Self {
        Self {
            meshes: ResourcePool::new(config),
            shaders: ResourcePool::new(config),
            textures: ResourcePool::new(config),
            pipelines: ResourcePool::new(config),
            render_passes: ResourcePool::new(config),
        }
    }

    #[inline]
    pub fn get<K: GfxResourceKind>(&self) -> &ResourcePool<K> {
        K::pool(self)
    }

    #[inline]
    pub fn get_mut<K: GfxResourceKind>(&mut self) -> &mut ResourcePool<K> {
        K::pool_mut(self)
    }
}
