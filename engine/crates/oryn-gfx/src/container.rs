use std::collections::HashMap;

use oryn_resource::{
    Completion, LabelStack, Locator, PoolInfo, Release, ResourceError, ResourceId, ResourceInfo, ResourceKind,
    ResourceLabel, ResourceRegistry, ResourceState,
};

use crate::backend::{Backend, DefaultBackend, HeadlessDevice, NativeDevice};
use crate::config::GfxConfig;
use crate::factory::GfxFactory;
use crate::kind::{Dependencies, GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
use crate::resources::mesh::MeshKind;
use crate::resources::pipeline::PipelineKind;
use crate::resources::render_pass::RenderPassKind;
use crate::resources::shader::ShaderKind;
use crate::resources::texture::TextureKind;

type HandleOf<K> = <K as ResourceKind>::Handle;
type ResourceOf<K> = <K as ResourceKind>::Resource;

/// gfx 资源的统一入口
///
/// 持有五个资源池、后端工厂、共享资源登记表和标签栈。
/// 所有方法都以 Setup / Handle 的类型推导出资源种类，例如：
///
/// ```ignore
/// let texture = gfx.create(TextureSetup::render_target_2d(512, 512, PixelFormat::RGBA8), None)?;
/// let pass = gfx.create(RenderPassSetup::new(texture), None)?;
/// ```
///
/// 依赖其他资源的 Setup（Pipeline、RenderPass）会在创建前解析被引用的资源，
/// 被引用的资源不可用时创建失败，Handle 处于 `Failed` 状态。
/// 依赖方存活期间持有被引用资源的引用计数，依赖方销毁时一并释放。
pub struct GfxResourceContainer<B: Backend = DefaultBackend, D: NativeDevice<B> = HeadlessDevice> {
    factory: GfxFactory<B, D>,
    pools: GfxPools,
    registry: ResourceRegistry,
    label_stack: LabelStack,
    /// 依赖方 -> 它持有引用的资源
    dependencies: HashMap<ResourceId, Dependencies>,

    destroyed: bool,
}
// new & init
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    pub fn new(config: &GfxConfig, device: D) -> Self {
        log::info!("gfx resource container created: {:?}", config);
        Self {
            factory: GfxFactory::new(device),
            pools: GfxPools::new(config),
            registry: ResourceRegistry::with_capacity(config.registry_capacity),
            label_stack: LabelStack::with_capacity(config.label_stack_capacity),
            dependencies: HashMap::new(),
            destroyed: false,
        }
    }
}
// destroy
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    pub fn destroy(mut self) {
        self.destroy_mut();
    }

    /// 销毁所有资源，依赖方先于被依赖方
    pub fn destroy_mut(&mut self) {
        if self.destroyed {
            return;
        }
        let _span = tracy_client::span!("GfxResourceContainer::destroy");
        self.pools.render_passes.discard(&mut self.factory);
        self.pools.pipelines.discard(&mut self.factory);
        self.pools.meshes.discard(&mut self.factory);
        self.pools.textures.discard(&mut self.factory);
        self.pools.shaders.discard(&mut self.factory);
        self.registry.remove_label(ResourceLabel::ALL);
        self.dependencies.clear();
        self.destroyed = true;
        log::info!("gfx resource container destroyed");
    }
}
impl<B: Backend, D: NativeDevice<B>> Drop for GfxResourceContainer<B, D> {
    fn drop(&mut self) {
        if !self.destroyed {
            // 忘记显式销毁时仍然释放原生对象
            log::warn!("GfxResourceContainer dropped without destroy");
            self.destroy_mut();
        }
    }
}
// labels
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// 分配新标签并压栈，之后创建的资源都打上这个标签
    pub fn push_label(&mut self) -> ResourceLabel {
        self.label_stack.push_new()
    }

    pub fn push_label_with(&mut self, label: ResourceLabel) {
        self.label_stack.push(label);
    }

    pub fn pop_label(&mut self) -> Option<ResourceLabel> {
        self.label_stack.pop()
    }

    #[inline]
    pub fn peek_label(&self) -> ResourceLabel {
        self.label_stack.peek()
    }
}
// create
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// 同步创建资源
    ///
    /// 共享 Locator 已登记且资源仍在时，直接增加引用计数并返回已有的 Handle。
    /// 只有资源池已满时返回错误；创建失败的资源也会得到 Handle（状态为 `Failed`）。
    pub fn create<S: GfxSetup>(
        &mut self,
        mut setup: S,
        data: Option<&[u8]>,
    ) -> Result<HandleOf<S::Kind>, ResourceError> {
        let locator = S::Kind::locator(&setup).clone();
        if let Some(handle) = self.reuse_shared::<S::Kind>(&locator) {
            return Ok(handle);
        }

        S::Kind::resolve(&mut setup, &self.pools);
        let dependencies = S::Kind::dependencies(&setup);
        let label = self.label_stack.peek();
        let handle = S::Kind::pool_mut(&mut self.pools).create(setup, data, label, &mut self.factory)?;
        self.registry.add(&locator, ResourceId::new::<S::Kind>(handle), label);
        self.acquire_dependencies(ResourceId::new::<S::Kind>(handle), dependencies);
        Ok(handle)
    }

    /// 异步创建资源，立即返回状态为 `Pending` 的 Handle
    ///
    /// 内容准备好后调用 `complete_async` 或 `complete_async_with`。
    pub fn create_async<S: GfxSetup>(&mut self, setup: S) -> Result<HandleOf<S::Kind>, ResourceError> {
        let locator = S::Kind::locator(&setup).clone();
        if let Some(handle) = self.reuse_shared::<S::Kind>(&locator) {
            return Ok(handle);
        }

        let dependencies = S::Kind::dependencies(&setup);
        let label = self.label_stack.peek();
        let handle = S::Kind::pool_mut(&mut self.pools).create_async(setup, label)?;
        self.registry.add(&locator, ResourceId::new::<S::Kind>(handle), label);
        self.acquire_dependencies(ResourceId::new::<S::Kind>(handle), dependencies);
        Ok(handle)
    }

    /// 已登记的共享资源，不增加引用计数
    pub fn find_shared<K: GfxResourceKind>(&self, locator: &Locator) -> Option<K::Handle> {
        let handle = self.registry.lookup(locator, K::TYPE)?.handle::<K>()?;
        K::pool(&self.pools).contains(handle).then_some(handle)
    }

    fn reuse_shared<K: GfxResourceKind>(&mut self, locator: &Locator) -> Option<K::Handle> {
        let handle = self.find_shared::<K>(locator)?;
        K::pool_mut(&mut self.pools).add_ref(handle);
        log::debug!("{} {:?} reused for {:?}", K::NAME, handle, locator);
        Some(handle)
    }
}
// dependencies
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// 为依赖方增加被引用资源的引用计数，已失效的 Handle 跳过
    fn acquire_dependencies(&mut self, dependent: ResourceId, dependencies: Dependencies) {
        if dependencies.is_empty() {
            return;
        }
        let shaders = &mut self.pools.shaders;
        let textures = &mut self.pools.textures;
        let held = Dependencies {
            shaders: dependencies.shaders.into_iter().filter(|&h| shaders.add_ref(h)).collect(),
            textures: dependencies.textures.into_iter().filter(|&h| textures.add_ref(h)).collect(),
        };
        if !held.is_empty() {
            self.dependencies.insert(dependent, held);
        }
    }

    /// 依赖方销毁后释放它持有的引用
    fn release_dependencies(&mut self, dependent: ResourceId) {
        let Some(held) = self.dependencies.remove(&dependent) else {
            return;
        };
        for shader in held.shaders {
            self.release(shader);
        }
        for texture in held.textures {
            self.release(texture);
        }
    }
}
// async completion
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// 用创建时保存的 Setup 完成异步资源
    ///
    /// 槽位已被回收时返回 `Completion::Discarded`，不影响复用该槽位的新资源。
    pub fn complete_async<H: GfxHandle>(&mut self, handle: H, data: Option<&[u8]>) -> Completion {
        // 依赖的资源可能在等待期间才就绪，完成时重新解析
        let Some(mut setup) = H::Kind::pool(&self.pools).setup(handle).cloned() else {
            log::debug!("{} completion for recycled slot {:?} discarded", H::Kind::NAME, handle);
            return Completion::Discarded;
        };
        H::Kind::resolve(&mut setup, &self.pools);
        H::Kind::pool_mut(&mut self.pools).complete_async_with(handle, setup, data, &mut self.factory)
    }

    /// 用加载得到的新 Setup 替换原来的 Setup 后完成
    ///
    /// 新 Setup 的 Locator 不参与登记，登记表中的条目仍指向同一个 Handle。
    pub fn complete_async_with<S: GfxSetup>(
        &mut self,
        handle: HandleOf<S::Kind>,
        mut setup: S,
        data: Option<&[u8]>,
    ) -> Completion {
        S::Kind::resolve(&mut setup, &self.pools);
        S::Kind::pool_mut(&mut self.pools).complete_async_with(handle, setup, data, &mut self.factory)
    }

    /// 异步加载失败
    pub fn fail_async<H: GfxHandle>(&mut self, handle: H) -> Completion {
        H::Kind::pool_mut(&mut self.pools).fail_async(handle, &mut self.factory)
    }

    /// 向已就绪的资源流式加载新内容，之后用 `complete_async` 完成
    pub fn begin_streaming<H: GfxHandle>(&mut self, handle: H) -> Result<(), ResourceError> {
        H::Kind::pool_mut(&mut self.pools).begin_streaming(handle)
    }
}
// access & release
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// Handle 有效且资源状态为 `Valid` 时返回资源
    #[inline]
    pub fn lookup<H: GfxHandle>(&self, handle: H) -> Option<&ResourceOf<H::Kind>> {
        H::Kind::pool(&self.pools).lookup(handle)
    }

    #[inline]
    pub fn is_valid<H: GfxHandle>(&self, handle: H) -> bool {
        H::Kind::pool(&self.pools).is_valid(handle)
    }

    pub fn add_ref<H: GfxHandle>(&mut self, handle: H) -> bool {
        H::Kind::pool_mut(&mut self.pools).add_ref(handle)
    }

    pub fn release<H: GfxHandle>(&mut self, handle: H) -> Release {
        let release = H::Kind::pool_mut(&mut self.pools).release(handle, &mut self.factory);
        if release == Release::Destroyed {
            let id = ResourceId::new::<H::Kind>(handle);
            self.registry.remove(id);
            self.release_dependencies(id);
        }
        release
    }

    /// 销毁所有带有该标签的资源（`ResourceLabel::ALL` 为全部），返回销毁的个数
    ///
    /// 不论剩余引用计数，依赖方先于被依赖方销毁。
    /// 依赖方持有的其他标签的资源只减少引用计数，不计入返回值。
    pub fn release_label(&mut self, label: ResourceLabel) -> usize {
        let _span = tracy_client::span!("GfxResourceContainer::release_label");
        let num_released = self.release_label_in::<RenderPassKind>(label)
            + self.release_label_in::<PipelineKind>(label)
            + self.release_label_in::<MeshKind>(label)
            + self.release_label_in::<TextureKind>(label)
            + self.release_label_in::<ShaderKind>(label);
        self.registry.remove_label(label);
        log::info!("released {} resources with {:?}", num_released, label);
        num_released
    }

    fn release_label_in<K: GfxResourceKind>(&mut self, label: ResourceLabel) -> usize {
        let handles = K::pool_mut(&mut self.pools).release_by_label(label, &mut self.factory);
        for &handle in &handles {
            self.release_dependencies(ResourceId::new::<K>(handle));
        }
        handles.len()
    }
}
// queries
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// 槽位已被回收的 Handle 返回 `ResourceState::Initial`
    pub fn query_state<H: GfxHandle>(&self, handle: H) -> ResourceState {
        H::Kind::pool(&self.pools).state(handle).unwrap_or_default()
    }

    pub fn query_resource_info<H: GfxHandle>(&self, handle: H) -> Result<ResourceInfo, ResourceError> {
        H::Kind::pool(&self.pools)
            .resource_info(handle)
            .ok_or_else(|| ResourceError::StaleHandle(ResourceId::new::<H::Kind>(handle)))
    }

    pub fn query_pool_info<K: GfxResourceKind>(&self) -> PoolInfo {
        K::pool(&self.pools).pool_info()
    }

    pub fn query_free_slots<K: GfxResourceKind>(&self) -> usize {
        K::pool(&self.pools).num_free_slots()
    }

    /// 所有池中等待异步完成的资源数
    pub fn num_pending(&self) -> usize {
        self.pools.meshes.num_pending()
            + self.pools.shaders.num_pending()
            + self.pools.textures.num_pending()
            + self.pools.pipelines.num_pending()
            + self.pools.render_passes.num_pending()
    }

    #[inline]
    pub fn num_shared(&self) -> usize {
        self.registry.len()
    }
}
// frame
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    /// 每帧调用一次
    pub fn update(&mut self) {
        let _span = tracy_client::span!("GfxResourceContainer::update");
        self.pools.meshes.update();
        self.pools.shaders.update();
        self.pools.textures.update();
        self.pools.pipelines.update();
        self.pools.render_passes.update();
    }
}
// getters
impl<B: Backend, D: NativeDevice<B>> GfxResourceContainer<B, D> {
    #[inline]
    pub fn factory(&self) -> &GfxFactory<B, D> {
        &self.factory
    }

    #[inline]
    pub fn device(&self) -> &D {
        self.factory.device()
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        self.factory.device_mut()
    }

    #[inline]
    pub fn pools(&self) -> &GfxPools {
        &self.pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oryn_resource::{HandleExt, PoolConfig};

    use crate::backend::{GlBackend, HeadlessBackend};
    use crate::resources::mesh::MeshSetup;
    use crate::resources::pipeline::PipelineSetup;
    use crate::resources::render_pass::RenderPassSetup;
    use crate::resources::shader::ShaderSetup;
    use crate::resources::texture::TextureSetup;
    use crate::types::{IndexType, PixelFormat, ShaderLang, VertexAttr, VertexFormat};
    use crate::vertex_layout::VertexLayout;

    type TestContainer = GfxResourceContainer<HeadlessBackend, HeadlessDevice>;

    fn container(config: &GfxConfig) -> TestContainer {
        oryn_crate_tools::init_log::init_test_log();
        GfxResourceContainer::new(config, HeadlessDevice::new())
    }

    fn quad_setup() -> (MeshSetup, Vec<u8>) {
        let layout = VertexLayout::new()
            .add(VertexAttr::Position, VertexFormat::Float3)
            .add(VertexAttr::TexCoord0, VertexFormat::Float2);
        let vertices: [[f32; 5]; 4] = [
            [-1.0, -1.0, 0.0, 0.0, 0.0],
            [1.0, -1.0, 0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0, 1.0, 1.0],
            [-1.0, 1.0, 0.0, 0.0, 1.0],
        ];
        let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];
        let mut data = bytemuck::cast_slice::<_, u8>(&vertices).to_vec();
        data.extend_from_slice(bytemuck::cast_slice(&indices));
        (MeshSetup::from_data(layout, 4, IndexType::UInt16, 6), data)
    }

    fn shader_setup() -> ShaderSetup {
        ShaderSetup::default().with_program(ShaderLang::Glsl330, "void main(){}", "void main(){}")
    }

    #[test]
    fn test_mesh_lookup_until_release() {
        let mut gfx = container(&GfxConfig::default());
        let label = gfx.push_label();
        let (setup, data) = quad_setup();

        let h1 = gfx.create(setup, Some(&data)).unwrap();
        let mesh = gfx.lookup(h1).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_indices(), 6);
        assert!(mesh.layout().contains(VertexAttr::TexCoord0));
        assert_eq!(gfx.query_resource_info(h1).unwrap().label, label);

        assert_eq!(gfx.release(h1), Release::Destroyed);
        assert!(gfx.lookup(h1).is_none());

        let (setup, data) = quad_setup();
        let h2 = gfx.create(setup, Some(&data)).unwrap();
        assert_eq!(h1.slot_index(), h2.slot_index());
        assert!(gfx.lookup(h1).is_none());
        assert!(gfx.lookup(h2).is_some());
        assert!(matches!(gfx.query_resource_info(h1), Err(ResourceError::StaleHandle(_))));
        assert_eq!(gfx.query_state(h1), ResourceState::Initial);

        gfx.pop_label();
        gfx.destroy();
    }

    #[test]
    fn test_fifth_create_exceeds_capacity() {
        let mut gfx = container(&GfxConfig::with_pool_config(PoolConfig::fixed(4)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (setup, data) = quad_setup();
                gfx.create(setup, Some(&data)).unwrap()
            })
            .collect();

        let (setup, data) = quad_setup();
        let err = gfx.create(setup, Some(&data)).unwrap_err();
        assert!(matches!(err, ResourceError::CapacityExceeded { capacity: 4, .. }));

        for handle in &handles {
            assert_eq!(gfx.query_state(*handle), ResourceState::Valid);
            assert!(gfx.lookup(*handle).is_some());
        }
        assert_eq!(gfx.query_free_slots::<MeshKind>(), 0);
        assert_eq!(gfx.device().num_live(), 8);
        gfx.destroy_mut();
        assert_eq!(gfx.device().num_live(), 0);
    }

    #[test]
    fn test_release_label_keeps_other_labels() {
        let mut gfx = container(&GfxConfig::default());
        let scene_a = gfx.push_label();
        let a_tex = gfx.create(TextureSetup::render_target_2d(8, 8, PixelFormat::RGBA8), None).unwrap();
        gfx.pop_label();

        let scene_b = gfx.push_label();
        let b_tex = gfx.create(TextureSetup::render_target_2d(8, 8, PixelFormat::RGBA8), None).unwrap();
        gfx.pop_label();

        gfx.push_label_with(scene_a);
        let a_shader = gfx.create(shader_setup(), None).unwrap();
        gfx.add_ref(a_shader);
        gfx.pop_label();

        assert_eq!(gfx.release_label(scene_a), 2);
        assert!(!gfx.is_valid(a_tex));
        assert!(!gfx.is_valid(a_shader));
        assert!(gfx.is_valid(b_tex));

        assert_eq!(gfx.release_label(scene_b), 1);
        assert_eq!(gfx.device().num_live(), 0);
        gfx.destroy();
    }

    #[test]
    fn test_shared_locator_is_deduplicated() {
        let mut gfx = container(&GfxConfig::default());
        let shared = Locator::shared("shaders/basic");

        let setup = ShaderSetup::new(shared.clone()).with_program(ShaderLang::Glsl330, "a", "b");
        let first = gfx.create(setup.clone(), None).unwrap();
        let second = gfx.create(setup, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(gfx.query_resource_info(first).unwrap().ref_count, 2);
        assert_eq!(gfx.find_shared::<ShaderKind>(&shared), Some(first));
        assert_eq!(gfx.device().num_live(), 1);

        let non_shared = gfx.create(shader_setup(), None).unwrap();
        assert_ne!(non_shared, first);

        assert_eq!(gfx.release(first), Release::Retained(1));
        assert_eq!(gfx.release(first), Release::Destroyed);
        assert_eq!(gfx.find_shared::<ShaderKind>(&shared), None);
        assert_eq!(gfx.num_shared(), 0);
        gfx.destroy();
    }

    #[test]
    fn test_pipeline_requires_valid_shader() {
        let mut gfx = container(&GfxConfig::default());
        let layout = VertexLayout::new().add(VertexAttr::Position, VertexFormat::Float3);

        let shader = gfx.create(shader_setup(), None).unwrap();
        let pipeline = gfx.create(PipelineSetup::new(shader, layout.clone()), None).unwrap();
        assert_eq!(gfx.query_state(pipeline), ResourceState::Valid);
        assert_eq!(gfx.lookup(pipeline).unwrap().shader(), shader);

        assert_eq!(gfx.release(pipeline), Release::Destroyed);
        assert_eq!(gfx.release(shader), Release::Destroyed);
        let orphan = gfx.create(PipelineSetup::new(shader, layout), None).unwrap();
        assert_eq!(gfx.query_state(orphan), ResourceState::Failed);
        assert!(gfx.lookup(orphan).is_none());
        gfx.destroy();
    }

    #[test]
    fn test_malformed_setups_fail_without_panic() {
        let mut gfx = container(&GfxConfig::default());

        let texture = gfx
            .create(TextureSetup::from_pixel_data_2d(4, 4, 40, PixelFormat::RGBA8), Some(&[0u8; 64]))
            .unwrap();
        assert_eq!(gfx.query_state(texture), ResourceState::Failed);

        let (mut setup, data) = quad_setup();
        setup.vertex_data_offset = usize::MAX;
        let mesh = gfx.create(setup, Some(&data)).unwrap();
        assert_eq!(gfx.query_state(mesh), ResourceState::Failed);

        assert_eq!(gfx.device().num_live(), 0);
        assert_eq!(gfx.release(texture), Release::Destroyed);
        assert_eq!(gfx.release(mesh), Release::Destroyed);
        gfx.destroy();
    }

    #[test]
    fn test_failed_streaming_releases_old_objects() {
        let mut gfx = container(&GfxConfig::default());
        let setup = TextureSetup::from_pixel_data_2d(2, 2, 1, PixelFormat::RGBA8);
        let handle = gfx.create(setup, Some(&[1u8; 16])).unwrap();
        let before = gfx.lookup(handle).unwrap().native();

        gfx.begin_streaming(handle).unwrap();
        assert_eq!(gfx.fail_async(handle), Completion::Applied(ResourceState::Failed));
        assert!(!gfx.device().is_live(before));
        assert_eq!(gfx.device().num_live(), 0);

        assert_eq!(gfx.release(handle), Release::Destroyed);
        gfx.destroy();
    }

    #[test]
    fn test_pipeline_keeps_shader_alive() {
        let mut gfx = container(&GfxConfig::default());
        let layout = VertexLayout::new().add(VertexAttr::Position, VertexFormat::Float3);

        let shader = gfx.create(shader_setup(), None).unwrap();
        let shader_object = gfx.lookup(shader).unwrap().objects()[0];
        let pipeline = gfx.create(PipelineSetup::new(shader, layout), None).unwrap();
        assert_eq!(gfx.query_resource_info(shader).unwrap().ref_count, 2);

        assert_eq!(gfx.release(shader), Release::Retained(1));
        assert_eq!(gfx.query_state(pipeline), ResourceState::Valid);
        assert!(gfx.device().is_live(shader_object));

        assert_eq!(gfx.release(pipeline), Release::Destroyed);
        assert!(!gfx.is_valid(shader));
        assert_eq!(gfx.device().num_live(), 0);
        gfx.destroy();
    }

    #[test]
    fn test_render_pass_keeps_attachments_alive() {
        let mut gfx = container(&GfxConfig::default());
        let textures = gfx.push_label();
        let color = gfx.create(TextureSetup::render_target_2d(32, 32, PixelFormat::RGBA8), None).unwrap();
        let depth = gfx.create(TextureSetup::render_target_2d(32, 32, PixelFormat::DEPTHSTENCIL), None).unwrap();
        gfx.pop_label();

        let passes = gfx.push_label();
        let pass = gfx.create(RenderPassSetup::new(color).with_depth_stencil(depth), None).unwrap();
        gfx.pop_label();

        assert_eq!(gfx.release(color), Release::Retained(1));
        assert_eq!(gfx.release(depth), Release::Retained(1));
        assert_eq!(gfx.query_state(pass), ResourceState::Valid);
        assert!(gfx.lookup(color).is_some());

        // 只统计该标签下的资源，附件随引用归零一起销毁
        assert_eq!(gfx.release_label(passes), 1);
        assert!(!gfx.is_valid(color));
        assert!(!gfx.is_valid(depth));
        assert_eq!(gfx.release_label(textures), 0);
        assert_eq!(gfx.device().num_live(), 0);
        gfx.destroy();
    }

    #[test]
    fn test_failed_dependent_releases_dependencies() {
        let mut gfx = container(&GfxConfig::default());
        let color = gfx.create(TextureSetup::render_target_2d(64, 32, PixelFormat::RGBA8), None).unwrap();
        let small = gfx.create(TextureSetup::render_target_2d(16, 16, PixelFormat::RGBA8), None).unwrap();

        let mismatched = gfx.create(RenderPassSetup::new(color).with_color(small), None).unwrap();
        assert_eq!(gfx.query_state(mismatched), ResourceState::Failed);
        assert_eq!(gfx.query_resource_info(small).unwrap().ref_count, 2);

        assert_eq!(gfx.release(mismatched), Release::Destroyed);
        assert_eq!(gfx.release(color), Release::Destroyed);
        assert_eq!(gfx.release(small), Release::Destroyed);
        assert_eq!(gfx.device().num_live(), 0);
        gfx.destroy();
    }

    #[test]
    fn test_render_pass_attachments() {
        let mut gfx = container(&GfxConfig::default());
        let color = gfx.create(TextureSetup::render_target_2d(64, 32, PixelFormat::RGBA8), None).unwrap();
        let depth = gfx.create(TextureSetup::render_target_2d(64, 32, PixelFormat::DEPTHSTENCIL), None).unwrap();
        let small = gfx.create(TextureSetup::render_target_2d(16, 16, PixelFormat::RGBA8), None).unwrap();

        let pass = gfx.create(RenderPassSetup::new(color).with_depth_stencil(depth), None).unwrap();
        assert_eq!(gfx.lookup(pass).unwrap().size(), (64, 32));

        let mismatched = gfx.create(RenderPassSetup::new(color).with_color(small), None).unwrap();
        assert_eq!(gfx.query_state(mismatched), ResourceState::Failed);

        let depth_as_color = gfx.create(RenderPassSetup::new(depth), None).unwrap();
        assert_eq!(gfx.query_state(depth_as_color), ResourceState::Failed);
        gfx.destroy();
    }

    #[test]
    fn test_async_texture_completion() {
        let mut gfx = container(&GfxConfig::default());
        let locator = Locator::shared("textures/grid.png");

        let handle = gfx.create_async(TextureSetup::from_file(locator.clone())).unwrap();
        assert_eq!(gfx.query_state(handle), ResourceState::Pending);
        assert!(gfx.is_valid(handle));
        assert!(gfx.lookup(handle).is_none());
        assert_eq!(gfx.num_pending(), 1);

        let decoded = TextureSetup::from_pixel_data_2d(2, 2, 1, PixelFormat::RGBA8).with_locator(locator);
        let completion = gfx.complete_async_with(handle, decoded, Some(&[0u8; 16]));
        assert_eq!(completion, Completion::Applied(ResourceState::Valid));
        assert_eq!(gfx.lookup(handle).unwrap().width(), 2);
        assert_eq!(gfx.num_pending(), 0);
        gfx.destroy();
    }

    #[test]
    fn test_async_completion_after_release_is_discarded() {
        let mut gfx = container(&GfxConfig::with_pool_config(PoolConfig::fixed(1)));
        let (setup, data) = quad_setup();

        let a = gfx.create_async(setup.clone()).unwrap();
        assert_eq!(gfx.release(a), Release::Destroyed);
        let b = gfx.create_async(setup).unwrap();
        assert_eq!(a.slot_index(), b.slot_index());

        assert_eq!(gfx.complete_async(a, Some(&data)), Completion::Discarded);
        assert_eq!(gfx.query_state(b), ResourceState::Pending);
        assert_eq!(gfx.device().num_live(), 0);

        assert_eq!(gfx.complete_async(b, Some(&data)), Completion::Applied(ResourceState::Valid));
        gfx.destroy();
    }

    #[test]
    fn test_streaming_dynamic_texture() {
        let mut gfx = container(&GfxConfig::default());
        let setup = TextureSetup::from_pixel_data_2d(2, 2, 1, PixelFormat::RGBA8);
        let handle = gfx.create(setup, Some(&[1u8; 16])).unwrap();
        let before = gfx.lookup(handle).unwrap().native();

        gfx.begin_streaming(handle).unwrap();
        assert_eq!(gfx.query_state(handle), ResourceState::Pending);
        gfx.complete_async(handle, Some(&[2u8; 16]));

        let after = gfx.lookup(handle).unwrap().native();
        assert_ne!(before, after);
        assert!(!gfx.device().is_live(before));
        assert_eq!(gfx.device().num_live(), 1);
        gfx.destroy();
    }

    #[test]
    fn test_gl_container_object_counts() {
        oryn_crate_tools::init_log::init_test_log();
        let mut gfx =
            GfxResourceContainer::<GlBackend, HeadlessDevice>::new(&GfxConfig::default(), HeadlessDevice::new());
        let layout = VertexLayout::new().add(VertexAttr::Position, VertexFormat::Float3);
        let stream = gfx
            .create(MeshSetup::empty(layout, 256, crate::types::Usage::Stream), None)
            .unwrap();
        assert_eq!(gfx.lookup(stream).unwrap().vertex_buffers().len(), 2);

        let depth = gfx.create(TextureSetup::render_target_2d(32, 32, PixelFormat::DEPTH), None).unwrap();
        let color = gfx.create(TextureSetup::render_target_2d(32, 32, PixelFormat::RGBA8), None).unwrap();
        let pass = gfx.create(RenderPassSetup::new(color).with_depth_stencil(depth), None).unwrap();
        assert_eq!(gfx.lookup(pass).unwrap().objects().len(), 1);

        gfx.update();
        assert_eq!(gfx.query_pool_info::<TextureKind>().num_slots(ResourceState::Valid), 2);
        gfx.destroy();
    }
}
