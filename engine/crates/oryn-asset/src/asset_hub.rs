use oryn_gfx::resources::shader::ShaderSource;
use oryn_gfx::types::{PixelFormat, ShaderLang};
use oryn_gfx::{
    Backend, GfxResourceContainer, GfxSetup, MeshHandle, MeshSetup, NativeDevice, ShaderHandle, ShaderSetup,
    TextureHandle, TextureSetup,
};
use oryn_resource::{Completion, Locator, ResourceError, ResourceKind, ResourceState};
use serde::{Deserialize, Serialize};

use crate::io_dispatcher::IoDispatcher;
use crate::request::{AssetTarget, IoJob, IoPayload, IoRequest, IoResult};
use crate::source::ContentSource;

type HandleOf<S> = <<S as GfxSetup>::Kind as ResourceKind>::Handle;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// IO 线程数，0 表示由 rayon 决定
    pub worker_threads: usize,
    /// 每帧最多应用的加载结果数
    pub max_completions_per_frame: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            max_completions_per_frame: 16,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LoadStats {
    /// 真正发出的 IO 请求
    pub requested: usize,
    /// 复用已登记的共享资源，没有发 IO 请求
    pub reused: usize,
    pub completed: usize,
    pub failed: usize,
    /// 资源在加载期间被释放，结果被丢弃
    pub discarded: usize,
}

/// 资源加载的入口
///
/// 1. `load_*` 在容器中创建 `Pending` 资源，把 IO 请求交给后台线程，立即返回 Handle
/// 2. 后台线程读取、解码内容
/// 3. `update` 在持有者线程上把结果应用到容器，每帧有上限
///
/// 在结果回来之前释放 Handle 即为取消，结果会因为代数不符被丢弃。
pub struct AssetHub {
    dispatcher: IoDispatcher,
    config: LoaderConfig,

    num_in_flight: usize,
    stats: LoadStats,
}

// new & init
impl AssetHub {
    pub fn new(config: &LoaderConfig) -> anyhow::Result<Self> {
        log::info!("asset hub created: {:?}", config);
        Ok(Self {
            dispatcher: IoDispatcher::new(config.worker_threads)?,
            config: *config,
            num_in_flight: 0,
            stats: LoadStats::default(),
        })
    }
}

// load
impl AssetHub {
    /// 异步加载纹理
    ///
    /// `setup.from_file` 时内容按图片文件解码为 RGBA8，尺寸取自图片；
    /// 否则内容直接作为像素数据。
    pub fn load_texture<B: Backend, D: NativeDevice<B>>(
        &mut self,
        gfx: &mut GfxResourceContainer<B, D>,
        source: ContentSource,
        setup: TextureSetup,
    ) -> Result<TextureHandle, ResourceError> {
        let _span = tracy_client::span!("AssetHub::load_texture");
        let Some(handle) = self.create_pending(gfx, setup.clone())? else {
            return self.reused(gfx, &setup);
        };

        log::debug!("request texture {:?} from {:?}", setup.locator, source);
        let job = if setup.from_file { IoJob::Image(source) } else { IoJob::Raw(source) };
        self.dispatch(AssetTarget::Texture(handle, setup), job);
        Ok(handle)
    }

    /// 异步加载 Mesh，内容为顶点与索引数据组成的 blob
    pub fn load_mesh<B: Backend, D: NativeDevice<B>>(
        &mut self,
        gfx: &mut GfxResourceContainer<B, D>,
        source: ContentSource,
        setup: MeshSetup,
    ) -> Result<MeshHandle, ResourceError> {
        let _span = tracy_client::span!("AssetHub::load_mesh");
        let Some(handle) = self.create_pending(gfx, setup.clone())? else {
            return self.reused(gfx, &setup);
        };

        log::debug!("request mesh {:?} from {:?}", setup.locator, source);
        self.dispatch(AssetTarget::Mesh(handle), IoJob::Raw(source));
        Ok(handle)
    }

    /// 异步加载一种语言的 vertex / fragment 程序
    pub fn load_shader<B: Backend, D: NativeDevice<B>>(
        &mut self,
        gfx: &mut GfxResourceContainer<B, D>,
        locator: Locator,
        lang: ShaderLang,
        vs: ContentSource,
        fs: ContentSource,
    ) -> Result<ShaderHandle, ResourceError> {
        let _span = tracy_client::span!("AssetHub::load_shader");
        let setup = ShaderSetup::new(locator.clone());
        let Some(handle) = self.create_pending(gfx, setup.clone())? else {
            return self.reused(gfx, &setup);
        };

        log::debug!("request {:?} shader {:?}", lang, locator);
        self.dispatch(AssetTarget::Shader(handle, locator), IoJob::ShaderStages { lang, vs, fs });
        Ok(handle)
    }

    /// 新建 `Pending` 资源；共享 Locator 已登记时返回 `None`，不发 IO 请求
    fn create_pending<S: GfxSetup, B: Backend, D: NativeDevice<B>>(
        &mut self,
        gfx: &mut GfxResourceContainer<B, D>,
        setup: S,
    ) -> Result<Option<HandleOf<S>>, ResourceError> {
        if gfx.find_shared::<S::Kind>(<S::Kind as ResourceKind>::locator(&setup)).is_some() {
            return Ok(None);
        }
        gfx.create_async(setup).map(Some)
    }

    /// 共享资源已存在：增加引用后返回已有的 Handle
    fn reused<S: GfxSetup, B: Backend, D: NativeDevice<B>>(
        &mut self,
        gfx: &mut GfxResourceContainer<B, D>,
        setup: &S,
    ) -> Result<HandleOf<S>, ResourceError>
    where
        S: Clone,
    {
        self.stats.reused += 1;
        gfx.create_async(setup.clone())
    }

    fn dispatch(&mut self, target: AssetTarget, job: IoJob) {
        self.num_in_flight += 1;
        self.stats.requested += 1;
        self.dispatcher.request(IoRequest { target, job });
    }
}

// update
impl AssetHub {
    /// 每帧调用：应用已完成的加载结果，返回本帧应用的个数
    pub fn update<B: Backend, D: NativeDevice<B>>(&mut self, gfx: &mut GfxResourceContainer<B, D>) -> usize {
        let _span = tracy_client::span!("AssetHub::update");
        let mut num_applied = 0;
        while num_applied < self.config.max_completions_per_frame {
            let Some(result) = self.dispatcher.try_recv_result() else {
                break;
            };
            self.num_in_flight -= 1;
            self.apply(gfx, result);
            num_applied += 1;
        }
        num_applied
    }

    fn apply<B: Backend, D: NativeDevice<B>>(&mut self, gfx: &mut GfxResourceContainer<B, D>, result: IoResult) {
        let IoResult { target, payload } = result;
        let completion = match payload {
            Ok(payload) => Self::complete(gfx, target, payload),
            Err(e) => {
                log::error!("load {:?} failed: {:#}", target, e);
                fail_target(gfx, target)
            }
        };

        match completion {
            Completion::Applied(ResourceState::Valid) => self.stats.completed += 1,
            Completion::Applied(_) => self.stats.failed += 1,
            Completion::Discarded => {
                log::debug!("load result discarded, resource released before completion");
                self.stats.discarded += 1;
            }
        }
    }

    fn complete<B: Backend, D: NativeDevice<B>>(
        gfx: &mut GfxResourceContainer<B, D>,
        target: AssetTarget,
        payload: IoPayload,
    ) -> Completion {
        match (target, payload) {
            (AssetTarget::Texture(handle, mut setup), IoPayload::Image(image)) => {
                setup.width = image.width;
                setup.height = image.height;
                setup.num_mipmaps = 1;
                setup.color_format = PixelFormat::RGBA8;
                gfx.complete_async_with(handle, setup, Some(&image.pixels))
            }
            (AssetTarget::Texture(handle, _), IoPayload::Bytes(bytes)) => gfx.complete_async(handle, Some(&bytes)),
            (AssetTarget::Mesh(handle), IoPayload::Bytes(bytes)) => gfx.complete_async(handle, Some(&bytes)),
            (AssetTarget::Shader(handle, locator), IoPayload::ShaderStages { lang, vs, fs }) => {
                let setup = ShaderSetup::new(locator).with_program(lang, shader_source(lang, vs), shader_source(lang, fs));
                gfx.complete_async_with(handle, setup, None)
            }
            (target, payload) => {
                log::error!("mismatched load payload {:?} for {:?}", payload, target);
                fail_target(gfx, target)
            }
        }
    }
}

fn fail_target<B: Backend, D: NativeDevice<B>>(gfx: &mut GfxResourceContainer<B, D>, target: AssetTarget) -> Completion {
    match target {
        AssetTarget::Texture(handle, _) => gfx.fail_async(handle),
        AssetTarget::Mesh(handle) => gfx.fail_async(handle),
        AssetTarget::Shader(handle, _) => gfx.fail_async(handle),
    }
}

/// HLSL 只接受字节码，其他语言是 UTF-8 文本时按源码处理
fn shader_source(lang: ShaderLang, bytes: Vec<u8>) -> ShaderSource {
    if lang == ShaderLang::Hlsl5 {
        return ShaderSource::ByteCode(bytes);
    }
    match String::from_utf8(bytes) {
        Ok(text) => ShaderSource::Source(text),
        Err(e) => ShaderSource::ByteCode(e.into_bytes()),
    }
}

// getters
impl AssetHub {
    /// 已发出、结果还没有应用的请求数
    #[inline]
    pub fn num_in_flight(&self) -> usize {
        self.num_in_flight
    }

    #[inline]
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}
