use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use oryn_asset::{AssetHub, ContentSource, LoadStats, LoaderConfig};
use oryn_gfx::types::{IndexType, PixelFormat, VertexAttr, VertexFormat};
use oryn_gfx::{
    DefaultBackend, GfxConfig, GfxResourceContainer, HeadlessDevice, MeshHandle, MeshSetup, RenderPassHandle,
    RenderPassSetup, TextureHandle, TextureSetup, VertexLayout,
};
use oryn_resource::{Locator, ResourceLabel, ResourceState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressParams {
    pub frames: u32,
    pub seed: u64,
    pub creates_per_frame: u32,
    /// 每次创建后随机释放一个已有资源的概率
    pub release_probability: f64,
    /// 每隔这么多帧换一个标签，旧标签在两个周期后整体释放
    pub label_lifetime_frames: u32,
    /// 扫描其中的图片作为异步加载的纹理，相对工作区根目录
    pub asset_dir: PathBuf,
}

impl Default for StressParams {
    fn default() -> Self {
        Self {
            frames: 300,
            seed: 1,
            creates_per_frame: 4,
            release_probability: 0.3,
            label_lifetime_frames: 60,
            asset_dir: PathBuf::from("assets"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub gfx: GfxConfig,
    pub loader: LoaderConfig,
    pub stress: StressParams,
}

#[derive(Clone, Debug, Default)]
pub struct StressReport {
    pub frames: u32,
    pub created: usize,
    /// 资源池已满被拒绝的创建
    pub rejected: usize,
    pub released: usize,
    pub released_by_label: usize,
    pub loads: LoadStats,
    /// 销毁全部资源后仍然存活的原生对象，应为 0
    pub leaked_native_objects: usize,
}

#[derive(Clone, Copy, Debug)]
enum LiveHandle {
    Mesh(MeshHandle),
    Texture(TextureHandle),
    /// render pass 与它的颜色附件一起释放
    RenderPass(RenderPassHandle, TextureHandle),
}

pub struct StressTest {
    params: StressParams,
    rng: StdRng,
    gfx: GfxResourceContainer<DefaultBackend, HeadlessDevice>,
    hub: AssetHub,

    image_files: Vec<PathBuf>,
    live: Vec<LiveHandle>,
    labels: VecDeque<(ResourceLabel, u32)>,
    report: StressReport,
}

// new & init
impl StressTest {
    pub fn new(config: &StressConfig, workspace: &Path) -> anyhow::Result<Self> {
        let image_files = scan_images(&workspace.join(&config.stress.asset_dir));
        log::info!("stress test: {} image files found", image_files.len());

        Ok(Self {
            params: config.stress.clone(),
            rng: StdRng::seed_from_u64(config.stress.seed),
            gfx: GfxResourceContainer::new(&config.gfx, HeadlessDevice::new()),
            hub: AssetHub::new(&config.loader)?,
            image_files,
            live: Vec::new(),
            labels: VecDeque::new(),
            report: StressReport::default(),
        })
    }
}

// run
impl StressTest {
    pub fn run(mut self) -> StressReport {
        for frame in 0..self.params.frames {
            self.frame(frame);
            if frame % 60 == 0 {
                self.log_pools(frame);
            }
        }
        self.drain_loads();
        self.shutdown()
    }

    fn frame(&mut self, frame: u32) {
        let _span = tracy_client::span!("StressTest::frame");
        self.rotate_labels(frame);

        for _ in 0..self.params.creates_per_frame {
            self.create_random();
            if !self.live.is_empty() && self.rng.gen_bool(self.params.release_probability) {
                let index = self.rng.gen_range(0..self.live.len());
                let handle = self.live.swap_remove(index);
                self.release(handle);
            }
        }

        self.hub.update(&mut self.gfx);
        self.gfx.update();
        self.report.frames += 1;
    }

    fn rotate_labels(&mut self, frame: u32) {
        let lifetime = self.params.label_lifetime_frames.max(1);
        if frame % lifetime == 0 {
            if !self.labels.is_empty() {
                self.gfx.pop_label();
            }
            let label = self.gfx.push_label();
            self.labels.push_back((label, frame));
        }

        while let Some(&(label, start)) = self.labels.front()
            && frame - start >= lifetime * 2
        {
            self.labels.pop_front();
            self.report.released_by_label += self.gfx.release_label(label);
        }
        // 按标签销毁的 Handle 已经失效
        let gfx = &self.gfx;
        self.live.retain(|handle| state_of(gfx, *handle) != ResourceState::Initial);
    }

    fn create_random(&mut self) {
        let result = match self.rng.gen_range(0..4) {
            0 => {
                let (setup, data) = quad_mesh();
                self.gfx.create(setup, Some(&data)).map(LiveHandle::Mesh)
            }
            1 => {
                let size = 1u32 << self.rng.gen_range(1u32..6);
                let setup = TextureSetup::from_pixel_data_2d(size, size, 1, PixelFormat::RGBA8);
                let pixels = vec![0x80u8; setup.data_size()];
                self.gfx.create(setup, Some(&pixels)).map(LiveHandle::Texture)
            }
            2 => self.create_render_target(),
            _ => self.load_texture(),
        };

        match result {
            Ok(handle) => {
                self.report.created += 1;
                self.live.push(handle);
            }
            Err(e) => {
                log::debug!("create rejected: {}", e);
                self.report.rejected += 1;
            }
        }
    }

    fn create_render_target(&mut self) -> Result<LiveHandle, oryn_resource::ResourceError> {
        let color = self.gfx.create(TextureSetup::render_target_2d(128, 128, PixelFormat::RGBA8), None)?;
        match self.gfx.create(RenderPassSetup::new(color), None) {
            Ok(pass) => Ok(LiveHandle::RenderPass(pass, color)),
            Err(e) => {
                self.gfx.release(color);
                Err(e)
            }
        }
    }

    fn load_texture(&mut self) -> Result<LiveHandle, oryn_resource::ResourceError> {
        if self.image_files.is_empty() {
            let setup = TextureSetup::from_pixel_data_2d(4, 4, 1, PixelFormat::RGBA8);
            let source = ContentSource::memory(vec![0xffu8; setup.data_size()]);
            return self.hub.load_texture(&mut self.gfx, source, setup).map(LiveHandle::Texture);
        }

        let path = &self.image_files[self.rng.gen_range(0..self.image_files.len())];
        let setup = TextureSetup::from_file(Locator::shared(path.to_string_lossy()));
        let source = ContentSource::file(path);
        self.hub.load_texture(&mut self.gfx, source, setup).map(LiveHandle::Texture)
    }

    fn release(&mut self, handle: LiveHandle) {
        match handle {
            LiveHandle::Mesh(h) => self.gfx.release(h),
            LiveHandle::Texture(h) => self.gfx.release(h),
            LiveHandle::RenderPass(pass, color) => {
                self.gfx.release(pass);
                self.gfx.release(color)
            }
        };
        self.report.released += 1;
    }

    fn drain_loads(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while self.hub.num_in_flight() > 0 && Instant::now() < deadline {
            if self.hub.update(&mut self.gfx) == 0 {
                std::thread::sleep(Duration::from_millis(1));
            }
        }
        if self.hub.num_in_flight() > 0 {
            log::warn!("{} loads still in flight at shutdown", self.hub.num_in_flight());
        }
    }

    fn shutdown(mut self) -> StressReport {
        self.report.released_by_label += self.gfx.release_label(ResourceLabel::ALL);
        self.gfx.destroy_mut();
        self.report.leaked_native_objects = self.gfx.device().num_live();
        self.report.loads = self.hub.stats();
        self.report
    }

    fn log_pools(&self, frame: u32) {
        log::info!(
            "frame {}: meshes {}, textures {}, render passes {}, pending {}, in flight {}",
            frame,
            self.gfx.query_pool_info::<oryn_gfx::MeshKind>().num_used(),
            self.gfx.query_pool_info::<oryn_gfx::TextureKind>().num_used(),
            self.gfx.query_pool_info::<oryn_gfx::RenderPassKind>().num_used(),
            self.gfx.num_pending(),
            self.hub.num_in_flight()
        );
    }
}

fn state_of(gfx: &GfxResourceContainer<DefaultBackend, HeadlessDevice>, handle: LiveHandle) -> ResourceState {
    match handle {
        LiveHandle::Mesh(h) => gfx.query_state(h),
        LiveHandle::Texture(h) => gfx.query_state(h),
        LiveHandle::RenderPass(pass, _) => gfx.query_state(pass),
    }
}

fn quad_mesh() -> (MeshSetup, Vec<u8>) {
    let layout = VertexLayout::new()
        .add(VertexAttr::Position, VertexFormat::Float3)
        .add(VertexAttr::TexCoord0, VertexFormat::Float2);
    let vertices: [f32; 20] = [
        -1.0, -1.0, 0.0, 0.0, 0.0, //
        1.0, -1.0, 0.0, 1.0, 0.0, //
        1.0, 1.0, 0.0, 1.0, 1.0, //
        -1.0, 1.0, 0.0, 0.0, 1.0,
    ];
    let indices: [u16; 6] = [0, 1, 2, 0, 2, 3];

    let mut data: Vec<u8> = vertices.iter().flat_map(|v| v.to_le_bytes()).collect();
    data.extend(indices.iter().flat_map(|i| i.to_le_bytes()));
    (MeshSetup::from_data(layout, 4, IndexType::UInt16, 6), data)
}

/// 目录下所有 png / jpg 文件，目录不存在时为空
fn scan_images(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> StressConfig {
        StressConfig {
            stress: StressParams {
                frames: 40,
                creates_per_frame: 3,
                label_lifetime_frames: 10,
                asset_dir: PathBuf::from("no-such-dir"),
                ..Default::default()
            },
            loader: LoaderConfig {
                worker_threads: 2,
                max_completions_per_frame: 4,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_stress_run_leaks_nothing() {
        oryn_crate_tools::init_log::init_test_log();
        let report = StressTest::new(&small_config(), &std::env::temp_dir()).unwrap().run();

        assert_eq!(report.frames, 40);
        assert!(report.created > 0);
        assert!(report.released_by_label > 0);
        assert_eq!(report.leaked_native_objects, 0);
    }

    #[test]
    fn test_small_pools_reject_without_leaking() {
        oryn_crate_tools::init_log::init_test_log();
        let mut config = small_config();
        config.gfx = GfxConfig::with_pool_config(oryn_resource::PoolConfig::fixed(2));
        config.stress.release_probability = 0.0;

        let report = StressTest::new(&config, &std::env::temp_dir()).unwrap().run();
        assert!(report.rejected > 0);
        assert_eq!(report.leaked_native_objects, 0);
    }

    #[test]
    fn test_quad_mesh_blob_size() {
        let (setup, data) = quad_mesh();
        assert_eq!(data.len(), setup.vertex_data_size() + setup.index_data_size());
    }

    #[test]
    fn test_config_defaults_from_partial_toml() {
        let config: StressConfig = toml_from("[stress]\nframes = 5\n");
        assert_eq!(config.stress.frames, 5);
        assert_eq!(config.stress.seed, StressParams::default().seed);
        assert_eq!(config.gfx, GfxConfig::default());
    }

    fn toml_from(text: &str) -> StressConfig {
        let path = std::env::temp_dir().join(format!("oryn-stress-{}.toml", std::process::id()));
        std::fs::write(&path, text).unwrap();
        let config = oryn_crate_tools::config::load_toml(&path).unwrap();
        std::fs::remove_file(&path).ok();
        config
    }
}
