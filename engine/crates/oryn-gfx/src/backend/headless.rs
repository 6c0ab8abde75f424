use std::collections::HashMap;

use oryn_resource::InitError;

use crate::backend::{Backend, BackendType, NativeDevice, NativeId};
use crate::resources::mesh::MeshSetup;
use crate::resources::pipeline::PipelineSetup;
use crate::resources::render_pass::RenderPassSetup;
use crate::resources::shader::ShaderSetup;
use crate::resources::texture::TextureSetup;
use crate::types::{PixelFormat, ShaderLang, Usage};

/// 无窗口、无 GPU 的后端，用于测试和压力测试
pub struct HeadlessBackend;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HeadlessDesc {
    Buffer { size: usize, usage: Usage },
    Texture { width: u32, height: u32, depth: u32, format: PixelFormat, num_mipmaps: u32 },
    Shader { programs: usize },
    Pipeline { num_layouts: usize },
    RenderPass { num_attachments: usize },
}

impl Backend for HeadlessBackend {
    type Desc = HeadlessDesc;

    const TYPE: BackendType = BackendType::Headless;
    const STREAM_BUFFER_SLOTS: usize = 1;
    const SHADER_LANGS: &'static [ShaderLang] = &[
        ShaderLang::Glsl330,
        ShaderLang::GlslEs3,
        ShaderLang::Glsl100,
        ShaderLang::Hlsl5,
        ShaderLang::Metal,
    ];

    fn vertex_buffer_desc(setup: &MeshSetup) -> Result<HeadlessDesc, InitError> {
        Ok(HeadlessDesc::Buffer {
            size: setup.vertex_data_size(),
            usage: setup.vertex_usage,
        })
    }

    fn index_buffer_desc(setup: &MeshSetup) -> Result<HeadlessDesc, InitError> {
        Ok(HeadlessDesc::Buffer {
            size: setup.index_data_size(),
            usage: setup.index_usage,
        })
    }

    fn texture_descs(setup: &TextureSetup) -> Result<Vec<HeadlessDesc>, InitError> {
        Ok(vec![HeadlessDesc::Texture {
            width: setup.width,
            height: setup.height,
            depth: setup.depth,
            format: setup.color_format,
            num_mipmaps: setup.num_mipmaps,
        }])
    }

    fn shader_descs(setup: &ShaderSetup) -> Result<Vec<HeadlessDesc>, InitError> {
        setup.select_program(Self::SHADER_LANGS)?;
        Ok(vec![HeadlessDesc::Shader {
            programs: setup.programs().len(),
        }])
    }

    fn pipeline_descs(setup: &PipelineSetup) -> Result<Vec<HeadlessDesc>, InitError> {
        Ok(vec![HeadlessDesc::Pipeline {
            num_layouts: setup.layouts.len(),
        }])
    }

    fn render_pass_descs(setup: &RenderPassSetup) -> Result<Vec<HeadlessDesc>, InitError> {
        Ok(vec![HeadlessDesc::RenderPass {
            num_attachments: setup.color_attachments.len() + usize::from(setup.depth_stencil_attachment.is_some()),
        }])
    }
}

/// 只分配 ID、记录存活对象的原生设备
///
/// 对任意 `Backend` 都可用，因此也能驱动 GL/D3D11/Metal 的翻译层做无 GPU 测试。
#[derive(Default)]
pub struct HeadlessDevice {
    next_id: u64,
    /// id -> 描述符的调试字符串
    live: HashMap<NativeId, String>,

    num_create_calls: usize,
    num_destroyed: usize,
    bytes_uploaded: usize,

    /// 第 n 次 create 调用失败（从 1 开始），用于测试回滚
    fail_at: Option<usize>,
}
// new & init
impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `n` 次（从 1 开始）调用 create 时返回错误
    pub fn with_failure_at(n: usize) -> Self {
        let mut device = Self::default();
        device.fail_at = Some(n);
        device
    }
}
impl Drop for HeadlessDevice {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            log::warn!("HeadlessDevice dropped with {} live native objects", self.live.len());
        }
    }
}
// getters
impl HeadlessDevice {
    #[inline]
    pub fn num_live(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn num_destroyed(&self) -> usize {
        self.num_destroyed
    }

    #[inline]
    pub fn bytes_uploaded(&self) -> usize {
        self.bytes_uploaded
    }

    pub fn is_live(&self, id: NativeId) -> bool {
        self.live.contains_key(&id)
    }

    /// 存活对象创建时的描述符（调试字符串）
    pub fn desc_of(&self, id: NativeId) -> Option<&str> {
        self.live.get(&id).map(String::as_str)
    }
}

impl<B: Backend> NativeDevice<B> for HeadlessDevice {
    fn create(&mut self, desc: &B::Desc, data: Option<&[u8]>) -> Result<NativeId, InitError> {
        self.num_create_calls += 1;
        if self.fail_at == Some(self.num_create_calls) {
            return Err(InitError::Native(format!("injected failure creating {:?}", desc)));
        }

        self.next_id += 1;
        let id = NativeId(self.next_id);
        self.bytes_uploaded += data.map_or(0, <[u8]>::len);
        self.live.insert(id, format!("{:?}", desc));
        Ok(id)
    }

    fn destroy(&mut self, id: NativeId) {
        if self.live.remove(&id).is_some() {
            self.num_destroyed += 1;
        } else {
            log::warn!("destroy of unknown native object {:?}", id);
        }
    }
}
