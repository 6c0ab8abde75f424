//! 渲染后端
//!
//! 每个后端把与平台无关的 Setup 翻译成自己的原生描述符（`Backend::Desc`），
//! 真正的原生对象通过 `NativeDevice` 创建和销毁。
//! 后端翻译是纯函数，所有后端在任意平台上都会编译；
//! cargo feature 只决定 `DefaultBackend` 指向哪一个。

pub mod d3d11;
pub mod gl;
pub mod headless;
pub mod mtl;

use std::fmt;

use oryn_resource::InitError;

use crate::resources::mesh::MeshSetup;
use crate::resources::pipeline::PipelineSetup;
use crate::resources::render_pass::RenderPassSetup;
use crate::resources::shader::ShaderSetup;
use crate::resources::texture::TextureSetup;
use crate::types::ShaderLang;

pub use d3d11::D3d11Backend;
pub use gl::GlBackend;
pub use headless::{HeadlessBackend, HeadlessDevice};
pub use mtl::MetalBackend;

#[cfg(feature = "gl")]
pub type DefaultBackend = GlBackend;
#[cfg(all(feature = "d3d11", not(feature = "gl")))]
pub type DefaultBackend = D3d11Backend;
#[cfg(all(feature = "metal", not(any(feature = "gl", feature = "d3d11"))))]
pub type DefaultBackend = MetalBackend;
#[cfg(not(any(feature = "gl", feature = "d3d11", feature = "metal")))]
pub type DefaultBackend = HeadlessBackend;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BackendType {
    Headless,
    Gl,
    D3d11,
    Metal,
}

/// 原生图形对象的不透明 ID（GL name、COM 指针、MTL 对象表索引等）
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NativeId(pub u64);

/// 后端翻译层
///
/// 所有方法都只做参数翻译和校验，不接触原生 API。
/// 返回多个描述符时，`GfxFactory` 会按顺序创建，其中任意一个失败都会回滚已创建的对象。
pub trait Backend: 'static {
    type Desc: fmt::Debug;

    const TYPE: BackendType;
    /// Stream 用途的顶点 buffer 轮换个数
    const STREAM_BUFFER_SLOTS: usize;
    /// 可接受的着色语言，按优先级排列
    const SHADER_LANGS: &'static [ShaderLang];

    fn vertex_buffer_desc(setup: &MeshSetup) -> Result<Self::Desc, InitError>;

    fn index_buffer_desc(setup: &MeshSetup) -> Result<Self::Desc, InitError>;

    /// 第一个描述符是纹理本身，像素数据只上传给它
    fn texture_descs(setup: &TextureSetup) -> Result<Vec<Self::Desc>, InitError>;

    fn shader_descs(setup: &ShaderSetup) -> Result<Vec<Self::Desc>, InitError>;

    fn pipeline_descs(setup: &PipelineSetup) -> Result<Vec<Self::Desc>, InitError>;

    fn render_pass_descs(setup: &RenderPassSetup) -> Result<Vec<Self::Desc>, InitError>;
}

/// 原生图形 API 的边界
pub trait NativeDevice<B: Backend> {
    fn create(&mut self, desc: &B::Desc, data: Option<&[u8]>) -> Result<NativeId, InitError>;

    fn destroy(&mut self, id: NativeId);
}
