//! Oryn gfx 资源层
//!
//! 在 `oryn-resource` 的通用资源池之上定义五种 GPU 资源
//! （Mesh、Shader、Texture、Pipeline、RenderPass），以及：
//! - 与平台无关的 Setup 描述符
//! - 各个后端（Headless / GL / D3D11 / Metal）的参数翻译
//! - 统一的后端工厂 `GfxFactory`
//! - 对外的资源容器 `GfxResourceContainer`

pub mod backend;
pub mod config;
pub mod container;
pub mod factory;
pub mod handles;
pub mod kind;
pub mod resources;
pub mod types;
pub mod vertex_layout;

pub use backend::{Backend, BackendType, DefaultBackend, HeadlessDevice, NativeDevice, NativeId};
pub use config::GfxConfig;
pub use container::GfxResourceContainer;
pub use factory::GfxFactory;
pub use handles::{GfxResourceType, MeshHandle, PipelineHandle, RenderPassHandle, ShaderHandle, TextureHandle};
pub use kind::{Dependencies, GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
pub use resources::mesh::{Mesh, MeshKind, MeshSetup, PrimitiveGroup};
pub use resources::pipeline::{BlendState, DepthStencilState, Pipeline, PipelineKind, PipelineSetup, RasterizerState};
pub use resources::render_pass::{ColorAttachment, DepthStencilAttachment, RenderPass, RenderPassKind, RenderPassSetup};
pub use resources::shader::{Shader, ShaderKind, ShaderSetup, ShaderSource};
pub use resources::texture::{SamplerState, Texture, TextureKind, TextureSetup};
pub use vertex_layout::{VertexComponent, VertexLayout};
