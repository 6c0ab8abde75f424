//! 五种 gfx 资源：Setup 描述符、后端无关的资源对象、资源类型定义

pub mod mesh;
pub mod pipeline;
pub mod render_pass;
pub mod shader;
pub mod texture;
