use oryn_resource::ResourceType;
use slotmap::new_key_type;

new_key_type! { pub struct MeshHandle; }
new_key_type! { pub struct ShaderHandle; }
new_key_type! { pub struct TextureHandle; }
new_key_type! { pub struct PipelineHandle; }
new_key_type! { pub struct RenderPassHandle; }

/// gfx 层的资源类型标签
pub struct GfxResourceType;
impl GfxResourceType {
    pub const MESH: ResourceType = ResourceType::new(0);
    pub const SHADER: ResourceType = ResourceType::new(1);
    pub const TEXTURE: ResourceType = ResourceType::new(2);
    pub const PIPELINE: ResourceType = ResourceType::new(3);
    pub const RENDER_PASS: ResourceType = ResourceType::new(4);

    pub fn name(ty: ResourceType) -> &'static str {
        match ty.tag() {
            0 => "Mesh",
            1 => "Shader",
            2 => "Texture",
            3 => "Pipeline",
            4 => "RenderPass",
            _ => "Unknown",
        }
    }
}
