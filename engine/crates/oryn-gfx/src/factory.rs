use std::marker::PhantomData;

use oryn_resource::{Factory, InitError};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::kind::GfxResourceKind;
use crate::resources::mesh::{Mesh, MeshSetup};
use crate::resources::pipeline::{Pipeline, PipelineSetup};
use crate::resources::render_pass::{RenderPass, RenderPassSetup};
use crate::resources::shader::{Shader, ShaderSetup};
use crate::resources::texture::{Texture, TextureSetup};
use crate::types::Usage;

/// gfx 资源工厂
///
/// `B` 负责把 Setup 翻译成原生描述符，`D` 负责真正创建原生对象。
/// 同一个工厂服务于所有五种资源池。
pub struct GfxFactory<B: Backend, D: NativeDevice<B>> {
    device: D,
    _backend: PhantomData<fn() -> B>,
}

// new & init
impl<B: Backend, D: NativeDevice<B>> GfxFactory<B, D> {
    pub fn new(device: D) -> Self {
        log::info!("gfx factory created, backend: {:?}", B::TYPE);
        Self {
            device,
            _backend: PhantomData,
        }
    }

    pub fn into_device(self) -> D {
        self.device
    }
}

// getters
impl<B: Backend, D: NativeDevice<B>> GfxFactory<B, D> {
    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

// tools
impl<B: Backend, D: NativeDevice<B>> GfxFactory<B, D> {
    /// 依次创建原生对象，任意一个失败时按相反顺序销毁已创建的对象
    fn create_objects(&mut self, descs: &[(B::Desc, Option<&[u8]>)]) -> Result<Vec<NativeId>, InitError> {
        let mut objects = Vec::with_capacity(descs.len());
        for (desc, data) in descs {
            match self.device.create(desc, *data) {
                Ok(id) => objects.push(id),
                Err(e) => {
                    log::warn!(
                        "native create failed for {:?}, rolling back {} objects: {}",
                        desc,
                        objects.len(),
                        e
                    );
                    self.destroy_objects(objects);
                    return Err(e);
                }
            }
        }
        Ok(objects)
    }

    /// 按创建的相反顺序销毁
    pub(crate) fn destroy_objects(&mut self, objects: Vec<NativeId>) {
        for id in objects.into_iter().rev() {
            self.device.destroy(id);
        }
    }
}

// init
impl<B: Backend, D: NativeDevice<B>> GfxFactory<B, D> {
    pub(crate) fn init_mesh(&mut self, setup: &MeshSetup, content: Option<&[u8]>) -> Result<Mesh, InitError> {
        setup.validate(content)?;

        let mut descs = Vec::new();
        if setup.num_vertices > 0 {
            let num_buffers = if setup.vertex_usage == Usage::Stream { B::STREAM_BUFFER_SLOTS } else { 1 };
            let data = setup.vertex_data(content);
            for _ in 0..num_buffers {
                descs.push((B::vertex_buffer_desc(setup)?, data));
            }
        }
        let num_vertex_buffers = descs.len();
        if setup.has_indices() {
            descs.push((B::index_buffer_desc(setup)?, setup.index_data(content)));
        }

        let mut objects = self.create_objects(&descs)?;
        let index_buffer = (objects.len() > num_vertex_buffers).then(|| objects.remove(num_vertex_buffers));
        Ok(Mesh::new(setup, objects, index_buffer))
    }

    pub(crate) fn init_shader(&mut self, setup: &ShaderSetup) -> Result<Shader, InitError> {
        let lang = setup.select_program(B::SHADER_LANGS)?.lang;
        let descs: Vec<_> = B::shader_descs(setup)?.into_iter().map(|desc| (desc, None)).collect();
        let objects = self.create_objects(&descs)?;
        Ok(Shader::new(objects, lang))
    }

    /// 像素数据只交给第一个对象（纹理本身）
    pub(crate) fn init_texture(&mut self, setup: &TextureSetup, content: Option<&[u8]>) -> Result<Texture, InitError> {
        setup.validate(content)?;

        let descs: Vec<_> = B::texture_descs(setup)?
            .into_iter()
            .enumerate()
            .map(|(i, desc)| (desc, if i == 0 { content } else { None }))
            .collect();
        let objects = self.create_objects(&descs)?;
        if objects.is_empty() {
            return Err(InitError::Native("backend produced no texture object".to_string()));
        }
        Ok(Texture::new(setup, objects))
    }

    pub(crate) fn init_pipeline(&mut self, setup: &PipelineSetup) -> Result<Pipeline, InitError> {
        setup.validate()?;

        let descs: Vec<_> = B::pipeline_descs(setup)?.into_iter().map(|desc| (desc, None)).collect();
        let objects = self.create_objects(&descs)?;
        Ok(Pipeline::new(setup, objects))
    }

    pub(crate) fn init_render_pass(&mut self, setup: &RenderPassSetup) -> Result<RenderPass, InitError> {
        let (_, width, height) = setup.validate()?;

        let descs: Vec<_> = B::render_pass_descs(setup)?.into_iter().map(|desc| (desc, None)).collect();
        let objects = self.create_objects(&descs)?;
        Ok(RenderPass::new(setup, objects, width, height))
    }
}

impl<K: GfxResourceKind, B: Backend, D: NativeDevice<B>> Factory<K> for GfxFactory<B, D> {
    fn init(&mut self, setup: &K::Setup, content: Option<&[u8]>) -> Result<K::Resource, InitError> {
        K::init(self, setup, content)
    }

    fn destroy(&mut self, resource: K::Resource) {
        self.destroy_objects(K::native_objects(&resource));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{D3d11Backend, GlBackend, HeadlessBackend, HeadlessDevice, MetalBackend};
    use crate::resources::texture::TextureKind;
    use crate::types::{IndexType, PixelFormat, ShaderLang, VertexAttr, VertexFormat};
    use crate::vertex_layout::VertexLayout;

    fn layout() -> VertexLayout {
        VertexLayout::new()
            .add(VertexAttr::Position, VertexFormat::Float3)
            .add(VertexAttr::Color0, VertexFormat::UByte4N)
    }

    #[test]
    fn test_mesh_uploads_vertex_and_index_data() {
        let mut factory = GfxFactory::<HeadlessBackend, _>::new(HeadlessDevice::new());
        let setup = MeshSetup::from_data(layout(), 3, IndexType::UInt16, 3);
        let content = vec![0u8; 3 * 16 + 3 * 2];

        let mesh = factory.init_mesh(&setup, Some(&content)).unwrap();
        assert_eq!(mesh.vertex_buffers().len(), 1);
        assert!(mesh.index_buffer().is_some());
        assert_eq!(factory.device().num_live(), 2);
        assert_eq!(factory.device().bytes_uploaded(), content.len());

        Factory::<crate::resources::mesh::MeshKind>::destroy(&mut factory, mesh);
        assert_eq!(factory.device().num_live(), 0);
    }

    #[test]
    fn test_stream_mesh_buffer_count_per_backend() {
        let setup = MeshSetup::empty(layout(), 64, Usage::Stream);

        let mut gl = GfxFactory::<GlBackend, _>::new(HeadlessDevice::new());
        let mesh = gl.init_mesh(&setup, None).unwrap();
        assert_eq!(mesh.vertex_buffers().len(), 2);
        gl.destroy_objects(mesh.vertex_buffers().to_vec());

        let mut d3d11 = GfxFactory::<D3d11Backend, _>::new(HeadlessDevice::new());
        let mesh = d3d11.init_mesh(&setup, None).unwrap();
        assert_eq!(mesh.vertex_buffers().len(), 1);
        d3d11.destroy_objects(mesh.vertex_buffers().to_vec());
    }

    #[test]
    fn test_partial_failure_rolls_back() {
        // D3D11 纹理依次创建 texture、SRV、sampler，第 3 个失败
        let mut factory = GfxFactory::<D3d11Backend, _>::new(HeadlessDevice::with_failure_at(3));
        let setup = TextureSetup::from_pixel_data_2d(2, 2, 1, PixelFormat::RGBA8);

        let result = Factory::<TextureKind>::init(&mut factory, &setup, Some(&[0u8; 16]));
        assert!(matches!(result, Err(InitError::Native(_))));
        assert_eq!(factory.device().num_live(), 0);
        assert_eq!(factory.device().num_destroyed(), 2);
    }

    #[test]
    fn test_texture_object_count_per_backend() {
        let setup = TextureSetup::from_pixel_data_2d(2, 2, 1, PixelFormat::RGBA8);
        let data = [0u8; 16];

        let mut gl = GfxFactory::<GlBackend, _>::new(HeadlessDevice::new());
        let texture = gl.init_texture(&setup, Some(&data)).unwrap();
        assert_eq!(texture.objects().len(), 1);
        Factory::<TextureKind>::destroy(&mut gl, texture);

        let mut d3d11 = GfxFactory::<D3d11Backend, _>::new(HeadlessDevice::new());
        let texture = d3d11.init_texture(&setup, Some(&data)).unwrap();
        assert_eq!(texture.objects().len(), 3);
        // 像素数据只上传一次
        assert_eq!(d3d11.device().bytes_uploaded(), 16);
        Factory::<TextureKind>::destroy(&mut d3d11, texture);

        let mut metal = GfxFactory::<MetalBackend, _>::new(HeadlessDevice::new());
        let texture = metal.init_texture(&setup, Some(&data)).unwrap();
        assert_eq!(texture.objects().len(), 2);
        Factory::<TextureKind>::destroy(&mut metal, texture);
        assert_eq!(metal.device().num_live(), 0);
    }

    #[test]
    fn test_shader_language_selection() {
        let setup = ShaderSetup::default()
            .with_program(ShaderLang::Glsl330, "void main(){}", "void main(){}")
            .with_program(ShaderLang::Hlsl5, vec![1u8], vec![2u8]);

        let mut d3d11 = GfxFactory::<D3d11Backend, _>::new(HeadlessDevice::new());
        let shader = d3d11.init_shader(&setup).unwrap();
        assert_eq!(shader.lang(), ShaderLang::Hlsl5);
        assert_eq!(shader.objects().len(), 2);
        d3d11.destroy_objects(shader.objects().to_vec());

        let mut metal = GfxFactory::<MetalBackend, _>::new(HeadlessDevice::new());
        assert!(metal.init_shader(&setup).is_err());
        assert_eq!(metal.device().num_live(), 0);
    }
}
