use oryn_resource::{InitError, Locator, ResourceKind, ResourcePool, ResourceType};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::factory::GfxFactory;
use crate::handles::{GfxResourceType, MeshHandle};
use crate::kind::{GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
use crate::types::{IndexType, PrimitiveType, Usage};
use crate::vertex_layout::VertexLayout;

/// 一组图元：索引网格中为索引范围，否则为顶点范围
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PrimitiveGroup {
    pub base_element: u32,
    pub num_elements: u32,
}

impl PrimitiveGroup {
    pub fn new(base_element: u32, num_elements: u32) -> Self {
        Self {
            base_element,
            num_elements,
        }
    }
}

/// Mesh 创建参数
///
/// 内容数据是一整块 blob：顶点数据从 `vertex_data_offset` 开始，
/// 索引数据从 `index_data_offset` 开始。
#[derive(Clone, Debug)]
pub struct MeshSetup {
    pub locator: Locator,
    pub layout: VertexLayout,
    pub num_vertices: u32,
    pub vertex_usage: Usage,
    pub index_type: IndexType,
    pub num_indices: u32,
    pub index_usage: Usage,
    pub primitive_type: PrimitiveType,
    pub primitive_groups: Vec<PrimitiveGroup>,
    pub vertex_data_offset: usize,
    pub index_data_offset: usize,
}

// new & init
impl MeshSetup {
    /// 由内容数据创建不可变 Mesh，索引数据紧跟在顶点数据之后
    pub fn from_data(layout: VertexLayout, num_vertices: u32, index_type: IndexType, num_indices: u32) -> Self {
        let vertex_size = layout.byte_size() * num_vertices as usize;
        Self {
            locator: Locator::anonymous(),
            layout,
            num_vertices,
            vertex_usage: Usage::Immutable,
            index_type,
            num_indices,
            index_usage: Usage::Immutable,
            primitive_type: PrimitiveType::Triangles,
            primitive_groups: Vec::new(),
            vertex_data_offset: 0,
            index_data_offset: vertex_size,
        }
    }

    /// 没有初始数据的动态 Mesh（Dynamic / Stream）
    pub fn empty(layout: VertexLayout, num_vertices: u32, usage: Usage) -> Self {
        Self {
            vertex_usage: usage,
            index_usage: usage,
            ..Self::from_data(layout, num_vertices, IndexType::None, 0)
        }
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_primitive_group(mut self, group: PrimitiveGroup) -> Self {
        self.primitive_groups.push(group);
        self
    }

    pub fn with_primitive_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.primitive_type = primitive_type;
        self
    }
}

// tools
impl MeshSetup {
    #[inline]
    pub fn vertex_data_size(&self) -> usize {
        self.layout.byte_size() * self.num_vertices as usize
    }

    #[inline]
    pub fn index_data_size(&self) -> usize {
        self.index_type.byte_size() * self.num_indices as usize
    }

    #[inline]
    pub fn has_indices(&self) -> bool {
        self.index_type != IndexType::None && self.num_indices > 0
    }

    /// 是否要求创建时提供内容数据
    pub fn needs_data(&self) -> bool {
        (self.vertex_usage == Usage::Immutable && self.num_vertices > 0)
            || (self.has_indices() && self.index_usage == Usage::Immutable)
    }

    /// 与后端无关的校验
    pub(crate) fn validate(&self, content: Option<&[u8]>) -> Result<(), InitError> {
        if self.num_vertices > 0 && self.layout.is_empty() {
            return Err(InitError::InvalidSetup("mesh has vertices but empty vertex layout".to_string()));
        }
        if self.index_type == IndexType::None && self.num_indices > 0 {
            return Err(InitError::InvalidSetup("mesh has indices but index type None".to_string()));
        }
        let Some(content) = content else {
            return if self.needs_data() { Err(InitError::MissingContent) } else { Ok(()) };
        };
        let vertex_end = self.vertex_data_end()?;
        if self.vertex_usage == Usage::Immutable && vertex_end > content.len() {
            return Err(InitError::InvalidSetup(format!(
                "vertex data out of range: need {} bytes, have {}",
                vertex_end,
                content.len()
            )));
        }
        let index_end = self.index_data_end()?;
        if self.has_indices() && self.index_usage == Usage::Immutable && index_end > content.len() {
            return Err(InitError::InvalidSetup(format!(
                "index data out of range: need {} bytes, have {}",
                index_end,
                content.len()
            )));
        }
        Ok(())
    }

    fn vertex_data_end(&self) -> Result<usize, InitError> {
        self.vertex_data_offset
            .checked_add(self.vertex_data_size())
            .ok_or_else(|| InitError::InvalidSetup(format!("vertex data offset {} overflows", self.vertex_data_offset)))
    }

    fn index_data_end(&self) -> Result<usize, InitError> {
        self.index_data_offset
            .checked_add(self.index_data_size())
            .ok_or_else(|| InitError::InvalidSetup(format!("index data offset {} overflows", self.index_data_offset)))
    }

    /// 内容中顶点数据的切片
    pub(crate) fn vertex_data<'a>(&self, content: Option<&'a [u8]>) -> Option<&'a [u8]> {
        let end = self.vertex_data_end().ok()?;
        content.and_then(|c| c.get(self.vertex_data_offset..end))
    }

    pub(crate) fn index_data<'a>(&self, content: Option<&'a [u8]>) -> Option<&'a [u8]> {
        let end = self.index_data_end().ok()?;
        content.and_then(|c| c.get(self.index_data_offset..end))
    }
}

/// 后端创建出的 Mesh
#[derive(Debug)]
pub struct Mesh {
    /// Stream 用途时有多个，轮流写入
    pub(crate) vertex_buffers: Vec<NativeId>,
    pub(crate) index_buffer: Option<NativeId>,

    num_vertices: u32,
    num_indices: u32,
    index_type: IndexType,
    primitive_type: PrimitiveType,
    primitive_groups: Vec<PrimitiveGroup>,
    layout: VertexLayout,
}

impl Mesh {
    pub(crate) fn new(setup: &MeshSetup, vertex_buffers: Vec<NativeId>, index_buffer: Option<NativeId>) -> Self {
        Self {
            vertex_buffers,
            index_buffer,
            num_vertices: setup.num_vertices,
            num_indices: setup.num_indices,
            index_type: setup.index_type,
            primitive_type: setup.primitive_type,
            primitive_groups: setup.primitive_groups.clone(),
            layout: setup.layout.clone(),
        }
    }
}

// getters
impl Mesh {
    #[inline]
    pub fn vertex_buffers(&self) -> &[NativeId] {
        &self.vertex_buffers
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<NativeId> {
        self.index_buffer
    }

    #[inline]
    pub fn num_vertices(&self) -> u32 {
        self.num_vertices
    }

    #[inline]
    pub fn num_indices(&self) -> u32 {
        self.num_indices
    }

    #[inline]
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    #[inline]
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    #[inline]
    pub fn primitive_groups(&self) -> &[PrimitiveGroup] {
        &self.primitive_groups
    }

    #[inline]
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }
}

pub struct MeshKind;

impl ResourceKind for MeshKind {
    type Handle = MeshHandle;
    type Setup = MeshSetup;
    type Resource = Mesh;

    const TYPE: ResourceType = GfxResourceType::MESH;
    const NAME: &'static str = "Mesh";

    fn locator(setup: &MeshSetup) -> &Locator {
        &setup.locator
    }
}

impl GfxResourceKind for MeshKind {
    #[inline]
    fn pool(pools: &GfxPools) -> &ResourcePool<Self> {
        &pools.meshes
    }

    #[inline]
    fn pool_mut(pools: &mut GfxPools) -> &mut ResourcePool<Self> {
        &mut pools.meshes
    }

    fn init<B: Backend, D: NativeDevice<B>>(
        factory: &mut GfxFactory<B, D>,
        setup: &MeshSetup,
        content: Option<&[u8]>,
    ) -> Result<Mesh, InitError> {
        factory.init_mesh(setup, content)
    }

    fn native_objects(mesh: &Mesh) -> Vec<NativeId> {
        mesh.vertex_buffers.iter().copied().chain(mesh.index_buffer).collect()
    }
}

impl GfxHandle for MeshHandle {
    type Kind = MeshKind;
}

impl GfxSetup for MeshSetup {
    type Kind = MeshKind;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{VertexAttr, VertexFormat};

    fn layout() -> VertexLayout {
        VertexLayout::new()
            .add(VertexAttr::Position, VertexFormat::Float3)
            .add(VertexAttr::TexCoord0, VertexFormat::Float2)
    }

    #[test]
    fn test_from_data_offsets() {
        let setup = MeshSetup::from_data(layout(), 4, IndexType::UInt16, 6);
        assert_eq!(setup.vertex_data_size(), 4 * 20);
        assert_eq!(setup.index_data_offset, 80);
        assert_eq!(setup.index_data_size(), 12);
        assert!(setup.needs_data());
        assert!(setup.validate(Some(&[0u8; 92])).is_ok());
        assert!(matches!(setup.validate(Some(&[0u8; 91])), Err(InitError::InvalidSetup(_))));
        assert_eq!(setup.validate(None), Err(InitError::MissingContent));
    }

    #[test]
    fn test_empty_mesh_needs_no_data() {
        let setup = MeshSetup::empty(layout(), 128, Usage::Stream);
        assert!(!setup.needs_data());
        assert!(setup.validate(None).is_ok());
        assert_eq!(setup.vertex_data(None), None);
    }

    #[test]
    fn test_offset_overflow_is_rejected() {
        let mut setup = MeshSetup::from_data(layout(), 4, IndexType::UInt16, 6);
        setup.vertex_data_offset = usize::MAX;
        assert!(matches!(setup.validate(Some(&[0u8; 92])), Err(InitError::InvalidSetup(_))));
        assert_eq!(setup.vertex_data(Some(&[0u8; 92])), None);

        let mut setup = MeshSetup::from_data(layout(), 4, IndexType::UInt16, 6);
        setup.index_data_offset = usize::MAX - 4;
        assert!(matches!(setup.validate(Some(&[0u8; 92])), Err(InitError::InvalidSetup(_))));
        assert_eq!(setup.index_data(Some(&[0u8; 92])), None);
    }
}
