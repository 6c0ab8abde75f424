use crate::types::{VertexAttr, VertexFormat, VertexStepFunction};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VertexComponent {
    pub attr: VertexAttr,
    pub format: VertexFormat,
}

/// 顶点布局：交错排列的顶点分量
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct VertexLayout {
    components: Vec<VertexComponent>,
    pub step_function: VertexStepFunction,
    pub step_rate: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个分量，同一个 attribute 只能出现一次
    pub fn add(mut self, attr: VertexAttr, format: VertexFormat) -> Self {
        debug_assert!(!self.contains(attr), "duplicate vertex attr {:?}", attr);
        self.components.push(VertexComponent { attr, format });
        self
    }

    pub fn per_instance(mut self, step_rate: u32) -> Self {
        self.step_function = VertexStepFunction::PerInstance;
        self.step_rate = step_rate;
        self
    }

    #[inline]
    pub fn components(&self) -> &[VertexComponent] {
        &self.components
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, attr: VertexAttr) -> bool {
        self.components.iter().any(|c| c.attr == attr)
    }

    /// 单个顶点的字节数（stride）
    pub fn byte_size(&self) -> usize {
        self.components.iter().map(|c| c.format.byte_size()).sum()
    }

    /// 分量在顶点内的字节偏移
    pub fn component_byte_offset(&self, index: usize) -> usize {
        self.components[..index].iter().map(|c| c.format.byte_size()).sum()
    }
}
