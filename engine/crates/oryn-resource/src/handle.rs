//! 资源句柄
//!
//! 每种资源都有自己的 Handle 类型（通过 `slotmap::new_key_type!` 定义），
//! 内部是 `slotmap::KeyData`：低 32 位为槽位索引，高 32 位为代数（generation）。
//! 槽位被回收时 slotmap 会递增代数，因此旧 Handle 自动失效。

use std::fmt;

use slotmap::{Key, KeyData};

use crate::kind::ResourceKind;

/// 资源类型标签
///
/// 由上层（例如 gfx 层）为每种资源分配一个固定值。
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType(u8);

impl ResourceType {
    #[inline]
    pub const fn new(tag: u8) -> Self {
        Self(tag)
    }

    #[inline]
    pub const fn tag(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type#{}", self.0)
    }
}

/// 对所有 slotmap Key 开放的只读访问
pub trait HandleExt: Key {
    /// 槽位索引
    #[inline]
    fn slot_index(&self) -> u32 {
        (self.data().as_ffi() & 0xffff_ffff) as u32
    }

    /// 代数，槽位每次被回收都会变化
    #[inline]
    fn generation(&self) -> u32 {
        (self.data().as_ffi() >> 32) as u32
    }
}

impl<T: Key> HandleExt for T {}

/// 类型擦除后的资源 ID
///
/// 用于跨资源类型的容器（例如 `ResourceRegistry`）。
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId {
    ty: ResourceType,
    key: KeyData,
}

impl ResourceId {
    #[inline]
    pub fn new<K: ResourceKind>(handle: K::Handle) -> Self {
        Self {
            ty: K::TYPE,
            key: handle.data(),
        }
    }

    #[inline]
    pub fn resource_type(&self) -> ResourceType {
        self.ty
    }

    #[inline]
    pub fn slot_index(&self) -> u32 {
        (self.key.as_ffi() & 0xffff_ffff) as u32
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        (self.key.as_ffi() >> 32) as u32
    }

    /// 还原为具体类型的 Handle，类型不匹配时返回 None
    pub fn handle<K: ResourceKind>(&self) -> Option<K::Handle> {
        (self.ty == K::TYPE).then(|| K::Handle::from(self.key))
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Res({}:{}v{})", self.ty.0, self.slot_index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_kind::{TestHandle, TestKind};
    use slotmap::SlotMap;

    #[test]
    fn test_generation_changes_after_recycle() {
        let mut map: SlotMap<TestHandle, ()> = SlotMap::with_key();
        let first = map.insert(());
        map.remove(first);
        let second = map.insert(());

        assert_eq!(first.slot_index(), second.slot_index());
        assert_ne!(first.generation(), second.generation());
        assert_ne!(first, second);
    }

    #[test]
    fn test_resource_id_roundtrip_keeps_type() {
        let mut map: SlotMap<TestHandle, ()> = SlotMap::with_key();
        let handle = map.insert(());

        let id = ResourceId::new::<TestKind>(handle);
        assert_eq!(id.resource_type(), TestKind::TYPE);
        assert_eq!(id.slot_index(), handle.slot_index());
        assert_eq!(id.handle::<TestKind>(), Some(handle));
    }
}
