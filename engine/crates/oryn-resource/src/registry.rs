use indexmap::{Equivalent, IndexMap};

use crate::handle::{ResourceId, ResourceType};
use crate::label::ResourceLabel;
use crate::locator::Locator;

struct RegistryEntry {
    id: ResourceId,
    label: ResourceLabel,
}

/// 查找时借用的键，哈希与 `(ResourceType, String)` 一致
#[derive(Hash)]
struct NameKey<'a> {
    resource_type: ResourceType,
    name: &'a str,
}

impl Equivalent<(ResourceType, String)> for NameKey<'_> {
    fn equivalent(&self, key: &(ResourceType, String)) -> bool {
        self.resource_type == key.0 && self.name == key.1
    }
}

/// 共享资源登记表
///
/// 以 (资源类型, Locator 名字) 为键，记录共享资源对应的 `ResourceId`。
/// 只登记共享 Locator；非共享 Locator 调用 `add` 会被忽略。
/// 资源销毁时由持有者负责调用 `remove`，登记表本身不持有引用。
pub struct ResourceRegistry {
    entries: IndexMap<(ResourceType, String), RegistryEntry>,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

// new & init
impl ResourceRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }
}

// tools
impl ResourceRegistry {
    /// 登记共享资源，返回是否真的登记了
    pub fn add(&mut self, locator: &Locator, id: ResourceId, label: ResourceLabel) -> bool {
        if !locator.is_shared() {
            return false;
        }
        let key = NameKey {
            resource_type: id.resource_type(),
            name: locator.name(),
        };
        if let Some(existing) = self.entries.get(&key) {
            log::warn!("locator {:?} already registered as {:?}", locator, existing.id);
            return false;
        }
        self.entries
            .insert((id.resource_type(), locator.name().to_string()), RegistryEntry { id, label });
        true
    }

    /// 查找共享资源
    pub fn lookup(&self, locator: &Locator, resource_type: ResourceType) -> Option<ResourceId> {
        if !locator.is_shared() {
            return None;
        }
        let key = NameKey {
            resource_type,
            name: locator.name(),
        };
        self.entries.get(&key).map(|e| e.id)
    }

    /// 按 ID 移除，返回是否存在
    pub fn remove(&mut self, id: ResourceId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.id != id);
        before != self.entries.len()
    }

    /// 移除匹配标签的所有条目，返回被移除的 ID
    pub fn remove_label(&mut self, label: ResourceLabel) -> Vec<ResourceId> {
        let mut removed = Vec::new();
        self.entries.retain(|_, entry| {
            if label.matches(entry.label) {
                removed.push(entry.id);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.values().any(|entry| entry.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
