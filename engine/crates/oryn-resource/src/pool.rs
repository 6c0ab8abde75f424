use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::ResourceError;
use crate::factory::Factory;
use crate::handle::ResourceId;
use crate::info::{PoolInfo, ResourceInfo};
use crate::kind::ResourceKind;
use crate::label::ResourceLabel;
use crate::slot::Slot;
use crate::state::ResourceState;

/// 单个资源池最多的槽位数
pub const MAX_POOL_CAPACITY: usize = 1 << 16;

/// 资源池容量策略
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PoolConfig {
    /// 固定容量的池最多容纳这么多资源；可增长的池以此为初始预留
    pub capacity: usize,
    /// 为 true 时可以增长到 `MAX_POOL_CAPACITY`
    #[serde(default)]
    pub growable: bool,
}

impl PoolConfig {
    pub const fn fixed(capacity: usize) -> Self {
        Self {
            capacity,
            growable: false,
        }
    }

    pub const fn growable(initial: usize) -> Self {
        Self {
            capacity: initial,
            growable: true,
        }
    }

    /// 实际允许的最大槽位数
    #[inline]
    pub fn max_slots(&self) -> usize {
        if self.growable { MAX_POOL_CAPACITY } else { self.capacity.min(MAX_POOL_CAPACITY) }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::fixed(128)
    }
}

/// `ResourcePool::release` 的结果
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Release {
    /// Handle 已失效，什么都没做
    Stale,
    /// 引用计数减一后仍大于 0
    Retained(u32),
    /// 引用计数归零，后端对象已销毁、槽位已回收
    Destroyed,
}

/// 异步完成的结果
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Completion {
    /// 已应用到槽位，附带新的状态
    Applied(ResourceState),
    /// 槽位已被回收或不再等待完成，结果被丢弃
    Discarded,
}

/// 某一种资源的资源池
///
/// - 使用 SlotMap 存储槽位，对外提供轻量级的 Handle
/// - 槽位回收时 SlotMap 递增代数，旧 Handle 随之失效
/// - 所有修改都需要 `&mut self`，即只在持有者线程上进行
/// - 工厂在每次调用时传入，池本身不持有工厂
pub struct ResourcePool<K: ResourceKind> {
    slots: SlotMap<K::Handle, Slot<K>>,
    /// 等待异步完成的槽位，保持提交顺序
    pending: IndexSet<K::Handle>,
    config: PoolConfig,
    frame_index: u64,

    destroyed: bool,
}
// new & init
impl<K: ResourceKind> ResourcePool<K> {
    pub fn new(config: PoolConfig) -> Self {
        let reserve = config.capacity.min(MAX_POOL_CAPACITY);
        Self {
            slots: SlotMap::with_capacity_and_key(reserve),
            pending: IndexSet::new(),
            config,
            frame_index: 0,
            destroyed: false,
        }
    }
}
// destroy
impl<K: ResourceKind> ResourcePool<K> {
    /// 销毁池中所有仍然存活的资源（不论引用计数）
    pub fn discard(&mut self, factory: &mut impl Factory<K>) {
        let _span = tracy_client::span!("ResourcePool::discard");
        if !self.slots.is_empty() {
            log::info!("{} pool discarding {} live resources", K::NAME, self.slots.len());
        }
        for (_, mut slot) in self.slots.drain() {
            if let Some(resource) = slot.take_resource() {
                factory.destroy(resource);
            }
        }
        self.pending.clear();
        self.destroyed = true;
    }
}
impl<K: ResourceKind> Drop for ResourcePool<K> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            if !std::thread::panicking() {
                assert!(
                    self.destroyed || self.slots.is_empty(),
                    "{} pool dropped with {} live resources",
                    K::NAME,
                    self.slots.len()
                );
            }
        }
    }
}
// create
impl<K: ResourceKind> ResourcePool<K> {
    /// 同步创建
    ///
    /// 分配槽位并保存 Setup，然后调用工厂。工厂成功则为 `Valid`，否则为 `Failed`。
    /// 两种情况都返回 Handle，引用计数为 1。
    /// 只有池满时返回 `CapacityExceeded`，此时不会发出 Handle。
    pub fn create(
        &mut self,
        setup: K::Setup,
        content: Option<&[u8]>,
        label: ResourceLabel,
        factory: &mut impl Factory<K>,
    ) -> Result<K::Handle, ResourceError> {
        let handle = self.alloc(setup, label)?;
        let frame = self.frame_index;
        let slot = &mut self.slots[handle];
        slot.set_state(ResourceState::Setup, frame);

        match factory.init(slot.setup(), content) {
            Ok(resource) => {
                slot.set_resource(resource);
                slot.set_state(ResourceState::Valid, frame);
                log::debug!("{} created: {:?}", K::NAME, handle);
            }
            Err(e) => {
                slot.set_state(ResourceState::Failed, frame);
                log::error!("{} init failed for {:?}: {}", K::NAME, slot.setup(), e);
            }
        }
        Ok(handle)
    }

    /// 异步创建
    ///
    /// 分配槽位并保存 Setup，状态为 `Pending`，立即返回。
    /// 之后由加载方通过 `complete_async`/`fail_async` 完成。
    pub fn create_async(&mut self, setup: K::Setup, label: ResourceLabel) -> Result<K::Handle, ResourceError> {
        let handle = self.alloc(setup, label)?;
        let frame = self.frame_index;
        self.slots[handle].set_state(ResourceState::Pending, frame);
        self.pending.insert(handle);
        log::debug!("{} pending: {:?}", K::NAME, handle);
        Ok(handle)
    }

    fn alloc(&mut self, setup: K::Setup, label: ResourceLabel) -> Result<K::Handle, ResourceError> {
        let max_slots = self.config.max_slots();
        if self.slots.len() >= max_slots {
            log::error!("{} pool exhausted: {} of {} slots in use", K::NAME, self.slots.len(), max_slots);
            return Err(ResourceError::CapacityExceeded {
                kind: K::NAME,
                resource_type: K::TYPE,
                capacity: max_slots,
            });
        }
        Ok(self.slots.insert(Slot::new(setup, label, self.frame_index)))
    }
}
// async completion
impl<K: ResourceKind> ResourcePool<K> {
    /// 应用异步加载的结果
    ///
    /// 先校验代数：槽位已被回收（加载期间资源被释放）时丢弃结果。
    /// 流式更新时先销毁旧对象，再用新内容创建。
    pub fn complete_async(
        &mut self,
        handle: K::Handle,
        content: Option<&[u8]>,
        factory: &mut impl Factory<K>,
    ) -> Completion {
        self.complete(handle, None, content, factory)
    }

    /// 同 `complete_async`，但先用加载得到的新 Setup 替换槽位中的 Setup
    ///
    /// 用于创建时还不知道尺寸、格式的资源（例如从文件加载的纹理）。
    pub fn complete_async_with(
        &mut self,
        handle: K::Handle,
        setup: K::Setup,
        content: Option<&[u8]>,
        factory: &mut impl Factory<K>,
    ) -> Completion {
        self.complete(handle, Some(setup), content, factory)
    }

    fn complete(
        &mut self,
        handle: K::Handle,
        setup: Option<K::Setup>,
        content: Option<&[u8]>,
        factory: &mut impl Factory<K>,
    ) -> Completion {
        let frame = self.frame_index;
        let Some(slot) = self.slots.get_mut(handle) else {
            log::debug!("{} completion for recycled slot {:?} discarded", K::NAME, handle);
            return Completion::Discarded;
        };
        if slot.state() != ResourceState::Pending {
            log::warn!("{} completion for {:?} in state {:?} discarded", K::NAME, handle, slot.state());
            return Completion::Discarded;
        }
        self.pending.shift_remove(&handle);

        if let Some(setup) = setup {
            slot.replace_setup(setup);
        }
        if let Some(previous) = slot.take_resource() {
            factory.destroy(previous);
        }
        match factory.init(slot.setup(), content) {
            Ok(resource) => {
                slot.set_resource(resource);
                slot.set_state(ResourceState::Valid, frame);
                log::debug!("{} async load finished: {:?}", K::NAME, handle);
            }
            Err(e) => {
                slot.set_state(ResourceState::Failed, frame);
                log::error!("{} async init failed for {:?}: {}", K::NAME, handle, e);
            }
        }
        Completion::Applied(slot.state())
    }

    /// 异步加载失败（例如 IO 错误）
    ///
    /// 流式更新中的旧对象随之销毁，`Failed` 槽位不持有后端对象。
    pub fn fail_async(&mut self, handle: K::Handle, factory: &mut impl Factory<K>) -> Completion {
        let frame = self.frame_index;
        let Some(slot) = self.slots.get_mut(handle) else {
            log::debug!("{} failure for recycled slot {:?} discarded", K::NAME, handle);
            return Completion::Discarded;
        };
        if slot.state() != ResourceState::Pending {
            return Completion::Discarded;
        }
        self.pending.shift_remove(&handle);
        if let Some(previous) = slot.take_resource() {
            factory.destroy(previous);
        }
        slot.set_state(ResourceState::Failed, frame);
        Completion::Applied(ResourceState::Failed)
    }

    /// 向已就绪的资源流式加载新内容：`Valid -> Pending`
    ///
    /// 旧对象保留到新内容完成时才销毁。
    pub fn begin_streaming(&mut self, handle: K::Handle) -> Result<(), ResourceError> {
        let frame = self.frame_index;
        let slot = self
            .slots
            .get_mut(handle)
            .ok_or_else(|| ResourceError::StaleHandle(ResourceId::new::<K>(handle)))?;
        if slot.state() != ResourceState::Valid {
            return Err(ResourceError::InvalidTransition {
                from: slot.state(),
                to: ResourceState::Pending,
            });
        }
        slot.set_state(ResourceState::Pending, frame);
        self.pending.insert(handle);
        Ok(())
    }
}
// ref count & release
impl<K: ResourceKind> ResourcePool<K> {
    /// 增加引用计数，Handle 失效时返回 false
    pub fn add_ref(&mut self, handle: K::Handle) -> bool {
        match self.slots.get_mut(handle) {
            Some(slot) => {
                slot.add_ref();
                true
            }
            None => false,
        }
    }

    /// 减少引用计数，归零时销毁后端对象并回收槽位
    pub fn release(&mut self, handle: K::Handle, factory: &mut impl Factory<K>) -> Release {
        let Some(slot) = self.slots.get_mut(handle) else {
            log::warn!("{} release of stale handle {:?}", K::NAME, handle);
            return Release::Stale;
        };
        let remaining = slot.dec_ref();
        if remaining > 0 {
            return Release::Retained(remaining);
        }
        self.destroy_slot(handle, factory);
        Release::Destroyed
    }

    /// 销毁所有匹配标签的资源，不论剩余引用计数
    ///
    /// 返回被销毁的 Handle（它们此后全部失效）。
    pub fn release_by_label(&mut self, label: ResourceLabel, factory: &mut impl Factory<K>) -> Vec<K::Handle> {
        let _span = tracy_client::span!("ResourcePool::release_by_label");
        let handles: Vec<K::Handle> = self
            .slots
            .iter()
            .filter(|(_, slot)| label.matches(slot.label()))
            .map(|(handle, _)| handle)
            .collect();

        for &handle in &handles {
            if let Some(slot) = self.slots.get(handle)
                && slot.ref_count() > 1
            {
                log::debug!(
                    "{} {:?} destroyed by label with {} outstanding references",
                    K::NAME,
                    handle,
                    slot.ref_count()
                );
            }
            self.destroy_slot(handle, factory);
        }
        handles
    }

    fn destroy_slot(&mut self, handle: K::Handle, factory: &mut impl Factory<K>) {
        let Some(mut slot) = self.slots.remove(handle) else {
            return;
        };
        self.pending.shift_remove(&handle);
        if let Some(resource) = slot.take_resource() {
            factory.destroy(resource);
        }
        log::debug!("{} destroyed: {:?}", K::NAME, handle);
    }
}
// frame
impl<K: ResourceKind> ResourcePool<K> {
    /// 每帧调用一次，推进池内的帧计数（用于状态时长统计）
    pub fn update(&mut self) {
        self.frame_index += 1;
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
// getters
impl<K: ResourceKind> ResourcePool<K> {
    /// 仅在代数匹配且状态为 `Valid` 时返回后端对象
    pub fn lookup(&self, handle: K::Handle) -> Option<&K::Resource> {
        self.slots
            .get(handle)
            .filter(|slot| slot.state() == ResourceState::Valid)
            .and_then(|slot| slot.resource())
    }

    pub fn lookup_mut(&mut self, handle: K::Handle) -> Option<&mut K::Resource> {
        self.slots
            .get_mut(handle)
            .filter(|slot| slot.state() == ResourceState::Valid)
            .and_then(|slot| slot.resource_mut())
    }

    /// 代数匹配且状态为 `Valid` 或 `Pending`
    pub fn is_valid(&self, handle: K::Handle) -> bool {
        self.slots.get(handle).is_some_and(|slot| slot.state().is_alive())
    }

    /// 代数匹配（任意状态，包括 `Failed`）
    #[inline]
    pub fn contains(&self, handle: K::Handle) -> bool {
        self.slots.contains_key(handle)
    }

    pub fn state(&self, handle: K::Handle) -> Option<ResourceState> {
        self.slots.get(handle).map(|slot| slot.state())
    }

    pub fn setup(&self, handle: K::Handle) -> Option<&K::Setup> {
        self.slots.get(handle).map(|slot| slot.setup())
    }

    pub fn label(&self, handle: K::Handle) -> Option<ResourceLabel> {
        self.slots.get(handle).map(|slot| slot.label())
    }

    pub fn ref_count(&self, handle: K::Handle) -> u32 {
        self.slots.get(handle).map_or(0, |slot| slot.ref_count())
    }

    pub fn resource_info(&self, handle: K::Handle) -> Option<ResourceInfo> {
        self.slots.get(handle).map(|slot| ResourceInfo {
            state: slot.state(),
            state_age: slot.state_age(self.frame_index),
            ref_count: slot.ref_count(),
            label: slot.label(),
        })
    }

    pub fn pool_info(&self) -> PoolInfo {
        let capacity = self.config.max_slots();
        let mut num_slots_by_state = [0; ResourceState::COUNT];
        for (_, slot) in &self.slots {
            num_slots_by_state[slot.state().index()] += 1;
        }
        num_slots_by_state[ResourceState::Initial.index()] = capacity - self.slots.len();
        PoolInfo {
            resource_type: K::TYPE,
            capacity,
            num_slots_by_state,
        }
    }

    /// 仍在等待异步完成的 Handle，按提交顺序
    pub fn pending_handles(&self) -> impl Iterator<Item = K::Handle> + '_ {
        self.pending.iter().copied()
    }

    #[inline]
    pub fn num_used_slots(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn num_free_slots(&self) -> usize {
        self.config.max_slots() - self.slots.len()
    }

    #[inline]
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::HandleExt;
    use crate::locator::Locator;
    use crate::test_kind::{CountingFactory, TestKind, TestSetup};

    fn pool(capacity: usize) -> ResourcePool<TestKind> {
        ResourcePool::new(PoolConfig::fixed(capacity))
    }

    #[test]
    fn test_create_then_lookup_until_release() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(8);

        let handle = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();
        assert_eq!(pool.state(handle), Some(ResourceState::Valid));
        assert_eq!(pool.lookup(handle), Some(&1));
        assert!(pool.is_valid(handle));

        assert_eq!(pool.release(handle, &mut factory), Release::Destroyed);
        assert_eq!(pool.lookup(handle), None);
        assert!(!pool.is_valid(handle));
        assert_eq!(factory.destroyed, vec![1]);
    }

    #[test]
    fn test_stale_handle_after_recycle() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(1);

        let old = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();
        pool.release(old, &mut factory);
        let new = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();

        assert_eq!(old.slot_index(), new.slot_index());
        assert_ne!(old.generation(), new.generation());
        assert_eq!(pool.lookup(old), None);
        assert_eq!(pool.lookup(new), Some(&2));
        assert!(!pool.add_ref(old));
        assert_eq!(pool.release(old, &mut factory), Release::Stale);
        assert!(pool.is_valid(new));
        pool.discard(&mut factory);
    }

    #[test]
    fn test_add_ref_needs_matching_releases() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(4);
        let handle = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();

        const N: u32 = 3;
        for _ in 0..N {
            assert!(pool.add_ref(handle));
        }
        for remaining in (1..=N).rev() {
            assert_eq!(pool.release(handle, &mut factory), Release::Retained(remaining));
            assert!(pool.lookup(handle).is_some());
        }
        assert!(factory.destroyed.is_empty());
        assert_eq!(pool.release(handle, &mut factory), Release::Destroyed);
        assert_eq!(factory.destroyed.len(), 1);
    }

    #[test]
    fn test_failed_init_keeps_handle() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(4);
        let setup = TestSetup {
            fail: true,
            ..Default::default()
        };

        let handle = pool.create(setup, None, ResourceLabel::DEFAULT, &mut factory).unwrap();
        assert_eq!(pool.state(handle), Some(ResourceState::Failed));
        assert!(pool.contains(handle));
        assert!(!pool.is_valid(handle));
        assert_eq!(pool.lookup(handle), None);

        // 失败的资源没有后端对象，释放时不调用 destroy
        assert_eq!(pool.release(handle, &mut factory), Release::Destroyed);
        assert!(factory.destroyed.is_empty());
    }

    #[test]
    fn test_release_by_label_is_selective() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(8);
        let a = ResourceLabel::next();
        let b = ResourceLabel::next();

        let a1 = pool.create(TestSetup::default(), None, a, &mut factory).unwrap();
        let b1 = pool.create(TestSetup::default(), None, b, &mut factory).unwrap();
        let a2 = pool.create(TestSetup::default(), None, a, &mut factory).unwrap();
        pool.add_ref(a2);

        let released = pool.release_by_label(a, &mut factory);
        assert_eq!(released, vec![a1, a2]);
        assert!(!pool.is_valid(a1));
        assert!(!pool.is_valid(a2));
        assert!(pool.is_valid(b1));
        assert_eq!(factory.live.len(), 1);

        pool.release(b1, &mut factory);
    }

    #[test]
    fn test_release_by_label_all() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(8);
        for _ in 0..3 {
            pool.create(TestSetup::default(), None, ResourceLabel::next(), &mut factory).unwrap();
        }
        pool.create_async(TestSetup::default(), ResourceLabel::DEFAULT).unwrap();

        let released = pool.release_by_label(ResourceLabel::ALL, &mut factory);
        assert_eq!(released.len(), 4);
        assert_eq!(pool.num_used_slots(), 0);
        assert_eq!(pool.num_pending(), 0);
        assert!(factory.live.is_empty());
    }

    #[test]
    fn test_async_completion() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(4);
        let setup = TestSetup {
            needs_content: true,
            ..Default::default()
        };

        let handle = pool.create_async(setup, ResourceLabel::DEFAULT).unwrap();
        assert_eq!(pool.state(handle), Some(ResourceState::Pending));
        assert!(pool.is_valid(handle));
        assert_eq!(pool.lookup(handle), None);
        assert_eq!(pool.pending_handles().collect::<Vec<_>>(), vec![handle]);

        let completion = pool.complete_async(handle, Some(&[1, 2, 3]), &mut factory);
        assert_eq!(completion, Completion::Applied(ResourceState::Valid));
        assert_eq!(pool.lookup(handle), Some(&1));
        assert_eq!(factory.contents, vec![vec![1, 2, 3]]);
        assert_eq!(pool.num_pending(), 0);

        // 重复完成被丢弃
        assert_eq!(pool.complete_async(handle, Some(&[4]), &mut factory), Completion::Discarded);
        pool.discard(&mut factory);
    }

    #[test]
    fn test_async_completion_replaces_setup() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(2);

        let handle = pool.create_async(TestSetup::default(), ResourceLabel::DEFAULT).unwrap();
        let loaded = TestSetup {
            locator: Locator::shared("decoded"),
            needs_content: true,
            ..Default::default()
        };
        assert_eq!(
            pool.complete_async_with(handle, loaded, None, &mut factory),
            Completion::Applied(ResourceState::Failed)
        );
        assert_eq!(pool.setup(handle).map(|s| s.locator.name()), Some("decoded"));
        assert!(pool.setup(handle).is_some_and(|s| s.needs_content));
        pool.release(handle, &mut factory);
    }

    #[test]
    fn test_async_completion_on_recycled_slot_is_discarded() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(1);

        let old = pool.create_async(TestSetup::default(), ResourceLabel::DEFAULT).unwrap();
        assert_eq!(pool.release(old, &mut factory), Release::Destroyed);
        let new = pool.create_async(TestSetup::default(), ResourceLabel::DEFAULT).unwrap();

        assert_eq!(pool.complete_async(old, Some(&[9]), &mut factory), Completion::Discarded);
        assert_eq!(pool.fail_async(old, &mut factory), Completion::Discarded);
        assert_eq!(pool.state(new), Some(ResourceState::Pending));
        assert!(factory.live.is_empty());

        assert_eq!(pool.fail_async(new, &mut factory), Completion::Applied(ResourceState::Failed));
        assert!(!pool.is_valid(new));
        pool.release(new, &mut factory);
    }

    #[test]
    fn test_streaming_replaces_resource() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(2);
        let handle = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();

        pool.begin_streaming(handle).unwrap();
        assert_eq!(pool.state(handle), Some(ResourceState::Pending));
        assert!(matches!(
            pool.begin_streaming(handle),
            Err(ResourceError::InvalidTransition { .. })
        ));

        assert_eq!(
            pool.complete_async(handle, Some(&[5]), &mut factory),
            Completion::Applied(ResourceState::Valid)
        );
        assert_eq!(pool.lookup(handle), Some(&2));
        assert_eq!(factory.destroyed, vec![1]);

        pool.release(handle, &mut factory);
        assert!(matches!(pool.begin_streaming(handle), Err(ResourceError::StaleHandle(_))));
    }

    #[test]
    fn test_failed_streaming_drops_previous_resource() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(2);
        let handle = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();

        pool.begin_streaming(handle).unwrap();
        assert_eq!(pool.fail_async(handle, &mut factory), Completion::Applied(ResourceState::Failed));
        assert_eq!(pool.state(handle), Some(ResourceState::Failed));
        assert_eq!(factory.destroyed, vec![1]);
        assert!(factory.live.is_empty());

        assert_eq!(pool.release(handle, &mut factory), Release::Destroyed);
        assert_eq!(factory.destroyed, vec![1]);
    }

    #[test]
    fn test_capacity_exceeded_leaves_others_intact() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(4);
        let handles: Vec<_> = (0..4)
            .map(|_| pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap())
            .collect();

        let err = pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap_err();
        assert!(matches!(err, ResourceError::CapacityExceeded { capacity: 4, .. }));
        assert!(pool.create_async(TestSetup::default(), ResourceLabel::DEFAULT).is_err());

        for handle in &handles {
            assert!(pool.lookup(*handle).is_some());
        }
        assert_eq!(pool.num_free_slots(), 0);
        pool.discard(&mut factory);
        assert!(factory.live.is_empty());
    }

    #[test]
    fn test_growable_pool_passes_initial_capacity() {
        let mut factory = CountingFactory::default();
        let mut pool = ResourcePool::<TestKind>::new(PoolConfig::growable(2));
        for _ in 0..10 {
            pool.create(TestSetup::default(), None, ResourceLabel::DEFAULT, &mut factory).unwrap();
        }
        assert_eq!(pool.num_used_slots(), 10);
        assert_eq!(pool.config().max_slots(), MAX_POOL_CAPACITY);
        pool.discard(&mut factory);
    }

    #[test]
    fn test_resource_and_pool_info() {
        let mut factory = CountingFactory::default();
        let mut pool = pool(4);
        let label = ResourceLabel::next();
        let valid = pool.create(TestSetup::default(), None, label, &mut factory).unwrap();
        pool.create_async(TestSetup::default(), label).unwrap();

        pool.update();
        pool.update();
        let info = pool.resource_info(valid).unwrap();
        assert_eq!(info.state, ResourceState::Valid);
        assert_eq!(info.state_age, 2);
        assert_eq!(info.ref_count, 1);
        assert_eq!(info.label, label);

        let pool_info = pool.pool_info();
        assert_eq!(pool_info.num_slots(ResourceState::Valid), 1);
        assert_eq!(pool_info.num_slots(ResourceState::Pending), 1);
        assert_eq!(pool_info.num_slots(ResourceState::Initial), 2);
        assert_eq!(pool_info.num_used(), 2);
        pool.release_by_label(label, &mut factory);
    }
}
