use crate::kind::ResourceKind;
use crate::label::ResourceLabel;
use crate::state::ResourceState;

/// 资源池中的一个槽位
///
/// 只存在于 `ResourcePool` 内部的 SlotMap 中；代数由 SlotMap 的 Key 负责。
/// 不变式：
/// - `Valid` 时恰好持有一个后端对象
/// - `Setup`/`Failed` 时不持有后端对象
/// - `Pending` 时不持有（异步创建）或持有旧对象（流式更新）
pub struct Slot<K: ResourceKind> {
    state: ResourceState,
    ref_count: u32,
    label: ResourceLabel,
    setup: K::Setup,
    resource: Option<K::Resource>,
    /// 进入当前状态时的帧号
    state_start_frame: u64,
}

// new & init
impl<K: ResourceKind> Slot<K> {
    pub(crate) fn new(setup: K::Setup, label: ResourceLabel, frame: u64) -> Self {
        Self {
            state: ResourceState::Initial,
            ref_count: 1,
            label,
            setup,
            resource: None,
            state_start_frame: frame,
        }
    }
}

// state
impl<K: ResourceKind> Slot<K> {
    pub(crate) fn set_state(&mut self, next: ResourceState, frame: u64) {
        debug_assert!(
            self.state.can_transition_to(next),
            "{} slot: invalid transition {:?} -> {:?}",
            K::NAME,
            self.state,
            next
        );
        self.state = next;
        self.state_start_frame = frame;
    }

    pub(crate) fn set_resource(&mut self, resource: K::Resource) {
        debug_assert!(self.resource.is_none());
        self.resource = Some(resource);
    }

    pub(crate) fn take_resource(&mut self) -> Option<K::Resource> {
        self.resource.take()
    }

    pub(crate) fn replace_setup(&mut self, setup: K::Setup) {
        self.setup = setup;
    }

    pub(crate) fn add_ref(&mut self) -> u32 {
        self.ref_count += 1;
        self.ref_count
    }

    pub(crate) fn dec_ref(&mut self) -> u32 {
        debug_assert!(self.ref_count > 0);
        self.ref_count = self.ref_count.saturating_sub(1);
        self.ref_count
    }
}

// getters
impl<K: ResourceKind> Slot<K> {
    #[inline]
    pub fn state(&self) -> ResourceState {
        self.state
    }

    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    #[inline]
    pub fn label(&self) -> ResourceLabel {
        self.label
    }

    #[inline]
    pub fn setup(&self) -> &K::Setup {
        &self.setup
    }

    #[inline]
    pub fn resource(&self) -> Option<&K::Resource> {
        self.resource.as_ref()
    }

    #[inline]
    pub fn resource_mut(&mut self) -> Option<&mut K::Resource> {
        self.resource.as_mut()
    }

    #[inline]
    pub fn state_age(&self, frame: u64) -> u64 {
        frame.saturating_sub(self.state_start_frame)
    }
}
