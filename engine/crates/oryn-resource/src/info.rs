use crate::handle::ResourceType;
use crate::label::ResourceLabel;
use crate::state::ResourceState;

/// 单个资源的运行时信息
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ResourceInfo {
    pub state: ResourceState,
    /// 处于当前状态已经经过的帧数
    pub state_age: u64,
    pub ref_count: u32,
    pub label: ResourceLabel,
}

/// 资源池的整体信息
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PoolInfo {
    pub resource_type: ResourceType,
    /// 最多可容纳的槽位数
    pub capacity: usize,
    /// 按状态统计的槽位数，下标为 `ResourceState::index`；Initial 即空闲槽位数
    pub num_slots_by_state: [usize; ResourceState::COUNT],
}

impl PoolInfo {
    #[inline]
    pub fn num_slots(&self, state: ResourceState) -> usize {
        self.num_slots_by_state[state.index()]
    }

    #[inline]
    pub fn num_used(&self) -> usize {
        self.capacity - self.num_slots(ResourceState::Initial)
    }
}
