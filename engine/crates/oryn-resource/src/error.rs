use thiserror::Error;

use crate::handle::{ResourceId, ResourceType};
use crate::state::ResourceState;

/// 资源池操作的错误
#[derive(Debug, Error)]
pub enum ResourceError {
    /// 资源池已满，没有发出任何 Handle，已有资源不受影响
    #[error("{kind} pool exhausted ({resource_type:?}), capacity {capacity}")]
    CapacityExceeded {
        kind: &'static str,
        resource_type: ResourceType,
        capacity: usize,
    },

    /// Handle 的代数与槽位不符，槽位已被回收
    #[error("stale handle {0:?}")]
    StaleHandle(ResourceId),

    #[error("invalid resource state transition {from:?} -> {to:?}")]
    InvalidTransition { from: ResourceState, to: ResourceState },
}

/// 工厂创建后端对象失败的原因
///
/// 创建失败不会让调用方拿不到 Handle：资源进入 `Failed` 状态，直到被释放。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("invalid setup: {0}")]
    InvalidSetup(String),

    #[error("content data required but missing")]
    MissingContent,

    /// 依赖的其他资源（例如 pipeline 引用的 shader）不可用
    #[error("dependency not valid: {0}")]
    Dependency(String),

    /// 原生图形 API 返回的错误
    #[error("native api error: {0}")]
    Native(String),
}
