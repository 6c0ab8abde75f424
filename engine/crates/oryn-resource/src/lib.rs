//! Oryn 资源池
//!
//! 以 Handle 间接引用 GPU 资源的通用资源管理层。
//!
//! # 核心概念
//! - `ResourceKind`: 描述一种资源（Setup 描述符、后端资源对象、Handle 类型）
//! - `ResourcePool`: 存放某一种资源的所有槽位，负责引用计数与状态机
//! - `Factory`: 后端工厂，把 Setup 变成真正的后端对象，以及销毁它
//! - `ResourceLabel`: 批量释放用的标签
//! - `ResourceRegistry`: 共享 Locator 到资源的映射，用于去重
//!
//! 所有修改操作都在持有者线程上进行；异步加载只在工作线程里准备数据，
//! 完成结果回到持有者线程后通过 `ResourcePool::complete_async` 应用。

pub mod error;
pub mod factory;
pub mod handle;
pub mod info;
pub mod kind;
pub mod label;
pub mod locator;
pub mod pool;
pub mod registry;
pub mod slot;
pub mod state;

pub use error::{InitError, ResourceError};
pub use factory::Factory;
pub use handle::{HandleExt, ResourceId, ResourceType};
pub use info::{PoolInfo, ResourceInfo};
pub use kind::ResourceKind;
pub use label::{LabelStack, ResourceLabel};
pub use locator::Locator;
pub use pool::{Completion, MAX_POOL_CAPACITY, PoolConfig, Release, ResourcePool};
pub use registry::ResourceRegistry;
pub use state::ResourceState;

#[cfg(test)]
pub(crate) mod test_kind;
