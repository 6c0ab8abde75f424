use oryn_resource::PoolConfig;
use serde::{Deserialize, Serialize};

/// `GfxResourceContainer` 的配置，可以从 TOML 加载
///
/// ```toml
/// label_stack_capacity = 16
///
/// [texture_pool]
/// capacity = 256
/// growable = true
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GfxConfig {
    pub mesh_pool: PoolConfig,
    pub shader_pool: PoolConfig,
    pub texture_pool: PoolConfig,
    pub pipeline_pool: PoolConfig,
    pub render_pass_pool: PoolConfig,

    /// 标签栈的最大深度，超过时只告警
    pub label_stack_capacity: usize,
    /// 共享资源登记表的初始预留
    pub registry_capacity: usize,
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            mesh_pool: PoolConfig::fixed(128),
            shader_pool: PoolConfig::fixed(32),
            texture_pool: PoolConfig::fixed(128),
            pipeline_pool: PoolConfig::fixed(64),
            render_pass_pool: PoolConfig::fixed(16),
            label_stack_capacity: 16,
            registry_capacity: 256,
        }
    }
}

impl GfxConfig {
    /// 所有池使用同一个容量策略
    pub fn with_pool_config(pool: PoolConfig) -> Self {
        Self {
            mesh_pool: pool,
            shader_pool: pool,
            texture_pool: pool,
            pipeline_pool: pool,
            render_pass_pool: pool,
            ..Default::default()
        }
    }
}
