/// 资源状态机
///
/// 状态流转:
/// ```text
/// Initial -> Setup -> Valid
///                  \-> Failed
/// Initial -> Pending -> Valid      (异步创建)
///                    \-> Failed
/// Valid -> Pending                 (向已有资源流式加载新内容)
/// 任意非 Initial 状态 -> Initial    (释放)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ResourceState {
    /// 槽位空闲
    #[default]
    Initial,
    /// 已分配槽位并保存了 Setup，等待工厂创建
    Setup,
    /// 异步加载中，等待完成回调
    Pending,
    /// 后端对象已就绪，可以使用
    Valid,
    /// 创建失败，释放之前一直可查询
    Failed,
}

impl ResourceState {
    pub const COUNT: usize = 5;

    pub const ALL: [ResourceState; 5] = [
        ResourceState::Initial,
        ResourceState::Setup,
        ResourceState::Pending,
        ResourceState::Valid,
        ResourceState::Failed,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn can_transition_to(self, next: ResourceState) -> bool {
        use ResourceState::*;
        match (self, next) {
            (Initial, Setup) | (Initial, Pending) => true,
            (Setup, Valid) | (Setup, Failed) => true,
            (Pending, Valid) | (Pending, Failed) => true,
            (Valid, Pending) => true,
            (from, Initial) => from != Initial,
            _ => false,
        }
    }

    /// Handle 在该状态下是否仍被视为有效
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, ResourceState::Valid | ResourceState::Pending)
    }
}
