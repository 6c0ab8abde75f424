use crate::handle::ResourceType;
use crate::locator::Locator;

/// 一种资源的类型描述
///
/// 资源池、工厂都以它为泛型参数：
/// - `Handle`: 对外的轻量句柄
/// - `Setup`: 创建参数，创建后不可变，保存在槽位中
/// - `Resource`: 后端创建出的真正对象
pub trait ResourceKind: 'static {
    type Handle: slotmap::Key;
    type Setup: std::fmt::Debug;
    type Resource;

    const TYPE: ResourceType;
    /// 用于日志
    const NAME: &'static str;

    /// Setup 中携带的 Locator，用于共享资源去重
    fn locator(setup: &Self::Setup) -> &Locator;
}
