use crate::error::InitError;
use crate::kind::ResourceKind;

/// 后端工厂
///
/// 把 Setup（以及可选的内容数据）变成后端对象，或者销毁后端对象。
/// 资源池保证：
/// - 每个成功创建的对象恰好被 `destroy` 一次
/// - `init` 失败时不会对该槽位调用 `destroy`
///
/// 同一个工厂可以同时为多种资源实现 `Factory<K>`，调用时按需传给对应的资源池。
pub trait Factory<K: ResourceKind> {
    fn init(&mut self, setup: &K::Setup, content: Option<&[u8]>) -> Result<K::Resource, InitError>;

    fn destroy(&mut self, resource: K::Resource);
}
