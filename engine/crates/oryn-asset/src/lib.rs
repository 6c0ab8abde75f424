//! Oryn 异步资源加载
//!
//! - `ContentSource`: 内容来源（文件 / 内存 / HTTP）
//! - `IoDispatcher`: 后台 dispatch 线程 + rayon 线程池，负责读取与解码
//! - `AssetHub`: 创建 `Pending` 资源、发出 IO 请求，并在持有者线程上应用加载结果

pub mod asset_hub;
pub mod decode;
pub mod io_dispatcher;
pub mod request;
pub mod source;

pub use asset_hub::{AssetHub, LoadStats, LoaderConfig};
pub use io_dispatcher::IoDispatcher;
pub use source::ContentSource;
