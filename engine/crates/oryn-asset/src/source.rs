use std::fmt;
use std::path::PathBuf;

use anyhow::Context;

/// 资源内容从哪里来
///
/// 只在 IO 线程中读取，读取结果以字节数组交回持有者线程。
#[derive(Clone)]
pub enum ContentSource {
    File(PathBuf),
    Memory(Vec<u8>),
    #[cfg(feature = "http")]
    Http(String),
}

impl ContentSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ContentSource::File(path.into())
    }

    pub fn memory(bytes: impl Into<Vec<u8>>) -> Self {
        ContentSource::Memory(bytes.into())
    }

    /// 阻塞读取全部内容，在 IO 线程中调用
    pub fn fetch(self) -> anyhow::Result<Vec<u8>> {
        let _span = tracy_client::span!("ContentSource::fetch");
        match self {
            ContentSource::File(path) => std::fs::read(&path).with_context(|| format!("read file {:?}", path)),
            ContentSource::Memory(bytes) => Ok(bytes),
            #[cfg(feature = "http")]
            ContentSource::Http(url) => fetch_http(&url),
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::File(path) => write!(f, "File({:?})", path),
            ContentSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            #[cfg(feature = "http")]
            ContentSource::Http(url) => write!(f, "Http({})", url),
        }
    }
}

#[cfg(feature = "http")]
fn fetch_http(url: &str) -> anyhow::Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("http get {}", url))?
        .error_for_status()
        .with_context(|| format!("http status for {}", url))?;
    let bytes = response.bytes().with_context(|| format!("http body of {}", url))?;
    Ok(bytes.to_vec())
}
