use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 从 TOML 文件加载配置
pub fn load_toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("failed to read config file: {:?}", path))?;
    let config = toml::from_str(&content).with_context(|| format!("failed to parse TOML config: {:?}", path))?;
    log::info!("config loaded: {:?}", path);
    Ok(config)
}

/// 配置文件存在时加载，否则使用默认值
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    if path.exists() {
        load_toml(path)
    } else {
        log::warn!("config file {:?} not found, using defaults", path);
        Ok(T::default())
    }
}

/// 保存配置到 TOML 文件
pub fn save_toml<T: Serialize>(config: &T, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create config directory: {:?}", parent))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write config file: {:?}", path))?;
    Ok(())
}
