//! headless 资源池压力测试
//!
//! 随机地同步创建、异步加载、释放资源，并周期性地按标签整体释放，
//! 结束时检查没有泄漏的原生对象。
//!
//! 配置读取 `config/stress.toml`，不存在时使用默认值。

mod stress;

use anyhow::ensure;
use oryn_crate_tools::config::load_toml_or_default;
use oryn_crate_tools::init_log::init_log;
use oryn_crate_tools::path::OrynPath;

use crate::stress::{StressConfig, StressTest};

fn main() -> anyhow::Result<()> {
    init_log();
    tracy_client::Client::start();

    let config: StressConfig = load_toml_or_default(OrynPath::config_path("stress.toml"))?;
    log::info!("stress config: {:?}", config);

    let report = StressTest::new(&config, &OrynPath::workspace_path())?.run();
    log::info!("stress report: {:?}", report);

    ensure!(
        report.leaked_native_objects == 0,
        "{} native objects leaked",
        report.leaked_native_objects
    );
    Ok(())
}
