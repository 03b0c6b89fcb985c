use anyhow::Result;
use sat_genius::utils::logging;
use sat_genius::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（配置文件 + 环境变量）
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
