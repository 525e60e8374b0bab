use anyhow::{Context, Result};
use tutor_conversation_runner::utils::logging;
use tutor_conversation_runner::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env().context("加载配置失败")?;

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
