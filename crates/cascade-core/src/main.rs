//! cascade-select
//!
//! 级联选择管道的命令行入口，配置来自 config/*.toml 与 CASCADE_ 环境变量。

use anyhow::Context;
use cascade_core::cli::{Cli, CommandRunner, Commands};
use cascade_shared::config::AppConfig;
use cascade_shared::observability;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load("cascade-select").context("加载配置失败")?;
    if let Some(level) = &cli.log_level {
        config.observability = config.observability.with_log_level(level);
    }
    if let Some(base_url) = &cli.base_url {
        config.catalog.base_url = base_url.clone();
    }

    let _guard = observability::init(&config.observability)
        .await
        .context("初始化可观测性失败")?;

    let ids = cli.command.walk_ids();
    let runner = CommandRunner::new(config);
    match cli.command {
        Commands::Walk { .. } => runner.print_walk(&ids).await?,
        Commands::Chain => runner.print_chain()?,
    }

    Ok(())
}
