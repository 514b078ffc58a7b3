//! Catalog Mock CLI

use anyhow::Context;
use cascade_shared::config::AppConfig;
use catalog_mock::cli::{Cli, CommandRunner, Commands, ServeOptions};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 优先使用环境变量 RUST_LOG，否则使用命令行参数指定的级别
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .init();

    let config = AppConfig::load("catalog-mock").context("加载配置失败")?;
    let runner = CommandRunner::new(config);

    match cli.command {
        Commands::Serve {
            port,
            populate,
            schools,
            seed,
            data,
            faults,
        } => {
            runner
                .run_serve(ServeOptions {
                    port,
                    populate,
                    schools,
                    seed,
                    data,
                    faults,
                })
                .await?;
        }
        Commands::Populate {
            schools,
            seed,
            output,
        } => {
            runner.run_populate(schools, seed, output.as_deref())?;
        }
    }

    Ok(())
}
