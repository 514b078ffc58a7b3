//! 命令执行器

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use cascade_shared::config::AppConfig;
use tracing::info;

use super::commands::PopulateMode;
use crate::generators::{CatalogGenerator, GeneratorConfig, seed_catalog};
use crate::server;
use crate::services::CatalogServiceState;
use crate::store::{CatalogSnapshot, CatalogStore};

/// serve 命令参数
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub port: Option<u16>,
    pub populate: PopulateMode,
    pub schools: usize,
    pub seed: Option<u64>,
    pub data: Option<String>,
    pub faults: Vec<String>,
}

/// 命令执行器
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// 监听地址：命令行端口优先，其余取自 `server` 配置
    pub fn listen_addr(&self, port: Option<u16>) -> Result<SocketAddr> {
        let addr = match port {
            Some(port) => format!("{}:{}", self.config.server.host, port),
            None => self.config.server_addr(),
        };
        addr.parse()
            .with_context(|| format!("无效的监听地址: {addr}"))
    }

    /// 按参数构建服务状态，不启动服务
    pub fn build_state(&self, options: &ServeOptions) -> Result<Arc<CatalogServiceState>> {
        let store = CatalogStore::new();

        match (&options.data, options.populate) {
            (Some(path), _) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("读取目录文件失败: {path}"))?;
                let snapshot: CatalogSnapshot =
                    serde_json::from_str(&raw).context("解析目录文件失败")?;
                store.load(snapshot);
            }
            (None, PopulateMode::Seed) => seed_catalog(&store),
            (None, PopulateMode::Random) => {
                self.generator(options.schools, options.seed).populate(&store);
            }
            (None, PopulateMode::Empty) => {}
        }

        let state = Arc::new(CatalogServiceState::new(store));
        for rule in &options.faults {
            state.faults.add_rule(rule)?;
        }

        let (schools, grades, classes) = state.store.counts();
        info!(schools, grades, classes, faults = state.faults.len(), "目录数据已就绪");
        Ok(state)
    }

    /// 执行 serve 命令
    pub async fn run_serve(&self, options: ServeOptions) -> Result<()> {
        let addr = self.listen_addr(options.port)?;
        let state = self.build_state(&options)?;

        info!("可用端点:");
        info!("  GET /health - 健康检查");
        info!("  GET /ready - 就绪检查");
        info!("  GET /api/schools");
        info!("  GET /api/grades?school_id=");
        info!("  GET /api/classes?school_id=&grade_id=");
        info!("  GET /api/equipment?school_id=&grade_id=&class_id=");
        info!("按 Ctrl+C 停止服务");

        server::serve(addr, state, shutdown_signal()).await
    }

    /// 执行 populate 命令
    pub fn run_populate(&self, schools: usize, seed: Option<u64>, output: Option<&str>) -> Result<CatalogSnapshot> {
        let snapshot = self.generator(schools, seed).generate();
        info!(
            schools = snapshot.schools.len(),
            grades = snapshot.grades.len(),
            classes = snapshot.classes.len(),
            "目录数据已生成"
        );

        if let Some(path) = output {
            let json = serde_json::to_string_pretty(&snapshot).context("序列化数据失败")?;
            fs::write(path, json).context("写入文件失败")?;
            info!(path, "数据已输出到文件");
        }

        println!("\n数据生成完成:");
        println!("{}", "-".repeat(30));
        println!("学校数量: {}", snapshot.schools.len());
        println!("年级数量: {}", snapshot.grades.len());
        println!("班级数量: {}", snapshot.classes.len());
        println!("{}", "-".repeat(30));

        Ok(snapshot)
    }

    fn generator(&self, schools: usize, seed: Option<u64>) -> CatalogGenerator {
        CatalogGenerator::new(GeneratorConfig {
            schools,
            seed,
            ..GeneratorConfig::default()
        })
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "安装 CTRL+C 信号处理器失败");
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号，正在停止服务...");
}
