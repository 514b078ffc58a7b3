//! CLI 命令定义

use clap::{Parser, Subcommand, ValueEnum};

/// Mock 目录服务命令行工具
#[derive(Parser, Debug)]
#[command(name = "catalog-mock")]
#[command(version, about = "学校目录模拟服务工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// 启动时的数据来源
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateMode {
    /// 固定的小型目录
    Seed,
    /// 随机生成的目录
    Random,
    /// 空目录
    Empty,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 Mock 目录服务（HTTP REST API）
    Serve {
        /// 服务端口，未指定时使用配置中的 server.port
        #[arg(short, long)]
        port: Option<u16>,

        /// 数据来源
        #[arg(long, value_enum, default_value = "seed")]
        populate: PopulateMode,

        /// 随机目录的学校数量
        #[arg(long, default_value = "10")]
        schools: usize,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 从 JSON 文件加载目录（覆盖 --populate）
        #[arg(long)]
        data: Option<String>,

        /// 故障规则，格式 路径=状态码，可重复
        #[arg(long = "fail")]
        faults: Vec<String>,
    },

    /// 生成随机目录数据
    Populate {
        /// 学校数量
        #[arg(short, long, default_value = "10")]
        schools: usize,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 输出到文件（JSON 格式）
        #[arg(short, long)]
        output: Option<String>,
    },
}
