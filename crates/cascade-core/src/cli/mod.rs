//! CLI 模块
//!
//! - `walk` - 连接目录服务，按给定 id 逐级选择并输出最终快照
//! - `chain` - 输出阶段链定义
//!
//! # 使用示例
//!
//! ```bash
//! # 只加载学校列表
//! cascade-select walk
//!
//! # 选到班级并输出器材清单
//! cascade-select --base-url http://localhost:8090 walk --school 1 --grade 9 --class A
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
