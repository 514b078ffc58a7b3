//! CLI 模块
//!
//! - `serve` - 启动 Mock 目录服务
//! - `populate` - 生成随机目录数据
//!
//! # 使用示例
//!
//! ```bash
//! # 以固定目录启动，并让班级接口返回 500
//! catalog-mock serve --port 8090 --fail /api/classes=500
//!
//! # 以随机目录启动
//! catalog-mock serve --populate random --schools 20 --seed 7
//!
//! # 导出随机目录
//! catalog-mock populate --schools 50 -o catalog.json
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands, PopulateMode};
pub use runner::{CommandRunner, ServeOptions};
