//! 共享库
//!
//! 包含级联选择管道各 crate 共用的配置、错误处理、可观测性初始化与测试数据工具。

pub mod config;
pub mod error;
pub mod observability;
pub mod test_utils;
