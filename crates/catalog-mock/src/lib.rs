//! Catalog Mock
//!
//! 学校/年级/班级/器材目录的模拟服务，用于开发和集成测试。
//!
//! # 主要模块
//!
//! - `models`: 目录记录与接口响应结构
//! - `store`: 内存存储实现
//! - `generators`: 固定种子目录与随机目录生成器
//! - `services`: REST 接口与故障注入
//! - `server`: 路由组装与启动
//!
//! # 使用示例
//!
//! ```rust
//! use catalog_mock::generators::seed_catalog;
//! use catalog_mock::store::CatalogStore;
//!
//! let store = CatalogStore::new();
//! seed_catalog(&store);
//! assert_eq!(store.schools().len(), 2);
//! ```

pub mod cli;
pub mod generators;
pub mod models;
pub mod server;
pub mod services;
pub mod store;
