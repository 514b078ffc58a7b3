//! 级联选择管道核心库
//!
//! 学校 → 年级 → 班级 三级有序选择，末端汇总获取器材清单。
//! 每一级的候选项依赖所有上级的选择，上级变化时同步清空下级状态，
//! 并通过代际计数丢弃过期响应。
//!
//! # 主要模块
//!
//! - `selection`: 各阶段当前选择，保证不存在"孤立"的下级选择
//! - `resolver`: 由祖先选择构造请求描述（累积查询参数）
//! - `fetch`: 执行请求、维护加载状态、收敛错误
//! - `state`: 纯同步的级联状态机
//! - `controller`: 驱动状态机的异步 actor 与对外句柄
//! - `view`: 渲染层读取的只读快照

pub mod cli;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod model;
pub mod resolver;
pub mod selection;
pub mod state;
pub mod transport;
pub mod view;

pub use controller::{CascadeController, CascadeHandle};
pub use error::{CascadeError, FetchFailed, Result};
pub use fetch::{FetchOrchestrator, FetchStatus};
pub use model::{EquipmentItem, ItemId, SelectItem};
pub use resolver::{FetchTarget, RequestDescriptor, StageChain, StageResolver};
pub use selection::{SelectionChange, SelectionStore};
pub use state::{CascadeState, StagePhase};
pub use transport::{HttpTransport, JsonTransport};
pub use view::{PipelineView, StageView};
