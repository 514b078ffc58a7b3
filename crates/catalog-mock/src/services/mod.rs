//! Mock 服务模块

pub mod catalog_service;
pub mod fault;

pub use catalog_service::{CatalogServiceState, catalog_routes};
pub use fault::{Fault, FaultPlan, inject_faults};
