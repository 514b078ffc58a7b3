//! 目录数据模型

pub mod catalog;

pub use catalog::{CatalogItem, ClassRoom, Equipment, Grade, School};
