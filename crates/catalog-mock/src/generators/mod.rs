//! 目录数据生成器

pub mod catalog_generator;

pub use catalog_generator::{CatalogGenerator, GeneratorConfig, seed_catalog};
