//! 测试工具模块
//!
//! 提供集成测试所需的测试数据生成器和固定目录数据。
//! 数据以 JSON 形式给出，与后端接口返回的格式保持一致。

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::config::CatalogConfig;

// ==================== 测试配置辅助 ====================

/// 创建测试用目录服务配置
///
/// 优先使用环境变量，否则指向本地 mock 服务
pub fn test_catalog_config() -> CatalogConfig {
    CatalogConfig {
        base_url: std::env::var("TEST_CATALOG_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string()),
        connect_timeout_ms: 1_000,
        request_timeout_ms: 2_000,
    }
}

// ==================== 测试数据生成器 ====================

/// 测试数据生成器
pub struct TestDataGenerator;

impl TestDataGenerator {
    /// 单个可选项
    pub fn item(id: impl Into<Value>, label: &str) -> Value {
        json!({ "id": id.into(), "label": label })
    }

    /// 可选项列表
    pub fn items<I: Into<Value> + Clone>(entries: &[(I, &str)]) -> Value {
        Value::Array(
            entries
                .iter()
                .map(|(id, label)| Self::item(id.clone(), label))
                .collect(),
        )
    }

    /// 器材列表
    pub fn equipment(entries: &[(&str, i64)]) -> Value {
        Value::Array(
            entries
                .iter()
                .map(|(name, quantity)| json!({ "name": name, "quantity": quantity }))
                .collect(),
        )
    }
}

// ==================== 固定目录数据 ====================

/// 固定的小型目录
///
/// 以 "路径?查询串" 为 key 保存响应体，查询参数顺序与级联顺序一致。
/// 两所学校：Lincoln HS（id=1，年级 9/10）与 Roosevelt MS（id=2，年级 7/8）。
#[derive(Debug, Clone)]
pub struct TestCatalog {
    responses: HashMap<String, Value>,
}

impl TestCatalog {
    pub fn new() -> Self {
        let mut responses = HashMap::new();

        responses.insert(
            "/api/schools".to_string(),
            TestDataGenerator::items(&[(1, "Lincoln HS"), (2, "Roosevelt MS")]),
        );

        responses.insert(
            "/api/grades?school_id=1".to_string(),
            TestDataGenerator::items(&[(9, "Grade 9"), (10, "Grade 10")]),
        );
        responses.insert(
            "/api/grades?school_id=2".to_string(),
            TestDataGenerator::items(&[(7, "Grade 7"), (8, "Grade 8")]),
        );

        responses.insert(
            "/api/classes?school_id=1&grade_id=9".to_string(),
            TestDataGenerator::items(&[("A", "9-A"), ("B", "9-B")]),
        );
        responses.insert(
            "/api/classes?school_id=1&grade_id=10".to_string(),
            TestDataGenerator::items(&[("A", "10-A")]),
        );
        responses.insert(
            "/api/classes?school_id=2&grade_id=7".to_string(),
            TestDataGenerator::items(&[("C", "7-C")]),
        );

        responses.insert(
            "/api/equipment?school_id=1&grade_id=9&class_id=A".to_string(),
            TestDataGenerator::equipment(&[("Calculator", 30)]),
        );
        responses.insert(
            "/api/equipment?school_id=1&grade_id=9&class_id=B".to_string(),
            TestDataGenerator::equipment(&[("Microscope", 12), ("Globe", 2)]),
        );
        responses.insert(
            "/api/equipment?school_id=1&grade_id=10&class_id=A".to_string(),
            TestDataGenerator::equipment(&[("Laptop", 25)]),
        );

        Self { responses }
    }

    /// 按 "路径?查询串" 查找响应体
    pub fn response(&self, path_and_query: &str) -> Option<&Value> {
        self.responses.get(path_and_query)
    }

    /// 覆盖或新增一条响应
    pub fn with_response(mut self, path_and_query: &str, body: Value) -> Self {
        self.responses.insert(path_and_query.to_string(), body);
        self
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::new()
    }
}
