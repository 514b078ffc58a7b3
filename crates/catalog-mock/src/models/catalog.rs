//! 目录记录
//!
//! 学校与年级使用数字 id，班级使用字符串 id（同一年级内唯一）。
//! 候选项接口统一返回 `{ id, label }`，器材接口返回 `{ name, quantity }`。

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub school_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRoom {
    pub id: String,
    pub school_id: i64,
    pub grade_id: i64,
    pub name: String,
}

/// 器材条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub quantity: i64,
}

/// 候选项响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Value,
    pub label: String,
}

impl From<School> for CatalogItem {
    fn from(school: School) -> Self {
        Self {
            id: Value::from(school.id),
            label: school.name,
        }
    }
}

impl From<Grade> for CatalogItem {
    fn from(grade: Grade) -> Self {
        Self {
            id: Value::from(grade.id),
            label: grade.name,
        }
    }
}

impl From<ClassRoom> for CatalogItem {
    fn from(class: ClassRoom) -> Self {
        Self {
            id: Value::from(class.id),
            label: class.name,
        }
    }
}
