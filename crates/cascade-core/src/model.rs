//! 数据模型
//!
//! 后端返回的可选项与器材条目。可选项一经获取即不可变，选择匹配只比较 id。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 可选项标识
///
/// 后端既可能返回数字也可能返回字符串 id，统一保存为原样的文本形式，
/// 构造查询参数时直接使用。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct ItemId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for ItemId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// 可选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    pub id: ItemId,
    #[serde(alias = "name")]
    pub label: String,
}

impl SelectItem {
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// 是否与另一项指向同一实体
    pub fn same_as(&self, other: &SelectItem) -> bool {
        self.id == other.id
    }
}

/// 器材条目（末端资源示例载荷）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id_from_number_and_string() {
        let numeric: SelectItem = serde_json::from_value(json!({"id": 1, "label": "Lincoln HS"}))
            .expect("数字 id 应可解析");
        assert_eq!(numeric.id.as_str(), "1");

        let text: SelectItem = serde_json::from_value(json!({"id": "A", "label": "9-A"}))
            .expect("字符串 id 应可解析");
        assert_eq!(text.id, ItemId::from("A"));
    }

    #[test]
    fn test_label_alias_name() {
        let item: SelectItem = serde_json::from_value(json!({"id": 9, "name": "Grade 9"}))
            .expect("name 字段应作为 label 的别名");
        assert_eq!(item.label, "Grade 9");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let item: SelectItem =
            serde_json::from_value(json!({"id": 2, "label": "Roosevelt MS", "city": "Springfield"}))
                .expect("多余字段应被忽略");
        assert_eq!(item, SelectItem::new(2, "Roosevelt MS"));
    }

    #[test]
    fn test_item_id_serializes_as_string() {
        let value = serde_json::to_value(SelectItem::new(7, "Grade 7")).unwrap();
        assert_eq!(value, json!({"id": "7", "label": "Grade 7"}));
    }

    #[test]
    fn test_same_as_compares_id_only() {
        let a = SelectItem::new(1, "Lincoln HS");
        let renamed = SelectItem::new(1, "Lincoln High School");
        assert!(a.same_as(&renamed));
        assert!(!a.same_as(&SelectItem::new(2, "Lincoln HS")));
    }

    #[test]
    fn test_equipment_parse() {
        let items: Vec<EquipmentItem> =
            serde_json::from_value(json!([{"name": "Calculator", "quantity": 30}])).unwrap();
        assert_eq!(items[0].quantity, 30);
    }
}
