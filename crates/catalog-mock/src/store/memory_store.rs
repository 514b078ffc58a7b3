//! 通用内存存储
//!
//! 基于 DashMap，读写都返回克隆，不对外暴露锁。

use std::sync::Arc;

use dashmap::DashMap;

/// 以字符串为 key 的内存存储，克隆后共享同一份数据
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, T>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或覆盖
    pub fn insert(&self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.data.get(key).map(|v| v.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// 按条件筛选，结果按 `sort_key` 排序
    ///
    /// DashMap 的遍历顺序不稳定，接口响应需要确定的顺序。
    pub fn list_sorted_by<F, K, O>(&self, predicate: F, sort_key: K) -> Vec<T>
    where
        F: Fn(&T) -> bool,
        K: Fn(&T) -> O,
        O: Ord,
    {
        let mut items: Vec<T> = self
            .data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|item| sort_key(item));
        items
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&self) {
        self.data.clear();
    }
}
