//! 阶段选择存储
//!
//! 保存每个阶段当前选中的项。任何时刻只要第 k 级有值，0..k-1 级必然都有值；
//! 设置某一级会在同一次调用内清空所有更深的阶段，外部观察不到中间状态。

use crate::model::SelectItem;

/// 一次选择操作的结果，也是通知控制器的变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// 从该阶段起的选择发生了变化
    Changed { stage: usize },
    /// 与当前状态相同，无需任何级联动作
    Unchanged,
    /// 越界或上级为空，未做任何修改
    Rejected,
}

/// 各阶段当前选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    slots: Vec<Option<SelectItem>>,
}

impl SelectionStore {
    pub fn new(stage_count: usize) -> Self {
        Self {
            slots: vec![None; stage_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, stage: usize) -> Option<&SelectItem> {
        self.slots.get(stage).and_then(Option::as_ref)
    }

    /// 设置第 `stage` 级的选择并清空所有更深的阶段
    ///
    /// 重复选择同一 id 视为无变化，下级数据保持不动。
    pub fn set_selection(&mut self, stage: usize, item: SelectItem) -> SelectionChange {
        if stage >= self.slots.len() {
            return SelectionChange::Rejected;
        }
        if stage > 0 && self.slots[stage - 1].is_none() {
            return SelectionChange::Rejected;
        }
        if self.slots[stage]
            .as_ref()
            .is_some_and(|current| current.same_as(&item))
        {
            return SelectionChange::Unchanged;
        }

        self.slots[stage] = Some(item);
        self.slots[stage + 1..].fill(None);
        SelectionChange::Changed { stage }
    }

    /// 清空第 `stage` 级及所有更深的阶段
    pub fn clear_from(&mut self, stage: usize) -> SelectionChange {
        if stage >= self.slots.len() || self.slots[stage..].iter().all(Option::is_none) {
            return SelectionChange::Unchanged;
        }
        self.slots[stage..].fill(None);
        SelectionChange::Changed { stage }
    }

    /// 连续已选择的阶段数（从第 0 级起）
    pub fn depth(&self) -> usize {
        self.slots.iter().take_while(|s| s.is_some()).count()
    }

    /// 第 0..count 级的选择，任一缺失时返回 None
    pub fn ancestors(&self, count: usize) -> Option<Vec<SelectItem>> {
        if count > self.slots.len() {
            return None;
        }
        self.slots[..count].iter().cloned().collect()
    }

    /// 检查是否不存在孤立的下级选择
    pub fn is_consistent(&self) -> bool {
        self.slots.iter().skip(self.depth()).all(Option::is_none)
    }
}
