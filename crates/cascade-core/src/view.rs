//! 渲染快照
//!
//! 渲染层只读取这里的数据：是否禁用、是否加载中、占位提示全部由状态机推导，
//! 渲染层自身不做任何判断。

use serde::Serialize;

use crate::model::SelectItem;
use crate::resolver::StageDef;
use crate::state::StagePhase;

/// 单个阶段的渲染数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub key: String,
    pub name: String,
    pub items: Vec<SelectItem>,
    pub selected: Option<SelectItem>,
    pub phase: StagePhase,
    pub disabled: bool,
    pub loading: bool,
    pub placeholder: String,
    pub error: Option<String>,
    /// 失败可重试时为 true，渲染层据此决定是否展示重试入口
    pub retryable: bool,
}

/// 整条管道的渲染数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineView<R> {
    pub stages: Vec<StageView>,
    /// 任一请求在途即为 true
    pub loading: bool,
    /// None 表示尚未获取
    pub resource: Option<R>,
    pub resource_phase: StagePhase,
    pub resource_error: Option<String>,
    pub resource_retryable: bool,
}

impl<R> PipelineView<R> {
    pub fn stage(&self, index: usize) -> Option<&StageView> {
        self.stages.get(index)
    }

    /// 当前选择链上的 id，遇到第一个空阶段为止
    pub fn selected_ids(&self) -> Vec<String> {
        self.stages
            .iter()
            .map_while(|s| s.selected.as_ref().map(|item| item.id.to_string()))
            .collect()
    }
}

/// 占位提示
pub(crate) fn placeholder(
    stage: &StageDef,
    parent: Option<&StageDef>,
    phase: StagePhase,
    has_items: bool,
) -> String {
    match phase {
        StagePhase::Disabled => match parent {
            Some(parent) => format!("请先选择{}", parent.display_name),
            None => format!("请选择{}", stage.display_name),
        },
        StagePhase::Loading => format!("正在加载{}…", stage.display_name),
        StagePhase::Failed => format!("{}加载失败", stage.display_name),
        StagePhase::Ready if !has_items => format!("暂无可选{}", stage.display_name),
        StagePhase::Ready => format!("请选择{}", stage.display_name),
    }
}
