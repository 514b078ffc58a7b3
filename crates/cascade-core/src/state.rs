//! 级联状态机
//!
//! 纯同步的状态转换：选择变化时先同步重置所有下级（候选集、选择、末端资源），
//! 再为下一级生成新的请求。每个槽位维护代际计数，重置与重新发起都会递增，
//! 完成回调携带发起时的代际，不匹配即视为过期并丢弃。
//!
//! 状态机本身不执行任何 IO，由 [`crate::controller`] 负责驱动。

use serde::Serialize;

use crate::error::{CascadeError, FetchFailed, Result};
use crate::model::SelectItem;
use crate::resolver::{FetchTarget, RequestDescriptor, StageResolver};
use crate::selection::{SelectionChange, SelectionStore};
use crate::view::{PipelineView, StageView, placeholder};

/// 阶段状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePhase {
    /// 上级尚未选择
    Disabled,
    Loading,
    Ready,
    /// 最近一次获取失败，可手动重试
    Failed,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    data: Option<T>,
    phase: StagePhase,
    generation: u64,
    error: Option<String>,
    /// 最近一次失败是否值得重试（网络错误、5xx、429）
    retryable: bool,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            data: None,
            phase: StagePhase::Disabled,
            generation: 0,
            error: None,
            retryable: false,
        }
    }

    fn reset(&mut self) {
        self.data = None;
        self.error = None;
        self.retryable = false;
        self.phase = StagePhase::Disabled;
        self.generation += 1;
    }

    fn begin(&mut self) -> u64 {
        self.data = None;
        self.error = None;
        self.retryable = false;
        self.phase = StagePhase::Loading;
        self.generation += 1;
        self.generation
    }

    fn finish(&mut self, generation: u64, result: std::result::Result<T, FetchFailed>) -> ApplyOutcome {
        if generation != self.generation || self.phase != StagePhase::Loading {
            return ApplyOutcome::Stale;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.phase = StagePhase::Ready;
            }
            Err(failed) => {
                self.data = None;
                self.phase = StagePhase::Failed;
                self.error = Some(failed.error.to_string());
                self.retryable = failed.error.is_retryable();
            }
        }
        ApplyOutcome::Applied
    }
}

/// 待发起的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub target: FetchTarget,
    pub generation: u64,
    pub request: RequestDescriptor,
}

/// 请求完成事件
#[derive(Debug)]
pub enum Completion<R> {
    Stage {
        stage: usize,
        generation: u64,
        result: std::result::Result<Vec<SelectItem>, FetchFailed>,
    },
    Resource {
        generation: u64,
        result: std::result::Result<R, FetchFailed>,
    },
}

impl<R> Completion<R> {
    pub fn target(&self) -> FetchTarget {
        match self {
            Self::Stage { stage, .. } => FetchTarget::Stage(*stage),
            Self::Resource { .. } => FetchTarget::Resource,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            Self::Stage { generation, .. } | Self::Resource { generation, .. } => *generation,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailed> {
        match self {
            Self::Stage { result, .. } => result.as_ref().err(),
            Self::Resource { result, .. } => result.as_ref().err(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// 已被更新的请求取代，结果被丢弃
    Stale,
}

/// 级联状态
#[derive(Debug, Clone)]
pub struct CascadeState<R> {
    resolver: StageResolver,
    selection: SelectionStore,
    stages: Vec<Slot<Vec<SelectItem>>>,
    resource: Slot<R>,
}

impl<R: Clone> CascadeState<R> {
    /// 创建状态机，并返回根阶段的首个请求
    pub fn new(resolver: StageResolver) -> Result<(Self, PendingFetch)> {
        let len = resolver.chain().len();
        let mut state = Self {
            resolver,
            selection: SelectionStore::new(len),
            stages: (0..len).map(|_| Slot::new()).collect(),
            resource: Slot::new(),
        };
        let pending = state.issue(FetchTarget::Stage(0))?;
        Ok((state, pending))
    }

    /// 选择第 `stage` 级
    ///
    /// 选择发生变化时，所有下级在返回前已被重置，返回值是下一级（或末端资源）的请求。
    /// 重复选择当前项不做任何事。
    pub fn select(&mut self, stage: usize, item: SelectItem) -> Result<Option<PendingFetch>> {
        self.check_stage(stage)?;
        match self.selection.set_selection(stage, item) {
            SelectionChange::Rejected => Err(CascadeError::AncestorUnset { stage }),
            SelectionChange::Unchanged => Ok(None),
            SelectionChange::Changed { .. } => {
                self.reset_below(stage);
                let next = self.resolver.chain().next_target(stage);
                self.issue(next).map(Some)
            }
        }
    }

    /// 清空第 `stage` 级及更深的选择
    ///
    /// 该级的候选集保留（其祖先未变），更深的阶段与末端资源全部禁用。
    pub fn clear_from(&mut self, stage: usize) -> Result<bool> {
        self.check_stage(stage)?;
        match self.selection.clear_from(stage) {
            SelectionChange::Changed { .. } => {
                self.reset_below(stage);
                Ok(true)
            }
            SelectionChange::Unchanged | SelectionChange::Rejected => Ok(false),
        }
    }

    /// 手动重试失败的目标
    pub fn retry(&mut self, target: FetchTarget) -> Result<Option<PendingFetch>> {
        if let FetchTarget::Stage(stage) = target {
            self.check_stage(stage)?;
        }
        match self.phase(target) {
            StagePhase::Failed => self.issue(target).map(Some),
            StagePhase::Disabled => Err(CascadeError::MissingAncestor {
                target,
                expected: self.resolver.chain().depth_of(target),
                actual: self.selection.depth(),
            }),
            StagePhase::Loading | StagePhase::Ready => Ok(None),
        }
    }

    /// 应用请求完成事件
    pub fn apply(&mut self, completion: Completion<R>) -> ApplyOutcome {
        match completion {
            Completion::Stage {
                stage,
                generation,
                result,
            } => match self.stages.get_mut(stage) {
                Some(slot) => slot.finish(generation, result),
                None => ApplyOutcome::Stale,
            },
            Completion::Resource { generation, result } => {
                self.resource.finish(generation, result)
            }
        }
    }

    pub fn resolver(&self) -> &StageResolver {
        &self.resolver
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn phase(&self, target: FetchTarget) -> StagePhase {
        match target {
            FetchTarget::Stage(i) => self
                .stages
                .get(i)
                .map_or(StagePhase::Disabled, |slot| slot.phase),
            FetchTarget::Resource => self.resource.phase,
        }
    }

    pub fn candidates(&self, stage: usize) -> &[SelectItem] {
        self.stages
            .get(stage)
            .and_then(|slot| slot.data.as_deref())
            .unwrap_or(&[])
    }

    pub fn resource(&self) -> Option<&R> {
        self.resource.data.as_ref()
    }

    /// 构建渲染快照
    pub fn view(&self, loading: bool) -> PipelineView<R> {
        let chain = self.resolver.chain();
        let stages = chain
            .stages()
            .iter()
            .zip(&self.stages)
            .enumerate()
            .map(|(i, (def, slot))| {
                let items = slot.data.clone().unwrap_or_default();
                let parent = i.checked_sub(1).and_then(|p| chain.stage(p));
                StageView {
                    key: def.key.clone(),
                    name: def.display_name.clone(),
                    placeholder: placeholder(def, parent, slot.phase, !items.is_empty()),
                    items,
                    selected: self.selection.get(i).cloned(),
                    phase: slot.phase,
                    disabled: slot.phase == StagePhase::Disabled,
                    loading: slot.phase == StagePhase::Loading,
                    error: slot.error.clone(),
                    retryable: slot.retryable,
                }
            })
            .collect();

        PipelineView {
            stages,
            loading,
            resource: self.resource.data.clone(),
            resource_phase: self.resource.phase,
            resource_error: self.resource.error.clone(),
            resource_retryable: self.resource.retryable,
        }
    }

    fn check_stage(&self, stage: usize) -> Result<()> {
        if stage >= self.stages.len() {
            return Err(CascadeError::StageOutOfRange {
                stage,
                len: self.stages.len(),
            });
        }
        Ok(())
    }

    fn reset_below(&mut self, stage: usize) {
        for slot in self.stages.iter_mut().skip(stage + 1) {
            slot.reset();
        }
        self.resource.reset();
    }

    fn issue(&mut self, target: FetchTarget) -> Result<PendingFetch> {
        let depth = self.resolver.chain().depth_of(target);
        let ancestors =
            self.selection
                .ancestors(depth)
                .ok_or(CascadeError::MissingAncestor {
                    target,
                    expected: depth,
                    actual: self.selection.depth(),
                })?;
        let request = self.resolver.build_request(target, &ancestors)?;

        let generation = match target {
            FetchTarget::Stage(i) => self.stages[i].begin(),
            FetchTarget::Resource => self.resource.begin(),
        };

        Ok(PendingFetch {
            target,
            generation,
            request,
        })
    }
}
