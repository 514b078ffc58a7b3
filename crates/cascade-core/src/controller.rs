//! 级联控制器
//!
//! 单个 tokio 任务独占 [`CascadeState`]，在同一任务内轮询所有在途请求。
//! 外部通过 [`CascadeHandle`] 发送命令、读取快照，无法直接修改状态。
//!
//! 每条命令在状态机完成同步重置后立即应答，应答携带重置后的快照，
//! 因此调用方拿到返回值时下级已经处于禁用或加载状态。

use cascade_shared::observability::metrics::{record_selection, record_stale_response};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{CascadeError, Result};
use crate::fetch::FetchOrchestrator;
use crate::model::{EquipmentItem, SelectItem};
use crate::resolver::{FetchTarget, StageResolver};
use crate::state::{ApplyOutcome, CascadeState, Completion, PendingFetch};
use crate::view::PipelineView;

type Ack<R> = oneshot::Sender<Result<PipelineView<R>>>;

enum Command<R> {
    Select {
        stage: usize,
        item: SelectItem,
        ack: Ack<R>,
    },
    Clear {
        stage: usize,
        ack: Ack<R>,
    },
    Retry {
        target: FetchTarget,
        ack: Ack<R>,
    },
}

/// 控制器句柄
///
/// 可以自由克隆；所有句柄释放后控制器任务自动退出。
pub struct CascadeHandle<R = Vec<EquipmentItem>> {
    commands: mpsc::UnboundedSender<Command<R>>,
    views: watch::Receiver<PipelineView<R>>,
}

impl<R> Clone for CascadeHandle<R> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            views: self.views.clone(),
        }
    }
}

impl<R: Clone> CascadeHandle<R> {
    /// 选择第 `stage` 级，返回重置后的快照
    pub async fn select(&self, stage: usize, item: SelectItem) -> Result<PipelineView<R>> {
        self.request(|ack| Command::Select { stage, item, ack }).await
    }

    /// 清空第 `stage` 级及更深的选择
    pub async fn clear_from(&self, stage: usize) -> Result<PipelineView<R>> {
        self.request(|ack| Command::Clear { stage, ack }).await
    }

    /// 手动重试失败的阶段或末端资源
    pub async fn retry(&self, target: FetchTarget) -> Result<PipelineView<R>> {
        self.request(|ack| Command::Retry { target, ack }).await
    }

    /// 当前快照
    pub fn view(&self) -> PipelineView<R> {
        self.views.borrow().clone()
    }

    /// 订阅快照变化
    pub fn subscribe(&self) -> watch::Receiver<PipelineView<R>> {
        self.views.clone()
    }

    /// 等待满足条件的快照（当前快照满足时立即返回）
    pub async fn wait_for<F>(&self, mut predicate: F) -> Result<PipelineView<R>>
    where
        F: FnMut(&PipelineView<R>) -> bool,
    {
        let mut views = self.views.clone();
        let view = views
            .wait_for(|view| predicate(view))
            .await
            .map_err(|_| CascadeError::ControllerClosed)?
            .clone();
        Ok(view)
    }

    /// 等待所有在途请求结束
    pub async fn settled(&self) -> Result<PipelineView<R>> {
        self.wait_for(|view| !view.loading).await
    }

    async fn request<F>(&self, build: F) -> Result<PipelineView<R>>
    where
        F: FnOnce(Ack<R>) -> Command<R>,
    {
        let (ack, reply) = oneshot::channel();
        self.commands
            .send(build(ack))
            .map_err(|_| CascadeError::ControllerClosed)?;
        reply.await.map_err(|_| CascadeError::ControllerClosed)?
    }
}

/// 级联控制器
pub struct CascadeController<R = Vec<EquipmentItem>> {
    state: CascadeState<R>,
    orchestrator: FetchOrchestrator,
    commands: mpsc::UnboundedReceiver<Command<R>>,
    views: watch::Sender<PipelineView<R>>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion<R>>>,
}

impl<R> CascadeController<R>
where
    R: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// 启动控制器任务
    ///
    /// 根阶段请求在返回前已发起，初始快照处于 loading。必须在 tokio 运行时内调用。
    pub fn spawn(
        resolver: StageResolver,
        orchestrator: FetchOrchestrator,
    ) -> Result<(CascadeHandle<R>, JoinHandle<()>)> {
        let (state, root) = CascadeState::new(resolver)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let in_flight = FuturesUnordered::new();
        let (views, view_rx) = watch::channel(state.view(false));
        let mut controller = Self {
            state,
            orchestrator,
            commands: command_rx,
            views,
            in_flight,
        };
        controller.dispatch(root);
        controller.publish();

        let handle = CascadeHandle {
            commands: command_tx,
            views: view_rx,
        };
        let task = tokio::spawn(controller.run());
        Ok((handle, task))
    }

    async fn run(mut self) {
        info!(
            stages = self.state.resolver().chain().len(),
            base_url = %self.orchestrator.base_url(),
            "级联控制器已启动"
        );

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        info!("所有句柄已释放，级联控制器退出");
                        break;
                    };
                    self.handle_command(command);
                }

                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.handle_completion(completion);
                }
            }
        }
    }

    fn handle_command(&mut self, command: Command<R>) {
        match command {
            Command::Select { stage, item, ack } => {
                let key = self.stage_key(stage);
                debug!(stage = %key, id = %item.id, "收到选择");
                let result = self.state.select(stage, item).map(|pending| {
                    if let Some(pending) = pending {
                        record_selection(&key);
                        self.dispatch(pending);
                    }
                });
                self.reply(ack, result);
            }
            Command::Clear { stage, ack } => {
                let result = self.state.clear_from(stage).map(|changed| {
                    if changed {
                        debug!(stage = %self.stage_key(stage), "已清空选择");
                    }
                });
                self.reply(ack, result);
            }
            Command::Retry { target, ack } => {
                let result = self.state.retry(target).map(|pending| {
                    if let Some(pending) = pending {
                        info!(fetch_target = %target, "手动重试");
                        self.dispatch(pending);
                    }
                });
                self.reply(ack, result);
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion<R>) {
        let target = completion.target();
        let failure = completion.failure().cloned();

        match self.state.apply(completion) {
            ApplyOutcome::Applied => match failure {
                Some(failed) => warn!(fetch_target = %target, error = %failed.error, "阶段进入失败状态"),
                None => debug!(fetch_target = %target, "阶段数据已就绪"),
            },
            ApplyOutcome::Stale => {
                let key = self.state.resolver().chain().target_key(target);
                debug!(fetch_target = %target, "丢弃过期响应");
                record_stale_response(key);
            }
        }
        self.publish();
    }

    fn dispatch(&mut self, pending: PendingFetch) {
        let PendingFetch {
            target,
            generation,
            request,
        } = pending;

        let fetch = match target {
            FetchTarget::Stage(stage) => self
                .orchestrator
                .dispatch::<Vec<SelectItem>>(&request)
                .map(move |result| Completion::Stage {
                    stage,
                    generation,
                    result,
                })
                .boxed(),
            FetchTarget::Resource => self
                .orchestrator
                .dispatch::<R>(&request)
                .map(move |result| Completion::Resource { generation, result })
                .boxed(),
        };
        self.in_flight.push(fetch);
    }

    fn reply(&self, ack: Ack<R>, result: Result<()>) {
        if let Err(e) = &result {
            warn!(error = %e, "命令被拒绝");
        }
        let view = self.publish();
        // 调用方已放弃等待时忽略
        let _ = ack.send(result.map(|()| view));
    }

    fn publish(&self) -> PipelineView<R> {
        let view = self.state.view(self.orchestrator.status().is_loading());
        self.views.send_replace(view.clone());
        view
    }

    fn stage_key(&self, stage: usize) -> String {
        self.state
            .resolver()
            .chain()
            .target_key(FetchTarget::Stage(stage))
            .to_string()
    }
}
