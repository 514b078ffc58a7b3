//! 命令执行器

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cascade_shared::config::AppConfig;
use tracing::{info, warn};

use crate::controller::CascadeController;
use crate::fetch::FetchOrchestrator;
use crate::model::{EquipmentItem, SelectItem};
use crate::resolver::{StageChain, StageResolver};
use crate::state::StagePhase;
use crate::transport::HttpTransport;
use crate::view::PipelineView;

/// 命令执行器
pub struct CommandRunner {
    config: AppConfig,
    chain: StageChain,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            chain: StageChain::school_equipment(),
        }
    }

    /// 执行 walk 命令，返回最终快照
    pub async fn run_walk(&self, ids: &[String]) -> Result<PipelineView<Vec<EquipmentItem>>> {
        if ids.len() > self.chain.len() {
            bail!("最多指定 {} 级选择", self.chain.len());
        }

        let transport = HttpTransport::new(&self.config.catalog).context("创建 HTTP 客户端失败")?;
        let orchestrator =
            FetchOrchestrator::new(Arc::new(transport), self.config.catalog.base_url.clone());
        let (handle, _task) = CascadeController::<Vec<EquipmentItem>>::spawn(
            StageResolver::new(self.chain.clone()),
            orchestrator,
        )
        .context("启动级联控制器失败")?;

        let mut view = handle.settled().await?;
        for (stage, id) in ids.iter().enumerate() {
            let item = find_candidate(&view, stage, id)?;
            info!(stage, id = %item.id, label = %item.label, "选择");
            handle.select(stage, item).await?;
            view = handle.settled().await?;
        }

        if view.resource_phase == StagePhase::Failed {
            warn!(error = ?view.resource_error, "末端资源加载失败");
        }
        Ok(view)
    }

    /// 执行 walk 命令并以 JSON 打印
    pub async fn print_walk(&self, ids: &[String]) -> Result<()> {
        let view = self.run_walk(ids).await?;
        let json = serde_json::to_string_pretty(&view).context("序列化快照失败")?;
        println!("{json}");
        Ok(())
    }

    /// 执行 chain 命令
    pub fn print_chain(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.chain).context("序列化阶段链失败")?;
        println!("{json}");
        Ok(())
    }
}

/// 在已加载的候选集中查找 id
fn find_candidate<R>(view: &PipelineView<R>, stage: usize, id: &str) -> Result<SelectItem> {
    let Some(stage_view) = view.stage(stage) else {
        bail!("阶段 {stage} 不存在");
    };

    match stage_view.phase {
        StagePhase::Ready => {}
        StagePhase::Failed => bail!(
            "{}加载失败: {}",
            stage_view.name,
            stage_view.error.as_deref().unwrap_or("未知错误")
        ),
        phase => bail!("{}尚不可选择: {:?}", stage_view.name, phase),
    }

    stage_view
        .items
        .iter()
        .find(|item| item.id.as_str() == id)
        .cloned()
        .with_context(|| format!("{}中不存在 id={id}", stage_view.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::StageView;

    fn ready_view(items: Vec<SelectItem>) -> PipelineView<()> {
        PipelineView {
            stages: vec![StageView {
                key: "school".to_string(),
                name: "学校".to_string(),
                items,
                selected: None,
                phase: StagePhase::Ready,
                disabled: false,
                loading: false,
                placeholder: "请选择学校".to_string(),
                error: None,
                retryable: false,
            }],
            loading: false,
            resource: None,
            resource_phase: StagePhase::Disabled,
            resource_error: None,
            resource_retryable: false,
        }
    }

    #[test]
    fn test_find_candidate() {
        let view = ready_view(vec![
            SelectItem::new(1, "Lincoln HS"),
            SelectItem::new(2, "Roosevelt MS"),
        ]);

        let item = find_candidate(&view, 0, "2").unwrap();
        assert_eq!(item.label, "Roosevelt MS");

        let err = find_candidate(&view, 0, "3").unwrap_err();
        assert!(err.to_string().contains("id=3"));
        assert!(find_candidate(&view, 1, "1").is_err());
    }

    #[test]
    fn test_find_candidate_in_failed_stage() {
        let mut view = ready_view(vec![]);
        view.stages[0].phase = StagePhase::Failed;
        view.stages[0].error = Some("HTTP 状态异常: 500".to_string());

        let err = find_candidate(&view, 0, "1").unwrap_err();
        assert_eq!(err.to_string(), "学校加载失败: HTTP 状态异常: 500");
    }

    #[tokio::test]
    async fn test_walk_rejects_too_many_ids() {
        let runner = CommandRunner::new(AppConfig::default());
        let ids: Vec<String> = ["1", "9", "A", "x"].iter().map(|s| s.to_string()).collect();
        assert!(runner.run_walk(&ids).await.is_err());
    }
}
