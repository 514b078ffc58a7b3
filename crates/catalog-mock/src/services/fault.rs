//! 故障注入
//!
//! 规则以 "路径?查询串" 或 "路径" 为 key，完整匹配优先。
//! 命中的请求先按规则延迟，再返回指定状态码或继续正常处理。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tracing::info;

use super::catalog_service::ApiError;

/// 单条故障规则
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fault {
    /// 强制返回的状态码
    pub status: Option<u16>,
    pub delay: Duration,
}

/// 故障计划，克隆后共享同一组规则
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    rules: Arc<DashMap<String, Fault>>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// 令匹配的请求返回 `status`
    pub fn fail(&self, target: &str, status: u16) {
        self.rules.entry(target.to_string()).or_default().status = Some(status);
    }

    /// 令匹配的请求延迟 `delay` 后再处理
    pub fn delay(&self, target: &str, delay: Duration) {
        self.rules.entry(target.to_string()).or_default().delay = delay;
    }

    pub fn clear(&self, target: &str) {
        self.rules.remove(target);
    }

    pub fn clear_all(&self) {
        self.rules.clear();
    }

    pub fn lookup(&self, path_and_query: &str, path: &str) -> Option<Fault> {
        self.rules
            .get(path_and_query)
            .or_else(|| self.rules.get(path))
            .map(|rule| *rule)
    }

    /// 解析 `路径=状态码` 形式的规则并加入计划
    pub fn add_rule(&self, rule: &str) -> Result<()> {
        let Some((target, status)) = rule.rsplit_once('=') else {
            bail!("故障规则格式错误，应为 路径=状态码: {rule}");
        };
        if !target.starts_with('/') {
            bail!("故障规则路径必须以 / 开头: {target}");
        }
        let status: u16 = status
            .parse()
            .with_context(|| format!("无效的状态码: {status}"))?;
        if StatusCode::from_u16(status).is_err() {
            bail!("无效的状态码: {status}");
        }

        self.fail(target, status);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 故障注入中间件
pub async fn inject_faults(State(plan): State<FaultPlan>, request: Request, next: Next) -> Response {
    let uri = request.uri();
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    if let Some(fault) = plan.lookup(path_and_query, uri.path()) {
        info!(rule = %path_and_query, status = ?fault.status, delay_ms = fault.delay.as_millis() as u64, "命中故障规则");
        if !fault.delay.is_zero() {
            tokio::time::sleep(fault.delay).await;
        }
        if let Some(status) = fault.status {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return ApiError::new(status, "注入的故障").into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rule() {
        let plan = FaultPlan::new();
        plan.add_rule("/api/classes=500").unwrap();
        plan.add_rule("/api/grades?school_id=1=503").unwrap();

        assert_eq!(
            plan.lookup("/api/classes?school_id=1&grade_id=9", "/api/classes"),
            Some(Fault {
                status: Some(500),
                delay: Duration::ZERO,
            })
        );
        assert_eq!(
            plan.lookup("/api/grades?school_id=1", "/api/grades")
                .and_then(|f| f.status),
            Some(503)
        );
        assert!(plan.lookup("/api/grades?school_id=2", "/api/grades").is_none());
    }

    #[test]
    fn test_add_rule_invalid() {
        let plan = FaultPlan::new();
        assert!(plan.add_rule("no-separator").is_err());
        assert!(plan.add_rule("api/classes=500").is_err());
        assert!(plan.add_rule("/api/classes=abc").is_err());
        assert!(plan.add_rule("/api/classes=1000").is_err());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_delay_and_fail_combine() {
        let plan = FaultPlan::new();
        plan.delay("/api/schools", Duration::from_millis(50));
        plan.fail("/api/schools", 502);

        let fault = plan.lookup("/api/schools", "/api/schools").unwrap();
        assert_eq!(fault.status, Some(502));
        assert_eq!(fault.delay, Duration::from_millis(50));

        plan.clear("/api/schools");
        assert!(plan.lookup("/api/schools", "/api/schools").is_none());
    }
}
