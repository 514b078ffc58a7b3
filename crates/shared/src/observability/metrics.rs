//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 未安装 recorder 时所有记录函数都是空操作，库代码可以无条件调用。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册通用指标描述
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("cascade_fetch_total", "Total number of pipeline fetches");
    metrics::describe_histogram!(
        "cascade_fetch_duration_seconds",
        "Pipeline fetch duration in seconds"
    );
    metrics::describe_counter!(
        "cascade_fetch_stale_total",
        "Fetch responses discarded because a newer request superseded them"
    );
    metrics::describe_counter!("cascade_selections_total", "Total number of stage selections");
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests served");

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录一次管道数据获取
#[inline]
pub fn record_fetch(target: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "cascade_fetch_total",
        "target" => target.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "cascade_fetch_duration_seconds",
        "target" => target.to_string()
    )
    .record(duration_secs);
}

/// 记录被丢弃的过期响应
#[inline]
pub fn record_stale_response(target: &str) {
    metrics::counter!("cascade_fetch_stale_total", "target" => target.to_string()).increment(1);
}

/// 记录一次阶段选择
#[inline]
pub fn record_selection(stage: &str) {
    metrics::counter!("cascade_selections_total", "stage" => stage.to_string()).increment(1);
}

/// 记录 HTTP 请求（mock 服务端使用）
#[inline]
pub fn record_http_request(path: &str, status: u16) {
    metrics::counter!(
        "http_requests_total",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
