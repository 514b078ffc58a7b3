//! 路由组装与启动

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use cascade_shared::observability::metrics::record_http_request;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::generators::seed_catalog;
use crate::services::{CatalogServiceState, catalog_routes, inject_faults};
use crate::store::CatalogStore;

/// 组装完整应用：健康检查、目录接口、故障注入与请求指标
pub fn build_app(state: Arc<CatalogServiceState>) -> Router {
    let faults = state.faults.clone();
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .merge(
            catalog_routes().route_layer(middleware::from_fn_with_state(faults, inject_faults)),
        )
        .with_state(state)
        .layer(middleware::from_fn(record_requests))
        .layer(TraceLayer::new_for_http())
}

/// 在后台运行的目录服务
pub struct RunningServer {
    pub addr: SocketAddr,
    pub state: Arc<CatalogServiceState>,
    task: JoinHandle<()>,
}

impl RunningServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// 绑定地址并在后台启动服务，端口为 0 时由系统分配
pub async fn spawn_server(addr: SocketAddr, state: Arc<CatalogServiceState>) -> Result<RunningServer> {
    let listener = TcpListener::bind(addr).await.context("绑定端口失败")?;
    let addr = listener.local_addr().context("获取监听地址失败")?;
    let app = build_app(Arc::clone(&state));

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "目录服务异常退出");
        }
    });

    info!(%addr, "目录服务已在后台启动");
    Ok(RunningServer { addr, state, task })
}

/// 以固定目录在本机随机端口启动服务
pub async fn spawn_seeded() -> Result<RunningServer> {
    let store = CatalogStore::new();
    seed_catalog(&store);
    let state = Arc::new(CatalogServiceState::new(store));
    spawn_server(SocketAddr::from(([127, 0, 0, 1], 0)), state).await
}

/// 前台运行服务直到 `shutdown` 完成
pub async fn serve<F>(addr: SocketAddr, state: Arc<CatalogServiceState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.context("绑定端口失败")?;
    info!(addr = %listener.local_addr().context("获取监听地址失败")?, "目录服务已启动");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("服务器运行失败")?;

    info!("目录服务已停止");
    Ok(())
}

/// 请求计数中间件
async fn record_requests(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    record_http_request(&path, response.status().as_u16());
    response
}

// ============================================================================
// 健康检查端点
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: &'static str,
    schools: usize,
    faults: usize,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// 目录为空时仍视为就绪，便于测试按需写入数据
async fn readiness_check(State(state): State<Arc<CatalogServiceState>>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        status: "ready",
        schools: state.store.schools().len(),
        faults: state.faults.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn seeded_state() -> Arc<CatalogServiceState> {
        let store = CatalogStore::new();
        seed_catalog(&store);
        Arc::new(CatalogServiceState::new(store))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let app = build_app(seeded_state());

        let (status, body) = get(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = get(app, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schools"], 2);
        assert_eq!(body["faults"], 0);
    }

    #[tokio::test]
    async fn test_injected_fault_overrides_handler() {
        let state = seeded_state();
        state.faults.fail("/api/classes?school_id=1&grade_id=10", 500);
        let app = build_app(Arc::clone(&state));

        let (status, body) = get(app.clone(), "/api/classes?school_id=1&grade_id=10").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "注入的故障");

        // 其他查询不受影响
        let (status, _) = get(app.clone(), "/api/classes?school_id=1&grade_id=9").await;
        assert_eq!(status, StatusCode::OK);

        state.faults.clear_all();
        let (status, _) = get(app, "/api/classes?school_id=1&grade_id=10").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_faults_do_not_touch_health() {
        let state = seeded_state();
        state.faults.fail("/health", 503);
        let (status, _) = get(build_app(state), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_spawn_seeded_serves_http() {
        let server = spawn_seeded().await.unwrap();
        let body: Value = reqwest::get(format!("{}/api/schools", server.base_url()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
        server.shutdown();
    }
}
