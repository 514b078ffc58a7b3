//! Mock 目录服务
//!
//! - `GET /api/schools`
//! - `GET /api/grades?school_id=`
//! - `GET /api/classes?school_id=&grade_id=`
//! - `GET /api/equipment?school_id=&grade_id=&class_id=`
//!
//! 缺少任一祖先参数返回 400；祖先 id 与记录不一致时返回空列表。

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::fault::FaultPlan;
use crate::models::{CatalogItem, Equipment};
use crate::store::CatalogStore;

/// 目录服务状态
#[derive(Debug, Clone, Default)]
pub struct CatalogServiceState {
    pub store: CatalogStore,
    pub faults: FaultPlan,
}

impl CatalogServiceState {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            faults: FaultPlan::new(),
        }
    }
}

// ============================================================================
// 请求/响应 DTO
// ============================================================================

/// 祖先参数，按接口需要逐个校验
#[derive(Debug, Default, Deserialize)]
pub struct AncestorQuery {
    pub school_id: Option<String>,
    pub grade_id: Option<String>,
    pub class_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// 接口错误
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn missing(param: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("缺少参数: {param}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

impl AncestorQuery {
    fn require(value: &Option<String>, name: &str) -> Result<String, ApiError> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => {
                warn!(param = name, "请求缺少祖先参数");
                Err(ApiError::missing(name))
            }
        }
    }

    /// 数字 id；无法解析时视为不存在的 id
    fn numeric(value: &str) -> Option<i64> {
        value.parse().ok()
    }
}

// ============================================================================
// 路由定义
// ============================================================================

pub fn catalog_routes() -> Router<Arc<CatalogServiceState>> {
    Router::new()
        .route("/api/schools", get(list_schools))
        .route("/api/grades", get(list_grades))
        .route("/api/classes", get(list_classes))
        .route("/api/equipment", get(list_equipment))
}

// ============================================================================
// 路由处理器
// ============================================================================

async fn list_schools(State(state): State<Arc<CatalogServiceState>>) -> Json<Vec<CatalogItem>> {
    let items: Vec<CatalogItem> = state.store.schools().into_iter().map(Into::into).collect();
    debug!(count = items.len(), "列出学校");
    Json(items)
}

async fn list_grades(
    State(state): State<Arc<CatalogServiceState>>,
    Query(query): Query<AncestorQuery>,
) -> ApiResult<Vec<CatalogItem>> {
    let school_id = AncestorQuery::require(&query.school_id, "school_id")?;

    let items: Vec<CatalogItem> = match AncestorQuery::numeric(&school_id) {
        Some(school) => state.store.grades(school).into_iter().map(Into::into).collect(),
        None => Vec::new(),
    };
    debug!(%school_id, count = items.len(), "列出年级");
    Ok(Json(items))
}

async fn list_classes(
    State(state): State<Arc<CatalogServiceState>>,
    Query(query): Query<AncestorQuery>,
) -> ApiResult<Vec<CatalogItem>> {
    let school_id = AncestorQuery::require(&query.school_id, "school_id")?;
    let grade_id = AncestorQuery::require(&query.grade_id, "grade_id")?;

    let ids = AncestorQuery::numeric(&school_id).zip(AncestorQuery::numeric(&grade_id));
    let items: Vec<CatalogItem> = match ids {
        Some((school, grade)) => state
            .store
            .classes(school, grade)
            .into_iter()
            .map(Into::into)
            .collect(),
        None => Vec::new(),
    };
    debug!(%school_id, %grade_id, count = items.len(), "列出班级");
    Ok(Json(items))
}

async fn list_equipment(
    State(state): State<Arc<CatalogServiceState>>,
    Query(query): Query<AncestorQuery>,
) -> ApiResult<Vec<Equipment>> {
    let school_id = AncestorQuery::require(&query.school_id, "school_id")?;
    let grade_id = AncestorQuery::require(&query.grade_id, "grade_id")?;
    let class_id = AncestorQuery::require(&query.class_id, "class_id")?;

    let ids = AncestorQuery::numeric(&school_id).zip(AncestorQuery::numeric(&grade_id));
    let items = match ids {
        Some((school, grade)) => state.store.equipment(school, grade, &class_id),
        None => Vec::new(),
    };
    debug!(%school_id, %grade_id, %class_id, count = items.len(), "列出器材");
    Ok(Json(items))
}
