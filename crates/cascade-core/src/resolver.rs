//! 阶段请求解析
//!
//! 根据祖先选择构造请求描述。纯函数，不执行任何请求。
//!
//! 每一级请求都携带**全部**上级 id（`school_id`、`grade_id`、`class_id` 依次累积），
//! 而不仅仅是直接父级的 id。只带父级 id 的请求在真实后端上会静默返回更宽的结果集。

use std::fmt;

use cascade_shared::error::FetchError;
use reqwest::Url;
use serde::Serialize;

use crate::error::{CascadeError, Result};
use crate::model::SelectItem;

/// 获取目标：某一级的候选集或末端资源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTarget {
    Stage(usize),
    Resource,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(stage) => write!(f, "stage[{stage}]"),
            Self::Resource => f.write_str("resource"),
        }
    }
}

/// 选择阶段定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDef {
    /// 机器可读名称，用于日志与指标标签
    pub key: String,
    /// 展示名称，用于占位提示
    pub display_name: String,
    /// 候选集接口路径
    pub path: String,
    /// 该阶段选择作为下级请求参数时使用的键
    pub param_key: String,
}

impl StageDef {
    pub fn new(key: &str, display_name: &str, path: &str, param_key: &str) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            path: path.to_string(),
            param_key: param_key.to_string(),
        }
    }
}

/// 末端资源定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDef {
    pub key: String,
    pub display_name: String,
    pub path: String,
}

/// 静态的线性阶段链
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageChain {
    stages: Vec<StageDef>,
    resource: ResourceDef,
}

impl StageChain {
    pub fn new(stages: Vec<StageDef>, resource: ResourceDef) -> Result<Self> {
        if stages.is_empty() {
            return Err(CascadeError::EmptyChain);
        }
        Ok(Self { stages, resource })
    }

    /// 学校 → 年级 → 班级 → 器材
    pub fn school_equipment() -> Self {
        Self {
            stages: vec![
                StageDef::new("school", "学校", "/api/schools", "school_id"),
                StageDef::new("grade", "年级", "/api/grades", "grade_id"),
                StageDef::new("class", "班级", "/api/classes", "class_id"),
            ],
            resource: ResourceDef {
                key: "equipment".to_string(),
                display_name: "器材".to_string(),
                path: "/api/equipment".to_string(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, index: usize) -> Option<&StageDef> {
        self.stages.get(index)
    }

    pub fn stages(&self) -> &[StageDef] {
        &self.stages
    }

    pub fn resource(&self) -> &ResourceDef {
        &self.resource
    }

    /// 获取目标对应的机器可读名称
    pub fn target_key(&self, target: FetchTarget) -> &str {
        match target {
            FetchTarget::Stage(i) => self.stages.get(i).map_or("unknown", |s| s.key.as_str()),
            FetchTarget::Resource => &self.resource.key,
        }
    }

    /// 某个目标需要的祖先数量
    pub fn depth_of(&self, target: FetchTarget) -> usize {
        match target {
            FetchTarget::Stage(i) => i,
            FetchTarget::Resource => self.stages.len(),
        }
    }

    /// 选中第 `stage` 级后应获取的下一个目标
    pub fn next_target(&self, stage: usize) -> FetchTarget {
        if stage + 1 < self.stages.len() {
            FetchTarget::Stage(stage + 1)
        } else {
            FetchTarget::Resource
        }
    }
}

/// 请求描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    pub target: FetchTarget,
    /// 目标在阶段链中的 key，作为指标标签
    pub key: String,
    pub path: String,
    /// 按阶段顺序排列的祖先 id
    pub query: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// 基础地址直接拼接路径，再追加经过转义的查询串
    pub fn to_url(&self, base_url: &str) -> std::result::Result<Url, FetchError> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// 路径加查询串，用于日志
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// 阶段请求解析器
#[derive(Debug, Clone)]
pub struct StageResolver {
    chain: StageChain,
}

impl StageResolver {
    pub fn new(chain: StageChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &StageChain {
        &self.chain
    }

    /// 构造获取 `target` 的请求描述
    ///
    /// `ancestors` 必须恰好是第 0..depth 级的选择，数量不符时返回错误而不是构造残缺请求。
    pub fn build_request(
        &self,
        target: FetchTarget,
        ancestors: &[SelectItem],
    ) -> Result<RequestDescriptor> {
        let path = match target {
            FetchTarget::Stage(i) => {
                let stage = self.chain.stage(i).ok_or(CascadeError::StageOutOfRange {
                    stage: i,
                    len: self.chain.len(),
                })?;
                stage.path.clone()
            }
            FetchTarget::Resource => self.chain.resource.path.clone(),
        };

        let expected = self.chain.depth_of(target);
        if ancestors.len() != expected {
            return Err(CascadeError::MissingAncestor {
                target,
                expected,
                actual: ancestors.len(),
            });
        }

        let query = self.chain.stages[..expected]
            .iter()
            .zip(ancestors)
            .map(|(stage, item)| (stage.param_key.clone(), item.id.to_string()))
            .collect();

        Ok(RequestDescriptor {
            target,
            key: self.chain.target_key(target).to_string(),
            path,
            query,
        })
    }
}
