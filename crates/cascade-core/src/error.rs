//! 级联管道错误类型
//!
//! `FetchFailed` 是 FetchOrchestrator 唯一的失败出口，网络、HTTP 与解析错误都收敛于此；
//! `CascadeError` 描述 API 使用层面的问题（越界、祖先缺失、控制器已关闭等）。

use cascade_shared::error::FetchError;
use thiserror::Error;

use crate::resolver::FetchTarget;

/// 单次获取失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("获取 {target} 失败: {error}")]
pub struct FetchFailed {
    pub target: FetchTarget,
    #[source]
    pub error: FetchError,
}

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("阶段越界: stage={stage}, 共 {len} 个阶段")]
    StageOutOfRange { stage: usize, len: usize },

    #[error("祖先选择缺失: {target} 需要 {expected} 个祖先, 实际 {actual}")]
    MissingAncestor {
        target: FetchTarget,
        expected: usize,
        actual: usize,
    },

    #[error("上级阶段尚未选择: stage={stage}")]
    AncestorUnset { stage: usize },

    #[error("阶段链不能为空")]
    EmptyChain,

    #[error("级联控制器已关闭")]
    ControllerClosed,

    #[error("HTTP 客户端初始化失败: {0}")]
    Client(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, CascadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_display() {
        let failed = FetchFailed {
            target: FetchTarget::Stage(2),
            error: FetchError::Http { status: 500 },
        };
        assert_eq!(failed.to_string(), "获取 stage[2] 失败: HTTP 状态异常: 500");
    }

    #[test]
    fn test_error_display() {
        let err = CascadeError::StageOutOfRange { stage: 5, len: 3 };
        assert_eq!(err.to_string(), "阶段越界: stage=5, 共 3 个阶段");

        let err = CascadeError::MissingAncestor {
            target: FetchTarget::Resource,
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "祖先选择缺失: resource 需要 3 个祖先, 实际 2"
        );

        assert_eq!(
            CascadeError::AncestorUnset { stage: 2 }.to_string(),
            "上级阶段尚未选择: stage=2"
        );
        assert_eq!(
            CascadeError::Client("tls".to_string()).to_string(),
            "HTTP 客户端初始化失败: tls"
        );
    }
}
