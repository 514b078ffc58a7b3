//! 统一错误处理模块
//!
//! 定义远程数据获取的错误分类，使用 thiserror 提供良好的错误信息。
//! 传输层只产生这几类错误，上层在 FetchOrchestrator 边界将其收敛为单一的失败结果。

use thiserror::Error;

/// 数据获取错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    // ==================== 传输错误 ====================
    #[error("网络错误: {0}")]
    Network(String),

    #[error("HTTP 状态异常: {status}")]
    Http { status: u16 },

    // ==================== 数据错误 ====================
    #[error("响应解析失败: {0}")]
    Parse(String),

    #[error("无效的请求地址: {0}")]
    InvalidUrl(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "NETWORK_ERROR",
            Self::Http { .. } => "HTTP_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::InvalidUrl(_) => "INVALID_URL",
        }
    }

    /// 是否为可重试错误
    ///
    /// 管道本身从不自动重试，该标记仅供渲染层决定是否展示重试入口。
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::InvalidUrl(_) => false,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(FetchError::Http { status: 500 }.code(), "HTTP_ERROR");
        assert_eq!(FetchError::Network("refused".into()).code(), "NETWORK_ERROR");
        assert_eq!(FetchError::Parse("eof".into()).code(), "PARSE_ERROR");
    }

    #[test]
    fn test_is_retryable() {
        assert!(FetchError::Network("timeout".into()).is_retryable());
        assert!(FetchError::Http { status: 503 }.is_retryable());
        assert!(FetchError::Http { status: 429 }.is_retryable());
        assert!(!FetchError::Http { status: 404 }.is_retryable());
        assert!(!FetchError::Parse("bad json".into()).is_retryable());
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch_err: FetchError = err.into();
        assert_eq!(fetch_err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::Http { status: 500 }.to_string(),
            "HTTP 状态异常: 500"
        );
    }
}
