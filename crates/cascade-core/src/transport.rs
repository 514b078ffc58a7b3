//! JSON 传输层
//!
//! 通过 `JsonTransport` trait 抽象"按 URL 获取 JSON"的能力，默认实现基于 reqwest。
//! 超时等传输语义全部由这一层负责，管道核心不感知。

use async_trait::async_trait;
use cascade_shared::config::CatalogConfig;
use cascade_shared::error::FetchError;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::{CascadeError, Result};

/// JSON 获取接口
///
/// 提取 trait 使得编排器可以注入依赖，测试时无需启动真实 HTTP 服务。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonTransport: Send + Sync {
    /// 获取并解析 JSON 响应体
    ///
    /// 非 2xx 状态码返回 `FetchError::Http`，响应体无法解析返回 `FetchError::Parse`。
    async fn fetch_json(&self, url: &Url) -> std::result::Result<Value, FetchError>;
}

/// 基于 reqwest 的 HTTP 传输
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CascadeError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn fetch_json(&self, url: &Url) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "收到响应");
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn network_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Network(format!("请求超时: {err}"))
    } else {
        FetchError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_builds_from_config() {
        let config = CatalogConfig::default();
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_ms: 200,
            request_timeout_ms: 500,
        };
        let transport = HttpTransport::new(&config).unwrap();
        let url = Url::parse("http://127.0.0.1:1/api/schools").unwrap();

        let err = transport.fetch_json(&url).await.unwrap_err();
        assert_eq!(err.code(), "NETWORK_ERROR");
    }
}
