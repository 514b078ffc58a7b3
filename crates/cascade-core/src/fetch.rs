//! 获取编排
//!
//! 执行请求描述、维护全局加载状态，并把所有失败收敛为 `FetchFailed`。
//! 不做去重也不做网络层取消，过期响应由控制器的代际计数丢弃。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use cascade_shared::error::FetchError;
use cascade_shared::observability::metrics::record_fetch;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span, warn};

use crate::error::FetchFailed;
use crate::resolver::RequestDescriptor;
use crate::transport::JsonTransport;

/// 管道级加载状态
///
/// 以在途请求计数实现：任一请求未完成时即为 loading，
/// 避免先完成的请求把仍在进行中的其他请求标记为空闲。
#[derive(Debug, Clone, Default)]
pub struct FetchStatus {
    in_flight: Arc<AtomicUsize>,
}

impl FetchStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// 标记一个请求开始，返回的守卫在任意退出路径上 drop 时释放
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

/// 加载状态守卫
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 获取编排器
#[derive(Clone)]
pub struct FetchOrchestrator {
    transport: Arc<dyn JsonTransport>,
    base_url: Arc<str>,
    status: FetchStatus,
}

impl FetchOrchestrator {
    pub fn new(transport: Arc<dyn JsonTransport>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: Arc::from(base_url),
            status: FetchStatus::new(),
        }
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发起请求
    ///
    /// 加载状态在返回 future 之前同步置位，调用方随后发布的快照必然处于 loading；
    /// 返回的 future 不借用 `self`，可以交给任意执行器轮询。
    pub fn dispatch<T>(&self, request: &RequestDescriptor) -> BoxFuture<'static, Result<T, FetchFailed>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let guard = self.status.begin();
        let transport = Arc::clone(&self.transport);
        let target = request.target;
        let key = request.key.clone();
        let url = request.to_url(&self.base_url);
        let span = info_span!("fetch", fetch_target = %target, request = %request.path_and_query());

        async move {
            let _guard = guard;
            let started = Instant::now();

            let result = match url {
                Ok(url) => {
                    debug!(url = %url, "发起请求");
                    fetch_and_parse::<T>(transport.as_ref(), &url).await
                }
                Err(e) => Err(e),
            };

            let elapsed = started.elapsed();
            match &result {
                Ok(_) => {
                    debug!(elapsed_ms = elapsed.as_millis() as u64, "请求成功");
                    record_fetch(&key, "success", elapsed.as_secs_f64());
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        code = e.code(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "请求失败"
                    );
                    record_fetch(&key, e.code(), elapsed.as_secs_f64());
                }
            }

            result.map_err(|error| FetchFailed { target, error })
        }
        .instrument(span)
        .boxed()
    }

    /// 发起请求并等待结果
    pub async fn run<T>(&self, request: &RequestDescriptor) -> Result<T, FetchFailed>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.dispatch(request).await
    }
}

async fn fetch_and_parse<T: DeserializeOwned>(
    transport: &dyn JsonTransport,
    url: &reqwest::Url,
) -> Result<T, FetchError> {
    let body = transport.fetch_json(url).await?;
    Ok(serde_json::from_value(body)?)
}
