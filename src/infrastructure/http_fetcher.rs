//! HTTP 抓取器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"按 URL 取回文本"的能力

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{AppError, AppResult, FetchError};

/// 抓取能力
///
/// 超时必须以 [`FetchError::Timeout`] 返回，调用方据此区分"跳过"与"失败"
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// 取回 URL 对应的响应正文
    async fn fetch_text(&self, url: &str) -> AppResult<String>;
}

/// 基于 reqwest 的抓取器
///
/// 职责：
/// - 持有 HTTP 客户端
/// - 对所有请求统一施加超时
/// - 不认识投票 / 法案
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// 创建新的抓取器
    ///
    /// # 参数
    /// - `timeout_secs`: 单次请求超时（秒）
    pub fn new(timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|source| FetchError::RequestFailed {
                url: String::new(),
                source,
            })?;

        Ok(Self { client })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch_text(&self, url: &str) -> AppResult<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(|e| classify(url, e))?;
        debug!("GET {} -> {} 字节", url, body.len());

        Ok(body)
    }
}

/// 把 reqwest 错误归类为超时或普通请求失败
fn classify(url: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::timeout(url)
    } else {
        FetchError::RequestFailed {
            url: url.to_string(),
            source: err,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 需要网络，手动运行：cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_fetch_listing_page() {
        let _ = tracing_subscriber::fmt::try_init();

        let fetcher = ReqwestFetcher::new(8).unwrap();
        let body = fetcher
            .fetch_text(&crate::config::Config::default().listing_url)
            .await
            .unwrap();

        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_not_timeout() {
        let fetcher = ReqwestFetcher::new(2).unwrap();
        let err = fetcher
            .fetch_text("http://127.0.0.1:9/votes.htm")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Fetch(_)));
    }
}
