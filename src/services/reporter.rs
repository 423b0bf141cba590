//! 报告服务 - 业务能力层
//!
//! 只负责"发出一条报告"，报告去向由实现决定，调用方不关心结果

use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::infrastructure::SqliteStore;
use crate::models::{Report, ReportStatus};

/// 报告接收方
#[allow(async_fn_in_trait)]
pub trait Reporter {
    /// 发出一条报告
    async fn file(&self, status: ReportStatus, message: String, detail: Option<JsonValue>);

    async fn success(&self, message: impl Into<String>) {
        self.file(ReportStatus::Success, message.into(), None).await
    }

    async fn warning(&self, message: impl Into<String>, detail: Option<JsonValue>) {
        self.file(ReportStatus::Warning, message.into(), detail).await
    }

    async fn failure(&self, message: impl Into<String>, detail: Option<JsonValue>) {
        self.file(ReportStatus::Failure, message.into(), detail).await
    }
}

/// 只写日志的报告
pub struct LogReporter {
    source: String,
}

impl LogReporter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Reporter for LogReporter {
    async fn file(&self, status: ReportStatus, message: String, detail: Option<JsonValue>) {
        log_report(&Report::new(status, &self.source, message, detail));
    }
}

/// 写入 reports 表的报告，同时写日志
pub struct StoreReporter {
    store: SqliteStore,
    source: String,
}

impl StoreReporter {
    pub fn new(store: SqliteStore, source: impl Into<String>) -> Self {
        Self {
            store,
            source: source.into(),
        }
    }
}

impl Reporter for StoreReporter {
    async fn file(&self, status: ReportStatus, message: String, detail: Option<JsonValue>) {
        let report = Report::new(status, &self.source, message, detail);
        log_report(&report);

        if let Err(e) = self.store.insert_report(&report).await {
            error!("❌ 报告写入数据库失败: {}", e);
        }
    }
}

fn log_report(report: &Report) {
    let detail = report
        .detail
        .as_ref()
        .map(|d| format!(" {}", d))
        .unwrap_or_default();

    match report.status {
        ReportStatus::Success => info!("✅ [{}] {}{}", report.source, report.message, detail),
        ReportStatus::Warning => warn!("⚠️ [{}] {}{}", report.source, report.message, detail),
        ReportStatus::Failure => error!("❌ [{}] {}{}", report.source, report.message, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_reporter_persists() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let reporter = StoreReporter::new(store.clone(), "RollsLiveSenate");

        reporter.success("Fetched 0 new live roll calls").await;
        reporter
            .warning("Timeout", Some(serde_json::json!({ "timed_out": [1] })))
            .await;

        assert_eq!(store.unread_report_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_log_reporter_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let reporter = LogReporter::new("RollsLiveSenate");
        reporter.failure("Failed to save 1 roll calls.", None).await;
    }
}
