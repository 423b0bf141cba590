use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 报告状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Success,
    Warning,
    Failure,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Success => "SUCCESS",
            ReportStatus::Warning => "WARNING",
            ReportStatus::Failure => "FAILURE",
        }
    }
}

/// 一条任务报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub status: ReportStatus,
    pub source: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        status: ReportStatus,
        source: impl Into<String>,
        message: impl Into<String>,
        detail: Option<JsonValue>,
    ) -> Self {
        Self {
            status,
            source: source.into(),
            message: message.into(),
            detail,
            created_at: Utc::now(),
        }
    }
}
