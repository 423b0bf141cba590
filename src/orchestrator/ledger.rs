//! 批次结果汇总
//!
//! 运行开始时创建，循环中累加，运行结束时交给报告一次后丢弃

use serde_json::json;
use tracing::info;

use crate::models::MissingLegislator;
use crate::services::Reporter;
use crate::workflow::{BadVote, RollOutcome};

/// 单次运行的汇总
#[derive(Debug, Default)]
pub struct BatchLedger {
    pub saved: usize,
    pub bad_votes: Vec<BadVote>,
    pub missing_legislators: Vec<MissingLegislator>,
    pub timed_out: Vec<u32>,
}

impl BatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次投票的处理结果
    pub fn record(&mut self, number: u32, outcome: RollOutcome) {
        match outcome {
            RollOutcome::Saved(_) => self.saved += 1,
            RollOutcome::TimedOut => self.timed_out.push(number),
            RollOutcome::Rejected(bad_vote) => self.bad_votes.push(bad_vote),
        }
    }

    /// 发出运行结束时的报告
    ///
    /// 依次检查：保存失败 → 议员缺失 → 超时 → 成功，前三者互不排斥，成功报告总会发出
    pub async fn report<R: Reporter>(self, reporter: &R, chamber_label: &str) -> RunSummary {
        if let Some(last) = self.bad_votes.last() {
            reporter
                .failure(
                    format!(
                        "Failed to save {} roll calls. Attached the last failed roll's attributes and error messages.",
                        self.bad_votes.len()
                    ),
                    Some(json!({ "bad_vote": last })),
                )
                .await;
        }

        if !self.missing_legislators.is_empty() {
            reporter
                .warning(
                    format!(
                        "Couldn't look up {} legislators in {} roll call listing. Vote counts on roll calls may be inaccurate until these are fixed.",
                        self.missing_legislators.len(),
                        chamber_label
                    ),
                    Some(json!({ "missing_legislators": self.missing_legislators })),
                )
                .await;
        }

        if !self.timed_out.is_empty() {
            reporter
                .warning(
                    format!(
                        "Timeout error on fetching {} {} roll(s), skipping and going onto the next one.",
                        self.timed_out.len(),
                        chamber_label
                    ),
                    Some(json!({ "timed_out": self.timed_out })),
                )
                .await;
        }

        reporter
            .success(format!(
                "Fetched {} new live roll calls from the {} website.",
                self.saved, chamber_label
            ))
            .await;

        info!(
            "📊 保存 {} 条，失败 {} 条，超时 {} 条",
            self.saved,
            self.bad_votes.len(),
            self.timed_out.len()
        );

        RunSummary {
            status: RunStatus::Completed,
            saved: self.saved,
            bad_votes: self.bad_votes,
            missing_legislators: self.missing_legislators.len(),
            timed_out: self.timed_out,
        }
    }
}

/// 运行结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// 处理完整个工作列表
    Completed,
    /// 没有新的投票
    NothingNew,
    /// 列表页超时
    ListingTimedOut,
    /// 列表页无法访问
    ListingUnreachable,
    /// 列表页内容无法识别
    ListingUnparsable,
}

/// 单次运行的结果
#[derive(Debug)]
pub struct RunSummary {
    pub status: RunStatus,
    pub saved: usize,
    pub bad_votes: Vec<BadVote>,
    pub missing_legislators: usize,
    pub timed_out: Vec<u32>,
}

impl RunSummary {
    /// 没有进入抓取循环的运行
    pub fn early(status: RunStatus) -> Self {
        Self {
            status,
            saved: 0,
            bad_votes: Vec::new(),
            missing_legislators: 0,
            timed_out: Vec::new(),
        }
    }
}
