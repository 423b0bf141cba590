//! 批量投票处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整运行的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **定位最新投票**：读取列表页，拿到最新编号和届次/会期
//! 2. **缺口检测**：最近一个窗口内哪些投票还没保存
//! 3. **逐条处理**：委托 `RollFlow` 处理单次投票，一次只处理一条
//! 4. **汇总报告**：把所有结果交给 `BatchLedger`，运行结束时统一报告
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单次投票的细节
//! - **资源所有者**：唯一持有抓取器、存储、报告的模块
//! - **失败不中断**：只有列表页阶段的问题会提前结束运行

use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::config::{Config, RunOptions};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{Fetcher, ReqwestFetcher, SqliteStore, VoteStore};
use crate::models::LegislatorCache;
use crate::orchestrator::ledger::{BatchLedger, RunStatus, RunSummary};
use crate::services::gap_detector::{missing_rolls, unsaved_rolls};
use crate::services::listing::{latest_roll_info, ListingProbe};
use crate::services::{LatestRoll, Reporter, StoreReporter};
use crate::workflow::{RollCtx, RollFlow};

/// 应用主结构
pub struct App<F, S, R> {
    config: Config,
    tz: Tz,
    fetcher: F,
    store: S,
    reporter: R,
}

impl App<ReqwestFetcher, SqliteStore, StoreReporter> {
    /// 按配置初始化真实的抓取器、数据库和报告
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let fetcher = ReqwestFetcher::new(config.request_timeout_secs)?;
        let store = SqliteStore::connect(&config.database_url).await?;
        let reporter = StoreReporter::new(store.clone(), &config.report_source);

        Self::new(config, fetcher, store, reporter)
    }
}

impl<F, S, R> App<F, S, R>
where
    F: Fetcher,
    S: VoteStore,
    R: Reporter,
{
    pub fn new(config: Config, fetcher: F, store: S, reporter: R) -> AppResult<Self> {
        let tz = config.tz()?;
        Ok(Self {
            config,
            tz,
            fetcher,
            store,
            reporter,
        })
    }

    /// 报告接收方（运行失败时由调用方补发报告）
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 运行一次
    pub async fn run(&self, options: RunOptions) -> AppResult<RunSummary> {
        let year = options
            .year
            .unwrap_or_else(|| Utc::now().with_timezone(&self.tz).year());
        let label = self.config.chamber_label();

        log_startup(&self.config, year);

        // ========== 1. 定位最新投票 ==========
        let probe = match latest_roll_info(&self.fetcher, &self.config.listing_url).await {
            Ok(probe) => probe,
            Err(e) if e.is_timeout() => {
                self.reporter
                    .warning(
                        "Timeout error on fetching the listing page, can't go on.",
                        None,
                    )
                    .await;
                return Ok(RunSummary::early(RunStatus::ListingTimedOut));
            }
            Err(e) => {
                self.reporter
                    .failure(
                        format!("Couldn't fetch the {} listing page, aborting.\n{}", label, e),
                        None,
                    )
                    .await;
                return Ok(RunSummary::early(RunStatus::ListingUnreachable));
            }
        };

        let Some(latest) = probe.resolve() else {
            self.reporter
                .failure(unparsable_listing_message(&label, &probe), None)
                .await;
            return Ok(RunSummary::early(RunStatus::ListingUnparsable));
        };

        info!(
            "📋 最新投票 #{}（第 {} 届国会 第 {} 会期）",
            latest.number, latest.session, latest.subsession
        );

        // ========== 2. 缺口检测 ==========
        let to_fetch = match options.only {
            Some(numbers) => {
                warn!("⚠️ 使用指定的投票编号: {:?}", numbers);
                unsaved_rolls(&self.store, &self.config.chamber_prefix, numbers, year).await?
            }
            None => {
                missing_rolls(
                    &self.store,
                    &self.config.chamber_prefix,
                    latest.number,
                    year,
                    self.config.window_size,
                )
                .await?
            }
        };

        if to_fetch.is_empty() {
            self.reporter
                .success(format!(
                    "No new rolls for the {} for {}, latest one is {}.",
                    label, year, latest.number
                ))
                .await;
            return Ok(RunSummary::early(RunStatus::NothingNew));
        }

        info!("✓ 需要抓取 {} 条: {:?}", to_fetch.len(), to_fetch);

        // ========== 3. 逐条处理 ==========
        let ledger = self.process_all_rolls(&to_fetch, &latest, year).await;

        // ========== 4. 汇总报告 ==========
        Ok(ledger.report(&self.reporter, &label).await)
    }

    /// 依次处理工作列表中的每个编号
    async fn process_all_rolls(&self, to_fetch: &[u32], latest: &LatestRoll, year: i32) -> BatchLedger {
        // 议员识别尚未实现，缓存始终为空
        let legislators = LegislatorCache::new();
        let flow = RollFlow::new(
            &self.config,
            self.tz,
            &self.fetcher,
            &self.store,
            &self.reporter,
            &legislators,
        );

        let mut ledger = BatchLedger::new();
        let total = to_fetch.len();

        for (index, &number) in to_fetch.iter().enumerate() {
            let ctx = RollCtx::new(&self.config.chamber_prefix, number, year, latest);
            log_roll_start(&ctx, index + 1, total);

            let outcome = flow.run(&ctx, &mut ledger.missing_legislators).await;
            ledger.record(number, outcome);
        }

        ledger
    }
}

/// 运行无法继续时的失败报告
pub async fn report_fatal<R: Reporter>(reporter: &R, error: &AppError) {
    reporter
        .failure(format!("Fatal Error - {}", error), None)
        .await;
}

fn unparsable_listing_message(label: &str, probe: &ListingProbe) -> String {
    let show = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_default();
    format!(
        "Couldn't figure out latest roll, or session, or subsession, from the {} page, aborting.\nlatest_roll: {}, session: {}, subsession: {}",
        label,
        show(probe.number),
        show(probe.session),
        show(probe.subsession)
    )
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config, year: i32) {
    info!("{}", "=".repeat(60));
    info!("🚀 {} 点名投票抓取 - {} 年", config.chamber_label(), year);
    info!("🌐 列表页: {}", config.listing_url);
    info!("📊 检查窗口: 最近 {} 条", config.window_size);
    info!("{}", "=".repeat(60));
}

fn log_roll_start(ctx: &RollCtx, position: usize, total: usize) {
    info!("{} {}", ctx, "─".repeat(30));
    info!("{} 处理第 {}/{} 条", ctx, position, total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportStatus;
    use serde_json::Value as JsonValue;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Collected(RefCell<Vec<(ReportStatus, String, Option<JsonValue>)>>);

    impl Reporter for Collected {
        async fn file(&self, status: ReportStatus, message: String, detail: Option<JsonValue>) {
            self.0.borrow_mut().push((status, message, detail));
        }
    }

    #[tokio::test]
    async fn test_report_fatal() {
        let reporter = Collected::default();
        report_fatal(&reporter, &AppError::missing_element("vote_date")).await;

        let reports = reporter.0.into_inner();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, ReportStatus::Failure);
        assert_eq!(
            reports[0].1,
            "Fatal Error - 解析错误: missing <vote_date> element"
        );
    }

    #[test]
    fn test_unparsable_listing_message_blanks_absent_values() {
        let probe = ListingProbe {
            number: Some(12),
            session: None,
            subsession: Some(0),
        };
        assert!(unparsable_listing_message("Senate", &probe)
            .ends_with("latest_roll: 12, session: , subsession: 0"));
    }
}
