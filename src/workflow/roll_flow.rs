//! 投票处理流程 - 流程层
//!
//! 核心职责：定义"一次投票"的完整处理流程
//!
//! 流程顺序：
//! 1. 抓取并解析 XML（超时则跳过）
//! 2. 规范化字段 → 组装投票记录
//! 3. 关联法案（找不到只告警）
//! 4. 保存

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{Fetcher, VoteStore};
use crate::models::{LegislatorCache, MissingLegislator, Vote};
use crate::services::identifiers::{bill_id_for, url_for};
use crate::services::normalizer::{self, VoteDocument};
use crate::services::Reporter;
use crate::workflow::roll_ctx::RollCtx;

/// 抓取结果
pub enum FetchOutcome {
    /// 取到了文档
    Document(VoteDocument),
    /// 请求超时
    TimedOut,
    /// 其他网络错误
    Failed(String),
    /// 取到了内容但不是合法的 XML
    Malformed(String),
}

/// 一条保存失败的投票
#[derive(Debug, Clone, Serialize)]
pub struct BadVote {
    pub roll_id: String,
    pub number: u32,
    pub error_messages: Vec<String>,
    /// 保存前的完整属性（文档无法解析时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<JsonValue>,
}

/// 投票处理结果
#[derive(Debug)]
pub enum RollOutcome {
    /// 保存成功
    Saved(Vote),
    /// 抓取超时，已跳过
    TimedOut,
    /// 无法保存
    Rejected(BadVote),
}

/// 投票处理流程
///
/// - 只处理单个投票
/// - 不重试，结果交给编排层汇总
/// - 不持有任何资源，只借用
pub struct RollFlow<'a, F, S, R> {
    fetcher: &'a F,
    store: &'a S,
    reporter: &'a R,
    legislators: &'a LegislatorCache,
    config: &'a Config,
    tz: Tz,
}

impl<'a, F, S, R> RollFlow<'a, F, S, R>
where
    F: Fetcher,
    S: VoteStore,
    R: Reporter,
{
    /// 创建新的投票处理流程
    pub fn new(
        config: &'a Config,
        tz: Tz,
        fetcher: &'a F,
        store: &'a S,
        reporter: &'a R,
        legislators: &'a LegislatorCache,
    ) -> Self {
        Self {
            fetcher,
            store,
            reporter,
            legislators,
            config,
            tz,
        }
    }

    pub async fn run(&self, ctx: &RollCtx, missing: &mut Vec<MissingLegislator>) -> RollOutcome {
        let url = url_for(
            &self.config.vote_url_base,
            ctx.number,
            ctx.session,
            ctx.subsession,
        );

        // ========== 1. 抓取 ==========
        let doc = match self.fetch(&url).await {
            FetchOutcome::Document(doc) => doc,
            FetchOutcome::TimedOut => {
                warn!("{} ⏱️ 抓取超时，跳过: {}", ctx, url);
                return RollOutcome::TimedOut;
            }
            FetchOutcome::Failed(message) => {
                error!("{} 抓取失败: {}", ctx, message);
                return RollOutcome::Rejected(bad_vote(ctx, vec![message], None));
            }
            FetchOutcome::Malformed(message) => {
                error!("{} 文档无法解析: {}", ctx, message);
                return RollOutcome::Rejected(bad_vote(ctx, vec![message], None));
            }
        };

        // ========== 2. 组装投票记录 ==========
        let bill_id = doc
            .document_name()
            .and_then(|name| bill_id_for(&name, ctx.session));
        let (_voter_ids, _voters) = normalizer::votes_for(&doc, self.legislators, missing);

        let fields = match normalizer::extract_fields(&doc, self.tz) {
            Ok(fields) => fields,
            Err(e) => {
                error!("{} 文档无法解析: {}", ctx, e);
                return RollOutcome::Rejected(bad_vote(ctx, vec![e.to_string()], None));
            }
        };
        drop(doc);

        let mut vote = Vote {
            roll_id: ctx.roll_id.clone(),
            chamber: self.config.chamber.clone(),
            how: "roll".to_string(),
            year: ctx.year,
            number: ctx.number,
            session: ctx.session,
            vote_type: fields.vote_type,
            roll_type: fields.roll_type,
            question: fields.question,
            result: fields.result,
            required: fields.required,
            voted_at: fields.voted_at,
            bill_id: None,
            bill: None,
        };

        // ========== 3. 关联法案 ==========
        if let Some(bill_id) = bill_id {
            self.attach_bill(ctx, &mut vote, &bill_id).await;
        }

        // ========== 4. 保存 ==========
        match self.store.create_vote(&vote).await {
            Ok(()) => {
                info!("{} ✓ Saved successfully", ctx);
                RollOutcome::Saved(vote)
            }
            Err(e) => {
                warn!("{} ⚠️ Error saving, will file report: {}", ctx, e);
                let attributes = serde_json::to_value(&vote).ok();
                RollOutcome::Rejected(bad_vote(ctx, e.messages(), attributes))
            }
        }
    }

    /// 抓取单个投票 XML
    async fn fetch(&self, url: &str) -> FetchOutcome {
        match self.fetcher.fetch_text(url).await {
            Ok(body) => match VoteDocument::parse(&body) {
                Ok(doc) => FetchOutcome::Document(doc),
                Err(e) => FetchOutcome::Malformed(e.to_string()),
            },
            Err(e) if e.is_timeout() => FetchOutcome::TimedOut,
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    /// 查找法案并挂到投票上，找不到时发出告警
    async fn attach_bill(&self, ctx: &RollCtx, vote: &mut Vote, bill_id: &str) {
        match self.store.find_bill(bill_id).await {
            Ok(Some(bill)) => {
                info!("{} 🔗 关联法案 {}", ctx, bill_id);
                vote.attach_bill(bill);
                return;
            }
            Ok(None) => {}
            Err(e) => error!("{} 查询法案 {} 失败: {}", ctx, bill_id, e),
        }

        self.reporter
            .warning(
                format!(
                    "Found bill_id {} on {} roll no. {}, which isn't in the database.",
                    bill_id,
                    self.config.chamber_label(),
                    ctx.number
                ),
                None,
            )
            .await;
    }
}

fn bad_vote(ctx: &RollCtx, error_messages: Vec<String>, attributes: Option<JsonValue>) -> BadVote {
    BadVote {
        roll_id: ctx.roll_id.clone(),
        number: ctx.number,
        error_messages,
        attributes,
    }
}
