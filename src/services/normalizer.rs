//! 字段规范化 - 业务能力层
//!
//! 只负责把一份投票 XML 变成规范化的字段，不关心存储和流程

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use roxmltree::{Document, ParsingOptions};

use crate::error::{AppError, AppResult};
use crate::models::{LegislatorCache, MissingLegislator, VoteType, VoterIds, Voters};
use crate::services::vote_type::vote_type_for;

/// 上游 `vote_date` 可能出现的格式（空白已被压缩为单个空格）
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y, %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y, %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// 一份已抓取的投票 XML
///
/// 解析时只保留每个元素名第一次出现时的文本，空元素的文本为空串
#[derive(Debug)]
pub struct VoteDocument {
    texts: HashMap<String, String>,
}

impl VoteDocument {
    pub fn parse(xml: &str) -> AppResult<Self> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document =
            Document::parse_with_options(xml, options).map_err(AppError::malformed_xml)?;

        let mut texts = HashMap::new();
        for node in document.descendants().filter(|n| n.is_element()) {
            texts
                .entry(node.tag_name().name().to_string())
                .or_insert_with(|| {
                    node.descendants()
                        .filter(|n| n.is_text())
                        .filter_map(|n| n.text())
                        .collect::<String>()
                });
        }

        Ok(Self { texts })
    }

    /// 第一个同名元素的文本
    pub fn text_of(&self, element: &str) -> Option<String> {
        self.texts.get(element).cloned()
    }

    /// 必需元素的文本（去掉首尾空白）
    fn require(&self, element: &str) -> AppResult<String> {
        self.text_of(element)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| AppError::missing_element(element))
    }

    /// 关联文档名称，例如 `H.R. 3590`
    pub fn document_name(&self) -> Option<String> {
        self.text_of("document_name")
    }
}

/// 从一份文档里取出的投票字段
#[derive(Debug, Clone, PartialEq)]
pub struct VoteFields {
    pub vote_type: VoteType,
    pub roll_type: String,
    pub question: String,
    pub result: String,
    pub required: String,
    pub voted_at: DateTime<FixedOffset>,
}

/// 提取并规范化投票字段
///
/// # 参数
/// - `doc`: 已解析的投票 XML
/// - `tz`: 上游时间所在的时区
pub fn extract_fields(doc: &VoteDocument, tz: Tz) -> AppResult<VoteFields> {
    let roll_type = doc.require("question")?;
    let question = doc.require("vote_question_text")?;
    let result = doc.require("vote_result")?;
    let required = doc.require("majority_requirement")?;
    let voted_at = parse_vote_date(&doc.require("vote_date")?, tz)?;

    Ok(VoteFields {
        vote_type: vote_type_for(&roll_type),
        roll_type,
        question,
        result,
        required,
        voted_at,
    })
}

/// 按指定时区解释上游的本地时间
///
/// 与进程所在时区无关
pub fn parse_vote_date(raw: &str, tz: Tz) -> AppResult<DateTime<FixedOffset>> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let naive = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .ok_or_else(|| AppError::invalid_date(raw.trim()))?;

    // 夏令时跳过的那一小时顺延到下一个有效时刻
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .ok_or_else(|| AppError::invalid_date(raw.trim()))?;

    Ok(local.fixed_offset())
}

/// 议员投票明细
///
/// 尚未实现：始终返回两个空表，`missing` 不会被写入。保留参数是为了以后按 LIS ID
/// 识别议员时不改调用方。
pub fn votes_for(
    _doc: &VoteDocument,
    _legislators: &LegislatorCache,
    _missing: &mut Vec<MissingLegislator>,
) -> (VoterIds, Voters) {
    (VoterIds::new(), Voters::new())
}
