use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::bill::BillRef;

/// 投票类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    /// 通过法案/决议
    Passage,
    /// 终止辩论
    Cloture,
    /// 人事任命
    Nomination,
    /// 修正案
    Amendment,
    /// 发回委员会
    Recommit,
    /// 条约批准
    Treaty,
    /// 弹劾
    Impeachment,
    /// 法定人数点名
    Quorum,
    /// 领导层选举
    Leadership,
    /// 其他
    Other,
}

impl VoteType {
    /// 存储中使用的名称
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Passage => "passage",
            VoteType::Cloture => "cloture",
            VoteType::Nomination => "nomination",
            VoteType::Amendment => "amendment",
            VoteType::Recommit => "recommit",
            VoteType::Treaty => "treaty",
            VoteType::Impeachment => "impeachment",
            VoteType::Quorum => "quorum",
            VoteType::Leadership => "leadership",
            VoteType::Other => "other",
        }
    }

    /// 从存储名称解析
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "passage" => Some(VoteType::Passage),
            "cloture" => Some(VoteType::Cloture),
            "nomination" => Some(VoteType::Nomination),
            "amendment" => Some(VoteType::Amendment),
            "recommit" => Some(VoteType::Recommit),
            "treaty" => Some(VoteType::Treaty),
            "impeachment" => Some(VoteType::Impeachment),
            "quorum" => Some(VoteType::Quorum),
            "leadership" => Some(VoteType::Leadership),
            "other" => Some(VoteType::Other),
            _ => None,
        }
    }
}

/// 一次点名投票记录
///
/// `roll_id` 是唯一键，格式为 `{议院前缀}{编号}-{年份}`，例如 `s12-2024`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub roll_id: String,
    pub chamber: String,
    /// 固定为 "roll"
    pub how: String,
    pub year: i32,
    pub number: u32,
    pub session: u32,

    pub vote_type: VoteType,
    pub roll_type: String,
    pub question: String,
    pub result: String,
    pub required: String,

    /// 已换算到议院所在时区的投票时间
    pub voted_at: DateTime<FixedOffset>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill: Option<BillRef>,
}

impl Vote {
    /// 关联已存在的法案
    pub fn attach_bill(&mut self, bill: BillRef) {
        self.bill_id = Some(bill.bill_id.clone());
        self.bill = Some(bill);
    }

    /// 保存前的校验，返回全部错误信息
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.roll_id.trim().is_empty() {
            errors.push("Roll id can't be blank".to_string());
        }
        if self.chamber.trim().is_empty() {
            errors.push("Chamber can't be blank".to_string());
        }
        if self.question.trim().is_empty() {
            errors.push("Question can't be blank".to_string());
        }
        if self.result.trim().is_empty() {
            errors.push("Result can't be blank".to_string());
        }
        if self.number == 0 {
            errors.push("Number must be greater than 0".to_string());
        }
        if self.session == 0 {
            errors.push("Session must be greater than 0".to_string());
        }
        if self.year <= 0 {
            errors.push("Year must be greater than 0".to_string());
        }

        errors
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_vote() -> Vote {
        Vote {
            roll_id: "s12-2024".to_string(),
            chamber: "senate".to_string(),
            how: "roll".to_string(),
            year: 2024,
            number: 12,
            session: 118,
            vote_type: VoteType::Passage,
            roll_type: "On Passage of the Bill".to_string(),
            question: "On Passage of the Bill (H.R. 815)".to_string(),
            result: "Bill Passed".to_string(),
            required: "1/2".to_string(),
            voted_at: FixedOffset::west_opt(5 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 2, 13, 7, 12, 0)
                .unwrap(),
            bill_id: None,
            bill: None,
        }
    }

    #[test]
    fn test_valid_vote_has_no_errors() {
        assert!(sample_vote().validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let vote = Vote {
            question: "  ".to_string(),
            result: String::new(),
            number: 0,
            ..sample_vote()
        };

        let errors = vote.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&"Question can't be blank".to_string()));
    }

    #[test]
    fn test_vote_type_names() {
        for vote_type in [VoteType::Passage, VoteType::Cloture, VoteType::Other] {
            assert_eq!(VoteType::from_name(vote_type.as_str()), Some(vote_type));
        }
        assert_eq!(VoteType::from_name("unknown"), None);
    }
}
