//! 投票处理上下文
//!
//! 封装"我正在处理哪一届哪一次投票"这一信息

use std::fmt::Display;

use crate::services::identifiers::roll_id;
use crate::services::LatestRoll;

/// 单次投票的处理上下文
#[derive(Debug, Clone)]
pub struct RollCtx {
    /// 唯一键，例如 `s12-2024`
    pub roll_id: String,

    /// 投票编号
    pub number: u32,

    /// 年份
    pub year: i32,

    /// 国会届次
    pub session: u32,

    /// 会期
    pub subsession: u32,
}

impl RollCtx {
    /// 创建新的投票上下文
    pub fn new(chamber_prefix: &str, number: u32, year: i32, latest: &LatestRoll) -> Self {
        Self {
            roll_id: roll_id(chamber_prefix, number, year),
            number,
            year,
            session: latest.session,
            subsession: latest.subsession,
        }
    }
}

impl Display for RollCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.roll_id)
    }
}
