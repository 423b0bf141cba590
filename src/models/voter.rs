//! 议员投票明细（尚未实现解析，仅保留接口形状）

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 议员信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legislator {
    pub bioguide_id: String,
    pub lis_id: String,
    pub first_name: String,
    pub last_name: String,
    pub party: String,
    pub state: String,
}

/// 单个议员的投票
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoterDetail {
    pub vote: String,
    pub voter: Legislator,
}

/// 以 LIS ID 为键的议员缓存
pub type LegislatorCache = HashMap<String, Legislator>;

/// bioguide_id → 投票选项
pub type VoterIds = HashMap<String, String>;

/// bioguide_id → 投票明细
pub type Voters = HashMap<String, VoterDetail>;

/// 无法识别的议员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingLegislator {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}
