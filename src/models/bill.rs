use serde::{Deserialize, Serialize};

/// 投票关联的法案摘要
///
/// 只保存投票记录里需要的字段，完整的法案数据由其他任务维护
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRef {
    pub bill_id: String,
    pub bill_type: String,
    pub number: u32,
    pub session: u32,
    pub chamber: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_title: Option<String>,
}
