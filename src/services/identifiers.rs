//! 标识符构造 - 业务能力层
//!
//! roll_id、抓取 URL、bill_id 的拼接规则都集中在这里

use once_cell::sync::Lazy;
use regex::Regex;

/// 存储约定中的法案类型
static BILL_TYPES: phf::Set<&'static str> = phf::phf_set! {
    "hr", "hres", "hjres", "hcres", "s", "sres", "sjres", "scres"
};

/// 字母类型 + 数字编号
static BILL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)(\d+)$").expect("hardcoded bill code pattern"));

/// 构造 roll_id，例如 `s12-2024`
pub fn roll_id(chamber_prefix: &str, number: u32, year: i32) -> String {
    format!("{}{}-{}", chamber_prefix, number, year)
}

/// 把编号补零到 5 位，超过 5 位的原样输出
///
/// 上游 URL 依赖这个宽度
pub fn zero_prefix(number: u32) -> String {
    format!("{:05}", number)
}

/// 单次投票 XML 的地址
pub fn url_for(base: &str, number: u32, session: u32, subsession: u32) -> String {
    format!(
        "{base}/vote{session}{subsession}/vote_{session}_{subsession}_{padded}.xml",
        base = base.trim_end_matches('/'),
        padded = zero_prefix(number),
    )
}

/// 从文档名称推导 bill_id
///
/// `"H. CON. RES. 45"` + 110 → `"hcres45-110"`；类型不在词表内时返回 `None`
pub fn bill_id_for(document_name: &str, session: u32) -> Option<String> {
    let code: String = document_name
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '.')
        .collect::<String>()
        .to_lowercase();

    let captures = BILL_CODE.captures(&code)?;
    let mut bill_type = &captures[1];
    let number = &captures[2];

    // 众议院写作 H CON RES
    if bill_type == "hconres" {
        bill_type = "hcres";
    }

    if !BILL_TYPES.contains(bill_type) {
        return None;
    }

    Some(format!("{}{}-{}", bill_type, number, session))
}
