//! 最新投票定位 - 业务能力层
//!
//! 从参议院投票列表页找出最新的投票编号，以及抓取 XML 所需的届次/会期

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::Fetcher;

static FIRST_ENTRY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.contenttext a").expect("hardcoded listing selector"));

static CONGRESS_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)congress=(\d+)").expect("hardcoded congress pattern"));

static SESSION_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)session=(\d+)").expect("hardcoded session pattern"));

/// 列表页上能确定的最新状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestRoll {
    pub number: u32,
    /// 国会届次
    pub session: u32,
    /// 会期
    pub subsession: u32,
}

/// 从列表页读出的原始值，任一项可能缺失或为 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingProbe {
    pub number: Option<u64>,
    pub session: Option<u64>,
    pub subsession: Option<u64>,
}

impl ListingProbe {
    /// 三个值都是正整数时才返回结果
    pub fn resolve(&self) -> Option<LatestRoll> {
        let positive = |v: Option<u64>| v.filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok());

        Some(LatestRoll {
            number: positive(self.number)?,
            session: positive(self.session)?,
            subsession: positive(self.subsession)?,
        })
    }
}

/// 解析列表页 HTML
pub fn parse_listing(html: &str) -> ListingProbe {
    let document = Html::parse_document(html);

    let Some(element) = document.select(&FIRST_ENTRY).next() else {
        debug!("列表页中没有找到 td.contenttext a");
        return ListingProbe::default();
    };

    let text = element.text().collect::<String>();
    let href = element.value().attr("href").unwrap_or_default();
    debug!("列表页第一项: text='{}', href='{}'", text.trim(), href);

    ListingProbe {
        number: leading_integer(&text),
        session: capture_number(&CONGRESS_PARAM, href),
        subsession: capture_number(&SESSION_PARAM, href),
    }
}

/// 解析列表页并直接给出结果
pub fn parse_latest_roll(html: &str) -> Option<LatestRoll> {
    parse_listing(html).resolve()
}

/// 抓取并解析列表页
///
/// 超时和其他网络错误以 `Err` 返回，页面内容不可用以 `Ok(probe)` 返回，由调用方 `resolve()`
pub async fn latest_roll_info<F: Fetcher>(fetcher: &F, listing_url: &str) -> AppResult<ListingProbe> {
    let html = fetcher.fetch_text(listing_url).await?;
    Ok(parse_listing(&html))
}

/// 取文本开头的数字，没有数字时为 0
fn leading_integer(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    Some(digits.parse().unwrap_or(0))
}

fn capture_number(pattern: &Regex, haystack: &str) -> Option<u64> {
    pattern
        .captures(haystack)
        .and_then(|c| c[1].parse().ok())
}
