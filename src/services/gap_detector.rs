//! 缺口检测 - 业务能力层
//!
//! 检查最新编号往前一个窗口内哪些投票还不在数据库里

use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::VoteStore;
use crate::services::identifiers::roll_id;

/// 窗口内的候选编号，升序，不含 0
pub fn window(latest: u32, size: u32) -> std::ops::RangeInclusive<u32> {
    let start = latest.saturating_sub(size.saturating_sub(1)).max(1);
    start..=latest
}

/// 找出窗口内尚未保存的投票编号
///
/// # 参数
/// - `store`: 投票存储
/// - `chamber_prefix`: roll_id 前缀
/// - `latest`: 列表页上的最新编号
/// - `year`: 当前年份
/// - `size`: 窗口大小
///
/// # 返回
/// 升序排列的缺失编号
pub async fn missing_rolls<S: VoteStore>(
    store: &S,
    chamber_prefix: &str,
    latest: u32,
    year: i32,
    size: u32,
) -> AppResult<Vec<u32>> {
    unsaved_rolls(store, chamber_prefix, window(latest, size), year).await
}

/// 把任意编号列表整理成工作列表：去掉 0，升序去重，跳过已保存的
pub async fn unsaved_rolls<S: VoteStore>(
    store: &S,
    chamber_prefix: &str,
    numbers: impl IntoIterator<Item = u32>,
    year: i32,
) -> AppResult<Vec<u32>> {
    let mut candidates: Vec<u32> = numbers.into_iter().filter(|n| *n > 0).collect();
    candidates.sort_unstable();
    candidates.dedup();

    let mut to_fetch = Vec::with_capacity(candidates.len());
    for number in candidates {
        let id = roll_id(chamber_prefix, number, year);
        if store.vote_exists(&id).await? {
            debug!("[{}] 已存在，跳过", id);
        } else {
            to_fetch.push(number);
        }
    }

    Ok(to_fetch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaveError;
    use crate::models::{BillRef, Vote};
    use std::collections::HashSet;

    struct ExistingRolls(HashSet<String>);

    impl VoteStore for ExistingRolls {
        async fn vote_exists(&self, roll_id: &str) -> AppResult<bool> {
            Ok(self.0.contains(roll_id))
        }

        async fn find_bill(&self, _bill_id: &str) -> AppResult<Option<BillRef>> {
            Ok(None)
        }

        async fn create_vote(&self, _vote: &Vote) -> Result<(), SaveError> {
            Ok(())
        }
    }

    #[test]
    fn test_window_bounds() {
        assert_eq!(window(120, 20), 101..=120);
        assert_eq!(window(5, 20), 1..=5);
        assert_eq!(window(20, 20), 1..=20);
        assert_eq!(window(7, 1), 7..=7);
    }

    #[tokio::test]
    async fn test_nothing_persisted() {
        let store = ExistingRolls(HashSet::new());
        let missing = missing_rolls(&store, "s", 120, 2024, 20).await.unwrap();
        assert_eq!(missing, (101..=120).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_everything_persisted() {
        let store = ExistingRolls((101..=120).map(|n| roll_id("s", n, 2024)).collect());
        let missing = missing_rolls(&store, "s", 120, 2024, 20).await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_gaps_keep_ascending_order() {
        let store = ExistingRolls(
            [101, 102, 110, 119]
                .into_iter()
                .map(|n| roll_id("s", n, 2024))
                .chain(std::iter::once(roll_id("s", 103, 2023)))
                .collect(),
        );

        let missing = missing_rolls(&store, "s", 120, 2024, 20).await.unwrap();

        assert_eq!(missing.len(), 16);
        assert_eq!(missing.first(), Some(&103));
        assert_eq!(missing.last(), Some(&120));
        assert!(missing.windows(2).all(|w| w[0] < w[1]));
        assert!(!missing.contains(&110));
    }

    #[tokio::test]
    async fn test_explicit_list_is_normalized() {
        let store = ExistingRolls([roll_id("s", 4, 2024)].into_iter().collect());
        let to_fetch = unsaved_rolls(&store, "s", [5, 3, 5, 0, 4, 1], 2024)
            .await
            .unwrap();
        assert_eq!(to_fetch, vec![1, 3, 5]);
    }
}
