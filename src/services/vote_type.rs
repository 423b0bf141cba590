//! 投票类型分类
//!
//! 纯函数：原始问题文本 → [`VoteType`]，按顺序匹配，先命中者优先

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::VoteType;

static RULES: Lazy<Vec<(Regex, VoteType)>> = Lazy::new(|| {
    [
        (r"(?i)cloture", VoteType::Cloture),
        (r"(?i)resolution of ratification", VoteType::Treaty),
        (r"(?i)^on the nomination", VoteType::Nomination),
        (r"(?i)^guilty or not guilty", VoteType::Impeachment),
        (r"(?i)recommit", VoteType::Recommit),
        (r"(?i)amendment", VoteType::Amendment),
        (
            r"(?i)^(on passage|on the (joint |concurrent )?resolution|on the conference report|on overriding the veto|on (the motion to )?concur|passage, objections of the president)",
            VoteType::Passage,
        ),
        (r"(?i)(call of the house|quorum)", VoteType::Quorum),
        (r"(?i)election of the speaker", VoteType::Leadership),
    ]
    .into_iter()
    .map(|(pattern, vote_type)| {
        (
            Regex::new(pattern).expect("hardcoded vote type pattern"),
            vote_type,
        )
    })
    .collect()
});

/// 根据原始问题文本判断投票类型
pub fn vote_type_for(roll_type: &str) -> VoteType {
    let roll_type = roll_type.trim();
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(roll_type))
        .map(|(_, vote_type)| *vote_type)
        .unwrap_or(VoteType::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_senate_questions() {
        let cases = [
            ("On Passage of the Bill", VoteType::Passage),
            ("On the Joint Resolution", VoteType::Passage),
            ("On the Resolution", VoteType::Passage),
            ("On the Conference Report", VoteType::Passage),
            ("On Overriding the Veto", VoteType::Passage),
            ("On the Cloture Motion", VoteType::Cloture),
            ("On Cloture on the Motion to Proceed", VoteType::Cloture),
            ("On the Nomination", VoteType::Nomination),
            ("On the Amendment", VoteType::Amendment),
            ("On the Motion to Table the Amendment", VoteType::Amendment),
            ("On the Motion to Recommit", VoteType::Recommit),
            ("On the Resolution of Ratification", VoteType::Treaty),
            ("Guilty or Not Guilty", VoteType::Impeachment),
            ("On the Motion to Instruct Conferees", VoteType::Other),
            ("On the Decision of the Chair", VoteType::Other),
        ];

        for (question, expected) in cases {
            assert_eq!(vote_type_for(question), expected, "{}", question);
        }
    }

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!(vote_type_for("  on passage of the bill\n"), VoteType::Passage);
        assert_eq!(vote_type_for(""), VoteType::Other);
    }
}
