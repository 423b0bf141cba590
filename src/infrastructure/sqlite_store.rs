//! SQLite 存储 - 基础设施层
//!
//! 持有数据库连接池，只暴露按键查询与写入的能力

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{AppResult, SaveError, StoreError};
use crate::models::{BillRef, Report, Vote};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS votes (
    roll_id     TEXT PRIMARY KEY,
    chamber     TEXT NOT NULL,
    how         TEXT NOT NULL,
    year        INTEGER NOT NULL,
    number      INTEGER NOT NULL,
    session     INTEGER NOT NULL,
    vote_type   TEXT NOT NULL,
    roll_type   TEXT NOT NULL,
    question    TEXT NOT NULL,
    result      TEXT NOT NULL,
    required    TEXT NOT NULL,
    voted_at    TEXT NOT NULL,
    bill_id     TEXT,
    bill        TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bills (
    bill_id         TEXT PRIMARY KEY,
    bill_type       TEXT NOT NULL,
    number          INTEGER NOT NULL,
    session         INTEGER NOT NULL,
    chamber         TEXT NOT NULL,
    short_title     TEXT,
    official_title  TEXT
);

CREATE TABLE IF NOT EXISTS reports (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    status      TEXT NOT NULL,
    source      TEXT NOT NULL,
    message     TEXT NOT NULL,
    detail      TEXT,
    read        INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
"#;

/// 投票存储能力
#[allow(async_fn_in_trait)]
pub trait VoteStore {
    /// 是否已存在该 roll_id 的投票
    async fn vote_exists(&self, roll_id: &str) -> AppResult<bool>;

    /// 按 bill_id 查找法案
    async fn find_bill(&self, bill_id: &str) -> AppResult<Option<BillRef>>;

    /// 新建投票记录，roll_id 唯一
    async fn create_vote(&self, vote: &Vote) -> Result<(), SaveError>;
}

/// 基于 sqlx 的 SQLite 存储
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// 连接数据库并建表
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            // 内存库每个连接都是独立的数据库，连接不能被回收
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// 写入或更新法案（由法案任务或测试预置）
    pub async fn upsert_bill(&self, bill: &BillRef) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bills (bill_id, bill_type, number, session, chamber, short_title, official_title)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(bill_id) DO UPDATE SET
                bill_type = excluded.bill_type,
                number = excluded.number,
                session = excluded.session,
                chamber = excluded.chamber,
                short_title = excluded.short_title,
                official_title = excluded.official_title
            "#,
        )
        .bind(&bill.bill_id)
        .bind(&bill.bill_type)
        .bind(bill.number)
        .bind(bill.session)
        .bind(&bill.chamber)
        .bind(&bill.short_title)
        .bind(&bill.official_title)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 按 roll_id 读取投票
    pub async fn find_vote(&self, roll_id: &str) -> AppResult<Option<Vote>> {
        let row = sqlx::query(
            r#"
            SELECT roll_id, chamber, how, year, number, session, vote_type, roll_type,
                   question, result, required, voted_at, bill_id, bill
            FROM votes WHERE roll_id = ?
            "#,
        )
        .bind(roll_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let vote_type: String = row.try_get("vote_type")?;
        let voted_at: String = row.try_get("voted_at")?;
        let bill: Option<String> = row.try_get("bill")?;

        Ok(Some(Vote {
            roll_id: row.try_get("roll_id")?,
            chamber: row.try_get("chamber")?,
            how: row.try_get("how")?,
            year: row.try_get("year")?,
            number: row.try_get("number")?,
            session: row.try_get("session")?,
            vote_type: crate::models::VoteType::from_name(&vote_type).ok_or_else(|| {
                StoreError::InvalidColumn {
                    column: "vote_type".to_string(),
                    value: vote_type.clone(),
                }
            })?,
            roll_type: row.try_get("roll_type")?,
            question: row.try_get("question")?,
            result: row.try_get("result")?,
            required: row.try_get("required")?,
            voted_at: DateTime::parse_from_rfc3339(&voted_at).map_err(|_| {
                StoreError::InvalidColumn {
                    column: "voted_at".to_string(),
                    value: voted_at.clone(),
                }
            })?,
            bill_id: row.try_get("bill_id")?,
            bill: bill.map(|json| serde_json::from_str(&json)).transpose()?,
        }))
    }

    /// 写入一条报告
    pub async fn insert_report(&self, report: &Report) -> AppResult<()> {
        let detail = report
            .detail
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO reports (status, source, message, detail, read, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(report.status.as_str())
        .bind(&report.source)
        .bind(&report.message)
        .bind(detail)
        .bind(report.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 未读报告数量
    pub async fn unread_report_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE read = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

impl VoteStore for SqliteStore {
    async fn vote_exists(&self, roll_id: &str) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM votes WHERE roll_id = ?")
            .bind(roll_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn find_bill(&self, bill_id: &str) -> AppResult<Option<BillRef>> {
        let row = sqlx::query(
            r#"
            SELECT bill_id, bill_type, number, session, chamber, short_title, official_title
            FROM bills WHERE bill_id = ?
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(BillRef {
            bill_id: row.try_get("bill_id")?,
            bill_type: row.try_get("bill_type")?,
            number: row.try_get("number")?,
            session: row.try_get("session")?,
            chamber: row.try_get("chamber")?,
            short_title: row.try_get("short_title")?,
            official_title: row.try_get("official_title")?,
        }))
    }

    async fn create_vote(&self, vote: &Vote) -> Result<(), SaveError> {
        let mut errors = vote.validate();
        if self.vote_exists(&vote.roll_id).await? {
            errors.push("Roll id is already taken".to_string());
        }
        if !errors.is_empty() {
            return Err(SaveError::Validation(errors));
        }

        let bill = vote
            .bill
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| SaveError::Store(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO votes (roll_id, chamber, how, year, number, session, vote_type, roll_type,
                               question, result, required, voted_at, bill_id, bill, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vote.roll_id)
        .bind(&vote.chamber)
        .bind(&vote.how)
        .bind(vote.year)
        .bind(vote.number)
        .bind(vote.session)
        .bind(vote.vote_type.as_str())
        .bind(&vote.roll_type)
        .bind(&vote.question)
        .bind(&vote.result)
        .bind(&vote.required)
        .bind(vote.voted_at.to_rfc3339())
        .bind(&vote.bill_id)
        .bind(bill)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("[{}] 已写入 votes 表", vote.roll_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vote::tests::sample_vote;
    use crate::models::ReportStatus;

    async fn setup_test_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database")
    }

    fn sample_bill() -> BillRef {
        BillRef {
            bill_id: "hr815-118".to_string(),
            bill_type: "hr".to_string(),
            number: 815,
            session: 118,
            chamber: "house".to_string(),
            short_title: None,
            official_title: Some("Making emergency supplemental appropriations".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_vote() {
        let store = setup_test_store().await;
        let mut vote = sample_vote();
        vote.attach_bill(sample_bill());

        assert!(!store.vote_exists("s12-2024").await.unwrap());
        store.create_vote(&vote).await.unwrap();
        assert!(store.vote_exists("s12-2024").await.unwrap());

        let stored = store.find_vote("s12-2024").await.unwrap().unwrap();
        assert_eq!(stored, vote);
    }

    #[tokio::test]
    async fn test_duplicate_roll_id_is_rejected() {
        let store = setup_test_store().await;
        store.create_vote(&sample_vote()).await.unwrap();

        let err = store.create_vote(&sample_vote()).await.unwrap_err();
        assert_eq!(err.messages(), vec!["Roll id is already taken".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_vote_is_not_written() {
        let store = setup_test_store().await;
        let vote = Vote {
            result: String::new(),
            ..sample_vote()
        };

        let err = store.create_vote(&vote).await.unwrap_err();
        assert!(matches!(err, SaveError::Validation(_)));
        assert!(!store.vote_exists(&vote.roll_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_and_find_bill() {
        let store = setup_test_store().await;
        assert_eq!(store.find_bill("hr815-118").await.unwrap(), None);

        store.upsert_bill(&sample_bill()).await.unwrap();
        let mut renamed = sample_bill();
        renamed.short_title = Some("Supplemental Appropriations".to_string());
        store.upsert_bill(&renamed).await.unwrap();

        assert_eq!(store.find_bill("hr815-118").await.unwrap(), Some(renamed));
    }

    #[test]
    fn test_insert_report() {
        tokio_test::block_on(async {
            let store = setup_test_store().await;
            let report = Report::new(
                ReportStatus::Warning,
                "RollsLiveSenate",
                "Timeout error",
                Some(serde_json::json!({ "timed_out": [3, 4] })),
            );

            store.insert_report(&report).await.unwrap();
            assert_eq!(store.unread_report_count().await.unwrap(), 1);
        });
    }
}
