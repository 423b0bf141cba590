//! # Rolls Live Senate
//!
//! 抓取参议院网站上新发布的点名投票，规范化后存入数据库
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端、数据库连接池），只暴露能力
//! - `Fetcher` - 按 URL 取回文本，超时单独区分
//! - `VoteStore` - 按键查询投票/法案，新建投票
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个投票
//! - `identifiers` - roll_id / URL / bill_id
//! - `listing` - 定位最新投票
//! - `normalizer` - 字段规范化
//! - `gap_detector` - 缺口检测
//! - `reporter` - 报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次投票"的完整处理流程
//! - `RollCtx` - 上下文封装（roll_id + 届次/会期）
//! - `RollFlow` - 流程编排（抓取 → 规范化 → 关联法案 → 保存）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 一次完整运行
//! - `orchestrator/ledger` - 结果汇总与最终报告

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, RunOptions};
pub use error::{AppError, AppResult, SaveError};
pub use infrastructure::{Fetcher, ReqwestFetcher, SqliteStore, VoteStore};
pub use models::{BillRef, Report, ReportStatus, Vote, VoteType};
pub use orchestrator::{report_fatal, App, RunStatus, RunSummary};
pub use services::{LogReporter, Reporter, StoreReporter};
pub use workflow::{RollCtx, RollFlow, RollOutcome};
