//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次运行的调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量投票处理器
//! - 持有抓取器、存储和报告
//! - 列表页 → 缺口检测 → 逐条处理 → 汇总报告
//!
//! ### `ledger` - 批次结果汇总
//! - 累加每条投票的结果
//! - 运行结束时按固定顺序发出报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<u32>)
//!     ↓
//! workflow::RollFlow (处理单次投票)
//!     ↓
//! services (能力层：identifiers / listing / normalizer / gap_detector / reporter)
//!     ↓
//! infrastructure (基础设施：Fetcher / VoteStore)
//! ```

pub mod batch_processor;
pub mod ledger;

// 重新导出主要类型
pub use batch_processor::{report_fatal, App};
pub use ledger::{BatchLedger, RunStatus, RunSummary};
