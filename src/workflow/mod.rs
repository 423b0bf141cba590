pub mod roll_ctx;
pub mod roll_flow;

pub use roll_ctx::RollCtx;
pub use roll_flow::{BadVote, FetchOutcome, RollFlow, RollOutcome};
