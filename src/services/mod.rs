pub mod gap_detector;
pub mod identifiers;
pub mod listing;
pub mod normalizer;
pub mod reporter;
pub mod vote_type;

pub use listing::{LatestRoll, ListingProbe};
pub use normalizer::{VoteDocument, VoteFields};
pub use reporter::{LogReporter, Reporter, StoreReporter};
