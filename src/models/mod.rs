pub mod bill;
pub mod report;
pub mod vote;
pub mod voter;

pub use bill::BillRef;
pub use report::{Report, ReportStatus};
pub use vote::{Vote, VoteType};
pub use voter::{Legislator, LegislatorCache, MissingLegislator, VoterDetail, VoterIds, Voters};
