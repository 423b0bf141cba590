pub mod http_fetcher;
pub mod sqlite_store;

pub use http_fetcher::{Fetcher, ReqwestFetcher};
pub use sqlite_store::{SqliteStore, VoteStore};
