pub mod cloudwatch;
pub mod fetcher;
pub mod traits;

pub use cloudwatch::CloudWatchLogStore;
pub use fetcher::{FetchError, LogFetcher};
pub use traits::{LogStore, LogStoreError, StreamHandle, TailPage, TailRequest};
