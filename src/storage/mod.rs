pub mod cached;
pub mod file;
pub mod http;
pub mod store;
pub mod trait_def;

pub use cached::{current_month, CachedSource};
pub use file::FileSource;
pub use http::HttpSource;
pub use store::{RecordStore, Snapshot};
pub use trait_def::{DatasetSource, SourceError, SourceResult};
