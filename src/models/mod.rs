mod dataset;
mod lenient;
mod page;
mod record;

pub use dataset::{Dataset, DatasetError, TOP_PAGES_COLLECTION};
pub use page::PageRecord;
pub use record::{DeviceBreakdown, MetricRecord, TrafficSources};
