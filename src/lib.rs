pub mod api;
pub mod config;
pub mod metrics;
pub mod models;
pub mod report;
pub mod storage;
