pub mod client;
pub mod config;
pub mod fetch_error;
pub mod models;
pub mod normalize;
pub mod options;
pub mod report;
pub mod timezone;
pub mod transport;
pub mod utils;

pub use client::ErcotClient;
pub use fetch_error::FetchError;
pub use models::{DataKind, Frequency, FuelName, GenerationRecord, LoadRecord, Market, Record};
pub use options::Options;
pub use report::{ReportRequest, ReportType};
