// ERCOT MIS report module
//
// Reports are listed on an index page per report type id. Each listing row
// names a zipped CSV artifact whose filename carries the report date.

pub mod index_parser;
pub mod locator;
pub mod table;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::fetch_error::FetchError;

pub use index_parser::{IndexParser, MisIndexParser, ReportIndexEntry};
pub use locator::ReportLocator;
pub use table::RawReportTable;

/// Report kinds published on the ERCOT MIS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    Wind5Min,
    WindHourly,
    GenHourly,
    Load7Day,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        ReportType::Wind5Min,
        ReportType::WindHourly,
        ReportType::GenHourly,
        ReportType::Load7Day,
    ];

    /// The `reportTypeId` query parameter for the index page
    pub fn type_id(&self) -> &'static str {
        match self {
            ReportType::Wind5Min => "13071",
            ReportType::WindHourly => "13028",
            ReportType::GenHourly => "12358",
            ReportType::Load7Day => "12311",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportType::Wind5Min => "wind_5min",
            ReportType::WindHourly => "wind_hrly",
            ReportType::GenHourly => "gen_hrly",
            ReportType::Load7Day => "load_7day",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportType {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportType::ALL
            .into_iter()
            .find(|report_type| report_type.name() == s)
            .ok_or_else(|| FetchError::UnknownReportType(s.to_string()))
    }
}

/// One report lookup: which report, and optionally which day's artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub target_date: Option<DateTime<Utc>>,
}

impl ReportRequest {
    pub fn new(report_type: ReportType, target_date: Option<DateTime<Utc>>) -> Self {
        Self {
            report_type,
            target_date,
        }
    }

    /// Build a request from a report name, failing fast on unknown names
    pub fn parse(name: &str, target_date: Option<DateTime<Utc>>) -> Result<Self, FetchError> {
        Ok(Self::new(name.parse()?, target_date))
    }
}
