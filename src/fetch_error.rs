#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("ERCOT: No report available for {report_type}")]
    NotAvailable { report_type: String },
    #[error("Failed to parse document: {0}")]
    ParseError(String),
    #[error("Failed to parse date/time: {0}")]
    DateTimeError(String),
    #[error("Failed to parse number: {0}")]
    NumberError(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("Unknown report type: {0}")]
    UnknownReportType(String),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("Failed to read CSV payload: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read report archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl FetchError {
    /// True for the absence-of-data outcome that callers may absorb.
    pub fn is_not_available(&self) -> bool {
        matches!(self, FetchError::NotAvailable { .. })
    }
}
