use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, error, info, instrument, warn};

use super::index_parser::{IndexParser, MisIndexParser, ReportIndexEntry};
use super::table::RawReportTable;
use super::{ReportRequest, ReportType};
use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::timezone::OPERATOR_TZ;
use crate::transport::{unzip, HttpTransport};
use crate::utils::floor_to_five_minutes;

/// Finds a report artifact on the MIS index and downloads it
#[derive(Clone)]
pub struct ReportLocator<P = MisIndexParser> {
    transport: HttpTransport,
    config: Config,
    parser: P,
}

impl ReportLocator<MisIndexParser> {
    pub fn new(transport: HttpTransport, config: Config) -> Self {
        Self::with_parser(transport, config, MisIndexParser)
    }
}

/// Local operator date a report for `target` is filed under
pub fn report_date(target: DateTime<Utc>) -> NaiveDate {
    floor_to_five_minutes(target)
        .with_timezone(&OPERATOR_TZ)
        .date_naive()
}

/// First CSV entry, restricted to `date` when one is given
pub fn select_entry<'a>(
    entries: &'a [ReportIndexEntry],
    date: Option<NaiveDate>,
) -> Option<&'a ReportIndexEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_csv())
        .find(|entry| date.map_or(true, |date| entry.date == Some(date)))
}

impl<P: IndexParser> ReportLocator<P> {
    pub fn with_parser(transport: HttpTransport, config: Config, parser: P) -> Self {
        Self {
            transport,
            config,
            parser,
        }
    }

    pub async fn fetch(&self, request: &ReportRequest) -> Result<RawReportTable, FetchError> {
        self.locate_and_fetch(request.report_type, request.target_date).await
    }

    /// Locate the report for `report_type` (and `target_date`, if any), download
    /// it and return its CSV content.
    ///
    /// Returns `NotAvailable` when the index cannot be read or lists no matching
    /// artifact. A matching artifact that cannot be downloaded yields an empty
    /// table instead.
    #[instrument(skip(self), fields(report_type = %report_type))]
    pub async fn locate_and_fetch(
        &self,
        report_type: ReportType,
        target_date: Option<DateTime<Utc>>,
    ) -> Result<RawReportTable, FetchError> {
        let not_available = || FetchError::NotAvailable {
            report_type: report_type.to_string(),
        };

        debug!("Requesting report index for type id {}", report_type.type_id());
        let index_html = self
            .transport
            .request_text(
                &self.config.report_index_url(),
                &[("reportTypeId", report_type.type_id())],
            )
            .await
            .ok_or_else(|| {
                warn!("Report index request failed for {}", report_type);
                not_available()
            })?;

        let date = target_date.map(report_date);
        let entries = self.parser.parse(&index_html)?;
        debug!("Index lists {} entries, looking for date {:?}", entries.len(), date);

        let entry = select_entry(&entries, date).ok_or_else(|| {
            warn!("No CSV report listed for {} on {:?}", report_type, date);
            not_available()
        })?;
        info!("Selected report {}", entry.label);

        let Some(archive) = self
            .transport
            .request(&self.config.download_url(&entry.download_path), &[])
            .await
        else {
            warn!("Report {} is listed but could not be downloaded", entry.label);
            return Ok(RawReportTable::empty());
        };

        let files = unzip(&archive)?;
        let payload = files.first().ok_or_else(|| {
            error!("Report archive {} contains no files", entry.label);
            FetchError::ParseError(format!("empty report archive {}", entry.label))
        })?;

        let table = RawReportTable::from_csv(&String::from_utf8_lossy(payload))?;
        info!("Fetched report {} with {} rows", entry.label, table.len());
        Ok(table)
    }
}
