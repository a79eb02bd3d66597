use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::models::{DataKind, Record};
use crate::normalize::{normalize_forecast_table, LiveSnapshot};
use crate::options::{Options, ResolvedOptions};
use crate::report::{RawReportTable, ReportLocator, ReportRequest, ReportType};
use crate::transport::HttpTransport;

pub const BA_NAME: &str = "ERCOT";

/// Client for ERCOT load and generation data
#[derive(Clone)]
pub struct ErcotClient {
    transport: HttpTransport,
    locator: ReportLocator,
    config: Config,
}

impl ErcotClient {
    pub fn new(config: Config) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            locator: ReportLocator::new(transport.clone(), config.clone()),
            transport,
            config,
        })
    }

    /// System load: the live snapshot when `latest`, the 7-day forecast when `forecast`.
    #[instrument(skip(self))]
    pub async fn get_load(&self, options: Options) -> Result<Vec<Record>, FetchError> {
        let options = options.resolve(DataKind::Load, Utc::now())?;

        if options.latest {
            self.latest_snapshot(&options).await
        } else if options.forecast {
            self.load_forecast(&options).await
        } else {
            Err(FetchError::UnsupportedOperation(
                "load only available for latest or forecast in ERCOT".to_string(),
            ))
        }
    }

    /// Wind and non-wind generation; only the live snapshot is available.
    #[instrument(skip(self))]
    pub async fn get_generation(&self, options: Options) -> Result<Vec<Record>, FetchError> {
        let options = options.resolve(DataKind::Generation, Utc::now())?;

        if options.latest {
            self.latest_snapshot(&options).await
        } else {
            Err(FetchError::UnsupportedOperation(
                "only latest genmix data available in ERCOT".to_string(),
            ))
        }
    }

    /// ERCOT publishes no trade data this client can read.
    pub async fn get_trade(&self, options: Options) -> Result<Vec<Record>, FetchError> {
        let options = options.resolve(DataKind::Trade, Utc::now())?;
        Err(FetchError::UnsupportedOperation(format!(
            "{} data not available in ERCOT",
            options.data
        )))
    }

    /// Raw report content for any known report type
    pub async fn get_report(
        &self,
        report_type: ReportType,
        target_date: Option<DateTime<Utc>>,
    ) -> Result<RawReportTable, FetchError> {
        self.locator
            .fetch(&ReportRequest::new(report_type, target_date))
            .await
    }

    async fn latest_snapshot(&self, options: &ResolvedOptions) -> Result<Vec<Record>, FetchError> {
        debug!("Fetching live system conditions page");
        let Some(html) = self
            .transport
            .request_text(&self.config.real_time_url, &[])
            .await
        else {
            warn!("Live system conditions page unavailable");
            return Ok(Vec::new());
        };

        let records = LiveSnapshot::from_html(&html)?.to_records(options, BA_NAME)?;
        info!("Parsed {} {} records from live page", records.len(), options.data);
        Ok(records)
    }

    async fn load_forecast(&self, options: &ResolvedOptions) -> Result<Vec<Record>, FetchError> {
        let request = ReportRequest::new(ReportType::Load7Day, None);
        let table = match self.locator.fetch(&request).await {
            Ok(table) => table,
            Err(e) if e.is_not_available() => {
                warn!("Load forecast unavailable: {}", e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let records: Vec<Record> = normalize_forecast_table(&table, options, BA_NAME)?
            .into_iter()
            .map(Record::from)
            .collect();
        info!("Normalized {} load forecast records", records.len());
        Ok(records)
    }
}
