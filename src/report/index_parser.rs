use chrono::NaiveDate;
use scraper::Html;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::fetch_error::FetchError;
use crate::utils::selector;

/// One downloadable artifact listed on a report index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportIndexEntry {
    pub label: String,
    pub date: Option<NaiveDate>,
    pub download_path: String,
}

impl ReportIndexEntry {
    pub fn is_csv(&self) -> bool {
        self.label.contains("csv")
    }
}

/// Turns an index document into entries, in document order
pub trait IndexParser {
    fn parse(&self, html: &str) -> Result<Vec<ReportIndexEntry>, FetchError>;
}

/// Parser for the MIS `GetReports.do` listing.
///
/// Labels look like `cdr.00012311.0000000000000000.20261019.053015.7DayLoadForecast_csv.zip`,
/// with the report date as the 4th dot-delimited field.
#[derive(Debug, Clone, Copy, Default)]
pub struct MisIndexParser;

/// Extract the `YYYYMMDD` date token from a report label
fn label_date(label: &str) -> Option<NaiveDate> {
    let token = label.split('.').nth(3)?;
    NaiveDate::parse_from_str(token, "%Y%m%d").ok()
}

impl IndexParser for MisIndexParser {
    #[instrument(skip(self, html), fields(html_size = html.len()))]
    fn parse(&self, html: &str) -> Result<Vec<ReportIndexEntry>, FetchError> {
        let document = Html::parse_document(html);
        let row_selector = selector("tr")?;
        let label_selector = selector(".labelOptional_ind")?;
        let link_selector = selector("a[href]")?;

        let mut entries = Vec::new();
        for row in document.select(&row_selector) {
            let Some(label) = row.select(&label_selector).next() else {
                continue;
            };
            let label = label.text().collect::<String>().trim().to_string();

            let Some(href) = row
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                debug!("Index row '{}' has no download link, skipping", label);
                continue;
            };

            entries.push(ReportIndexEntry {
                date: label_date(&label),
                download_path: href.to_string(),
                label,
            });
        }

        debug!("Parsed {} index entries", entries.len());
        Ok(entries)
    }
}
