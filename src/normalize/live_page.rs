use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use scraper::Html;
use tracing::{debug, error, instrument};

use crate::fetch_error::FetchError;
use crate::models::{DataKind, FuelName, Record};
use crate::options::ResolvedOptions;
use crate::timezone::{localize, DstFlag, OPERATOR_TZ};
use crate::utils::{parse_number, selector};

pub const DEMAND_LABEL: &str = "Actual System Demand";
pub const WIND_LABEL: &str = "Total Wind Output";
pub const TIE_FLOW_LABELS: [&str; 5] = [
    "DC_E (East)",
    "DC_L (Laredo VFT)",
    "DC_N (North)",
    "DC_R (Railroad)",
    "DC_S (Eagle Pass)",
];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// One snapshot of the real-time system conditions page
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSnapshot {
    pub timestamp: DateTime<Utc>,
    pub demand_mw: f64,
    pub wind_mw: f64,
    pub total_tie_flow_mw: f64,
}

impl LiveSnapshot {
    #[instrument(skip(html), fields(html_size = html.len()))]
    pub fn from_html(html: &str) -> Result<Self, FetchError> {
        let document = Html::parse_document(html);

        let timestamp = parse_last_updated(&document)?;
        let values = labeled_values(&document)?;

        let demand_mw = lookup(&values, DEMAND_LABEL)?;
        let wind_mw = lookup(&values, WIND_LABEL)?;
        let total_tie_flow_mw = TIE_FLOW_LABELS
            .iter()
            .map(|label| lookup(&values, label))
            .sum::<Result<f64, FetchError>>()?;

        debug!(
            "Snapshot at {}: demand={} wind={} ties={}",
            timestamp, demand_mw, wind_mw, total_tie_flow_mw
        );

        Ok(Self {
            timestamp,
            demand_mw,
            wind_mw,
            total_tie_flow_mw,
        })
    }

    /// Generation not attributed to wind, by balance: demand = wind + non-wind + net imports
    pub fn nonwind_mw(&self) -> f64 {
        self.demand_mw - self.total_tie_flow_mw - self.wind_mw
    }

    pub fn to_records(&self, options: &ResolvedOptions, ba_name: &str) -> Result<Vec<Record>, FetchError> {
        match options.data {
            DataKind::Load => Ok(vec![Record::load(
                self.timestamp,
                ba_name,
                options.market,
                options.freq,
                self.demand_mw,
            )]),
            DataKind::Generation => Ok(vec![
                Record::generation(
                    self.timestamp,
                    ba_name,
                    options.market,
                    options.freq,
                    FuelName::Wind,
                    self.wind_mw,
                ),
                Record::generation(
                    self.timestamp,
                    ba_name,
                    options.market,
                    options.freq,
                    FuelName::Nonwind,
                    self.nonwind_mw(),
                ),
            ]),
            other => Err(FetchError::UnsupportedOperation(format!(
                "cannot get real-time data for {other}"
            ))),
        }
    }
}

/// Find the "Last Updated" node and read it as Central time
fn parse_last_updated(document: &Html) -> Result<DateTime<Utc>, FetchError> {
    let label = document
        .root_element()
        .text()
        .find(|text| text.contains("Last Updated"))
        .ok_or_else(|| {
            error!("No 'Last Updated' node found in live page");
            FetchError::ParseError("missing 'Last Updated' timestamp".to_string())
        })?;

    let pattern = Regex::new(r"Last Updated:?\s*(.*)").map_err(|e| FetchError::ParseError(e.to_string()))?;
    let raw = pattern
        .captures(label)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    let naive = parse_local_timestamp(raw)?;
    // The page has no DST marker; the repeated fall-back hour reads as standard time
    localize(OPERATOR_TZ, naive, DstFlag::Standard)
}

fn parse_local_timestamp(raw: &str) -> Result<NaiveDateTime, FetchError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| {
            error!("Unrecognized 'Last Updated' timestamp: '{}'", raw);
            FetchError::DateTimeError(format!("unrecognized timestamp '{raw}'"))
        })
}

/// First-column label to second-column text for the page's first table
fn labeled_values(document: &Html) -> Result<HashMap<String, String>, FetchError> {
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td, th")?;

    let table = document.select(&table_selector).next().ok_or_else(|| {
        error!("No data table found in live page");
        FetchError::ParseError("missing data table".to_string())
    })?;

    let mut values = HashMap::new();
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if let [label, value, ..] = cells.as_slice() {
            values.entry(label.clone()).or_insert_with(|| value.clone());
        }
    }
    debug!("Data table has {} labeled rows", values.len());
    Ok(values)
}

fn lookup(values: &HashMap<String, String>, label: &str) -> Result<f64, FetchError> {
    let value = values.get(label).ok_or_else(|| {
        error!("Label '{}' not found in live page table", label);
        FetchError::ParseError(format!("missing row '{label}'"))
    })?;
    parse_number(value)
}
