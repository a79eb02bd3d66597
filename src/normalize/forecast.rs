use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, instrument};

use crate::fetch_error::FetchError;
use crate::models::{Frequency, LoadRecord, Market};
use crate::options::ResolvedOptions;
use crate::report::RawReportTable;
use crate::timezone::{localize, DstFlag, OPERATOR_TZ, STANDARD_DST_FLAG};
use crate::utils::parse_number;

pub const DELIVERY_DATE_COLUMN: &str = "DeliveryDate";
pub const HOUR_ENDING_COLUMN: &str = "HourEnding";
pub const DST_FLAG_COLUMN: &str = "DSTFlag";
pub const SYSTEM_TOTAL_COLUMN: &str = "SystemTotal";

/// Convert an `H:00` hour-ending label (1..=24) to the hour the interval starts.
pub fn hour_beginning(hour_ending: &str) -> Result<u32, FetchError> {
    let hour = hour_ending
        .trim()
        .split(':')
        .next()
        .unwrap_or_default()
        .parse::<u32>()
        .map_err(|e| FetchError::ParseError(format!("invalid hour ending '{hour_ending}': {e}")))?;
    if !(1..=24).contains(&hour) {
        return Err(FetchError::ParseError(format!(
            "hour ending '{hour_ending}' outside 1..=24"
        )));
    }
    Ok(hour - 1)
}

fn parse_delivery_date(value: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(value.trim(), "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d"))
        .map_err(|e| FetchError::DateTimeError(format!("delivery date '{value}': {e}")))
}

fn local_hour(date: NaiveDate, hour: u32) -> Result<NaiveDateTime, FetchError> {
    date.and_hms_opt(hour, 0, 0)
        .ok_or_else(|| FetchError::DateTimeError(format!("invalid hour {hour} on {date}")))
}

fn normalize_row(
    row: &[String],
    [date_idx, hour_idx, dst_idx, total_idx]: [usize; 4],
    ba_name: &str,
) -> Result<LoadRecord, FetchError> {
    let date = parse_delivery_date(&row[date_idx])?;
    let naive = local_hour(date, hour_beginning(&row[hour_idx])?)?;
    let dst = DstFlag::from_flag(&row[dst_idx], STANDARD_DST_FLAG);
    Ok(LoadRecord {
        timestamp: localize(OPERATOR_TZ, naive, dst)?,
        ba_name: ba_name.to_string(),
        market: Market::DayAhead,
        freq: Frequency::Hourly,
        load_mw: parse_number(&row[total_idx])?,
    })
}

/// Normalize a 7-day load forecast report into hourly day-ahead load records.
///
/// Rows are labelled by hour ending in Central time with a DST flag column;
/// each record is stamped with the UTC start of its hour. Rows outside the
/// resolved time window are dropped.
#[instrument(skip(table, options), fields(rows = table.len()))]
pub fn normalize_forecast_table(
    table: &RawReportTable,
    options: &ResolvedOptions,
    ba_name: &str,
) -> Result<Vec<LoadRecord>, FetchError> {
    if table.columns().is_empty() {
        debug!("Report table is empty, nothing to normalize");
        return Ok(Vec::new());
    }

    let date_idx = table.column_index(DELIVERY_DATE_COLUMN)?;
    let hour_idx = table.column_index(HOUR_ENDING_COLUMN)?;
    let dst_idx = table.column_index(DST_FLAG_COLUMN)?;
    let total_idx = table.column_index(SYSTEM_TOTAL_COLUMN)?;

    let mut records = Vec::with_capacity(table.len());
    for (row_number, row) in table.rows().iter().enumerate() {
        let record = normalize_row(row, [date_idx, hour_idx, dst_idx, total_idx], ba_name)
            .map_err(|e| {
                error!("Failed to normalize forecast row {}: {} ({:?})", row_number + 1, e, row);
                e
            })?;
        records.push(record);
    }

    let sliced = options.window.slice(records, |record| record.timestamp);
    debug!("Normalized {} forecast records after slicing", sliced.len());
    Ok(sliced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataKind;
    use crate::options::{Options, TimeWindow};
    use chrono::{TimeZone, Utc};

    fn open_options() -> ResolvedOptions {
        ResolvedOptions {
            data: DataKind::Load,
            latest: false,
            forecast: true,
            market: Market::DayAhead,
            freq: Frequency::Hourly,
            window: TimeWindow::default(),
        }
    }

    const HEADER: &str = "DeliveryDate,HourEnding,North,South,West,Houston,SystemTotal,DSTFlag\n";

    #[test]
    fn test_hour_beginning_bounds() {
        assert_eq!(hour_beginning("1:00").unwrap(), 0);
        assert_eq!(hour_beginning("24:00").unwrap(), 23);
        assert_eq!(hour_beginning(" 13:00 ").unwrap(), 12);
    }

    #[test]
    fn test_hour_beginning_rejects_out_of_range() {
        assert!(matches!(hour_beginning("0:00"), Err(FetchError::ParseError(_))));
        assert!(matches!(hour_beginning("25:00"), Err(FetchError::ParseError(_))));
        assert!(matches!(hour_beginning("noon"), Err(FetchError::ParseError(_))));
    }

    #[test]
    fn test_normalize_converts_hour_ending_to_utc_start() {
        let csv = format!(
            "{HEADER}10/19/2026,1:00,10000,9000,3000,12000,41000.5,N\n10/19/2026,24:00,10000,9000,3000,12000,43000,N\n"
        );
        let table = RawReportTable::from_csv(&csv).unwrap();
        let records = normalize_forecast_table(&table, &open_options(), "ERCOT").unwrap();

        assert_eq!(records.len(), 2);
        // Hour ending 1:00 CDT starts at 00:00 CDT = 05:00 UTC
        assert_eq!(records[0].timestamp, Utc.with_ymd_and_hms(2026, 10, 19, 5, 0, 0).unwrap());
        assert_eq!(records[0].load_mw, 41000.5);
        assert_eq!(records[1].timestamp, Utc.with_ymd_and_hms(2026, 10, 20, 4, 0, 0).unwrap());
        for record in &records {
            assert_eq!(record.ba_name, "ERCOT");
            assert_eq!(record.market, Market::DayAhead);
            assert_eq!(record.freq, Frequency::Hourly);
        }
    }

    #[test]
    fn test_normalize_uses_dst_flag_for_repeated_hour() {
        // Hour ending 2:00 on 2026-11-01 is listed twice: once in CDT, once in CST
        let csv = format!(
            "{HEADER}11/01/2026,2:00,1,1,1,1,30000,Y\n11/01/2026,2:00,1,1,1,1,29500,N\n"
        );
        let table = RawReportTable::from_csv(&csv).unwrap();
        let records = normalize_forecast_table(&table, &open_options(), "ERCOT").unwrap();

        assert_eq!(records[0].timestamp, Utc.with_ymd_and_hms(2026, 11, 1, 6, 0, 0).unwrap());
        assert_eq!(records[1].timestamp, Utc.with_ymd_and_hms(2026, 11, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_normalize_drops_incomplete_row() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut csv = HEADER.to_string();
        for day in 0..7 {
            let date = start + chrono::Days::new(day);
            for hour_ending in 1..=24 {
                let total = if day == 3 && hour_ending == 7 {
                    String::new()
                } else {
                    format!("{}", 40000 + hour_ending * 10)
                };
                csv.push_str(&format!(
                    "{},{}:00,1,1,1,1,{},N\n",
                    date.format("%m/%d/%Y"),
                    hour_ending,
                    total
                ));
            }
        }

        let table = RawReportTable::from_csv(&csv).unwrap();
        let records = normalize_forecast_table(&table, &open_options(), "ERCOT").unwrap();
        assert_eq!(records.len(), 167);
    }

    #[test]
    fn test_normalize_applies_window() {
        let csv = format!(
            "{HEADER}10/19/2026,1:00,1,1,1,1,100,N\n10/19/2026,2:00,1,1,1,1,200,N\n10/19/2026,3:00,1,1,1,1,300,N\n"
        );
        let table = RawReportTable::from_csv(&csv).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 6, 20, 0).unwrap();
        let options = Options::forecast().resolve(DataKind::Load, now).unwrap();

        let records = normalize_forecast_table(&table, &options, "ERCOT").unwrap();
        // window starts at 06:00 UTC, so hour ending 1:00 (05:00 UTC) is cut
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].load_mw, 200.0);
    }

    #[test]
    fn test_normalize_missing_column_propagates() {
        let table = RawReportTable::from_csv("DeliveryDate,HourEnding,DSTFlag\n10/19/2026,1:00,N\n").unwrap();
        let result = normalize_forecast_table(&table, &open_options(), "ERCOT");
        assert!(matches!(result, Err(FetchError::ParseError(_))));
    }

    #[test]
    fn test_normalize_malformed_row_propagates() {
        let csv = format!("{HEADER}10/19/2026,1:00,1,1,1,1,lots,N\n");
        let table = RawReportTable::from_csv(&csv).unwrap();
        let result = normalize_forecast_table(&table, &open_options(), "ERCOT");
        assert!(matches!(result, Err(FetchError::NumberError(_))));
    }

    #[test]
    fn test_stray_field_fails_before_normalizing() {
        // One extra region cell would otherwise shift SystemTotal and DSTFlag left
        let csv = format!(
            "{HEADER}10/19/2026,1:00,1,1,1,1,41000,N\n10/19/2026,2:00,1,1,1,1,7,41000,N\n"
        );
        match RawReportTable::from_csv(&csv) {
            Err(FetchError::ParseError(msg)) => assert!(msg.contains("9 fields, expected 8")),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_empty_table() {
        let records =
            normalize_forecast_table(&RawReportTable::empty(), &open_options(), "ERCOT").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let csv = format!("{HEADER}10/19/2026,1:00,1,1,1,1,100,N\n10/19/2026,2:00,1,1,1,1,200,Y\n");
        let table = RawReportTable::from_csv(&csv).unwrap();
        let first = normalize_forecast_table(&table, &open_options(), "ERCOT").unwrap();
        let second = normalize_forecast_table(&table, &open_options(), "ERCOT").unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
