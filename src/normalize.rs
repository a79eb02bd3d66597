// Normalizers turning ERCOT documents into uniform records
//
// - forecast: 7-day load forecast CSV (hour-ending rows with a DST flag)
// - live_page: real-time system conditions HTML snapshot

pub mod forecast;
pub mod live_page;

pub use forecast::{hour_beginning, normalize_forecast_table};
pub use live_page::LiveSnapshot;
