#![allow(dead_code)]

use std::io::{Cursor, Write};

use chrono::{Days, NaiveDate};
use ercot_grid_client::config::Config;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const INDEX_PATH: &str = "/misapp/GetReports.do";
pub const DOWNLOAD_PATH: &str = "/misdownload/servlets/mirDownload";
pub const LIVE_PATH: &str = "/content/cdr/html/real_time_system_conditions.html";

/// Config pointing every endpoint at a mock server, without retries
pub fn test_config(server_url: &str) -> Config {
    Config {
        http_timeout_secs: 5,
        http_max_retries: 0,
        ..Config::with_base_url(server_url)
    }
}

/// Report index page listing `(label, doclookupId)` rows in order
pub fn index_html(entries: &[(&str, u32)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(label, id)| {
            format!(
                r#"<tr>
                  <td class="labelOptional_ind">{label}</td>
                  <td class="labelOptional">1 KB</td>
                  <td><a href="{DOWNLOAD_PATH}?mimic_duns=&amp;doclookupId={id}">zip</a></td>
                </tr>"#
            )
        })
        .collect();
    format!(
        "<html><body><table><tr><th>Friendly Name</th><th>Size</th><th>Link</th></tr>{rows}</table></body></html>"
    )
}

pub fn forecast_label(date: NaiveDate, ext: &str) -> String {
    format!(
        "cdr.00012311.0000000000000000.{}.053015.7DayLoadForecastNP3560_{ext}.zip",
        date.format("%Y%m%d")
    )
}

/// Seven days of hourly forecast rows starting at `start`
pub fn forecast_csv(start: NaiveDate) -> String {
    let mut csv = String::from(
        "DeliveryDate,HourEnding,Coast,East,FarWest,North,NorthCentral,SouthCentral,Southern,West,SystemTotal,DSTFlag\n",
    );
    for day in 0..7 {
        let date = start + Days::new(day);
        for hour_ending in 1..=24 {
            csv.push_str(&format!(
                "{},{}:00,1,1,1,1,1,1,1,1,{}.5,N\n",
                date.format("%m/%d/%Y"),
                hour_ending,
                40000 + hour_ending * 100
            ));
        }
    }
    csv
}

pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in files {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(body.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

pub fn live_page(last_updated: &str, demand: &str, wind: &str, ties: [&str; 5]) -> String {
    let labels = [
        "DC_E (East)",
        "DC_L (Laredo VFT)",
        "DC_N (North)",
        "DC_R (Railroad)",
        "DC_S (Eagle Pass)",
    ];
    let tie_rows: String = labels
        .iter()
        .zip(ties.iter())
        .map(|(label, value)| {
            format!(r#"<tr><td class="tdLeft">{label}</td><td class="labelClassCenter">{value}</td></tr>"#)
        })
        .collect();
    format!(
        r#"<html><head><title>Real-Time System Conditions</title></head><body>
        <div id="rightCol">
          <div class="schedTime rightAlign">Last Updated: {last_updated}</div>
          <table class="tableStyle">
            <tr><td class="headerValueClass" colspan="2">Frequency</td></tr>
            <tr><td class="tdLeft">Current Frequency</td><td class="labelClassCenter">59.987</td></tr>
            <tr><td class="headerValueClass" colspan="2">Real-Time Data</td></tr>
            <tr><td class="tdLeft">Actual System Demand</td><td class="labelClassCenter">{demand}</td></tr>
            <tr><td class="tdLeft">Total System Capacity (not including Ancillary Services)</td><td class="labelClassCenter">52000</td></tr>
            <tr><td class="tdLeft">Total Wind Output</td><td class="labelClassCenter">{wind}</td></tr>
            <tr><td class="headerValueClass" colspan="2">DC Tie Flows</td></tr>
            {tie_rows}
          </table>
        </div>
        </body></html>"#
    )
}
