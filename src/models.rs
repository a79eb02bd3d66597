use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fetch_error::FetchError;

/// Market a record was cleared or measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "RTHR")]
    RealTimeHourly,
    #[serde(rename = "RT5M")]
    RealTimeFiveMinute,
    #[serde(rename = "RTPD")]
    RealTimeFifteenMinute,
    #[serde(rename = "DAHR")]
    DayAhead,
}

impl Market {
    pub fn code(&self) -> &'static str {
        match self {
            Market::RealTimeHourly => "RTHR",
            Market::RealTimeFiveMinute => "RT5M",
            Market::RealTimeFifteenMinute => "RTPD",
            Market::DayAhead => "DAHR",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Market {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RTHR" => Ok(Market::RealTimeHourly),
            "RT5M" => Ok(Market::RealTimeFiveMinute),
            "RTPD" => Ok(Market::RealTimeFifteenMinute),
            "DAHR" => Ok(Market::DayAhead),
            other => Err(FetchError::InvalidOptions(format!("unknown market '{other}'"))),
        }
    }
}

/// Sampling frequency of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "1hr")]
    Hourly,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "10m")]
    TenMinute,
    #[serde(rename = "15m")]
    FifteenMinute,
    #[serde(rename = "1d")]
    Daily,
}

impl Frequency {
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Hourly => "1hr",
            Frequency::FiveMinute => "5m",
            Frequency::TenMinute => "10m",
            Frequency::FifteenMinute => "15m",
            Frequency::Daily => "1d",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Frequency {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1hr" => Ok(Frequency::Hourly),
            "5m" => Ok(Frequency::FiveMinute),
            "10m" => Ok(Frequency::TenMinute),
            "15m" => Ok(Frequency::FifteenMinute),
            "1d" => Ok(Frequency::Daily),
            other => Err(FetchError::InvalidOptions(format!("unknown frequency '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelName {
    Wind,
    Nonwind,
}

/// Kind of data a caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Load,
    #[serde(rename = "gen")]
    Generation,
    Trade,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Load => f.write_str("load"),
            DataKind::Generation => f.write_str("gen"),
            DataKind::Trade => f.write_str("trade"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub timestamp: DateTime<Utc>,
    pub ba_name: String,
    pub market: Market,
    pub freq: Frequency,
    #[serde(rename = "load_MW")]
    pub load_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub timestamp: DateTime<Utc>,
    pub ba_name: String,
    pub market: Market,
    pub freq: Frequency,
    pub fuel_name: FuelName,
    #[serde(rename = "gen_MW")]
    pub gen_mw: f64,
}

/// Normalized output unit; each variant carries only its own fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Load(LoadRecord),
    Generation(GenerationRecord),
}

impl Record {
    pub fn load(
        timestamp: DateTime<Utc>,
        ba_name: &str,
        market: Market,
        freq: Frequency,
        load_mw: f64,
    ) -> Self {
        Record::Load(LoadRecord {
            timestamp,
            ba_name: ba_name.to_string(),
            market,
            freq,
            load_mw,
        })
    }

    pub fn generation(
        timestamp: DateTime<Utc>,
        ba_name: &str,
        market: Market,
        freq: Frequency,
        fuel_name: FuelName,
        gen_mw: f64,
    ) -> Self {
        Record::Generation(GenerationRecord {
            timestamp,
            ba_name: ba_name.to_string(),
            market,
            freq,
            fuel_name,
            gen_mw,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Record::Load(r) => r.timestamp,
            Record::Generation(r) => r.timestamp,
        }
    }

    pub fn market(&self) -> Market {
        match self {
            Record::Load(r) => r.market,
            Record::Generation(r) => r.market,
        }
    }

    pub fn freq(&self) -> Frequency {
        match self {
            Record::Load(r) => r.freq,
            Record::Generation(r) => r.freq,
        }
    }

    pub fn as_load(&self) -> Option<&LoadRecord> {
        match self {
            Record::Load(r) => Some(r),
            Record::Generation(_) => None,
        }
    }

    pub fn as_generation(&self) -> Option<&GenerationRecord> {
        match self {
            Record::Generation(r) => Some(r),
            Record::Load(_) => None,
        }
    }
}

impl From<LoadRecord> for Record {
    fn from(record: LoadRecord) -> Self {
        Record::Load(record)
    }
}

impl From<GenerationRecord> for Record {
    fn from(record: GenerationRecord) -> Self {
        Record::Generation(record)
    }
}
