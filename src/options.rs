use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use crate::fetch_error::FetchError;
use crate::models::{DataKind, Frequency, Market};
use crate::utils::floor_to_hour;

/// Caller-supplied options; anything left unset is filled in by [`Options::resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub latest: Option<bool>,
    pub forecast: Option<bool>,
    pub market: Option<Market>,
    pub freq: Option<Frequency>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

impl Options {
    pub fn latest() -> Self {
        Options {
            latest: Some(true),
            ..Options::default()
        }
    }

    pub fn forecast() -> Self {
        Options {
            forecast: Some(true),
            ..Options::default()
        }
    }

    pub fn with_market(mut self, market: Market) -> Self {
        self.market = Some(market);
        self
    }

    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    pub fn between(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    /// Fill defaults and fix the data path for one call.
    ///
    /// An explicit start/end window wins over `latest`, and sets `forecast`
    /// when the window ends after `now`. A bare `forecast` request covers the
    /// next two days starting at the current hour.
    pub fn resolve(self, data: DataKind, now: DateTime<Utc>) -> Result<ResolvedOptions, FetchError> {
        let mut latest = self.latest.unwrap_or(false);
        let mut forecast = self.forecast.unwrap_or(false);
        let mut window = TimeWindow {
            start: self.start_at,
            end: self.end_at,
        };

        if let (Some(start_at), Some(end_at)) = (self.start_at, self.end_at) {
            if start_at >= end_at {
                return Err(FetchError::InvalidOptions(format!(
                    "start_at ({start_at}) must be before end_at ({end_at})"
                )));
            }
            latest = false;
            forecast = end_at > now;
        } else if latest {
            forecast = false;
        } else if forecast {
            let start = floor_to_hour(now);
            window = TimeWindow {
                start: Some(start),
                end: Some(start + TimeDelta::days(2)),
            };
        }

        let market = self.market.unwrap_or(if forecast {
            Market::DayAhead
        } else {
            Market::RealTimeFiveMinute
        });
        let freq = self.freq.unwrap_or(if forecast {
            Frequency::Hourly
        } else {
            Frequency::FiveMinute
        });

        let resolved = ResolvedOptions {
            data,
            latest,
            forecast,
            market,
            freq,
            window,
        };
        debug!("Resolved options: {:?}", resolved);
        Ok(resolved)
    }
}

/// Options after default resolution. Fixed for the remainder of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    pub data: DataKind,
    pub latest: bool,
    pub forecast: bool,
    pub market: Market,
    pub freq: Frequency,
    pub window: TimeWindow,
}

/// Inclusive time filter; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| instant >= start)
            && self.end.map_or(true, |end| instant <= end)
    }

    /// Keep the items whose timestamp falls inside the window, preserving order.
    pub fn slice<T, F>(&self, items: Vec<T>, timestamp: F) -> Vec<T>
    where
        F: Fn(&T) -> DateTime<Utc>,
    {
        items
            .into_iter()
            .filter(|item| self.contains(timestamp(item)))
            .collect()
    }
}
