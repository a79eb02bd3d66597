use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use tracing::debug;

use crate::fetch_error::FetchError;

/// ERCOT publishes every timestamp in US Central local time
pub const OPERATOR_TZ: Tz = chrono_tz::US::Central;

/// Value of the report DST column that marks standard time
pub const STANDARD_DST_FLAG: &str = "N";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstFlag {
    Standard,
    Observing,
}

impl DstFlag {
    /// Any value other than the standard sentinel means daylight saving time is observed.
    pub fn from_flag(value: &str, standard: &str) -> Self {
        if value.trim() == standard {
            DstFlag::Standard
        } else {
            DstFlag::Observing
        }
    }

    pub fn is_observing(&self) -> bool {
        matches!(self, DstFlag::Observing)
    }
}

fn observes_dst(dt: &DateTime<Tz>) -> bool {
    dt.offset().dst_offset() != TimeDelta::zero()
}

/// Convert a naive local wall-clock time in `tz` into a UTC instant.
///
/// The flag only matters when the wall-clock time is ambiguous (the repeated
/// fall-back hour) or nonexistent (the skipped spring-forward hour). A
/// nonexistent time is shifted by the offset the flag names.
pub fn localize(tz: Tz, naive: NaiveDateTime, dst: DstFlag) -> Result<DateTime<Utc>, FetchError> {
    let observing = dst.is_observing();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            debug!("Ambiguous local time {} resolved with {:?}", naive, dst);
            let chosen = if observes_dst(&first) == observing { first } else { second };
            Ok(chosen.with_timezone(&Utc))
        }
        LocalResult::None => {
            debug!("Nonexistent local time {} resolved with {:?}", naive, dst);
            let neighbours = [
                tz.from_local_datetime(&(naive - TimeDelta::hours(3))).earliest(),
                tz.from_local_datetime(&(naive + TimeDelta::hours(3))).latest(),
            ];
            let offset = neighbours
                .into_iter()
                .flatten()
                .find(|dt| observes_dst(dt) == observing)
                .map(|dt| dt.offset().fix())
                .ok_or_else(|| {
                    FetchError::DateTimeError(format!("cannot localize {} in {}", naive, tz.name()))
                })?;
            let utc = naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            Ok(DateTime::<Utc>::from_naive_utc_and_offset(utc, Utc))
        }
    }
}
