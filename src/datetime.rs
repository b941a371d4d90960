use std::convert::TryFrom;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A UTC point in time with millisecond resolution, stored as signed milliseconds since the
/// Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DateTime(i64);

impl DateTime {
    pub fn from_millis(millis: i64) -> DateTime {
        DateTime(millis)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }

    /// Convert a system time, truncating toward zero to whole milliseconds. Fails if the time
    /// is too far from the epoch to fit.
    pub fn from_system_time(time: SystemTime) -> Result<DateTime> {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).map_err(|_| Error::DateOutOfRange)?,
            Err(before) => {
                let millis = before.duration().as_millis();
                // i64::MIN milliseconds has no positive counterpart
                if millis == (i64::MAX as u128) + 1 {
                    i64::MIN
                } else {
                    -i64::try_from(millis).map_err(|_| Error::DateOutOfRange)?
                }
            }
        };
        Ok(DateTime(millis))
    }

    /// Convert back to a system time. Returns `None` if the platform can't represent it.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let offset = Duration::from_millis(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}

impl TryFrom<SystemTime> for DateTime {
    type Error = Error;

    fn try_from(time: SystemTime) -> Result<DateTime> {
        DateTime::from_system_time(time)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DateTime({}ms)", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truncates_to_millis() {
        let t = UNIX_EPOCH + Duration::new(1_600_000_000, 999_999_999);
        let date = DateTime::from_system_time(t).unwrap();
        assert_eq!(date.timestamp_millis(), 1_600_000_000_999);
    }

    #[test]
    fn before_epoch_truncates_toward_zero() {
        let t = UNIX_EPOCH - Duration::new(1, 500_900);
        let date = DateTime::from_system_time(t).unwrap();
        assert_eq!(date.timestamp_millis(), -1_000);
    }

    #[test]
    fn system_time_roundtrip() {
        let date = DateTime::from_millis(-86_400_123);
        let t = date.to_system_time().unwrap();
        assert_eq!(DateTime::try_from(t).unwrap(), date);
        assert_eq!(DateTime::from_system_time(UNIX_EPOCH).unwrap(), DateTime::default());
    }
}
