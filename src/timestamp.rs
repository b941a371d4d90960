use std::cmp;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical timestamp, as used by replication oplogs: a seconds counter and an ordinal that
/// disambiguates operations within the same second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp {
    time: u32,
    increment: u32,
}

impl Timestamp {
    pub fn new(time: u32, increment: u32) -> Timestamp {
        Timestamp { time, increment }
    }

    /// Minimum possible timestamp that can be represented
    pub fn min_value() -> Timestamp {
        Timestamp {
            time: 0,
            increment: 0,
        }
    }

    /// Maximum possible timestamp that can be represented
    pub fn max_value() -> Timestamp {
        Timestamp {
            time: u32::MAX,
            increment: u32::MAX,
        }
    }

    /// Seconds since the Unix epoch.
    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// Step to the next ordinal, rolling into the next second if the increment is exhausted.
    /// Saturates at [`Timestamp::max_value`].
    pub fn next(mut self) -> Timestamp {
        if self.increment < u32::MAX {
            self.increment += 1;
        } else if self.time < u32::MAX {
            self.increment = 0;
            self.time += 1;
        }
        self
    }

    /// Both halves as a single value, seconds in the high word.
    pub fn as_u64(&self) -> u64 {
        ((self.time as u64) << 32) | (self.increment as u64)
    }

    pub fn from_u64(v: u64) -> Timestamp {
        Timestamp {
            time: (v >> 32) as u32,
            increment: v as u32,
        }
    }

    pub fn size(&self) -> usize {
        8
    }

    /// Encode onto a byte vector: the increment first, then the seconds, both little-endian.
    pub fn encode_vec(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.as_u64().to_le_bytes());
    }
}

impl cmp::Ord for Timestamp {
    fn cmp(&self, other: &Timestamp) -> cmp::Ordering {
        self.as_u64().cmp(&other.as_u64())
    }
}

impl cmp::PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Timestamp) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Timestamp({}, {})", self.time, self.increment)
    }
}
