#[cfg(not(feature = "std"))]
use core as std;

use std::{error, fmt};

/// A point in time that can be expressed as signed nanoseconds since the Unix epoch.
///
/// Only the microsecond part of the value takes part in token generation. Implementations are
/// provided for [`UnixNanos`], [`std::time::SystemTime`] (with `std`), and
/// `chrono::DateTime<Tz>` (with `chrono`).
pub trait Timestamp {
    /// Returns the number of nanoseconds since 1970-01-01 00:00:00+00:00.
    ///
    /// Values outside of the 64-bit range (roughly before 1678 or after 2262) wrap around.
    fn unix_ts_nanos(&self) -> i64;

    /// Returns the number of whole microseconds since the Unix epoch, truncated toward zero and
    /// reinterpreted as an unsigned integer.
    ///
    /// Pre-epoch timestamps yield two's-complement values close to `u64::MAX`.
    fn unix_ts_micros(&self) -> u64 {
        (self.unix_ts_nanos() / 1000) as u64
    }

    /// Returns `true` if the timestamp precedes 1970-01-01 00:00:00+00:00.
    ///
    /// Implementations that can represent instants outside of the 64-bit nanosecond range should
    /// override this, because the wrapped nanosecond count may have the wrong sign.
    fn is_before_unix_epoch(&self) -> bool {
        self.unix_ts_nanos() < 0
    }
}

impl<T: Timestamp + ?Sized> Timestamp for &T {
    fn unix_ts_nanos(&self) -> i64 {
        (**self).unix_ts_nanos()
    }

    fn unix_ts_micros(&self) -> u64 {
        (**self).unix_ts_micros()
    }

    fn is_before_unix_epoch(&self) -> bool {
        (**self).is_before_unix_epoch()
    }
}

/// A raw count of nanoseconds since the Unix epoch.
///
/// # Examples
///
/// ```rust
/// use randomish::{Timestamp, UnixNanos};
///
/// assert_eq!(UnixNanos(1_999).unix_ts_micros(), 1);
///
/// let t = UnixNanos::from_micros(1_700_000_000_000_000);
/// assert_eq!(t.unix_ts_micros(), 1_700_000_000_000_000);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct UnixNanos(/** The signed nanosecond count. */ pub i64);

impl UnixNanos {
    /// Creates an object from a microsecond count, wrapping outside of the 64-bit nanosecond
    /// range.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros.wrapping_mul(1000))
    }
}

impl Timestamp for UnixNanos {
    fn unix_ts_nanos(&self) -> i64 {
        self.0
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl Timestamp for std::time::SystemTime {
    fn unix_ts_nanos(&self) -> i64 {
        match self.duration_since(std::time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_nanos() as i64,
            Err(err) => (err.duration().as_nanos() as i64).wrapping_neg(),
        }
    }

    fn unix_ts_micros(&self) -> u64 {
        match self.duration_since(std::time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_micros() as u64,
            Err(err) => (err.duration().as_micros() as i64).wrapping_neg() as u64,
        }
    }

    fn is_before_unix_epoch(&self) -> bool {
        *self < std::time::UNIX_EPOCH
    }
}

#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
impl<Tz: chrono::TimeZone> Timestamp for chrono::DateTime<Tz> {
    /// Returns the nanosecond count, or the microsecond count scaled with wrapping arithmetic if
    /// the instant is outside of the 64-bit nanosecond range.
    fn unix_ts_nanos(&self) -> i64 {
        self.timestamp_nanos_opt()
            .unwrap_or_else(|| self.timestamp_micros().wrapping_mul(1000))
    }

    /// Returns the truncated microsecond count, falling back to chrono's own microsecond count
    /// outside of the 64-bit nanosecond range.
    fn unix_ts_micros(&self) -> u64 {
        match self.timestamp_nanos_opt() {
            Some(nanos) => (nanos / 1000) as u64,
            None => self.timestamp_micros() as u64,
        }
    }

    fn is_before_unix_epoch(&self) -> bool {
        self.timestamp() < 0
    }
}

/// The policy for timestamps before the Unix epoch.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum PreEpoch {
    /// Reinterprets the negative microsecond count as an unsigned integer.
    #[default]
    Wrap,

    /// Rejects the timestamp with [`TimestampError::BeforeUnixEpoch`].
    Reject,
}

impl PreEpoch {
    /// Returns the microsecond count of `timestamp` if it is acceptable under this policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use randomish::{PreEpoch, UnixNanos};
    ///
    /// assert_eq!(PreEpoch::Wrap.quantize(UnixNanos(-1_500)), Ok(u64::MAX));
    /// assert!(PreEpoch::Reject.quantize(UnixNanos(-1_500)).is_err());
    /// assert_eq!(PreEpoch::Reject.quantize(UnixNanos(1_500)), Ok(1));
    /// ```
    pub fn quantize(self, timestamp: impl Timestamp) -> Result<u64, TimestampError> {
        match self {
            PreEpoch::Wrap => Ok(wrap_micros(timestamp)),
            PreEpoch::Reject if timestamp.is_before_unix_epoch() => {
                let unix_ts_nanos = timestamp.unix_ts_nanos();
                #[cfg(feature = "log")]
                log::debug!("randomish: rejected pre-epoch timestamp ({} ns)", unix_ts_nanos);
                Err(TimestampError::BeforeUnixEpoch { unix_ts_nanos })
            }
            PreEpoch::Reject => Ok(timestamp.unix_ts_micros()),
        }
    }
}

/// Returns the microsecond count of `timestamp`, wrapping pre-epoch values around.
pub(crate) fn wrap_micros(timestamp: impl Timestamp) -> u64 {
    #[cfg(feature = "log")]
    if timestamp.is_before_unix_epoch() {
        log::warn!(
            "randomish: wrapping pre-epoch timestamp ({} ns)",
            timestamp.unix_ts_nanos()
        );
    }
    timestamp.unix_ts_micros()
}

/// An error returned when a timestamp is not acceptable under the configured [`PreEpoch`]
/// policy.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum TimestampError {
    /// The timestamp precedes 1970-01-01 00:00:00+00:00.
    BeforeUnixEpoch {
        /// The offending nanosecond count.
        unix_ts_nanos: i64,
    },
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::BeforeUnixEpoch { unix_ts_nanos } => {
                write!(f, "timestamp before Unix epoch: {} ns", unix_ts_nanos)
            }
        }
    }
}

impl error::Error for TimestampError {}
