//! # randomish: deterministic, random-looking row tokens
//!
//! Derives a short, URL-safe token from a record's creation time and its numeric row ID. The
//! token looks random but is a pure function of its inputs, so it can be recomputed or verified
//! from the same two values at any time without storing anything extra.
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use randomish::{generate_token, UnixNanos};
//!
//! let created_at = UnixNanos::from_micros(1_700_000_000_000_000);
//! assert_eq!(generate_token(created_at, 42, "img_", "_2026"), "img_1Y3zFdcco6v_2026");
//! assert_eq!(generate_token(created_at, 42, "", ""), "1Y3zFdcco6v");
//! # }
//! ```
//!
//! Any [`std::time::SystemTime`] works as a timestamp as well:
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use std::time::SystemTime;
//!
//! let token = randomish::generate_token(SystemTime::now(), 42, "img_", "");
//! assert!(regex::Regex::new(r"^img_[0-9A-Za-z]{1,11}$").unwrap().is_match(&token));
//! # }
//! ```
//!
//! ## Token layout
//!
//! A token is `prefix + body + suffix`. The body is computed as follows:
//!
//! 1. The timestamp is truncated to whole microseconds since the Unix epoch.
//! 2. The row ID, reinterpreted as `u64`, is multiplied by [`ROW_MULTIPLIER`] with wrapping
//!    arithmetic and XORed into the microsecond count.
//! 3. The result is rotated left by [`ROTATION`] bits.
//! 4. The 64-bit word is written in Base62 (`0-9`, `A-Z`, `a-z`) without leading zeros, giving
//!    1 to [`MAX_BODY_DIGITS`] characters.
//!
//! Tokens are not cryptographically unpredictable and are only as unique as the `(timestamp,
//! row ID)` pairs they are made from.
//!
//! ## Timestamps before the Unix epoch
//!
//! Pre-epoch timestamps are outside the supported domain. By default they wrap around in
//! two's-complement fashion and still produce a deterministic token. [`TokenEncoder`] can be
//! configured with [`PreEpoch::Reject`] to turn them into a [`TimestampError`] instead.
//!
//! ## Crate features
//!
//! Default features:
//!
//! - `std`: enables the `String`-producing API ([`generate_token`] and [`TokenEncoder`]) and
//!   implements [`Timestamp`] for [`std::time::SystemTime`]. Without it, the crate is `no_std`
//!   and only [`TokenBody`] and [`Timestamp`] are available.
//!
//! Optional features:
//!
//! - `serde`: enables serialization/deserialization of [`TokenBody`] via serde.
//! - `chrono`: implements [`Timestamp`] for `chrono::DateTime<Tz>`.
//! - `log`: emits diagnostics about pre-epoch timestamps through the `log` facade.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod body;
pub use body::{ParseError, TokenBody};

mod timestamp;
pub use timestamp::{PreEpoch, Timestamp, TimestampError, UnixNanos};

mod encoder;
#[cfg(feature = "std")]
pub use encoder::{generate_token, TokenEncoder};

/// The odd constant the row ID is multiplied by before being mixed into the timestamp.
pub const ROW_MULTIPLIER: u64 = 37;

/// The number of bits the mixed value is rotated to the left.
pub const ROTATION: u32 = 23;

/// The maximum number of Base62 digits in a token body.
pub const MAX_BODY_DIGITS: usize = 11;
