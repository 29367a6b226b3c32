#![cfg(feature = "std")]

use crate::body::trim_padding;
use crate::timestamp::wrap_micros;
use crate::{ParseError, PreEpoch, Timestamp, TimestampError, TokenBody};

/// Generates a token from a timestamp and a row ID, surrounded by a literal prefix and suffix.
///
/// The result is `prefix + body + suffix`, where the body consists of 1 to 11 Base62 digits
/// computed from the microsecond timestamp and the row ID. The same inputs always yield the same
/// token. Pre-epoch timestamps wrap around instead of failing; use [`TokenEncoder`] with
/// [`PreEpoch::Reject`] to refuse them.
///
/// # Examples
///
/// ```rust
/// use randomish::{generate_token, UnixNanos};
///
/// let t = UnixNanos::from_micros(1_700_000_000_000_000);
/// assert_eq!(generate_token(t, 42, "", ""), "1Y3zFdcco6v");
/// assert_eq!(generate_token(t, 42, "img_", ""), "img_1Y3zFdcco6v");
/// assert_eq!(generate_token(t, 42, "", "_2026"), "1Y3zFdcco6v_2026");
/// assert_eq!(generate_token(t, 43, "img_", "_2026"), "img_1Y3zFdxd7jh_2026");
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub fn generate_token(
    timestamp: impl Timestamp,
    row_id: i64,
    prefix: &str,
    suffix: &str,
) -> String {
    let body = TokenBody::from_parts(wrap_micros(timestamp), row_id);
    assemble(prefix, body, suffix)
}

fn assemble(prefix: &str, body: TokenBody, suffix: &str) -> String {
    let padded = body.encode();
    let digits = trim_padding(&padded);

    let mut token = String::with_capacity(prefix.len() + digits.len() + suffix.len());
    token.push_str(prefix);
    token.push_str(digits);
    token.push_str(suffix);
    token
}

/// Represents a token format: a fixed prefix and suffix plus the policy for pre-epoch
/// timestamps.
///
/// # Examples
///
/// ```rust
/// use randomish::{PreEpoch, TokenEncoder, UnixNanos};
///
/// let enc = TokenEncoder::new()
///     .with_prefix("img_")
///     .with_suffix("_2026")
///     .with_pre_epoch(PreEpoch::Reject);
///
/// let t = UnixNanos::from_micros(1_700_000_000_000_000);
/// let token = enc.try_encode(t, 42)?;
/// assert_eq!(token, "img_1Y3zFdcco6v_2026");
/// assert!(enc.verify(&token, t, 42));
/// assert_eq!(enc.recover_epoch_micros(&token, 42)?, 1_700_000_000_000_000);
///
/// assert!(enc.try_encode(UnixNanos(-1), 42).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TokenEncoder {
    prefix: String,
    suffix: String,
    pre_epoch: PreEpoch,
}

impl TokenEncoder {
    /// Creates an encoder with no prefix or suffix that wraps pre-epoch timestamps.
    pub const fn new() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            pre_epoch: PreEpoch::Wrap,
        }
    }

    /// Sets the literal string placed before the body.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the literal string placed after the body.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets the policy for timestamps before the Unix epoch.
    ///
    /// The policy is enforced by the fallible methods ([`TokenEncoder::try_encode`],
    /// [`TokenEncoder::try_body`], and [`TokenEncoder::verify`]) only. [`TokenEncoder::encode`]
    /// and [`TokenEncoder::body`] wrap pre-epoch timestamps around even under
    /// [`PreEpoch::Reject`].
    pub fn with_pre_epoch(mut self, pre_epoch: PreEpoch) -> Self {
        self.pre_epoch = pre_epoch;
        self
    }

    /// Returns the literal string placed before the body.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the literal string placed after the body.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the policy for timestamps before the Unix epoch.
    pub const fn pre_epoch(&self) -> PreEpoch {
        self.pre_epoch
    }

    /// Computes the token body without the prefix and suffix.
    ///
    /// Pre-epoch timestamps always wrap around here regardless of the configured policy.
    pub fn body(&self, timestamp: impl Timestamp, row_id: i64) -> TokenBody {
        TokenBody::from_parts(wrap_micros(timestamp), row_id)
    }

    /// Computes the token body, returning an error if the timestamp is not acceptable under the
    /// configured policy.
    pub fn try_body(
        &self,
        timestamp: impl Timestamp,
        row_id: i64,
    ) -> Result<TokenBody, TimestampError> {
        let epoch_micros = self.pre_epoch.quantize(timestamp)?;
        Ok(TokenBody::from_parts(epoch_micros, row_id))
    }

    /// Generates a token.
    ///
    /// This never fails: pre-epoch timestamps wrap around even under [`PreEpoch::Reject`]. Use
    /// [`TokenEncoder::try_encode`] to enforce the policy.
    pub fn encode(&self, timestamp: impl Timestamp, row_id: i64) -> String {
        assemble(&self.prefix, self.body(timestamp, row_id), &self.suffix)
    }

    /// Generates a token, returning an error if the timestamp is not acceptable under the
    /// configured policy.
    pub fn try_encode(
        &self,
        timestamp: impl Timestamp,
        row_id: i64,
    ) -> Result<String, TimestampError> {
        let body = self.try_body(timestamp, row_id)?;
        Ok(assemble(&self.prefix, body, &self.suffix))
    }

    /// Strips the prefix and suffix off a token and parses the body.
    pub fn decode_body(&self, token: &str) -> Result<TokenBody, ParseError> {
        let digits = token
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.suffix.as_str()))
            .ok_or(ParseError::missing_affix())?;
        TokenBody::try_from_str(digits)
    }

    /// Returns `true` if `token` is exactly the token this encoder generates for the timestamp and
    /// row ID.
    ///
    /// Zero-padded bodies do not verify; only the canonical form does.
    pub fn verify(&self, token: &str, timestamp: impl Timestamp, row_id: i64) -> bool {
        self.try_encode(timestamp, row_id)
            .is_ok_and(|expected| expected == token)
    }

    /// Recovers the microsecond timestamp a token was generated from, given its row ID.
    pub fn recover_epoch_micros(&self, token: &str, row_id: i64) -> Result<u64, ParseError> {
        self.decode_body(token).map(|body| body.epoch_micros(row_id))
    }
}
