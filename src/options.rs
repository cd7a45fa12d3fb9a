//! Caller-supplied configuration for a generation call.

use serde::{Deserialize, Serialize};

use crate::Warning;

/// Length used when the requested length is zero or negative.
pub const DEFAULT_LENGTH: usize = 16;
/// Retry budget used when the requested budget is zero or negative.
pub const DEFAULT_MAX_BAD_READS: usize = 150;
/// Number of bytes requested from the entropy source per read.
pub const DEFAULT_BUFFER_LEN: usize = 2048;
/// Larger buffer lengths are clamped to this.
pub const MAX_BUFFER_LEN: usize = 1 << 20;

/// What to do with a custom charset containing characters outside [`crate::charset::URI_SAFE`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UriSafety {
    /// Record a [`Warning::NonUriSafeCharset`] and carry on.
    #[default]
    Warn,
    /// Refuse the charset as invalid configuration.
    Reject,
}

/// Options for [`crate::generate`].
///
/// Every field has a default, so a partial YAML or JSON document deserializes into a complete
/// set of options.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Options {
    /// Number of characters to generate. Zero or negative values fall back to
    /// [`DEFAULT_LENGTH`].
    pub length: i64,
    pub exclude_numeric: bool,
    pub exclude_lowercase: bool,
    pub exclude_uppercase: bool,
    /// An explicit alphabet. When set (and non-empty), the exclusion flags are ignored.
    ///
    /// It must be ASCII, since every character is drawn as a single byte; anything else is
    /// refused as invalid configuration. Other characters outside
    /// [`crate::charset::URI_SAFE`] are handled according to `uri_safety`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_charset: Option<String>,
    /// How many entropy reads may come up short before giving up. Zero or negative values fall
    /// back to [`DEFAULT_MAX_BAD_READS`].
    pub max_bad_reads: i64,
    /// Bytes fetched per entropy read; zero falls back to [`DEFAULT_BUFFER_LEN`], and anything
    /// above [`MAX_BUFFER_LEN`] is clamped to it.
    pub buffer_len: usize,
    pub uri_safety: UriSafety,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            length: DEFAULT_LENGTH as i64,
            exclude_numeric: false,
            exclude_lowercase: false,
            exclude_uppercase: false,
            custom_charset: None,
            max_bad_reads: DEFAULT_MAX_BAD_READS as i64,
            buffer_len: DEFAULT_BUFFER_LEN,
            uri_safety: UriSafety::Warn,
        }
    }
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn with_length(mut self, length: i64) -> Options {
        self.length = length;
        self
    }

    pub fn with_custom_charset(mut self, charset: impl Into<String>) -> Options {
        self.custom_charset = Some(charset.into());
        self
    }

    pub fn with_max_bad_reads(mut self, max_bad_reads: i64) -> Options {
        self.max_bad_reads = max_bad_reads;
        self
    }

    pub fn with_buffer_len(mut self, buffer_len: usize) -> Options {
        self.buffer_len = buffer_len;
        self
    }

    pub fn with_uri_safety(mut self, uri_safety: UriSafety) -> Options {
        self.uri_safety = uri_safety;
        self
    }

    pub fn excluding_numeric(mut self) -> Options {
        self.exclude_numeric = true;
        self
    }

    pub fn excluding_lowercase(mut self) -> Options {
        self.exclude_lowercase = true;
        self
    }

    pub fn excluding_uppercase(mut self) -> Options {
        self.exclude_uppercase = true;
        self
    }

    /// The custom charset, if one is set and non-empty.
    pub(crate) fn custom_charset(&self) -> Option<&str> {
        self.custom_charset.as_deref().filter(|s| !s.is_empty())
    }

    /// Resolve the numeric settings into the values a generation call actually uses, recording a
    /// warning for every default that had to be substituted.
    pub fn normalize(&self, warnings: &mut Vec<Warning>) -> Effective {
        let length = match usize::try_from(self.length) {
            Ok(n) if n > 0 => n,
            _ => {
                tracing::debug!(
                    requested = self.length,
                    used = DEFAULT_LENGTH,
                    "invalid length, substituting default"
                );
                warnings.push(Warning::DefaultLength {
                    requested: self.length,
                    used: DEFAULT_LENGTH,
                });
                DEFAULT_LENGTH
            }
        };
        let max_bad_reads = match usize::try_from(self.max_bad_reads) {
            Ok(n) if n > 0 => n,
            _ => {
                warnings.push(Warning::DefaultMaxBadReads {
                    requested: self.max_bad_reads,
                    used: DEFAULT_MAX_BAD_READS,
                });
                DEFAULT_MAX_BAD_READS
            }
        };
        let buffer_len = match self.buffer_len {
            0 => DEFAULT_BUFFER_LEN,
            n => n.min(MAX_BUFFER_LEN),
        };
        Effective {
            length,
            max_bad_reads,
            buffer_len,
        }
    }
}

/// The numeric settings of an [`Options`] after default substitution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Effective {
    pub length: usize,
    pub max_bad_reads: usize,
    pub buffer_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_through_untouched() {
        let mut warnings = Vec::new();
        let effective = Options::default().normalize(&mut warnings);
        assert_eq!(
            effective,
            Effective {
                length: DEFAULT_LENGTH,
                max_bad_reads: DEFAULT_MAX_BAD_READS,
                buffer_len: DEFAULT_BUFFER_LEN,
            }
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn non_positive_length_substitutes_default() {
        for requested in [0, -1, i64::MIN] {
            let mut warnings = Vec::new();
            let effective = Options::new()
                .with_length(requested)
                .normalize(&mut warnings);
            assert_eq!(effective.length, DEFAULT_LENGTH);
            assert_eq!(
                warnings,
                vec![Warning::DefaultLength {
                    requested,
                    used: DEFAULT_LENGTH
                }]
            );
        }
    }

    #[test]
    fn non_positive_budget_substitutes_default() {
        let mut warnings = Vec::new();
        let effective = Options::new()
            .with_max_bad_reads(0)
            .with_buffer_len(0)
            .normalize(&mut warnings);
        assert_eq!(effective.max_bad_reads, DEFAULT_MAX_BAD_READS);
        assert_eq!(effective.buffer_len, DEFAULT_BUFFER_LEN);
        assert_eq!(
            warnings,
            vec![Warning::DefaultMaxBadReads {
                requested: 0,
                used: DEFAULT_MAX_BAD_READS
            }]
        );
    }

    #[test]
    fn huge_buffer_len_is_clamped() {
        let effective = Options::new()
            .with_buffer_len(usize::MAX)
            .normalize(&mut Vec::new());
        assert_eq!(effective.buffer_len, MAX_BUFFER_LEN);
    }

    #[test]
    fn empty_custom_charset_counts_as_unset() {
        assert_eq!(
            Options::new().with_custom_charset("").custom_charset(),
            None
        );
        assert_eq!(
            Options::new().with_custom_charset("ab").custom_charset(),
            Some("ab")
        );
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let options: Options =
            serde_yaml::from_str("length: 20\nexclude_uppercase: true\n").unwrap();
        assert_eq!(options.length, 20);
        assert!(options.exclude_uppercase);
        assert_eq!(options.max_bad_reads, DEFAULT_MAX_BAD_READS as i64);
        assert_eq!(options.uri_safety, UriSafety::Warn);
        assert_eq!(options.custom_charset, None);
    }

    #[test]
    fn uri_safety_policy_from_yaml() {
        let options: Options = serde_yaml::from_str("uri_safety: reject\n").unwrap();
        assert_eq!(options.uri_safety, UriSafety::Reject);
    }
}
