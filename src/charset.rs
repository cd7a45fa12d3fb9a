//! Resolving options into the alphabet that identifiers are sampled from.

use std::fmt;

use crate::{ErrorRepr, Options, UriSafety, Warning};

pub const NUMERIC: &str = "0123456789";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Used when the options exclude every character class.
pub const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Characters which may appear unescaped in a URI path or query component.
pub const URI_SAFE: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.~!*'()";

/// An ordered sequence of ASCII bytes to sample from. Duplicates are allowed, and simply make the
/// duplicated character proportionally more likely.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alphabet(Vec<u8>);

impl Alphabet {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Every constructor only admits ASCII.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        ch.is_ascii() && self.0.contains(&(ch as u8))
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether every character of `s` is in [`URI_SAFE`].
pub fn is_uri_safe(s: &str) -> bool {
    s.chars().all(|c| URI_SAFE.contains(c))
}

/// Distinct characters of `s` outside [`URI_SAFE`], in the order they first appear.
fn unsafe_chars(s: &str) -> String {
    let mut found = String::new();
    for c in s.chars() {
        if !URI_SAFE.contains(c) && !found.contains(c) {
            found.push(c);
        }
    }
    found
}

/// Work out the alphabet described by `options`.
///
/// A custom charset is used exactly as given. Otherwise the numeric, lowercase and uppercase
/// classes are concatenated in that order, skipping the excluded ones; excluding all three falls
/// back to [`ALPHANUMERIC`] rather than producing nothing.
pub(crate) fn resolve(
    options: &Options,
    warnings: &mut Vec<Warning>,
) -> Result<Alphabet, ErrorRepr> {
    let bytes = match options.custom_charset() {
        Some(custom) => {
            if !custom.is_ascii() {
                return Err(ErrorRepr::NonAsciiCharset);
            }
            if !is_uri_safe(custom) {
                let chars = unsafe_chars(custom);
                match options.uri_safety {
                    UriSafety::Warn => warnings.push(Warning::NonUriSafeCharset { chars }),
                    UriSafety::Reject => return Err(ErrorRepr::NonUriSafeCharset(chars)),
                }
            }
            custom.as_bytes().to_vec()
        }
        None => {
            let mut bytes = Vec::new();
            if !options.exclude_numeric {
                bytes.extend_from_slice(NUMERIC.as_bytes());
            }
            if !options.exclude_lowercase {
                bytes.extend_from_slice(LOWERCASE.as_bytes());
            }
            if !options.exclude_uppercase {
                bytes.extend_from_slice(UPPERCASE.as_bytes());
            }
            if options.exclude_numeric && options.exclude_lowercase && options.exclude_uppercase {
                bytes.extend_from_slice(ALPHANUMERIC.as_bytes());
            }
            bytes
        }
    };

    if bytes.is_empty() {
        return Err(ErrorRepr::NoValidChars);
    }
    tracing::debug!(size = bytes.len(), "resolved charset");
    Ok(Alphabet(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_ok(options: &Options) -> (Alphabet, Vec<Warning>) {
        let mut warnings = Vec::new();
        let alphabet = resolve(options, &mut warnings).unwrap();
        (alphabet, warnings)
    }

    #[test]
    fn default_is_numeric_then_lower_then_upper() {
        let (alphabet, warnings) = resolve_ok(&Options::default());
        assert_eq!(
            alphabet.as_str(),
            format!("{}{}{}", NUMERIC, LOWERCASE, UPPERCASE)
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn each_exclusion_removes_its_class() {
        let (alphabet, _) = resolve_ok(&Options::new().excluding_numeric());
        assert_eq!(alphabet.as_str(), format!("{}{}", LOWERCASE, UPPERCASE));

        let (alphabet, _) = resolve_ok(&Options::new().excluding_lowercase());
        assert_eq!(alphabet.as_str(), format!("{}{}", NUMERIC, UPPERCASE));

        let (alphabet, _) = resolve_ok(&Options::new().excluding_uppercase());
        assert_eq!(alphabet.as_str(), format!("{}{}", NUMERIC, LOWERCASE));
    }

    #[test]
    fn only_uppercase_left() {
        let (alphabet, _) = resolve_ok(&Options::new().excluding_numeric().excluding_lowercase());
        assert_eq!(alphabet.as_str(), UPPERCASE);
    }

    #[test]
    fn excluding_everything_falls_back_to_alphanumeric() {
        let options = Options::new()
            .excluding_numeric()
            .excluding_lowercase()
            .excluding_uppercase();
        let (alphabet, _) = resolve_ok(&options);
        assert_eq!(alphabet.as_str(), ALPHANUMERIC);
    }

    #[test]
    fn custom_charset_overrides_flags_and_keeps_duplicates() {
        let options = Options::new()
            .excluding_lowercase()
            .with_custom_charset("aab-b");
        let (alphabet, warnings) = resolve_ok(&options);
        assert_eq!(alphabet.as_bytes(), b"aab-b");
        assert!(warnings.is_empty());
    }

    #[test]
    fn unsafe_custom_charset_warns_by_default() {
        let (alphabet, warnings) = resolve_ok(&Options::new().with_custom_charset("ab/+c/"));
        assert_eq!(alphabet.as_str(), "ab/+c/");
        assert_eq!(
            warnings,
            vec![Warning::NonUriSafeCharset {
                chars: "/+".to_owned()
            }]
        );
    }

    #[test]
    fn unsafe_custom_charset_rejected_when_strict() {
        let options = Options::new()
            .with_custom_charset("ab/")
            .with_uri_safety(UriSafety::Reject);
        let mut warnings = Vec::new();
        assert!(matches!(
            resolve(&options, &mut warnings),
            Err(ErrorRepr::NonUriSafeCharset(chars)) if chars == "/"
        ));
    }

    #[test]
    fn non_ascii_custom_charset_is_refused() {
        let mut warnings = Vec::new();
        assert!(matches!(
            resolve(&Options::new().with_custom_charset("aé"), &mut warnings),
            Err(ErrorRepr::NonAsciiCharset)
        ));
    }

    #[test]
    fn uri_safe_set() {
        assert!(is_uri_safe(URI_SAFE));
        assert!(is_uri_safe(""));
        assert!(!is_uri_safe("a b"));
        assert!(!is_uri_safe("%"));
        assert!(!is_uri_safe("ü"));
    }
}
