//! Generate random, URI-safe identifiers such as session tokens.
//!
//! ```no_run
//! let options = uriuniq::Options::new().with_length(20).excluding_uppercase();
//! let generated = uriuniq::generate(&options)?;
//! for warning in &generated.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! println!("{}", generated.value);
//! # Ok::<(), uriuniq::Error>(())
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::Serialize;

pub mod charset;
mod options;
pub mod sampler;

pub use charset::Alphabet;
pub use options::{
    Effective, Options, UriSafety, DEFAULT_BUFFER_LEN, DEFAULT_LENGTH, DEFAULT_MAX_BAD_READS,
    MAX_BUFFER_LEN,
};

/// A generated identifier, along with anything the caller should know about how it was made.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Generated {
    pub value: String,
    pub warnings: Vec<Warning>,
}

/// A problem with the options that did not prevent generation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The requested length was not positive, so the default was used.
    DefaultLength { requested: i64, used: usize },
    /// The requested retry budget was not positive, so the default was used.
    DefaultMaxBadReads { requested: i64, used: usize },
    /// The custom charset contains these characters, which are not URI-safe.
    NonUriSafeCharset { chars: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::DefaultLength { requested, used } => write!(
                f,
                "invalid length {requested} provided, using default length {used}"
            ),
            Warning::DefaultMaxBadReads { requested, used } => write!(
                f,
                "invalid max bad reads {requested} provided, using default of {used}"
            ),
            Warning::NonUriSafeCharset { chars } => write!(
                f,
                "custom charset contains characters that are not URI-safe: {chars:?}"
            ),
        }
    }
}

impl Warning {
    /// Whether this warning concerns a default substituted without the caller needing to hear
    /// about it.
    pub fn is_silent(&self) -> bool {
        matches!(self, Warning::DefaultMaxBadReads { .. })
    }
}

/// Generate an identifier using the operating system's secure random source.
pub fn generate(options: &Options) -> Result<Generated, Error> {
    generate_with_rng(&mut OsRng, options)
}

/// Generate an identifier, drawing randomness from `rng`.
pub fn generate_with_rng<R>(rng: &mut R, options: &Options) -> Result<Generated, Error>
where
    R: RngCore + CryptoRng,
{
    let mut warnings = Vec::new();
    let effective = options.normalize(&mut warnings);
    let alphabet = charset::resolve(options, &mut warnings)?;
    let bytes = sampler::sample_inner(
        rng,
        effective.length,
        alphabet.as_bytes(),
        effective.max_bad_reads,
        effective.buffer_len,
    )?;
    // The alphabet is ASCII, so any sequence drawn from it is valid UTF-8.
    let value = String::from_utf8(bytes).map_err(|_| ErrorRepr::NonAsciiCharset)?;
    Ok(Generated { value, warnings })
}

/// The alphabet `options` would sample from, and any warnings about it.
pub fn resolve_charset(options: &Options) -> Result<(Alphabet, Vec<Warning>), Error> {
    let mut warnings = Vec::new();
    let alphabet = charset::resolve(options, &mut warnings)?;
    Ok((alphabet, warnings))
}

/// Broad classes of [`Error`], for callers that need to react differently to each.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The options cannot produce an identifier; nothing random was consumed.
    InvalidConfiguration,
    /// The entropy source was read more times than the retry budget allows.
    RejectionBudgetExceeded,
    /// The entropy source itself failed.
    EntropySource,
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorRepr);

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            ErrorRepr::NoValidChars
            | ErrorRepr::NonAsciiCharset
            | ErrorRepr::NonUriSafeCharset(_)
            | ErrorRepr::CharsetSizeOutOfBounds(_) => ErrorKind::InvalidConfiguration,
            ErrorRepr::TooManyBadReads { .. } => ErrorKind::RejectionBudgetExceeded,
            ErrorRepr::EntropySource(_) => ErrorKind::EntropySource,
        }
    }
}

impl From<ErrorRepr> for Error {
    fn from(err: ErrorRepr) -> Error {
        Error(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorRepr {
    #[error("no valid characters to generate from")]
    NoValidChars,
    #[error("custom charset must contain only ASCII characters")]
    NonAsciiCharset,
    #[error("custom charset contains characters that are not URI-safe: {0:?}")]
    NonUriSafeCharset(String),
    #[error("charset size out of bounds: {0} characters given, but 2 to 256 are required")]
    CharsetSizeOutOfBounds(usize),
    #[error(
        "too many bad reads: {produced} of {wanted} characters generated after {reads} reads \
         from the entropy source"
    )]
    TooManyBadReads {
        reads: usize,
        produced: usize,
        wanted: usize,
    },
    #[error("failed to read from the entropy source: {0}")]
    EntropySource(#[source] rand::Error),
}
