//! Building [`uriuniq::Options`] from an options file and command line flags.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;

use crate::{CharsetArgs, ProgError};

pub(crate) fn load_options(args: &CharsetArgs) -> Result<uriuniq::Options, ProgError> {
    let mut options = match args.config.as_deref() {
        Some(path) => read_options_file(path)
            .map_err(|err| ProgError::Config(path.display().to_string(), err))?,
        None => uriuniq::Options::default(),
    };

    // Flags can only switch things on; an absent flag leaves the file's value alone.
    options.exclude_numeric |= args.exclude_numeric;
    options.exclude_lowercase |= args.exclude_lowercase;
    options.exclude_uppercase |= args.exclude_uppercase;
    if let Some(charset) = args.charset.as_ref() {
        options.custom_charset = Some(charset.clone());
    }
    if args.strict {
        options.uri_safety = uriuniq::UriSafety::Reject;
    }
    tracing::debug!(?options, "options loaded");
    Ok(options)
}

pub(crate) fn apply_numeric_overrides(
    options: &mut uriuniq::Options,
    length: Option<i64>,
    max_bad_reads: Option<i64>,
    buffer_len: Option<usize>,
) {
    if let Some(length) = length {
        options.length = length;
    }
    if let Some(max_bad_reads) = max_bad_reads {
        options.max_bad_reads = max_bad_reads;
    }
    if let Some(buffer_len) = buffer_len {
        options.buffer_len = buffer_len;
    }
}

fn read_options_file(path: &Path) -> anyhow::Result<uriuniq::Options> {
    let file = File::open(path).context("failed to open the file")?;
    // An empty document means "all defaults".
    let options: Option<uriuniq::Options> = serde_yaml::from_reader(BufReader::new(file))
        .context("failed to parse the file as YAML")?;
    Ok(options.unwrap_or_default())
}
