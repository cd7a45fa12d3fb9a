use std::io::{self, Write};

use anyhow::Context;

use crate::ProgError;

pub(crate) fn generate(
    options: &uriuniq::Options,
    count: usize,
    json: bool,
) -> Result<(), ProgError> {
    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        results.push(uriuniq::generate(options)?);
    }

    // Every result carries the same warnings, as they depend only on the options.
    if let Some(first) = results.first() {
        print_warnings(&first.warnings);
    }

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &results)
            .context("failed to write identifiers as JSON to stdout")?;
        writeln!(stdout).context("failed to write to stdout")?;
    } else {
        for generated in results.iter() {
            writeln!(stdout, "{}", generated.value).context("failed to write to stdout")?;
        }
    }
    Ok(())
}

pub(crate) fn show_charset(options: &uriuniq::Options) -> Result<(), ProgError> {
    let (alphabet, warnings) = uriuniq::resolve_charset(options)?;
    print_warnings(&warnings);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{alphabet}").context("failed to write to stdout")?;
    let size = alphabet.len();
    let written = if (uriuniq::sampler::MIN_ALPHABET_LEN..=uriuniq::sampler::MAX_ALPHABET_LEN)
        .contains(&size)
    {
        writeln!(
            stdout,
            "{size} characters, {:.1}% of random bytes rejected",
            uriuniq::sampler::rejection_rate(size) * 100.0,
        )
    } else {
        writeln!(
            stdout,
            "{size} characters, outside the 2 to 256 that can be sampled from"
        )
    };
    written.context("failed to write to stdout")?;
    Ok(())
}

fn print_warnings(warnings: &[uriuniq::Warning]) {
    for warning in warnings.iter().filter(|w| !w.is_silent()) {
        eprintln!("{} {}", console::style("warning:").yellow().bold(), warning);
    }
}
