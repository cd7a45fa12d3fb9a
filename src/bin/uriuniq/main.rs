use std::path::PathBuf;
use std::process;

use clap::Parser;

mod config;
mod generate;

/// Generate random, URI-safe identifiers.
#[derive(Parser)]
#[command(version)]
enum Args {
    /// Generate one or more identifiers, printing one per line.
    Generate {
        #[command(flatten)]
        charset: CharsetArgs,
        /// Number of characters in each identifier. Zero or negative uses the default of 16.
        #[arg(long, allow_negative_numbers = true)]
        length: Option<i64>,
        /// Number of short reads from the entropy source tolerated before giving up.
        #[arg(long, allow_negative_numbers = true)]
        max_bad_reads: Option<i64>,
        /// Bytes requested from the entropy source per read.
        #[arg(long)]
        buffer_len: Option<usize>,
        /// How many identifiers to generate.
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Print the identifiers, with any warnings, as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the alphabet identifiers would be drawn from.
    Charset {
        #[command(flatten)]
        charset: CharsetArgs,
    },
}

#[derive(clap::Args)]
struct CharsetArgs {
    /// A YAML file of options; flags given on the command line take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    exclude_numeric: bool,
    #[arg(long)]
    exclude_lowercase: bool,
    #[arg(long)]
    exclude_uppercase: bool,
    /// Draw from exactly these characters instead.
    #[arg(long)]
    charset: Option<String>,
    /// Refuse a custom charset with characters that are not URI-safe, rather than warning.
    #[arg(long)]
    strict: bool,
}

fn run() -> Result<(), ProgError> {
    let args = Args::parse();

    match args {
        Args::Generate {
            charset,
            length,
            max_bad_reads,
            buffer_len,
            count,
            json,
        } => {
            let mut options = config::load_options(&charset)?;
            config::apply_numeric_overrides(&mut options, length, max_bad_reads, buffer_len);
            generate::generate(&options, count, json)?;
        }
        Args::Charset { charset } => {
            let options = config::load_options(&charset)?;
            generate::show_charset(&options)?;
        }
    }

    Ok(())
}

fn main() {
    init_tracing();
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("{} {err:#}", console::style("error:").red().bold());
            process::exit(1);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries only the generated identifiers.
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[derive(Debug, thiserror::Error)]
enum ProgError {
    #[error("{0}")]
    Generate(uriuniq::Error),
    #[error("The options file {0} could not be used: {1:#}")]
    Config(String, #[source] anyhow::Error),
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ProgError {
    fn from(err: anyhow::Error) -> ProgError {
        ProgError::Other(err)
    }
}

impl From<uriuniq::Error> for ProgError {
    fn from(err: uriuniq::Error) -> ProgError {
        ProgError::Generate(err)
    }
}
