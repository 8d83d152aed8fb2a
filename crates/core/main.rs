#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{num::NonZeroUsize, path::PathBuf, process, time::Duration};

mod file;

use bookmeta::{
    api::google_books::GOOGLE_BOOKS_URL,
    lookup::{Backoff, RetryPolicy},
    RunConfig,
};

use clap::{ArgEnum, Args, Parser};
use eyre::Result;
use log::{error, info, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> Result<()> {
    let Cli {
        input,
        output,
        lookup,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    let config = lookup.into_config();
    trace!("Run configuration: {:?}", config);

    let rows = file::read_source_table(&input)?;
    trace!("Read {} rows from '{}'", rows.len(), input.display());

    let table = bookmeta::enrich(rows, &config)?;

    file::write_output_table(&output, &table)?;

    info!("Updated CSV file saved at: {}", output.display());
    if !quiet {
        println!("Updated CSV file saved at: {}", output.display());
    }
    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<()> {
    // if quiet then ignore verbosity but still show warnings and errors
    let verbosity = if quiet { 1 } else { verbosity + 2 };

    stderrlog::new().verbosity(verbosity).init()?;
    Ok(())
}

#[derive(Parser)]
#[clap(name = "bookmeta")]
#[clap(about = "Enrich a CSV catalog of books with metadata looked up by ISBN")]
#[clap(version, author)]
struct Cli {
    /// The CSV catalog to enrich, it must have an ISBN column
    #[clap(short, long, parse(from_os_str), default_value = "copy.csv")]
    input: PathBuf,

    /// Where the enriched CSV table is written
    #[clap(short, long, parse(from_os_str), default_value = "searching.csv")]
    output: PathBuf,

    #[clap(flatten)]
    lookup: LookupOpts,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Prevents the program from writing to stdout, warnings and errors will still be printed to
    /// stderr.
    #[clap(short, long)]
    quiet: bool,
}

#[derive(Debug, Args)]
struct LookupOpts {
    /// Number of ISBNs looked up at the same time
    #[clap(short, long, default_value = "1")]
    jobs: NonZeroUsize,

    /// Attempts made for an ISBN before giving up on it
    #[clap(long, default_value = "3")]
    retries: u32,

    /// Seconds to wait before retrying a failed lookup
    #[clap(long, default_value = "2")]
    retry_delay: u64,

    /// How the wait between retries evolves
    #[clap(long, arg_enum, default_value = "fixed")]
    backoff: BackoffArg,

    /// Seconds allowed for a single lookup attempt
    #[clap(long, default_value = "10")]
    timeout: u64,

    /// The lookup URL, the ISBN is appended to it
    #[clap(long, default_value = GOOGLE_BOOKS_URL)]
    endpoint: String,
}

impl LookupOpts {
    fn into_config(self) -> RunConfig {
        RunConfig {
            endpoint: self.endpoint,
            retry: RetryPolicy {
                max_attempts: self.retries,
                delay: Duration::from_secs(self.retry_delay),
                backoff: self.backoff.into(),
            },
            timeout: Duration::from_secs(self.timeout),
            concurrency: self.jobs,
        }
    }
}

#[derive(Copy, Clone, Debug, ArgEnum)]
enum BackoffArg {
    Fixed,
    Exponential,
}

impl From<BackoffArg> for Backoff {
    fn from(arg: BackoffArg) -> Self {
        match arg {
            BackoffArg::Fixed => Self::Fixed,
            BackoffArg::Exponential => Self::Exponential,
        }
    }
}
