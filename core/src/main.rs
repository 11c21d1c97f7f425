//! `lloyd K N D [MAX_ITER]`: clusters points read from a file or standard
//! input and prints the final centroids.

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, error::ErrorKind};
use lloyd::{KMeansError, cli::Args, kmeans, read_dataset, write_centroids};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return usage_error(err),
    };
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            match err.downcast_ref::<KMeansError>() {
                Some(KMeansError::InvalidConfiguration(param)) => println!("{param}"),
                _ => println!("An Error Has Occurred"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Help and version go through clap; any other argument error is reported
/// like every other non-configuration failure.
fn usage_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{err}");
            println!("An Error Has Occurred");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let (k, n, d, options) = args.config()?;

    let bytes = match &args.input {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("reading standard input")?;
            buf
        }
    };
    let data = read_dataset(&bytes, n, d)?;
    log::debug!("loaded {} points of dimension {}", data.rows(), data.cols());

    let result = kmeans(&data, k, Some(options))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        writeln!(out, "{}", result.to_json()?)?;
    } else {
        write_centroids(&mut out, &result.centroids)?;
    }
    Ok(())
}
