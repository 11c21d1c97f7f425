//! Command-line arguments for the `lloyd` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::utilities::{
    InvalidParam, KMeansOptions, StopPolicy, config::parse_count, error::Result,
    structs::DEFAULT_EPSILON, validate,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Stop {
    /// Stop once the largest centroid movement drops below epsilon
    Threshold,
    /// Stop once no centroid moved more than epsilon since the last iteration
    Stable,
}

impl From<Stop> for StopPolicy {
    fn from(s: Stop) -> Self {
        match s {
            Stop::Threshold => StopPolicy::Threshold,
            Stop::Stable => StopPolicy::Stable,
        }
    }
}

/// K-means clustering of comma-separated points
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of clusters
    pub k: String,

    /// Number of points
    pub n: String,

    /// Dimension of each point
    pub d: String,

    /// Maximum number of iterations [default: 200]
    pub max_iter: Option<String>,

    /// Read points from this file instead of standard input
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Convergence threshold on centroid movement
    #[arg(short, long, default_value_t = DEFAULT_EPSILON, allow_negative_numbers = true)]
    pub epsilon: f64,

    /// Stopping rule
    #[arg(long, value_enum, default_value_t = Stop::Threshold)]
    pub stop: Stop,

    /// Worker threads for the assignment step
    #[arg(long, default_value_t = 1)]
    pub cores: usize,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validated `(k, n, d, options)`.
    pub fn config(&self) -> Result<(usize, usize, usize, KMeansOptions)> {
        let k = parse_count(&self.k, InvalidParam::Clusters)?;
        let n = parse_count(&self.n, InvalidParam::Points)?;
        let d = parse_count(&self.d, InvalidParam::Dimension)?;
        let mut options = KMeansOptions {
            epsilon: self.epsilon,
            stop: self.stop.into(),
            cores: self.cores,
            ..Default::default()
        };
        if let Some(raw) = &self.max_iter {
            options.max_iter = parse_count(raw, InvalidParam::MaxIter)?;
        }
        validate(k, n, d, &options)?;
        Ok((k, n, d, options))
    }
}
