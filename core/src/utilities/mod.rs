pub mod assign;
pub use assign::{assign, assign_in, nearest};

pub mod config;
pub use config::{parse_count, validate};

pub mod distance;
pub use distance::{euclidean, squared_euclidean};

pub mod error;
pub use error::{InvalidParam, KMeansError};

pub mod kmeans;
pub use kmeans::{KMeansResult, Session, kmeans, kmeans_from};

pub mod parse;

pub mod structs;
pub use structs::{KMeansOptions, Matrix, RunState, StopPolicy};

pub mod update;
pub use update::{clusters, update};
