pub mod decode;
pub use decode::{read_dataset, read_points};

pub mod encode;
pub use encode::{format_centroids, write_centroids};
