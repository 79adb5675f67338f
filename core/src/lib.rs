pub mod audio;
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod matrix;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod registry;
pub mod results;
pub mod scrape;
pub mod transcribe;

pub use config::Config;
pub use error::{BenchError, BenchResult};
pub use matrix::{SupportMatrix, SupportStatus};
