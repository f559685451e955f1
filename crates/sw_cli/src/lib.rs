pub mod cli;
pub mod ingest;
pub mod logging;
pub mod seed;

pub use cli::{Cli, Commands, IngestArgs};
pub use ingest::IngestContext;
