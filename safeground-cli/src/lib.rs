pub mod cli;
pub mod setup;

pub use cli::{Cli, DomainArg, PartitionArg};
pub use setup::build_pipeline;
