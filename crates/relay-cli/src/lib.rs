//! CLI argument model and command resolution for the relay binary.
//!
//! Gateway settings fall back to the `BASE_API_URL`, `API_KEY`, and
//! `DEFAULT_INSTANCE` environment variables.

pub mod cli_args;
pub mod cli_command;

pub use cli_args::Cli;
pub use cli_command::*;
