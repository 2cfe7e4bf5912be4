//! Error types for the cellcalc command line

use thiserror::Error;

/// Problems with the command line itself
#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("No command given")]
    NoCommand,

    #[error("{command} expects {expected} arguments, got {got}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        got: usize,
    },
}
