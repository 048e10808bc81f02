use std::io;
use thiserror::Error;
use crate::executor::ExecError;

/// Errors that stop the interpreter loop.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("end of input")]
    EndOfInput,
    #[error(transparent)]
    Exec(#[from] ExecError),
}
