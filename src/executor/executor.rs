use nix::errno::Errno;
use nix::unistd::Pid;
use thiserror::Error;
use crate::ast::ExecutionRequest;

pub type ExecResult = Result<ExecOutcome, ExecError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Nothing to run, or every foreground child has been waited for.
    Completed,
    /// A background child was started and left running.
    Detached(Pid),
    Exit,
}

/// Failures seen by the shell process itself. Failures inside a child
/// (open, exec) are reported by the child and never reach this type.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("pipe failed: {0}")]
    Pipe(#[source] Errno),
    #[error("fork failed: {0}")]
    Fork(#[source] Errno),
    #[error("waitpid failed for {pid}: {source}")]
    Wait { pid: Pid, source: Errno },
    #[error("invalid argument {0:?}: contains a NUL byte")]
    InvalidArgument(String),
}

impl ExecError {
    /// Pipe or process creation failed.
    pub fn is_resource_error(&self) -> bool {
        matches!(self, ExecError::Pipe(_) | ExecError::Fork(_))
    }
}

pub trait Executor {
    fn execute(&mut self, request: &ExecutionRequest) -> ExecResult;
}
