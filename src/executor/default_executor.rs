use nix::fcntl::OFlag;
use nix::sys::wait::WaitStatus;
use nix::unistd::{pipe2, Pid};
use tracing::{debug, info};
use crate::ast::{Command, ExecutionRequest, Redirection};
use crate::executor::{ExecError, ExecOutcome, ExecResult, Executor};
use super::spawn::{connect_pipe_end, fork_exec, wait_for, PreparedCommand, PreparedRedirect};

/// Runs requests as real child processes with fork/exec.
#[derive(Debug, Default)]
pub struct DefaultExecutor;

impl DefaultExecutor {
    pub fn new() -> Self {
        DefaultExecutor
    }
}

impl Executor for DefaultExecutor {
    fn execute(&mut self, request: &ExecutionRequest) -> ExecResult {
        match request {
            ExecutionRequest::Empty => Ok(ExecOutcome::Completed),
            ExecutionRequest::Exit => Ok(ExecOutcome::Exit),
            ExecutionRequest::Pipeline { left, right } => self.exec_pipeline(left, right),
            ExecutionRequest::Simple { command, redirection, background } => {
                self.exec_simple(command, redirection.as_ref(), *background)
            }
        }
    }
}

impl DefaultExecutor {
    fn exec_pipeline(&mut self, left: &Command, right: &Command) -> ExecResult {
        let writer_cmd = PreparedCommand::new(left)?;
        let reader_cmd = PreparedCommand::new(right)?;

        let (read, write) = pipe2(OFlag::O_CLOEXEC).map_err(ExecError::Pipe)?;

        let writer = fork_exec(&writer_cmd, || {
            connect_pipe_end(&write, libc::STDOUT_FILENO, &read)
        })?;
        debug!(pid = %writer, program = left.program(), "spawned pipeline writer");

        let reader = match fork_exec(&reader_cmd, || {
            connect_pipe_end(&read, libc::STDIN_FILENO, &write)
        }) {
            Ok(pid) => pid,
            Err(e) => {
                // The writer sees EPIPE once both ends are gone
                drop(read);
                drop(write);
                let _ = wait_for(writer);
                return Err(e);
            }
        };
        debug!(pid = %reader, program = right.program(), "spawned pipeline reader");

        // The reader only sees EOF once no write end is left open here
        drop(read);
        drop(write);

        let writer_status = wait_for(writer);
        let reader_status = wait_for(reader);
        log_status(writer, &writer_status?);
        log_status(reader, &reader_status?);
        Ok(ExecOutcome::Completed)
    }

    fn exec_simple(
        &mut self,
        command: &Command,
        redirection: Option<&Redirection>,
        background: bool,
    ) -> ExecResult {
        let prepared = PreparedCommand::new(command)?;
        let redirect = redirection.map(PreparedRedirect::new).transpose()?;

        let pid = fork_exec(&prepared, || match &redirect {
            Some(r) => r.apply(),
            None => Ok(()),
        })?;
        debug!(pid = %pid, program = command.program(), background, "spawned command");

        if background {
            info!(pid = %pid, "[{}] running in background", pid);
            return Ok(ExecOutcome::Detached(pid));
        }

        let status = wait_for(pid)?;
        log_status(pid, &status);
        Ok(ExecOutcome::Completed)
    }
}

fn log_status(pid: Pid, status: &WaitStatus) {
    match status {
        WaitStatus::Exited(_, code) => debug!(pid = %pid, code, "child exited"),
        WaitStatus::Signaled(_, signal, _) => debug!(pid = %pid, ?signal, "child killed by signal"),
        other => debug!(pid = %pid, status = ?other, "child changed state"),
    }
}
