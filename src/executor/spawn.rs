//! fork/exec plumbing shared by every request kind.
//!
//! Everything the child needs (C strings, the argv pointer array,
//! messages) is prepared before `fork`, so the child only performs raw
//! system calls before `execvp` or `_exit`.

use std::ffi::{c_char, CString};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, fork, ForkResult, Pid};
use crate::ast::{Command, RedirectKind, Redirection};
use super::executor::ExecError;

/// Retry a system call interrupted by a signal.
pub(crate) fn syscall<F, T>(f: F) -> nix::Result<T>
where
    F: Fn() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => continue,
            result => return result,
        }
    }
}

fn to_cstring(s: &str) -> Result<CString, ExecError> {
    CString::new(s).map_err(|_| ExecError::InvalidArgument(s.to_string()))
}

/// A `Command` converted into the argv `execvp` expects.
pub(crate) struct PreparedCommand {
    program: CString,
    // Owns the strings `argv_ptrs` points into; their buffers never move
    _argv: Vec<CString>,
    // NULL-terminated, as execvp expects
    argv_ptrs: Vec<*const c_char>,
}

impl PreparedCommand {
    pub(crate) fn new(command: &Command) -> Result<Self, ExecError> {
        let argv = command
            .arguments()
            .iter()
            .map(|a| to_cstring(a))
            .collect::<Result<Vec<_>, _>>()?;
        let argv_ptrs = argv
            .iter()
            .map(|a| a.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();
        Ok(Self {
            program: to_cstring(command.program())?,
            _argv: argv,
            argv_ptrs,
        })
    }

    /// Child side: replace the process image. Only returns on failure.
    fn exec(&self) -> ChildFailure {
        unsafe { libc::execvp(self.program.as_ptr(), self.argv_ptrs.as_ptr()) };
        ChildFailure::new("execvp", Errno::last())
    }
}

/// Child side: undo the runtime's ignored SIGPIPE, which would otherwise
/// survive `execvp` and keep a pipeline writer alive after its reader exits.
fn restore_default_signals() -> Result<(), ChildFailure> {
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) }
        .map(|_| ())
        .map_err(|e| ChildFailure::new("signal", e))
}

pub(crate) struct PreparedRedirect {
    kind: RedirectKind,
    path: CString,
}

impl PreparedRedirect {
    pub(crate) fn new(redirection: &Redirection) -> Result<Self, ExecError> {
        Ok(Self {
            kind: redirection.kind,
            path: to_cstring(&redirection.target)?,
        })
    }

    /// Child side: open the target and put it on stdin or stdout.
    pub(crate) fn apply(&self) -> Result<(), ChildFailure> {
        let (flags, mode, target) = match self.kind {
            RedirectKind::Output => (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC | OFlag::O_CLOEXEC,
                Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH,
                libc::STDOUT_FILENO,
            ),
            RedirectKind::Input => (
                OFlag::O_RDONLY | OFlag::O_CLOEXEC,
                Mode::empty(),
                libc::STDIN_FILENO,
            ),
        };
        let fd = open(self.path.as_c_str(), flags, mode)
            .map_err(|e| ChildFailure::new("open", e))?;
        // Closed on every return path, including a failed dup2
        let file = unsafe { OwnedFd::from_raw_fd(fd) };
        dup2(file.as_raw_fd(), target).map_err(|e| ChildFailure::new("dup2", e))?;
        drop(file);
        Ok(())
    }
}

/// Child side: put one pipe end on `target`, then close both ends.
///
/// The child never returns from `fork_exec`, so the parent's `OwnedFd`
/// copies it inherited are never dropped there; closing by raw fd is safe.
pub(crate) fn connect_pipe_end(
    end: &OwnedFd,
    target: RawFd,
    other: &OwnedFd,
) -> Result<(), ChildFailure> {
    dup2(end.as_raw_fd(), target).map_err(|e| ChildFailure::new("dup2", e))?;
    let _ = close(end.as_raw_fd());
    let _ = close(other.as_raw_fd());
    Ok(())
}

/// Why a child could not reach its program image.
pub(crate) struct ChildFailure {
    stage: &'static str,
    errno: Errno,
}

impl ChildFailure {
    pub(crate) fn new(stage: &'static str, errno: Errno) -> Self {
        Self { stage, errno }
    }

    // perror-style line built from raw writes; the child must not allocate
    fn report(&self, program: &CString) {
        let parts: [&[u8]; 7] = [
            b"osh: ",
            program.as_bytes(),
            b": ",
            self.stage.as_bytes(),
            b" failed: ",
            self.errno.desc().as_bytes(),
            b"\n",
        ];
        for part in parts {
            write_stderr(part);
        }
    }
}

fn write_stderr(mut buf: &[u8]) {
    while !buf.is_empty() {
        let n = unsafe { libc::write(libc::STDERR_FILENO, buf.as_ptr().cast(), buf.len()) };
        if n <= 0 {
            return;
        }
        buf = &buf[n as usize..];
    }
}

/// Fork a child, run `setup` in it, then replace it with `command`.
///
/// Returns the child's pid in the parent. In the child this never
/// returns: it either becomes the program or exits with status 1.
pub(crate) fn fork_exec<F>(command: &PreparedCommand, setup: F) -> Result<Pid, ExecError>
where
    F: FnOnce() -> Result<(), ChildFailure>,
{
    match unsafe { fork() }.map_err(ExecError::Fork)? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => {
            let failure = match restore_default_signals().and_then(|()| setup()) {
                Ok(()) => command.exec(),
                Err(failure) => failure,
            };
            failure.report(&command.program);
            unsafe { libc::_exit(1) }
        }
    }
}

/// Block until `pid` terminates.
pub(crate) fn wait_for(pid: Pid) -> Result<WaitStatus, ExecError> {
    syscall(|| waitpid(pid, None)).map_err(|source| ExecError::Wait { pid, source })
}
