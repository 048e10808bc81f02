//! The read-parse-execute loop.
//!
//! Each iteration goes `Prompting -> Reading` and then one of
//! `Empty` (blank line), `Recalling` (`!!`) or `Dispatching`, before
//! prompting again. The loop only stops after dispatching `exit`, or
//! with an error (end of input, fatal resource failure).

use std::io::{BufRead, Write};
use tracing::{debug, warn};
use crate::config::{Config, ResourceErrorPolicy};
use crate::error::ShellError;
use crate::executor::{ExecOutcome, Executor};
use crate::history::HistoryCell;
use crate::lexer::tokenize;
use crate::parser;
use crate::prompt::ShellPrompt;

pub const RECALL: &str = "!!";
pub const NO_HISTORY_NOTICE: &str = "No commands in history.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub struct Repl<E: Executor> {
    executor: E,
    history: HistoryCell,
    prompt: ShellPrompt,
    on_resource_error: ResourceErrorPolicy,
}

impl<E: Executor> Repl<E> {
    pub fn new(executor: E, config: &Config) -> Self {
        Self {
            executor,
            history: HistoryCell::new(),
            prompt: ShellPrompt::new(config.prompt.clone()),
            on_resource_error: config.on_resource_error,
        }
    }

    pub fn history(&self) -> &HistoryCell {
        &self.history
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run until `exit`. End of input is reported as `ShellError::EndOfInput`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> Result<(), ShellError> {
        loop {
            self.prompt.show_prompt(out)?;
            let line = self.prompt.read_line(input)?.ok_or(ShellError::EndOfInput)?;
            if self.process_line(&line, out)? == LoopControl::Stop {
                return Ok(());
            }
        }
    }

    /// Handle one raw line.
    pub fn process_line<W: Write>(&mut self, raw: &str, out: &mut W) -> Result<LoopControl, ShellError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let line = if trimmed == RECALL {
            match self.history.recall() {
                Some(previous) => {
                    let previous = previous.to_string();
                    writeln!(out, "{}", previous)?;
                    out.flush()?;
                    previous
                }
                None => {
                    writeln!(out, "{}", NO_HISTORY_NOTICE)?;
                    out.flush()?;
                    return Ok(LoopControl::Continue);
                }
            }
        } else {
            self.history.record(trimmed);
            trimmed.to_string()
        };

        self.dispatch(&line)
    }

    fn dispatch(&mut self, line: &str) -> Result<LoopControl, ShellError> {
        debug!(line, "dispatching");
        let request = match parser::parse(&tokenize(line)) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("osh: {}", e);
                return Ok(LoopControl::Continue);
            }
        };

        match self.executor.execute(&request) {
            Ok(ExecOutcome::Exit) => Ok(LoopControl::Stop),
            Ok(ExecOutcome::Completed | ExecOutcome::Detached(_)) => Ok(LoopControl::Continue),
            Err(e) if e.is_resource_error() && self.on_resource_error == ResourceErrorPolicy::Fatal => {
                Err(ShellError::Exec(e))
            }
            Err(e) => {
                warn!(error = %e, "command failed");
                eprintln!("osh: {}", e);
                Ok(LoopControl::Continue)
            }
        }
    }
}
