use tracing::debug;
use crate::ast::{Command, ExecutionRequest, RedirectKind, Redirection};
use crate::parser::{ParseError, Parser};

const EXIT_KEYWORD: &str = "exit";
const PIPE: &str = "|";
const BACKGROUND: &str = "&";

pub struct DefaultParser<'a> {
    tokens: &'a [String],
}

impl<'a> DefaultParser<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }

    fn position_of(&self, tokens: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
        tokens.iter().position(|t| pred(t.as_str()))
    }

    // Removes a trailing `&`, if any
    fn split_background(&self) -> (&'a [String], bool) {
        match self.tokens.split_last() {
            Some((last, rest)) if last == BACKGROUND => (rest, true),
            _ => (self.tokens, false),
        }
    }
}

impl<'a> Parser for DefaultParser<'a> {
    fn parse(&mut self) -> Result<ExecutionRequest, ParseError> {
        if self.tokens.is_empty() {
            return Ok(ExecutionRequest::Empty);
        }
        if self.tokens.len() == 1 && self.tokens[0] == EXIT_KEYWORD {
            return Ok(ExecutionRequest::Exit);
        }

        let (tokens, background) = self.split_background();
        if tokens.is_empty() {
            return Err(ParseError::MissingCommand { operator: BACKGROUND.to_string() });
        }

        let request = if let Some(i) = self.position_of(tokens, |t| t == PIPE) {
            self.parse_pipeline(tokens, i, background)?
        } else if let Some(i) = self.position_of(tokens, |t| RedirectKind::from_operator(t).is_some()) {
            self.parse_redirect(tokens, i, background)?
        } else {
            ExecutionRequest::Simple {
                command: Command::from_tokens(tokens)
                    .ok_or_else(|| ParseError::MissingCommand { operator: BACKGROUND.to_string() })?,
                redirection: None,
                background,
            }
        };
        debug!(?request, "parsed request");
        Ok(request)
    }
}

impl<'a> DefaultParser<'a> {
    fn parse_pipeline(
        &self,
        tokens: &[String],
        pipe_at: usize,
        background: bool,
    ) -> Result<ExecutionRequest, ParseError> {
        let left = Command::from_tokens(&tokens[..pipe_at])
            .ok_or_else(|| ParseError::MissingCommand { operator: PIPE.to_string() })?;
        let right = Command::from_tokens(&tokens[pipe_at + 1..])
            .ok_or(ParseError::MissingPipeTarget)?;
        if background {
            debug!("background marker ignored for pipeline");
        }
        Ok(ExecutionRequest::Pipeline { left, right })
    }

    fn parse_redirect(
        &self,
        tokens: &[String],
        op_at: usize,
        background: bool,
    ) -> Result<ExecutionRequest, ParseError> {
        let operator = &tokens[op_at];
        let kind = RedirectKind::from_operator(operator)
            .ok_or_else(|| ParseError::MissingCommand { operator: operator.clone() })?;
        let command = Command::from_tokens(&tokens[..op_at])
            .ok_or_else(|| ParseError::MissingCommand { operator: operator.clone() })?;
        let target = tokens
            .get(op_at + 1)
            .ok_or_else(|| ParseError::MissingFilename { operator: operator.clone() })?;
        if tokens.len() > op_at + 2 {
            debug!(ignored = ?&tokens[op_at + 2..], "tokens after redirect target ignored");
        }
        Ok(ExecutionRequest::Simple {
            command,
            redirection: Some(Redirection { kind, target: target.clone() }),
            background,
        })
    }
}
