/// One program invocation. `arguments()[0]` is always the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    /// Returns `None` for an empty argument vector.
    pub fn new(args: Vec<String>) -> Option<Self> {
        if args.is_empty() {
            None
        } else {
            Some(Self { args })
        }
    }

    pub fn from_tokens(tokens: &[String]) -> Option<Self> {
        Self::new(tokens.to_vec())
    }

    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Output,
    Input,
}

impl RedirectKind {
    pub fn from_operator(token: &str) -> Option<Self> {
        match token {
            ">" => Some(RedirectKind::Output),
            "<" => Some(RedirectKind::Input),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub kind: RedirectKind,
    pub target: String,
}

impl Redirection {
    pub fn output(target: impl Into<String>) -> Self {
        Self { kind: RedirectKind::Output, target: target.into() }
    }

    pub fn input(target: impl Into<String>) -> Self {
        Self { kind: RedirectKind::Input, target: target.into() }
    }
}

/// What a single input line asks the shell to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionRequest {
    Empty,
    Exit,
    /// Exactly two stages. Redirection and `&` are never honored here.
    Pipeline {
        left: Command,
        right: Command,
    },
    Simple {
        command: Command,
        redirection: Option<Redirection>,
        background: bool,
    },
}
