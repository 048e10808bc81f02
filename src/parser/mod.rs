pub mod default;

use thiserror::Error;
use crate::ast::ExecutionRequest;
use self::default::DefaultParser;

pub trait Parser {
    fn parse(&mut self) -> Result<ExecutionRequest, ParseError>;
}

/// Operator placement the shell cannot act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed command: missing command before '{operator}'")]
    MissingCommand { operator: String },
    #[error("malformed command: missing command after '|'")]
    MissingPipeTarget,
    #[error("malformed command: missing file name after '{operator}'")]
    MissingFilename { operator: String },
}

/// Classify one line's tokens with the default parser.
pub fn parse(tokens: &[String]) -> Result<ExecutionRequest, ParseError> {
    DefaultParser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Command, ExecutionRequest, Redirection};
    use crate::lexer::tokenize;

    fn lex_and_parse(src: &str) -> Result<ExecutionRequest, ParseError> {
        parse(&tokenize(src))
    }

    fn cmd(args: &[&str]) -> Command {
        Command::new(args.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(lex_and_parse(""), Ok(ExecutionRequest::Empty));
        assert_eq!(lex_and_parse("    "), Ok(ExecutionRequest::Empty));
    }

    #[test]
    fn test_exit_is_exact_match() {
        assert_eq!(lex_and_parse("exit"), Ok(ExecutionRequest::Exit));
        assert_eq!(lex_and_parse("  exit "), Ok(ExecutionRequest::Exit));
        assert_eq!(
            lex_and_parse("exit now"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["exit", "now"]),
                redirection: None,
                background: false,
            })
        );
    }

    #[test]
    fn test_exit_with_background_marker_is_a_command() {
        assert_eq!(
            lex_and_parse("exit &"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["exit"]),
                redirection: None,
                background: true,
            })
        );
    }

    #[test]
    fn test_simple_command() {
        let request = lex_and_parse("ls -l /tmp").unwrap();
        match request {
            ExecutionRequest::Simple { command, redirection, background } => {
                assert_eq!(command.program(), "ls");
                assert_eq!(command.arguments(), ["ls", "-l", "/tmp"]);
                assert_eq!(redirection, None);
                assert!(!background);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_split() {
        assert_eq!(
            lex_and_parse("a b | c d"),
            Ok(ExecutionRequest::Pipeline {
                left: cmd(&["a", "b"]),
                right: cmd(&["c", "d"]),
            })
        );
    }

    #[test]
    fn test_only_first_pipe_is_honored() {
        assert_eq!(
            lex_and_parse("a | b | c"),
            Ok(ExecutionRequest::Pipeline {
                left: cmd(&["a"]),
                right: cmd(&["b", "|", "c"]),
            })
        );
    }

    #[test]
    fn test_pipeline_drops_redirection() {
        assert_eq!(
            lex_and_parse("a | b > out.txt"),
            Ok(ExecutionRequest::Pipeline {
                left: cmd(&["a"]),
                right: cmd(&["b", ">", "out.txt"]),
            })
        );
    }

    #[test]
    fn test_pipeline_strips_background_marker() {
        assert_eq!(
            lex_and_parse("a | b &"),
            Ok(ExecutionRequest::Pipeline {
                left: cmd(&["a"]),
                right: cmd(&["b"]),
            })
        );
    }

    #[test]
    fn test_redirect_out() {
        assert_eq!(
            lex_and_parse("cmd arg > out.txt"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["cmd", "arg"]),
                redirection: Some(Redirection::output("out.txt")),
                background: false,
            })
        );
    }

    #[test]
    fn test_redirect_in() {
        assert_eq!(
            lex_and_parse("sort < in.txt"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["sort"]),
                redirection: Some(Redirection::input("in.txt")),
                background: false,
            })
        );
    }

    #[test]
    fn test_first_redirect_wins_and_rest_is_ignored() {
        assert_eq!(
            lex_and_parse("sort < in.txt > out.txt"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["sort"]),
                redirection: Some(Redirection::input("in.txt")),
                background: false,
            })
        );
    }

    #[test]
    fn test_background_marker() {
        let request = lex_and_parse("sleep 5 &").unwrap();
        match request {
            ExecutionRequest::Simple { command, redirection, background } => {
                assert_eq!(command.arguments(), ["sleep", "5"]);
                assert!(!command.arguments().iter().any(|a| a == "&"));
                assert_eq!(redirection, None);
                assert!(background);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_background_with_redirect() {
        assert_eq!(
            lex_and_parse("cmd > out.txt &"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["cmd"]),
                redirection: Some(Redirection::output("out.txt")),
                background: true,
            })
        );
    }

    #[test]
    fn test_ampersand_in_the_middle_is_an_argument() {
        assert_eq!(
            lex_and_parse("echo & done"),
            Ok(ExecutionRequest::Simple {
                command: cmd(&["echo", "&", "done"]),
                redirection: None,
                background: false,
            })
        );
    }

    #[test]
    fn test_leading_pipe_is_malformed() {
        assert_eq!(
            lex_and_parse("| wc"),
            Err(ParseError::MissingCommand { operator: "|".to_string() })
        );
    }

    #[test]
    fn test_trailing_pipe_is_malformed() {
        assert_eq!(lex_and_parse("ls |"), Err(ParseError::MissingPipeTarget));
    }

    #[test]
    fn test_leading_redirect_is_malformed() {
        assert_eq!(
            lex_and_parse("> out.txt"),
            Err(ParseError::MissingCommand { operator: ">".to_string() })
        );
    }

    #[test]
    fn test_redirect_without_filename_is_malformed() {
        assert_eq!(
            lex_and_parse("ls >"),
            Err(ParseError::MissingFilename { operator: ">".to_string() })
        );
        assert_eq!(
            lex_and_parse("cat < &"),
            Err(ParseError::MissingFilename { operator: "<".to_string() })
        );
    }

    #[test]
    fn test_lone_background_marker_is_malformed() {
        assert_eq!(
            lex_and_parse("&"),
            Err(ParseError::MissingCommand { operator: "&".to_string() })
        );
    }
}
