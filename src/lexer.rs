/// Split a line into tokens on runs of the space character.
///
/// No quoting or escaping; tabs and other whitespace stay inside tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_spaces() {
        assert_eq!(tokenize("ls -l /tmp"), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn test_collapses_runs_of_spaces() {
        assert_eq!(tokenize("  echo   hi  "), vec!["echo", "hi"]);
    }

    #[test]
    fn test_blank_lines_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("     ").is_empty());
    }

    #[test]
    fn test_operators_need_surrounding_spaces() {
        assert_eq!(tokenize("a|b > c"), vec!["a|b", ">", "c"]);
    }

    #[test]
    fn test_tabs_are_not_separators() {
        assert_eq!(tokenize("a\tb c"), vec!["a\tb", "c"]);
    }
}
