//! Splits a command string into argv tokens.
//!
//! Whitespace separates tokens. `"`, `'`, and `` ` `` each open a quoted span
//! that the same character closes; inside a quoted span all characters
//! (including whitespace) are literal and nesting is not supported. A quoted
//! span glued to an unquoted run with no intervening whitespace is appended to
//! the current token rather than starting a new one, so `-p="hello world"`
//! tokenizes to the single argument `-p=hello world`.

use crate::error::TaskError;

/// Tokenize `input` into argv-style tokens. Returns `Ok(vec![])` for an empty
/// string. An unterminated quoted span is reported as
/// [`TaskError::UnclosedQuotation`], naming the offending input.
pub fn tokenize(input: &str) -> Result<Vec<String>, TaskError> {
    let mut tokens: Vec<String> = Vec::new();
    let mut prev_was_space_or_start = true;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if is_quote(ch) {
            let quoted = read_until(&mut chars, ch)
                .ok_or_else(|| TaskError::UnclosedQuotation(input.to_string()))?;
            if prev_was_space_or_start {
                tokens.push(quoted);
            } else {
                tokens
                    .last_mut()
                    .expect("prev_was_space_or_start is false only after a token exists")
                    .push_str(&quoted);
            }
            prev_was_space_or_start = false;
        } else if is_whitespace(ch) {
            prev_was_space_or_start = true;
        } else {
            if prev_was_space_or_start {
                tokens.push(String::new());
            }
            tokens
                .last_mut()
                .expect("prev_was_space_or_start is false only after a token exists")
                .push(ch);
            prev_was_space_or_start = false;
        }
    }

    Ok(tokens)
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '`')
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Consumes characters up to and including the closing `quote`, returning the
/// text in between. Returns `None` if the input is exhausted first.
fn read_until(chars: &mut std::iter::Peekable<std::str::Chars>, quote: char) -> Option<String> {
    let mut out = String::new();
    for ch in chars.by_ref() {
        if ch == quote {
            return Some(out);
        }
        out.push(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // Covers quoting, escaping, and shell-command-prefix edge cases for the
    // tokenizer.

    #[test]
    fn split_command() {
        let parts = tokenize("command -param \"hello world\"").unwrap();
        assert_eq!(parts, vec!["command", "-param", "hello world"]);
    }

    #[test]
    fn split_command_2() {
        let parts =
            tokenize("command -param \"hello world\" -param2 \"hello world 2\"").unwrap();
        assert_eq!(
            parts,
            vec!["command", "-param", "hello world", "-param2", "hello world 2"]
        );
    }

    #[test]
    fn split_command_3() {
        let parts =
            tokenize("command -param=\"hello world\" -param2=\"hello world 2\"").unwrap();
        assert_eq!(
            parts,
            vec!["command", "-param=hello world", "-param2=hello world 2"]
        );
    }

    #[test]
    fn split_command_4() {
        let parts = tokenize("\"hello world\" command").unwrap();
        assert_eq!(parts, vec!["hello world", "command"]);
    }

    #[test]
    fn split_command_5() {
        let parts = tokenize("\"  hello world  \" command").unwrap();
        assert_eq!(parts, vec!["  hello world  ", "command"]);
    }

    #[test]
    fn split_command_6() {
        let parts =
            tokenize("\" hello world \" --param2 \"hello world 2\" -param3=\"hello world 3\"")
                .unwrap();
        assert_eq!(
            parts,
            vec![" hello world ", "--param2", "hello world 2", "-param3=hello world 3"]
        );
    }

    #[test]
    fn split_command_7_single_quotes() {
        let parts =
            tokenize("' hello world ' --param2 'hello world 2' -param3='hello world 3'")
                .unwrap();
        assert_eq!(
            parts,
            vec![" hello world ", "--param2", "hello world 2", "-param3=hello world 3"]
        );
    }

    #[test]
    fn split_command_8_backticks() {
        let parts =
            tokenize("` hello world ` --param2 `hello world 2` -param3=`hello world 3`")
                .unwrap();
        assert_eq!(
            parts,
            vec![" hello world ", "--param2", "hello world 2", "-param3=hello world 3"]
        );
    }

    #[test]
    fn split_command_9() {
        let parts = tokenize("-param=\"hello\" hello_world -param2=world").unwrap();
        assert_eq!(parts, vec!["-param=hello", "hello_world", "-param2=world"]);
    }

    #[test]
    fn split_command_no_whitespace() {
        let parts = tokenize("command").unwrap();
        assert_eq!(parts, vec!["command"]);
    }

    #[test]
    fn split_command_empty() {
        let parts = tokenize("").unwrap();
        assert_eq!(parts, Vec::<String>::new());
    }

    #[test]
    fn split_command_unclosed_string() {
        let err = tokenize("command -param \"hello world").unwrap_err();
        assert_eq!(
            err,
            TaskError::UnclosedQuotation("command -param \"hello world".to_string())
        );
    }

    #[test]
    fn split_command_unclosed_string_2() {
        let err = tokenize("command -param \"").unwrap_err();
        assert_eq!(
            err,
            TaskError::UnclosedQuotation("command -param \"".to_string())
        );
    }

    #[test]
    fn tokenizer_scenario_quoted_prefix_cli() {
        let parts = tokenize("command -param \"hello world\"").unwrap();
        assert_eq!(parts, vec!["command", "-param", "hello world"]);
    }

    #[test]
    fn tokenizer_scenario_leading_quoted_run() {
        let parts = tokenize("\"  hello world  \" command").unwrap();
        assert_eq!(parts, vec!["  hello world  ", "command"]);
    }

    #[test]
    fn adjacency_law() {
        // for any unquoted prefix P and quoted body Q, tokenize(P+"\""+Q+"\"")
        // yields one token equal to P+Q
        for (prefix, body) in [("-p=", "hello world"), ("x", ""), ("", "only")] {
            let input = format!("{prefix}\"{body}\"");
            let parts = tokenize(&input).unwrap();
            assert_eq!(parts, vec![format!("{prefix}{body}")]);
        }
    }

    #[test]
    fn empty_input_law() {
        assert_eq!(tokenize("").unwrap(), Vec::<String>::new());
    }
}
