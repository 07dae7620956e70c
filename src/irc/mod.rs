//! IRC line protocol (spec §4.3): framing, tokenization, case folding,
//! nickname/channel validation, numeric reply formatting.

pub mod numerics;
pub mod reply;
pub mod validate;

use std::borrow::Cow;

/// Lowercase ASCII letters; additionally fold `[`->`{`, `]`->`}`, `\`->`|`,
/// `^`->`~` (spec §4.3 "Case folding").
pub fn irc_lower(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'A'..='Z' => c.to_ascii_lowercase(),
            '[' => '{',
            ']' => '}',
            '\\' => '|',
            '^' => '~',
            other => other,
        })
        .collect()
}

/// One parsed IRC line: an upper-cased command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub command: String,
    pub args: Vec<String>,
}

/// Split a line on the first space into `command` and `rest`; if `rest`
/// begins with `:` the remainder is one trailing argument, otherwise
/// split on the first ` :` with the left side whitespace-split and the
/// right side (if present) appended as a final argument (spec §4.3).
pub fn tokenize(line: &str) -> Tokenized {
    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or("").to_ascii_uppercase();
    let rest = parts.next();

    let args = match rest {
        None => Vec::new(),
        Some(rest) if rest.starts_with(':') => vec![rest[1..].to_string()],
        Some(rest) => {
            let mut args: Vec<String> = Vec::new();
            if let Some((positional, trailing)) = rest.split_once(" :") {
                args.extend(positional.split_whitespace().map(str::to_string));
                args.push(trailing.to_string());
            } else {
                args.extend(rest.split_whitespace().map(str::to_string));
            }
            args
        }
    };

    Tokenized { command, args }
}

/// Split a growing read buffer on bare or CRLF newlines, returning
/// complete lines and leaving the trailing partial chunk in `buffer`.
/// Empty lines are discarded (spec §4.3 "Framing").
pub fn drain_lines(buffer: &mut String) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        let Some(idx) = buffer.find('\n') else {
            break;
        };
        let mut line: Cow<str> = Cow::Borrowed(&buffer[..idx]);
        if line.ends_with('\r') {
            let trimmed_len = line.len() - 1;
            line = Cow::Owned(line[..trimmed_len].to_string());
        }
        if !line.is_empty() {
            lines.push(line.into_owned());
        }
        buffer.drain(..=idx);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irc_lower_folds_special_chars() {
        assert_eq!(irc_lower("Foo[Bar]\\Baz^"), "foo{bar}|baz~");
    }

    #[test]
    fn irc_lower_is_idempotent() {
        let inputs = ["FooBar", "NICK[TEST]", "already_lower"];
        for input in inputs {
            let once = irc_lower(input);
            let twice = irc_lower(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn tokenize_trailing_only() {
        let t = tokenize("PRIVMSG :hello there");
        assert_eq!(t.command, "PRIVMSG");
        assert_eq!(t.args, vec!["hello there".to_string()]);
    }

    #[test]
    fn tokenize_positional_and_trailing() {
        let t = tokenize("PRIVMSG #room :hello there");
        assert_eq!(t.command, "PRIVMSG");
        assert_eq!(t.args, vec!["#room".to_string(), "hello there".to_string()]);
    }

    #[test]
    fn tokenize_positional_only() {
        let t = tokenize("JOIN #a,#b key1,key2");
        assert_eq!(t.command, "JOIN");
        assert_eq!(t.args, vec!["#a,#b".to_string(), "key1,key2".to_string()]);
    }

    #[test]
    fn tokenize_no_args() {
        let t = tokenize("LUSERS");
        assert_eq!(t.command, "LUSERS");
        assert!(t.args.is_empty());
    }

    #[test]
    fn tokenize_lowercases_command() {
        let t = tokenize("nick bob");
        assert_eq!(t.command, "NICK");
    }

    #[test]
    fn drain_lines_retains_partial_tail() {
        let mut buffer = "NICK a\r\nUSER b\r\nPAR".to_string();
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines, vec!["NICK a".to_string(), "USER b".to_string()]);
        assert_eq!(buffer, "PAR");
    }

    #[test]
    fn drain_lines_accepts_bare_lf() {
        let mut buffer = "NICK a\nUSER b\n".to_string();
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines, vec!["NICK a".to_string(), "USER b".to_string()]);
    }

    #[test]
    fn drain_lines_discards_empty_lines() {
        let mut buffer = "\r\nNICK a\r\n\r\n".to_string();
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines, vec!["NICK a".to_string()]);
    }
}
