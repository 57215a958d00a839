//! Command-line parsing
//!
//! Parses what was typed after `:`. Nothing here touches the buffer except
//! [`Substitution::apply`], which rewrites a single line.

/// Parsed `:` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:w`, `:write`
    Write,
    /// `:q`, `:quit`, `:q!`
    Quit,
    /// `:wq`, `:x`
    WriteQuit,
    /// `:<n>`, 1-based
    GotoLine(usize),
    /// `:s/search/replace/flags`, `:%s/...`
    Substitute(Substitution),
    /// Anything else
    Unknown(String),
}

/// Lines a substitution applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteRange {
    CurrentLine,
    AllLines,
}

/// Literal search-and-replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub search: String,
    pub replacement: String,
    /// `g` flag: replace every occurrence instead of the first
    pub global: bool,
    pub range: SubstituteRange,
}

impl Substitution {
    /// Rewrite one line, or `None` when the search text does not occur
    pub fn apply(&self, line: &str) -> Option<String> {
        if !line.contains(self.search.as_str()) {
            return None;
        }
        if self.global {
            Some(line.replace(self.search.as_str(), &self.replacement))
        } else {
            Some(line.replacen(self.search.as_str(), &self.replacement, 1))
        }
    }
}

/// Parse command string (without leading ':')
///
/// Returns `None` for input that should be ignored without a message: an
/// empty line or a malformed substitution.
pub fn parse_command(cmd_str: &str) -> Option<Command> {
    let trimmed = cmd_str.trim();

    match trimmed {
        "" => None,
        "w" | "write" => Some(Command::Write),
        "q" | "quit" | "q!" | "quit!" => Some(Command::Quit),
        "wq" | "x" => Some(Command::WriteQuit),
        _ if trimmed.starts_with("s/") || trimmed.starts_with("%s/") => {
            parse_substitution(trimmed).map(Command::Substitute)
        }
        _ => match trimmed.parse::<usize>() {
            Ok(line) => Some(Command::GotoLine(line)),
            Err(_) => Some(Command::Unknown(trimmed.into())),
        },
    }
}

fn parse_substitution(cmd: &str) -> Option<Substitution> {
    let (range, body) = match cmd.strip_prefix('%') {
        Some(rest) => (SubstituteRange::AllLines, rest),
        None => (SubstituteRange::CurrentLine, cmd),
    };

    let mut segments = body.strip_prefix("s/")?.split('/');
    let search = segments.next().filter(|s| !s.is_empty())?;
    let replacement = segments.next()?;
    let flags = segments.next().unwrap_or_default();

    Some(Substitution {
        search: search.into(),
        replacement: replacement.into(),
        global: flags.contains('g'),
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_quit() {
        assert_eq!(parse_command("w"), Some(Command::Write));
        assert_eq!(parse_command(" write "), Some(Command::Write));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("wq"), Some(Command::WriteQuit));
        assert_eq!(parse_command("x"), Some(Command::WriteQuit));
    }

    #[test]
    fn test_parse_goto_line() {
        assert_eq!(parse_command("12"), Some(Command::GotoLine(12)));
        assert_eq!(parse_command("0"), Some(Command::GotoLine(0)));
    }

    #[test]
    fn test_parse_empty_is_ignored() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn test_parse_unknown() {
        match parse_command("unknown") {
            Some(Command::Unknown(s)) => assert_eq!(s, "unknown"),
            other => panic!("Expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_substitution() {
        let Some(Command::Substitute(sub)) = parse_command("s/foo/bar/g") else {
            panic!("Expected Substitute");
        };
        assert_eq!(sub.search, "foo");
        assert_eq!(sub.replacement, "bar");
        assert!(sub.global);
        assert_eq!(sub.range, SubstituteRange::CurrentLine);
    }

    #[test]
    fn test_parse_substitution_without_flags() {
        let Some(Command::Substitute(sub)) = parse_command("s/foo/bar") else {
            panic!("Expected Substitute");
        };
        assert!(!sub.global);

        let Some(Command::Substitute(sub)) = parse_command("%s/a//") else {
            panic!("Expected Substitute");
        };
        assert_eq!(sub.replacement, "");
        assert_eq!(sub.range, SubstituteRange::AllLines);
    }

    #[test]
    fn test_parse_malformed_substitution() {
        assert_eq!(parse_command("s/foo"), None);
        assert_eq!(parse_command("s//bar/"), None);
    }

    #[test]
    fn test_apply_substitution() {
        let mut sub = Substitution {
            search: "foo".into(),
            replacement: "bar".into(),
            global: false,
            range: SubstituteRange::CurrentLine,
        };
        assert_eq!(sub.apply("foo foo").as_deref(), Some("bar foo"));
        sub.global = true;
        assert_eq!(sub.apply("foo foo").as_deref(), Some("bar bar"));
        assert_eq!(sub.apply("nothing"), None);
    }
}
