//! Canonical command syntax: command word, argument tokens, and the fixed
//! set of user-facing error messages.

use std::fmt;

use hbnb_types::Kind;

/// A mistake in user input. Reported on the output; the console continues.
///
/// The `Display` text is the exact message printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageError {
    ClassNameMissing,
    ClassDoesNotExist,
    InstanceIdMissing,
    NoInstanceFound,
    AttributeNameMissing,
    ValueMissing,
    ReservedAttribute,
    InvalidValue { field: String },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassNameMissing => write!(f, "** class name missing **"),
            Self::ClassDoesNotExist => write!(f, "** class doesn't exist **"),
            Self::InstanceIdMissing => write!(f, "** instance id missing **"),
            Self::NoInstanceFound => write!(f, "** no instance found **"),
            Self::AttributeNameMissing => write!(f, "** attribute name missing **"),
            Self::ValueMissing => write!(f, "** value missing **"),
            Self::ReservedAttribute => write!(f, "** attribute can't be updated **"),
            Self::InvalidValue { field } => write!(f, "** invalid value for {field} **"),
        }
    }
}

/// Split a line into its command word and the trimmed remainder.
///
/// The command word is the leading run of ASCII letters, digits, and `_`.
/// It is empty when the line starts with anything else.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    (&line[..end], line[end..].trim())
}

/// Split an argument string into tokens.
///
/// Tokens are separated by whitespace. A token opening with `"` or `'` runs
/// to the matching close quote; one opening with `[` runs to its matching
/// `]`. Quotes and brackets stay part of the token. Unterminated groups run
/// to the end of the input.
pub fn tokenize(args: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = args.char_indices().peekable();

    while let Some(&(start, first)) = chars.peek() {
        if first.is_whitespace() {
            chars.next();
            continue;
        }
        let mut end = args.len();
        match first {
            '"' | '\'' => {
                chars.next();
                for (i, c) in chars.by_ref() {
                    if c == first {
                        end = i + c.len_utf8();
                        break;
                    }
                }
            }
            '[' => {
                let mut depth = 0usize;
                let mut quote = None;
                for (i, c) in chars.by_ref() {
                    match (quote, c) {
                        (Some(q), c) if c == q => quote = None,
                        (Some(_), _) => {}
                        (None, '"' | '\'') => quote = Some(c),
                        (None, '[') => depth += 1,
                        (None, ']') => {
                            depth -= 1;
                            if depth == 0 {
                                end = i + 1;
                                break;
                            }
                        }
                        (None, _) => {}
                    }
                }
            }
            _ => {
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() {
                        end = i;
                        break;
                    }
                    chars.next();
                }
            }
        }
        tokens.push(args[start..end].to_string());
    }
    tokens
}

/// Split on `sep` outside of quotes, brackets, and braces. Pieces are
/// trimmed; an all-whitespace input yields no pieces.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '{') => depth += 1,
            (None, ']' | '}') => depth = depth.saturating_sub(1),
            (None, c) if c == sep && depth == 0 => {
                pieces.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            (None, _) => {}
        }
    }
    pieces.push(s[start..].trim());
    pieces
}

/// The text inside matching `"..."` or `'...'` quotes, if `raw` is quoted.
pub fn unquote(raw: &str) -> Option<&str> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => {
            Some(&raw[1..raw.len() - 1])
        }
        _ => None,
    }
}

/// `unquote`, or the input itself when it is not quoted.
pub fn strip_quotes(raw: &str) -> &str {
    unquote(raw).unwrap_or(raw)
}

/// Resolve the kind named by the first token.
pub fn require_kind(tokens: &[String]) -> Result<Kind, UsageError> {
    let name = tokens.first().ok_or(UsageError::ClassNameMissing)?;
    name.parse().map_err(|_| UsageError::ClassDoesNotExist)
}
