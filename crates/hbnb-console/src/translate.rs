//! Alternate `Kind.method(args)` syntax.
//!
//! Translation is a pure rewrite into canonical command lines. It never
//! touches the store; the console executes the returned lines in order.
//!
//! | Alternate form                         | Canonical lines                         |
//! |----------------------------------------|-----------------------------------------|
//! | `User.all()`                           | `all User`                              |
//! | `User.count()`                         | `count User`                            |
//! | `User.show("id")`                      | `show User id`                          |
//! | `User.destroy("id")`                   | `destroy User id`                       |
//! | `User.update("id", name, "v")`         | `update User id name "v"`               |
//! | `User.update("id", {"a": 1, "b": "v"})`| `update User id a 1`, `update User id b "v"` |

use crate::parse::{split_top_level, strip_quotes, unquote};

/// Result of translating one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    /// Canonical lines to dispatch, in order.
    Lines(Vec<String>),
    /// The line has the alternate shape but names no known method.
    Unknown,
}

/// Rewrite `line` into canonical form. Lines that are not in the alternate
/// form pass through unchanged.
pub fn translate(line: &str) -> Translation {
    let Some((kind, method, args)) = split_call(line) else {
        return Translation::Lines(vec![line.to_string()]);
    };
    let lines = match method {
        "all" | "count" => vec![format!("{method} {kind}")],
        "show" | "destroy" => {
            let id = split_top_level(args, ',')
                .first()
                .copied()
                .map(strip_quotes)
                .unwrap_or_default();
            vec![canonical(&[method, kind, id])]
        }
        "update" => update_lines(kind, args),
        _ => return Translation::Unknown,
    };
    Translation::Lines(lines)
}

/// `kind.method(args)` split into its three parts, or `None` when the line
/// does not have that shape.
fn split_call(line: &str) -> Option<(&str, &str, &str)> {
    let call = line.trim().strip_suffix(')')?;
    let (head, args) = call.split_once('(')?;
    let (kind, method) = head.split_once('.')?;
    let is_word = |s: &str| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    (is_word(kind) && is_word(method)).then_some((kind, method, args))
}

fn update_lines(kind: &str, args: &str) -> Vec<String> {
    let (id, rest) = match split_top_level(args, ',').as_slice() {
        [] => return vec![canonical(&["update", kind])],
        [id] => return vec![canonical(&["update", kind, strip_quotes(id)])],
        // Everything after the first top-level comma.
        [id, rest @ ..] => (strip_quotes(*id), rest.join(", ")),
    };

    if let Some(body) = rest.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        let entries = split_top_level(body, ',');
        if entries.is_empty() {
            return vec![canonical(&["update", kind, id])];
        }
        return entries
            .into_iter()
            .map(|entry| {
                let (field, value) = match split_top_level(entry, ':').as_slice() {
                    [field, value, ..] => (strip_quotes(*field), normalize_value(value)),
                    [field] => (strip_quotes(*field), String::new()),
                    [] => ("", String::new()),
                };
                canonical(&["update", kind, id, field, &value])
            })
            .collect();
    }

    let parts = split_top_level(&rest, ',');
    let field = parts.first().copied().map(strip_quotes).unwrap_or_default();
    let value = parts.get(1).map(|v| normalize_value(v)).unwrap_or_default();
    vec![canonical(&["update", kind, id, field, &value])]
}

/// Quoted values are re-quoted with `"` so that they coerce as strings; a
/// value containing `"` keeps single quotes. Bare values pass through.
fn normalize_value(raw: &str) -> String {
    match unquote(raw) {
        Some(text) if text.contains('"') => format!("'{text}'"),
        Some(text) => format!("\"{text}\""),
        None => raw.to_string(),
    }
}

/// Join non-empty parts with single spaces. Truncated argument lists yield
/// truncated canonical lines, which the console then rejects with the
/// matching usage error.
fn canonical(parts: &[&str]) -> String {
    parts
        .iter()
        .copied()
        .take_while(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines(line: &str) -> Vec<String> {
        match translate(line) {
            Translation::Lines(lines) => lines,
            Translation::Unknown => panic!("unexpected unknown for {line:?}"),
        }
    }

    #[test]
    fn canonical_lines_pass_through() {
        assert_eq!(lines("show User 1234"), ["show User 1234"]);
        assert_eq!(lines(""), [""]);
        assert_eq!(
            lines(r#"update User 1 name "a.b(c)""#),
            [r#"update User 1 name "a.b(c)""#]
        );
    }

    #[test]
    fn all_and_count() {
        assert_eq!(lines("User.all()"), ["all User"]);
        assert_eq!(lines("  City.count()  "), ["count City"]);
    }

    #[test]
    fn show_and_destroy() {
        assert_eq!(lines(r#"User.show("38f2")"#), ["show User 38f2"]);
        assert_eq!(lines("User.show('38f2')"), ["show User 38f2"]);
        assert_eq!(lines("User.destroy(38f2)"), ["destroy User 38f2"]);
    }

    #[test]
    fn missing_arguments_truncate() {
        assert_eq!(lines("User.show()"), ["show User"]);
        assert_eq!(lines("User.update()"), ["update User"]);
        assert_eq!(lines(r#"User.update("1")"#), ["update User 1"]);
        assert_eq!(lines(r#"User.update("1", email)"#), ["update User 1 email"]);
    }

    #[test]
    fn update_triple() {
        assert_eq!(
            lines(r#"User.update("38f2", "first_name", "John Smith")"#),
            [r#"update User 38f2 first_name "John Smith""#]
        );
        assert_eq!(
            lines(r#"User.update("38f2", age, 89)"#),
            ["update User 38f2 age 89"]
        );
        assert_eq!(
            lines(r#"User.update("38f2", motto, 'say "hi"')"#),
            [r#"update User 38f2 motto 'say "hi"'"#]
        );
    }

    #[test]
    fn update_dictionary_expands_in_order() {
        assert_eq!(
            lines(r#"User.update("38f2", {'first_name': "John", "age": 89, "ids": [1, 2]})"#),
            [
                r#"update User 38f2 first_name "John""#,
                "update User 38f2 age 89",
                "update User 38f2 ids [1, 2]",
            ]
        );
    }

    #[test]
    fn update_id_containing_comma() {
        assert_eq!(
            lines(r#"User.update("a,b", email, "x@y")"#),
            [r#"update User a,b email "x@y""#]
        );
        assert_eq!(
            lines(r#"User.update("a,b", {"email": "x@y"})"#),
            [r#"update User a,b email "x@y""#]
        );
    }

    #[test]
    fn update_empty_dictionary() {
        assert_eq!(lines(r#"User.update("38f2", {})"#), ["update User 38f2"]);
    }

    #[test]
    fn unknown_method() {
        assert_eq!(translate("User.fly()"), Translation::Unknown);
    }

    #[test]
    fn unknown_kind_still_translates() {
        assert_eq!(lines("Ghost.all()"), ["all Ghost"]);
    }

    #[test]
    fn not_a_call_passes_through() {
        assert_eq!(lines("User.all("), ["User.all("]);
        assert_eq!(lines(".all()"), [".all()"]);
        assert_eq!(lines("all User.x()"), ["all User.x()"]);
    }

    proptest! {
        #[test]
        fn show_matches_canonical(kind in "[A-Z][a-zA-Z]{0,10}", id in "[a-f0-9-]{1,36}") {
            let alternate = format!("{kind}.show(\"{id}\")");
            prop_assert_eq!(lines(&alternate), vec![format!("show {kind} {id}")]);
        }
    }
}
