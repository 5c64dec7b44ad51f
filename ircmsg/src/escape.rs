//! IRCv3 tag value escaping.
//!
//! | raw   | escaped |
//! |-------|---------|
//! | `;`   | `\:`    |
//! | space | `\s`    |
//! | `\`   | `\\`    |
//! | CR    | `\r`    |
//! | LF    | `\n`    |

use std::borrow::Cow;

/// Decodes an escaped tag value.
///
/// A backslash before any other character is dropped, as is a trailing lone
/// backslash.
pub fn unescape(value: &str) -> Cow<'_, str> {
    if !value.contains('\\') {
        return Cow::Borrowed(value);
    }

    let mut ret = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            ret.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => ret.push(';'),
            Some('s') => ret.push(' '),
            Some('\\') => ret.push('\\'),
            Some('r') => ret.push('\r'),
            Some('n') => ret.push('\n'),
            Some(other) => ret.push(other),
            None => {}
        }
    }
    Cow::Owned(ret)
}

/// Encodes a tag value for the wire.
///
/// NUL has no escape sequence and is passed through; [`Tag::write_to`]
/// refuses values holding it.
///
/// [`Tag::write_to`]: crate::data::Tag::write_to
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut ret = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            ';' => ret.push_str("\\:"),
            ' ' => ret.push_str("\\s"),
            '\\' => ret.push_str("\\\\"),
            '\r' => ret.push_str("\\r"),
            '\n' => ret.push_str("\\n"),
            _ => ret.push(c),
        }
    }
    Cow::Owned(ret)
}

fn needs_escape(c: char) -> bool {
    matches!(c, ';' | ' ' | '\\' | '\r' | '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert!(matches!(unescape("plain"), Cow::Borrowed(_)));
        assert_eq!(unescape(r"a\:b\sc\\d"), "a;b c\\d");
        assert_eq!(unescape(r"line\r\nbreak"), "line\r\nbreak");
        assert_eq!(unescape(r"7\sraiders"), "7 raiders");
    }

    #[test]
    fn test_unescape_invalid() {
        assert_eq!(unescape(r"\b"), "b");
        assert_eq!(unescape(r"trailing\"), "trailing");
        assert_eq!(unescape("\\"), "");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("tur,ty"), "tur,ty");
        assert!(matches!(escape("tur,ty"), Cow::Borrowed(_)));
        assert_eq!(escape("a;b c\\d"), r"a\:b\sc\\d");
        assert_eq!(escape("x\r\ny"), r"x\r\ny");
    }

    #[test]
    fn test_escape_reverses_unescape() {
        let raw = "hello; world\\\r\n";
        assert_eq!(unescape(&escape(raw)), raw);
    }
}
