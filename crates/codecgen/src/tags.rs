//! Struct tag handling.
//!
//! Tags follow Go's conventional format: space-separated `key:"value"` pairs
//! where each value is a Go interpreted string literal.

/// A raw struct tag.
#[derive(Debug, Clone, Copy)]
pub struct StructTag<'a>(pub &'a str);

impl<'a> StructTag<'a> {
    /// Look up the value for `key`, mirroring `reflect.StructTag.Lookup`.
    ///
    /// Scanning stops at the first malformed pair, so keys after it are not
    /// found.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut tag = self.0.as_bytes();
        while !tag.is_empty() {
            let mut i = 0;
            while i < tag.len() && tag[i] == b' ' {
                i += 1;
            }
            tag = &tag[i..];
            if tag.is_empty() {
                break;
            }

            i = 0;
            while i < tag.len()
                && tag[i] > b' '
                && tag[i] != b':'
                && tag[i] != b'"'
                && tag[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= tag.len() || tag[i] != b':' || tag[i + 1] != b'"' {
                break;
            }
            let name = &tag[..i];
            tag = &tag[i + 1..];

            i = 1;
            while i < tag.len() && tag[i] != b'"' {
                if tag[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= tag.len() {
                break;
            }
            let quoted = &tag[..=i];
            tag = &tag[i + 1..];

            if name == key.as_bytes() {
                let quoted = std::str::from_utf8(quoted).ok()?;
                return unquote(quoted);
            }
        }
        None
    }

    /// Like [`lookup`](Self::lookup) but returns an empty string when absent.
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }
}

/// Decode a Go string literal (interpreted or raw).
///
/// Returns `None` when the literal is malformed.
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return Some(raw.replace('\r', ""));
    }
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    'a' => '\u{7}',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{b}',
                    '\\' => '\\',
                    '"' => '"',
                    'x' => hex_char(&mut chars, 2)?,
                    'u' => hex_char(&mut chars, 4)?,
                    'U' => hex_char(&mut chars, 8)?,
                    d @ '0'..='7' => {
                        let mut value = d.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        if value > 0xff {
                            return None;
                        }
                        char::from_u32(value)?
                    }
                    _ => return None,
                };
                out.push(escaped);
            }
            c => out.push(c),
        }
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

/// Render a tag as a Go string literal for re-emission.
///
/// Tags are written as raw strings; a tag containing a backquote cannot be,
/// so it falls back to an interpreted string.
pub fn quote_tag(tag: &str) -> String {
    if tag.contains('`') {
        go_string(tag)
    } else {
        format!("`{}`", tag)
    }
}

/// Render `s` as a Go interpreted string literal.
pub fn go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
