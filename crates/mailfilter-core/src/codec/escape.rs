//! XML entity escaping for attribute values and comments.
//!
//! Escaping goes through quick-xml. Unescaping is done here because
//! quick-xml rejects unknown entities, which import keeps verbatim.

use std::borrow::Cow;

/// Escapes `& < > ' "` as entity references.
pub fn escape_xml(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Escapes a value for use inside an XML comment.
///
/// Comments may not contain `--`, so each such run is broken up with
/// spaces (`a -- b` becomes `a - - b`).
pub fn escape_comment(raw: &str) -> Cow<'_, str> {
    let mut escaped = escape_xml(raw);
    while escaped.contains("--") {
        escaped = Cow::Owned(escaped.replace("--", "- -"));
    }
    escaped
}

/// Resolves the five predefined entities and numeric character references.
///
/// Anything that does not form a known reference is kept verbatim, so
/// decoding never fails.
pub fn unescape_xml(escaped: &str) -> Cow<'_, str> {
    if !escaped.contains('&') {
        return Cow::Borrowed(escaped);
    }

    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| {
            resolve_entity(&tail[1..semi]).map(|c| (c, semi))
        }) {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
