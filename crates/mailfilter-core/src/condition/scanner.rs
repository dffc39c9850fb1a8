//! Parenthesis-aware scanning of query strings.
//!
//! The query grammar has no tokens beyond its two separators and
//! parentheses, so instead of a token stream this module splits the raw
//! string at separators that sit outside every parenthesized group.

/// Separator between OR-groups.
pub(crate) const OR_SEPARATOR: &str = " OR ";

/// Separator between terms of an AND-group.
pub(crate) const AND_SEPARATOR: &str = " AND ";

/// Parentheses in the scanned input do not balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnbalancedParens {
    /// Byte offset where the imbalance was detected.
    pub position: usize,
}

impl std::fmt::Display for UnbalancedParens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unbalanced parenthesis at position {}", self.position)
    }
}

/// Splits `input` on `separator` wherever it occurs at depth 0.
///
/// A separator whose inner side touches a parenthesis (`( OR x` or
/// `x OR )`) is part of an atom, not a split point. Empty parts between
/// adjacent separators are kept; an empty trailing part is not.
pub(crate) fn split_top_level<'a>(
    input: &'a str,
    separator: &str,
) -> Result<Vec<&'a str>, UnbalancedParens> {
    let bytes = input.as_bytes();
    let sep = separator.as_bytes();
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(UnbalancedParens { position: i })?;
            }
            _ if depth == 0 && bytes[i..].starts_with(sep) && !touches_paren(bytes, i, sep.len()) => {
                // Separators start with an ASCII space, so `i` is a char boundary.
                parts.push(&input[start..i]);
                i += sep.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    if depth != 0 {
        return Err(UnbalancedParens {
            position: input.len(),
        });
    }

    if start < input.len() {
        parts.push(&input[start..]);
    }

    Ok(parts)
}

/// Returns true if the separator at `at` is preceded by `(` or followed by `)`.
fn touches_paren(bytes: &[u8], at: usize, len: usize) -> bool {
    let opens_before = at > 0 && bytes[at - 1] == b'(';
    let closes_after = bytes.get(at + len) == Some(&b')');
    opens_before || closes_after
}

/// Strips parentheses that wrap the whole of `input`, repeatedly, and trims.
///
/// `(a AND b)` becomes `a AND b`, `((a))` becomes `a`, but `(a) AND (b)` is
/// returned unchanged because its outer parentheses belong to different
/// groups.
pub(crate) fn strip_enclosing_parens(input: &str) -> &str {
    let mut current = input.trim();
    while current.len() >= 2
        && current.starts_with('(')
        && current.ends_with(')')
        && encloses_whole(current)
    {
        current = current[1..current.len() - 1].trim();
    }
    current
}

/// Strips parentheses around a single AND-term.
///
/// Unlike [`strip_enclosing_parens`] this stops at parentheses holding a
/// top-level separator: `(b OR c)` inside `a AND (b OR c)` is a nested
/// group and stays as written, while `((b))` still becomes `b`.
pub(crate) fn strip_atom_parens(input: &str) -> &str {
    let mut current = input.trim();
    while current.len() >= 2
        && current.starts_with('(')
        && current.ends_with(')')
        && encloses_whole(current)
    {
        let inner = current[1..current.len() - 1].trim();
        if has_top_level_separator(inner) {
            break;
        }
        current = inner;
    }
    current
}

/// Returns true if `input` splits on either separator at depth 0.
fn has_top_level_separator(input: &str) -> bool {
    [OR_SEPARATOR, AND_SEPARATOR].iter().any(|separator| {
        split_top_level(input, separator).map_or(true, |parts| parts.len() > 1)
    })
}

/// Returns true if the `(` at offset 0 is closed by the final `)`.
fn encloses_whole(input: &str) -> bool {
    let bytes = input.as_bytes();
    let last = bytes.len() - 1;
    let mut depth: usize = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = match depth.checked_sub(1) {
                    Some(d) => d,
                    None => return false,
                };
                if depth == 0 && i != last {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0
}
