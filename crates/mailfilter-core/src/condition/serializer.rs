//! Canonical query-string form of a [`ConditionExpr`].

use std::fmt;

use super::model::{AndGroup, ConditionExpr};
use super::parser::ConditionParser;
use super::scanner::{AND_SEPARATOR, OR_SEPARATOR};

impl ConditionExpr {
    /// Returns the canonical query string, or `None` for an empty expression.
    ///
    /// A lone group is never parenthesized (`a AND b`). With several groups,
    /// multi-term groups are wrapped and single terms stay bare
    /// (`(a AND b) OR c`).
    pub fn to_query_string(&self) -> Option<String> {
        match self.groups() {
            [] => None,
            [only] => Some(join_terms(only)),
            groups => Some(
                groups
                    .iter()
                    .map(|group| {
                        if group.len() == 1 {
                            join_terms(group)
                        } else {
                            format!("({})", join_terms(group))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(OR_SEPARATOR),
            ),
        }
    }
}

fn join_terms(group: &AndGroup) -> String {
    group.terms().join(AND_SEPARATOR)
}

impl fmt::Display for ConditionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_query_string() {
            Some(query) => f.write_str(&query),
            None => Ok(()),
        }
    }
}

/// Rewrites a query string into canonical form.
///
/// Returns `None` when the input holds no condition. Malformed input comes
/// back trimmed but otherwise verbatim.
pub fn canonical_query(input: &str) -> Option<String> {
    ConditionParser::parse(input).into_expr().to_query_string()
}
