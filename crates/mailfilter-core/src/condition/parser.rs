//! Best-effort parser from query strings to [`ConditionExpr`].

use log::{debug, warn};

use super::model::{AndGroup, ConditionExpr};
use super::scanner::{
    split_top_level, strip_atom_parens, strip_enclosing_parens, UnbalancedParens, AND_SEPARATOR,
    OR_SEPARATOR,
};

/// Result of parsing a query string.
///
/// Parsing never fails. Input that cannot be split structurally is kept
/// whole as [`ParseOutcome::Literal`], so callers can tell a real parse
/// from the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The input was split into OR-groups of AND-terms.
    Structured(ConditionExpr),
    /// The input was malformed; this is the whole trimmed input.
    Literal(String),
}

impl ParseOutcome {
    /// Returns true for the literal fallback.
    pub fn is_literal(&self) -> bool {
        matches!(self, ParseOutcome::Literal(_))
    }

    /// Converts the outcome into an expression.
    ///
    /// A literal becomes a single group holding the whole input as one term.
    pub fn into_expr(self) -> ConditionExpr {
        match self {
            ParseOutcome::Structured(expr) => expr,
            ParseOutcome::Literal(text) => ConditionExpr::single(text),
        }
    }
}

/// Parser for the restricted boolean query grammar.
///
/// # Grammar
///
/// ```text
/// query   ::= group (" OR " group)*
/// group   ::= "(" terms ")" | terms
/// terms   ::= term (" AND " term)*
/// ```
///
/// A parenthesized term that itself holds an operator, as in
/// `a AND (b OR c)`, is kept verbatim as one term.
///
/// Operators are case-sensitive and must be surrounded by single spaces.
/// Terms cannot contain ` AND ` or ` OR `; there is no escaping.
///
/// # Example
///
/// ```
/// use mailfilter_core::condition::{ConditionExpr, ConditionParser, ParseOutcome};
///
/// let outcome = ConditionParser::parse("(a AND b) OR c");
/// assert_eq!(
///     outcome,
///     ParseOutcome::Structured(ConditionExpr::from_groups(vec![vec!["a", "b"], vec!["c"]]))
/// );
///
/// assert!(ConditionParser::parse("(a OR b").is_literal());
/// ```
pub struct ConditionParser;

impl ConditionParser {
    /// Parses a query string.
    ///
    /// Empty or whitespace-only input yields an empty structured expression.
    /// Unbalanced parentheses, or input that leaves no terms after removing
    /// separators, yield [`ParseOutcome::Literal`].
    pub fn parse(input: &str) -> ParseOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return ParseOutcome::Structured(ConditionExpr::new());
        }

        match Self::parse_groups(trimmed) {
            Ok(expr) if !expr.is_empty() => {
                debug!("parsed {:?} into {} group(s)", trimmed, expr.len());
                ParseOutcome::Structured(expr)
            }
            Ok(_) => {
                warn!("query {:?} has no terms; keeping it as a literal", trimmed);
                ParseOutcome::Literal(trimmed.to_string())
            }
            Err(err) => {
                warn!("query {:?}: {}; keeping it as a literal", trimmed, err);
                ParseOutcome::Literal(trimmed.to_string())
            }
        }
    }

    /// Splits on top-level ` OR `, then each group on top-level ` AND `.
    ///
    /// A parenthesized segment that is itself an OR is flattened into the
    /// outer OR, since both mean the same thing.
    fn parse_groups(input: &str) -> Result<ConditionExpr, UnbalancedParens> {
        let mut expr = ConditionExpr::new();

        for segment in split_top_level(input, OR_SEPARATOR)? {
            let segment = strip_enclosing_parens(segment);
            if has_top_level(segment, OR_SEPARATOR)? {
                for group in Self::parse_groups(segment)?.groups() {
                    expr.push_group(group.clone());
                }
                continue;
            }

            let mut terms = Vec::new();
            Self::collect_terms(segment, &mut terms)?;
            match AndGroup::new(terms) {
                Some(group) => expr.push_group(group),
                None => debug!("dropping empty group {:?}", segment),
            }
        }

        Ok(expr)
    }

    /// Collects the AND-terms of one segment.
    ///
    /// A parenthesized term holding an OR is kept as one term with its
    /// parentheses; a parenthesized AND is flattened into the segment.
    fn collect_terms<'a>(
        segment: &'a str,
        terms: &mut Vec<&'a str>,
    ) -> Result<(), UnbalancedParens> {
        for atom in split_top_level(segment, AND_SEPARATOR)? {
            let stripped = strip_enclosing_parens(atom);
            if has_top_level(stripped, OR_SEPARATOR)? {
                terms.push(strip_atom_parens(atom));
            } else if has_top_level(stripped, AND_SEPARATOR)? {
                Self::collect_terms(stripped, terms)?;
            } else {
                terms.push(stripped);
            }
        }
        Ok(())
    }
}

/// Returns true if `input` splits on `separator` outside parentheses.
fn has_top_level(input: &str, separator: &str) -> Result<bool, UnbalancedParens> {
    Ok(split_top_level(input, separator)?.len() > 1)
}

/// Parses a query string straight into an expression, literal fallback included.
pub fn parse_condition(input: &str) -> ConditionExpr {
    ConditionParser::parse(input).into_expr()
}
