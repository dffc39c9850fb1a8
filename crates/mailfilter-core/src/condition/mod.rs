//! Condition expressions and their query-string grammar.
//!
//! Each condition field of a filter (from, to, subject, has-the-word,
//! does-not-have-the-word) holds a [`ConditionExpr`]: OR-groups of
//! AND-terms. This module converts between that structure and the flat
//! query string used by the filter export format.
//!
//! # Syntax
//!
//! - `a AND b` - both terms must match
//! - `a OR b` - either term matches
//! - `(a AND b) OR c` - parentheses group AND-terms inside an OR
//!
//! Operators are upper-case and space-delimited. Anything else is a term.
//!
//! # Canonical Form
//!
//! Serialization is canonical rather than verbatim: redundant parentheses
//! disappear and multi-term groups are parenthesized only when there is
//! more than one group.
//!
//! ```
//! use mailfilter_core::condition::{canonical_query, parse_condition};
//!
//! let expr = parse_condition("((a AND b)) OR (c)");
//! assert_eq!(expr.to_query_string().as_deref(), Some("(a AND b) OR c"));
//!
//! assert_eq!(canonical_query("(x)").as_deref(), Some("x"));
//! assert_eq!(canonical_query("   "), None);
//! ```

mod model;
mod parser;
mod scanner;
mod serializer;

pub use model::{is_operator_keyword, AndGroup, ConditionExpr, AND_KEYWORD, OR_KEYWORD};
pub use parser::{parse_condition, ConditionParser, ParseOutcome};
pub use serializer::canonical_query;
