//! Query command implementation.
//!
//! Runs a condition query through the parser without touching the store,
//! showing how it splits and what it will be exported as.

use mailfilter_core::{ConditionParser, ParseOutcome};

use super::{CommandContext, Result};
use crate::output::{format_query_json, format_query_table};

/// Options for the query command.
#[derive(Debug)]
pub struct QueryOptions {
    /// The query string to parse.
    pub input: String,
}

/// Result of parsing a query.
#[derive(Debug)]
pub struct QueryResult {
    /// The query as given.
    pub input: String,
    /// True when the query could not be split and was kept whole.
    pub literal: bool,
    /// OR-groups of AND-terms.
    pub groups: Vec<Vec<String>>,
    /// Canonical form, or `None` for an empty query.
    pub canonical: Option<String>,
}

/// Parses a query into its display result.
pub fn analyze(input: &str) -> QueryResult {
    let outcome = ConditionParser::parse(input);
    let literal = matches!(outcome, ParseOutcome::Literal(_));
    let expr = outcome.into_expr();

    QueryResult {
        input: input.to_string(),
        literal,
        groups: expr.to_nested(),
        canonical: expr.to_query_string(),
    }
}

/// Executes the query command.
pub fn execute(ctx: &CommandContext, opts: &QueryOptions) -> Result<()> {
    let result = analyze(&opts.input);

    if ctx.json_output {
        let output = format_query_json(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_query_table(&result, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_structured() {
        let result = analyze("  b AND a OR (c AND d)  ");

        assert!(!result.literal);
        assert_eq!(
            result.groups,
            vec![
                vec!["b".to_string(), "a".to_string()],
                vec!["c".to_string(), "d".to_string()],
            ]
        );
        assert_eq!(result.canonical.as_deref(), Some("(b AND a) OR (c AND d)"));
    }

    #[test]
    fn test_analyze_literal_fallback() {
        let result = analyze("(a OR b");

        assert!(result.literal);
        assert_eq!(result.groups, vec![vec!["(a OR b".to_string()]]);
        assert_eq!(result.canonical.as_deref(), Some("(a OR b"));
    }

    #[test]
    fn test_analyze_empty() {
        let result = analyze("   ");

        assert!(!result.literal);
        assert!(result.groups.is_empty());
        assert!(result.canonical.is_none());
    }
}
