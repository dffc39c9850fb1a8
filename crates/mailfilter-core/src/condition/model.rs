//! Structured form of a condition field: an OR of AND-groups of terms.

use serde::{Deserialize, Serialize};

/// The AND operator keyword of the query grammar.
pub const AND_KEYWORD: &str = "AND";

/// The OR operator keyword of the query grammar.
pub const OR_KEYWORD: &str = "OR";

/// Returns true if `term` is one of the operator keywords.
///
/// Keywords are case-sensitive: `and` is an ordinary term.
pub fn is_operator_keyword(term: &str) -> bool {
    term == AND_KEYWORD || term == OR_KEYWORD
}

/// Trims a raw term, rejecting empty strings and operator keywords.
fn normalize_term(raw: &str) -> Option<String> {
    let term = raw.trim();
    if term.is_empty() || is_operator_keyword(term) {
        None
    } else {
        Some(term.to_string())
    }
}

/// An ordered group of terms that must all match.
///
/// An `AndGroup` is never empty; constructors return `None` instead of
/// building one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndGroup {
    terms: Vec<String>,
}

impl AndGroup {
    /// Builds a group from raw terms.
    ///
    /// Terms are trimmed; empty terms and operator keywords are dropped.
    /// Returns `None` if nothing is left.
    pub fn new<I, T>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .filter_map(|t| normalize_term(t.as_ref()))
            .collect();

        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    /// Builds a one-term group.
    pub fn single(term: impl AsRef<str>) -> Option<Self> {
        Self::new([term])
    }

    /// Returns the terms in order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Returns the number of terms (always at least one).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always false; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Appends a term. Returns false if the term was rejected.
    pub fn push(&mut self, term: impl AsRef<str>) -> bool {
        match normalize_term(term.as_ref()) {
            Some(term) => {
                self.terms.push(term);
                true
            }
            None => false,
        }
    }
}

/// The structured value of one condition field.
///
/// Groups are OR-ed together; terms inside a group are AND-ed. Order is
/// preserved everywhere. The empty expression means "no condition".
///
/// Stored as a JSON array of arrays of strings. Deserialization normalizes
/// the stored form, so data written by older versions that interleaved
/// `"AND"` markers between terms loads cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct ConditionExpr {
    groups: Vec<AndGroup>,
}

impl ConditionExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an expression from raw groups of terms, normalizing each group
    /// and dropping groups that end up empty.
    pub fn from_groups<I, G, T>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            groups: groups.into_iter().filter_map(AndGroup::new).collect(),
        }
    }

    /// Builds a one-group, one-term expression (empty if the term is rejected).
    pub fn single(term: impl AsRef<str>) -> Self {
        Self {
            groups: AndGroup::single(term).into_iter().collect(),
        }
    }

    /// Returns the groups in order.
    pub fn groups(&self) -> &[AndGroup] {
        &self.groups
    }

    /// Returns the number of OR-groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the expression has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Appends an OR-group.
    pub fn push_group(&mut self, group: AndGroup) {
        self.groups.push(group);
    }

    /// Removes and returns the OR-group at `index`.
    pub fn remove_group(&mut self, index: usize) -> Option<AndGroup> {
        (index < self.groups.len()).then(|| self.groups.remove(index))
    }

    /// Removes a single term. A group left without terms is removed too.
    pub fn remove_term(&mut self, group: usize, term: usize) -> Option<String> {
        let target = self.groups.get_mut(group)?;
        if term >= target.terms.len() {
            return None;
        }
        let removed = target.terms.remove(term);
        if target.terms.is_empty() {
            self.groups.remove(group);
        }
        Some(removed)
    }

    /// Returns the groups as plain nested vectors.
    pub fn to_nested(&self) -> Vec<Vec<String>> {
        self.groups.iter().map(|g| g.terms.clone()).collect()
    }
}

impl From<Vec<Vec<String>>> for ConditionExpr {
    fn from(groups: Vec<Vec<String>>) -> Self {
        Self::from_groups(groups)
    }
}

impl From<ConditionExpr> for Vec<Vec<String>> {
    fn from(expr: ConditionExpr) -> Self {
        expr.groups.into_iter().map(|g| g.terms).collect()
    }
}
