//! Filter records: identity, conditions and actions of one rule.

use serde::{Deserialize, Serialize};

use crate::condition::ConditionExpr;

/// Size unit used when none was chosen (megabytes in the export vocabulary).
pub const DEFAULT_SIZE_UNIT: &str = "s_smb";

/// Name shown for a filter whose name is empty.
pub const UNTITLED_NAME: &str = "Untitled";

/// Comparison applied by a size condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeOperator {
    /// Message is larger than the given size.
    #[default]
    LargerThan,
    /// Message is smaller than the given size.
    SmallerThan,
}

/// A message size constraint.
///
/// The condition is unset while `value` is `None`; an unset size is never
/// exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeCondition {
    #[serde(default)]
    pub operator: SizeOperator,
    #[serde(default)]
    pub value: Option<u64>,
    /// Opaque unit token, passed through to the export unchanged.
    #[serde(default = "default_size_unit")]
    pub unit: String,
}

fn default_size_unit() -> String {
    DEFAULT_SIZE_UNIT.to_string()
}

impl Default for SizeCondition {
    fn default() -> Self {
        Self {
            operator: SizeOperator::LargerThan,
            value: None,
            unit: default_size_unit(),
        }
    }
}

impl SizeCondition {
    /// Returns true if a size value is present.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// The condition fields that hold a query expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionField {
    From,
    To,
    Subject,
    /// Message contains the words.
    Includes,
    /// Message does not contain the words.
    Excludes,
}

impl ConditionField {
    /// All fields, in export order.
    pub const ALL: [ConditionField; 5] = [
        ConditionField::From,
        ConditionField::To,
        ConditionField::Subject,
        ConditionField::Includes,
        ConditionField::Excludes,
    ];

    /// Returns a short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ConditionField::From => "from",
            ConditionField::To => "to",
            ConditionField::Subject => "subject",
            ConditionField::Includes => "has words",
            ConditionField::Excludes => "doesn't have",
        }
    }
}

/// All matching criteria of a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    #[serde(default)]
    pub from: ConditionExpr,
    #[serde(default)]
    pub to: ConditionExpr,
    #[serde(default)]
    pub subject: ConditionExpr,
    #[serde(default)]
    pub includes: ConditionExpr,
    #[serde(default)]
    pub excludes: ConditionExpr,
    #[serde(default)]
    pub size: SizeCondition,
    #[serde(default)]
    pub has_attachment: bool,
}

impl Conditions {
    /// Returns the expression stored for `field`.
    pub fn field(&self, field: ConditionField) -> &ConditionExpr {
        match field {
            ConditionField::From => &self.from,
            ConditionField::To => &self.to,
            ConditionField::Subject => &self.subject,
            ConditionField::Includes => &self.includes,
            ConditionField::Excludes => &self.excludes,
        }
    }

    /// Returns the expression stored for `field`, mutably.
    pub fn field_mut(&mut self, field: ConditionField) -> &mut ConditionExpr {
        match field {
            ConditionField::From => &mut self.from,
            ConditionField::To => &mut self.to,
            ConditionField::Subject => &mut self.subject,
            ConditionField::Includes => &mut self.includes,
            ConditionField::Excludes => &mut self.excludes,
        }
    }

    /// Returns true if no criterion is set.
    pub fn is_empty(&self) -> bool {
        ConditionField::ALL.iter().all(|&f| self.field(f).is_empty())
            && !self.size.is_set()
            && !self.has_attachment
    }
}

/// Apply-label action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAction {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub label_name: String,
}

impl LabelAction {
    /// Returns the label when the action is enabled with a non-empty name.
    pub fn active(&self) -> Option<&str> {
        active_parameter(self.enabled, &self.label_name)
    }
}

/// Forward-to action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardAction {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub forward_address: String,
}

impl ForwardAction {
    /// Returns the address when the action is enabled with a non-empty address.
    pub fn active(&self) -> Option<&str> {
        active_parameter(self.enabled, &self.forward_address)
    }
}

/// Apply-category action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAction {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub category: String,
}

impl CategoryAction {
    /// Returns the category when the action is enabled with a non-empty value.
    pub fn active(&self) -> Option<&str> {
        active_parameter(self.enabled, &self.category)
    }
}

fn active_parameter(enabled: bool, value: &str) -> Option<&str> {
    (enabled && !value.is_empty()).then_some(value)
}

/// What a filter does to matching mail.
///
/// `delete` records the user's intent even while the delete policy is off;
/// the export decides whether it becomes an active property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSet {
    #[serde(default)]
    pub skip_inbox: bool,
    #[serde(default)]
    pub mark_as_read: bool,
    #[serde(default)]
    pub star: bool,
    #[serde(default)]
    pub apply_label: LabelAction,
    #[serde(default)]
    pub forward: ForwardAction,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub not_spam: bool,
    #[serde(default)]
    pub always_important: bool,
    #[serde(default)]
    pub never_important: bool,
    #[serde(default)]
    pub apply_category: CategoryAction,
}

/// One complete filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecord {
    /// Unique identity within a [`FilterSet`](crate::FilterSet). Never
    /// derived from the name.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(default)]
    pub actions: ActionSet,
}

impl FilterRecord {
    /// Creates an untitled record with default conditions and no actions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            conditions: Conditions::default(),
            actions: ActionSet::default(),
        }
    }

    /// Returns the name, or [`UNTITLED_NAME`] when it is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNTITLED_NAME
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = FilterRecord::new("id-1");

        assert_eq!(record.id, "id-1");
        assert!(record.name.is_empty());
        assert!(record.conditions.is_empty());
        assert_eq!(record.conditions.size.operator, SizeOperator::LargerThan);
        assert_eq!(record.conditions.size.unit, DEFAULT_SIZE_UNIT);
        assert_eq!(record.actions, ActionSet::default());
    }

    #[test]
    fn test_display_name() {
        let mut record = FilterRecord::new("id");
        assert_eq!(record.display_name(), UNTITLED_NAME);
        record.name = "Newsletters".to_string();
        assert_eq!(record.display_name(), "Newsletters");
    }

    #[test]
    fn test_parameterized_actions_gate_on_enabled_and_value() {
        let mut label = LabelAction::default();
        assert_eq!(label.active(), None);

        label.label_name = "Work".to_string();
        assert_eq!(label.active(), None);

        label.enabled = true;
        assert_eq!(label.active(), Some("Work"));

        let forward = ForwardAction {
            enabled: true,
            forward_address: String::new(),
        };
        assert_eq!(forward.active(), None);
    }

    #[test]
    fn test_field_accessors() {
        let mut conditions = Conditions::default();
        *conditions.field_mut(ConditionField::Subject) = ConditionExpr::single("invoice");

        assert_eq!(
            conditions.field(ConditionField::Subject),
            &ConditionExpr::single("invoice")
        );
        assert!(!conditions.is_empty());
    }

    #[test]
    fn test_deserialize_stored_record() {
        let json = r#"{
            "id": "1700000000000",
            "name": "Receipts",
            "conditions": {
                "from": [["shop@example.com"]],
                "subject": [["receipt", "AND", "order"]],
                "size": { "operator": "smaller_than", "value": 5, "unit": "s_skb" },
                "hasAttachment": true
            },
            "actions": {
                "skipInbox": true,
                "applyLabel": { "enabled": true, "labelName": "Receipts" }
            }
        }"#;

        let record: FilterRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "Receipts");
        assert_eq!(
            record.conditions.subject,
            ConditionExpr::from_groups(vec![vec!["receipt", "order"]])
        );
        assert!(record.conditions.to.is_empty());
        assert_eq!(record.conditions.size.operator, SizeOperator::SmallerThan);
        assert_eq!(record.conditions.size.value, Some(5));
        assert_eq!(record.conditions.size.unit, "s_skb");
        assert!(record.conditions.has_attachment);
        assert!(record.actions.skip_inbox);
        assert_eq!(record.actions.apply_label.active(), Some("Receipts"));
        assert!(!record.actions.delete);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let record = FilterRecord::new("x");
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"hasAttachment\":false"));
        assert!(json.contains("\"skipInbox\":false"));
        assert!(json.contains("\"labelName\":\"\""));
        assert!(json.contains("\"operator\":\"larger_than\""));
    }
}
