//! Common helper functions for output formatting.

use mailfilter_core::{ActionSet, ConditionField, Conditions, SizeOperator};
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a boolean as yes/no.
pub fn format_flag(value: bool, use_colors: bool) -> String {
    match (value, use_colors) {
        (true, true) => "yes".green().to_string(),
        (true, false) => "yes".to_string(),
        (false, true) => "no".dimmed().to_string(),
        (false, false) => "no".to_string(),
    }
}

/// Describes the size condition, e.g. `larger than 5 s_smb`.
pub fn describe_size(conditions: &Conditions) -> Option<String> {
    let value = conditions.size.value?;
    let op = match conditions.size.operator {
        SizeOperator::LargerThan => "larger than",
        SizeOperator::SmallerThan => "smaller than",
    };
    Some(format!("{} {} {}", op, value, conditions.size.unit))
}

/// One-line summary of the set condition fields.
pub fn summarize_conditions(conditions: &Conditions) -> String {
    let mut parts: Vec<String> = ConditionField::ALL
        .into_iter()
        .filter_map(|field| {
            conditions
                .field(field)
                .to_query_string()
                .map(|query| format!("{}: {}", field.label(), query))
        })
        .collect();

    if let Some(size) = describe_size(conditions) {
        parts.push(format!("size: {size}"));
    }
    if conditions.has_attachment {
        parts.push("has attachment".to_string());
    }

    if parts.is_empty() {
        "(no conditions)".to_string()
    } else {
        parts.join("; ")
    }
}

/// Lists the enabled actions in display form.
pub fn describe_actions(actions: &ActionSet) -> Vec<String> {
    let mut described = Vec::new();
    if actions.skip_inbox {
        described.push("Skip inbox".to_string());
    }
    if actions.mark_as_read {
        described.push("Mark as read".to_string());
    }
    if actions.star {
        described.push("Star".to_string());
    }
    if let Some(label) = actions.apply_label.active() {
        described.push(format!("Apply label: {label}"));
    }
    if let Some(address) = actions.forward.active() {
        described.push(format!("Forward to: {address}"));
    }
    if actions.delete {
        described.push("Delete".to_string());
    }
    if actions.not_spam {
        described.push("Never send to spam".to_string());
    }
    if actions.always_important {
        described.push("Always mark as important".to_string());
    }
    if actions.never_important {
        described.push("Never mark as important".to_string());
    }
    if let Some(category) = actions.apply_category.active() {
        described.push(format!("Categorize as: {category}"));
    }
    described
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailfilter_core::condition::parse_condition;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_str("this is too long", 10), "this is...");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("ääääääääää", 5), "ää...");
    }

    #[test]
    fn test_format_flag_plain() {
        assert_eq!(format_flag(true, false), "yes");
        assert_eq!(format_flag(false, false), "no");
    }

    #[test]
    fn test_summarize_conditions() {
        let mut conditions = Conditions::default();
        conditions.from = parse_condition("a@x.com OR b@x.com");
        conditions.size.value = Some(5);
        conditions.has_attachment = true;

        assert_eq!(
            summarize_conditions(&conditions),
            "from: a@x.com OR b@x.com; size: larger than 5 s_smb; has attachment"
        );
    }

    #[test]
    fn test_summarize_no_conditions() {
        assert_eq!(
            summarize_conditions(&Conditions::default()),
            "(no conditions)"
        );
    }

    #[test]
    fn test_describe_actions_skips_disabled_parameters() {
        let mut actions = ActionSet::default();
        actions.star = true;
        actions.apply_label.label_name = "Ignored".to_string();
        actions.forward.enabled = true;
        actions.forward.forward_address = "me@x.com".to_string();

        assert_eq!(
            describe_actions(&actions),
            vec!["Star".to_string(), "Forward to: me@x.com".to_string()]
        );
    }
}
