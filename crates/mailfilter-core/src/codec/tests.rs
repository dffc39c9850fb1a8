//! Tests for filter document export and import.

use chrono::{TimeZone, Utc};

use super::*;
use crate::condition::ConditionExpr;
use crate::identity::IdAllocator;
use crate::record::{FilterRecord, SizeOperator};

fn expr(groups: Vec<Vec<&str>>) -> ConditionExpr {
    ConditionExpr::from_groups(groups)
}

fn indexed_ids() -> IdAllocator {
    IdAllocator::new().with_generator(|index| format!("id-{}", index))
}

fn import(xml: &str) -> Vec<FilterRecord> {
    import_document(xml, &mut indexed_ids()).expect("document should import")
}

fn with_id(mut record: FilterRecord, id: &str) -> FilterRecord {
    record.id = id.to_string();
    record
}

fn property_names(record: &FilterRecord, options: &ExportOptions) -> Vec<&'static str> {
    entry_lines(record, options)
        .into_iter()
        .filter_map(|line| match line {
            EntryLine::Property { property, .. } => Some(property.name()),
            EntryLine::Annotation(_) => None,
        })
        .collect()
}

fn big_mail_filter() -> FilterRecord {
    let mut record = FilterRecord::new("original");
    record.name = "Big mail".to_string();
    record.conditions.from = expr(vec![vec!["a@x.com"]]);
    record.conditions.size.operator = SizeOperator::LargerThan;
    record.conditions.size.value = Some(10);
    record.conditions.size.unit = "MB".to_string();
    record.actions.skip_inbox = true;
    record
}

fn everything_filter() -> FilterRecord {
    let mut record = FilterRecord::new("everything");
    record.name = "Everything".to_string();
    let conditions = &mut record.conditions;
    conditions.from = expr(vec![vec!["a@x.com"]]);
    conditions.to = expr(vec![vec!["b@y.com"], vec!["c@z.com"]]);
    conditions.subject = expr(vec![vec!["invoice", "2024"]]);
    conditions.includes = expr(vec![vec!["x"], vec!["y", "z"]]);
    conditions.excludes = expr(vec![vec!["unsubscribe"]]);
    conditions.size.operator = SizeOperator::SmallerThan;
    conditions.size.value = Some(5);
    conditions.size.unit = "s_skb".to_string();
    conditions.has_attachment = true;

    let actions = &mut record.actions;
    actions.skip_inbox = true;
    actions.mark_as_read = true;
    actions.star = true;
    actions.apply_label.enabled = true;
    actions.apply_label.label_name = "Work".to_string();
    actions.forward.enabled = true;
    actions.forward.forward_address = "me@example.com".to_string();
    actions.delete = true;
    actions.not_spam = true;
    actions.always_important = true;
    actions.never_important = true;
    actions.apply_category.enabled = true;
    actions.apply_category.category = "^smartlabel_promo".to_string();
    record
}

const DELETE_ON: ExportOptions = ExportOptions {
    delete_enabled: true,
};
const DELETE_OFF: ExportOptions = ExportOptions {
    delete_enabled: false,
};

// ==================== Export ====================

#[test]
fn test_export_empty_set() {
    assert_eq!(
        export_document(&[], &DELETE_OFF),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <feed xmlns=\"http://www.w3.org/2005/Atom\" xmlns:apps=\"http://schemas.google.com/apps/2006\">\n\
         \x20 <title>Mail Filters</title>\n\
         </feed>"
    );
}

#[test]
fn test_export_full_record_exact() {
    let xml = export_document(&[big_mail_filter()], &DELETE_OFF);

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">
  <title>Mail Filters</title>
  <entry>
    <category term="filter"></category>
    <title><!-- Big mail --></title>
    <content></content>
    <apps:property name="from" value="a@x.com"/>
    <apps:property name="size" value="10"/>
    <apps:property name="sizeOperator" value="s_sl"/>
    <apps:property name="sizeUnit" value="MB"/>
    <apps:property name="shouldArchive" value="true"/>
  </entry>
</feed>"#;
    assert_eq!(xml, expected);
}

#[test]
fn test_export_property_order() {
    assert_eq!(
        property_names(&everything_filter(), &DELETE_ON),
        vec![
            "from",
            "to",
            "subject",
            "hasTheWord",
            "doesNotHaveTheWord",
            "size",
            "sizeOperator",
            "sizeUnit",
            "hasAttachment",
            "shouldArchive",
            "shouldMarkAsRead",
            "shouldStar",
            "label",
            "forwardTo",
            "shouldTrash",
            "shouldNeverSpam",
            "shouldAlwaysMarkAsImportant",
            "shouldNeverMarkAsImportant",
            "smartLabelToApply",
        ]
    );
}

#[test]
fn test_export_condition_uses_canonical_query() {
    let xml = export_document(&[everything_filter()], &DELETE_ON);

    assert!(xml.contains(r#"<apps:property name="to" value="b@y.com OR c@z.com"/>"#));
    assert!(xml.contains(r#"<apps:property name="subject" value="invoice AND 2024"/>"#));
    assert!(xml.contains(r#"<apps:property name="hasTheWord" value="x OR (y AND z)"/>"#));
}

#[test]
fn test_export_escapes_values_once() {
    let mut record = FilterRecord::new("1");
    record.conditions.includes = expr(vec![vec!["a&b", "c"], vec!["\"d\""]]);

    let xml = export_document(&[record], &DELETE_OFF);

    assert!(xml.contains(
        r#"<apps:property name="hasTheWord" value="(a&amp;b AND c) OR &quot;d&quot;"/>"#
    ));
    assert!(!xml.contains("&amp;amp;"));
}

#[test]
fn test_export_escapes_name() {
    let mut record = FilterRecord::new("1");
    record.name = r#"Tom & "Jerry" <it's>"#.to_string();

    let xml = export_document(&[record], &DELETE_OFF);

    assert!(xml.contains(
        "<title><!-- Tom &amp; &quot;Jerry&quot; &lt;it&apos;s&gt; --></title>"
    ));
}

#[test]
fn test_export_name_never_contains_double_hyphen() {
    let mut record = FilterRecord::new("1");
    record.name = "News -- daily---digest".to_string();

    let xml = export_document(&[record], &DELETE_OFF);

    assert!(xml.contains("<title><!-- News - - daily- - -digest --></title>"));
    let title = xml
        .lines()
        .find(|line| line.contains("<title><!--"))
        .unwrap();
    let body = title
        .trim()
        .trim_start_matches("<title><!--")
        .trim_end_matches("--></title>");
    assert!(!body.contains("--"), "{title}");
    assert_eq!(import(&xml)[0].name, "News - - daily- - -digest");
}

#[test]
fn test_export_omits_unset_conditions_and_actions() {
    let mut record = FilterRecord::new("1");
    record.conditions.size.unit = "s_sgb".to_string();
    record.actions.apply_label.label_name = "Disabled".to_string();
    record.actions.forward.enabled = true;

    assert!(entry_lines(&record, &DELETE_ON).is_empty());

    let xml = export_document(&[record], &DELETE_ON);
    assert!(!xml.contains("apps:property"));
}

// ==================== Delete Policy ====================

#[test]
fn test_delete_exported_when_enabled() {
    let mut record = FilterRecord::new("1");
    record.actions.delete = true;

    let xml = export_document(&[record], &DELETE_ON);

    assert!(xml.contains(r#"<apps:property name="shouldTrash" value="true"/>"#));
    assert!(!xml.contains(DELETE_SUPPRESSED_NOTE));
}

#[test]
fn test_delete_annotated_when_disabled() {
    let mut record = FilterRecord::new("1");
    record.actions.delete = true;

    let xml = export_document(&[record.clone()], &DELETE_OFF);

    assert!(!xml.contains(r#"name="shouldTrash""#));
    assert!(xml.contains("    <!-- shouldTrash omitted: delete action is disabled -->\n"));
    assert_eq!(
        entry_lines(&record, &DELETE_OFF),
        vec![EntryLine::Annotation(DELETE_SUPPRESSED_NOTE)]
    );
}

#[test]
fn test_suppressed_delete_imports_as_off() {
    let mut record = FilterRecord::new("1");
    record.actions.delete = true;
    record.actions.star = true;

    let imported = import(&export_document(&[record], &DELETE_OFF));

    assert!(!imported[0].actions.delete);
    assert!(imported[0].actions.star);
}

// ==================== Round-trip ====================

#[test]
fn test_roundtrip_full_record() {
    let original = big_mail_filter();
    let imported = import(&export_document(&[original.clone()], &DELETE_OFF));

    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0], with_id(original, "id-0"));
}

#[test]
fn test_roundtrip_every_field() {
    let original = everything_filter();
    let imported = import(&export_document(&[original.clone()], &DELETE_ON));

    assert_eq!(imported, vec![with_id(original, "id-0")]);
}

#[test]
fn test_roundtrip_preserves_order_and_names() {
    let mut first = FilterRecord::new("a");
    first.name = r#"Tom & "Jerry""#.to_string();
    first.actions.star = true;
    let second = big_mail_filter();

    let imported = import(&export_document(&[first.clone(), second.clone()], &DELETE_OFF));

    assert_eq!(imported, vec![with_id(first, "id-0"), with_id(second, "id-1")]);
}

#[test]
fn test_roundtrip_nested_or_condition() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <apps:property name="from" value="a AND (b OR c)"/>
    </entry></feed>"#;

    let first = import(xml);
    assert_eq!(first[0].conditions.from, expr(vec![vec!["a", "(b OR c)"]]));

    let exported = export_document(&first, &DELETE_OFF);
    assert!(exported.contains(r#"<apps:property name="from" value="a AND (b OR c)"/>"#));

    let second = import(&exported);
    assert_eq!(second[0].conditions.from, first[0].conditions.from);
}

// ==================== Import ====================

#[test]
fn test_import_assigns_fresh_ids() {
    let xml = export_document(&[big_mail_filter(), big_mail_filter()], &DELETE_OFF);
    let mut ids = IdAllocator::with_used(["taken"]);

    let imported = import_document(&xml, &mut ids).unwrap();

    assert_ne!(imported[0].id, "original");
    assert_ne!(imported[0].id, imported[1].id);
    assert!(ids.is_used(&imported[0].id));
    assert!(imported[1].id.contains("_1_"));
}

#[test]
fn test_import_entry_without_properties_is_defaulted() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">
  <entry>
    <title><!-- one --></title>
    <apps:property name="shouldStar" value="true"/>
  </entry>
  <entry>
    <title><!-- two --></title>
    <content>nothing useful here</content>
  </entry>
  <entry>
    <title><!-- three --></title>
    <apps:property name="label" value="Later"/>
  </entry>
</feed>"#;

    let imported = import(xml);

    assert_eq!(imported.len(), 3);
    assert!(imported[0].actions.star);
    assert_eq!(imported[1], {
        let mut defaulted = FilterRecord::new("id-1");
        defaulted.name = "two".to_string();
        defaulted
    });
    assert_eq!(imported[2].actions.apply_label.active(), Some("Later"));
}

#[test]
fn test_import_unqualified_properties() {
    let xml = r#"<feed><entry>
        <title><!-- plain --></title>
        <property name="from" value="x@y.com"/>
        <property name="shouldMarkAsRead" value="true"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert_eq!(imported[0].name, "plain");
    assert_eq!(imported[0].conditions.from, expr(vec![vec!["x@y.com"]]));
    assert!(imported[0].actions.mark_as_read);
}

#[test]
fn test_import_any_named_element_fallback() {
    let xml = r#"<feed><entry>
        <setting name="subject" value="hello"/>
        <setting name="shouldStar" value="true"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert_eq!(imported[0].conditions.subject, expr(vec![vec!["hello"]]));
    assert!(imported[0].actions.star);
}

#[test]
fn test_import_first_matching_lookup_wins() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <apps:property name="shouldStar" value="true"/>
        <other name="shouldArchive" value="true"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert!(imported[0].actions.star);
    assert!(!imported[0].actions.skip_inbox);
}

#[test]
fn test_import_unescapes_values() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <title><!-- R&amp;D &#x2014; &quot;q&quot; --></title>
        <apps:property name="subject" value="&lt;urgent&gt; AND &apos;now&apos;"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert_eq!(imported[0].name, "R&D \u{2014} \"q\"");
    assert_eq!(
        imported[0].conditions.subject,
        expr(vec![vec!["<urgent>", "'now'"]])
    );
}

#[test]
fn test_import_parses_condition_groups() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <apps:property name="hasTheWord" value="(a AND b) OR c"/>
        <apps:property name="doesNotHaveTheWord" value="(broken"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert_eq!(
        imported[0].conditions.includes,
        expr(vec![vec!["a", "b"], vec!["c"]])
    );
    assert_eq!(imported[0].conditions.excludes, ConditionExpr::single("(broken"));
}

#[test]
fn test_import_ignores_unknown_properties() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <apps:property name="shouldFly" value="true"/>
        <apps:property name="shouldStar" value="true"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert_eq!(imported.len(), 1);
    assert!(imported[0].actions.star);
}

#[test]
fn test_import_boolean_requires_exact_true() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <apps:property name="shouldStar" value="TRUE"/>
        <apps:property name="hasAttachment" value="1"/>
        <apps:property name="shouldArchive" value="true"/>
    </entry></feed>"#;

    let imported = import(xml);

    assert!(!imported[0].actions.star);
    assert!(!imported[0].conditions.has_attachment);
    assert!(imported[0].actions.skip_inbox);
}

#[test]
fn test_import_size_properties() {
    let xml = r#"<feed xmlns:apps="urn:x">
    <entry>
        <apps:property name="size" value="25"/>
        <apps:property name="sizeOperator" value="s_ss"/>
        <apps:property name="sizeUnit" value="s_skb"/>
    </entry>
    <entry>
        <apps:property name="size" value="lots"/>
        <apps:property name="sizeOperator" value="whatever"/>
    </entry>
    <entry>
        <apps:property name="sizeOperator" value="s_sl"/>
    </entry>
</feed>"#;

    let imported = import(xml);

    let size = &imported[0].conditions.size;
    assert_eq!(size.value, Some(25));
    assert_eq!(size.operator, SizeOperator::SmallerThan);
    assert_eq!(size.unit, "s_skb");

    let size = &imported[1].conditions.size;
    assert_eq!(size.value, None);
    assert_eq!(size.operator, SizeOperator::SmallerThan);
    assert_eq!(size.unit, "s_smb");

    assert_eq!(imported[2].conditions.size.operator, SizeOperator::LargerThan);
}

#[test]
fn test_import_parameter_actions_enable() {
    let xml = r#"<feed xmlns:apps="urn:x"><entry>
        <apps:property name="label" value="Receipts"/>
        <apps:property name="forwardTo" value="me@example.com"/>
        <apps:property name="smartLabelToApply" value="^smartlabel_social"/>
    </entry></feed>"#;

    let actions = &import(xml)[0].actions;

    assert_eq!(actions.apply_label.active(), Some("Receipts"));
    assert_eq!(actions.forward.active(), Some("me@example.com"));
    assert_eq!(actions.apply_category.active(), Some("^smartlabel_social"));
}

#[test]
fn test_import_missing_title_gives_empty_name() {
    let imported = import("<feed><entry/></feed>");
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].name, "");
}

#[test]
fn test_import_document_without_entries() {
    assert!(import("<feed><title>Mail Filters</title></feed>").is_empty());
}

#[test]
fn test_import_malformed_document() {
    let result = import_document("<feed><entry></feed>", &mut indexed_ids());
    assert!(matches!(
        result,
        Err(CodecError::MalformedDocument { .. })
    ));

    assert!(import_document("not xml", &mut indexed_ids()).is_err());
}

// ==================== File Names ====================

#[test]
fn test_export_file_name_all() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    assert_eq!(
        export_file_name(ExportScope::All, &now),
        "gmailfilter_all_20240501_093000.xml"
    );
}

#[test]
fn test_export_file_name_single_sanitized() {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
    assert_eq!(
        export_file_name(ExportScope::Single(r#"a/b:c*?"<>|"#), &now),
        "gmailfilter_a_b_c_______20241231_235958.xml"
    );
}

#[test]
fn test_export_file_name_truncates_and_defaults() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let long = "x".repeat(40);

    assert_eq!(
        export_file_name(ExportScope::Single(&long), &now),
        format!("gmailfilter_{}_20240102_030405.xml", "x".repeat(30))
    );
    assert_eq!(
        export_file_name(ExportScope::Single(""), &now),
        "gmailfilter_unnamed_20240102_030405.xml"
    );
}
