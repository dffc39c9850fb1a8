//! End-to-end tests for exporting a filter set and importing it back.

use mailfilter_core::codec::{export_document, import_document, ExportOptions};
use mailfilter_core::condition::{canonical_query, parse_condition};
use mailfilter_core::{AppSettings, FilterSet, MergePolicy};

fn sample_set() -> FilterSet {
    let mut filters = FilterSet::new();

    let id = filters.add_new();
    let newsletters = filters.get_mut(&id).expect("new filter");
    newsletters.name = "Newsletters".to_string();
    newsletters.conditions.from = parse_condition("news@a.com OR digest@b.com");
    newsletters.conditions.includes = parse_condition("((unsubscribe AND weekly)) OR (list)");
    newsletters.actions.skip_inbox = true;
    newsletters.actions.apply_label.enabled = true;
    newsletters.actions.apply_label.label_name = "Reading".to_string();

    let id = filters.add_new();
    let spam = filters.get_mut(&id).expect("new filter");
    spam.name = "Junk & <noise>".to_string();
    spam.conditions.subject = parse_condition("WIN AND prize");
    spam.actions.delete = true;

    filters
}

#[test]
fn test_export_import_merge_cycle() {
    let original = sample_set();
    let settings = AppSettings {
        enable_delete_action: true,
        ..AppSettings::default()
    };

    let xml = export_document(original.records(), &settings.export_options());
    assert!(xml.contains(r#"value="(unsubscribe AND weekly) OR list""#));
    assert!(xml.contains("<!-- Junk &amp; &lt;noise&gt; -->"));

    let mut target = original.clone();
    let imported = import_document(&xml, &mut target.id_allocator()).expect("import");
    assert_eq!(imported.len(), 2);

    target.merge_imported(imported, MergePolicy::Merge);
    assert_eq!(target.len(), 4);
    assert_eq!(&target.records()[..2], original.records());

    for (copy, source) in target.records()[2..].iter().zip(original.iter()) {
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, source.name);
        assert_eq!(copy.conditions, source.conditions);
        assert_eq!(copy.actions, source.actions);
    }
}

#[test]
fn test_replace_policy_swaps_whole_set() {
    let original = sample_set();
    let xml = export_document(original.records(), &ExportOptions::default());

    let mut target = FilterSet::new();
    target.add_new();
    let imported = import_document(&xml, &mut target.id_allocator()).expect("import");
    target.merge_imported(imported, MergePolicy::Replace);

    assert_eq!(target.len(), 2);
    assert_eq!(target.records()[0].name, "Newsletters");
    // Delete was suppressed on export, so it does not come back.
    assert!(!target.records()[1].actions.delete);
}

#[test]
fn test_exported_conditions_are_canonical() {
    let xml = export_document(sample_set().records(), &ExportOptions::default());
    let imported = import_document(&xml, &mut FilterSet::new().id_allocator()).expect("import");

    let includes = imported[0].conditions.includes.to_query_string().expect("set");
    assert_eq!(canonical_query(&includes).as_deref(), Some(includes.as_str()));
}
