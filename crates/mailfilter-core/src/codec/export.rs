//! Filter set to XML document.

use chrono::{DateTime, TimeZone};
use log::{debug, warn};

use super::escape::{escape_comment, escape_xml};
use super::properties::Property;
use crate::condition::ConditionExpr;
use crate::record::{ConditionField, FilterRecord};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const FEED_OPEN: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">"#;
const FEED_TITLE: &str = "Mail Filters";

/// Comment written in place of `shouldTrash` while deletion is disabled.
pub const DELETE_SUPPRESSED_NOTE: &str = "shouldTrash omitted: delete action is disabled";

/// Policy passed into export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Whether a requested delete action becomes an active `shouldTrash`.
    pub delete_enabled: bool,
}

/// One line of an exported entry body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLine {
    /// An active property; the value is not yet escaped.
    Property { property: Property, value: String },
    /// An inert comment standing in for a suppressed property.
    Annotation(&'static str),
}

impl EntryLine {
    fn property(property: Property, value: impl Into<String>) -> Self {
        EntryLine::Property {
            property,
            value: value.into(),
        }
    }

    fn flag(property: Property) -> Self {
        Self::property(property, "true")
    }
}

/// Returns the property value for a condition field, or `None` if unset.
pub fn condition_value(expr: &ConditionExpr) -> Option<String> {
    expr.to_query_string()
}

/// Lists the body lines of one entry, in export order.
///
/// Conditions, actions and gated parameters that are unset produce no line
/// at all.
pub fn entry_lines(record: &FilterRecord, options: &ExportOptions) -> Vec<EntryLine> {
    let mut lines = Vec::new();
    let conditions = &record.conditions;

    for field in ConditionField::ALL {
        if let Some(value) = condition_value(conditions.field(field)) {
            lines.push(EntryLine::property(Property::for_condition(field), value));
        }
    }

    if let Some(size) = conditions.size.value {
        lines.push(EntryLine::property(Property::Size, size.to_string()));
        lines.push(EntryLine::property(
            Property::SizeOperator,
            conditions.size.operator.wire_value(),
        ));
        lines.push(EntryLine::property(
            Property::SizeUnit,
            conditions.size.unit.clone(),
        ));
    }

    if conditions.has_attachment {
        lines.push(EntryLine::flag(Property::HasAttachment));
    }

    let actions = &record.actions;
    if actions.skip_inbox {
        lines.push(EntryLine::flag(Property::ShouldArchive));
    }
    if actions.mark_as_read {
        lines.push(EntryLine::flag(Property::ShouldMarkAsRead));
    }
    if actions.star {
        lines.push(EntryLine::flag(Property::ShouldStar));
    }
    if let Some(label) = actions.apply_label.active() {
        lines.push(EntryLine::property(Property::Label, label));
    }
    if let Some(address) = actions.forward.active() {
        lines.push(EntryLine::property(Property::ForwardTo, address));
    }
    if actions.delete {
        if options.delete_enabled {
            lines.push(EntryLine::flag(Property::ShouldTrash));
        } else {
            warn!(
                "filter {:?}: delete action not exported because it is disabled",
                record.display_name()
            );
            lines.push(EntryLine::Annotation(DELETE_SUPPRESSED_NOTE));
        }
    }
    if actions.not_spam {
        lines.push(EntryLine::flag(Property::ShouldNeverSpam));
    }
    if actions.always_important {
        lines.push(EntryLine::flag(Property::ShouldAlwaysMarkAsImportant));
    }
    if actions.never_important {
        lines.push(EntryLine::flag(Property::ShouldNeverMarkAsImportant));
    }
    if let Some(category) = actions.apply_category.active() {
        lines.push(EntryLine::property(Property::SmartLabelToApply, category));
    }

    lines
}

/// Serializes filters into the feed document, one entry per record in order.
///
/// The output has two-space indentation, `\n` line endings and no trailing
/// newline.
pub fn export_document(records: &[FilterRecord], options: &ExportOptions) -> String {
    let mut xml = String::with_capacity(256 + records.len() * 512);
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(FEED_OPEN);
    xml.push('\n');
    xml.push_str(&format!("  <title>{}</title>\n", FEED_TITLE));

    for record in records {
        write_entry(&mut xml, record, options);
    }

    xml.push_str("</feed>");
    debug!("exported {} filter(s)", records.len());
    xml
}

fn write_entry(xml: &mut String, record: &FilterRecord, options: &ExportOptions) {
    xml.push_str("  <entry>\n");
    xml.push_str("    <category term=\"filter\"></category>\n");
    xml.push_str(&format!(
        "    <title><!-- {} --></title>\n",
        escape_comment(&record.name)
    ));
    xml.push_str("    <content></content>\n");

    for line in entry_lines(record, options) {
        match line {
            EntryLine::Property { property, value } => xml.push_str(&format!(
                "    <apps:property name=\"{}\" value=\"{}\"/>\n",
                property.name(),
                escape_xml(&value)
            )),
            EntryLine::Annotation(note) => {
                xml.push_str(&format!("    <!-- {} -->\n", note));
            }
        }
    }

    xml.push_str("  </entry>\n");
}

/// Which filters an export file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope<'a> {
    /// The whole set.
    All,
    /// One filter, by name.
    Single(&'a str),
}

const MAX_NAME_CHARS: usize = 30;
const UNSAFE_FILE_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Builds the export file name, e.g. `gmailfilter_all_20240501_093000.xml`.
pub fn export_file_name<Tz>(scope: ExportScope<'_>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stem = match scope {
        ExportScope::All => "all".to_string(),
        ExportScope::Single("") => "unnamed".to_string(),
        ExportScope::Single(name) => name
            .chars()
            .map(|c| if UNSAFE_FILE_NAME_CHARS.contains(&c) { '_' } else { c })
            .take(MAX_NAME_CHARS)
            .collect(),
    };
    format!("gmailfilter_{}_{}.xml", stem, now.format("%Y%m%d_%H%M%S"))
}
