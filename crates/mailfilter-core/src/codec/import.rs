//! XML document to filter records.

use std::sync::OnceLock;

use log::{debug, info, warn};
use regex_lite::Regex;

use super::document::{parse_document, Element};
use super::error::CodecResult;
use super::escape::unescape_xml;
use super::properties::Property;
use crate::condition::{ConditionParser, ParseOutcome};
use crate::identity::IdAllocator;
use crate::record::{FilterRecord, SizeOperator};

/// A way of finding the property elements of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyLookup {
    /// `apps:property` elements, as written by export.
    Qualified,
    /// `property` elements under any (or no) prefix.
    Unqualified,
    /// Any element that has a `name` attribute.
    AnyNamed,
}

impl PropertyLookup {
    /// Lookups in the order they are tried. The first one that finds
    /// anything wins.
    pub const ORDER: [PropertyLookup; 3] = [
        PropertyLookup::Qualified,
        PropertyLookup::Unqualified,
        PropertyLookup::AnyNamed,
    ];

    fn matches(self, element: &Element) -> bool {
        match self {
            PropertyLookup::Qualified => element.name == "apps:property",
            PropertyLookup::Unqualified => element.local_name() == "property",
            PropertyLookup::AnyNamed => element.attribute("name").is_some(),
        }
    }

    fn find(self, entry: &Element) -> Vec<&Element> {
        entry.descendants().filter(|e| self.matches(e)).collect()
    }
}

/// Matches the comment that carries a filter name inside `<title>`.
fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)<!--\s*(.*?)\s*-->").ok())
        .as_ref()
}

/// Parses a filter document into records.
///
/// Every `entry` element becomes one record with a fresh id from `ids`;
/// ids in the document are never trusted. An entry with missing or odd
/// content is defaulted rather than dropped.
///
/// # Errors
///
/// Returns [`CodecError::MalformedDocument`](super::CodecError) only when
/// the document is not well-formed XML.
pub fn import_document(xml: &str, ids: &mut IdAllocator) -> CodecResult<Vec<FilterRecord>> {
    let root = parse_document(xml)?;

    let entries: Vec<&Element> = std::iter::once(&root)
        .chain(root.descendants())
        .filter(|e| e.local_name() == "entry")
        .collect();
    debug!("found {} entr(ies)", entries.len());

    let records: Vec<FilterRecord> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| import_entry(xml, entry, index, ids))
        .collect();

    info!("imported {} filter(s)", records.len());
    Ok(records)
}

fn import_entry(source: &str, entry: &Element, index: usize, ids: &mut IdAllocator) -> FilterRecord {
    let mut record = FilterRecord::new(ids.allocate(index));
    record.name = extract_name(source, entry).unwrap_or_default();

    let properties = PropertyLookup::ORDER
        .into_iter()
        .map(|lookup| (lookup, lookup.find(entry)))
        .find(|(_, found)| !found.is_empty());

    match properties {
        Some((lookup, found)) => {
            debug!(
                "entry #{}: {} propert(ies) via {:?} lookup",
                index + 1,
                found.len(),
                lookup
            );
            for element in found {
                apply_property(&mut record, element, index);
            }
        }
        None => warn!(
            "entry #{} ({:?}) has no property elements; imported with defaults",
            index + 1,
            record.display_name()
        ),
    }

    record
}

fn extract_name(source: &str, entry: &Element) -> Option<String> {
    let title = entry.descendants().find(|e| e.local_name() == "title")?;
    let captures = name_pattern()?.captures(title.inner_markup(source))?;
    let name = captures.get(1)?.as_str().trim();
    Some(unescape_xml(name).into_owned())
}

fn apply_property(record: &mut FilterRecord, element: &Element, index: usize) {
    let Some(name) = element.attribute("name") else {
        warn!("entry #{}: property element without a name", index + 1);
        return;
    };
    let name = unescape_xml(name);
    let value = unescape_xml(element.attribute("value").unwrap_or_default());

    let Some(property) = Property::from_name(&name) else {
        warn!("entry #{}: ignoring unknown property {:?}", index + 1, name);
        return;
    };

    if let Some(field) = property.condition_field() {
        let outcome = ConditionParser::parse(&value);
        if let ParseOutcome::Literal(text) = &outcome {
            warn!(
                "entry #{}: {} condition {:?} kept as a single term",
                index + 1,
                property.name(),
                text
            );
        }
        *record.conditions.field_mut(field) = outcome.into_expr();
        return;
    }

    let conditions = &mut record.conditions;
    let actions = &mut record.actions;
    let flag = value == "true";

    match property {
        Property::Size => match value.trim().parse::<u64>() {
            Ok(size) => conditions.size.value = Some(size),
            Err(_) => {
                warn!("entry #{}: invalid size {:?}", index + 1, value);
                conditions.size.value = None;
            }
        },
        Property::SizeOperator => conditions.size.operator = SizeOperator::from_wire(&value),
        Property::SizeUnit => conditions.size.unit = value.into_owned(),
        Property::HasAttachment => conditions.has_attachment = flag,
        Property::ShouldArchive => actions.skip_inbox = flag,
        Property::ShouldMarkAsRead => actions.mark_as_read = flag,
        Property::ShouldStar => actions.star = flag,
        Property::Label => {
            actions.apply_label.enabled = true;
            actions.apply_label.label_name = value.into_owned();
        }
        Property::ForwardTo => {
            actions.forward.enabled = true;
            actions.forward.forward_address = value.into_owned();
        }
        Property::ShouldTrash => actions.delete = flag,
        Property::ShouldNeverSpam => actions.not_spam = flag,
        Property::ShouldAlwaysMarkAsImportant => actions.always_important = flag,
        Property::ShouldNeverMarkAsImportant => actions.never_important = flag,
        Property::SmartLabelToApply => {
            actions.apply_category.enabled = true;
            actions.apply_category.category = value.into_owned();
        }
        Property::From
        | Property::To
        | Property::Subject
        | Property::HasTheWord
        | Property::DoesNotHaveTheWord => {}
    }
}
