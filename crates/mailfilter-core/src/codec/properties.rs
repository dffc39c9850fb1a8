//! Vocabulary of filter property names in the export format.

use crate::record::{ConditionField, SizeOperator};

/// A named property of a filter entry, listed in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    From,
    To,
    Subject,
    HasTheWord,
    DoesNotHaveTheWord,
    Size,
    SizeOperator,
    SizeUnit,
    HasAttachment,
    ShouldArchive,
    ShouldMarkAsRead,
    ShouldStar,
    Label,
    ForwardTo,
    ShouldTrash,
    ShouldNeverSpam,
    ShouldAlwaysMarkAsImportant,
    ShouldNeverMarkAsImportant,
    SmartLabelToApply,
}

impl Property {
    /// Every property, in export order.
    pub const ALL: [Property; 19] = [
        Property::From,
        Property::To,
        Property::Subject,
        Property::HasTheWord,
        Property::DoesNotHaveTheWord,
        Property::Size,
        Property::SizeOperator,
        Property::SizeUnit,
        Property::HasAttachment,
        Property::ShouldArchive,
        Property::ShouldMarkAsRead,
        Property::ShouldStar,
        Property::Label,
        Property::ForwardTo,
        Property::ShouldTrash,
        Property::ShouldNeverSpam,
        Property::ShouldAlwaysMarkAsImportant,
        Property::ShouldNeverMarkAsImportant,
        Property::SmartLabelToApply,
    ];

    /// Returns the `name` attribute used in the document.
    pub fn name(self) -> &'static str {
        match self {
            Property::From => "from",
            Property::To => "to",
            Property::Subject => "subject",
            Property::HasTheWord => "hasTheWord",
            Property::DoesNotHaveTheWord => "doesNotHaveTheWord",
            Property::Size => "size",
            Property::SizeOperator => "sizeOperator",
            Property::SizeUnit => "sizeUnit",
            Property::HasAttachment => "hasAttachment",
            Property::ShouldArchive => "shouldArchive",
            Property::ShouldMarkAsRead => "shouldMarkAsRead",
            Property::ShouldStar => "shouldStar",
            Property::Label => "label",
            Property::ForwardTo => "forwardTo",
            Property::ShouldTrash => "shouldTrash",
            Property::ShouldNeverSpam => "shouldNeverSpam",
            Property::ShouldAlwaysMarkAsImportant => "shouldAlwaysMarkAsImportant",
            Property::ShouldNeverMarkAsImportant => "shouldNeverMarkAsImportant",
            Property::SmartLabelToApply => "smartLabelToApply",
        }
    }

    /// Looks up a property by its exact `name` attribute.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns the property that carries a condition field.
    pub fn for_condition(field: ConditionField) -> Self {
        match field {
            ConditionField::From => Property::From,
            ConditionField::To => Property::To,
            ConditionField::Subject => Property::Subject,
            ConditionField::Includes => Property::HasTheWord,
            ConditionField::Excludes => Property::DoesNotHaveTheWord,
        }
    }

    /// Returns the condition field carried by this property, if any.
    pub fn condition_field(self) -> Option<ConditionField> {
        ConditionField::ALL
            .into_iter()
            .find(|&field| Self::for_condition(field) == self)
    }
}

/// Wire value of the `sizeOperator` property for larger-than.
pub const SIZE_LARGER_THAN: &str = "s_sl";

/// Wire value of the `sizeOperator` property for smaller-than.
pub const SIZE_SMALLER_THAN: &str = "s_ss";

impl SizeOperator {
    /// Returns the `sizeOperator` property value.
    pub fn wire_value(self) -> &'static str {
        match self {
            SizeOperator::LargerThan => SIZE_LARGER_THAN,
            SizeOperator::SmallerThan => SIZE_SMALLER_THAN,
        }
    }

    /// Decodes a `sizeOperator` value; anything but `s_sl` is smaller-than.
    pub fn from_wire(value: &str) -> Self {
        if value == SIZE_LARGER_THAN {
            SizeOperator::LargerThan
        } else {
            SizeOperator::SmallerThan
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for property in Property::ALL {
            assert_eq!(Property::from_name(property.name()), Some(property));
        }
        assert_eq!(Property::from_name("shouldFly"), None);
        assert_eq!(Property::from_name("From"), None);
    }

    #[test]
    fn test_condition_fields() {
        assert_eq!(
            Property::HasTheWord.condition_field(),
            Some(ConditionField::Includes)
        );
        assert_eq!(Property::ShouldStar.condition_field(), None);
    }

    #[test]
    fn test_size_operator_wire_values() {
        assert_eq!(SizeOperator::LargerThan.wire_value(), "s_sl");
        assert_eq!(SizeOperator::from_wire("s_sl"), SizeOperator::LargerThan);
        assert_eq!(SizeOperator::from_wire("s_ss"), SizeOperator::SmallerThan);
        assert_eq!(SizeOperator::from_wire("bogus"), SizeOperator::SmallerThan);
    }
}
