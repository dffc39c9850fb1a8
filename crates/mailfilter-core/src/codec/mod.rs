//! Filter document codec.
//!
//! Moves whole filter sets between [`FilterRecord`](crate::FilterRecord)
//! values and the Atom feed format used by Gmail filter export and import:
//!
//! ```xml
//! <feed xmlns="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">
//!   <title>Mail Filters</title>
//!   <entry>
//!     <category term="filter"></category>
//!     <title><!-- Receipts --></title>
//!     <content></content>
//!     <apps:property name="from" value="shop@example.com"/>
//!     <apps:property name="shouldArchive" value="true"/>
//!   </entry>
//! </feed>
//! ```
//!
//! Condition fields travel as query strings in the grammar of
//! [`condition`](crate::condition). Export is infallible. Import fails only
//! on a document that is not well-formed XML; problems inside an entry are
//! logged and defaulted.

mod document;
mod error;
mod escape;
mod export;
mod import;
mod properties;

pub use error::{CodecError, CodecResult};
pub use escape::{escape_xml, unescape_xml};
pub use export::{
    condition_value, entry_lines, export_document, export_file_name, EntryLine, ExportOptions,
    ExportScope, DELETE_SUPPRESSED_NOTE,
};
pub use import::{import_document, PropertyLookup};
pub use properties::{Property, SIZE_LARGER_THAN, SIZE_SMALLER_THAN};

#[cfg(test)]
mod tests;
