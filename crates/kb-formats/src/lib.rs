//! XML persistence for the kitbeat drum machine.
//!
//! Notes, patterns and drumkits are stored as tag-per-field XML documents.
//! Everything goes through [`XmlNode`], a small owned document tree that is
//! read and written with `quick-xml`.

mod drumkit_xml;
mod note_xml;
mod pattern_xml;
mod xml;

use core::fmt;

use kb_ir::InstrumentId;

pub use drumkit_xml::{drumkit_to_string, load_drumkit, load_drumkit_str, save_drumkit, Drumkit};
pub use note_xml::{load_note, note_to_xml, save_note};
pub use pattern_xml::{load_pattern, load_pattern_str, pattern_to_string, save_pattern};
pub use xml::XmlNode;

/// Error type for loading and saving documents.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Malformed XML
    Xml(String),
    /// Document root is not the expected element
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
    /// A required tag is absent
    MissingField(&'static str),
    /// A required tag holds something unparsable
    InvalidValue { field: &'static str, value: String },
    /// A note refers to an instrument the kit does not have
    UnknownInstrument(InstrumentId),
    /// I/O error
    Io(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Xml(msg) => write!(f, "malformed XML: {}", msg),
            FormatError::UnexpectedRoot { expected, found } => {
                write!(f, "expected <{}> document, found <{}>", expected, found)
            }
            FormatError::MissingField(field) => write!(f, "missing <{}>", field),
            FormatError::InvalidValue { field, value } => {
                write!(f, "invalid <{}> value {:?}", field, value)
            }
            FormatError::UnknownInstrument(id) => write!(f, "no instrument with id {}", id),
            FormatError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<std::io::Error> for FormatError {
    fn from(e: std::io::Error) -> Self {
        FormatError::Io(e.to_string())
    }
}
