//! XML plumbing shared by every OJP message type
//!
//! Decoding goes through an owned [`XmlNode`] tree whose lookups ignore the
//! `siri:` prefix; encoding goes through an append-only [`XmlWriter`] that
//! adds the prefix back for SIRI elements.

pub mod choice;
pub mod keys;
pub mod node;
pub mod time;
pub mod writer;

pub use node::XmlNode;
pub use writer::XmlWriter;

use crate::error::{DecodeError, EncodeError};

/// Types that can be rebuilt from an element of the tree
pub trait FromXml: Sized {
    /// Decode `node` (the element carrying this value) into `Self`
    fn from_xml(node: &XmlNode) -> Result<Self, DecodeError>;
}

/// Types that can write themselves as an element
pub trait ToXml {
    /// Write `self` as an element named `tag`
    fn to_xml(&self, w: &mut XmlWriter, tag: &str) -> Result<(), EncodeError>;
}
