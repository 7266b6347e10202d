//! Tagged-union decoding
//!
//! OJP unions carry no discriminator attribute: the variant is whichever
//! shape is present. Each union lists its candidate shapes in a fixed
//! preference order and [`decode_choice`] commits to the first one that
//! decodes. The order is part of the wire contract because some nodes
//! satisfy more than one shape.

use tracing::trace;

use crate::error::DecodeError;
use crate::xml::{FromXml, XmlNode};

/// A named candidate shape of a tagged union
pub type Variant<T> = (&'static str, fn(&XmlNode) -> Result<T, DecodeError>);

/// Decode `node` as the first variant in `variants` that succeeds
///
/// Every attempt sees the same immutable node. When all candidates fail the
/// error lists the attempted tags in order.
pub fn decode_choice<T>(node: &XmlNode, variants: &[Variant<T>]) -> Result<T, DecodeError> {
    let mut attempted = Vec::with_capacity(variants.len());

    for (tag, decode) in variants {
        match decode(node) {
            Ok(value) => {
                trace!(element = node.key(), variant = tag, "Variant matched");
                return Ok(value);
            },
            Err(error) => {
                trace!(element = node.key(), variant = tag, %error, "Variant rejected");
                attempted.push(*tag);
            },
        }
    }

    Err(DecodeError::NoMatchingVariant {
        element: node.key().to_string(),
        attempted,
    })
}

/// Decode the child named `key` as `T`, the usual shape of a presence-based variant
pub fn variant_child<T: FromXml>(node: &XmlNode, key: &str) -> Result<T, DecodeError> {
    node.decode_required(key)
}

/// Whether any of the given variant elements is present under `node`
#[must_use]
pub fn any_present(node: &XmlNode, keys: &[&str]) -> bool {
    keys.iter().any(|key| node.has_child(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Shape {
        A(String),
        B(String),
    }

    fn shape_a(node: &XmlNode) -> Result<Shape, DecodeError> {
        node.required_string("A").map(Shape::A)
    }

    fn shape_b(node: &XmlNode) -> Result<Shape, DecodeError> {
        node.required_string("B").map(Shape::B)
    }

    const A_THEN_B: &[Variant<Shape>] = &[("A", shape_a), ("B", shape_b)];
    const B_THEN_A: &[Variant<Shape>] = &[("B", shape_b), ("A", shape_a)];

    fn node(xml: &str) -> XmlNode {
        XmlNode::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn falls_through_to_later_variant() {
        let n = node("<U><B>b</B></U>");
        assert_eq!(decode_choice(&n, A_THEN_B).unwrap(), Shape::B("b".into()));
    }

    #[test]
    fn ambiguous_node_takes_first_in_order() {
        let n = node("<U><B>b</B><A>a</A></U>");
        assert_eq!(decode_choice(&n, A_THEN_B).unwrap(), Shape::A("a".into()));
        assert_eq!(decode_choice(&n, B_THEN_A).unwrap(), Shape::B("b".into()));
    }

    #[test]
    fn exhausted_candidates_report_attempts_in_order() {
        let n = node("<U><C>c</C></U>");
        let err = decode_choice(&n, A_THEN_B).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NoMatchingVariant {
                element: "U".to_string(),
                attempted: vec!["A", "B"],
            }
        );
    }

    #[test]
    fn failed_attempt_does_not_affect_next() {
        // A is present but its text is read by a variant that fails afterwards
        fn a_then_fail(node: &XmlNode) -> Result<Shape, DecodeError> {
            let _ = node.required_text("A")?;
            Err(DecodeError::missing("U", "Z"))
        }
        let variants: &[Variant<Shape>] = &[("A!", a_then_fail), ("A", shape_a)];
        let n = node("<U><A>a</A></U>");
        assert_eq!(decode_choice(&n, variants).unwrap(), Shape::A("a".into()));
    }

    #[test]
    fn detects_present_variants() {
        let n = node("<U><siri:RailSubmode>x</siri:RailSubmode></U>");
        assert!(any_present(&n, &["BusSubmode", "RailSubmode"]));
        assert!(!any_present(&n, &["BusSubmode"]));
    }
}
