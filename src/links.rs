//! Link annotation dictionaries built on top of `lopdf`.

use lopdf::{Dictionary, Object};

use crate::model::LinkRegion;
use crate::richtext::Color;

/// Appearance of the clickable border drawn around link regions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
    /// Border width in points; zero hides the border.
    pub border_width: i64,
    pub color: Color,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            border_width: 2,
            color: Color::BLUE,
        }
    }
}

pub(crate) fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Builds a `/Link` annotation that opens the region's URI when clicked.
pub fn link_annotation(region: &LinkRegion, style: &LinkStyle) -> Dictionary {
    let mut action = Dictionary::new();
    action.set("Type", Object::Name("Action".into()));
    action.set("S", Object::Name("URI".into()));
    action.set("URI", Object::string_literal(region.uri()));

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Annot".into()));
    dictionary.set("Subtype", Object::Name("Link".into()));
    dictionary.set(
        "Rect",
        Object::Array(region.rect().to_array().into_iter().map(real).collect()),
    );
    dictionary.set(
        "Border",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(style.border_width),
        ]),
    );
    dictionary.set(
        "C",
        Object::Array(style.color.components().into_iter().map(real).collect()),
    );
    dictionary.set("A", Object::Dictionary(action));
    dictionary
}
