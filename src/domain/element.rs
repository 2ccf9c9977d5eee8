// Domain model for card elements

use serde_json::{Map, Value};

pub const TYPE_FIELD: &str = "type";
pub const DATA_DIRECTIVE: &str = "$data";
pub const WHEN_DIRECTIVE: &str = "$when";

/// A template element, keyed on its `type` field.
///
/// Only TextBlock, Container and Image carry expressions the renderer evaluates.
/// Any other element (or a non-object entry in a body) is carried through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    TextBlock(Map<String, Value>),
    Container(Map<String, Value>),
    Image(Map<String, Value>),
    Other(Value),
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Element::Other(value);
        };

        match fields.get(TYPE_FIELD).and_then(Value::as_str) {
            Some("TextBlock") => Element::TextBlock(fields),
            Some("Container") => Element::Container(fields),
            Some("Image") => Element::Image(fields),
            _ => Element::Other(Value::Object(fields)),
        }
    }
}

impl Element {
    pub fn into_value(self) -> Value {
        match self {
            Element::TextBlock(fields) | Element::Container(fields) | Element::Image(fields) => {
                Value::Object(fields)
            }
            Element::Other(value) => value,
        }
    }
}
