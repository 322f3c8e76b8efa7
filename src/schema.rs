//! Schema classification.
//!
//! A schema position is matched against the recognized shapes in a fixed
//! priority order: `oneOf`, `allOf`, `const`, `enum`, then `type`. Anything
//! that fails to match (including `{}`, non-object schemas and shapes whose
//! nested slots are malformed) is `Unrecognized`. Classification cannot fail.
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum Shape<'a> {
    /// No schema at this position (e.g. an omitted `items`).
    Absent,
    OneOf(&'a [Value]),
    AllOf(&'a [Value]),
    Const(&'a Value),
    Enum(&'a [Value]),
    Null,
    Number,
    Integer,
    String,
    Boolean,
    Array {
        items: Items<'a>,
        additional: Additional<'a>,
    },
    Object {
        properties: Option<&'a Map<String, Value>>,
        /// Deduplicated, in declaration order.
        required: Vec<&'a str>,
        additional: Additional<'a>,
    },
    Unrecognized,
}

#[derive(Debug, Clone, Copy)]
pub enum Items<'a> {
    Absent,
    /// One schema applied to every element.
    Single(&'a Value),
    /// Per-position schemas.
    Positional(&'a [Value]),
}

/// `additionalItems` / `additionalProperties`.
#[derive(Debug, Clone, Copy)]
pub enum Additional<'a> {
    Absent,
    Allow,
    Deny,
    Schema(&'a Value),
}

impl Shape<'_> {
    pub fn tag(&self) -> &'static str {
        match self {
            Shape::Absent => "absent",
            Shape::OneOf(_) => "oneOf",
            Shape::AllOf(_) => "allOf",
            Shape::Const(_) => "const",
            Shape::Enum(_) => "enum",
            Shape::Null => "null",
            Shape::Number => "number",
            Shape::Integer => "integer",
            Shape::String => "string",
            Shape::Boolean => "boolean",
            Shape::Array { .. } => "array",
            Shape::Object { .. } => "object",
            Shape::Unrecognized => "unrecognized",
        }
    }
}

pub fn classify(schema: Option<&Value>) -> Shape<'_> {
    let Some(schema) = schema else {
        return Shape::Absent;
    };
    let Some(map) = schema.as_object() else {
        return Shape::Unrecognized;
    };

    // combinators win over every sibling keyword
    if let Some(xs) = schema_list(map.get("oneOf")) {
        return Shape::OneOf(xs);
    }
    if let Some(xs) = schema_list(map.get("allOf")) {
        return Shape::AllOf(xs);
    }

    if let Some(v) = map.get("const") {
        return Shape::Const(v);
    }
    if let Some(Value::Array(xs)) = map.get("enum") {
        return Shape::Enum(xs);
    }

    match map.get("type").and_then(Value::as_str) {
        Some("null") => Shape::Null,
        Some("number") => Shape::Number,
        Some("integer") => Shape::Integer,
        Some("string") => Shape::String,
        Some("boolean") => Shape::Boolean,
        Some("array") => classify_array(map).unwrap_or(Shape::Unrecognized),
        Some("object") => classify_object(map).unwrap_or(Shape::Unrecognized),
        _ => Shape::Unrecognized,
    }
}

fn classify_array(map: &Map<String, Value>) -> Option<Shape<'_>> {
    let items = match map.get("items") {
        None => Items::Absent,
        Some(v @ Value::Object(_)) => Items::Single(v),
        Some(v) => Items::Positional(schema_list(Some(v))?),
    };
    let additional = additional(map.get("additionalItems"))?;
    Some(Shape::Array { items, additional })
}

fn classify_object(map: &Map<String, Value>) -> Option<Shape<'_>> {
    let properties = match map.get("properties") {
        None => None,
        Some(Value::Object(props)) if props.values().all(Value::is_object) => Some(props),
        Some(_) => return None,
    };
    let required = match map.get("required") {
        None => Vec::new(),
        Some(Value::Array(names)) => {
            let mut out: Vec<&str> = Vec::with_capacity(names.len());
            for name in names {
                let name = name.as_str()?;
                if !out.contains(&name) {
                    out.push(name);
                }
            }
            out
        }
        Some(_) => return None,
    };
    let additional = additional(map.get("additionalProperties"))?;
    Some(Shape::Object { properties, required, additional })
}

/// An array whose elements are all object schemas.
fn schema_list(v: Option<&Value>) -> Option<&[Value]> {
    match v {
        Some(Value::Array(xs)) if xs.iter().all(Value::is_object) => Some(xs),
        _ => None,
    }
}

fn additional(v: Option<&Value>) -> Option<Additional<'_>> {
    match v {
        None => Some(Additional::Absent),
        Some(Value::Bool(true)) => Some(Additional::Allow),
        Some(Value::Bool(false)) => Some(Additional::Deny),
        Some(v @ Value::Object(_)) => Some(Additional::Schema(v)),
        Some(_) => None,
    }
}
