//! TypeScript rendering of derived types.
//!
//! `Codegen` accumulates `export type` declarations; [`render`] turns a single
//! `Ty` into a type expression.
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ty::{ObjectTy, Ty};

const VALUE_ALIAS: &str =
    "export type Value = null | number | string | boolean | readonly Value[] | object;";

static IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex"));

/// Binding strength of the surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Union,
    Intersection,
    Postfix,
}

pub struct Codegen {
    out: String,
    value_alias_emitted: bool,
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new(), value_alias_emitted: false }
    }

    /// Append `export type {name} = ...;`, preceded by the `Value` alias the
    /// first time a declaration needs it.
    pub fn emit(&mut self, ty: &Ty, name: &str) {
        if ty.mentions_any() && !self.value_alias_emitted {
            self.push_decl(VALUE_ALIAS.to_string());
            self.value_alias_emitted = true;
        }
        self.push_decl(format!("export type {name} = {};", render(ty)));
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn push_decl(&mut self, decl: String) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(&decl);
        self.out.push('\n');
    }
}

/// TypeScript type expression for `ty`.
pub fn render(ty: &Ty) -> String {
    render_prec(ty, Prec::Union)
}

fn render_prec(ty: &Ty, prec: Prec) -> String {
    match ty {
        Ty::Never => "never".into(),
        Ty::Any => "Value".into(),
        Ty::Null => "null".into(),
        Ty::Number => "number".into(),
        Ty::String => "string".into(),
        Ty::Boolean => "boolean".into(),
        Ty::Literal { value } => render_literal(value, prec),
        Ty::Array { item } => match item.as_ref() {
            Ty::Union { .. } => format!("Array<{}>", render_prec(item, Prec::Union)),
            other => format!("{}[]", render_prec(other, Prec::Postfix)),
        },
        Ty::Object(obj) => render_object(obj, prec),
        Ty::Union { members } => {
            let body = members
                .iter()
                .map(|m| render_prec(m, Prec::Intersection))
                .collect::<Vec<_>>()
                .join(" | ");
            parens_if(prec > Prec::Union, body)
        }
    }
}

fn render_object(obj: &ObjectTy, prec: Prec) -> String {
    if obj.is_empty() {
        return "{}".into();
    }
    let named = if obj.fields.is_empty() {
        None
    } else {
        let fields = obj
            .fields
            .iter()
            .map(|(name, f)| {
                let q = if f.optional { "?" } else { "" };
                format!("{}{q}: {}", property_name(name), render(&f.ty))
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(format!("{{ {fields} }}"))
    };
    let index = obj
        .index
        .as_ref()
        .map(|ix| format!("{{ [K in string]?: {} }}", render(ix)));

    match (named, index) {
        (Some(one), None) | (None, Some(one)) => one,
        // each named field is also checked against the index type
        (Some(named), Some(index)) => {
            parens_if(prec > Prec::Intersection, format!("{named} & {index}"))
        }
        (None, None) => "{}".into(),
    }
}

fn render_literal(value: &Value, prec: Prec) -> String {
    match value {
        Value::Array(xs) => {
            let body = xs
                .iter()
                .map(|x| render_literal(x, Prec::Union))
                .collect::<Vec<_>>()
                .join(", ");
            parens_if(prec == Prec::Postfix, format!("readonly [{body}]"))
        }
        Value::Object(map) if map.is_empty() => "{}".into(),
        Value::Object(map) => {
            let body = map
                .iter()
                .map(|(k, v)| format!("readonly {}: {}", property_name(k), render_literal(v, Prec::Union)))
                .collect::<Vec<_>>()
                .join("; ");
            format!("{{ {body} }}")
        }
        // null, booleans, numbers and strings print as JSON
        scalar => scalar.to_string(),
    }
}

fn property_name(name: &str) -> String {
    if IDENT.is_match(name) {
        name.to_string()
    } else {
        Value::String(name.to_string()).to_string()
    }
}

fn parens_if(wrap: bool, s: String) -> String {
    if wrap { format!("({s})") } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::type_of_schema;
    use serde_json::json;

    fn ts(schema: Value) -> String {
        render(&type_of_schema(&schema))
    }

    #[test]
    fn scalars_and_literals() {
        assert_eq!(ts(json!({})), "Value");
        assert_eq!(ts(json!({"type": "integer"})), "number");
        assert_eq!(ts(json!({"const": 42})), "42");
        assert_eq!(ts(json!({"enum": [42, "foo", null]})), r#"42 | "foo" | null"#);
        assert_eq!(ts(json!({"oneOf": []})), "never");
        assert_eq!(ts(json!({"const": [1, {"a b": true}]})), r#"readonly [1, { readonly "a b": true }]"#);
    }

    #[test]
    fn arrays() {
        assert_eq!(ts(json!({"type": "array"})), "Value[]");
        assert_eq!(ts(json!({"type": "array", "items": {"type": "number"}})), "number[]");
        assert_eq!(
            ts(json!({"type": "array", "items": [{"type": "number"}, {"type": "string"}]})),
            "Array<number | string>"
        );
        assert_eq!(
            ts(json!({"type": "array", "items": {"type": "number"}, "additionalItems": true})),
            "Array<number | Value>"
        );
        assert_eq!(
            ts(json!({"type": "array", "items": {"type": "array", "items": {"type": "boolean"}}})),
            "boolean[][]"
        );
        assert_eq!(ts(json!({"type": "array", "items": {"const": [1]}})), "(readonly [1])[]");
    }

    #[test]
    fn objects() {
        assert_eq!(ts(json!({"type": "object"})), "{}");
        assert_eq!(ts(json!({"type": "object", "required": ["a"]})), "{ a: Value }");
        assert_eq!(
            ts(json!({
                "type": "object",
                "properties": {"a": {"type": "number"}, "b": {"type": "string"}},
                "required": ["b"]
            })),
            "{ a?: number; b: string }"
        );
        assert_eq!(
            ts(json!({"type": "object", "additionalProperties": true})),
            "{ [K in string]?: Value }"
        );
        assert_eq!(
            ts(json!({"type": "object", "properties": {"content-type": {"type": "string"}}})),
            r#"{ "content-type"?: string }"#
        );
    }

    #[test]
    fn intersections_are_parenthesized_where_needed() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"type": "number"}},
            "additionalProperties": {"type": "string"}
        });
        assert_eq!(ts(schema.clone()), "{ a?: number } & { [K in string]?: string }");
        assert_eq!(
            ts(json!({"type": "array", "items": schema.clone()})),
            "({ a?: number } & { [K in string]?: string })[]"
        );
        assert_eq!(
            ts(json!({"oneOf": [schema, {"type": "null"}]})),
            "{ a?: number } & { [K in string]?: string } | null"
        );
    }

    #[test]
    fn combinators() {
        let members = json!([
            {"type": "object", "properties": {"a": {"type": "number"}}, "required": ["a"]},
            {"type": "object", "properties": {"b": {"type": "string"}}, "required": ["b"]}
        ]);
        assert_eq!(ts(json!({"oneOf": members.clone()})), "{ a: number } | { b: string }");
        assert_eq!(ts(json!({"allOf": members})), "{ a: number; b: string }");
    }

    #[test]
    fn value_alias_emitted_once() {
        let mut cg = Codegen::new();
        cg.emit(&Ty::Number, "Count");
        cg.emit(&type_of_schema(&json!({"type": "array"})), "List");
        cg.emit(&Ty::Any, "Anything");
        let out = cg.into_string();
        assert_eq!(
            out,
            format!(
                "export type Count = number;\n\n{VALUE_ALIAS}\n\nexport type List = Value[];\n\nexport type Anything = Value;\n"
            )
        );
    }
}
