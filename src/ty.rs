//! Derived types: the set of data shapes a schema permits.
//!
//! `Ty` is value-level and structural. Two `Ty`s are equal when they describe
//! the same shape, regardless of the order union members or object fields were
//! produced in.
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ty {
    /// No value at all (empty `oneOf`, contradictory `allOf`).
    Never,
    /// Any JSON value: `null | number | string | boolean | Value[] | object`.
    Any,
    Null,
    Number,
    String,
    Boolean,
    /// Exactly this JSON value, never widened to its primitive.
    Literal { value: Value },
    Array { item: Box<Ty> },
    Object(ObjectTy),
    Union { members: Vec<Ty> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectTy {
    /// Named fields; stable order for deterministic codegen.
    pub fields: IndexMap<String, Field>,
    /// Open field covering every name not in `fields`. Always optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<Box<Ty>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub ty: Ty,
    pub optional: bool,
}

// ———————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ———————————————————————————————————————————————————————————————————————————

impl Ty {
    pub fn literal(value: Value) -> Self {
        Ty::Literal { value }
    }

    pub fn array(item: Ty) -> Self {
        Ty::Array { item: Box::new(item) }
    }

    /// Union of `members`, normalized:
    /// - nested unions are flattened and `Never` members dropped
    /// - structural duplicates are removed (first occurrence wins)
    /// - zero members → `Never`, one member → that member
    ///
    /// Members are never absorbed into `Any`; `number | Value` stays as written.
    pub fn union<I>(members: I) -> Self
    where
        I: IntoIterator<Item = Ty>,
    {
        fn push(out: &mut Vec<Ty>, ty: Ty) {
            match ty {
                Ty::Never => {}
                Ty::Union { members } => {
                    for m in members {
                        push(out, m);
                    }
                }
                other => {
                    if !out.contains(&other) {
                        out.push(other);
                    }
                }
            }
        }

        let mut out = Vec::new();
        for m in members {
            push(&mut out, m);
        }
        match out.len() {
            0 => Ty::Never,
            1 => out.remove(0),
            _ => Ty::Union { members: out },
        }
    }

    /// Union members, or `self` alone for any other type.
    pub fn members(&self) -> &[Ty] {
        match self {
            Ty::Union { members } => members,
            other => std::slice::from_ref(other),
        }
    }

    pub fn into_members(self) -> Vec<Ty> {
        match self {
            Ty::Union { members } => members,
            other => vec![other],
        }
    }

    /// True if the universal type appears anywhere inside.
    pub fn mentions_any(&self) -> bool {
        match self {
            Ty::Any => true,
            Ty::Array { item } => item.mentions_any(),
            Ty::Object(obj) => {
                obj.fields.values().any(|f| f.ty.mentions_any())
                    || obj.index.as_ref().is_some_and(|ix| ix.mentions_any())
            }
            Ty::Union { members } => members.iter().any(Ty::mentions_any),
            _ => false,
        }
    }

    /// Does the concrete JSON value `v` belong to this type?
    ///
    /// Objects are open: names not listed in `fields` are accepted unless an
    /// index type rejects them.
    pub fn admits(&self, v: &Value) -> bool {
        match (self, v) {
            (Ty::Never, _) => false,
            (Ty::Any, _) => true,
            (Ty::Null, Value::Null) => true,
            (Ty::Number, Value::Number(_)) => true,
            (Ty::String, Value::String(_)) => true,
            (Ty::Boolean, Value::Bool(_)) => true,
            (Ty::Literal { value }, v) => literal_eq(value, v),
            (Ty::Array { item }, Value::Array(xs)) => xs.iter().all(|x| item.admits(x)),
            (Ty::Object(obj), Value::Object(map)) => obj.admits(map),
            (Ty::Union { members }, v) => members.iter().any(|m| m.admits(v)),
            _ => false,
        }
    }
}

impl ObjectTy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, ty: Ty) -> Self {
        self.fields.insert(name.into(), Field { ty, optional: false });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, ty: Ty) -> Self {
        self.fields.insert(name.into(), Field { ty, optional: true });
        self
    }

    pub fn with_index(mut self, ty: Ty) -> Self {
        self.index = Some(Box::new(ty));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.index.is_none()
    }

    fn admits(&self, map: &Map<String, Value>) -> bool {
        let named_ok = self.fields.iter().all(|(name, field)| match map.get(name) {
            None => field.optional,
            Some(v) => field.ty.admits(v),
        });
        named_ok
            && map
                .iter()
                .filter(|(k, _)| !self.fields.contains_key(k.as_str()))
                .all(|(_, v)| self.index.as_ref().is_none_or(|ix| ix.admits(v)))
    }
}

impl From<ObjectTy> for Ty {
    fn from(obj: ObjectTy) -> Self {
        Ty::Object(obj)
    }
}

// ———————————————————————————————————————————————————————————————————————————
// EQUALITY
// ———————————————————————————————————————————————————————————————————————————

impl PartialEq for Ty {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ty::Never, Ty::Never)
            | (Ty::Any, Ty::Any)
            | (Ty::Null, Ty::Null)
            | (Ty::Number, Ty::Number)
            | (Ty::String, Ty::String)
            | (Ty::Boolean, Ty::Boolean) => true,
            (Ty::Literal { value: a }, Ty::Literal { value: b }) => literal_eq(a, b),
            (Ty::Array { item: a }, Ty::Array { item: b }) => a == b,
            (Ty::Object(a), Ty::Object(b)) => a == b,
            // members are deduplicated on construction, so this is set equality
            (Ty::Union { members: a }, Ty::Union { members: b }) => {
                a.len() == b.len() && a.iter().all(|x| b.contains(x))
            }
            _ => false,
        }
    }
}

/// JSON equality where numbers compare by value (`1 == 1.0`).
pub fn literal_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x == y || matches!((x.as_f64(), y.as_f64()), (Some(p), Some(q)) if p == q)
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| literal_eq(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm.iter().all(|(k, x)| ym.get(k).is_some_and(|y| literal_eq(x, y)))
        }
        _ => a == b,
    }
}

// ———————————————————————————————————————————————————————————————————————————
// TESTS
// ———————————————————————————————————————————————————————————————————————————
