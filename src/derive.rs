//! Schema → type derivation.
//!
//! A single recursive, total procedure: classify the schema position, resolve
//! the matched shape (recursing into nested schemas), and fall back to the
//! universal `Value` type for anything unrecognized.
//!
//! Design notes:
//! - `oneOf` resolves each alternative independently and unions the results.
//! - `allOf` resolves its members the same way and folds them with the
//!   intersection combinator. Members are kept as whole types, so a member
//!   that is itself a union is intersected as a union.
//! - The derivation is referentially transparent; the cache in [`Deriver`]
//!   only saves work and never changes a result.
pub mod array;
pub mod object;

use std::collections::HashMap;

use log::{debug, trace};
use serde_json::Value;

use crate::combinator::intersect_all;
use crate::config::DeriveOptions;
use crate::schema::{classify, Shape};
use crate::ty::Ty;

/// Derive the type of data `schema` describes, with default options.
pub fn type_of_schema(schema: &Value) -> Ty {
    Deriver::new(DeriveOptions::default()).derive(schema)
}

// ------------------------------- Front API -------------------------------- //

pub struct Deriver {
    options: DeriveOptions,
    cache: HashMap<String, Ty>,
    cache_hits: usize,
}

impl Deriver {
    pub fn new(options: DeriveOptions) -> Self {
        Self { options, cache: HashMap::new(), cache_hits: 0 }
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    pub fn derive(&mut self, schema: &Value) -> Ty {
        self.resolve(Some(schema), 0)
    }

    /// Resolve one schema position. `None` is an absent slot and yields `Value`.
    pub(crate) fn resolve(&mut self, schema: Option<&Value>, depth: usize) -> Ty {
        let Some(schema) = schema else {
            return Ty::Any;
        };
        if self.options.max_depth.is_some_and(|max| depth > max) {
            debug!("schema nested {depth} levels deep; falling back to Value");
            return Ty::Any;
        }

        let shape = classify(Some(schema));
        trace!("depth {depth}: {} schema", shape.tag());

        if !self.options.memoize || !is_composite(&shape) {
            return self.resolve_shape(shape, depth);
        }
        let Some(key) = self.cache_key(schema, depth) else {
            return self.resolve_shape(shape, depth);
        };
        if let Some(hit) = self.cache.get(&key) {
            self.cache_hits += 1;
            debug!("cache hit for {} schema at depth {depth}", shape.tag());
            return hit.clone();
        }
        let ty = self.resolve_shape(shape, depth);
        self.cache.insert(key, ty.clone());
        ty
    }

    fn resolve_shape(&mut self, shape: Shape<'_>, depth: usize) -> Ty {
        match shape {
            Shape::Absent => Ty::Any,
            Shape::OneOf(alternatives) => Ty::union(self.resolve_each(alternatives, depth)),
            Shape::AllOf(conjuncts) => intersect_all(self.resolve_each(conjuncts, depth)),
            Shape::Const(value) => Ty::literal(value.clone()),
            Shape::Enum(values) => Ty::union(values.iter().cloned().map(Ty::literal)),
            Shape::Null => Ty::Null,
            // integrality and bounds are not representable
            Shape::Number | Shape::Integer => Ty::Number,
            Shape::String => Ty::String,
            Shape::Boolean => Ty::Boolean,
            Shape::Array { items, additional } => {
                array::resolve_array(self, items, additional, depth)
            }
            Shape::Object { properties, required, additional } => {
                object::resolve_object(self, properties, &required, additional, depth)
            }
            Shape::Unrecognized => {
                debug!("unrecognized schema shape; falling back to Value");
                Ty::Any
            }
        }
    }

    fn resolve_each(&mut self, schemas: &[Value], depth: usize) -> Vec<Ty> {
        schemas.iter().map(|s| self.resolve(Some(s), depth + 1)).collect()
    }

    /// Canonical JSON text, prefixed by the remaining depth budget when one
    /// applies (the same sub-schema may resolve differently at another depth).
    fn cache_key(&self, schema: &Value, depth: usize) -> Option<String> {
        let json = serde_json::to_string(schema).ok()?;
        Some(match self.options.max_depth {
            Some(max) => format!("{}:{json}", max.saturating_sub(depth)),
            None => json,
        })
    }
}

fn is_composite(shape: &Shape<'_>) -> bool {
    matches!(
        shape,
        Shape::OneOf(_) | Shape::AllOf(_) | Shape::Array { .. } | Shape::Object { .. }
    )
}

// ——————————————————————————————————————————————————————————————————————————
// TESTS
// ——————————————————————————————————————————————————————————————————————————
