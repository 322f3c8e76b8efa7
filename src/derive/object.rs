use serde_json::{Map, Value};

use super::Deriver;
use crate::schema::Additional;
use crate::ty::{Field, ObjectTy, Ty};

pub(super) fn resolve_object(
    deriver: &mut Deriver,
    properties: Option<&Map<String, Value>>,
    required: &[&str],
    additional: Additional<'_>,
    depth: usize,
) -> Ty {
    let mut obj = ObjectTy::default();

    // declared properties, optional unless required
    if let Some(props) = properties {
        for (name, schema) in props {
            let ty = deriver.resolve(Some(schema), depth + 1);
            let optional = !required.contains(&name.as_str());
            obj.fields.insert(name.clone(), Field { ty, optional });
        }
    }

    // required names without a declared schema
    for &name in required {
        if !obj.fields.contains_key(name) {
            obj.fields.insert(name.to_string(), Field { ty: Ty::Any, optional: false });
        }
    }

    obj.index = match additional {
        Additional::Schema(schema) => Some(Box::new(deriver.resolve(Some(schema), depth + 1))),
        Additional::Allow => Some(Box::new(Ty::Any)),
        Additional::Deny | Additional::Absent => None,
    };

    Ty::Object(obj)
}
