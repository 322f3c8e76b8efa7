//! Union → intersection.
//!
//! `allOf` members are resolved exactly like `oneOf` alternatives and then
//! folded together with [`intersect`], the meet of two derived types.
//! `intersect` is commutative and associative, so the fold does not depend on
//! member order.
use crate::ty::{Field, ObjectTy, Ty};

/// Intersection of every member of `ty` (identity for a non-union).
pub fn union_to_intersection(ty: Ty) -> Ty {
    intersect_all(ty.into_members())
}

/// Intersection of all `members`; `Any` when there are none.
pub fn intersect_all<I>(members: I) -> Ty
where
    I: IntoIterator<Item = Ty>,
{
    members.into_iter().fold(Ty::Any, |acc, m| intersect(&acc, &m))
}

/// The values admitted by both `a` and `b`.
pub fn intersect(a: &Ty, b: &Ty) -> Ty {
    match (a, b) {
        (Ty::Never, _) | (_, Ty::Never) => Ty::Never,
        (Ty::Any, other) | (other, Ty::Any) => other.clone(),
        // distribute: (x | y) & z = (x & z) | (y & z)
        (Ty::Union { members }, other) | (other, Ty::Union { members }) => {
            Ty::union(members.iter().map(|m| intersect(m, other)))
        }
        (Ty::Literal { value }, other) | (other, Ty::Literal { value }) => {
            if other.admits(value) {
                Ty::literal(value.clone())
            } else {
                Ty::Never
            }
        }
        (Ty::Array { item: x }, Ty::Array { item: y }) => Ty::array(intersect(x, y)),
        (Ty::Object(x), Ty::Object(y)) => Ty::Object(intersect_objects(x, y)),
        (x, y) if x == y => x.clone(),
        _ => Ty::Never,
    }
}

fn intersect_objects(a: &ObjectTy, b: &ObjectTy) -> ObjectTy {
    let mut out = ObjectTy::default();

    // names from a
    for (name, fa) in &a.fields {
        let field = match b.fields.get(name) {
            Some(fb) => Field {
                ty: intersect(&fa.ty, &fb.ty),
                optional: fa.optional && fb.optional,
            },
            None => constrain(fa, b.index.as_deref()),
        };
        out.fields.insert(name.clone(), field);
    }
    // names only in b
    for (name, fb) in &b.fields {
        if !out.fields.contains_key(name) {
            out.fields.insert(name.clone(), constrain(fb, a.index.as_deref()));
        }
    }

    out.index = match (&a.index, &b.index) {
        (Some(x), Some(y)) => Some(Box::new(intersect(x, y))),
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (None, None) => None,
    };
    out
}

/// A named field from one side must also satisfy the other side's open field.
fn constrain(field: &Field, index: Option<&Ty>) -> Field {
    match index {
        Some(ix) => Field {
            ty: intersect(&field.ty, ix),
            optional: field.optional,
        },
        None => field.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn a_number() -> Ty {
        ObjectTy::new().required("a", Ty::Number).into()
    }

    fn b_string() -> Ty {
        ObjectTy::new().required("b", Ty::String).into()
    }

    #[test]
    fn single_member_is_identity() {
        assert_eq!(union_to_intersection(a_number()), a_number());
        assert_eq!(intersect_all([Ty::array(Ty::String)]), Ty::array(Ty::String));
    }

    #[test]
    fn empty_intersection_is_any() {
        assert_eq!(intersect_all(Vec::new()), Ty::Any);
    }

    #[test]
    fn disjoint_objects_merge() {
        let expected: Ty = ObjectTy::new()
            .required("a", Ty::Number)
            .required("b", Ty::String)
            .into();
        let u = Ty::union([a_number(), b_string()]);
        assert_eq!(union_to_intersection(u), expected);
    }

    #[test]
    fn order_independent() {
        let x: Ty = ObjectTy::new().optional("a", Ty::union([Ty::Number, Ty::String])).into();
        let y: Ty = ObjectTy::new().required("a", Ty::Number).with_index(Ty::Boolean).into();
        let z: Ty = ObjectTy::new().optional("c", Ty::Any).into();
        let one = intersect_all([x.clone(), y.clone(), z.clone()]);
        let two = intersect_all([z, y, x]);
        assert_eq!(one, two);
    }

    #[test]
    fn overlapping_fields_intersect() {
        let x: Ty = ObjectTy::new().optional("a", Ty::union([Ty::Number, Ty::String])).into();
        let y: Ty = ObjectTy::new().required("a", Ty::String).into();
        let expected: Ty = ObjectTy::new().required("a", Ty::String).into();
        assert_eq!(intersect(&x, &y), expected);
    }

    #[test]
    fn index_constrains_foreign_fields() {
        let x: Ty = ObjectTy::new().required("a", Ty::Any).into();
        let y: Ty = ObjectTy::new().with_index(Ty::String).into();
        let expected: Ty = ObjectTy::new()
            .required("a", Ty::String)
            .with_index(Ty::String)
            .into();
        assert_eq!(intersect(&x, &y), expected);
    }

    #[test]
    fn primitives_and_literals() {
        assert_eq!(intersect(&Ty::Number, &Ty::String), Ty::Never);
        assert_eq!(intersect(&Ty::Number, &Ty::Number), Ty::Number);
        assert_eq!(intersect(&Ty::literal(json!(42)), &Ty::Number), Ty::literal(json!(42)));
        assert_eq!(intersect(&Ty::String, &Ty::literal(json!(42))), Ty::Never);
        assert_eq!(
            intersect(&Ty::union([Ty::literal(json!("a")), Ty::literal(json!(1))]), &Ty::String),
            Ty::literal(json!("a"))
        );
    }

    #[test]
    fn arrays_meet_elementwise() {
        let x = Ty::array(Ty::union([Ty::Number, Ty::Null]));
        let y = Ty::array(Ty::Number);
        assert_eq!(intersect(&x, &y), Ty::array(Ty::Number));
        assert_eq!(intersect(&x, &Ty::Number), Ty::Never);
    }

    #[test]
    fn self_intersection_of_union_distributes() {
        let u = Ty::union([a_number(), b_string()]);
        let both: Ty = ObjectTy::new()
            .required("a", Ty::Number)
            .required("b", Ty::String)
            .into();
        assert_eq!(intersect(&u, &u), Ty::union([a_number(), both, b_string()]));
        assert_eq!(intersect(&Ty::Number, &Ty::Number), Ty::Number);
    }

    #[test]
    fn any_is_neutral_and_never_absorbs() {
        assert_eq!(intersect(&Ty::Any, &b_string()), b_string());
        assert_eq!(intersect(&b_string(), &Ty::Never), Ty::Never);
    }
}
