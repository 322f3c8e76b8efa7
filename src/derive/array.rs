use super::Deriver;
use crate::schema::{Additional, Items};
use crate::ty::Ty;

/// `Array<items ∪ additionalItems>`. Positional `items` collapse into a
/// homogeneous element union; tuple positions are not preserved.
pub(super) fn resolve_array(
    deriver: &mut Deriver,
    items: Items<'_>,
    additional: Additional<'_>,
    depth: usize,
) -> Ty {
    let mut elems: Vec<Ty> = Vec::new();

    match items {
        Items::Absent => elems.push(Ty::Any),
        Items::Single(schema) => elems.push(deriver.resolve(Some(schema), depth + 1)),
        Items::Positional(schemas) => {
            for schema in schemas {
                elems.push(deriver.resolve(Some(schema), depth + 1));
            }
        }
    }

    match additional {
        Additional::Schema(schema) => elems.push(deriver.resolve(Some(schema), depth + 1)),
        Additional::Allow => elems.push(Ty::Any),
        Additional::Deny | Additional::Absent => {}
    }

    Ty::array(Ty::union(elems))
}
