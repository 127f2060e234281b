//! Widening conversions between field types.
//!
//! The table is directional: a pair only converts from its first type to
//! its second. Narrowing (e.g. `BIGINT -> INT`) is never approved.

use crate::{mapping::Transform, schema::Type};

/// Known widening conversions and the cast that performs each.
const WIDENING: &[(Type, Type, Transform)] = &[
    (Type::Int, Type::BigInt, Transform::ToBigint),
    (Type::Float, Type::Double, Transform::ToDouble),
    (Type::VarChar, Type::Text, Transform::ToText),
    (Type::Date, Type::DateTime, Transform::ToDatetime),
];

fn widening(source: &Type, target: &Type) -> Option<&'static Transform> {
    WIDENING
        .iter()
        .find(|(from, to, _)| from == source && to == target)
        .map(|(_, _, cast)| cast)
}

/// Returns `true` if values of `source` fit `target` without loss.
pub fn is_compatible(source: &Type, target: &Type) -> bool {
    source == target || widening(source, target).is_some()
}

/// Returns the cast converting `source` values into `target` values.
///
/// Any pair outside the widening table, incompatible pairs included, gets
/// [`Transform::Identity`]. Use [`is_compatible`] to tell the two apart.
pub fn cast_for(source: &Type, target: &Type) -> Transform {
    widening(source, target)
        .cloned()
        .unwrap_or(Transform::Identity)
}
