//! Type unification across rows

use super::types::{RecordType, SqlType, TypeKind};
use crate::error::{Error, Result};

/// Merge two types describing the same logical column into their minimal
/// common type.
///
/// `UNKNOWN` on either side yields the other side. Records merge field by
/// field (matching names case-insensitively) and keep one-sided fields as
/// they are. Any other pairing of different kinds is a
/// [`Error::TypeMismatch`] naming the conflicting field path.
pub fn merge_types(left: &SqlType, right: &SqlType) -> Result<SqlType> {
    match (&left.kind, &right.kind) {
        (TypeKind::Unknown, _) => Ok(right.clone()),
        (_, TypeKind::Unknown) => Ok(left.clone()),

        (TypeKind::Bool, TypeKind::Bool)
        | (TypeKind::Double, TypeKind::Double)
        | (TypeKind::String, TypeKind::String) => Ok(SqlType::new(
            left.kind.clone(),
            left.nullable || right.nullable,
        )),

        (TypeKind::Record { fields: l }, TypeKind::Record { fields: r }) => {
            let merged = SqlType::record(merge_records(l, r)?);
            // An empty result keeps whatever nullability the inputs were given
            let nullable = merged.nullable || left.nullable || right.nullable;
            Ok(merged.with_nullable(nullable))
        }

        (TypeKind::Array { element: l }, TypeKind::Array { element: r }) => {
            let element = merge_types(l, r).map_err(|e| e.within("[]"))?;
            Ok(SqlType::array(element))
        }

        _ => Err(Error::type_mismatch(left, right)),
    }
}

/// Merge two records.
///
/// The result lists the left fields in order, then the fields only present
/// on the right, so field order follows first occurrence.
pub fn merge_records(left: &RecordType, right: &RecordType) -> Result<RecordType> {
    let mut merged = RecordType::new();

    for field in left {
        let ty = match right.get(&field.name) {
            Some(other) => {
                merge_types(&field.ty, &other.ty).map_err(|e| e.within(&field.name))?
            }
            None => field.ty.clone(),
        };
        merged.push(field.name.clone(), ty);
    }

    for field in right {
        if !left.contains(&field.name) {
            merged.push(field.name.clone(), field.ty.clone());
        }
    }

    tracing::trace!(
        left = left.len(),
        right = right.len(),
        merged = merged.len(),
        "Merged record types"
    );

    Ok(merged)
}
