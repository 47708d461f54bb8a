//! Replacement of `UNKNOWN` placeholders in finalized types
//!
//! A column only ever observed as `null` is inferred as `UNKNOWN`, which a
//! query engine cannot use. Replacing it with a nullable atomic type keeps the
//! column queryable; its values simply coerce to null.

use super::types::{AtomicType, RecordType, SqlType, TypeKind};

/// Replace every `UNKNOWN`, at any depth, with the nullable `fallback` type.
///
/// Nullability of every other node is preserved.
pub fn resolve_unknown(ty: &SqlType, fallback: AtomicType) -> SqlType {
    match &ty.kind {
        TypeKind::Unknown => SqlType::from(fallback),
        TypeKind::Array { element } => SqlType::new(
            TypeKind::Array {
                element: Box::new(resolve_unknown(element, fallback)),
            },
            ty.nullable,
        ),
        TypeKind::Record { fields } => SqlType::new(
            TypeKind::Record {
                fields: fields.resolve_unknown(fallback),
            },
            ty.nullable,
        ),
        TypeKind::Bool | TypeKind::Double | TypeKind::String => ty.clone(),
    }
}

impl RecordType {
    /// Apply [`resolve_unknown`] to every field
    #[must_use]
    pub fn resolve_unknown(&self, fallback: AtomicType) -> RecordType {
        self.iter()
            .map(|f| super::types::Field::new(f.name.clone(), resolve_unknown(&f.ty, fallback)))
            .collect()
    }
}
