//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier column injected first into every row type
pub const ROW_ID_FIELD: &str = "_ROW_UUID";

/// Marker column added to rows that carry no field at all
pub const EMPTY_ROW_FIELD: &str = "_EMPTY_ROW";

/// Only column of a table whose sample was empty
pub const EMPTY_TABLE_FIELD: &str = "EMPTY_TABLE";

/// Column wrapping top-level values that are not objects
pub const VALUE_FIELD: &str = "VALUE";

/// Relational type kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeKind {
    /// No information (only nulls were observed)
    Unknown,
    Bool,
    Double,
    String,
    Array { element: Box<SqlType> },
    Record { fields: RecordType },
}

/// An inferred relational type together with its nullability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlType {
    #[serde(flatten)]
    pub kind: TypeKind,
    pub nullable: bool,
}

impl SqlType {
    /// Create a type from its parts
    pub fn new(kind: TypeKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    /// Nullable unknown type
    pub fn unknown() -> Self {
        Self::new(TypeKind::Unknown, true)
    }

    /// Nullable boolean
    pub fn boolean() -> Self {
        Self::new(TypeKind::Bool, true)
    }

    /// Nullable double
    pub fn double() -> Self {
        Self::new(TypeKind::Double, true)
    }

    /// Nullable string
    pub fn string() -> Self {
        Self::new(TypeKind::String, true)
    }

    /// Nullable array of `element`
    pub fn array(element: SqlType) -> Self {
        Self::new(
            TypeKind::Array {
                element: Box::new(element),
            },
            true,
        )
    }

    /// Record type, nullable only when it has at least one field
    pub fn record(fields: RecordType) -> Self {
        let nullable = !fields.is_empty();
        Self::new(TypeKind::Record { fields }, nullable)
    }

    /// Same type, marked non-nullable
    #[must_use]
    pub fn not_null(self) -> Self {
        self.with_nullable(false)
    }

    /// Same type with the given nullability
    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, TypeKind::Unknown)
    }

    /// Record fields, if this is a record type
    pub fn as_record(&self) -> Option<&RecordType> {
        match &self.kind {
            TypeKind::Record { fields } => Some(fields),
            _ => None,
        }
    }

    /// Array element type, if this is an array type
    pub fn as_array(&self) -> Option<&SqlType> {
        match &self.kind {
            TypeKind::Array { element } => Some(element),
            _ => None,
        }
    }

    /// Check whether `Unknown` occurs anywhere in this type
    pub fn contains_unknown(&self) -> bool {
        match &self.kind {
            TypeKind::Unknown => true,
            TypeKind::Array { element } => element.contains_unknown(),
            TypeKind::Record { fields } => fields.iter().any(|f| f.ty.contains_unknown()),
            TypeKind::Bool | TypeKind::Double | TypeKind::String => false,
        }
    }

    /// Multi-line, indented description of this type
    pub fn to_pretty_string(&self) -> String {
        self.pretty(0)
    }

    fn pretty(&self, indent: usize) -> String {
        match &self.kind {
            TypeKind::Record { fields } => fields.pretty(indent),
            TypeKind::Array { element } => format!("Array of {}", element.pretty(indent)),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Unknown => write!(f, "UNKNOWN")?,
            TypeKind::Bool => write!(f, "BOOLEAN")?,
            TypeKind::Double => write!(f, "DOUBLE")?,
            TypeKind::String => write!(f, "VARCHAR")?,
            TypeKind::Array { element } => write!(f, "{element} ARRAY")?,
            TypeKind::Record { fields } => {
                write!(f, "RECORD(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                write!(f, ")")?;
            }
        }
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// Atomic type used in place of `Unknown` once a schema is finalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomicType {
    #[serde(alias = "boolean")]
    Bool,
    Double,
    #[default]
    #[serde(alias = "varchar")]
    String,
}

impl From<AtomicType> for SqlType {
    fn from(atomic: AtomicType) -> Self {
        match atomic {
            AtomicType::Bool => SqlType::boolean(),
            AtomicType::Double => SqlType::double(),
            AtomicType::String => SqlType::string(),
        }
    }
}

/// A named record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub ty: SqlType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered record fields with case-insensitive lookup.
///
/// Names are unique ignoring ASCII case; the first-seen casing is kept.
/// Equality ignores field order and name casing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Field>", into = "Vec<Field>")]
pub struct RecordType {
    fields: Vec<Field>,
    /// Lower-cased name -> position in `fields`
    index: HashMap<String, usize>,
}

impl RecordType {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Returns `false` (and leaves the record unchanged) when
    /// a field with the same case-insensitive name already exists.
    pub fn push(&mut self, name: impl Into<String>, ty: SqlType) -> bool {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.fields.len());
        self.fields.push(Field::new(name, ty));
        true
    }

    /// Builder-style [`RecordType::push`]
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: SqlType) -> Self {
        self.push(name, ty);
        self
    }

    /// Get a field by case-insensitive name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.position(name).map(|i| &self.fields[i])
    }

    /// Position of a field by case-insensitive name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the record, returning its fields in order
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// Multi-line, indented description of this record
    pub fn to_pretty_string(&self) -> String {
        self.pretty(0)
    }

    fn pretty(&self, indent: usize) -> String {
        let pad = "    ".repeat(indent);
        let mut out = String::from("Record\n");
        for field in &self.fields {
            let ty = field.ty.pretty(indent + 1);
            out.push_str(&format!("{pad} - {} : {}", field.name, ty));
            if !ty.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|f| other.get(&f.name).is_some_and(|o| o.ty == f.ty))
    }
}

impl Eq for RecordType {}

impl From<Vec<Field>> for RecordType {
    fn from(fields: Vec<Field>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<RecordType> for Vec<Field> {
    fn from(record: RecordType) -> Self {
        record.fields
    }
}

impl FromIterator<Field> for RecordType {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut record = RecordType::new();
        for field in iter {
            record.push(field.name, field.ty);
        }
        record
    }
}

impl<'a> IntoIterator for &'a RecordType {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SqlType::record(self.clone()))
    }
}
