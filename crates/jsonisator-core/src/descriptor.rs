//! Type descriptors: the static shape of a mapped type.
//!
//! A [`TypeDescriptor`] lists a record's fields in declaration order, each
//! with a [`FieldKind`]. Field order drives both the member order on
//! rendering and the single lookup pass on parsing. Kinds are fixed once from
//! the declared Rust type through [`FieldType::field_kind`], never inferred
//! from a runtime value.
//!
//! Descriptors are built once per type and frozen in a [`DescriptorCell`];
//! after that they are shared read-only, so concurrent callers need no
//! coordination.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::datum::FieldType;
use crate::error::DescriptorError;

/// Scalar sub-kinds. All render unquoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
        }
    }
}

/// Date/time sub-kinds, each with its own canonical text grammar
/// (see [`crate::temporal`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalShape {
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM:SS[.fraction]`
    Time,
    /// `YYYY-MM-DDTHH:MM:SS[.fraction]`
    DateTime,
    /// RFC 3339 with offset, `Z` for UTC
    OffsetDateTime,
    /// `HH:MM:SS[.fraction]` followed by `±HH:MM` or `Z`
    OffsetTime,
}

impl TemporalShape {
    pub fn name(self) -> &'static str {
        match self {
            TemporalShape::Date => "date",
            TemporalShape::Time => "time",
            TemporalShape::DateTime => "date-time",
            TemporalShape::OffsetDateTime => "offset date-time",
            TemporalShape::OffsetTime => "offset time",
        }
    }
}

/// Whether a sequence keeps order and duplicates (`List`) or is an
/// unordered unique collection (`Set`). Both render as JSON arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceShape {
    List,
    Set,
}

/// The closed set of semantic categories a field can belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Text,
    /// UUID in canonical hyphenated form.
    Identifier,
    /// Arbitrary-precision decimal, built from its decimal string.
    Decimal,
    Temporal(TemporalShape),
    Nested(Arc<TypeDescriptor>),
    Sequence(SequenceShape, Box<FieldKind>),
    /// Key kind, value kind. Keys render as their string form.
    Mapping(Box<FieldKind>, Box<FieldKind>),
}

impl FieldKind {
    /// Kinds with a single-token string form. Only these may key a map.
    pub fn is_scalar_like(&self) -> bool {
        matches!(
            self,
            FieldKind::Scalar(_)
                | FieldKind::Text
                | FieldKind::Identifier
                | FieldKind::Decimal
                | FieldKind::Temporal(_)
        )
    }

    /// Kinds rendered as quoted strings when they are a field's value.
    pub fn is_quoted(&self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Identifier | FieldKind::Temporal(_)
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar(scalar) => f.write_str(scalar.name()),
            FieldKind::Text => f.write_str("text"),
            FieldKind::Identifier => f.write_str("identifier"),
            FieldKind::Decimal => f.write_str("decimal"),
            FieldKind::Temporal(shape) => f.write_str(shape.name()),
            FieldKind::Nested(descriptor) => f.write_str(descriptor.name()),
            FieldKind::Sequence(SequenceShape::List, element) => write!(f, "list of {}", element),
            FieldKind::Sequence(SequenceShape::Set, element) => write!(f, "set of {}", element),
            FieldKind::Mapping(key, value) => write!(f, "map of {} to {}", key, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

/// The ordered field list of one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldSpec>,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
            error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Collects fields and validates them on [`build`](DescriptorBuilder::build).
///
/// The first failure reported through [`try_field`](DescriptorBuilder::try_field)
/// is kept and returned by `build`.
#[derive(Debug)]
pub struct DescriptorBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    error: Option<DescriptorError>,
}

impl DescriptorBuilder {
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn try_field(
        self,
        name: impl Into<String>,
        kind: Result<FieldKind, DescriptorError>,
    ) -> Self {
        match kind {
            Ok(kind) => self.field(name, kind),
            Err(err) => {
                let mut builder = self;
                builder.error.get_or_insert(err);
                builder
            }
        }
    }

    pub fn build(self) -> Result<TypeDescriptor, DescriptorError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if spec.name.is_empty() {
                return Err(DescriptorError::EmptyFieldName {
                    type_name: self.name.clone(),
                });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(DescriptorError::DuplicateField {
                    type_name: self.name.clone(),
                    field: spec.name.clone(),
                });
            }
            validate_kind(&self.name, &spec.name, &spec.kind)?;
        }
        Ok(TypeDescriptor {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// Reject kinds that cannot be rendered, such as a map keyed by a list.
fn validate_kind(type_name: &str, field: &str, kind: &FieldKind) -> Result<(), DescriptorError> {
    match kind {
        FieldKind::Sequence(_, element) => validate_kind(type_name, field, element),
        FieldKind::Mapping(key, value) => {
            if !key.is_scalar_like() {
                return Err(DescriptorError::UnsupportedMapKey {
                    type_name: type_name.to_string(),
                    field: field.to_string(),
                    found: key.to_string(),
                });
            }
            validate_kind(type_name, field, value)
        }
        _ => Ok(()),
    }
}

/// Resolve a field's kind from an accessor closure, letting the compiler
/// pick the field's type. Used by [`crate::record!`].
pub fn kind_of<R, T: FieldType>(
    _accessor: impl Fn(&R) -> &T,
) -> Result<FieldKind, DescriptorError> {
    T::field_kind()
}

/// Compute-once cell holding a type's descriptor, or the error that
/// prevented building it.
pub type DescriptorCell = OnceLock<Result<Arc<TypeDescriptor>, DescriptorError>>;

thread_local! {
    /// Types whose descriptor is being built on this thread.
    static IN_PROGRESS: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// Return the descriptor frozen in `cell`, building it on first use.
///
/// A type that is reached again while its own descriptor is being built
/// contains itself; that fails with [`DescriptorError::RecursiveType`]
/// instead of recursing forever.
pub fn memoize(
    cell: &'static DescriptorCell,
    type_name: &'static str,
    build: impl FnOnce() -> Result<TypeDescriptor, DescriptorError>,
) -> Result<Arc<TypeDescriptor>, DescriptorError> {
    if let Some(done) = cell.get() {
        return done.clone();
    }

    let reentered = IN_PROGRESS.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.contains(&type_name) {
            true
        } else {
            stack.push(type_name);
            false
        }
    });
    if reentered {
        return Err(DescriptorError::RecursiveType {
            type_name: type_name.to_string(),
        });
    }

    let built = build().map(Arc::new);
    IN_PROGRESS.with(|stack| {
        stack.borrow_mut().pop();
    });
    cell.get_or_init(|| built).clone()
}
