//! Read path: JSON text → [`Value`] tree → populated instance.
//!
//! The instance starts from `Default`. Members are visited once, in document
//! order; each key is looked up in the descriptor and, if it names a field,
//! converted by that field's kind and written through the record's mutator.
//! Unknown keys are dropped. A `null` member, or `""` for any kind other than
//! text, is an absent value and leaves the field untouched.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::datum::Datum;
use crate::descriptor::{FieldKind, ScalarType, SequenceShape, TypeDescriptor};
use crate::error::{MapperError, Result};
use crate::limits::Limits;
use crate::parser::parse_value_with_limits;
use crate::path::FieldPath;
use crate::record::{populate_record, Record};
use crate::temporal;
use crate::value::Value;

/// Parse one instance from a JSON object document.
pub fn parse<T: Record>(text: &str) -> Result<T> {
    parse_with_limits(text, Limits::default())
}

pub fn parse_with_limits<T: Record>(text: &str, limits: Limits) -> Result<T> {
    let value = parse_value_with_limits(text, limits)?;
    from_value(&value)
}

/// Parse a batch of instances.
///
/// Accepts what [`render_many`](crate::render_many) produces: a top-level
/// array of objects, or a single object for a batch of one.
pub fn parse_many<T: Record>(text: &str) -> Result<Vec<T>> {
    parse_many_with_limits(text, Limits::default())
}

pub fn parse_many_with_limits<T: Record>(text: &str, limits: Limits) -> Result<Vec<T>> {
    let value = parse_value_with_limits(text, limits)?;
    let descriptor = T::descriptor()?;
    let root = FieldPath::root();
    match &value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| populate(item, &descriptor, &root.index(i)))
            .collect(),
        Value::Object(_) => Ok(vec![populate(&value, &descriptor, &root)?]),
        other => Err(MapperError::shape(
            &root,
            "object or array of objects",
            other.kind_name(),
        )),
    }
}

/// Populate an instance from an already parsed [`Value`].
pub fn from_value<T: Record>(value: &Value) -> Result<T> {
    let descriptor = T::descriptor()?;
    populate(value, &descriptor, &FieldPath::root())
}

fn populate<T: Record>(value: &Value, descriptor: &TypeDescriptor, base: &FieldPath) -> Result<T> {
    match value {
        Value::Object(members) => {
            let datum = decode_record(members, descriptor, base)?;
            populate_record(datum, Some(base))
        }
        other => Err(MapperError::shape(base, "object", other.kind_name())),
    }
}

/// Convert one JSON value by the kind declared for its field.
fn decode(value: &Value, kind: &FieldKind, path: &FieldPath) -> Result<Datum> {
    match (kind, value) {
        (_, Value::Null) => Ok(Datum::Null),
        (FieldKind::Text, Value::Str(text)) => Ok(Datum::Text(text.clone())),
        (_, Value::Str(text)) if text.is_empty() => Ok(Datum::Null),
        (FieldKind::Scalar(ScalarType::Bool), Value::Bool(b)) => Ok(Datum::Bool(*b)),
        (kind, Value::Str(text)) if kind.is_scalar_like() => decode_text(text, kind, path),
        (FieldKind::Scalar(_) | FieldKind::Decimal, Value::Number(text)) => {
            decode_text(text, kind, path)
        }
        (FieldKind::Nested(descriptor), Value::Object(members)) => {
            decode_record(members, descriptor, path)
        }
        (FieldKind::Sequence(shape, element), Value::Array(items)) => {
            decode_sequence(items, *shape, element, path)
        }
        (FieldKind::Mapping(key_kind, value_kind), Value::Object(members)) => {
            decode_mapping(members, key_kind, value_kind, path)
        }
        // `[]` is how an empty map renders.
        (FieldKind::Mapping(..), Value::Array(items)) if items.is_empty() => {
            Ok(Datum::Map(Vec::new()))
        }
        (kind, value) => Err(MapperError::shape(path, kind.to_string(), value.kind_name())),
    }
}

fn decode_record(
    members: &[(String, Value)],
    descriptor: &TypeDescriptor,
    path: &FieldPath,
) -> Result<Datum> {
    let mut fields = Vec::with_capacity(descriptor.len());
    for (key, member) in members {
        if let Some(spec) = descriptor.field(key) {
            fields.push((key.clone(), decode(member, &spec.kind, &path.field(key))?));
        }
    }
    Ok(Datum::Record(fields))
}

fn decode_sequence(
    items: &[Value],
    shape: SequenceShape,
    element: &FieldKind,
    path: &FieldPath,
) -> Result<Datum> {
    let decoded = items
        .iter()
        .enumerate()
        .map(|(i, item)| decode(item, element, &path.index(i)))
        .collect::<Result<Vec<_>>>()?;
    // Set types drop repeated elements as they collect.
    match shape {
        SequenceShape::List => Ok(Datum::List(decoded)),
        SequenceShape::Set => Ok(Datum::Set(decoded)),
    }
}

fn decode_mapping(
    members: &[(String, Value)],
    key_kind: &FieldKind,
    value_kind: &FieldKind,
    path: &FieldPath,
) -> Result<Datum> {
    let mut entries = Vec::with_capacity(members.len());
    for (key, member) in members {
        let entry_path = path.key(key);
        let key = decode_text(key, key_kind, &entry_path)?;
        // Scalar-like values are quoted or not by their text alone, so any
        // kind may arrive as a number.
        let value = match member {
            Value::Number(text) if value_kind.is_scalar_like() => {
                decode_text(text, value_kind, &entry_path)?
            }
            member => decode(member, value_kind, &entry_path)?,
        };
        entries.push((key, value));
    }
    Ok(Datum::Map(entries))
}

/// Convert the string form of a scalar-like kind. Also used for map keys.
fn decode_text(text: &str, kind: &FieldKind, path: &FieldPath) -> Result<Datum> {
    match kind {
        FieldKind::Text => Ok(Datum::Text(text.to_string())),
        FieldKind::Identifier => decode_identifier(text, path),
        FieldKind::Decimal => BigDecimal::from_str(text)
            .map(Datum::Decimal)
            .map_err(|e| conversion(path, "decimal", text, e.to_string())),
        FieldKind::Scalar(scalar) => decode_scalar(*scalar, text)
            .map_err(|reason| conversion(path, scalar.name(), text, reason)),
        FieldKind::Temporal(shape) => temporal::parse(*shape, text)
            .map_err(|reason| conversion(path, shape.name(), text, reason)),
        other => Err(MapperError::shape(path, other.to_string(), "string")),
    }
}

/// Only the canonical hyphenated form is accepted.
fn decode_identifier(text: &str, path: &FieldPath) -> Result<Datum> {
    if text.len() != 36 {
        return Err(conversion(
            path,
            "identifier",
            text,
            "expected 36 characters in 8-4-4-4-12 form".to_string(),
        ));
    }
    Uuid::try_parse(text)
        .map(Datum::Identifier)
        .map_err(|e| conversion(path, "identifier", text, e.to_string()))
}

fn decode_scalar(scalar: ScalarType, text: &str) -> std::result::Result<Datum, String> {
    match scalar {
        ScalarType::Bool => match text {
            "true" => Ok(Datum::Bool(true)),
            "false" => Ok(Datum::Bool(false)),
            _ => Err("expected `true` or `false`".to_string()),
        },
        ScalarType::I8 => signed::<i8>(text),
        ScalarType::I16 => signed::<i16>(text),
        ScalarType::I32 => signed::<i32>(text),
        ScalarType::I64 => signed::<i64>(text),
        ScalarType::U8 => unsigned::<u8>(text),
        ScalarType::U16 => unsigned::<u16>(text),
        ScalarType::U32 => unsigned::<u32>(text),
        ScalarType::U64 => unsigned::<u64>(text),
        ScalarType::F32 => {
            let v = text.parse::<f32>().map_err(|e| e.to_string())?;
            finite(f64::from(v))
        }
        ScalarType::F64 => finite(text.parse::<f64>().map_err(|e| e.to_string())?),
    }
}

fn signed<T>(text: &str) -> std::result::Result<Datum, String>
where
    T: FromStr<Err = std::num::ParseIntError> + Into<i64>,
{
    text.parse::<T>()
        .map(|v| Datum::Int(v.into()))
        .map_err(|e| e.to_string())
}

fn unsigned<T>(text: &str) -> std::result::Result<Datum, String>
where
    T: FromStr<Err = std::num::ParseIntError> + Into<u64>,
{
    text.parse::<T>()
        .map(|v| Datum::UInt(v.into()))
        .map_err(|e| e.to_string())
}

fn finite(v: f64) -> std::result::Result<Datum, String> {
    if v.is_finite() {
        Ok(Datum::Float(v))
    } else {
        Err("value is out of range for a finite float".to_string())
    }
}

fn conversion(path: &FieldPath, kind: &str, text: &str, reason: String) -> MapperError {
    MapperError::Conversion {
        path: path.to_string(),
        kind: kind.to_string(),
        text: text.to_string(),
        reason,
    }
}
