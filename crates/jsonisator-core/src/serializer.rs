//! Write path: instance → [`Value`] tree → indented JSON text.
//!
//! Each field is read through the record's accessor and shaped by its
//! [`FieldKind`]:
//!
//! - **Scalar / Decimal**: unquoted (`"price": 12.3`)
//! - **Text / Identifier / Temporal**: quoted
//! - **Absent value** (`None`): `""`, the key is still emitted
//! - **Nested**: an embedded object one indentation level deeper
//! - **Sequence**: `[]` when empty, otherwise one element per line
//! - **Mapping**: `[]` when empty, otherwise an object keyed by the key's
//!   string form. Scalar member values are quoted unless their string form
//!   looks like a decimal number. An empty map is `[]`, never `{}`.

use crate::datum::Datum;
use crate::descriptor::{FieldKind, ScalarType, TypeDescriptor};
use crate::error::{MapperError, Result};
use crate::path::FieldPath;
use crate::printer::print_value;
use crate::record::Record;
use crate::temporal;
use crate::value::Value;

/// Render one instance as an unindented, unbracketed JSON object.
pub fn render<T: Record>(instance: &T) -> Result<String> {
    let value = to_value(instance)?;
    Ok(print_value(&value))
}

/// Render a batch of instances.
///
/// More than one instance renders as a JSON array of indented objects
/// separated by `,\n`. A single instance renders exactly like [`render`];
/// an empty batch renders as `[]`.
pub fn render_many<T: Record>(instances: &[T]) -> Result<String> {
    match instances {
        [single] => render(single),
        many => {
            let values = many.iter().map(to_value).collect::<Result<Vec<_>>>()?;
            Ok(print_value(&Value::Array(values)))
        }
    }
}

/// Build the [`Value`] tree of one instance without printing it.
pub fn to_value<T: Record>(instance: &T) -> Result<Value> {
    let descriptor = T::descriptor()?;
    let root = FieldPath::root();
    let mut members = Vec::with_capacity(descriptor.len());
    for spec in descriptor.fields() {
        let path = root.field(&spec.name);
        let datum = instance.get(&spec.name).unwrap_or(Datum::Null);
        members.push((spec.name.clone(), encode(&datum, &spec.kind, &path)?));
    }
    Ok(Value::Object(members))
}

/// Shape one datum by its declared kind.
fn encode(datum: &Datum, kind: &FieldKind, path: &FieldPath) -> Result<Value> {
    match (kind, datum) {
        (FieldKind::Sequence(..) | FieldKind::Mapping(..), Datum::Null) => Ok(Value::Array(Vec::new())),
        (_, Datum::Null) => Ok(Value::Str(String::new())),
        (FieldKind::Scalar(ScalarType::Bool), Datum::Bool(b)) => Ok(Value::Bool(*b)),
        (FieldKind::Nested(descriptor), Datum::Record(fields)) => {
            encode_record(fields, descriptor, path)
        }
        (FieldKind::Sequence(_, element), Datum::List(items) | Datum::Set(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| encode(item, element, &path.index(i)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        (FieldKind::Mapping(key_kind, value_kind), Datum::Map(entries)) => {
            encode_mapping(entries, key_kind, value_kind, path)
        }
        (kind, datum) if kind.is_quoted() => text_form(datum, kind, path).map(Value::Str),
        (FieldKind::Scalar(_) | FieldKind::Decimal, datum) => {
            text_form(datum, kind, path).map(Value::Number)
        }
        (kind, datum) => Err(MapperError::shape(path, kind.to_string(), datum.variant_name())),
    }
}

fn encode_record(
    fields: &[(String, Datum)],
    descriptor: &TypeDescriptor,
    path: &FieldPath,
) -> Result<Value> {
    let mut members = Vec::with_capacity(descriptor.len());
    for spec in descriptor.fields() {
        let field_path = path.field(&spec.name);
        let value = match fields.iter().find(|(name, _)| *name == spec.name) {
            Some((_, datum)) => encode(datum, &spec.kind, &field_path)?,
            None => encode(&Datum::Null, &spec.kind, &field_path)?,
        };
        members.push((spec.name.clone(), value));
    }
    Ok(Value::Object(members))
}

fn encode_mapping(
    entries: &[(Datum, Datum)],
    key_kind: &FieldKind,
    value_kind: &FieldKind,
    path: &FieldPath,
) -> Result<Value> {
    if entries.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    let mut members = Vec::with_capacity(entries.len());
    for (key, member) in entries {
        let key = text_form(key, key_kind, path)?;
        let entry_path = path.key(&key);
        let value = if value_kind.is_scalar_like() {
            let text = text_form(member, value_kind, &entry_path)?;
            if looks_decimal(&text) {
                Value::Number(text)
            } else {
                Value::Str(text)
            }
        } else {
            encode(member, value_kind, &entry_path)?
        };
        members.push((key, value));
    }
    Ok(Value::Object(members))
}

/// The string form of a scalar-like datum: what goes inside the quotes for
/// quoted kinds, the literal for numeric kinds, and the member key for maps.
fn text_form(datum: &Datum, kind: &FieldKind, path: &FieldPath) -> Result<String> {
    let text = match (kind, datum) {
        (_, Datum::Null) => String::new(),
        (FieldKind::Text, Datum::Text(s)) => s.clone(),
        (FieldKind::Identifier, Datum::Identifier(id)) => id.hyphenated().to_string(),
        (FieldKind::Decimal, Datum::Decimal(d)) => d.to_plain_string(),
        (FieldKind::Scalar(ScalarType::Bool), Datum::Bool(b)) => b.to_string(),
        (FieldKind::Scalar(_), Datum::Int(v)) => v.to_string(),
        (FieldKind::Scalar(_), Datum::UInt(v)) => v.to_string(),
        (FieldKind::Scalar(scalar), Datum::Float(v)) => format_float(*scalar, *v, path)?,
        (FieldKind::Temporal(shape), datum) => temporal::format(*shape, datum).ok_or_else(|| {
            MapperError::shape(path, shape.name(), datum.variant_name())
        })?,
        (kind, datum) => {
            return Err(MapperError::shape(path, kind.to_string(), datum.variant_name()))
        }
    };
    Ok(text)
}

/// Shortest round-trip form, keeping `.0` on whole numbers. JSON has no
/// spelling for NaN or infinity.
fn format_float(scalar: ScalarType, v: f64, path: &FieldPath) -> Result<String> {
    if !v.is_finite() {
        return Err(MapperError::Conversion {
            path: path.to_string(),
            kind: scalar.name().to_string(),
            text: v.to_string(),
            reason: "JSON numbers must be finite".to_string(),
        });
    }
    Ok(match scalar {
        ScalarType::F32 => format!("{:?}", v as f32),
        _ => format!("{:?}", v),
    })
}

/// Test whether `s` has the shape of a plain decimal number:
/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?`. Such map values are emitted unquoted.
pub(crate) fn looks_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (digits, None),
    };
    let int_ok = match int_part.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    };
    let frac_ok = frac_part.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()));
    int_ok && frac_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_shape() {
        for yes in ["0", "1.5", "2.0", "-3", "12.50", "100"] {
            assert!(looks_decimal(yes), "{yes} should look decimal");
        }
        for no in ["", "-", "1.", ".5", "007", "1e5", "abc", "1.2.3", "+1", "NaN"] {
            assert!(!looks_decimal(no), "{no} should not look decimal");
        }
    }

    #[test]
    fn floats_keep_a_fraction() {
        let root = FieldPath::root();
        assert_eq!(format_float(ScalarType::F64, 2.0, &root).unwrap(), "2.0");
        assert_eq!(format_float(ScalarType::F64, 12.3, &root).unwrap(), "12.3");
        assert_eq!(format_float(ScalarType::F32, f64::from(0.1f32), &root).unwrap(), "0.1");
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let err = format_float(ScalarType::F64, f64::NAN, &FieldPath::root()).unwrap_err();
        assert!(matches!(err, MapperError::Conversion { .. }));
    }
}
