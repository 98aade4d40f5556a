//! Runtime field values and the [`FieldType`] capability.
//!
//! A [`Datum`] is what a record's accessor hands to the serializer and what
//! the deserializer hands back to the record's mutator. The descriptor, not
//! the datum, decides the wire form: the serializer reads each datum through
//! the field's [`FieldKind`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::descriptor::{FieldKind, ScalarType, SequenceShape, TemporalShape};
use crate::error::{DescriptorError, MapperError, Result};
use crate::temporal::OffsetTime;

/// A field value with its runtime type attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// An absent value (`None`).
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Identifier(Uuid),
    Decimal(BigDecimal),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    OffsetDateTime(DateTime<FixedOffset>),
    OffsetTime(OffsetTime),
    /// Field name and value pairs of a nested record.
    Record(Vec<(String, Datum)>),
    List(Vec<Datum>),
    Set(Vec<Datum>),
    Map(Vec<(Datum, Datum)>),
}

impl Datum {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "bool",
            Datum::Int(_) => "signed integer",
            Datum::UInt(_) => "unsigned integer",
            Datum::Float(_) => "float",
            Datum::Text(_) => "text",
            Datum::Identifier(_) => "identifier",
            Datum::Decimal(_) => "decimal",
            Datum::Date(_) => "date",
            Datum::Time(_) => "time",
            Datum::DateTime(_) => "date-time",
            Datum::OffsetDateTime(_) => "offset date-time",
            Datum::OffsetTime(_) => "offset time",
            Datum::Record(_) => "record",
            Datum::List(_) => "list",
            Datum::Set(_) => "set",
            Datum::Map(_) => "map",
        }
    }
}

/// A Rust type that can be stored in a mapped field.
///
/// `field_kind` is the type-descriptor side: it classifies the type once.
/// `to_datum` and `from_datum` are the accessor and mutator sides. A datum
/// handed to `from_datum` has already been shaped by the descriptor, so a
/// mismatch there means the descriptor and the impl disagree.
pub trait FieldType: Sized {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError>;

    fn to_datum(&self) -> Datum;

    fn from_datum(datum: Datum) -> Result<Self>;
}

fn mismatch(expected: &str, found: &Datum) -> MapperError {
    MapperError::shape("", expected, found.variant_name())
}

macro_rules! signed_field {
    ($($ty:ty => $scalar:ident),* $(,)?) => {$(
        impl FieldType for $ty {
            fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
                Ok(FieldKind::Scalar(ScalarType::$scalar))
            }

            fn to_datum(&self) -> Datum {
                Datum::Int(i64::from(*self))
            }

            fn from_datum(datum: Datum) -> Result<Self> {
                match datum {
                    Datum::Int(v) => <$ty>::try_from(v).map_err(|e| MapperError::Conversion {
                        path: String::new(),
                        kind: ScalarType::$scalar.name().to_string(),
                        text: v.to_string(),
                        reason: e.to_string(),
                    }),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

macro_rules! unsigned_field {
    ($($ty:ty => $scalar:ident),* $(,)?) => {$(
        impl FieldType for $ty {
            fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
                Ok(FieldKind::Scalar(ScalarType::$scalar))
            }

            fn to_datum(&self) -> Datum {
                Datum::UInt(u64::from(*self))
            }

            fn from_datum(datum: Datum) -> Result<Self> {
                match datum {
                    Datum::UInt(v) => <$ty>::try_from(v).map_err(|e| MapperError::Conversion {
                        path: String::new(),
                        kind: ScalarType::$scalar.name().to_string(),
                        text: v.to_string(),
                        reason: e.to_string(),
                    }),
                    other => Err(mismatch(stringify!($ty), &other)),
                }
            }
        }
    )*};
}

signed_field!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
unsigned_field!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl FieldType for f64 {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Scalar(ScalarType::F64))
    }

    fn to_datum(&self) -> Datum {
        Datum::Float(*self)
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Float(v) => Ok(v),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl FieldType for f32 {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Scalar(ScalarType::F32))
    }

    fn to_datum(&self) -> Datum {
        Datum::Float(f64::from(*self))
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            // Widened from an f32 on the way in, so narrowing is exact.
            Datum::Float(v) => Ok(v as f32),
            other => Err(mismatch("f32", &other)),
        }
    }
}

impl FieldType for bool {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Scalar(ScalarType::Bool))
    }

    fn to_datum(&self) -> Datum {
        Datum::Bool(*self)
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FieldType for String {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Text)
    }

    fn to_datum(&self) -> Datum {
        Datum::Text(self.clone())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FieldType for Uuid {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Identifier)
    }

    fn to_datum(&self) -> Datum {
        Datum::Identifier(*self)
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Identifier(id) => Ok(id),
            other => Err(mismatch("identifier", &other)),
        }
    }
}

impl FieldType for BigDecimal {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Decimal)
    }

    fn to_datum(&self) -> Datum {
        Datum::Decimal(self.clone())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Decimal(d) => Ok(d),
            other => Err(mismatch("decimal", &other)),
        }
    }
}

macro_rules! temporal_field {
    ($($ty:ty => $shape:ident),* $(,)?) => {$(
        impl FieldType for $ty {
            fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
                Ok(FieldKind::Temporal(TemporalShape::$shape))
            }

            fn to_datum(&self) -> Datum {
                Datum::$shape(*self)
            }

            fn from_datum(datum: Datum) -> Result<Self> {
                match datum {
                    Datum::$shape(v) => Ok(v),
                    other => Err(mismatch(TemporalShape::$shape.name(), &other)),
                }
            }
        }
    )*};
}

temporal_field!(
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => OffsetDateTime,
    OffsetTime => OffsetTime,
);

/// UTC timestamps share the offset date-time grammar and render with `Z`.
impl FieldType for DateTime<Utc> {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Temporal(TemporalShape::OffsetDateTime))
    }

    fn to_datum(&self) -> Datum {
        Datum::OffsetDateTime(self.fixed_offset())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::OffsetDateTime(dt) => Ok(dt.with_timezone(&Utc)),
            other => Err(mismatch("offset date-time", &other)),
        }
    }
}

/// `None` is an absent value: it renders as `""` and a missing, `null` or
/// empty-string member reads back as `None`.
impl<T: FieldType> FieldType for Option<T> {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        T::field_kind()
    }

    fn to_datum(&self) -> Datum {
        match self {
            Some(v) => v.to_datum(),
            None => Datum::Null,
        }
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        match datum {
            Datum::Null => Ok(None),
            other => T::from_datum(other).map(Some),
        }
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        T::field_kind()
    }

    fn to_datum(&self) -> Datum {
        (**self).to_datum()
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        T::from_datum(datum).map(Box::new)
    }
}

fn sequence_items(datum: Datum) -> Result<Vec<Datum>> {
    match datum {
        Datum::List(items) | Datum::Set(items) => Ok(items),
        other => Err(mismatch("sequence", &other)),
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Sequence(SequenceShape::List, Box::new(T::field_kind()?)))
    }

    fn to_datum(&self) -> Datum {
        Datum::List(self.iter().map(FieldType::to_datum).collect())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        sequence_items(datum)?.into_iter().map(T::from_datum).collect()
    }
}

/// Elements render in ascending order, so equal sets render identically.
impl<T: FieldType + Eq + Hash + Ord> FieldType for HashSet<T> {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Sequence(SequenceShape::Set, Box::new(T::field_kind()?)))
    }

    fn to_datum(&self) -> Datum {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort();
        Datum::Set(items.into_iter().map(FieldType::to_datum).collect())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        sequence_items(datum)?.into_iter().map(T::from_datum).collect()
    }
}

impl<T: FieldType + Ord> FieldType for BTreeSet<T> {
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Sequence(SequenceShape::Set, Box::new(T::field_kind()?)))
    }

    fn to_datum(&self) -> Datum {
        Datum::Set(self.iter().map(FieldType::to_datum).collect())
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        sequence_items(datum)?.into_iter().map(T::from_datum).collect()
    }
}

fn map_entries(datum: Datum) -> Result<Vec<(Datum, Datum)>> {
    match datum {
        Datum::Map(entries) => Ok(entries),
        other => Err(mismatch("map", &other)),
    }
}

/// Entries render in ascending key order, so equal maps render identically.
impl<K, V> FieldType for HashMap<K, V>
where
    K: FieldType + Eq + Hash + Ord,
    V: FieldType,
{
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Mapping(
            Box::new(K::field_kind()?),
            Box::new(V::field_kind()?),
        ))
    }

    fn to_datum(&self) -> Datum {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Datum::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_datum(), v.to_datum()))
                .collect(),
        )
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        map_entries(datum)?
            .into_iter()
            .map(|(k, v)| -> Result<(K, V)> { Ok((K::from_datum(k)?, V::from_datum(v)?)) })
            .collect()
    }
}

impl<K, V> FieldType for BTreeMap<K, V>
where
    K: FieldType + Ord,
    V: FieldType,
{
    fn field_kind() -> std::result::Result<FieldKind, DescriptorError> {
        Ok(FieldKind::Mapping(
            Box::new(K::field_kind()?),
            Box::new(V::field_kind()?),
        ))
    }

    fn to_datum(&self) -> Datum {
        Datum::Map(
            self.iter()
                .map(|(k, v)| (k.to_datum(), v.to_datum()))
                .collect(),
        )
    }

    fn from_datum(datum: Datum) -> Result<Self> {
        map_entries(datum)?
            .into_iter()
            .map(|(k, v)| -> Result<(K, V)> { Ok((K::from_datum(k)?, V::from_datum(v)?)) })
            .collect()
    }
}
