//! Mapped record types and their explicit registration.
//!
//! A struct becomes mappable by listing its fields, in declaration order,
//! with [`record!`](crate::record!). The macro implements [`Record`] (the
//! descriptor, plus accessor and mutator by field name) and [`FieldType`] (so
//! the struct can be nested inside other records, lists, sets and maps).
//!
//! ```
//! use jsonisator_core::{record, Record};
//!
//! #[derive(Debug, Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! record!(Point { x, y });
//!
//! let descriptor = Point::descriptor().unwrap();
//! let names: Vec<&str> = descriptor.fields().iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(names, ["x", "y"]);
//! ```

use std::sync::Arc;

use crate::datum::{Datum, FieldType};
use crate::descriptor::TypeDescriptor;
use crate::error::{DescriptorError, MapperError, Result};
use crate::path::FieldPath;

/// A struct with a [`TypeDescriptor`] and by-name field access.
///
/// Instances are created with `Default`; the deserializer then writes each
/// member it finds, so missing members keep their zero value.
pub trait Record: Default + FieldType {
    /// The type's descriptor, built once and shared afterwards.
    fn descriptor() -> std::result::Result<Arc<TypeDescriptor>, DescriptorError>;

    /// Read a field. `None` for names that are not fields of the type.
    fn get(&self, field: &str) -> Option<Datum>;

    /// Write a field. Names that are not fields of the type are ignored.
    fn set(&mut self, field: &str, datum: Datum) -> Result<()>;
}

/// Build a record from a [`Datum::Record`], leaving absent fields at their
/// zero value.
pub fn record_from_datum<R: Record>(datum: Datum) -> Result<R> {
    populate_record(datum, None)
}

/// With a `base`, errors are located at `base.field`; without one they stay
/// unlocated for the enclosing field to fill in.
pub(crate) fn populate_record<R: Record>(datum: Datum, base: Option<&FieldPath>) -> Result<R> {
    match datum {
        Datum::Record(fields) => {
            let mut record = R::default();
            for (name, value) in fields {
                if matches!(value, Datum::Null) {
                    continue;
                }
                record.set(&name, value).map_err(|e| match base {
                    Some(base) => e.at(&base.field(&name)),
                    None => e,
                })?;
            }
            Ok(record)
        }
        other => {
            let path = base.map(ToString::to_string).unwrap_or_default();
            Err(MapperError::shape(path, "record", other.variant_name()))
        }
    }
}

/// Register a struct as a mapped record.
///
/// `record!(Type { field_a, field_b })` lists the fields in declaration
/// order; that order is the member order of the rendered JSON object. A field
/// is keyed by its Rust name unless renamed with `field as "jsonName"`. Every
/// listed field's type must implement [`FieldType`], and the struct must
/// implement `Default`.
#[macro_export]
macro_rules! record {
    ($ty:ident { $($field:ident $(as $name:literal)?),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn descriptor() -> ::std::result::Result<
                ::std::sync::Arc<$crate::TypeDescriptor>,
                $crate::DescriptorError,
            > {
                static CELL: $crate::descriptor::DescriptorCell =
                    $crate::descriptor::DescriptorCell::new();
                $crate::descriptor::memoize(&CELL, ::std::stringify!($ty), || {
                    $crate::TypeDescriptor::builder(::std::stringify!($ty))
                        $(.try_field(
                            $crate::__field_name!($field $(, $name)?),
                            $crate::descriptor::kind_of(|record: &$ty| &record.$field),
                        ))*
                        .build()
                })
            }

            fn get(&self, field: &str) -> ::std::option::Option<$crate::Datum> {
                match field {
                    $($crate::__field_name!($field $(, $name)?) => ::std::option::Option::Some(
                        $crate::FieldType::to_datum(&self.$field),
                    ),)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set(&mut self, field: &str, datum: $crate::Datum) -> $crate::Result<()> {
                match field {
                    $($crate::__field_name!($field $(, $name)?) => {
                        self.$field = $crate::FieldType::from_datum(datum)?;
                    })*
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }
        }

        impl $crate::FieldType for $ty {
            fn field_kind() -> ::std::result::Result<$crate::FieldKind, $crate::DescriptorError> {
                <$ty as $crate::Record>::descriptor().map($crate::FieldKind::Nested)
            }

            fn to_datum(&self) -> $crate::Datum {
                $crate::Datum::Record(::std::vec![
                    $((
                        ::std::string::String::from($crate::__field_name!($field $(, $name)?)),
                        $crate::FieldType::to_datum(&self.$field),
                    )),*
                ])
            }

            fn from_datum(datum: $crate::Datum) -> $crate::Result<Self> {
                $crate::record::record_from_datum(datum)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        ::std::stringify!($field)
    };
    ($field:ident, $name:literal) => {
        $name
    };
}
