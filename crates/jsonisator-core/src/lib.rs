//! # jsonisator-core
//!
//! Descriptor-driven mapping between Rust object graphs and indented JSON
//! text.
//!
//! A struct is registered once with [`record!`], which gives it a
//! [`TypeDescriptor`]: its fields in declaration order, each classified into
//! a closed [`FieldKind`]. The descriptor alone drives both directions:
//!
//! - **Write**: instance → [`Value`] tree → text ([`render`], [`render_many`])
//! - **Read**: text → [`Value`] tree → instance ([`parse`], [`parse_many`])
//!
//! ## Quick start
//!
//! ```
//! use jsonisator_core::{parse, record, render};
//! use bigdecimal::BigDecimal;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Account {
//!     id: String,
//!     name: String,
//!     balance: BigDecimal,
//!     tags: Vec<String>,
//! }
//!
//! record!(Account { id, name, balance, tags });
//!
//! let account = Account {
//!     id: "c1".into(),
//!     name: "Ann".into(),
//!     balance: "12.50".parse().unwrap(),
//!     tags: vec![],
//! };
//! let text = render(&account).unwrap();
//! assert_eq!(
//!     text,
//!     "{\n  \"id\": \"c1\",\n  \"name\": \"Ann\",\n  \"balance\": 12.50,\n  \"tags\": []\n}"
//! );
//! assert_eq!(parse::<Account>(&text).unwrap(), account);
//! ```
//!
//! ## Output conventions
//!
//! Two-space indentation, no trailing newline. Numbers and decimals are
//! unquoted, everything else is quoted, absent values render as `""`, and
//! empty sequences and maps both render as `[]`.

pub mod datum;
pub mod descriptor;
pub mod deserializer;
pub mod error;
pub mod limits;
pub mod parser;
mod path;
pub mod printer;
pub mod record;
pub mod serializer;
pub mod temporal;
pub mod value;

pub use datum::{Datum, FieldType};
pub use descriptor::{FieldKind, FieldSpec, ScalarType, SequenceShape, TemporalShape, TypeDescriptor};
pub use deserializer::{from_value, parse, parse_many, parse_many_with_limits, parse_with_limits};
pub use error::{DescriptorError, MapperError, Result};
pub use limits::Limits;
pub use parser::{parse_value, parse_value_with_limits};
pub use printer::print_value;
pub use record::Record;
pub use serializer::{render, render_many, to_value};
pub use temporal::OffsetTime;
pub use value::Value;
