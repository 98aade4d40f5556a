mod common;

use std::collections::HashMap;
use std::sync::Arc;

use jsonisator_core::{
    record, render, DescriptorError, FieldKind, MapperError, Record, ScalarType, SequenceShape,
    TemporalShape,
};

use common::{Customer, Order, Product};

#[derive(Debug, Default)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}

record!(Node { value, next });

#[derive(Debug, Default)]
struct Left {
    right: Option<Box<Right>>,
}

#[derive(Debug, Default)]
struct Right {
    left: Vec<Left>,
}

record!(Left { right });
record!(Right { left });

#[derive(Debug, Default)]
struct ListKeyed {
    index: HashMap<Vec<String>, i32>,
}

record!(ListKeyed { index });

#[derive(Debug, Default)]
struct Twice {
    a: i32,
    b: i32,
}

#[allow(unreachable_patterns)]
mod twice {
    use super::Twice;
    jsonisator_core::record!(Twice { a, b as "a" });
}

#[derive(Debug, Default)]
struct Blank {
    a: i32,
}

record!(Blank { a as "" });

#[test]
fn fields_in_declaration_order() {
    let descriptor = Customer::descriptor().unwrap();
    let names: Vec<&str> = descriptor.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["id", "firstName", "lastName", "birthDate", "orders"]);
    assert_eq!(descriptor.name(), "Customer");
    assert_eq!(descriptor.len(), 5);
}

#[test]
fn kinds_come_from_declared_types() {
    let descriptor = Product::descriptor().unwrap();
    assert_eq!(descriptor.field("id").unwrap().kind, FieldKind::Identifier);
    assert_eq!(descriptor.field("name").unwrap().kind, FieldKind::Text);
    assert_eq!(
        descriptor.field("price").unwrap().kind,
        FieldKind::Scalar(ScalarType::F64)
    );
    assert_eq!(
        descriptor.field("stock").unwrap().kind,
        FieldKind::Mapping(Box::new(FieldKind::Identifier), Box::new(FieldKind::Decimal))
    );
    assert!(descriptor.field("missing").is_none());
}

#[test]
fn nested_kinds_share_the_descriptor() {
    let order = Order::descriptor().unwrap();
    match &order.field("products").unwrap().kind {
        FieldKind::Sequence(SequenceShape::List, element) => match element.as_ref() {
            FieldKind::Nested(product) => {
                assert!(Arc::ptr_eq(product, &Product::descriptor().unwrap()));
            }
            other => panic!("expected nested product, got {other:?}"),
        },
        other => panic!("expected list, got {other:?}"),
    }
    assert_eq!(
        order.field("createdDate").unwrap().kind,
        FieldKind::Temporal(TemporalShape::OffsetDateTime)
    );
}

#[test]
fn descriptor_is_memoized() {
    let first = Customer::descriptor().unwrap();
    let second = Customer::descriptor().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn kind_display() {
    let kind = Product::descriptor().unwrap().field("stock").unwrap().kind.clone();
    assert_eq!(kind.to_string(), "map of identifier to decimal");
}

#[test]
fn self_recursive_type_is_rejected() {
    assert_eq!(
        Node::descriptor().unwrap_err(),
        DescriptorError::RecursiveType {
            type_name: "Node".into()
        }
    );
    // The failure is replayed on later calls.
    assert!(Node::descriptor().is_err());
}

#[test]
fn mutually_recursive_types_are_rejected() {
    assert!(matches!(
        Left::descriptor(),
        Err(DescriptorError::RecursiveType { .. })
    ));
    assert!(Right::descriptor().is_err());
}

#[test]
fn recursive_type_fails_before_rendering() {
    let err = render(&Node::default()).unwrap_err();
    assert!(
        matches!(err, MapperError::Descriptor(DescriptorError::RecursiveType { .. })),
        "{err:?}"
    );
}

#[test]
fn list_map_key_is_unsupported() {
    match ListKeyed::descriptor().unwrap_err() {
        DescriptorError::UnsupportedMapKey {
            type_name,
            field,
            found,
        } => {
            assert_eq!(type_name, "ListKeyed");
            assert_eq!(field, "index");
            assert_eq!(found, "list of text");
        }
        other => panic!("expected unsupported map key, got {other:?}"),
    }
}

#[test]
fn duplicate_field_names_are_rejected() {
    assert_eq!(
        Twice::descriptor().unwrap_err(),
        DescriptorError::DuplicateField {
            type_name: "Twice".into(),
            field: "a".into(),
        }
    );
}

#[test]
fn empty_field_names_are_rejected() {
    assert_eq!(
        Blank::descriptor().unwrap_err(),
        DescriptorError::EmptyFieldName {
            type_name: "Blank".into()
        }
    );
}
