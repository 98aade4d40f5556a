//! Shared test models: a small commerce graph covering every field kind.
#![allow(dead_code)]

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate};
use jsonisator_core::record;
use num_bigint::BigInt;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub id: Option<Uuid>,
    pub name: String,
    pub price: f64,
    pub stock: HashMap<Uuid, BigDecimal>,
}

record!(Product { id, name, price, stock });

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub id: Option<Uuid>,
    pub products: Vec<Product>,
    pub created_date: Option<DateTime<FixedOffset>>,
}

record!(Order { id, products, created_date as "createdDate" });

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Customer {
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub orders: Vec<Order>,
}

record!(Customer {
    id,
    first_name as "firstName",
    last_name as "lastName",
    birth_date as "birthDate",
    orders,
});

pub fn uuid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn product(n: u128, name: &str, price: f64) -> Product {
    let mut stock = HashMap::new();
    stock.insert(uuid(0x1000 + n), BigDecimal::new(BigInt::from(150), 2));
    stock.insert(uuid(0x2000 + n), BigDecimal::new(BigInt::from(2), 0));
    Product {
        id: Some(uuid(n)),
        name: name.to_string(),
        price,
        stock,
    }
}

pub fn customer() -> Customer {
    let created = DateTime::parse_from_rfc3339("2024-03-01T09:30:00+03:00").unwrap();
    Customer {
        id: Some(uuid(1)),
        first_name: "Reuben".to_string(),
        last_name: "Martin".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2003, 11, 3),
        orders: vec![
            Order {
                id: Some(uuid(10)),
                products: vec![product(100, "Theo", 100.0), product(101, "Camilla", 12.3)],
                created_date: Some(created),
            },
            Order {
                id: Some(uuid(11)),
                products: vec![],
                created_date: None,
            },
        ],
    }
}

/// Assert that `text` is valid JSON according to an independent parser.
pub fn assert_valid_json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("invalid JSON ({e}):\n{text}"))
}
