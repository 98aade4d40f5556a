//! Sample domain model: customers placing orders for stocked products.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Months, NaiveDate, Utc};
use jsonisator_core::record;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub id: Option<Uuid>,
    pub name: String,
    pub price: f64,
    /// Warehouse id to quantity on hand.
    pub stock: HashMap<Uuid, BigDecimal>,
}

record!(Product { id, name, price, stock });

impl Product {
    pub fn add_stock(&mut self, warehouse: Uuid, quantity: BigDecimal) {
        self.stock.insert(warehouse, quantity);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub id: Option<Uuid>,
    pub products: Vec<Product>,
    pub created_date: Option<DateTime<FixedOffset>>,
}

record!(Order {
    id,
    products,
    created_date as "createdDate",
});

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

/// A numbered product catalogue.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Model {
    pub id: i64,
    pub products: Vec<Product>,
}

record!(Model { id, products });

const FIRST_NAMES: [&str; 4] = ["Reuben", "Camilla", "Theo", "Ada"];
const LAST_NAMES: [&str; 4] = ["Martin", "Hughes", "Novak", "Lind"];

fn sample_product(name: &str, price: f64) -> Product {
    let mut product = Product {
        id: Some(Uuid::new_v4()),
        name: name.to_string(),
        price,
        stock: HashMap::new(),
    };
    product.add_stock(Uuid::new_v4(), BigDecimal::from(23));
    product.add_stock(Uuid::new_v4(), BigDecimal::from(54));
    product
}

/// Build the `n`th sample customer with one two-product order and random ids.
pub fn sample_customer(n: usize) -> Customer {
    let now = Utc::now();
    let order = Order {
        id: Some(Uuid::new_v4()),
        products: vec![
            sample_product("product name", 12.3),
            sample_product("product 2", 32.1),
        ],
        created_date: Some(now.fixed_offset()),
    };
    Customer {
        id: Some(Uuid::new_v4()),
        first_name: FIRST_NAMES[n % FIRST_NAMES.len()].to_string(),
        last_name: LAST_NAMES[n % LAST_NAMES.len()].to_string(),
        birth_date: now.date_naive().checked_sub_months(Months::new(20 * 12)),
        orders: vec![order],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonisator_core::{parse, render};

    #[test]
    fn sample_customer_round_trips() {
        let customer = sample_customer(1);
        let text = render(&customer).unwrap();
        assert!(text.contains("\"firstName\": \"Camilla\""));
        let parsed: Customer = parse(&text).unwrap();
        assert_eq!(parsed, customer);
    }

    #[test]
    fn model_renders_numeric_id() {
        let model = Model {
            id: 7,
            products: vec![],
        };
        assert_eq!(
            render(&model).unwrap(),
            "{\n  \"id\": 7,\n  \"products\": []\n}"
        );
    }
}
