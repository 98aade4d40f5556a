mod common;

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::BigDecimal;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use jsonisator_core::{parse, parse_many, record, render, render_many, OffsetTime};

use common::{assert_valid_json, customer, product, Customer, Product};

#[derive(Debug, Default, Clone, PartialEq)]
struct Everything {
    flag: bool,
    tiny: i8,
    wide: u64,
    single: f32,
    double: f64,
    text: String,
    amount: BigDecimal,
    day: NaiveDate,
    clock: NaiveTime,
    moment: NaiveDateTime,
    local: OffsetTime,
    maybe: Option<i16>,
    nested: Vec<Vec<u32>>,
    unique: BTreeSet<String>,
    lookup: BTreeMap<i32, Vec<String>>,
    flags: BTreeMap<String, bool>,
}

record!(Everything {
    flag,
    tiny,
    wide,
    single,
    double,
    text,
    amount,
    day,
    clock,
    moment,
    local,
    maybe,
    nested,
    unique,
    lookup,
    flags,
});

fn everything() -> Everything {
    let mut lookup = BTreeMap::new();
    lookup.insert(-1, vec!["neg".to_string()]);
    lookup.insert(7, vec![]);
    let mut flags = BTreeMap::new();
    flags.insert("on".to_string(), true);
    flags.insert("off".to_string(), false);
    Everything {
        flag: true,
        tiny: -128,
        wide: u64::MAX,
        single: 1.25,
        double: -1.0e-7,
        text: "multi\nline \"quoted\" \u{1f600}".to_string(),
        amount: "123456789.000000001".parse().unwrap(),
        day: NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
        clock: NaiveTime::from_hms_milli_opt(23, 59, 59, 125).unwrap(),
        moment: NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap(),
        local: "08:00:00-03:30".parse().unwrap(),
        maybe: Some(-3),
        nested: vec![vec![1, 2], vec![], vec![3]],
        unique: ["b", "a"].iter().map(|s| s.to_string()).collect(),
        lookup,
        flags,
    }
}

#[test]
fn customer_round_trip() {
    let original = customer();
    let text = render(&original).unwrap();
    let parsed: Customer = parse(&text).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn every_kind_round_trips() {
    let original = everything();
    let text = render(&original).unwrap();
    assert_valid_json(&text);
    let parsed: Everything = parse(&text).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn default_instance_round_trips() {
    let text = render(&Everything::default()).unwrap();
    let parsed: Everything = parse(&text).unwrap();
    assert_eq!(parsed, Everything::default());
}

#[test]
fn rerender_is_byte_identical() {
    let text = render(&customer()).unwrap();
    let parsed: Customer = parse(&text).unwrap();
    assert_eq!(render(&parsed).unwrap(), text);
}

#[test]
fn batch_round_trip() {
    let products = vec![product(1, "One", 1.0), product(2, "Two", 2.5), Product::default()];
    let text = render_many(&products).unwrap();
    assert_valid_json(&text);
    let parsed: Vec<Product> = parse_many(&text).unwrap();
    assert_eq!(parsed, products);
}

#[test]
fn decimal_scale_survives() {
    let mut p = product(3, "Scale", 0.5);
    p.stock.clear();
    p.stock.insert(common::uuid(9), "10.000".parse().unwrap());
    let text = render(&p).unwrap();
    assert!(text.contains(": 10.000"), "{text}");
    let parsed: Product = parse(&text).unwrap();
    assert_eq!(parsed.stock[&common::uuid(9)].to_plain_string(), "10.000");
}

#[derive(Debug, Default, PartialEq)]
struct Ledger {
    balance: BigDecimal,
    opened: OffsetTime,
    members: BTreeSet<String>,
}

record!(Ledger { balance, opened, members });

#[test]
fn wide_decimal_keeps_every_digit() {
    for literal in [
        "0.12345678901234567890123456789012345",
        "123456789012345678901234567890.5",
        "-98765432109876543210987654321098765432.000000000000000000001",
    ] {
        let text = format!(r#"{{"balance": {literal}}}"#);
        let ledger: Ledger = parse(&text).unwrap();
        assert_eq!(ledger.balance.to_plain_string(), literal);
        let rendered = render(&ledger).unwrap();
        assert!(rendered.contains(&format!("\"balance\": {literal},")), "{rendered}");
        assert_eq!(parse::<Ledger>(&rendered).unwrap(), ledger);
    }
}

#[test]
fn offset_with_seconds_survives() {
    let ledger = Ledger {
        opened: OffsetTime::new(
            NaiveTime::from_hms_opt(1, 2, 3).unwrap(),
            FixedOffset::east_opt(3630).unwrap(),
        ),
        ..Ledger::default()
    };
    let text = render(&ledger).unwrap();
    assert!(text.contains("\"opened\": \"01:02:03+01:00:30\""), "{text}");
    assert_eq!(parse::<Ledger>(&text).unwrap(), ledger);
}

#[test]
fn large_set_parses_in_one_pass() {
    let members: BTreeSet<String> = (0..50_000).map(|n| format!("member-{n:05}")).collect();
    let ledger = Ledger {
        members,
        ..Ledger::default()
    };
    let text = render(&ledger).unwrap();
    let started = std::time::Instant::now();
    let parsed: Ledger = parse(&text).unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(parsed, ledger);
}

#[test]
fn repeated_set_elements_collapse() {
    let ledger: Ledger = parse(r#"{"members": ["b", "a", "b", "a"]}"#).unwrap();
    assert_eq!(ledger.members.into_iter().collect::<Vec<_>>(), ["a", "b"]);
}
