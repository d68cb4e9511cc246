// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_auditor::fingerprint::{fingerprint, id};

#[test]
fn test_literal_replaced_with_placeholder() {
    let fp = fingerprint("SELECT * FROM t WHERE id = 42");
    assert!(fp.ends_with("id = ?"), "got {fp}");
}

#[test]
fn test_string_literal_replaced() {
    let fp = fingerprint("select name from tbl where name = 'foo'");
    assert_eq!(fp, "select name from tbl where name = ?");
}

#[test]
fn test_in_list_collapsed() {
    let fp = fingerprint("select * from t where id in (1, 2, 3)");
    assert!(fp.contains("in(?+)"), "got {fp}");
}

#[test]
fn test_values_list_collapsed() {
    let fp = fingerprint("insert into t (a, b) values (1, 'x'), (2, 'y')");
    assert!(fp.contains("values(?+)"), "got {fp}");
}

#[test]
fn test_comments_stripped() {
    let fp = fingerprint("select col /* pick one */ from tbl -- trailing\nwhere id = 9");
    assert_eq!(fp, "select col from tbl where id = ?");
}

#[test]
fn test_whitespace_collapsed_and_lowercased() {
    let fp = fingerprint("SELECT   col\n\tFROM tbl");
    assert_eq!(fp, "select col from tbl");
}

#[test]
fn test_hex_and_date_literals() {
    assert_eq!(fingerprint("select * from t where x = 0x1F"), "select * from t where x = ?");
    let fp = fingerprint("select * from t where d < 2018-01-10");
    assert!(!fp.contains("2018"), "got {fp}");
}

#[test]
fn test_fingerprint_idempotent() {
    for sql in [
        "SELECT * FROM t WHERE id = 42",
        "select * from t where id in (1, 2, 3)",
        "insert into t (a) values (1), (2)",
        "select 'a b c' from t where x = \"y\" -- note",
    ] {
        let once = fingerprint(sql);
        assert_eq!(fingerprint(&once), once, "not idempotent for {sql}");
    }
}

#[test]
fn test_id_shape() {
    let digest = id(&fingerprint("select 1"));
    assert_eq!(digest.len(), 32);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_id_stable_and_fingerprint_dependent() {
    let a = id(&fingerprint("select * from t where id = 1"));
    let b = id(&fingerprint("select * from t where id = 200"));
    assert_eq!(a, b, "same fingerprint must share an id");
    assert_eq!(a, id(&fingerprint("select * from t where id = 1")));
    let c = id(&fingerprint("select * from other"));
    assert_ne!(a, c);
}
