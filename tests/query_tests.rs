use sql_auditor::query::ParsedQuery;

#[test]
fn test_parse_well_formed_statement() {
    let parsed = ParsedQuery::new("select id from tbl where id = 1", None, None);
    assert!(parsed.parse_error.is_none());
    assert_eq!(parsed.secondary.len(), 1);
    assert!(parsed.primary.is_some());
    assert!(parsed.has_tree());
    assert_eq!(parsed.text, "select id from tbl where id = 1");
}

#[test]
fn test_parse_failure_is_recorded_not_raised() {
    let parsed = ParsedQuery::new("this is not sql at all", None, None);
    assert!(parsed.parse_error.is_some());
    assert!(parsed.secondary.is_empty());
    assert!(parsed.primary.is_none());
    assert!(!parsed.has_tree());
    // the raw text is still available for text-level rules
    assert_eq!(parsed.text, "this is not sql at all");
}

#[test]
fn test_multiple_statements() {
    let parsed = ParsedQuery::new("select 1; select 2", None, None);
    assert_eq!(parsed.secondary.len(), 2);
}

#[test]
fn test_charset_and_collation_accepted() {
    let parsed =
        ParsedQuery::new("select id from tbl", Some("utf8mb4"), Some("utf8mb4_general_ci"));
    assert!(parsed.parse_error.is_none());
}

#[test]
fn test_table_extraction() {
    let parsed = ParsedQuery::new("select * from sakila.film f", None, None);
    assert_eq!(parsed.meta.tables.len(), 1);
    let table = &parsed.meta.tables[0];
    assert_eq!(table.name.as_str(), "film");
    assert_eq!(table.db.as_deref(), Some("sakila"));
    assert_eq!(table.alias.as_deref(), Some("f"));
}

#[test]
fn test_where_facts() {
    let parsed = ParsedQuery::new("select a from t where b = 1 and c like '%x'", None, None);
    assert!(parsed.meta.has_where);
    assert!(parsed.meta.where_eq_cols.iter().any(|c| c == "b"));
    assert_eq!(parsed.meta.like_patterns.len(), 1);
    assert_eq!(parsed.meta.like_patterns[0].as_str(), "%x");
}

#[test]
fn test_create_table_digest() {
    let parsed = ParsedQuery::new(
        "create table t (id int not null, name varchar(64), primary key (id))",
        None,
        None
    );
    assert_eq!(parsed.meta.creates.len(), 1);
    let table = &parsed.meta.creates[0];
    assert_eq!(table.name.as_str(), "t");
    assert_eq!(table.columns.len(), 2);
    assert!(table.has_pk);
    assert_eq!(table.pk_cols, vec!["id"]);
}

#[test]
fn test_subquery_depth() {
    let parsed = ParsedQuery::new(
        "select * from tb where id in (select id from (select id from tb) d)",
        None,
        None
    );
    assert!(parsed.meta.in_subquery);
    assert!(parsed.meta.subquery_depth >= 2);
}
