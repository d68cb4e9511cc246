use sql_auditor::config::Config;
use sql_auditor::query::ParsedQuery;
use sql_auditor::rules::{self, resolve_conflicts};

fn audit_codes(sql: &str) -> Vec<String> {
    audit_codes_with(sql, &Config::default())
}

fn audit_codes_with(sql: &str, config: &Config) -> Vec<String> {
    let parsed = ParsedQuery::new(sql, None, None);
    rules::audit(&parsed, config)
        .into_iter()
        .map(|(code, _)| code)
        .collect()
}

fn assert_fires(sql: &str, code: &str) {
    let codes = audit_codes(sql);
    assert!(codes.iter().any(|c| c == code), "{code} expected for {sql}, got {codes:?}");
}

fn assert_quiet(sql: &str, code: &str) {
    let codes = audit_codes(sql);
    assert!(!codes.iter().any(|c| c == code), "{code} unexpected for {sql}, got {codes:?}");
}

#[test]
fn test_implicit_alias() {
    assert_fires("select name from tbl t1 where id < 1000", "ALI.001");
    assert_quiet("select name from tbl t1 where id < 1000", "OK");
}

#[test]
fn test_explicit_alias_ok() {
    assert_quiet("select name from tbl as t1 where id < 1000", "ALI.001");
}

#[test]
fn test_wildcard_alias() {
    assert_fires("select tbl.* as c1,c2,c3 from tbl where id < 1000", "ALI.002");
}

#[test]
fn test_same_name_alias() {
    assert_fires("select name from tbl as tbl where id < 1000", "ALI.003");
}

#[test]
fn test_leading_wildcard_like() {
    let codes = audit_codes("select c1,c2,c3 from tbl where name like '%foo'");
    assert!(codes.iter().any(|c| c == "ARG.001"), "got {codes:?}");
    assert!(!codes.iter().any(|c| c == "ARG.002"), "got {codes:?}");
}

#[test]
fn test_like_without_wildcard() {
    let codes = audit_codes("select c1,c2,c3 from tbl where name like 'foo'");
    assert!(codes.iter().any(|c| c == "ARG.002"), "got {codes:?}");
    assert!(!codes.iter().any(|c| c == "ARG.001"), "got {codes:?}");
}

#[test]
fn test_in_null() {
    assert_fires("SELECT * FROM tb WHERE col IN (NULL)", "ARG.004");
}

#[test]
fn test_in_list_too_long() {
    let config = Config {
        max_in_count: 2,
        ..Default::default()
    };
    let codes = audit_codes_with("select id from t where num in (1,2,3)", &config);
    assert!(codes.iter().any(|c| c == "ARG.005"), "got {codes:?}");
    assert_quiet("select id from t where num in (1,2,3)", "ARG.005");
}

#[test]
fn test_is_null_in_where() {
    assert_fires("select id from t where num is null", "ARG.006");
}

#[test]
fn test_or_chain_on_same_column() {
    assert_fires("SELECT c1,c2,c3 FROM tbl WHERE c1 = 14 OR c1 = 17", "ARG.008");
    assert_quiet("SELECT c1,c2,c3 FROM tbl WHERE c1 = 14 OR c2 = 17", "ARG.008");
}

#[test]
fn test_quoted_string_with_edge_space() {
    assert_fires("SELECT c1 FROM tbl WHERE c2 = 'abc '", "ARG.009");
}

#[test]
fn test_index_hint() {
    assert_fires("SELECT * FROM t1 USE INDEX (i1) ORDER BY a", "ARG.010");
}

#[test]
fn test_negative_query() {
    assert_fires("select id from t where num not in (1,2,3)", "ARG.011");
}

#[test]
fn test_bulk_insert_values() {
    let config = Config {
        max_value_count: 1,
        ..Default::default()
    };
    let codes = audit_codes_with("INSERT INTO tb (a) VALUES (1), (2)", &config);
    assert!(codes.iter().any(|c| c == "ARG.012"), "got {codes:?}");
    assert!(!codes.iter().any(|c| c == "OK"), "got {codes:?}");
}

#[test]
fn test_column_in_in_list() {
    assert_fires("select id from t where id in (1, 2, id)", "ARG.014");
}

#[test]
fn test_select_without_where() {
    assert_fires("select id from tbl", "CLA.001");
    assert_quiet("select id from tbl", "OK");
}

#[test]
fn test_order_by_rand() {
    assert_fires("select name from tbl where id < 1000 order by rand()", "CLA.002");
}

#[test]
fn test_limit_with_offset() {
    assert_fires(
        "select c1,c2 from tbl where name='xx' order by c1 limit 1 offset 20",
        "CLA.003"
    );
}

#[test]
fn test_group_by_position() {
    assert_fires("select col1,col2 from tbl group by 1", "CLA.004");
}

#[test]
fn test_order_by_constant_column() {
    assert_fires("select id from test where id=1 order by id", "CLA.005");
}

#[test]
fn test_group_order_across_tables() {
    assert_fires(
        "select tb1.col, tb2.col from tb1, tb2 where id=1 group by tb1.col, tb2.col",
        "CLA.006"
    );
}

#[test]
fn test_group_by_without_order_by() {
    assert_fires("select c1,c2,c3 from t1 where c1='foo' group by c2", "CLA.008");
}

#[test]
fn test_order_by_expression() {
    assert_fires(
        "select description from film where title='ACADEMY DINOSAUR' order by \
         length-language_id",
        "CLA.009"
    );
}

#[test]
fn test_having_clause() {
    assert_fires(
        "select c1, count(*) from t1 group by c1 having count(*) > 2",
        "CLA.013"
    );
}

#[test]
fn test_delete_without_where() {
    assert_fires("delete from tbl", "CLA.014");
}

#[test]
fn test_update_without_where() {
    assert_fires("update tbl set col=1", "CLA.015");
    assert_quiet("update tbl set col=1", "OK");
}

#[test]
fn test_update_with_where_quiet() {
    assert_quiet("update tbl set col=1 where id=2", "CLA.015");
}

#[test]
fn test_select_star() {
    assert_fires("select * from film", "COL.001");
    assert_quiet("select * from film", "OK");
}

#[test]
fn test_insert_without_column_list() {
    assert_fires("insert into tbl values(1,'name')", "COL.002");
}

#[test]
fn test_signed_auto_increment() {
    assert_fires("create table test(`id` int(11) NOT NULL AUTO_INCREMENT)", "COL.003");
}

#[test]
fn test_imprecise_float() {
    assert_fires("create table t (hours float not null)", "COL.009");
}

#[test]
fn test_enum_type() {
    assert_fires("create table tab1(status ENUM('new','fixed'))", "COL.010");
}

#[test]
fn test_null_usage_note() {
    let config = Config {
        ignore_rules: vec![],
        ..Default::default()
    };
    let codes = audit_codes_with("select c1,c2,c3 from tbl where c4 is null or c4 <> 1", &config);
    assert!(codes.iter().any(|c| c == "COL.011"), "got {codes:?}");
}

#[test]
fn test_null_usage_suppressed_by_default() {
    assert_quiet("select c1,c2,c3 from tbl where c4 is null or c4 <> 1", "COL.011");
}

#[test]
fn test_blob_not_null() {
    assert_fires("CREATE TABLE tb (c blob NOT NULL)", "COL.012");
}

#[test]
fn test_timestamp_without_default() {
    assert_fires(
        "CREATE TABLE tbl (`id` bigint not null, `create_time` timestamp)",
        "COL.013"
    );
}

#[test]
fn test_int_display_width() {
    assert_fires("CREATE TABLE tab (a INT(1))", "COL.016");
}

#[test]
fn test_varchar_too_long() {
    assert_fires("CREATE TABLE tab (a varchar(3500))", "COL.017");
    assert_quiet("CREATE TABLE tab (a varchar(255))", "COL.017");
}

#[test]
fn test_disallowed_column_type() {
    assert_fires("CREATE TABLE tab (a BOOLEAN)", "COL.018");
}

#[test]
fn test_time_precision() {
    assert_fires("CREATE TABLE t1 (t TIME(3), dt DATETIME(6))", "COL.019");
}

#[test]
fn test_count_distinct_multiple_columns() {
    assert_fires("SELECT COUNT(DISTINCT col, col2) FROM tbl", "DIS.002");
}

#[test]
fn test_distinct_star() {
    assert_fires("SELECT DISTINCT * FROM film", "DIS.003");
}

#[test]
fn test_function_in_where() {
    assert_fires("select id from t where substring(name,1,3)='abc'", "FUN.001");
}

#[test]
fn test_count_star_with_where() {
    assert_fires(
        "SELECT c3, COUNT(*) AS accounts FROM tab where c2 < 10000 GROUP BY c3",
        "FUN.002"
    );
}

#[test]
fn test_sysdate() {
    assert_fires("SELECT SYSDATE()", "FUN.004");
}

#[test]
fn test_count_constant() {
    assert_fires("SELECT COUNT(1) FROM tbl", "FUN.005");
}

#[test]
fn test_sum_npe() {
    assert_fires("SELECT SUM(col) FROM tbl", "FUN.006");
    assert_quiet("SELECT IF(ISNULL(SUM(col)), 0, SUM(col)) FROM tbl", "FUN.006");
}

#[test]
fn test_create_trigger() {
    assert_fires(
        "CREATE TRIGGER t1 AFTER INSERT ON work FOR EACH ROW INSERT INTO time VALUES(NOW());",
        "FUN.007"
    );
}

#[test]
fn test_comma_and_ansi_join_mix() {
    assert_fires(
        "select c1 from t1, t2 join t3 on t1.c1 = t3.c1 where t1.id > 1000",
        "JOI.001"
    );
}

#[test]
fn test_joined_update() {
    assert_fires(
        "UPDATE users u LEFT JOIN hobby h ON u.id = h.uid SET u.name = 'pianoboy' WHERE \
         h.hobby = 'piano'",
        "JOI.007"
    );
}

#[test]
fn test_cross_database_join() {
    assert_fires(
        "select a.t1.col, b.t2.col from a.t1, b.t2 where a.t1.id = b.t2.id",
        "JOI.008"
    );
}

#[test]
fn test_missing_primary_key() {
    let codes = audit_codes("create table test(col varchar(500))");
    assert!(codes.iter().any(|c| c == "KEY.002"), "got {codes:?}");
    assert!(codes.iter().any(|c| c == "KEY.007"), "got {codes:?}");
}

#[test]
fn test_mixed_order_directions() {
    assert_fires("SELECT * FROM tbl ORDER BY a DESC, b ASC", "KEY.008");
}

#[test]
fn test_sql_calc_found_rows() {
    assert_fires("select SQL_CALC_FOUND_ROWS col from tbl where id > 1000", "KWR.001");
}

#[test]
fn test_keyword_as_column_name() {
    assert_fires("CREATE TABLE tbl ( `select` int )", "KWR.002");
}

#[test]
fn test_plural_table_name() {
    assert_fires("CREATE TABLE books ( a int )", "KWR.003");
}

#[test]
fn test_insert_select() {
    assert_fires("INSERT INTO tbl SELECT * FROM tbl2", "LCK.001");
}

#[test]
fn test_insert_on_duplicate_key() {
    assert_fires(
        "INSERT INTO t1(a,b,c) VALUES (1,2,3) ON DUPLICATE KEY UPDATE c=c+1",
        "LCK.002"
    );
}

#[test]
fn test_ip_address_literal() {
    assert_fires("insert into tbl (IP,name) values('10.20.306.122','test')", "LIT.001");
}

#[test]
fn test_unquoted_date() {
    let codes = audit_codes("select col1,col2 from tbl where time < 2018-01-10");
    assert!(codes.iter().any(|c| c == "LIT.002"), "got {codes:?}");
    assert!(!codes.iter().any(|c| c == "OK"), "got {codes:?}");
}

#[test]
fn test_quoted_date_quiet() {
    assert_quiet("select col1,col2 from tbl where time < '2018-01-10'", "LIT.002");
}

#[test]
fn test_nondeterministic_group_by() {
    assert_fires("select c1,c2,c3 from t1 where c2='foo' group by c2", "RES.001");
}

#[test]
fn test_limit_without_order_by() {
    assert_fires("select col1,col2 from tbl where name='xx' limit 10", "RES.002");
    assert_quiet("select col1,col2 from tbl where name='xx' order by col1 limit 10", "RES.002");
}

#[test]
fn test_update_with_limit() {
    assert_fires("UPDATE film SET length = 120 WHERE title = 'abc' LIMIT 1", "RES.003");
}

#[test]
fn test_update_with_order_by() {
    assert_fires("UPDATE film SET length = 120 WHERE title = 'abc' ORDER BY title", "RES.004");
}

#[test]
fn test_update_set_with_and() {
    assert_fires("update tbl set col = 1 and cl = 2 where col = 3", "RES.005");
}

#[test]
fn test_impossible_where() {
    assert_fires("select * from tbl where 1 != 1", "RES.006");
}

#[test]
fn test_always_true_where() {
    assert_fires("select * from tbl where 1 = 1", "RES.007");
}

#[test]
fn test_load_data() {
    assert_fires("LOAD DATA INFILE 'data.txt' INTO TABLE db2.my_table", "RES.008");
}

#[test]
fn test_truncate() {
    let codes = audit_codes("TRUNCATE TABLE tbl_name");
    assert!(codes.iter().any(|c| c == "SEC.001"), "got {codes:?}");
    assert!(codes.iter().any(|c| c == "SEC.003"), "got {codes:?}");
}

#[test]
fn test_plaintext_password_column() {
    assert_fires(
        "create table test(id int,name varchar(20) not null,password varchar(200) not null)",
        "SEC.002"
    );
}

#[test]
fn test_injection_function() {
    assert_fires("SELECT BENCHMARK(10, RAND())", "SEC.004");
}

#[test]
fn test_nonstandard_inequality() {
    assert_fires("select col1,col2 from tbl where type != 0", "STA.001");
}

#[test]
fn test_space_after_dot() {
    assert_fires("select col from sakila. film", "STA.002");
}

#[test]
fn test_index_naming_convention() {
    assert_fires("create index part_of_name on customer (name)", "STA.003");
    assert_quiet("create index idx_name on customer (name)", "STA.003");
}

#[test]
fn test_in_subquery() {
    assert_fires(
        "select col1,col2,col3 from table1 where col2 in (select col from table2)",
        "SUB.001"
    );
}

#[test]
fn test_union_without_all() {
    assert_fires("select id from t1 union select id from t2", "SUB.002");
    assert_quiet("select id from t1 union all select id from t2", "SUB.002");
}

#[test]
fn test_subquery_with_limit() {
    assert_fires(
        "SELECT * FROM staff WHERE name IN (SELECT name FROM customer ORDER BY name LIMIT 1)",
        "SUB.005"
    );
}

#[test]
fn test_dual_table_name() {
    assert_fires("create table dual(id int, primary key (id))", "TBL.003");
}

#[test]
fn test_charset_not_allowed() {
    assert_fires("CREATE TABLE tbl (a int) DEFAULT CHARSET = latin1", "TBL.005");
    assert_quiet("CREATE TABLE tbl (a int) DEFAULT CHARSET = utf8mb4", "TBL.005");
}

#[test]
fn test_temporary_table() {
    assert_fires(
        "CREATE TEMPORARY TABLE `work` (`t` time DEFAULT NULL) ENGINE=InnoDB",
        "TBL.007"
    );
}

#[test]
fn test_collate_not_allowed() {
    assert_fires("CREATE TABLE tbl (a int) DEFAULT COLLATE = latin1_bin", "TBL.008");
}

#[test]
fn test_clean_query_is_ok() {
    let codes = audit_codes("select id from tbl where id > 1 order by id limit 10");
    assert_eq!(codes, vec!["OK".to_string()], "got {codes:?}");
}

#[test]
fn test_syntax_error_finding() {
    let parsed = ParsedQuery::new("this is not sql at all", None, None);
    let findings = rules::audit(&parsed, &Config::default());
    let err = findings.get("ERR.000").expect("syntax error finding");
    assert!(!err.content.is_empty());
    assert!(!findings.contains("OK"));
}

#[test]
fn test_multiple_statements_union_findings() {
    let codes = audit_codes("select id from t1; update t2 set c = 1");
    assert!(codes.iter().any(|c| c == "CLA.001"), "got {codes:?}");
    assert!(codes.iter().any(|c| c == "CLA.015"), "got {codes:?}");
}

#[test]
fn test_conflict_resolution_prefers_specific_rule() {
    let parsed = ParsedQuery::new("create table test(col varchar(500))", None, None);
    let findings = rules::audit(&parsed, &Config::default());
    assert!(findings.contains("KEY.002"));
    let resolved = resolve_conflicts(findings);
    assert!(resolved.contains("KEY.007"));
    assert!(!resolved.contains("KEY.002"));
}

#[test]
fn test_rule_never_contains_ok_with_real_findings() {
    for sql in [
        "select id from tbl",
        "update tbl set col=1",
        "delete from tbl",
        "select * from film",
    ] {
        let codes = audit_codes(sql);
        assert!(codes.len() >= 1);
        if codes.iter().any(|c| c != "OK") {
            assert!(!codes.iter().any(|c| c == "OK"), "OK mixed into {codes:?} for {sql}");
        }
    }
}

#[test]
fn test_every_finding_is_in_catalog() {
    for sql in [
        "select id from tbl",
        "this is not sql at all",
        "create table dual(id int, primary key (id))",
        "update tbl set col = 1 and cl = 2 where col = 3",
    ] {
        let parsed = ParsedQuery::new(sql, None, None);
        let findings = rules::audit(&parsed, &Config::default());
        for (code, _) in findings.iter() {
            assert!(rules::get(code).is_some(), "{code} missing from catalog");
        }
    }
}

// Codes match `^(OK|[A-Z]{3}\.\d{3})$`.
fn is_valid_code(code: &str) -> bool {
    if code == "OK" {
        return true;
    }
    let bytes = code.as_bytes();
    bytes.len() == 7
        && bytes[..3].iter().all(|b| b.is_ascii_uppercase())
        && bytes[3] == b'.'
        && bytes[4..].iter().all(|b| b.is_ascii_digit())
}

#[test]
fn test_catalog_invariants() {
    let catalog = rules::catalog();
    assert!(catalog.contains_key("OK"));
    for (code, rule) in catalog {
        assert_eq!(*code, rule.code);
        assert!(is_valid_code(code), "bad code format: {code}");
    }
}

#[test]
fn test_ignored_rule_does_not_fire() {
    let config = Config {
        ignore_rules: vec![String::from("CLA.*")],
        ..Default::default()
    };
    let codes = audit_codes_with("select id from tbl", &config);
    assert!(!codes.iter().any(|c| c.starts_with("CLA")), "got {codes:?}");
}
