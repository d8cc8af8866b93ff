use chrono::{NaiveDate, TimeZone, Utc};
use myqb::{
    Fields, QbError, QueryBuilder, QueryOptions, StatementKind, Table, Value, fields,
    is_read_only_sql, values,
};
use serde_json::json;

#[test]
fn select_from_json_filter() {
    let filter = Fields::try_from(json!({ "status": "active", "age": 30, "vip": true })).unwrap();
    let mut qb = QueryBuilder::new("users").unwrap();
    qb.select(["id", "name"]).unwrap().and_where(filter);

    assert_eq!(
        qb.build().unwrap(),
        "SELECT `id`, `name` FROM `users` WHERE `status`='active' AND `age`=30 AND `vip`=true"
    );
}

#[test]
fn json_filter_must_be_object() {
    let err = Fields::try_from(json!([1, 2])).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn options_from_request_json() {
    let opts: QueryOptions = serde_json::from_value(json!({
        "fields": ["id", "title"],
        "order": "created_at DESC",
        "skip": 40,
        "limit": 20,
    }))
    .unwrap();

    let posts = Table::new("posts").unwrap();
    let mut qb = posts.query();
    qb.select_all()
        .unwrap()
        .options(opts)
        .unwrap()
        .and_where(fields! { "author_id" => 7 });

    assert_eq!(
        qb.build().unwrap(),
        "SELECT `id`, `title` FROM `posts` WHERE `author_id`=7 ORDER BY created_at DESC LIMIT 40,20"
    );
}

#[test]
fn literals_are_escaped() {
    let mut qb = QueryBuilder::new("notes").unwrap();
    qb.insert(fields! {
        "body" => "it's a \"quote\"\nwith \\ backslash",
        "blob" => Value::bytes(vec![0xde, 0xad]),
        "day" => NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        "at" => Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    })
    .unwrap();

    assert_eq!(
        qb.build().unwrap(),
        r#"INSERT INTO `notes` (`body`, `blob`, `day`, `at`) VALUES ('it\'s a \"quote\"\nwith \\ backslash', X'dead', '2024-02-29', '2024-01-02 03:04:05.000')"#
    );
}

#[test]
fn identifiers_are_escaped() {
    let mut qb = QueryBuilder::new("odd`name").unwrap();
    qb.select(["u.*", "a`b"]).unwrap();
    assert_eq!(qb.build().unwrap(), "SELECT `u`.*, `a``b` FROM `odd``name`");
}

#[test]
fn uuid_is_rendered_as_text() {
    let id = uuid::Uuid::nil();
    let mut qb = QueryBuilder::new("t").unwrap();
    qb.delete().unwrap().and_where(fields! { "id" => id });
    assert_eq!(
        qb.build().unwrap(),
        "DELETE FROM `t` WHERE `id`='00000000-0000-0000-0000-000000000000'"
    );
}

#[test]
fn null_mapping_value_renders_equals_null() {
    let mut qb = QueryBuilder::new("t").unwrap();
    qb.select_all()
        .unwrap()
        .and_where(fields! { "deleted_at" => Value::Null });
    assert_eq!(qb.build().unwrap(), "SELECT * FROM `t` WHERE `deleted_at`=NULL");
}

#[test]
fn custom_sql_with_join() {
    let mut qb = QueryBuilder::new("orders").unwrap();
    let sql = qb.format(
        "SELECT :$fields FROM ?? o JOIN ?? c ON c.id = o.customer_id WHERE o.total > ? :$orderBy :$limit",
        values!["orders", "customers", 100],
    );
    qb.sql(sql)
        .unwrap()
        .fields(["o.id", "c.name"])
        .unwrap()
        .order("o.total DESC")
        .limit(5);

    assert_eq!(
        qb.build().unwrap(),
        "SELECT `o`.`id`, `c`.`name` FROM `orders` o JOIN `customers` c ON c.id = o.customer_id \
         WHERE o.total > 100 ORDER BY o.total DESC LIMIT 5"
    );
    assert!(qb.is_read_only());
}

#[test]
fn statement_kind_parsing() {
    assert_eq!("select".parse::<StatementKind>().unwrap(), StatementKind::Select);
    assert_eq!(" Update ".parse::<StatementKind>().unwrap(), StatementKind::Update);
    assert_eq!("sql".parse::<StatementKind>().unwrap(), StatementKind::Custom);
    assert_eq!(
        "MERGE".parse::<StatementKind>().unwrap_err(),
        QbError::UnsupportedKind("MERGE".into())
    );
    assert_eq!(StatementKind::Count.to_string(), "COUNT");
}

#[test]
fn read_only_detection() {
    assert!(is_read_only_sql("/* hint */ SELECT 1"));
    assert!(is_read_only_sql("(SELECT 1) UNION (SELECT 2)"));
    assert!(is_read_only_sql("show tables"));
    assert!(is_read_only_sql("-- note\nEXPLAIN SELECT 1"));
    assert!(!is_read_only_sql("SELECTED"));
    assert!(!is_read_only_sql("INSERT INTO t VALUES (1)"));
    assert!(!is_read_only_sql(""));
}

#[test]
fn error_messages_are_stable() {
    let mut qb = QueryBuilder::new("t").unwrap();
    assert_eq!(
        qb.set(fields! { "a" => 1 }).unwrap_err().to_string(),
        "Invalid state: query type must be UPDATE"
    );
    qb.update().unwrap();
    assert_eq!(
        qb.build().unwrap_err().to_string(),
        "Validation error: update data cannot be empty"
    );
}

#[test]
fn named_values_skip_quoted_text() {
    let mut qb = QueryBuilder::new("shifts").unwrap();
    qb.select_all().unwrap().and_where((
        "starts_at > '12:30' AND worker = :worker",
        fields! { "30" => 9, "worker" => "ann" },
    ));
    assert_eq!(
        qb.build().unwrap(),
        "SELECT * FROM `shifts` WHERE starts_at > '12:30' AND worker = 'ann'"
    );
}
