use std::sync::{Arc, Mutex};

use myqb::{QbError, QueryBuilder, Table, fields, values};

#[derive(Debug, PartialEq)]
enum DbError {
    Builder(QbError),
    Backend(String),
}

impl From<QbError> for DbError {
    fn from(err: QbError) -> Self {
        DbError::Builder(err)
    }
}

/// Executor that records every statement and returns its 1-based position.
fn recorder() -> (
    Arc<Mutex<Vec<String>>>,
    impl Fn(String) -> std::future::Ready<Result<usize, QbError>> + Clone + Send + Sync,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let exec = move |sql: String| {
        let mut log = sink.lock().unwrap();
        log.push(sql);
        std::future::ready(Ok::<_, QbError>(log.len()))
    };
    (log, exec)
}

#[tokio::test]
async fn exec_passes_built_sql_to_executor() {
    let (log, exec) = recorder();
    let mut qb = QueryBuilder::with_executor("test1", exec).unwrap();
    qb.update()
        .unwrap()
        .set(fields! { "a" => 123, "b" => 456 })
        .unwrap()
        .and_where(fields! { "b" => 777 })
        .limit(12);

    assert_eq!(qb.exec().await.unwrap(), 1);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["UPDATE `test1` SET `a`=123, `b`=456 WHERE `b`=777 LIMIT 12"]
    );
}

#[tokio::test]
async fn exec_is_repeatable_and_reflects_state() {
    let (log, exec) = recorder();
    let mut qb = QueryBuilder::with_executor("t", exec).unwrap();
    qb.select(["id"]).unwrap();
    qb.exec().await.unwrap();
    qb.limit(1);
    assert_eq!(qb.exec().await.unwrap(), 2);

    let log = log.lock().unwrap();
    assert_eq!(log[0], "SELECT `id` FROM `t`");
    assert_eq!(log[1], "SELECT `id` FROM `t`   LIMIT 1");
}

#[tokio::test]
async fn exec_without_executor_is_configuration_error() {
    let mut qb = QueryBuilder::new("t").unwrap();
    qb.delete().unwrap();
    let err = qb.exec().await.unwrap_err();
    assert!(err.is_configuration(), "got {err:?}");
}

#[tokio::test]
async fn exec_reports_build_errors_through_executor_error() {
    let exec = |_sql: String| async move { Ok::<(), DbError>(()) };

    let qb = QueryBuilder::with_executor("t", exec).unwrap();
    match qb.exec().await.unwrap_err() {
        DbError::Builder(err) => assert!(err.is_invalid_state()),
        other => panic!("unexpected error: {other:?}"),
    }

    let mut qb = QueryBuilder::with_executor("t", exec).unwrap();
    qb.update().unwrap();
    assert_eq!(
        qb.exec().await.unwrap_err(),
        DbError::Builder(QbError::validation("update data cannot be empty"))
    );
}

#[tokio::test]
async fn exec_returns_executor_errors_unmodified() {
    let exec = |sql: String| async move { Err::<(), _>(DbError::Backend(format!("boom: {sql}"))) };
    let mut qb = QueryBuilder::with_executor("t", exec).unwrap();
    qb.delete().unwrap().and_where(("id = ?", values![1]));

    assert_eq!(
        qb.exec().await.unwrap_err(),
        DbError::Backend("boom: DELETE FROM `t` WHERE id = 1".into())
    );
}

#[tokio::test]
async fn table_shares_executor_with_builders() {
    let (log, exec) = recorder();
    let users = Table::new("users").unwrap().with_executor(exec);

    users.count("n").unwrap().exec().await.unwrap();
    users
        .insert(fields! { "name" => "ann" })
        .unwrap()
        .exec()
        .await
        .unwrap();

    assert_eq!(
        log.lock().unwrap().as_slice(),
        [
            "SELECT COUNT(*) AS `n` FROM `users`",
            "INSERT INTO `users` (`name`) VALUES ('ann')",
        ]
    );
}

#[cfg(feature = "tracing")]
#[tokio::test]
async fn tracing_executor_delegates() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("myqb=trace")
        .with_test_writer()
        .try_init();

    let (log, exec) = recorder();
    let traced = myqb::TracingExecutor::new(exec).max_sql_length(16);
    let mut qb = QueryBuilder::with_executor("t", traced).unwrap();
    qb.sql("SELECT :$fields FROM t WHERE id > 10")
        .unwrap()
        .fields(["a", "b"])
        .unwrap();

    assert_eq!(qb.exec().await.unwrap(), 1);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["SELECT `a`, `b` FROM t WHERE id > 10"]
    );
}

#[cfg(feature = "tracing")]
#[tokio::test]
async fn tracing_executor_passes_errors_through() {
    let exec = |_sql: String| async move { Err::<(), _>(DbError::Backend("down".into())) };
    let mut qb = QueryBuilder::with_executor("t", myqb::TracingExecutor::new(exec)).unwrap();
    qb.delete().unwrap();
    assert_eq!(
        qb.exec().await.unwrap_err(),
        DbError::Backend("down".into())
    );
}
