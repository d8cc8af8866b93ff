//! Example demonstrating myqb's statement builder and deferred execution.
//!
//! Run with:
//!   cargo run --example query_builder -p myqb
//!
//! Set `RUST_LOG=myqb=trace` to see builder and SQL logs.

use myqb::{QbError, QbResult, QueryOptions, Table, TracingExecutor, fields, values};
use tracing_subscriber::EnvFilter;

fn print_statements(users: &Table) -> QbResult<()> {
    // SELECT with pagination options
    let mut q = users.query();
    q.select(["id", "name"])?
        .and_where(fields! { "status" => "active" })
        .and_where(("age >= ?", values![18]))
        .options(
            QueryOptions::new()
                .with_order("created_at DESC")
                .with_skip(20)
                .with_limit(10),
        )?;
    println!("{}", q.build()?);

    // COUNT
    println!("{}", users.count("total")?.and_where(fields! { "vip" => true }).build()?);

    // Bulk INSERT
    let rows = vec![
        fields! { "name" => "ann", "age" => 31 },
        fields! { "age" => 27, "name" => "bo" },
    ];
    println!("{}", users.insert_many(rows)?.build()?);

    // UPDATE with an expression and a mapping
    let mut q = users.update_with(("visits = visits + ?", values![1]))?;
    q.set(fields! { "last_seen" => myqb::Value::raw("NOW()") })?
        .and_where(fields! { "id" => 42 })
        .limit(1);
    println!("{}", q.build()?);

    // Custom SQL, placeholders resolved at build time
    let mut q = users.sql("SELECT :$fields FROM users u JOIN teams t ON t.id = u.team_id :$orderBy :$limit")?;
    q.fields(["u.id", "t.name"])?.order("u.id").limit(5);
    println!("{}", q.build()?);

    // Invalid transitions are reported at the call site
    let mut q = users.delete()?;
    if let Err(e) = q.select(["id"]) {
        println!("rejected: {e}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), QbError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let users = Table::new("users")?;
    print_statements(&users)?;

    // Any async closure returning Result<_, E: From<QbError>> can execute.
    let fake_db = |sql: String| async move {
        println!("executing: {sql}");
        Ok::<u64, QbError>(1)
    };
    let users = users.with_executor(TracingExecutor::new(fake_db));
    let affected = users
        .delete()?
        .and_where(fields! { "id" => 42 })
        .limit(1)
        .exec()
        .await?;
    println!("affected rows: {affected}");

    Ok(())
}
