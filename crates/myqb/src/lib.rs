//! # myqb
//!
//! A fluent, table-bound MySQL statement builder.
//!
//! ## Features
//!
//! - **One builder, one statement**: SELECT, COUNT, INSERT (single or bulk),
//!   UPDATE, DELETE, or custom SQL with builder-filled placeholders
//! - **Escaped at the edge**: identifiers are backtick-quoted and values are
//!   rendered as escaped literals as soon as they are added
//! - **Deterministic output**: the same builder state always renders the same
//!   SQL text, suitable for cache keys and exact-match tests
//! - **Early failures**: invalid input or state transitions fail at the call
//!   site, before any SQL reaches an executor
//! - **Deferred execution**: `exec()` hands the SQL to a caller-supplied
//!   [`Executor`]; the builder never opens connections
//!
//! ## Example
//!
//! ```
//! use myqb::{QueryBuilder, fields};
//!
//! // SELECT
//! let mut qb = QueryBuilder::new("test1")?;
//! qb.select(["name", "age"])?
//!     .and_where(fields! { "a" => 123, "b" => 456 });
//! assert_eq!(
//!     qb.build()?,
//!     "SELECT `name`, `age` FROM `test1` WHERE `a`=123 AND `b`=456"
//! );
//!
//! // UPDATE
//! let mut qb = QueryBuilder::new("test1")?;
//! qb.update()?
//!     .set(fields! { "a" => 123, "b" => 456 })?
//!     .and_where(fields! { "b" => 777 })
//!     .limit(12);
//! assert_eq!(
//!     qb.build()?,
//!     "UPDATE `test1` SET `a`=123, `b`=456 WHERE `b`=777 LIMIT 12"
//! );
//!
//! // Custom SQL, placeholders resolved at build time
//! let mut qb = QueryBuilder::new("test1")?;
//! qb.sql("SELECT :$fields FROM `test1`")?.fields(["a", "b", "c"])?;
//! assert_eq!(qb.build()?, "SELECT `a`, `b`, `c` FROM `test1`");
//! # Ok::<(), myqb::QbError>(())
//! ```

mod macros;

pub mod builder;
pub mod error;
pub mod escape;
pub mod executor;
pub mod value;

pub use builder::{
    BuilderOptions, Clause, QueryBuilder, QueryOptions, StatementKind, Table, Template,
    is_read_only_sql,
};
pub use error::{QbError, QbResult};
pub use escape::{MAX_ROW_COUNT, format};
pub use executor::{Executor, NoExecutor};
pub use value::{Fields, Params, Value};

#[cfg(feature = "tracing")]
pub use executor::TracingExecutor;
