//! Table-bound statement builder.
//!
//! One [`QueryBuilder`] renders one MySQL statement against one table.
//!
//! ## Design
//!
//! - The statement kind is set exactly once; switching kinds is an error.
//! - Conditions, assignments and insert rows are escaped when they are added
//!   and stored as ready-to-join fragments.
//! - Pagination is kept as a pre-rendered `LIMIT` clause, recomputed on every
//!   `skip`/`limit` call, so call order never matters.
//! - Custom SQL placeholders (`:$fields`, `:$orderBy`, `:$limit`) are resolved
//!   at build time.
//! - UPDATE requires at least one assignment at build time.

pub mod clause;
pub mod kind;
pub mod query;
mod render;
pub mod table;

pub use clause::{Clause, QueryOptions, Template};
pub use kind::{StatementKind, is_read_only_sql};
pub use query::{BuilderOptions, QueryBuilder};
pub use table::Table;
