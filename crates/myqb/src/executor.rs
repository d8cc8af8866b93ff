//! Deferred execution of rendered SQL.
//!
//! The builder never talks to a database. `exec()` renders the statement and
//! hands the SQL text to an [`Executor`] supplied at construction; connection
//! selection, retries, caching and result decoding all live behind it.
//!
//! Any `Fn(String) -> impl Future<Output = Result<T, E>>` is an executor, as
//! long as `E: From<QbError>` so build failures can flow through the same
//! error type.
//!
//! # Example
//!
//! ```
//! use myqb::{QbError, QueryBuilder, fields};
//!
//! # async fn run() -> Result<(), QbError> {
//! let exec = |sql: String| async move { Ok::<_, QbError>(sql.len()) };
//! let mut qb = QueryBuilder::with_executor("users", exec)?;
//! qb.delete()?.and_where(fields! { "id" => 1 });
//! let n = qb.exec().await?;
//! assert_eq!(n, "DELETE FROM `users` WHERE `id`=1".len());
//! # Ok(())
//! # }
//! ```

use crate::builder::QueryBuilder;
use crate::error::QbError;
use std::future::Future;

/// Runs rendered SQL.
pub trait Executor: Send + Sync {
    /// Whatever the backend returns; the builder never inspects it.
    type Output;
    /// Backend failure; build failures convert into it.
    type Error: From<QbError>;

    /// Run one statement.
    fn execute(
        &self,
        sql: String,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

impl<F, Fut, T, Err> Executor for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, Err>> + Send,
    Err: From<QbError>,
{
    type Output = T;
    type Error = Err;

    fn execute(&self, sql: String) -> impl Future<Output = Result<T, Err>> + Send {
        self(sql)
    }
}

/// Placeholder executor type for builders created without one.
///
/// It has no values, so `exec()` on such a builder always reports a
/// configuration error.
#[derive(Debug, Clone, Copy)]
pub enum NoExecutor {}

impl Executor for NoExecutor {
    type Output = ();
    type Error = QbError;

    fn execute(&self, _sql: String) -> impl Future<Output = Result<(), QbError>> + Send {
        std::future::ready::<Result<(), QbError>>(match *self {})
    }
}

impl<E: Executor> QueryBuilder<E> {
    /// Render the statement and run it through the executor.
    ///
    /// Fails with [`QbError::Configuration`] when the builder has no executor,
    /// or with the build error; executor failures are returned unmodified.
    pub async fn exec(&self) -> Result<E::Output, E::Error> {
        let executor = self.executor.as_ref().ok_or_else(|| {
            QbError::configuration("exec() requires an executor supplied at construction")
        })?;
        let sql = self.build()?;
        executor.execute(sql).await
    }
}

#[cfg(feature = "tracing")]
pub use tracing_executor::TracingExecutor;

#[cfg(feature = "tracing")]
mod tracing_executor {
    use super::Executor;
    use crate::builder::StatementKind;
    use std::fmt::Debug;
    use std::future::Future;
    use tracing::Level;

    /// An executor wrapper that logs every statement through `tracing`
    /// (target `myqb.sql`) before delegating.
    ///
    /// Failures are logged at WARN and returned unmodified.
    #[derive(Debug, Clone)]
    pub struct TracingExecutor<E> {
        inner: E,
        /// Tracing event level to emit at.
        pub level: Level,
        /// Truncate long SQL strings (in bytes, on a char boundary). `None` means no truncation.
        pub max_sql_length: Option<usize>,
    }

    impl<E> TracingExecutor<E> {
        pub fn new(inner: E) -> Self {
            Self {
                inner,
                level: Level::DEBUG,
                max_sql_length: Some(200),
            }
        }

        pub fn level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn max_sql_length(mut self, len: usize) -> Self {
            self.max_sql_length = Some(len);
            self
        }

        pub fn no_truncate(mut self) -> Self {
            self.max_sql_length = None;
            self
        }

        pub fn inner(&self) -> &E {
            &self.inner
        }

        fn truncate_sql(&self, sql: &str) -> String {
            match self.max_sql_length {
                Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
                _ => sql.to_string(),
            }
        }

        fn emit(&self, sql: &str) {
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        Level::ERROR => tracing::error!($($field)*),
                        Level::WARN  => tracing::warn!($($field)*),
                        Level::INFO  => tracing::info!($($field)*),
                        Level::DEBUG => tracing::debug!($($field)*),
                        Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let kind = StatementKind::from_sql(sql).map_or("OTHER", |k| k.as_str());
            let shown = self.truncate_sql(sql);
            emit_at_level!(self.level, target: "myqb.sql", kind, sql = %shown, "executing");
        }
    }

    impl<E> Executor for TracingExecutor<E>
    where
        E: Executor,
        E::Error: Debug,
    {
        type Output = E::Output;
        type Error = E::Error;

        fn execute(
            &self,
            sql: String,
        ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
            self.emit(&sql);
            let shown = self.truncate_sql(&sql);
            let fut = self.inner.execute(sql);
            async move {
                let result = fut.await;
                if let Err(err) = &result {
                    tracing::warn!(target: "myqb.sql", sql = %shown, error = ?err, "statement failed");
                }
                result
            }
        }
    }

    pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
        if sql.len() <= max_bytes {
            return sql;
        }
        let mut end = max_bytes;
        while end > 0 && !sql.is_char_boundary(end) {
            end -= 1;
        }
        &sql[..end]
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn truncate_on_char_boundary() {
            assert_eq!(truncate_sql_bytes("héllo", 2), "h");
            assert_eq!(truncate_sql_bytes("abc", 10), "abc");
        }

        #[test]
        fn truncate_adds_ellipsis() {
            let exec = TracingExecutor::new(()).max_sql_length(6);
            assert_eq!(exec.truncate_sql("SELECT 1"), "SELECT...");
            assert_eq!(exec.no_truncate().truncate_sql("SELECT 1"), "SELECT 1");
        }
    }
}
