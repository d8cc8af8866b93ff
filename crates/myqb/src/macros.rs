/// Build a `Vec<Value>` for positional template parameters.
///
/// ```
/// use myqb::{values, Value};
///
/// let v = values![1, "a", None::<i32>];
/// assert_eq!(v, vec![Value::Int(1), Value::Text("a".into()), Value::Null]);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}

/// Build an ordered [`Fields`](crate::Fields) mapping.
///
/// ```
/// use myqb::fields;
///
/// let row = fields! { "name" => "alice", "age" => 30 };
/// assert_eq!(row.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($column, $value);)+
        fields
    }};
}

/// `tracing::trace!` on the builder target; compiled out without the `tracing` feature.
macro_rules! builder_trace {
    ($($field:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "myqb.builder", $($field)*);
    };
}

pub(crate) use builder_trace;
