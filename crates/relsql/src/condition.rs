//! WHERE-clause conditions.
//!
//! A [`Criteria`] is an ordered list of `column -> Condition` entries. Each entry
//! renders as one comparison with one bound value; entries are joined with `AND`
//! in insertion order.

use crate::value::Value;

/// A single column condition.
///
/// `Scalar` compares with `=`. `Operator` inserts `op` verbatim between the
/// column and its placeholder.
///
/// **Trust boundary**: the operator string is not validated. Never build an
/// `Operator` from untrusted input.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value`
    Scalar(Value),
    /// `column <op> value`
    Operator { op: String, value: Value },
}

impl Condition {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Condition::Scalar(value.into())
    }

    pub fn operator(op: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Operator {
            op: op.into(),
            value: value.into(),
        }
    }

    /// The SQL operator this condition renders with.
    pub fn op(&self) -> &str {
        match self {
            Condition::Scalar(_) => "=",
            Condition::Operator { op, .. } => op,
        }
    }

    /// The bound value.
    pub fn value(&self) -> &Value {
        match self {
            Condition::Scalar(value) | Condition::Operator { value, .. } => value,
        }
    }
}

macro_rules! impl_scalar_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Condition {
                fn from(value: $t) -> Self {
                    Condition::Scalar(value.into())
                }
            }
        )*
    };
}

impl_scalar_from!(
    Value,
    bool,
    i16,
    i32,
    i64,
    f64,
    &str,
    String,
    uuid::Uuid,
    chrono::DateTime<chrono::Utc>
);

/// Ordered `column -> Condition` mapping.
///
/// # Example
/// ```ignore
/// use relsql::Criteria;
///
/// let criteria = Criteria::new()
///     .eq("status", "active")
///     .op("age", ">=", 18);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Condition)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`.
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, Condition::scalar(value))
    }

    /// Add `column <op> value`. See [`Condition`] for the trust boundary on `op`.
    pub fn op(self, column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(column, Condition::operator(op, value))
    }

    /// Add an arbitrary condition.
    pub fn with(mut self, column: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.entries.push((column.into(), condition.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries.iter().map(|(c, cond)| (c.as_str(), cond))
    }
}

impl<K, C> FromIterator<(K, C)> for Criteria
where
    K: Into<String>,
    C: Into<Condition>,
{
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, c)| (k.into(), c.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_renders_with_equals() {
        let c = Condition::scalar(5);
        assert_eq!(c.op(), "=");
        assert_eq!(c.value(), &Value::Int(5));
    }

    #[test]
    fn operator_is_kept_verbatim() {
        let c = Condition::operator("ILIKE", "%ann%");
        assert_eq!(c.op(), "ILIKE");
        assert_eq!(c.value(), &Value::Text("%ann%".into()));
    }

    #[test]
    fn criteria_iterates_in_insertion_order() {
        let criteria = Criteria::new()
            .eq("b", 1)
            .op("a", "<", 2)
            .with("c", Condition::scalar("x"));
        let cols: Vec<_> = criteria.iter().map(|(c, _)| c).collect();
        assert_eq!(cols, ["b", "a", "c"]);
    }

    #[test]
    fn criteria_from_iterator_of_scalars() {
        let criteria: Criteria = [("id", 1), ("owner", 2)].into_iter().collect();
        assert_eq!(criteria.len(), 2);
        assert!(criteria.iter().all(|(_, c)| c.op() == "="));
    }
}
