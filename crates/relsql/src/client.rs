//! Database client capability.

use crate::error::RelResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;

/// A connection (or pool, or transaction) that can run one SQL statement.
///
/// Both engines only ever call [`DatabaseClient::query`], once per statement,
/// with the SQL text and its positionally aligned parameters. Connection
/// lifecycle, cancellation and timeouts belong to the implementation.
///
/// For SELECT statements the result is one [`Row`] per result row. For
/// statements without a result set implementations return an empty vector.
pub trait DatabaseClient: Send + Sync {
    /// Run `sql` with `params` bound to its placeholders in order.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = RelResult<Vec<Row>>> + Send;
}

impl<T: DatabaseClient> DatabaseClient for &T {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = RelResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }
}

impl<T: DatabaseClient> DatabaseClient for Arc<T> {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = RelResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }
}

impl<T: DatabaseClient> DatabaseClient for Box<T> {
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = RelResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }
}
