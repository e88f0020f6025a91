//! Recording client for unit tests.

use crate::client::DatabaseClient;
use crate::dialect::Dialect;
use crate::error::{RelError, RelResult};
use crate::row::Row;
use crate::value::Value;
use std::collections::HashSet;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&str, &[Value]) -> RelResult<Vec<Row>> + Send + Sync>;

/// Records every `(sql, params)` call and answers through a responder.
pub(crate) struct MockClient {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    responder: Responder,
}

impl MockClient {
    /// Answers every statement with zero rows.
    pub(crate) fn new() -> Self {
        Self::with_responder(|_, _| Ok(Vec::new()))
    }

    pub(crate) fn with_responder(
        f: impl Fn(&str, &[Value]) -> RelResult<Vec<Row>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(f),
        }
    }

    /// Fails every statement with a connection error carrying `message`.
    pub(crate) fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::with_responder(move |_, _| Err(RelError::Connection(message.clone())))
    }

    /// Answers existence probes as if exactly `tables` exist.
    pub(crate) fn with_existing_tables(dialect: Dialect, tables: &[&str]) -> Self {
        let existing: HashSet<String> = tables.iter().map(|t| t.to_string()).collect();
        Self::with_responder(move |sql, params| {
            if !sql.contains("information_schema.tables") {
                return Ok(Vec::new());
            }
            let name = params.first().and_then(Value::as_str).unwrap_or_default();
            let found = existing.contains(name);
            Ok(vec![match dialect {
                Dialect::Postgres => Row::from_pairs([("exists", found)]),
                Dialect::MySql => Row::from_pairs([("count", i64::from(found))]),
            }])
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.calls().into_iter().map(|(sql, _)| sql).collect()
    }
}

impl DatabaseClient for MockClient {
    async fn query(&self, sql: &str, params: &[Value]) -> RelResult<Vec<Row>> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        (self.responder)(sql, params)
    }
}
