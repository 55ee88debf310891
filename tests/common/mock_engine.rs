use async_trait::async_trait;
use dataguard_core::engine::{
    sanitize_table_name, EngineError, QueryEngine, ResultSet, Row, TableColumn,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Call-counting engine double.
///
/// Every query succeeds with a one-row result echoing the SQL, unless a failure
/// has been queued. An optional delay simulates slow execution.
#[derive(Debug, Default)]
pub struct MockEngine {
    calls: AtomicUsize,
    executed: Mutex<Vec<String>>,
    failures: Mutex<VecDeque<EngineError>>,
    tables: Mutex<HashMap<String, Vec<TableColumn>>>,
    delay: Option<Duration>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose every execution takes `delay`
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Fail the next execution with `error`
    pub fn fail_next(&self, error: EngineError) {
        self.failures.lock().push_back(error);
    }

    /// Fail the next `times` executions with the same message
    pub fn fail_times(&self, times: usize, message: &str) {
        let mut failures = self.failures.lock();
        for _ in 0..times {
            failures.push_back(EngineError::failed(message));
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

pub fn echo_result(sql: &str) -> ResultSet {
    let mut row = Row::new();
    row.insert("sql".to_string(), json!(sql));
    ResultSet::new(vec!["sql".to_string()], vec![row])
}

#[async_trait]
impl QueryEngine for MockEngine {
    async fn execute(&self, sql: &str) -> Result<ResultSet, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.executed.lock().push(sql.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(echo_result(sql)),
        }
    }

    async fn upload_csv(&self, file_name: &str, contents: &str) -> Result<String, EngineError> {
        let table_name = sanitize_table_name(file_name);
        let header = contents
            .lines()
            .next()
            .ok_or_else(|| EngineError::failed("Could not parse CSV: file is empty"))?;

        let columns = header
            .split(',')
            .map(|name| TableColumn::new(name.trim(), "VARCHAR"))
            .collect();
        self.tables.lock().insert(table_name.clone(), columns);
        Ok(table_name)
    }

    async fn table_schema(&self, table_name: &str) -> Result<Vec<TableColumn>, EngineError> {
        self.tables
            .lock()
            .get(table_name)
            .cloned()
            .ok_or_else(|| EngineError::failed(format!("Table {table_name} does not exist")))
    }

    fn engine_name(&self) -> &'static str {
        "mock"
    }
}
