#![allow(dead_code)]

use std::sync::Mutex;

use oxide_mapper::{Entity, ExecResult, Executor, HasMany, HasOne, Params, PrimaryKey, Result, Row};

#[derive(Debug, Default, Entity)]
pub struct Author {
    pub id: PrimaryKey,
    pub name: String,
    #[relation(table = "story", on = "author")]
    pub stories: HasMany,
}

#[derive(Debug, Default, Entity)]
pub struct Story {
    pub id: PrimaryKey,
    pub name: String,
    pub body: String,
    pub author: HasOne,
}

/// Executor that records every statement instead of running it.
///
/// Queries answer with the canned `rows`; every exec reports `generated_id`
/// as the new key.
pub struct Recorder {
    pub statements: Mutex<Vec<(String, Params)>>,
    pub rows: Vec<Row>,
    pub generated_id: Option<i64>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            statements: Mutex::new(Vec::new()),
            rows: Vec::new(),
            generated_id: Some(-5),
        }
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::new()
        }
    }

    pub fn without_generated_id() -> Self {
        Self {
            generated_id: None,
            ..Self::new()
        }
    }

    pub fn last(&self) -> (String, Params) {
        self.statements
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_else(|| panic!("no statement recorded"))
    }

    pub fn count(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    fn record(&self, sql: &str, params: &Params) {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), params.clone()));
    }
}

impl Executor for Recorder {
    async fn exec(&self, sql: &str, params: &Params) -> Result<ExecResult> {
        self.record(sql, params);
        Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: self.generated_id,
        })
    }

    async fn query(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.record(sql, params);
        Ok(self.rows.clone())
    }
}

/// Executor whose every call fails.
pub struct Broken;

impl Executor for Broken {
    async fn exec(&self, _sql: &str, _params: &Params) -> Result<ExecResult> {
        Err(oxide_mapper::Error::Executor("connection refused".into()))
    }

    async fn query(&self, _sql: &str, _params: &Params) -> Result<Vec<Row>> {
        Err(oxide_mapper::Error::Executor("connection refused".into()))
    }
}
