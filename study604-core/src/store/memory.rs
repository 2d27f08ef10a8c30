//! In-process row store.
//!
//! Behaves like the hosted store for a single session. Every request
//! is counted and failures can be injected, which makes it the
//! test double of choice for the cache and the use cases.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use study604_entities::time::Timestamp;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    SelectAll,
    SelectWhere,
    Insert,
    Delete,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<Collection, Vec<Row>>,
    calls: HashMap<(Op, Collection), usize>,
    failures: Vec<(Op, Error)>,
    next_spot_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    latency: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a JSON object that maps collection
    /// names to arrays of rows.
    pub fn from_json(seed: Value) -> Result<Self> {
        let store = Self::new();
        let Value::Object(tables) = seed else {
            return Err(Error::Query("seed must be a JSON object".into()));
        };
        for (name, rows) in tables {
            let collection = match name.as_str() {
                "spots" => Collection::Spots,
                "saved" => Collection::Saved,
                "reviews" => Collection::Reviews,
                _ => {
                    log::warn!("Ignoring unknown collection '{name}' in seed");
                    continue;
                }
            };
            let Value::Array(rows) = rows else {
                return Err(Error::Query(format!("'{name}' must be an array of rows")));
            };
            for row in rows {
                let Value::Object(row) = row else {
                    return Err(Error::InvalidRow {
                        collection,
                        reason: "not an object".into(),
                    });
                };
                store.put(collection, row);
            }
        }
        Ok(store)
    }

    /// Adds a row without counting it as a request.
    pub fn put(&self, collection: Collection, row: Row) {
        let mut state = self.state.lock();
        if let Some(id) = row.get("id").and_then(Value::as_i64) {
            state.next_spot_id = state.next_spot_id.max(id);
        }
        state.tables.entry(collection).or_default().push(row);
    }

    /// All rows of a collection without counting it as a request.
    pub fn rows(&self, collection: Collection) -> Vec<Row> {
        self.state
            .lock()
            .tables
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of requests of the given kind.
    pub fn calls(&self, op: Op, collection: Collection) -> usize {
        self.state
            .lock()
            .calls
            .get(&(op, collection))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    /// The next request of the given kind fails with `err`.
    pub fn fail_next(&self, op: Op, err: Error) {
        self.state.lock().failures.push((op, err));
    }

    /// Delays every request, e.g. to observe requests in flight.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    async fn begin(&self, op: Op, collection: Collection) -> Result<()> {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state.lock();
        *state.calls.entry((op, collection)).or_default() += 1;
        if let Some(pos) = state.failures.iter().position(|(o, _)| *o == op) {
            let (_, err) = state.failures.remove(pos);
            log::debug!("Injected failure for {op:?} on '{collection}': {err}");
            return Err(err);
        }
        Ok(())
    }
}

fn id_of(row: &Row) -> Option<&Value> {
    row.get("id")
}

#[async_trait]
impl Store for MemoryStore {
    async fn select_all(&self, collection: Collection) -> Result<Vec<Row>> {
        self.begin(Op::SelectAll, collection).await?;
        Ok(self.rows(collection))
    }

    async fn select_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Row>> {
        self.begin(Op::SelectWhere, collection).await?;
        let state = self.state.lock();
        let rows = state
            .tables
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.get(field).is_some_and(|v| value_matches(v, value)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(rows)
    }

    async fn insert(&self, collection: Collection, mut row: Row) -> Result<Row> {
        self.begin(Op::Insert, collection).await?;
        let mut state = self.state.lock();
        if id_of(&row).is_none_or(Value::is_null) {
            if collection != Collection::Spots {
                return Err(Error::Query(format!(
                    "null value in column 'id' of '{collection}'"
                )));
            }
            state.next_spot_id += 1;
            row.insert("id".into(), json!(state.next_spot_id));
        }
        if collection != Collection::Reviews && !row.contains_key("created_at") {
            row.insert("created_at".into(), json!(Timestamp::now().to_rfc3339()));
        }
        state.tables.entry(collection).or_default().push(row.clone());
        Ok(row)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.begin(Op::Delete, collection).await?;
        let mut state = self.state.lock();
        if let Some(rows) = state.tables.get_mut(&collection) {
            rows.retain(|row| !id_of(row).is_some_and(|v| value_matches(v, id)));
        }
        Ok(())
    }
}
