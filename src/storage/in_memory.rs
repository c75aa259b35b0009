//! In-memory implementation of EntityStore for testing and development

use super::record::Record;
use crate::core::entity::{AttributeMap, Entity};
use crate::core::error::StoreError;
use crate::core::store::{EntityStore, Fillable, Window};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Table {
    rows: BTreeMap<u64, Record>,
    last_id: u64,
}

/// In-memory record store
///
/// Records are kept ordered by identifier and identifiers are assigned on
/// insert. Uses RwLock for thread-safe access; clones share the same table.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    table: Arc<RwLock<Table>>,
    fields: Option<Arc<Vec<String>>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the fields `find_by` accepts
    ///
    /// Without a declaration any field set on at least one record is accepted.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(Arc::new(fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Store a record as-is, bypassing the fillable list
    ///
    /// A record with id 0 gets the next identifier.
    pub fn insert(&self, mut record: Record) -> Result<Record, StoreError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if record.id == 0 {
            record.id = table.last_id + 1;
        }
        table.last_id = table.last_id.max(record.id);
        table.rows.insert(record.id, record.clone());

        Ok(record)
    }

    fn knows_field(&self, table: &Table, field: &str) -> bool {
        match &self.fields {
            Some(fields) => field == "id" || fields.iter().any(|f| f == field),
            None => field == "id" || table.rows.values().any(|r| r.has_field(field)),
        }
    }
}

fn value_matches(value: Option<Value>, expected: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::Bool(b)) => b.to_string() == expected,
        _ => false,
    }
}

fn log_eager_load(eager_load: &[String]) {
    if !eager_load.is_empty() {
        tracing::debug!(relations = ?eager_load, "relations are stored inline, nothing to eager load");
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    type Entity = Record;

    async fn list(
        &self,
        eager_load: &[String],
        window: Option<Window>,
    ) -> Result<Vec<Record>, StoreError> {
        log_eager_load(eager_load);
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let rows = table.rows.values().cloned();
        Ok(match window {
            Some(Window { skip, limit }) => rows.skip(skip).take(limit).collect(),
            None => rows.collect(),
        })
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.len())
    }

    async fn find(&self, id: &str, eager_load: &[String]) -> Result<Option<Record>, StoreError> {
        log_eager_load(eager_load);
        let Ok(id) = id.parse::<u64>() else {
            return Ok(None);
        };
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by(
        &self,
        field: &str,
        value: &str,
        eager_load: &[String],
    ) -> Result<Option<Record>, StoreError> {
        log_eager_load(eager_load);
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        if !self.knows_field(&table, field) {
            return Err(StoreError::UnknownField {
                field: field.to_string(),
            });
        }

        Ok(table
            .rows
            .values()
            .find(|record| value_matches(record.attribute(field), value))
            .cloned())
    }

    async fn create(
        &self,
        attributes: AttributeMap,
        fillable: &Fillable,
    ) -> Result<Record, StoreError> {
        self.insert(Record::new().with_attributes(fillable.filter(&attributes)))
    }

    async fn update(
        &self,
        mut entity: Record,
        attributes: AttributeMap,
        fillable: &Fillable,
    ) -> Result<Record, StoreError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !table.rows.contains_key(&entity.id) {
            return Err(StoreError::Backend(anyhow!(
                "Record {} no longer exists",
                entity.id
            )));
        }

        entity.merge(fillable.filter(&attributes));
        table.rows.insert(entity.id, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, entity: Record) -> Result<(), StoreError> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        table.rows.remove(&entity.id);
        Ok(())
    }
}
