//! # In-Memory Adapter
//!
//! [`MemoryAdapter`] keeps [`Record`]s in process memory. It implements the
//! whole [`Adapter`] contract and is used by the demo binary and the tests.
//!
//! Every operation it executes is counted in a shared [`CallLog`], so tests
//! can assert which implementation a dispatch resolved to:
//!
//! ```rust,ignore
//! let adapter = MemoryAdapter::with_records(records);
//! let calls = adapter.calls();
//!
//! let resource = Resource::build("widgets", |b| { b.adapter(adapter); })?;
//! resource.prepare_collection(&Params::new()).await?;
//!
//! assert_eq!(calls.count(Operation::Paginate), 1);
//! ```

use crate::adapter::{Adapter, Attribute, AttributeKind};
use crate::overrides::Operation;
use crate::params::{Params, SortOrder};
use crate::resource::Resource;
use crate::scope::Scope;
use async_trait::async_trait;
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// A schemaless record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// `0` until the record is saved.
    pub id: u64,
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

/// A record prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presented {
    pub param: String,
    pub label: String,
    pub record: Record,
}

/// Per-operation call counters.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<HashMap<Operation, usize>>,
}

impl CallLog {
    fn record(&self, operation: Operation) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        *calls.entry(operation).or_default() += 1;
    }

    pub fn count(&self, operation: Operation) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.get(&operation).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.values().sum()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Record not found: {0}")]
    Missing(u64),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("No record ids left")]
    IdsExhausted,
}

#[derive(Debug, Default)]
struct Store {
    records: Vec<Record>,
    next_id: u64,
}

/// Adapter over records held in memory.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    store: Arc<Mutex<Store>>,
    calls: Arc<CallLog>,
    attributes: Vec<Attribute>,
    required: Vec<String>,
    label_field: String,
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl MemoryAdapter {
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let records: Vec<Record> = records.into_iter().collect();
        let next_id = records
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            store: Arc::new(Mutex::new(Store { records, next_id })),
            calls: Arc::new(CallLog::default()),
            attributes: Vec::new(),
            required: Vec::new(),
            label_field: "name".to_string(),
        }
    }

    /// Declares the record schema. Drives table and form defaults and parameter whitelisting.
    pub fn attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Fields that must be present for `save_instance` to succeed.
    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    /// Field used as the display label when decorating.
    pub fn label_field(mut self, field: impl Into<String>) -> Self {
        self.label_field = field.into();
        self
    }

    /// Shared handle to this adapter's call counters.
    pub fn calls(&self) -> Arc<CallLog> {
        Arc::clone(&self.calls)
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Numeric when both values parse as integers, lexicographic otherwise. Missing values sort first.
fn compare_field(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    type Collection = Vec<Record>;
    type Instance = Record;
    type Decorated = Vec<Presented>;
    type Error = MemoryError;

    fn new(resource: &Resource<Self>) -> Self {
        debug!(resource = %resource.name(), "Empty memory store");
        Self::default()
    }

    async fn collection(
        &self,
        _resource: &Resource<Self>,
        _params: &Params,
    ) -> Result<Vec<Record>, MemoryError> {
        self.calls.record(Operation::Collection);
        Ok(self.lock().records.clone())
    }

    async fn merge_scopes(
        &self,
        _resource: &Resource<Self>,
        collection: Vec<Record>,
        scopes: &[&Scope<Self>],
        params: &Params,
    ) -> Result<Vec<Record>, MemoryError> {
        self.calls.record(Operation::MergeScopes);
        Ok(scopes
            .iter()
            .fold(collection, |records, scope| scope.apply(records, params)))
    }

    async fn sort(
        &self,
        resource: &Resource<Self>,
        mut collection: Vec<Record>,
        params: &Params,
    ) -> Result<Vec<Record>, MemoryError> {
        self.calls.record(Operation::Sort);
        let Some(field) = params.sort_field() else {
            return Ok(collection);
        };
        let order = params.sort_order();

        if let Some(sort) = resource.column_sort(field) {
            return Ok(sort.apply(collection, order));
        }

        // Stable in both directions: equal keys keep their stored order.
        collection.sort_by(|a, b| {
            let ordering = if field == "id" {
                a.id.cmp(&b.id)
            } else {
                compare_field(a.get(field), b.get(field))
            };
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        Ok(collection)
    }

    async fn paginate(
        &self,
        resource: &Resource<Self>,
        collection: Vec<Record>,
        params: &Params,
    ) -> Result<Vec<Record>, MemoryError> {
        self.calls.record(Operation::Paginate);
        let page = params.page(resource.pagination());
        Ok(collection
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect())
    }

    async fn finalize_collection(
        &self,
        _resource: &Resource<Self>,
        collection: Vec<Record>,
        _params: &Params,
    ) -> Result<Vec<Record>, MemoryError> {
        self.calls.record(Operation::FinalizeCollection);
        Ok(collection)
    }

    async fn decorate_collection(
        &self,
        _resource: &Resource<Self>,
        collection: Vec<Record>,
        _params: &Params,
    ) -> Result<Vec<Presented>, MemoryError> {
        self.calls.record(Operation::DecorateCollection);
        Ok(collection
            .into_iter()
            .map(|record| Presented {
                param: record.id.to_string(),
                label: record
                    .get(&self.label_field)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{}", record.id)),
                record,
            })
            .collect())
    }

    async fn count(
        &self,
        _resource: &Resource<Self>,
        collection: &Vec<Record>,
    ) -> Result<usize, MemoryError> {
        self.calls.record(Operation::Count);
        Ok(collection.len())
    }

    async fn find_instance(
        &self,
        _resource: &Resource<Self>,
        id: &str,
        _params: &Params,
    ) -> Result<Option<Record>, MemoryError> {
        self.calls.record(Operation::FindInstance);
        let Ok(id) = id.parse::<u64>() else {
            return Ok(None);
        };
        Ok(self.lock().records.iter().find(|r| r.id == id).cloned())
    }

    async fn build_instance(
        &self,
        _resource: &Resource<Self>,
        params: &Params,
    ) -> Result<Record, MemoryError> {
        self.calls.record(Operation::BuildInstance);
        let mut record = Record::default();
        for (field, value) in params.iter() {
            record.fields.insert(field.to_string(), value.to_string());
        }
        Ok(record)
    }

    async fn update_instance(
        &self,
        _resource: &Resource<Self>,
        mut instance: Record,
        params: &Params,
    ) -> Result<Record, MemoryError> {
        self.calls.record(Operation::UpdateInstance);
        for (field, value) in params.iter() {
            instance.fields.insert(field.to_string(), value.to_string());
        }
        Ok(instance)
    }

    async fn save_instance(
        &self,
        resource: &Resource<Self>,
        instance: &mut Record,
    ) -> Result<bool, MemoryError> {
        self.calls.record(Operation::SaveInstance);
        if let Some(missing) = self
            .required
            .iter()
            .find(|field| instance.get(field).map_or(true, str::is_empty))
        {
            debug!(resource = %resource.name(), field = %missing, "Validation failed");
            return Ok(false);
        }

        let mut store = self.lock();
        if instance.is_new() {
            let id = store.next_id;
            if store.records.iter().any(|r| r.id == id) {
                return Err(MemoryError::IdsExhausted);
            }
            instance.id = id;
            store.next_id = id.saturating_add(1);
            store.records.push(instance.clone());
        } else {
            match store.records.iter_mut().find(|r| r.id == instance.id) {
                Some(existing) => *existing = instance.clone(),
                None => return Err(MemoryError::Missing(instance.id)),
            }
        }
        debug!(resource = %resource.name(), id = instance.id, size = store.records.len(), "Saved");
        Ok(true)
    }

    async fn delete_instance(
        &self,
        _resource: &Resource<Self>,
        instance: &Record,
    ) -> Result<bool, MemoryError> {
        self.calls.record(Operation::DeleteInstance);
        let mut store = self.lock();
        let before = store.records.len();
        store.records.retain(|r| r.id != instance.id);
        Ok(store.records.len() < before)
    }

    fn permitted_params(
        &self,
        _resource: &Resource<Self>,
        params: &Params,
        _instance: Option<&Record>,
    ) -> Result<Params, MemoryError> {
        self.calls.record(Operation::PermittedParams);
        let permitted: Vec<&str> = self
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .filter(|name| *name != "id")
            .collect();
        Ok(params.permit(&permitted))
    }

    fn to_param(&self, _resource: &Resource<Self>, instance: &Record) -> Result<String, MemoryError> {
        self.calls.record(Operation::ToParam);
        Ok(instance.id.to_string())
    }

    fn human_attribute_name(
        &self,
        _resource: &Resource<Self>,
        attribute: &str,
    ) -> Result<String, MemoryError> {
        self.calls.record(Operation::HumanAttributeName);
        if !self.attributes.is_empty() && !self.attributes.iter().any(|a| a.name == attribute) {
            return Err(MemoryError::UnknownField(attribute.to_string()));
        }
        Ok(attribute.to_title_case())
    }

    fn default_table_attributes(
        &self,
        _resource: &Resource<Self>,
    ) -> Result<Vec<Attribute>, MemoryError> {
        self.calls.record(Operation::DefaultTableAttributes);
        Ok(self
            .attributes
            .iter()
            .filter(|a| a.kind != AttributeKind::Text)
            .cloned()
            .collect())
    }

    fn default_form_attributes(
        &self,
        _resource: &Resource<Self>,
    ) -> Result<Vec<Attribute>, MemoryError> {
        self.calls.record(Operation::DefaultFormAttributes);
        Ok(self
            .attributes
            .iter()
            .filter(|a| a.name != "id")
            .cloned()
            .collect())
    }
}
