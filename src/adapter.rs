//! # Adapter Contract
//!
//! The `Adapter` trait is the contract every persistence strategy must satisfy
//! to back a [`Resource`]. The core never queries a data store itself: it
//! decides *which* adapter operation runs and in *what order*, and the adapter
//! decides *how*.
//!
//! ## Associated Types
//!
//! Like any strongly typed plug-in, an adapter names the shapes it works with:
//!
//! - `Collection`: the raw, not yet materialized handle (a query builder, a
//!   `Vec`, a cursor) that flows through scoping, sorting and pagination.
//! - `Instance`: one record.
//! - `Decorated`: the presentation-ready result of the last pipeline stage.
//! - `Error`: the adapter's own failure type. The core wraps it into
//!   [`ResourceError::Adapter`](crate::ResourceError::Adapter), tagged with
//!   the operation that failed.
//!
//! ## Context
//!
//! Every operation receives the [`Resource`] it serves. Adapters read sibling
//! configuration from it (column sorts, pagination options, the model name).
//! Operations are always called through the resource's dispatch methods, so a
//! resource-level override may replace any one of them.
//!
//! ## No Defaults
//!
//! None of the operations has a provided body. An adapter that forgets one does
//! not compile, which is the loudest possible failure.

use crate::params::Params;
use crate::resource::Resource;
use crate::scope::Scope;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Persistence strategy behind a resource.
#[async_trait]
pub trait Adapter: Sized + Send + Sync + 'static {
    /// Raw collection handle threaded through the read pipeline.
    type Collection: Send + 'static;

    /// A single record.
    type Instance: Send + Sync + 'static;

    /// Output of `decorate_collection`, the externally visible collection.
    type Decorated: Send + 'static;

    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the adapter for `resource`. Called at most once per resource, on first use.
    ///
    /// Must not call back into the resource's dispatch methods.
    fn new(resource: &Resource<Self>) -> Self;

    // --- Collection-focused ---

    /// The unfiltered base collection.
    async fn collection(
        &self,
        resource: &Resource<Self>,
        params: &Params,
    ) -> Result<Self::Collection, Self::Error>;

    /// Applies the given scopes to the collection.
    async fn merge_scopes(
        &self,
        resource: &Resource<Self>,
        collection: Self::Collection,
        scopes: &[&Scope<Self>],
        params: &Params,
    ) -> Result<Self::Collection, Self::Error>;

    async fn sort(
        &self,
        resource: &Resource<Self>,
        collection: Self::Collection,
        params: &Params,
    ) -> Result<Self::Collection, Self::Error>;

    async fn paginate(
        &self,
        resource: &Resource<Self>,
        collection: Self::Collection,
        params: &Params,
    ) -> Result<Self::Collection, Self::Error>;

    /// Last adjustment once filtering, ordering and paging are fixed (eager loading and the like).
    async fn finalize_collection(
        &self,
        resource: &Resource<Self>,
        collection: Self::Collection,
        params: &Params,
    ) -> Result<Self::Collection, Self::Error>;

    async fn decorate_collection(
        &self,
        resource: &Resource<Self>,
        collection: Self::Collection,
        params: &Params,
    ) -> Result<Self::Decorated, Self::Error>;

    async fn count(
        &self,
        resource: &Resource<Self>,
        collection: &Self::Collection,
    ) -> Result<usize, Self::Error>;

    // --- Instance-focused ---

    /// Looks up one instance. `Ok(None)` means "no such instance".
    async fn find_instance(
        &self,
        resource: &Resource<Self>,
        id: &str,
        params: &Params,
    ) -> Result<Option<Self::Instance>, Self::Error>;

    async fn build_instance(
        &self,
        resource: &Resource<Self>,
        params: &Params,
    ) -> Result<Self::Instance, Self::Error>;

    async fn update_instance(
        &self,
        resource: &Resource<Self>,
        instance: Self::Instance,
        params: &Params,
    ) -> Result<Self::Instance, Self::Error>;

    /// Persists the instance. `Ok(false)` reports a validation failure.
    async fn save_instance(
        &self,
        resource: &Resource<Self>,
        instance: &mut Self::Instance,
    ) -> Result<bool, Self::Error>;

    async fn delete_instance(
        &self,
        resource: &Resource<Self>,
        instance: &Self::Instance,
    ) -> Result<bool, Self::Error>;

    /// Whitelists the parameters the given instance may be built or updated from.
    fn permitted_params(
        &self,
        resource: &Resource<Self>,
        params: &Params,
        instance: Option<&Self::Instance>,
    ) -> Result<Params, Self::Error>;

    // --- Naming ---

    /// Identity parameter used in instance paths.
    fn to_param(
        &self,
        resource: &Resource<Self>,
        instance: &Self::Instance,
    ) -> Result<String, Self::Error>;

    fn human_attribute_name(
        &self,
        resource: &Resource<Self>,
        attribute: &str,
    ) -> Result<String, Self::Error>;

    // --- Presentation defaults ---

    fn default_table_attributes(
        &self,
        resource: &Resource<Self>,
    ) -> Result<Vec<Attribute>, Self::Error>;

    fn default_form_attributes(
        &self,
        resource: &Resource<Self>,
    ) -> Result<Vec<Attribute>, Self::Error>;
}

/// An attribute shown by automatic tables and forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Text,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Association,
}
