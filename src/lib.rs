//! # Resource Recipe
//!
//! > **Declarative admin resources over pluggable persistence adapters.**
//!
//! A *resource* is a named entity exposing a bounded set of CRUD-style
//! actions (index, show, new, create, edit, update, destroy). This crate
//! describes resources without tying them to a data store:
//!
//! - an [`Adapter`] supplies every data-access operation,
//! - a resource may **override** any single operation and keep the adapter
//!   for the rest,
//! - a fixed **collection pipeline** composes those operations into one read
//!   path: collection → scopes → sort → paginate → finalize → decorate.
//!
//! ## 🏗️ Architecture
//!
//! 1. **Contract** ([`adapter`]): the [`Adapter`] trait, with associated
//!    types for the raw collection, the instance, the decorated output and
//!    the error.
//! 2. **Overrides** ([`overrides`]): one typed slot per [`Operation`].
//! 3. **Descriptor** ([`resource`]): [`Resource`] holds configuration,
//!    computes actions, paths and labels, and dispatches every operation to
//!    its override or its adapter.
//! 4. **Pipeline** ([`collection`]): [`Collection`] runs the read path in its
//!    fixed order.
//! 5. **Builder** ([`builder`]): [`ResourceBuilder`] configures a resource in
//!    one pass and validates it.
//! 6. **Routes** ([`routes`]): [`RouteDescriptor`] tells the host router what
//!    to mount.
//! 7. **Registry** ([`registry`]): [`ResourceRegistry`] owns the finished
//!    resources, keyed by name.
//!
//! ## 🚀 Example
//!
//! ```rust
//! use resource_recipe::memory::{MemoryAdapter, Record};
//! use resource_recipe::{Params, Resource, ResourceError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ResourceError> {
//!     let adapter = MemoryAdapter::with_records(vec![
//!         Record::new(1).with("name", "Sprocket").with("stock", "0"),
//!         Record::new(2).with("name", "Bolt").with("stock", "40"),
//!     ]);
//!
//!     let widgets = Resource::<MemoryAdapter>::build("widgets", |b| {
//!         b.adapter(adapter).scope("in_stock", |records, _| {
//!             records
//!                 .into_iter()
//!                 .filter(|r| r.get("stock") != Some("0"))
//!                 .collect()
//!         });
//!     })?;
//!
//!     let params = Params::new().with("scope", "in_stock");
//!     let page = widgets.prepare_collection(&params).await?;
//!     assert_eq!(page.len(), 1);
//!     assert_eq!(page[0].label, "Bolt");
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! A finished [`Resource`] is immutable and `Send + Sync`; share it as an
//! `Arc`. Lazily computed state (adapter, model, model name, actions) sits in
//! `OnceLock`s and is initialized at most once. Each pipeline run owns its
//! parameters and collection, so concurrent requests never interfere.
//!
//! ## Errors
//!
//! Every fallible call returns [`ResourceError`]. Nothing is retried or
//! swallowed.

pub mod action;
pub mod adapter;
pub mod builder;
pub mod collection;
pub mod error;
#[cfg(test)]
mod fakes;
pub mod i18n;
pub mod memory;
pub mod model;
pub mod overrides;
pub mod params;
pub mod registry;
pub mod resource;
pub mod routes;
pub mod scope;
pub mod tracing;

// Re-export core types for convenience
pub use action::Action;
pub use adapter::{Adapter, Attribute, AttributeKind};
pub use builder::ResourceBuilder;
pub use collection::Collection;
pub use error::{ResourceError, Result};
pub use i18n::{DefaultTranslator, Translator, Vars};
pub use model::{ModelName, ModelNamespace, ModelRef};
pub use overrides::{BoxFuture, Operation, Overrides};
pub use params::{Page, PaginationOptions, Params, SortOrder};
pub use registry::{AdminResource, ResourceRegistry};
pub use resource::{Resource, ResourceOptions};
pub use routes::{Method, NestedRoute, RouteDescriptor, RouteMapper, RouteOn, RouteShape};
pub use scope::{ColumnSort, Scope};
