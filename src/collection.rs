//! # Collection Pipeline
//!
//! [`Collection`] turns request parameters into a presentation-ready
//! collection by running the resource's dispatched operations in a fixed
//! order:
//!
//! 1. `collection`: the base collection
//! 2. `merge_scopes`: the scopes named by the request (or the default scopes)
//! 3. `sort`
//! 4. `paginate`
//! 5. `finalize_collection`
//! 6. `decorate_collection`: terminal, its value is the result
//!
//! Filtering and ordering come before pagination so a page is cut from the
//! final row set. Decoration is last because decorated values can no longer
//! be filtered or sorted.
//!
//! A `Collection` lives for one request. It borrows the resource and shares
//! no mutable state, so concurrent requests never interfere.

use crate::adapter::Adapter;
use crate::error::Result;
use crate::params::Params;
use crate::resource::Resource;
use crate::scope::Scope;
use tracing::{debug, info_span, Instrument};

/// One read transaction over a resource.
pub struct Collection<'r, A: Adapter> {
    resource: &'r Resource<A>,
}

impl<'r, A: Adapter> Collection<'r, A> {
    pub fn new(resource: &'r Resource<A>) -> Self {
        Self { resource }
    }

    /// Runs the pipeline for `params`.
    pub async fn prepare(&self, params: &Params) -> Result<A::Decorated> {
        let span = info_span!("prepare_collection", resource = %self.resource.name());
        async move {
            let resource = self.resource;

            let collection = resource.initialize_collection(params).await?;

            let scopes = self.active_scopes(params);
            let collection = if scopes.is_empty() {
                collection
            } else {
                debug!(
                    scopes = ?scopes.iter().map(|s| s.name()).collect::<Vec<_>>(),
                    "Merging scopes"
                );
                resource.merge_scopes(collection, &scopes, params).await?
            };

            let collection = resource.sort(collection, params).await?;
            let collection = resource.paginate(collection, params).await?;
            let collection = resource.finalize_collection(collection, params).await?;
            let decorated = resource.decorate_collection(collection, params).await?;

            debug!("Collection prepared");
            Ok(decorated)
        }
        .instrument(span)
        .await
    }

    /// The scopes a request selects.
    ///
    /// Known names from the `scope` parameter, in request order. Unknown names
    /// are skipped. When no known scope is named, the resource's default
    /// scopes apply.
    pub fn active_scopes(&self, params: &Params) -> Vec<&'r Scope<A>> {
        let mut selected = Vec::new();
        for name in params.scope_names() {
            match self.resource.scope(name) {
                Some(scope) if !selected.iter().any(|s: &&Scope<A>| s.name() == name) => {
                    selected.push(scope)
                }
                Some(_) => {}
                None => debug!(resource = %self.resource.name(), scope = name, "Ignoring unknown scope"),
            }
        }

        if selected.is_empty() {
            selected.extend(self.resource.scopes().filter(|s| s.is_default()));
        }
        selected
    }
}
