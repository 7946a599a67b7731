//! # Resource Registry
//!
//! The registry owns every finished resource, keyed by name. It is filled
//! once while the host starts up and is then passed by reference to whatever
//! needs a resource (controllers, the router). There is no global lookup.
//!
//! Resources with different adapters live side by side: the registry stores
//! them behind the object-safe [`AdminResource`] trait and hands out typed
//! `Arc<Resource<A>>`s on request.

use crate::action::Action;
use crate::adapter::Adapter;
use crate::error::{ResourceError, Result};
use crate::resource::Resource;
use crate::routes::RouteDescriptor;
use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

/// Adapter-independent view of a resource.
pub trait AdminResource: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn actions(&self) -> &[Action];
    fn root_action(&self) -> Action;
    fn is_singular(&self) -> bool;
    fn routes(&self) -> RouteDescriptor;
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<A: Adapter> AdminResource for Resource<A> {
    fn name(&self) -> &str {
        Resource::name(self)
    }

    fn actions(&self) -> &[Action] {
        Resource::actions(self)
    }

    fn root_action(&self) -> Action {
        Resource::root_action(self)
    }

    fn is_singular(&self) -> bool {
        Resource::is_singular(self)
    }

    fn routes(&self) -> RouteDescriptor {
        Resource::routes(self)
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Name-keyed set of resources, in registration order.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: IndexMap<String, Arc<dyn AdminResource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished resource. Names are unique.
    pub fn register<A: Adapter>(&mut self, resource: Resource<A>) -> Result<Arc<Resource<A>>> {
        let name = resource.name().to_string();
        if self.resources.contains_key(&name) {
            warn!(resource = %name, "Duplicate resource");
            return Err(ResourceError::DuplicateResource(name));
        }

        let resource = Arc::new(resource);
        self.resources.insert(name.clone(), resource.clone());
        info!(resource = %name, size = self.resources.len(), "Registered");
        Ok(resource)
    }

    /// The resource named `name`, typed by its adapter.
    pub fn get<A: Adapter>(&self, name: &str) -> Result<Arc<Resource<A>>> {
        let resource = self
            .find(name)
            .ok_or_else(|| ResourceError::UnknownResource(name.to_string()))?;
        Arc::clone(resource)
            .as_any()
            .downcast::<Resource<A>>()
            .map_err(|_| ResourceError::ResourceType(name.to_string()))
    }

    pub fn find(&self, name: &str) -> Option<&Arc<dyn AdminResource>> {
        self.resources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AdminResource>> {
        self.resources.values()
    }

    /// Route descriptors for every resource, in registration order.
    pub fn routes(&self) -> Vec<RouteDescriptor> {
        self.resources.values().map(|r| r.routes()).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
