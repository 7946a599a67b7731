//! # Resource Descriptor
//!
//! [`Resource`] is the aggregate describing one manageable entity: its name,
//! options, scopes, sorts, return locations, override table and adapter.
//! It is built once by the [`ResourceBuilder`](crate::ResourceBuilder),
//! validated, and from then on shared read-only (usually as
//! `Arc<Resource<A>>`) by every request.
//!
//! ## Dispatch
//!
//! Each adapter operation has a same-named method here. On every call the
//! method checks the operation's override slot: a registered override runs
//! with the resource as its context, otherwise the adapter runs with the same
//! arguments. Exactly one of the two is invoked. Failures of either are
//! wrapped into [`ResourceError::Adapter`] and returned.
//!
//! ## Lazy State
//!
//! The adapter, the model, the model name and the action list are computed
//! on first access and memoized in [`OnceLock`]s, so concurrent first use
//! still initializes each of them exactly once.

use crate::action::Action;
use crate::adapter::{Adapter, Attribute};
use crate::collection::Collection;
use crate::error::{ResourceError, Result};
use crate::i18n::{DefaultTranslator, Translator, Vars};
use crate::model::{classify, ModelName, ModelNamespace, ModelRef};
use crate::overrides::{Operation, Overrides};
use crate::params::{PaginationOptions, Params};
use crate::routes::{RouteDescriptor, RouteMapper, RouteShape};
use crate::scope::{ColumnSort, Scope};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Where a host redirects after an action completes.
pub type ReturnLocation<A> =
    Arc<dyn Fn(&Resource<A>, Option<&<A as Adapter>::Instance>) -> String + Send + Sync>;

/// Extra routes declared next to the resource's own.
pub type AdditionalRoutes = Arc<dyn Fn(&mut RouteMapper) + Send + Sync>;

/// Resource-level options. Deserializable, so hosts may keep them in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOptions {
    /// Explicit model name. Inferred from the resource name when unset.
    pub model: Option<String>,
    /// Read-only resources expose only `index` and `show`.
    pub readonly: bool,
    /// Singular resources manage exactly one instance.
    pub singular: bool,
    /// URL path segment. Defaults to the resource name.
    pub path: Option<String>,
    /// Mount point the admin paths live under.
    pub mount: String,
    pub pagination: PaginationOptions,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            model: None,
            readonly: false,
            singular: false,
            path: None,
            mount: "admin".to_string(),
            pagination: PaginationOptions::default(),
        }
    }
}

/// A configured resource.
pub struct Resource<A: Adapter> {
    pub(crate) name: String,
    pub(crate) options: ResourceOptions,
    pub(crate) namespace: Arc<ModelNamespace>,
    pub(crate) translator: Arc<dyn Translator>,
    pub(crate) scopes: IndexMap<String, Scope<A>>,
    pub(crate) column_sorts: HashMap<String, ColumnSort<A>>,
    pub(crate) return_locations: HashMap<Action, ReturnLocation<A>>,
    pub(crate) additional_routes: Option<AdditionalRoutes>,
    pub(crate) overrides: Overrides<A>,
    pub(crate) adapter: OnceLock<A>,
    model: OnceLock<ModelRef>,
    model_name: OnceLock<ModelName>,
    actions: OnceLock<Vec<Action>>,
}

// Dispatches one operation: the override if its slot is filled, the adapter otherwise.
macro_rules! dispatch {
    (async $self:ident . $op:ident ( $($arg:expr),* )) => {{
        let result = match &$self.overrides.$op {
            Some(f) => {
                debug!(resource = %$self.name, operation = stringify!($op), "override");
                f($self, $($arg),*).await
            }
            None => $self.adapter().$op($self, $($arg),*).await,
        };
        result.map_err(|e| paste::paste! { ResourceError::adapter(Operation::[<$op:camel>], e) })
    }};
    ($self:ident . $op:ident ( $($arg:expr),* )) => {{
        let result = match &$self.overrides.$op {
            Some(f) => {
                debug!(resource = %$self.name, operation = stringify!($op), "override");
                f($self, $($arg),*)
            }
            None => $self.adapter().$op($self, $($arg),*),
        };
        result.map_err(|e| paste::paste! { ResourceError::adapter(Operation::[<$op:camel>], e) })
    }};
}

impl<A: Adapter> Resource<A> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: ResourceOptions::default(),
            namespace: Arc::new(ModelNamespace::default()),
            translator: Arc::new(DefaultTranslator),
            scopes: IndexMap::new(),
            column_sorts: HashMap::new(),
            return_locations: HashMap::new(),
            additional_routes: None,
            overrides: Overrides::default(),
            adapter: OnceLock::new(),
            model: OnceLock::new(),
            model_name: OnceLock::new(),
            actions: OnceLock::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &ResourceOptions {
        &self.options
    }

    pub fn is_readonly(&self) -> bool {
        self.options.readonly
    }

    pub fn is_singular(&self) -> bool {
        self.options.singular
    }

    pub fn pagination(&self) -> &PaginationOptions {
        &self.options.pagination
    }

    /// Scopes in definition order.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope<A>> {
        self.scopes.values()
    }

    pub fn scope(&self, name: &str) -> Option<&Scope<A>> {
        self.scopes.get(name)
    }

    pub fn column_sort(&self, field: &str) -> Option<&ColumnSort<A>> {
        self.column_sorts.get(field)
    }

    pub fn overrides(&self) -> &Overrides<A> {
        &self.overrides
    }

    /// The adapter, constructed on first use unless one was assigned explicitly.
    pub fn adapter(&self) -> &A {
        self.adapter.get_or_init(|| {
            info!(resource = %self.name, adapter = short_type_name::<A>(), "Adapter initialized");
            A::new(self)
        })
    }

    /// Checks invariants that must hold before the resource is used.
    pub fn validate(&self) -> Result<()> {
        if self.is_singular() && !self.overrides.is_overridden(Operation::FindInstance) {
            warn!(resource = %self.name, "Singular resource without find_instance override");
            return Err(ResourceError::Configuration(format!(
                "Singular resource `{}` must define a find_instance override",
                self.name
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Computed facts
    // =========================================================================

    /// The model this resource manages.
    ///
    /// Uses the explicit `model` option when set, otherwise looks up the
    /// classified resource name (`blog_posts` → `BlogPost`) in the namespace.
    pub fn model(&self) -> Result<&ModelRef> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        let model = match &self.options.model {
            Some(explicit) => self
                .namespace
                .lookup(explicit)
                .cloned()
                .unwrap_or_else(|| ModelRef::named(explicit.clone())),
            None => {
                let expected = classify(&self.name);
                match self.namespace.lookup(&expected) {
                    Some(model) => model.clone(),
                    None => {
                        warn!(resource = %self.name, model = %expected, "Model inference failed");
                        return Err(ResourceError::ModelNotFound {
                            model: expected,
                            resource: self.name.clone(),
                        });
                    }
                }
            }
        };

        debug!(resource = %self.name, %model, "Model resolved");
        Ok(self.model.get_or_init(|| model))
    }

    pub fn model_name(&self) -> Result<&ModelName> {
        if let Some(name) = self.model_name.get() {
            return Ok(name);
        }
        let name = ModelName::new(self.model()?);
        Ok(self.model_name.get_or_init(|| name))
    }

    /// Actions this resource exposes.
    pub fn actions(&self) -> &[Action] {
        self.actions.get_or_init(|| {
            if self.is_readonly() {
                Action::READONLY.to_vec()
            } else {
                Action::ALL.to_vec()
            }
        })
    }

    /// The landing action: `show` for singular resources, `index` otherwise.
    pub fn root_action(&self) -> Action {
        if self.is_singular() {
            Action::Show
        } else {
            Action::Index
        }
    }

    /// Path for `action`, with `id` appended for member actions when given.
    pub fn path(&self, action: Action, id: Option<&str>) -> String {
        let segment = self.options.path.as_deref().unwrap_or(&self.name);
        let mut path = format!("/{}/{}", self.options.mount.trim_matches('/'), segment);

        if action.is_member() {
            if let Some(id) = id {
                path.push('/');
                path.push_str(id);
            }
        }
        match action {
            Action::New => path.push_str("/new"),
            Action::Edit => path.push_str("/edit"),
            _ => {}
        }
        path
    }

    /// Path to `action` (default `show`) for one instance.
    ///
    /// Singular resources have no identity parameter: their single instance
    /// lives at the resource path itself.
    pub fn instance_path(&self, instance: &A::Instance, action: Option<Action>) -> Result<String> {
        let action = action.unwrap_or(Action::Show);
        if self.is_singular() {
            return Ok(self.path(action, None));
        }
        let id = self.to_param(instance)?;
        Ok(self.path(action, Some(&id)))
    }

    /// Translation lookup with the model-name interpolation variables merged in.
    ///
    /// `model_name`, `lowercase_model_name` and `pluralized_model_name` are
    /// reserved and overwrite caller values of the same name.
    pub fn translate(&self, key: &str, vars: &Vars) -> Result<String> {
        let model_name = self.model_name()?;
        let mut vars = vars.clone();
        vars.insert("model_name".into(), model_name.titleize());
        vars.insert("lowercase_model_name".into(), model_name.downcase());
        vars.insert("pluralized_model_name".into(), model_name.plural_titleize());
        Ok(self.translator.translate(key, &vars))
    }

    /// Where to send the user after `action`, if the definition says.
    pub fn return_location(&self, action: Action, instance: Option<&A::Instance>) -> Option<String> {
        self.return_locations
            .get(&action)
            .map(|location| location(self, instance))
    }

    /// Routing configuration for the host router.
    pub fn routes(&self) -> RouteDescriptor {
        let except = Action::ALL
            .into_iter()
            .filter(|action| !self.actions().contains(action))
            .collect();

        let nested = match &self.additional_routes {
            Some(draw) => {
                let mut mapper = RouteMapper::new();
                draw(&mut mapper);
                mapper.into_routes()
            }
            None => Vec::new(),
        };

        RouteDescriptor {
            name: self.name.clone(),
            shape: if self.is_singular() {
                RouteShape::Singular
            } else {
                RouteShape::Plural
            },
            controller: format!("{}_admin/admin", self.name),
            alias: format!("{}_admin", self.name.replace('/', "_")),
            path: self.options.path.clone(),
            except,
            nested,
        }
    }

    // =========================================================================
    // Collection pipeline
    // =========================================================================

    /// Runs the full read pipeline and returns the decorated collection.
    pub async fn prepare_collection(&self, params: &Params) -> Result<A::Decorated> {
        Collection::new(self).prepare(params).await
    }

    /// The base collection only, before scopes, sorting and pagination.
    pub async fn initialize_collection(&self, params: &Params) -> Result<A::Collection> {
        self.collection(params).await
    }

    /// Size of the base collection.
    pub async fn count_collection(&self, params: &Params) -> Result<usize> {
        let collection = self.initialize_collection(params).await?;
        self.count(&collection).await
    }

    /// Per-scope counts over the base collection, in definition order.
    pub async fn scope_counts(&self, params: &Params) -> Result<Vec<(String, usize)>> {
        let mut counts = Vec::with_capacity(self.scopes.len());
        for scope in self.scopes.values() {
            let collection = self.initialize_collection(params).await?;
            let collection = self.merge_scopes(collection, &[scope], params).await?;
            counts.push((scope.name().to_string(), self.count(&collection).await?));
        }
        Ok(counts)
    }

    // =========================================================================
    // Dispatched operations
    // =========================================================================

    pub async fn collection(&self, params: &Params) -> Result<A::Collection> {
        dispatch!(async self.collection(params))
    }

    pub async fn merge_scopes(
        &self,
        collection: A::Collection,
        scopes: &[&Scope<A>],
        params: &Params,
    ) -> Result<A::Collection> {
        dispatch!(async self.merge_scopes(collection, scopes, params))
    }

    pub async fn sort(&self, collection: A::Collection, params: &Params) -> Result<A::Collection> {
        dispatch!(async self.sort(collection, params))
    }

    pub async fn paginate(
        &self,
        collection: A::Collection,
        params: &Params,
    ) -> Result<A::Collection> {
        dispatch!(async self.paginate(collection, params))
    }

    pub async fn finalize_collection(
        &self,
        collection: A::Collection,
        params: &Params,
    ) -> Result<A::Collection> {
        dispatch!(async self.finalize_collection(collection, params))
    }

    pub async fn decorate_collection(
        &self,
        collection: A::Collection,
        params: &Params,
    ) -> Result<A::Decorated> {
        dispatch!(async self.decorate_collection(collection, params))
    }

    pub async fn count(&self, collection: &A::Collection) -> Result<usize> {
        dispatch!(async self.count(collection))
    }

    /// Looks up one instance, failing with [`ResourceError::InstanceNotFound`] when there is none.
    pub async fn find_instance(&self, id: &str, params: &Params) -> Result<A::Instance> {
        let found = dispatch!(async self.find_instance(id, params))?;
        found.ok_or_else(|| {
            debug!(resource = %self.name, id, "Instance not found");
            ResourceError::InstanceNotFound {
                resource: self.name.clone(),
                id: id.to_string(),
            }
        })
    }

    pub async fn build_instance(&self, params: &Params) -> Result<A::Instance> {
        dispatch!(async self.build_instance(params))
    }

    pub async fn update_instance(
        &self,
        instance: A::Instance,
        params: &Params,
    ) -> Result<A::Instance> {
        dispatch!(async self.update_instance(instance, params))
    }

    pub async fn save_instance(&self, instance: &mut A::Instance) -> Result<bool> {
        dispatch!(async self.save_instance(instance))
    }

    pub async fn delete_instance(&self, instance: &A::Instance) -> Result<bool> {
        dispatch!(async self.delete_instance(instance))
    }

    pub fn permitted_params(
        &self,
        params: &Params,
        instance: Option<&A::Instance>,
    ) -> Result<Params> {
        dispatch!(self.permitted_params(params, instance))
    }

    pub fn to_param(&self, instance: &A::Instance) -> Result<String> {
        dispatch!(self.to_param(instance))
    }

    pub fn human_attribute_name(&self, attribute: &str) -> Result<String> {
        dispatch!(self.human_attribute_name(attribute))
    }

    pub fn default_table_attributes(&self) -> Result<Vec<Attribute>> {
        dispatch!(self.default_table_attributes())
    }

    pub fn default_form_attributes(&self) -> Result<Vec<Attribute>> {
        dispatch!(self.default_form_attributes())
    }
}

impl<A: Adapter> fmt::Debug for Resource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

/// Last path segment of a type name (`MemoryAdapter` rather than `resource_recipe::memory::MemoryAdapter`).
pub(crate) fn short_type_name<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::NullAdapter;
    use std::sync::Barrier;

    #[test]
    fn test_adapter_built_once_under_concurrent_first_use() {
        let resource = Resource::<NullAdapter>::build("concurrent_reports", |_| {}).unwrap();
        assert_eq!(NullAdapter::constructions("concurrent_reports"), 0);

        let barrier = Barrier::new(16);
        std::thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| {
                    barrier.wait();
                    resource.adapter();
                });
            }
        });
        resource.adapter();

        assert_eq!(NullAdapter::constructions("concurrent_reports"), 1);
    }

    #[test]
    fn test_explicit_adapter_skips_construction() {
        let resource = Resource::<NullAdapter>::build("explicit_reports", |b| {
            b.adapter(NullAdapter);
        })
        .unwrap();

        resource.adapter();
        assert_eq!(NullAdapter::constructions("explicit_reports"), 0);
    }
}
