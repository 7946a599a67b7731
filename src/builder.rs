//! # Resource Builder
//!
//! Resources are configured in one synchronous pass through a
//! [`ResourceBuilder`], then frozen by [`finish`](ResourceBuilder::finish),
//! which validates the definition. There is no way to mutate a finished
//! [`Resource`].
//!
//! ```rust,ignore
//! let widgets = Resource::<SqlAdapter>::build("widgets", |b| {
//!     b.readonly(true)
//!         .scope("active", |c, _| c.filter("active = true"))
//!         .column_sort("price", |c, order| c.order_by("price_cents", order))
//!         .to_param(|_, widget| Ok(widget.slug.clone()));
//! })?;
//! ```
//!
//! Override setters are named after the operation they replace. Calling one
//! twice keeps only the second function.

use crate::action::Action;
use crate::adapter::{Adapter, Attribute};
use crate::error::Result;
use crate::i18n::Translator;
use crate::model::ModelNamespace;
use crate::overrides::BoxFuture;
use crate::params::{PaginationOptions, Params, SortOrder};
use crate::resource::{Resource, ResourceOptions};
use crate::routes::RouteMapper;
use crate::scope::{ColumnSort, Scope};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Configures a [`Resource`].
pub struct ResourceBuilder<A: Adapter> {
    resource: Resource<A>,
}

impl<A: Adapter> Resource<A> {
    /// Builds a resource by passing a fresh builder to `configure`, then validating it.
    pub fn build<F>(name: impl Into<String>, configure: F) -> Result<Resource<A>>
    where
        F: FnOnce(&mut ResourceBuilder<A>),
    {
        let mut builder = ResourceBuilder::new(name);
        configure(&mut builder);
        builder.finish()
    }
}

impl<A: Adapter> ResourceBuilder<A> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            resource: Resource::new(name),
        }
    }

    /// Validates and freezes the resource.
    pub fn finish(self) -> Result<Resource<A>> {
        self.resource.validate()?;
        info!(
            resource = %self.resource.name,
            singular = self.resource.options.singular,
            readonly = self.resource.options.readonly,
            scopes = self.resource.scopes.len(),
            overrides = ?self.resource.overrides,
            "Resource built"
        );
        Ok(self.resource)
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Replaces all options at once, e.g. with values read from configuration.
    pub fn options(&mut self, options: ResourceOptions) -> &mut Self {
        self.resource.options = options;
        self
    }

    /// Names the model explicitly instead of inferring it from the resource name.
    pub fn model(&mut self, model: impl Into<String>) -> &mut Self {
        self.resource.options.model = Some(model.into());
        self
    }

    pub fn readonly(&mut self, readonly: bool) -> &mut Self {
        self.resource.options.readonly = readonly;
        self
    }

    pub fn singular(&mut self, singular: bool) -> &mut Self {
        self.resource.options.singular = singular;
        self
    }

    pub fn path(&mut self, path: impl Into<String>) -> &mut Self {
        self.resource.options.path = Some(path.into());
        self
    }

    pub fn mount(&mut self, mount: impl Into<String>) -> &mut Self {
        self.resource.options.mount = mount.into();
        self
    }

    pub fn pagination(&mut self, pagination: PaginationOptions) -> &mut Self {
        self.resource.options.pagination = pagination;
        self
    }

    /// Models visible to model inference.
    pub fn namespace(&mut self, namespace: Arc<ModelNamespace>) -> &mut Self {
        self.resource.namespace = namespace;
        self
    }

    pub fn translator(&mut self, translator: impl Translator + 'static) -> &mut Self {
        self.resource.translator = Arc::new(translator);
        self
    }

    /// Uses this adapter instead of constructing one lazily with `Adapter::new`.
    pub fn adapter(&mut self, adapter: A) -> &mut Self {
        self.resource.adapter = OnceLock::from(adapter);
        self
    }

    // =========================================================================
    // Scopes, sorts, routes
    // =========================================================================

    pub fn scope<F>(&mut self, name: impl Into<String>, apply: F) -> &mut Self
    where
        F: Fn(A::Collection, &Params) -> A::Collection + Send + Sync + 'static,
    {
        self.scope_with(Scope::new(name, apply))
    }

    /// Registers a fully configured scope (label, default flag).
    pub fn scope_with(&mut self, scope: Scope<A>) -> &mut Self {
        self.resource.scopes.insert(scope.name().to_string(), scope);
        self
    }

    pub fn column_sort<F>(&mut self, field: impl Into<String>, sort: F) -> &mut Self
    where
        F: Fn(A::Collection, SortOrder) -> A::Collection + Send + Sync + 'static,
    {
        self.resource
            .column_sorts
            .insert(field.into(), ColumnSort::new(sort));
        self
    }

    /// Sets where the host should go after `action` completes.
    pub fn return_to<F>(&mut self, action: Action, location: F) -> &mut Self
    where
        F: Fn(&Resource<A>, Option<&A::Instance>) -> String + Send + Sync + 'static,
    {
        self.resource
            .return_locations
            .insert(action, Arc::new(location));
        self
    }

    pub fn additional_routes<F>(&mut self, draw: F) -> &mut Self
    where
        F: Fn(&mut RouteMapper) + Send + Sync + 'static,
    {
        self.resource.additional_routes = Some(Arc::new(draw));
        self
    }

    // =========================================================================
    // Overrides: collection-focused
    // =========================================================================

    pub fn collection<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Resource<A>, &'a Params) -> BoxFuture<'a, Result<A::Collection, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.collection = Some(Arc::new(f));
        self
    }

    pub fn merge_scopes<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                A::Collection,
                &'a [&'a Scope<A>],
                &'a Params,
            ) -> BoxFuture<'a, Result<A::Collection, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.merge_scopes = Some(Arc::new(f));
        self
    }

    pub fn sort<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                A::Collection,
                &'a Params,
            ) -> BoxFuture<'a, Result<A::Collection, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.sort = Some(Arc::new(f));
        self
    }

    pub fn paginate<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                A::Collection,
                &'a Params,
            ) -> BoxFuture<'a, Result<A::Collection, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.paginate = Some(Arc::new(f));
        self
    }

    pub fn finalize_collection<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                A::Collection,
                &'a Params,
            ) -> BoxFuture<'a, Result<A::Collection, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.finalize_collection = Some(Arc::new(f));
        self
    }

    pub fn decorate_collection<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                A::Collection,
                &'a Params,
            ) -> BoxFuture<'a, Result<A::Decorated, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.decorate_collection = Some(Arc::new(f));
        self
    }

    pub fn count<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Resource<A>, &'a A::Collection) -> BoxFuture<'a, Result<usize, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.count = Some(Arc::new(f));
        self
    }

    // =========================================================================
    // Overrides: instance-focused
    // =========================================================================

    /// Required for singular resources: there is no adapter default for "the one instance".
    pub fn find_instance<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                &'a str,
                &'a Params,
            ) -> BoxFuture<'a, Result<Option<A::Instance>, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.find_instance = Some(Arc::new(f));
        self
    }

    pub fn build_instance<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Resource<A>, &'a Params) -> BoxFuture<'a, Result<A::Instance, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.build_instance = Some(Arc::new(f));
        self
    }

    pub fn update_instance<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(
                &'a Resource<A>,
                A::Instance,
                &'a Params,
            ) -> BoxFuture<'a, Result<A::Instance, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.update_instance = Some(Arc::new(f));
        self
    }

    pub fn save_instance<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Resource<A>, &'a mut A::Instance) -> BoxFuture<'a, Result<bool, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.save_instance = Some(Arc::new(f));
        self
    }

    pub fn delete_instance<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Resource<A>, &'a A::Instance) -> BoxFuture<'a, Result<bool, A::Error>>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.delete_instance = Some(Arc::new(f));
        self
    }

    pub fn permitted_params<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Resource<A>, &Params, Option<&A::Instance>) -> Result<Params, A::Error>
            + Send
            + Sync
            + 'static,
    {
        self.resource.overrides.permitted_params = Some(Arc::new(f));
        self
    }

    // =========================================================================
    // Overrides: naming and presentation
    // =========================================================================

    pub fn to_param<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Resource<A>, &A::Instance) -> Result<String, A::Error> + Send + Sync + 'static,
    {
        self.resource.overrides.to_param = Some(Arc::new(f));
        self
    }

    pub fn human_attribute_name<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Resource<A>, &str) -> Result<String, A::Error> + Send + Sync + 'static,
    {
        self.resource.overrides.human_attribute_name = Some(Arc::new(f));
        self
    }

    pub fn default_table_attributes<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Resource<A>) -> Result<Vec<Attribute>, A::Error> + Send + Sync + 'static,
    {
        self.resource.overrides.default_table_attributes = Some(Arc::new(f));
        self
    }

    pub fn default_form_attributes<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Resource<A>) -> Result<Vec<Attribute>, A::Error> + Send + Sync + 'static,
    {
        self.resource.overrides.default_form_attributes = Some(Arc::new(f));
        self
    }
}
