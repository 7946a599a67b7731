//! # Scopes & Column Sorts
//!
//! A [`Scope`] is a named filter over an adapter's raw collection. Requests
//! select scopes by name through the `scope` parameter; the collection
//! pipeline resolves the names and hands the definitions to the adapter's
//! `merge_scopes`.
//!
//! A [`ColumnSort`] replaces the adapter's default ordering for one field.

use crate::adapter::Adapter;
use crate::params::{Params, SortOrder};
use std::fmt;
use std::sync::Arc;

type ScopeFn<A> =
    dyn Fn(<A as Adapter>::Collection, &Params) -> <A as Adapter>::Collection + Send + Sync;

type SortFn<A> =
    dyn Fn(<A as Adapter>::Collection, SortOrder) -> <A as Adapter>::Collection + Send + Sync;

/// A named filter applied to a raw collection.
pub struct Scope<A: Adapter> {
    name: String,
    label: Option<String>,
    default: bool,
    apply: Arc<ScopeFn<A>>,
}

impl<A: Adapter> Scope<A> {
    pub fn new<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(A::Collection, &Params) -> A::Collection + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            label: None,
            default: false,
            apply: Arc::new(apply),
        }
    }

    /// Display label. Defaults to the titleized name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Default scopes apply when a request selects no known scope.
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => heck::ToTitleCase::to_title_case(self.name.as_str()),
        }
    }

    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn apply(&self, collection: A::Collection, params: &Params) -> A::Collection {
        (self.apply)(collection, params)
    }
}

impl<A: Adapter> Clone for Scope<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            label: self.label.clone(),
            default: self.default,
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<A: Adapter> fmt::Debug for Scope<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

/// A custom sort for one field.
pub struct ColumnSort<A: Adapter>(Arc<SortFn<A>>);

impl<A: Adapter> ColumnSort<A> {
    pub fn new<F>(sort: F) -> Self
    where
        F: Fn(A::Collection, SortOrder) -> A::Collection + Send + Sync + 'static,
    {
        Self(Arc::new(sort))
    }

    pub fn apply(&self, collection: A::Collection, order: SortOrder) -> A::Collection {
        (self.0)(collection, order)
    }
}

impl<A: Adapter> Clone for ColumnSort<A> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<A: Adapter> fmt::Debug for ColumnSort<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ColumnSort(..)")
    }
}
