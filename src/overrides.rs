//! # Operation Overrides
//!
//! Every adapter operation has a named slot in [`Overrides`]. A resource
//! definition may fill any slot with its own function; the resource's
//! dispatch methods then call that function *instead of* the adapter, and
//! fall back to the adapter for every empty slot.
//!
//! ## Rules
//!
//! - At most one override per operation. Assigning a slot again replaces the
//!   previous function (last write wins, nothing is composed).
//! - Slots are read on every call, never pre-bound.
//! - Slots are only writable through the
//!   [`ResourceBuilder`](crate::ResourceBuilder). A finished resource is
//!   immutable.
//!
//! ## Signatures
//!
//! Overrides receive the [`Resource`] as their first argument, so they can
//! reach sibling configuration or call other dispatch methods. Asynchronous
//! operations return a [`BoxFuture`]:
//!
//! ```rust,ignore
//! builder.collection(|resource, params| Box::pin(async move {
//!     Ok(load_widgets(resource.name(), params).await)
//! }));
//! ```

use crate::adapter::{Adapter, Attribute};
use crate::params::Params;
use crate::resource::Resource;
use crate::scope::Scope;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed, sendable future returned by asynchronous overrides.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type OpResult<A, T> = Result<T, <A as Adapter>::Error>;
type Coll<A> = <A as Adapter>::Collection;
type Inst<A> = <A as Adapter>::Instance;

pub type CollectionFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, &'a Params) -> BoxFuture<'a, OpResult<A, Coll<A>>>
        + Send
        + Sync,
>;

pub type MergeScopesFn<A> = Arc<
    dyn for<'a> Fn(
            &'a Resource<A>,
            Coll<A>,
            &'a [&'a Scope<A>],
            &'a Params,
        ) -> BoxFuture<'a, OpResult<A, Coll<A>>>
        + Send
        + Sync,
>;

/// Shape shared by `sort`, `paginate` and `finalize_collection`.
pub type StageFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, Coll<A>, &'a Params) -> BoxFuture<'a, OpResult<A, Coll<A>>>
        + Send
        + Sync,
>;

pub type DecorateFn<A> = Arc<
    dyn for<'a> Fn(
            &'a Resource<A>,
            Coll<A>,
            &'a Params,
        ) -> BoxFuture<'a, OpResult<A, <A as Adapter>::Decorated>>
        + Send
        + Sync,
>;

pub type CountFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, &'a Coll<A>) -> BoxFuture<'a, OpResult<A, usize>> + Send + Sync,
>;

pub type FindInstanceFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, &'a str, &'a Params) -> BoxFuture<'a, OpResult<A, Option<Inst<A>>>>
        + Send
        + Sync,
>;

pub type BuildInstanceFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, &'a Params) -> BoxFuture<'a, OpResult<A, Inst<A>>> + Send + Sync,
>;

pub type UpdateInstanceFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, Inst<A>, &'a Params) -> BoxFuture<'a, OpResult<A, Inst<A>>>
        + Send
        + Sync,
>;

pub type SaveInstanceFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, &'a mut Inst<A>) -> BoxFuture<'a, OpResult<A, bool>>
        + Send
        + Sync,
>;

pub type DeleteInstanceFn<A> = Arc<
    dyn for<'a> Fn(&'a Resource<A>, &'a Inst<A>) -> BoxFuture<'a, OpResult<A, bool>> + Send + Sync,
>;

pub type PermittedParamsFn<A> = Arc<
    dyn Fn(&Resource<A>, &Params, Option<&Inst<A>>) -> OpResult<A, Params> + Send + Sync,
>;

pub type ToParamFn<A> = Arc<dyn Fn(&Resource<A>, &Inst<A>) -> OpResult<A, String> + Send + Sync>;

pub type HumanAttributeNameFn<A> =
    Arc<dyn Fn(&Resource<A>, &str) -> OpResult<A, String> + Send + Sync>;

pub type AttributesFn<A> =
    Arc<dyn Fn(&Resource<A>) -> OpResult<A, Vec<Attribute>> + Send + Sync>;

/// Names of the overridable adapter operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Collection,
    MergeScopes,
    Sort,
    Paginate,
    FinalizeCollection,
    DecorateCollection,
    Count,
    FindInstance,
    BuildInstance,
    UpdateInstance,
    SaveInstance,
    DeleteInstance,
    PermittedParams,
    ToParam,
    HumanAttributeName,
    DefaultTableAttributes,
    DefaultFormAttributes,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::Collection,
        Operation::MergeScopes,
        Operation::Sort,
        Operation::Paginate,
        Operation::FinalizeCollection,
        Operation::DecorateCollection,
        Operation::Count,
        Operation::FindInstance,
        Operation::BuildInstance,
        Operation::UpdateInstance,
        Operation::SaveInstance,
        Operation::DeleteInstance,
        Operation::PermittedParams,
        Operation::ToParam,
        Operation::HumanAttributeName,
        Operation::DefaultTableAttributes,
        Operation::DefaultFormAttributes,
    ];

    /// The operation's method name, as used on `Adapter`, `Resource` and `ResourceBuilder`.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Collection => "collection",
            Operation::MergeScopes => "merge_scopes",
            Operation::Sort => "sort",
            Operation::Paginate => "paginate",
            Operation::FinalizeCollection => "finalize_collection",
            Operation::DecorateCollection => "decorate_collection",
            Operation::Count => "count",
            Operation::FindInstance => "find_instance",
            Operation::BuildInstance => "build_instance",
            Operation::UpdateInstance => "update_instance",
            Operation::SaveInstance => "save_instance",
            Operation::DeleteInstance => "delete_instance",
            Operation::PermittedParams => "permitted_params",
            Operation::ToParam => "to_param",
            Operation::HumanAttributeName => "human_attribute_name",
            Operation::DefaultTableAttributes => "default_table_attributes",
            Operation::DefaultFormAttributes => "default_form_attributes",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Generates the slot table. Slot names are the snake_case operation names, so
// `[<$slot:camel>]` is the matching `Operation` variant.
macro_rules! override_table {
    ($($slot:ident: $ty:ident),* $(,)?) => {
        paste::paste! {
            /// Per-resource override slots, one per [`Operation`].
            pub struct Overrides<A: Adapter> {
                $(pub(crate) $slot: Option<$ty<A>>,)*
            }

            impl<A: Adapter> Default for Overrides<A> {
                fn default() -> Self {
                    Self { $($slot: None,)* }
                }
            }

            impl<A: Adapter> Overrides<A> {
                /// Whether `operation` resolves to an override rather than the adapter.
                pub fn is_overridden(&self, operation: Operation) -> bool {
                    match operation {
                        $(Operation::[<$slot:camel>] => self.$slot.is_some(),)*
                    }
                }
            }
        }
    };
}

override_table! {
    collection: CollectionFn,
    merge_scopes: MergeScopesFn,
    sort: StageFn,
    paginate: StageFn,
    finalize_collection: StageFn,
    decorate_collection: DecorateFn,
    count: CountFn,
    find_instance: FindInstanceFn,
    build_instance: BuildInstanceFn,
    update_instance: UpdateInstanceFn,
    save_instance: SaveInstanceFn,
    delete_instance: DeleteInstanceFn,
    permitted_params: PermittedParamsFn,
    to_param: ToParamFn,
    human_attribute_name: HumanAttributeNameFn,
    default_table_attributes: AttributesFn,
    default_form_attributes: AttributesFn,
}

impl<A: Adapter> Overrides<A> {
    /// Operations currently resolved to an override, in `Operation::ALL` order.
    pub fn overridden(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.is_overridden(*op))
            .collect()
    }
}

impl<A: Adapter> fmt::Debug for Overrides<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.overridden()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_are_unique() {
        let mut names: Vec<_> = Operation::ALL.iter().map(|op| op.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Operation::ALL.len());
        assert_eq!(Operation::FinalizeCollection.to_string(), "finalize_collection");
    }
}
