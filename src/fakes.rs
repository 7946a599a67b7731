//! Test-only adapters.

use crate::adapter::{Adapter, Attribute};
use crate::params::Params;
use crate::resource::Resource;
use crate::scope::Scope;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

/// Adapter with no data at all. Counts its own constructions per resource name.
pub(crate) struct NullAdapter;

static CONSTRUCTED: Mutex<BTreeMap<String, usize>> = Mutex::new(BTreeMap::new());

impl NullAdapter {
    /// How many times `Adapter::new` ran for the resource named `resource`.
    pub(crate) fn constructions(resource: &str) -> usize {
        let constructed = CONSTRUCTED.lock().unwrap_or_else(PoisonError::into_inner);
        constructed.get(resource).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Adapter for NullAdapter {
    type Collection = ();
    type Instance = ();
    type Decorated = ();
    type Error = Infallible;

    fn new(resource: &Resource<Self>) -> Self {
        let mut constructed = CONSTRUCTED.lock().unwrap_or_else(PoisonError::into_inner);
        *constructed.entry(resource.name().to_string()).or_default() += 1;
        NullAdapter
    }

    async fn collection(&self, _: &Resource<Self>, _: &Params) -> Result<(), Infallible> {
        Ok(())
    }

    async fn merge_scopes(
        &self,
        _: &Resource<Self>,
        _: (),
        _: &[&Scope<Self>],
        _: &Params,
    ) -> Result<(), Infallible> {
        Ok(())
    }

    async fn sort(&self, _: &Resource<Self>, _: (), _: &Params) -> Result<(), Infallible> {
        Ok(())
    }

    async fn paginate(&self, _: &Resource<Self>, _: (), _: &Params) -> Result<(), Infallible> {
        Ok(())
    }

    async fn finalize_collection(
        &self,
        _: &Resource<Self>,
        _: (),
        _: &Params,
    ) -> Result<(), Infallible> {
        Ok(())
    }

    async fn decorate_collection(
        &self,
        _: &Resource<Self>,
        _: (),
        _: &Params,
    ) -> Result<(), Infallible> {
        Ok(())
    }

    async fn count(&self, _: &Resource<Self>, _: &()) -> Result<usize, Infallible> {
        Ok(0)
    }

    async fn find_instance(
        &self,
        _: &Resource<Self>,
        _: &str,
        _: &Params,
    ) -> Result<Option<()>, Infallible> {
        Ok(None)
    }

    async fn build_instance(&self, _: &Resource<Self>, _: &Params) -> Result<(), Infallible> {
        Ok(())
    }

    async fn update_instance(
        &self,
        _: &Resource<Self>,
        _: (),
        _: &Params,
    ) -> Result<(), Infallible> {
        Ok(())
    }

    async fn save_instance(&self, _: &Resource<Self>, _: &mut ()) -> Result<bool, Infallible> {
        Ok(false)
    }

    async fn delete_instance(&self, _: &Resource<Self>, _: &()) -> Result<bool, Infallible> {
        Ok(false)
    }

    fn permitted_params(
        &self,
        _: &Resource<Self>,
        _: &Params,
        _: Option<&()>,
    ) -> Result<Params, Infallible> {
        Ok(Params::new())
    }

    fn to_param(&self, _: &Resource<Self>, _: &()) -> Result<String, Infallible> {
        Ok(String::new())
    }

    fn human_attribute_name(&self, _: &Resource<Self>, attribute: &str) -> Result<String, Infallible> {
        Ok(attribute.to_string())
    }

    fn default_table_attributes(&self, _: &Resource<Self>) -> Result<Vec<Attribute>, Infallible> {
        Ok(Vec::new())
    }

    fn default_form_attributes(&self, _: &Resource<Self>) -> Result<Vec<Attribute>, Infallible> {
        Ok(Vec::new())
    }
}
