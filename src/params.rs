//! # Request Parameters
//!
//! [`Params`] carries the request parameters threaded through every pipeline
//! stage and instance operation. It is a flat string map, the shape a query
//! string or form body arrives in, with typed accessors for the keys the
//! core understands:
//!
//! | key        | meaning                                        |
//! |------------|------------------------------------------------|
//! | `scope`    | comma-separated scope names                    |
//! | `sort`     | field to sort on                               |
//! | `order`    | `asc` or `desc`                                |
//! | `page`     | 1-based page number                            |
//! | `per_page` | page size, clamped by [`PaginationOptions`]    |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default page size when neither the request nor the resource sets one.
pub const DEFAULT_PER_PAGE: usize = 25;

/// Request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keeps only the listed keys. Adapters use this for `permitted_params`.
    pub fn permit(&self, keys: &[&str]) -> Params {
        Params(
            self.0
                .iter()
                .filter(|(k, _)| keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Scope names requested by the `scope` key, in request order, blanks dropped.
    pub fn scope_names(&self) -> Vec<&str> {
        self.get("scope")
            .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// The field named by `sort`, if any.
    pub fn sort_field(&self) -> Option<&str> {
        self.get("sort").filter(|s| !s.is_empty())
    }

    /// The direction named by `order`. Anything other than `desc` sorts ascending.
    pub fn sort_order(&self) -> SortOrder {
        match self.get("order") {
            Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// Resolves the requested page against the resource's pagination options.
    pub fn page(&self, options: &PaginationOptions) -> Page {
        let number = self
            .get("page")
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        let mut per_page = self
            .get("per_page")
            .and_then(|p| p.parse::<usize>().ok())
            .filter(|p| *p > 0)
            .or(options.per_page.filter(|p| *p > 0))
            .unwrap_or(DEFAULT_PER_PAGE);
        if let Some(max) = options.max_per_page {
            per_page = per_page.min(max.max(1));
        }

        Page { number, per_page }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// A resolved page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub per_page: usize,
}

impl Page {
    /// Rows to skip. Saturates, so an absurd page number yields an empty page.
    pub fn offset(&self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> usize {
        self.per_page
    }
}

/// Per-resource pagination configuration. Unset fields fall back to the request or the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    pub per_page: Option<usize>,
    pub max_per_page: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_names_split_and_trimmed() {
        let params = Params::new().with("scope", "active, cheap,,");
        assert_eq!(params.scope_names(), vec!["active", "cheap"]);
        assert!(Params::new().scope_names().is_empty());
    }

    #[test]
    fn test_sort_order_defaults_to_asc() {
        assert_eq!(Params::new().sort_order(), SortOrder::Asc);
        assert_eq!(Params::new().with("order", "DESC").sort_order(), SortOrder::Desc);
        assert_eq!(Params::new().with("order", "sideways").sort_order(), SortOrder::Asc);
    }

    #[test]
    fn test_page_resolution() {
        let options = PaginationOptions {
            per_page: Some(10),
            max_per_page: Some(50),
        };

        let page = Params::new().page(&options);
        assert_eq!(page, Page { number: 1, per_page: 10 });

        let page = Params::new().with("page", "3").with("per_page", "500").page(&options);
        assert_eq!(page.per_page, 50);
        assert_eq!(page.offset(), 100);

        let page = Params::new().with("page", "0").page(&PaginationOptions::default());
        assert_eq!(page, Page { number: 1, per_page: DEFAULT_PER_PAGE });
    }

    #[test]
    fn test_huge_page_number_saturates() {
        let page = Params::new()
            .with("page", usize::MAX.to_string())
            .page(&PaginationOptions::default());
        assert_eq!(page.number, usize::MAX);
        assert_eq!(page.offset(), usize::MAX);
    }

    #[test]
    fn test_zero_max_per_page_keeps_one_row() {
        let options = PaginationOptions {
            per_page: None,
            max_per_page: Some(0),
        };
        assert_eq!(Params::new().page(&options).per_page, 1);
    }

    #[test]
    fn test_permit_filters_keys() {
        let params = Params::new().with("name", "Bolt").with("admin", "true");
        let permitted = params.permit(&["name"]);
        assert_eq!(permitted.len(), 1);
        assert_eq!(permitted.get("name"), Some("Bolt"));
    }
}
