//! # Route Configuration
//!
//! A [`RouteDescriptor`] tells the host router how to mount a resource:
//! singular or plural route shape, controller, alias, optional path override,
//! the actions to suppress (`except`), and any extra routes the resource
//! declared with
//! [`ResourceBuilder::additional_routes`](crate::ResourceBuilder::additional_routes).
//!
//! The core does not register routes itself. Hosts read the descriptor (or
//! its JSON form) and translate it into their router's calls.

use crate::action::Action;
use serde::Serialize;
use std::fmt;

/// Route shape: one instance (`resource`) or a collection (`resources`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteShape {
    #[serde(rename = "resource")]
    Singular,
    #[serde(rename = "resources")]
    Plural,
}

/// Routing configuration for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub name: String,
    pub shape: RouteShape,
    pub controller: String,
    #[serde(rename = "as")]
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Declared actions the resource does not expose.
    pub except: Vec<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<NestedRoute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Whether a nested route hangs off one instance or the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOn {
    Member,
    #[default]
    Collection,
}

/// A route declared in the additional-routes block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedRoute {
    pub method: Method,
    pub path: String,
    /// Controller action handling the route.
    pub action: String,
    pub on: RouteOn,
}

/// Collects the routes declared by an additional-routes block.
#[derive(Debug, Default)]
pub struct RouteMapper {
    routes: Vec<NestedRoute>,
    on: RouteOn,
}

impl RouteMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, path: &str, action: &str) -> &mut Self {
        self.add(Method::Get, path, action)
    }

    pub fn post(&mut self, path: &str, action: &str) -> &mut Self {
        self.add(Method::Post, path, action)
    }

    pub fn put(&mut self, path: &str, action: &str) -> &mut Self {
        self.add(Method::Put, path, action)
    }

    pub fn patch(&mut self, path: &str, action: &str) -> &mut Self {
        self.add(Method::Patch, path, action)
    }

    pub fn delete(&mut self, path: &str, action: &str) -> &mut Self {
        self.add(Method::Delete, path, action)
    }

    /// Declares routes on a single instance (`/widgets/:id/...`).
    pub fn member(&mut self, declare: impl FnOnce(&mut RouteMapper)) -> &mut Self {
        self.within(RouteOn::Member, declare)
    }

    /// Declares routes on the collection (`/widgets/...`). This is the default placement.
    pub fn collection(&mut self, declare: impl FnOnce(&mut RouteMapper)) -> &mut Self {
        self.within(RouteOn::Collection, declare)
    }

    pub fn routes(&self) -> &[NestedRoute] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<NestedRoute> {
        self.routes
    }

    fn add(&mut self, method: Method, path: &str, action: &str) -> &mut Self {
        self.routes.push(NestedRoute {
            method,
            path: path.trim_matches('/').to_string(),
            action: action.to_string(),
            on: self.on,
        });
        self
    }

    fn within(&mut self, on: RouteOn, declare: impl FnOnce(&mut RouteMapper)) -> &mut Self {
        let outer = std::mem::replace(&mut self.on, on);
        declare(self);
        self.on = outer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_and_collection_placement() {
        let mut mapper = RouteMapper::new();
        mapper.get("/export", "export");
        mapper.member(|m| {
            m.post("publish", "publish");
        });
        mapper.delete("purge", "purge");

        let routes = mapper.into_routes();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].path, "export");
        assert_eq!(routes[0].on, RouteOn::Collection);
        assert_eq!(routes[1].method, Method::Post);
        assert_eq!(routes[1].on, RouteOn::Member);
        assert_eq!(routes[2].on, RouteOn::Collection);
    }
}
