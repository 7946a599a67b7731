//! The action vocabulary shared by resources and route descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CRUD-style action a resource may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// List the collection.
    #[doc(alias = "list")]
    Index,
    /// View one instance.
    #[doc(alias = "view")]
    Show,
    New,
    Create,
    Edit,
    Update,
    Destroy,
}

impl Action {
    /// Every action a resource can declare, in route-declaration order.
    pub const ALL: [Action; 7] = [
        Action::Index,
        Action::Show,
        Action::New,
        Action::Create,
        Action::Edit,
        Action::Update,
        Action::Destroy,
    ];

    /// The actions of a read-only resource.
    pub const READONLY: [Action; 2] = [Action::Index, Action::Show];

    /// Whether the action addresses a single existing instance.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            Action::Show | Action::Edit | Action::Update | Action::Destroy
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Show => "show",
            Action::New => "new",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
