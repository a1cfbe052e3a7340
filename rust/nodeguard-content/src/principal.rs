use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{NodeId, NodePath};

/// Identifier of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Alias of a user group, e.g. `editor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupAlias(String);

impl GroupAlias {
    /// The alias text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupAlias {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for GroupAlias {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for GroupAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated user a request is made on behalf of.
///
/// Permissions are not stored on the principal: they come from its groups
/// through a [`PermissionSource`](crate::PermissionSource). The start nodes
/// bound which parts of the content tree the user can reach at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique user id
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Groups the user belongs to
    #[serde(default)]
    pub groups: Vec<GroupAlias>,
    /// Content nodes the user may work beneath
    #[serde(default)]
    pub start_nodes: Vec<NodeId>,
}

impl Principal {
    /// Create a principal with no groups and no start nodes.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            groups: Vec::new(),
            start_nodes: Vec::new(),
        }
    }

    /// Add the user to a group.
    pub fn in_group(mut self, group: impl Into<GroupAlias>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Add a start node.
    pub fn starting_at(mut self, node: NodeId) -> Self {
        self.start_nodes.push(node);
        self
    }

    /// Whether the user may work anywhere in the content tree.
    pub fn has_root_access(&self) -> bool {
        self.start_nodes.contains(&NodeId::ROOT)
    }

    /// Whether the node `path` leads to is one of the user's start nodes or
    /// lies beneath one of them.
    ///
    /// Root access covers every path, the recycle bin included. Without it,
    /// the recycle bin and everything in it are out of reach.
    pub fn has_path_access(&self, path: &NodePath) -> bool {
        if self.has_root_access() {
            return true;
        }
        if path.is_trashed() {
            return false;
        }
        self.start_nodes
            .iter()
            .any(|start| !start.is_system() && path.contains(*start))
    }
}
