use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::NodeguardContentError;

/// A permission a user may hold on a content node.
///
/// Every permission is identified by a single letter code, which is what the
/// permission store persists and what appears in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub enum Permission {
    /// Browse the node and read its properties
    Read,
    /// Create children below the node
    Create,
    /// Save changes to the node
    Update,
    /// Delete the node
    Delete,
    /// Publish the node
    Publish,
    /// Unpublish the node
    Unpublish,
    /// Move the node
    Move,
    /// Copy the node
    Copy,
    /// Sort the children of the node
    Sort,
    /// Roll the node back to an earlier version
    Rollback,
    /// Assign hostnames and cultures
    AssignDomain,
    /// Subscribe to notifications about the node
    Notify,
    /// Change the permissions of the node
    ManagePermissions,
    /// Configure public access restrictions
    PublicAccess,
}

impl Permission {
    /// All known permissions.
    pub const ALL: [Permission; 14] = [
        Self::Read,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Publish,
        Self::Unpublish,
        Self::Move,
        Self::Copy,
        Self::Sort,
        Self::Rollback,
        Self::AssignDomain,
        Self::Notify,
        Self::ManagePermissions,
        Self::PublicAccess,
    ];

    /// The letter code of this permission.
    pub fn code(&self) -> char {
        match self {
            Self::Read => 'F',
            Self::Create => 'C',
            Self::Update => 'A',
            Self::Delete => 'D',
            Self::Publish => 'U',
            Self::Unpublish => 'Z',
            Self::Move => 'M',
            Self::Copy => 'O',
            Self::Sort => 'S',
            Self::Rollback => 'K',
            Self::AssignDomain => 'I',
            Self::Notify => 'N',
            Self::ManagePermissions => 'R',
            Self::PublicAccess => 'P',
        }
    }

    /// Look up a permission by its letter code.
    pub fn from_code(code: char) -> Result<Self, NodeguardContentError> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.code() == code)
            .ok_or(NodeguardContentError::InvalidPermission(code))
    }

    /// Parse a run of letter codes (e.g. `"FCAU"`) into a set.
    pub fn parse_codes(codes: &str) -> Result<PermissionSet, NodeguardContentError> {
        codes.chars().map(Self::from_code).collect()
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<Permission> for char {
    fn from(value: Permission) -> Self {
        value.code()
    }
}

impl TryFrom<char> for Permission {
    type Error = NodeguardContentError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

/// A set of permissions, e.g. what a user effectively holds on a node.
pub type PermissionSet = BTreeSet<Permission>;

/// Render a permission set as its run of letter codes.
pub fn permission_codes(permissions: &PermissionSet) -> String {
    permissions.iter().map(Permission::code).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_maps_every_permission_to_a_distinct_code() -> anyhow::Result<()> {
        for permission in Permission::ALL {
            assert_eq!(Permission::from_code(permission.code())?, permission);
        }
        let codes: BTreeSet<char> = Permission::ALL.iter().map(Permission::code).collect();
        assert_eq!(codes.len(), Permission::ALL.len());
        Ok(())
    }

    #[test]
    fn it_rejects_unknown_codes() {
        assert_eq!(
            Permission::from_code('X'),
            Err(NodeguardContentError::InvalidPermission('X'))
        );
        assert!(Permission::parse_codes("FX").is_err());
    }

    #[test]
    fn it_parses_runs_of_codes() -> anyhow::Result<()> {
        let set = Permission::parse_codes("UFF")?;
        assert_eq!(set, PermissionSet::from([Permission::Read, Permission::Publish]));
        assert_eq!(permission_codes(&set), "FU");
        Ok(())
    }

    #[test]
    fn it_serializes_as_the_letter_code() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Permission::Publish)?, "\"U\"");
        assert_eq!(serde_json::from_str::<Permission>("\"F\"")?, Permission::Read);
        Ok(())
    }
}
