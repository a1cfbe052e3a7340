use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    GroupAlias, NodeId, NodePath, NodeguardContentError, PermissionSet, PermissionSource, Principal,
    permission_codes,
};

#[derive(Debug, Clone, Default)]
struct GroupGrants {
    defaults: PermissionSet,
    assignments: HashMap<NodeId, PermissionSet>,
}

impl GroupGrants {
    /// The explicit assignment of the deepest node on `path` wins; a group
    /// with no assignment anywhere on the path falls back to its defaults.
    fn for_path(&self, path: &NodePath) -> &PermissionSet {
        path.ids()
            .iter()
            .rev()
            .find_map(|id| self.assignments.get(id))
            .unwrap_or(&self.defaults)
    }
}

/// A [`PermissionSource`] backed by user group grants held in memory.
///
/// Each group carries default permissions that apply throughout the content
/// tree, and may override them with explicit permissions on individual nodes.
/// An override applies to the node and everything beneath it until a deeper
/// override replaces it. A user holds the union of what its groups hold.
#[derive(Clone, Default)]
pub struct GroupPermissions {
    groups: Arc<RwLock<HashMap<GroupAlias, GroupGrants>>>,
}

impl GroupPermissions {
    /// Create an empty grant table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a group (or replace its defaults).
    pub async fn define_group(&self, group: impl Into<GroupAlias>, defaults: PermissionSet) {
        let mut groups = self.groups.write().await;
        groups.entry(group.into()).or_default().defaults = defaults;
    }

    /// Assign explicit permissions to a group on a node.
    ///
    /// Assigning to a group that has not been defined defines it with no
    /// default permissions.
    pub async fn assign(
        &self,
        group: impl Into<GroupAlias>,
        node: NodeId,
        permissions: PermissionSet,
    ) {
        let mut groups = self.groups.write().await;
        groups
            .entry(group.into())
            .or_default()
            .assignments
            .insert(node, permissions);
    }

    /// Remove an explicit assignment, so the node inherits again.
    pub async fn revoke(&self, group: &GroupAlias, node: NodeId) -> Option<PermissionSet> {
        let mut groups = self.groups.write().await;
        groups.get_mut(group)?.assignments.remove(&node)
    }
}

#[async_trait]
impl PermissionSource for GroupPermissions {
    async fn effective_permissions(
        &self,
        user: &Principal,
        path: &NodePath,
    ) -> Result<PermissionSet, NodeguardContentError> {
        let groups = self.groups.read().await;
        let mut effective = PermissionSet::new();

        for alias in &user.groups {
            match groups.get(alias) {
                Some(grants) => effective.extend(grants.for_path(path).iter().copied()),
                None => tracing::debug!(group = %alias, user = %user.id, "Ignoring unknown group"),
            }
        }

        tracing::trace!(
            user = %user.id,
            path = %path,
            permissions = %permission_codes(&effective),
            "Computed effective permissions"
        );

        Ok(effective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Permission, UserId};
    use pretty_assertions::assert_eq;

    fn codes(codes: &str) -> Result<PermissionSet, NodeguardContentError> {
        Permission::parse_codes(codes)
    }

    fn path(ids: &[i32]) -> NodePath {
        ids.iter()
            .fold(NodePath::root(), |path, id| path.child(NodeId(*id)))
    }

    #[tokio::test]
    async fn it_applies_group_defaults_without_assignments() -> anyhow::Result<()> {
        let grants = GroupPermissions::new();
        grants.define_group("writer", codes("FCA")?).await;
        let user = Principal::new(UserId(1), "w").in_group("writer");

        let effective = grants.effective_permissions(&user, &path(&[10, 11])).await?;
        assert_eq!(effective, codes("FCA")?);
        Ok(())
    }

    #[tokio::test]
    async fn it_lets_the_deepest_assignment_win() -> anyhow::Result<()> {
        let grants = GroupPermissions::new();
        grants.define_group("editor", codes("F")?).await;
        grants.assign("editor", NodeId(10), codes("FU")?).await;
        grants.assign("editor", NodeId(11), codes("FA")?).await;
        let user = Principal::new(UserId(1), "e").in_group("editor");

        assert_eq!(
            grants.effective_permissions(&user, &path(&[10])).await?,
            codes("FU")?
        );
        assert_eq!(
            grants.effective_permissions(&user, &path(&[10, 12])).await?,
            codes("FU")?
        );
        assert_eq!(
            grants
                .effective_permissions(&user, &path(&[10, 11, 13]))
                .await?,
            codes("FA")?
        );
        assert_eq!(
            grants.effective_permissions(&user, &path(&[20])).await?,
            codes("F")?
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_unions_permissions_across_groups() -> anyhow::Result<()> {
        let grants = GroupPermissions::new();
        grants.define_group("reader", codes("F")?).await;
        grants.define_group("publisher", PermissionSet::new()).await;
        grants.assign("publisher", NodeId(10), codes("U")?).await;
        let user = Principal::new(UserId(1), "p")
            .in_group("reader")
            .in_group("publisher")
            .in_group("ghost");

        assert_eq!(
            grants.effective_permissions(&user, &path(&[10, 11])).await?,
            codes("FU")?
        );
        assert_eq!(
            grants.effective_permissions(&user, &path(&[20])).await?,
            codes("F")?
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_inherits_again_after_a_revocation() -> anyhow::Result<()> {
        let grants = GroupPermissions::new();
        grants.define_group("editor", codes("FA")?).await;
        grants.assign("editor", NodeId(10), codes("F")?).await;
        let user = Principal::new(UserId(1), "e").in_group("editor");

        let revoked = grants.revoke(&GroupAlias::from("editor"), NodeId(10)).await;
        assert_eq!(revoked, Some(codes("F")?));
        assert_eq!(
            grants.effective_permissions(&user, &path(&[10])).await?,
            codes("FA")?
        );
        Ok(())
    }
}
