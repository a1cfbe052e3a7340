//! The permission decision procedure.

use nodeguard_content::{
    ContentNode, NodeId, NodePath, NodeStore, NodeguardContentError, Permission, PermissionSource,
    Principal, permission_codes,
};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

/// The node a check is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    /// A node the caller has already loaded
    Known(ContentNode),
    /// A node that still needs to be loaded
    ById(NodeId),
}

impl NodeTarget {
    /// The id of the targeted node.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Known(node) => node.id(),
            Self::ById(id) => *id,
        }
    }
}

impl From<ContentNode> for NodeTarget {
    fn from(value: ContentNode) -> Self {
        Self::Known(value)
    }
}

impl From<NodeId> for NodeTarget {
    fn from(value: NodeId) -> Self {
        Self::ById(value)
    }
}

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// The user holds every required permission on the node
    Granted,
    /// The user lacks at least one required permission, or cannot reach the
    /// node at all
    Denied,
    /// There is no node with the requested id
    NotFound,
}

/// A [`Verdict`] together with the node that was loaded to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAccess {
    /// The verdict
    pub verdict: Verdict,
    /// The node loaded while checking by id, for the caller to reuse. Always
    /// `None` for checks on a [`NodeTarget::Known`] node, for virtual nodes,
    /// and for [`Verdict::NotFound`].
    pub node: Option<ContentNode>,
}

impl ContentAccess {
    fn not_found() -> Self {
        Self {
            verdict: Verdict::NotFound,
            node: None,
        }
    }
}

/// Decides whether a user may act on a content node.
///
/// A user may act on a node when the node lies beneath one of the user's
/// start nodes and the user effectively holds every required permission on
/// it, as reported by the [`PermissionSource`].
#[derive(Debug, Clone)]
pub struct ContentPermissions<S> {
    services: S,
}

impl<S> ContentPermissions<S>
where
    S: NodeStore + PermissionSource,
{
    /// Create an engine consulting `services`.
    pub fn new(services: S) -> Self {
        Self { services }
    }

    /// The services this engine consults.
    pub fn services(&self) -> &S {
        &self.services
    }

    /// Check `target`, loading it first when only its id is known.
    pub async fn check(
        &self,
        target: &NodeTarget,
        user: &Principal,
        required: &NonEmpty<Permission>,
    ) -> Result<ContentAccess, NodeguardContentError> {
        match target {
            NodeTarget::Known(node) => Ok(ContentAccess {
                verdict: self.check_node(node, user, required).await?,
                node: None,
            }),
            NodeTarget::ById(id) => self.check_id(*id, user, required).await,
        }
    }

    /// Check a node that is already loaded. The verdict is never
    /// [`Verdict::NotFound`].
    pub async fn check_node(
        &self,
        node: &ContentNode,
        user: &Principal,
        required: &NonEmpty<Permission>,
    ) -> Result<Verdict, NodeguardContentError> {
        self.decide(node.path(), user, required).await
    }

    /// Check the node with `id`, loading it first.
    ///
    /// Yields [`Verdict::NotFound`] without evaluating any permissions when
    /// there is no such node. [`NodeId::UNRESOLVED`] never names a node and
    /// is not loaded. The content root and recycle bin are never stored and
    /// are checked against their fixed paths instead.
    pub async fn check_id(
        &self,
        id: NodeId,
        user: &Principal,
        required: &NonEmpty<Permission>,
    ) -> Result<ContentAccess, NodeguardContentError> {
        if id == NodeId::UNRESOLVED {
            tracing::debug!("Node identifier did not resolve to a node");
            return Ok(ContentAccess::not_found());
        }

        if let Some(path) = id.system_path() {
            return Ok(ContentAccess {
                verdict: self.decide(&path, user, required).await?,
                node: None,
            });
        }

        let Some(node) = self.services.load_by_id(id).await? else {
            tracing::debug!(%id, "No node to check permissions on");
            return Ok(ContentAccess::not_found());
        };

        let verdict = self.decide(node.path(), user, required).await?;
        Ok(ContentAccess {
            verdict,
            node: Some(node),
        })
    }

    async fn decide(
        &self,
        path: &NodePath,
        user: &Principal,
        required: &NonEmpty<Permission>,
    ) -> Result<Verdict, NodeguardContentError> {
        if !user.has_path_access(path) {
            tracing::debug!(user = %user.id, %path, "Node lies outside the user's start nodes");
            return Ok(Verdict::Denied);
        }

        let held = self.services.effective_permissions(user, path).await?;
        let verdict = if required.iter().all(|permission| held.contains(permission)) {
            Verdict::Granted
        } else {
            Verdict::Denied
        };

        tracing::debug!(
            user = %user.id,
            %path,
            held = %permission_codes(&held),
            required = %required.iter().map(Permission::code).collect::<String>(),
            ?verdict,
            "Evaluated node permissions"
        );

        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nodeguard_content::{GroupPermissions, MemoryContentStore, NodeKey, PermissionSet, UserId};
    use nonempty::nonempty;
    use pretty_assertions::assert_eq;

    use crate::Services;

    type Engine =
        ContentPermissions<Services<MemoryContentStore, MemoryContentStore, GroupPermissions>>;

    async fn engine() -> anyhow::Result<(Engine, ContentNode)> {
        let store = MemoryContentStore::new();
        let home = ContentNode::at_root(NodeId(1050), NodeKey::generate(), "Home");
        store.insert(home.clone()).await?;

        let grants = GroupPermissions::new();
        grants
            .define_group("writer", PermissionSet::from([Permission::Read]))
            .await;

        let engine = ContentPermissions::new(Services::new(store.clone(), store, grants));
        Ok((engine, home))
    }

    fn writer() -> Principal {
        Principal::new(UserId(5), "writer")
            .in_group("writer")
            .starting_at(NodeId::ROOT)
    }

    #[tokio::test]
    async fn it_grants_held_permissions_and_denies_others() -> anyhow::Result<()> {
        let (engine, home) = engine().await?;
        let user = writer();

        assert_eq!(
            engine
                .check_node(&home, &user, &nonempty![Permission::Read])
                .await?,
            Verdict::Granted
        );
        assert_eq!(
            engine
                .check_node(&home, &user, &nonempty![Permission::Publish])
                .await?,
            Verdict::Denied
        );
        assert_eq!(
            engine
                .check_node(&home, &user, &nonempty![Permission::Read, Permission::Publish])
                .await?,
            Verdict::Denied
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_reports_missing_nodes_as_not_found() -> anyhow::Result<()> {
        let (engine, _) = engine().await?;
        let access = engine
            .check_id(NodeId(999), &writer(), &nonempty![Permission::Publish])
            .await?;
        assert_eq!(access, ContentAccess::not_found());

        let access = engine
            .check_id(NodeId::UNRESOLVED, &writer(), &nonempty![Permission::Read])
            .await?;
        assert_eq!(access.verdict, Verdict::NotFound);
        Ok(())
    }

    /// A store that hands out a node for any id it is asked about.
    struct Indiscriminate;

    #[async_trait]
    impl NodeStore for Indiscriminate {
        async fn load_by_id(
            &self,
            id: NodeId,
        ) -> Result<Option<ContentNode>, NodeguardContentError> {
            Ok(Some(ContentNode::at_root(id, NodeKey::generate(), "Anything")))
        }
    }

    #[tokio::test]
    async fn it_never_treats_an_unresolved_id_as_a_node() -> anyhow::Result<()> {
        let grants = GroupPermissions::new();
        grants
            .define_group("writer", PermissionSet::from([Permission::Read]))
            .await;
        let engine = ContentPermissions::new(Services::new(
            MemoryContentStore::new(),
            Indiscriminate,
            grants,
        ));

        let access = engine
            .check_id(NodeId::UNRESOLVED, &writer(), &nonempty![Permission::Read])
            .await?;
        assert_eq!(access, ContentAccess::not_found());

        let access = engine
            .check_id(NodeId(1063), &writer(), &nonempty![Permission::Read])
            .await?;
        assert_eq!(access.verdict, Verdict::Granted);
        Ok(())
    }

    #[tokio::test]
    async fn it_denies_trashed_nodes_to_users_without_root_access() -> anyhow::Result<()> {
        let (engine, _) = engine().await?;
        let trashed = ContentNode::under(
            &NodePath::recycle_bin().child(NodeId(1050)),
            NodeId(1063),
            NodeKey::generate(),
            "Old news",
        );
        let limited = Principal::new(UserId(6), "limited")
            .in_group("writer")
            .starting_at(NodeId(1050));

        let required = nonempty![Permission::Read];
        assert_eq!(
            engine.check_node(&trashed, &limited, &required).await?,
            Verdict::Denied
        );
        assert_eq!(
            engine.check_node(&trashed, &writer(), &required).await?,
            Verdict::Granted
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_returns_the_node_it_loaded() -> anyhow::Result<()> {
        let (engine, home) = engine().await?;
        let access = engine
            .check(&NodeTarget::ById(home.id()), &writer(), &nonempty![Permission::Read])
            .await?;
        assert_eq!(access.verdict, Verdict::Granted);
        assert_eq!(access.node, Some(home.clone()));

        let access = engine
            .check(&NodeTarget::Known(home), &writer(), &nonempty![Permission::Read])
            .await?;
        assert_eq!(access.node, None);
        Ok(())
    }

    #[tokio::test]
    async fn it_checks_virtual_nodes_without_loading_them() -> anyhow::Result<()> {
        let (engine, _) = engine().await?;
        let required = nonempty![Permission::Read];

        let access = engine.check_id(NodeId::ROOT, &writer(), &required).await?;
        assert_eq!(access.verdict, Verdict::Granted);
        assert_eq!(access.node, None);

        let limited = Principal::new(UserId(6), "limited")
            .in_group("writer")
            .starting_at(NodeId(1050));
        let access = engine
            .check_id(NodeId::RECYCLE_BIN, &limited, &required)
            .await?;
        assert_eq!(access.verdict, Verdict::Denied);
        Ok(())
    }

    #[tokio::test]
    async fn it_denies_nodes_outside_the_start_nodes() -> anyhow::Result<()> {
        let (engine, home) = engine().await?;
        let elsewhere = Principal::new(UserId(7), "elsewhere")
            .in_group("writer")
            .starting_at(NodeId(2000));

        assert_eq!(
            engine
                .check_node(&home, &elsewhere, &nonempty![Permission::Read])
                .await?,
            Verdict::Denied
        );
        Ok(())
    }
}
