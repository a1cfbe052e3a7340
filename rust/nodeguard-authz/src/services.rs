use async_trait::async_trait;
use nodeguard_content::{
    ContentNode, IdentifierLookup, NodeId, NodeKey, NodePath, NodeStore, NodeguardContentError,
    ObjectType, PermissionSet, PermissionSource, Principal, Udi,
};

/// Bundles separate implementations of the three content services into one
/// value that implements all of them.
#[derive(Debug, Clone)]
pub struct Services<L, N, P> {
    /// Answers identifier lookups
    pub lookup: L,
    /// Loads nodes
    pub nodes: N,
    /// Computes effective permissions
    pub permissions: P,
}

impl<L, N, P> Services<L, N, P> {
    /// Bundle the given services.
    pub fn new(lookup: L, nodes: N, permissions: P) -> Self {
        Self {
            lookup,
            nodes,
            permissions,
        }
    }
}

#[async_trait]
impl<L, N, P> IdentifierLookup for Services<L, N, P>
where
    L: IdentifierLookup,
    N: Send + Sync,
    P: Send + Sync,
{
    async fn id_from_composite_identifier(
        &self,
        udi: &Udi,
    ) -> Result<Option<NodeId>, NodeguardContentError> {
        self.lookup.id_from_composite_identifier(udi).await
    }

    async fn id_from_key(
        &self,
        key: NodeKey,
        object_type: ObjectType,
    ) -> Result<Option<NodeId>, NodeguardContentError> {
        self.lookup.id_from_key(key, object_type).await
    }
}

#[async_trait]
impl<L, N, P> NodeStore for Services<L, N, P>
where
    L: Send + Sync,
    N: NodeStore,
    P: Send + Sync,
{
    async fn load_by_id(&self, id: NodeId) -> Result<Option<ContentNode>, NodeguardContentError> {
        self.nodes.load_by_id(id).await
    }
}

#[async_trait]
impl<L, N, P> PermissionSource for Services<L, N, P>
where
    L: Send + Sync,
    N: Send + Sync,
    P: PermissionSource,
{
    async fn effective_permissions(
        &self,
        user: &Principal,
        path: &NodePath,
    ) -> Result<PermissionSet, NodeguardContentError> {
        self.permissions.effective_permissions(user, path).await
    }
}
