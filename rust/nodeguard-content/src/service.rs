use async_trait::async_trait;

use crate::{
    ContentNode, NodeId, NodeKey, NodePath, NodeguardContentError, ObjectType, PermissionSet,
    Principal, Udi,
};

/// Maps alternate node identifiers onto integer node ids.
///
/// Both lookups answer `Ok(None)` when the identifier is well-formed but
/// does not name any entity. An `Err` is reserved for failures of the
/// service itself.
#[async_trait]
pub trait IdentifierLookup: Send + Sync {
    /// Resolve a composite identifier to the integer id of its entity.
    async fn id_from_composite_identifier(
        &self,
        udi: &Udi,
    ) -> Result<Option<NodeId>, NodeguardContentError>;

    /// Resolve a key to the integer id of the entity of `object_type`
    /// carrying it.
    async fn id_from_key(
        &self,
        key: NodeKey,
        object_type: ObjectType,
    ) -> Result<Option<NodeId>, NodeguardContentError>;
}

/// Loads content nodes.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Load the node with `id`, or `None` if there is no such node.
    async fn load_by_id(&self, id: NodeId) -> Result<Option<ContentNode>, NodeguardContentError>;
}

/// Computes which permissions a user effectively holds on a node.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// The permissions `user` holds on the node `path` leads to, with grants
    /// inherited along the path and contributed by every group of the user
    /// already folded in.
    async fn effective_permissions(
        &self,
        user: &Principal,
        path: &NodePath,
    ) -> Result<PermissionSet, NodeguardContentError>;
}

#[async_trait]
impl<T> IdentifierLookup for std::sync::Arc<T>
where
    T: IdentifierLookup + ?Sized,
{
    async fn id_from_composite_identifier(
        &self,
        udi: &Udi,
    ) -> Result<Option<NodeId>, NodeguardContentError> {
        (**self).id_from_composite_identifier(udi).await
    }

    async fn id_from_key(
        &self,
        key: NodeKey,
        object_type: ObjectType,
    ) -> Result<Option<NodeId>, NodeguardContentError> {
        (**self).id_from_key(key, object_type).await
    }
}

#[async_trait]
impl<T> NodeStore for std::sync::Arc<T>
where
    T: NodeStore + ?Sized,
{
    async fn load_by_id(&self, id: NodeId) -> Result<Option<ContentNode>, NodeguardContentError> {
        (**self).load_by_id(id).await
    }
}

#[async_trait]
impl<T> PermissionSource for std::sync::Arc<T>
where
    T: PermissionSource + ?Sized,
{
    async fn effective_permissions(
        &self,
        user: &Principal,
        path: &NodePath,
    ) -> Result<PermissionSet, NodeguardContentError> {
        (**self).effective_permissions(user, path).await
    }
}
