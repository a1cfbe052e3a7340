use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    ContentNode, EntityType, IdentifierLookup, NodeId, NodeKey, NodeStore, NodeguardContentError,
    ObjectType, Udi, UdiValue,
};

#[derive(Default)]
struct Entries {
    nodes: HashMap<NodeId, ContentNode>,
    keys: HashMap<NodeKey, NodeId>,
}

/// A trivial content store where all nodes are kept in memory and never
/// persisted. It answers both node loads and identifier lookups.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a node.
    ///
    /// Nodes with the unresolved id, a system id or the nil key are refused:
    /// those are what failed lookups and malformed keys resolve to.
    pub async fn insert(&self, node: ContentNode) -> Result<(), NodeguardContentError> {
        if node.id() == NodeId::UNRESOLVED || node.id().is_system() {
            return Err(NodeguardContentError::ReservedIdentity(format!(
                "id {}",
                node.id()
            )));
        }
        if node.key().is_nil() {
            return Err(NodeguardContentError::ReservedIdentity(format!(
                "nil key on node {}",
                node.id()
            )));
        }

        let mut entries = self.entries.write().await;
        let stale = entries.nodes.get(&node.id()).map(ContentNode::key);
        if let Some(stale) = stale {
            entries.keys.remove(&stale);
        }
        entries.keys.insert(node.key(), node.id());
        entries.nodes.insert(node.id(), node);
        Ok(())
    }

    /// Remove a node, returning it if it was present.
    pub async fn remove(&self, id: NodeId) -> Option<ContentNode> {
        let mut entries = self.entries.write().await;
        let node = entries.nodes.remove(&id)?;
        entries.keys.remove(&node.key());
        Some(node)
    }

    /// Number of stored nodes.
    pub async fn len(&self) -> usize {
        self.entries.read().await.nodes.len()
    }

    /// Whether the store holds no nodes.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.nodes.is_empty()
    }
}

fn object_type_of(entity_type: EntityType) -> Option<ObjectType> {
    match entity_type {
        EntityType::Document => Some(ObjectType::Document),
        EntityType::DocumentBlueprint => Some(ObjectType::DocumentBlueprint),
        EntityType::Media => Some(ObjectType::Media),
        EntityType::Member => Some(ObjectType::Member),
        _ => None,
    }
}

#[async_trait]
impl NodeStore for MemoryContentStore {
    async fn load_by_id(&self, id: NodeId) -> Result<Option<ContentNode>, NodeguardContentError> {
        let entries = self.entries.read().await;
        Ok(entries.nodes.get(&id).cloned())
    }
}

#[async_trait]
impl IdentifierLookup for MemoryContentStore {
    async fn id_from_composite_identifier(
        &self,
        udi: &Udi,
    ) -> Result<Option<NodeId>, NodeguardContentError> {
        match (object_type_of(udi.entity_type()), udi.value()) {
            (Some(object_type), UdiValue::Guid(guid)) => {
                self.id_from_key(NodeKey(*guid), object_type).await
            }
            _ => Ok(None),
        }
    }

    async fn id_from_key(
        &self,
        key: NodeKey,
        object_type: ObjectType,
    ) -> Result<Option<NodeId>, NodeguardContentError> {
        let entries = self.entries.read().await;
        Ok(entries
            .keys
            .get(&key)
            .and_then(|id| entries.nodes.get(id))
            .filter(|node| node.object_type() == object_type)
            .map(ContentNode::id))
    }
}
