use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::NodeguardContentError;

/// Integer identifier of a content node.
///
/// Stored nodes always carry a positive id. The negative ids are reserved for
/// the virtual nodes of the content tree ([`NodeId::ROOT`] and
/// [`NodeId::RECYCLE_BIN`]) and `0` is what a lookup produces when it finds
/// nothing.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub i32);

impl NodeId {
    /// The virtual root of the content tree.
    pub const ROOT: NodeId = NodeId(-1);

    /// The virtual recycle bin of the content tree.
    pub const RECYCLE_BIN: NodeId = NodeId(-20);

    /// The id a lookup yields when the identifier does not map to any node.
    pub const UNRESOLVED: NodeId = NodeId(0);

    /// Whether this id names one of the virtual nodes that are never stored.
    pub fn is_system(&self) -> bool {
        *self == Self::ROOT || *self == Self::RECYCLE_BIN
    }

    /// The path evaluated for a virtual node, if this is one.
    pub fn system_path(&self) -> Option<NodePath> {
        match *self {
            Self::ROOT => Some(NodePath::root()),
            Self::RECYCLE_BIN => Some(NodePath::recycle_bin()),
            _ => None,
        }
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i32>().map(Self)
    }
}

/// Ancestry of a node, from the content root down to the node itself.
///
/// Rendered in the comma separated form used by the persistence layer,
/// e.g. `-1,1050,1063`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodePath(Vec<NodeId>);

impl NodePath {
    /// The path of the content root.
    pub fn root() -> Self {
        Self(vec![NodeId::ROOT])
    }

    /// The path of the content recycle bin.
    pub fn recycle_bin() -> Self {
        Self(vec![NodeId::ROOT, NodeId::RECYCLE_BIN])
    }

    /// Extend this path with a child node.
    pub fn child(&self, id: NodeId) -> Self {
        let mut ids = self.0.clone();
        ids.push(id);
        Self(ids)
    }

    /// The ids on this path, root first.
    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    /// Whether `id` is the target of this path or one of its ancestors.
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    /// Whether the path runs through the recycle bin.
    pub fn is_trashed(&self) -> bool {
        self.0.get(1) == Some(&NodeId::RECYCLE_BIN)
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for id in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = NodeguardContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ids = s
            .split(',')
            .map(|segment| segment.trim().parse::<NodeId>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| NodeguardContentError::InvalidPath(s.to_owned()))?;

        match ids.first() {
            Some(&NodeId::ROOT) => Ok(Self(ids)),
            _ => Err(NodeguardContentError::InvalidPath(s.to_owned())),
        }
    }
}

impl From<NodePath> for String {
    fn from(value: NodePath) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for NodePath {
    type Error = NodeguardContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The globally-unique key of a node.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeKey(pub Uuid);

impl NodeKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero key. No stored node carries it.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the all-zero key.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parse a key in any of the usual textual guid forms.
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::parse_str(text.trim()).ok().map(Self)
    }

    /// Parse a key, falling back to [`NodeKey::nil`] when `text` is not a
    /// well-formed guid.
    pub fn parse_or_nil(text: &str) -> Self {
        Self::parse(text).unwrap_or_default()
    }
}

impl From<Uuid> for NodeKey {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of object a key lookup is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    /// Content documents
    Document,
    /// Media items
    Media,
    /// Members
    Member,
    /// Content blueprints
    DocumentBlueprint,
}

/// A content node as loaded from the [`NodeStore`](crate::NodeStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    id: NodeId,
    key: NodeKey,
    name: String,
    path: NodePath,
    object_type: ObjectType,
}

impl ContentNode {
    /// Create a document directly below the content root.
    pub fn at_root(id: NodeId, key: NodeKey, name: impl Into<String>) -> Self {
        Self::under(&NodePath::root(), id, key, name)
    }

    /// Create a document below the node that `parent` leads to.
    pub fn under(parent: &NodePath, id: NodeId, key: NodeKey, name: impl Into<String>) -> Self {
        Self {
            id,
            key,
            name: name.into(),
            path: parent.child(id),
            object_type: ObjectType::Document,
        }
    }

    /// Change the object type of this node.
    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }

    /// The integer id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The globally-unique key.
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ancestry of the node, ending with the node itself.
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// The id of the parent node (the content root for top level nodes).
    pub fn parent(&self) -> NodeId {
        let ids = self.path.ids();
        ids.len()
            .checked_sub(2)
            .and_then(|index| ids.get(index))
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// What kind of object this node is.
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }
}
