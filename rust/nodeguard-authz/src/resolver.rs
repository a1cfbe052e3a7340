//! Normalizes the node identifier carried by a request into an integer id.

use nodeguard_content::{
    IdentifierLookup, NodeId, NodeKey, NodeguardContentError, ObjectType, Udi,
};

use crate::{NodeguardAuthorizationError, QueryString};

/// The three encodings a node identifier may arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeIdentifier {
    /// A plain base-10 integer id
    Integer(NodeId),
    /// A composite identifier such as `umb://document/<guid>`
    Composite(Udi),
    /// A globally-unique key
    Key(NodeKey),
}

impl NodeIdentifier {
    /// Classify identifier text, trying integer, then composite identifier,
    /// then key.
    ///
    /// This never fails. Text that is neither an integer nor a composite
    /// identifier is taken to be a key even when it is not a well-formed
    /// one; it then classifies as the nil key, which no node carries.
    pub fn classify(text: &str) -> Self {
        let text = text.trim();

        if let Ok(id) = text.parse::<NodeId>() {
            return Self::Integer(id);
        }

        if let Some(udi) = Udi::try_parse(text) {
            return Self::Composite(udi);
        }

        let key = NodeKey::parse_or_nil(text);
        if key.is_nil() {
            tracing::debug!(text, "Node identifier is not a well-formed key");
        }
        Self::Key(key)
    }

    /// Resolve to the integer id this identifier denotes.
    ///
    /// Identifiers the lookup knows nothing about resolve to
    /// [`NodeId::UNRESOLVED`].
    pub async fn resolve<L>(&self, lookup: &L) -> Result<NodeId, NodeguardContentError>
    where
        L: IdentifierLookup + ?Sized,
    {
        let resolved = match self {
            Self::Integer(id) => Some(*id),
            Self::Composite(udi) => lookup.id_from_composite_identifier(udi).await?,
            Self::Key(key) => lookup.id_from_key(*key, ObjectType::Document).await?,
        };

        let id = resolved.unwrap_or(NodeId::UNRESOLVED);
        tracing::debug!(identifier = ?self, %id, "Resolved node identifier");
        Ok(id)
    }
}

/// Find the first of `names` present in `query`, returning the name that
/// matched together with its value.
pub fn find_argument<'a, N>(names: &'a [N], query: &'a QueryString) -> Option<(&'a str, &'a str)>
where
    N: AsRef<str>,
{
    names.iter().find_map(|name| {
        let name = name.as_ref();
        query.get(name).map(|value| (name, value))
    })
}

/// Resolve the node id carried by the first of `names` present in `query`.
///
/// Fails with [`NodeguardAuthorizationError::MissingArgument`] without
/// consulting `lookup` when none of the names is present. Lookup failures
/// are passed through unchanged.
pub async fn resolve_node_id<N, L>(
    names: &[N],
    query: &QueryString,
    lookup: &L,
) -> Result<NodeId, NodeguardAuthorizationError>
where
    N: AsRef<str>,
    L: IdentifierLookup + ?Sized,
{
    let Some((name, value)) = find_argument(names, query) else {
        return Err(NodeguardAuthorizationError::MissingArgument {
            names: names.iter().map(|name| name.as_ref().to_owned()).collect(),
        });
    };

    tracing::debug!(parameter = name, value, "Found node identifier argument");
    Ok(NodeIdentifier::classify(value).resolve(lookup).await?)
}
