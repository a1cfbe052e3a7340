//! Content node model and the service contracts consulted while authorizing
//! back-office operations.
//!
//! Content lives in a tree. Every node has an integer [`NodeId`], a
//! globally-unique [`NodeKey`] and a [`NodePath`] recording its ancestry from
//! the content root. Callers may refer to a node by any of three encodings:
//! the integer id, the key, or a composite identifier ([`Udi`]) such as
//! `umb://document/4b1f4c1a2e6d4d0f9a3c8e7b6a5d4c3b`.
//!
//! The services behind the model are described by three traits:
//!
//! | Trait | Answers |
//! |-------|---------|
//! | [`IdentifierLookup`] | Which integer id does a key or composite identifier denote? |
//! | [`NodeStore`] | What is the node with this id, if any? |
//! | [`PermissionSource`] | Which [`Permission`]s does a [`Principal`] hold on a path? |
//!
//! [`MemoryContentStore`] and [`GroupPermissions`] implement them in memory.

mod error;
pub use error::*;

mod node;
pub use node::*;

mod udi;
pub use udi::*;

mod permission;
pub use permission::*;

mod principal;
pub use principal::*;

mod service;
pub use service::*;

mod memory;
pub use memory::*;

mod grants;
pub use grants::*;
