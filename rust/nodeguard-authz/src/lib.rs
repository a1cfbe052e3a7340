//! Content node permission checks for back-office requests.
//!
//! Before an operation on a content node runs, the request it came with is
//! checked against the permissions the operation needs. The check runs in two
//! steps:
//!
//! 1. **Resolve.** When the node is not already known, its identifier is
//!    taken from the first present of a list of query parameters and
//!    normalized into an integer [`NodeId`](nodeguard_content::NodeId). The
//!    identifier may be an integer, a composite identifier
//!    (`umb://document/<guid>`) or a key. See [`NodeIdentifier`].
//! 2. **Decide.** [`ContentPermissions`] loads the node if needed and returns
//!    a [`Verdict`]: `Granted`, `Denied`, or `NotFound` when there is no such
//!    node.
//!
//! [`ContentAuthorizer`] runs both steps against a [`RequestContext`] and
//! turns the verdict into an [`AuthorizationOutcome`].
//!
//! # Example
//!
//! ```
//! # extern crate alloc;
//! # use nodeguard_authz::*;
//! # use nodeguard_content::*;
//! # use nonempty::nonempty;
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let store = MemoryContentStore::new();
//! store
//!     .insert(ContentNode::at_root(NodeId(1234), NodeKey::generate(), "Home"))
//!     .await?;
//!
//! let grants = GroupPermissions::new();
//! grants
//!     .define_group("editor", Permission::parse_codes("FAU")?)
//!     .await;
//!
//! let authorizer = ContentAuthorizer::new(
//!     Services::new(store.clone(), store, grants),
//!     AuthorizationConfig::default(),
//! );
//!
//! let editor = Principal::new(UserId(1), "editor")
//!     .in_group("editor")
//!     .starting_at(NodeId::ROOT);
//! let mut context = RequestContext::new(editor, QueryString::parse("id=1234"));
//!
//! let requirement = authorizer.requirement(nonempty![Permission::Publish])?;
//! let outcome = authorizer.authorize_query(&mut context, &requirement).await?;
//!
//! assert_eq!(outcome, AuthorizationOutcome::Authorized);
//! assert!(context.items.get::<ContentNode>().is_some());
//! # Ok(())
//! # }
//! ```

extern crate alloc;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod context;
pub use context::*;

mod resolver;
pub use resolver::*;

mod engine;
pub use engine::*;

mod services;
pub use services::*;

mod handler;
pub use handler::*;
