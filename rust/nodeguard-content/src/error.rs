use thiserror::Error;

/// The common error type used by this crate and by the services that
/// implement its lookup contracts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeguardContentError {
    /// The backing service could not be reached
    #[error("Content service unavailable: {0}")]
    Unavailable(String),

    /// The backing service failed while answering a request
    #[error("Content service backend error: {0}")]
    Backend(String),

    /// A permission code that does not name any known permission
    #[error("Unknown permission code '{0}'")]
    InvalidPermission(char),

    /// A node path that is not a comma separated list of node ids
    #[error("Invalid node path: {0}")]
    InvalidPath(String),

    /// A node that cannot be stored because its id or key is reserved
    #[error("Node cannot be stored: {0}")]
    ReservedIdentity(String),

    /// Text that is not a well-formed composite identifier
    #[error("Invalid composite identifier: {0}")]
    InvalidComposite(String),
}
