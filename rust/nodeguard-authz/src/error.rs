use nodeguard_content::NodeguardContentError;
use thiserror::Error;

/// Errors that abort an authorization check.
///
/// A refused or inapplicable check is not an error: it is reported through
/// [`Verdict`](crate::Verdict) and [`AuthorizationOutcome`](crate::AuthorizationOutcome).
#[derive(Error, Debug)]
pub enum NodeguardAuthorizationError {
    /// None of the query parameters that may carry the node identifier were
    /// present on the request.
    #[error("Missing node identifier: none of the query parameters {names:?} are present")]
    MissingArgument {
        /// The parameter names that were looked for, in order.
        names: Vec<String>,
    },

    /// A content service failed; the underlying error is passed through as is.
    #[error(transparent)]
    Service(#[from] NodeguardContentError),

    /// The authorization configuration could not be loaded.
    #[error("Invalid authorization configuration: {0}")]
    Configuration(String),
}
