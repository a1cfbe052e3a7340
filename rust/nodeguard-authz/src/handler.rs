use nodeguard_content::{ContentNode, IdentifierLookup, NodeStore, Permission, PermissionSource};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::{
    AbsentNodePolicy, AuthorizationConfig, ContentPermissions, NodeTarget,
    NodeguardAuthorizationError, RequestContext, Verdict, resolve_node_id,
};

/// Permissions an operation needs on the node named by the request's query
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPermissionRequirement {
    parameter_names: NonEmpty<String>,
    permissions: NonEmpty<Permission>,
}

impl ContentPermissionRequirement {
    /// A requirement reading the node identifier from the first of
    /// `parameter_names` that is present.
    pub fn new(parameter_names: NonEmpty<String>, permissions: NonEmpty<Permission>) -> Self {
        Self {
            parameter_names,
            permissions,
        }
    }

    /// A requirement for a single permission on the node named by a single
    /// query parameter.
    pub fn single(parameter_name: impl Into<String>, permission: Permission) -> Self {
        Self::new(
            NonEmpty::new(parameter_name.into()),
            NonEmpty::new(permission),
        )
    }

    /// The query parameters that may carry the node identifier, in order.
    pub fn parameter_names(&self) -> &NonEmpty<String> {
        &self.parameter_names
    }

    /// The permissions that must all be held.
    pub fn permissions(&self) -> &NonEmpty<Permission> {
        &self.permissions
    }
}

/// Result of authorizing a request against a content node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationOutcome {
    /// The user may perform the operation
    Authorized,
    /// The user may not perform the operation
    Forbidden,
    /// The node does not exist and the check does not apply; the operation
    /// goes ahead and reports the missing node itself
    NotApplicable,
    /// The node does not exist and the check fails because of it
    NotFound,
}

impl AuthorizationOutcome {
    /// Whether request handling may go ahead.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authorized | Self::NotApplicable)
    }

    /// The HTTP status an API layer answers a failed check with, or `200`
    /// when the check succeeded.
    pub fn status(&self) -> u16 {
        match self {
            Self::Authorized | Self::NotApplicable => 200,
            Self::Forbidden => 403,
            Self::NotFound => 404,
        }
    }
}

/// Authorizes requests against content nodes.
///
/// Nodes can be targeted directly ([`ContentAuthorizer::authorize`]) or
/// through an identifier in the query string
/// ([`ContentAuthorizer::authorize_query`]). When a check that loaded a node
/// succeeds, the node is stored in [`RequestContext::items`] for later stages
/// of request handling, and later checks in the same request reuse it.
#[derive(Debug, Clone)]
pub struct ContentAuthorizer<S> {
    permissions: ContentPermissions<S>,
    config: AuthorizationConfig,
}

impl<S> ContentAuthorizer<S>
where
    S: IdentifierLookup + NodeStore + PermissionSource,
{
    /// Create an authorizer consulting `services`.
    pub fn new(services: S, config: AuthorizationConfig) -> Self {
        Self {
            permissions: ContentPermissions::new(services),
            config,
        }
    }

    /// The decision engine.
    pub fn permissions(&self) -> &ContentPermissions<S> {
        &self.permissions
    }

    /// Build a requirement that reads the node identifier from the
    /// configured parameter names.
    pub fn requirement(
        &self,
        permissions: NonEmpty<Permission>,
    ) -> Result<ContentPermissionRequirement, NodeguardAuthorizationError> {
        self.config.requirement(permissions)
    }

    /// Authorize the request against the node its query string names.
    pub async fn authorize_query(
        &self,
        context: &mut RequestContext,
        requirement: &ContentPermissionRequirement,
    ) -> Result<AuthorizationOutcome, NodeguardAuthorizationError> {
        let names: Vec<&str> = requirement
            .parameter_names()
            .iter()
            .map(String::as_str)
            .collect();
        let id = resolve_node_id(&names, &context.query, self.permissions.services()).await?;

        let target = match context.items.get::<ContentNode>() {
            Some(cached) if cached.id() == id => NodeTarget::Known(cached.clone()),
            _ => NodeTarget::ById(id),
        };

        self.authorize(context, &target, requirement.permissions())
            .await
    }

    /// Authorize the request against `target`.
    pub async fn authorize(
        &self,
        context: &mut RequestContext,
        target: &NodeTarget,
        permissions: &NonEmpty<Permission>,
    ) -> Result<AuthorizationOutcome, NodeguardAuthorizationError> {
        let access = self
            .permissions
            .check(target, &context.principal, permissions)
            .await?;

        let outcome = match access.verdict {
            Verdict::Granted => AuthorizationOutcome::Authorized,
            Verdict::Denied => AuthorizationOutcome::Forbidden,
            Verdict::NotFound => match self.config.absent_node_policy {
                AbsentNodePolicy::Allow => AuthorizationOutcome::NotApplicable,
                AbsentNodePolicy::Reject => AuthorizationOutcome::NotFound,
            },
        };

        match outcome {
            AuthorizationOutcome::Forbidden => tracing::info!(
                user = %context.principal.id,
                node = %target.id(),
                "Refused access to content node"
            ),
            AuthorizationOutcome::NotApplicable | AuthorizationOutcome::NotFound => {
                tracing::debug!(
                    user = %context.principal.id,
                    node = %target.id(),
                    ?outcome,
                    "Content node does not exist"
                )
            }
            AuthorizationOutcome::Authorized => {}
        }

        if access.verdict == Verdict::Granted {
            if let Some(node) = access.node {
                context.items.insert(node);
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_outcomes_to_statuses() {
        assert_eq!(AuthorizationOutcome::Authorized.status(), 200);
        assert_eq!(AuthorizationOutcome::NotApplicable.status(), 200);
        assert_eq!(AuthorizationOutcome::Forbidden.status(), 403);
        assert_eq!(AuthorizationOutcome::NotFound.status(), 404);
        assert!(AuthorizationOutcome::NotApplicable.is_success());
        assert!(!AuthorizationOutcome::NotFound.is_success());
    }

    #[test]
    fn it_builds_single_permission_requirements() {
        let requirement = ContentPermissionRequirement::single("id", Permission::Delete);
        assert_eq!(requirement.parameter_names().head, "id");
        assert_eq!(requirement.permissions().len(), 1);
        assert_eq!(requirement.permissions().first(), &Permission::Delete);
    }
}
