use nodeguard_content::Permission;
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::{ContentPermissionRequirement, NodeguardAuthorizationError};

/// How a check treats a node identifier that does not resolve to any node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbsentNodePolicy {
    /// The check does not apply and succeeds; the operation itself reports
    /// the missing node.
    #[default]
    Allow,
    /// The check fails with a not-found outcome.
    Reject,
}

/// Configuration for a [`ContentAuthorizer`](crate::ContentAuthorizer).
///
/// ```
/// use nodeguard_authz::{AbsentNodePolicy, AuthorizationConfig};
///
/// let config = AuthorizationConfig::from_json(
///     r#"{ "parameter_names": ["id", "contentId"], "absent_node_policy": "reject" }"#,
/// ).unwrap();
/// assert_eq!(config.absent_node_policy, AbsentNodePolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationConfig {
    /// Query parameters that may carry the node identifier, in the order
    /// they are tried.
    pub parameter_names: Vec<String>,

    /// What to do when the identifier does not resolve to a node.
    pub absent_node_policy: AbsentNodePolicy,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            parameter_names: vec!["id".to_string()],
            absent_node_policy: AbsentNodePolicy::default(),
        }
    }
}

impl AuthorizationConfig {
    /// Load a configuration from JSON. Omitted fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, NodeguardAuthorizationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|error| NodeguardAuthorizationError::Configuration(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be used to build requirements.
    pub fn validate(&self) -> Result<(), NodeguardAuthorizationError> {
        if self.parameter_names.is_empty() {
            return Err(NodeguardAuthorizationError::Configuration(
                "at least one parameter name is required".into(),
            ));
        }
        if let Some(blank) = self.parameter_names.iter().find(|name| name.trim().is_empty()) {
            return Err(NodeguardAuthorizationError::Configuration(format!(
                "parameter name {blank:?} is blank"
            )));
        }
        Ok(())
    }

    /// Build a requirement that reads the node identifier from the configured
    /// parameter names.
    pub fn requirement(
        &self,
        permissions: NonEmpty<Permission>,
    ) -> Result<ContentPermissionRequirement, NodeguardAuthorizationError> {
        self.validate()?;
        let parameter_names =
            NonEmpty::from_vec(self.parameter_names.clone()).ok_or_else(|| {
                NodeguardAuthorizationError::Configuration(
                    "at least one parameter name is required".into(),
                )
            })?;
        Ok(ContentPermissionRequirement::new(parameter_names, permissions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonempty::nonempty;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_defaults_omitted_fields() -> anyhow::Result<()> {
        let config = AuthorizationConfig::from_json("{}")?;
        assert_eq!(config, AuthorizationConfig::default());
        assert_eq!(config.parameter_names, vec!["id".to_string()]);
        assert_eq!(config.absent_node_policy, AbsentNodePolicy::Allow);
        Ok(())
    }

    #[test]
    fn it_rejects_empty_parameter_lists() {
        let result = AuthorizationConfig::from_json(r#"{ "parameter_names": [] }"#);
        assert!(matches!(
            result,
            Err(NodeguardAuthorizationError::Configuration(_))
        ));

        let result = AuthorizationConfig::from_json(r#"{ "parameter_names": ["id", " "] }"#);
        assert!(matches!(
            result,
            Err(NodeguardAuthorizationError::Configuration(_))
        ));
    }

    #[test]
    fn it_rejects_malformed_json() {
        let result = AuthorizationConfig::from_json(r#"{ "absent_node_policy": "shrug" }"#);
        assert!(matches!(
            result,
            Err(NodeguardAuthorizationError::Configuration(_))
        ));
    }

    #[test]
    fn it_builds_requirements_from_the_configured_names() -> anyhow::Result<()> {
        let config = AuthorizationConfig {
            parameter_names: vec!["id".into(), "contentId".into()],
            ..Default::default()
        };
        let requirement = config.requirement(nonempty![Permission::Publish])?;
        assert_eq!(
            requirement.parameter_names(),
            &nonempty!["id".to_string(), "contentId".to_string()]
        );
        assert_eq!(requirement.permissions(), &nonempty![Permission::Publish]);
        Ok(())
    }
}
