//! Template types and error definitions

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::EngineError;
use super::minify::MinifyError;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Template variable {0} is constant and cannot be overridden")]
    ConstantOverride(String),

    #[error("No value provided for required template variable {0}")]
    RequiredValueMissing(String),

    #[error("From address {0} is not authorized")]
    FromAddressNotAuthorized(String),

    #[error("Template with id {0} does not have an authorizationUser")]
    MissingAuthorizationUser(String),

    #[error("Failed to render template with id {id}: {cause}")]
    RenderFailure {
        id: String,
        #[source]
        cause: RenderCause,
    },

    #[error("Rendering template with id {id} exceeded {timeout:?}")]
    RenderTimeout { id: String, timeout: Duration },
}

impl TemplateError {
    /// Stable, low-cardinality name of the error kind (used for metrics/logs)
    pub fn kind(&self) -> &'static str {
        match self {
            TemplateError::NotFound(_) => "not_found",
            TemplateError::AlreadyExists(_) => "already_exists",
            TemplateError::ConstantOverride(_) => "constant_override",
            TemplateError::RequiredValueMissing(_) => "required_value_missing",
            TemplateError::FromAddressNotAuthorized(_) => "from_address_not_authorized",
            TemplateError::MissingAuthorizationUser(_) => "missing_authorization_user",
            TemplateError::RenderFailure { .. } => "render_failure",
            TemplateError::RenderTimeout { .. } => "render_timeout",
        }
    }
}

/// Unclassified failure raised while evaluating or minifying a template
#[derive(Debug, Error)]
pub enum RenderCause {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Minify(#[from] MinifyError),

    #[error("render task aborted: {0}")]
    Aborted(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Caller-supplied variable values, keyed by variable name
pub type TemplateVariableValues = serde_json::Map<String, serde_json::Value>;

/// Resolved variables handed to the expression engine
pub type RenderContext = serde_json::Map<String, serde_json::Value>;

/// Declaration of a single template variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    /// Value used when the caller does not provide one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_constant: Option<bool>,
}

impl VariableDefinition {
    /// A variable the caller must supply
    pub fn required() -> Self {
        Self {
            is_required: Some(true),
            ..Self::default()
        }
    }

    /// A variable fixed to `value`; callers may not override it
    pub fn constant(value: impl Into<serde_json::Value>) -> Self {
        Self {
            default_value: Some(value.into()),
            is_constant: Some(true),
            ..Self::default()
        }
    }

    /// An optional variable falling back to `value`
    pub fn with_default(value: impl Into<serde_json::Value>) -> Self {
        Self {
            default_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn required_flag(&self) -> bool {
        self.is_required.unwrap_or(false)
    }

    pub fn constant_flag(&self) -> bool {
        self.is_constant.unwrap_or(false)
    }
}

/// How an envelope address should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailAddressType {
    /// A literal mailbox address
    EmailAddress,
    /// Identifier of a stored email address
    EmailId,
    /// Identifier of a user whose primary address is used
    UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub value: String,
    #[serde(rename = "type")]
    pub address_type: EmailAddressType,
}

impl EmailAddress {
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            address_type: EmailAddressType::EmailAddress,
        }
    }
}

/// Header metadata sent alongside the rendered body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<EmailAddress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<EmailAddress>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<EmailAddress>,
}

/// Identity used to authorize sending on behalf of the envelope sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationUser {
    pub id: String,
    pub authorization: String,
}

/// A transactional email template definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    /// Template source (Jinja-style expressions)
    pub content: String,

    /// Declared variables, keyed by name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, VariableDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<EmailEnvelope>,

    /// Whether reply-to must be checked against the sender's authorized
    /// addresses. Enforcement happens outside this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_reply_to: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_user: Option<AuthorizationUser>,

    /// Template sent as confirmation; not checked for existence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_template_id: Option<String>,
}

impl TemplateDefinition {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Builder-style variable declaration
    pub fn with_variable(mut self, name: impl Into<String>, variable: VariableDefinition) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    pub fn with_envelope(mut self, envelope: EmailEnvelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn with_authorization_user(mut self, user: AuthorizationUser) -> Self {
        self.authorization_user = Some(user);
        self
    }
}

/// A registered template together with its identifier
#[derive(Debug, Clone)]
pub struct TemplateRegistryEntry {
    pub id: String,
    pub template: Arc<TemplateDefinition>,
    pub registered_at: DateTime<Utc>,
}
