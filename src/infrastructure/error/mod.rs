use thiserror::Error;

use crate::telemetry::TelemetryError;
use crate::template::{SeedError, TemplateError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Template seed error: {0}")]
    Seed(#[from] SeedError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

impl AppError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Telemetry(_) => "TELEMETRY_ERROR",
            AppError::Seed(_) => "SEED_ERROR",
            AppError::Template(TemplateError::NotFound(_)) => "TEMPLATE_NOT_FOUND",
            AppError::Template(TemplateError::AlreadyExists(_)) => "TEMPLATE_EXISTS",
            AppError::Template(TemplateError::ConstantOverride(_)) => "CONSTANT_OVERRIDE",
            AppError::Template(TemplateError::RequiredValueMissing(_)) => "REQUIRED_VALUE_MISSING",
            AppError::Template(TemplateError::FromAddressNotAuthorized(_)) => {
                "FROM_ADDRESS_NOT_AUTHORIZED"
            }
            AppError::Template(TemplateError::MissingAuthorizationUser(_)) => {
                "MISSING_AUTHORIZATION_USER"
            }
            AppError::Template(TemplateError::RenderFailure { .. }) => "RENDER_FAILURE",
            AppError::Template(TemplateError::RenderTimeout { .. }) => "RENDER_TIMEOUT",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
