//! Template expression engine.
//!
//! The renderer only depends on [`ExpressionEngine`]; [`MiniJinjaEngine`] is
//! the default backend. Templates use Jinja/Twig syntax (`{{ name }}`,
//! `{% if %}`, `{{ total|format_currency("USD") }}`).

use minijinja::{escape_formatter, Environment, Error as JinjaError, ErrorKind, Output, State, Value};
use thiserror::Error;

use super::currency::format_currency;
use super::types::RenderContext;

/// Name of the currency filter registered on every engine
pub const FORMAT_CURRENCY_FILTER: &str = "format_currency";

/// Currency used when the filter is called without a code
pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Template syntax error: {0}")]
    Syntax(String),

    #[error("Template evaluation failed: {0}")]
    Evaluation(String),
}

/// Evaluates template source against a resolved context
pub trait ExpressionEngine: Send + Sync {
    fn evaluate(&self, source: &str, context: &RenderContext) -> Result<String, EngineError>;
}

/// MiniJinja-backed expression engine
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl MiniJinjaEngine {
    /// Create an engine whose `format_currency` filter falls back to
    /// `default_currency`
    pub fn new(default_currency: impl Into<String>) -> Self {
        let default_currency = default_currency.into();
        let mut env = Environment::new();

        env.set_formatter(null_as_empty_formatter);
        env.add_filter(
            FORMAT_CURRENCY_FILTER,
            move |value: Value, currency: Option<String>| -> Result<String, JinjaError> {
                currency_filter(&value, currency.as_deref().unwrap_or(default_currency.as_str()))
            },
        );

        Self { env }
    }
}

impl ExpressionEngine for MiniJinjaEngine {
    fn evaluate(&self, source: &str, context: &RenderContext) -> Result<String, EngineError> {
        self.env.render_str(source, context).map_err(EngineError::from)
    }
}

impl From<JinjaError> for EngineError {
    fn from(err: JinjaError) -> Self {
        match err.kind() {
            ErrorKind::SyntaxError => EngineError::Syntax(err.to_string()),
            _ => EngineError::Evaluation(err.to_string()),
        }
    }
}

/// `null` prints nothing, like Twig; everything else uses the stock formatter
fn null_as_empty_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), JinjaError> {
    if value.is_none() {
        return Ok(());
    }
    escape_formatter(out, state, value)
}

fn currency_filter(value: &Value, currency: &str) -> Result<String, JinjaError> {
    let amount = amount_from(value)?;
    format_currency(amount, currency)
        .map_err(|e| JinjaError::new(ErrorKind::InvalidOperation, e.to_string()))
}

fn amount_from(value: &Value) -> Result<f64, JinjaError> {
    // Unset amounts (a falsy override resolves to null) format as zero
    if value.is_none() || value.is_undefined() {
        return Ok(0.0);
    }
    if let Some(raw) = value.as_str() {
        return raw.trim().parse::<f64>().map_err(|_| {
            JinjaError::new(
                ErrorKind::InvalidOperation,
                format!("{} expects a number, got {:?}", FORMAT_CURRENCY_FILTER, raw),
            )
        });
    }

    f64::try_from(value.clone()).map_err(|_| {
        JinjaError::new(
            ErrorKind::InvalidOperation,
            format!("{} expects a number, got {}", FORMAT_CURRENCY_FILTER, value.kind()),
        )
    })
}
