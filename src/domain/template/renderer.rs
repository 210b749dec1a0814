//! Rendering of registered templates

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::context::resolve_context;
use super::engine::{ExpressionEngine, MiniJinjaEngine};
use super::minify::{HtmlMinifier, Minifier, MinifyOptions};
use super::registry::TemplateRegistry;
use super::types::{
    AuthorizationUser, EmailEnvelope, RenderCause, TemplateDefinition, TemplateError,
    TemplateResult, TemplateVariableValues,
};
use crate::metrics::RenderMetrics;

/// Evaluate-then-minify pipeline shared by all renders
pub struct RenderPipeline {
    engine: Arc<dyn ExpressionEngine>,
    minifier: Arc<dyn Minifier>,
    options: MinifyOptions,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(
            Arc::new(MiniJinjaEngine::default()),
            Arc::new(HtmlMinifier),
            MinifyOptions::default(),
        )
    }
}

impl RenderPipeline {
    pub fn new(
        engine: Arc<dyn ExpressionEngine>,
        minifier: Arc<dyn Minifier>,
        options: MinifyOptions,
    ) -> Self {
        Self {
            engine,
            minifier,
            options,
        }
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }

    /// Resolve variables, evaluate and minify `template`.
    ///
    /// Variable errors pass through as-is; engine and minifier failures are
    /// wrapped into [`TemplateError::RenderFailure`].
    pub fn render(
        &self,
        id: &str,
        template: &TemplateDefinition,
        values: &TemplateVariableValues,
    ) -> TemplateResult<String> {
        let context = resolve_context(template, values)?;

        let rendered = self
            .engine
            .evaluate(&template.content, &context)
            .map_err(|e| render_failure(id, e.into()))?;

        self.minifier
            .minify(&rendered, &self.options)
            .map_err(|e| render_failure(id, e.into()))
    }
}

fn render_failure(id: &str, cause: RenderCause) -> TemplateError {
    TemplateError::RenderFailure {
        id: id.to_string(),
        cause,
    }
}

/// Renders templates held by a [`TemplateRegistry`]
#[derive(Clone)]
pub struct TemplateRenderer {
    registry: Arc<TemplateRegistry>,
    pipeline: Arc<RenderPipeline>,
}

impl TemplateRenderer {
    pub fn new(registry: Arc<TemplateRegistry>, pipeline: Arc<RenderPipeline>) -> Self {
        Self { registry, pipeline }
    }

    /// Renderer using the default engine, minifier and options
    pub fn with_defaults(registry: Arc<TemplateRegistry>) -> Self {
        Self::new(registry, Arc::new(RenderPipeline::default()))
    }

    pub fn registry(&self) -> &Arc<TemplateRegistry> {
        &self.registry
    }

    /// Bind a handle to template `id`, failing fast if it is not registered
    pub fn bind(&self, id: &str) -> TemplateResult<BoundTemplate> {
        let template = self.registry.get(id)?;
        Ok(BoundTemplate {
            id: id.to_string(),
            template,
            pipeline: self.pipeline.clone(),
        })
    }

    pub fn render(&self, id: &str, values: &TemplateVariableValues) -> TemplateResult<String> {
        self.bind(id)?.render(values)
    }

    pub fn envelope(&self, id: &str) -> TemplateResult<Option<EmailEnvelope>> {
        Ok(self.bind(id)?.envelope().cloned())
    }

    pub fn authorization_user(&self, id: &str) -> TemplateResult<AuthorizationUser> {
        self.bind(id)?.authorization_user().cloned()
    }
}

/// Short-lived handle on one registered template.
///
/// Registered definitions never change, so the handle keeps the definition
/// it resolved at bind time.
#[derive(Clone)]
pub struct BoundTemplate {
    id: String,
    template: Arc<TemplateDefinition>,
    pipeline: Arc<RenderPipeline>,
}

impl BoundTemplate {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> &TemplateDefinition {
        &self.template
    }

    /// Render the template with caller `values`
    pub fn render(&self, values: &TemplateVariableValues) -> TemplateResult<String> {
        let started = Instant::now();
        let result = self.pipeline.render(&self.id, &self.template, values);
        self.record_outcome(&result, started.elapsed());
        result
    }

    /// Render on the blocking pool, giving up after `timeout`.
    ///
    /// A render that outlives `timeout` is counted once, as a timeout; its
    /// late result is discarded unrecorded.
    pub async fn render_with_timeout(
        &self,
        values: TemplateVariableValues,
        timeout: Duration,
    ) -> TemplateResult<String> {
        let started = Instant::now();
        let handle = self.clone();
        let task = tokio::task::spawn_blocking(move || {
            handle
                .pipeline
                .render(&handle.id, &handle.template, &values)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => {
                self.record_outcome(&result, started.elapsed());
                result
            }
            Ok(Err(join_error)) => {
                let result = Err(render_failure(
                    &self.id,
                    RenderCause::Aborted(join_error.to_string()),
                ));
                self.record_outcome(&result, started.elapsed());
                result
            }
            Err(_) => {
                RenderMetrics::record_failure("render_timeout", timeout);
                tracing::warn!(
                    template_id = %self.id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Template render timed out"
                );
                Err(TemplateError::RenderTimeout {
                    id: self.id.clone(),
                    timeout,
                })
            }
        }
    }

    fn record_outcome(&self, result: &TemplateResult<String>, elapsed: Duration) {
        match result {
            Ok(output) => {
                RenderMetrics::record_success(elapsed);
                tracing::debug!(
                    template_id = %self.id,
                    bytes = output.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Template rendered"
                );
            }
            Err(e) => {
                RenderMetrics::record_failure(e.kind(), elapsed);
                tracing::warn!(
                    template_id = %self.id,
                    kind = e.kind(),
                    error = %e,
                    "Template render failed"
                );
            }
        }
    }

    pub fn envelope(&self) -> Option<&EmailEnvelope> {
        self.template.envelope.as_ref()
    }

    /// Identity to authorize sending with.
    ///
    /// A template with a sender address but no authorization user must not be
    /// sent, which is reported as [`TemplateError::FromAddressNotAuthorized`].
    pub fn authorization_user(&self) -> TemplateResult<&AuthorizationUser> {
        if let Some(user) = &self.template.authorization_user {
            return Ok(user);
        }

        match self.envelope().and_then(|envelope| envelope.from.as_ref()) {
            Some(from) => Err(TemplateError::FromAddressNotAuthorized(from.value.clone())),
            None => Err(TemplateError::MissingAuthorizationUser(self.id.clone())),
        }
    }

    pub fn verify_reply_to(&self) -> bool {
        self.template.verify_reply_to.unwrap_or(false)
    }

    pub fn confirmation_template_id(&self) -> Option<&str> {
        self.template.confirmation_template_id.as_deref()
    }
}
