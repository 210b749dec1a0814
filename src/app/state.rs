use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::template::{
    create_template_registry, load_seed_file, seed_registry, HtmlMinifier, MiniJinjaEngine,
    RenderPipeline, TemplateRegistry, TemplateRenderer, TemplateResult, TemplateVariableValues,
};

/// Process-wide template state, built once at startup and shared by handle
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<TemplateRegistry>,
    pub renderer: TemplateRenderer,
}

impl AppState {
    /// Build the registry and renderer, registering seed templates if a seed
    /// file is configured
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = create_template_registry();

        if let Some(path) = &settings.templates.seed_path {
            let seeds = load_seed_file(path)?;
            let registered = seed_registry(&registry, seeds)?;
            tracing::info!(path = %path, templates = registered, "Seed templates registered");
        }

        let pipeline = RenderPipeline::new(
            Arc::new(MiniJinjaEngine::new(settings.render.default_currency.clone())),
            Arc::new(HtmlMinifier),
            settings.minify,
        );
        let renderer = TemplateRenderer::new(registry.clone(), Arc::new(pipeline));

        Ok(Self {
            settings: Arc::new(settings),
            registry,
            renderer,
        })
    }

    /// Render `id` within the configured render deadline
    pub async fn render(&self, id: &str, values: TemplateVariableValues) -> TemplateResult<String> {
        self.renderer
            .bind(id)?
            .render_with_timeout(values, self.settings.render.timeout())
            .await
    }
}
