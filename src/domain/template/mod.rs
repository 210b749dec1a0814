mod context;
mod currency;
mod engine;
mod minify;
mod registry;
mod renderer;
mod seed;
mod types;

pub use context::{is_falsy, resolve_context};
pub use currency::{format_currency, CurrencyError};
pub use engine::{
    EngineError, ExpressionEngine, MiniJinjaEngine, DEFAULT_CURRENCY, FORMAT_CURRENCY_FILTER,
};
pub use minify::{HtmlMinifier, Minifier, MinifyError, MinifyOptions};
pub use registry::{create_template_registry, TemplateRegistry};
pub use renderer::{BoundTemplate, RenderPipeline, TemplateRenderer};
pub use seed::{load_seed_file, seed_registry, SeedError, SeedTemplate};
pub use types::{
    AuthorizationUser, EmailAddress, EmailAddressType, EmailEnvelope, RenderCause, RenderContext,
    TemplateDefinition, TemplateError, TemplateRegistryEntry, TemplateResult,
    TemplateVariableValues, VariableDefinition,
};
