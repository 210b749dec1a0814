//! Transactional email template system.
//!
//! This module provides:
//! - Template definitions with declared variables (required, constant, default)
//! - An append-only in-memory registry keyed by template id
//! - Variable resolution, Jinja-style evaluation and HTML minification
//! - Envelope and authorization-user lookups
//!
//! # Example
//!
//! ```ignore
//! let registry = create_template_registry();
//!
//! registry.register(
//!     "welcome",
//!     TemplateDefinition::new("<p>Hello {{ name }}, you save {{ discount|format_currency }}</p>")
//!         .with_variable("name", VariableDefinition::required())
//!         .with_variable("discount", VariableDefinition::constant(10)),
//! )?;
//!
//! let renderer = TemplateRenderer::with_defaults(registry);
//! let welcome = renderer.bind("welcome")?;
//!
//! let mut values = TemplateVariableValues::new();
//! values.insert("name".to_string(), json!("Ada"));
//!
//! let html = welcome.render(&values)?;
//! // "<p>Hello Ada, you save € 10,00</p>"
//! ```

pub use crate::domain::template::*;
