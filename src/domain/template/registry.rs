//! Append-only template registry

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::types::{TemplateDefinition, TemplateError, TemplateRegistryEntry, TemplateResult};
use crate::metrics::RegistryMetrics;

struct StoredTemplate {
    sequence: u64,
    template: Arc<TemplateDefinition>,
    registered_at: DateTime<Utc>,
}

/// In-memory template registry.
///
/// Templates are registered once and live as long as the registry. There is
/// no update or delete; a changed definition is registered into a fresh
/// registry by the owning layer.
pub struct TemplateRegistry {
    templates: DashMap<String, StoredTemplate>,
    next_sequence: AtomicU64,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Register a template under `id`.
    ///
    /// The duplicate check and the insert happen under the same shard lock,
    /// so concurrent registrations of one id cannot both succeed.
    pub fn register(
        &self,
        id: impl Into<String>,
        template: TemplateDefinition,
    ) -> TemplateResult<Arc<TemplateDefinition>> {
        let id = id.into();

        match self.templates.entry(id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(template_id = %id, "Template already registered");
                Err(TemplateError::AlreadyExists(id))
            }
            Entry::Vacant(slot) => {
                let template = Arc::new(template);
                slot.insert(StoredTemplate {
                    sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
                    template: template.clone(),
                    registered_at: Utc::now(),
                });

                RegistryMetrics::record_registered();
                tracing::info!(
                    template_id = %id,
                    variables = template.variables.len(),
                    "Template registered"
                );

                Ok(template)
            }
        }
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Arc<TemplateDefinition>> {
        self.templates
            .get(id)
            .map(|stored| stored.template.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Snapshot of all templates in registration order
    pub fn list(&self) -> Vec<Arc<TemplateDefinition>> {
        self.entries()
            .into_iter()
            .map(|entry| entry.template)
            .collect()
    }

    /// Snapshot of all entries (id, template, registration time) in
    /// registration order
    pub fn entries(&self) -> Vec<TemplateRegistryEntry> {
        let mut entries: Vec<(u64, TemplateRegistryEntry)> = self
            .templates
            .iter()
            .map(|stored| {
                (
                    stored.sequence,
                    TemplateRegistryEntry {
                        id: stored.key().clone(),
                        template: stored.template.clone(),
                        registered_at: stored.registered_at,
                    },
                )
            })
            .collect();

        entries.sort_by_key(|(sequence, _)| *sequence);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Check if a template exists
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Create an Arc-wrapped template registry
pub fn create_template_registry() -> Arc<TemplateRegistry> {
    Arc::new(TemplateRegistry::new())
}
