//! Loading template definitions from a JSON seed file.
//!
//! The file holds an array of `{ "id": ..., "template": { ... } }` records,
//! registered in file order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::registry::TemplateRegistry;
use super::types::{TemplateDefinition, TemplateResult};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One template record from a seed file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTemplate {
    pub id: String,
    pub template: TemplateDefinition,
}

/// Read and parse a seed file
pub fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<SeedTemplate>, SeedError> {
    let path = path.as_ref();

    let raw = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Register every seed in order, stopping at the first failure.
///
/// Returns the number of templates registered.
pub fn seed_registry(registry: &TemplateRegistry, seeds: Vec<SeedTemplate>) -> TemplateResult<usize> {
    let mut registered = 0;
    for seed in seeds {
        registry.register(seed.id, seed.template)?;
        registered += 1;
    }
    Ok(registered)
}
