//! Domain layer modules
//!
//! This module contains business domain logic:
//! - `template`: Email template registry, variable resolution and rendering

pub mod template;
