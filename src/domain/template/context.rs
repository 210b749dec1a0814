//! Resolution of caller-supplied values against variable declarations

use serde_json::Value;

use super::types::{
    RenderContext, TemplateDefinition, TemplateError, TemplateResult, TemplateVariableValues,
};

/// Build the rendering context for `template` from caller `values`.
///
/// Only declared variables end up in the context. Declarations are visited
/// in name order so the reported error is stable when several are invalid.
pub fn resolve_context(
    template: &TemplateDefinition,
    values: &TemplateVariableValues,
) -> TemplateResult<RenderContext> {
    let mut names: Vec<&String> = template.variables.keys().collect();
    names.sort();

    let mut context = RenderContext::new();

    for name in names {
        let variable = &template.variables[name];
        let provided = values.get(name.as_str());

        if variable.constant_flag() && provided.is_some() {
            return Err(TemplateError::ConstantOverride(name.clone()));
        }

        if variable.required_flag() && !variable.constant_flag() && provided.is_none() {
            return Err(TemplateError::RequiredValueMissing(name.clone()));
        }

        // Falsy overrides fall through to the default.
        let resolved = provided
            .filter(|value| !is_falsy(value))
            .or(variable.default_value.as_ref())
            .cloned()
            .unwrap_or(Value::Null);

        context.insert(name.clone(), resolved);
    }

    Ok(context)
}

/// `null`, `false`, zero and `""` count as "not provided"
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
