//! End-to-end template tests
//!
//! These tests drive the registry and renderer through the public API only,
//! the way a sending service would use them.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};

use mailpress_templates::app::AppState;
use mailpress_templates::config::Settings;
use mailpress_templates::template::{
    create_template_registry, resolve_context, AuthorizationUser, EmailAddress, EmailAddressType,
    EmailEnvelope, HtmlMinifier, Minifier, MinifyOptions, TemplateDefinition, TemplateError,
    TemplateRegistry, TemplateRenderer, TemplateVariableValues, VariableDefinition,
};

fn values(raw: Value) -> TemplateVariableValues {
    match raw {
        Value::Object(map) => map,
        _ => panic!("values must be an object"),
    }
}

/// A template using every optional field
fn order_confirmation() -> TemplateDefinition {
    let mut variables = HashMap::new();
    variables.insert("name".to_string(), VariableDefinition::required());
    variables.insert("total".to_string(), VariableDefinition::required());
    variables.insert("currency".to_string(), VariableDefinition::with_default("EUR"));
    variables.insert(
        "footer".to_string(),
        VariableDefinition::constant("Shop GmbH, Vienna"),
    );

    TemplateDefinition {
        content: r#"<!DOCTYPE html>
<html>
  <body>
    <!-- greeting -->
    <h1>Thank you, {{ name }}!</h1>
    <p>Your total: <strong>{{ total|format_currency(currency) }}</strong></p>
    <p class="">{{ note }}</p>
    <footer>{{ footer }}</footer>
  </body>
</html>
"#
        .to_string(),
        variables,
        envelope: Some(EmailEnvelope {
            from: Some(EmailAddress::email("orders@shop.example")),
            to: Some(vec![EmailAddress {
                value: "user-42".to_string(),
                address_type: EmailAddressType::UserId,
            }]),
            subject: Some("Your order".to_string()),
            reply_to: Some(EmailAddress::email("support@shop.example")),
        }),
        verify_reply_to: Some(true),
        authorization_user: Some(AuthorizationUser {
            id: "svc-orders".to_string(),
            authorization: "token-123".to_string(),
        }),
        confirmation_template_id: Some("order-confirmation-receipt".to_string()),
    }
}

#[test]
fn test_round_trip_preserves_every_field() {
    let registry = TemplateRegistry::new();
    registry
        .register("order-confirmation", order_confirmation())
        .unwrap();

    let fetched = registry.get("order-confirmation").unwrap();
    assert_eq!(*fetched, order_confirmation());

    // The serialized form survives a JSON round trip as well
    let json = serde_json::to_value(&*fetched).unwrap();
    let decoded: TemplateDefinition = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, order_confirmation());
}

#[test]
fn test_duplicate_registration_keeps_first_definition() {
    let registry = TemplateRegistry::new();
    registry
        .register("order-confirmation", order_confirmation())
        .unwrap();

    let second = registry.register("order-confirmation", TemplateDefinition::new("replaced"));
    assert!(matches!(second, Err(TemplateError::AlreadyExists(_))));
    assert_eq!(
        *registry.get("order-confirmation").unwrap(),
        order_confirmation()
    );
}

#[test]
fn test_full_render_pipeline() {
    let registry = create_template_registry();
    registry
        .register("order-confirmation", order_confirmation())
        .unwrap();
    let renderer = TemplateRenderer::with_defaults(registry);

    let bound = renderer.bind("order-confirmation").unwrap();
    let output = bound
        .render(&values(json!({
            "name": "Ada",
            "total": 1234.5,
            "currency": "USD",
            "note": "",
            "is_admin": true
        })))
        .unwrap();

    assert_eq!(
        output,
        "<!doctype html><html><body><h1>Thank you, Ada!</h1>\
         <p>Your total: <strong>$\u{a0}1.234,50</strong></p>\
         <footer>Shop GmbH, Vienna</footer></body></html>"
    );

    // Falsy currency falls back to the declared default
    let output = bound
        .render(&values(json!({"name": "Ada", "total": 5, "currency": ""})))
        .unwrap();
    assert!(output.contains("€\u{a0}5,00"));
}

#[test]
fn test_constant_and_required_rules_through_renderer() {
    let registry = create_template_registry();
    registry
        .register("order-confirmation", order_confirmation())
        .unwrap();
    let renderer = TemplateRenderer::with_defaults(registry);

    let overridden = renderer.render(
        "order-confirmation",
        &values(json!({"name": "Ada", "total": 1, "footer": "Evil Corp"})),
    );
    assert!(matches!(
        overridden,
        Err(TemplateError::ConstantOverride(name)) if name == "footer"
    ));

    let missing = renderer.render("order-confirmation", &values(json!({"name": "Ada"})));
    assert!(matches!(
        missing,
        Err(TemplateError::RequiredValueMissing(name)) if name == "total"
    ));
}

#[test]
fn test_resolved_context_only_has_declared_keys() {
    let template = order_confirmation();
    let context = resolve_context(
        &template,
        &values(json!({
            "name": "Ada",
            "total": 10,
            "unknown": "x",
            "note": "not declared"
        })),
    )
    .unwrap();

    for key in context.keys() {
        assert!(template.variables.contains_key(key), "unexpected key {}", key);
    }
    assert_eq!(context.len(), template.variables.len());
}

#[test]
fn test_envelope_and_authorization() {
    let registry = create_template_registry();
    registry
        .register("order-confirmation", order_confirmation())
        .unwrap();
    registry
        .register(
            "contact-form",
            TemplateDefinition::new("{{ message }}").with_envelope(EmailEnvelope {
                from: Some(EmailAddress::email("a@b.com")),
                ..EmailEnvelope::default()
            }),
        )
        .unwrap();
    let renderer = TemplateRenderer::with_defaults(registry);

    let envelope = renderer.envelope("order-confirmation").unwrap().unwrap();
    assert_eq!(envelope.subject.as_deref(), Some("Your order"));
    assert_eq!(renderer.authorization_user("order-confirmation").unwrap().id, "svc-orders");

    assert!(matches!(
        renderer.authorization_user("contact-form"),
        Err(TemplateError::FromAddressNotAuthorized(address)) if address == "a@b.com"
    ));
    assert!(matches!(
        renderer.authorization_user("unknown"),
        Err(TemplateError::NotFound(_))
    ));
}

#[test]
fn test_parallel_renders_share_one_registry() {
    let registry = create_template_registry();
    registry
        .register(
            "welcome",
            TemplateDefinition::new("<p>Hello {{name}}</p>")
                .with_variable("name", VariableDefinition::required()),
        )
        .unwrap();
    let renderer = Arc::new(TemplateRenderer::with_defaults(registry));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let renderer = renderer.clone();
            thread::spawn(move || {
                renderer
                    .render("welcome", &values(json!({ "name": format!("user-{}", i) })))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("<p>Hello user-{}</p>", i));
    }
}

#[test]
fn test_minifying_rendered_output_is_stable() {
    let registry = create_template_registry();
    registry
        .register("order-confirmation", order_confirmation())
        .unwrap();
    let renderer = TemplateRenderer::with_defaults(registry);

    let output = renderer
        .render(
            "order-confirmation",
            &values(json!({"name": "Ada", "total": 99.99, "note": "Gift wrap"})),
        )
        .unwrap();

    let again = HtmlMinifier
        .minify(&output, &MinifyOptions::default())
        .unwrap();
    assert_eq!(again, output);
}

#[tokio::test]
async fn test_app_state_seeds_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!([
            {
                "id": "welcome",
                "template": {
                    "content": "Hello {{name}}",
                    "variables": { "name": { "isRequired": true } }
                }
            },
            {
                "id": "promo",
                "template": {
                    "content": "<p>{{ discount|format_currency }} off</p>",
                    "variables": { "discount": { "isConstant": true, "defaultValue": 10 } }
                }
            }
        ])
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.templates.seed_path = Some(file.path().to_string_lossy().into_owned());

    let state = AppState::new(settings).unwrap();
    assert_eq!(state.registry.len(), 2);

    assert_eq!(
        state.render("welcome", values(json!({"name": "Ada"}))).await.unwrap(),
        "Hello Ada"
    );
    assert!(matches!(
        state.render("welcome", values(json!({}))).await,
        Err(TemplateError::RequiredValueMissing(name)) if name == "name"
    ));
    assert_eq!(
        state.render("promo", values(json!({}))).await.unwrap(),
        "<p>€\u{a0}10,00 off</p>"
    );
    assert!(matches!(
        state.render("promo", values(json!({"discount": 5}))).await,
        Err(TemplateError::ConstantOverride(name)) if name == "discount"
    ));
}
