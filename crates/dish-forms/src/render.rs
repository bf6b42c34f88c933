//! Bootstrap 5 rendering of a form engine.
//!
//! Only visible fields are drawn. Touch messages appear under their input,
//! server errors as one consolidated list, and the submit button is disabled
//! while the form is invalid or a submission is in flight.

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::{Div, Li, Ul};

use crate::engine::FormEngine;
use crate::error::ServerErrors;
use crate::schema::{FieldDef, FieldKind};

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn render_select(field: &FieldDef, id: &str, value: &str, class: &str) -> String {
    let mut options = String::new();

    if let Some(placeholder) = &field.placeholder {
        let selected_attr = if value.is_empty() { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="" disabled{selected_attr}>{}</option>"#,
            html_escape(placeholder)
        ));
    }

    for option in &field.options {
        let selected_attr = if option.value == value { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{}"{selected_attr}>{}</option>"#,
            html_escape(&option.value),
            html_escape(&option.label)
        ));
    }

    let required_attr = if field.required { " required" } else { "" };
    format!(
        r#"<select class="form-select{class}" id="{}" name="{}"{required_attr}>{options}</select>"#,
        html_escape(id),
        html_escape(&field.key)
    )
}

fn render_input(field: &FieldDef, id: &str, value: &str, invalid: bool) -> String {
    let class = if invalid { " is-invalid" } else { "" };

    if field.kind == FieldKind::Enum {
        return render_select(field, id, value, class);
    }

    let mut attrs = String::new();
    if let Some(placeholder) = &field.placeholder {
        attrs.push_str(&format!(r#" placeholder="{}""#, html_escape(placeholder)));
    }
    for (name, bound) in [("min", field.min), ("max", field.max), ("step", field.step)] {
        if let Some(bound) = bound {
            attrs.push_str(&format!(r#" {name}="{bound}""#));
        }
    }
    if field.required {
        attrs.push_str(" required");
    }

    format!(
        r#"<input type="{}" class="form-control{class}" id="{}" name="{}" value="{}"{attrs}>"#,
        field.kind.input_type(),
        html_escape(id),
        html_escape(&field.key),
        html_escape(value)
    )
}

/// Renders one field with its label and touch message.
pub fn render_field(field: &FieldDef, value: &str, error: Option<&str>) -> String {
    let id = format!("id_{}", field.key);
    let label_text = field.display_label();
    let input_html = render_input(field, &id, value, error.is_some());

    let label_el = html! {
        label.for_(#id).class("form-label") { #label_text }
    };

    html! { div.class("mb-3") }
        .raw(label_el.render())
        .raw(&input_html)
        .when(error.is_some(), |d| {
            d.child::<Div, _>(|e| e.class("invalid-feedback").text(error.unwrap_or("")))
        })
        .render()
}

/// Renders server errors as `field: message` lines.
pub fn server_error_lines(errors: &ServerErrors) -> Vec<String> {
    errors
        .all_errors()
        .into_iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect()
}

/// Renders the whole form for the engine's current state.
pub fn render_form(engine: &FormEngine, action: &str, method: &str) -> String {
    let mut form = html! {
        form.action(#action).method(#method)
    };

    for field in engine.schema().visible_fields(engine.state()) {
        let value = engine.value(&field.key).unwrap_or_default();
        let field_html = render_field(field, value, engine.error(&field.key));
        form = form.child::<Div, _>(|d| d.raw(&field_html));
    }

    let disabled = !engine.is_valid() || engine.is_submitting();
    let btn = html! {
        button.type_("submit").class("btn btn-primary") {
            "Submit"
        }
    }
    .when(disabled, |b| b.attr("disabled", "disabled"));
    form = form.child::<Div, _>(|d| d.raw(btn.render()));

    let lines = server_error_lines(engine.server_errors());
    if !lines.is_empty() {
        form = form.child::<Div, _>(|d| {
            d.class("alert alert-danger")
                .attr("role", "alert")
                .child::<Ul, _>(|ul| {
                    ul.class("mb-0")
                        .children(lines.iter(), |line, li: Element<Li>| li.text(line))
                })
        });
    }

    form.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Condition, SchemaBuilder};

    fn engine() -> FormEngine {
        let schema = SchemaBuilder::new()
            .field(FieldDef::text("dishName").placeholder("Enter a dish name"))
            .field(
                FieldDef::choice("dishType", &[("Pizza", "pizza"), ("Soup", "soup")])
                    .label("Dish Type")
                    .placeholder("Select a type"),
            )
            .field(
                FieldDef::integer("spicinessScale")
                    .min(1.0)
                    .max(10.0)
                    .visible_when(Condition::equals("dishType", "soup")),
            )
            .build()
            .unwrap();
        FormEngine::new(schema)
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_render_field_no_error() {
        let field = FieldDef::decimal("diameter").min(1.0).step(0.1);
        let html = render_field(&field, "30", None);
        assert!(html.contains("form-label"));
        assert!(html.contains("Diameter"));
        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"min="1""#));
        assert!(html.contains(r#"step="0.1""#));
        assert!(html.contains(r#"value="30""#));
        assert!(!html.contains("is-invalid"));
    }

    #[test]
    fn test_render_field_escapes_key() {
        let field = FieldDef::text(r#"x" onfocus="alert(1)"#);
        let html = render_field(&field, "", None);
        assert!(html.contains(r#"name="x&quot; onfocus=&quot;alert(1)""#));

        let select = FieldDef::choice(r#"k"<"#, &[("A", "a")]);
        let html = render_field(&select, "", None);
        assert!(html.contains(r#"name="k&quot;&lt;""#));
    }

    #[test]
    fn test_render_field_with_error() {
        let field = FieldDef::text("dishName");
        let html = render_field(&field, "", Some("Dish Name is required"));
        assert!(html.contains("is-invalid"));
        assert!(html.contains("invalid-feedback"));
        assert!(html.contains("Dish Name is required"));
    }

    #[test]
    fn test_render_select() {
        let field = FieldDef::choice("dishType", &[("Pizza", "pizza"), ("Soup", "soup")])
            .placeholder("Select a type");
        let html = render_field(&field, "soup", None);
        assert!(html.contains("form-select"));
        assert!(html.contains(r#"<option value="" disabled>Select a type</option>"#));
        assert!(html.contains(r#"value="soup" selected"#));
        assert!(!html.contains(r#"value="pizza" selected"#));
    }

    #[test]
    fn test_render_form_hides_conditional_fields() {
        let mut engine = engine();
        let html = render_form(&engine, "/dishes/", "post");
        assert!(html.contains(r#"name="dishName""#));
        assert!(!html.contains(r#"name="spicinessScale""#));
        assert!(html.contains("disabled"));

        engine.set_field("dishType", "soup");
        let html = render_form(&engine, "/dishes/", "post");
        assert!(html.contains(r#"name="spicinessScale""#));
        assert!(html.contains(r#"max="10""#));
    }

    #[test]
    fn test_render_form_enabled_submit_and_server_errors() {
        let mut engine = engine();
        engine.set_field("dishName", "Borscht");
        engine.set_field("dishType", "pizza");
        assert!(engine.is_valid());

        let html = render_form(&engine, "/dishes/", "post");
        assert!(!html.contains(r#"disabled="disabled""#));
        assert!(!html.contains("alert-danger"));

        let mut errors = ServerErrors::new();
        errors.add("name", "Name already exists");
        assert_eq!(server_error_lines(&errors), vec!["name: Name already exists"]);

        engine.begin_submission().unwrap();
        engine.finish_submission(Err(crate::TransportError::Rejected(errors)));
        let html = render_form(&engine, "/dishes/", "post");
        assert!(html.contains("alert-danger"));
        assert!(html.contains("name: Name already exists"));
        assert!(html.contains(r#"value="Borscht""#));
    }
}
