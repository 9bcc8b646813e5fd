use serde_json::{Map, Value, json};

use crate::form::Form;
use crate::registry::RegistryEntry;
use crate::widget::WidgetView;

/// Render the form as a structured JSON-friendly value.
pub fn render_json_ui(form: &Form) -> Value {
    let sections = form
        .sections()
        .iter()
        .map(|section| {
            let fields = section
                .fields
                .iter()
                .filter_map(|name| form.registry().get(name))
                .map(field_json)
                .collect::<Vec<_>>();
            json!({
                "name": section.name,
                "open": section.open,
                "fields": fields,
            })
        })
        .collect::<Vec<_>>();

    let footer = form
        .footer()
        .iter()
        .map(|label| json!({ "label": label }))
        .collect::<Vec<_>>();

    json!({
        "blade_type": form.blade_type(),
        "title": form.title(),
        "sections": sections,
        "footer": footer,
    })
}

fn field_json(entry: &RegistryEntry) -> Value {
    let widget = entry.widget();
    let mut map = Map::new();
    map.insert(
        "name".into(),
        Value::String(entry.definition().field_name.clone()),
    );
    map.insert(
        "type".into(),
        Value::String(widget.field_type().as_tag().to_string()),
    );
    map.insert("mandatory".into(), Value::Bool(entry.container().mandatory));
    map.insert("hidden".into(), Value::Bool(entry.container().is_hidden()));
    map.insert("value".into(), widget.value());
    map.insert(
        "view".into(),
        serde_json::to_value(widget.render()).unwrap_or(Value::Null),
    );
    Value::Object(map)
}

/// Render the form as human-friendly text.
///
/// Closed sections show only their header; hidden fields are listed after
/// the visible ones of an open section.
pub fn render_text(form: &Form) -> String {
    let mut lines = Vec::new();
    match form.title() {
        Some(title) => lines.push(format!("Blade: {} ({})", title, form.blade_type())),
        None => lines.push(format!("Blade: {}", form.blade_type())),
    }

    for section in form.sections() {
        let marker = if section.open { "-" } else { "+" };
        lines.push(format!("[{}] {}", marker, section.name));
        if !section.open {
            continue;
        }

        let entries = section
            .fields
            .iter()
            .filter_map(|name| form.registry().get(name))
            .collect::<Vec<_>>();

        for entry in entries.iter().filter(|entry| !entry.container().is_hidden()) {
            let mut line = format!("  {}", entry.container().label);
            if entry.container().mandatory {
                line.push_str(" *");
            }
            line.push_str(&format!(": {}", view_to_display(&entry.widget().render())));
            lines.push(line);
        }

        let hidden = entries
            .iter()
            .filter(|entry| entry.container().is_hidden())
            .map(|entry| entry.container().label.as_str())
            .collect::<Vec<_>>();
        if !hidden.is_empty() {
            lines.push(format!("  (hidden: {})", hidden.join(", ")));
        }
    }

    if !form.footer().is_empty() {
        let actions = form
            .footer()
            .iter()
            .map(|label| format!("<{}>", label))
            .collect::<Vec<_>>();
        lines.push(format!("Actions: {}", actions.join(" ")));
    }

    lines.join("\n")
}

fn view_to_display(view: &WidgetView) -> String {
    match view {
        WidgetView::TextInput { value } | WidgetView::DateInput { value } => value.clone(),
        WidgetView::Select { selected, options } => options
            .iter()
            .find(|option| option.selected)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| selected.clone()),
        WidgetView::MultiSelect { summary, .. } => summary.clone(),
        WidgetView::Switch { checked: true } => "on".to_string(),
        WidgetView::Switch { checked: false } => "off".to_string(),
    }
}
