use pretty_assertions::assert_eq;
use serde_json::json;

use blade_form::{
    Blade, DisplayRule, FieldDefinition, Form, FormError, FormOptions, FormSchema, SchemaSet,
    Section, VisibilityChange, VisibilityMode, WidgetInput, mount_blades,
};

const PROJECT_BLADE: &str = include_str!("fixtures/project_blade.json");

fn project_form() -> Form {
    let schemas = SchemaSet::from_json_str(PROJECT_BLADE).expect("fixture parses");
    let schema = schemas.find("project").expect("project schema");
    Form::build(schema).expect("build")
}

fn single_section(fields: Vec<FieldDefinition>) -> FormSchema {
    FormSchema {
        blade_type: "scratch".into(),
        title: None,
        sections: vec![Section {
            name: "Main".into(),
            fields,
        }],
        footer: vec![],
    }
}

#[test]
fn initial_render_hides_rule_chain_behind_toggle() {
    let form = project_form();
    assert_eq!(
        form.visible_fields(),
        vec![
            "Project Name",
            "Date",
            "Toggle",
            "Letter Delay",
            "SMS Delay"
        ]
    );
    assert_eq!(form.sweep_count(), 0);
}

#[test]
fn enabling_toggle_reveals_company_with_default_intact() {
    let mut form = project_form();

    let changes = form.set_value("Toggle", json!(true)).expect("set toggle");

    assert_eq!(
        changes,
        vec![VisibilityChange {
            field: "Operating Company".into(),
            visible: true
        }]
    );
    assert_eq!(form.value("Operating Company").expect("value"), json!("NexFibre"));
    assert!(!form.is_visible("Multi Select Example").expect("multi"));
}

#[test]
fn set_rule_needs_every_required_option() {
    let mut form = project_form();
    form.set_value("Toggle", json!(true)).expect("toggle");
    form.set_value("Operating Company", json!("VM02"))
        .expect("company");

    assert!(form.is_visible("Multi Select Example").expect("multi"));
    assert_eq!(
        form.value("Multi Select Example").expect("value"),
        json!(["Option 1"])
    );
    assert!(!form.is_visible("Email Delay").expect("email"));

    form.apply_input(
        "Multi Select Example",
        WidgetInput::ToggleOption("Option 2".into()),
    )
    .expect("select option 2");
    assert!(form.is_visible("Email Delay").expect("email"));

    form.set_value("Multi Select Example", json!(["Option 2"]))
        .expect("deselect option 1");
    assert!(!form.is_visible("Email Delay").expect("email"));
}

#[test]
fn hiding_the_root_hides_the_whole_chain() {
    let mut form = project_form();
    form.set_value("Toggle", json!(true)).expect("toggle");
    form.set_value("Operating Company", json!("VM02"))
        .expect("company");
    form.set_value("Multi Select Example", json!(["Option 1", "Option 2"]))
        .expect("multi");
    assert!(form.is_visible("Email Delay").expect("email"));

    form.apply_input("Toggle", WidgetInput::Check(false))
        .expect("toggle off");

    // Values are untouched; only the controller chain is hidden.
    assert_eq!(
        form.value("Operating Company").expect("company"),
        json!("VM02")
    );
    for name in ["Operating Company", "Multi Select Example", "Email Delay"] {
        assert!(!form.is_visible(name).expect("visibility"), "{name}");
    }
}

#[test]
fn scalar_rule_compares_type_and_value() {
    let mut form = Form::build(&single_section(vec![
        FieldDefinition::new("Code", "string"),
        FieldDefinition::new("Detail", "string")
            .with_rule(DisplayRule::new("Code", json!(1))),
    ]))
    .expect("build");

    form.set_value("Code", json!("1")).expect("set");
    assert!(!form.is_visible("Detail").expect("detail"));
}

#[test]
fn unknown_controller_never_hides() {
    let mut form = Form::build(&single_section(vec![
        FieldDefinition::new("Toggle", "toggle"),
        FieldDefinition::new("Orphan", "string")
            .with_rule(DisplayRule::new("Ghost", json!(true))),
    ]))
    .expect("build");
    assert!(form.is_visible("Orphan").expect("orphan"));

    form.set_value("Toggle", json!(true)).expect("toggle on");
    form.set_value("Toggle", json!(false)).expect("toggle off");
    assert!(form.is_visible("Orphan").expect("orphan"));
}

#[test]
fn unsupported_type_fails_the_build() {
    let schema = single_section(vec![
        FieldDefinition::new("Name", "string"),
        FieldDefinition::new("Budget", "currency"),
    ]);

    let err = Form::build(&schema).expect_err("currency is not a widget");
    assert!(matches!(
        err,
        FormError::UnsupportedFieldType { ref field, ref kind } if field == "Budget" && kind == "currency"
    ));

    let schemas = SchemaSet::new(vec![schema]);
    let mut blades = vec![Blade::new("scratch")];
    assert!(mount_blades(&schemas, &mut blades, FormOptions::default()).is_err());
    assert!(blades[0].form().is_none());
}

#[test]
fn programmatic_and_user_edits_sweep_once_each() {
    let mut form = project_form();

    form.set_value("Project Name", json!("Fibre rollout"))
        .expect("set");
    assert_eq!(form.sweep_count(), 1);

    form.apply_input("Project Name", WidgetInput::Text("Fibre rollout".into()))
        .expect("type");
    assert_eq!(form.sweep_count(), 2);

    form.apply_input("Multi Select Example", WidgetInput::OpenDropdown)
        .expect("open dropdown");
    assert_eq!(form.sweep_count(), 2);
}

#[test]
fn repeated_sweep_is_idempotent() {
    let mut form = project_form();
    form.set_value("Toggle", json!(true)).expect("toggle");
    let before = form.visibility();

    assert!(form.sweep().is_empty());
    assert!(form.sweep().is_empty());
    assert_eq!(form.visibility(), before);
}

#[test]
fn fixed_point_mode_settles_reverse_chains() {
    let schema = single_section(vec![
        FieldDefinition::new("Leaf", "string")
            .with_rule(DisplayRule::new("Middle", json!(""))),
        FieldDefinition::new("Middle", "string")
            .with_rule(DisplayRule::new("Root", json!(true))),
        FieldDefinition::new("Root", "toggle").with_value(json!(true)),
    ]);

    let mut single = Form::build(&schema).expect("build");
    single.set_value("Root", json!(false)).expect("root off");
    assert!(!single.is_visible("Middle").expect("middle"));
    assert!(single.is_visible("Leaf").expect("leaf"));

    let options = FormOptions {
        visibility_mode: VisibilityMode::FixedPoint,
    };
    let mut fixed = Form::build_with(&schema, options).expect("build");
    fixed.set_value("Root", json!(false)).expect("root off");
    assert!(!fixed.is_visible("Middle").expect("middle"));
    assert!(!fixed.is_visible("Leaf").expect("leaf"));
    assert_eq!(fixed.sweep_count(), 1);
}
