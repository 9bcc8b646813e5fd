use std::io;
use std::path::PathBuf;

use blade_form::{
    Blade, Form, FormOptions, SchemaSet, VisibilityMode, mount_blades, render_json_ui,
    render_text, schema_document,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Number, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Blade form renderer",
    long_about = "Builds blade forms from a schema file, applies value changes and prints the resulting form"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Build one blade, apply value changes in order and print the form.
    Render(RenderArgs),
    /// Build every schema in a file and report problems.
    Check {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
    },
    /// Print the JSON Schema of the schema file format.
    Schema,
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blades=warn,blade_form=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Check { schema } => run_check(schema),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema_document())?);
            Ok(())
        }
    }
}

#[derive(Args)]
struct RenderArgs {
    /// Path to the schema JSON (a list of blade schemas or a single one).
    #[arg(long, value_name = "SCHEMA")]
    schema: PathBuf,
    /// Blade type to mount.
    #[arg(long, value_name = "TYPE")]
    blade: String,
    /// Field assignment; the value is parsed as JSON and falls back to text.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,
    /// Open or close a section before printing.
    #[arg(long = "toggle-section", value_name = "SECTION")]
    toggle_sections: Vec<String>,
    /// Invoke a footer action after the assignments.
    #[arg(long, value_name = "LABEL")]
    action: Option<String>,
    /// Re-evaluate visibility until stable instead of a single pass.
    #[arg(long)]
    fixed_point: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = RenderMode::Text)]
    format: RenderMode,
}

fn run_render(args: RenderArgs) -> CliResult<()> {
    let schemas = SchemaSet::from_path(&args.schema)?;
    let options = FormOptions {
        visibility_mode: visibility_mode(args.fixed_point),
    };

    let mut blades = vec![Blade::new(args.blade.clone())];
    if mount_blades(&schemas, &mut blades, options)? == 0 {
        return Err(format!("no schema declares blade type '{}'", args.blade).into());
    }
    let mut form = blades
        .pop()
        .and_then(Blade::into_form)
        .ok_or("blade has no form")?;

    for raw in &args.assignments {
        let (name, value) = parse_assignment(raw)?;
        let changes = form.set_value(&name, value)?;
        for change in changes {
            tracing::info!(
                field = %change.field,
                visible = change.visible,
                "visibility changed"
            );
        }
    }

    for section in &args.toggle_sections {
        form.toggle_section(section)?;
    }

    if let Some(label) = &args.action {
        let invoked = form.invoke_action(label)?;
        eprintln!("{}", invoked.message);
    }

    print_form(&form, args.format)
}

fn print_form(form: &Form, format: RenderMode) -> CliResult<()> {
    match format {
        RenderMode::Text => println!("{}", render_text(form)),
        RenderMode::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json_ui(form))?)
        }
    }
    Ok(())
}

fn run_check(schema_path: PathBuf) -> CliResult<()> {
    let schemas = SchemaSet::from_path(&schema_path)?;
    let mut failures = 0;

    for schema in schemas.iter() {
        match Form::build(schema) {
            Ok(form) => {
                println!(
                    "ok {}: {} fields in {} sections",
                    schema.blade_type,
                    form.registry().len(),
                    form.sections().len()
                );
                for warning in unresolved_rules(&form) {
                    println!("  warning: {}", warning);
                }
            }
            Err(err) => {
                failures += 1;
                println!("error {}: {}", schema.blade_type, err);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} schema(s) failed to build", failures).into());
    }
    Ok(())
}

/// Display rules whose controlling field does not exist; these always show.
fn unresolved_rules(form: &Form) -> Vec<String> {
    form.registry()
        .iter()
        .filter_map(|entry| {
            let rule = entry.definition().display_rule.as_ref()?;
            if form.registry().contains(&rule.field_name) {
                None
            } else {
                Some(format!(
                    "'{}' depends on unknown field '{}' and is always visible",
                    entry.definition().field_name,
                    rule.field_name
                ))
            }
        })
        .collect()
}

fn visibility_mode(fixed_point: bool) -> VisibilityMode {
    if fixed_point {
        VisibilityMode::FixedPoint
    } else {
        VisibilityMode::SinglePass
    }
}

fn parse_assignment(raw: &str) -> CliResult<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", raw).into());
    }
    Ok((name.to_string(), parse_value_literal(value)))
}

fn parse_value_literal(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(int_val) = trimmed.parse::<i64>() {
        return Value::Number(Number::from(int_val));
    }
    if let Ok(json_val) = serde_json::from_str::<Value>(trimmed) {
        return json_val;
    }
    Value::String(trimmed.to_string())
}
