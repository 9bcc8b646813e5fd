//! Display-rule evaluation over a live registry.
//!
//! Visibility is decided from the controlling field's *current* container
//! state, never by re-walking its rule. A hidden controller therefore hides
//! everything that depends on it, at any depth, as long as the controller's
//! container was updated earlier in the same pass.

use std::collections::BTreeMap;

use crate::registry::Registry;
use crate::spec::field::FieldDefinition;

pub type VisibilityMap = BTreeMap<String, bool>;

/// How a change event is turned into container updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityMode {
    /// One pass over the registry in registration order. A controller
    /// registered after its dependent is seen with its pre-pass state.
    #[default]
    SinglePass,
    /// Passes repeat until no container flips. Departs from the single-pass
    /// behaviour for out-of-order rule chains.
    FixedPoint,
}

/// A container whose hidden state flipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityChange {
    pub field: String,
    pub visible: bool,
}

/// Decides whether a field should be shown given the registry as it is now.
pub fn is_field_visible(definition: &FieldDefinition, registry: &Registry) -> bool {
    let Some(rule) = &definition.display_rule else {
        return true;
    };

    let Some(controller) = registry.get(&rule.field_name) else {
        tracing::debug!(
            field = %definition.field_name,
            controller = %rule.field_name,
            "display rule references an unknown field; showing it"
        );
        return true;
    };

    if controller.container().is_hidden() {
        return false;
    }

    rule.is_satisfied_by(&controller.widget().value())
}

/// Re-evaluates every registered field once, in registration order.
/// Returns how many containers flipped.
fn run_pass(registry: &mut Registry) -> usize {
    let mut flipped = 0;
    for position in 0..registry.len() {
        let Some(entry) = registry.entry_at(position) else {
            continue;
        };
        let visible = is_field_visible(entry.definition(), registry);
        if let Some(entry) = registry.entry_at_mut(position)
            && entry.container_mut().set_hidden(!visible)
        {
            flipped += 1;
        }
    }
    flipped
}

/// Full sweep: updates every container and reports the net changes.
pub fn sweep(registry: &mut Registry, mode: VisibilityMode) -> Vec<VisibilityChange> {
    let before = hidden_states(registry);

    match mode {
        VisibilityMode::SinglePass => {
            run_pass(registry);
        }
        VisibilityMode::FixedPoint => {
            let limit = registry.len() + 1;
            let mut converged = false;
            for _ in 0..limit {
                if run_pass(registry) == 0 {
                    converged = true;
                    break;
                }
            }
            if !converged {
                tracing::warn!(
                    passes = limit,
                    "visibility did not settle; keeping the last pass"
                );
            }
        }
    }

    registry
        .iter()
        .zip(before)
        .filter(|(entry, was_hidden)| entry.container().is_hidden() != *was_hidden)
        .map(|(entry, _)| VisibilityChange {
            field: entry.definition().field_name.clone(),
            visible: !entry.container().is_hidden(),
        })
        .collect()
}

/// Current container state keyed by field name.
pub fn visibility_map(registry: &Registry) -> VisibilityMap {
    registry
        .iter()
        .map(|entry| {
            (
                entry.definition().field_name.clone(),
                !entry.container().is_hidden(),
            )
        })
        .collect()
}

fn hidden_states(registry: &Registry) -> Vec<bool> {
    registry
        .iter()
        .map(|entry| entry.container().is_hidden())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::rule::DisplayRule;
    use crate::widget::build_widget;
    use serde_json::json;

    fn registry_of(definitions: Vec<FieldDefinition>) -> Registry {
        let mut registry = Registry::new();
        for definition in definitions {
            let widget = build_widget(&definition).expect("build");
            registry.register(definition, widget).expect("register");
        }
        registry
    }

    #[test]
    fn field_without_rule_is_visible() {
        let registry = registry_of(vec![]);
        assert!(is_field_visible(
            &FieldDefinition::new("Date", "date"),
            &registry
        ));
    }

    #[test]
    fn unresolved_controller_fails_open() {
        let registry = registry_of(vec![FieldDefinition::new("Toggle", "toggle")]);
        let orphan = FieldDefinition::new("Orphan", "string")
            .with_rule(DisplayRule::new("Nowhere", json!(true)));
        assert!(is_field_visible(&orphan, &registry));
    }

    #[test]
    fn hidden_controller_hides_dependent_even_when_rule_matches() {
        let mut registry = registry_of(vec![
            FieldDefinition::new("Toggle", "toggle").with_value(json!(true)),
            FieldDefinition::new("Note", "string").with_value(json!("x")),
        ]);
        let dependent = FieldDefinition::new("Dependent", "string")
            .with_rule(DisplayRule::new("Toggle", json!(true)));
        assert!(is_field_visible(&dependent, &registry));

        registry
            .get_mut("Toggle")
            .expect("toggle")
            .container_mut()
            .set_hidden(true);
        assert!(!is_field_visible(&dependent, &registry));
    }

    #[test]
    fn second_sweep_changes_nothing() {
        let mut registry = registry_of(vec![
            FieldDefinition::new("Toggle", "toggle").with_value(json!(true)),
            FieldDefinition::new("Company", "single-select")
                .with_options(["VM02"])
                .with_rule(DisplayRule::new("Toggle", json!(false))),
        ]);
        let first = sweep(&mut registry, VisibilityMode::SinglePass);
        assert_eq!(
            first,
            vec![VisibilityChange {
                field: "Company".into(),
                visible: false
            }]
        );
        assert!(sweep(&mut registry, VisibilityMode::SinglePass).is_empty());
    }

    #[test]
    fn out_of_order_chain_needs_fixed_point() {
        // C depends on B, B depends on A, registered as C, B, A.
        let definitions = || {
            vec![
                FieldDefinition::new("C", "string")
                    .with_rule(DisplayRule::new("B", json!(""))),
                FieldDefinition::new("B", "string")
                    .with_rule(DisplayRule::new("A", json!(true))),
                FieldDefinition::new("A", "toggle"),
            ]
        };

        let mut single = registry_of(definitions());
        sweep(&mut single, VisibilityMode::SinglePass);
        let map = visibility_map(&single);
        assert!(!map["B"]);
        assert!(map["C"], "C saw B before B was hidden");

        let mut fixed = registry_of(definitions());
        sweep(&mut fixed, VisibilityMode::FixedPoint);
        let map = visibility_map(&fixed);
        assert!(!map["B"]);
        assert!(!map["C"]);
    }
}
