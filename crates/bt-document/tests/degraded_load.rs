use bt_document::{load_tree, LoadWarning};
use bt_model::{Composite, EditError, PriorityType, DEFAULT_STATE_NAME};

#[test]
fn legacy_root_is_promoted_to_the_default_state() {
    let text = r#"{
        "Name": "Old",
        "DefaultState": "Default",
        "RootId": 3,
        "Behaviors": [
            { "BehaviorType": "Action", "Id": 1, "Name": "Idle" },
            { "BehaviorType": "Composite", "CompositeType": "Priority", "Id": 3,
              "Name": "Root", "Priority": "RunningNode", "Comment": "top" }
        ],
        "Hierarchy": [
            { "Id": 3, "Children": [ { "ChildId": 1, "Parameters": [] } ] }
        ]
    }"#;

    let loaded = load_tree(text).expect("load");
    let tree = &loaded.tree;
    assert_eq!(loaded.report.warnings, vec![LoadWarning::LegacyMigration("Root".into())]);
    assert_eq!(tree.states().len(), 1);
    assert_eq!(tree.default_state(), "Root");

    let state = tree.node(tree.states()[0]).unwrap();
    assert_eq!(state.name(), "Root");
    assert_eq!(state.comment, "top");
    assert_eq!(
        state.as_composite(),
        Some(&Composite::State {
            priority: PriorityType::RunningNode
        })
    );
    assert_eq!(state.child_count(), 1);
    assert!(tree.extra_behaviors().is_empty());
}

#[test]
fn no_states_and_no_legacy_root_synthesizes_a_default_state() {
    let text = r#"{
        "Name": "Loose",
        "Behaviors": [ { "BehaviorType": "Action", "Id": 0, "Name": "Orphan" } ]
    }"#;

    let loaded = load_tree(text).expect("load");
    assert_eq!(
        loaded.report.warnings,
        vec![LoadWarning::SynthesizedDefaultState(DEFAULT_STATE_NAME.into())]
    );
    let tree = &loaded.tree;
    assert_eq!(tree.default_state(), DEFAULT_STATE_NAME);
    assert!(tree.has_state(DEFAULT_STATE_NAME));
    let orphan = tree.find_by_name("Orphan").unwrap();
    assert_eq!(tree.extra_behaviors(), vec![orphan]);
}

#[test]
fn bad_records_and_edges_are_dropped_individually() {
    let text = r#"{
        "Name": "Messy",
        "Behaviors": [
            { "BehaviorType": "Composite", "CompositeType": "State", "Id": 0, "Name": "Default" },
            { "BehaviorType": "Teleport", "Id": 1, "Name": "Blink" },
            { "BehaviorType": "Action", "Id": "two", "Name": "BadId" },
            { "BehaviorType": "Composite", "CompositeType": "Spiral", "Id": 3, "Name": "Twist" },
            { "BehaviorType": "Action", "Id": 4, "Name": "Walk", "Concurrency": "Sometimes" },
            { "BehaviorType": "Condition", "Id": 5, "Name": "Near" }
        ],
        "Hierarchy": [
            { "Id": 0, "Children": [ { "ChildId": 4 }, { "ChildId": 1 }, { "ChildId": 5 } ] },
            { "Id": 4, "Children": [ { "ChildId": 5 } ] },
            { "Id": 42, "Children": [ { "ChildId": 4 } ] },
            { "Id": "nope" }
        ]
    }"#;

    let loaded = load_tree(text).expect("load");
    let w = &loaded.report.warnings;

    let dropped: Vec<usize> = w
        .iter()
        .filter_map(|w| match w {
            LoadWarning::DroppedBehavior { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(dropped, vec![1, 2, 3]);

    assert!(w.contains(&LoadWarning::UnknownValue {
        node: "Walk".into(),
        field: "Concurrency",
        value: "Sometimes".into(),
        fallback: "Unlimit".into(),
    }));
    assert!(w.contains(&LoadWarning::UnresolvedEdge { id: 1 }));
    assert!(w.contains(&LoadWarning::UnresolvedEdge { id: 42 }));
    assert!(w.contains(&LoadWarning::RejectedEdge {
        parent: 4,
        child: 5,
        reason: EditError::LeafNode("Walk".into()),
    }));
    assert!(w.iter().any(|w| matches!(w, LoadWarning::DroppedHierarchy { index: 3, .. })));

    let tree = &loaded.tree;
    let state = tree.node(tree.states()[0]).unwrap();
    let names: Vec<&str> = state
        .children()
        .map(|c| tree.node(c).unwrap().name())
        .collect();
    assert_eq!(names, vec!["Walk", "Near"]);
}

#[test]
fn decorators_with_extra_children_still_load() {
    let text = r#"{
        "Name": "Hand",
        "Behaviors": [
            { "BehaviorType": "Composite", "CompositeType": "State", "Id": 0, "Name": "Default" },
            { "BehaviorType": "Decorator", "DecoratorType": "Default", "Id": 1, "Name": "Gate" },
            { "BehaviorType": "Action", "Id": 2, "Name": "A" },
            { "BehaviorType": "Action", "Id": 3, "Name": "B" }
        ],
        "Hierarchy": [
            { "Id": 0, "Children": [ { "ChildId": 1 } ] },
            { "Id": 1, "Children": [ { "ChildId": 2 }, { "ChildId": 3 } ] }
        ]
    }"#;

    let loaded = load_tree(text).expect("load");
    assert!(loaded.report.is_clean());
    let gate = loaded.tree.find_by_name("Gate").unwrap();
    assert_eq!(loaded.tree.node(gate).unwrap().child_count(), 2);
}

#[test]
fn missing_sub_kinds_fall_back_with_a_warning() {
    let text = r#"{
        "Name": "Bare",
        "Behaviors": [
            { "BehaviorType": "Composite", "CompositeType": "State", "Id": 0, "Name": "Default" },
            { "BehaviorType": "Composite", "Id": 1, "Name": "Steps" },
            { "BehaviorType": "Decorator", "Id": 2, "Name": "Gate" },
            { "BehaviorType": "Action", "Id": 3, "Name": "Act" }
        ],
        "Hierarchy": [
            { "Id": 0, "Children": [ { "ChildId": 1 } ] },
            { "Id": 1, "Children": [ { "ChildId": 2 } ] },
            { "Id": 2, "Children": [ { "ChildId": 3 } ] }
        ]
    }"#;

    let loaded = load_tree(text).expect("load");
    assert_eq!(
        loaded.report.warnings,
        vec![
            LoadWarning::MissingValue {
                node: "Steps".into(),
                field: "CompositeType",
                fallback: "Sequence".into(),
            },
            LoadWarning::MissingValue {
                node: "Gate".into(),
                field: "DecoratorType",
                fallback: "Default".into(),
            },
        ]
    );
    let tree = &loaded.tree;
    let steps = tree.node(tree.find_by_name("Steps").unwrap()).unwrap();
    assert_eq!(steps.as_composite(), Some(&Composite::Sequence));
    let gate = tree.node(tree.find_by_name("Gate").unwrap()).unwrap();
    assert!(gate.as_decorator().is_some_and(|d| d.access_limit().is_none()));
}

#[test]
fn stale_bindings_are_matched_to_current_definitions() {
    let text = r#"{
        "Name": "Drift",
        "Behaviors": [
            { "BehaviorType": "Composite", "CompositeType": "State", "Id": 0, "Name": "Default" },
            { "BehaviorType": "Action", "Id": 1, "Name": "Shoot",
              "Parameters": [ { "Name": "rounds", "Type": "Int", "Value": "3" },
                              { "Name": "spread", "Type": "Float", "Value": "0.5" } ] }
        ],
        "Hierarchy": [
            { "Id": 0, "Children": [ { "ChildId": 1, "Parameters": [
                { "Name": "gone", "Type": "Bool", "Value": "true" },
                { "Name": "rounds", "Type": "Int", "Value": "9" } ] } ] }
        ]
    }"#;

    let loaded = load_tree(text).expect("load");
    let tree = &loaded.tree;
    let edge = tree.edge(tree.states()[0], 0).unwrap();
    assert_eq!(edge.bindings().to_string(), "(rounds = 9, spread = 0.5)");
}

#[test]
fn not_json_is_an_error() {
    assert!(load_tree("<BehaviorTree/>").is_err());
}
