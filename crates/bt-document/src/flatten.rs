//! Save path: tree -> flat behavior list plus hierarchy edges.

use std::collections::HashMap;

use bt_model::{BehaviorTree, Composite, DecoratorKind, Node, NodeId, NodeKind};

use crate::record::{
    parameter_records, BehaviorChildren, BehaviorContainer, BehaviorRecord, ConcurrentRecord,
    DebugRecord, TreeDocument,
};

/// Document ids in visitation order: every node reachable from a state (depth first, states in
/// order), then the extra behaviors. Ids are only meaningful inside one document.
pub fn assign_ids(tree: &BehaviorTree) -> Vec<NodeId> {
    let mut order = tree.hierarchy();
    order.extend(tree.extra_behaviors());
    order
}

pub fn flatten(tree: &BehaviorTree) -> TreeDocument {
    let order = assign_ids(tree);
    let ids: HashMap<NodeId, u32> = order
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as u32))
        .collect();

    let mut behaviors = Vec::with_capacity(order.len());
    let mut hierarchy = Vec::new();

    for id in &order {
        let Some(node) = tree.node(*id) else {
            continue;
        };
        let doc_id = i64::from(ids[id]);
        behaviors.push(behavior_record(node, doc_id, &ids));

        if node.child_count() > 0 {
            let children = node
                .edges()
                .iter()
                .filter_map(|edge| {
                    ids.get(&edge.child()).map(|child| BehaviorContainer {
                        child_id: i64::from(*child),
                        parameters: parameter_records(edge.bindings()),
                    })
                })
                .collect();
            hierarchy.push(BehaviorChildren {
                id: doc_id,
                children,
            });
        }
    }

    tracing::debug!(
        tree = %tree.name(),
        behaviors = behaviors.len(),
        parents = hierarchy.len(),
        "Flattened behavior tree"
    );

    TreeDocument {
        name: tree.name().to_string(),
        default_state: tree.default_state().to_string(),
        expand_methods: tree.expand_methods,
        root_id: None,
        behaviors,
        hierarchy,
    }
}

fn behavior_record(node: &Node, id: i64, ids: &HashMap<NodeId, u32>) -> BehaviorRecord {
    let mut record = BehaviorRecord {
        behavior_type: node.behavior_type().to_string(),
        id,
        name: node.name().to_string(),
        weight: node.weight(),
        concurrency: Some(node.concurrency.to_string()),
        comment: node.comment.clone(),
        ..BehaviorRecord::default()
    };
    let csv = || Some(node.children_csv(|c| ids.get(&c).copied()));

    match node.kind() {
        NodeKind::Action(leaf) | NodeKind::Condition(leaf) => {
            record.parameters = Some(parameter_records(leaf.parameters()));
            record.debug = Some(DebugRecord {
                is_valid: leaf.debug.is_valid,
            });
        }
        NodeKind::Decorator(decorator) => {
            record.decorator_type = Some(decorator.decorator_type().to_string());
            record.child = csv();
            record.never_fail = Some(decorator.never_fail);
            record.parameters = Some(parameter_records(decorator.parameters()));
            record.debug = Some(DebugRecord {
                is_valid: decorator.debug.is_valid,
            });
            if let DecoratorKind::AccessLimit(limit) = &decorator.kind {
                record.key_type = Some(limit.key_type.to_string());
                record.access_key = Some(limit.access_key.clone());
                record.class_name = Some(limit.class_name.clone());
            }
        }
        NodeKind::Composite(composite) => {
            record.composite_type = Some(composite.composite_type().to_string());
            record.children = csv();
            match composite {
                Composite::Priority { priority } | Composite::State { priority } => {
                    record.priority = Some(priority.to_string());
                }
                Composite::Loop { loop_count } => record.loop_count = Some(*loop_count),
                Composite::Concurrent(policy) => {
                    record.concurrent_properties = Some(ConcurrentRecord {
                        break_on_condition_failure: policy.break_on_condition_failure,
                        failure_policy: Some(policy.failure_policy.to_string()),
                        success_policy: Some(policy.success_policy.to_string()),
                    });
                }
                Composite::Sequence | Composite::Random => {}
            }
        }
        NodeKind::ChangeState(cs) => {
            record.destination_state = Some(cs.destination_state.clone());
        }
    }
    record
}
