//! Load path: flat behavior list plus hierarchy edges -> tree.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use bt_model::{
    AccessKeyType, AccessLimit, BehaviorTree, BehaviorType, ChangeState, Composite, CompositeType,
    ConcurrencyMode, ConcurrentPolicy, DebugInfo, Decorator, DecoratorKind, DecoratorType,
    FailurePolicy, Leaf, Node, NodeId, NodeKind, Parameter, ParameterSet, ParameterType,
    PriorityType, SuccessPolicy, TreeBuilder, DEFAULT_STATE_NAME,
};

use crate::record::{BehaviorChildren, BehaviorRecord, ParameterRecord, RawTreeDocument};
use crate::report::{LoadReport, LoadWarning};

/// A reconstructed tree and everything the load had to tolerate.
#[derive(Debug, Clone)]
pub struct LoadedTree {
    pub tree: BehaviorTree,
    pub report: LoadReport,
}

pub(crate) fn reconstruct(doc: RawTreeDocument) -> LoadedTree {
    let mut report = LoadReport::default();
    let mut builder = TreeBuilder::new(doc.name.clone());
    builder.set_default_state(doc.default_state.clone());
    builder.set_expand_methods(doc.expand_methods);

    // First record wins when ids collide; later ones stay in the pool as extras.
    let mut by_id: HashMap<i64, NodeId> = HashMap::new();
    let mut states = Vec::new();

    for (index, value) in doc.behaviors.into_iter().enumerate() {
        let record: BehaviorRecord = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                report.push(LoadWarning::DroppedBehavior {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let node = match build_node(&record, &mut report) {
            Ok(n) => n,
            Err(reason) => {
                report.push(LoadWarning::DroppedBehavior { index, reason });
                continue;
            }
        };
        let is_state = node.is_state();
        let id = builder.add_node(node);
        by_id.entry(record.id).or_insert(id);
        if is_state {
            states.push(id);
        }
    }

    for (index, value) in doc.hierarchy.into_iter().enumerate() {
        let entry: BehaviorChildren = match serde_json::from_value(value) {
            Ok(e) => e,
            Err(e) => {
                report.push(LoadWarning::DroppedHierarchy {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let Some(&parent) = by_id.get(&entry.id) else {
            report.push(LoadWarning::UnresolvedEdge { id: entry.id });
            continue;
        };
        let parent_name = builder
            .node(parent)
            .map(|n| n.name().to_string())
            .unwrap_or_default();
        for container in entry.children {
            let Some(&child) = by_id.get(&container.child_id) else {
                report.push(LoadWarning::UnresolvedEdge {
                    id: container.child_id,
                });
                continue;
            };
            let bindings = parameter_set(&container.parameters, &parent_name, &mut report);
            if let Err(reason) = builder.attach(parent, child, bindings) {
                report.push(LoadWarning::RejectedEdge {
                    parent: entry.id,
                    child: container.child_id,
                    reason,
                });
            }
        }
    }

    if states.is_empty() {
        let root = by_id.get(&doc.root_id.unwrap_or(0)).copied();
        match root {
            Some(root) if builder.promote_to_state(root) => {
                let name = builder
                    .node(root)
                    .map(|n| n.name().to_string())
                    .unwrap_or_default();
                builder.set_default_state(name.clone());
                report.push(LoadWarning::LegacyMigration(name));
                states.push(root);
            }
            _ => {
                report.push(LoadWarning::SynthesizedDefaultState(
                    DEFAULT_STATE_NAME.to_string(),
                ));
            }
        }
    }

    let tree = builder.finish(states);
    tracing::debug!(
        tree = %tree.name(),
        behaviors = tree.len(),
        states = tree.states().len(),
        warnings = report.warnings.len(),
        "Reconstructed behavior tree"
    );
    LoadedTree { tree, report }
}

/// Parse an enum attribute, falling back to the type's default with a warning.
fn enum_or_default<T>(
    value: Option<&str>,
    node: &str,
    field: &'static str,
    report: &mut LoadReport,
) -> T
where
    T: FromStr + Default + Display,
{
    let Some(value) = value else {
        return T::default();
    };
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            let fallback = T::default();
            report.push(LoadWarning::UnknownValue {
                node: node.to_string(),
                field,
                value: value.to_string(),
                fallback: fallback.to_string(),
            });
            fallback
        }
    }
}

/// A sub-kind attribute that is absent: use `fallback` and say so.
fn missing<T: Display>(node: &str, field: &'static str, fallback: T, report: &mut LoadReport) -> T {
    report.push(LoadWarning::MissingValue {
        node: node.to_string(),
        field,
        fallback: fallback.to_string(),
    });
    fallback
}

fn parameter_set(records: &[ParameterRecord], node: &str, report: &mut LoadReport) -> ParameterSet {
    records
        .iter()
        .map(|r| {
            let ty = if r.ty.is_empty() {
                ParameterType::default()
            } else {
                enum_or_default(Some(r.ty.as_str()), node, "parameter type", report)
            };
            Parameter::new(r.name.clone(), ty, r.value.clone())
        })
        .collect()
}

/// Dispatch on kind, then sub-kind. Unknown kinds are an error so the record is dropped.
fn build_node(record: &BehaviorRecord, report: &mut LoadReport) -> Result<Node, String> {
    let name = record.name.as_str();
    let behavior_type = record
        .behavior_type
        .parse::<BehaviorType>()
        .map_err(|e| e.to_string())?;
    let debug = DebugInfo {
        is_valid: record.debug.map(|d| d.is_valid).unwrap_or(false),
    };

    let kind = match behavior_type {
        BehaviorType::Action => NodeKind::Action(Leaf::default()),
        BehaviorType::Condition => NodeKind::Condition(Leaf::default()),
        BehaviorType::Decorator => {
            let ty = match record.decorator_type.as_deref() {
                None => missing(name, "DecoratorType", DecoratorType::Default, report),
                Some(s) => s.parse::<DecoratorType>().map_err(|e| e.to_string())?,
            };
            let kind = match ty {
                DecoratorType::Default => DecoratorKind::Default,
                DecoratorType::AccessLimit => DecoratorKind::AccessLimit(AccessLimit {
                    access_key: record.access_key.clone().unwrap_or_default(),
                    class_name: record.class_name.clone().unwrap_or_default(),
                    key_type: enum_or_default::<AccessKeyType>(
                        record.key_type.as_deref(),
                        name,
                        "KeyType",
                        report,
                    ),
                }),
            };
            let mut decorator = Decorator::new(kind);
            decorator.never_fail = record.never_fail.unwrap_or(false);
            decorator.debug = debug;
            NodeKind::Decorator(decorator)
        }
        BehaviorType::Composite => {
            let ty = match record.composite_type.as_deref() {
                None => missing(name, "CompositeType", CompositeType::Sequence, report),
                Some(s) => s.parse::<CompositeType>().map_err(|e| e.to_string())?,
            };
            NodeKind::Composite(composite(ty, record, report))
        }
        BehaviorType::ChangeState => NodeKind::ChangeState(ChangeState {
            destination_state: record.destination_state.clone().unwrap_or_default(),
        }),
    };

    let defs = parameter_set(record.parameters.as_deref().unwrap_or_default(), name, report);
    let mut node = Node::new(name, kind)
        .with_weight(record.weight)
        .with_parameters(defs);
    if let Some(leaf) = node.as_leaf_mut() {
        leaf.debug = debug;
    }
    node.concurrency = enum_or_default::<ConcurrencyMode>(
        record.concurrency.as_deref(),
        name,
        "Concurrency",
        report,
    );
    node.comment = record.comment.clone();
    Ok(node)
}

fn composite(ty: CompositeType, record: &BehaviorRecord, report: &mut LoadReport) -> Composite {
    let name = record.name.as_str();
    let priority = |report: &mut LoadReport| {
        enum_or_default::<PriorityType>(record.priority.as_deref(), name, "Priority", report)
    };
    match ty {
        CompositeType::Sequence => Composite::Sequence,
        CompositeType::Random => Composite::Random,
        CompositeType::Priority => Composite::Priority {
            priority: priority(report),
        },
        CompositeType::State => Composite::State {
            priority: priority(report),
        },
        CompositeType::Loop => Composite::Loop {
            loop_count: record.loop_count.unwrap_or(0),
        },
        CompositeType::Concurrent => {
            let props = record.concurrent_properties.clone().unwrap_or_default();
            Composite::Concurrent(ConcurrentPolicy {
                failure_policy: enum_or_default::<FailurePolicy>(
                    props.failure_policy.as_deref(),
                    name,
                    "FailurePolicy",
                    report,
                ),
                success_policy: enum_or_default::<SuccessPolicy>(
                    props.success_policy.as_deref(),
                    name,
                    "SuccessPolicy",
                    report,
                ),
                break_on_condition_failure: props.break_on_condition_failure,
            })
        }
    }
}
