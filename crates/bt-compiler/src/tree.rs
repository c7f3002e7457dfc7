//! Tree compile pass.

use std::collections::{HashMap, HashSet};

use bt_model::access_key::find_set;
use bt_model::{
    AccessKeySet, AccessKeyType, BehaviorTree, Composite, DecoratorKind, Node, NodeId, NodeKind,
    SuccessPolicy,
};

use crate::diagnostic::{CompileOptions, CompileResult, Diagnostics, Issue};

struct TreeCompiler<'a> {
    tree: &'a BehaviorTree,
    access_keys: &'a [AccessKeySet],
    /// Reachable nodes, each once, in depth-first order.
    behaviors: Vec<(NodeId, &'a Node)>,
    out: Diagnostics,
}

/// Check `tree` against the access-key sets it may reference. Every check runs; the result
/// carries all diagnostics of the pass.
pub fn compile_tree(tree: &BehaviorTree, access_keys: &[AccessKeySet]) -> CompileResult {
    compile_tree_with(tree, access_keys, CompileOptions::default())
}

pub fn compile_tree_with(
    tree: &BehaviorTree,
    access_keys: &[AccessKeySet],
    options: CompileOptions,
) -> CompileResult {
    let behaviors = tree
        .hierarchy()
        .into_iter()
        .filter_map(|id| tree.node(id).map(|n| (id, n)))
        .collect();
    let mut compiler = TreeCompiler {
        tree,
        access_keys,
        behaviors,
        out: Diagnostics::default(),
    };

    compiler.check_default_state();
    compiler.search_for_errors();
    compiler.search_for_warnings();

    let behaviors = compiler.behaviors.len();
    let result = compiler.out.finish(options);
    tracing::info!(
        tree = %tree.name(),
        behaviors,
        errors = result.error_count(),
        warnings = result.warning_count(),
        passed = result.passed,
        "Compiled behavior tree"
    );
    result
}

impl<'a> TreeCompiler<'a> {
    fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.tree.node(id)
    }

    fn check_default_state(&mut self) {
        let default = self.tree.default_state();
        if default.is_empty() || !self.tree.has_state(default) {
            self.out.report(Issue::InvalidDefaultState {
                tree: self.tree.name().to_string(),
            });
        }
    }

    fn search_for_errors(&mut self) {
        let behaviors = self.behaviors.clone();
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for &(_, b) in &behaviors {
            *name_counts.entry(b.name()).or_default() += 1;
        }
        let mut reported = HashSet::new();

        for &(_, b) in &behaviors {
            if b.name().is_empty() {
                self.out.report(Issue::EmptyName);
            } else if reported.insert(b.name()) {
                let count = name_counts[b.name()];
                if count > 1 {
                    self.out.report(Issue::DuplicateName {
                        name: b.name().to_string(),
                        count,
                    });
                }
            }

            self.check_parameters(b);

            match b.kind() {
                NodeKind::Decorator(decorator) => {
                    match b.child_count() {
                        0 => self.out.report(Issue::DecoratorWithoutChild {
                            node: b.name().to_string(),
                        }),
                        1 => {}
                        count => self.out.report(Issue::DecoratorWithManyChildren {
                            node: b.name().to_string(),
                            count,
                        }),
                    }
                    if let DecoratorKind::AccessLimit(limit) = &decorator.kind {
                        self.check_access_key(
                            b,
                            &limit.access_key,
                            &limit.class_name,
                            limit.key_type,
                        );
                    }
                }
                NodeKind::ChangeState(cs) => {
                    if !self.tree.has_state(&cs.destination_state) {
                        self.out.report(Issue::UnknownDestinationState {
                            node: b.name().to_string(),
                            destination: cs.destination_state.clone(),
                        });
                    }
                }
                _ => {}
            }

            if !(b.weight().is_finite() && b.weight() > 0.0) {
                self.out.report(Issue::InvalidWeight {
                    node: b.name().to_string(),
                    weight: b.weight(),
                });
            }
        }
    }

    /// Bindings on each outgoing edge must have non-empty, distinct names.
    fn check_parameters(&mut self, b: &Node) {
        for edge in b.edges() {
            let child = self
                .node(edge.child())
                .map(|n| n.name().to_string())
                .unwrap_or_default();
            let mut seen = HashSet::new();
            for p in edge.bindings() {
                if p.name.is_empty() {
                    self.out.report(Issue::EmptyParameterName {
                        node: child.clone(),
                    });
                    continue;
                }
                if !seen.insert(p.name.as_str()) {
                    continue;
                }
                let count = edge.bindings().iter().filter(|q| q.name == p.name).count();
                if count > 1 {
                    self.out.report(Issue::DuplicateParameter {
                        node: child.clone(),
                        parameter: p.name.clone(),
                        count,
                    });
                }
            }
        }
    }

    fn check_access_key(
        &mut self,
        b: &Node,
        access_key: &str,
        class_name: &str,
        key_type: AccessKeyType,
    ) {
        let node = b.name().to_string();
        if access_key.is_empty() {
            self.out.report(Issue::UnknownAccessKey {
                node,
                key: String::new(),
            });
            return;
        }
        let Some(set) = find_set(self.access_keys, class_name).filter(|_| !class_name.is_empty())
        else {
            self.out.report(Issue::UnknownAccessKeySet {
                node,
                class_name: class_name.to_string(),
            });
            return;
        };
        match set.find(access_key) {
            None => self.out.report(Issue::UnknownAccessKey {
                node,
                key: access_key.to_string(),
            }),
            Some(key) if key.key_type() != key_type => self.out.report(Issue::KeyTypeMismatch {
                node,
                key: access_key.to_string(),
                expected: key_type,
                actual: key.key_type(),
            }),
            Some(_) => {}
        }
    }

    fn search_for_warnings(&mut self) {
        let behaviors = self.behaviors.clone();
        for &(_, b) in &behaviors {
            match b.kind() {
                NodeKind::Composite(composite) => self.check_composite(b, composite),
                NodeKind::Decorator(decorator) => {
                    let Some(limit) = decorator.access_limit() else {
                        continue;
                    };
                    if limit.key_type != AccessKeyType::CounterLimit {
                        continue;
                    }
                    let child = b.children().next().and_then(|c| self.node(c));
                    if let Some(child) = child.filter(|c| c.as_change_state().is_some()) {
                        self.out.report(Issue::CounterLimitBeforeChangeState {
                            decorator: b.name().to_string(),
                            child: child.name().to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn check_composite(&mut self, b: &Node, composite: &Composite) {
        if b.child_count() == 0 {
            self.out.report(Issue::CompositeWithoutChildren {
                node: b.name().to_string(),
            });
        }

        let children: Vec<&Node> = b.children().filter_map(|c| self.node(c)).collect();

        for child in &children {
            let never_fail = child.as_decorator().is_some_and(|d| d.never_fail);
            if !never_fail {
                continue;
            }
            match composite {
                Composite::Priority { .. } | Composite::State { .. } => {
                    self.out.report(Issue::NeverFailUnderPriority {
                        decorator: child.name().to_string(),
                        parent: b.name().to_string(),
                    });
                }
                Composite::Concurrent(policy)
                    if policy.success_policy == SuccessPolicy::SucceedOnOne =>
                {
                    self.out.report(Issue::NeverFailUnderSucceedOnOne {
                        decorator: child.name().to_string(),
                        parent: b.name().to_string(),
                    });
                }
                _ => {}
            }
        }

        if matches!(composite, Composite::Random) {
            return;
        }
        let last = children.len().saturating_sub(1);
        for (index, child) in children.iter().enumerate() {
            if index < last && child.as_change_state().is_some() {
                self.out.report(Issue::UnreachableAfterChangeState {
                    composite: b.name().to_string(),
                    change_state: child.name().to_string(),
                });
            }
        }
    }
}
