//! The tree aggregate: node pool, states and every structural edit.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::EditError;
use crate::node::{ChildEdge, Composite, CompositeType, Node, NodeId, NodeKind};
use crate::parameter::{Parameter, ParameterSet};

/// Name given to the state of a fresh tree and to states synthesized on load.
pub const DEFAULT_STATE_NAME: &str = "Default";

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();

/// `^[A-Za-z_][A-Za-z0-9_]*$`, the syntax names must follow when edited.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"))
        .is_match(name)
}

/// A behavior tree being authored.
///
/// Every node created for the tree lives in its pool until deleted. `states` are the roots;
/// nodes of the pool that no state reaches are reported by [`BehaviorTree::extra_behaviors`].
#[derive(Debug, Clone)]
pub struct BehaviorTree {
    name: String,
    default_state: String,
    /// Read by code generation to decide how handler methods are emitted.
    pub expand_methods: bool,
    states: Vec<NodeId>,
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
}

impl BehaviorTree {
    /// A tree with a single empty state called [`DEFAULT_STATE_NAME`].
    pub fn new(name: impl Into<String>) -> Self {
        let mut tree = Self::empty(name);
        let state = tree.insert(Node::composite(DEFAULT_STATE_NAME, CompositeType::State));
        tree.states.push(state);
        tree
    }

    fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_state: DEFAULT_STATE_NAME.to_string(),
            expand_methods: false,
            states: Vec::new(),
            nodes: BTreeMap::new(),
            next_id: 0,
        }
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn require(&self, id: NodeId) -> Result<&Node, EditError> {
        self.nodes.get(&id).ok_or(EditError::UnknownNode(id))
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut Node, EditError> {
        self.nodes.get_mut(&id).ok_or(EditError::UnknownNode(id))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // --- node pool -------------------------------------------------------------------------

    /// Put a freshly constructed node into the pool. It is an extra behavior until attached.
    /// State nodes are refused; states come from [`add_state`](Self::add_state) only.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, EditError> {
        if node.is_state() {
            return Err(EditError::StateNode(node.name));
        }
        let name = node.name.clone();
        let id = self.insert(node);
        tracing::debug!(node = %name, id = %id, "Added behavior node");
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable access for free-form attributes (comment, concurrency, leaf and decorator payload).
    /// Name, weight, parameters, composite variant and children go through the tree's own methods.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All pooled nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First pooled node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    /// Remove a node that is not part of the hierarchy. Edges other detached nodes hold to it
    /// are dropped; its own children stay in the pool.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node, EditError> {
        let node = self.require(id)?;
        if self.is_in_hierarchy(id) {
            return Err(EditError::InHierarchy(node.name.clone()));
        }
        for other in self.nodes.values_mut() {
            other.edges.retain(|e| e.child != id);
        }
        let node = self.nodes.remove(&id).ok_or(EditError::UnknownNode(id))?;
        tracing::debug!(node = %node.name, id = %id, "Deleted behavior node");
        Ok(node)
    }

    // --- states ----------------------------------------------------------------------------

    pub fn states(&self) -> &[NodeId] {
        &self.states
    }

    pub fn state(&self, name: &str) -> Option<NodeId> {
        self.states
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.state(name).is_some()
    }

    pub fn default_state(&self) -> &str {
        &self.default_state
    }

    pub fn set_default_state(&mut self, name: &str) -> Result<(), EditError> {
        if !self.has_state(name) {
            return Err(EditError::UnknownState(name.to_string()));
        }
        self.default_state = name.to_string();
        Ok(())
    }

    pub fn add_state(&mut self, name: &str) -> Result<NodeId, EditError> {
        if !is_identifier(name) {
            return Err(EditError::InvalidName(name.to_string()));
        }
        if self.has_state(name) {
            return Err(EditError::DuplicateStateName(name.to_string()));
        }
        let id = self.insert(Node::composite(name, CompositeType::State));
        self.states.push(id);
        tracing::info!(state = %name, "Added state");
        Ok(id)
    }

    /// Remove a state. Its subtree stays in the pool as extra behaviors. When the removed state
    /// was the default, the first remaining state becomes the default.
    pub fn remove_state(&mut self, id: NodeId) -> Result<Node, EditError> {
        let index = self
            .states
            .iter()
            .position(|s| *s == id)
            .ok_or(EditError::NotAState(id))?;
        if self.states.len() == 1 {
            return Err(EditError::LastState);
        }
        self.states.remove(index);
        let node = self.nodes.remove(&id).ok_or(EditError::UnknownNode(id))?;

        if node.name == self.default_state {
            let fallback = self.states[0];
            self.default_state = self.nodes[&fallback].name.clone();
            tracing::info!(
                removed = %node.name,
                default_state = %self.default_state,
                "Default state removed, falling back to first state"
            );
        }
        Ok(node)
    }

    // --- hierarchy queries -----------------------------------------------------------------

    /// Every node reachable from a state, depth first, each node once.
    pub fn hierarchy(&self) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        for state in &self.states {
            self.collect(*state, &mut visited, &mut out);
        }
        out
    }

    /// Depth-first, deduplicated walk from `root`, appending to `out`.
    pub fn collect(&self, root: NodeId, visited: &mut HashSet<NodeId>, out: &mut Vec<NodeId>) {
        if !visited.insert(root) {
            return;
        }
        let Some(node) = self.nodes.get(&root) else {
            return;
        };
        out.push(root);
        for child in node.children() {
            self.collect(child, visited, out);
        }
    }

    pub fn is_in_hierarchy(&self, id: NodeId) -> bool {
        self.states.iter().any(|s| *s == id || self.reaches(*s, id))
    }

    /// Pooled nodes no state reaches, in pool order.
    pub fn extra_behaviors(&self) -> Vec<NodeId> {
        let reachable: HashSet<NodeId> = self.hierarchy().into_iter().collect();
        self.nodes
            .keys()
            .copied()
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// True if `target` is a strict descendant of `from`.
    pub fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack: Vec<NodeId> = match self.nodes.get(&from) {
            Some(n) => n.children().collect(),
            None => return false,
        };
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(n) = self.nodes.get(&id) {
                stack.extend(n.children());
            }
        }
        false
    }

    pub fn parents_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.index_of(id).is_some())
            .map(|(pid, _)| *pid)
            .collect()
    }

    pub fn edge(&self, parent: NodeId, index: usize) -> Option<&ChildEdge> {
        self.nodes.get(&parent)?.edges.get(index)
    }

    // --- child edits -----------------------------------------------------------------------

    pub fn add_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        bindings: Option<ParameterSet>,
    ) -> Result<(), EditError> {
        self.attach(parent, None, child, bindings, true)
    }

    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
        bindings: Option<ParameterSet>,
    ) -> Result<(), EditError> {
        self.attach(parent, Some(index), child, bindings, true)
    }

    fn attach(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        child: NodeId,
        bindings: Option<ParameterSet>,
        strict: bool,
    ) -> Result<(), EditError> {
        let p = self.require(parent)?;
        let c = self.require(child)?;

        if p.is_leaf() {
            return Err(EditError::LeafNode(p.name.clone()));
        }
        if c.is_state() {
            return Err(EditError::StateAsChild(c.name.clone()));
        }
        if strict && p.as_decorator().is_some() && p.child_count() > 0 {
            return Err(EditError::DecoratorOccupied(p.name.clone()));
        }
        let len = p.child_count();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
        if parent == child || self.reaches(child, parent) {
            tracing::debug!(parent = %p.name, child = %c.name, "Rejected cyclic attach");
            return Err(EditError::Cycle { parent, child });
        }

        let mut bindings = bindings.unwrap_or_default();
        if let Some(defs) = c.parameters() {
            bindings.match_definitions(defs);
        }

        self.require_mut(parent)?
            .edges
            .insert(index, ChildEdge { child, bindings });
        Ok(())
    }

    /// Detach `child` from `parent`, returning the bindings the edge carried.
    pub fn remove_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<ParameterSet, EditError> {
        let p = self.require_mut(parent)?;
        let index = p
            .index_of(child)
            .ok_or(EditError::NotAChild { parent, child })?;
        Ok(p.edges.remove(index).bindings)
    }

    pub fn move_child(&mut self, parent: NodeId, from: usize, to: usize) -> Result<(), EditError> {
        let p = self.require_mut(parent)?;
        let len = p.edges.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditError::IndexOutOfRange { index, len });
            }
        }
        let edge = p.edges.remove(from);
        p.edges.insert(to, edge);
        Ok(())
    }

    /// Swap `old` for `new` at the same position. The edge's bindings are kept and matched
    /// against the new child's definitions.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), EditError> {
        let index = self
            .require(parent)?
            .index_of(old)
            .ok_or(EditError::NotAChild { parent, child: old })?;
        let n = self.require(new)?;
        if n.is_state() {
            return Err(EditError::StateAsChild(n.name.clone()));
        }
        if parent == new || self.reaches(new, parent) {
            return Err(EditError::Cycle { parent, child: new });
        }
        let defs = n.parameters().cloned();

        let edge = &mut self.require_mut(parent)?.edges[index];
        edge.child = new;
        if let Some(defs) = defs {
            edge.bindings.match_definitions(&defs);
        }
        Ok(())
    }

    // --- attribute edits -------------------------------------------------------------------

    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<(), EditError> {
        if !is_identifier(name) {
            return Err(EditError::InvalidName(name.to_string()));
        }
        let is_state = self.states.contains(&id);
        if is_state && self.state(name).is_some_and(|s| s != id) {
            return Err(EditError::DuplicateStateName(name.to_string()));
        }
        let node = self.require_mut(id)?;
        let old = std::mem::replace(&mut node.name, name.to_string());
        if is_state && self.default_state == old {
            self.default_state = name.to_string();
        }
        Ok(())
    }

    /// Replace a composite's payload, possibly with another composite variant. A state stays a
    /// state and no other composite becomes one.
    pub fn set_composite(&mut self, id: NodeId, composite: Composite) -> Result<(), EditError> {
        let node = self.require_mut(id)?;
        let NodeKind::Composite(current) = &mut node.kind else {
            return Err(EditError::NotAComposite(node.name.clone()));
        };
        let was_state = matches!(current, Composite::State { .. });
        if was_state != matches!(composite, Composite::State { .. }) {
            return Err(EditError::StateKindChange(node.name.clone()));
        }
        *current = composite;
        Ok(())
    }

    pub fn set_weight(&mut self, id: NodeId, weight: f32) -> Result<(), EditError> {
        if weight <= 0.0 || !weight.is_finite() {
            return Err(EditError::InvalidWeight(weight));
        }
        self.require_mut(id)?.weight = weight;
        Ok(())
    }

    // --- parameters ------------------------------------------------------------------------

    fn definitions_mut(&mut self, id: NodeId) -> Result<&mut ParameterSet, EditError> {
        let node = self.require_mut(id)?;
        let name = node.name.clone();
        node.parameters_mut().ok_or(EditError::NoParameters(name))
    }

    pub fn add_parameter(&mut self, id: NodeId, param: Parameter) -> Result<(), EditError> {
        self.definitions_mut(id)?.add(param)?;
        self.rematch(id);
        Ok(())
    }

    pub fn remove_parameter(&mut self, id: NodeId, name: &str) -> Result<Parameter, EditError> {
        let removed = self
            .definitions_mut(id)?
            .remove(name)
            .ok_or_else(|| EditError::UnknownParameter(name.to_string()))?;
        self.rematch(id);
        Ok(removed)
    }

    /// Change a definition's default. Existing bindings keep their committed values.
    pub fn set_parameter_default(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), EditError> {
        if self.definitions_mut(id)?.set_value(name, value) {
            Ok(())
        } else {
            Err(EditError::UnknownParameter(name.to_string()))
        }
    }

    /// Commit a value for one parameter on the edge `parent[index]`.
    pub fn set_binding(
        &mut self,
        parent: NodeId,
        index: usize,
        name: &str,
        value: &str,
    ) -> Result<(), EditError> {
        let p = self.require_mut(parent)?;
        let len = p.edges.len();
        let edge = p
            .edges
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;
        if edge.bindings.set_value(name, value) {
            Ok(())
        } else {
            Err(EditError::UnknownParameter(name.to_string()))
        }
    }

    /// Re-match every edge pointing at `id` against its current definitions.
    fn rematch(&mut self, id: NodeId) {
        let Some(defs) = self.nodes.get(&id).and_then(|n| n.parameters()).cloned() else {
            return;
        };
        for node in self.nodes.values_mut() {
            for edge in node.edges.iter_mut().filter(|e| e.child == id) {
                edge.bindings.match_definitions(&defs);
            }
        }
    }

    /// Re-match every edge in the tree.
    pub fn match_parameters(&mut self) {
        let defs: HashMap<NodeId, ParameterSet> = self
            .nodes
            .iter()
            .filter_map(|(id, n)| n.parameters().map(|p| (*id, p.clone())))
            .collect();
        for node in self.nodes.values_mut() {
            for edge in node.edges.iter_mut() {
                if let Some(d) = defs.get(&edge.child) {
                    edge.bindings.match_definitions(d);
                }
            }
        }
    }
}

/// Assembles a tree from already-decoded parts.
///
/// Unlike the editing API this accepts data that would not pass edit-time checks (names,
/// weights, extra decorator children) so the compiler can report it. Cycles, children under
/// leaves and states used as children are still refused.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: BehaviorTree,
}

impl TreeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            tree: BehaviorTree::empty(name),
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.tree.insert(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.node(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.tree.nodes()
    }

    /// Append `child` under `parent` with the stored bindings.
    pub fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        bindings: ParameterSet,
    ) -> Result<(), EditError> {
        self.tree.attach(parent, None, child, Some(bindings), false)
    }

    /// Turn a priority selector into a state, keeping its attributes and children. Edges that
    /// pointed at it are dropped since states are never children.
    pub fn promote_to_state(&mut self, id: NodeId) -> bool {
        let Some(node) = self.tree.nodes.get_mut(&id) else {
            return false;
        };
        let NodeKind::Composite(Composite::Priority { priority }) = node.kind else {
            return false;
        };
        node.kind = NodeKind::Composite(Composite::State { priority });
        for other in self.tree.nodes.values_mut() {
            other.edges.retain(|e| e.child != id);
        }
        true
    }

    /// Stored verbatim; the compiler reports a default state that names no state.
    pub fn set_default_state(&mut self, name: impl Into<String>) {
        self.tree.default_state = name.into();
    }

    pub fn set_expand_methods(&mut self, expand: bool) {
        self.tree.expand_methods = expand;
    }

    /// Finish with the given states. An empty list gets a synthesized default state.
    pub fn finish(mut self, states: Vec<NodeId>) -> BehaviorTree {
        self.tree.states = states
            .into_iter()
            .filter(|id| self.tree.nodes.get(id).is_some_and(Node::is_state))
            .collect();
        if self.tree.states.is_empty() {
            let state = self
                .tree
                .insert(Node::composite(DEFAULT_STATE_NAME, CompositeType::State));
            self.tree.states.push(state);
            self.tree.default_state = DEFAULT_STATE_NAME.to_string();
        }
        self.tree.match_parameters();
        self.tree
    }
}
