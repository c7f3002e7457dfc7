//! Behavior nodes.
//!
//! A [`Node`] is a tagged union over [`NodeKind`] plus the attributes every behavior shares.
//! Children are held as ordered [`ChildEdge`]s, each carrying the parameter bindings for that
//! particular attachment. Edges are only changed through [`crate::BehaviorTree`], which owns the
//! cycle and arity checks.

use std::fmt;

use crate::access_key::AccessKeyType;
use crate::parameter::ParameterSet;

/// Handle of a node inside one [`crate::BehaviorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorType {
    Action,
    Condition,
    Decorator,
    Composite,
    ChangeState,
}

string_enum!(BehaviorType { Action, Condition, Decorator, Composite, ChangeState });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeType {
    Sequence,
    Concurrent,
    Random,
    Priority,
    Loop,
    State,
}

string_enum!(CompositeType { Sequence, Concurrent, Random, Priority, Loop, State });

impl CompositeType {
    pub fn default_name(self) -> &'static str {
        match self {
            CompositeType::Sequence => "NewSequenceSelector",
            CompositeType::Concurrent => "NewConcurrentSelector",
            CompositeType::Random => "NewRandomSelector",
            CompositeType::Priority => "NewPrioritySelector",
            CompositeType::Loop => "NewLoopSelector",
            CompositeType::State => "NewState",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorType {
    Default,
    AccessLimit,
}

string_enum!(DecoratorType { Default, AccessLimit });

/// How a behavior may run when its parent is a concurrent composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConcurrencyMode {
    #[default]
    Unlimit,
    Single,
}

string_enum!(ConcurrencyMode { Unlimit, Single });

/// Evaluation order of a priority selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriorityType {
    /// Always start from the first child.
    #[default]
    HighestPriority,
    /// Continue the child that was running.
    RunningNode,
}

string_enum!(PriorityType { HighestPriority, RunningNode });

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    FailOnOne,
    #[default]
    FailOnAll,
}

string_enum!(FailurePolicy { FailOnOne, FailOnAll });

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SuccessPolicy {
    SucceedOnOne,
    #[default]
    SucceedOnAll,
}

string_enum!(SuccessPolicy { SucceedOnOne, SucceedOnAll });

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcurrentPolicy {
    pub failure_policy: FailurePolicy,
    pub success_policy: SuccessPolicy,
    pub break_on_condition_failure: bool,
}

/// Control-flow variants. `State` is a priority selector that can be a tree root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Composite {
    Sequence,
    Priority { priority: PriorityType },
    Concurrent(ConcurrentPolicy),
    Random,
    Loop { loop_count: i32 },
    State { priority: PriorityType },
}

impl Composite {
    pub fn new(ty: CompositeType) -> Self {
        match ty {
            CompositeType::Sequence => Composite::Sequence,
            CompositeType::Priority => Composite::Priority {
                priority: PriorityType::default(),
            },
            CompositeType::Concurrent => Composite::Concurrent(ConcurrentPolicy::default()),
            CompositeType::Random => Composite::Random,
            CompositeType::Loop => Composite::Loop { loop_count: 0 },
            CompositeType::State => Composite::State {
                priority: PriorityType::default(),
            },
        }
    }

    pub fn composite_type(&self) -> CompositeType {
        match self {
            Composite::Sequence => CompositeType::Sequence,
            Composite::Priority { .. } => CompositeType::Priority,
            Composite::Concurrent(_) => CompositeType::Concurrent,
            Composite::Random => CompositeType::Random,
            Composite::Loop { .. } => CompositeType::Loop,
            Composite::State { .. } => CompositeType::State,
        }
    }

    pub fn priority(&self) -> Option<PriorityType> {
        match self {
            Composite::Priority { priority } | Composite::State { priority } => Some(*priority),
            _ => None,
        }
    }

    /// True for selectors that stop at the first child that does not fail.
    pub fn is_priority_like(&self) -> bool {
        matches!(self, Composite::Priority { .. } | Composite::State { .. })
    }
}

/// Debug-time bookkeeping persisted with leaves and decorators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugInfo {
    pub is_valid: bool,
}

/// Payload shared by actions and conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaf {
    pub(crate) parameters: ParameterSet,
    pub debug: DebugInfo,
}

impl Leaf {
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessLimit {
    /// Name of the key inside the shared access-key set.
    pub access_key: String,
    /// Name of the shared access-key set.
    pub class_name: String,
    pub key_type: AccessKeyType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecoratorKind {
    Default,
    AccessLimit(AccessLimit),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    /// When true a failing handler reports success.
    pub never_fail: bool,
    pub debug: DebugInfo,
    pub kind: DecoratorKind,
    pub(crate) parameters: ParameterSet,
}

impl Decorator {
    pub fn new(kind: DecoratorKind) -> Self {
        Self {
            never_fail: false,
            debug: DebugInfo::default(),
            kind,
            parameters: ParameterSet::new(),
        }
    }

    pub fn decorator_type(&self) -> DecoratorType {
        match self.kind {
            DecoratorKind::Default => DecoratorType::Default,
            DecoratorKind::AccessLimit(_) => DecoratorType::AccessLimit,
        }
    }

    pub fn access_limit(&self) -> Option<&AccessLimit> {
        match &self.kind {
            DecoratorKind::AccessLimit(al) => Some(al),
            DecoratorKind::Default => None,
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeState {
    pub destination_state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Action(Leaf),
    Condition(Leaf),
    Decorator(Decorator),
    Composite(Composite),
    ChangeState(ChangeState),
}

impl NodeKind {
    pub fn behavior_type(&self) -> BehaviorType {
        match self {
            NodeKind::Action(_) => BehaviorType::Action,
            NodeKind::Condition(_) => BehaviorType::Condition,
            NodeKind::Decorator(_) => BehaviorType::Decorator,
            NodeKind::Composite(_) => BehaviorType::Composite,
            NodeKind::ChangeState(_) => BehaviorType::ChangeState,
        }
    }
}

/// One child attachment: the child and the bindings committed for it at this edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildEdge {
    pub(crate) child: NodeId,
    pub(crate) bindings: ParameterSet,
}

impl ChildEdge {
    pub fn child(&self) -> NodeId {
        self.child
    }

    pub fn bindings(&self) -> &ParameterSet {
        &self.bindings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) weight: f32,
    pub concurrency: ConcurrencyMode,
    pub comment: String,
    pub(crate) kind: NodeKind,
    pub(crate) edges: Vec<ChildEdge>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            weight: 1.0,
            concurrency: ConcurrencyMode::default(),
            comment: String::new(),
            kind,
            edges: Vec::new(),
        }
    }

    /// A node of the given kind under the name the editor gives fresh nodes.
    pub fn with_default_name(kind: NodeKind) -> Self {
        let name = match &kind {
            NodeKind::Action(_) => "NewAction",
            NodeKind::Condition(_) => "NewCondition",
            NodeKind::Decorator(d) => match d.kind {
                DecoratorKind::Default => "NewDecorator",
                DecoratorKind::AccessLimit(_) => "NewAccessLimitDecorator",
            },
            NodeKind::Composite(c) => c.composite_type().default_name(),
            NodeKind::ChangeState(_) => "NewChangeState",
        };
        Self::new(name, kind)
    }

    pub fn action(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Action(Leaf::default()))
    }

    pub fn condition(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Condition(Leaf::default()))
    }

    pub fn decorator(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Decorator(Decorator::new(DecoratorKind::Default)))
    }

    pub fn access_limit_decorator(
        name: impl Into<String>,
        class_name: impl Into<String>,
        access_key: impl Into<String>,
        key_type: AccessKeyType,
    ) -> Self {
        let limit = AccessLimit {
            access_key: access_key.into(),
            class_name: class_name.into(),
            key_type,
        };
        Self::new(
            name,
            NodeKind::Decorator(Decorator::new(DecoratorKind::AccessLimit(limit))),
        )
    }

    pub fn composite(name: impl Into<String>, ty: CompositeType) -> Self {
        Self::new(name, NodeKind::Composite(Composite::new(ty)))
    }

    pub fn change_state(name: impl Into<String>, destination_state: impl Into<String>) -> Self {
        Self::new(
            name,
            NodeKind::ChangeState(ChangeState {
                destination_state: destination_state.into(),
            }),
        )
    }

    /// Seed the parameter definitions of a node before it is attached anywhere.
    /// Nodes that do not carry parameters ignore this.
    pub fn with_parameters(mut self, parameters: ParameterSet) -> Self {
        if let Some(defs) = self.parameters_mut() {
            *defs = parameters;
        }
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn behavior_type(&self) -> BehaviorType {
        self.kind.behavior_type()
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match &self.kind {
            NodeKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn composite_type(&self) -> Option<CompositeType> {
        self.as_composite().map(Composite::composite_type)
    }

    pub fn as_decorator(&self) -> Option<&Decorator> {
        match &self.kind {
            NodeKind::Decorator(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_decorator_mut(&mut self) -> Option<&mut Decorator> {
        match &mut self.kind {
            NodeKind::Decorator(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match &mut self.kind {
            NodeKind::Action(l) | NodeKind::Condition(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_change_state(&self) -> Option<&ChangeState> {
        match &self.kind {
            NodeKind::ChangeState(cs) => Some(cs),
            _ => None,
        }
    }

    pub fn as_change_state_mut(&mut self) -> Option<&mut ChangeState> {
        match &mut self.kind {
            NodeKind::ChangeState(cs) => Some(cs),
            _ => None,
        }
    }

    pub fn debug(&self) -> Option<DebugInfo> {
        match &self.kind {
            NodeKind::Action(l) | NodeKind::Condition(l) => Some(l.debug),
            NodeKind::Decorator(d) => Some(d.debug),
            _ => None,
        }
    }

    /// Parameter definitions, for the kinds that carry them.
    pub fn parameters(&self) -> Option<&ParameterSet> {
        match &self.kind {
            NodeKind::Action(l) | NodeKind::Condition(l) => Some(&l.parameters),
            NodeKind::Decorator(d) => Some(&d.parameters),
            NodeKind::Composite(_) | NodeKind::ChangeState(_) => None,
        }
    }

    pub(crate) fn parameters_mut(&mut self) -> Option<&mut ParameterSet> {
        match &mut self.kind {
            NodeKind::Action(l) | NodeKind::Condition(l) => Some(&mut l.parameters),
            NodeKind::Decorator(d) => Some(&mut d.parameters),
            NodeKind::Composite(_) | NodeKind::ChangeState(_) => None,
        }
    }

    pub fn is_state(&self) -> bool {
        matches!(self.kind, NodeKind::Composite(Composite::State { .. }))
    }

    /// Actions, conditions and state changes never have children.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Action(_) | NodeKind::Condition(_) | NodeKind::ChangeState(_)
        )
    }

    pub fn edges(&self) -> &[ChildEdge] {
        &self.edges
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().map(|e| e.child)
    }

    pub fn child_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, child: NodeId) -> Option<usize> {
        self.edges.iter().position(|e| e.child == child)
    }

    /// Comma separated child ids, as written in the `Children`/`Child` document attribute.
    pub fn children_csv(&self, id_of: impl Fn(NodeId) -> Option<u32>) -> String {
        self.children()
            .filter_map(id_of)
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
