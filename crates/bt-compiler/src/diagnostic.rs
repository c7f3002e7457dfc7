//! Compile diagnostics.

use thiserror::Error;

use bt_model::AccessKeyType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Blocks code generation.
    Error,
    /// Logged only.
    Warning,
}

/// One problem found by a compile pass. `Display` is the message shown to authors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Issue {
    #[error("Invalid DefaultState for BehaviorTree : {tree}.")]
    InvalidDefaultState { tree: String },
    #[error("There is a Behavior node with empty name.")]
    EmptyName,
    #[error("There are {count} behaviors node in BehaviorTree with same name ({name}).")]
    DuplicateName { name: String, count: usize },
    #[error("Weight of Behavior node {node} is invalid (must be greater than 0).")]
    InvalidWeight { node: String, weight: f32 },
    #[error("Invalid parameter of Behavior node {node} (can not be null or empty).")]
    EmptyParameterName { node: String },
    #[error("There are {count} parameters for behaviors node {node} with same name ({parameter}).")]
    DuplicateParameter {
        node: String,
        parameter: String,
        count: usize,
    },
    #[error("Decorator node {node} has not any children.")]
    DecoratorWithoutChild { node: String },
    #[error("Decorator node {node} has {count} children (must have exactly one).")]
    DecoratorWithManyChildren { node: String, count: usize },
    #[error("The provided AccessKey '{key}' for behavior node '{node}' does not exist.")]
    UnknownAccessKey { node: String, key: String },
    #[error("Invalid AccessKey for behavior node '{node}' (no SharedAccessKeys named '{class_name}').")]
    UnknownAccessKeySet { node: String, class_name: String },
    #[error("AccessKey '{key}' of behavior node '{node}' is {actual} but the node expects {expected}.")]
    KeyTypeMismatch {
        node: String,
        key: String,
        expected: AccessKeyType,
        actual: AccessKeyType,
    },
    #[error("Composite node {node} has not any children.")]
    CompositeWithoutChildren { node: String },
    #[error("ChangeState '{node}' points to state '{destination}' that does not exist.")]
    UnknownDestinationState { node: String, destination: String },

    #[error("Decorator '{decorator}' with 'NeverFail' property setted to 'true' is child of PrioritySelector '{parent}'. This cause next children unreachable.")]
    NeverFailUnderPriority { decorator: String, parent: String },
    #[error("Decorator '{decorator}' with 'NeverFail' property setted to 'true' is child of ConcurrentSelector '{parent}' with 'SuccessPolicy' property setted to 'SucceedOnOne'. This cause ConcurrentSelector never fail.")]
    NeverFailUnderSucceedOnOne { decorator: String, parent: String },
    #[error("There are unreachable behaviors in Composite '{composite}', after ChangeState '{change_state}'")]
    UnreachableAfterChangeState {
        composite: String,
        change_state: String,
    },
    #[error("AccessLimitDecorator '{decorator}' with CounterLimit accesskey has a ChangeState child '{child}'. CounterLimit key will be unlocked after change state.")]
    CounterLimitBeforeChangeState { decorator: String, child: String },

    #[error("There is an AccessKey with empty name in SharedAccessKeys {set}.")]
    EmptyAccessKeyName { set: String },
    #[error("There are {count} AccessKeys in SharedAccessKeys {set} with same name ({key}).")]
    DuplicateAccessKey {
        set: String,
        key: String,
        count: usize,
    },
    #[error("MaxAccessCount of CounterLimit AccessKey '{key}' in {set} is invalid (must be greater than 0).")]
    InvalidMaxAccessCount { set: String, key: String, value: i32 },
    #[error("TimeInterval of TimeLimit AccessKey '{key}' in {set} is invalid (must be greater than 0).")]
    InvalidTimeInterval { set: String, key: String, value: f32 },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::NeverFailUnderPriority { .. }
            | Issue::NeverFailUnderSucceedOnOne { .. }
            | Issue::UnreachableAfterChangeState { .. }
            | Issue::CounterLimitBeforeChangeState { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub issue: Issue,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Treat warnings as fatal.
    pub warnings_as_errors: bool,
}

/// Outcome of one compile pass, diagnostics in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileResult {
    pub passed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.issue)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.issue)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

/// Pass-scoped diagnostic sink. Lives on the stack of one compile call.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn report(&mut self, issue: Issue) {
        let severity = issue.severity();
        match severity {
            Severity::Error => tracing::error!("{issue}"),
            Severity::Warning => tracing::warn!("{issue}"),
        }
        self.items.push(Diagnostic { severity, issue });
    }

    pub(crate) fn finish(self, options: CompileOptions) -> CompileResult {
        let passed = !self
            .items
            .iter()
            .any(|d| d.is_error() || options.warnings_as_errors);
        CompileResult {
            passed,
            diagnostics: self.items,
        }
    }
}
