use crate::{Blackboard, Status, Task};
use std::collections::HashSet;

/// Situation identifiers for which an action is legal. The meaning of each
/// integer is defined by the consuming game.
pub type Compatibility = HashSet<i32>;

/// Bookkeeping shared by every node: what the tree and the action pool need
/// to know about a task regardless of its behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskState {
    pub(crate) name: String,
    pub(crate) status: Status,
    pub(crate) depth: usize,
    pub(crate) poolable: bool,
    pub(crate) compatibility: Compatibility,
}

impl TaskState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::None,
            depth: 0,
            poolable: false,
            compatibility: Compatibility::new(),
        }
    }

    /// Marks the task as safe to be drawn from the action pool.
    pub fn poolable(mut self) -> Self {
        self.poolable = true;
        self
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Records `status` as the result of this tick and hands it back.
    pub fn update(&mut self, status: Status) -> Status {
        self.status = status;
        status
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_poolable(&self) -> bool {
        self.poolable
    }

    pub fn compatibility(&self) -> &Compatibility {
        &self.compatibility
    }

    pub fn is_compatible(&self, tags: &Compatibility) -> bool {
        !self.compatibility.is_disjoint(tags)
    }
}

/// A leaf that only tests the world and never acts on it.
pub trait Condition {
    fn check_condition(&mut self, blackboard: &Blackboard) -> bool;
}

impl<F> Condition for F
where
    F: FnMut(&Blackboard) -> bool,
{
    fn check_condition(&mut self, blackboard: &Blackboard) -> bool {
        self(blackboard)
    }
}

/// Adapts a [`Condition`] into a task that succeeds when the condition holds.
pub struct ConditionTask<C> {
    state: TaskState,
    condition: C,
}

impl<C: Condition> ConditionTask<C> {
    pub fn new(name: impl Into<String>, condition: C) -> Self {
        Self {
            state: TaskState::new(name),
            condition,
        }
    }

    pub fn with_state(state: TaskState, condition: C) -> Self {
        Self { state, condition }
    }
}

impl<C: Condition> Task for ConditionTask<C> {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        let status = if self.condition.check_condition(blackboard) {
            Status::Success
        } else {
            Status::Failed
        };
        self.state.update(status)
    }
}
