use crate::{
    error::{AddChildError, AddChildResult},
    Blackboard, NumChildren, Status, Task, TaskState,
};

fn adopt(parent: &TaskState, child: &mut Box<dyn Task>) {
    child.set_tree_depth(parent.depth + 1);
}

fn single_child_slice(child: &Option<Box<dyn Task>>) -> &[Box<dyn Task>] {
    match child {
        Some(child) => std::slice::from_ref(child),
        None => &[],
    }
}

fn single_child_slice_mut(child: &mut Option<Box<dyn Task>>) -> &mut [Box<dyn Task>] {
    match child {
        Some(child) => std::slice::from_mut(child),
        None => &mut [],
    }
}

/// Ticks children in order until one of them does not fail.
///
/// The scan starts over from the first child on every tick, so a running
/// child is re-evaluated only if every child before it fails again.
pub struct Selector {
    state: TaskState,
    children: Vec<Box<dyn Task>>,
    current_child: usize,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl Selector {
    pub fn new(children: Vec<Box<dyn Task>>) -> Self {
        let mut ret = Self {
            state: TaskState::new("Selector"),
            children,
            current_child: 0,
        };
        ret.set_tree_depth(0);
        ret
    }

    /// Index of the child that decided the last tick.
    pub fn current_child(&self) -> usize {
        self.current_child
    }
}

impl Task for Selector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        self.current_child = 0;
        while let Some(child) = self.children.get_mut(self.current_child) {
            let status = child.tick(blackboard);
            if status != Status::Failed {
                return self.state.update(status);
            }
            self.current_child += 1;
        }
        self.state.update(Status::Failed)
    }

    fn max_children(&self) -> NumChildren {
        NumChildren::Infinite
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        &mut self.children
    }

    fn add_child(&mut self, mut child: Box<dyn Task>) -> AddChildResult {
        adopt(&self.state, &mut child);
        self.children.push(child);
        Ok(())
    }

    fn remove_child(&mut self, index: usize) -> Option<Box<dyn Task>> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }
}

/// Ticks children in order until one of them does not succeed.
///
/// Like [`Selector`], evaluation restarts from the first child every tick.
pub struct Sequence {
    state: TaskState,
    children: Vec<Box<dyn Task>>,
    current_child: usize,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl Sequence {
    pub fn new(children: Vec<Box<dyn Task>>) -> Self {
        let mut ret = Self {
            state: TaskState::new("Sequence"),
            children,
            current_child: 0,
        };
        ret.set_tree_depth(0);
        ret
    }

    pub fn current_child(&self) -> usize {
        self.current_child
    }
}

impl Task for Sequence {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        self.current_child = 0;
        while let Some(child) = self.children.get_mut(self.current_child) {
            let status = child.tick(blackboard);
            if status != Status::Success {
                return self.state.update(status);
            }
            self.current_child += 1;
        }
        self.state.update(Status::Success)
    }

    fn max_children(&self) -> NumChildren {
        NumChildren::Infinite
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        &mut self.children
    }

    fn add_child(&mut self, mut child: Box<dyn Task>) -> AddChildResult {
        adopt(&self.state, &mut child);
        self.children.push(child);
        Ok(())
    }

    fn remove_child(&mut self, index: usize) -> Option<Box<dyn Task>> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }
}

/// Wraps a single child and passes its result through.
///
/// Fails when it has no child or the child reports no status.
pub struct Decorator {
    state: TaskState,
    child: Option<Box<dyn Task>>,
}

impl Decorator {
    pub fn new(child: Box<dyn Task>) -> Self {
        Self::with_name("Decorator", Some(child))
    }

    pub fn empty() -> Self {
        Self::with_name("Decorator", None)
    }

    fn with_name(name: &str, child: Option<Box<dyn Task>>) -> Self {
        let mut ret = Self {
            state: TaskState::new(name),
            child,
        };
        ret.set_tree_depth(0);
        ret
    }

    pub fn child(&self) -> Option<&dyn Task> {
        self.child.as_deref()
    }

    /// Ticks the child, if any, without recording anything on the decorator.
    fn tick_child(&mut self, blackboard: &mut Blackboard) -> Option<Status> {
        self.child.as_mut().map(|child| child.tick(blackboard))
    }
}

impl Task for Decorator {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        let status = match self.tick_child(blackboard) {
            Some(Status::Failed | Status::None) | None => Status::Failed,
            Some(status) => status,
        };
        self.state.update(status)
    }

    fn max_children(&self) -> NumChildren {
        NumChildren::Finite(1)
    }

    fn children(&self) -> &[Box<dyn Task>] {
        single_child_slice(&self.child)
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        single_child_slice_mut(&mut self.child)
    }

    fn add_child(&mut self, mut child: Box<dyn Task>) -> AddChildResult {
        if self.child.is_some() {
            return Err(AddChildError::TooManyNodes);
        }
        adopt(&self.state, &mut child);
        self.child = Some(child);
        Ok(())
    }

    fn remove_child(&mut self, index: usize) -> Option<Box<dyn Task>> {
        if index == 0 {
            self.child.take()
        } else {
            None
        }
    }
}

/// Swaps `Success` and `Failed` of its child. `Running` passes through.
pub struct Inverter(Decorator);

impl Inverter {
    pub fn new(child: Box<dyn Task>) -> Self {
        Self(Decorator::with_name("Inverter", Some(child)))
    }

    pub fn empty() -> Self {
        Self(Decorator::with_name("Inverter", None))
    }
}

impl Task for Inverter {
    fn state(&self) -> &TaskState {
        self.0.state()
    }

    fn state_mut(&mut self) -> &mut TaskState {
        self.0.state_mut()
    }

    fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
        let status = match self.0.tick_child(blackboard) {
            Some(Status::Success) => Status::Failed,
            Some(Status::Failed) => Status::Success,
            Some(Status::Running) => Status::Running,
            Some(Status::None) | None => Status::Failed,
        };
        self.0.state.update(status)
    }

    fn max_children(&self) -> NumChildren {
        self.0.max_children()
    }

    fn children(&self) -> &[Box<dyn Task>] {
        self.0.children()
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        self.0.children_mut()
    }

    fn add_child(&mut self, child: Box<dyn Task>) -> AddChildResult {
        self.0.add_child(child)
    }

    fn remove_child(&mut self, index: usize) -> Option<Box<dyn Task>> {
        self.0.remove_child(index)
    }
}
