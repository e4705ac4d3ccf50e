use crate::{
    blackboard::DEBUG_STRING_KEY,
    error::{AddChildError, AddChildResult},
    Blackboard, Status, Task,
};
use tracing::{debug, trace};

/// A root task together with the blackboard its tasks share.
pub struct Tree {
    status: Status,
    root: Box<dyn Task>,
    blackboard: Blackboard,
}

impl Tree {
    /// Assigns depth 0 to `root` (cascading to its descendants) and begins it.
    pub fn new(root: Box<dyn Task>) -> Self {
        let mut ret = Self {
            status: Status::None,
            root,
            blackboard: Blackboard::new(),
        };
        ret.root.set_tree_depth(0);
        ret.begin_tree();
        ret
    }

    pub fn new_node(root: impl Task + 'static) -> Self {
        Self::new(Box::new(root))
    }

    pub fn begin_tree(&mut self) {
        self.status = Status::Running;
        self.root.begin();
    }

    /// Runs one decision cycle.
    pub fn tick(&mut self) -> Status {
        self.blackboard.set_value(*DEBUG_STRING_KEY, "");
        self.status = self.root.tick(&mut self.blackboard);
        trace!(root = self.root.name(), status = ?self.status, "ticked tree");
        self.status
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn root(&self) -> &dyn Task {
        self.root.as_ref()
    }

    /// Structural edits made through this reference should be followed by
    /// [`Tree::refresh_depths`].
    pub fn root_mut(&mut self) -> &mut dyn Task {
        self.root.as_mut()
    }

    pub fn refresh_depths(&mut self) {
        self.root.set_tree_depth(0);
    }

    /// Swaps in a new root, begins it and hands back the previous one.
    pub fn replace_root(&mut self, root: Box<dyn Task>) -> Box<dyn Task> {
        debug!(old = self.root.name(), new = root.name(), "replacing root");
        let old = std::mem::replace(&mut self.root, root);
        self.root.set_tree_depth(0);
        self.begin_tree();
        old
    }

    /// The task reached by following child indices from the root.
    /// An empty path denotes the root itself.
    pub fn node_at(&self, path: &[usize]) -> Option<&dyn Task> {
        let mut node = self.root.as_ref();
        for &i in path {
            node = node.children().get(i)?.as_ref();
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut dyn Task> {
        let mut node = self.root.as_mut();
        for &i in path {
            node = node.children_mut().get_mut(i)?.as_mut();
        }
        Some(node)
    }

    /// Appends `task` to the children of the node at `path` and begins it.
    pub fn graft(&mut self, path: &[usize], task: Box<dyn Task>) -> AddChildResult {
        let name = task.name().to_owned();
        let parent = self
            .node_at_mut(path)
            .ok_or_else(|| AddChildError::InvalidPath(path.to_vec()))?;
        parent.add_child(task)?;
        if let Some(child) = parent.children_mut().last_mut() {
            child.begin();
        }
        debug!(action = name, ?path, "grafted task");
        Ok(())
    }

    /// Detaches the subtree at `path`. The root cannot be pruned.
    pub fn prune(&mut self, path: &[usize]) -> Option<Box<dyn Task>> {
        let (&index, parent_path) = path.split_last()?;
        let removed = self.node_at_mut(parent_path)?.remove_child(index)?;
        debug!(action = removed.name(), ?path, "pruned task");
        Some(removed)
    }

    pub fn build_debug_string(&self) -> String {
        let mut out = String::new();
        self.root.display_values(&mut out);
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Decorator, Selector, Sequence, TaskState};

    struct Fixed {
        state: TaskState,
        result: Status,
    }

    impl Fixed {
        fn boxed(name: &str, result: Status) -> Box<dyn Task> {
            Box::new(Self {
                state: TaskState::new(name),
                result,
            })
        }
    }

    impl Task for Fixed {
        fn state(&self) -> &TaskState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut TaskState {
            &mut self.state
        }

        fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
            let trace = format!(
                "{}{};",
                blackboard.get_str(*DEBUG_STRING_KEY).unwrap_or(""),
                self.name()
            );
            blackboard.set_value(*DEBUG_STRING_KEY, trace);
            self.state.update(self.result)
        }
    }

    /// Succeeds only after `begin` has run.
    struct Primed {
        state: TaskState,
        primed: bool,
    }

    impl Primed {
        fn boxed() -> Box<dyn Task> {
            Box::new(Self {
                state: TaskState::new("Primed"),
                primed: false,
            })
        }
    }

    impl Task for Primed {
        fn state(&self) -> &TaskState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut TaskState {
            &mut self.state
        }

        fn begin(&mut self) {
            self.primed = true;
            self.state.status = Status::Running;
        }

        fn tick(&mut self, _blackboard: &mut Blackboard) -> Status {
            let status = if self.primed {
                Status::Success
            } else {
                Status::Failed
            };
            self.state.update(status)
        }
    }

    fn nested() -> Box<dyn Task> {
        let inner = Sequence::new(vec![
            Fixed::boxed("Aim", Status::Success),
            Fixed::boxed("Shoot", Status::Failed),
        ]);
        Box::new(Selector::new(vec![
            Box::new(inner),
            Box::new(Decorator::new(Fixed::boxed("Wander", Status::Running))),
        ]))
    }

    fn assert_depths(task: &dyn Task, expected: usize) {
        assert_eq!(task.tree_depth(), expected, "depth of {}", task.name());
        for child in task.children() {
            assert_depths(child.as_ref(), expected + 1);
        }
    }

    #[test]
    fn test_new_begins_root() {
        let mut root = Sequence::default();
        root.set_tree_depth(5);
        let tree = Tree::new_node(root);
        assert_eq!(tree.status(), Status::Running);
        assert_eq!(tree.root().status(), Status::Running);
        assert_eq!(tree.root().tree_depth(), 0);
    }

    #[test]
    fn test_depths_match_shape() {
        let mut tree = Tree::new(nested());
        assert_depths(tree.root(), 0);

        tree.root_mut().set_tree_depth(2);
        assert_depths(tree.root(), 2);
        tree.refresh_depths();
        assert_depths(tree.root(), 0);
    }

    #[test]
    fn test_tick() {
        let mut tree = Tree::new(nested());
        assert_eq!(tree.tick(), Status::Running);
        assert_eq!(tree.status(), Status::Running);
        assert_eq!(
            tree.blackboard().get_str(*DEBUG_STRING_KEY),
            Some("Aim;Shoot;Wander;")
        );

        // The debug entry is cleared at the start of every cycle
        assert_eq!(tree.tick(), Status::Running);
        assert_eq!(
            tree.blackboard().get_str(*DEBUG_STRING_KEY),
            Some("Aim;Shoot;Wander;")
        );
    }

    #[test]
    fn test_failed_tree_stays_tickable() {
        let mut tree = Tree::new(Fixed::boxed("Give up", Status::Failed));
        assert_eq!(tree.tick(), Status::Failed);
        assert_eq!(tree.tick(), Status::Failed);
        assert_eq!(tree.status(), Status::Failed);
    }

    #[test]
    fn test_blackboards_are_independent() {
        let mut a = Tree::new(nested());
        let b = Tree::new(nested());
        a.blackboard_mut().set_value("enemy", "orc");
        assert_eq!(a.blackboard().get_str("enemy"), Some("orc"));
        assert_eq!(b.blackboard().get_value("enemy"), None);
    }

    #[test]
    fn test_graft_and_prune() {
        let mut tree = Tree::new(nested());
        let reload = Fixed::boxed("Reload", Status::Success);
        tree.graft(&[0], reload).unwrap();
        assert_eq!(tree.node_at(&[0, 2]).map(|t| t.name()), Some("Reload"));
        assert_depths(tree.root(), 0);

        let sub = Sequence::new(vec![Fixed::boxed("Hide", Status::Success)]);
        tree.graft(&[], Box::new(sub)).unwrap();
        assert_eq!(tree.node_at(&[2, 0]).map(|t| t.tree_depth()), Some(2));
        assert_depths(tree.root(), 0);

        assert_eq!(
            tree.graft(&[1], Fixed::boxed("Extra", Status::Success)),
            Err(AddChildError::TooManyNodes)
        );
        assert_eq!(
            tree.graft(&[7, 1], Fixed::boxed("Lost", Status::Success)),
            Err(AddChildError::InvalidPath(vec![7, 1]))
        );

        let pruned = tree.prune(&[0, 1]).unwrap();
        assert_eq!(pruned.name(), "Shoot");
        assert_eq!(tree.node_at(&[0, 1]).map(|t| t.name()), Some("Reload"));
        assert!(tree.prune(&[]).is_none());
        assert!(tree.prune(&[9]).is_none());

        // Aim and Reload succeed now
        assert_eq!(tree.tick(), Status::Success);
    }

    #[test]
    fn test_graft_begins_task() {
        let mut tree = Tree::new_node(Sequence::default());
        tree.graft(&[], Primed::boxed()).unwrap();
        let status = tree.node_at(&[0]).map(|t| t.status());
        assert_eq!(status, Some(Status::Running));
        assert_eq!(tree.tick(), Status::Success);

        let mut tree = Tree::new_node(Decorator::empty());
        tree.graft(&[], Primed::boxed()).unwrap();
        assert_eq!(tree.tick(), Status::Success);
    }

    #[test]
    fn test_replace_root_begins_task() {
        let mut tree = Tree::new(Fixed::boxed("Old", Status::Failed));
        tree.replace_root(Primed::boxed());
        assert_eq!(tree.tick(), Status::Success);
    }

    #[test]
    fn test_replace_root() {
        let mut tree = Tree::new(Fixed::boxed("Old", Status::Failed));
        assert_eq!(tree.tick(), Status::Failed);
        let old = tree.replace_root(nested());
        assert_eq!(old.name(), "Old");
        assert_eq!(tree.status(), Status::Running);
        assert_depths(tree.root(), 0);
    }

    #[test]
    fn test_build_debug_string() {
        let tree = Tree::new(nested());
        assert_eq!(
            tree.build_debug_string(),
            "\nSelector\n\tSequence\n\t\tAim\n\t\tShoot\n\tDecorator\n\t\tWander"
        );
    }
}
