//! # behavior-tree-rl (Rust crate)
//!
//! A behavior tree runtime with a pool of actions, meant for trees that a
//! reinforcement learning process assembles and mutates while the agent runs.
//!
//!
//! ## Overview
//!
//! Every element of a tree, whether a leaf action, a condition, a composite or a
//! decorator, is a [`Task`].
//! A [`Tree`] owns the root task together with a [`Blackboard`], the shared memory
//! through which tasks talk to each other.
//! The driving loop calls [`Tree::tick`] once per decision cycle (e.g. once per
//! game frame) and reads the resulting [`Status`].
//!
//! Between cycles, the learner may ask the [`ActionRegistry`] for new action
//! instances, either by name or at random, and graft them into the tree.
//!
//!
//! ## How it looks like
//!
//! First, define a leaf action. The per-node bookkeeping lives in a
//! [`TaskState`], so an action only needs to expose it and override `tick`.
//!
//! ```rust
//! use behavior_tree_rl::*;
//!
//! struct Chase {
//!     state: TaskState,
//! }
//!
//! impl Default for Chase {
//!     fn default() -> Self {
//!         Self {
//!             state: TaskState::new("Chase")
//!                 .poolable()
//!                 .with_compatibility(tags![1]),
//!         }
//!     }
//! }
//!
//! impl Task for Chase {
//!     fn state(&self) -> &TaskState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut TaskState {
//!         &mut self.state
//!     }
//!
//!     fn tick(&mut self, blackboard: &mut Blackboard) -> Status {
//!         let status = match blackboard.get_float("distance") {
//!             Some(d) if d < 1. => Status::Success,
//!             Some(_) => Status::Running,
//!             None => Status::Failed,
//!         };
//!         self.state.update(status)
//!     }
//! }
//! ```
//!
//! Then register it to the pool and put a tree together.
//!
//! ```rust
//! # use behavior_tree_rl::*;
//! # struct Chase { state: TaskState }
//! # impl Default for Chase {
//! #     fn default() -> Self { Self { state: TaskState::new("Chase").poolable() } }
//! # }
//! # impl Task for Chase {
//! #     fn state(&self) -> &TaskState { &self.state }
//! #     fn state_mut(&mut self) -> &mut TaskState { &mut self.state }
//! # }
//! let registry = ActionRegistry::builder().register::<Chase>().build();
//!
//! let mut root = Selector::default();
//! if let Ok(action) = registry.get_random_action() {
//!     root.add_child(action).unwrap();
//! }
//!
//! let mut tree = Tree::new_node(root);
//! tree.blackboard_mut().set_value("distance", 4.0);
//! let status = tree.tick();
//! ```
//!
//! A task whose `tick` is not overridden always returns `Running`.
//!
//!
//! ## Composites
//!
//! * [`Selector`] ticks its children in order and stops at the first one that did not fail.
//! * [`Sequence`] ticks its children in order and stops at the first one that did not succeed.
//!
//! Both of them restart from the first child on every tick.
//! They do not remember which child was running, so a higher priority child
//! can take over on the next cycle.
//! This differs from the usual "resume at the running child" composites on purpose.
//!
//!
//! ## Decorators
//!
//! [`Decorator`] wraps a single child and passes its result through.
//! A decorator without a child fails.
//! [`Inverter`] swaps `Success` and `Failed` of its child.
//!
//!
//! ## Depth bookkeeping
//!
//! Each task knows its distance from the root.
//! [`Task::set_tree_depth`] assigns it top-down, and composites assign their
//! new children the moment they are added, so the depths always agree with the
//! shape of the tree.
//! [`Tree::build_debug_string`] renders the tree indented by depth.
//!
//!
//! ## The action pool
//!
//! The registry is an explicit object, built once at start-up from a list of
//! candidate constructors.
//! Each candidate is instantiated once; only poolable leaf tasks are kept, and
//! the first one to claim a name wins.
//! See [`ActionRegistry`] and [`PoolConfig`].

mod blackboard;
mod config;
pub mod error;
mod nodes;
mod registry;
mod symbol;
mod task;
mod tree;

pub use crate::blackboard::{Blackboard, BlackboardKey, Value, DEBUG_STRING_KEY};
pub use crate::config::PoolConfig;
pub use crate::error::{AddChildError, AddChildResult, ConfigError, RegistryError};
pub use crate::nodes::{Decorator, Inverter, Selector, Sequence};
pub use crate::registry::{boxify, ActionRegistry, Constructor, RegistryBuilder};
pub use crate::symbol::Symbol;
pub use crate::task::{Compatibility, Condition, ConditionTask, TaskState};
pub use crate::tree::Tree;
pub use ::once_cell::sync::Lazy;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Hash)]
pub enum Status {
    /// The task has not been started yet. A finished tick never returns this.
    #[default]
    None,
    Success,
    Failed,
    /// The task should keep running in the next tick
    Running,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum NumChildren {
    Finite(usize),
    Infinite,
}

/// A node of a behavior tree.
///
/// Only [`Task::state`] and [`Task::state_mut`] are required. Leaves override
/// [`Task::tick`]; composites and decorators additionally expose their children
/// through [`Task::children`] and [`Task::children_mut`], which is all the
/// default depth assignment and debug rendering need to recurse.
pub trait Task {
    fn state(&self) -> &TaskState;

    fn state_mut(&mut self) -> &mut TaskState;

    /// Called once before the first tick after the task joins an active tree.
    fn begin(&mut self) {
        self.state_mut().status = Status::Running;
    }

    fn tick(&mut self, _blackboard: &mut Blackboard) -> Status {
        self.state_mut().update(Status::Running)
    }

    /// Aborts the task. Children are left untouched.
    fn terminate(&mut self) {
        self.state_mut().status = Status::Failed;
    }

    fn status(&self) -> Status {
        self.state().status
    }

    fn name(&self) -> &str {
        &self.state().name
    }

    fn is_poolable(&self) -> bool {
        self.state().poolable
    }

    fn tree_depth(&self) -> usize {
        self.state().depth
    }

    fn set_tree_depth(&mut self, depth: usize) {
        self.state_mut().depth = depth;
        for child in self.children_mut() {
            child.set_tree_depth(depth + 1);
        }
    }

    /// True if this task shares at least one tag with `tags`.
    /// Only tree builders consult this; ticking never does.
    fn is_compatible(&self, tags: &Compatibility) -> bool {
        self.state().is_compatible(tags)
    }

    /// Appends one line per task, indented with a tab per depth level.
    fn display_values(&self, out: &mut String) {
        out.push('\n');
        out.extend(std::iter::repeat('\t').take(self.tree_depth()));
        out.push_str(self.name());
        for child in self.children() {
            child.display_values(out);
        }
    }

    fn max_children(&self) -> NumChildren {
        NumChildren::Finite(0)
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Task>] {
        &mut []
    }

    /// Appends `child` and assigns it the depth below this task.
    fn add_child(&mut self, _child: Box<dyn Task>) -> AddChildResult {
        Err(AddChildError::TooManyNodes)
    }

    fn remove_child(&mut self, _index: usize) -> Option<Box<dyn Task>> {
        None
    }
}

/// Builds a [`Compatibility`] set.
///
/// ```
/// # use behavior_tree_rl::tags;
/// let tags = tags![1, 4];
/// assert!(tags.contains(&4));
/// ```
#[macro_export]
macro_rules! tags {
    () => {
        $crate::Compatibility::new()
    };
    ($($tag: expr),+ $(,)?) => {{
        let mut ret = $crate::Compatibility::new();
        $(ret.insert($tag);)+
        ret
    }};
}
