use crate::{error::RegistryError, Compatibility, NumChildren, PoolConfig, Task};
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Creates a fresh instance of one action type.
pub type Constructor = Box<dyn Fn() -> Box<dyn Task> + Send + Sync>;

pub fn boxify<T>(cons: impl (Fn() -> T) + Send + Sync + 'static) -> Constructor
where
    T: Task + 'static,
{
    Box::new(move || Box::new(cons()))
}

struct ActionEntry {
    name: String,
    compatibility: Compatibility,
    constructor: Constructor,
}

/// Collects candidate action types and turns them into an [`ActionRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    candidates: Vec<Constructor>,
    config: PoolConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T>(self) -> Self
    where
        T: Task + Default + 'static,
    {
        self.candidate(boxify(T::default))
    }

    pub fn candidate(mut self, constructor: Constructor) -> Self {
        self.candidates.push(constructor);
        self
    }

    pub fn candidates(mut self, constructors: impl IntoIterator<Item = Constructor>) -> Self {
        self.candidates.extend(constructors);
        self
    }

    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Instantiates every candidate once and keeps the poolable leaves.
    ///
    /// Candidates are considered in the order they were added; a name that is
    /// already taken is dropped.
    pub fn build(self) -> ActionRegistry {
        let mut ret = ActionRegistry {
            entries: vec![],
            index: HashMap::new(),
        };
        for constructor in self.candidates {
            let prototype = constructor();
            let name = prototype.name();
            if !prototype.is_poolable() {
                debug!(action = name, "skipping action that is not poolable");
                continue;
            }
            if prototype.max_children() != NumChildren::Finite(0) {
                debug!(action = name, "skipping task that is not a leaf");
                continue;
            }
            if !self.config.allows(name) {
                debug!(action = name, "skipping action rejected by the pool config");
                continue;
            }
            if ret.index.contains_key(name) {
                debug!(action = name, "dropping duplicate action name");
                continue;
            }
            debug!(action = name, "registered action");
            ret.index.insert(name.to_owned(), ret.entries.len());
            ret.entries.push(ActionEntry {
                name: name.to_owned(),
                compatibility: prototype.state().compatibility().clone(),
                constructor,
            });
        }
        ret
    }
}

/// Catalog of the leaf actions a tree builder may insert.
///
/// The catalog is fixed once built. Every lookup constructs a new, independent
/// instance, so one registry can serve many trees, across threads too.
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn from_candidates(constructors: impl IntoIterator<Item = Constructor>) -> Self {
        RegistryBuilder::new().candidates(constructors).build()
    }

    pub fn get_action(&self, name: &str) -> Result<Box<dyn Task>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| (self.entries[i].constructor)())
            .ok_or_else(|| RegistryError::NotFound(name.to_owned()))
    }

    /// Draws uniformly among all registered actions using the thread-local RNG.
    pub fn get_random_action(&self) -> Result<Box<dyn Task>, RegistryError> {
        self.get_random_action_with(&mut rand::thread_rng())
    }

    pub fn get_random_action_with<R>(&self, rng: &mut R) -> Result<Box<dyn Task>, RegistryError>
    where
        R: Rng + ?Sized,
    {
        if self.entries.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }
        let entry = &self.entries[rng.gen_range(0..self.entries.len())];
        Ok((entry.constructor)())
    }

    /// Draws uniformly among the actions sharing at least one tag with `tags`.
    pub fn get_random_compatible_action_with<R>(
        &self,
        tags: &Compatibility,
        rng: &mut R,
    ) -> Result<Box<dyn Task>, RegistryError>
    where
        R: Rng + ?Sized,
    {
        if self.entries.is_empty() {
            return Err(RegistryError::EmptyRegistry);
        }
        let candidates: Vec<_> = self.compatible_entries(tags).collect();
        if candidates.is_empty() {
            let mut tags: Vec<_> = tags.iter().copied().collect();
            tags.sort_unstable();
            return Err(RegistryError::NoCompatibleAction(tags));
        }
        let entry = candidates[rng.gen_range(0..candidates.len())];
        Ok((entry.constructor)())
    }

    fn compatible_entries<'a>(
        &'a self,
        tags: &'a Compatibility,
    ) -> impl Iterator<Item = &'a ActionEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| !entry.compatibility.is_disjoint(tags))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn compatible_names<'a>(
        &'a self,
        tags: &'a Compatibility,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.compatible_entries(tags).map(|entry| entry.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
