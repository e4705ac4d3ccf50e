use crate::Symbol;
use ::once_cell::sync::Lazy;
use std::{any::Any, collections::HashMap, fmt, rc::Rc, str::FromStr};

/// Blackboard entry cleared by [`crate::Tree::tick`] at the start of every cycle.
/// Learning code appends its per-tick Q-value trace here.
pub static DEBUG_STRING_KEY: Lazy<Symbol> = Lazy::new(|| "QValueDebugString".into());

/// A value stored in the blackboard.
///
/// The scalar variants cover what trees usually exchange. Anything else goes
/// into [`Value::Any`], which is wrapped in an `Rc` so that the blackboard stays
/// cloneable without requiring the payload to implement `Clone`.
#[derive(Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Any(Rc<dyn Any>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats; nothing else converts.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Any(any) => any.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Text(s) => write!(f, "Text({s:?})"),
            Self::Any(_) => write!(f, "Any(..)"),
        }
    }
}

/// `Any` payloads compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Int(l), Self::Int(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => l == r,
            (Self::Text(l), Self::Text(r)) => l == r,
            (Self::Any(l), Self::Any(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(x.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Anything a blackboard can be read with.
///
/// Text keys are resolved against the interned symbols without adding to them,
/// so reading a key that was never written leaves the symbol table untouched.
pub trait BlackboardKey {
    fn existing_symbol(&self) -> Option<Symbol>;
}

impl BlackboardKey for Symbol {
    fn existing_symbol(&self) -> Option<Symbol> {
        Some(*self)
    }
}

impl BlackboardKey for str {
    fn existing_symbol(&self) -> Option<Symbol> {
        Symbol::lookup(self)
    }
}

impl BlackboardKey for String {
    fn existing_symbol(&self) -> Option<Symbol> {
        Symbol::lookup(self)
    }
}

impl<K: BlackboardKey + ?Sized> BlackboardKey for &K {
    fn existing_symbol(&self) -> Option<Symbol> {
        (**self).existing_symbol()
    }
}

/// Shared memory of one tree instance.
///
/// Readers are expected to know the type stored under a key. Every getter
/// returns `None` both for a missing key and for a value of another variant.
#[derive(Default, Debug, Clone)]
pub struct Blackboard {
    memory: HashMap<Symbol, Value>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_value(&self, key: impl BlackboardKey) -> Option<&Value> {
        self.memory.get(&key.existing_symbol()?)
    }

    /// Overwrites any previous value under `key`.
    pub fn set_value(&mut self, key: impl Into<Symbol>, value: impl Into<Value>) {
        self.memory.insert(key.into(), value.into());
    }

    pub fn get_bool(&self, key: impl BlackboardKey) -> Option<bool> {
        self.get_value(key).and_then(Value::as_bool)
    }

    pub fn get_int(&self, key: impl BlackboardKey) -> Option<i64> {
        self.get_value(key).and_then(Value::as_int)
    }

    pub fn get_float(&self, key: impl BlackboardKey) -> Option<f64> {
        self.get_value(key).and_then(Value::as_float)
    }

    pub fn get_str(&self, key: impl BlackboardKey) -> Option<&str> {
        self.get_value(key).and_then(Value::as_str)
    }

    pub fn get_any<T: 'static>(&self, key: impl BlackboardKey) -> Option<&T> {
        self.get_value(key).and_then(Value::downcast_ref)
    }

    pub fn set_any<T: 'static>(&mut self, key: impl Into<Symbol>, val: T) {
        self.memory.insert(key.into(), Value::Any(Rc::new(val)));
    }

    /// Reads a value and converts it to `T` through its textual form.
    ///
    /// An `Any` payload of type `T` is cloned as is.
    pub fn get_parse<T>(&self, key: impl BlackboardKey) -> Option<T>
    where
        T: FromStr + Clone + 'static,
    {
        match self.get_value(key)? {
            Value::Bool(b) => b.to_string().parse().ok(),
            Value::Int(i) => i.to_string().parse().ok(),
            Value::Float(x) => x.to_string().parse().ok(),
            Value::Text(s) => s.parse().ok(),
            Value::Any(any) => any.downcast_ref::<T>().cloned(),
        }
    }

    pub fn remove(&mut self, key: impl BlackboardKey) -> Option<Value> {
        self.memory.remove(&key.existing_symbol()?)
    }

    pub fn contains_key(&self, key: impl BlackboardKey) -> bool {
        key.existing_symbol()
            .map_or(false, |key| self.memory.contains_key(&key))
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    pub fn clear(&mut self) {
        self.memory.clear();
    }

    /// Keys in ascending text order.
    pub fn keys(&self) -> Vec<Symbol> {
        let mut keys: Vec<_> = self.memory.keys().copied().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Target {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_set_get() {
        let mut bb = Blackboard::new();
        bb.set_value("hp", 42);
        bb.set_value("name", "goblin");
        bb.set_value("alert", true);
        bb.set_value("speed", 1.5);

        assert_eq!(bb.get_int("hp"), Some(42));
        assert_eq!(bb.get_str("name"), Some("goblin"));
        assert_eq!(bb.get_bool("alert"), Some(true));
        assert_eq!(bb.get_float("speed"), Some(1.5));
        assert_eq!(bb.get_value("hp"), Some(&Value::Int(42)));
        assert_eq!(bb.len(), 4);
    }

    #[test]
    fn test_absent_key() {
        let bb = Blackboard::new();
        assert_eq!(bb.get_value("missing"), None);
        assert_eq!(bb.get_int("missing"), None);
        assert!(!bb.contains_key("missing"));
    }

    #[test]
    fn test_reads_do_not_intern() {
        let mut bb = Blackboard::new();
        let key = String::from("never_written_key");
        assert_eq!(bb.get_value(&key), None);
        assert_eq!(bb.get_int(key.as_str()), None);
        assert!(!bb.contains_key(&key));
        assert_eq!(bb.remove(&key), None);
        assert_eq!(Symbol::lookup(&key), None);

        bb.set_value(&key, 1);
        assert_eq!(bb.get_int(&key), Some(1));
    }

    #[test]
    fn test_last_write_wins() {
        let mut bb = Blackboard::new();
        bb.set_value("hp", 10);
        bb.set_value("hp", "dead");
        assert_eq!(bb.get_int("hp"), None);
        assert_eq!(bb.get_str("hp"), Some("dead"));
        assert_eq!(bb.len(), 1);
    }

    #[test]
    fn test_any_values() {
        let mut bb = Blackboard::new();
        bb.set_any("target", Target { x: 3, y: -1 });
        assert_eq!(
            bb.get_any::<Target>("target"),
            Some(&Target { x: 3, y: -1 })
        );
        assert_eq!(bb.get_any::<String>("target"), None);

        let copy = bb.clone();
        assert_eq!(copy.get_value("target"), bb.get_value("target"));
    }

    #[test]
    fn test_get_parse() {
        let mut bb = Blackboard::new();
        bb.set_value("count", "12");
        bb.set_value("hp", 7);
        bb.set_value("flag", "yes");
        assert_eq!(bb.get_parse::<usize>("count"), Some(12));
        assert_eq!(bb.get_parse::<f64>("hp"), Some(7.0));
        assert_eq!(bb.get_parse::<bool>("flag"), None);
    }

    #[test]
    fn test_keys_sorted() {
        let mut bb = Blackboard::new();
        bb.set_value("b_key", 1);
        bb.set_value("a_key", 2);
        let keys: Vec<_> = bb.keys().into_iter().map(Symbol::as_str).collect();
        assert_eq!(keys, vec!["a_key", "b_key"]);
        assert_eq!(bb.remove("a_key"), Some(Value::Int(2)));
        bb.clear();
        assert!(bb.is_empty());
    }
}
