//! Interned strings used as blackboard keys.
//!
//! A symbol is a pointer into a process-wide table of leaked strings, so two
//! symbols built from the same text always share the same address.

use ::once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard};

static SYMBOL_HEAP: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));

fn heap() -> MutexGuard<'static, HashSet<&'static str>> {
    // The table is only ever inserted into, so a poisoned lock still holds valid entries.
    SYMBOL_HEAP
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An interned string with O(1) equality and hashing.
#[derive(Clone, Copy, Eq)]
pub struct Symbol {
    s: &'static str,
}

impl Symbol {
    /// Retrieves the address of the backing string.
    pub fn addr(self) -> usize {
        self.s.as_ptr() as usize
    }

    /// Retrieves the string from the Symbol.
    pub fn as_str(self) -> &'static str {
        self.s
    }

    /// Finds the symbol for `s` if it was interned before. Never interns.
    pub fn lookup(s: &str) -> Option<Symbol> {
        heap().get(s).map(|&s| Symbol { s })
    }
}

impl Debug for Symbol {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        Debug::fmt(self.s, fmt)
    }
}

impl Display for Symbol {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        fmt.write_str(self.s)
    }
}

impl Deref for Symbol {
    type Target = str;
    fn deref(&self) -> &str {
        self.s
    }
}

impl<S: AsRef<str>> From<S> for Symbol {
    fn from(s: S) -> Symbol {
        let s = s.as_ref();
        let mut heap = heap();
        if let Some(interned) = heap.get(s) {
            return Symbol { s: *interned };
        }
        let interned: &'static str = Box::leak(s.to_owned().into_boxed_str());
        heap.insert(interned);
        Symbol { s: interned }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.s == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.s == *other
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state)
    }
}

/// Ordered by text so that sorted key listings are stable across runs.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.s.cmp(other.s)
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_interning() {
        let a: Symbol = "interning_test".into();
        let b: Symbol = String::from("interning_test").into();
        assert_eq!(a, b);
        assert_eq!(a.addr(), b.addr());
        assert_eq!(a, "interning_test");
        assert_ne!(a, Symbol::from("interning_test_other"));
    }

    #[test]
    fn test_lookup_does_not_intern() {
        assert_eq!(Symbol::lookup("lookup_test_absent"), None);
        assert_eq!(Symbol::lookup("lookup_test_absent"), None);

        let sym: Symbol = "lookup_test_present".into();
        assert_eq!(Symbol::lookup("lookup_test_present"), Some(sym));
    }

    #[test]
    fn test_ordering_by_text() {
        let mut syms: Vec<Symbol> = vec!["zeta".into(), "alpha".into(), "mu".into()];
        syms.sort();
        let names: Vec<_> = syms.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mu", "zeta"]);
    }
}
