/*!

An interned string. All names in the system (sorts, operations, variables, strategy
declarations) are `IString`s: cloning is a reference-count bump, and equality of two
interned strings is almost always a pointer comparison.

The interner is a process-wide table, lazily created on first use. Entries are never
removed; names are small and live for the lifetime of the signatures that mention
them.

*/

use std::{
  collections::HashSet,
  fmt::{Debug, Display, Formatter},
  ops::Deref,
  sync::{Arc, Mutex},
};

use once_cell::sync::Lazy;

static INTERNER: Lazy<Mutex<HashSet<Arc<str>>>> = Lazy::new(|| Mutex::new(HashSet::new()));

#[derive(Clone, Eq, Hash, PartialOrd, Ord)]
pub struct IString(Arc<str>);

impl IString {
  pub fn new(name: &str) -> IString {
    let mut interner = INTERNER.lock().unwrap();
    if let Some(existing) = interner.get(name) {
      return IString(existing.clone());
    }
    let entry: Arc<str> = Arc::from(name);
    interner.insert(entry.clone());
    IString(entry)
  }

  #[inline(always)]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl PartialEq for IString {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
  }
}

impl Deref for IString {
  type Target = str;

  fn deref(&self) -> &str {
    &self.0
  }
}

impl From<&str> for IString {
  fn from(name: &str) -> Self {
    IString::new(name)
  }
}

impl From<String> for IString {
  fn from(name: String) -> Self {
    IString::new(&name)
  }
}

impl Default for IString {
  fn default() -> Self {
    IString::new("")
  }
}

impl Display for IString {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", &self.0)
  }
}

impl Debug for IString {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}", &self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interning_shares_storage() {
    let a = IString::new("philo");
    let b = IString::new("philo");
    assert!(Arc::ptr_eq(&a.0, &b.0));
    assert_eq!(a, b);
  }

  #[test]
  fn distinct_names_differ() {
    let a = IString::new("fork");
    let b = IString::new("ph");
    assert_ne!(a, b);
    assert_eq!(a.as_str(), "fork");
  }
}
