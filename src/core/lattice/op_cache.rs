/*!

The memoisation cache an element carries for one lattice operation.

Entries are keyed by the other operand's identity and hold the result weakly, so
the cache never extends the lifetime of a result beyond other live references.
A dead entry behaves like a miss; recomputation is always safe. Dead entries are
swept out periodically, on insertion.

*/

use std::{
  cell::{Cell, RefCell},
  collections::HashMap,
  rc::{Rc, Weak},
};

const SWEEP_INTERVAL: u32 = 256;

pub(crate) struct OpCache<T> {
  entries    : RefCell<HashMap<usize, Weak<T>>>,
  hits       : Cell<u64>,
  misses     : Cell<u64>,
  since_sweep: Cell<u32>,
}

impl<T> Default for OpCache<T> {
  fn default() -> Self {
    OpCache {
      entries    : RefCell::new(HashMap::new()),
      hits       : Cell::new(0),
      misses     : Cell::new(0),
      since_sweep: Cell::new(0),
    }
  }
}

impl<T> OpCache<T> {
  pub fn lookup(&self, key: usize) -> Option<Rc<T>> {
    let result = self.entries.borrow().get(&key).and_then(Weak::upgrade);
    match &result {
      Some(_) => self.hits.set(self.hits.get() + 1),
      None => self.misses.set(self.misses.get() + 1),
    }
    result
  }

  pub fn insert(&self, key: usize, value: &Rc<T>) {
    let mut entries = self.entries.borrow_mut();
    entries.insert(key, Rc::downgrade(value));

    let since_sweep = self.since_sweep.get() + 1;
    if since_sweep >= SWEEP_INTERVAL {
      entries.retain(|_, weak| weak.strong_count() > 0);
      self.since_sweep.set(0);
    } else {
      self.since_sweep.set(since_sweep);
    }
  }

  /// Drops every entry. Results are recomputed on demand; observable behavior
  /// does not change.
  pub fn clear(&self) {
    self.entries.borrow_mut().clear();
  }

  pub fn hits(&self) -> u64 {
    self.hits.get()
  }

  pub fn misses(&self) -> u64 {
    self.misses.get()
  }
}
