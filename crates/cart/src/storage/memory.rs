//! In-process storage.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use super::KeyValueStore;

/// In-memory key-value store.
///
/// Clones share the same slots, the way two tabs of one browser profile share
/// local storage. Not thread-safe; the cart is single-threaded.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    slots: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove` calls made through any clone.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.get()
    }

    /// Raw value for `key`, bypassing the trait.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.slots.borrow().get(key).cloned()
    }

    fn bump(&self) {
        self.inner.writes.set(self.inner.writes.get() + 1);
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.inner
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.bump();
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.inner.slots.borrow_mut().remove(key);
        self.bump();
        Ok(())
    }
}
