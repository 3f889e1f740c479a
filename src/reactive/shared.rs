use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::invalidation::request_frame;
use super::runtime::{CellId, allocate_cell, notify_write, track_read};

struct SharedInner<T> {
    id: CellId,
    value: RwLock<T>,
    version: AtomicU64,
}

/// A publish-on-write cell that can be read from any thread.
///
/// Every write that changes the value bumps the version, requests a frame and
/// queues the observers that read this cell on the writing thread. The whole
/// value lives behind one lock, so a reader always sees a complete write,
/// never a mix of two.
pub struct SharedValue<T> {
    inner: Arc<SharedInner<T>>,
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> SharedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                id: allocate_cell(),
                value: RwLock::new(value),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Read-only handle sharing this cell.
    pub fn reader(&self) -> ReadValue<T> {
        ReadValue {
            inner: self.inner.clone(),
        }
    }

    /// Number of changing writes so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        track_read(self.inner.id);
        self.with_untracked(f)
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read().expect("shared value lock poisoned"))
    }

    fn publish(&self) {
        self.inner.version.fetch_add(1, Ordering::AcqRel);
        request_frame();
        notify_write(self.inner.id);
    }
}

impl<T: Clone> SharedValue<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: PartialEq> SharedValue<T> {
    /// Replace the value. Observers only hear about actual changes.
    pub fn set(&self, value: T) -> bool {
        let Ok(mut guard) = self.inner.value.write() else {
            return false;
        };
        if *guard == value {
            return false;
        }
        *guard = value;
        drop(guard);
        self.publish();
        true
    }
}

impl<T: PartialEq + Clone> SharedValue<T> {
    /// Mutate the value in place under a single write lock.
    ///
    /// Returns whether the value changed.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let Ok(mut guard) = self.inner.value.write() else {
            return false;
        };
        let before = guard.clone();
        f(&mut *guard);
        let changed = *guard != before;
        drop(guard);
        if changed {
            self.publish();
        }
        changed
    }
}

/// Read-only view of a [`SharedValue`], cheap to clone and `Send` when the
/// value is.
pub struct ReadValue<T> {
    inner: Arc<SharedInner<T>>,
}

impl<T> Clone for ReadValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> ReadValue<T> {
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        track_read(self.inner.id);
        f(&self.inner.value.read().expect("shared value lock poisoned"))
    }
}

impl<T: Clone> ReadValue<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

pub fn create_shared<T>(value: T) -> SharedValue<T> {
    SharedValue::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let value = create_shared(42);
        assert_eq!(value.get(), 42);
        assert_eq!(value.version(), 0);
    }

    #[test]
    fn test_set_only_publishes_changes() {
        let value = create_shared(5);
        assert!(!value.set(5));
        assert_eq!(value.version(), 0);
        assert!(value.set(10));
        assert_eq!(value.get(), 10);
        assert_eq!(value.version(), 1);
    }

    #[test]
    fn test_update_reports_change() {
        let value = create_shared((1, 2));
        assert!(value.update(|pair| pair.0 += 10));
        assert!(!value.update(|pair| pair.1 = 2));
        assert_eq!(value.get(), (11, 2));
    }

    #[test]
    fn test_reader_shares_cell() {
        let value = create_shared(String::from("a"));
        let reader = value.reader();
        value.set(String::from("b"));
        assert_eq!(reader.get(), "b");
        assert_eq!(reader.version(), value.version());
    }

    #[test]
    fn test_reader_is_send_across_threads() {
        let value = create_shared(7u32);
        let reader = value.reader();
        let handle = std::thread::spawn(move || reader.get());
        assert_eq!(handle.join().unwrap(), 7);
    }
}
