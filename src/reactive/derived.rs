use std::rc::Rc;

use super::effect::Subscription;
use super::runtime::untracked;
use super::shared::SharedValue;

/// A value computed from other observed values.
///
/// Unlike a lazy memo, a `Derived` recomputes as soon as one of its inputs
/// changes and publishes the result through its own cell, so subscribers of
/// the derived value re-run in the same flush. Equal results are not
/// republished.
pub struct Derived<T> {
    value: SharedValue<T>,
    _subscription: Rc<Subscription>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _subscription: self._subscription.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Derived<T> {
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        let value = SharedValue::new(untracked(&compute));
        let cell = value.clone();
        let subscription = Subscription::new(move || {
            cell.set(compute());
        });

        Self {
            value,
            _subscription: Rc::new(subscription),
        }
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.value.with(f)
    }

    /// Bumped every time the derived result actually changes.
    pub fn version(&self) -> u64 {
        self.value.version()
    }
}

pub fn create_derived<T, F>(compute: F) -> Derived<T>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    Derived::new(compute)
}
