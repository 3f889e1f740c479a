use super::runtime::{ObserverId, create_observer, dispose_observer};

/// Guard for a callback that re-runs whenever a value it read changes.
///
/// The callback runs once immediately. Dropping the guard unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: ObserverId,
}

impl Subscription {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            id: create_observer(Box::new(f)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        dispose_observer(self.id);
    }
}

pub fn subscribe<F>(f: F) -> Subscription
where
    F: FnMut() + 'static,
{
    Subscription::new(f)
}
