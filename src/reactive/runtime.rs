use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

// Cell ids are process-wide so a value written on another thread never
// aliases a cell that this thread's runtime tracks.
static NEXT_CELL_ID: AtomicUsize = AtomicUsize::new(0);

pub type CellId = usize;
pub type ObserverId = usize;

type Callback = Box<dyn FnMut()>;

enum ObserverSlot {
    Idle(Callback),
    Running,
    Disposed,
}

/// Per-thread dependency tracker.
///
/// Observers record which cells they read while running. A write to one of
/// those cells queues the observer; the queue is flushed once the outermost
/// batch closes, so an observer sees every write of a batch at once.
#[derive(Default)]
pub struct Runtime {
    current_observer: Option<ObserverId>,
    pending: Vec<ObserverId>,
    observers: Vec<ObserverSlot>,
    dependencies: Vec<HashSet<CellId>>,
    subscribers: HashMap<CellId, HashSet<ObserverId>>,
    batch_depth: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_observer(&mut self, callback: Callback) -> ObserverId {
        let id = self.observers.len();
        self.observers.push(ObserverSlot::Idle(callback));
        self.dependencies.push(HashSet::new());
        id
    }

    fn track_read(&mut self, cell: CellId) {
        if let Some(observer) = self.current_observer {
            self.subscribers.entry(cell).or_default().insert(observer);
            self.dependencies[observer].insert(cell);
        }
    }

    fn queue_subscribers(&mut self, cell: CellId) {
        let Some(subscribers) = self.subscribers.get(&cell) else {
            return;
        };
        for &observer in subscribers {
            if !self.pending.contains(&observer) {
                self.pending.push(observer);
            }
        }
    }

    fn clear_dependencies(&mut self, observer: ObserverId) {
        let old = std::mem::take(&mut self.dependencies[observer]);
        for cell in old {
            if let Some(subscribers) = self.subscribers.get_mut(&cell) {
                subscribers.remove(&observer);
                if subscribers.is_empty() {
                    self.subscribers.remove(&cell);
                }
            }
        }
    }

    fn dispose_observer(&mut self, observer: ObserverId) {
        self.clear_dependencies(observer);
        self.observers[observer] = ObserverSlot::Disposed;
        self.pending.retain(|&id| id != observer);
    }
}

pub(crate) fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

pub(crate) fn allocate_cell() -> CellId {
    NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed)
}

pub(crate) fn track_read(cell: CellId) {
    RUNTIME.with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            runtime.track_read(cell);
        }
    });
}

/// Queue every observer of `cell` and flush unless a batch is open.
pub(crate) fn notify_write(cell: CellId) {
    let should_flush = RUNTIME.with(|rt| {
        let Ok(mut runtime) = rt.try_borrow_mut() else {
            return false;
        };
        runtime.queue_subscribers(cell);
        runtime.batch_depth == 0 && !runtime.flushing
    });
    if should_flush {
        flush();
    }
}

/// Register an observer and run it once to collect its dependencies.
pub(crate) fn create_observer(callback: Callback) -> ObserverId {
    let id = with_runtime(|rt| rt.allocate_observer(callback));
    run_observer(id);
    id
}

pub(crate) fn dispose_observer(id: ObserverId) {
    // The runtime may already be gone when a guard drops during thread exit
    let _ = RUNTIME.try_with(|rt| {
        if let Ok(mut runtime) = rt.try_borrow_mut() {
            runtime.dispose_observer(id);
        }
    });
}

/// Run an observer with dependency tracking.
///
/// The callback is taken out of the runtime while it runs, so it is free to
/// read and write cells (which borrow the runtime themselves).
fn run_observer(id: ObserverId) {
    let taken = with_runtime(|rt| {
        let slot = std::mem::replace(&mut rt.observers[id], ObserverSlot::Running);
        match slot {
            ObserverSlot::Idle(callback) => {
                rt.clear_dependencies(id);
                let previous = rt.current_observer.replace(id);
                Some((callback, previous))
            }
            other => {
                rt.observers[id] = other;
                None
            }
        }
    });

    let Some((mut callback, previous)) = taken else {
        return;
    };

    callback();

    with_runtime(|rt| {
        rt.current_observer = previous;
        if matches!(rt.observers[id], ObserverSlot::Running) {
            rt.observers[id] = ObserverSlot::Idle(callback);
        }
    });
}

fn flush() {
    with_runtime(|rt| rt.flushing = true);
    loop {
        let next = with_runtime(|rt| {
            if rt.pending.is_empty() {
                None
            } else {
                Some(rt.pending.remove(0))
            }
        });
        match next {
            Some(id) => run_observer(id),
            None => break,
        }
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Run `f` without recording reads into the current observer.
pub fn untracked<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = with_runtime(|rt| rt.current_observer.take());
    let result = f();
    with_runtime(|rt| rt.current_observer = previous);
    result
}

/// Group writes so observers run once, after all of them have landed.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    let should_flush = with_runtime(|rt| {
        rt.batch_depth -= 1;
        rt.batch_depth == 0 && !rt.flushing
    });
    if should_flush {
        flush();
    }
    result
}
