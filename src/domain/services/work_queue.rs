//! Work queue of pending resolve tasks
//!
//! Seeded from the root manifest and grown as module manifests are fetched.
//! The queue also owns the name → ledger entry map, so popping a task is the
//! one place where an entry is created and where its history grows.
//!
//! Workers block in [`WorkQueue::pop`] while the queue is empty but other
//! workers are still processing tasks (they may push more). `pop` returns
//! `None` once the queue is drained and idle, or after [`WorkQueue::close`].
//!
//! History is appended under the entry's own lock after the queue lock is
//! released, since a worker may hold an entry lock across registry I/O. Every
//! popped request lands in its entry's history exactly once, but two racing
//! pops for the same name may record in either order. Constraints are ANDed
//! and channels compared as a set, so only the order of diagnostic lines can
//! differ.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::domain::entities::{default_uri, Module, ModuleRef};
use crate::domain::services::ledger::{LedgerEntry, Resolution};
use crate::domain::value_objects::VersionSpec;

/// A queued request for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTask {
    pub spec: ModuleRef,
    /// Who asked, for diagnostics only
    pub parent: String,
}

impl ResolveTask {
    pub fn new(spec: ModuleRef, parent: impl Into<String>) -> Self {
        Self {
            spec,
            parent: parent.into(),
        }
    }
}

/// A task taken off the queue, with its ledger entry.
///
/// The task counts as in flight until this value is dropped.
pub struct PoppedTask<'q> {
    pub task: ResolveTask,
    pub entry: Arc<Mutex<LedgerEntry>>,
    /// URI to fetch the module from; `None` for injected modules
    pub fetch_uri: Option<String>,
    _in_flight: InFlight<'q>,
}

impl PoppedTask<'_> {
    pub fn name(&self) -> &str {
        &self.task.spec.name
    }

    pub fn is_injected(&self) -> bool {
        self.fetch_uri.is_none()
    }
}

struct InFlight<'q> {
    queue: &'q WorkQueue,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.queue.finish_one();
    }
}

struct Slot {
    entry: Arc<Mutex<LedgerEntry>>,
    dont_resolve: bool,
    requested: bool,
}

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<ResolveTask>,
    slots: HashMap<String, Slot>,
    order: Vec<String>,
    in_flight: usize,
    closed: bool,
}

impl QueueState {
    /// The slot for `name`, recording its discovery on the first request.
    fn slot(&mut self, name: &str) -> &Slot {
        let slot = self.slots.entry(name.to_string()).or_insert_with(|| Slot {
            entry: Arc::new(Mutex::new(LedgerEntry::new())),
            dont_resolve: false,
            requested: false,
        });
        if !slot.requested {
            slot.requested = true;
            self.order.push(name.to_string());
        }
        slot
    }
}

pub struct WorkQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
    replacements: BTreeMap<String, String>,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl WorkQueue {
    /// Create a queue; `replacements` maps module names to the URL to fetch them from.
    pub fn new(replacements: BTreeMap<String, String>) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            ready: Condvar::new(),
            replacements,
        }
    }

    pub fn push(&self, task: ResolveTask) {
        self.state.lock().tasks.push_back(task);
        self.ready.notify_one();
    }

    /// Register a module that is answered as-is and never resolved.
    pub fn inject(&self, module: Module) {
        let mut state = self.state.lock();
        let name = module.name().to_string();
        let requested = state.slots.get(&name).is_some_and(|slot| slot.requested);
        state.slots.insert(
            name,
            Slot {
                entry: Arc::new(Mutex::new(LedgerEntry::injected(module))),
                dont_resolve: true,
                requested,
            },
        );
    }

    /// Take the next task, waiting while other workers may still add some.
    pub fn pop(&self) -> Option<PoppedTask<'_>> {
        let mut state = self.state.lock();
        let mut task = loop {
            if state.closed {
                return None;
            }
            if let Some(task) = state.tasks.pop_front() {
                break task;
            }
            if state.in_flight == 0 {
                return None;
            }
            self.ready.wait(&mut state);
        };

        normalize_spec(&mut task.spec);
        state.in_flight += 1;
        let slot = state.slot(&task.spec.name);
        let entry = Arc::clone(&slot.entry);
        let dont_resolve = slot.dont_resolve;
        drop(state);

        let in_flight = InFlight { queue: self };
        if dont_resolve {
            return Some(PoppedTask {
                task,
                entry,
                fetch_uri: None,
                _in_flight: in_flight,
            });
        }

        entry.lock().record(Resolution {
            constraint: task.spec.version.clone(),
            channel: task.spec.effective_channel().to_string(),
            parent: task.parent.clone(),
        });
        let fetch_uri = self
            .replacements
            .get(&task.spec.name)
            .cloned()
            .unwrap_or_else(|| default_uri(&task.spec.name));

        Some(PoppedTask {
            task,
            entry,
            fetch_uri: Some(fetch_uri),
            _in_flight: in_flight,
        })
    }

    /// Stop handing out tasks; every waiting and future `pop` returns `None`.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn finish_one(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            self.ready.notify_all();
        }
    }

    /// Number of tasks waiting to be popped.
    pub fn pending(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Every requested module's ledger entry, in the order the names were first requested.
    pub fn discovered(&self) -> Vec<(String, Arc<Mutex<LedgerEntry>>)> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .filter_map(|name| {
                state
                    .slots
                    .get(name)
                    .map(|slot| (name.clone(), Arc::clone(&slot.entry)))
            })
            .collect()
    }
}

/// A requested version that is not a semver constraint names a channel.
fn normalize_spec(spec: &mut ModuleRef) {
    match VersionSpec::classify(&spec.version) {
        VersionSpec::Any => spec.version.clear(),
        VersionSpec::Constraint(constraint) => spec.version = constraint.as_str().to_string(),
        VersionSpec::Channel(channel) => {
            spec.channel = channel;
            spec.version.clear();
            spec.prerelease = false;
        }
    }
}
