use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

use super::ParameterCallbackHandle;
use super::ParameterEventCallbackHandle;
use super::RegistrationKey;

/// A handle that knows whether it is still listed in a registry.
///
/// The flag starts set and is cleared exactly once, when the handle leaves
/// its list through removal.
pub(crate) trait Registration {
    fn registered_flag(&self) -> &AtomicBool;

    fn is_registered(&self) -> bool {
        self.registered_flag().load(Ordering::Acquire)
    }

    fn retire(&self) {
        self.registered_flag().store(false, Ordering::Release);
    }
}

impl Registration for ParameterCallbackHandle {
    fn registered_flag(&self) -> &AtomicBool {
        &self.registered
    }
}

impl Registration for ParameterEventCallbackHandle {
    fn registered_flag(&self) -> &AtomicBool {
        &self.registered
    }
}

/// Weak entries, newest first.
pub(crate) struct CallbackList<H> {
    entries: VecDeque<Weak<H>>,
}

impl<H> Default for CallbackList<H> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<H: Registration> CallbackList<H> {
    pub(crate) fn push_front(
        &mut self,
        handle: &Arc<H>,
    ) {
        self.entries.push_front(Arc::downgrade(handle));
    }

    /// Position of `handle`, compared by identity.
    pub(crate) fn position(
        &self,
        handle: &H,
    ) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| std::ptr::eq(entry.as_ptr(), handle))
    }

    pub(crate) fn remove(
        &mut self,
        handle: &H,
    ) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.entries.remove(pos);
                handle.retire();
                true
            }
            None => false,
        }
    }

    /// Retires every live entry and returns how many entries the list held.
    pub(crate) fn retire_all(self) -> usize {
        let len = self.entries.len();
        for handle in self.entries.iter().filter_map(Weak::upgrade) {
            handle.retire();
        }
        len
    }

    /// Erases entries whose handle was dropped.
    pub(crate) fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.strong_count() > 0);
        before - self.entries.len()
    }

    pub(crate) fn snapshot(&self) -> Vec<Weak<H>> {
        self.entries.iter().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both registries, guarded together by the dispatcher's re-entrant lock.
#[derive(Default)]
pub(crate) struct Registry {
    pub(crate) keyed: HashMap<RegistrationKey, CallbackList<ParameterCallbackHandle>>,
    pub(crate) unkeyed: CallbackList<ParameterEventCallbackHandle>,
}

impl Registry {
    /// Drops every bucket left empty by pruning or removal.
    pub(crate) fn reconcile(&mut self) {
        self.keyed.retain(|_, list| !list.is_empty());
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Visit {
    pub(crate) invoked: u64,
    pub(crate) pruned: u64,
}

/// Walks the list selected by `select` as it was when the walk started.
///
/// The `RefCell` borrow is released before every `invoke`, so a callback may
/// add or remove entries (in any list) through the re-entrant lock. Entries
/// added during the walk are not in the snapshot and are not visited. Entries
/// removed or dropped during the walk are skipped when their turn comes.
/// Dropped entries are erased from the live list once the walk is over.
pub(crate) fn walk<H: Registration>(
    registry: &RefCell<Registry>,
    select: impl Fn(&mut Registry) -> Option<&mut CallbackList<H>>,
    mut invoke: impl FnMut(&H),
) -> Visit {
    let mut visit = Visit::default();

    let snapshot = match select(&mut registry.borrow_mut()) {
        Some(list) => list.snapshot(),
        None => return visit,
    };

    for entry in snapshot {
        let Some(handle) = entry.upgrade() else {
            continue;
        };
        if !handle.is_registered() {
            continue;
        }
        invoke(handle.as_ref());
        visit.invoked += 1;
    }

    if let Some(list) = select(&mut registry.borrow_mut()) {
        visit.pruned = list.prune() as u64;
    }
    visit
}
