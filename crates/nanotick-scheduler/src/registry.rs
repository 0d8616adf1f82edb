//! Owned schedule storage: entries, handles, and status snapshots.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use slotmap::{new_key_type, SlotMap};

use nanotick_expr::{Instant, ScheduleExpr};

new_key_type! {
    /// Stable handle to a registered schedule.
    ///
    /// Keys are generational: once a schedule is gone its handle keeps
    /// failing the membership check instead of aliasing a later schedule.
    pub struct ScheduleId;
}

pub(crate) type Callback = Rc<RefCell<dyn FnMut(Instant)>>;

pub(crate) struct Entry {
    pub expr: ScheduleExpr,
    pub source: String,
    pub callback: Callback,
    /// Most recent instant this entry fired at; the executor refuses to
    /// fire twice for the same instant.
    pub last_fired: Option<Instant>,
    /// Marked for removal; skipped by executors and dropped at the
    /// end-of-scope sweep.
    pub tombstoned: bool,
    pub run_count: u64,
}

/// Point-in-time view of one registered schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStatus {
    /// The schedule text as originally registered.
    pub expression: String,
    /// Instant of the most recent firing, if any.
    pub last_fired: Option<Instant>,
    /// Number of times the callback has fired.
    pub run_count: u64,
    /// True when removal was requested from inside a callback and the entry
    /// awaits the end-of-scope sweep.
    pub pending_removal: bool,
}

pub(crate) struct Registry {
    pub entries: SlotMap<ScheduleId, Entry>,
    /// Registration order; executors iterate a snapshot of this.
    pub order: Vec<ScheduleId>,
    pub utc_offset_minutes: i32,
    /// Nesting depth of executor invocations currently on the stack.
    pub execution_depth: u32,
    /// Set by destroy; once set, every subsequent operation fails.
    pub destroy_pending: bool,
}

impl Registry {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            utc_offset_minutes,
            execution_depth: 0,
            destroy_pending: false,
        }
    }

    pub fn insert(&mut self, entry: Entry) -> ScheduleId {
        let id = self.entries.insert(entry);
        self.order.push(id);
        id
    }

    /// Physically drop an entry right away. Only valid outside execution.
    pub fn remove_now(&mut self, id: ScheduleId) {
        self.entries.remove(id);
        self.order.retain(|&other| other != id);
    }

    /// Drop every tombstoned entry. Runs when the outermost executor scope
    /// unwinds.
    pub fn sweep(&mut self) {
        let entries = &mut self.entries;
        self.order.retain(|&id| match entries.get(id) {
            Some(entry) if entry.tombstoned => {
                entries.remove(id);
                false
            }
            Some(_) => true,
            None => false,
        });
    }

    /// Release every entry; the registry stays unusable afterwards.
    pub fn teardown(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn status_of(&self, id: ScheduleId) -> Option<ScheduleStatus> {
        self.entries.get(id).map(|entry| ScheduleStatus {
            expression: entry.source.clone(),
            last_fired: entry.last_fired,
            run_count: entry.run_count,
            pending_removal: entry.tombstoned,
        })
    }
}
