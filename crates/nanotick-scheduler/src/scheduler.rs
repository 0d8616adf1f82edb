//! The scheduler: registry ownership, execution, and next-trigger search.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use nanotick_expr::{Instant, ScheduleExpr, WallTime, MAX_NANOS};

use crate::config::{SchedulerConfig, MAX_UTC_OFFSET_MINUTES};
use crate::error::SchedulerError;
use crate::registry::{Entry, Registry, ScheduleId, ScheduleStatus};

/// Seconds scanned by [`Scheduler::next_trigger`] before giving up
/// (366 days).
pub const LOOKAHEAD_SECONDS: i64 = 366 * 86_400;

/// A passive, nanosecond-resolution cron scheduler.
///
/// The scheduler never sleeps or spawns anything: callers decide when time
/// advances by invoking [`execute`](Scheduler::execute) with an instant of
/// their choosing (or [`tick`](Scheduler::tick) for the host clock). Handles
/// are cheap to clone and share one registry, which is how callbacks get to
/// add, remove, or destroy schedules while a run is in progress.
///
/// No internal synchronization is performed; a scheduler must stay on one
/// thread or behind external locking.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<Registry>>,
}

impl Scheduler {
    /// An empty scheduler evaluating schedules in UTC.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::new(0))),
        }
    }

    /// An empty scheduler from a configuration, validated up front.
    pub fn with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(RefCell::new(Registry::new(config.utc_offset_minutes))),
        })
    }

    /// Register a schedule.
    ///
    /// The callback fires on every matching instant passed to `execute`, at
    /// most once per distinct instant. A schedule added from inside a
    /// callback is not visited until the next `execute` call.
    pub fn add<F>(&self, schedule: &str, callback: F) -> Result<ScheduleId, SchedulerError>
    where
        F: FnMut(Instant) + 'static,
    {
        let mut registry = self.inner.borrow_mut();
        if registry.destroy_pending {
            return Err(SchedulerError::Destroyed);
        }
        let expr: ScheduleExpr = schedule.parse()?;
        let id = registry.insert(Entry {
            expr,
            source: schedule.to_string(),
            callback: Rc::new(RefCell::new(callback)),
            last_fired: None,
            tombstoned: false,
            run_count: 0,
        });
        debug!(schedule, ?id, "schedule added");
        Ok(id)
    }

    /// Remove a schedule.
    ///
    /// Inside a callback the entry is tombstoned and skipped for the rest of
    /// the enclosing run; physical removal happens when the outermost
    /// executor invocation unwinds. Otherwise removal is immediate.
    pub fn remove(&self, id: ScheduleId) -> Result<(), SchedulerError> {
        let mut registry = self.inner.borrow_mut();
        if registry.destroy_pending {
            return Err(SchedulerError::Destroyed);
        }
        if !registry.entries.contains_key(id) {
            return Err(SchedulerError::ScheduleNotFound);
        }
        if registry.execution_depth > 0 {
            if let Some(entry) = registry.entries.get_mut(id) {
                entry.tombstoned = true;
            }
        } else {
            registry.remove_now(id);
        }
        debug!(?id, "schedule removed");
        Ok(())
    }

    /// Fixed offset from UTC applied when breaking instants down.
    pub fn utc_offset(&self) -> i32 {
        self.inner.borrow().utc_offset_minutes
    }

    /// Change the offset.
    ///
    /// Existing schedules are not reparsed; they are simply evaluated under
    /// the new offset from the next operation on.
    pub fn set_utc_offset(&self, minutes: i32) -> Result<(), SchedulerError> {
        let mut registry = self.inner.borrow_mut();
        if registry.destroy_pending {
            return Err(SchedulerError::Destroyed);
        }
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
            return Err(SchedulerError::OffsetOutOfRange(minutes));
        }
        registry.utc_offset_minutes = minutes;
        debug!(minutes, "utc offset changed");
        Ok(())
    }

    /// Tear the scheduler down.
    ///
    /// From inside a callback the request is recorded and honored when the
    /// outermost executor invocation unwinds; until then the handle stays
    /// dereferenceable but every operation fails with
    /// [`SchedulerError::Destroyed`].
    pub fn destroy(&self) {
        let mut registry = self.inner.borrow_mut();
        if registry.destroy_pending {
            return;
        }
        registry.destroy_pending = true;
        if registry.execution_depth == 0 {
            registry.teardown();
        }
        debug!("scheduler destroyed");
    }

    /// True once [`destroy`](Scheduler::destroy) has been requested.
    pub fn is_destroyed(&self) -> bool {
        self.inner.borrow().destroy_pending
    }

    /// Fire every schedule that matches `now`.
    ///
    /// Invalid input (out-of-range nanoseconds, a destroyed scheduler, or an
    /// instant outside the representable calendar) is a silent no-op:
    /// execute is driven from timing loops where failures have nowhere
    /// useful to go.
    pub fn execute(&self, now: Instant) {
        let (snapshot, wall) = {
            let mut registry = self.inner.borrow_mut();
            if registry.destroy_pending {
                return;
            }
            if !now.is_valid() {
                debug!(%now, "ignoring instant with out-of-range nanoseconds");
                return;
            }
            let Some(wall) = WallTime::from_instant(now, registry.utc_offset_minutes) else {
                debug!(%now, "ignoring instant outside the representable calendar");
                return;
            };
            registry.execution_depth += 1;
            (registry.order.clone(), wall)
        };

        for id in snapshot {
            if self.inner.borrow().destroy_pending {
                break;
            }
            let callback = {
                let mut registry = self.inner.borrow_mut();
                let Some(entry) = registry.entries.get_mut(id) else {
                    continue;
                };
                if entry.tombstoned || !entry.expr.matches(&wall) {
                    continue;
                }
                if entry.last_fired.is_some_and(|prev| now <= prev) {
                    continue;
                }
                // Dedup state advances before the callback runs so a
                // reentrant execute at the same instant cannot fire this
                // entry twice.
                entry.last_fired = Some(now);
                entry.run_count += 1;
                trace!(?id, %now, "schedule fired");
                Rc::clone(&entry.callback)
            };
            // The registry borrow is released here; the callback is free to
            // re-enter this scheduler. A callback already on the stack is
            // not re-entered.
            let borrowed = callback.try_borrow_mut();
            if let Ok(mut callback) = borrowed {
                (*callback)(now);
            }
        }

        self.finish_execution_scope();
    }

    /// Replay every trigger in the window `(after, until]`, oldest first.
    ///
    /// A window with `until <= after` succeeds without firing anything.
    pub fn execute_between(&self, after: Instant, until: Instant) -> Result<(), SchedulerError> {
        if self.inner.borrow().destroy_pending {
            return Err(SchedulerError::Destroyed);
        }
        if !after.is_valid() || !until.is_valid() {
            return Err(SchedulerError::InvalidInstant);
        }
        if until <= after {
            return Ok(());
        }

        self.inner.borrow_mut().execution_depth += 1;
        let mut cursor = after;
        loop {
            let Some(next) = self.next_trigger(cursor) else {
                break;
            };
            if next > until {
                break;
            }
            self.execute(next);
            if self.inner.borrow().destroy_pending {
                break;
            }
            cursor = next;
        }
        self.finish_execution_scope();
        Ok(())
    }

    /// Smallest instant strictly after `after` at which any schedule
    /// matches, scanning at most [`LOOKAHEAD_SECONDS`] ahead.
    ///
    /// Returns `None` when no schedule matches within the horizon, when
    /// `after` is invalid, or when the scheduler is destroyed.
    pub fn next_trigger(&self, after: Instant) -> Option<Instant> {
        if !after.is_valid() {
            return None;
        }
        let registry = self.inner.borrow();
        if registry.destroy_pending || registry.entries.is_empty() {
            return None;
        }

        for sec_off in 0..LOOKAHEAD_SECONDS {
            let secs = after.secs.checked_add(sec_off)?;
            let wall = WallTime::from_instant(Instant::from_secs(secs), registry.utc_offset_minutes)?;

            // The minimum matching nanosecond across schedules wins within
            // this second; ordering across seconds comes from the outer scan.
            let mut best_nanos: Option<u32> = None;
            for &id in &registry.order {
                let Some(entry) = registry.entries.get(id) else {
                    continue;
                };
                if entry.tombstoned || !entry.expr.matches_second(&wall) {
                    continue;
                }
                let lo = if sec_off == 0 {
                    // Strictly after `after`: within its second only larger
                    // nanoseconds qualify.
                    if after.nanos >= MAX_NANOS {
                        continue;
                    }
                    after.nanos + 1
                } else {
                    0
                };
                if let Some(nanos) = entry.expr.next_nanosecond(lo) {
                    if best_nanos.map_or(true, |best| nanos < best) {
                        best_nanos = Some(nanos);
                    }
                }
            }
            if let Some(nanos) = best_nanos {
                return Some(Instant::new(secs, nanos));
            }
        }
        None
    }

    /// Up to `n` upcoming triggers strictly after `after`, in order.
    pub fn next_triggers(&self, after: Instant, n: usize) -> Vec<Instant> {
        let mut results = Vec::with_capacity(n);
        let mut cursor = after;
        for _ in 0..n {
            match self.next_trigger(cursor) {
                Some(next) => {
                    results.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        results
    }

    /// Convenience: read the host UTC clock and execute.
    pub fn tick(&self) {
        self.execute(Instant::now());
    }

    /// Status snapshot for one schedule.
    pub fn status(&self, id: ScheduleId) -> Option<ScheduleStatus> {
        self.inner.borrow().status_of(id)
    }

    /// Status snapshots for every schedule, in registration order.
    pub fn statuses(&self) -> Vec<ScheduleStatus> {
        let registry = self.inner.borrow();
        registry
            .order
            .iter()
            .filter_map(|&id| registry.status_of(id))
            .collect()
    }

    /// True while `id` refers to a registered schedule.
    pub fn contains(&self, id: ScheduleId) -> bool {
        self.inner.borrow().entries.contains_key(id)
    }

    /// Number of registered schedules, tombstoned entries included.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// True when no schedules are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // End-of-scope bookkeeping shared by execute and execute_between: sweep
    // tombstones once the outermost invocation unwinds, then honor a
    // deferred destroy.
    fn finish_execution_scope(&self) {
        let mut registry = self.inner.borrow_mut();
        registry.execution_depth -= 1;
        if registry.execution_depth == 0 {
            registry.sweep();
            if registry.destroy_pending {
                registry.teardown();
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
