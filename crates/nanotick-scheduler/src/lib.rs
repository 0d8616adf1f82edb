//! Passive cron-style scheduler with nanosecond-precision matching.
//!
//! This crate owns parsed schedules and decides, for any caller-supplied
//! instant, which of them fire. It never touches a timer or a thread:
//! callers drive it by handing instants to [`Scheduler::execute`] (or by
//! calling [`Scheduler::tick`] for the host clock).
//!
//! # Features
//!
//! - **7-field expressions** with nanosecond resolution, parsed by
//!   [`nanotick_expr`] (see its docs for the grammar)
//! - **Exactly-once firing** per schedule per distinct instant, even when a
//!   callback re-enters the scheduler
//! - **Reentrant mutation**: callbacks may add, remove, or destroy while a
//!   run is in progress; removal and teardown are deferred to the end of
//!   the outermost run
//! - **Next-trigger search** over a 366-day horizon, including sub-second
//!   placement from the nanosecond field
//! - **Catch-up replay** of every trigger in a window via
//!   [`Scheduler::execute_between`]
//! - **Fixed UTC offset** evaluation (whole minutes, no DST rules)
//! - **Status observability** per schedule via [`ScheduleStatus`]
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use nanotick_scheduler::{Instant, Scheduler};
//!
//! let scheduler = Scheduler::new();
//!
//! let fired = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&fired);
//! scheduler
//!     .add("0 * * * * * *", move |_at| seen.set(seen.get() + 1))
//!     .unwrap();
//!
//! let now = Instant::new(1_739_788_200, 0);
//! scheduler.execute(now);
//! scheduler.execute(now); // same instant: deduplicated
//! assert_eq!(fired.get(), 1);
//!
//! assert_eq!(
//!     scheduler.next_trigger(now),
//!     Some(Instant::new(1_739_788_201, 0))
//! );
//! ```

mod config;
mod error;
mod registry;
mod scheduler;

pub use config::{SchedulerConfig, MAX_UTC_OFFSET_MINUTES};
pub use error::SchedulerError;
pub use registry::{ScheduleId, ScheduleStatus};
pub use scheduler::{Scheduler, LOOKAHEAD_SECONDS};

pub use nanotick_expr::{Instant, ParseError, ScheduleExpr, WallTime, MAX_NANOS};
