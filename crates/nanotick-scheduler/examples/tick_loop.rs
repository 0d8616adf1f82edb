//! Demo: drive a scheduler from the host clock.
//!
//! Usage:
//! ```bash
//! cargo run --example tick_loop
//! ```
//!
//! Prints a line whenever the wall clock crosses a second divisible by 5.

use std::thread;
use std::time::Duration;

use nanotick_scheduler::Scheduler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let scheduler = Scheduler::new();
    scheduler.add("* */5 * * * * *", |at| {
        println!("fired at {at}");
    })?;

    loop {
        scheduler.tick();
        // Tick once per second so a matching second fires at most once.
        thread::sleep(Duration::from_secs(1));
    }
}
