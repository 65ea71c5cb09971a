//! Tick timing for fixed-rate simulation loops.
//!
//! Measures how long the phases of a simulation tick take (integration,
//! terrain clipping, detection, resolution — whatever the caller
//! checkpoints) so the owning loop can verify a tick fits its period
//! budget. Reports accumulate into fixed-capacity strings; no allocation.
//!
//! Only available with the `std` feature (the clock comes from the host).

use core::fmt::Write;
use heapless::String;

fn now_us() -> u64 {
    extern crate std;
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_micros() as u64
}

/// Checkpoint-based timing for one simulation tick at a time.
///
/// Call [`start_of_tick`] at the top of the loop body, [`add_measurement`]
/// after each phase of interest, and [`finish_tick`] at the bottom. The
/// completed report stays readable through [`report`] while the next tick
/// is being measured.
///
/// [`start_of_tick`]: TickCounter::start_of_tick
/// [`add_measurement`]: TickCounter::add_measurement
/// [`finish_tick`]: TickCounter::finish_tick
/// [`report`]: TickCounter::report
#[derive(Debug)]
pub struct TickCounter {
    tick_count: u64,
    text: String<256>,
    old_text: String<256>,
    start_time_us: u64,
    last_checkpoint_us: u64,
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounter {
    pub fn new() -> Self {
        let now = now_us();
        Self {
            tick_count: 0,
            text: String::new(),
            old_text: String::new(),
            start_time_us: now,
            last_checkpoint_us: now,
        }
    }

    /// Begin timing a new tick. Clears the in-progress measurements.
    pub fn start_of_tick(&mut self) {
        self.tick_count += 1;
        self.text.clear();
        let now = now_us();
        self.start_time_us = now;
        self.last_checkpoint_us = now;
    }

    /// Number of ticks started so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Microseconds elapsed since the current tick started.
    pub fn tick_time_us(&self) -> u64 {
        now_us().saturating_sub(self.start_time_us)
    }

    /// Record the time since the previous checkpoint under `label`.
    pub fn add_measurement(&mut self, label: &str) {
        let now = now_us();
        let duration_us = now.saturating_sub(self.last_checkpoint_us);
        let _ = write!(self.text, "{}: {}us\n", label, duration_us);
        self.last_checkpoint_us = now;
    }

    /// Reset the checkpoint without recording anything, so work that should
    /// not be attributed to any phase (rendering, I/O) is excluded.
    pub fn discard_measurement(&mut self) {
        self.last_checkpoint_us = now_us();
    }

    /// Finish the tick: append the total and the tick rate this duration
    /// would sustain, and publish the report.
    pub fn finish_tick(&mut self) {
        let total_us = self.tick_time_us();
        let tps = if total_us > 0 { 1_000_000 / total_us } else { 0 };
        let _ = write!(self.text, "total: {}us\n", total_us);
        let _ = write!(self.text, "tps: {}\n", tps);
        self.old_text = self.text.clone();
    }

    /// The report of the most recently finished tick.
    pub fn report(&self) -> &str {
        &self.old_text
    }
}
