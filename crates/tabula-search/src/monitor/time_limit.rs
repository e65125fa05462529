// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Time Limit Monitor
//!
//! Enforces a wall-clock budget on a search. Reading the clock at every
//! step would dominate tight inner loops, so the monitor applies a
//! bitmask step filter: only steps where `(steps & clock_check_mask) == 0`
//! actually query `Instant::elapsed`. The default mask checks roughly
//! every 1,024 steps, which bounds the overshoot past the deadline to a
//! fraction of a millisecond for any realistic expansion rate.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use tabula_model::{candidate::ScheduleCandidate, catalog::Catalog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor {
    clock_check_mask: u64,
    steps: u64,
    time_limit: std::time::Duration,
    start_time: std::time::Instant,
}

impl TimeLimitMonitor {
    /// Default mask: check every 1,024 steps (2^10).
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FF;

    #[inline]
    pub fn new(time_limit: std::time::Duration) -> Self {
        Self {
            clock_check_mask: Self::DEFAULT_STEP_CLOCK_CHECK_MASK,
            steps: 0,
            time_limit,
            start_time: std::time::Instant::now(),
        }
    }

    /// Creates a monitor with a custom step filter mask. A mask of zero
    /// checks the clock on every step.
    #[inline]
    pub fn with_clock_check_mask(time_limit: std::time::Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: std::time::Instant::now(),
        }
    }
}

impl SearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _catalog: &Catalog) {
        self.start_time = std::time::Instant::now();
        self.steps = 0;
    }

    fn on_exit_search(&mut self) {}

    fn on_candidate_found(&mut self, _candidate: &ScheduleCandidate) {}

    #[inline(always)]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if (self.steps & self.clock_check_mask) == 0 && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_terminates_after_deadline_at_check_point() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_millis(10));
        monitor.start_time = Instant::now() - Duration::from_millis(50);
        monitor.steps = 0;

        match monitor.search_command() {
            SearchCommand::Terminate(reason) => {
                assert!(reason.contains("time limit"), "unexpected reason: {reason}")
            }
            other => panic!("expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_skips_clock_between_mask_points() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_millis(1));
        monitor.start_time = Instant::now() - Duration::from_millis(50);
        monitor.steps = 1; // 1 & 0x3FF != 0, no clock check

        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_zero_mask_always_checks() {
        let mut monitor =
            TimeLimitMonitor::with_clock_check_mask(Duration::from_millis(1), 0);
        monitor.start_time = Instant::now() - Duration::from_millis(50);
        monitor.steps = 12345;

        assert!(matches!(
            monitor.search_command(),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_continues_before_deadline() {
        let monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_enter_search_resets_clock_and_steps() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(1));
        monitor.steps = 999;
        monitor.start_time = Instant::now() - Duration::from_secs(100);

        let catalog = tabula_model::catalog::CatalogBuilder::new().build().unwrap();
        monitor.on_enter_search(&catalog);

        assert_eq!(monitor.steps, 0);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_on_step_wraps() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(1));
        monitor.steps = u64::MAX;
        monitor.on_step();
        assert_eq!(monitor.steps, 0);
    }
}
