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

//! # Search Monitors
//!
//! Pluggable observers and controllers for search lifecycle events.
//! Monitors enforce budgets (wall-clock time, candidate count), relay
//! external interrupts, and log progress: orthogonal concerns kept out
//! of the strategies' inner loops. Every strategy calls `on_step` once
//! per expansion/iteration and polls `search_command` at the same
//! checkpoint, which is exactly the cooperative-timeout contract of the
//! engine: a strategy that is told to terminate returns the valid
//! candidates it has accumulated so far.
//!
//! ## Submodules
//!
//! - `search_monitor`: the `SearchMonitor` trait and `SearchCommand`.
//! - `time_limit`: wall-clock budget with bitmask-filtered clock checks.
//! - `candidate_limit`: stop after the Nth complete candidate.
//! - `interrupt`: cooperative external stop over an `AtomicBool`.
//! - `composite`: aggregate several monitors into one.
//! - `log`: periodic progress table.

pub mod candidate_limit;
pub mod composite;
pub mod interrupt;
pub mod log;
pub mod search_monitor;
pub mod time_limit;

use crate::monitor::{
    candidate_limit::CandidateLimitMonitor, composite::CompositeMonitor,
    time_limit::TimeLimitMonitor,
};
use tabula_model::config::SearchConfig;

/// Builds the default monitor stack for a configuration: a candidate
/// limit of `max_results` plus a time-limit monitor when a deadline is
/// configured. Callers that need external cancellation add an
/// `InterruptMonitor` on top.
pub fn from_config(config: &SearchConfig) -> CompositeMonitor<'static> {
    let mut composite = CompositeMonitor::new();
    composite.add_monitor(CandidateLimitMonitor::new(config.max_results as u64));
    if let Some(limit) = config.time_limit {
        composite.add_monitor(TimeLimitMonitor::new(limit));
    }
    composite
}

/// Builds the monitor stack of the population and local-search
/// strategies: a time limit when configured, nothing else. Those
/// strategies report only new global bests as candidates, so a candidate
/// limit would cut their runs short instead of capping the result list;
/// `max_results` is applied by ranking at the end of the run.
pub fn time_budget(config: &SearchConfig) -> CompositeMonitor<'static> {
    let mut composite = CompositeMonitor::new();
    if let Some(limit) = config.time_limit {
        composite.add_monitor(TimeLimitMonitor::new(limit));
    }
    composite
}
