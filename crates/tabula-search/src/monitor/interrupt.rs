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

//! # Interrupt Monitor
//!
//! Cooperative cancellation from outside a running search. The base
//! contract has no mid-run cancellation; a caller that wants one layers
//! this monitor into the stack and flips the shared `AtomicBool`; the
//! strategy observes the flag at its ordinary per-step checkpoint and
//! returns its accumulated valid candidates. The benchmark harness uses
//! the same mechanism to stop sibling strategies early.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use std::sync::atomic::{AtomicBool, Ordering};
use tabula_model::{candidate::ScheduleCandidate, catalog::Catalog};

#[derive(Debug)]
pub struct InterruptMonitor<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    #[inline]
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }

    /// Returns `true` if the interrupt flag is currently set.
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl SearchMonitor for InterruptMonitor<'_> {
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn on_enter_search(&mut self, _catalog: &Catalog) {}
    fn on_exit_search(&mut self) {}
    fn on_candidate_found(&mut self, _candidate: &ScheduleCandidate) {}

    #[inline(always)]
    fn on_step(&mut self) {}

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if self.is_interrupted() {
            return SearchCommand::Terminate("external interrupt".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continues_while_flag_clear() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::new(&flag);
        assert!(!monitor.is_interrupted());
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn test_terminates_once_flag_set() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::new(&flag);

        flag.store(true, Ordering::Relaxed);
        assert!(monitor.is_interrupted());
        match monitor.search_command() {
            SearchCommand::Terminate(reason) => assert!(reason.contains("interrupt")),
            other => panic!("expected Terminate, got {:?}", other),
        }
    }
}
