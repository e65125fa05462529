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

//! # Candidate Limit Monitor
//!
//! Requests termination once the search has produced the configured
//! number of complete valid candidates. The exact strategies use this to
//! implement the `max_results` cutoff: they stop searching as soon as
//! enough candidates exist and rank the collection afterwards.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use tabula_model::{candidate::ScheduleCandidate, catalog::Catalog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLimitMonitor {
    limit: u64,
    found: u64,
}

impl CandidateLimitMonitor {
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self { limit, found: 0 }
    }

    /// Returns the number of candidates observed so far.
    #[inline]
    pub fn found(&self) -> u64 {
        self.found
    }
}

impl SearchMonitor for CandidateLimitMonitor {
    fn name(&self) -> &str {
        "CandidateLimitMonitor"
    }

    fn on_enter_search(&mut self, _catalog: &Catalog) {
        self.found = 0;
    }

    fn on_exit_search(&mut self) {}

    #[inline]
    fn on_candidate_found(&mut self, _candidate: &ScheduleCandidate) {
        self.found += 1;
    }

    #[inline(always)]
    fn on_step(&mut self) {}

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        if self.found >= self.limit {
            return SearchCommand::Terminate("candidate limit reached".to_string());
        }
        SearchCommand::Continue
    }
}
