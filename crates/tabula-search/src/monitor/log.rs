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

//! # Log Monitor
//!
//! Periodic progress output for long-running searches. Prints a header on
//! entry and one table row per log interval: elapsed time, step count,
//! candidates seen, and the best score so far. Like the time-limit
//! monitor, it uses a bitmask step filter to keep the clock off the hot
//! path.

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use std::time::{Duration, Instant};
use tabula_model::{candidate::ScheduleCandidate, catalog::Catalog};

#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    steps: u64,
    candidates: u64,
    best_score: Option<f64>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            steps: 0,
            candidates: 0,
            best_score: None,
        }
    }

    fn print_header(&self) {
        println!(
            "{:<9} | {:<14} | {:<12} | {:<12}",
            "Elapsed", "Steps", "Candidates", "Best Score"
        );
        println!("{}", "-".repeat(55));
    }

    fn log_line(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();
        let best_str = match self.best_score {
            Some(score) => format!("{:.2}", score),
            None => "-".to_string(),
        };

        println!(
            "{:<9} | {:<14} | {:<12} | {:<12}",
            format!("{:.1}s", elapsed),
            self.steps,
            self.candidates,
            best_str
        );

        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 0xFFF)
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, _catalog: &Catalog) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.steps = 0;
        self.candidates = 0;
        self.best_score = None;
        self.print_header();
    }

    fn on_exit_search(&mut self) {
        self.log_line();
    }

    fn on_candidate_found(&mut self, candidate: &ScheduleCandidate) {
        self.candidates += 1;
        let score = candidate.score();
        match self.best_score {
            Some(best) if best >= score => {}
            _ => self.best_score = Some(score),
        }
    }

    #[inline]
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line();
        }
    }

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
