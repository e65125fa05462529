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

use tabula_model::{candidate::ScheduleCandidate, catalog::Catalog};

/// The control-flow verdict a monitor hands back to the search loop.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Lifecycle hooks and control flow for a search run.
///
/// Strategies call `on_step` once per expansion/iteration and poll
/// `search_command` at the same bounded interval; `on_candidate_found`
/// fires for every complete valid candidate. A monitor must never block.
pub trait SearchMonitor {
    fn name(&self) -> &str;
    fn on_enter_search(&mut self, catalog: &Catalog);
    fn on_exit_search(&mut self);
    fn on_candidate_found(&mut self, candidate: &ScheduleCandidate);
    fn on_step(&mut self);
    fn search_command(&self) -> SearchCommand;
}

impl<'a> std::fmt::Debug for dyn SearchMonitor + 'a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<'a> std::fmt::Display for dyn SearchMonitor + 'a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

/// A monitor that never terminates the search. Useful as the neutral
/// element in tests and for strategies run without budgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpMonitor;

impl SearchMonitor for NoOpMonitor {
    fn name(&self) -> &str {
        "NoOpMonitor"
    }

    fn on_enter_search(&mut self, _catalog: &Catalog) {}
    fn on_exit_search(&mut self) {}
    fn on_candidate_found(&mut self, _candidate: &ScheduleCandidate) {}
    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_model::catalog::CatalogBuilder;

    #[test]
    fn test_noop_monitor_always_continues() {
        let mut monitor = NoOpMonitor;
        let catalog = CatalogBuilder::new().build().unwrap();
        monitor.on_enter_search(&catalog);
        for _ in 0..100 {
            monitor.on_step();
        }
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
        monitor.on_exit_search();
    }

    #[test]
    fn test_command_display() {
        assert_eq!(format!("{}", SearchCommand::Continue), "Continue");
        assert_eq!(
            format!("{}", SearchCommand::Terminate("why".to_string())),
            "Terminate: why"
        );
    }
}
