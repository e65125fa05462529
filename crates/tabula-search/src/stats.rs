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

/// Statistics collected during a single search run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Number of states expanded (nodes, generations, or iterations,
    /// depending on the strategy family).
    pub steps: u64,
    /// Number of complete valid candidates found (before ranking and
    /// truncation).
    pub candidates_found: u64,
    /// Number of branches rejected by the hard caps at generation time.
    pub prunings: u64,
    /// Number of backtracks (exact strategies only).
    pub backtracks: u64,
    /// Number of frontier states dropped by the working-set cap (BFS/A*).
    pub dropped_states: u64,
    /// Total wall-clock duration of the run.
    pub duration: std::time::Duration,
}

impl SearchStatistics {
    /// Records one expansion step.
    #[inline]
    pub fn on_step(&mut self) {
        self.steps += 1;
    }

    /// Records a complete valid candidate.
    #[inline]
    pub fn on_candidate(&mut self) {
        self.candidates_found += 1;
    }

    /// Records a branch rejected by the hard caps.
    #[inline]
    pub fn on_pruned(&mut self) {
        self.prunings += 1;
    }

    /// Records a backtrack.
    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks += 1;
    }

    /// Records a frontier state dropped by the working-set cap.
    #[inline]
    pub fn on_dropped(&mut self) {
        self.dropped_states += 1;
    }

    /// Stores the total run duration.
    #[inline]
    pub fn set_duration(&mut self, duration: std::time::Duration) {
        self.duration = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Steps: {}", self.steps)?;
        writeln!(f, "  Candidates Found: {}", self.candidates_found)?;
        writeln!(f, "  Prunings: {}", self.prunings)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Dropped States: {}", self.dropped_states)?;
        writeln!(
            f,
            "  Duration (secs): {:.3}",
            self.duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = SearchStatistics::default();
        stats.on_step();
        stats.on_step();
        stats.on_candidate();
        stats.on_pruned();
        stats.on_backtrack();
        stats.on_dropped();
        stats.set_duration(Duration::from_millis(42));

        assert_eq!(stats.steps, 2);
        assert_eq!(stats.candidates_found, 1);
        assert_eq!(stats.prunings, 1);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.dropped_states, 1);
        assert_eq!(stats.duration, Duration::from_millis(42));
    }

    #[test]
    fn test_display_lists_all_fields() {
        let mut stats = SearchStatistics::default();
        stats.on_step();
        stats.set_duration(Duration::from_millis(1500));
        let rendered = format!("{}", stats);

        assert!(rendered.contains("Steps: 1"));
        assert!(rendered.contains("Candidates Found: 0"));
        assert!(rendered.contains("Duration (secs): 1.500"));
    }
}
