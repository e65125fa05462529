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

//! # Strategy Registry
//!
//! A closed, compile-time enumeration of every strategy, with a static
//! name table. Callers that pick an algorithm by name (a CLI, a GUI
//! drop-down, the benchmark harness) go through `StrategyKind` instead
//! of any runtime reflection: adding a strategy means adding a variant,
//! and the compiler walks every match that needs extending.

use crate::{
    annealing::SimulatedAnnealingScheduler, astar::AStarScheduler,
    backtracking::BacktrackingScheduler, breadth_first::BreadthFirstScheduler,
    genetic::GeneticScheduler, greedy::GreedyScheduler,
    propagation::ConstraintPropagationScheduler, tabu::TabuSearchScheduler,
};
use tabula_search::scheduler::Scheduler;

/// The closed set of available strategies.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum StrategyKind {
    Backtracking,
    BreadthFirst,
    Greedy,
    AStar,
    Genetic,
    SimulatedAnnealing,
    TabuSearch,
    ConstraintPropagation,
}

impl StrategyKind {
    /// All strategies, in registry order.
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::Backtracking,
        StrategyKind::BreadthFirst,
        StrategyKind::Greedy,
        StrategyKind::AStar,
        StrategyKind::Genetic,
        StrategyKind::SimulatedAnnealing,
        StrategyKind::TabuSearch,
        StrategyKind::ConstraintPropagation,
    ];

    /// Returns the registry name of the strategy. Matches the `name()`
    /// of the instantiated scheduler.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            StrategyKind::Backtracking => "backtracking",
            StrategyKind::BreadthFirst => "breadth-first",
            StrategyKind::Greedy => "greedy",
            StrategyKind::AStar => "a-star",
            StrategyKind::Genetic => "genetic",
            StrategyKind::SimulatedAnnealing => "simulated-annealing",
            StrategyKind::TabuSearch => "tabu-search",
            StrategyKind::ConstraintPropagation => "constraint-propagation",
        }
    }

    /// Looks a strategy up by its registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Constructs a fresh scheduler of this kind.
    pub fn instantiate(self) -> Box<dyn Scheduler> {
        match self {
            StrategyKind::Backtracking => Box::new(BacktrackingScheduler::new()),
            StrategyKind::BreadthFirst => Box::new(BreadthFirstScheduler::new()),
            StrategyKind::Greedy => Box::new(GreedyScheduler::new()),
            StrategyKind::AStar => Box::new(AStarScheduler::new()),
            StrategyKind::Genetic => Box::new(GeneticScheduler::new()),
            StrategyKind::SimulatedAnnealing => Box::new(SimulatedAnnealingScheduler::new()),
            StrategyKind::TabuSearch => Box::new(TabuSearchScheduler::new()),
            StrategyKind::ConstraintPropagation => {
                Box::new(ConstraintPropagationScheduler::new())
            }
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
