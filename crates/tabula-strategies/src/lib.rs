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

//! # Tabula Search Strategies
//!
//! Eight exploration policies over one state space, all implementing the
//! `Scheduler` contract from `tabula-search`:
//!
//! - `backtracking`: depth-first search with chronological backtracking.
//! - `breadth_first`: level-per-course-group frontier expansion.
//! - `greedy`: one committed pass in static desirability order.
//! - `astar`: best-first expansion under an admissible credit bound.
//! - `genetic`: population of assignment vectors under selection,
//!   crossover, and mutation.
//! - `annealing`: simulated annealing with pluggable cooling schedules.
//! - `tabu`: deterministic hill climbing with short-term move memory.
//! - `propagation`: backtracking over forward-checked variant domains.
//!
//! The `registry` module maps strategy names to constructors through a
//! closed, compile-time enumerated set.

pub mod annealing;
pub mod astar;
pub mod backtracking;
pub mod breadth_first;
pub mod genetic;
pub mod greedy;
pub mod propagation;
pub mod registry;
pub mod tabu;
