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

use criterion::{Criterion, criterion_group, criterion_main};
use tabula_model::{
    catalog::{Catalog, CatalogBuilder},
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
    section::{SectionKind, SectionRecord},
    slot::{Day, TimeSlot},
};
use tabula_search::scheduler::Scheduler;
use tabula_strategies::{backtracking::BacktrackingScheduler, greedy::GreedyScheduler};

/// A dense synthetic semester: 12 courses with 4 variants each, packed
/// into three days so that conflicts are common.
fn semester_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new();
    for course in 0..12usize {
        for variant in 0..4u8 {
            let day = Day::ALL[(course + variant as usize) % 3];
            let period = ((course as u8) * 3 + variant) % 14;
            builder.push(SectionRecord {
                code: format!("C{:02}-{}", course, variant),
                main_code: format!("C{:02}", course),
                name: format!("Course {:02}", course),
                credit: 3 + (course as u32 % 4),
                kind: SectionKind::Lecture,
                slots: [TimeSlot::new(day, period), TimeSlot::new(day, (period + 1) % 14)]
                    .into_iter()
                    .collect(),
                instructor: format!("Instructor {}", course % 5),
            });
        }
    }
    builder.build().expect("synthetic catalog is well-formed")
}

fn semester_selection() -> Selection {
    Selection::new(
        (0..6).map(|c| format!("C{:02}", c)),
        (6..12).map(|c| format!("C{:02}", c)),
    )
}

fn bench_conflict_index_build(c: &mut Criterion) {
    let catalog = semester_catalog();
    c.bench_function("conflict_index_build_48_sections", |b| {
        b.iter(|| ConflictIndex::build(std::hint::black_box(&catalog)))
    });
}

fn bench_backtracking(c: &mut Criterion) {
    let catalog = semester_catalog();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = semester_selection();
    let config = SearchConfig::new(28).with_max_results(10);

    c.bench_function("backtracking_dense_semester", |b| {
        b.iter(|| {
            BacktrackingScheduler::new().generate(
                std::hint::black_box(&catalog),
                &conflicts,
                &selection,
                &config,
            )
        })
    });
}

fn bench_greedy(c: &mut Criterion) {
    let catalog = semester_catalog();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = semester_selection();
    let config = SearchConfig::new(28);

    c.bench_function("greedy_dense_semester", |b| {
        b.iter(|| {
            GreedyScheduler::new().generate(
                std::hint::black_box(&catalog),
                &conflicts,
                &selection,
                &config,
            )
        })
    });
}

criterion_group!(
    benches,
    bench_conflict_index_build,
    bench_backtracking,
    bench_greedy
);
criterion_main!(benches);
