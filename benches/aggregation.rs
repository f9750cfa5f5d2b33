use budget_sheet::sheet::{reconcile_tree, CategoryTree, SheetReport, Side};
use budget_sheet::time::MonthRange;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn build_tree(side: Side, parents: usize, children: usize, range: &MonthRange) -> CategoryTree {
    let mut tree = CategoryTree::new(side);
    for p in 0..parents {
        let parent = format!("{side} {p}");
        tree.add_parent(parent.clone()).unwrap();
        for c in 0..children {
            let index = tree.add_child(&parent, format!("item {c}"), range).unwrap();
            for (offset, month) in range.iter().enumerate() {
                tree.set_value(&parent, index, *month, (offset * c) as f64)
                    .unwrap();
            }
        }
    }
    tree
}

fn bench_report(c: &mut Criterion) {
    let range = MonthRange::parse("2024-01", "2025-12");
    let income = build_tree(Side::Income, 10, 8, &range);
    let expense = build_tree(Side::Expense, 20, 8, &range);

    c.bench_function("sheet_report_24_months", |b| {
        b.iter(|| SheetReport::compute(black_box(&income), black_box(&expense), &range))
    });

    let shifted = MonthRange::parse("2024-07", "2026-06");
    c.bench_function("reconcile_shifted_window", |b| {
        b.iter_batched(
            || expense.clone(),
            |mut tree| reconcile_tree(&mut tree, black_box(&shifted)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_report);
criterion_main!(benches);
