use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shandu_core::{
    core::services::{FeasibilityService, ProjectionService, SummaryService},
    domain::{Goal, GoalKind, OperatingMode, Transaction},
};

fn ledger(size: usize) -> Vec<Transaction> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    (0..size)
        .map(|i| {
            let date = start + Duration::hours(i as i64 * 6);
            if i % 4 == 0 {
                Transaction::income(1200.0 + (i % 50) as f64, "Salary", date)
            } else {
                Transaction::expense(50.0 + (i % 30) as f64, "Food", date)
            }
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let transactions = ledger(10_000);
    let deadline = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let goal = Goal::new(
        OperatingMode::Personal,
        GoalKind::Save,
        "House deposit",
        90_000.0,
        deadline.date_naive(),
    );

    c.bench_function("project_10k_transactions", |b| {
        b.iter(|| ProjectionService::project(black_box(&transactions)))
    });

    c.bench_function("summarize_10k_transactions", |b| {
        b.iter(|| SummaryService::summarize(black_box(&transactions)))
    });

    c.bench_function("evaluate_goal_10k_transactions", |b| {
        b.iter(|| {
            let projection = ProjectionService::project(black_box(&transactions));
            FeasibilityService::evaluate(black_box(&goal), &projection, Utc::now())
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
