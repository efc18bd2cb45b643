// Criterion benchmarks for Campus Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use campus_algo::core::{compatibility_score, rank_and_paginate, ranker::ScoredRecord};
use campus_algo::models::{Gender, UserRecord, VerificationState};
use chrono::NaiveDate;

fn create_candidate(id: usize) -> UserRecord {
    UserRecord {
        id: format!("user-{:05}", id),
        name: format!("User {}", id),
        birth_date: NaiveDate::from_ymd_opt(1998 + (id % 8) as i32, 1 + (id % 12) as u32, 1)
            .unwrap(),
        gender: if id % 2 == 0 {
            Gender::Female
        } else {
            Gender::Male
        },
        school: if id % 3 == 0 { "Tech" } else { "State" }.to_string(),
        program: if id % 4 == 0 { "CS" } else { "Law" }.to_string(),
        preference_text: "hiking music coffee travel novels climbing".to_string(),
        verification: if id % 3 == 0 {
            VerificationState::Verified
        } else {
            VerificationState::Unverified
        },
        is_restricted: false,
        report_count: (id % 5) as u32,
    }
}

fn create_requester() -> UserRecord {
    UserRecord {
        id: "requester".to_string(),
        name: "Requester".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2001, 6, 15).unwrap(),
        gender: Gender::Male,
        school: "Tech".to_string(),
        program: "CS".to_string(),
        preference_text: "coffee travel hiking board games".to_string(),
        verification: VerificationState::Verified,
        is_restricted: false,
        report_count: 0,
    }
}

fn bench_scoring(c: &mut Criterion) {
    let requester = create_requester();
    let candidate = create_candidate(42);

    c.bench_function("compatibility_score", |b| {
        b.iter(|| compatibility_score(black_box(&requester), black_box(&candidate)));
    });
}

fn bench_score_and_rank(c: &mut Criterion) {
    let requester = create_requester();

    let mut group = c.benchmark_group("score_and_rank");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<UserRecord> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("page_of_20", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    let scored: Vec<ScoredRecord> = candidates
                        .iter()
                        .cloned()
                        .map(|record| ScoredRecord {
                            score: compatibility_score(&requester, &record),
                            record,
                        })
                        .collect();
                    rank_and_paginate(black_box(scored), 1, 20)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_score_and_rank);

criterion_main!(benches);
