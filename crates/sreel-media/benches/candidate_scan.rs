use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sreel_media::candidates::CandidateGenerator;
use sreel_media::config::AnalysisConfig;
use sreel_media::frame_source::share;
use sreel_media::testing::SyntheticFrameSource;

fn bench_candidate_scan(c: &mut Criterion) {
    c.bench_function("candidate_scan_30s_fast", |b| {
        b.iter(|| {
            let source = share(SyntheticFrameSource::lively(30.0, 30.0, 320, 180));
            let generator = CandidateGenerator::new(AnalysisConfig::fast());
            let candidates = generator.generate(&source, black_box(30.0), None).unwrap();
            black_box(candidates)
        })
    });

    c.bench_function("candidate_scan_30s_default", |b| {
        b.iter(|| {
            let source = share(SyntheticFrameSource::lively(30.0, 30.0, 320, 180));
            let generator = CandidateGenerator::new(AnalysisConfig::default());
            let candidates = generator.generate(&source, black_box(30.0), None).unwrap();
            black_box(candidates)
        })
    });
}

criterion_group!(benches, bench_candidate_scan);
criterion_main!(benches);
