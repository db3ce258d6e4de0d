use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use html_prescan::perf_fixtures::{make_blocks, make_late_declaration, make_long_comment};
use html_prescan::{
    EncodingSniffer, MetaScanner, ScannerConfig, SliceSource, SnifferConfig, prescan,
    sniff_encoding,
};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn reject_all(_: &str) -> bool {
    false
}

fn bench_prescan_no_declaration(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_prescan_no_declaration", |b| {
        b.iter(|| {
            let outcome = prescan(black_box(input.as_bytes()), &mut reject_all);
            black_box(outcome);
        });
    });
}

fn bench_prescan_late_declaration(c: &mut Criterion) {
    let input = make_late_declaration(SMALL_BLOCKS, "windows-1251");
    c.bench_function("bench_prescan_late_declaration", |b| {
        b.iter(|| {
            let outcome = prescan(black_box(input.as_bytes()), &mut |label: &str| {
                label == "windows-1251"
            });
            black_box(outcome);
        });
    });
}

fn bench_prescan_long_comment(c: &mut Criterion) {
    let input = make_long_comment(1 << 20);
    c.bench_function("bench_prescan_long_comment", |b| {
        b.iter(|| {
            let outcome = prescan(black_box(input.as_bytes()), &mut reject_all);
            black_box(outcome);
        });
    });
}

fn bench_prescan_chunked(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_prescan_chunked_4k", |b| {
        b.iter_batched(
            || MetaScanner::new(ScannerConfig::default()),
            |mut scanner| {
                for chunk in input.as_bytes().chunks(4096) {
                    scanner.scan(&mut SliceSource::new(black_box(chunk)), &mut reject_all);
                }
                black_box(scanner.stats());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_sniff(c: &mut Criterion) {
    let input = make_late_declaration(4, "utf-8");
    c.bench_function("bench_sniff_encoding", |b| {
        b.iter(|| black_box(sniff_encoding(black_box(input.as_bytes()))));
    });
    c.bench_function("bench_sniffer_streaming", |b| {
        b.iter_batched(
            || EncodingSniffer::new(SnifferConfig::default()),
            |mut sniffer| {
                for chunk in input.as_bytes().chunks(64) {
                    black_box(sniffer.push_bytes(chunk));
                }
                black_box(sniffer.finish());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_prescan_no_declaration,
    bench_prescan_late_declaration,
    bench_prescan_long_comment,
    bench_prescan_chunked,
    bench_sniff
);
criterion_main!(benches);
