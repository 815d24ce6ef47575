use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gb_comm::{Group, LocalGroup, Tag};

fn bench_distribute_collect(c: &mut Criterion) {
    let rows = 1024usize;
    let cols = 1280usize;
    let workers = 4usize;
    let band_rows = rows / workers;
    let band = vec![0x5au8; band_rows * cols];

    c.bench_function("distribute_collect_4_workers_1280x1024", |b| {
        b.iter(|| {
            let results = LocalGroup::run(workers, |g| {
                if g.rank() == 0 {
                    for r in 1..g.size() {
                        g.send(r, Tag::DistributeBand, black_box(&band)).expect("send");
                    }
                    let mut total = band.len();
                    for r in 1..g.size() {
                        total += g.recv(r, Tag::CollectBand).expect("recv").len();
                    }
                    total
                } else {
                    let bytes = g.recv(0, Tag::DistributeBand).expect("recv");
                    g.send(0, Tag::CollectBand, &bytes).expect("send");
                    0
                }
            });
            black_box(results[0]);
        });
    });
}

criterion_group!(benches, bench_distribute_collect);
criterion_main!(benches);
