use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tagmarks::exchange::{decode, encode_at};
use tagmarks::models::{Bookmark, Owner};

fn collection(size: usize) -> Vec<Bookmark> {
    (0..size)
        .map(|i| Bookmark {
            id: format!("id-{}", i),
            owner: Owner::new("bench"),
            url: format!("https://example.com/{}?q=a&b=c", i),
            title: format!("Bookmark <{}> & \"friends\"", i),
            tags: if i % 4 == 0 {
                vec![]
            } else {
                vec![format!("folder{}", i % 10)]
            },
            favicon: None,
            created_at: None,
        })
        .collect()
}

fn bench_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange");

    for size in [100, 1_000, 5_000] {
        let bookmarks = collection(size);
        let document = encode_at(&bookmarks, 1_700_000_000);

        group.bench_with_input(BenchmarkId::new("encode", size), &bookmarks, |b, bookmarks| {
            b.iter(|| encode_at(black_box(bookmarks), 1_700_000_000))
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &document, |b, document| {
            b.iter(|| decode(black_box(document)))
        });
    }

    group.finish();
}

fn bench_single_folder(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange_single_folder");

    for size in [1_000, 10_000, 20_000] {
        let bookmarks: Vec<Bookmark> = collection(size)
            .into_iter()
            .map(|b| Bookmark {
                tags: vec!["one".to_string()],
                ..b
            })
            .collect();
        let document = encode_at(&bookmarks, 1_700_000_000);

        group.bench_with_input(BenchmarkId::new("decode", size), &document, |b, document| {
            b.iter(|| decode(black_box(document)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_exchange, bench_single_folder);
criterion_main!(benches);
