//! Performance benchmarks for listing generation.
//!
//! These benchmarks measure the hot paths of a listing request:
//! - Size formatting
//! - Path confinement
//! - Listing a directory with many entries

use std::fs;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use listing::{format_size, DirectoryBrowser, IgnoreSet, Locale, Root};
use tempfile::TempDir;

const EN: Locale<'static> = Locale {
    code: "en",
    parent_label: "Parent Directory",
};

fn bench_format_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_size");

    for bytes in [0u64, 1023, 1_048_575, 5 * 1024 * 1024 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(bytes), &bytes, |b, &bytes| {
            b.iter(|| format_size(black_box(bytes)));
        });
    }

    group.finish();
}

fn bench_confine(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("a/b/c")).unwrap();
    let root = Root::new(temp_dir.path()).unwrap();

    let mut group = c.benchmark_group("confine");
    group.bench_function("nested_dir", |b| {
        b.iter(|| listing::confine(&root, black_box("a/b/c")));
    });
    group.bench_function("escape", |b| {
        b.iter(|| listing::confine(&root, black_box("a/../../../etc/passwd")));
    });
    group.finish();
}

fn bench_list_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_directory");

    for count in [10usize, 100, 1000] {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..count {
            fs::write(temp_dir.path().join(format!("file{:04}.txt", i)), "x").unwrap();
        }
        let root = Root::new(temp_dir.path()).unwrap();
        let browser = DirectoryBrowser::new(root, IgnoreSet::new());

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| browser.list_requested(black_box(""), &EN).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_size,
    bench_confine,
    bench_list_directory
);
criterion_main!(benches);
