use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quickdupe::duplicates::{DuplicateFinder, FinderConfig};
use quickdupe::progress::NullObserver;
use quickdupe::scanner::{Fingerprinter, Walker};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Helper to create a test directory with a specific structure
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        let file_path = path.join(format!("file_{}.txt", i));
        fs::write(file_path, format!("file number {i} content")).expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            // 2 subdirectories per level
            let sub_dir = path.join(format!("dir_{}", i));
            create_dir_recursive(sub_dir, depth - 1, files_per_dir);
        }
    }
}

// 1. Directory Walking Benchmarks
fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10); // depth 4, 10 files per dir -> roughly 150 files

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let walker = Walker::new(vec![temp_dir.path().to_path_buf()], Vec::new());
            let files = walker.walk(&NullObserver).unwrap();
            black_box(files);
        })
    });
}

// 2. Fingerprinting Benchmarks
fn bench_fingerprinter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprinter");
    let fingerprinter = Fingerprinter::default();

    for size_kb in [1u64, 64, 1024, 10 * 1024] {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bench.bin");
        fs::write(&path, vec![0xabu8; (size_kb * 1024) as usize]).unwrap();

        group.bench_function(format!("fingerprint_{size_kb}kb"), |b| {
            b.iter(|| {
                let fp = fingerprinter.fingerprint(&path).unwrap();
                black_box(fp);
            })
        });
    }

    group.finish();
}

// 3. Full Pipeline Benchmarks
fn bench_pipeline(c: &mut Criterion) {
    let temp_dir = setup_test_dir(3, 20);
    let cache_dir = TempDir::new().unwrap();

    c.bench_function("pipeline_cold_cache", |b| {
        b.iter(|| {
            let finder = DuplicateFinder::new(FinderConfig::default().without_cache());
            let outcome = finder.run(&[temp_dir.path().to_path_buf()]).unwrap();
            black_box(outcome);
        })
    });

    // Warm the cache once, then measure cached rescans
    let cache_path = cache_dir.path().join("fp.cache");
    let warm_finder =
        DuplicateFinder::new(FinderConfig::default().with_cache_path(cache_path.clone()));
    warm_finder.run(&[temp_dir.path().to_path_buf()]).unwrap();

    c.bench_function("pipeline_warm_cache", |b| {
        b.iter(|| {
            let finder =
                DuplicateFinder::new(FinderConfig::default().with_cache_path(cache_path.clone()));
            let outcome = finder.run(&[temp_dir.path().to_path_buf()]).unwrap();
            black_box(outcome);
        })
    });
}

criterion_group!(benches, bench_walker, bench_fingerprinter, bench_pipeline);
criterion_main!(benches);
