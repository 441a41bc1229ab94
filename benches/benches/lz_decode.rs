//! Benchmark suite for ACS image decoding
//!
//! Measures LZ decompression on its own and the full path from container bytes
//! to indexed images.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use acs_benches::{generate_character, generate_sprite, sizes};
use acs_types::file::{AcsFile, lz};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Benchmark raw LZ decompression over a range of sprite sizes
fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_decompress");

	for (name, (width, height)) in [("small", sizes::SMALL), ("frame", sizes::FRAME), ("large", sizes::LARGE)] {
		let sprite = generate_sprite(width, height, 1);
		let packed = lz::compress(sprite.pixels());
		let size = sprite.pixels().len();

		group.throughput(Throughput::Bytes(size as u64));
		group.bench_with_input(BenchmarkId::new("decompress", name), &packed, |b, packed| {
			b.iter(|| black_box(lz::decompress(black_box(packed), size)));
		});
	}

	group.finish();
}

/// Benchmark the compressor used when writing characters
fn bench_compress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lz_compress");

	let sprite = generate_sprite(sizes::FRAME.0, sizes::FRAME.1, 2);
	group.throughput(Throughput::Bytes(sprite.pixels().len() as u64));
	group.sample_size(30);
	group.bench_function("compress_frame", |b| {
		b.iter(|| black_box(lz::compress(black_box(sprite.pixels()))));
	});

	group.finish();
}

/// Benchmark container parsing without touching the image payloads
fn bench_parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_parse");

	let data = generate_character(200, sizes::FRAME.0, sizes::FRAME.1, true);
	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("from_bytes", |b| {
		b.iter(|| black_box(AcsFile::from_bytes("BENCH", black_box(data.clone()))));
	});

	group.finish();
}

/// Full end-to-end benchmark from container bytes to every decoded image
fn bench_read_images(c: &mut Criterion) {
	let mut group = c.benchmark_group("acs_images");
	group.sample_size(20);

	for (name, compress) in [("compressed", true), ("raw", false)] {
		let data = generate_character(50, sizes::FRAME.0, sizes::FRAME.1, compress);
		let Ok(acs) = AcsFile::from_bytes("BENCH", data) else {
			eprintln!("Warning: could not parse the generated {name} character");
			continue;
		};

		let pixels = 50 * u64::from(sizes::FRAME.0) * u64::from(sizes::FRAME.1);
		group.throughput(Throughput::Elements(pixels));
		group.bench_function(BenchmarkId::new("decode_images", name), |b| {
			b.iter(|| black_box(acs.decode_images(None, |_, _| {})));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decompress, bench_compress, bench_parse, bench_read_images);

criterion_main!(benches);
