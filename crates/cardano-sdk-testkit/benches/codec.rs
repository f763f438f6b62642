//! Benchmarks for Plutus Data and metadata encode/decode.
//!
//! Run with: cargo bench -p cardano-sdk-testkit --bench codec

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cardano_sdk::{EncodedCache, FromCbor, Metadatum, PlutusData, ToCbor, TransactionMetadata};
use cardano_sdk_testkit::fixtures::{counting_bytes, nested_arrays, sample_datum, sample_metadata};

fn bench_plutus_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("plutus_data");

    let bytes = sample_datum().to_cbor_bytes().unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("decode", |b| {
        b.iter(|| PlutusData::from_cbor_bytes(black_box(&bytes)).unwrap())
    });

    let decoded = PlutusData::from_cbor_bytes(&bytes).unwrap();
    group.bench_function("encode_cached", |b| {
        b.iter(|| black_box(&decoded).to_cbor_bytes().unwrap())
    });

    let built = sample_datum();
    group.bench_function("encode_built", |b| {
        b.iter(|| black_box(&built).to_cbor_bytes().unwrap())
    });

    group.finish();
}

fn bench_long_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_bytes");

    for len in [64usize, 1024, 16 * 1024] {
        let data = PlutusData::new_bytes(counting_bytes(len));
        let encoded = data.to_cbor_bytes().unwrap();
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("encode", len), &data, |b, data| {
            b.iter(|| data.to_cbor_bytes().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", len), &encoded, |b, encoded| {
            b.iter(|| PlutusData::from_cbor_bytes(encoded).unwrap())
        });
    }

    group.finish();
}

fn bench_nesting(c: &mut Criterion) {
    let mut group = c.benchmark_group("nesting");

    for depth in [8usize, 64, 127] {
        let encoded = nested_arrays(depth);
        group.bench_with_input(BenchmarkId::new("decode", depth), &encoded, |b, encoded| {
            b.iter(|| PlutusData::from_cbor_bytes(encoded).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode_clear_encode", depth), &encoded, |b, encoded| {
            b.iter(|| {
                let data = PlutusData::from_cbor_bytes(encoded).unwrap();
                data.clear_encoded_cache();
                data.to_cbor_bytes().unwrap()
            })
        });
    }

    group.finish();
}

fn bench_metadata(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata");

    let bytes = sample_metadata().to_cbor_bytes().unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("decode", |b| {
        b.iter(|| TransactionMetadata::from_cbor_bytes(black_box(&bytes)).unwrap())
    });
    group.bench_function("to_json", |b| {
        let metadata = TransactionMetadata::from_cbor_bytes(&bytes).unwrap();
        b.iter(|| metadata.to_json())
    });

    let text = Metadatum::new_string("x".repeat(1024));
    group.bench_function("encode_long_text", |b| {
        b.iter(|| text.to_cbor_bytes().unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_plutus_data,
    bench_long_bytes,
    bench_nesting,
    bench_metadata
);
criterion_main!(benches);
