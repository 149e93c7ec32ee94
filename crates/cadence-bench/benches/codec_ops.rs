//! Criterion micro-benchmarks for the replay codec.

use std::hint::black_box;

use cadence_bench::{reference_run, synthetic_trace};
use cadence_core::VerificationHash;
use cadence_replay::{decode, encode, ReplayEnvelope};
use criterion::{criterion_group, criterion_main, Criterion};

/// Ten minutes at 60 Hz.
fn make_envelope() -> ReplayEnvelope {
    ReplayEnvelope {
        run: reference_run(0xC0FFEE).unwrap(),
        fixed_hz: 60,
        trace: synthetic_trace(36_000, 3).unwrap(),
        hash: VerificationHash(0x0123_4567_89AB_CDEF),
        final_score: 1200,
        final_max_combo: 12,
    }
}

/// Benchmark: encode a ten-minute envelope.
fn bench_encode(c: &mut Criterion) {
    let env = make_envelope();
    c.bench_function("codec_encode_10min", |b| {
        b.iter(|| black_box(encode(black_box(&env)).unwrap()));
    });
}

/// Benchmark: decode the same envelope, checksum included.
fn bench_decode(c: &mut Criterion) {
    let bytes = encode(&make_envelope()).unwrap();
    c.bench_function("codec_decode_10min", |b| {
        b.iter(|| black_box(decode(black_box(&bytes)).unwrap()));
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
