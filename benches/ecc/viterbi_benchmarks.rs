use convcode::{Bits, ConvolutionalCode, ViterbiDecoder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_bits(len: usize, seed: u64) -> Bits {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_bool(0.5)).collect()
}

fn bench_encode(c: &mut Criterion) {
    let code = ConvolutionalCode::nasa_standard_rate_half();
    let mut group = c.benchmark_group("convolutional_encode");

    for &len in &[256, 4096] {
        let data = random_bits(len, 1);
        group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
            b.iter(|| code.encode(black_box(data)).unwrap())
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi_decode");

    for &(k, polys) in &[(3, &[0o7u64, 0o5][..]), (7, &[0o171, 0o133][..])] {
        let code = ConvolutionalCode::from_octal(k, polys).unwrap();
        let decoder = ViterbiDecoder::new(code.clone());

        let mut received = code.encode(&random_bits(1024, 2)).unwrap();
        for i in (0..received.len()).step_by(97) {
            let bit = received[i];
            received.set(i, !bit);
        }

        group.bench_with_input(BenchmarkId::new("K", k), &received, |b, received| {
            b.iter(|| decoder.decode(black_box(received)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
