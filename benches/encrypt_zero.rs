use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use rlwe_zero::math::generate_primes;
use rlwe_zero::{
    Ciphertext, Context, EncryptionParameters, PublicKey, SecretKey, SeededFactory,
    encrypt_zero_asymmetric, encrypt_zero_symmetric,
};

fn bench_context(degree: usize, modulus_count: usize) -> Context {
    let primes = generate_primes(50, modulus_count, degree as u64);
    let parms = EncryptionParameters::builder()
        .poly_modulus_degree(degree)
        .coeff_modulus(primes)
        .random_generator(Arc::new(SeededFactory::from_u64(0)))
        .build()
        .unwrap();
    Context::new(parms).unwrap()
}

fn bench_encrypt_zero(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_zero");
    let configs = [(2048usize, 1usize), (4096, 2), (8192, 3)];

    for &(degree, modulus_count) in &configs {
        let context = bench_context(degree, modulus_count);
        let secret_key = SecretKey::generate(&context).unwrap();
        let public_key = PublicKey::generate(&secret_key, &context).unwrap();
        let parms_id = context.key_parms_id();
        let label = format!("n{degree}_l{modulus_count}");

        group.bench_with_input(
            BenchmarkId::new("symmetric", &label),
            &context,
            |b, context| {
                let mut destination = Ciphertext::new();
                b.iter(|| {
                    encrypt_zero_symmetric(
                        &secret_key,
                        context,
                        parms_id,
                        true,
                        true,
                        black_box(&mut destination),
                    )
                    .unwrap();
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("asymmetric", &label),
            &context,
            |b, context| {
                let mut destination = Ciphertext::new();
                b.iter(|| {
                    encrypt_zero_asymmetric(
                        &public_key,
                        context,
                        parms_id,
                        true,
                        black_box(&mut destination),
                    )
                    .unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_encrypt_zero);
criterion_main!(benches);
