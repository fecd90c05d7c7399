use ckks::boot_context::BootContext;
use ckks::ciphertext::Ciphertext;
use ckks::encryptor::{EncryptionKey, Encryptor};
use ckks::evaluator::Evaluator;
use ckks::key_generator::KeyGenerator;
use ckks::keys::SecretKey;
use ckks::parameters::{presets, Parameters};
use ckks::plaintext::Plaintext;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sampling::source::Source;

fn bootstrap(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> = c.benchmark_group("bootstrap");
    b.sample_size(10);
    for log_slots in [3, 7] {
        let params: Parameters = Parameters::new(&presets::bootstrapping_test(log_slots)).unwrap();
        let mut source: Source = Source::new([0u8; 32]);
        let sk: SecretKey = KeyGenerator::new(&params).gen_secret_key(&mut source);
        let ctx: BootContext = BootContext::new(&params, &sk, 2, 2).unwrap();
        let eval: Evaluator = Evaluator::new(&params);
        let pt: Plaintext = Plaintext::new(&params, 0, params.scale());
        let ct: Ciphertext = Encryptor::new(&params, EncryptionKey::Secret(&sk)).encrypt(&pt, &mut source);

        let id = BenchmarkId::new("plain", format!("slots={}", params.slots()));
        b.bench_with_input(id, &(), |b, _| b.iter(|| eval.bootstrap(&ct, &ctx).unwrap()));
        let id = BenchmarkId::new("better_sine", format!("slots={}", params.slots()));
        b.bench_with_input(id, &(), |b, _| b.iter(|| eval.bootstrap_better_sine(&ct, &ctx).unwrap()));
    }
}

criterion_group!(benches, bootstrap);
criterion_main!(benches);
