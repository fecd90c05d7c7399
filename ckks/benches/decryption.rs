use ckks::ciphertext::Ciphertext;
use ckks::decryptor::Decryptor;
use ckks::encryptor::{EncryptionKey, Encryptor};
use ckks::key_generator::KeyGenerator;
use ckks::keys::SecretKey;
use ckks::parameters::{Parameters, ParametersLiteral};
use ckks::plaintext::Plaintext;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sampling::source::Source;

fn decrypt(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> = c.benchmark_group("decrypt");
    for log_n in 12..15 {
        let params: Parameters = Parameters::new(&ParametersLiteral {
            log_n,
            log_q: vec![55, 45, 45, 45, 45, 45],
            log_p: 60,
            log_scale: 45,
            log_slots: log_n - 1,
            xe: 3.2,
            xs: 192,
        })
        .unwrap();
        let mut source: Source = Source::new([0u8; 32]);
        let sk: SecretKey = KeyGenerator::new(&params).gen_secret_key(&mut source);
        let pt: Plaintext = params.new_plaintext(params.max_level());
        let ct: Ciphertext = Encryptor::new(&params, EncryptionKey::Secret(&sk)).encrypt(&pt, &mut source);
        let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
        let mut pt: Plaintext = params.new_plaintext(params.max_level());
        let id = BenchmarkId::new("level", format!("n={} level={}", params.n(), ct.level()));
        b.bench_with_input(id, &(), |b, _| b.iter(|| decryptor.decrypt_into(&ct, &mut pt)));
    }
}

criterion_group!(benches, decrypt);
criterion_main!(benches);
