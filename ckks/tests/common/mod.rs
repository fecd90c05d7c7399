#![allow(dead_code)]

use ckks::ciphertext::Ciphertext;
use ckks::decryptor::Decryptor;
use ckks::encoder::Encoder;
use ckks::encryptor::{EncryptionKey, Encryptor};
use ckks::evaluator::Evaluator;
use ckks::key_generator::KeyGenerator;
use ckks::keys::{PublicKey, SecretKey};
use ckks::parameters::{Parameters, ParametersLiteral};
use ckks::plaintext::Plaintext;
use num_complex::Complex64;
use sampling::source::Source;

pub fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

pub struct TestContext {
    pub params: Parameters,
    pub sk: SecretKey,
    pub pk: PublicKey,
    pub encoder: Encoder,
    pub eval: Evaluator,
    pub source: Source,
}

impl TestContext {
    pub fn new(lit: &ParametersLiteral, seed: u8) -> Self {
        let params: Parameters = Parameters::new(lit).unwrap();
        let mut source: Source = Source::new([seed; 32]);
        let keygen: KeyGenerator = KeyGenerator::new(&params);
        let sk: SecretKey = keygen.gen_secret_key(&mut source);
        let pk: PublicKey = keygen.gen_public_key(&sk, &mut source);
        Self {
            encoder: Encoder::new(&params),
            eval: Evaluator::new(&params),
            params,
            sk,
            pk,
            source,
        }
    }

    pub fn keygen(&self) -> KeyGenerator {
        KeyGenerator::new(&self.params)
    }

    pub fn random_values(&mut self, n: usize, bound: f64) -> Vec<Complex64> {
        (0..n)
            .map(|_| {
                Complex64::new(
                    self.source.next_f64(-bound, bound),
                    self.source.next_f64(-bound, bound),
                )
            })
            .collect()
    }

    pub fn encode(&self, values: &[Complex64], level: usize, scale: f64) -> Plaintext {
        self.encoder
            .encode(values, level, scale, self.params.log_slots())
            .unwrap()
    }

    /// Secret key encryption of values at level and scale.
    pub fn encrypt(&mut self, values: &[Complex64], level: usize, scale: f64) -> Ciphertext {
        let pt: Plaintext = self.encode(values, level, scale);
        Encryptor::new(&self.params, EncryptionKey::Secret(&self.sk)).encrypt(&pt, &mut self.source)
    }

    pub fn encrypt_pk(&mut self, values: &[Complex64], level: usize, scale: f64) -> Ciphertext {
        let pt: Plaintext = self.encode(values, level, scale);
        Encryptor::new(&self.params, EncryptionKey::Public(&self.pk)).encrypt(&pt, &mut self.source)
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> Vec<Complex64> {
        let decryptor: Decryptor = Decryptor::new(&self.params, &self.sk).unwrap();
        self.encoder
            .decode(&decryptor.decrypt(ct), self.params.log_slots())
            .unwrap()
    }
}

pub fn max_error(have: &[Complex64], want: &[Complex64]) -> f64 {
    assert_eq!(have.len(), want.len());
    have.iter()
        .zip(want.iter())
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max)
}
