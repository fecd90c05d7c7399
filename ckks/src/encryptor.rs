use crate::ciphertext::Ciphertext;
use crate::keys::{PublicKey, SecretKey};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use rns::modulus::ONCE;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::distributions::Distribution;
use sampling::source::Source;

pub enum EncryptionKey<'a> {
    Public(&'a PublicKey),
    Secret(&'a SecretKey),
}

pub struct Encryptor<'a> {
    params: Parameters,
    key: EncryptionKey<'a>,
}

impl<'a> Encryptor<'a> {
    pub fn new(params: &Parameters, key: EncryptionKey<'a>) -> Self {
        Self {
            params: params.clone(),
            key,
        }
    }

    /// Returns an encryption of pt at the level and scale of pt.
    pub fn encrypt(&self, pt: &Plaintext, source: &mut Source) -> Ciphertext {
        let mut ct: Ciphertext = Ciphertext::new(&self.params, 1, pt.level(), pt.scale);
        self.encrypt_into(pt, &mut ct, source);
        ct
    }

    pub fn encrypt_into(&self, pt: &Plaintext, ct: &mut Ciphertext, source: &mut Source) {
        assert!(
            ct.degree() == 1,
            "invalid ct: ct.degree()={} != 1",
            ct.degree()
        );
        let level: usize = pt.level().min(ct.level());
        ct.truncate(level);
        ct.set_scale(pt.scale);
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        let mut xa_source: Source = source.branch();
        let mut xe_source: Source = source.branch();

        match &self.key {
            EncryptionKey::Secret(sk) => {
                // c1 <- a, c0 <- -a * s + e + m
                let (c0, c1) = ct.value.split_at_mut(1);
                ring.fill_uniform(&mut xa_source, &mut c1[0]);
                ring.fill_dist(&mut xe_source, self.params.xe(), &mut c0[0]);
                ring.ntt_inplace(&mut c0[0]);
                ring.mul_coeffs_then_sub_inplace::<ONCE>(&c1[0], &sk.0, &mut c0[0]);
            }
            EncryptionKey::Public(pk) => {
                // c0 <- v * b + e0 + m, c1 <- v * a + e1
                let mut v: PolyRNS<u64> = ring.new_polyrns();
                ring.fill_dist(&mut xa_source, &Distribution::Ternary, &mut v);
                ring.ntt_inplace(&mut v);
                for (c, k) in ct.value.iter_mut().zip(pk.0.iter()) {
                    ring.fill_dist(&mut xe_source, self.params.xe(), c);
                    ring.ntt_inplace(c);
                    ring.mul_coeffs_then_add_inplace::<ONCE>(&v, k, c);
                }
            }
        }
        ring.add_inplace::<ONCE>(&pt.value, &mut ct.value[0]);
    }
}
