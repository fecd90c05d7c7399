use crate::keys::{PublicKey, RelinearizationKey, RotationKeys, SecretKey, SwitchingKey};
use crate::parameters::Parameters;
use rns::modulus::ONCE;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::source::Source;

pub struct KeyGenerator {
    params: Parameters,
}

impl KeyGenerator {
    pub fn new(params: &Parameters) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn gen_secret_key(&self, source: &mut Source) -> SecretKey {
        let ring_qp: RingRNS<u64> = self.params.ring_qp();
        let mut sk: PolyRNS<u64> = ring_qp.new_polyrns();
        ring_qp.fill_dist(source, self.params.xs(), &mut sk);
        ring_qp.ntt_inplace(&mut sk);
        SecretKey(sk)
    }

    pub fn gen_public_key(&self, sk: &SecretKey, source: &mut Source) -> PublicKey {
        let mut xa_source: Source = source.branch();
        let mut xe_source: Source = source.branch();
        let ring_q: RingRNS<u64> = self.params.ring_q();

        let mut a: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_uniform(&mut xa_source, &mut a);

        // b <- e - a * s
        let mut b: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_dist(&mut xe_source, self.params.xe(), &mut b);
        ring_q.ntt_inplace(&mut b);
        ring_q.mul_coeffs_then_sub_inplace::<ONCE>(&a, &sk.0, &mut b);

        PublicKey([b, a])
    }

    /// Returns a key switching ciphertexts decryptable under s_in, given over
    /// q_0, ..., q_L, P in the NTT domain, to ciphertexts decryptable under sk.
    pub fn gen_switching_key(
        &self,
        s_in: &PolyRNS<u64>,
        sk: &SecretKey,
        source: &mut Source,
    ) -> SwitchingKey {
        let mut xa_source: Source = source.branch();
        let mut xe_source: Source = source.branch();
        let ring_qp: RingRNS<u64> = self.params.ring_qp();
        let p: u64 = self.params.p();

        let value: Vec<[PolyRNS<u64>; 2]> = (0..=self.params.max_level())
            .map(|i| {
                let mut a: PolyRNS<u64> = ring_qp.new_polyrns();
                ring_qp.fill_uniform(&mut xa_source, &mut a);

                let mut b: PolyRNS<u64> = ring_qp.new_polyrns();
                ring_qp.fill_dist(&mut xe_source, self.params.xe(), &mut b);
                ring_qp.ntt_inplace(&mut b);
                ring_qp.mul_coeffs_then_sub_inplace::<ONCE>(&a, &sk.0, &mut b);

                // b_i <- b_i + (P mod q_i) * s_in on residue i
                let ring = &ring_qp.0[i];
                let p_mod_qi: u64 = p % ring.modulus.q;
                ring.mul_scalar_then_add_inplace::<ONCE>(s_in.at(i), &p_mod_qi, b.at_mut(i));

                [b, a]
            })
            .collect();

        SwitchingKey { value }
    }

    pub fn gen_relinearization_key(&self, sk: &SecretKey, source: &mut Source) -> RelinearizationKey {
        let ring_qp: RingRNS<u64> = self.params.ring_qp();
        let mut sk_square: PolyRNS<u64> = ring_qp.new_polyrns();
        ring_qp.mul_coeffs(&sk.0, &sk.0, &mut sk_square);
        RelinearizationKey(self.gen_switching_key(&sk_square, sk, source))
    }

    /// Returns the key switching from s(X^gal_el) to s.
    pub fn gen_galois_key(&self, sk: &SecretKey, gal_el: usize, source: &mut Source) -> SwitchingKey {
        let ring_qp: RingRNS<u64> = self.params.ring_qp();
        let mut sk_auto: PolyRNS<u64> = ring_qp.new_polyrns();
        ring_qp.automorphism::<true>(&sk.0, gal_el, &mut sk_auto);
        self.gen_switching_key(&sk_auto, sk, source)
    }

    /// Generates the keys for the left rotations by each of rotations and, if conjugate
    /// is set, for the complex conjugation.
    pub fn gen_rotation_keys(
        &self,
        sk: &SecretKey,
        rotations: &[usize],
        conjugate: bool,
        source: &mut Source,
    ) -> RotationKeys {
        let mut keys: RotationKeys = RotationKeys::new();
        let gal_els = rotations
            .iter()
            .map(|k| self.params.galois_element(*k))
            .chain(conjugate.then(|| self.params.galois_element_conjugate()));
        for gal_el in gal_els {
            if gal_el != 1 && !keys.contains(gal_el) {
                keys.insert(gal_el, self.gen_galois_key(sk, gal_el, source));
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::presets;
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn secret_key_distribution() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let keygen: KeyGenerator = KeyGenerator::new(&params);
        let mut source: Source = Source::new([0u8; 32]);
        let sk: SecretKey = keygen.gen_secret_key(&mut source);
        assert_eq!(sk.level(), params.max_level() + 1);

        let ring_qp: RingRNS<u64> = params.ring_qp();
        let mut s: PolyRNS<u64> = sk.0.clone();
        ring_qp.intt_inplace(&mut s);
        let mut coeffs: Vec<BigInt> = vec![BigInt::default(); params.n()];
        ring_qp.to_bigint_inplace(&s, 1, &mut coeffs);
        let hw: usize = coeffs.iter().filter(|c| **c != BigInt::from(0)).count();
        assert_eq!(hw, 16);
        assert!(coeffs.iter().all(|c| c.magnitude() <= &BigUint::from(1u32)));
    }

    #[test]
    fn public_key_is_small_under_secret() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let keygen: KeyGenerator = KeyGenerator::new(&params);
        let mut source: Source = Source::new([1u8; 32]);
        let sk: SecretKey = keygen.gen_secret_key(&mut source);
        let pk: PublicKey = keygen.gen_public_key(&sk, &mut source);

        // b + a * s = e
        let ring_q: RingRNS<u64> = params.ring_q();
        let mut e: PolyRNS<u64> = pk.0[0].clone();
        ring_q.mul_coeffs_then_add_inplace::<ONCE>(&pk.0[1], &sk.0, &mut e);
        ring_q.intt_inplace(&mut e);
        let mut coeffs: Vec<BigInt> = vec![BigInt::default(); params.n()];
        ring_q.to_bigint_inplace(&e, 1, &mut coeffs);
        assert!(coeffs.iter().all(|c| c.magnitude() <= &BigUint::from(20u32)));
    }

    #[test]
    fn rotation_keys_skip_identity() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let keygen: KeyGenerator = KeyGenerator::new(&params);
        let mut source: Source = Source::new([2u8; 32]);
        let sk: SecretKey = keygen.gen_secret_key(&mut source);
        let keys: RotationKeys =
            keygen.gen_rotation_keys(&sk, &[0, 1, 1, params.max_slots()], true, &mut source);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(5));
        assert!(keys.contains(params.galois_element_conjugate()));
    }
}
