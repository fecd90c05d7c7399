use crate::ciphertext::Ciphertext;
use crate::error::{ConstructionError, Result};
use crate::keys::SecretKey;
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use rns::modulus::{NONE, ONCE};
use rns::ring::RingRNS;

pub struct Decryptor<'a> {
    params: Parameters,
    sk: &'a SecretKey,
}

impl<'a> Decryptor<'a> {
    pub fn new(params: &Parameters, sk: &'a SecretKey) -> Result<Self> {
        if sk.n() != params.n() || sk.level() < params.max_level() {
            return Err(ConstructionError::KeyMismatch {
                key_degree: sk.n(),
                ring_degree: params.n(),
                key_level: sk.level(),
                required_level: params.max_level(),
            }
            .into());
        }
        Ok(Self {
            params: params.clone(),
            sk,
        })
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> Plaintext {
        let mut pt: Plaintext = Plaintext::new(&self.params, ct.level(), ct.scale);
        self.decrypt_into(ct, &mut pt);
        pt
    }

    /// Evaluates c_0 + c_1 s + ... + c_d s^d by Horner's rule into pt,
    /// at the level and scale of ct.
    pub fn decrypt_into(&self, ct: &Ciphertext, pt: &mut Plaintext) {
        let level: usize = ct.level();
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        let degree: usize = ct.degree();

        pt.value = ct.value[degree].truncated(level);
        let mut reduced: bool = false;
        for i in (1..=degree).rev() {
            ring.mul_coeffs_inplace(&self.sk.0, &mut pt.value);
            ring.add_inplace::<NONE>(&ct.value[i - 1], &mut pt.value);
            reduced = i & 7 == 7;
            if reduced {
                ring.reduce_inplace::<ONCE>(&mut pt.value);
            }
        }
        if !reduced {
            ring.reduce_inplace::<ONCE>(&mut pt.value);
        }
        pt.scale = ct.scale;
    }
}
