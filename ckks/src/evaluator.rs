use crate::ciphertext::Ciphertext;
use crate::error::{PreconditionViolation, Result};
use crate::keys::{RelinearizationKey, RotationKeys, SwitchingKey};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use num_complex::Complex64;
use rns::modulus::ONCE;
use rns::poly::{Poly, PolyRNS};
use rns::ring::RingRNS;

/// Homomorphic operations on ciphertexts in the NTT domain.
///
/// Levels of binary operations are aligned to the lowest operand. When the scales of two
/// added operands differ by a factor of two or more, the operand of lower scale is first
/// multiplied by the rounded ratio of the scales.
pub struct Evaluator {
    pub(crate) params: Parameters,
    /// NTT(X^{N/2}), which encodes i in every slot.
    monomial_i: PolyRNS<u64>,
}

impl Evaluator {
    pub fn new(params: &Parameters) -> Self {
        let ring_q: RingRNS<u64> = params.ring_q();
        let mut monomial_i: PolyRNS<u64> = ring_q.new_polyrns();
        let mut coeffs: Vec<i64> = vec![0; params.n()];
        coeffs[params.n() >> 1] = 1;
        ring_q.from_i64_inplace(&coeffs, 1, &mut monomial_i);
        ring_q.ntt_inplace(&mut monomial_i);
        Self {
            params: params.clone(),
            monomial_i,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    fn check_degree(ct: &Ciphertext, expected: usize) -> Result<()> {
        if ct.degree() != expected {
            return Err(PreconditionViolation::DegreeMismatch {
                expected,
                found: ct.degree(),
            }
            .into());
        }
        Ok(())
    }

    /// Returns a copy of b at level and at a scale matching target_scale, when the
    /// ratio target_scale / b.scale rounds to an integer of at least 2.
    fn aligned(&self, b: &Ciphertext, level: usize, target_scale: f64) -> Ciphertext {
        let mut b: Ciphertext = Ciphertext {
            value: b.value.iter().map(|c| c.truncated(level)).collect(),
            scale: b.scale,
        };
        let ratio: f64 = target_scale / b.scale;
        if ratio >= 2.0 {
            self.mul_by_scalar_inplace(&mut b, ratio.round());
            b.scale = target_scale;
        }
        b
    }

    fn add_or_sub_inplace<const SUB: bool>(&self, a: &mut Ciphertext, b: &Ciphertext) {
        let level: usize = a.level().min(b.level());
        a.truncate(level);
        let b: Ciphertext = if b.scale / a.scale >= 2.0 {
            let scale: f64 = b.scale;
            *a = self.aligned(a, level, scale);
            b.clone()
        } else {
            self.aligned(b, level, a.scale)
        };
        while a.degree() < b.degree() {
            a.value.push(PolyRNS::new(self.params.n(), level));
        }
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        a.value.iter_mut().zip(b.value.iter()).for_each(|(a, b)| {
            if SUB {
                ring.sub_inplace::<ONCE>(b, a)
            } else {
                ring.add_inplace::<ONCE>(b, a)
            }
        });
    }

    /// a <- a + b.
    pub fn add_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) {
        self.add_or_sub_inplace::<false>(a, b)
    }

    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        let mut c: Ciphertext = a.clone();
        self.add_inplace(&mut c, b);
        c
    }

    /// a <- a - b.
    pub fn sub_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) {
        self.add_or_sub_inplace::<true>(a, b)
    }

    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        let mut c: Ciphertext = a.clone();
        self.sub_inplace(&mut c, b);
        c
    }

    pub fn neg_inplace(&self, ct: &mut Ciphertext) {
        let ring: RingRNS<u64> = self.params.ring_q_at_level(ct.level());
        ct.value
            .iter_mut()
            .for_each(|c| ring.neg_inplace::<ONCE>(c));
    }

    /// Adds the constant c to every slot.
    pub fn add_const(&self, ct: &mut Ciphertext, c: Complex64) {
        let ring: RingRNS<u64> = self.params.ring_q_at_level(ct.level());
        if c.re != 0.0 {
            let scalars: Vec<u64> = ring.from_f64_scalar(c.re * ct.scale);
            ring.add_scalar_inplace::<ONCE>(&scalars, &mut ct.value[0]);
        }
        if c.im != 0.0 {
            let scalars: Vec<u64> = ring.from_f64_scalar(c.im * ct.scale);
            ring.mul_scalar_then_add_inplace::<ONCE>(&self.monomial_i, &scalars, &mut ct.value[0]);
        }
    }

    /// Multiplies every component by round(x), leaving the scale unchanged.
    fn mul_by_scalar_inplace(&self, ct: &mut Ciphertext, x: f64) {
        let ring: RingRNS<u64> = self.params.ring_q_at_level(ct.level());
        let scalars: Vec<u64> = ring.from_f64_scalar(x);
        ct.value
            .iter_mut()
            .for_each(|c| ring.mul_scalar_inplace::<ONCE>(&scalars, c));
    }

    /// Multiplies the slots by k, leaving the scale unchanged.
    pub fn mul_by_integer(&self, ct: &mut Ciphertext, k: i64) {
        self.mul_by_scalar_inplace(ct, k as f64)
    }

    /// Multiplies the slots by c, encoded as round(c * q_level). The scale is multiplied by
    /// q_level, so that a subsequent rescale restores it.
    pub fn mul_by_const(&self, ct: &mut Ciphertext, c: f64) {
        let q: f64 = self.params.q(ct.level()) as f64;
        self.mul_by_scalar_inplace(ct, c * q);
        ct.scale *= q;
    }

    /// acc <- acc + ct * (round(c.re) + i * round(c.im)), at the lowest of both levels.
    pub fn mul_by_complex_integer_then_add(&self, ct: &Ciphertext, c: Complex64, acc: &mut Ciphertext) {
        let level: usize = ct.level().min(acc.level());
        acc.truncate(level);
        while acc.degree() < ct.degree() {
            acc.value.push(PolyRNS::new(self.params.n(), level));
        }
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        let re: f64 = c.re.round();
        let im: f64 = c.im.round();
        if re != 0.0 {
            let scalars: Vec<u64> = ring.from_f64_scalar(re);
            ct.value.iter().zip(acc.value.iter_mut()).for_each(|(c, a)| {
                ring.mul_scalar_then_add_inplace::<ONCE>(c, &scalars, a)
            });
        }
        if im != 0.0 {
            let scalars: Vec<u64> = ring.from_f64_scalar(im);
            let mut tmp: PolyRNS<u64> = ring.new_polyrns();
            ct.value.iter().zip(acc.value.iter_mut()).for_each(|(c, a)| {
                ring.mul_coeffs(c, &self.monomial_i, &mut tmp);
                ring.mul_scalar_then_add_inplace::<ONCE>(&tmp, &scalars, a)
            });
        }
    }

    /// Multiplies the slots by i.
    pub fn mul_by_i(&self, ct: &mut Ciphertext) {
        let ring: RingRNS<u64> = self.params.ring_q_at_level(ct.level());
        ct.value
            .iter_mut()
            .for_each(|c| ring.mul_coeffs_inplace(&self.monomial_i, c));
    }

    /// Returns the degree 2 tensor product of a and b, of scale a.scale * b.scale.
    pub fn mul(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        Self::check_degree(a, 1)?;
        Self::check_degree(b, 1)?;
        let level: usize = a.level().min(b.level());
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        let mut c: Ciphertext = Ciphertext::new(&self.params, 2, level, a.scale * b.scale);
        ring.mul_coeffs(&a.value[0], &b.value[0], &mut c.value[0]);
        ring.mul_coeffs(&a.value[0], &b.value[1], &mut c.value[1]);
        ring.mul_coeffs_then_add_inplace::<ONCE>(&a.value[1], &b.value[0], &mut c.value[1]);
        ring.mul_coeffs(&a.value[1], &b.value[1], &mut c.value[2]);
        Ok(c)
    }

    /// Maps a degree 2 ciphertext back to degree 1.
    pub fn relinearize(&self, ct: &mut Ciphertext, rlk: &RelinearizationKey) -> Result<()> {
        Self::check_degree(ct, 2)?;
        let ring: RingRNS<u64> = self.params.ring_q_at_level(ct.level());
        let c2: PolyRNS<u64> = ct.value.pop().unwrap_or_default();
        let (d0, d1) = self.switch_key(&c2, &rlk.0);
        ring.add_inplace::<ONCE>(&d0, &mut ct.value[0]);
        ring.add_inplace::<ONCE>(&d1, &mut ct.value[1]);
        Ok(())
    }

    pub fn mul_relin(&self, a: &Ciphertext, b: &Ciphertext, rlk: &RelinearizationKey) -> Result<Ciphertext> {
        let mut c: Ciphertext = self.mul(a, b)?;
        self.relinearize(&mut c, rlk)?;
        Ok(c)
    }

    /// Returns ct * pt, of scale ct.scale * pt.scale.
    pub fn mul_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Ciphertext {
        let level: usize = ct.level().min(pt.level());
        let mut c: Ciphertext = Ciphertext::new(&self.params, ct.degree(), level, ct.scale * pt.scale);
        self.mul_plain_then_add(ct, pt, &mut c);
        c
    }

    /// acc <- acc + ct * pt. The scale of acc is left unchanged.
    pub fn mul_plain_then_add(&self, ct: &Ciphertext, pt: &Plaintext, acc: &mut Ciphertext) {
        let level: usize = ct.level().min(pt.level()).min(acc.level());
        acc.truncate(level);
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        ct.value.iter().zip(acc.value.iter_mut()).for_each(|(c, a)| {
            ring.mul_coeffs_then_add_inplace::<ONCE>(c, &pt.value, a)
        });
    }

    /// Divides ct by its last modulus q_level, with rounding, and the scale by q_level.
    pub fn rescale(&self, ct: &mut Ciphertext) -> Result<()> {
        let level: usize = ct.level();
        if level == 0 {
            return Err(PreconditionViolation::InsufficientLevels {
                required: 1,
                available: 0,
            }
            .into());
        }
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        ct.value
            .iter_mut()
            .for_each(|c| ring.div_round_by_last_modulus_ntt_inplace(c));
        ct.scale /= self.params.q(level) as f64;
        Ok(())
    }

    /// Drops the last levels moduli of ct.
    pub fn drop_level(&self, ct: &mut Ciphertext, levels: usize) -> Result<()> {
        if levels > ct.level() {
            return Err(PreconditionViolation::InsufficientLevels {
                required: levels,
                available: ct.level(),
            }
            .into());
        }
        ct.truncate(ct.level() - levels);
        Ok(())
    }

    /// Rotates the slots of ct to the left by k.
    pub fn rotate(&self, ct: &Ciphertext, k: usize, keys: &RotationKeys) -> Result<Ciphertext> {
        let gal_el: usize = self.params.galois_element(k);
        if gal_el == 1 {
            return Ok(ct.clone());
        }
        let key: &SwitchingKey = keys
            .get(gal_el)
            .ok_or(PreconditionViolation::MissingRotationKey(gal_el))?;
        self.automorphism(ct, gal_el, key)
    }

    /// Conjugates the slots of ct.
    pub fn conjugate(&self, ct: &Ciphertext, keys: &RotationKeys) -> Result<Ciphertext> {
        let gal_el: usize = self.params.galois_element_conjugate();
        let key: &SwitchingKey = keys
            .get(gal_el)
            .ok_or(PreconditionViolation::MissingConjugationKey)?;
        self.automorphism(ct, gal_el, key)
    }

    /// Applies X -> X^gal_el to ct and switches the result back to s.
    pub fn automorphism(&self, ct: &Ciphertext, gal_el: usize, key: &SwitchingKey) -> Result<Ciphertext> {
        Self::check_degree(ct, 1)?;
        let level: usize = ct.level();
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);
        let mut c: Ciphertext = Ciphertext::new(&self.params, 1, level, ct.scale);
        ring.automorphism::<true>(&ct.value[0], gal_el, &mut c.value[0]);
        let mut c1: PolyRNS<u64> = ring.new_polyrns();
        ring.automorphism::<true>(&ct.value[1], gal_el, &mut c1);
        let (d0, d1) = self.switch_key(&c1, key);
        ring.add_inplace::<ONCE>(&d0, &mut c.value[0]);
        c.value[1] = d1;
        Ok(c)
    }

    /// Lifts a ciphertext at level 0 to the full chain, each coefficient of each component
    /// lifted from q_0 to its centered representative. The result decrypts to
    /// m + q_0 * I for a small integer polynomial I.
    pub fn mod_raise(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        if ct.level() != 0 {
            return Err(PreconditionViolation::LevelMismatch {
                expected: 0,
                found: ct.level(),
            }
            .into());
        }
        let ring_q: RingRNS<u64> = self.params.ring_q();
        let ring_0 = &ring_q.0[0];
        let q_0: u64 = ring_0.modulus.q;
        let mut c: Ciphertext = Ciphertext::new(&self.params, ct.degree(), self.params.max_level(), ct.scale);
        let mut coeffs: Poly<u64> = ring_0.new_poly();
        for (c_in, c_out) in ct.value.iter().zip(c.value.iter_mut()) {
            ring_0.intt(c_in.at(0), &mut coeffs);
            ring_q.0.iter().enumerate().for_each(|(i, ring)| {
                ring.switch_modulus_centered(&coeffs, q_0, c_out.at_mut(i))
            });
            ring_q.ntt_inplace(c_out);
        }
        Ok(c)
    }
}
