use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Zero};

/// Returns x mod q as u64, for q < 2^64.
fn bigint_mod_u64(x: &BigInt, q: &BigInt) -> u64 {
    let (_, digits) = x.mod_floor(q).to_u64_digits();
    digits.first().copied().unwrap_or(0)
}

impl Ring<u64> {
    /// Writes coeffs[i] mod q at a[i * step].
    pub fn from_bigint(&self, coeffs: &[BigInt], step: usize, a: &mut Poly<u64>) {
        assert!(
            step <= a.n(),
            "invalid step: step={} > a.n()={}",
            step,
            a.n()
        );
        assert!(
            coeffs.len() <= a.n() / step,
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );
        let q_big: BigInt = BigInt::from(self.modulus.q);
        a.0.iter_mut()
            .step_by(step)
            .zip(coeffs.iter())
            .for_each(|(v, c)| *v = bigint_mod_u64(c, &q_big));
    }
}

impl RingRNS<'_, u64> {
    /// Returns the product of the moduli.
    pub fn modulus(&self) -> BigInt {
        self.0
            .iter()
            .fold(BigInt::from(1u64), |acc, r| acc * BigInt::from(r.modulus.q))
    }

    pub fn from_bigint_inplace(&self, coeffs: &[BigInt], step: usize, a: &mut PolyRNS<u64>) {
        assert!(
            self.level() <= a.level(),
            "invalid level: level={} > a.level()={}",
            self.level(),
            a.level()
        );
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, r)| r.from_bigint(coeffs, step, a.at_mut(i)));
    }

    /// Reconstructs the coefficients a[j * step] by CRT, centered in (-Q/2, Q/2].
    pub fn to_bigint_inplace(&self, a: &PolyRNS<u64>, step: usize, coeffs: &mut [BigInt]) {
        assert!(step <= a.n(), "invalid step: step={} > a.n()={}", step, a.n());
        assert!(
            coeffs.len() <= a.n() / step,
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );

        let level: usize = self.level();
        let q_big: BigInt = self.modulus();
        let q_big_half: BigInt = &q_big >> 1;

        // (Q/q_i) * ((Q/q_i)^-1 mod q_i)
        let inv_crt: Vec<BigInt> = self
            .0
            .iter()
            .map(|r| {
                let qi: u64 = r.modulus.q;
                let q_over_qi: BigInt = &q_big / BigInt::from(qi);
                let q_over_qi_mod_qi: u64 = bigint_mod_u64(&q_over_qi, &BigInt::from(qi));
                q_over_qi * BigInt::from(r.modulus.inv(q_over_qi_mod_qi))
            })
            .collect();

        coeffs.iter_mut().enumerate().for_each(|(j, c)| {
            let idx: usize = j * step;
            let mut acc: BigInt = BigInt::zero();
            (0..=level).for_each(|k| acc += &inv_crt[k] * BigInt::from(a.at(k).0[idx]));
            acc = acc.mod_floor(&q_big);
            if acc > q_big_half {
                acc -= &q_big;
            }
            *c = acc;
        });
    }

    /// Returns round(x) mod q_i for each modulus of the chain.
    pub fn from_f64_scalar(&self, x: f64) -> Vec<u64> {
        let r: f64 = x.round();
        if r.abs() < (1u64 << 62) as f64 {
            let xi: i64 = r as i64;
            self.0.iter().map(|ring| ring.modulus.from_i64(xi)).collect()
        } else {
            let x_big: BigInt = BigInt::from_f64(r).unwrap_or_default();
            self.0
                .iter()
                .map(|ring| bigint_mod_u64(&x_big, &BigInt::from(ring.modulus.q)))
                .collect()
        }
    }
}
