use crate::dft::ntt::Table;
use crate::modulus::prime::Prime;
use crate::modulus::shoup::Shoup;
use crate::modulus::REDUCEMOD;
use crate::poly::Poly;
use crate::ring::Ring;
use itertools::izip;

impl Ring<u64> {
    pub fn new(n: usize, q: u64) -> Self {
        assert!(
            n.is_power_of_two() && n >= 2,
            "invalid argument n={}: not a power of two >= 2",
            n
        );
        let prime: Prime<u64> = Prime::<u64>::new(q);
        Self {
            n,
            modulus: prime.clone(),
            dft: Box::new(Table::<u64>::new(prime, (2 * n) as u64)),
        }
    }

    /// Maps signed coefficients to a, with coefficient i written at a[i * step].
    pub fn from_i64(&self, coeffs: &[i64], step: usize, a: &mut Poly<u64>) {
        assert!(
            coeffs.len() * step <= a.n(),
            "invalid coeffs: coeffs.len()={} > a.n()/step={}",
            coeffs.len(),
            a.n() / step
        );
        a.0.iter_mut()
            .step_by(step)
            .zip(coeffs.iter())
            .for_each(|(a, c)| *a = self.modulus.from_i64(*c));
    }

    /// Maps a, whose coefficients are in [0, a_modulus), to b by centered lifting.
    pub fn switch_modulus_centered(&self, a: &Poly<u64>, a_modulus: u64, b: &mut Poly<u64>) {
        debug_assert!(a.n() == b.n(), "a.n()={} != b.n()={}", a.n(), b.n());
        let half: u64 = a_modulus >> 1;
        if a_modulus <= self.modulus.q {
            let shift: u64 = self.modulus.q - a_modulus;
            izip!(a.0.iter(), b.0.iter_mut())
                .for_each(|(a, b)| *b = if *a > half { *a + shift } else { *a });
        } else {
            let q: u64 = self.modulus.q;
            let shift: u64 = q - a_modulus % q;
            izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| {
                let a_mod_q: u64 = *a % q;
                *b = if *a > half {
                    (a_mod_q + shift) % q
                } else {
                    a_mod_q
                };
            });
        }
    }
}

impl Ring<u64> {
    pub fn ntt_inplace(&self, poly: &mut Poly<u64>) {
        self.dft.forward_inplace(&mut poly.0)
    }

    pub fn intt_inplace(&self, poly: &mut Poly<u64>) {
        self.dft.backward_inplace(&mut poly.0)
    }

    pub fn ntt(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.dft.forward_inplace(&mut poly_out.0)
    }

    pub fn intt(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.dft.backward_inplace(&mut poly_out.0)
    }
}

impl Ring<u64> {
    #[inline(always)]
    pub fn add_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.va_add_vb_into_vb::<REDUCE>(&a.0, &mut b.0);
    }

    #[inline(always)]
    pub fn add<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus.va_add_vb_into_vc::<REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn add_scalar_inplace<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.sa_add_vb_into_vb::<REDUCE>(b, &mut a.0);
    }

    /// b <- b - a.
    #[inline(always)]
    pub fn sub_inplace<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.vb_sub_va_into_vb::<REDUCE>(&a.0, &mut b.0);
    }

    /// c <- a - b.
    #[inline(always)]
    pub fn sub<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus.va_sub_vb_into_vc::<REDUCE>(&a.0, &b.0, &mut c.0);
    }

    #[inline(always)]
    pub fn neg_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_neg_into_va::<REDUCE>(&mut a.0);
    }

    #[inline(always)]
    pub fn reduce_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        self.modulus.va_reduce_into_va::<REDUCE>(&mut a.0);
    }

    /// c <- a * b, coefficient-wise.
    #[inline(always)]
    pub fn mul_coeffs(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus.va_mul_vb_into_vc(&a.0, &b.0, &mut c.0);
    }

    /// b <- a * b, coefficient-wise.
    #[inline(always)]
    pub fn mul_coeffs_inplace(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        self.modulus.va_mul_vb_into_vb(&a.0, &mut b.0);
    }

    /// c <- c + a * b, coefficient-wise.
    #[inline(always)]
    pub fn mul_coeffs_then_add_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_add_vc_into_vc::<REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// c <- c - a * b, coefficient-wise.
    #[inline(always)]
    pub fn mul_coeffs_then_sub_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &Poly<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        self.modulus
            .va_mul_vb_sub_vc_into_vc::<REDUCE>(&a.0, &b.0, &mut c.0);
    }

    /// c <- a * b for a scalar b.
    #[inline(always)]
    pub fn mul_scalar<const REDUCE: REDUCEMOD>(&self, a: &Poly<u64>, b: &u64, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let b_shoup: Shoup<u64> = self.modulus.prepare(*b);
        self.modulus.va_mul_sb_into_vc::<REDUCE>(&a.0, &b_shoup, &mut c.0);
    }

    #[inline(always)]
    pub fn mul_scalar_inplace<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let b_shoup: Shoup<u64> = self.modulus.prepare(*b);
        self.modulus.sa_mul_vb_into_vb::<REDUCE>(&b_shoup, &mut a.0);
    }

    /// c <- c + a * b for a scalar b.
    #[inline(always)]
    pub fn mul_scalar_then_add_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &Poly<u64>,
        b: &u64,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let b_shoup: Shoup<u64> = self.modulus.prepare(*b);
        self.modulus
            .va_mul_sb_add_vc_into_vc::<REDUCE>(&a.0, &b_shoup, &mut c.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulus::ONCE;

    #[test]
    fn switch_modulus_centered() {
        let small: Ring<u64> = Ring::new(4, 65537);
        let large: Ring<u64> = Ring::new(4, 0x1fffffffffe00001);

        let a: Poly<u64> = Poly(vec![0, 1, 65536, 32769]);
        let mut b: Poly<u64> = large.new_poly();
        large.switch_modulus_centered(&a, 65537, &mut b);
        let q: u64 = large.modulus.q;
        assert_eq!(b.0, vec![0, 1, q - 1, q - 32768]);

        let mut c: Poly<u64> = small.new_poly();
        small.switch_modulus_centered(&b, q, &mut c);
        assert_eq!(c, a);
    }

    #[test]
    fn sub_neg() {
        let ring: Ring<u64> = Ring::new(4, 65537);
        let a: Poly<u64> = Poly(vec![1, 2, 3, 4]);
        let mut b: Poly<u64> = Poly(vec![4, 3, 2, 1]);
        ring.sub_inplace::<ONCE>(&a, &mut b);
        assert_eq!(b.0, vec![3, 1, 65536, 65534]);
        ring.neg_inplace::<ONCE>(&mut b);
        assert_eq!(b.0, vec![65534, 65536, 1, 3]);
    }
}
