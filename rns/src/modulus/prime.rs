use crate::modulus::shoup::{Shoup, ShoupPrecomp};
use crate::modulus::ReduceOnce;
use crate::modulus::{NONE, ONCE, REDUCEMOD};
use itertools::izip;
use primality_test::is_prime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    pub two_q: O,
    /// Euler's totient of q, which is q-1 for a prime.
    pub phi: O,
    pub shoup: ShoupPrecomp<O>,
}

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Panics if q is not an odd prime or if q > 2^61.
    pub fn new(q: u64) -> Self {
        assert!(q > 2 && is_prime(q), "invalid argument: q={} is not an odd prime", q);
        Self::new_unchecked(q)
    }

    /// Returns a new instance of Prime<u64> without the primality check.
    /// Panics if q > 2^61.
    pub fn new_unchecked(q: u64) -> Self {
        assert!(q <= 1 << 61, "invalid argument: q={} > 2^61", q);
        Self {
            q,
            two_q: q << 1,
            phi: q - 1,
            shoup: ShoupPrecomp::new(q),
        }
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        self.shoup.reduce_assign::<REDUCE>(x)
    }

    #[inline(always)]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        (a as u128 * b as u128 % self.q as u128) as u64
    }

    /// Returns x^exponent mod q.
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut base: u64 = x % self.q;
        let mut e: u64 = exponent;
        let mut y: u64 = 1;
        while e > 0 {
            if e & 1 == 1 {
                y = self.mul(y, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        y
    }

    /// Returns x^-1 mod q. Panics if x = 0 mod q.
    pub fn inv(&self, x: u64) -> u64 {
        assert!(x % self.q != 0, "invalid argument: x=0 mod q has no inverse");
        self.pow(x, self.phi - 1)
    }

    /// Maps a signed integer to [0, q).
    #[inline(always)]
    pub fn from_i64(&self, x: i64) -> u64 {
        let r: u64 = x.unsigned_abs() % self.q;
        if x < 0 && r != 0 {
            self.q - r
        } else {
            r
        }
    }

    /// Returns a primitive nth_root-th root of unity mod q.
    /// Panics if nth_root is not a power of two dividing q-1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> u64 {
        assert!(
            nth_root >= 2 && nth_root & (nth_root - 1) == 0,
            "invalid argument: nth_root={} is not a power of two",
            nth_root
        );
        assert!(
            self.phi % nth_root == 0,
            "invalid argument: nth_root={} does not divide q-1={}",
            nth_root,
            self.phi
        );
        let exponent: u64 = self.phi / nth_root;
        let minus_one: u64 = self.q - 1;
        // psi has order exactly nth_root iff psi^(nth_root/2) = -1.
        (2..self.q)
            .map(|g| self.pow(g, exponent))
            .find(|psi| self.pow(*psi, nth_root >> 1) == minus_one)
            .unwrap_or_else(|| panic!("no primitive {}-th root of unity mod {}", nth_root, self.q))
    }

    #[inline(always)]
    pub fn prepare(&self, x: u64) -> Shoup<u64> {
        self.shoup.prepare(x % self.q)
    }
}

impl Prime<u64> {
    #[inline(always)]
    pub fn sa_add_sb_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b += a;
        self.reduce_assign::<REDUCE>(b);
    }

    /// b <- b - a, with a, b in [0, 2q).
    #[inline(always)]
    pub fn sb_sub_sa_into_sb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut u64) {
        *b = *b + self.two_q - a;
        b.reduce_once_assign(self.two_q);
        self.reduce_assign::<REDUCE>(b);
    }

    #[inline(always)]
    pub fn sa_neg_into_sa<const REDUCE: REDUCEMOD>(&self, a: &mut u64) {
        *a = self.two_q - *a;
        a.reduce_once_assign(self.two_q);
        self.reduce_assign::<REDUCE>(a);
    }

    #[inline(always)]
    pub fn va_reduce_into_va<const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        a.iter_mut().for_each(|a| self.reduce_assign::<REDUCE>(a));
    }

    #[inline(always)]
    pub fn va_add_vb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        izip!(a, b, c).for_each(|(a, b, c)| {
            *c = a + b;
            self.reduce_assign::<REDUCE>(c);
        });
    }

    #[inline(always)]
    pub fn va_add_vb_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        izip!(a, b).for_each(|(a, b)| self.sa_add_sb_into_sb::<REDUCE>(a, b));
    }

    #[inline(always)]
    pub fn sa_add_vb_into_vb<const REDUCE: REDUCEMOD>(&self, a: &u64, b: &mut [u64]) {
        b.iter_mut().for_each(|b| self.sa_add_sb_into_sb::<REDUCE>(a, b));
    }

    /// c <- a - b.
    #[inline(always)]
    pub fn va_sub_vb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        izip!(a, b, c).for_each(|(a, b, c)| {
            *c = *a;
            self.sb_sub_sa_into_sb::<REDUCE>(b, c);
        });
    }

    /// b <- b - a.
    #[inline(always)]
    pub fn vb_sub_va_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &mut [u64]) {
        izip!(a, b).for_each(|(a, b)| self.sb_sub_sa_into_sb::<REDUCE>(a, b));
    }

    #[inline(always)]
    pub fn va_neg_into_va<const REDUCE: REDUCEMOD>(&self, a: &mut [u64]) {
        a.iter_mut().for_each(|a| self.sa_neg_into_sa::<REDUCE>(a));
    }

    #[inline(always)]
    pub fn va_mul_vb_into_vc(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        izip!(a, b, c).for_each(|(a, b, c)| *c = self.mul(*a, *b));
    }

    #[inline(always)]
    pub fn va_mul_vb_into_vb(&self, a: &[u64], b: &mut [u64]) {
        izip!(a, b).for_each(|(a, b)| *b = self.mul(*a, *b));
    }

    /// c <- c + a * b.
    #[inline(always)]
    pub fn va_mul_vb_add_vc_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        izip!(a, b, c).for_each(|(a, b, c)| {
            *c += self.mul(*a, *b);
            self.reduce_assign::<REDUCE>(c);
        });
    }

    /// c <- c - a * b.
    #[inline(always)]
    pub fn va_mul_vb_sub_vc_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &[u64], c: &mut [u64]) {
        izip!(a, b, c).for_each(|(a, b, c)| {
            *c = *c + self.q - self.mul(*a, *b);
            self.reduce_assign::<REDUCE>(c);
        });
    }

    #[inline(always)]
    pub fn va_mul_sb_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &Shoup<u64>, c: &mut [u64]) {
        izip!(a, c).for_each(|(a, c)| *c = self.shoup.mul_external::<REDUCE>(*b, *a));
    }

    #[inline(always)]
    pub fn sa_mul_vb_into_vb<const REDUCE: REDUCEMOD>(&self, a: &Shoup<u64>, b: &mut [u64]) {
        b.iter_mut()
            .for_each(|b| self.shoup.mul_external_assign::<REDUCE>(*a, b));
    }

    /// c <- c + a * b.
    #[inline(always)]
    pub fn va_mul_sb_add_vc_into_vc<const REDUCE: REDUCEMOD>(&self, a: &[u64], b: &Shoup<u64>, c: &mut [u64]) {
        izip!(a, c).for_each(|(a, c)| {
            *c += self.shoup.mul_external::<ONCE>(*b, *a);
            self.reduce_assign::<REDUCE>(c);
        });
    }

    /// b <- (b - a) * c, with a, b in [0, 2q).
    #[inline(always)]
    pub fn vb_sub_va_mul_sc_into_vb<const REDUCE: REDUCEMOD>(&self, a: &[u64], c: &Shoup<u64>, b: &mut [u64]) {
        izip!(a, b).for_each(|(a, b)| {
            self.sb_sub_sa_into_sb::<NONE>(a, b);
            self.shoup.mul_external_assign::<REDUCE>(*c, b);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modulus::FULL;

    #[test]
    fn arithmetic() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001);
        let q: u64 = prime.q();
        let x: u64 = 0x123456789abcdef % q;
        assert_eq!(prime.mul(x, prime.inv(x)), 1);
        assert_eq!(prime.from_i64(-1), q - 1);
        assert_eq!(prime.from_i64(i64::MIN), q - (i64::MIN.unsigned_abs() % q));

        let mut a: u64 = 3;
        prime.sb_sub_sa_into_sb::<ONCE>(&5, &mut a);
        assert_eq!(a, q - 2);
        prime.sa_neg_into_sa::<ONCE>(&mut a);
        assert_eq!(a, 2);
        let mut zero: u64 = 0;
        prime.sa_neg_into_sa::<ONCE>(&mut zero);
        assert_eq!(zero, 0);
    }

    #[test]
    fn primitive_nth_root() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001);
        let nth_root: u64 = 1 << 11;
        let psi: u64 = prime.primitive_nth_root(nth_root);
        assert_eq!(prime.pow(psi, nth_root), 1);
        assert_eq!(prime.pow(psi, nth_root >> 1), prime.q() - 1);
    }

    #[test]
    fn full_reduction() {
        let prime: Prime<u64> = Prime::new(65537);
        let mut a: Vec<u64> = vec![u64::MAX, 65537, 131073];
        prime.va_reduce_into_va::<FULL>(&mut a);
        assert_eq!(a, vec![u64::MAX % 65537, 0, 65536]);
    }
}
