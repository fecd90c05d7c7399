use crate::modulus::ReduceOnce;
use crate::modulus::{FULL, NONE, ONCE, REDUCEMOD};

/// A constant prepared for Shoup multiplication: (value, floor(value * 2^64 / q)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Shoup<O>(pub O, pub O);

impl Shoup<u64> {
    #[inline(always)]
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShoupPrecomp<O> {
    pub q: O,
    pub two_q: O,
}

impl ShoupPrecomp<u64> {
    pub fn new(q: u64) -> Self {
        debug_assert!(q < 1 << 62, "q={} >= 2^62", q);
        Self { q, two_q: q << 1 }
    }

    /// Returns the Shoup representation of v, which must be smaller than q.
    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Shoup<u64> {
        debug_assert!(v < self.q, "v={} >= q={}", v, self.q);
        Shoup(v, (((v as u128) << 64) / self.q as u128) as u64)
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            FULL => *x %= self.q,
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    /// Returns lhs * rhs mod q, with the output range given by REDUCE:
    /// [0, 2q) for NONE and [0, q) otherwise.
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Shoup<u64>, rhs: u64) -> u64 {
        let t: u64 = ((lhs.1 as u128 * rhs as u128) >> 64) as u64;
        let mut r: u64 = rhs.wrapping_mul(lhs.0).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Shoup<u64>, rhs: &mut u64) {
        *rhs = self.mul_external::<REDUCE>(lhs, *rhs)
    }
}
