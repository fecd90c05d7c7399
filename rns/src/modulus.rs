pub mod prime;
pub mod prime_generator;
pub mod shoup;

pub type REDUCEMOD = u8;

/// No reduction: the output of an addition lies in [0, 2q).
pub const NONE: REDUCEMOD = 0;
/// Conditional subtraction of q: inputs in [0, 2q) are mapped to [0, q).
pub const ONCE: REDUCEMOD = 1;
/// Full reduction of any u64.
pub const FULL: REDUCEMOD = 2;

pub trait WordOps<O> {
    fn log2(self) -> usize;
    fn reverse_bits_msb(self, n: u32) -> O;
    fn mask(self) -> O;
}

impl WordOps<u64> for u64 {
    #[inline(always)]
    fn log2(self) -> usize {
        (u64::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (u64::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> u64 {
        (1 << self.log2()) - 1
    }
}

impl WordOps<usize> for usize {
    #[inline(always)]
    fn log2(self) -> usize {
        (usize::BITS - (self - 1).leading_zeros()) as _
    }
    #[inline(always)]
    fn reverse_bits_msb(self, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        self.reverse_bits() >> (usize::BITS - n)
    }
    #[inline(always)]
    fn mask(self) -> usize {
        (1 << self.log2()) - 1
    }
}

pub trait ReduceOnce<O> {
    /// Assigns self-q to self if self >= q.
    /// User must ensure that 2q fits in O.
    fn reduce_once_assign(&mut self, q: O);
    /// Returns self-q if self >= q else self.
    /// User must ensure that 2q fits in O.
    fn reduce_once(&self, q: O) -> O;
}

impl ReduceOnce<u64> for u64 {
    #[inline(always)]
    fn reduce_once_assign(&mut self, q: u64) {
        if *self >= q {
            *self -= q
        }
    }

    #[inline(always)]
    fn reduce_once(&self, q: u64) -> u64 {
        if *self >= q {
            *self - q
        } else {
            *self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_ops() {
        assert_eq!(1024u64.log2(), 10);
        assert_eq!(1025u64.log2(), 11);
        assert_eq!(1u64.log2(), 0);
        assert_eq!(0b0011u64.reverse_bits_msb(4), 0b1100);
        assert_eq!(1usize.reverse_bits_msb(3), 4);
        assert_eq!(1000u64.mask(), 1023);
    }
}
