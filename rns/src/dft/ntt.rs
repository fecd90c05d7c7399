use crate::dft::DFT;
use crate::modulus::prime::Prime;
use crate::modulus::shoup::Shoup;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::{NONE, ONCE};
use itertools::izip;

pub struct Table<O> {
    prime: Prime<O>,
    psi_forward_rev: Vec<Shoup<O>>,
    psi_backward_rev: Vec<Shoup<O>>,
    n_inv: Shoup<O>,
    q: O,
    two_q: O,
}

impl Table<u64> {
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Table<u64> {
        assert!(
            nth_root.is_power_of_two() && nth_root >= 4,
            "invalid argument: nth_root = {} is not a power of two >= 4",
            nth_root
        );

        let psi: u64 = prime.primitive_nth_root(nth_root);
        let psi_inv: u64 = prime.inv(psi);

        let n: usize = (nth_root >> 1) as usize;
        let log_n: u32 = n.log2() as _;

        let mut psi_forward_rev: Vec<Shoup<u64>> = vec![Shoup(0, 0); n];
        let mut psi_backward_rev: Vec<Shoup<u64>> = vec![Shoup(0, 0); n];

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 0..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);
            psi_forward_rev[i_rev] = prime.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.prepare(powers_backward);
            powers_forward = prime.mul(powers_forward, psi);
            powers_backward = prime.mul(powers_backward, psi_inv);
        }

        let n_inv: Shoup<u64> = prime.prepare(prime.inv(n as u64));
        let q: u64 = prime.q();

        Self {
            prime,
            psi_forward_rev,
            psi_backward_rev,
            n_inv,
            q,
            two_q: q << 1,
        }
    }

    pub fn n(&self) -> usize {
        self.psi_forward_rev.len()
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace_core(a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace_core(a)
    }
}

impl Table<u64> {
    /// Cooley-Tukey butterflies, lazy in [0, 2q) between layers.
    fn forward_inplace_core(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != n={}",
            n,
            self.n()
        );

        let mut m: usize = 1;
        let mut size: usize = n >> 1;
        while m < n {
            izip!(a.chunks_exact_mut(2 * size), &self.psi_forward_rev[m..2 * m]).for_each(
                |(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
                },
            );
            m <<= 1;
            size >>= 1;
        }

        a.iter_mut().for_each(|a| a.reduce_once_assign(self.q));
    }

    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, psi: Shoup<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let bt: u64 = self.prime.shoup.mul_external::<NONE>(psi, *b);
        *b = *a + self.two_q - bt;
        *a += bt;
        a.reduce_once_assign(self.two_q);
        b.reduce_once_assign(self.two_q);
    }

    /// Gentleman-Sande butterflies followed by the scaling by n^-1.
    fn backward_inplace_core(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.n(),
            "invalid a.len()={} != n={}",
            n,
            self.n()
        );

        let mut m: usize = n >> 1;
        let mut size: usize = 1;
        while m >= 1 {
            izip!(a.chunks_exact_mut(2 * size), &self.psi_backward_rev[m..2 * m]).for_each(
                |(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
                },
            );
            m >>= 1;
            size <<= 1;
        }

        a.iter_mut()
            .for_each(|a| self.prime.shoup.mul_external_assign::<ONCE>(self.n_inv, a));
    }

    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, psi: Shoup<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self
            .prime
            .shoup
            .mul_external::<NONE>(psi, *a + self.two_q - *b);
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negacyclic_schoolbook(q: u64, a: &[u64], b: &[u64]) -> Vec<u64> {
        let n: usize = a.len();
        let mut c: Vec<u128> = vec![0; n];
        for i in 0..n {
            for j in 0..n {
                let prod: u128 = a[i] as u128 * b[j] as u128 % q as u128;
                if i + j < n {
                    c[i + j] = (c[i + j] + prod) % q as u128;
                } else {
                    c[i + j - n] = (c[i + j - n] + q as u128 - prod) % q as u128;
                }
            }
        }
        c.iter().map(|x| *x as u64).collect()
    }

    #[test]
    fn test_ntt() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001);
        let n: u64 = 32;
        let ntt_table: Table<u64> = Table::<u64>::new(prime, n << 1);
        let mut a: Vec<u64> = (0..n).collect();
        let b: Vec<u64> = a.clone();
        ntt_table.forward_inplace(&mut a);
        assert!(a.iter().all(|x| *x < ntt_table.q));
        ntt_table.backward_inplace(&mut a);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ntt_negacyclic_product() {
        let prime: Prime<u64> = Prime::new(0x1fffffffffe00001);
        let q: u64 = prime.q();
        let n: usize = 16;
        let ntt_table: Table<u64> = Table::<u64>::new(prime.clone(), (n as u64) << 1);
        let a: Vec<u64> = (0..n as u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15) % q).collect();
        let b: Vec<u64> = (0..n as u64).map(|i| (i * i + 7) % q).collect();
        let want: Vec<u64> = negacyclic_schoolbook(q, &a, &b);

        let mut a_ntt: Vec<u64> = a.clone();
        let mut b_ntt: Vec<u64> = b.clone();
        ntt_table.forward_inplace(&mut a_ntt);
        ntt_table.forward_inplace(&mut b_ntt);
        let mut c: Vec<u64> = vec![0; n];
        prime.va_mul_vb_into_vc(&a_ntt, &b_ntt, &mut c);
        ntt_table.backward_inplace(&mut c);
        assert_eq!(c, want);
    }
}
