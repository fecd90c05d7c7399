use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};

/// Returns a lookup table for the automorphism X^{i} -> X^{i * gal_el mod 2n}.
/// If NTT, index[i] is the slot of the input read by output slot i.
/// Otherwise index[i] is the output position of coefficient i, with the sign in the MSB.
/// Method will panic if n is not a power-of-two or if gal_el is even.
pub fn automorphism_index<const NTT: bool>(n: usize, gal_el: usize) -> Vec<usize> {
    assert!(n.is_power_of_two(), "invalid n={}: not a power-of-two", n);
    assert!(gal_el & 1 == 1, "invalid gal_el={}: not coprime with 2n={}", gal_el, 2 * n);

    let nth_root: usize = n << 1;
    let mask: usize = nth_root - 1;
    let gal_el: usize = gal_el & mask;

    if NTT {
        let log_n: u32 = n.log2() as u32;
        (0..n)
            .map(|i| {
                let i_rev: usize = 2 * i.reverse_bits_msb(log_n) + 1;
                let gal_el_i: usize = ((gal_el * i_rev) & mask) >> 1;
                gal_el_i.reverse_bits_msb(log_n)
            })
            .collect()
    } else {
        let log_n: usize = n.log2();
        (0..n)
            .map(|i| {
                let gal_el_i: usize = (i * gal_el) & mask;
                let sign: usize = (gal_el_i >> log_n) & 1;
                (gal_el_i & (n - 1)) | (sign << (usize::BITS - 1))
            })
            .collect()
    }
}

impl Ring<u64> {
    /// b <- a(X^gal_el). Both a and b in the NTT domain if NTT, else in the coefficient domain.
    pub fn automorphism<const NTT: bool>(&self, a: &Poly<u64>, gal_el: usize, b: &mut Poly<u64>) {
        let index: Vec<usize> = automorphism_index::<NTT>(self.n(), gal_el);
        self.automorphism_from_index::<NTT>(a, &index, b)
    }

    pub fn automorphism_from_index<const NTT: bool>(
        &self,
        a: &Poly<u64>,
        index: &[usize],
        b: &mut Poly<u64>,
    ) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        debug_assert!(index.len() == a.n(), "index.len()={} != a.n()={}", index.len(), a.n());

        if NTT {
            b.0.iter_mut()
                .zip(index.iter())
                .for_each(|(b, j)| *b = a.0[*j]);
        } else {
            let q: u64 = self.modulus.q;
            let sign_bit: usize = 1 << (usize::BITS - 1);
            a.0.iter().zip(index.iter()).for_each(|(ai, j)| {
                let j_abs: usize = j & !sign_bit;
                b.0[j_abs] = if j & sign_bit != 0 && *ai != 0 {
                    q - ai
                } else {
                    *ai
                };
            });
        }
    }
}

impl RingRNS<'_, u64> {
    pub fn automorphism<const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        gal_el: usize,
        b: &mut PolyRNS<u64>,
    ) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        let index: Vec<usize> = automorphism_index::<NTT>(self.n(), gal_el);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.automorphism_from_index::<NTT>(a.at(i), &index, b.at_mut(i)));
    }
}
