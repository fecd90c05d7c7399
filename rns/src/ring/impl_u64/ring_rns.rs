use crate::modulus::REDUCEMOD;
use crate::poly::PolyRNS;
use crate::ring::{Ring, RingRNS};

pub fn new_rings(n: usize, moduli: Vec<u64>) -> Vec<Ring<u64>> {
    assert!(!moduli.is_empty(), "moduli cannot be empty");
    moduli.into_iter().map(|q| Ring::new(n, q)).collect()
}

/// All operations act on the residues 0..=self.level() of their operands,
/// which may carry more residues.
impl RingRNS<'_, u64> {
    #[inline(always)]
    fn check_level(&self, a: &PolyRNS<u64>) {
        debug_assert!(
            a.level() >= self.level(),
            "a.level()={} < self.level()={}",
            a.level(),
            self.level()
        );
    }

    pub fn ntt_inplace(&self, a: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.ntt_inplace(a.at_mut(i)));
    }

    pub fn intt_inplace(&self, a: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.intt_inplace(a.at_mut(i)));
    }

    pub fn add<const REDUCE: REDUCEMOD>(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(b);
        self.check_level(c);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.add::<REDUCE>(a.at(i), b.at(i), c.at_mut(i)));
    }

    /// b <- b + a.
    pub fn add_inplace<const REDUCE: REDUCEMOD>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(b);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.add_inplace::<REDUCE>(a.at(i), b.at_mut(i)));
    }

    /// c <- a - b.
    pub fn sub<const REDUCE: REDUCEMOD>(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(b);
        self.check_level(c);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.sub::<REDUCE>(a.at(i), b.at(i), c.at_mut(i)));
    }

    /// b <- b - a.
    pub fn sub_inplace<const REDUCE: REDUCEMOD>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(b);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.sub_inplace::<REDUCE>(a.at(i), b.at_mut(i)));
    }

    pub fn neg_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.neg_inplace::<REDUCE>(a.at_mut(i)));
    }

    pub fn reduce_inplace<const REDUCE: REDUCEMOD>(&self, a: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.reduce_inplace::<REDUCE>(a.at_mut(i)));
    }

    pub fn mul_coeffs(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(b);
        self.check_level(c);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_coeffs(a.at(i), b.at(i), c.at_mut(i)));
    }

    /// b <- a * b.
    pub fn mul_coeffs_inplace(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(b);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_coeffs_inplace(a.at(i), b.at_mut(i)));
    }

    /// c <- c + a * b.
    pub fn mul_coeffs_then_add_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) {
        self.check_level(a);
        self.check_level(b);
        self.check_level(c);
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.mul_coeffs_then_add_inplace::<REDUCE>(a.at(i), b.at(i), c.at_mut(i))
        });
    }

    /// c <- c - a * b.
    pub fn mul_coeffs_then_sub_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        b: &PolyRNS<u64>,
        c: &mut PolyRNS<u64>,
    ) {
        self.check_level(a);
        self.check_level(b);
        self.check_level(c);
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.mul_coeffs_then_sub_inplace::<REDUCE>(a.at(i), b.at(i), c.at_mut(i))
        });
    }

    /// a <- a * scalars[i] on residue i, scalars[i] in [0, q_i).
    pub fn mul_scalar_inplace<const REDUCE: REDUCEMOD>(&self, scalars: &[u64], a: &mut PolyRNS<u64>) {
        self.check_level(a);
        assert!(scalars.len() > self.level(), "scalars.len()={} <= level={}", scalars.len(), self.level());
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar_inplace::<REDUCE>(&scalars[i], a.at_mut(i)));
    }

    /// c <- a * scalars[i] on residue i.
    pub fn mul_scalar<const REDUCE: REDUCEMOD>(&self, a: &PolyRNS<u64>, scalars: &[u64], c: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.check_level(c);
        assert!(scalars.len() > self.level(), "scalars.len()={} <= level={}", scalars.len(), self.level());
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.mul_scalar::<REDUCE>(a.at(i), &scalars[i], c.at_mut(i)));
    }

    /// c <- c + a * scalars[i] on residue i.
    pub fn mul_scalar_then_add_inplace<const REDUCE: REDUCEMOD>(
        &self,
        a: &PolyRNS<u64>,
        scalars: &[u64],
        c: &mut PolyRNS<u64>,
    ) {
        self.check_level(a);
        self.check_level(c);
        assert!(scalars.len() > self.level(), "scalars.len()={} <= level={}", scalars.len(), self.level());
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.mul_scalar_then_add_inplace::<REDUCE>(a.at(i), &scalars[i], c.at_mut(i))
        });
    }

    /// a <- a + scalars[i] on residue i.
    pub fn add_scalar_inplace<const REDUCE: REDUCEMOD>(&self, scalars: &[u64], a: &mut PolyRNS<u64>) {
        self.check_level(a);
        assert!(scalars.len() > self.level(), "scalars.len()={} <= level={}", scalars.len(), self.level());
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.add_scalar_inplace::<REDUCE>(&scalars[i], a.at_mut(i)));
    }

    /// Maps signed coefficients to every residue of a.
    pub fn from_i64_inplace(&self, coeffs: &[i64], step: usize, a: &mut PolyRNS<u64>) {
        self.check_level(a);
        self.0
            .iter()
            .enumerate()
            .for_each(|(i, ring)| ring.from_i64(coeffs, step, a.at_mut(i)));
    }
}
