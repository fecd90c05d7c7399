pub mod impl_u64;

use crate::dft::DFT;
use crate::modulus::prime::Prime;
use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};

pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub dft: Box<dyn DFT<O>>,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

impl Ring<u64> {
    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }
}

/// A view over a chain of rings Z_{q_0}[X]/(X^n+1), ..., Z_{q_level}[X]/(X^n+1).
#[derive(Clone, Copy)]
pub struct RingRNS<'a, O>(pub &'a [Ring<O>]);

impl<'a, O> RingRNS<'a, O> {
    pub fn new(rings: &'a [Ring<O>]) -> Self {
        assert!(!rings.is_empty(), "invalid argument rings: rings is empty");
        RingRNS(rings)
    }

    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    /// Returns the sub-chain q_0, ..., q_level.
    pub fn at_level(&self, level: usize) -> RingRNS<'a, O> {
        assert!(
            level < self.0.len(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        RingRNS(&self.0[..level + 1])
    }
}

impl RingRNS<'_, u64> {
    pub fn new_polyrns(&self) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), self.level())
    }

    pub fn moduli(&self) -> Vec<u64> {
        self.0.iter().map(|r| r.modulus.q()).collect()
    }
}
