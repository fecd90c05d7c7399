pub mod ntt;

/// Negacyclic transform over Z_q[X]/(X^n+1).
pub trait DFT<O>: Send + Sync {
    /// Maps coefficients in [0, q) to evaluations in [0, q), in bit-reversed order.
    fn forward_inplace(&self, x: &mut [O]);
    /// Inverse of [DFT::forward_inplace], including the scaling by n^-1.
    fn backward_inplace(&self, x: &mut [O]);
}
