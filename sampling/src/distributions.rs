use crate::source::Source;
use rand_core::RngCore;
use rand_distr::{Distribution as _, Normal, NormalError};

/// Number of standard deviations at which Gaussian samples are rejected.
pub const GAUSSIAN_TAIL_BOUND: f64 = 6.0;

/// Small-coefficient distributions for secrets and errors, sampled as signed integers.
#[derive(Clone, Copy, Debug)]
pub enum Distribution {
    /// Rounded Gaussian of given standard deviation, rejected beyond the bound.
    Gaussian(Normal<f64>, f64),
    /// Ternary with exactly h non-zero coefficients.
    TernaryHw(usize),
    /// Uniform ternary over {-1, 0, 1}.
    Ternary,
}

impl Distribution {
    /// Rejects a standard deviation that is not finite and positive, since the
    /// rejection bound 6 sigma must be positive for sampling to terminate.
    pub fn gaussian(sigma: f64) -> Result<Self, NormalError> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(NormalError::BadVariance);
        }
        Ok(Distribution::Gaussian(
            Normal::new(0.0, sigma)?,
            GAUSSIAN_TAIL_BOUND * sigma,
        ))
    }

    /// Returns n samples.
    pub fn sample(&self, source: &mut Source, n: usize) -> Vec<i64> {
        match self {
            Distribution::Gaussian(normal, bound) => (0..n)
                .map(|_| {
                    let mut x: f64 = normal.sample(source);
                    while x.abs() > *bound {
                        x = normal.sample(source)
                    }
                    x.round() as i64
                })
                .collect(),
            Distribution::Ternary => (0..n).map(|_| source.next_u64n(3, 3) as i64 - 1).collect(),
            Distribution::TernaryHw(h) => {
                assert!(*h <= n, "invalid hamming weight: h={} > n={}", h, n);
                let mut out: Vec<i64> = vec![0; n];
                let mut index: Vec<usize> = (0..n).collect();
                // Partial Fisher-Yates: the first h entries of index are a uniform h-subset.
                for i in 0..*h {
                    let remaining: u64 = (n - i) as u64;
                    let mask: u64 = remaining.next_power_of_two() - 1;
                    let j: usize = i + source.next_u64n(remaining, mask) as usize;
                    index.swap(i, j);
                    out[index[i]] = if source.next_u32() & 1 == 1 { 1 } else { -1 };
                }
                out
            }
        }
    }
}
