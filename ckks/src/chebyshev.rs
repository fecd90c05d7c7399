use crate::ciphertext::Ciphertext;
use crate::error::{PreconditionViolation, Result};
use crate::evaluator::Evaluator;
use crate::keys::RelinearizationKey;
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use tracing::debug;

/// Interpolant p(x) = sum_k c_k T_k((2x - a - b) / (b - a)) of a function on [a, b].
#[derive(Clone, Debug, PartialEq)]
pub struct ChebyshevInterpolation {
    coeffs: Vec<Complex64>,
    a: f64,
    b: f64,
}

impl ChebyshevInterpolation {
    /// Interpolates f at the degree+1 Chebyshev nodes of [a, b].
    pub fn approximate<F>(f: F, a: f64, b: f64, degree: usize) -> Self
    where
        F: Fn(f64) -> Complex64,
    {
        assert!(a < b, "invalid interval: a={} >= b={}", a, b);
        assert!(degree >= 1, "invalid degree: degree=0");
        let nodes: usize = degree + 1;
        let (mid, half) = ((a + b) / 2.0, (b - a) / 2.0);
        let thetas: Vec<f64> = (0..nodes)
            .map(|j| PI * (j as f64 + 0.5) / nodes as f64)
            .collect();
        let values: Vec<Complex64> = thetas.iter().map(|t| f(half * t.cos() + mid)).collect();

        let mut coeffs: Vec<Complex64> = (0..nodes)
            .map(|k| {
                values
                    .iter()
                    .zip(thetas.iter())
                    .map(|(v, t)| v * (k as f64 * t).cos())
                    .sum::<Complex64>()
                    * (2.0 / nodes as f64)
            })
            .collect();
        coeffs[0] *= 0.5;
        Self { coeffs, a, b }
    }

    pub fn coeffs(&self) -> &[Complex64] {
        &self.coeffs
    }

    pub fn max_degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    /// Multiplies the interpolant by c.
    pub fn scale(&mut self, c: f64) {
        self.coeffs.iter_mut().for_each(|x| *x *= c);
    }

    fn is_normalized(&self) -> bool {
        self.a == -1.0 && self.b == 1.0
    }

    /// Evaluates the interpolant at x with the Clenshaw recurrence.
    pub fn evaluate(&self, x: f64) -> Complex64 {
        let u: f64 = (2.0 * x - self.a - self.b) / (self.b - self.a);
        let mut b1: Complex64 = Complex64::default();
        let mut b2: Complex64 = Complex64::default();
        for c in self.coeffs[1..].iter().rev() {
            let b0: Complex64 = c + b1 * (2.0 * u) - b2;
            b2 = b1;
            b1 = b0;
        }
        self.coeffs[0] + b1 * u - b2
    }

    /// Number of levels consumed by the homomorphic evaluation, ceil(log2(degree + 1))
    /// plus one for the change of variable when [a, b] is not [-1, 1].
    pub fn depth(&self) -> usize {
        let affine: usize = usize::from(!self.is_normalized());
        ceil_log2(self.max_degree() + 1) + affine
    }
}

fn ceil_log2(x: usize) -> usize {
    x.next_power_of_two().trailing_zeros() as usize
}

/// Baby-step size exponent for a polynomial of the given degree.
fn log_split(degree: usize) -> usize {
    (usize::BITS - degree.leading_zeros()) as usize >> 1
}

/// Largest power of two s <= degree, at which the polynomial is split as q * T_s + r.
fn giant_split(degree: usize) -> usize {
    1 << (usize::BITS - 1 - degree.leading_zeros())
}

/// Splits sum_k c_k T_k as q * T_s + r using T_{s+j} = 2 T_s T_j - T_{s-j}.
fn split_coeffs(coeffs: &[Complex64], s: usize) -> (Vec<Complex64>, Vec<Complex64>) {
    let mut q: Vec<Complex64> = coeffs[s..].iter().map(|c| c * 2.0).collect();
    q[0] = coeffs[s];
    let mut r: Vec<Complex64> = coeffs[..s].to_vec();
    coeffs[s + 1..]
        .iter()
        .enumerate()
        .for_each(|(j, c)| r[s - j - 1] -= c);
    (q, r)
}

/// Chebyshev polynomials T_k of a ciphertext, with T_k at level top - ceil(log2(k)):
/// T_1, ..., T_{2^log_split} and the powers of two above.
struct PowerBasis {
    top: usize,
    log_split: usize,
    powers: BTreeMap<usize, Ciphertext>,
}

impl PowerBasis {
    fn get(&self, k: usize) -> &Ciphertext {
        &self.powers[&k]
    }
}

impl Evaluator {
    /// T_k = 2 T_a T_b - T_{a-b} with a = ceil(k/2), b = floor(k/2).
    fn gen_power(&self, basis: &mut PowerBasis, k: usize, rlk: &RelinearizationKey) -> Result<()> {
        if basis.powers.contains_key(&k) {
            return Ok(());
        }
        let (a, b) = ((k + 1) >> 1, k >> 1);
        self.gen_power(basis, a, rlk)?;
        self.gen_power(basis, b, rlk)?;
        let mut t: Ciphertext = self.mul_relin(basis.get(a), basis.get(b), rlk)?;
        self.mul_by_integer(&mut t, 2);
        if a == b {
            self.add_const(&mut t, Complex64::new(-1.0, 0.0));
        } else {
            self.sub_inplace(&mut t, basis.get(1));
        }
        self.rescale(&mut t)?;
        basis.powers.insert(k, t);
        Ok(())
    }

    /// Returns sum_k c_k T_k at the given level and scale, without rescaling: the
    /// coefficients are multiplied by scale / T_k.scale and rounded.
    fn evaluate_baby_step(&self, coeffs: &[Complex64], basis: &PowerBasis, level: usize, scale: f64) -> Ciphertext {
        let mut acc: Ciphertext = Ciphertext::new(&self.params, 1, level, scale);
        for (k, c) in coeffs.iter().enumerate().skip(1) {
            let t_k: &Ciphertext = basis.get(k);
            self.mul_by_complex_integer_then_add(t_k, c * (scale / t_k.scale), &mut acc);
        }
        self.add_const(&mut acc, coeffs[0]);
        acc
    }

    /// Returns sum_k c_k T_k at the given level and scale, without a final rescale.
    /// Requires top - level >= ceil(log2(degree + 1)) - 1.
    ///
    /// The polynomial is split as q * T_s + r with s the largest power of two <= degree.
    /// q is evaluated with a rescale at the same level, so that q * T_s lands at scale,
    /// and r of degree s - 1 is accumulated on it before any rescale. This keeps the
    /// depth at ceil(log2(degree + 1)) once the caller rescales.
    fn evaluate_recursive(
        &self,
        coeffs: &[Complex64],
        basis: &PowerBasis,
        level: usize,
        scale: f64,
        rlk: &RelinearizationKey,
    ) -> Result<Ciphertext> {
        let degree: usize = coeffs.len() - 1;
        if degree <= 1 << basis.log_split && ceil_log2(degree.max(1)) <= basis.top - level {
            return Ok(self.evaluate_baby_step(coeffs, basis, level, scale));
        }

        let s: usize = giant_split(degree);
        let (q, r) = split_coeffs(coeffs, s);
        let t_s: &Ciphertext = basis.get(s);

        let mut res: Ciphertext = self.evaluate_recursive(&r, basis, level, scale, rlk)?;
        if q.len() == 1 {
            self.mul_by_complex_integer_then_add(t_s, q[0] * (scale / t_s.scale), &mut res);
        } else {
            let q_ct: Ciphertext = self.evaluate_rescaled(&q, basis, level, scale / t_s.scale, rlk)?;
            let qt_s: Ciphertext = self.mul_relin(&q_ct, t_s, rlk)?;
            self.add_inplace(&mut res, &qt_s);
        }
        res.set_scale(scale);
        Ok(res)
    }

    /// Returns sum_k c_k T_k at the given level with scale exactly scale, ending with
    /// a rescale from level + 1.
    fn evaluate_rescaled(
        &self,
        coeffs: &[Complex64],
        basis: &PowerBasis,
        level: usize,
        scale: f64,
        rlk: &RelinearizationKey,
    ) -> Result<Ciphertext> {
        let q: f64 = self.params.q(level + 1) as f64;
        let mut res: Ciphertext = self.evaluate_recursive(coeffs, basis, level + 1, scale * q, rlk)?;
        self.rescale(&mut res)?;
        res.set_scale(scale);
        Ok(res)
    }

    /// Evaluates the interpolant on the slots of ct, with output scale ct.scale.
    pub fn evaluate_cheby_fast(
        &self,
        ct: &Ciphertext,
        cheby: &ChebyshevInterpolation,
        rlk: &RelinearizationKey,
    ) -> Result<Ciphertext> {
        self.evaluate_cheby_fast_with_scale(ct, cheby, ct.scale, rlk)
    }

    /// Evaluates the interpolant on the slots of ct, consuming cheby.depth() levels,
    /// with output scale exactly target_scale.
    pub fn evaluate_cheby_fast_with_scale(
        &self,
        ct: &Ciphertext,
        cheby: &ChebyshevInterpolation,
        target_scale: f64,
        rlk: &RelinearizationKey,
    ) -> Result<Ciphertext> {
        if ct.degree() != 1 {
            return Err(PreconditionViolation::DegreeMismatch {
                expected: 1,
                found: ct.degree(),
            }
            .into());
        }
        if ct.level() < cheby.depth() {
            return Err(PreconditionViolation::InsufficientLevels {
                required: cheby.depth(),
                available: ct.level(),
            }
            .into());
        }

        let mut x: Ciphertext = ct.clone();
        if !cheby.is_normalized() {
            let (a, b) = cheby.interval();
            self.mul_by_const(&mut x, 2.0 / (b - a));
            self.add_const(&mut x, Complex64::new(-(a + b) / (b - a), 0.0));
            self.rescale(&mut x)?;
        }

        let degree: usize = cheby.max_degree();
        let log_split: usize = log_split(degree);
        let top: usize = x.level();
        let mut basis: PowerBasis = PowerBasis {
            top,
            log_split,
            powers: BTreeMap::new(),
        };
        basis.powers.insert(1, x);
        for k in 2..=(1 << log_split).min(degree) {
            self.gen_power(&mut basis, k, rlk)?;
        }
        let mut s: usize = 1 << log_split;
        while s <= degree {
            self.gen_power(&mut basis, s, rlk)?;
            s <<= 1;
        }

        let level: usize = top - ceil_log2(degree + 1);
        let res: Ciphertext = self.evaluate_rescaled(cheby.coeffs(), &basis, level, target_scale, rlk)?;
        debug!(
            degree,
            level = res.level(),
            scale = res.scale,
            "chebyshev evaluation"
        );
        Ok(res)
    }

    /// Evaluates the interpolant, assumed to approximate beta_0 cos(theta), then applies
    /// r double-angle steps c <- c^2 - beta_{i+1}, each consuming one level, so that the
    /// output approximates cos(2^r theta) / (2 pi) at scale exactly target_scale.
    pub fn evaluate_cheby_fast_special(
        &self,
        ct: &Ciphertext,
        cheby: &ChebyshevInterpolation,
        r: usize,
        target_scale: f64,
        rlk: &RelinearizationKey,
    ) -> Result<Ciphertext> {
        let depth: usize = cheby.depth() + r;
        if ct.level() < depth {
            return Err(PreconditionViolation::InsufficientLevels {
                required: depth,
                available: ct.level(),
            }
            .into());
        }

        // Scales s_i of the successive doublings: s_i^2 / q_{l_0 - i} = s_{i+1}, s_r = target.
        let level_0: usize = ct.level() - cheby.depth();
        let mut scales: Vec<f64> = vec![target_scale; r + 1];
        for i in (0..r).rev() {
            scales[i] = (scales[i + 1] * self.params.q(level_0 - i) as f64).sqrt();
        }

        let betas: Vec<f64> = double_angle_constants(r);
        let mut c: Ciphertext = self.evaluate_cheby_fast_with_scale(ct, cheby, scales[0], rlk)?;
        for i in 0..r {
            c = self.mul_relin(&c, &c, rlk)?;
            self.add_const(&mut c, Complex64::new(-betas[i + 1], 0.0));
            self.rescale(&mut c)?;
            c.set_scale(scales[i + 1]);
        }
        debug!(r, level = c.level(), scale = c.scale, "double angle");
        Ok(c)
    }
}

/// Returns beta_0, ..., beta_r with beta_r = 1/(2 pi) and beta_i = sqrt(2 beta_{i+1}).
pub fn double_angle_constants(r: usize) -> Vec<f64> {
    let mut betas: Vec<f64> = vec![1.0 / (2.0 * PI); r + 1];
    for i in (0..r).rev() {
        betas[i] = (2.0 * betas[i + 1]).sqrt();
    }
    betas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximation_accuracy() {
        let f = |x: f64| Complex64::new((3.0 * x).sin() + x * x, 0.0);
        let cheby: ChebyshevInterpolation = ChebyshevInterpolation::approximate(f, -2.0, 3.0, 40);
        (0..100).for_each(|i| {
            let x: f64 = -2.0 + 5.0 * i as f64 / 99.0;
            assert!((cheby.evaluate(x) - f(x)).norm() < 1e-10);
        });
    }

    #[test]
    fn depth_accounting() {
        let sine = |x: f64| Complex64::new(x.sin(), 0.0);
        let depth = |degree: usize, a: f64, b: f64| ChebyshevInterpolation::approximate(sine, a, b, degree).depth();
        assert_eq!(depth(1, -1.0, 1.0), 1);
        assert_eq!(depth(2, -1.0, 1.0), 2);
        assert_eq!(depth(3, -1.0, 1.0), 2);
        assert_eq!(depth(7, -1.0, 1.0), 3);
        assert_eq!(depth(8, -1.0, 1.0), 4);
        assert_eq!(depth(15, -1.0, 1.0), 4);
        assert_eq!(depth(16, -1.0, 1.0), 5);
        assert_eq!(depth(63, -1.0, 1.0), 6);
        assert_eq!(depth(127, -1.0, 1.0), 7);
        assert_eq!(depth(127, -2.0, 1.0), 8);
    }

    /// Walks the split tree the way the evaluation does and checks that every T_k it
    /// reads lives at or above the level it is read at, budget levels below the top.
    fn fits(degree: usize, log_split: usize, budget: usize) -> bool {
        if degree <= 1 << log_split && ceil_log2(degree.max(1)) <= budget {
            return true;
        }
        let s: usize = giant_split(degree);
        if s.trailing_zeros() as usize > budget || !fits(s - 1, log_split, budget) {
            return false;
        }
        degree == s || (budget > 0 && fits(degree - s, log_split, budget - 1))
    }

    #[test]
    fn split_tree_fits_depth() {
        for degree in 1..=300usize {
            let budget: usize = ceil_log2(degree + 1) - 1;
            assert!(fits(degree, log_split(degree), budget), "degree={}", degree);
        }
        assert!(!fits(7, log_split(7), 1));
    }

    #[test]
    fn split_identity() {
        let coeffs: Vec<Complex64> = (0..12).map(|i| Complex64::new(i as f64 + 1.0, -(i as f64))).collect();
        let cheby: ChebyshevInterpolation = ChebyshevInterpolation {
            coeffs: coeffs.clone(),
            a: -1.0,
            b: 1.0,
        };
        let (q, r) = split_coeffs(&coeffs, 8);
        let as_cheby = |c: &[Complex64]| ChebyshevInterpolation {
            coeffs: c.to_vec(),
            a: -1.0,
            b: 1.0,
        };
        let t_8 = |x: f64| (8.0 * x.acos()).cos();
        [-0.9, -0.3, 0.1, 0.77].iter().for_each(|x| {
            let want: Complex64 = cheby.evaluate(*x);
            let have: Complex64 = as_cheby(&q).evaluate(*x) * t_8(*x) + as_cheby(&r).evaluate(*x);
            assert!((want - have).norm() < 1e-9);
        });
    }

    #[test]
    fn double_angle() {
        let betas: Vec<f64> = double_angle_constants(1);
        assert!((betas[0] - 0.5641895835477563).abs() < 1e-15);
        let theta: f64 = 0.3;
        let c: f64 = betas[0] * theta.cos();
        assert!((c * c - betas[1] - (2.0 * theta).cos() / (2.0 * PI)).abs() < 1e-15);
    }
}
