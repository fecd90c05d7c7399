use crate::ciphertext::Ciphertext;
use crate::encoder::{butterfly_root, Encoder};
use crate::error::{PreconditionViolation, Result};
use crate::evaluator::Evaluator;
use crate::keys::RotationKeys;
use crate::plaintext::Plaintext;
use num_complex::Complex64;
use std::collections::BTreeMap;

/// Square matrix of size n stored by its non-zero diagonals:
/// (M x)_j = sum_d diag_d[j] x_{(j + d) mod n}.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagonalMatrix {
    n: usize,
    diags: BTreeMap<usize, Vec<Complex64>>,
}

impl DiagonalMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            diags: BTreeMap::new(),
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m: DiagonalMatrix = Self::new(n);
        m.diags.insert(0, vec![Complex64::new(1.0, 0.0); n]);
        m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn diags(&self) -> &BTreeMap<usize, Vec<Complex64>> {
        &self.diags
    }

    fn add_entry(&mut self, d: usize, j: usize, v: Complex64) {
        let n: usize = self.n;
        self.diags
            .entry(d % n)
            .or_insert_with(|| vec![Complex64::default(); n])[j] += v;
    }

    /// Butterfly layer of size m of the slot FFT: for each block of m and t < m/2,
    /// (x_t, x_{t+m/2}) <- (x_t + r_t x_{t+m/2}, x_t - r_t x_{t+m/2}).
    pub fn butterfly_layer(n: usize, m: usize) -> Self {
        let h: usize = m >> 1;
        let mut layer: DiagonalMatrix = Self::new(n);
        (0..h).for_each(|t| {
            let r: Complex64 = butterfly_root(m, t);
            (t..n).step_by(m).for_each(|j0| {
                let j1: usize = j0 + h;
                layer.add_entry(0, j0, Complex64::new(1.0, 0.0));
                layer.add_entry(h, j0, r);
                layer.add_entry(n - h, j1, Complex64::new(1.0, 0.0));
                layer.add_entry(0, j1, -r);
            })
        });
        layer
    }

    /// Inverse of butterfly_layer(n, m).
    pub fn inverse_butterfly_layer(n: usize, m: usize) -> Self {
        let h: usize = m >> 1;
        let half: Complex64 = Complex64::new(0.5, 0.0);
        let mut layer: DiagonalMatrix = Self::new(n);
        (0..h).for_each(|t| {
            let r: Complex64 = butterfly_root(m, t).conj() * 0.5;
            (t..n).step_by(m).for_each(|j0| {
                let j1: usize = j0 + h;
                layer.add_entry(0, j0, half);
                layer.add_entry(h, j0, half);
                layer.add_entry(n - h, j1, r);
                layer.add_entry(0, j1, -r);
            })
        });
        layer
    }

    pub fn apply(&self, x: &[Complex64]) -> Vec<Complex64> {
        let n: usize = self.n;
        assert!(x.len() == n, "invalid x: x.len()={} != n={}", x.len(), n);
        let mut y: Vec<Complex64> = vec![Complex64::default(); n];
        self.diags.iter().for_each(|(d, diag)| {
            y.iter_mut()
                .enumerate()
                .for_each(|(j, y)| *y += diag[j] * x[(j + d) % n])
        });
        y
    }

    /// Returns self * other, that is other applied first.
    pub fn compose(&self, other: &DiagonalMatrix) -> DiagonalMatrix {
        let n: usize = self.n;
        assert!(other.n == n, "invalid other: other.n={} != n={}", other.n, n);
        let mut c: DiagonalMatrix = Self::new(n);
        self.diags.iter().for_each(|(d1, a)| {
            other.diags.iter().for_each(|(d2, b)| {
                (0..n).for_each(|j| c.add_entry(d1 + d2, j, a[j] * b[(j + d1) % n]))
            })
        });
        c.prune(1e-12);
        c
    }

    pub fn scale(&mut self, c: Complex64) {
        self.diags
            .values_mut()
            .for_each(|diag| diag.iter_mut().for_each(|x| *x *= c));
    }

    /// Multiplies row j by c[j].
    pub fn left_mul_diag(&mut self, c: &[Complex64]) {
        assert!(c.len() == self.n, "invalid c: c.len()={} != n={}", c.len(), self.n);
        self.diags.values_mut().for_each(|diag| {
            diag.iter_mut().zip(c.iter()).for_each(|(x, c)| *x *= c)
        });
    }

    /// Drops the diagonals whose entries are all below eps in modulus.
    pub fn prune(&mut self, eps: f64) {
        self.diags.retain(|_, diag| diag.iter().any(|x| x.norm() > eps));
    }

    /// Returns the matrix of size v acting on v-vectors made of v/n copies of an n-vector,
    /// with rows repeated periodically.
    pub fn extend(&self, v: usize) -> DiagonalMatrix {
        assert!(v % self.n == 0, "invalid v: v={} not a multiple of n={}", v, self.n);
        let n: usize = self.n;
        DiagonalMatrix {
            n: v,
            diags: self
                .diags
                .iter()
                .map(|(d, diag)| (*d, (0..v).map(|j| diag[j % n]).collect()))
                .collect(),
        }
    }

    /// Returns the matrix of size 2n mapping y to M (y_{0..n} + i y_{n..2n}), with rows
    /// repeated periodically.
    pub fn pack_real_imag(&self) -> DiagonalMatrix {
        let n: usize = self.n;
        let v: usize = n << 1;
        let mut m: DiagonalMatrix = Self::new(v);
        self.diags.iter().for_each(|(d, diag)| {
            [*d, *d + n].into_iter().for_each(|e| {
                (0..v).for_each(|j| {
                    let c: Complex64 = if (j + e) % v < n {
                        Complex64::new(1.0, 0.0)
                    } else {
                        Complex64::i()
                    };
                    m.add_entry(e, j, diag[j % n] * c)
                })
            })
        });
        m
    }
}

/// Splits the layers into depth consecutive groups of near equal size, larger groups first,
/// and returns the product of each group.
fn group_layers(layers: Vec<DiagonalMatrix>, depth: usize) -> Vec<DiagonalMatrix> {
    let count: usize = layers.len();
    assert!(
        depth >= 1 && depth <= count,
        "invalid depth: depth={} not in [1, {}]",
        depth,
        count
    );
    let mut layers = layers.into_iter();
    (0..depth)
        .map(|i| {
            let size: usize = count / depth + usize::from(i < count % depth);
            layers
                .by_ref()
                .take(size)
                .fold(None, |acc: Option<DiagonalMatrix>, layer| {
                    Some(match acc {
                        None => layer,
                        Some(m) => layer.compose(&m),
                    })
                })
                .unwrap_or_else(|| DiagonalMatrix::identity(1))
        })
        .collect()
}

/// Stages of the map z -> bitrev(special_ifft(z)) on n slots, in order of application.
pub fn coeffs_to_slots_stages(n: usize, depth: usize) -> Vec<DiagonalMatrix> {
    let layers: Vec<DiagonalMatrix> = (1..=n.trailing_zeros())
        .rev()
        .map(|i| DiagonalMatrix::inverse_butterfly_layer(n, 1 << i))
        .collect();
    group_layers(layers, depth)
}

/// Stages of the map w -> special_fft(bitrev(w)) on n slots, in order of application.
pub fn slots_to_coeffs_stages(n: usize, depth: usize) -> Vec<DiagonalMatrix> {
    let layers: Vec<DiagonalMatrix> = (1..=n.trailing_zeros())
        .map(|i| DiagonalMatrix::butterfly_layer(n, 1 << i))
        .collect();
    group_layers(layers, depth)
}

/// Diagonal matrix encoded as plaintexts, one per rotation.
#[derive(Clone, Debug)]
pub struct LinearTransform {
    /// Slots of the encoding of the diagonals.
    pub log_slots: usize,
    pub level: usize,
    pub scale: f64,
    pub diags: BTreeMap<usize, Plaintext>,
}

impl LinearTransform {
    pub fn new(encoder: &Encoder, m: &DiagonalMatrix, level: usize, scale: f64) -> Result<Self> {
        let log_slots: usize = m.n().trailing_zeros() as usize;
        let diags: BTreeMap<usize, Plaintext> = m
            .diags()
            .iter()
            .map(|(d, diag)| Ok((*d, encoder.encode(diag, level, scale, log_slots)?)))
            .collect::<Result<_>>()?;
        Ok(Self {
            log_slots,
            level,
            scale,
            diags,
        })
    }

    /// Rotations needed to evaluate the transform.
    pub fn rotations(&self) -> Vec<usize> {
        self.diags.keys().copied().filter(|d| *d != 0).collect()
    }
}

impl Evaluator {
    /// Returns sum_d diag_d * rotate(ct, d), rescaled. ct must be at level lt.level or above.
    pub fn linear_transform(&self, ct: &Ciphertext, lt: &LinearTransform, keys: &RotationKeys) -> Result<Ciphertext> {
        if ct.level() < lt.level {
            return Err(PreconditionViolation::LevelMismatch {
                expected: lt.level,
                found: ct.level(),
            }
            .into());
        }
        let mut ct_in: Ciphertext = ct.clone();
        ct_in.truncate(lt.level);
        let mut acc: Ciphertext = Ciphertext::new(&self.params, 1, lt.level, ct.scale * lt.scale);
        for (d, pt) in lt.diags.iter() {
            let rotated: Ciphertext = self.rotate(&ct_in, *d, keys)?;
            self.mul_plain_then_add(&rotated, pt, &mut acc);
        }
        self.rescale(&mut acc)?;
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{bit_reverse_inplace, special_fft, special_ifft};
    use sampling::source::Source;

    fn random_values(n: usize, seed: u8) -> Vec<Complex64> {
        let mut source: Source = Source::new([seed; 32]);
        (0..n)
            .map(|_| Complex64::new(source.next_f64(-1.0, 1.0), source.next_f64(-1.0, 1.0)))
            .collect()
    }

    fn assert_close(a: &[Complex64], b: &[Complex64]) {
        a.iter()
            .zip(b.iter())
            .for_each(|(x, y)| assert!((x - y).norm() < 1e-10, "{} != {}", x, y));
    }

    #[test]
    fn factorization_matches_dense_transform() {
        for log_n in 1..=6 {
            let n: usize = 1 << log_n;
            let z: Vec<Complex64> = random_values(n, log_n as u8);
            for depth in 1..=log_n {
                let mut want: Vec<Complex64> = z.clone();
                special_ifft(&mut want);
                bit_reverse_inplace(&mut want);
                let have: Vec<Complex64> = coeffs_to_slots_stages(n, depth)
                    .iter()
                    .fold(z.clone(), |x, m| m.apply(&x));
                assert_close(&have, &want);

                let mut want: Vec<Complex64> = z.clone();
                bit_reverse_inplace(&mut want);
                special_fft(&mut want);
                let have: Vec<Complex64> = slots_to_coeffs_stages(n, depth)
                    .iter()
                    .fold(z.clone(), |x, m| m.apply(&x));
                assert_close(&have, &want);
            }
        }
    }

    #[test]
    fn stage_sizes() {
        let stages: Vec<DiagonalMatrix> = coeffs_to_slots_stages(128, 2);
        assert_eq!(stages.len(), 2);
        assert!(stages[0].diags().len() <= 31);
        assert!(stages[1].diags().len() <= 15);
    }

    #[test]
    fn packing() {
        let n: usize = 8;
        let m: DiagonalMatrix = slots_to_coeffs_stages(n, 1).remove(0);
        let y: Vec<Complex64> = random_values(2 * n, 7).iter().map(|x| Complex64::new(x.re, 0.0)).collect();
        let w: Vec<Complex64> = (0..n).map(|k| Complex64::new(y[k].re, y[k + n].re)).collect();
        let want: Vec<Complex64> = m.apply(&w);
        let have: Vec<Complex64> = m.pack_real_imag().apply(&y);
        assert_close(&have[..n], &want);
        assert_close(&have[n..], &want);
    }

    #[test]
    fn extension() {
        let n: usize = 4;
        let m: DiagonalMatrix = coeffs_to_slots_stages(n, 1).remove(0);
        let x: Vec<Complex64> = random_values(n, 9);
        let want: Vec<Complex64> = m.apply(&x);
        let x2: Vec<Complex64> = x.iter().chain(x.iter()).copied().collect();
        let have: Vec<Complex64> = m.extend(2 * n).apply(&x2);
        assert_close(&have[..n], &want);
        assert_close(&have[n..], &want);
    }
}
