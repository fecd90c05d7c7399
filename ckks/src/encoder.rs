use crate::error::{PreconditionViolation, Result};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{FromPrimitive, ToPrimitive};
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use std::f64::consts::PI;

/// Root of the butterfly j of the layer of size m: exp(2i pi (5^j mod 4m) / 4m).
pub fn butterfly_root(m: usize, j: usize) -> Complex64 {
    let four_m: usize = m << 2;
    let mut e: usize = 1;
    (0..j).for_each(|_| e = e * 5 % four_m);
    Complex64::from_polar(1.0, 2.0 * PI * (e as f64) / (four_m as f64))
}

pub fn bit_reverse_inplace<T>(values: &mut [T]) {
    let n: usize = values.len();
    let log_n: u32 = n.trailing_zeros();
    if n < 2 {
        return;
    }
    (0..n).for_each(|i| {
        let j: usize = i.reverse_bits() >> (usize::BITS - log_n);
        if i < j {
            values.swap(i, j)
        }
    });
}

/// Maps w to the slots z with z_j = sum_k w_k exp(2i pi 5^j k / 4n).
pub fn special_fft(values: &mut [Complex64]) {
    let n: usize = values.len();
    bit_reverse_inplace(values);
    let mut m: usize = 2;
    while m <= n {
        let h: usize = m >> 1;
        let roots: Vec<Complex64> = (0..h).map(|j| butterfly_root(m, j)).collect();
        values.chunks_exact_mut(m).for_each(|block| {
            let (lo, hi) = block.split_at_mut(h);
            lo.iter_mut()
                .zip(hi.iter_mut())
                .zip(roots.iter())
                .for_each(|((u, v), r)| {
                    let t: Complex64 = *v * r;
                    *v = *u - t;
                    *u += t;
                });
        });
        m <<= 1;
    }
}

/// Inverse of special_fft.
pub fn special_ifft(values: &mut [Complex64]) {
    let n: usize = values.len();
    let mut m: usize = n;
    while m >= 2 {
        let h: usize = m >> 1;
        let roots: Vec<Complex64> = (0..h).map(|j| butterfly_root(m, j).conj()).collect();
        values.chunks_exact_mut(m).for_each(|block| {
            let (lo, hi) = block.split_at_mut(h);
            lo.iter_mut()
                .zip(hi.iter_mut())
                .zip(roots.iter())
                .for_each(|((u, v), r)| {
                    let t: Complex64 = *u - *v;
                    *u += *v;
                    *v = t * r;
                });
        });
        m >>= 1;
    }
    bit_reverse_inplace(values);
    let n_inv: f64 = 1.0 / n as f64;
    values.iter_mut().for_each(|v| *v *= n_inv);
}

/// Encodes vectors of 2^log_slots complex values into plaintexts and back.
/// A vector of n slots is packed in the coefficients k*gap (real parts) and
/// (k+n)*gap (imaginary parts) with gap = N/(2n).
pub struct Encoder {
    params: Parameters,
}

impl Encoder {
    pub fn new(params: &Parameters) -> Self {
        Self {
            params: params.clone(),
        }
    }

    fn check_log_slots(&self, log_slots: usize) -> Result<()> {
        if log_slots > self.params.log_n() - 1 {
            return Err(PreconditionViolation::TooManySlots {
                slots: 1 << log_slots,
                max: self.params.max_slots(),
            }
            .into());
        }
        Ok(())
    }

    /// Returns the plaintext at level and scale encoding values, zero-padded to 2^log_slots.
    pub fn encode(
        &self,
        values: &[Complex64],
        level: usize,
        scale: f64,
        log_slots: usize,
    ) -> Result<Plaintext> {
        let mut pt: Plaintext = Plaintext::new(&self.params, level, scale);
        self.encode_into(values, log_slots, &mut pt)?;
        Ok(pt)
    }

    /// Encodes values into pt at the level and scale of pt.
    pub fn encode_into(&self, values: &[Complex64], log_slots: usize, pt: &mut Plaintext) -> Result<()> {
        self.check_log_slots(log_slots)?;
        let slots: usize = 1 << log_slots;
        if values.len() > slots {
            return Err(PreconditionViolation::TooManySlots {
                slots: values.len(),
                max: slots,
            }
            .into());
        }
        if let Some(index) = values.iter().position(|v| !(v.re.is_finite() && v.im.is_finite())) {
            return Err(PreconditionViolation::NonFiniteValue { index }.into());
        }

        let mut w: Vec<Complex64> = vec![Complex64::default(); slots];
        w[..values.len()].copy_from_slice(values);
        special_ifft(&mut w);

        let gap: usize = self.params.max_slots() / slots;
        let mut coeffs: Vec<f64> = vec![0.0; slots << 1];
        w.iter().enumerate().for_each(|(k, x)| {
            coeffs[k] = (x.re * pt.scale).round();
            coeffs[k + slots] = (x.im * pt.scale).round();
        });

        let ring: RingRNS<u64> = self.params.ring_q_at_level(pt.level());
        pt.value.zero();
        if coeffs.iter().all(|c| c.abs() < (1u64 << 62) as f64) {
            let coeffs: Vec<i64> = coeffs.iter().map(|c| *c as i64).collect();
            ring.from_i64_inplace(&coeffs, gap, &mut pt.value);
        } else {
            // Finite values only overflow to infinity through the scale.
            let coeffs: Vec<BigInt> = coeffs
                .iter()
                .map(|c| BigInt::from_f64(*c))
                .collect::<Option<_>>()
                .ok_or(PreconditionViolation::ScaleOutOfRange {
                    scale: pt.scale,
                    bound: f64::MAX,
                })?;
            ring.from_bigint_inplace(&coeffs, gap, &mut pt.value);
        }
        ring.ntt_inplace(&mut pt.value);
        Ok(())
    }

    /// Returns the 2^log_slots values encoded in pt.
    pub fn decode(&self, pt: &Plaintext, log_slots: usize) -> Result<Vec<Complex64>> {
        self.check_log_slots(log_slots)?;
        let slots: usize = 1 << log_slots;
        let gap: usize = self.params.max_slots() / slots;
        let level: usize = pt.level();
        let ring: RingRNS<u64> = self.params.ring_q_at_level(level);

        let mut value: PolyRNS<u64> = pt.value.truncated(level);
        ring.intt_inplace(&mut value);

        let coeffs: Vec<f64> = if level == 0 {
            let q: u64 = ring.0[0].modulus.q;
            value.at(0).0[..]
                .iter()
                .step_by(gap)
                .take(slots << 1)
                .map(|x| {
                    if *x > q >> 1 {
                        -((q - x) as f64)
                    } else {
                        *x as f64
                    }
                })
                .collect()
        } else {
            let mut coeffs: Vec<BigInt> = vec![BigInt::default(); slots << 1];
            ring.to_bigint_inplace(&value, gap, &mut coeffs);
            coeffs.iter().map(|c| c.to_f64().unwrap_or(f64::NAN)).collect()
        };

        let scale_inv: f64 = 1.0 / pt.scale;
        let mut w: Vec<Complex64> = (0..slots)
            .map(|k| Complex64::new(coeffs[k] * scale_inv, coeffs[k + slots] * scale_inv))
            .collect();
        special_fft(&mut w);
        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parameters::presets;
    use sampling::source::Source;

    fn random_values(source: &mut Source, n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|_| Complex64::new(source.next_f64(-1.0, 1.0), source.next_f64(-1.0, 1.0)))
            .collect()
    }

    #[test]
    fn special_fft_matches_definition() {
        let mut source: Source = Source::new([0u8; 32]);
        let n: usize = 16;
        let w: Vec<Complex64> = random_values(&mut source, n);
        let mut z: Vec<Complex64> = w.clone();
        special_fft(&mut z);
        let mut e: usize = 1;
        for z_j in z.iter() {
            let want: Complex64 = w
                .iter()
                .enumerate()
                .map(|(k, w_k)| w_k * Complex64::from_polar(1.0, 2.0 * PI * ((e * k) % (4 * n)) as f64 / (4 * n) as f64))
                .sum();
            assert!((want - z_j).norm() < 1e-12);
            e = e * 5 % (4 * n);
        }

        special_ifft(&mut z);
        z.iter()
            .zip(w.iter())
            .for_each(|(a, b)| assert!((a - b).norm() < 1e-12));
    }

    #[test]
    fn encode_decode() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let encoder: Encoder = Encoder::new(&params);
        let mut source: Source = Source::new([1u8; 32]);
        for log_slots in [0, 3, params.log_n() - 1] {
            let values: Vec<Complex64> = random_values(&mut source, 1 << log_slots);
            for level in [0, params.max_level()] {
                let pt: Plaintext = encoder
                    .encode(&values, level, params.scale(), log_slots)
                    .unwrap();
                let have: Vec<Complex64> = encoder.decode(&pt, log_slots).unwrap();
                have.iter()
                    .zip(values.iter())
                    .for_each(|(a, b)| assert!((a - b).norm() < 1e-9));
            }
        }
    }

    #[test]
    fn sparse_plaintext_is_periodic() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let encoder: Encoder = Encoder::new(&params);
        let mut source: Source = Source::new([2u8; 32]);
        let values: Vec<Complex64> = random_values(&mut source, 4);
        let pt: Plaintext = encoder.encode(&values, 1, params.scale(), 2).unwrap();
        let have: Vec<Complex64> = encoder.decode(&pt, 3).unwrap();
        (0..8).for_each(|j| assert!((have[j] - values[j & 3]).norm() < 1e-9));
    }

    #[test]
    fn too_many_slots() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let encoder: Encoder = Encoder::new(&params);
        let values: Vec<Complex64> = vec![Complex64::default(); 5];
        assert!(encoder.encode(&values, 0, params.scale(), 2).is_err());
        assert!(encoder.encode(&values, 0, params.scale(), params.log_n()).is_err());
    }

    #[test]
    fn non_finite_values() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        let encoder: Encoder = Encoder::new(&params);
        let mut values: Vec<Complex64> = vec![Complex64::new(0.5, -0.25); 4];
        values[2].re = f64::NAN;
        assert_eq!(
            encoder.encode(&values, 0, params.scale(), 2).err(),
            Some(Error::Precondition(PreconditionViolation::NonFiniteValue { index: 2 }))
        );
        values[2].re = 0.5;
        values[1].im = f64::NEG_INFINITY;
        assert_eq!(
            encoder.encode(&values, 0, params.scale(), 2).err(),
            Some(Error::Precondition(PreconditionViolation::NonFiniteValue { index: 1 }))
        );
    }
}
