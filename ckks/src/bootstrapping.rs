use crate::boot_context::BootContext;
use crate::ciphertext::Ciphertext;
use crate::error::{PreconditionViolation, Result};
use crate::evaluator::Evaluator;
use crate::linear_transform::LinearTransform;
use num_complex::Complex64;
use tracing::{debug, instrument};

/// Sine variant used for the approximate modular reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sine {
    Plain,
    Better,
}

impl Evaluator {
    /// Refreshes a ciphertext at level 0 to level L - cts_depth - sine_depth - stc_depth,
    /// with the plain sine interpolant as modular reduction.
    pub fn bootstrap(&self, ct: &Ciphertext, ctx: &BootContext) -> Result<Ciphertext> {
        self.bootstrap_with(ct, ctx, Sine::Plain)
    }

    /// Same as [Evaluator::bootstrap] with the cosine interpolant followed by double-angle steps.
    pub fn bootstrap_better_sine(&self, ct: &Ciphertext, ctx: &BootContext) -> Result<Ciphertext> {
        self.bootstrap_with(ct, ctx, Sine::Better)
    }

    fn check_bootstrap_input(&self, ct: &Ciphertext, ctx: &BootContext) -> Result<()> {
        if let Some(field) = self.params.mismatch(ctx.params()) {
            return Err(PreconditionViolation::ParametersMismatch(field).into());
        }
        if ct.level() != 0 {
            return Err(PreconditionViolation::LevelMismatch {
                expected: 0,
                found: ct.level(),
            }
            .into());
        }
        if ct.degree() != 1 {
            return Err(PreconditionViolation::DegreeMismatch {
                expected: 1,
                found: ct.degree(),
            }
            .into());
        }
        if ct.n() != self.params.n() {
            return Err(PreconditionViolation::RingDegreeMismatch {
                expected: self.params.n(),
                found: ct.n(),
            }
            .into());
        }
        let q_0: f64 = self.params.q(0) as f64;
        if !(ct.scale > 0.0 && ct.scale < q_0) {
            return Err(PreconditionViolation::ScaleOutOfRange {
                scale: ct.scale,
                bound: q_0,
            }
            .into());
        }
        Ok(())
    }

    #[instrument(skip_all, fields(variant = ?sine))]
    fn bootstrap_with(&self, ct: &Ciphertext, ctx: &BootContext, sine: Sine) -> Result<Ciphertext> {
        self.check_bootstrap_input(ct, ctx)?;
        let input_scale: f64 = ct.scale;

        let mut x: Ciphertext = self.mod_raise(ct)?;
        x.set_scale(self.params.q(0) as f64);
        self.sub_sum_inplace(&mut x, ctx)?;
        debug!(level = x.level(), scale = x.scale, "mod raise");

        let x: Ciphertext = self.coeffs_to_slots(&x, ctx)?;

        // Scale of the sine output such that reading it at the working scale yields the
        // coefficients of the input plaintext divided by its scale.
        let target_scale: f64 = self.params.scale() * self.params.q(0) as f64 / input_scale;
        let y: Ciphertext = if ctx.single_ciphertext() {
            let conj: Ciphertext = self.conjugate(&x, ctx.rotation_keys())?;
            let u: Ciphertext = self.add(&x, &conj);
            self.eval_mod(&u, ctx, sine, target_scale)?
        } else {
            let conj: Ciphertext = self.conjugate(&x, ctx.rotation_keys())?;
            let re: Ciphertext = self.add(&x, &conj);
            let mut im: Ciphertext = self.sub(&x, &conj);
            self.mul_by_i(&mut im);
            self.neg_inplace(&mut im);
            let y_re: Ciphertext = self.eval_mod(&re, ctx, sine, target_scale)?;
            let mut y_im: Ciphertext = self.eval_mod(&im, ctx, sine, target_scale)?;
            self.mul_by_i(&mut y_im);
            self.add(&y_re, &y_im)
        };

        let sine_depth: usize = match sine {
            Sine::Plain => ctx.sine_depth(),
            Sine::Better => ctx.better_sine_depth(),
        };
        let mut z: Ciphertext = self.slots_to_coeffs(&y, ctx, sine_depth)?;
        z.set_scale(self.params.scale());
        debug!(level = z.level(), scale = z.scale, "bootstrapped");
        Ok(z)
    }

    /// Maps the plaintext onto Z[X^gap] and multiplies it by gap, with gap = N / (2 slots).
    fn sub_sum_inplace(&self, ct: &mut Ciphertext, ctx: &BootContext) -> Result<()> {
        let slots: usize = self.params.slots();
        let gap: usize = self.params.max_slots() / slots;
        for i in 0..gap.trailing_zeros() {
            let rotated: Ciphertext = self.rotate(ct, slots << i, ctx.rotation_keys())?;
            self.add_inplace(ct, &rotated);
        }
        Ok(())
    }

    #[instrument(skip_all)]
    fn coeffs_to_slots(&self, ct: &Ciphertext, ctx: &BootContext) -> Result<Ciphertext> {
        let x: Ciphertext = self.linear_transforms(ct, ctx.coeffs_to_slots(), ctx)?;
        debug!(level = x.level(), scale = x.scale, "coeffs to slots");
        Ok(x)
    }

    #[instrument(skip_all)]
    fn slots_to_coeffs(&self, ct: &Ciphertext, ctx: &BootContext, sine_depth: usize) -> Result<Ciphertext> {
        let expected: usize = self.params.max_level() - ctx.cts_depth() - sine_depth;
        let lts: &[LinearTransform] = ctx
            .slots_to_coeffs(ct.level())
            .filter(|_| ct.level() == expected)
            .ok_or(PreconditionViolation::LevelMismatch {
                expected,
                found: ct.level(),
            })?;
        let z: Ciphertext = self.linear_transforms(ct, lts, ctx)?;
        debug!(level = z.level(), scale = z.scale, "slots to coeffs");
        Ok(z)
    }

    fn linear_transforms(&self, ct: &Ciphertext, lts: &[LinearTransform], ctx: &BootContext) -> Result<Ciphertext> {
        let mut x: Ciphertext = ct.clone();
        for lt in lts {
            x = self.linear_transform(&x, lt, ctx.rotation_keys())?;
        }
        Ok(x)
    }

    /// Approximates u -> (K u - round(K u)) on the slots of ct, whose values are in [-1, 1].
    #[instrument(skip_all)]
    fn eval_mod(&self, ct: &Ciphertext, ctx: &BootContext, sine: Sine, target_scale: f64) -> Result<Ciphertext> {
        let mut y: Ciphertext = match sine {
            Sine::Plain => self.evaluate_cheby_fast_with_scale(ct, ctx.sine(), target_scale, &ctx.rlk)?,
            Sine::Better => {
                let mut u: Ciphertext = ct.clone();
                self.add_const(&mut u, Complex64::new(-0.25 / ctx.k(), 0.0));
                self.evaluate_cheby_fast_special(&u, ctx.better_sine(), ctx.doublings(), target_scale, &ctx.rlk)?
            }
        };
        y.set_scale(self.params.scale());
        debug!(level = y.level(), scale = y.scale, "sine");
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot_context::BootParameters;
    use crate::error::Error;
    use crate::key_generator::KeyGenerator;
    use crate::keys::SecretKey;
    use crate::parameters::{presets, Parameters};
    use sampling::source::Source;

    #[test]
    fn rejects_invalid_inputs() {
        let params: Parameters = Parameters::new(&presets::bootstrapping_test(2)).unwrap();
        let mut source: Source = Source::new([3u8; 32]);
        let sk: SecretKey = KeyGenerator::new(&params).gen_secret_key(&mut source);
        let boot: BootParameters = BootParameters {
            cts_depth: 1,
            stc_depth: 1,
            ..Default::default()
        };
        let ctx: BootContext = BootContext::with_parameters(&params, &sk, &boot).unwrap();
        let eval: Evaluator = Evaluator::new(&params);

        let ct: Ciphertext = Ciphertext::new(&params, 1, 1, params.scale());
        assert_eq!(
            eval.bootstrap(&ct, &ctx),
            Err(Error::Precondition(PreconditionViolation::LevelMismatch {
                expected: 0,
                found: 1
            }))
        );

        let ct: Ciphertext = Ciphertext::new(&params, 2, 0, params.scale());
        assert_eq!(
            eval.bootstrap(&ct, &ctx),
            Err(Error::Precondition(PreconditionViolation::DegreeMismatch {
                expected: 1,
                found: 2
            }))
        );

        let q_0: f64 = params.q(0) as f64;
        let ct: Ciphertext = Ciphertext::new(&params, 1, 0, q_0);
        assert_eq!(
            eval.bootstrap_better_sine(&ct, &ctx),
            Err(Error::Precondition(PreconditionViolation::ScaleOutOfRange {
                scale: q_0,
                bound: q_0
            }))
        );

        let other: Parameters = Parameters::new(&presets::bootstrapping_test(6)).unwrap();
        let ct: Ciphertext = Ciphertext::new(&other, 1, 0, other.scale());
        for res in [
            Evaluator::new(&other).bootstrap(&ct, &ctx),
            Evaluator::new(&other).bootstrap_better_sine(&ct, &ctx),
        ] {
            assert_eq!(
                res,
                Err(Error::Precondition(PreconditionViolation::ParametersMismatch(
                    "log_slots"
                )))
            );
        }
    }

    #[test]
    fn slots_to_coeffs_level_follows_variant() {
        let params: Parameters = Parameters::new(&presets::bootstrapping_test(2)).unwrap();
        let mut source: Source = Source::new([4u8; 32]);
        let sk: SecretKey = KeyGenerator::new(&params).gen_secret_key(&mut source);
        let boot: BootParameters = BootParameters {
            cts_depth: 1,
            stc_depth: 1,
            better_sine_degree: 31,
            ..Default::default()
        };
        let ctx: BootContext = BootContext::with_parameters(&params, &sk, &boot).unwrap();
        let eval: Evaluator = Evaluator::new(&params);

        let plain: usize = params.max_level() - 1 - ctx.sine_depth();
        let better: usize = params.max_level() - 1 - ctx.better_sine_depth();
        assert_ne!(plain, better);

        let ct: Ciphertext = Ciphertext::new(&params, 1, plain, params.scale());
        assert!(eval.slots_to_coeffs(&ct, &ctx, ctx.sine_depth()).is_ok());
        assert_eq!(
            eval.slots_to_coeffs(&ct, &ctx, ctx.better_sine_depth()).err(),
            Some(Error::Precondition(PreconditionViolation::LevelMismatch {
                expected: better,
                found: plain
            }))
        );
    }
}
