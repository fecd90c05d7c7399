use crate::chebyshev::ChebyshevInterpolation;
use crate::encoder::Encoder;
use crate::error::{ConstructionError, Result};
use crate::key_generator::KeyGenerator;
use crate::keys::{RelinearizationKey, RotationKeys, SecretKey};
use crate::linear_transform::{coeffs_to_slots_stages, slots_to_coeffs_stages, DiagonalMatrix, LinearTransform};
use crate::parameters::Parameters;
use crate::sine::{better_sine_approximation, sine_approximation};
use num_complex::Complex64;
use sampling::source::{new_seed, Source};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Configuration of the bootstrapping.
#[derive(Clone, Debug, PartialEq)]
pub struct BootParameters {
    /// Levels consumed by CoeffsToSlots.
    pub cts_depth: usize,
    /// Levels consumed by SlotsToCoeffs.
    pub stc_depth: usize,
    /// Bound on the integer part removed by the modular reduction.
    pub k: f64,
    pub sine_degree: usize,
    pub better_sine_degree: usize,
    /// Double-angle steps of the better sine.
    pub doublings: usize,
    /// Scale of the sine evaluation, 2^round(log2(q_0)) if None.
    pub log_sine_scale: Option<usize>,
}

impl Default for BootParameters {
    fn default() -> Self {
        Self {
            cts_depth: 2,
            stc_depth: 2,
            k: 12.0,
            sine_degree: 127,
            better_sine_degree: 63,
            doublings: 1,
            log_sine_scale: None,
        }
    }
}

/// Precomputed material of the bootstrapping of ciphertexts with params.log_slots() slots.
pub struct BootContext {
    params: Parameters,
    boot: BootParameters,
    sine_scale: f64,
    cts: Vec<LinearTransform>,
    /// SlotsToCoeffs transforms, by level of their first stage.
    stc: BTreeMap<usize, Vec<LinearTransform>>,
    sine: ChebyshevInterpolation,
    better_sine: ChebyshevInterpolation,
    pub(crate) rlk: RelinearizationKey,
    pub(crate) keys: RotationKeys,
}

impl BootContext {
    pub fn new(params: &Parameters, sk: &SecretKey, cts_depth: usize, stc_depth: usize) -> Result<Self> {
        let boot: BootParameters = BootParameters {
            cts_depth,
            stc_depth,
            ..Default::default()
        };
        Self::with_parameters(params, sk, &boot)
    }

    pub fn with_parameters(params: &Parameters, sk: &SecretKey, boot: &BootParameters) -> Result<Self> {
        let required_level: usize = params.max_level() + 1;
        if sk.n() != params.n() || sk.level() < required_level {
            return Err(ConstructionError::KeyMismatch {
                key_degree: sk.n(),
                ring_degree: params.n(),
                key_level: sk.level(),
                required_level,
            }
            .into());
        }

        let log_slots: usize = params.log_slots();
        for (name, depth) in [("cts_depth", boot.cts_depth), ("stc_depth", boot.stc_depth)] {
            if depth == 0 || depth > log_slots {
                return Err(ConstructionError::InvalidDepth(format!(
                    "{}={} not in [1, log_slots={}]",
                    name, depth, log_slots
                ))
                .into());
            }
        }
        if !(boot.k.is_finite() && boot.k >= 1.0) {
            return Err(ConstructionError::InvalidParameters(format!("k={} < 1", boot.k)).into());
        }
        if boot.sine_degree == 0 || boot.better_sine_degree == 0 {
            return Err(ConstructionError::InvalidParameters(format!(
                "sine_degree={} and better_sine_degree={} must be positive",
                boot.sine_degree, boot.better_sine_degree
            ))
            .into());
        }
        if let Some(log_sine_scale) = boot.log_sine_scale {
            if log_sine_scale == 0 || log_sine_scale > 62 {
                return Err(ConstructionError::InvalidParameters(format!(
                    "log_sine_scale={} not in [1, 62]",
                    log_sine_scale
                ))
                .into());
            }
        }

        let sine: ChebyshevInterpolation = sine_approximation(boot.k, boot.sine_degree);
        let better_sine: ChebyshevInterpolation =
            better_sine_approximation(boot.k, boot.better_sine_degree, boot.doublings);
        let sine_depths: [usize; 2] = [sine.depth(), better_sine.depth() + boot.doublings];

        let max_level: usize = params.max_level();
        let required: usize = boot.cts_depth + sine_depths[0].max(sine_depths[1]) + boot.stc_depth;
        if required >= max_level {
            return Err(ConstructionError::InsufficientDepth {
                required: required + 1,
                available: max_level,
            }
            .into());
        }

        let q_0: f64 = params.q(0) as f64;
        let sine_scale: f64 = boot
            .log_sine_scale
            .map(|l| (l as f64).exp2())
            .unwrap_or_else(|| q_0.log2().round().exp2());

        let encoder: Encoder = Encoder::new(params);
        let slots: usize = params.slots();
        let single: bool = log_slots + 2 <= params.log_n();

        let cts: Vec<LinearTransform> = coeffs_to_slots_stages(slots, boot.cts_depth)
            .into_iter()
            .enumerate()
            .map(|(i, mut m)| {
                let level: usize = max_level - i;
                if i == 0 {
                    m.scale(Complex64::new(slots as f64 / params.max_slots() as f64, 0.0));
                }
                if i + 1 < boot.cts_depth {
                    return LinearTransform::new(&encoder, &m, level, params.q(level) as f64);
                }
                m.scale(Complex64::new(0.5 / boot.k, 0.0));
                if single {
                    // Slots n..2n hold -i times slots 0..n, so that x + conj(x) carries the
                    // real parts in 0..n and the imaginary parts in n..2n.
                    m = m.extend(slots << 1);
                    let c: Vec<Complex64> = (0..slots << 1)
                        .map(|j| {
                            if j < slots {
                                Complex64::new(1.0, 0.0)
                            } else {
                                Complex64::new(0.0, -1.0)
                            }
                        })
                        .collect();
                    m.left_mul_diag(&c);
                }
                let scale: f64 = sine_scale * params.q(level) as f64 / q_0;
                LinearTransform::new(&encoder, &m, level, scale)
            })
            .collect::<Result<_>>()?;

        let stc_stages: Vec<DiagonalMatrix> = slots_to_coeffs_stages(slots, boot.stc_depth);
        let mut stc: BTreeMap<usize, Vec<LinearTransform>> = BTreeMap::new();
        for depth in sine_depths {
            let start: usize = max_level - boot.cts_depth - depth;
            if stc.contains_key(&start) {
                continue;
            }
            let lts: Vec<LinearTransform> = stc_stages
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let level: usize = start - i;
                    let scale: f64 = params.q(level) as f64;
                    if i == 0 && single {
                        LinearTransform::new(&encoder, &m.pack_real_imag(), level, scale)
                    } else {
                        LinearTransform::new(&encoder, m, level, scale)
                    }
                })
                .collect::<Result<_>>()?;
            stc.insert(start, lts);
        }

        let mut rotations: BTreeSet<usize> = cts
            .iter()
            .chain(stc.values().flatten())
            .flat_map(|lt| lt.rotations())
            .collect();
        let gap: usize = params.max_slots() / slots;
        (0..gap.trailing_zeros()).for_each(|i| {
            rotations.insert(slots << i);
        });
        let rotations: Vec<usize> = rotations.into_iter().collect();

        let mut source: Source = Source::new(new_seed());
        let keygen: KeyGenerator = KeyGenerator::new(params);
        let rlk: RelinearizationKey = keygen.gen_relinearization_key(sk, &mut source);
        let keys: RotationKeys = keygen.gen_rotation_keys(sk, &rotations, true, &mut source);

        info!(
            log_slots,
            rotation_keys = keys.len(),
            cts_diagonals = cts.iter().map(|lt| lt.diags.len()).sum::<usize>(),
            stc_diagonals = stc.values().flatten().map(|lt| lt.diags.len()).sum::<usize>(),
            "bootstrapping context"
        );

        Ok(Self {
            params: params.clone(),
            boot: boot.clone(),
            sine_scale,
            cts,
            stc,
            sine,
            better_sine,
            rlk,
            keys,
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn boot_parameters(&self) -> &BootParameters {
        &self.boot
    }

    pub fn log_slots(&self) -> usize {
        self.params.log_slots()
    }

    pub fn cts_depth(&self) -> usize {
        self.boot.cts_depth
    }

    pub fn stc_depth(&self) -> usize {
        self.boot.stc_depth
    }

    pub fn k(&self) -> f64 {
        self.boot.k
    }

    pub fn doublings(&self) -> usize {
        self.boot.doublings
    }

    /// Levels consumed by the plain sine evaluation.
    pub fn sine_depth(&self) -> usize {
        self.sine.depth()
    }

    /// Levels consumed by the better sine evaluation, doublings included.
    pub fn better_sine_depth(&self) -> usize {
        self.better_sine.depth() + self.boot.doublings
    }

    pub fn sine_scale(&self) -> f64 {
        self.sine_scale
    }

    /// Whether the slots are packed in a single ciphertext between the transforms.
    pub fn single_ciphertext(&self) -> bool {
        self.log_slots() + 2 <= self.params.log_n()
    }

    pub fn sine(&self) -> &ChebyshevInterpolation {
        &self.sine
    }

    pub fn better_sine(&self) -> &ChebyshevInterpolation {
        &self.better_sine
    }

    pub fn coeffs_to_slots(&self) -> &[LinearTransform] {
        &self.cts
    }

    /// SlotsToCoeffs stages starting at level.
    pub(crate) fn slots_to_coeffs(&self, level: usize) -> Option<&[LinearTransform]> {
        self.stc.get(&level).map(|lts| lts.as_slice())
    }

    pub fn rotation_keys(&self) -> &RotationKeys {
        &self.keys
    }

    pub fn relinearization_key(&self) -> &RelinearizationKey {
        &self.rlk
    }
}
