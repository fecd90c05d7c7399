use crate::error::ConstructionError;
use rns::modulus::prime_generator::NTTFriendlyPrimesGenerator;
use rns::ring::impl_u64::ring_rns::new_rings;
use rns::ring::{Ring, RingRNS};
use sampling::distributions::Distribution;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Largest supported bit size of a modulus.
pub const MAX_LOG_MODULUS: usize = 60;

#[derive(Clone, Debug, PartialEq)]
pub struct ParametersLiteral {
    pub log_n: usize,
    /// Bit sizes of the moduli q_0, ..., q_L.
    pub log_q: Vec<usize>,
    /// Bit size of the key-switching modulus P.
    pub log_p: usize,
    pub log_scale: usize,
    pub log_slots: usize,
    /// Standard deviation of the error distribution.
    pub xe: f64,
    /// Hamming weight of the secret, 0 for uniform ternary.
    pub xs: usize,
}

/// CKKS parameters: the ring degree, the modulus chain Q = q_0 * ... * q_L, the
/// auxiliary modulus P and the default encoding scale.
#[derive(Clone)]
pub struct Parameters {
    log_n: usize,
    log_slots: usize,
    log_scale: usize,
    xe: Distribution,
    xs: Distribution,
    /// Rings modulo q_0, ..., q_L followed by the ring modulo P.
    rings: Arc<Vec<Ring<u64>>>,
}

impl Parameters {
    pub fn new(p: &ParametersLiteral) -> Result<Self, ConstructionError> {
        if p.log_n < 3 || p.log_n > 16 {
            return Err(ConstructionError::InvalidParameters(format!(
                "log_n={} not in [3, 16]",
                p.log_n
            )));
        }
        if p.log_q.is_empty() {
            return Err(ConstructionError::InvalidParameters(
                "log_q is empty".to_string(),
            ));
        }
        if let Some(bits) = p
            .log_q
            .iter()
            .chain(std::iter::once(&p.log_p))
            .find(|&&b| b <= p.log_n + 1 || b > MAX_LOG_MODULUS)
        {
            return Err(ConstructionError::InvalidParameters(format!(
                "modulus size {} not in ({}, {}]",
                bits,
                p.log_n + 1,
                MAX_LOG_MODULUS
            )));
        }
        let max_log_q: usize = p.log_q.iter().copied().max().unwrap_or(0);
        if p.log_p < max_log_q {
            return Err(ConstructionError::InvalidParameters(format!(
                "log_p={} < max(log_q)={}",
                p.log_p, max_log_q
            )));
        }
        if p.log_slots > p.log_n - 1 {
            return Err(ConstructionError::InvalidParameters(format!(
                "log_slots={} > log_n-1={}",
                p.log_slots,
                p.log_n - 1
            )));
        }
        if p.log_scale == 0 || p.log_scale >= p.log_q[0] + 1 {
            return Err(ConstructionError::InvalidParameters(format!(
                "log_scale={} not in [1, log_q[0]={}]",
                p.log_scale, p.log_q[0]
            )));
        }
        if p.xs > 1 << p.log_n {
            return Err(ConstructionError::InvalidParameters(format!(
                "xs={} > n={}",
                p.xs,
                1 << p.log_n
            )));
        }
        if !(p.xe.is_finite() && p.xe > 0.0) {
            return Err(ConstructionError::InvalidParameters(format!(
                "xe={} is not a positive finite standard deviation",
                p.xe
            )));
        }
        let xe: Distribution = Distribution::gaussian(p.xe)
            .map_err(|e| ConstructionError::InvalidParameters(format!("xe={}: {}", p.xe, e)))?;
        let xs: Distribution = if p.xs == 0 {
            Distribution::Ternary
        } else {
            Distribution::TernaryHw(p.xs)
        };

        let n: usize = 1 << p.log_n;
        let nth_root: u64 = (n << 1) as u64;
        let mut generators: BTreeMap<usize, NTTFriendlyPrimesGenerator> = BTreeMap::new();
        let mut moduli: Vec<u64> = Vec::with_capacity(p.log_q.len() + 1);
        for bits in p.log_q.iter().chain(std::iter::once(&p.log_p)) {
            let generator: &mut NTTFriendlyPrimesGenerator = generators
                .entry(*bits)
                .or_insert_with(|| NTTFriendlyPrimesGenerator::new(*bits as u64, nth_root));
            let prime = generator
                .next_alternating_prime()
                .ok_or(ConstructionError::PrimeGeneration { bits: *bits })?;
            moduli.push(prime.q);
        }

        Ok(Self {
            log_n: p.log_n,
            log_slots: p.log_slots,
            log_scale: p.log_scale,
            xe,
            xs,
            rings: Arc::new(new_rings(n, moduli)),
        })
    }

    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// Maximum number of complex slots, N/2.
    pub fn max_slots(&self) -> usize {
        1 << (self.log_n - 1)
    }

    pub fn slots(&self) -> usize {
        1 << self.log_slots
    }

    pub fn log_slots(&self) -> usize {
        self.log_slots
    }

    pub fn log_scale(&self) -> usize {
        self.log_scale
    }

    pub fn scale(&self) -> f64 {
        (self.log_scale as f64).exp2()
    }

    /// Index L of the last modulus of Q.
    pub fn max_level(&self) -> usize {
        self.rings.len() - 2
    }

    pub fn q(&self, i: usize) -> u64 {
        assert!(
            i <= self.max_level(),
            "invalid argument i: i={} > max_level={}",
            i,
            self.max_level()
        );
        self.rings[i].modulus.q
    }

    pub fn p(&self) -> u64 {
        self.rings[self.max_level() + 1].modulus.q
    }

    pub fn moduli_q(&self) -> Vec<u64> {
        self.ring_q().moduli()
    }

    pub fn ring_q(&self) -> RingRNS<'_, u64> {
        RingRNS::new(&self.rings[..=self.max_level()])
    }

    pub fn ring_q_at_level(&self, level: usize) -> RingRNS<'_, u64> {
        self.ring_q().at_level(level)
    }

    /// Ring over q_0, ..., q_L, P.
    pub fn ring_qp(&self) -> RingRNS<'_, u64> {
        RingRNS::new(&self.rings[..])
    }

    pub fn ring_p(&self) -> &Ring<u64> {
        &self.rings[self.max_level() + 1]
    }

    pub fn xe(&self) -> &Distribution {
        &self.xe
    }

    pub fn xs(&self) -> &Distribution {
        &self.xs
    }

    /// Returns the first of log_n, log_slots, log_scale and the moduli on which self and
    /// other differ, if any.
    pub fn mismatch(&self, other: &Parameters) -> Option<&'static str> {
        if self.log_n != other.log_n {
            Some("log_n")
        } else if self.log_slots != other.log_slots {
            Some("log_slots")
        } else if self.log_scale != other.log_scale {
            Some("log_scale")
        } else if self
            .rings
            .iter()
            .map(|r| r.modulus.q)
            .ne(other.rings.iter().map(|r| r.modulus.q))
        {
            Some("moduli")
        } else {
            None
        }
    }

    /// Galois element 5^k mod 2N of the rotation by k slots to the left.
    pub fn galois_element(&self, k: usize) -> usize {
        let two_n: usize = self.n() << 1;
        let mut exp: usize = k % self.max_slots();
        let mut base: usize = 5;
        let mut gal_el: usize = 1;
        while exp > 0 {
            if exp & 1 == 1 {
                gal_el = gal_el * base % two_n;
            }
            base = base * base % two_n;
            exp >>= 1;
        }
        gal_el
    }

    /// Galois element 2N-1 of the complex conjugation of the slots.
    pub fn galois_element_conjugate(&self) -> usize {
        (self.n() << 1) - 1
    }
}

pub mod presets {
    use super::ParametersLiteral;

    /// Ring degree 2^8 with a chain deep enough for one bootstrapping with the default
    /// bootstrapping parameters. Not secure.
    pub fn bootstrapping_test(log_slots: usize) -> ParametersLiteral {
        let mut log_q: Vec<usize> = vec![40, 30, 30];
        log_q.extend(std::iter::repeat(40).take(12));
        ParametersLiteral {
            log_n: 8,
            log_q,
            log_p: 60,
            log_scale: 30,
            log_slots,
            xe: 3.2,
            xs: 16,
        }
    }

    /// Ring degree 2^8 with eight 40-bit levels above a 50-bit base modulus. Not secure.
    pub fn test_parameters() -> ParametersLiteral {
        let mut log_q: Vec<usize> = vec![50];
        log_q.extend(std::iter::repeat(40).take(8));
        ParametersLiteral {
            log_n: 8,
            log_q,
            log_p: 60,
            log_scale: 40,
            log_slots: 7,
            xe: 3.2,
            xs: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moduli_chain() {
        let params: Parameters = Parameters::new(&presets::bootstrapping_test(6)).unwrap();
        assert_eq!(params.max_level(), 14);
        let two_n: u64 = (params.n() << 1) as u64;
        let mut moduli: Vec<u64> = params.moduli_q();
        moduli.push(params.p());
        moduli.iter().for_each(|q| assert_eq!(q % two_n, 1));
        assert!((params.q(0) as f64).log2().round() == 40.0);
        assert!((params.q(1) as f64).log2().round() == 30.0);
        assert!((params.p() as f64).log2().round() == 60.0);
        moduli.sort();
        moduli.dedup();
        assert_eq!(moduli.len(), params.max_level() + 2);
    }

    #[test]
    fn galois_elements() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        assert_eq!(params.galois_element(0), 1);
        assert_eq!(params.galois_element(1), 5);
        assert_eq!(params.galois_element(2), 25);
        assert_eq!(params.galois_element(params.max_slots()), 1);
        assert_eq!(params.galois_element_conjugate(), 511);
    }

    #[test]
    fn mismatch() {
        let params: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        assert_eq!(params.mismatch(&params.clone()), None);
        let same: Parameters = Parameters::new(&presets::test_parameters()).unwrap();
        assert_eq!(params.mismatch(&same), None);

        let a: Parameters = Parameters::new(&presets::bootstrapping_test(2)).unwrap();
        let b: Parameters = Parameters::new(&presets::bootstrapping_test(6)).unwrap();
        assert_eq!(a.mismatch(&b), Some("log_slots"));

        let mut lit: ParametersLiteral = presets::test_parameters();
        lit.log_scale -= 1;
        assert_eq!(params.mismatch(&Parameters::new(&lit).unwrap()), Some("log_scale"));

        let mut lit: ParametersLiteral = presets::test_parameters();
        lit.log_q[1] += 1;
        assert_eq!(params.mismatch(&Parameters::new(&lit).unwrap()), Some("moduli"));
    }

    #[test]
    fn invalid_literals() {
        let mut lit: ParametersLiteral = presets::test_parameters();
        lit.log_p = 45;
        assert!(matches!(
            Parameters::new(&lit),
            Err(ConstructionError::InvalidParameters(_))
        ));
        let mut lit: ParametersLiteral = presets::test_parameters();
        lit.log_slots = lit.log_n;
        assert!(Parameters::new(&lit).is_err());
        for xe in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let mut lit: ParametersLiteral = presets::test_parameters();
            lit.xe = xe;
            assert!(
                matches!(Parameters::new(&lit), Err(ConstructionError::InvalidParameters(_))),
                "xe={} accepted",
                xe
            );
        }
    }

    #[test]
    fn prime_exhaustion() {
        let lit: ParametersLiteral = ParametersLiteral {
            log_n: 8,
            log_q: vec![12; 8],
            log_p: 14,
            log_scale: 10,
            log_slots: 4,
            xe: 3.2,
            xs: 0,
        };
        assert_eq!(
            Parameters::new(&lit).err(),
            Some(ConstructionError::PrimeGeneration { bits: 12 })
        );
    }
}
