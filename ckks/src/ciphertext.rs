use crate::parameters::Parameters;
use rns::poly::PolyRNS;

/// Ciphertext (c_0, ..., c_d) in the NTT domain, decrypting to c_0 + c_1 s + ... + c_d s^d.
#[derive(Clone, Debug, PartialEq)]
pub struct Ciphertext {
    pub value: Vec<PolyRNS<u64>>,
    pub scale: f64,
}

impl Parameters {
    pub fn new_ciphertext(&self, level: usize) -> Ciphertext {
        Ciphertext::new(self, 1, level, self.scale())
    }
}

impl Ciphertext {
    pub fn new(params: &Parameters, degree: usize, level: usize, scale: f64) -> Self {
        assert!(
            level <= params.max_level(),
            "invalid argument level: level={} > max_level={}",
            level,
            params.max_level()
        );
        Self {
            value: (0..=degree).map(|_| PolyRNS::new(params.n(), level)).collect(),
            scale,
        }
    }

    pub fn n(&self) -> usize {
        self.value[0].n()
    }

    pub fn degree(&self) -> usize {
        self.value.len() - 1
    }

    pub fn level(&self) -> usize {
        self.value[0].level()
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale
    }

    /// Drops the residues above level.
    pub fn truncate(&mut self, level: usize) {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        self.value.iter_mut().for_each(|c| c.resize(level));
    }

    pub fn zero(&mut self) {
        self.value.iter_mut().for_each(|c| c.zero());
    }
}
