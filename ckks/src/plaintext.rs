use crate::parameters::Parameters;
use rns::poly::PolyRNS;

/// Polynomial in the NTT domain over q_0, ..., q_level, with the scale of its encoded values.
#[derive(Clone, Debug, PartialEq)]
pub struct Plaintext {
    pub value: PolyRNS<u64>,
    pub scale: f64,
}

impl Parameters {
    pub fn new_plaintext(&self, level: usize) -> Plaintext {
        Plaintext::new(self, level, self.scale())
    }
}

impl Plaintext {
    pub fn new(params: &Parameters, level: usize, scale: f64) -> Self {
        assert!(
            level <= params.max_level(),
            "invalid argument level: level={} > max_level={}",
            level,
            params.max_level()
        );
        Self {
            value: PolyRNS::new(params.n(), level),
            scale,
        }
    }

    pub fn n(&self) -> usize {
        self.value.n()
    }

    pub fn level(&self) -> usize {
        self.value.level()
    }
}
