use rns::poly::PolyRNS;
use utils::map::Map;

/// Secret s over q_0, ..., q_L, P in the NTT domain.
#[derive(Clone, PartialEq)]
pub struct SecretKey(pub PolyRNS<u64>);

impl SecretKey {
    pub fn n(&self) -> usize {
        self.0.n()
    }

    pub fn level(&self) -> usize {
        self.0.level()
    }
}

/// (b, a) = (-a s + e, a) over q_0, ..., q_L in the NTT domain.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey(pub [PolyRNS<u64>; 2]);

/// Encryptions under s of P * s_in, one per modulus q_i of the chain.
/// Digit i is the pair (b_i, a_i) over q_0, ..., q_L, P with
/// b_i = -a_i s + e_i + [P * s_in]_{q_i} on residue i only.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchingKey {
    pub value: Vec<[PolyRNS<u64>; 2]>,
}

impl SwitchingKey {
    pub fn digits(&self) -> usize {
        self.value.len()
    }

    pub fn at(&self, i: usize) -> &[PolyRNS<u64>; 2] {
        &self.value[i]
    }
}

/// Switching key from s^2 to s.
#[derive(Clone, Debug, PartialEq)]
pub struct RelinearizationKey(pub SwitchingKey);

/// Switching keys from s(X^g) to s, indexed by galois element g.
#[derive(Clone, Debug, Default)]
pub struct RotationKeys(pub Map<usize, SwitchingKey>);

impl RotationKeys {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, gal_el: usize, key: SwitchingKey) {
        self.0.insert(gal_el, key);
    }

    pub fn get(&self, gal_el: usize) -> Option<&SwitchingKey> {
        self.0.get(&gal_el)
    }

    pub fn contains(&self, gal_el: usize) -> bool {
        self.0.contains_key(&gal_el)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
