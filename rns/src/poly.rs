use crate::modulus::WordOps;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn resize(&mut self, n: usize) {
        self.0.resize(n, O::default());
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy_from(&mut self, other: &Poly<O>) {
        if std::ptr::eq(self, other) {
            return;
        }
        self.resize(other.n());
        self.0.copy_from_slice(&other.0)
    }
}

/// A polynomial in RNS representation: one residue polynomial per modulus q_0, ..., q_level.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PolyRNS<O>(pub Vec<Poly<O>>);

impl<O> PolyRNS<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize, level: usize) -> Self {
        Self(vec![Poly::<O>::new(n); level + 1])
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn log_n(&self) -> usize {
        self.0[0].log_n()
    }

    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    /// Truncates or zero-extends the list of residues to level+1.
    pub fn resize(&mut self, level: usize) {
        let n: usize = self.n();
        self.0.resize(level + 1, Poly::<O>::new(n));
    }

    pub fn split_at_mut(&mut self, level: usize) -> (&mut [Poly<O>], &mut [Poly<O>]) {
        self.0.split_at_mut(level)
    }

    pub fn at(&self, level: usize) -> &Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &self.0[level]
    }

    pub fn at_mut(&mut self, level: usize) -> &mut Poly<O> {
        &mut self.0[level]
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.iter_mut().for_each(|p| p.set_all(v))
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    /// Copies the residues of other up to min(self.level(), other.level()).
    pub fn copy_from(&mut self, other: &PolyRNS<O>) {
        if std::ptr::eq(self, other) {
            return;
        }
        let level: usize = self.level().min(other.level());
        self.0[..=level]
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| a.copy_from(b));
    }

    /// Returns a copy of the residues 0..=level.
    pub fn truncated(&self, level: usize) -> PolyRNS<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        PolyRNS(self.0[..=level].to_vec())
    }
}
