use crate::modulus::shoup::Shoup;
use crate::modulus::ONCE;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};

impl RingRNS<'_, u64> {
    /// Returns [q_last^-1 mod q_i] for i in 0..level, with q_last = q_level.
    pub fn rescaling_constant(&self) -> Vec<Shoup<u64>> {
        let level: usize = self.level();
        let q_last: u64 = self.0[level].modulus.q;
        self.0[..level]
            .iter()
            .map(|r| r.modulus.prepare(r.modulus.inv(q_last % r.modulus.q)))
            .collect()
    }

    /// Updates a to round(a / q_level) and drops its last residue.
    /// Expects a in the NTT domain, at level self.level().
    pub fn div_round_by_last_modulus_ntt_inplace(&self, a: &mut PolyRNS<u64>) {
        let level: usize = self.level();
        assert!(level > 0, "invalid ring: cannot divide by the last modulus at level 0");
        assert!(
            a.level() == level,
            "invalid input a: a.level()={} != self.level()={}",
            a.level(),
            level
        );
        let (a_i, a_last) = a.split_at_mut(level);
        let mut last: Poly<u64> = self.0[level].new_poly();
        self.0[level].intt(&a_last[0], &mut last);
        self.at_level(level - 1)
            .sub_centered_then_mul_inplace(&last, &self.0[level], &self.rescaling_constant(), a_i);
        a.resize(level - 1);
    }

    /// Updates a to round(a / p), with a_p the residue of the same element modulo p.
    /// Expects a and a_p in the NTT domain; a keeps its level.
    pub fn div_round_by_external_modulus_ntt_inplace(
        &self,
        ring_p: &Ring<u64>,
        a_p: &Poly<u64>,
        a: &mut PolyRNS<u64>,
    ) {
        let level: usize = self.level();
        assert!(
            a.level() >= level,
            "invalid input a: a.level()={} < self.level()={}",
            a.level(),
            level
        );
        let mut last: Poly<u64> = ring_p.new_poly();
        ring_p.intt(a_p, &mut last);
        let p: u64 = ring_p.modulus.q;
        let constants: Vec<Shoup<u64>> = self
            .0
            .iter()
            .map(|r| r.modulus.prepare(r.modulus.inv(p % r.modulus.q)))
            .collect();
        self.sub_centered_then_mul_inplace(&last, ring_p, &constants, &mut a.0[..=level]);
    }

    /// a_i <- (a_i - [last]_i) * constants[i], with last lifted centered from ring_last.
    fn sub_centered_then_mul_inplace(
        &self,
        last: &Poly<u64>,
        ring_last: &Ring<u64>,
        constants: &[Shoup<u64>],
        a: &mut [Poly<u64>],
    ) {
        let mut buf: Poly<u64> = self.0[0].new_poly();
        self.0.iter().enumerate().for_each(|(i, ring)| {
            ring.switch_modulus_centered(last, ring_last.modulus.q, &mut buf);
            ring.ntt_inplace(&mut buf);
            ring.modulus
                .vb_sub_va_mul_sc_into_vb::<ONCE>(&buf.0, &constants[i], &mut a[i].0);
        });
    }
}
