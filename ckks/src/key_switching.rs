use crate::evaluator::Evaluator;
use crate::keys::SwitchingKey;
use rns::modulus::ONCE;
use rns::poly::{Poly, PolyRNS};
use rns::ring::{Ring, RingRNS};

impl Evaluator {
    /// Returns (d0, d1) at the level of c such that d0 + d1 s = c s_in + e, with swk
    /// switching from s_in to s. c is given in the NTT domain.
    ///
    /// c is decomposed into its centered residues [c]_{q_i}, each lifted to q_0, ..., q_level, P
    /// and multiplied with the digit i of swk. The sum is then divided by P with rounding.
    pub fn switch_key(&self, c: &PolyRNS<u64>, swk: &SwitchingKey) -> (PolyRNS<u64>, PolyRNS<u64>) {
        let level: usize = c.level();
        assert!(
            swk.digits() > level,
            "invalid swk: swk.digits()={} <= c.level()={}",
            swk.digits(),
            level
        );
        let ring_q: RingRNS<u64> = self.params.ring_q_at_level(level);
        let ring_p: &Ring<u64> = self.params.ring_p();
        let p_index: usize = self.params.max_level() + 1;

        let mut acc_q: [PolyRNS<u64>; 2] = [ring_q.new_polyrns(), ring_q.new_polyrns()];
        let mut acc_p: [Poly<u64>; 2] = [ring_p.new_poly(), ring_p.new_poly()];
        let mut c_i: Poly<u64> = ring_p.new_poly();
        let mut digit: Poly<u64> = ring_p.new_poly();

        for (i, ring_i) in ring_q.0.iter().enumerate() {
            let q_i: u64 = ring_i.modulus.q;
            let key: &[PolyRNS<u64>; 2] = swk.at(i);
            ring_i.intt(c.at(i), &mut c_i);

            for (j, ring_j) in ring_q.0.iter().enumerate() {
                if j == i {
                    digit.copy_from(c.at(i));
                } else {
                    ring_j.switch_modulus_centered(&c_i, q_i, &mut digit);
                    ring_j.ntt_inplace(&mut digit);
                }
                acc_q.iter_mut().zip(key.iter()).for_each(|(acc, k)| {
                    ring_j.mul_coeffs_then_add_inplace::<ONCE>(&digit, k.at(j), acc.at_mut(j))
                });
            }

            ring_p.switch_modulus_centered(&c_i, q_i, &mut digit);
            ring_p.ntt_inplace(&mut digit);
            acc_p.iter_mut().zip(key.iter()).for_each(|(acc, k)| {
                ring_p.mul_coeffs_then_add_inplace::<ONCE>(&digit, k.at(p_index), acc)
            });
        }

        let [mut d0, mut d1] = acc_q;
        ring_q.div_round_by_external_modulus_ntt_inplace(ring_p, &acc_p[0], &mut d0);
        ring_q.div_round_by_external_modulus_ntt_inplace(ring_p, &acc_p[1], &mut d1);
        (d0, d1)
    }
}
