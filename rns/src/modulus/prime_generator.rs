use crate::modulus::prime::Prime;
use primality_test::is_prime;

/// Enumerates primes q = 1 mod nth_root around 2^bit_size, moving away from 2^bit_size
/// in either direction while log2(q) stays within 0.5 of bit_size.
pub struct NTTFriendlyPrimesGenerator {
    size: f64,
    next_prime: u64,
    prev_prime: u64,
    nth_root: u64,
    check_next_prime: bool,
    check_prev_prime: bool,
}

impl NTTFriendlyPrimesGenerator {
    pub fn new(bit_size: u64, nth_root: u64) -> Self {
        assert!(
            nth_root.is_power_of_two(),
            "invalid argument: nth_root={} is not a power of two",
            nth_root
        );
        assert!(bit_size < 62, "invalid argument: bit_size={} >= 62", bit_size);
        let next_prime: u64 = (1 << bit_size) + 1;
        Self {
            size: bit_size as f64,
            check_next_prime: true,
            check_prev_prime: next_prime > nth_root,
            nth_root,
            next_prime,
            prev_prime: next_prime.saturating_sub(nth_root),
        }
    }

    fn upstream_exhausted(&self) -> bool {
        (self.next_prime as f64).log2() - self.size >= 0.5 || self.next_prime > 1 << 61
    }

    fn downstream_exhausted(&self) -> bool {
        self.prev_prime <= self.nth_root || self.size - (self.prev_prime as f64).log2() >= 0.5
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Option<Vec<Prime<u64>>> {
        (0..k).map(|_| self.next_alternating_prime()).collect()
    }

    /// Returns the next prime above 2^bit_size, or None once the range is exhausted.
    pub fn next_upstream_prime(&mut self) -> Option<Prime<u64>> {
        while self.check_next_prime {
            if self.upstream_exhausted() {
                self.check_next_prime = false;
                break;
            }
            let candidate: u64 = self.next_prime;
            self.next_prime += self.nth_root;
            if is_prime(candidate) {
                return Some(Prime::new_unchecked(candidate));
            }
        }
        None
    }

    /// Returns the next prime below 2^bit_size, or None once the range is exhausted.
    pub fn next_downstream_prime(&mut self) -> Option<Prime<u64>> {
        while self.check_prev_prime {
            if self.downstream_exhausted() {
                self.check_prev_prime = false;
                break;
            }
            let candidate: u64 = self.prev_prime;
            self.prev_prime -= self.nth_root;
            if is_prime(candidate) {
                return Some(Prime::new_unchecked(candidate));
            }
        }
        None
    }

    /// Alternates between the upstream and downstream searches, so that the
    /// product of the returned primes stays close to a power of 2^bit_size.
    pub fn next_alternating_prime(&mut self) -> Option<Prime<u64>> {
        while self.check_next_prime || self.check_prev_prime {
            if self.check_next_prime {
                if self.upstream_exhausted() {
                    self.check_next_prime = false;
                } else {
                    let candidate: u64 = self.next_prime;
                    self.next_prime += self.nth_root;
                    if is_prime(candidate) {
                        return Some(Prime::new_unchecked(candidate));
                    }
                }
            }

            if self.check_prev_prime {
                if self.downstream_exhausted() {
                    self.check_prev_prime = false;
                } else {
                    let candidate: u64 = self.prev_prime;
                    self.prev_prime -= self.nth_root;
                    if is_prime(candidate) {
                        return Some(Prime::new_unchecked(candidate));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prime_generation() {
        let nth_root: u64 = 1 << 16;
        let mut g: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(30, nth_root);

        let primes: Vec<Prime<u64>> = g.next_alternating_primes(10).expect("enough 30-bit primes");
        assert_eq!(primes.len(), 10);
        for prime in primes.iter() {
            assert_eq!(prime.q() % nth_root, 1);
            assert!(is_prime(prime.q()));
            assert!(((prime.q() as f64).log2() - 30.0).abs() < 0.5);
        }
        let mut qs: Vec<u64> = primes.iter().map(|p| p.q()).collect();
        qs.dedup();
        assert_eq!(qs.len(), 10);
    }

    #[test]
    fn exhaustion() {
        let mut g: NTTFriendlyPrimesGenerator = NTTFriendlyPrimesGenerator::new(4, 16);
        // 17 is the only candidate within range.
        assert_eq!(g.next_upstream_prime().map(|p| p.q()), Some(17));
        assert!(g.next_upstream_prime().is_none());
        assert!(g.next_downstream_prime().is_none());
    }
}
