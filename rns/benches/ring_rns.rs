use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rns::modulus::{NONE, ONCE};
use rns::poly::PolyRNS;
use rns::ring::impl_u64::ring_rns::new_rings;
use rns::ring::{Ring, RingRNS};
use sampling::source::Source;

const MODULI: [u64; 4] = [
    0x1fffffffffc80001u64,
    0x1fffffffffe00001u64,
    0x1fffffffffb40001,
    0x1fffffffff500001,
];

fn div_round_by_last_modulus_ntt(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("div_round_by_last_modulus_ntt");
    for log_n in 11..15 {
        let n: usize = 1 << log_n as usize;
        let rings: Vec<Ring<u64>> = new_rings(n, MODULI.to_vec());
        let ring_rns: RingRNS<u64> = RingRNS::new(&rings);
        let mut source: Source = Source::new([0u8; 32]);
        let mut a: PolyRNS<u64> = ring_rns.new_polyrns();
        ring_rns.fill_uniform(&mut source, &mut a);
        let id = BenchmarkId::new("prime", n);
        b.bench_with_input(id, &(), |b, _| {
            b.iter(|| {
                let mut x: PolyRNS<u64> = a.clone();
                ring_rns.div_round_by_last_modulus_ntt_inplace(&mut x);
                x
            })
        });
    }
}

fn mul_coeffs_then_add(c: &mut Criterion) {
    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("mul_coeffs_then_add");
    for log_n in 11..15 {
        let n: usize = 1 << log_n as usize;
        let rings: Vec<Ring<u64>> = new_rings(n, MODULI.to_vec());
        let ring_rns: RingRNS<u64> = RingRNS::new(&rings);
        let mut source: Source = Source::new([1u8; 32]);
        let mut a: PolyRNS<u64> = ring_rns.new_polyrns();
        let mut s: PolyRNS<u64> = ring_rns.new_polyrns();
        ring_rns.fill_uniform(&mut source, &mut a);
        ring_rns.fill_uniform(&mut source, &mut s);
        let id = BenchmarkId::new("lazy", n);
        b.bench_with_input(id, &(), |b, _| {
            b.iter(|| {
                let mut acc: PolyRNS<u64> = a.clone();
                ring_rns.mul_coeffs_inplace(&s, &mut acc);
                ring_rns.add_inplace::<NONE>(&a, &mut acc);
                ring_rns.reduce_inplace::<ONCE>(&mut acc);
                acc
            })
        });
    }
}

criterion_group!(benches, div_round_by_last_modulus_ntt, mul_coeffs_then_add);
criterion_main!(benches);
