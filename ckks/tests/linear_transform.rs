mod common;

use ckks::ciphertext::Ciphertext;
use ckks::keys::RotationKeys;
use ckks::linear_transform::{coeffs_to_slots_stages, slots_to_coeffs_stages, DiagonalMatrix, LinearTransform};
use ckks::parameters::presets;
use common::{max_error, sub_test, TestContext};
use num_complex::Complex64;
use sampling::source::Source;

#[test]
fn linear_transform() {
    let mut ctx: TestContext = TestContext::new(&presets::test_parameters(), 4);
    let n: usize = ctx.params.slots();
    let stages: Vec<DiagonalMatrix> = coeffs_to_slots_stages(n, 3)
        .into_iter()
        .chain(slots_to_coeffs_stages(n, 2))
        .collect();
    let rotations: Vec<usize> = stages
        .iter()
        .flat_map(|m| m.diags().keys().copied().collect::<Vec<usize>>())
        .collect();
    let mut source: Source = ctx.source.branch();
    let keys: RotationKeys = ctx.keygen().gen_rotation_keys(&ctx.sk, &rotations, false, &mut source);

    sub_test("test_diagonal_evaluation", || {
        test_diagonal_evaluation(&mut ctx, &stages, &keys)
    });
}

fn test_diagonal_evaluation(ctx: &mut TestContext, stages: &[DiagonalMatrix], keys: &RotationKeys) {
    let values: Vec<Complex64> = ctx.random_values(ctx.params.slots(), 1.0);
    let mut level: usize = ctx.params.max_level();
    let mut ct: Ciphertext = ctx.encrypt(&values, level, ctx.params.scale());
    let mut want: Vec<Complex64> = values.clone();
    for m in stages {
        let lt: LinearTransform =
            LinearTransform::new(&ctx.encoder, m, level, ctx.params.q(level) as f64).unwrap();
        ct = ctx.eval.linear_transform(&ct, &lt, keys).unwrap();
        want = m.apply(&want);
        level -= 1;
        assert_eq!(ct.level(), level);
        assert!((ct.scale - ctx.params.scale()).abs() / ctx.params.scale() < 1e-9);
    }
    let have: Vec<Complex64> = ctx.decrypt(&ct);
    assert!(max_error(&have, &want) < 1e-5);
    // CoeffsToSlots followed by SlotsToCoeffs is the identity.
    assert!(max_error(&have, &values) < 1e-5);
}
