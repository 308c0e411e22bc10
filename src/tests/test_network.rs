use approx::assert_abs_diff_eq;
use ndarray::{Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::layers::LayerTrait;
use crate::networks::{
    ActionBounds, DuelingBranches, DuelingValueHead, GaussianPolicyHead, ParameterProposalNetwork,
};

fn random_batch(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<f32> {
    Array2::random_using((rows, cols), Uniform::new(-1.0, 1.0), rng)
}

#[test]
fn test_dueling_scenario_shape_and_mean_identity() {
    let mut rng = StdRng::seed_from_u64(21);
    let net = DuelingValueHead::shared(3, 2, &[8, 4], &mut rng).unwrap();
    let states = random_batch(&mut rng, 5, 3);
    let params = random_batch(&mut rng, 5, 2);

    let out = net.decompose(states.view(), params.view()).unwrap();
    assert_eq!(out.q.shape(), [5, 2]);
    assert_eq!(out.value.shape(), [5, 1]);

    for (q_row, v) in out.q.axis_iter(Axis(0)).zip(out.value.column(0)) {
        let centered: f32 = q_row.iter().map(|q| q - v).sum();
        assert_abs_diff_eq!(centered, 0.0, epsilon = 1e-5);
    }
}

#[test]
fn test_dueling_forward_matches_decompose() {
    let mut rng = StdRng::seed_from_u64(2);
    let net = DuelingValueHead::shared(4, 3, &[16], &mut rng).unwrap();
    let states = random_batch(&mut rng, 6, 4);
    let params = random_batch(&mut rng, 6, 3);

    let q = net.forward(states.view(), params.view()).unwrap();
    let out = net.decompose(states.view(), params.view()).unwrap();
    assert_eq!(q, out.q);
}

#[test]
fn test_independent_dueling_layers() {
    let mut rng = StdRng::seed_from_u64(4);
    let net = DuelingValueHead::independent(3, 4, 2, &[16, 8], &[12], &mut rng).unwrap();
    assert!(matches!(net.branches(), DuelingBranches::Independent { .. }));
    assert_eq!(net.param_dim(), 2);

    let layers = net.layers();
    assert_eq!(layers.len(), 5);
    assert_eq!(layers[0].input_size(), 5);
    assert_eq!(layers[2].output_size(), 4);
    assert_eq!(layers[3].input_size(), 5);
    assert_eq!(layers[4].output_size(), 1);

    let states = random_batch(&mut rng, 7, 3);
    let params = random_batch(&mut rng, 7, 2);
    let out = net.decompose(states.view(), params.view()).unwrap();
    assert_eq!(out.q.shape(), [7, 4]);
    for (q_row, v) in out.q.axis_iter(Axis(0)).zip(out.value.column(0)) {
        assert_abs_diff_eq!(q_row.sum() - 4.0 * v, 0.0, epsilon = 1e-4);
    }
}

#[test]
fn test_q1_q2_are_equal() {
    let mut rng = StdRng::seed_from_u64(8);
    let net = DuelingValueHead::shared(3, 2, &[8], &mut rng).unwrap();
    let states = random_batch(&mut rng, 3, 3);
    let params = random_batch(&mut rng, 3, 2);

    let (q1, q2) = net.q1_q2(states.view(), params.view()).unwrap();
    assert_eq!(q1, q2);
    assert_eq!(q1, net.forward(states.view(), params.view()).unwrap());
}

#[test]
fn test_layers_mut_reaches_every_parameter() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut net = DuelingValueHead::shared(3, 2, &[8, 4], &mut rng).unwrap();
    for layer in net.layers_mut() {
        layer.weights_mut().fill(0.0);
        layer.biases_mut().fill(1.0);
    }
    // V = 1, A = [1, 1]
    let q = net
        .forward(Array2::ones((2, 3)).view(), Array2::ones((2, 2)).view())
        .unwrap();
    assert_eq!(q, Array2::<f32>::ones((2, 2)));
}

#[test]
fn test_policy_forward_clamps_log_std() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut policy = GaussianPolicyHead::new(3, 2, &[8], None, &mut rng).unwrap();
    {
        let layers = policy.layers_mut();
        let log_std = layers.into_iter().last().unwrap();
        log_std.weights_mut().fill(0.0);
        log_std.biases_mut().assign(&ndarray::arr1(&[-50.0, 50.0]));
    }

    let (_, log_std) = policy.forward(Array2::zeros((2, 3)).view()).unwrap();
    for row in log_std.axis_iter(Axis(0)) {
        assert_eq!(row[0], -20.0);
        assert_eq!(row[1], 2.0);
    }
}

#[test]
fn test_policy_actions_within_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let bounds = ActionBounds::new(vec![-3.0, 10.0], vec![1.0, 12.0]);
    let policy = GaussianPolicyHead::new(4, 2, &[32, 16], Some(&bounds), &mut rng).unwrap();
    let states = random_batch(&mut rng, 64, 4) * 5.0;

    let actions = policy.get_action(states.view(), &mut rng).unwrap();
    assert_eq!(actions.shape(), [64, 2]);
    for row in actions.axis_iter(Axis(0)) {
        assert!(row[0] >= -3.0 && row[0] <= 1.0, "action {} outside [-3, 1]", row[0]);
        assert!(row[1] >= 10.0 && row[1] <= 12.0, "action {} outside [10, 12]", row[1]);
    }
}

#[test]
fn test_policy_sampling_reproducible_with_seed() {
    let mut init_rng = StdRng::seed_from_u64(3);
    let policy = GaussianPolicyHead::new(2, 2, &[8], None, &mut init_rng).unwrap();
    let states = Array2::ones((4, 2));

    let a = policy
        .get_action_logprob(states.view(), &mut StdRng::seed_from_u64(99))
        .unwrap();
    let b = policy
        .get_action_logprob(states.view(), &mut StdRng::seed_from_u64(99))
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(a.1.shape(), [4, 1]);
}

#[test]
fn test_policy_single_state_action() {
    let mut rng = StdRng::seed_from_u64(3);
    let policy = GaussianPolicyHead::new(2, 3, &[8], None, &mut rng).unwrap();
    let action = policy
        .get_action_one(ndarray::arr1(&[0.5, -0.5]).view(), &mut rng)
        .unwrap();
    assert_eq!(action.len(), 3);
    assert!(action.iter().all(|a| a.abs() <= 1.0));
}

#[test]
fn test_param_net_bounds() {
    let mut rng = StdRng::seed_from_u64(17);
    let net = ParameterProposalNetwork::new(4, 3, &[16, 8], &mut rng).unwrap();
    let states = random_batch(&mut rng, 32, 4) * 100.0;

    let out = net.forward(states.view()).unwrap();
    assert_eq!(out.shape(), [32, 3]);
    assert!(out.iter().all(|&p| p > 5.0 && p < 15.0));
}
