//! End-to-end tests of the diffusion driver against exactly solvable chains

use approx::assert_relative_eq;
use num_complex::Complex64;
use spindrift_sim::{diffusion_loop, energy, read_hamiltonian, Heisenberg};
use spindrift_state::{
    read_state, write_state_with_comments, ShardedState, SpinConfiguration, StateOptions,
};

fn spin(s: &str) -> SpinConfiguration {
    s.parse().unwrap()
}

fn state_with(options: StateOptions, entries: &[(&str, f64)]) -> ShardedState {
    let mut state = ShardedState::new(options).unwrap();
    for (config, coeff) in entries {
        state.accumulate(Complex64::new(*coeff, 0.0), spin(config));
    }
    state
}

#[test]
fn two_site_chain_converges_to_the_singlet() {
    // H = σ₁·σ₂ has eigenvalues +1 (triplet) and −3 (singlet). |01⟩
    // overlaps the singlet, and Λ = 2 puts the singlet's (Λ − E) factor at
    // 5 against 1 for the triplet, so twenty iterations are plenty.
    let chain = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(1.0, 0.0));
    let psi = state_with(
        StateOptions::new().with_soft_max(4).with_num_shards(2),
        &[("01", 1.0)],
    );

    let ground = diffusion_loop(2.0, &chain, psi, 20).unwrap();
    let e = energy(&chain, &ground).unwrap();
    assert_relative_eq!(e.re, -3.0, epsilon = 1e-6);
    assert_relative_eq!(e.im, 0.0, epsilon = 1e-9);

    // The singlet weights are equal and the coefficients opposite in sign.
    let up = ground.find(&spin("01")).unwrap();
    let down = ground.find(&spin("10")).unwrap();
    assert_relative_eq!(up.norm_sqr(), 0.5, epsilon = 1e-6);
    assert_relative_eq!((up + down).norm(), 0.0, epsilon = 1e-6);
}

#[test]
fn symmetric_superposition_is_stationary() {
    // |01⟩ + |10⟩ is the m = 0 triplet, an eigenvector of Λ − H with no
    // singlet component, so the loop leaves its energy at +1.
    let chain = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(1.0, 0.0));
    let psi = state_with(
        StateOptions::new().with_soft_max(4).with_num_shards(2),
        &[("01", 1.0), ("10", 1.0)],
    );

    let evolved = diffusion_loop(2.0, &chain, psi, 20).unwrap();
    let e = energy(&chain, &evolved).unwrap();
    assert_relative_eq!(e.re, 1.0, epsilon = 1e-9);

    let up = evolved.find(&spin("01")).unwrap();
    let down = evolved.find(&spin("10")).unwrap();
    assert_relative_eq!((up - down).norm(), 0.0, epsilon = 1e-9);
}

#[test]
fn four_site_ring_reaches_the_known_ground_energy() {
    // Antiferromagnetic ring of four sites: the ground state is the total
    // singlet with E = −8 in this convention.
    let ring = Heisenberg::with_edges(
        vec![(0, 1), (1, 2), (2, 3), (3, 0)],
        Complex64::new(1.0, 0.0),
    );
    let psi = state_with(
        StateOptions::new()
            .with_soft_max(8)
            .with_hard_max(32)
            .with_num_shards(4),
        &[("0101", 1.0)],
    );

    let ground = diffusion_loop(10.0, &ring, psi, 120).unwrap();
    let e = energy(&ring, &ground).unwrap();
    assert_relative_eq!(e.re, -8.0, epsilon = 1e-6);
}

#[test]
fn energy_of_a_complex_state_is_real() {
    let chain = Heisenberg::with_edges(vec![(0, 1), (1, 2), (2, 3)], Complex64::new(1.0, 0.0));
    let mut psi = ShardedState::new(
        StateOptions::new()
            .with_soft_max(16)
            .with_hard_max(32)
            .with_num_shards(4),
    )
    .unwrap();
    psi.accumulate(Complex64::new(0.3, 0.4), spin("0101"));
    psi.accumulate(Complex64::new(-0.2, 0.6), spin("1010"));
    psi.accumulate(Complex64::new(0.5, -0.1), spin("0110"));
    psi.normalize().unwrap();

    let e = energy(&chain, &psi).unwrap();
    assert_relative_eq!(e.im, 0.0, epsilon = 1e-12);
}

#[test]
fn random_resampling_policy_also_converges() {
    spindrift_state::reseed(42);
    let chain = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(1.0, 0.0));
    let psi = state_with(
        StateOptions::new()
            .with_soft_max(64)
            .with_num_shards(2)
            .with_random_sampling(true),
        &[("01", 1.0)],
    );

    let ground = diffusion_loop(2.0, &chain, psi, 20).unwrap();
    let e = energy(&chain, &ground).unwrap();
    assert_relative_eq!(e.re, -3.0, epsilon = 1e-6);
}

#[test]
fn text_pipeline_round_trips() {
    let hamiltonian_text = "\
# two-site antiferromagnet
1.0 [ (0, 1) ]
";
    let state_text = "\
# starting configuration
01\t1.0\t0.0
";
    let chain = read_hamiltonian(hamiltonian_text.as_bytes()).unwrap();
    let mut psi = ShardedState::new(
        StateOptions::new().with_soft_max(4).with_num_shards(2),
    )
    .unwrap();
    read_state(state_text.as_bytes(), &mut psi).unwrap();

    let initial = energy(&chain, &psi).unwrap();
    assert_relative_eq!(initial.re, -1.0, epsilon = 1e-12);

    let ground = diffusion_loop(2.0, &chain, psi, 20).unwrap();
    let final_energy = energy(&chain, &ground).unwrap();

    let mut output = Vec::new();
    write_state_with_comments(
        &mut output,
        &ground,
        [format!("E = {} + {}i", final_energy.re, final_energy.im)],
    )
    .unwrap();

    let mut reloaded = ShardedState::new(
        StateOptions::new().with_soft_max(4).with_num_shards(2),
    )
    .unwrap();
    read_state(output.as_slice(), &mut reloaded).unwrap();

    assert_eq!(reloaded.len(), ground.len());
    let reread_energy = energy(&chain, &reloaded).unwrap();
    assert_relative_eq!(reread_energy.re, final_energy.re, epsilon = 1e-9);
}
