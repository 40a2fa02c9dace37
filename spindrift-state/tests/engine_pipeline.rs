//! Workflow tests spanning loading, builder sessions, and truncation

use num_complex::Complex64;
use spindrift_state::{
    read_state, write_state, ShardedState, SpinConfiguration, StateBuilder, StateOptions,
};

fn spin(s: &str) -> SpinConfiguration {
    s.parse().unwrap()
}

#[test]
fn load_grow_truncate_normalize() {
    let input = "\
# four basis states of decreasing weight
0000\t0.8\t0.0
0001\t0.5\t0.0
0010\t0.3\t0.0
0011\t0.1\t0.0
";
    let mut state = ShardedState::new(
        StateOptions::new()
            .with_soft_max(3)
            .with_hard_max(32)
            .with_num_shards(8),
    )
    .unwrap();
    read_state(input.as_bytes(), &mut state).unwrap();
    assert_eq!(state.len(), 4);

    // Grow the state through a builder session: double every coefficient
    // and touch one new configuration.
    let mut builder = StateBuilder::new(&mut state);
    builder.start();
    builder.push(Complex64::new(0.8, 0.0), spin("0000"));
    builder.push(Complex64::new(0.5, 0.0), spin("0001"));
    builder.push(Complex64::new(0.3, 0.0), spin("0010"));
    builder.push(Complex64::new(0.1, 0.0), spin("0011"));
    builder.push(Complex64::new(0.05, 0.0), spin("0100"));
    builder.stop().unwrap();
    drop(builder);

    assert_eq!(state.len(), 5);
    assert_eq!(state.find(&spin("0000")), Some(Complex64::new(1.6, 0.0)));

    state.shrink().unwrap();
    assert_eq!(state.len(), 3);
    assert!(state.find(&spin("0011")).is_none());
    assert!(state.find(&spin("0100")).is_none());

    state.normalize().unwrap();
    let total: f64 = state.iter().map(|(_, c)| c.norm_sqr()).sum();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn successor_states_inherit_shape_across_sessions() {
    let mut source = ShardedState::new(
        StateOptions::new()
            .with_soft_max(100)
            .with_hard_max(16)
            .with_num_shards(4),
    )
    .unwrap();
    for i in 0..50u8 {
        let bits: Vec<u8> = (0..8).map(|b| (i >> b) & 1).collect();
        source.accumulate(
            Complex64::new(1.0, 0.0),
            SpinConfiguration::from_bits(&bits).unwrap(),
        );
    }

    let next = source.next_options();
    assert_eq!(next.num_shards, 4);
    assert_eq!(next.soft_max, 100);
    // Shards grew past the initial hint, and the successor carries that.
    assert!(next.hard_max >= 16);

    let mut target = ShardedState::new(next).unwrap();
    let mut builder = StateBuilder::new(&mut target);
    builder.start();
    for (config, coeff) in source.iter() {
        builder.push(*coeff, *config);
    }
    builder.stop().unwrap();
    drop(builder);
    assert_eq!(target.len(), source.len());
}

#[test]
fn output_follows_iteration_order() {
    let mut state = ShardedState::new(
        StateOptions::new()
            .with_soft_max(10)
            .with_hard_max(16)
            .with_num_shards(2),
    )
    .unwrap();
    state.accumulate(Complex64::new(0.5, 0.0), spin("10"));
    state.accumulate(Complex64::new(1.0, 0.0), spin("01"));

    let mut buffer = Vec::new();
    write_state(&mut buffer, &state).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let written: Vec<&str> = text
        .lines()
        .map(|line| line.split_whitespace().next().unwrap())
        .collect();
    let iterated: Vec<String> = state.iter().map(|(config, _)| config.to_string()).collect();
    assert_eq!(written, iterated);
}
