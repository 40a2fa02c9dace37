//! Ground-state search for spin-½ chains by diffusion
//!
//! Thin drivers over the sharded sparse-state engine:
//!
//! - [`Heisenberg`]: two-site exchange Hamiltonians, read from text
//!   specifications via [`read_hamiltonian`]
//! - [`diffusion_loop`]: iterates `|ψ⟩ ← (Λ·I − H)|ψ⟩` with truncation
//!   and normalization between steps
//! - [`energy`]: estimates `⟨ψ|H|ψ⟩` through an auxiliary state
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use spindrift_sim::{diffusion_loop, energy, Heisenberg};
//! use spindrift_state::{ShardedState, StateOptions};
//!
//! // Two antiferromagnetically coupled sites, started from |01⟩.
//! let chain = Heisenberg::with_edges(vec![(0, 1)], Complex64::new(1.0, 0.0));
//! let mut psi = ShardedState::new(StateOptions::new().with_soft_max(4)).unwrap();
//! psi.accumulate(Complex64::new(1.0, 0.0), "01".parse().unwrap());
//!
//! let ground = diffusion_loop(2.0, &chain, psi, 20).unwrap();
//! let e = energy(&chain, &ground).unwrap();
//! assert!((e.re - -3.0).abs() < 1e-6);
//! ```

pub mod diffusion;
pub mod error;
pub mod hamiltonian;

pub use diffusion::{diffusion_loop, diffusion_loop_with, diffusion_step, energy, IterationStats};
pub use error::{Result, SimError};
pub use hamiltonian::{read_hamiltonian, Edge, Heisenberg, Operator};
